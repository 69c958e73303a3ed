use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

/// Store rows carry explicit nulls where the struct wants a default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Intake forms send "" or values this service does not know; both mean absent
fn unknown_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

/// Buyer segment captured on lead intake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuyerType {
    Retail,
    Investor,
    Hni,
    Commercial,
}

/// How soon the lead intends to buy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeline {
    #[serde(rename = "immediate")]
    Immediate,
    #[serde(rename = "1-3_months")]
    OneToThreeMonths,
    #[serde(rename = "3-6_months")]
    ThreeToSixMonths,
    #[serde(rename = "6-12_months")]
    SixToTwelveMonths,
    #[serde(rename = "flexible")]
    Flexible,
}

/// Pipeline stage of a lead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Viewing,
    Negotiating,
    Converted,
    Lost,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Viewing => "viewing",
            LeadStatus::Negotiating => "negotiating",
            LeadStatus::Converted => "converted",
            LeadStatus::Lost => "lost",
        }
    }
}

/// Kind of entry in a lead's activity log
///
/// This service writes `note` and `status_change`; call, email and viewing
/// entries are logged by agents through the CRM and must survive a rescore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Note,
    StatusChange,
    Call,
    Email,
    Viewing,
}

/// Append-only activity log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadActivity {
    pub kind: ActivityKind,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Prospective buyer tracked through the sales pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lead {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "unknown_as_none")]
    pub buyer_type: Option<BuyerType>,
    #[serde(default)]
    pub budget_min: Option<f64>,
    #[serde(default)]
    pub budget_max: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "unknown_as_none")]
    pub timeline: Option<Timeline>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: LeadStatus,
    #[serde(default)]
    pub score: Option<u8>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub activities: Vec<LeadActivity>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Listing availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    #[default]
    Available,
    Reserved,
    Sold,
    Maintenance,
}

impl PropertyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Available => "available",
            PropertyStatus::Reserved => "reserved",
            PropertyStatus::Sold => "sold",
            PropertyStatus::Maintenance => "maintenance",
        }
    }
}

/// Property listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub bedrooms: Option<u8>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: PropertyStatus,
}

impl Property {
    /// Only available listings are offered as recommendations
    pub fn is_listable(&self) -> bool {
        self.status == PropertyStatus::Available
    }
}

/// Matching preferences stored on the customer row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerPreferences {
    /// Free text such as "high", "medium budget" or "low"
    #[serde(default)]
    pub budget_range: Option<String>,
    #[serde(default)]
    pub preferred_bedrooms: Option<u8>,
    #[serde(default)]
    pub preferred_location: Option<String>,
}

/// Converted lead or direct signup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(flatten)]
    pub preferences: CustomerPreferences,
}

/// Points awarded per matching criterion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaBreakdown {
    pub budget: u8,
    pub bedrooms: u8,
    pub location: u8,
}

/// Compatibility of one customer with one property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    #[serde(rename = "customerId")]
    pub customer_id: String,
    #[serde(rename = "propertyId")]
    pub property_id: String,
    pub score: u8,
    pub reason: String,
    pub breakdown: CriteriaBreakdown,
}

/// Matcher weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityWeights {
    pub budget: u8,
    pub bedrooms_exact: u8,
    pub bedrooms_near: u8,
    pub location: u8,
}

impl Default for CompatibilityWeights {
    fn default() -> Self {
        Self {
            budget: 40,
            bedrooms_exact: 30,
            bedrooms_near: 15,
            location: 30,
        }
    }
}
