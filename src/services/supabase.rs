use crate::models::{Customer, Lead, LeadStatus, Property};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with Supabase
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: invalid service key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Table names in the Supabase schema
#[derive(Debug, Clone)]
pub struct SupabaseTables {
    pub leads: String,
    pub customers: String,
    pub properties: String,
}

/// Supabase PostgREST client
///
/// Handles all reads and writes against the CRM store:
/// - Fetching leads, customers and properties
/// - Persisting recomputed lead scores and status changes
/// - Persisting staff edits to listings
pub struct SupabaseClient {
    base_url: String,
    service_key: String,
    client: Client,
    tables: SupabaseTables,
}

impl SupabaseClient {
    /// Create a new Supabase client
    pub fn new(
        base_url: String,
        service_key: String,
        tables: SupabaseTables,
        timeout_secs: u64,
    ) -> Result<Self, SupabaseError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            service_key,
            client,
            tables,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
    }

    async fn check(response: Response, what: &str) -> Result<Response, SupabaseError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(SupabaseError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
        tracing::error!("Supabase request failed ({}): {} - {}", what, status, body);
        Err(SupabaseError::ApiError(format!("Failed to {}: {}", what, status)))
    }

    /// Fetch a single row by id
    async fn get_by_id<T: DeserializeOwned>(&self, table: &str, id: &str) -> Result<T, SupabaseError> {
        let url = format!(
            "{}?id=eq.{}&select=*&limit=1",
            self.table_url(table),
            urlencoding::encode(id)
        );

        tracing::debug!("Fetching {} row {}", table, id);

        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = Self::check(response, &format!("fetch {}", table)).await?;

        let rows: Value = response.json().await?;
        let rows = rows
            .as_array()
            .ok_or_else(|| SupabaseError::InvalidResponse("Expected a JSON array".into()))?;

        let row = rows
            .first()
            .ok_or_else(|| SupabaseError::NotFound(format!("{} {} not found", table, id)))?;

        serde_json::from_value(row.clone())
            .map_err(|e| SupabaseError::InvalidResponse(format!("Failed to parse {}: {}", table, e)))
    }

    /// Patch a single row by id
    async fn patch_by_id(&self, table: &str, id: &str, payload: &Value) -> Result<(), SupabaseError> {
        let url = format!("{}?id=eq.{}", self.table_url(table), urlencoding::encode(id));

        let response = self
            .authorized(self.client.patch(&url))
            .header("Prefer", "return=minimal")
            .json(payload)
            .send()
            .await?;

        Self::check(response, &format!("update {}", table)).await?;

        tracing::debug!("Updated {} row {}", table, id);
        Ok(())
    }

    pub async fn get_lead(&self, lead_id: &str) -> Result<Lead, SupabaseError> {
        self.get_by_id(&self.tables.leads, lead_id).await
    }

    pub async fn get_customer(&self, customer_id: &str) -> Result<Customer, SupabaseError> {
        self.get_by_id(&self.tables.customers, customer_id).await
    }

    pub async fn get_property(&self, property_id: &str) -> Result<Property, SupabaseError> {
        self.get_by_id(&self.tables.properties, property_id).await
    }

    /// List listings that can be recommended
    ///
    /// Rows that fail to parse are skipped rather than failing the whole batch.
    pub async fn list_available_properties(&self, limit: usize) -> Result<Vec<Property>, SupabaseError> {
        let url = format!(
            "{}?status=eq.available&select=*&order=price.asc&limit={}",
            self.table_url(&self.tables.properties),
            limit
        );

        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = Self::check(response, "list properties").await?;

        let rows: Value = response.json().await?;
        let rows = rows
            .as_array()
            .ok_or_else(|| SupabaseError::InvalidResponse("Expected a JSON array".into()))?;

        let properties: Vec<Property> = rows
            .iter()
            .filter_map(|row| match serde_json::from_value(row.clone()) {
                Ok(p) => Some(p),
                Err(e) => {
                    tracing::warn!("Skipping malformed property row: {}", e);
                    None
                }
            })
            .collect();

        tracing::debug!("Listed {} available properties (from {} rows)", properties.len(), rows.len());

        Ok(properties)
    }

    /// Persist a recomputed score without touching the activity log
    pub async fn update_lead_score(&self, lead: &Lead) -> Result<(), SupabaseError> {
        let payload = serde_json::json!({ "score": lead.score });
        self.patch_by_id(&self.tables.leads, &lead.id, &payload).await
    }

    /// Persist a status change together with its notes and activity log
    ///
    /// The write only applies while the stored status is still `read_status`.
    /// If another request moved the lead first no row matches and
    /// `SupabaseError::Conflict` is returned, leaving its activities intact.
    pub async fn update_lead_transition(
        &self,
        lead: &Lead,
        read_status: LeadStatus,
    ) -> Result<(), SupabaseError> {
        let url = format!(
            "{}?id=eq.{}&status=eq.{}",
            self.table_url(&self.tables.leads),
            urlencoding::encode(&lead.id),
            read_status.as_str()
        );
        let payload = serde_json::json!({
            "score": lead.score,
            "status": lead.status,
            "notes": lead.notes,
            "activities": lead.activities,
        });

        let response = self
            .authorized(self.client.patch(&url))
            .header("Prefer", "return=representation")
            .json(&payload)
            .send()
            .await?;
        let response = Self::check(response, "update leads").await?;

        let rows: Value = response.json().await?;
        let updated = rows
            .as_array()
            .ok_or_else(|| SupabaseError::InvalidResponse("Expected a JSON array".into()))?
            .len();

        if updated == 0 {
            return Err(SupabaseError::Conflict(format!(
                "lead {} is no longer {}",
                lead.id,
                read_status.as_str()
            )));
        }

        tracing::debug!("Lead {} moved {} -> {}", lead.id, read_status.as_str(), lead.status.as_str());
        Ok(())
    }

    /// Persist a listing's status and price
    pub async fn update_property(&self, property: &Property) -> Result<(), SupabaseError> {
        let payload = serde_json::json!({
            "status": property.status,
            "price": property.price,
        });
        self.patch_by_id(&self.tables.properties, &property.id, &payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> SupabaseTables {
        SupabaseTables {
            leads: "leads".to_string(),
            customers: "customers".to_string(),
            properties: "properties".to_string(),
        }
    }

    #[test]
    fn test_supabase_client_creation() {
        let client = SupabaseClient::new(
            "https://project.supabase.co/".to_string(),
            "test_key".to_string(),
            tables(),
            10,
        )
        .unwrap();

        assert_eq!(client.service_key, "test_key");
        assert_eq!(client.table_url("leads"), "https://project.supabase.co/rest/v1/leads");
    }
}
