use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{ActivityKind, Lead, LeadActivity, LeadStatus, Property, PropertyStatus};

/// Errors raised by pipeline and listing state changes
#[derive(Debug, Error, PartialEq)]
pub enum LifecycleError {
    #[error("Lead {lead_id} is already {status} and cannot move to {requested}")]
    LeadClosed {
        lead_id: String,
        status: &'static str,
        requested: &'static str,
    },

    #[error("Lead {0} is already in the requested status")]
    LeadUnchanged(String),

    #[error("Property {0} is sold and can no longer be modified")]
    PropertySold(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(f64),
}

impl LeadStatus {
    /// Converted and lost leads leave the pipeline for good
    pub fn is_terminal(&self) -> bool {
        matches!(self, LeadStatus::Converted | LeadStatus::Lost)
    }

    pub fn can_transition_to(&self, next: LeadStatus) -> bool {
        !self.is_terminal() && *self != next
    }
}

impl PropertyStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PropertyStatus::Sold)
    }
}

impl Lead {
    /// Move the lead to another pipeline stage and log it
    pub fn transition_to(&mut self, next: LeadStatus, at: DateTime<Utc>) -> Result<(), LifecycleError> {
        if !self.status.can_transition_to(next) {
            return Err(if self.status.is_terminal() {
                LifecycleError::LeadClosed {
                    lead_id: self.id.clone(),
                    status: self.status.as_str(),
                    requested: next.as_str(),
                }
            } else {
                LifecycleError::LeadUnchanged(self.id.clone())
            });
        }

        let previous = self.status;
        self.status = next;
        self.activities.push(LeadActivity {
            kind: ActivityKind::StatusChange,
            description: format!("{} -> {}", previous.as_str(), next.as_str()),
            created_at: at,
        });

        Ok(())
    }

    pub fn add_note(&mut self, text: impl Into<String>, at: DateTime<Utc>) {
        let text = text.into();
        self.activities.push(LeadActivity {
            kind: ActivityKind::Note,
            description: text.clone(),
            created_at: at,
        });
        self.notes.push(text);
    }
}

impl Property {
    pub fn set_status(&mut self, next: PropertyStatus) -> Result<(), LifecycleError> {
        if self.status.is_terminal() {
            return Err(LifecycleError::PropertySold(self.id.clone()));
        }
        self.status = next;
        Ok(())
    }

    pub fn set_price(&mut self, price: f64) -> Result<(), LifecycleError> {
        if self.status.is_terminal() {
            return Err(LifecycleError::PropertySold(self.id.clone()));
        }
        if !price.is_finite() || price < 0.0 {
            return Err(LifecycleError::InvalidPrice(price));
        }
        self.price = Some(price);
        Ok(())
    }

    /// Staff edit of a listing: price is applied before status so a listing
    /// can be marked sold at its final price in one change
    pub fn apply_change(&mut self, status: PropertyStatus, price: Option<f64>) -> Result<(), LifecycleError> {
        if let Some(price) = price {
            self.set_price(price)?;
        }
        self.set_status(status)
    }
}
