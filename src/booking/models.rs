//! Booking form data: contact details, edits, and the frozen request.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pricing::{BookingParameters, PriceBreakdown};

/// Who is asking. Name, email and phone are required to submit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

impl ContactDetails {
    /// Names of required fields that are blank or malformed
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if !self.email.contains('@') || self.email.trim().len() < 3 {
            missing.push("email");
        }
        if self.phone.trim().is_empty() {
            missing.push("phone");
        }
        missing
    }

    /// First word of the name, for the confirmation greeting
    pub fn first_name(&self) -> String {
        self.name
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string()
    }
}

/// A single field change on the booking form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldEdit {
    StartDate(Option<NaiveDate>),
    EndDate(Option<NaiveDate>),
    AnimalCount(u32),
    TrailerRequested(bool),
    FirstTimeRenter(bool),
    Name(String),
    Email(String),
    Phone(String),
    Message(String),
}

/// Whole-form update as posted by the HTML page.
///
/// Everything is text because that is what a browser sends; checkboxes are
/// present only when ticked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingFormInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub animal_count: String,
    #[serde(default)]
    pub trailer_requested: Option<String>,
    #[serde(default)]
    pub first_time_renter: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Snapshot handed to a submitter. Nothing in it changes after submission starts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingRequest {
    pub contact: ContactDetails,
    pub parameters: BookingParameters,
    pub quote: PriceBreakdown,
}

/// Receipt for an accepted booking request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub reference: Uuid,
    pub first_name: String,
    pub submitted_at: DateTime<Utc>,
}

impl Confirmation {
    pub fn for_request(request: &BookingRequest) -> Self {
        Self {
            reference: Uuid::new_v4(),
            first_name: request.contact.first_name(),
            submitted_at: Utc::now(),
        }
    }
}
