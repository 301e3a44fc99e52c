//! Booking form controller.
//!
//! Owns the parameters for one booking session and keeps the quote in step with
//! them. Every accepted edit replaces the whole breakdown; nothing is patched in
//! place.
//!
//! ```text
//! Editing --begin_submission--> Submitting --finish_submission(Ok)--> Submitted
//!    ^                              |                                     |
//!    +---- finish_submission(Err) --+                                     |
//!    +---- cancel_submission -------+                                     |
//!    +------------------------------- reset ------------------------------+
//! ```

use std::sync::Arc;

use serde::Serialize;

use crate::pricing::services::{parse_date_input, resolve_animal_count};
use crate::pricing::{
    compute_quote, AnimalCountError, BookingParameters, PriceBreakdown, PricingConfig,
    PricingError, ValidationError,
};

use super::models::{BookingFormInput, BookingRequest, Confirmation, ContactDetails, FieldEdit};
use super::submission::SubmissionError;

/// Where a booking session is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "confirmation", rename_all = "snake_case")]
pub enum FormState {
    Editing,
    Submitting,
    Submitted(Confirmation),
}

impl FormState {
    pub fn name(&self) -> &'static str {
        match self {
            FormState::Editing => "editing",
            FormState::Submitting => "submitting",
            FormState::Submitted(_) => "submitted",
        }
    }
}

/// Why a form operation was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("The form cannot be changed while {0}")]
    NotEditable(&'static str),

    #[error("No submission is in progress")]
    NotSubmitting,

    #[error(transparent)]
    InvalidInput(#[from] PricingError),

    #[error(transparent)]
    InvalidDateRange(#[from] ValidationError),

    #[error(transparent)]
    AnimalCount(#[from] AnimalCountError),

    #[error("Select your dates to generate a quote")]
    QuoteUnavailable,

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingContact(Vec<&'static str>),
}

/// Form state for one booking session.
#[derive(Debug, Clone)]
pub struct BookingFormController {
    config: Arc<PricingConfig>,
    params: BookingParameters,
    contact: ContactDetails,
    quote: Result<Option<PriceBreakdown>, ValidationError>,
    animal_error: Option<AnimalCountError>,
    state: FormState,
    banner: Option<String>,
}

impl BookingFormController {
    pub fn new(config: Arc<PricingConfig>) -> Self {
        let mut controller = Self {
            config,
            params: BookingParameters::default(),
            contact: ContactDetails::default(),
            quote: Ok(None),
            animal_error: None,
            state: FormState::Editing,
            banner: None,
        };
        controller.recompute();
        controller
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn params(&self) -> &BookingParameters {
        &self.params
    }

    pub fn contact(&self) -> &ContactDetails {
        &self.contact
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Error banner left by a failed submission
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Current breakdown, if one can be shown
    pub fn quote(&self) -> Option<&PriceBreakdown> {
        self.quote.as_ref().ok().and_then(Option::as_ref)
    }

    /// Message to show next to the end date
    pub fn date_error(&self) -> Option<String> {
        self.quote.as_ref().err().map(ToString::to_string)
    }

    pub fn animal_error(&self) -> Option<&AnimalCountError> {
        self.animal_error.as_ref()
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.contact.missing_fields()
    }

    pub fn can_submit(&self) -> bool {
        self.submission_blocker().is_none()
    }

    /// Apply one field change and recompute.
    pub fn apply(&mut self, edit: FieldEdit) -> Result<(), FormError> {
        self.ensure_editable()?;
        match edit {
            FieldEdit::StartDate(date) => self.params.start_date = date,
            FieldEdit::EndDate(date) => self.params.end_date = date,
            FieldEdit::AnimalCount(count) => self.params.animal_count = count,
            FieldEdit::TrailerRequested(on) => self.params.trailer_requested = on,
            FieldEdit::FirstTimeRenter(on) => self.params.first_time_renter = on,
            FieldEdit::Name(value) => self.contact.name = value,
            FieldEdit::Email(value) => self.contact.email = value,
            FieldEdit::Phone(value) => self.contact.phone = value,
            FieldEdit::Message(value) => self.contact.message = value,
        }
        self.recompute();
        Ok(())
    }

    /// Replace every field from a posted HTML form.
    ///
    /// Nothing changes if a date cannot be parsed. A non-numeric animal count
    /// falls back to the configured minimum.
    pub fn apply_form(&mut self, form: BookingFormInput) -> Result<(), FormError> {
        self.ensure_editable()?;

        let start_date = parse_date_input("start_date", Some(&form.start_date))?;
        let end_date = parse_date_input("end_date", Some(&form.end_date))?;
        let animal_count = form
            .animal_count
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|count| *count > 0)
            .unwrap_or(self.config.minimum_animals);

        self.params = BookingParameters {
            start_date,
            end_date,
            animal_count,
            trailer_requested: form.trailer_requested.is_some(),
            first_time_renter: form.first_time_renter.is_some(),
        };
        self.contact = ContactDetails {
            name: form.name,
            email: form.email,
            phone: form.phone,
            message: form.message,
        };
        self.recompute();
        Ok(())
    }

    /// Freeze the form and hand back the request to send.
    pub fn begin_submission(&mut self) -> Result<BookingRequest, FormError> {
        self.ensure_editable()?;
        if let Some(blocker) = self.submission_blocker() {
            return Err(blocker);
        }
        let quote = self.quote().cloned().ok_or(FormError::QuoteUnavailable)?;

        self.banner = None;
        self.state = FormState::Submitting;
        Ok(BookingRequest {
            contact: self.contact.clone(),
            parameters: self.params.clone(),
            quote,
        })
    }

    /// Record the outcome of a submission.
    ///
    /// Failure returns to Editing with everything the user typed still in place.
    pub fn finish_submission(
        &mut self,
        outcome: Result<Confirmation, SubmissionError>,
    ) -> Result<(), FormError> {
        if self.state != FormState::Submitting {
            return Err(FormError::NotSubmitting);
        }
        match outcome {
            Ok(confirmation) => {
                self.banner = None;
                self.state = FormState::Submitted(confirmation);
            }
            Err(e) => {
                self.banner = Some(format!(
                    "We couldn't send your request ({}). Your details are saved, please try again.",
                    e
                ));
                self.state = FormState::Editing;
            }
        }
        Ok(())
    }

    /// Abandon an in-flight submission, keeping the entered parameters.
    pub fn cancel_submission(&mut self) -> Result<(), FormError> {
        if self.state != FormState::Submitting {
            return Err(FormError::NotSubmitting);
        }
        self.state = FormState::Editing;
        Ok(())
    }

    /// Start over with a blank form.
    pub fn reset(&mut self) -> Result<(), FormError> {
        if self.state == FormState::Submitting {
            return Err(FormError::NotEditable(self.state.name()));
        }
        self.params = BookingParameters::default();
        self.contact = ContactDetails::default();
        self.banner = None;
        self.state = FormState::Editing;
        self.recompute();
        Ok(())
    }

    fn ensure_editable(&self) -> Result<(), FormError> {
        match self.state {
            FormState::Editing => Ok(()),
            ref other => Err(FormError::NotEditable(other.name())),
        }
    }

    fn submission_blocker(&self) -> Option<FormError> {
        if self.state != FormState::Editing {
            return Some(FormError::NotEditable(self.state.name()));
        }
        if let Err(e) = &self.quote {
            return Some(FormError::InvalidDateRange(*e));
        }
        if let Some(e) = &self.animal_error {
            return Some(FormError::AnimalCount(*e));
        }
        let missing = self.contact.missing_fields();
        if !missing.is_empty() {
            return Some(FormError::MissingContact(missing));
        }
        if self.quote().is_none() {
            return Some(FormError::QuoteUnavailable);
        }
        None
    }

    fn recompute(&mut self) {
        self.animal_error = None;
        match resolve_animal_count(self.params.animal_count, &self.config) {
            Ok(count) => self.params.animal_count = count,
            Err(e) => self.animal_error = Some(e),
        }

        let quote = compute_quote(&self.params, &self.config);
        self.quote = match quote {
            // No figures for a group size the outfit won't book
            Ok(Some(_)) if self.animal_error.is_some() => Ok(None),
            other => other,
        };

        tracing::debug!(
            trip_days = self.quote().map(|q| q.trip_days),
            total_due = ?self.quote().map(|q| q.total_due),
            date_error = self.quote.is_err(),
            "Booking quote recomputed"
        );
    }
}
