//! Booking request form.
//!
//! A controller per visitor holds the entered parameters, re-quotes on every
//! change and walks the request through submission.

pub mod controller;
pub mod models;
pub mod routes;
pub mod session;
pub mod submission;

pub use controller::{BookingFormController, FormError, FormState};
pub use models::{BookingFormInput, BookingRequest, Confirmation, ContactDetails, FieldEdit};
pub use routes::router;
pub use session::{BookingSession, SessionView};
pub use submission::{BookingSubmitter, HttpSubmitter, SimulatedSubmitter, SubmissionError};
