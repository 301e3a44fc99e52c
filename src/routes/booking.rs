//! Booking page route handlers

use askama::Template;
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::booking::{BookingFormController, BookingFormInput, BookingSession, FormError, FormState};
use crate::error::{AppError, Result};
use crate::pricing::calculators::format_money;
use crate::pricing::responses::{count_label, line_items};
use crate::AppState;

/// One estimate row, preformatted for the template
struct LineItemView {
    label: String,
    detail: String,
    amount: String,
    is_credit: bool,
}

/// Booking form + estimate template
#[derive(Template)]
#[template(path = "booking/form.html")]
struct BookingFormTemplate {
    session_id: String,
    name: String,
    email: String,
    phone: String,
    message: String,
    start_date: String,
    end_date: String,
    animal_count: u32,
    minimum_animals: u32,
    maximum_animals: u32,
    trailer_checked: bool,
    first_time_checked: bool,
    trailer_daily_rate: String,
    clinic_fee: String,
    date_error: String,
    has_date_error: bool,
    form_error: String,
    has_form_error: bool,
    banner: String,
    has_banner: bool,
    is_submitting: bool,
    can_submit: bool,
    has_quote: bool,
    trip_days: String,
    line_items: Vec<LineItemView>,
    total_due: String,
    security_deposit: String,
}

/// Confirmation template
#[derive(Template)]
#[template(path = "booking/submitted.html")]
struct SubmittedTemplate {
    session_id: String,
    first_name: String,
    reference: String,
}

/// Fresh booking page
pub async fn new_form(State(state): State<AppState>) -> Result<Response> {
    let session = state.sessions.create().await;
    render(&session, None).await
}

/// Current state of a booking page
pub async fn show(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    let session = find(&state, id).await?;
    render(&session, None).await
}

/// Whole-form update; re-renders with a fresh estimate
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<BookingFormInput>,
) -> Result<Response> {
    let session = find(&state, id).await?;
    let outcome = session.with_controller(|c| c.apply_form(form)).await;
    render(&session, outcome.err()).await
}

/// Save the posted form, then submit it
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<BookingFormInput>,
) -> Result<Response> {
    let session = find(&state, id).await?;
    if let Err(e) = session.with_controller(|c| c.apply_form(form)).await {
        return render(&session, Some(e)).await;
    }
    let outcome = session.submit(Arc::clone(&state.submitter)).await;
    render(&session, outcome.err()).await
}

/// "Submit another request"
pub async fn reset(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    let session = find(&state, id).await?;
    let outcome = session.reset().await;
    match outcome {
        Ok(()) => Ok(Redirect::to(&format!("/booking/{}", id)).into_response()),
        Err(e) => render(&session, Some(e)).await,
    }
}

async fn find(state: &AppState, id: Uuid) -> Result<Arc<BookingSession>> {
    state.sessions.get(&id).await.ok_or(AppError::NotFound)
}

async fn render(session: &BookingSession, error: Option<FormError>) -> Result<Response> {
    let html = session
        .with_controller(|controller| render_controller(session.id(), controller, error))
        .await?;
    Ok(Html(html).into_response())
}

fn render_controller(
    id: Uuid,
    controller: &BookingFormController,
    error: Option<FormError>,
) -> std::result::Result<String, askama::Error> {
    if let FormState::Submitted(confirmation) = controller.state() {
        return SubmittedTemplate {
            session_id: id.to_string(),
            first_name: confirmation.first_name.clone(),
            reference: confirmation.reference.to_string(),
        }
        .render();
    }

    let config = controller.config();
    let params = controller.params();
    let contact = controller.contact();
    let quote = controller.quote();
    let date_error = controller.date_error();
    // The date error already has its own slot next to the end date
    let form_error = error
        .filter(|e| !matches!(e, FormError::InvalidDateRange(_)))
        .map(|e| e.to_string())
        .or_else(|| controller.animal_error().map(ToString::to_string));

    BookingFormTemplate {
        session_id: id.to_string(),
        name: contact.name.clone(),
        email: contact.email.clone(),
        phone: contact.phone.clone(),
        message: contact.message.clone(),
        start_date: params.start_date.map(|d| d.to_string()).unwrap_or_default(),
        end_date: params.end_date.map(|d| d.to_string()).unwrap_or_default(),
        animal_count: params.animal_count,
        minimum_animals: config.minimum_animals,
        maximum_animals: config.maximum_animals,
        trailer_checked: params.trailer_requested,
        first_time_checked: params.first_time_renter,
        trailer_daily_rate: config.trailer_daily_rate.normalize().to_string(),
        clinic_fee: config.clinic_flat_fee.normalize().to_string(),
        has_date_error: date_error.is_some(),
        date_error: date_error.unwrap_or_default(),
        has_form_error: form_error.is_some(),
        form_error: form_error.unwrap_or_default(),
        has_banner: controller.banner().is_some(),
        banner: controller.banner().unwrap_or_default().to_string(),
        is_submitting: *controller.state() == FormState::Submitting,
        can_submit: controller.can_submit(),
        has_quote: quote.is_some(),
        trip_days: quote
            .map(|q| count_label(q.trip_days, "Day", "Days"))
            .unwrap_or_default(),
        line_items: quote
            .map(|q| line_items(q, config))
            .unwrap_or_default()
            .into_iter()
            .map(|item| LineItemView {
                label: item.label,
                detail: item.detail,
                amount: item.amount.amount,
                is_credit: item.is_credit,
            })
            .collect(),
        total_due: quote.map(|q| format_money(q.total_due)).unwrap_or_default(),
        security_deposit: format_money(config.security_deposit),
    }
    .render()
}
