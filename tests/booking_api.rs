mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{html, json, test_app};

fn contact_edits() -> Value {
    json!([
        { "field": "name", "value": "Jane Hunter" },
        { "field": "email", "value": "jane@example.com" },
        { "field": "phone", "value": "(406) 555-0123" },
        { "field": "start_date", "value": "2025-09-01" },
        { "field": "end_date", "value": "2025-09-03" },
    ])
}

async fn open(app: &axum::Router) -> String {
    let (status, body) = json(app, "POST", "/api/bookings", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_new_session_has_defaults_and_no_quote() {
    let app = test_app();
    let (status, body) = json(&app, "POST", "/api/bookings", None).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["state"], "editing");
    assert_eq!(body["parameters"]["animal_count"], 2);
    assert_eq!(body["parameters"]["first_time_renter"], true);
    assert_eq!(body["quote"]["available"], false);
    assert_eq!(body["can_submit"], false);
}

#[tokio::test]
async fn test_edits_requote() {
    let app = test_app();
    let id = open(&app).await;
    let uri = format!("/api/bookings/{}", id);

    let (status, body) = json(&app, "PATCH", &uri, Some(contact_edits())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quote"]["breakdown"]["total_due"]["amount"], "465.00");
    assert_eq!(body["can_submit"], true);

    let (_, body) = json(
        &app,
        "PATCH",
        &uri,
        Some(json!([{ "field": "trailer_requested", "value": true }])),
    )
    .await;
    assert_eq!(body["quote"]["breakdown"]["trailer_cost"]["amount"], "75.00");
    assert_eq!(body["quote"]["breakdown"]["total_due"]["amount"], "540.00");
}

#[tokio::test]
async fn test_end_before_start_blocks_submission() {
    let app = test_app();
    let id = open(&app).await;
    let uri = format!("/api/bookings/{}", id);

    json(&app, "PATCH", &uri, Some(contact_edits())).await;
    let (status, body) = json(
        &app,
        "PATCH",
        &uri,
        Some(json!([{ "field": "end_date", "value": "2025-08-30" }])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date_error"], "End date cannot be before start date.");
    assert_eq!(body["quote"]["available"], false);
    assert_eq!(body["can_submit"], false);

    let (status, body) = json(&app, "POST", &format!("{}/submit", uri), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_type"], "invalid_date_range");
}

#[tokio::test]
async fn test_zero_animals_cannot_be_submitted() {
    let app = test_app();
    let id = open(&app).await;
    let uri = format!("/api/bookings/{}", id);
    json(&app, "PATCH", &uri, Some(contact_edits())).await;

    let (status, body) = json(
        &app,
        "PATCH",
        &uri,
        Some(json!([{ "field": "animal_count", "value": 0 }])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quote"]["available"], false);
    assert_eq!(body["can_submit"], false);
    assert!(body["animal_error"].is_string());

    let (status, body) = json(&app, "POST", &format!("{}/submit", uri), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_type"], "animal_count_out_of_range");
}

#[tokio::test]
async fn test_submit_requires_contact() {
    let app = test_app();
    let id = open(&app).await;
    let uri = format!("/api/bookings/{}", id);
    json(
        &app,
        "PATCH",
        &uri,
        Some(json!([
            { "field": "start_date", "value": "2025-09-01" },
            { "field": "end_date", "value": "2025-09-03" },
        ])),
    )
    .await;

    let (status, body) = json(&app, "POST", &format!("{}/submit", uri), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_type"], "missing_contact");
    assert_eq!(body["details"]["fields"], json!(["name", "email", "phone"]));
}

#[tokio::test(start_paused = true)]
async fn test_submit_flow() {
    let app = test_app();
    let id = open(&app).await;
    let uri = format!("/api/bookings/{}", id);
    json(&app, "PATCH", &uri, Some(contact_edits())).await;

    let (status, body) = json(&app, "POST", &format!("{}/submit", uri), None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["state"], "submitting");

    let (status, body) = json(
        &app,
        "PATCH",
        &uri,
        Some(json!([{ "field": "animal_count", "value": 6 }])),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_type"], "not_editable");

    tokio::time::sleep(Duration::from_millis(1600)).await;
    let (_, body) = json(&app, "GET", &uri, None).await;
    assert_eq!(body["state"], "submitted");
    assert_eq!(body["confirmation"]["first_name"], "Jane");

    let (status, body) = json(&app, "POST", &format!("{}/reset", uri), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "editing");
    assert_eq!(body["contact"]["name"], "");
    assert_eq!(body["quote"]["available"], false);
}

#[tokio::test(start_paused = true)]
async fn test_delete_cancels_and_forgets() {
    let app = test_app();
    let id = open(&app).await;
    let uri = format!("/api/bookings/{}", id);
    json(&app, "PATCH", &uri, Some(contact_edits())).await;
    json(&app, "POST", &format!("{}/submit", uri), None).await;

    let (status, _) = json(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = json(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_type"], "session_not_found");
}

#[tokio::test]
async fn test_booking_page_renders_estimate() {
    let app = test_app();
    let (status, page) = html(&app, "GET", "/booking", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Secure Your Dates"));

    let id = open(&app).await;
    let form = "name=Jane+Hunter&email=jane%40example.com&phone=406-555-0123\
                &start_date=2025-07-01&end_date=2025-07-07&animal_count=4\
                &trailer_requested=on";
    let (status, page) = html(&app, "POST", &format!("/booking/{}", id), Some(form)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("7 Days"));
    assert!(page.contains("Long-Trip Reward"));
    assert!(page.contains("1813.00"));
    assert!(!page.contains("Llama Handling Clinic"));
}

#[tokio::test]
async fn test_booking_page_shows_date_error() {
    let app = test_app();
    let id = open(&app).await;
    let form = "start_date=2025-07-07&end_date=2025-07-01&animal_count=2";
    let (status, page) = html(&app, "POST", &format!("/booking/{}", id), Some(form)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("End date cannot be before start date."));
}

#[tokio::test]
async fn test_unknown_booking_page() {
    let app = test_app();
    let uri = "/booking/00000000-0000-0000-0000-000000000000";
    let (status, _) = html(&app, "GET", uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rentals_and_health() {
    let app = test_app();
    let (status, page) = html(&app, "GET", "/rentals", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Pack Llama"));

    let (status, body) = json(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
