use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Days, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;
use vettra::config::Config;

/// Default API key seeded by the initial migration (must match m20260301_initial.rs)
const ADMIN_API_KEY: &str = "vettra_default_api_key_please_rotate";

const BOUNDARY: &str = "vettra-test-boundary";

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // A single pooled connection keeps the in-memory database shared.
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;
    config.storage.upload_path = std::env::temp_dir()
        .join(format!("vettra-test-{}", uuid::Uuid::new_v4()))
        .to_string_lossy()
        .to_string();

    let state = vettra::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    vettra::api::router(state).await
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn register(app: &Router, email: &str, username: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "email": email,
                        "username": username,
                        "password": "correct-horse",
                        "first_name": "Test",
                        "last_name": "Worker",
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    body["data"]["api_key"].as_str().unwrap().to_string()
}

async fn get_json(app: &Router, uri: &str, api_key: &str) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header("X-Api-Key", api_key)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK, "uri: {uri}");
    json_body(response).await
}

async fn put_complete_details(app: &Router, api_key: &str) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/personal-details")
                .header("X-Api-Key", api_key)
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "date_of_birth": "1990-04-02",
                        "phone_number": "+61412345678",
                        "address_line1": "1 Example St",
                        "suburb": "Brisbane",
                        "state": "QLD",
                        "postcode": "4000",
                        "emergency_contact_name": "Jordan Smith",
                        "emergency_contact_phone": "+61498765432",
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["is_complete"], true);
}

fn multipart_body(document_type: i64, filename: &str, expiry_date: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();

    let mut push_field = |name: &str, value: &str| {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    };

    push_field("document_type", &document_type.to_string());
    if let Some(expiry) = expiry_date {
        push_field("expiry_date", expiry);
    }

    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"%PDF-1.4 fake certificate contents");
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    body
}

async fn upload_document(
    app: &Router,
    api_key: &str,
    document_type: i64,
    filename: &str,
    expiry_date: Option<&str>,
) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/documents/upload")
                .header("X-Api-Key", api_key)
                .header(
                    "Content-Type",
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(multipart_body(document_type, filename, expiry_date)))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await
}

async fn review_document(app: &Router, document_id: i64, status: &str) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/api/admin/documents/{document_id}/review"))
                .header("X-Api-Key", ADMIN_API_KEY)
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "status": status, "notes": "reviewed in test" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await
}

async fn required_type_ids(app: &Router, api_key: &str) -> Vec<i64> {
    let body = get_json(app, "/api/document-types", api_key).await;
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|t| t["is_required"].as_bool().unwrap())
        .map(|t| t["id"].as_i64().unwrap())
        .collect()
}

fn future_date(days: u64) -> String {
    (Utc::now().date_naive() + Days::new(days)).to_string()
}

fn past_date(days: u64) -> String {
    (Utc::now().date_naive() - Days::new(days)).to_string()
}

#[tokio::test]
async fn test_fresh_user_starts_at_personal_details() {
    let app = spawn_app().await;
    let key = register(&app, "fresh@example.com", "fresh").await;

    let body = get_json(&app, "/api/progress", &key).await;
    assert_eq!(body["data"]["current_stage"], "personal_details");
    assert_eq!(body["data"]["completion_percentage"], 0);
}

#[tokio::test]
async fn test_complete_details_advances_to_documents_upload() {
    let app = spawn_app().await;
    let key = register(&app, "details@example.com", "details").await;

    put_complete_details(&app, &key).await;

    let body = get_json(&app, "/api/progress", &key).await;
    assert_eq!(body["data"]["current_stage"], "documents_upload");
    // 1 earned unit of 11 (9 required types + details + admin sign-off).
    assert_eq!(body["data"]["completion_percentage"], 9);
    assert!(body["data"]["personal_details_completed_at"].is_string());
}

#[tokio::test]
async fn test_incomplete_details_stay_at_personal_details() {
    let app = spawn_app().await;
    let key = register(&app, "partial@example.com", "partial").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/personal-details")
                .header("X-Api-Key", &key)
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "phone_number": "+61412345678" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = get_json(&app, "/api/progress", &key).await;
    assert_eq!(body["data"]["current_stage"], "personal_details");
}

#[tokio::test]
async fn test_pending_upload_moves_to_admin_review() {
    let app = spawn_app().await;
    let key = register(&app, "review@example.com", "review").await;
    put_complete_details(&app, &key).await;

    let types = required_type_ids(&app, &key).await;
    let uploaded = upload_document(&app, &key, types[0], "cert.pdf", Some(&future_date(365))).await;
    assert_eq!(uploaded["data"]["status"], "pending");

    let body = get_json(&app, "/api/progress", &key).await;
    assert_eq!(body["data"]["current_stage"], "admin_review");
    assert!(body["data"]["documents_uploaded_at"].is_string());
}

#[tokio::test]
async fn test_rejection_and_reupload_cycle() {
    let app = spawn_app().await;
    let key = register(&app, "cycle@example.com", "cycle").await;
    put_complete_details(&app, &key).await;

    let types = required_type_ids(&app, &key).await;
    let uploaded = upload_document(&app, &key, types[0], "cert.pdf", Some(&future_date(365))).await;
    let doc_id = uploaded["data"]["id"].as_i64().unwrap();

    review_document(&app, doc_id, "rejected").await;

    let body = get_json(&app, "/api/progress", &key).await;
    assert_eq!(body["data"]["current_stage"], "rejected");

    // Re-uploading the same type replaces the rejected row and resets
    // review to pending.
    let replacement =
        upload_document(&app, &key, types[0], "cert-v2.pdf", Some(&future_date(365))).await;
    let new_id = replacement["data"]["id"].as_i64().unwrap();
    assert_ne!(new_id, doc_id);
    assert_eq!(replacement["data"]["status"], "pending");

    let docs = get_json(&app, "/api/documents", &key).await;
    let of_type: Vec<_> = docs["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|d| d["document_type"].as_i64() == Some(types[0]))
        .collect();
    assert_eq!(of_type.len(), 1);
    assert_eq!(of_type[0]["original_filename"], "cert-v2.pdf");

    let body = get_json(&app, "/api/progress", &key).await;
    assert_eq!(body["data"]["current_stage"], "admin_review");
}

#[tokio::test]
async fn test_full_approval_completes_onboarding() {
    let app = spawn_app().await;
    let key = register(&app, "complete@example.com", "complete").await;
    put_complete_details(&app, &key).await;

    let types = required_type_ids(&app, &key).await;
    assert_eq!(types.len(), 9);

    let mut previous_percentage = 0;
    for type_id in &types {
        let uploaded =
            upload_document(&app, &key, *type_id, "cert.pdf", Some(&future_date(365))).await;
        let doc_id = uploaded["data"]["id"].as_i64().unwrap();
        review_document(&app, doc_id, "approved").await;

        // Approving one more required document never decreases progress.
        let body = get_json(&app, "/api/progress", &key).await;
        let percentage = body["data"]["completion_percentage"].as_i64().unwrap();
        assert!(percentage >= previous_percentage);
        previous_percentage = percentage;
    }

    let body = get_json(&app, "/api/progress", &key).await;
    assert_eq!(body["data"]["current_stage"], "completed");
    assert_eq!(body["data"]["completion_percentage"], 100);
    let completed_at = body["data"]["completed_at"].as_str().unwrap().to_string();
    assert!(body["data"]["admin_approved_at"].is_string());

    // completed_at is stamped once and survives recomputation.
    let body = get_json(&app, "/api/progress", &key).await;
    assert_eq!(body["data"]["completed_at"].as_str().unwrap(), completed_at);
}

#[tokio::test]
async fn test_dashboard_missing_documents() {
    let app = spawn_app().await;
    let key = register(&app, "dash@example.com", "dash").await;

    let body = get_json(&app, "/api/dashboard", &key).await;
    assert!(body["data"]["personal_details"].is_null());
    let missing = body["data"]["missing_documents"].as_array().unwrap();
    assert_eq!(missing.len(), 9);
    assert!(missing.iter().any(|m| m == "police_check"));

    put_complete_details(&app, &key).await;
    let types = required_type_ids(&app, &key).await;
    upload_document(&app, &key, types[0], "cert.pdf", Some(&future_date(365))).await;

    let body = get_json(&app, "/api/dashboard", &key).await;
    assert!(body["data"]["personal_details"]["is_complete"].as_bool().unwrap());
    let missing = body["data"]["missing_documents"].as_array().unwrap();
    assert_eq!(missing.len(), 8);
}

#[tokio::test]
async fn test_expired_upload_is_classified_on_save() {
    let app = spawn_app().await;
    let key = register(&app, "expired@example.com", "expired").await;
    put_complete_details(&app, &key).await;

    let types = required_type_ids(&app, &key).await;
    let uploaded = upload_document(&app, &key, types[0], "cert.pdf", Some(&past_date(1))).await;

    assert_eq!(uploaded["data"]["status"], "expired");
    assert_eq!(uploaded["data"]["is_expired"], true);
    // Expiring-soon overlaps expired; both report true here.
    assert_eq!(uploaded["data"]["is_expiring_soon"], true);

    // An expired required document is neither pending nor rejected nor
    // approved: the user is sent back to documents_upload.
    let body = get_json(&app, "/api/progress", &key).await;
    assert_eq!(body["data"]["current_stage"], "documents_upload");
}

#[tokio::test]
async fn test_approval_inside_warning_window_becomes_expiring_soon() {
    let app = spawn_app().await;
    let key = register(&app, "soon@example.com", "soon").await;
    put_complete_details(&app, &key).await;

    let types = required_type_ids(&app, &key).await;
    let uploaded = upload_document(&app, &key, types[0], "cert.pdf", Some(&future_date(10))).await;
    let doc_id = uploaded["data"]["id"].as_i64().unwrap();

    // Pending uploads are never auto-overwritten to expiring_soon.
    assert_eq!(uploaded["data"]["status"], "pending");

    let reviewed = review_document(&app, doc_id, "approved").await;
    assert_eq!(reviewed["data"]["status"], "expiring_soon");

    let body = get_json(&app, "/api/admin/documents/expiring", ADMIN_API_KEY).await;
    let ids: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_i64().unwrap())
        .collect();
    assert!(ids.contains(&doc_id));
}

#[tokio::test]
async fn test_upload_validation_rules() {
    let app = spawn_app().await;
    let key = register(&app, "invalid@example.com", "invalid").await;
    put_complete_details(&app, &key).await;

    let types = required_type_ids(&app, &key).await;

    // Wrong extension for the type.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/documents/upload")
                .header("X-Api-Key", &key)
                .header(
                    "Content-Type",
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(multipart_body(types[0], "cert.exe", None)))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown document type.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/documents/upload")
                .header("X-Api-Key", &key)
                .header(
                    "Content-Type",
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(multipart_body(9999, "cert.pdf", None)))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_document_recomputes_progress() {
    let app = spawn_app().await;
    let key = register(&app, "delete@example.com", "delete").await;
    put_complete_details(&app, &key).await;

    let types = required_type_ids(&app, &key).await;
    let uploaded = upload_document(&app, &key, types[0], "cert.pdf", Some(&future_date(365))).await;
    let doc_id = uploaded["data"]["id"].as_i64().unwrap();

    let body = get_json(&app, "/api/progress", &key).await;
    assert_eq!(body["data"]["current_stage"], "admin_review");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/documents/{doc_id}"))
                .header("X-Api-Key", &key)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = get_json(&app, "/api/progress", &key).await;
    assert_eq!(body["data"]["current_stage"], "documents_upload");
}

#[tokio::test]
async fn test_users_cannot_touch_each_others_documents() {
    let app = spawn_app().await;
    let key_a = register(&app, "owner@example.com", "owner").await;
    let key_b = register(&app, "intruder@example.com", "intruder").await;
    put_complete_details(&app, &key_a).await;

    let types = required_type_ids(&app, &key_a).await;
    let uploaded =
        upload_document(&app, &key_a, types[0], "cert.pdf", Some(&future_date(365))).await;
    let doc_id = uploaded["data"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/documents/{doc_id}"))
                .header("X-Api-Key", &key_b)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/documents/{doc_id}/file"))
                .header("X-Api-Key", &key_b)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_onboarding_listing_and_detail() {
    let app = spawn_app().await;
    let key = register(&app, "listed@example.com", "listed").await;
    put_complete_details(&app, &key).await;

    let body = get_json(&app, "/api/admin/onboarding", ADMIN_API_KEY).await;
    let rows = body["data"].as_array().unwrap();
    let row = rows
        .iter()
        .find(|r| r["user_email"] == "listed@example.com")
        .expect("registered user appears in admin listing");
    assert_eq!(row["current_stage"], "documents_upload");

    let filtered = get_json(
        &app,
        "/api/admin/onboarding?stage=documents_upload",
        ADMIN_API_KEY,
    )
    .await;
    assert!(
        filtered["data"]
            .as_array()
            .unwrap()
            .iter()
            .all(|r| r["current_stage"] == "documents_upload")
    );

    let user_id = row["user_id"].as_i64().unwrap();
    let detail = get_json(
        &app,
        &format!("/api/admin/users/{user_id}/onboarding"),
        ADMIN_API_KEY,
    )
    .await;
    assert_eq!(detail["data"]["progress"]["current_stage"], "documents_upload");
}

#[tokio::test]
async fn test_document_download_round_trip() {
    let app = spawn_app().await;
    let key = register(&app, "download@example.com", "download").await;
    put_complete_details(&app, &key).await;

    let types = required_type_ids(&app, &key).await;
    let uploaded = upload_document(&app, &key, types[0], "cert.pdf", Some(&future_date(365))).await;
    let doc_id = uploaded["data"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/documents/{doc_id}/file"))
                .header("X-Api-Key", &key)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        mime::APPLICATION_PDF.as_ref()
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"%PDF-1.4 fake certificate contents");
}
