use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use portfolio_backend::{
    AppConfig, AppState, InMemoryRepository, auth::Claims, create_router,
    models::PresignedUrlResponse, storage::MockStorageService,
};
use serde_json::{Value, json};
use std::{sync::Arc, time::SystemTime};
use tower::util::ServiceExt;

fn app(storage: MockStorageService) -> Router {
    create_router(AppState {
        repo: Arc::new(InMemoryRepository::new()),
        storage: Arc::new(storage),
        config: AppConfig::default(),
    })
}

fn admin_token() -> String {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;
    let claims = Claims {
        sub: "1".to_string(),
        exp: now + 600,
        iat: now,
        is_staff: true,
    };
    let key = EncodingKey::from_secret(AppConfig::default().jwt_secret.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

fn presign_request(body: Value, token: Option<String>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/uploads/presigned")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_presigned_upload_success() {
    let response = app(MockStorageService::new())
        .oneshot(presign_request(
            json!({ "filename": "Cover.PNG", "file_type": "image/png", "folder": "projects" }),
            Some(admin_token()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: PresignedUrlResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert!(body.resource_key.starts_with("projects/"));
    assert!(body.resource_key.ends_with(".png"));
    assert!(body.upload_url.contains("signature=fake"));
    assert!(body.upload_url.contains(&body.resource_key));
}

#[tokio::test]
async fn test_presigned_upload_defaults_to_uploads_folder() {
    let response = app(MockStorageService::new())
        .oneshot(presign_request(
            json!({ "filename": "photo.jpg", "file_type": "image/jpeg" }),
            Some(admin_token()),
        ))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert!(body["resource_key"].as_str().unwrap().starts_with("uploads/"));
}

#[tokio::test]
async fn test_presigned_upload_requires_authentication() {
    let response = app(MockStorageService::new())
        .oneshot(presign_request(
            json!({ "filename": "a.png", "file_type": "image/png" }),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_presigned_upload_rejects_non_images() {
    let response = app(MockStorageService::new())
        .oneshot(presign_request(
            json!({ "filename": "movie.mp4", "file_type": "video/mp4" }),
            Some(admin_token()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["file_type"].is_array());
}

#[tokio::test]
async fn test_presigned_upload_storage_failure() {
    let response = app(MockStorageService::new_failing())
        .oneshot(presign_request(
            json!({ "filename": "a.png", "file_type": "image/png" }),
            Some(admin_token()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["code"], "STORAGE_ERROR");
}
