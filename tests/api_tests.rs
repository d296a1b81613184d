use jsonwebtoken::{EncodingKey, Header, encode};
use portfolio_backend::{
    AppConfig, AppState, InMemoryRepository, MockStorageService, auth::Claims, create_router,
    repository::RepositoryState, storage::StorageState,
};
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::{sync::Arc, time::SystemTime};
use tokio::net::TcpListener;

pub struct TestApp {
    pub address: String,
    pub config: AppConfig,
    pub client: reqwest::Client,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    fn admin_token(&self) -> String {
        token(&self.config.jwt_secret, true)
    }

    fn user_token(&self) -> String {
        token(&self.config.jwt_secret, false)
    }

    async fn post_as_admin(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(self.admin_token())
            .json(&body)
            .send()
            .await
            .expect("req fail")
    }

    async fn get_json(&self, path: &str) -> (StatusCode, Value) {
        let response = self.client.get(self.url(path)).send().await.expect("req fail");
        let status = response.status();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        (status, body)
    }
}

fn token(secret: &str, is_staff: bool) -> String {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;
    let claims = Claims {
        sub: "42".to_string(),
        exp: now + 3600,
        iat: now,
        is_staff,
    };
    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

async fn spawn_app() -> TestApp {
    let config = AppConfig::default();
    let repo = Arc::new(InMemoryRepository::new()) as RepositoryState;
    let storage = Arc::new(MockStorageService::new()) as StorageState;

    let router = create_router(AppState {
        repo,
        storage,
        config: config.clone(),
    });

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp {
        address,
        config,
        client: reqwest::Client::new(),
    }
}

fn project(title: &str, featured: bool, order: i32) -> Value {
    json!({
        "title": title,
        "description": "A portfolio piece",
        "featured": featured,
        "order": order,
    })
}

fn titles(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("list body is an array")
        .iter()
        .map(|item| item["title"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;
    let response = app
        .client
        .get(app.url("/health"))
        .send()
        .await
        .expect("req fail");
    assert!(response.status().is_success());
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_lists_start_empty_and_are_public() {
    let app = spawn_app().await;
    for path in [
        "/api/projects",
        "/api/testimonials",
        "/api/services",
        "/api/home-stats",
        "/api/content",
        "/api/contact-info",
    ] {
        let (status, body) = app.get_json(path).await;
        assert_eq!(status, StatusCode::OK, "{path}");
        assert_eq!(body, json!([]), "{path}");
    }
}

#[tokio::test]
async fn test_project_lifecycle() {
    let app = spawn_app().await;

    // 1. Create
    let response = app
        .post_as_admin(
            "/api/projects",
            json!({
                "title": "Brand Refresh",
                "description": "Identity work",
                "image_url_fallback": "https://cdn.example.com/brand.png",
                "tags": ["branding", "design"],
                "featured": true,
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await.unwrap();
    let id = created["id"].as_str().expect("id is a string").to_string();
    assert_eq!(created["imageUrl"], "https://cdn.example.com/brand.png");
    assert_eq!(created["tags"], json!(["branding", "design"]));
    assert_eq!(created["order"], 0);
    assert!(created.get("created_at").is_some());

    // 2. Retrieve
    let (status, fetched) = app.get_json(&format!("/api/projects/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Brand Refresh");

    // 3. Patch keeps untouched fields
    let response = app
        .client
        .patch(app.url(&format!("/api/projects/{id}")))
        .bearer_auth(app.admin_token())
        .json(&json!({ "order": 4 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let patched: Value = response.json().await.unwrap();
    assert_eq!(patched["order"], 4);
    assert_eq!(patched["title"], "Brand Refresh");
    assert_eq!(patched["featured"], true);

    // 4. Put replaces required fields
    let response = app
        .client
        .put(app.url(&format!("/api/projects/{id}")))
        .bearer_auth(app.admin_token())
        .json(&json!({ "title": "Renamed", "description": "New copy" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let replaced: Value = response.json().await.unwrap();
    assert_eq!(replaced["title"], "Renamed");
    assert_eq!(replaced["featured"], false);
    assert_eq!(
        replaced["image_url_fallback"],
        "https://cdn.example.com/brand.png"
    );

    // 5. Delete
    let response = app
        .client
        .delete(app.url(&format!("/api/projects/{id}")))
        .bearer_auth(app.admin_token())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, body) = app.get_json(&format!("/api/projects/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_writes_require_staff() {
    let app = spawn_app().await;

    let anonymous = app
        .client
        .post(app.url("/api/services"))
        .json(&json!({ "title": "Web", "description": "Sites", "icon": "code" }))
        .send()
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let non_staff = app
        .client
        .post(app.url("/api/services"))
        .bearer_auth(app.user_token())
        .json(&json!({ "title": "Web", "description": "Sites", "icon": "code" }))
        .send()
        .await
        .unwrap();
    assert_eq!(non_staff.status(), StatusCode::FORBIDDEN);
    let body: Value = non_staff.json().await.unwrap();
    assert_eq!(
        body["detail"],
        "You do not have permission to perform this action."
    );

    let (_, services) = app.get_json("/api/services").await;
    assert_eq!(services, json!([]));
}

#[tokio::test]
async fn test_auth_is_checked_before_the_body() {
    let app = spawn_app().await;
    let response = app
        .client
        .post(app.url("/api/projects"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_project_filters() {
    let app = spawn_app().await;
    app.post_as_admin("/api/projects", project("C", true, 2)).await;
    app.post_as_admin("/api/projects", project("A", false, 0)).await;
    app.post_as_admin("/api/projects", project("B", true, 1)).await;
    app.post_as_admin("/api/projects", project("D", true, 1)).await;

    let (_, all) = app.get_json("/api/projects").await;
    assert_eq!(titles(&all), ["A", "B", "D", "C"]);

    let (_, featured) = app.get_json("/api/projects?featured=true").await;
    assert_eq!(titles(&featured), ["B", "D", "C"]);

    let (_, limited) = app.get_json("/api/projects?featured=true&limit=2").await;
    assert_eq!(titles(&limited), ["B", "D"]);

    // Anything but the exact string "true" disables the filter.
    let (_, not_filtered) = app.get_json("/api/projects?featured=1").await;
    assert_eq!(not_filtered.as_array().unwrap().len(), 4);

    // Malformed limits are ignored; zero yields nothing.
    let (status, bad_limit) = app.get_json("/api/projects?limit=abc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bad_limit.as_array().unwrap().len(), 4);
    let (_, zero) = app.get_json("/api/projects?limit=0").await;
    assert_eq!(zero, json!([]));
}

#[tokio::test]
async fn test_repeated_query_keys_use_the_last_value() {
    let app = spawn_app().await;
    app.post_as_admin("/api/projects", project("A", false, 0)).await;
    app.post_as_admin("/api/projects", project("B", true, 1)).await;
    app.post_as_admin(
        "/api/content",
        json!({ "section": "hero", "title": "Welcome", "content": "Hello" }),
    )
    .await;
    app.post_as_admin(
        "/api/content",
        json!({ "section": "about", "title": "About", "content": "Us" }),
    )
    .await;

    let (status, limited) = app.get_json("/api/projects?limit=x&limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&limited), ["A"]);

    let (status, unlimited) = app.get_json("/api/projects?limit=1&limit=x").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&unlimited), ["A", "B"]);

    let (status, all) = app
        .get_json("/api/projects?featured=true&featured=false")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&all), ["A", "B"]);

    let (status, testimonials) = app
        .get_json("/api/testimonials?featured=false&featured=true")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(testimonials, json!([]));

    let (status, about) = app.get_json("/api/content?section=hero&section=about").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&about), ["About"]);
}

#[tokio::test]
async fn test_testimonial_featured_filter_and_defaults() {
    let app = spawn_app().await;
    let response = app
        .post_as_admin(
            "/api/testimonials",
            json!({
                "name": "Ada",
                "role": "CTO",
                "company": "Engines Ltd",
                "content": "Great work",
                "featured": true,
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["rating"], 5);
    assert_eq!(created["imageUrl"], "");

    app.post_as_admin(
        "/api/testimonials",
        json!({ "name": "Bob", "role": "CEO", "company": "B", "content": "Fine" }),
    )
    .await;

    let (_, featured) = app.get_json("/api/testimonials?featured=true").await;
    let names: Vec<&str> = featured
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Ada"]);
}

#[tokio::test]
async fn test_content_section_filter_and_uniqueness() {
    let app = spawn_app().await;
    let hero = json!({ "section": "hero", "title": "Welcome", "content": "Hello" });

    let response = app.post_as_admin("/api/content", hero.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["section"], "hero");
    assert_eq!(created["subtitle"], Value::Null);

    let duplicate = app.post_as_admin("/api/content", hero).await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    app.post_as_admin(
        "/api/content",
        json!({ "section": "about", "title": "About", "content": "Us" }),
    )
    .await;

    let (_, hero_only) = app.get_json("/api/content?section=hero").await;
    assert_eq!(titles(&hero_only), ["Welcome"]);

    let (status, unknown) = app.get_json("/api/content?section=footer").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unknown, json!([]));

    let (_, everything) = app.get_json("/api/content?section=").await;
    assert_eq!(everything.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_content_section_rejects_unknown_section() {
    let app = spawn_app().await;
    let response = app
        .post_as_admin(
            "/api/content",
            json!({ "section": "footer", "title": "x", "content": "y" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_validation_errors_are_reported_per_field() {
    let app = spawn_app().await;
    let response = app
        .post_as_admin(
            "/api/projects",
            json!({ "title": "  ", "description": "ok", "link": "not a url" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["title"].is_array());
    assert!(body["link"].is_array());
    assert!(body.get("description").is_none());

    let (_, projects) = app.get_json("/api/projects").await;
    assert_eq!(projects, json!([]));
}

#[tokio::test]
async fn test_malformed_json_is_a_bad_request() {
    let app = spawn_app().await;
    let response = app
        .client
        .post(app.url("/api/home-stats"))
        .bearer_auth(app.admin_token())
        .header("content-type", "application/json")
        .body("{\"label\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "PARSE_ERROR");
}

#[tokio::test]
async fn test_trailing_slash_is_accepted() {
    let app = spawn_app().await;
    let response = app
        .post_as_admin(
            "/api/home-stats/",
            json!({ "label": "Happy Clients", "value": "30+" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    let (status, _) = app.get_json("/api/home-stats/").await;
    assert_eq!(status, StatusCode::OK);
    let (status, stat) = app.get_json(&format!("/api/home-stats/{id}/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stat["value"], "30+");
}

#[tokio::test]
async fn test_contact_info_uses_camel_case_social_links() {
    let app = spawn_app().await;
    let response = app
        .post_as_admin(
            "/api/contact-info",
            json!({
                "email": "hello@studio.example",
                "phone": "+1 555 0100",
                "address": "1 Main St",
                "socialLinks": { "github": "https://github.com/studio" },
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let (_, list) = app.get_json("/api/contact-info").await;
    let first = &list[0];
    assert_eq!(first["socialLinks"]["github"], "https://github.com/studio");
    assert!(first.get("social_links").is_none());
    assert!(first.get("updated_at").is_some());
}

#[tokio::test]
async fn test_invalid_email_is_rejected() {
    let app = spawn_app().await;
    let response = app
        .post_as_admin(
            "/api/contact-info",
            json!({ "email": "nope", "phone": "1", "address": "x", "socialLinks": {} }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["email"].is_array());
}

#[tokio::test]
async fn test_missing_items_are_not_found_for_every_verb() {
    let app = spawn_app().await;
    let (status, _) = app.get_json("/api/services/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let patch = app
        .client
        .patch(app.url("/api/services/999"))
        .bearer_auth(app.admin_token())
        .json(&json!({ "order": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(patch.status(), StatusCode::NOT_FOUND);

    let delete = app
        .client
        .delete(app.url("/api/services/999"))
        .bearer_auth(app.admin_token())
        .send()
        .await
        .unwrap();
    assert_eq!(delete.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_uploaded_image_resolves_to_public_url() {
    let app = spawn_app().await;
    let response = app
        .post_as_admin(
            "/api/projects",
            json!({
                "title": "With asset",
                "description": "d",
                "image": "projects/cover.png",
                "image_url_fallback": "https://cdn.example.com/fallback.png",
            }),
        )
        .await;
    let created: Value = response.json().await.unwrap();
    assert_eq!(
        created["imageUrl"],
        "http://localhost:9000/mock-bucket/projects/cover.png"
    );
    assert!(created.get("image").is_none());
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let app = spawn_app().await;
    let response = app
        .client
        .get(app.url("/api/services"))
        .header("x-request-id", "trace-me")
        .send()
        .await
        .unwrap();
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("trace-me")
    );
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = spawn_app().await;
    let (status, doc) = app.get_json("/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"].get("/api/projects").is_some());
    assert!(doc["paths"].get("/api/uploads/presigned").is_some());
}
