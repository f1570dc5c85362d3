use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use reqwest::StatusCode;
use serde_json::{Value, json};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = ecocrop_api::app::build_app("test-secret".to_string()).await;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn register(
    client: &reqwest::Client,
    base_url: &str,
    email: &str,
    name: &str,
    password: &str,
) -> (String, Value) {
    let res = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({ "email": email, "name": name, "password": password }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = res.json().await.unwrap();
    let token = body["token"].as_str().unwrap().to_string();
    (token, body["user"].clone())
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;

    let res = reqwest::Client::new()
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for path in ["/api/auth/me", "/api/analysis/history", "/api/whoami"] {
        let res = client
            .get(format!("{}{path}", srv.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{path}");
    }

    // Garbage token is just as unauthorized as no token.
    let res = client
        .get(format!("{}/api/auth/me", srv.base_url))
        .bearer_auth("not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_login_me_flow() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (token, user) = register(
        &client,
        &srv.base_url,
        "farmer@ecocrop.ai",
        "Test Farmer",
        "plantsarecool",
    )
    .await;
    assert_eq!(user["email"], "farmer@ecocrop.ai");

    // Fresh login issues a working token.
    let res = client
        .post(format!("{}/api/auth/login", srv.base_url))
        .json(&json!({ "email": "farmer@ecocrop.ai", "password": "plantsarecool" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let login_token = body["token"].as_str().unwrap();

    for t in [token.as_str(), login_token] {
        let res = client
            .get(format!("{}/api/auth/me", srv.base_url))
            .bearer_auth(t)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let me: Value = res.json().await.unwrap();
        assert_eq!(me["email"], "farmer@ecocrop.ai");
        assert_eq!(me["name"], "Test Farmer");
    }
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    register(
        &client,
        &srv.base_url,
        "farmer@ecocrop.ai",
        "First",
        "plantsarecool",
    )
    .await;

    // Same email, different case: still taken.
    let res = client
        .post(format!("{}/api/auth/register", srv.base_url))
        .json(&json!({ "email": "Farmer@EcoCrop.AI", "name": "Second", "password": "plantsarecool" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn bad_registrations_are_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for (email, name, password) in [
        ("not-an-email", "Farmer", "plantsarecool"),
        ("farmer@ecocrop.ai", "", "plantsarecool"),
        ("farmer@ecocrop.ai", "Farmer", "short"),
    ] {
        let res = client
            .post(format!("{}/api/auth/register", srv.base_url))
            .json(&json!({ "email": email, "name": name, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{email} / {name}");
    }
}

#[tokio::test]
async fn invalid_login_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    register(
        &client,
        &srv.base_url,
        "farmer@ecocrop.ai",
        "Farmer",
        "plantsarecool",
    )
    .await;

    // Wrong password and unknown email look identical from outside.
    for (email, password) in [
        ("farmer@ecocrop.ai", "wrongpassword"),
        ("nobody@ecocrop.ai", "plantsarecool"),
    ] {
        let res = client
            .post(format!("{}/api/auth/login", srv.base_url))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["message"], "invalid email or password");
    }
}

#[tokio::test]
async fn analysis_lifecycle_create_history_detail() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let (token, _) = register(
        &client,
        &srv.base_url,
        "farmer@ecocrop.ai",
        "Farmer",
        "plantsarecool",
    )
    .await;

    // Create
    let res = client
        .post(format!("{}/api/analysis", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "crop_name": "Tomato",
            "growth_stage": "Flowering",
            "symptoms": "Yellowing leaves with brown spots",
            "soil_moisture_pct": 45.0,
            "temperature_c": 25.5,
            "humidity_pct": 70.0,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["crop_name"], "Tomato");
    assert!(!created["diagnosis"].as_str().unwrap().is_empty());
    assert!(created["risk_level"].is_string());

    // History contains it, newest first.
    let res = client
        .get(format!("{}/api/analysis/history", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let history: Value = res.json().await.unwrap();
    let items = history["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], id.as_str());

    // Detail round-trips.
    let res = client
        .get(format!("{}/api/analysis/{id}", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let detail: Value = res.json().await.unwrap();
    assert_eq!(detail["symptoms"], "Yellowing leaves with brown spots");
}

#[tokio::test]
async fn analysis_accepts_photo_and_keeps_it_off_the_wire() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let (token, _) = register(
        &client,
        &srv.base_url,
        "farmer@ecocrop.ai",
        "Farmer",
        "plantsarecool",
    )
    .await;

    let res = client
        .post(format!("{}/api/analysis", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "crop_name": "Wheat",
            "growth_stage": "Vegetative",
            "symptoms": "Rust-colored spots on leaves",
            "photo_base64": B64.encode(b"fake jpeg bytes"),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    assert!(created.get("photo_base64").is_none());

    // Garbage base64 is a validation error, not a 500.
    let res = client
        .post(format!("{}/api/analysis", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "crop_name": "Wheat",
            "growth_stage": "Vegetative",
            "symptoms": "Rust-colored spots on leaves",
            "photo_base64": "!!not base64!!",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn blank_symptoms_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let (token, _) = register(
        &client,
        &srv.base_url,
        "farmer@ecocrop.ai",
        "Farmer",
        "plantsarecool",
    )
    .await;

    let res = client
        .post(format!("{}/api/analysis", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "crop_name": "Tomato",
            "growth_stage": "Flowering",
            "symptoms": "   ",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_and_malformed_analysis_ids() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let (token, _) = register(
        &client,
        &srv.base_url,
        "farmer@ecocrop.ai",
        "Farmer",
        "plantsarecool",
    )
    .await;

    let res = client
        .get(format!(
            "{}/api/analysis/00000000-0000-7000-8000-000000000000",
            srv.base_url
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{}/api/analysis/nonexistent-analysis-id", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analyses_are_isolated_between_users() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (token_a, _) = register(
        &client,
        &srv.base_url,
        "alice@ecocrop.ai",
        "Alice",
        "plantsarecool",
    )
    .await;
    let (token_b, _) = register(
        &client,
        &srv.base_url,
        "bob@ecocrop.ai",
        "Bob",
        "plantsarecool",
    )
    .await;

    let res = client
        .post(format!("{}/api/analysis", srv.base_url))
        .bearer_auth(&token_a)
        .json(&json!({
            "crop_name": "Maize",
            "growth_stage": "Seedling",
            "symptoms": "holes chewed through young leaves",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    // Bob can't see Alice's record, by id or in history.
    let res = client
        .get(format!("{}/api/analysis/{id}", srv.base_url))
        .bearer_auth(&token_b)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{}/api/analysis/history", srv.base_url))
        .bearer_auth(&token_b)
        .send()
        .await
        .unwrap();
    let history: Value = res.json().await.unwrap();
    assert!(history["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn soil_recommendation_follows_rule_table() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let (token, _) = register(
        &client,
        &srv.base_url,
        "farmer@ecocrop.ai",
        "Farmer",
        "plantsarecool",
    )
    .await;

    let res = client
        .post(format!("{}/api/recommend/soil", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "soil": "Clay", "rainfall_mm": 1200.0, "temperature_c": 26.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["crop"], "rice");

    let res = client
        .post(format!("{}/api/recommend/soil", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "soil": "peat", "rainfall_mm": 500.0, "temperature_c": 26.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn field_recommendation_ranks_and_advises() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let (token, _) = register(
        &client,
        &srv.base_url,
        "farmer@ecocrop.ai",
        "Farmer",
        "plantsarecool",
    )
    .await;

    let res = client
        .post(format!("{}/api/recommend/field", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "nitrogen": 85.0,
            "phosphorus": 45.0,
            "potassium": 40.0,
            "temperature_c": 24.0,
            "humidity_pct": 82.0,
            "ph": 6.0,
            "rainfall_mm": 220.0,
            "soil_moisture_pct": 18.0,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();

    let rankings = body["rankings"].as_array().unwrap();
    assert_eq!(rankings.len(), 5);
    assert_eq!(rankings[0]["crop"], "rice");

    // Low moisture should come back with an irrigate action.
    assert_eq!(body["irrigation"]["action"], "irrigate");

    // Without moisture there is no irrigation block.
    let res = client
        .post(format!("{}/api/recommend/field", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "nitrogen": 85.0,
            "phosphorus": 45.0,
            "potassium": 40.0,
            "temperature_c": 24.0,
            "humidity_pct": 82.0,
            "ph": 6.0,
            "rainfall_mm": 220.0,
        }))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert!(body["irrigation"].is_null());

    // Invalid reading is rejected.
    let res = client
        .post(format!("{}/api/recommend/field", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "nitrogen": 85.0,
            "phosphorus": 45.0,
            "potassium": 40.0,
            "temperature_c": 24.0,
            "humidity_pct": 82.0,
            "ph": 99.0,
            "rainfall_mm": 220.0,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
