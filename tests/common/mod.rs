//! In-process stand-in for the AmalSAS REST backend.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use actix_web::dev::{Service, ServerHandle};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use amalsas::{ApiClient, ApiClientConfig};
use serde_json::{Value, json};

pub const TOKEN: &str = "tok-123";
pub const ADMIN_TOKEN: &str = "tok-admin";
pub const PASSWORD: &str = "Rahasia1!";

/// A request as seen by the mock
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Default)]
pub struct MockState {
    pub requests: Mutex<Vec<Recorded>>,
    pub bodies: Mutex<Vec<Value>>,
    pub hits: AtomicUsize,
}

impl MockState {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_request(&self, path: &str) -> Option<Recorded> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|r| r.path.ends_with(path))
            .cloned()
    }

    pub fn last_body(&self) -> Option<Value> {
        self.bodies.lock().unwrap().last().cloned()
    }
}

pub struct MockBackend {
    pub base_url: String,
    pub state: web::Data<MockState>,
    handle: ServerHandle,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = web::Data::new(MockState::default());
        let app_state = state.clone();

        let server = HttpServer::new(move || {
            let recorder = app_state.clone();
            App::new()
                .app_data(app_state.clone())
                .wrap_fn(move |req, srv| {
                    recorder.hits.fetch_add(1, Ordering::SeqCst);
                    let header = |name: &str| {
                        req.headers()
                            .get(name)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string)
                    };
                    recorder.requests.lock().unwrap().push(Recorded {
                        method: req.method().to_string(),
                        path: req.path().to_string(),
                        authorization: header("authorization"),
                        content_type: header("content-type"),
                    });
                    srv.call(req)
                })
                .service(
                    web::scope("/api/v1")
                        .route("/signin", web::post().to(signin))
                        .route("/signup", web::post().to(signup))
                        .route("/check-auth", web::get().to(check_auth))
                        .route("/verify-reset-token", web::get().to(verify_reset_token))
                        .route("/campaigns", web::get().to(campaigns))
                        .route("/campaigns/add", web::post().to(create_campaign))
                        .route("/donations", web::post().to(create_donation))
                        .route("/donations/by-user/{id}", web::get().to(my_donations))
                        .route("/users/{id}", web::get().to(get_user))
                        .route("/users/{id}", web::put().to(update_user))
                        .route("/change-image", web::patch().to(change_image)),
                )
        })
        .workers(1)
        .disable_signals()
        .bind("127.0.0.1:0")
        .unwrap();

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        tokio::spawn(server);

        Self {
            base_url: format!("http://{addr}/api/v1"),
            state,
            handle,
        }
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.base_url, ApiClientConfig::default(), None).unwrap()
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}

/// An API root nothing listens on
pub fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/v1")
}

fn ok(data: Value) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "code": 200, "data": data }))
}

fn bearer(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn donor() -> Value {
    json!({
        "id": 7, "name": "Budi Santoso", "username": "budi", "email": "budi@example.com",
        "phone": "+628123456789", "address": "Bandung", "gender": "", "photo": "", "isAdmin": false
    })
}

fn admin() -> Value {
    json!({
        "id": 1, "name": "Siti Admin", "username": "siti", "email": "siti@example.com",
        "phone": "", "address": "", "gender": "", "photo": "", "isAdmin": true
    })
}

async fn signin(body: web::Json<Value>) -> HttpResponse {
    let value = body["value"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    match (value, password) {
        ("budi" | "budi@example.com", PASSWORD) => ok(json!({ "token": TOKEN, "user": donor() })),
        ("siti", PASSWORD) => ok(json!({ "token": ADMIN_TOKEN, "user": admin() })),
        _ => HttpResponse::Unauthorized()
            .json(json!({ "code": 401, "message": "Invalid username/email or password" })),
    }
}

async fn signup(body: web::Json<Value>, state: web::Data<MockState>) -> HttpResponse {
    state.bodies.lock().unwrap().push(body.into_inner());
    HttpResponse::Created().json(json!({
        "success": true,
        "message": "Registration successful!",
        "data": null,
        "timestamp": "2025-01-01T00:00:00Z"
    }))
}

async fn check_auth(req: HttpRequest) -> HttpResponse {
    match bearer(&req).as_deref() {
        Some(TOKEN) => ok(donor()),
        Some(ADMIN_TOKEN) => ok(admin()),
        _ => HttpResponse::Unauthorized().json(json!({ "code": 401, "message": "Unauthorized" })),
    }
}

async fn verify_reset_token(query: web::Query<HashMap<String, String>>) -> HttpResponse {
    if query.get("token").map(String::as_str) == Some("good") {
        ok(json!({ "valid": true }))
    } else {
        HttpResponse::BadRequest().json(json!({ "code": 400, "message": "Invalid or expired token" }))
    }
}

async fn campaigns() -> HttpResponse {
    ok(json!({
        "campaigns": [
            { "id": 1, "title": "Jum'at Berkah", "total_collected": 2500000, "target_total": 10000000, "status": "active" },
            { "id": 2, "title": "Sedekah Air", "total_collected": 12500000, "target_total": 20000000, "status": "ACTIVE" },
            { "id": 3, "title": "Wakaf Qurban", "total_collected": 92714567, "target_total": 100000000, "status": "completed" }
        ],
        "total_campaigns": 3,
        "total_collected": 107714567,
        "total_transactions": 42
    }))
}

async fn create_campaign(req: HttpRequest) -> HttpResponse {
    if bearer(&req).as_deref() != Some(ADMIN_TOKEN) {
        return HttpResponse::Forbidden().json(json!({ "code": 403, "message": "Admin only" }));
    }
    ok(json!({ "id": 10, "title": "Sumur Desa", "status": "active" }))
}

async fn create_donation(req: HttpRequest, body: web::Json<Value>, state: web::Data<MockState>) -> HttpResponse {
    if bearer(&req).is_none() {
        return HttpResponse::Unauthorized().json(json!({ "code": 401, "message": "Unauthorized" }));
    }
    let body = body.into_inner();
    state.bodies.lock().unwrap().push(body.clone());
    HttpResponse::Created().json(json!({
        "code": 201,
        "data": {
            "donation": {
                "id": 99,
                "amount": body["amount"],
                "status": "pending",
                "user_id": body["user_id"],
                "campaign_id": body["campaign_id"],
                "order_id": "ORDER-99"
            },
            "payment_url": "snap-token-1"
        }
    }))
}

async fn my_donations(path: web::Path<i64>) -> HttpResponse {
    if path.into_inner() != 7 {
        return ok(Value::Null);
    }
    ok(json!([
        { "id": 5, "amount": 50000, "status_payment": "paid", "user_id": 7, "campaign_id": 1, "order_id": "ORDER-5" }
    ]))
}

/// `GET /users/{id}` shape: name parts, no combined name
fn donor_record() -> Value {
    json!({
        "id": 7, "first_name": "Budi", "last_name": "Santoso", "username": "budi",
        "email": "budi@example.com", "phone": "+628123456789", "address": "Bandung",
        "gender": "", "photo": "", "isAdmin": false,
        "created_at": "2025-01-01T00:00:00Z", "updated_at": "2025-01-01T00:00:00Z"
    })
}

async fn get_user(req: HttpRequest, path: web::Path<i64>) -> HttpResponse {
    if bearer(&req).is_none() {
        return HttpResponse::Unauthorized().json(json!({ "code": 401, "message": "Unauthorized" }));
    }
    match path.into_inner() {
        7 => ok(donor_record()),
        _ => HttpResponse::NotFound().json(json!({ "code": 404, "message": "User not found" })),
    }
}

/// Binds the body onto the stored record the way the backend does: only
/// known keys are copied, anything else is dropped.
async fn update_user(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<Value>,
    state: web::Data<MockState>,
) -> HttpResponse {
    if bearer(&req).is_none() {
        return HttpResponse::Unauthorized().json(json!({ "code": 401, "message": "Unauthorized" }));
    }
    if path.into_inner() != 7 {
        return HttpResponse::NotFound().json(json!({ "code": 404, "message": "User not found" }));
    }
    let body = body.into_inner();
    state.bodies.lock().unwrap().push(body.clone());

    let mut record = donor_record();
    for key in ["first_name", "last_name", "username", "gender", "phone", "address", "email", "photo"] {
        if let Some(value) = body.get(key) {
            record[key] = value.clone();
        }
    }
    ok(record)
}

async fn change_image(req: HttpRequest) -> HttpResponse {
    if bearer(&req).is_none() {
        return HttpResponse::Unauthorized().json(json!({ "code": 401, "message": "Unauthorized" }));
    }
    let mut user = donor();
    user["photo"] = json!("1700000000-avatar.png");
    ok(user)
}
