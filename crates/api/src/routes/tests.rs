//! Router tests driving the full app with in-memory storage.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use crate::db::memory::InMemoryDatabase;
use crate::middleware::{REQUEST_ID_HEADER, SESSION_COOKIE_NAME, create_session_layer};
use crate::models::CreateUserRequest;
use crate::state::AppState;

const ADMIN_EMAIL: &str = "admin@example.com";
const CLERK_EMAIL: &str = "clerk@example.com";
const PASSWORD: &str = "correct horse";

struct TestApp {
    router: Router,
    db: Arc<InMemoryDatabase>,
}

struct Reply {
    status: StatusCode,
    cookie: Option<String>,
    request_id: Option<String>,
    body: Value,
}

impl TestApp {
    async fn new() -> Self {
        let db = Arc::new(InMemoryDatabase::new());
        let state = AppState::from_repositories(db.clone(), db.clone(), db.clone());

        for (email, is_admin) in [(ADMIN_EMAIL, true), (CLERK_EMAIL, false)] {
            state
                .users()
                .create(CreateUserRequest {
                    name: "Test Account".into(),
                    email: email.into(),
                    password: PASSWORD.into(),
                    is_admin,
                })
                .await
                .unwrap();
        }

        let router = crate::app(state, create_session_layer(MemoryStore::default(), false));
        Self { router, db }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Body>,
    ) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        let request = builder.body(body.unwrap_or_else(Body::empty)).unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(String::from);
        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        Reply {
            status,
            cookie,
            request_id,
            body,
        }
    }

    async fn json(&self, method: Method, uri: &str, cookie: Option<&str>, body: Value) -> Reply {
        self.send(method, uri, cookie, Some(Body::from(body.to_string())))
            .await
    }

    async fn login(&self, email: &str) -> String {
        let reply = self
            .json(
                Method::POST,
                "/api/v1/users/login",
                None,
                json!({"email": email, "password": PASSWORD}),
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
        reply.cookie.unwrap()
    }

    async fn create_pf(&self, cookie: &str, email: &str, phone: &str, cpf: &str) -> Reply {
        self.json(
            Method::POST,
            "/api/v1/customers/pf",
            Some(cookie),
            json!({
                "name": "Maria da Silva",
                "email": email,
                "phone": phone,
                "cpf": cpf,
                "birth_date": "1990-05-17",
                "address_type": "home",
                "street": "Avenida Paulista",
                "number": "1000",
                "state": "SP",
                "city": "São Paulo",
                "cep": "01310-100"
            }),
        )
        .await
    }
}

#[tokio::test]
async fn health_is_ok() {
    let app = TestApp::new().await;
    let reply = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, Value::String("ok".into()));
    assert!(reply.request_id.is_some());

    let reply = app.send(Method::GET, "/health/ready", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);

    app.db.set_unavailable(true);
    let reply = app.send(Method::GET, "/health/ready", None, None).await;
    assert_eq!(reply.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn login_sets_session_cookie_and_logout_ends_it() {
    let app = TestApp::new().await;

    let reply = app
        .json(
            Method::POST,
            "/api/v1/users/login",
            None,
            json!({"email": CLERK_EMAIL, "password": PASSWORD}),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, json!({"message": "logged in successfully"}));
    let cookie = reply.cookie.unwrap();
    assert!(cookie.starts_with(&format!("{SESSION_COOKIE_NAME}=")));

    let reply = app
        .send(Method::POST, "/api/v1/users/logout", None, None)
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body, json!({"error": "must be logged in"}));

    let reply = app
        .send(Method::POST, "/api/v1/users/logout", Some(&cookie), None)
        .await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = app
        .send(Method::POST, "/api/v1/users/logout", Some(&cookie), None)
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_email_and_wrong_password_are_indistinguishable() {
    let app = TestApp::new().await;

    let unknown = app
        .json(
            Method::POST,
            "/api/v1/users/login",
            None,
            json!({"email": "ghost@example.com", "password": PASSWORD}),
        )
        .await;
    let wrong = app
        .json(
            Method::POST,
            "/api/v1/users/login",
            None,
            json!({"email": ADMIN_EMAIL, "password": "battery staple"}),
        )
        .await;

    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.body, wrong.body);
    assert!(wrong.cookie.is_none());
}

#[tokio::test]
async fn admin_routes_require_login_then_admin() {
    let app = TestApp::new().await;

    let reply = app.send(Method::GET, "/api/v1/customers", None, None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body, json!({"error": "must be logged in"}));

    let clerk = app.login(CLERK_EMAIL).await;
    let reply = app
        .send(Method::GET, "/api/v1/customers", Some(&clerk), None)
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        reply.body,
        json!({"error": "only admins can access this resource"})
    );

    let admin = app.login(ADMIN_EMAIL).await;
    let reply = app
        .send(Method::GET, "/api/v1/customers", Some(&admin), None)
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, json!([]));
}

#[tokio::test]
async fn admin_lookup_failure_is_internal_error() {
    let app = TestApp::new().await;
    let admin = app.login(ADMIN_EMAIL).await;

    app.db.set_unavailable(true);
    let reply = app
        .send(Method::GET, "/api/v1/services", Some(&admin), None)
        .await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.body, json!({"error": "internal server error"}));
}

#[tokio::test]
async fn admin_registers_user_who_can_log_in() {
    let app = TestApp::new().await;
    let admin = app.login(ADMIN_EMAIL).await;

    let body = json!({
        "name": "Joana Prado",
        "email": "joana@example.com",
        "password": "s3cret-pass",
        "role": false
    });
    let reply = app
        .json(Method::POST, "/api/v1/users/register", Some(&admin), body.clone())
        .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    assert!(reply.body["user_id"].is_string());

    let reply = app
        .json(Method::POST, "/api/v1/users/register", Some(&admin), body)
        .await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        reply.body,
        json!({"error": "username or email already exists"})
    );

    let reply = app
        .json(
            Method::POST,
            "/api/v1/users/login",
            None,
            json!({"email": "joana@example.com", "password": "s3cret-pass"}),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn invalid_pf_customer_reports_every_field() {
    let app = TestApp::new().await;
    let admin = app.login(ADMIN_EMAIL).await;

    let reply = app
        .json(
            Method::POST,
            "/api/v1/customers/pf",
            Some(&admin),
            json!({"name": "Jo", "email": "bad", "phone": "123", "cpf": "000", "cep": "1"}),
        )
        .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"], "validation failed");
    for field in ["name", "email", "phone", "cpf", "cep"] {
        assert!(reply.body["fields"][field].is_string(), "missing {field}");
    }
}

#[tokio::test]
async fn malformed_json_is_unprocessable() {
    let app = TestApp::new().await;
    let admin = app.login(ADMIN_EMAIL).await;

    let reply = app
        .send(
            Method::POST,
            "/api/v1/customers/pj",
            Some(&admin),
            Some(Body::from("{not json")),
        )
        .await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(reply.body["error"].is_string());
}

#[tokio::test]
async fn customer_lifecycle() {
    let app = TestApp::new().await;
    let admin = app.login(ADMIN_EMAIL).await;

    let reply = app
        .create_pf(&admin, "maria@example.com", "11987654321", "123.456.789-09")
        .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    let customer_id = reply.body["customer_id"].as_str().unwrap().to_owned();

    let reply = app
        .create_pf(&admin, "maria@example.com", "11911112222", "987.654.321-00")
        .await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        reply.body,
        json!({"error": "cpf, phone or email already exists"})
    );

    let reply = app
        .json(
            Method::POST,
            "/api/v1/customers/address",
            Some(&admin),
            json!({
                "customer_id": customer_id,
                "address_type": "work",
                "street": "Rua Augusta",
                "number": "500",
                "complement": "",
                "state": "SP",
                "city": "São Paulo",
                "cep": "01305000"
            }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    let address_id = reply.body["address_id"].as_i64().unwrap();

    let uri = format!("/api/v1/customers/{customer_id}");
    let reply = app.send(Method::GET, &uri, Some(&admin), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["type"], "PF");
    assert_eq!(reply.body["pf_name"], "Maria da Silva");
    assert_eq!(reply.body["birth_date"], "1990-05-17");
    assert_eq!(reply.body["addresses"].as_array().unwrap().len(), 2);
    assert!(reply.body["addresses"][1]["complement"].is_null());

    let reply = app
        .send(
            Method::DELETE,
            &format!("/api/v1/customers/address/{address_id}"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = app.send(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = app.send(Method::GET, &uri, Some(&admin), None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body, json!({"error": "customer not found"}));
}

#[tokio::test]
async fn bad_customer_id_in_path_is_bad_request() {
    let app = TestApp::new().await;
    let admin = app.login(ADMIN_EMAIL).await;

    let reply = app
        .send(Method::GET, "/api/v1/customers/not-a-uuid", Some(&admin), None)
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body, json!({"error": "invalid customer id"}));
}

#[tokio::test]
async fn finishing_a_service_leaves_payment_alone() {
    let app = TestApp::new().await;
    let admin = app.login(ADMIN_EMAIL).await;

    let reply = app
        .create_pf(&admin, "maria@example.com", "11987654321", "12345678909")
        .await;
    let customer_id = reply.body["customer_id"].as_str().unwrap().to_owned();

    let reply = app
        .json(
            Method::POST,
            "/api/v1/services",
            Some(&admin),
            json!({
                "customer_id": customer_id,
                "type_product": "website",
                "description": "Landing page redesign",
                "total_value": "1500.00",
                "down_payment": 300,
                "is_paid": false,
                "is_finished": false
            }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    let service_id = reply.body["service_id"].as_i64().unwrap();

    let reply = app
        .json(
            Method::PATCH,
            "/api/v1/services/finish",
            Some(&admin),
            json!({"id": service_id, "status": true}),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["is_finished"], true);
    assert_eq!(reply.body["is_paid"], false);

    let reply = app
        .send(
            Method::GET,
            &format!("/api/v1/services/customer/{customer_id}"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body[0]["is_finished"], true);
    assert_eq!(reply.body[0]["is_paid"], false);
    assert_eq!(reply.body[0]["total_value"], "1500.00");

    let reply = app
        .send(
            Method::GET,
            &format!("/api/v1/services/count/{customer_id}"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(reply.body, json!({"count": 1}));

    let reply = app
        .json(
            Method::PATCH,
            "/api/v1/services/payment",
            Some(&admin),
            json!({"id": 9999, "status": true}),
        )
        .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body, json!({"error": "service not found"}));
}

#[tokio::test]
async fn service_for_unknown_customer_is_not_found() {
    let app = TestApp::new().await;
    let admin = app.login(ADMIN_EMAIL).await;

    let reply = app
        .json(
            Method::POST,
            "/api/v1/services",
            Some(&admin),
            json!({
                "customer_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
                "type_product": "website",
                "description": "Landing page redesign",
                "total_value": 10,
                "down_payment": 0
            }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body, json!({"error": "customer not found"}));
}

#[tokio::test]
async fn deleting_a_service_needs_a_valid_id() {
    let app = TestApp::new().await;
    let admin = app.login(ADMIN_EMAIL).await;

    let reply = app
        .send(Method::DELETE, "/api/v1/services", Some(&admin), None)
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body, json!({"error": "missing service id"}));

    let reply = app
        .send(Method::DELETE, "/api/v1/services?id=abc", Some(&admin), None)
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = app
        .send(Method::DELETE, "/api/v1/services?id=41", Some(&admin), None)
        .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_update_without_id_is_rejected() {
    let app = TestApp::new().await;
    let admin = app.login(ADMIN_EMAIL).await;

    let reply = app
        .json(
            Method::PATCH,
            "/api/v1/services/finish",
            Some(&admin),
            json!({"status": true}),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.body["fields"]["id"].is_string());
}

#[tokio::test]
async fn pj_customer_round_trip_and_duplicate_cnpj() {
    let app = TestApp::new().await;
    let admin = app.login(ADMIN_EMAIL).await;

    let pj = |email: &str, phone: &str, cnpj: &str| {
        json!({
            "company_name": "ACME Comércio Ltda",
            "email": email,
            "phone": phone,
            "cnpj": cnpj,
            "address_type": "office",
            "street": "Rua Funchal",
            "number": "418",
            "state": "SP",
            "city": "São Paulo",
            "cep": "04551-060"
        })
    };

    let reply = app
        .json(
            Method::POST,
            "/api/v1/customers/pj",
            Some(&admin),
            pj("contato@acme.com.br", "11933334444", "12.345.678/0001-95"),
        )
        .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    let customer_id = reply.body["customer_id"].as_str().unwrap().to_owned();

    let reply = app
        .send(
            Method::GET,
            &format!("/api/v1/customers/{customer_id}"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["type"], "PJ");
    assert_eq!(reply.body["company_name"], "ACME Comércio Ltda");
    assert_eq!(reply.body["cnpj"], "12345678000195");
    assert!(reply.body.get("cpf").is_none());

    let reply = app
        .json(
            Method::POST,
            "/api/v1/customers/pj",
            Some(&admin),
            pj("financeiro@acme.com.br", "11944445555", "12345678000195"),
        )
        .await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        reply.body,
        json!({"error": "cpf, phone or email already exists"})
    );
}

#[tokio::test]
async fn oversized_fields_are_rejected_before_storage() {
    let app = TestApp::new().await;
    let admin = app.login(ADMIN_EMAIL).await;

    let reply = app
        .json(
            Method::POST,
            "/api/v1/customers/pf",
            Some(&admin),
            json!({
                "name": "Maria da Silva",
                "email": "maria@example.com",
                "phone": "11987654321",
                "cpf": "12345678909",
                "street": "r".repeat(300),
                "city": "São Paulo",
                "cep": "01310-100"
            }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        reply.body["fields"]["street"],
        "must be at most 255 characters"
    );

    let reply = app.send(Method::GET, "/api/v1/customers", Some(&admin), None).await;
    assert_eq!(reply.body, json!([]));
}
