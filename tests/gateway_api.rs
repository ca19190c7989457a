//! Black-box tests against the assembled router: authorization gates,
//! self-scoping, payment intent creation, and the booking flow.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use labbooker::auth::TokenService;
use labbooker::gateway::build_router;
use labbooker::gateway::state::AppState;
use labbooker::payments::{IntentParams, PaymentError, PaymentGateway, PaymentIntent};
use labbooker::store::memory::MemStore;
use labbooker::store::{BookingStore, NewUser, TestSpec};

const SECRET: &str = "gateway-test-secret";

/// Records every intent-creation call so tests can assert on the exact
/// parameters sent to the processor.
#[derive(Default)]
struct RecordingGateway {
    created: Mutex<Vec<IntentParams>>,
}

#[async_trait]
impl PaymentGateway for RecordingGateway {
    async fn create_intent(&self, params: IntentParams) -> Result<PaymentIntent, PaymentError> {
        let amount = params.amount_minor;
        self.created.lock().unwrap().push(params);
        Ok(PaymentIntent {
            id: "pi_test".into(),
            client_secret: Some("pi_test_secret".into()),
            status: "requires_payment_method".into(),
            amount,
            currency: "usd".into(),
        })
    }

    async fn retrieve_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError> {
        Ok(PaymentIntent {
            id: id.to_string(),
            client_secret: None,
            status: "succeeded".into(),
            amount: 5000,
            currency: "usd".into(),
        })
    }
}

struct Harness {
    app: Router,
    store: Arc<MemStore>,
    tokens: TokenService,
    gateway: Arc<RecordingGateway>,
}

fn harness() -> Harness {
    let store = Arc::new(MemStore::new());
    let gateway = Arc::new(RecordingGateway::default());
    let tokens = TokenService::new(SECRET.to_string());
    let state = Arc::new(AppState::new(
        store.clone(),
        tokens.clone(),
        gateway.clone(),
    ));
    Harness {
        app: build_router(state),
        store,
        tokens,
        gateway,
    }
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
    }
    builder.body(Body::empty()).unwrap()
}

fn send_json(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 64).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn seed_user(store: &MemStore, email: &str, admin: bool) -> String {
    let user = store
        .upsert_user(NewUser {
            email: email.into(),
            name: None,
        })
        .await
        .unwrap();
    if admin {
        store.promote_user(&user.id).await.unwrap();
    }
    user.id
}

fn blood_panel(slots: i64) -> TestSpec {
    TestSpec {
        title: "Blood Panel".into(),
        price: 50.0,
        slots_count: slots,
        image: None,
        date: None,
        short_description: None,
    }
}

#[tokio::test]
async fn jwt_endpoint_issues_verifiable_token() {
    let h = harness();
    let resp = h
        .app
        .clone()
        .oneshot(send_json("POST", "/jwt", None, json!({"email": "a@x.com"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    let token = body["data"]["token"].as_str().unwrap();
    assert_eq!(h.tokens.verify(token).unwrap().email, "a@x.com");
}

#[tokio::test]
async fn jwt_endpoint_requires_email() {
    let h = harness();
    let resp = h
        .app
        .oneshot(send_json("POST", "/jwt", None, json!({"name": "no email"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn protected_route_without_token_is_401() {
    let h = harness();
    let resp = h.app.oneshot(get("/users", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_route_with_garbage_token_is_401() {
    let h = harness();
    let resp = h
        .app
        .oneshot(get("/users", Some("not.a.token")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn self_scope_rejects_other_subjects() {
    let h = harness();
    seed_user(&h.store, "b@x.com", false).await;
    let token = h.tokens.issue("a@x.com").unwrap();

    let resp = h
        .app
        .clone()
        .oneshot(get("/loggedUser/b@x.com", Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = h
        .app
        .oneshot(get("/testResults/b@x.com", Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn self_scope_allows_own_records() {
    let h = harness();
    seed_user(&h.store, "a@x.com", false).await;
    let token = h.tokens.issue("a@x.com").unwrap();

    let resp = h
        .app
        .oneshot(get("/loggedUser/a@x.com", Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["email"], "a@x.com");
}

#[tokio::test]
async fn admin_route_rejects_authenticated_non_admin() {
    let h = harness();
    seed_user(&h.store, "a@x.com", false).await;
    let token = h.tokens.issue("a@x.com").unwrap();

    let resp = h.app.oneshot(get("/users", Some(&token))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_route_allows_admin() {
    let h = harness();
    seed_user(&h.store, "root@x.com", true).await;
    let token = h.tokens.issue("root@x.com").unwrap();

    let resp = h.app.oneshot(get("/users", Some(&token))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn promotion_round_trip_is_reported_by_admin_check() {
    let h = harness();
    seed_user(&h.store, "root@x.com", true).await;
    let target_id = seed_user(&h.store, "a@x.com", false).await;

    let admin_token = h.tokens.issue("root@x.com").unwrap();
    let resp = h
        .app
        .clone()
        .oneshot(send_json(
            "PATCH",
            &format!("/users/admin/{}", target_id),
            Some(&admin_token),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let target_token = h.tokens.issue("a@x.com").unwrap();
    let resp = h
        .app
        .oneshot(get("/users/admin/a@x.com", Some(&target_token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["admin"], true);
}

#[tokio::test]
async fn promotion_requires_admin() {
    let h = harness();
    let target_id = seed_user(&h.store, "a@x.com", false).await;
    let token = h.tokens.issue("a@x.com").unwrap();

    let resp = h
        .app
        .oneshot(send_json(
            "PATCH",
            &format!("/users/admin/{}", target_id),
            Some(&token),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn payment_intent_converts_price_to_minor_units() {
    let h = harness();
    let resp = h
        .app
        .oneshot(send_json(
            "POST",
            "/create-payment-intent",
            None,
            json!({"price": 50}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["clientSecret"], "pi_test_secret");

    let created = h.gateway.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].amount_minor, 5000);
    assert_eq!(created[0].currency, "usd");
    assert_eq!(created[0].payment_method, "card");
}

#[tokio::test]
async fn payment_intent_rejects_non_positive_price() {
    let h = harness();
    for price in [json!(0), json!(-5.0)] {
        let resp = h
            .app
            .clone()
            .oneshot(send_json(
                "POST",
                "/create-payment-intent",
                None,
                json!({"price": price}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
    // The processor was never contacted.
    assert!(h.gateway.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn booking_flow_sells_out_at_zero_slots() {
    let h = harness();
    h.store.insert_test(blood_panel(1)).await.unwrap();

    let booking = json!({"email": "a@x.com", "testName": "Blood Panel", "amount": 50.0});

    let resp = h
        .app
        .clone()
        .oneshot(send_json("POST", "/booked-tests", None, booking.clone()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = h
        .app
        .clone()
        .oneshot(send_json("POST", "/booked-tests", None, booking))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Slot count is observable through the public catalog.
    let resp = h.app.oneshot(get("/tests", None)).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["data"][0]["slots_count"], 0);
}

#[tokio::test]
async fn booking_unknown_test_is_404() {
    let h = harness();
    let resp = h
        .app
        .oneshot(send_json(
            "POST",
            "/booked-tests",
            None,
            json!({"email": "a@x.com", "testName": "No Such Test", "amount": 50.0}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cancel_booking_requires_authentication() {
    let h = harness();
    h.store.insert_test(blood_panel(1)).await.unwrap();
    h.app
        .clone()
        .oneshot(send_json(
            "POST",
            "/booked-tests",
            None,
            json!({"email": "a@x.com", "testName": "Blood Panel", "amount": 50.0}),
        ))
        .await
        .unwrap();
    let booking_id = h.store.list_bookings().await.unwrap()[0].id.clone();

    let resp = h
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/bookedTests/{}", booking_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let token = h.tokens.issue("a@x.com").unwrap();
    let resp = h
        .app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/bookedTests/{}", booking_id))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(h.store.list_bookings().await.unwrap().is_empty());
}

#[tokio::test]
async fn reservations_listing_is_admin_only() {
    let h = harness();
    seed_user(&h.store, "a@x.com", false).await;
    let token = h.tokens.issue("a@x.com").unwrap();

    let resp = h
        .app
        .clone()
        .oneshot(get("/reservations", Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_manages_catalog_and_banners() {
    let h = harness();
    seed_user(&h.store, "root@x.com", true).await;
    let token = h.tokens.issue("root@x.com").unwrap();

    let resp = h
        .app
        .clone()
        .oneshot(send_json(
            "POST",
            "/tests",
            Some(&token),
            json!({"title": "X-Ray", "price": 30.0, "slots_count": 5}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let test_id = body_json(resp).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let resp = h
        .app
        .clone()
        .oneshot(send_json(
            "PUT",
            &format!("/tests/{}", test_id),
            Some(&token),
            json!({"title": "X-Ray", "price": 35.0, "slots_count": 4}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = h
        .app
        .clone()
        .oneshot(send_json(
            "POST",
            "/banners",
            Some(&token),
            json!({"headline": "20% off"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Banners are publicly listable.
    let resp = h.app.oneshot(get("/banners", None)).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["data"][0]["payload"]["headline"], "20% off");
}

#[tokio::test]
async fn catalog_mutation_requires_admin() {
    let h = harness();
    seed_user(&h.store, "a@x.com", false).await;
    let token = h.tokens.issue("a@x.com").unwrap();

    let resp = h
        .app
        .oneshot(send_json(
            "POST",
            "/tests",
            Some(&token),
            json!({"title": "X-Ray", "price": 30.0, "slots_count": 5}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
