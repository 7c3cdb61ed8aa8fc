//! Integration tests for `StripeClient` over `HyperClient`, using wiremock.

use std::time::Duration;

use assert2::{check, let_assert};
use serde_json::json;
use stripe_kit::resources::customers::{CreateCustomer, ListCustomers};
use stripe_kit::{ApiErrorKind, Error, HttpClient, HyperClient, Method, Pagination, Request, StripeClient};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string, header, header_exists, method, path, query_param},
};

fn customer_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "object": "customer",
        "created": 1_700_000_000,
        "email": "jenny@example.com",
        "livemode": false,
        "metadata": {}
    })
}

fn client_for(server: &MockServer) -> StripeClient {
    StripeClient::builder("sk_test_123")
        .base_url(format!("{}/v1", server.uri()))
        .build()
        .expect("client")
}

#[tokio::test]
async fn retrieve_sends_bearer_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/customers/cus_1"))
        .and(header("Authorization", "Bearer sk_test_123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(customer_json("cus_1")))
        .expect(1)
        .mount(&server)
        .await;

    let customer = client_for(&server)
        .customers()
        .retrieve("cus_1", &[])
        .await
        .expect("customer");

    check!(customer.id == "cus_1");
    check!(customer.email.as_deref() == Some("jenny@example.com"));
}

#[tokio::test]
async fn api_version_header_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/customers/cus_1"))
        .and(header("Stripe-Version", "2024-06-20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(customer_json("cus_1")))
        .expect(1)
        .mount(&server)
        .await;

    let stripe = StripeClient::builder("sk_test_123")
        .api_version("2024-06-20")
        .base_url(format!("{}/v1", server.uri()))
        .build()
        .expect("client");

    stripe.customers().retrieve("cus_1", &[]).await.expect("customer");
}

#[tokio::test]
async fn create_posts_a_form() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/customers"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(header("Idempotency-Key", "signup-42"))
        .and(body_string("email=jenny%40example.com&metadata%5Bplan%5D=gold"))
        .respond_with(ResponseTemplate::new(200).set_body_json(customer_json("cus_2")))
        .expect(1)
        .mount(&server)
        .await;

    let params = CreateCustomer {
        email: Some("jenny@example.com".into()),
        metadata: Some([("plan".to_string(), "gold".to_string())].into_iter().collect()),
        ..CreateCustomer::new()
    };

    let customer = client_for(&server)
        .customers()
        .with_idempotency_key("signup-42")
        .create(&params)
        .await
        .expect("customer");

    check!(customer.id == "cus_2");
}

#[tokio::test]
async fn list_filters_go_to_the_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/customers"))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [customer_json("cus_1"), customer_json("cus_2")],
            "has_more": true,
            "url": "/v1/customers"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filter = ListCustomers {
        page: Pagination::limit(3),
        ..ListCustomers::default()
    };
    let page = client_for(&server)
        .customers()
        .list_all(&filter)
        .await
        .expect("list");

    check!(page.len() == 2);
    check!(page.has_more);
    check!(page.last_id() == Some("cus_2"));
}

#[tokio::test]
async fn error_body_becomes_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/customers/cus_missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "type": "invalid_request_error",
                "code": "resource_missing",
                "message": "No such customer: 'cus_missing'",
                "param": "id"
            }
        })))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .customers()
        .retrieve("cus_missing", &[])
        .await;

    let_assert!(Err(err) = result);
    check!(err.is_not_found());
    let_assert!(Some(api) = err.api_error());
    check!(api.kind == ApiErrorKind::InvalidRequestError);
    check!(api.code.as_deref() == Some("resource_missing"));
    check!(api.param.as_deref() == Some("id"));
}

#[tokio::test]
async fn undecodable_error_body_becomes_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/balance"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let result = client_for(&server).balance().retrieve().await;

    let_assert!(Err(Error::Http { status, .. }) = result);
    check!(status == 502);
}

#[tokio::test]
async fn wrong_shape_reports_the_json_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/customers/cus_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cus_1",
            "object": "customer",
            "created": "yesterday",
            "livemode": false
        })))
        .mount(&server)
        .await;

    let result = client_for(&server).customers().retrieve("cus_1", &[]).await;

    let_assert!(Err(Error::JsonDeserialization { path, .. }) = result);
    check!(path == "created");
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/balance"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"object": "balance", "available": [], "pending": [], "livemode": false}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let stripe = StripeClient::builder("sk_test_123")
        .base_url(format!("{}/v1", server.uri()))
        .configure_client(|b| b.timeout(Duration::from_millis(100)))
        .build()
        .expect("client");

    let result = stripe.balance().retrieve().await;

    let_assert!(Err(err) = result);
    check!(err.is_timeout());
}

#[tokio::test]
async fn refused_connection_is_reported() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };

    let stripe = StripeClient::builder("sk_test_123")
        .base_url(format!("http://127.0.0.1:{port}/v1"))
        .build()
        .expect("client");

    let result = stripe.balance().retrieve().await;

    let_assert!(Err(err) = result);
    check!(err.is_connection());
}

#[tokio::test]
async fn raw_client_exposes_request_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/balance"))
        .and(header_exists("User-Agent"))
        .and(header_exists("X-Stripe-Client-User-Agent"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Request-Id", "req_123")
                .set_body_json(json!({"object": "balance", "available": [], "pending": [], "livemode": false})),
        )
        .mount(&server)
        .await;

    let url = url::Url::parse(&format!("{}/v1/balance", server.uri())).expect("url");
    let response = HyperClient::new()
        .execute(Request::builder(Method::Get, url).build())
        .await
        .expect("response");

    check!(response.is_success());
    check!(response.request_id() == Some("req_123"));
}

#[tokio::test]
async fn layers_that_need_readiness_are_driven() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/customers/cus_1"))
        .and(header("Authorization", "Bearer sk_test_123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(customer_json("cus_1")))
        .expect(3)
        .mount(&server)
        .await;

    let stripe = StripeClient::builder("sk_test_123")
        .base_url(format!("{}/v1", server.uri()))
        .configure_client(|http| {
            http.layer(tower::limit::ConcurrencyLimitLayer::new(1))
                .with_logging()
        })
        .build()
        .expect("client");

    for _ in 0..2 {
        let customer = stripe
            .customers()
            .retrieve("cus_1", &[])
            .await
            .expect("customer");
        check!(customer.id == "cus_1");
    }

    let url = url::Url::parse(&format!("{}/v1/customers/cus_1", server.uri())).expect("url");
    let raw = HyperClient::builder()
        .layer(tower::limit::ConcurrencyLimitLayer::new(1))
        .with_auth("sk_test_123")
        .build();
    let response = raw
        .execute(Request::builder(Method::Get, url).build())
        .await
        .expect("response");
    check!(response.is_success());
}
