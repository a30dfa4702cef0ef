use std::time::Duration;

use serde_json::json;
use wiremock::{
    matchers::{body_string_contains, header, method, path, query_param},
    Mock, MockBuilder, MockServer, ResponseTemplate,
};

use crate::core::{
    api_client::{ApiClient, Customer},
    authenticator::{Authenticator, Credentials, DEFAULT_SESSION_COOKIE},
    common::{http_client_factory::HttpSettings, transport::TransportErrorKind},
};

const TOKEN: &str = "4321abcdef0987";

async fn logged_in(server: &MockServer) -> ApiClient {
    Mock::given(method("POST"))
        .and(path("/index.php"))
        .and(query_param("route", "api/account/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": "Success: API session successfully started!",
            "api_token": TOKEN,
        })))
        .mount(server)
        .await;

    Authenticator::new(
        server.uri(),
        Credentials::new("Default".to_string(), "secret".to_string()),
        DEFAULT_SESSION_COOKIE.to_string(),
        HttpSettings::default(),
    )
    .login()
    .await
    .unwrap()
}

fn cart_route(route: &str) -> MockBuilder {
    Mock::given(method("POST"))
        .and(path("/index.php"))
        .and(query_param("route", route))
}

fn cart_body(lines: serde_json::Value) -> serde_json::Value {
    json!({
        "products": lines,
        "vouchers": [],
        "totals": [
            {"title": "Sub-Total", "text": "$602.00"},
            {"title": "Total", "text": "$607.00"}
        ],
        "shipping_required": true
    })
}

#[tokio::test]
async fn empty_body_reads_as_empty_cart() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    cart_route("api/sale/cart")
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let cart = client.get_cart().await.unwrap().into_result().unwrap();

    assert!(cart.is_empty());
    assert_eq!(0.0, cart.subtotal().unwrap_or_default());
    assert!(!cart.shipping_required);
}

#[tokio::test]
async fn empty_error_answer_is_not_an_empty_cart() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    cart_route("api/sale/cart")
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.get_cart().await.unwrap_err();
    assert_eq!(TransportErrorKind::UnexpectedStatus, err.kind);
}

#[tokio::test]
async fn cart_read_carries_the_session_cookie() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    cart_route("api/sale/cart")
        .and(header("cookie", format!("OCSESSID={TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(json!([
            {"cart_id": "1", "product_id": "43", "name": "MacBook", "quantity": "1",
             "price": "$602.00", "total": "$602.00"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let cart = client.get_cart().await.unwrap().into_result().unwrap();

    assert_eq!(1, cart.products.len());
    assert_eq!(43, cart.products[0].product_id);
    assert_eq!(1, cart.products[0].quantity);
    assert_eq!(Some(602.0), cart.subtotal());
}

#[tokio::test]
async fn zero_and_negative_quantities_are_forwarded_untouched() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    cart_route("api/sale/cart.add")
        .and(body_string_contains("quantity=0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": "Success: You have modified your shopping cart!"
        })))
        .expect(1)
        .mount(&server)
        .await;

    cart_route("api/sale/cart.add")
        .and(body_string_contains("quantity=-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {"warning": "Quantity must be positive"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let zero = client.add_to_cart(43, 0).await.unwrap();
    let negative = client.add_to_cart(43, -1).await.unwrap();

    assert!(zero.success().unwrap().message().contains("modified"));
    assert_eq!(
        vec!["Quantity must be positive"],
        negative.rejection().unwrap().messages
    );
}

#[tokio::test]
async fn unknown_product_is_returned_as_data() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    cart_route("api/sale/cart.add")
        .and(body_string_contains("product_id=99999"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": ["Warning: Product could not be found!"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    cart_route("api/sale/cart")
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(json!([
            {"cart_id": 3, "product_id": 43, "quantity": 1}
        ]))))
        .expect(2)
        .mount(&server)
        .await;

    let before = client.get_cart().await.unwrap().into_result().unwrap();
    let outcome = client.add_to_cart(99999, 1).await.unwrap();
    let after = client.get_cart().await.unwrap().into_result().unwrap();

    assert!(outcome.is_rejected());
    assert!(outcome.rejection().unwrap().contains("could not be found"));
    assert_eq!(before, after);
    assert!(after.lines_for_product(99999).is_empty());
}

#[tokio::test]
async fn remove_sends_the_line_identifier() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    cart_route("api/sale/cart.remove")
        .and(body_string_contains("cart_id=12"))
        .and(body_string_contains("key=12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": "Success: You have modified your shopping cart!"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client.remove_from_cart(12).await.unwrap();
    assert!(outcome.is_success());
}

#[tokio::test]
async fn removing_an_absent_line_is_a_rejection() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    cart_route("api/sale/cart.remove")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "Warning: Product could not be found in your cart!"
        })))
        .mount(&server)
        .await;

    let outcome = client.remove_from_cart(404).await.unwrap();
    assert!(outcome.rejection().unwrap().contains("not be found in your cart"));
}

#[tokio::test]
async fn html_error_page_is_a_transport_error() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    cart_route("api/sale/cart.add")
        .respond_with(
            ResponseTemplate::new(500).set_body_string("<html><body>Fatal error</body></html>"),
        )
        .mount(&server)
        .await;

    let err = client.add_to_cart(43, 1).await.unwrap_err();
    assert_eq!(TransportErrorKind::UnexpectedStatus, err.kind);
}

#[tokio::test]
async fn cart_state_is_read_back_on_every_call() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;
    let cookie = format!("OCSESSID={TOKEN}");

    cart_route("api/sale/cart.add")
        .and(header("cookie", cookie.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": "Success: You have modified your shopping cart!"
        })))
        .expect(1)
        .mount(&server)
        .await;

    cart_route("api/sale/cart")
        .and(header("cookie", cookie.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(json!([
            {"cart_id": 3, "product_id": 43, "quantity": 1}
        ]))))
        .expect(2)
        .mount(&server)
        .await;

    client.add_to_cart(43, 1).await.unwrap().into_result().unwrap();

    let first = client.get_cart().await.unwrap().into_result().unwrap();
    let second = client.get_cart().await.unwrap().into_result().unwrap();

    assert_eq!(1, first.products.len());
    assert_eq!(first, second);
}

#[tokio::test]
async fn repeated_adds_are_reported_as_the_server_stores_them() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    cart_route("api/sale/cart")
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(json!([
            {"cart_id": 3, "product_id": 43, "quantity": 1},
            {"cart_id": 4, "product_id": 43, "quantity": 2}
        ]))))
        .mount(&server)
        .await;

    let cart = client.get_cart().await.unwrap().into_result().unwrap();

    let lines = cart.lines_for_product(43);
    assert_eq!(2, lines.len());
    assert_eq!(3, lines.iter().map(|l| l.quantity).sum::<i64>());
}

#[tokio::test]
async fn clear_cart_removes_every_line_then_reads_again() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    cart_route("api/sale/cart")
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(json!([
            {"cart_id": 5, "product_id": 43, "quantity": 1},
            {"cart_id": 6, "product_id": 40, "quantity": 1}
        ]))))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    cart_route("api/sale/cart")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [], "vouchers": [], "totals": [], "shipping_required": false
        })))
        .mount(&server)
        .await;

    cart_route("api/sale/cart.remove")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": "Success: You have modified your shopping cart!"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let cart = client.clear_cart().await.unwrap().into_result().unwrap();
    assert!(cart.is_empty());
}

#[tokio::test]
async fn clear_cart_uses_key_identifiers_and_skips_unidentified_lines() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    cart_route("api/sale/cart")
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(json!([
            {"key": "7", "product_id": "43", "quantity": "1"},
            {"product_id": "40", "quantity": "1"}
        ]))))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    cart_route("api/sale/cart")
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(json!([
            {"product_id": "40", "quantity": "1"}
        ]))))
        .mount(&server)
        .await;

    cart_route("api/sale/cart.remove")
        .and(body_string_contains("cart_id=7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": "Success: You have modified your shopping cart!"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cart = client.clear_cart().await.unwrap().into_result().unwrap();

    assert_eq!(1, cart.products.len());
    assert_eq!(None, cart.products[0].cart_id);
}

#[tokio::test]
async fn per_call_timeout_is_a_transport_error() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    Mock::given(method("GET"))
        .and(path("/index.php"))
        .and(query_param("route", "api/localisation/currency"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"currencies": []}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let err = client
        .get_with_timeout("api/localisation/currency", Some(Duration::from_millis(50)))
        .await
        .unwrap_err();

    assert_eq!(TransportErrorKind::Timeout, err.kind);
}

#[tokio::test]
async fn customer_and_order_calls_pass_through() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    cart_route("api/sale/customer")
        .and(body_string_contains("email=jane%40example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": "Success: You have modified customers!"
        })))
        .expect(1)
        .mount(&server)
        .await;

    cart_route("api/sale/order.load")
        .and(body_string_contains("order_id=7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "order_id": 7, "total": "607.0000"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let customer = Customer {
        firstname: "Jane".to_string(),
        lastname: "Doe".to_string(),
        email: "jane@example.com".to_string(),
        ..Default::default()
    };

    assert!(client.set_customer(&customer).await.unwrap().is_success());

    let order = client.get_order(7).await.unwrap().into_result().unwrap();
    assert_eq!(Some(&json!(7)), order.get("order_id"));
}
