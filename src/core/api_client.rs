use std::time::Duration;

use log::{debug, error, info};
use reqwest::RequestBuilder;
use serde::Serialize;
use serde_json::Value;

use crate::core::{
    authenticator::Session,
    common::{
        build_url,
        transport::{classify, parse_body, ApiOutcome, TransportError},
    },
};

pub mod models;
pub use models::{Acknowledgement, Cart, CartLine, CartTotal, Customer, Order};
use models::{CartAddPayload, CartRemovePayload, OrderLoadPayload};

const CART_ROUTE: &str = "api/sale/cart";
const CART_ADD_ROUTE: &str = "api/sale/cart.add";
const CART_REMOVE_ROUTE: &str = "api/sale/cart.remove";
const CUSTOMER_ROUTE: &str = "api/sale/customer";
const ORDER_LOAD_ROUTE: &str = "api/sale/order.load";

const NO_FORM: Option<&[(&str, &str)]> = None;

/// Authenticated client over one [`Session`].
///
/// Application-level rejections come back as [`ApiOutcome::Rejected`];
/// only transport failures are returned as `Err`. Nothing is retried and
/// nothing is cached: every cart read goes to the server.
pub struct ApiClient {
    session: Session,
}

impl ApiClient {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current cart. A body without products, or a successful answer with no
    /// body at all, is an empty cart. An empty error answer is a transport
    /// failure.
    pub async fn get_cart(&self) -> Result<ApiOutcome<Cart>, TransportError> {
        debug!("fetching cart");

        let request = self.request_post(CART_ROUTE, NO_FORM, None);
        let (status, body) = self.send(request).await?;

        if status.is_success() && body.trim().is_empty() {
            error!("empty response from cart API, treating as empty cart");
            return Ok(ApiOutcome::Success(Cart::default()));
        }

        classify::<Cart>(parse_body(status, &body)?)
    }

    /// Adds `quantity` of `product_id`. Values are forwarded untouched, the
    /// server is the only judge of their validity.
    pub async fn add_to_cart(
        &self,
        product_id: i64,
        quantity: i64,
    ) -> Result<ApiOutcome<Acknowledgement>, TransportError> {
        info!("adding product {product_id} (qty: {quantity}) to cart");

        let payload = CartAddPayload {
            product_id,
            quantity,
        };
        classify(self.post(CART_ADD_ROUTE, Some(&payload)).await?)
    }

    /// Removes a cart line. `cart_id` comes from a prior [`get_cart`](Self::get_cart),
    /// it is not a product id.
    pub async fn remove_from_cart(
        &self,
        cart_id: i64,
    ) -> Result<ApiOutcome<Acknowledgement>, TransportError> {
        info!("removing cart item: {cart_id}");

        let payload = CartRemovePayload {
            cart_id,
            key: cart_id,
        };
        classify(self.post(CART_REMOVE_ROUTE, Some(&payload)).await?)
    }

    /// Removes every line currently in the cart and returns a fresh read.
    pub async fn clear_cart(&self) -> Result<ApiOutcome<Cart>, TransportError> {
        let cart = match self.get_cart().await? {
            ApiOutcome::Success(c) => c,
            rejected => return Ok(rejected),
        };

        for line in &cart.products {
            let Some(cart_id) = line.cart_id else {
                debug!("cart line for product {} has no identifier, skipped", line.product_id);
                continue;
            };
            if let ApiOutcome::Rejected(e) = self.remove_from_cart(cart_id).await? {
                debug!("cart line {cart_id} not removed: {e}");
            }
        }

        self.get_cart().await
    }

    pub async fn set_customer(
        &self,
        customer: &Customer,
    ) -> Result<ApiOutcome<Acknowledgement>, TransportError> {
        info!("setting customer information");
        classify(self.post(CUSTOMER_ROUTE, Some(customer)).await?)
    }

    pub async fn get_order(&self, order_id: i64) -> Result<ApiOutcome<Order>, TransportError> {
        info!("getting order: {order_id}");

        let payload = OrderLoadPayload { order_id };
        classify(self.post(ORDER_LOAD_ROUTE, Some(&payload)).await?)
    }

    /// POSTs an optional form to `route` and parses the JSON answer.
    pub async fn post<F>(&self, route: &str, form: Option<&F>) -> Result<Value, TransportError>
    where
        F: Serialize + ?Sized,
    {
        self.post_with_timeout(route, form, None).await
    }

    pub async fn post_with_timeout<F>(
        &self,
        route: &str,
        form: Option<&F>,
        timeout: Option<Duration>,
    ) -> Result<Value, TransportError>
    where
        F: Serialize + ?Sized,
    {
        let request = self.request_post(route, form, timeout);
        let (status, body) = self.send(request).await?;
        parse_body(status, &body)
    }

    pub async fn get(&self, route: &str) -> Result<Value, TransportError> {
        self.get_with_timeout(route, None).await
    }

    pub async fn get_with_timeout(
        &self,
        route: &str,
        timeout: Option<Duration>,
    ) -> Result<Value, TransportError> {
        let url = build_url(self.session.base_url(), route);
        info!("GET {url}");

        let mut request = self.session.http().get(url);
        if let Some(t) = timeout {
            request = request.timeout(t);
        }

        let (status, body) = self.send(request).await?;
        parse_body(status, &body)
    }

    fn request_post<F>(&self, route: &str, form: Option<&F>, timeout: Option<Duration>) -> RequestBuilder
    where
        F: Serialize + ?Sized,
    {
        let url = build_url(self.session.base_url(), route);
        info!("POST {url}");

        let mut request = self.session.http().post(url);
        if let Some(f) = form {
            request = request.form(f);
        }
        if let Some(t) = timeout {
            request = request.timeout(t);
        }
        request
    }

    async fn send(
        &self,
        request: RequestBuilder,
    ) -> Result<(reqwest::StatusCode, String), TransportError> {
        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        let excerpt: String = body.chars().take(200).collect();
        debug!("response [{status}]: {excerpt}");

        Ok((status, body))
    }
}

#[cfg(test)]
mod tests;
