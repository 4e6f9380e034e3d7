//! Order service tools.

use crate::middleware::context::CallContext;
use crate::tools::{BackendClient, ToolHandler};
use crate::types::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

fn parse_params<T: serde::de::DeserializeOwned>(params: Value) -> Result<T> {
    serde_json::from_value(params).map_err(|e| Error::bad_request(format!("Invalid params: {}", e)))
}

/// Health/environment status of the order service.
#[derive(Debug)]
pub struct OrderHealthTool {
    client: Arc<BackendClient>,
}

impl OrderHealthTool {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for OrderHealthTool {
    fn name(&self) -> &'static str {
        "order_health"
    }

    fn required_scope(&self) -> Option<&str> {
        Some("tool:health")
    }

    async fn call(&self, _params: Value, context: &CallContext) -> Result<Value> {
        self.client.get("/info", context, "fetch order health").await
    }
}

#[derive(Debug, Deserialize)]
struct GetOrderParams {
    order: String,
}

/// Fetch an order by id.
#[derive(Debug)]
pub struct GetOrderTool {
    client: Arc<BackendClient>,
}

impl GetOrderTool {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for GetOrderTool {
    fn name(&self) -> &'static str {
        "get_order"
    }

    fn required_scope(&self) -> Option<&str> {
        Some("tool:get_order")
    }

    async fn call(&self, params: Value, context: &CallContext) -> Result<Value> {
        let p: GetOrderParams = parse_params(params)?;
        self.client
            .get(
                &format!("/order/{}", p.order),
                context,
                &format!("fetch order {}", p.order),
            )
            .await
    }
}

#[derive(Debug, Deserialize)]
struct CheckoutOrderParams {
    order: i64,
    payment: Value,
}

/// Pay for an order.
#[derive(Debug)]
pub struct CheckoutOrderTool {
    client: Arc<BackendClient>,
}

impl CheckoutOrderTool {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for CheckoutOrderTool {
    fn name(&self) -> &'static str {
        "checkout_order"
    }

    fn required_scope(&self) -> Option<&str> {
        Some("tool:checkout_order")
    }

    async fn call(&self, params: Value, context: &CallContext) -> Result<Value> {
        let p: CheckoutOrderParams = parse_params(params)?;
        let payload = json!({
            "id": p.order,
            "payment": [p.payment],
        });
        self.client
            .post(
                "/checkout",
                context,
                payload,
                &format!("checkout order {}", p.order),
            )
            .await
    }
}

#[derive(Debug, Deserialize)]
struct CreateOrderParams {
    user: String,
    currency: String,
    address: String,
    #[serde(rename = "cartItem")]
    cart_item: CartItemParams,
}

#[derive(Debug, Deserialize)]
struct CartItemParams {
    sku: String,
    currency: String,
    quantity: i64,
    price: f64,
}

/// Create an order from a cart item.
#[derive(Debug)]
pub struct CreateOrderTool {
    client: Arc<BackendClient>,
}

impl CreateOrderTool {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for CreateOrderTool {
    fn name(&self) -> &'static str {
        "create_order"
    }

    fn required_scope(&self) -> Option<&str> {
        Some("tool:create_order")
    }

    async fn call(&self, params: Value, context: &CallContext) -> Result<Value> {
        let p: CreateOrderParams = parse_params(params)?;
        // The backend expects the cart item nested under a cart wrapper.
        let payload = json!({
            "user_id": p.user,
            "currency": p.currency,
            "address": p.address,
            "cart": {
                "user_id": p.user,
                "cart_item": [{
                    "product": { "sku": p.cart_item.sku },
                    "currency": p.cart_item.currency,
                    "quantity": p.cart_item.quantity,
                    "price": p.cart_item.price,
                }],
            },
        });
        self.client
            .post(
                "/order",
                context,
                payload,
                &format!("create order for {}", p.user),
            )
            .await
    }
}
