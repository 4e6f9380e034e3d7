//! Inventory service tools.
//!
//! Forwarders to the inventory backend. Params are deserialized into typed
//! structs; a shape mismatch is a 400 before any backend call.

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

/// Health/environment status of the inventory service.
#[derive(Debug)]
pub struct InventoryHealthTool {
    client: Arc<BackendClient>,
}

impl InventoryHealthTool {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for InventoryHealthTool {
    fn name(&self) -> &'static str {
        "inventory_health"
    }

    fn required_scope(&self) -> Option<&str> {
        Some("tool:health")
    }

    async fn call(&self, _params: Value, context: &CallContext) -> Result<Value> {
        self.client
            .get("/info", context, "fetch inventory health")
            .await
    }
}

#[derive(Debug, Deserialize)]
struct CreateInventoryParams {
    sku: String,
    #[serde(rename = "type")]
    category: String,
    name: String,
    status: String,
}

/// Create a product in the inventory.
#[derive(Debug)]
pub struct CreateInventoryTool {
    client: Arc<BackendClient>,
}

impl CreateInventoryTool {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for CreateInventoryTool {
    fn name(&self) -> &'static str {
        "create_inventory"
    }

    fn required_scope(&self) -> Option<&str> {
        Some("tool:read")
    }

    async fn call(&self, params: Value, context: &CallContext) -> Result<Value> {
        let p: CreateInventoryParams = parse_params(params)?;
        let payload = json!({
            "sku": p.sku,
            "type": p.category,
            "name": p.name,
            "status": p.status,
        });
        self.client
            .post("/product", context, payload, &format!("create inventory {}", p.sku))
            .await
    }
}

#[derive(Debug, Deserialize)]
struct SkuParams {
    sku: String,
}

/// Fetch a product by sku.
#[derive(Debug)]
pub struct GetProductTool {
    client: Arc<BackendClient>,
}

impl GetProductTool {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for GetProductTool {
    fn name(&self) -> &'static str {
        "get_product"
    }

    fn required_scope(&self) -> Option<&str> {
        Some("tool:read")
    }

    async fn call(&self, params: Value, context: &CallContext) -> Result<Value> {
        let p: SkuParams = parse_params(params)?;
        self.client
            .get(
                &format!("/product/{}", p.sku),
                context,
                &format!("fetch product {}", p.sku),
            )
            .await
    }
}

/// Fetch stock levels for a product.
#[derive(Debug)]
pub struct GetInventoryTool {
    client: Arc<BackendClient>,
}

impl GetInventoryTool {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for GetInventoryTool {
    fn name(&self) -> &'static str {
        "get_inventory"
    }

    fn required_scope(&self) -> Option<&str> {
        Some("tool:read")
    }

    async fn call(&self, params: Value, context: &CallContext) -> Result<Value> {
        let p: SkuParams = parse_params(params)?;
        self.client
            .get(
                &format!("/inventory/product/{}", p.sku),
                context,
                &format!("fetch inventory {}", p.sku),
            )
            .await
    }
}

#[derive(Debug, Deserialize)]
struct UpdateInventoryParams {
    sku: String,
    available: i64,
    reserved: i64,
    sold: i64,
}

/// Update stock levels for a product.
#[derive(Debug)]
pub struct UpdateInventoryTool {
    client: Arc<BackendClient>,
}

impl UpdateInventoryTool {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for UpdateInventoryTool {
    fn name(&self) -> &'static str {
        "update_inventory"
    }

    fn required_scope(&self) -> Option<&str> {
        Some("tool:read")
    }

    async fn call(&self, params: Value, context: &CallContext) -> Result<Value> {
        let p: UpdateInventoryParams = parse_params(params)?;
        let payload = json!({
            "available": p.available,
            "reserved": p.reserved,
            "sold": p.sold,
        });
        self.client
            .put(
                &format!("/inventory/product/{}", p.sku),
                context,
                payload,
                &format!("update inventory {}", p.sku),
            )
            .await
    }
}
