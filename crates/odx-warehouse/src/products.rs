//! Product catalog calls.

use odx_client::{
    ClientError, ExecutionContext, Keyword, OptionalValue, Params, ProxyClient,
};
use serde_json::json;

use crate::models::Product;

/// Field projection for the catalog list. Keep `id` first: deduplication
/// preserves this order on the wire.
pub const PRODUCT_FIELDS: [&str; 11] = [
    "id",
    "name",
    "qty_available",
    "incoming_qty",
    "outgoing_qty",
    "product_tmpl_id",
    "image_256",
    "barcode",
    "product_tag_ids",
    "active",
    "type",
];

pub const PAGE_SIZE: i64 = 80;

/// Fetch one page of active products, ordered by default code.
pub async fn fetch_products(
    client: &ProxyClient,
    context: ExecutionContext,
    offset: i64,
) -> Result<Vec<Product>, ClientError> {
    let keyword = Keyword {
        fields: Some(PRODUCT_FIELDS.iter().map(|f| f.to_string()).collect()),
        order: Some("default_code asc".to_string()),
        limit: Some(PAGE_SIZE),
        offset: Some(offset),
        context: Some(context),
    };
    let params = Params::new(vec![json!([["active", "=", true]])]);
    client.search_read("product.product", params, keyword).await
}

/// Create a product template. Empty barcode/note normalize to backend
/// `false` rather than empty strings. Returns the new record ids.
pub async fn create_product(
    client: &ProxyClient,
    context: ExecutionContext,
    name: &str,
    barcode: &str,
    note: &str,
) -> Result<Vec<i64>, ClientError> {
    let record = json!({
        "name": name,
        "barcode": OptionalValue::from_non_empty(barcode),
        "description": OptionalValue::from_non_empty(note),
    });
    let params = Params::new(vec![json!([record])]);
    let keyword = Keyword {
        context: Some(context),
        ..Keyword::default()
    };
    let ids: Vec<i64> = client.create("product.template", params, keyword).await?;
    tracing::info!(count = ids.len(), "created product templates");
    Ok(ids)
}

/// Archive a product template (`active = false`). The backend acknowledges
/// writes with a bare boolean.
pub async fn archive_product(
    client: &ProxyClient,
    context: ExecutionContext,
    template_id: i64,
) -> Result<bool, ClientError> {
    let params = Params::new(vec![json!([template_id]), json!({"active": false})]);
    let keyword = Keyword {
        context: Some(context),
        ..Keyword::default()
    };
    client.write("product.template", params, keyword).await
}
