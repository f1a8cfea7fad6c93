//! Stock-receiving calls.

use odx_client::{ClientError, ExecutionContext, Keyword, Params, ProxyClient};
use serde_json::json;

use crate::models::{Picking, StockMove};

const PICKING_FIELDS: [&str; 7] = [
    "id",
    "name",
    "partner_id",
    "move_ids",
    "move_line_ids",
    "origin",
    "state",
];

const MOVE_FIELDS: [&str; 5] = [
    "id",
    "product_id",
    "product_tmpl_id",
    "product_uom_qty",
    "quantity",
];

/// Find open incoming/internal transfers whose name or source document
/// matches `query`.
pub async fn find_pickings(
    client: &ProxyClient,
    context: ExecutionContext,
    query: &str,
) -> Result<Vec<Picking>, ClientError> {
    let keyword = Keyword {
        fields: Some(PICKING_FIELDS.iter().map(|f| f.to_string()).collect()),
        order: Some("name asc".to_string()),
        limit: Some(80),
        offset: Some(0),
        context: Some(context),
    };
    // (name ilike q OR origin ilike q) AND state = assigned
    // AND picking type in {incoming, internal}, in backend prefix notation.
    let domain = json!([
        "|",
        "&",
        ["name", "ilike", query],
        ["origin", "ilike", query],
        ["state", "=", "assigned"],
        ["picking_type_id.code", "in", ["incoming", "internal"]]
    ]);
    let params = Params::new(vec![domain]);
    client.search_read("stock.picking", params, keyword).await
}

/// Read the stock moves behind a picking.
pub async fn fetch_moves(
    client: &ProxyClient,
    context: ExecutionContext,
    move_ids: &[i64],
) -> Result<Vec<StockMove>, ClientError> {
    let keyword = Keyword {
        fields: Some(MOVE_FIELDS.iter().map(|f| f.to_string()).collect()),
        order: Some("name asc".to_string()),
        limit: Some(80),
        offset: Some(0),
        context: Some(context),
    };
    let params = Params::new(vec![json!(move_ids)]);
    client.read("stock.move", params, keyword).await
}

/// Validate a fully received picking via the backend's `button_validate`.
/// The backend acknowledges with a bare boolean.
pub async fn validate_picking(
    client: &ProxyClient,
    context: ExecutionContext,
    picking_id: i64,
) -> Result<bool, ClientError> {
    let keyword = Keyword {
        context: Some(context),
        ..Keyword::default()
    };
    let params = Params::new(vec![json!([picking_id])]);
    let validated: bool = client
        .call_method("stock.picking", "button_validate", params, keyword)
        .await?;
    tracing::info!(picking_id, validated, "picking validation finished");
    Ok(validated)
}
