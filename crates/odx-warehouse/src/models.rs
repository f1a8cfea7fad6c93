//! Backend record shapes consumed by the warehouse flows.
//!
//! Fields the backend may report as `false` decode through
//! [`OptionalValue`]; many-to-one relations through [`Many2One`].

use odx_client::{Many2One, OptionalValue};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub barcode: OptionalValue<String>,
    pub qty_available: OptionalValue<f64>,
    pub incoming_qty: OptionalValue<f64>,
    pub outgoing_qty: OptionalValue<f64>,
    pub product_tag_ids: OptionalValue<Vec<i64>>,
    pub product_tmpl_id: OptionalValue<Many2One>,
    pub image_256: OptionalValue<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub active: bool,
}

/// A stock-receiving transfer (incoming or internal picking).
#[derive(Clone, Debug, Deserialize)]
pub struct Picking {
    pub id: i64,
    pub name: String,
    pub origin: OptionalValue<String>,
    pub partner_id: OptionalValue<Many2One>,
    pub move_ids: Vec<i64>,
    pub move_line_ids: Vec<i64>,
    pub state: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StockMove {
    pub id: i64,
    pub product_id: Many2One,
    pub product_tmpl_id: Many2One,
    /// Quantity actually received so far.
    pub quantity: f64,
    /// Quantity the order requested.
    pub product_uom_qty: f64,
}

impl StockMove {
    /// A move is fully received when the delivered quantity matches the
    /// requested one; pickings with edited lines need backfill before
    /// validation.
    pub fn fully_received(&self) -> bool {
        self.quantity == self.product_uom_qty
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    /// Local selection state; not a backend field.
    #[serde(default)]
    pub selected: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_decodes_with_mixed_absent_fields() {
        let product: Product = serde_json::from_str(
            r#"{
                "id": 1,
                "name": "Widget",
                "barcode": false,
                "qty_available": 12.0,
                "incoming_qty": false,
                "outgoing_qty": 3.5,
                "product_tag_ids": false,
                "product_tmpl_id": [11, "Widget Tmpl"],
                "image_256": false,
                "type": "consu",
                "active": true
            }"#,
        )
        .unwrap();

        assert!(product.barcode.is_absent());
        assert_eq!(product.qty_available.value(), Some(12.0));
        assert!(product.incoming_qty.is_absent());
        assert_eq!(
            product.product_tmpl_id.as_ref().map(|rel| rel.id),
            Some(11)
        );
        assert_eq!(product.kind, "consu");
    }

    #[test]
    fn company_selection_defaults_to_none() {
        let company: Company =
            serde_json::from_str(r#"{"id": 1, "name": "Main Warehouse"}"#).unwrap();
        assert_eq!(company.selected, None);
    }

    #[test]
    fn stock_move_reception_state() {
        let received: StockMove = serde_json::from_str(
            r#"{"id": 9, "product_id": [1, "Widget"], "product_tmpl_id": [11, "Widget Tmpl"],
                "quantity": 5.0, "product_uom_qty": 5.0}"#,
        )
        .unwrap();
        assert!(received.fully_received());

        let partial: StockMove = serde_json::from_str(
            r#"{"id": 9, "product_id": [1, "Widget"], "product_tmpl_id": [11, "Widget Tmpl"],
                "quantity": 2.0, "product_uom_qty": 5.0}"#,
        )
        .unwrap();
        assert!(!partial.fully_received());
    }
}
