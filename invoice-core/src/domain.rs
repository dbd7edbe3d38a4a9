// invoice_core/src/domain.rs
use serde::{Deserialize, Deserializer, Serialize};

/// Reads a JSON `null` number as NaN.
///
/// The browser app stores NaN (a blank numeric field) as `null`; serde_json
/// writes NaN back as `null`, so such values survive a load/save cycle.
pub(crate) fn nan_if_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// One billable row. Quantity and rate are not range-checked.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    #[serde(deserialize_with = "nan_if_null")]
    pub quantity: f64,
    #[serde(deserialize_with = "nan_if_null")]
    pub rate: f64,
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: f64, rate: f64) -> Self {
        Self {
            description: description.into(),
            quantity,
            rate,
        }
    }

    pub fn amount(&self) -> f64 {
        self.quantity * self.rate
    }
}

impl Default for LineItem {
    /// The blank row a fresh invoice (or "add row") starts with.
    fn default() -> Self {
        Self {
            description: String::new(),
            quantity: 1.0,
            rate: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    #[default]
    Percentage,
    Flat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscountSpec {
    #[serde(rename = "type")]
    pub kind: DiscountKind,
    #[serde(deserialize_with = "nan_if_null")]
    pub value: f64,
}

impl DiscountSpec {
    pub fn percentage(value: f64) -> Self {
        Self {
            kind: DiscountKind::Percentage,
            value,
        }
    }

    pub fn flat(value: f64) -> Self {
        Self {
            kind: DiscountKind::Flat,
            value,
        }
    }
}

/// Company or client header block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    pub details: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsBreakdown {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub discount_amount: f64,
    pub total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_numbers_read_as_nan() {
        let item: LineItem =
            serde_json::from_str(r#"{"description": "", "quantity": null, "rate": 4}"#).unwrap();
        assert!(item.quantity.is_nan());
        assert_eq!(item.rate, 4.0);
        assert_eq!(serde_json::to_value(&item).unwrap()["quantity"], serde_json::Value::Null);

        let d: DiscountSpec = serde_json::from_str(r#"{"type": "flat", "value": null}"#).unwrap();
        assert!(d.value.is_nan());
    }
}
