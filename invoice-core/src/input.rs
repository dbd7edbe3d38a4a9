//! Text-to-number boundary for user input.
//!
//! Every numeric form field goes through [`parse_number`], so text that is
//! not a finite number becomes a typed error instead of a NaN in the totals.

use crate::domain::LineItem;
use crate::error::{InvoiceError, Result};

pub fn parse_number(field: &str, text: &str) -> Result<f64> {
    let invalid = || InvoiceError::InvalidNumericInput {
        field: field.to_string(),
        input: text.to_string(),
    };
    let v: f64 = text.trim().parse().map_err(|_| invalid())?;
    if !v.is_finite() {
        return Err(invalid());
    }
    Ok(v)
}

/// Parse `description:quantity:rate`. The description may contain `:`.
pub fn parse_item_spec(spec: &str) -> Result<LineItem> {
    let mut parts = spec.rsplitn(3, ':');
    let (Some(rate), Some(quantity), Some(description)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(InvoiceError::Format(format!(
            "item {spec:?}: expected description:quantity:rate"
        )));
    };
    Ok(LineItem {
        description: description.to_string(),
        quantity: parse_number("quantity", quantity)?,
        rate: parse_number("rate", rate)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_numbers() {
        assert_eq!(parse_number("tax", " 10 ").unwrap(), 10.0);
        assert_eq!(parse_number("rate", "-2.5").unwrap(), -2.5);
    }

    #[test]
    fn rejects_garbage_and_non_finite() {
        for bad in ["", "abc", "1,5", "NaN", "inf", "-infinity"] {
            let err = parse_number("rate", bad).unwrap_err();
            assert!(
                matches!(err, InvoiceError::InvalidNumericInput { ref field, .. } if field == "rate"),
                "{bad:?} -> {err}"
            );
        }
    }

    #[test]
    fn item_spec_keeps_colons_in_description() {
        let item = parse_item_spec("Support: March:3:45.5").unwrap();
        assert_eq!(item, LineItem::new("Support: March", 3.0, 45.5));
    }

    #[test]
    fn item_spec_allows_empty_description() {
        assert_eq!(parse_item_spec(":1:0").unwrap(), LineItem::default());
    }

    #[test]
    fn item_spec_errors() {
        assert!(matches!(
            parse_item_spec("Widget:2"),
            Err(InvoiceError::Format(_))
        ));
        assert!(matches!(
            parse_item_spec("Widget:two:10"),
            Err(InvoiceError::InvalidNumericInput { field, .. }) if field == "quantity"
        ));
    }
}
