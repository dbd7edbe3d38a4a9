use crate::domain::LineItem;
use crate::error::{InvoiceError, Result};

/// A single-field edit on one row.
#[derive(Clone, Debug, PartialEq)]
pub enum ItemField {
    Description(String),
    Quantity(f64),
    Rate(f64),
}

/// Returns `items` with a blank row appended.
pub fn add_item(items: &[LineItem]) -> Vec<LineItem> {
    let mut out = items.to_vec();
    out.push(LineItem::default());
    out
}

/// Returns `items` without the row at `index`. Out of range is a no-op.
pub fn remove_item(items: &[LineItem], index: usize) -> Vec<LineItem> {
    items
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, item)| item.clone())
        .collect()
}

/// Returns `items` with one field of one row replaced; length and order are kept.
pub fn update_field(
    items: &[LineItem],
    index: usize,
    field: ItemField,
) -> Result<Vec<LineItem>> {
    let mut out = items.to_vec();
    let len = out.len();
    let item = out
        .get_mut(index)
        .ok_or(InvoiceError::IndexOutOfRange { index, len })?;
    match field {
        ItemField::Description(d) => item.description = d,
        ItemField::Quantity(q) => item.quantity = q,
        ItemField::Rate(r) => item.rate = r,
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<LineItem> {
        vec![
            LineItem::new("Design", 1.0, 500.0),
            LineItem::new("Hosting", 12.0, 20.0),
        ]
    }

    #[test]
    fn add_appends_blank_row() {
        let items = add_item(&sample());
        assert_eq!(items.len(), 3);
        assert_eq!(items[2], LineItem::new("", 1.0, 0.0));
        assert_eq!(&items[..2], &sample()[..]);
    }

    #[test]
    fn remove_drops_only_that_row() {
        let items = remove_item(&sample(), 0);
        assert_eq!(items, vec![LineItem::new("Hosting", 12.0, 20.0)]);
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        assert_eq!(remove_item(&sample(), 2), sample());
        assert_eq!(remove_item(&[], 0), Vec::<LineItem>::new());
    }

    #[test]
    fn update_touches_one_field() {
        let items = update_field(&sample(), 1, ItemField::Rate(25.0)).unwrap();
        assert_eq!(items[1], LineItem::new("Hosting", 12.0, 25.0));
        assert_eq!(items[0], sample()[0]);

        let items = update_field(&items, 0, ItemField::Description("Logo".into())).unwrap();
        assert_eq!(items[0].description, "Logo");
        assert_eq!(items[0].quantity, 1.0);
    }

    #[test]
    fn update_out_of_range_fails() {
        let err = update_field(&sample(), 5, ItemField::Quantity(2.0)).unwrap_err();
        assert!(matches!(
            err,
            InvoiceError::IndexOutOfRange { index: 5, len: 2 }
        ));
    }
}
