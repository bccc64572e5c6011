//! Cart line types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::catalog::Product;

/// A single cart line.
///
/// Identity is the product id: the cart never holds two lines for the same
/// product. The line total is derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product id this line refers to.
    pub id: String,
    pub title: String,
    /// Unit price copied from the product at add time.
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    /// Display image copied from the product at add time.
    #[serde(default)]
    pub image: String,
    /// Positive line quantity, minimum 1.
    pub quantity: u32,
}

impl CartItem {
    /// Build the initial line (quantity 1) for a product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            price: product.price,
            description: product.description.clone(),
            image: product.primary_image(),
            quantity: 1,
        }
    }

    /// Derived line total: `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total_is_price_times_quantity() {
        let item = CartItem {
            id: "p1".to_string(),
            title: "Lamp".to_string(),
            price: "10.50".parse().expect("decimal"),
            description: String::new(),
            image: String::new(),
            quantity: 3,
        };
        assert_eq!(item.line_total(), "31.50".parse::<Decimal>().expect("decimal"));
    }

    #[test]
    fn test_from_product_starts_at_quantity_one() {
        let product = Product {
            id: "p1".to_string(),
            title: "Lamp".to_string(),
            price: Decimal::from(10),
            description: "desk lamp".to_string(),
            images: vec!["a.png".to_string()],
            image: None,
            category: None,
            creation_at: None,
            updated_at: None,
        };
        let item = CartItem::from_product(&product);
        assert_eq!(item.quantity, 1);
        assert_eq!(item.image, "a.png");
        assert_eq!(item.line_total(), Decimal::from(10));
    }
}
