use serde::{Deserialize, Serialize};

use orderdesk_core::{DomainError, DomainResult, Entity, Money, ProductId};

/// A sellable product and its current unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    price: Money,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, price: Money) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::invariant("product name must not be empty"));
        }

        Ok(Self { id, name, price })
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> &Money {
        &self.price
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> Option<&Self::Id> {
        Some(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn new_product_keeps_price() {
        let p = Product::new(ProductId::new(1), "Product A", Money::usd(dec!(50)).unwrap()).unwrap();
        assert_eq!(p.id_typed(), ProductId::new(1));
        assert_eq!(p.name(), "Product A");
        assert_eq!(p.price().to_string(), "50.00 USD");
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = Product::new(ProductId::new(1), "  ", Money::zero("USD")).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn serializes_price_as_money() {
        let p = Product::new(ProductId::new(2), "Product B", Money::usd(dec!(20)).unwrap()).unwrap();
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["price"]["amount"], "20.00");
        assert_eq!(json["id"], 2);
    }
}
