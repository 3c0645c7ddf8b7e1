use serde::{Deserialize, Serialize};

/// A monetary amount in the provider's minor units, paired with its currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub amount: i64,
    pub currency: String,
}

impl Price {
    pub fn new(amount: i64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_equality_includes_currency() {
        let a = Price::new(1500, "EUR");
        let b = Price::new(1500, "USD");
        assert_ne!(a, b);
        assert_eq!(a, Price::new(1500, "EUR"));
    }
}
