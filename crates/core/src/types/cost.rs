//! Non-negative monetary amounts using decimal arithmetic.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Cost`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CostError {
    /// The amount is below zero.
    #[error("cost cannot be negative: {0}")]
    Negative(Decimal),
}

/// A product price or cart total.
///
/// Always non-negative. Multiplying by a quantity never overflows in practice
/// for catalogue-sized values; [`Cost::times`] saturates instead of panicking.
///
/// ```
/// use pet_store_core::Cost;
/// use rust_decimal::Decimal;
///
/// let unit = Cost::new(Decimal::new(1250, 2)).unwrap(); // 12.50
/// assert_eq!(unit.times(3).amount(), Decimal::new(3750, 2));
/// assert!(Cost::new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Cost(Decimal);

impl Cost {
    /// Zero cost.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a cost from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `CostError::Negative` if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, CostError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(CostError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Cost of `count` units at this unit cost.
    #[must_use]
    pub fn times(self, count: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(count)))
    }
}

impl Add for Cost {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Cost {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<Decimal> for Cost {
    type Error = CostError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Cost> for Decimal {
    fn from(cost: Cost) -> Self {
        cost.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Cost {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Cost {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Cost {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_rejected() {
        assert!(matches!(
            Cost::new(Decimal::new(-5, 1)),
            Err(CostError::Negative(_))
        ));
        assert!(Cost::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_sum_of_lines() {
        let a = Cost::new(Decimal::new(199, 2)).unwrap();
        let b = Cost::new(Decimal::new(1000, 2)).unwrap();
        let total: Cost = [a.times(2), b.times(1)].into_iter().sum();
        assert_eq!(total.amount(), Decimal::new(1398, 2));
        assert_eq!(total.to_string(), "13.98");
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        let bad: Result<Cost, _> = serde_json::from_str("\"-1.00\"");
        assert!(bad.is_err());

        let ok: Cost = serde_json::from_str("\"4.20\"").unwrap();
        assert_eq!(ok.amount(), Decimal::new(420, 2));
    }
}
