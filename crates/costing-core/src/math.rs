//! 溢位檢查的 Decimal 運算
//!
//! 超出 Decimal 範圍時返回 `CostError::Overflow`，不會 panic。

use rust_decimal::Decimal;

use crate::CostError;

/// lhs × rhs
pub fn mul(lhs: Decimal, rhs: Decimal, context: &str) -> crate::Result<Decimal> {
    lhs.checked_mul(rhs)
        .ok_or_else(|| CostError::Overflow(format!("{}: {} × {}", context, lhs, rhs)))
}

/// lhs + rhs
pub fn add(lhs: Decimal, rhs: Decimal, context: &str) -> crate::Result<Decimal> {
    lhs.checked_add(rhs)
        .ok_or_else(|| CostError::Overflow(format!("{}: {} + {}", context, lhs, rhs)))
}

/// lhs ÷ rhs（呼叫端須先確認 rhs 不為 0）
pub fn div(lhs: Decimal, rhs: Decimal, context: &str) -> crate::Result<Decimal> {
    lhs.checked_div(rhs)
        .ok_or_else(|| CostError::Overflow(format!("{}: {} ÷ {}", context, lhs, rhs)))
}

/// value × numerator ÷ denominator，先乘後除
pub fn scale(
    value: Decimal,
    numerator: Decimal,
    denominator: Decimal,
    context: &str,
) -> crate::Result<Decimal> {
    div(mul(value, numerator, context)?, denominator, context)
}

/// 加總，任何一步溢位即返回錯誤
pub fn sum<I>(values: I, context: &str) -> crate::Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| add(total, value, context))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range() {
        assert_eq!(
            mul(Decimal::from(150), Decimal::from(333), "cost").unwrap(),
            Decimal::from(49950)
        );
        assert_eq!(
            scale(Decimal::from(1001), Decimal::from(3), Decimal::from(3), "scale").unwrap(),
            Decimal::from(1001)
        );
        assert_eq!(
            sum([Decimal::ONE, Decimal::TWO, Decimal::TEN], "sum").unwrap(),
            Decimal::from(13)
        );
    }

    #[test]
    fn test_overflow_is_an_error() {
        let result = mul(Decimal::MAX, Decimal::TWO, "unit cost");
        assert!(matches!(result, Err(CostError::Overflow(msg)) if msg.starts_with("unit cost")));

        assert!(add(Decimal::MAX, Decimal::ONE, "total").is_err());
        assert!(div(Decimal::MAX, Decimal::new(1, 10), "ratio").is_err());
        assert!(sum([Decimal::MAX, Decimal::MAX], "sum").is_err());
    }
}
