//! 售價計算

use costing_core::{math, CostError, PricingPolicy};
use rust_decimal::Decimal;
use serde::Serialize;

/// 售價計算結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellPrice {
    pub cost_per_unit: Decimal,
    pub margin_percentage: Decimal,
    /// 未稅售價
    pub base_selling_price: Decimal,
    /// 含稅時使用的稅率
    pub tax_percentage: Option<Decimal>,
    /// 含稅售價
    pub selling_price_with_tax: Option<Decimal>,
    /// 最終售價（含稅時為含稅售價）
    pub final_price: Decimal,
    /// 顯示用售價（無條件進位）
    pub rounded_price: Decimal,
}

/// 售價計算器
#[derive(Debug, Clone, Copy, Default)]
pub struct SellPriceCalculator {
    policy: PricingPolicy,
}

impl SellPriceCalculator {
    pub fn new(policy: PricingPolicy) -> costing_core::Result<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// 計算售價
    ///
    /// 未設定利潤率或稅率時使用策略中的預設值。
    pub fn calculate(
        &self,
        cost_per_unit: Decimal,
        margin_percentage: Option<Decimal>,
        include_tax: bool,
        tax_percentage: Option<Decimal>,
    ) -> costing_core::Result<SellPrice> {
        let margin_percentage =
            margin_percentage.unwrap_or(self.policy.default_margin_percentage);
        let base_selling_price = apply_percentage(cost_per_unit, margin_percentage, "未稅售價")?;

        let (tax_percentage, selling_price_with_tax) = if include_tax {
            let tax = tax_percentage.unwrap_or(self.policy.default_tax_percentage);
            (Some(tax), Some(apply_percentage(base_selling_price, tax, "含稅售價")?))
        } else {
            (None, None)
        };

        let final_price = selling_price_with_tax.unwrap_or(base_selling_price);

        Ok(SellPrice {
            cost_per_unit,
            margin_percentage,
            base_selling_price,
            tax_percentage,
            selling_price_with_tax,
            final_price,
            rounded_price: ceil_to_step(final_price, self.policy.price_rounding_step)?,
        })
    }
}

/// value × (1 + percentage / 100)
fn apply_percentage(
    value: Decimal,
    percentage: Decimal,
    context: &str,
) -> costing_core::Result<Decimal> {
    let factor = math::add(Decimal::ONE, percentage / Decimal::ONE_HUNDRED, context)?;
    math::mul(value, factor, context)
}

/// 以預設策略計算最終售價（含稅時為含稅售價）
pub fn calculate_sell_price(
    cost_per_unit: Decimal,
    margin_percentage: Option<Decimal>,
    include_tax: bool,
    tax_percentage: Option<Decimal>,
) -> costing_core::Result<Decimal> {
    let price = SellPriceCalculator::default().calculate(
        cost_per_unit,
        margin_percentage,
        include_tax,
        tax_percentage,
    )?;
    Ok(price.final_price)
}

/// 無條件進位到 step 的倍數（僅用於顯示）
pub fn round_up_to_step(value: Decimal, step: Decimal) -> costing_core::Result<Decimal> {
    if step <= Decimal::ZERO {
        return Err(CostError::InvalidRoundingStep(step));
    }
    ceil_to_step(value, step)
}

fn ceil_to_step(value: Decimal, step: Decimal) -> costing_core::Result<Decimal> {
    math::mul(math::div(value, step, "售價進位")?.ceil(), step, "售價進位")
}
