//! 生產成本彙總

use costing_core::{math, CostError, CostingMode, GlobalCostRates, IngredientCatalog, Recipe};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::base_cost::BaseCostCalculator;
use crate::overhead::{OverheadAllocator, OverheadCosts};
use crate::record_unresolved;
use crate::weight::WeightCalculator;

/// 生產成本計算結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionCost {
    /// 生產數量
    pub quantity: Decimal,
    /// 按數量縮放後的總重量（克）
    pub total_grams: Decimal,
    /// 按數量縮放後的原料成本
    pub base_material_cost: Decimal,
    /// 按數量縮放後的間接成本
    pub overhead: OverheadCosts,
    /// 間接成本來源
    pub costing_mode: CostingMode,
    /// 原料 + 間接成本
    pub production_cost: Decimal,
    pub reject_percentage: Decimal,
    /// 不良損耗成本
    pub reject_cost: Decimal,
    /// 總生產成本（含不良損耗）
    pub total_production_cost: Decimal,
    /// 單位成本
    pub cost_per_unit: Decimal,
    pub unresolved_ids: Vec<String>,
}

/// 生產成本計算器
pub struct ProductionCostCalculator;

impl ProductionCostCalculator {
    /// 計算指定生產數量的成本
    ///
    /// 數值按 `quantity / yield` 線性縮放。重量計算模式下，間接成本由縮放後的
    /// 重量重新計算，而不是縮放已儲存的數值。
    pub fn calculate(
        recipe: &Recipe,
        catalog: &IngredientCatalog,
        rates: &GlobalCostRates,
        quantity: Decimal,
    ) -> costing_core::Result<ProductionCost> {
        recipe.validate()?;
        if quantity <= Decimal::ZERO {
            return Err(CostError::InvalidQuantity(quantity));
        }

        let yield_qty = recipe.yield_qty;
        let base = BaseCostCalculator::calculate(recipe, catalog)?;
        let weight = WeightCalculator::calculate(recipe, catalog)?;

        let mut unresolved_ids = base.unresolved_ids;
        for id in &weight.unresolved_ids {
            record_unresolved(&mut unresolved_ids, id);
        }

        // (base / yield) × quantity，先乘後除避免比例為 1 時產生誤差
        let base_material_cost = math::scale(base.total, quantity, yield_qty, "原料成本")?;
        let total_grams = math::scale(weight.total_grams, quantity, yield_qty, "生產重量")?;

        let overhead = match recipe.costing_mode {
            CostingMode::Manual => {
                let stored = OverheadAllocator::manual(recipe);
                stored.scale(quantity, yield_qty)?
            }
            CostingMode::WeightBased => OverheadAllocator::from_weight(total_grams, rates)?,
        };

        let production_cost = math::add(base_material_cost, overhead.total()?, "生產成本")?;

        let reject_percentage = recipe.reject_percentage.unwrap_or_default();
        let reject_cost = math::scale(
            production_cost,
            reject_percentage,
            Decimal::ONE_HUNDRED,
            "不良損耗",
        )?;
        let total_production_cost = math::add(production_cost, reject_cost, "總生產成本")?;
        let cost_per_unit = math::div(total_production_cost, quantity, "單位成本")?;

        Ok(ProductionCost {
            quantity,
            total_grams,
            base_material_cost,
            overhead,
            costing_mode: recipe.costing_mode,
            production_cost,
            reject_percentage,
            reject_cost,
            total_production_cost,
            cost_per_unit,
            unresolved_ids,
        })
    }
}
