//! # Costing Calculation Engine
//!
//! 配方成本與售價計算管線：
//! 重量彙總 → 原料成本 → 間接成本分攤 → 生產成本彙總 → 售價

pub mod base_cost;
pub mod calculator;
pub mod overhead;
pub mod pricing;
pub mod production;
pub mod report;
pub mod weight;

// Re-export 主要類型
pub use base_cost::{calculate_recipe_cost, BaseCost, BaseCostCalculator, CostLine};
pub use calculator::RecipeCostCalculator;
pub use overhead::{OverheadAllocator, OverheadCosts, WeightBasedCosts};
pub use pricing::{calculate_sell_price, round_up_to_step, SellPrice, SellPriceCalculator};
pub use production::{ProductionCost, ProductionCostCalculator};
pub use report::CostReportRow;
pub use weight::{calculate_recipe_weight, RecipeWeight, WeightCalculator};

use rust_decimal::Decimal;
use serde::Serialize;

/// 配方成本計算結果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostResult {
    pub recipe_id: String,

    /// 配方重量（未縮放）
    pub weight: RecipeWeight,

    /// 外殼用料成本（另計，未縮放）
    pub shell_material_cost: Decimal,

    /// 生產成本
    pub production: ProductionCost,

    /// 售價
    pub price: SellPrice,

    /// 警告信息
    pub warnings: Vec<CostWarning>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl CostResult {
    /// 添加警告
    pub fn add_warning(&mut self, warning: CostWarning) {
        self.warnings.push(warning);
    }

    /// 是否有引用失效的原料
    pub fn has_unresolved_ingredients(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| w.ingredient_id.is_some() && w.severity == WarningSeverity::Warning)
    }
}

/// 成本計算警告
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostWarning {
    pub recipe_id: String,
    pub ingredient_id: Option<String>,
    pub message: String,
    pub severity: WarningSeverity,
}

impl CostWarning {
    pub fn new(recipe_id: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            recipe_id,
            ingredient_id: None,
            message,
            severity,
        }
    }

    pub fn info(recipe_id: String, message: String) -> Self {
        Self::new(recipe_id, message, WarningSeverity::Info)
    }

    pub fn warning(recipe_id: String, message: String) -> Self {
        Self::new(recipe_id, message, WarningSeverity::Warning)
    }

    /// 配方無法計算（已略過）
    pub fn error(recipe_id: String, message: String) -> Self {
        Self::new(recipe_id, message, WarningSeverity::Error)
    }

    /// 原料引用失效（原料可能已被刪除）
    pub fn unresolved_ingredient(recipe_id: &str, ingredient_id: &str) -> Self {
        Self {
            ingredient_id: Some(ingredient_id.to_string()),
            ..Self::warning(
                recipe_id.to_string(),
                format!("找不到原料 {}，已略過", ingredient_id),
            )
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarningSeverity {
    Info,
    /// 結果仍可用，但部分用料被略過
    Warning,
    /// 無法產生結果
    Error,
}

/// 記錄找不到的原料ID（去重，保留首次出現順序）
pub(crate) fn record_unresolved(unresolved_ids: &mut Vec<String>, ingredient_id: &str) {
    if !unresolved_ids.iter().any(|id| id == ingredient_id) {
        unresolved_ids.push(ingredient_id.to_string());
    }
}
