//! 報表列（供 Excel / PDF 匯出使用）

use costing_core::Recipe;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::CostResult;

/// 一列成本報表資料
///
/// 欄位順序與工作表名稱由匯出端決定。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostReportRow {
    pub recipe_id: String,
    pub recipe_name: String,
    pub quantity: Decimal,
    pub yield_unit: String,
    /// 生產數量對應的總重量（克）
    pub total_grams: Decimal,
    pub base_material_cost: Decimal,
    pub shell_material_cost: Decimal,
    pub labor_cost: Decimal,
    pub electricity_cost: Decimal,
    pub equipment_cost: Decimal,
    pub reject_cost: Decimal,
    pub total_production_cost: Decimal,
    pub cost_per_unit: Decimal,
    pub base_selling_price: Decimal,
    pub selling_price_with_tax: Option<Decimal>,
    pub rounded_price: Decimal,
    pub warning_count: usize,
}

impl CostReportRow {
    pub fn from_result(recipe: &Recipe, result: &CostResult) -> Self {
        let production = &result.production;
        Self {
            recipe_id: recipe.id.clone(),
            recipe_name: recipe.name.clone(),
            quantity: production.quantity,
            yield_unit: recipe.yield_unit.clone(),
            total_grams: production.total_grams,
            base_material_cost: production.base_material_cost,
            shell_material_cost: result.shell_material_cost,
            labor_cost: production.overhead.labor_cost,
            electricity_cost: production.overhead.electricity_cost,
            equipment_cost: production.overhead.equipment_cost,
            reject_cost: production.reject_cost,
            total_production_cost: production.total_production_cost,
            cost_per_unit: production.cost_per_unit,
            base_selling_price: result.price.base_selling_price,
            selling_price_with_tax: result.price.selling_price_with_tax,
            rounded_price: result.price.rounded_price,
            warning_count: result.warnings.len(),
        }
    }
}
