//! 原料基礎成本計算
//!
//! 單位價格與用量都先無條件進位到整數再相乘，估算只會偏高不會偏低。

use costing_core::{math, IngredientCatalog, Recipe, RecipeIngredient};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::record_unresolved;

/// 單一用料的成本明細
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostLine {
    pub ingredient_id: String,
    pub ingredient_name: String,
    /// 進位後的單位價格
    pub unit_price: Decimal,
    /// 進位後的計價用量
    pub billed_amount: Decimal,
    pub cost: Decimal,
}

/// 基礎原料成本
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseCost {
    pub total: Decimal,
    pub lines: Vec<CostLine>,
    pub unresolved_ids: Vec<String>,
}

/// 基礎成本計算器
pub struct BaseCostCalculator;

impl BaseCostCalculator {
    /// 計算主要用料成本（不含外殼用料）
    pub fn calculate(
        recipe: &Recipe,
        catalog: &IngredientCatalog,
    ) -> costing_core::Result<BaseCost> {
        Self::price_items(&recipe.ingredients, catalog)
    }

    /// 計算外殼用料成本（另計，不併入基礎成本）
    pub fn calculate_shell(
        recipe: &Recipe,
        catalog: &IngredientCatalog,
    ) -> costing_core::Result<BaseCost> {
        Self::price_items(&recipe.shell_ingredients, catalog)
    }

    fn price_items(
        items: &[RecipeIngredient],
        catalog: &IngredientCatalog,
    ) -> costing_core::Result<BaseCost> {
        let mut result = BaseCost::default();

        for item in items {
            let Some(ingredient) = catalog.get(&item.ingredient_id) else {
                record_unresolved(&mut result.unresolved_ids, &item.ingredient_id);
                continue;
            };

            let unit_price = ingredient.unit_price()?.ceil();
            let billed_amount = item.amount.ceil();
            let cost = math::mul(unit_price, billed_amount, &ingredient.id)?;

            result.total = math::add(result.total, cost, "原料成本合計")?;
            result.lines.push(CostLine {
                ingredient_id: ingredient.id.clone(),
                ingredient_name: ingredient.name.clone(),
                unit_price,
                billed_amount,
                cost,
            });
        }

        Ok(result)
    }
}

/// 計算配方基礎原料成本
pub fn calculate_recipe_cost(
    recipe: &Recipe,
    catalog: &IngredientCatalog,
) -> costing_core::Result<Decimal> {
    Ok(BaseCostCalculator::calculate(recipe, catalog)?.total)
}
