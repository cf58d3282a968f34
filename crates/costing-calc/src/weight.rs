//! 配方重量彙總

use costing_core::{math, IngredientCatalog, Recipe, RecipeIngredient};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::record_unresolved;

/// 配方重量（克）
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeWeight {
    /// 主要用料重量
    pub recipe_grams: Decimal,
    /// 外殼用料重量
    pub shell_grams: Decimal,
    /// 總重量
    pub total_grams: Decimal,
    /// 目錄中找不到的原料ID
    pub unresolved_ids: Vec<String>,
}

/// 重量彙總器
pub struct WeightCalculator;

impl WeightCalculator {
    /// 計算配方重量
    ///
    /// 主要用料與外殼用料合併計入總重量。找不到原料的用料會被略過，
    /// 並記錄在 `unresolved_ids`。
    pub fn calculate(
        recipe: &Recipe,
        catalog: &IngredientCatalog,
    ) -> costing_core::Result<RecipeWeight> {
        let mut unresolved_ids = Vec::new();

        let recipe_grams = Self::sum_resolved(&recipe.ingredients, catalog, &mut unresolved_ids)?;
        let shell_grams =
            Self::sum_resolved(&recipe.shell_ingredients, catalog, &mut unresolved_ids)?;

        Ok(RecipeWeight {
            recipe_grams,
            shell_grams,
            total_grams: math::add(recipe_grams, shell_grams, "配方總重量")?,
            unresolved_ids,
        })
    }

    fn sum_resolved(
        items: &[RecipeIngredient],
        catalog: &IngredientCatalog,
        unresolved_ids: &mut Vec<String>,
    ) -> costing_core::Result<Decimal> {
        let mut total = Decimal::ZERO;
        for item in items {
            if catalog.contains(&item.ingredient_id) {
                total = math::add(total, item.amount, "配方重量")?;
            } else {
                record_unresolved(unresolved_ids, &item.ingredient_id);
            }
        }
        Ok(total)
    }
}

/// 計算配方總重量（克）
pub fn calculate_recipe_weight(
    recipe: &Recipe,
    catalog: &IngredientCatalog,
) -> costing_core::Result<Decimal> {
    Ok(WeightCalculator::calculate(recipe, catalog)?.total_grams)
}
