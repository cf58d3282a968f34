//! 批次更新配方間接成本
//!
//! 以目前的原料目錄與每克費率重算每個配方的重量間接成本，與已儲存的數值比較，
//! 產生待寫回的更新。本模組不負責寫回。

use chrono::{DateTime, Utc};
use costing_calc::{CostWarning, OverheadAllocator, OverheadCosts, WarningSeverity};
use costing_core::{
    CostError, CostingMode, GlobalCostRates, IngredientCatalog, Recipe, RecipePatch,
};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::RecipeDirtyTracker;

/// 單一配方的更新結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateEntry {
    pub recipe_id: String,
    pub recipe_name: String,
    /// 配方目前儲存的間接成本
    pub previous: OverheadCosts,
    pub previous_mode: CostingMode,
    pub total_grams: Decimal,
    pub patch: RecipePatch,
    /// 更新後與儲存值不同
    pub changed: bool,
}

/// 批次更新報告
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateReport {
    pub run_id: Uuid,
    pub calculated_at: DateTime<Utc>,
    pub entries: Vec<BatchUpdateEntry>,
    pub warnings: Vec<CostWarning>,
}

impl BatchUpdateReport {
    fn new(entries: Vec<BatchUpdateEntry>, warnings: Vec<CostWarning>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            calculated_at: Utc::now(),
            entries,
            warnings,
        }
    }

    /// 需要寫回的更新
    pub fn changed_patches(&self) -> Vec<(&str, &RecipePatch)> {
        self.entries
            .iter()
            .filter(|entry| entry.changed)
            .map(|entry| (entry.recipe_id.as_str(), &entry.patch))
            .collect()
    }

    pub fn changed_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.changed).count()
    }

    /// 無法重算而被略過的配方ID
    pub fn failed_recipe_ids(&self) -> Vec<&str> {
        self.warnings
            .iter()
            .filter(|warning| warning.severity == WarningSeverity::Error)
            .map(|warning| warning.recipe_id.as_str())
            .collect()
    }
}

/// 批次成本更新器
pub struct BatchCostUpdater {
    catalog: IngredientCatalog,
    rates: GlobalCostRates,
}

impl BatchCostUpdater {
    /// 創建新的更新器
    pub fn new(catalog: IngredientCatalog, rates: GlobalCostRates) -> costing_core::Result<Self> {
        rates.validate()?;
        Ok(Self { catalog, rates })
    }

    /// 重算所有配方（並行）
    pub fn run(&self, recipes: &[Recipe]) -> BatchUpdateReport {
        tracing::info!("開始批次更新間接成本：配方 {} 筆", recipes.len());
        let start_time = std::time::Instant::now();

        let results: Vec<(Option<BatchUpdateEntry>, Vec<CostWarning>)> =
            recipes.par_iter().map(|recipe| self.update_recipe(recipe)).collect();

        let mut entries = Vec::with_capacity(results.len());
        let mut warnings = Vec::new();
        for (entry, entry_warnings) in results {
            entries.extend(entry);
            warnings.extend(entry_warnings);
        }

        let report = BatchUpdateReport::new(entries, warnings);

        tracing::info!(
            "批次更新完成，耗時 {:?}，需更新 {} 筆，警告 {} 筆",
            start_time.elapsed(),
            report.changed_count(),
            report.warnings.len()
        );

        report
    }

    /// 只重算指定的配方
    pub fn run_selected(
        &self,
        recipes: &[Recipe],
        recipe_ids: &[String],
    ) -> costing_core::Result<BatchUpdateReport> {
        let mut selected = Vec::with_capacity(recipe_ids.len());
        for recipe_id in recipe_ids {
            let recipe = recipes
                .iter()
                .find(|recipe| &recipe.id == recipe_id)
                .ok_or_else(|| CostError::RecipeNotFound(recipe_id.clone()))?;
            selected.push(recipe.clone());
        }
        Ok(self.run(&selected))
    }

    /// 重算髒標記的配方，已不存在的配方會被略過
    pub fn run_dirty(
        &self,
        recipes: &[Recipe],
        tracker: &mut RecipeDirtyTracker,
    ) -> BatchUpdateReport {
        let dirty_ids = tracker.take_dirty();
        let selected: Vec<Recipe> = dirty_ids
            .iter()
            .filter_map(|recipe_id| {
                let recipe = recipes.iter().find(|recipe| &recipe.id == recipe_id);
                if recipe.is_none() {
                    tracing::debug!("髒配方 {} 已不存在，略過", recipe_id);
                }
                recipe.cloned()
            })
            .collect();
        self.run(&selected)
    }

    /// 重算單一配方；失敗時不產生更新，只記錄錯誤
    fn update_recipe(&self, recipe: &Recipe) -> (Option<BatchUpdateEntry>, Vec<CostWarning>) {
        let result =
            OverheadAllocator::apply_weight_based_costs(recipe, &self.catalog, &self.rates);
        let weight_based = match result {
            Ok(weight_based) => weight_based,
            Err(error) => {
                tracing::error!("配方 {} 重算失敗，已略過: {}", recipe.id, error);
                let warning = CostWarning::error(recipe.id.clone(), error.to_string());
                return (None, vec![warning]);
            }
        };
        let previous = OverheadAllocator::manual(recipe);
        let changed = previous != weight_based.costs
            || recipe.costing_mode != CostingMode::WeightBased;

        let warnings = weight_based
            .unresolved_ids
            .iter()
            .map(|id| CostWarning::unresolved_ingredient(&recipe.id, id))
            .collect();

        let entry = BatchUpdateEntry {
            recipe_id: recipe.id.clone(),
            recipe_name: recipe.name.clone(),
            previous,
            previous_mode: recipe.costing_mode,
            total_grams: weight_based.total_grams,
            patch: weight_based.patch,
            changed,
        };

        (Some(entry), warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use costing_core::Ingredient;

    fn catalog() -> IngredientCatalog {
        IngredientCatalog::from_slice(&[
            Ingredient::new(
                "ING-COCOA".to_string(),
                "Cocoa mass".to_string(),
                Decimal::from(1000),
                Decimal::from(90000),
            ),
            Ingredient::new(
                "ING-CREAM".to_string(),
                "Cream".to_string(),
                Decimal::from(1000),
                Decimal::from(40000),
            ),
        ])
    }

    fn recipes() -> Vec<Recipe> {
        let bar = Recipe::new(
            "RCP-BAR".to_string(),
            "Bar".to_string(),
            Decimal::from(10),
            "bars".to_string(),
        )
        .with_ingredient("ING-COCOA", Decimal::from(1000))
        .with_manual_costs(Decimal::from(500), Decimal::from(100), Decimal::from(100));

        // 已是最新的重量計算結果：200 克
        let bonbon = Recipe::new(
            "RCP-BONBON".to_string(),
            "Bonbon".to_string(),
            Decimal::from(40),
            "pcs".to_string(),
        )
        .with_ingredient("ING-CREAM", Decimal::from(100))
        .with_shell_ingredient("ING-COCOA", Decimal::from(100))
        .with_ingredient("ING-GONE", Decimal::from(20))
        .with_patch(&stored_costs(2000, 1000, 400));

        vec![bar, bonbon]
    }

    fn stored_costs(labor: i64, electricity: i64, equipment: i64) -> RecipePatch {
        OverheadCosts::new(labor.into(), electricity.into(), equipment.into()).to_patch()
    }

    fn updater() -> BatchCostUpdater {
        BatchCostUpdater::new(catalog(), GlobalCostRates::default()).unwrap()
    }

    #[test]
    fn test_run_all() {
        let report = updater().run(&recipes());

        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[0].recipe_id, "RCP-BAR");
        assert_eq!(report.entries[0].total_grams, Decimal::from(1000));
        assert_eq!(report.entries[0].patch.labor_cost, Some(Decimal::from(10000)));
        assert!(report.entries[0].changed);

        assert_eq!(report.entries[1].total_grams, Decimal::from(200));
        assert!(!report.entries[1].changed);

        assert_eq!(report.changed_count(), 1);
        let patches = report.changed_patches();
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].0, "RCP-BAR");

        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].recipe_id, "RCP-BONBON");
        assert!(report.failed_recipe_ids().is_empty());
    }

    #[test]
    fn test_overflowing_recipe_skipped_with_error() {
        let mut recipes = recipes();
        recipes.push(
            Recipe::new(
                "RCP-HUGE".to_string(),
                "Huge".to_string(),
                Decimal::ONE,
                "pcs".to_string(),
            )
            .with_ingredient("ING-COCOA", Decimal::MAX),
        );

        let report = updater().run(&recipes);

        assert_eq!(report.entries.len(), 2);
        assert!(report.entries.iter().all(|entry| entry.recipe_id != "RCP-HUGE"));
        assert_eq!(report.failed_recipe_ids(), vec!["RCP-HUGE"]);

        let error = report
            .warnings
            .iter()
            .find(|warning| warning.recipe_id == "RCP-HUGE")
            .unwrap();
        assert_eq!(error.severity, WarningSeverity::Error);
        assert!(error.ingredient_id.is_none());
    }

    #[test]
    fn test_run_selected_unknown_recipe() {
        let result = updater().run_selected(&recipes(), &["RCP-MISSING".to_string()]);
        assert!(matches!(result, Err(CostError::RecipeNotFound(id)) if id == "RCP-MISSING"));
    }

    #[test]
    fn test_run_selected() {
        let report = updater()
            .run_selected(&recipes(), &["RCP-BONBON".to_string()])
            .unwrap();

        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.changed_count(), 0);
    }

    #[test]
    fn test_run_dirty_after_rate_change() {
        let recipes = recipes();
        let mut tracker = RecipeDirtyTracker::from_recipes(&recipes);
        tracker.mark_rates_changed();

        let rates = GlobalCostRates::new(Decimal::from(20), Decimal::from(5), Decimal::from(2));
        let updater = BatchCostUpdater::new(catalog(), rates).unwrap();
        let report = updater.run_dirty(&recipes, &mut tracker);

        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].recipe_id, "RCP-BONBON");
        assert_eq!(report.entries[0].patch.labor_cost, Some(Decimal::from(4000)));
        assert!(report.entries[0].changed);
        assert!(tracker.take_dirty().is_empty());
    }
}
