//! 配方成本主計算器

use costing_core::{GlobalCostRates, IngredientCatalog, PricingPolicy, Recipe};
use rust_decimal::Decimal;

use crate::base_cost::BaseCostCalculator;
use crate::overhead::{OverheadAllocator, WeightBasedCosts};
use crate::pricing::SellPriceCalculator;
use crate::production::ProductionCostCalculator;
use crate::weight::WeightCalculator;
use crate::{record_unresolved, CostResult, CostWarning};

/// 配方成本計算器
pub struct RecipeCostCalculator {
    /// 原料目錄快照
    catalog: IngredientCatalog,

    /// 每克費率
    rates: GlobalCostRates,

    /// 售價計算
    pricing: SellPriceCalculator,
}

impl RecipeCostCalculator {
    /// 創建新的計算器
    pub fn new(
        catalog: IngredientCatalog,
        rates: GlobalCostRates,
        policy: PricingPolicy,
    ) -> costing_core::Result<Self> {
        rates.validate()?;
        Ok(Self {
            catalog,
            rates,
            pricing: SellPriceCalculator::new(policy)?,
        })
    }

    /// 主計算入口：計算指定生產數量的成本與售價
    pub fn calculate(
        &self,
        recipe: &Recipe,
        quantity: Decimal,
        include_tax: bool,
    ) -> costing_core::Result<CostResult> {
        tracing::info!(
            "開始計算配方 {} ({})：生產數量 {}，模式 {:?}",
            recipe.id,
            recipe.name,
            quantity,
            recipe.costing_mode
        );

        let start_time = std::time::Instant::now();
        recipe.validate()?;

        // Step 1: 重量彙總
        tracing::debug!("Step 1: 重量彙總");
        let weight = WeightCalculator::calculate(recipe, &self.catalog)?;
        tracing::debug!("配方總重量: {} 克", weight.total_grams);

        // Step 2: 外殼用料成本（另計）
        tracing::debug!("Step 2: 外殼用料成本");
        let shell = BaseCostCalculator::calculate_shell(recipe, &self.catalog)?;

        // Step 3: 生產成本（原料 + 間接成本 + 不良損耗）
        tracing::debug!("Step 3: 生產成本彙總");
        let production =
            ProductionCostCalculator::calculate(recipe, &self.catalog, &self.rates, quantity)?;
        tracing::debug!(
            "生產成本 {}，不良損耗 {}，單位成本 {}",
            production.production_cost,
            production.reject_cost,
            production.cost_per_unit
        );

        // Step 4: 售價
        tracing::debug!("Step 4: 售價計算");
        let price = self.pricing.calculate(
            production.cost_per_unit,
            recipe.margin_percentage,
            include_tax,
            recipe.tax_percentage,
        )?;

        // Step 5: 收集警告
        let mut unresolved_ids = Vec::new();
        for id in weight
            .unresolved_ids
            .iter()
            .chain(shell.unresolved_ids.iter())
            .chain(production.unresolved_ids.iter())
        {
            record_unresolved(&mut unresolved_ids, id);
        }

        let mut result = CostResult {
            recipe_id: recipe.id.clone(),
            weight,
            shell_material_cost: shell.total,
            production,
            price,
            warnings: Vec::new(),
            calculation_time_ms: None,
        };

        for id in &unresolved_ids {
            tracing::warn!("配方 {} 引用的原料 {} 不存在，已略過", recipe.id, id);
            result.add_warning(CostWarning::unresolved_ingredient(&recipe.id, id));
        }

        if recipe.ingredients.is_empty() && recipe.shell_ingredients.is_empty() {
            result.add_warning(CostWarning::info(
                recipe.id.clone(),
                "配方沒有任何用料".to_string(),
            ));
        }

        result.calculation_time_ms = Some(start_time.elapsed().as_millis());

        tracing::info!(
            "配方 {} 計算完成，耗時 {:?}，售價 {}",
            recipe.id,
            start_time.elapsed(),
            result.price.rounded_price
        );

        Ok(result)
    }

    /// 以配方產量作為生產數量計算
    pub fn calculate_at_yield(
        &self,
        recipe: &Recipe,
        include_tax: bool,
    ) -> costing_core::Result<CostResult> {
        self.calculate(recipe, recipe.yield_qty, include_tax)
    }

    /// 以目前費率計算重量間接成本，返回待寫回的更新
    pub fn apply_weight_based_costs(
        &self,
        recipe: &Recipe,
    ) -> costing_core::Result<WeightBasedCosts> {
        OverheadAllocator::apply_weight_based_costs(recipe, &self.catalog, &self.rates)
    }

    /// 獲取原料目錄引用
    pub fn catalog(&self) -> &IngredientCatalog {
        &self.catalog
    }

    /// 獲取費率
    pub fn rates(&self) -> &GlobalCostRates {
        &self.rates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WarningSeverity;
    use costing_core::{CostError, CostingMode, Ingredient};

    fn calculator() -> RecipeCostCalculator {
        let catalog = IngredientCatalog::from_slice(&[
            Ingredient::new(
                "ING-001".to_string(),
                "Couverture".to_string(),
                Decimal::from(1000),
                Decimal::from(150000),
            ),
            Ingredient::new(
                "ING-002".to_string(),
                "Gold leaf box".to_string(),
                Decimal::from(10),
                Decimal::from(30000),
            ),
        ]);
        RecipeCostCalculator::new(catalog, GlobalCostRates::default(), PricingPolicy::default())
            .unwrap()
    }

    fn recipe() -> Recipe {
        Recipe::new(
            "RCP-001".to_string(),
            "Bonbon box".to_string(),
            Decimal::from(10),
            "boxes".to_string(),
        )
        .with_ingredient("ING-001", Decimal::from(100))
        .with_shell_ingredient("ING-002", Decimal::from(10))
        .with_manual_costs(Decimal::from(3000), Decimal::from(1000), Decimal::from(1000))
        .with_margin_percentage(Decimal::from(30))
        .with_tax_percentage(Decimal::from(10))
    }

    #[test]
    fn test_full_pipeline() {
        let result = calculator().calculate_at_yield(&recipe(), true).unwrap();

        // 原料 100 × 150 = 15000，間接 5000 → 20000 / 10 = 2000
        assert_eq!(result.weight.total_grams, Decimal::from(110));
        assert_eq!(result.shell_material_cost, Decimal::from(30000));
        assert_eq!(result.production.production_cost, Decimal::from(20000));
        assert_eq!(result.production.cost_per_unit, Decimal::from(2000));
        assert_eq!(result.price.base_selling_price, Decimal::from(2600));
        assert_eq!(result.price.final_price, Decimal::from(2860));
        assert_eq!(result.price.rounded_price, Decimal::from(3000));
        assert!(result.warnings.is_empty());
        assert!(result.calculation_time_ms.is_some());
    }

    #[test]
    fn test_unresolved_ingredient_warning_deduplicated() {
        let recipe = recipe()
            .with_ingredient("ING-GONE", Decimal::from(5))
            .with_shell_ingredient("ING-GONE", Decimal::from(5));

        let result = calculator().calculate_at_yield(&recipe, false).unwrap();

        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].ingredient_id.as_deref(), Some("ING-GONE"));
        assert_eq!(result.warnings[0].severity, WarningSeverity::Warning);
        assert!(result.has_unresolved_ingredients());
    }

    #[test]
    fn test_empty_recipe_info() {
        let recipe = Recipe::new(
            "RCP-EMPTY".to_string(),
            "Empty".to_string(),
            Decimal::ONE,
            "pcs".to_string(),
        );

        let result = calculator().calculate_at_yield(&recipe, false).unwrap();

        assert_eq!(result.production.total_production_cost, Decimal::ZERO);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].severity, WarningSeverity::Info);
        assert!(!result.has_unresolved_ingredients());
    }

    #[test]
    fn test_weight_based_round_trip() {
        let calculator = calculator();
        let original = recipe();
        let weight_based = calculator.apply_weight_based_costs(&original).unwrap();
        let updated = original.with_patch(&weight_based.patch);

        let result = calculator.calculate_at_yield(&updated, false).unwrap();

        assert_eq!(updated.costing_mode, CostingMode::WeightBased);
        // 110 克 × (10 + 5 + 2)
        assert_eq!(result.production.overhead.total().unwrap(), Decimal::from(1870));
    }

    #[test]
    fn test_invalid_rates_rejected() {
        let rates = GlobalCostRates::new(Decimal::from(-1), Decimal::ZERO, Decimal::ZERO);
        let result =
            RecipeCostCalculator::new(IngredientCatalog::new(), rates, PricingPolicy::default());
        assert!(matches!(result, Err(CostError::InvalidRate(_))));
    }
}
