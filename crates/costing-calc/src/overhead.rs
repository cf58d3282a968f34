//! 間接成本分攤（人工、電費、設備）

use costing_core::{math, CostingMode, GlobalCostRates, IngredientCatalog, Recipe, RecipePatch};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::weight::WeightCalculator;

/// 間接成本
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverheadCosts {
    pub labor_cost: Decimal,
    pub electricity_cost: Decimal,
    pub equipment_cost: Decimal,
}

impl OverheadCosts {
    pub fn new(labor_cost: Decimal, electricity_cost: Decimal, equipment_cost: Decimal) -> Self {
        Self {
            labor_cost,
            electricity_cost,
            equipment_cost,
        }
    }

    /// 間接成本合計
    pub fn total(&self) -> costing_core::Result<Decimal> {
        math::sum(
            [self.labor_cost, self.electricity_cost, self.equipment_cost],
            "間接成本合計",
        )
    }

    /// 按比例縮放：value × numerator / denominator
    ///
    /// 先乘後除，比例為 1 時結果與原值完全相同。
    pub fn scale(&self, numerator: Decimal, denominator: Decimal) -> costing_core::Result<Self> {
        let scale =
            |value: Decimal, context: &str| math::scale(value, numerator, denominator, context);
        Ok(Self {
            labor_cost: scale(self.labor_cost, "人工成本")?,
            electricity_cost: scale(self.electricity_cost, "電費成本")?,
            equipment_cost: scale(self.equipment_cost, "設備成本")?,
        })
    }

    /// 轉換為配方更新（標記為重量計算）
    pub fn to_patch(&self) -> RecipePatch {
        RecipePatch {
            labor_cost: Some(self.labor_cost),
            electricity_cost: Some(self.electricity_cost),
            equipment_cost: Some(self.equipment_cost),
            costing_mode: Some(CostingMode::WeightBased),
        }
    }
}

/// 重量計算的間接成本結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightBasedCosts {
    /// 待寫回的配方更新
    pub patch: RecipePatch,
    pub costs: OverheadCosts,
    pub total_grams: Decimal,
    pub unresolved_ids: Vec<String>,
}

/// 間接成本分攤器
pub struct OverheadAllocator;

impl OverheadAllocator {
    /// 依重量計算間接成本：每項 = ceil(每克費率 × 重量)
    pub fn from_weight(
        weight: Decimal,
        rates: &GlobalCostRates,
    ) -> costing_core::Result<OverheadCosts> {
        let weight = weight.max(Decimal::ZERO);
        let allocate = |rate: Decimal, context: &str| -> costing_core::Result<Decimal> {
            Ok(math::mul(rate, weight, context)?.ceil())
        };
        Ok(OverheadCosts {
            labor_cost: allocate(rates.labor_cost_per_gram, "人工成本")?,
            electricity_cost: allocate(rates.electricity_cost_per_gram, "電費成本")?,
            equipment_cost: allocate(rates.equipment_cost_per_gram, "設備成本")?,
        })
    }

    /// 讀取配方中儲存的間接成本，未設定的欄位視為 0
    pub fn manual(recipe: &Recipe) -> OverheadCosts {
        OverheadCosts {
            labor_cost: recipe.labor_cost.unwrap_or_default(),
            electricity_cost: recipe.electricity_cost.unwrap_or_default(),
            equipment_cost: recipe.equipment_cost.unwrap_or_default(),
        }
    }

    /// 以配方重量計算間接成本，返回待寫回的更新（不修改配方）
    pub fn apply_weight_based_costs(
        recipe: &Recipe,
        catalog: &IngredientCatalog,
        rates: &GlobalCostRates,
    ) -> costing_core::Result<WeightBasedCosts> {
        let weight = WeightCalculator::calculate(recipe, catalog)?;
        let costs = Self::from_weight(weight.total_grams, rates)?;

        tracing::debug!(
            "配方 {} 重量 {} 克，間接成本: 人工 {} / 電費 {} / 設備 {}",
            recipe.id,
            weight.total_grams,
            costs.labor_cost,
            costs.electricity_cost,
            costs.equipment_cost
        );

        Ok(WeightBasedCosts {
            patch: costs.to_patch(),
            costs,
            total_grams: weight.total_grams,
            unresolved_ids: weight.unresolved_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use costing_core::{CostError, Ingredient};
    use rstest::rstest;

    #[test]
    fn test_overhead_example() {
        let costs =
            OverheadAllocator::from_weight(Decimal::from(1000), &GlobalCostRates::default())
                .unwrap();

        assert_eq!(costs.labor_cost, Decimal::from(10000));
        assert_eq!(costs.electricity_cost, Decimal::from(5000));
        assert_eq!(costs.equipment_cost, Decimal::from(2000));
        assert_eq!(costs.total().unwrap(), Decimal::from(17000));
    }

    #[rstest]
    #[case(Decimal::from(-250), Decimal::ZERO)]
    #[case(Decimal::ZERO, Decimal::ZERO)]
    // 0.15 × 10 = 1.5 → 2
    #[case(Decimal::new(15, 2), Decimal::from(2))]
    fn test_weight_clamped_and_ceiled(#[case] weight: Decimal, #[case] expected_labor: Decimal) {
        let costs = OverheadAllocator::from_weight(weight, &GlobalCostRates::default()).unwrap();
        assert_eq!(costs.labor_cost, expected_labor);
    }

    #[test]
    fn test_overflow_reported() {
        let result = OverheadAllocator::from_weight(Decimal::MAX, &GlobalCostRates::default());
        assert!(matches!(result, Err(CostError::Overflow(_))));

        let huge = OverheadCosts::new(Decimal::MAX, Decimal::MAX, Decimal::ZERO);
        assert!(matches!(huge.total(), Err(CostError::Overflow(_))));
        assert!(huge.scale(Decimal::TWO, Decimal::ONE).is_err());
    }

    #[test]
    fn test_manual_costs_default_to_zero() {
        let mut recipe = Recipe::new(
            "RCP-001".to_string(),
            "Bar".to_string(),
            Decimal::from(10),
            "bars".to_string(),
        );
        recipe.labor_cost = Some(Decimal::from(800));

        let costs = OverheadAllocator::manual(&recipe);
        assert_eq!(
            costs,
            OverheadCosts::new(Decimal::from(800), Decimal::ZERO, Decimal::ZERO)
        );
    }

    #[test]
    fn test_apply_weight_based_costs() {
        let catalog = IngredientCatalog::from_slice(&[
            Ingredient::new(
                "ING-001".to_string(),
                "Couverture".to_string(),
                Decimal::from(1000),
                Decimal::from(150000),
            ),
            Ingredient::new(
                "ING-002".to_string(),
                "Foil".to_string(),
                Decimal::from(100),
                Decimal::from(5000),
            ),
        ]);
        let recipe = Recipe::new(
            "RCP-001".to_string(),
            "Bar".to_string(),
            Decimal::from(10),
            "bars".to_string(),
        )
        .with_manual_costs(Decimal::from(1), Decimal::from(1), Decimal::from(1))
        .with_ingredient("ING-001", Decimal::from(900))
        .with_shell_ingredient("ING-002", Decimal::from(100))
        .with_ingredient("ING-GONE", Decimal::from(50));

        let rates = GlobalCostRates::default();
        let result =
            OverheadAllocator::apply_weight_based_costs(&recipe, &catalog, &rates).unwrap();

        assert_eq!(result.total_grams, Decimal::from(1000));
        assert_eq!(result.patch.labor_cost, Some(Decimal::from(10000)));
        assert_eq!(result.patch.electricity_cost, Some(Decimal::from(5000)));
        assert_eq!(result.patch.equipment_cost, Some(Decimal::from(2000)));
        assert_eq!(result.patch.costing_mode, Some(CostingMode::WeightBased));
        assert_eq!(result.unresolved_ids, vec!["ING-GONE".to_string()]);
        // 原配方未被修改
        assert_eq!(recipe.labor_cost, Some(Decimal::ONE));
        assert_eq!(recipe.costing_mode, CostingMode::Manual);
    }

    #[test]
    fn test_scale_identity() {
        let costs = OverheadCosts::new(Decimal::from(1001), Decimal::from(7), Decimal::from(13));
        let yield_qty = Decimal::from(3);

        assert_eq!(costs.scale(yield_qty, yield_qty).unwrap(), costs);
        assert_eq!(
            costs.scale(Decimal::from(6), yield_qty).unwrap().labor_cost,
            Decimal::from(2002)
        );
    }
}
