//! # Recipe Costing
//!
//! 巧克力配方成本計算：原料成本、重量間接成本、生產成本彙總與售價

pub use costing_batch as batch;
pub use costing_calc as calc;
pub use costing_core as model;

pub use costing_batch::{BatchCostUpdater, BatchUpdateReport, RecipeDirtyTracker};
pub use costing_calc::{
    calculate_recipe_cost, calculate_recipe_weight, calculate_sell_price, round_up_to_step,
    CostReportRow, CostResult, CostWarning, OverheadAllocator, ProductionCostCalculator,
    RecipeCostCalculator, WarningSeverity,
};
pub use costing_core::{
    CostError, CostingMode, GlobalCostRates, Ingredient, IngredientCatalog, PricingPolicy,
    Recipe, RecipeIngredient, RecipePatch,
};
