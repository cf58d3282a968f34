//! 巧克力配方成本計算示例

use recipe_costing::{
    BatchCostUpdater, CostReportRow, GlobalCostRates, Ingredient, IngredientCatalog,
    PricingPolicy, Recipe, RecipeCostCalculator, RecipeDirtyTracker,
};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== 巧克力配方成本計算示例 ===\n");

    // 原料目錄
    let ingredients = vec![
        Ingredient::new(
            "ING-DARK".to_string(),
            "Dark couverture 70%".to_string(),
            Decimal::from(1000),
            Decimal::from(150000),
        ),
        Ingredient::new(
            "ING-CREAM".to_string(),
            "Heavy cream".to_string(),
            Decimal::from(1000),
            Decimal::from(45000),
        ),
        Ingredient::new(
            "ING-SHELL".to_string(),
            "Milk shell".to_string(),
            Decimal::from(500),
            Decimal::from(60000),
        )
        .with_package_unit("tray".to_string()),
    ];
    let catalog = IngredientCatalog::from_slice(&ingredients);

    // 每克費率（尚未儲存過時使用預設值）
    let rates = GlobalCostRates::load_or_default(None)?;
    println!("每克費率: {}", rates.to_json()?);

    let recipe = Recipe::new(
        "RCP-GANACHE".to_string(),
        "Ganache bonbon".to_string(),
        Decimal::from(50),
        "pcs".to_string(),
    )
    .with_ingredient("ING-DARK", Decimal::from(400))
    .with_ingredient("ING-CREAM", Decimal::from(250))
    .with_shell_ingredient("ING-SHELL", Decimal::from(330))
    .with_manual_costs(Decimal::from(20000), Decimal::from(5000), Decimal::from(3000))
    .with_reject_percentage(Decimal::from(4))
    .with_margin_percentage(Decimal::from(30));

    let calculator = RecipeCostCalculator::new(catalog.clone(), rates, PricingPolicy::default())?;

    // 手動間接成本
    let manual = calculator.calculate(&recipe, Decimal::from(200), true)?;
    println!("\n手動間接成本（生產 200 個）:");
    let row = CostReportRow::from_result(&recipe, &manual);
    println!("{}", serde_json::to_string_pretty(&row)?);

    // 改用重量計算
    let weight_based = calculator.apply_weight_based_costs(&recipe)?;
    println!("\n重量計算更新: {}", serde_json::to_string(&weight_based.patch)?);
    let updated = recipe.with_patch(&weight_based.patch);

    let result = calculator.calculate(&updated, Decimal::from(200), true)?;
    println!("\n重量計算（生產 200 個）:");
    let row = CostReportRow::from_result(&updated, &result);
    println!("{}", serde_json::to_string_pretty(&row)?);

    // 費率調整後批次更新
    let recipes = vec![updated];
    let mut tracker = RecipeDirtyTracker::from_recipes(&recipes);
    tracker.mark_rates_changed();

    let new_rates = GlobalCostRates::new(Decimal::from(12), Decimal::from(5), Decimal::from(2));
    let report = BatchCostUpdater::new(catalog, new_rates)?.run_dirty(&recipes, &mut tracker);
    println!("\n批次更新 {}：需寫回 {} 筆", report.run_id, report.changed_count());
    for (recipe_id, patch) in report.changed_patches() {
        println!("  - {}: {}", recipe_id, serde_json::to_string(patch)?);
    }

    Ok(())
}
