//! # Costing Core
//!
//! 配方成本計算的核心資料模型與類型定義

pub mod config;
pub mod ingredient;
pub mod math;
pub mod recipe;

// Re-export 主要類型
pub use config::{GlobalCostRates, PricingPolicy};
pub use ingredient::{Ingredient, IngredientCatalog};
pub use recipe::{CostingMode, Recipe, RecipeIngredient, RecipePatch};

use rust_decimal::Decimal;

/// 成本計算錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum CostError {
    #[error("配方 {recipe_id} 的產量無效: {yield_qty}（必須大於 0）")]
    InvalidYield { recipe_id: String, yield_qty: Decimal },

    #[error("生產數量無效: {0}（必須大於 0）")]
    InvalidQuantity(Decimal),

    #[error("原料 {0} 的包裝規格無效（必須大於 0）")]
    InvalidPackageSize(String),

    #[error("每克費率無效: {0}")]
    InvalidRate(String),

    #[error("售價進位單位無效: {0}（必須大於 0）")]
    InvalidRoundingStep(Decimal),

    #[error("配置解析錯誤: {0}")]
    InvalidConfig(String),

    #[error("數值溢位: {0}")]
    Overflow(String),

    #[error("序列化錯誤: {0}")]
    Serialization(String),

    #[error("找不到配方: {0}")]
    RecipeNotFound(String),
}

pub type Result<T> = std::result::Result<T, CostError>;
