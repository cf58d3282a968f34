//! 原料模型與原料目錄

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::CostError;

/// 原料（採購單位：一包）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    /// 原料ID
    pub id: String,

    /// 名稱
    pub name: String,

    /// 顯示單位（例如 "grams"）
    pub unit: String,

    /// 每包數量
    pub package_size: Decimal,

    /// 包裝單位
    pub package_unit: String,

    /// 每包價格
    pub price: Decimal,
}

impl Ingredient {
    /// 創建新的原料，單位預設為克
    pub fn new(id: String, name: String, package_size: Decimal, price: Decimal) -> Self {
        Self {
            id,
            name,
            unit: "grams".to_string(),
            package_size,
            package_unit: "grams".to_string(),
            price,
        }
    }

    /// 建構器模式：設置顯示單位
    pub fn with_unit(mut self, unit: String) -> Self {
        self.unit = unit;
        self
    }

    /// 建構器模式：設置包裝單位
    pub fn with_package_unit(mut self, package_unit: String) -> Self {
        self.package_unit = package_unit;
        self
    }

    /// 單位價格 = 每包價格 / 每包數量（未進位）
    pub fn unit_price(&self) -> crate::Result<Decimal> {
        if self.package_size <= Decimal::ZERO {
            return Err(CostError::InvalidPackageSize(self.id.clone()));
        }
        crate::math::div(self.price, self.package_size, &self.id)
    }
}

/// 原料目錄（唯讀查詢索引）
///
/// 同一 ID 出現多次時，以第一筆為準。
#[derive(Debug, Clone, Default)]
pub struct IngredientCatalog {
    ingredients: HashMap<String, Ingredient>,
}

impl IngredientCatalog {
    /// 創建空目錄
    pub fn new() -> Self {
        Self::default()
    }

    /// 從原料快照建立目錄
    pub fn from_slice(ingredients: &[Ingredient]) -> Self {
        ingredients.iter().cloned().collect()
    }

    /// 查詢原料
    pub fn get(&self, ingredient_id: &str) -> Option<&Ingredient> {
        self.ingredients.get(ingredient_id)
    }

    /// 檢查原料是否存在
    pub fn contains(&self, ingredient_id: &str) -> bool {
        self.ingredients.contains_key(ingredient_id)
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }
}

impl FromIterator<Ingredient> for IngredientCatalog {
    fn from_iter<I: IntoIterator<Item = Ingredient>>(iter: I) -> Self {
        let mut ingredients = HashMap::new();
        for ingredient in iter {
            ingredients
                .entry(ingredient.id.clone())
                .or_insert(ingredient);
        }
        Self { ingredients }
    }
}
