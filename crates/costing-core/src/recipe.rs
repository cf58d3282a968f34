//! 配方模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::CostError;

/// 間接成本來源
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CostingMode {
    /// 手動輸入的固定成本
    #[default]
    Manual,
    /// 依配方重量 × 每克費率計算
    WeightBased,
}

/// 配方用料（引用原料，不擁有）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredient {
    /// 原料ID
    pub ingredient_id: String,

    /// 每批用量（原料單位，慣例為克）
    pub amount: Decimal,
}

impl RecipeIngredient {
    pub fn new(ingredient_id: impl Into<String>, amount: Decimal) -> Self {
        Self {
            ingredient_id: ingredient_id.into(),
            amount,
        }
    }
}

/// 配方
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// 配方ID
    pub id: String,

    /// 名稱
    pub name: String,

    /// 產量（用量與成本以此批量為基準）
    #[serde(rename = "yield")]
    pub yield_qty: Decimal,

    /// 產量單位
    pub yield_unit: String,

    /// 主要用料
    pub ingredients: Vec<RecipeIngredient>,

    /// 外殼用料（重量合併計算，成本另計）
    #[serde(default)]
    pub shell_ingredients: Vec<RecipeIngredient>,

    /// 人工成本
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labor_cost: Option<Decimal>,

    /// 電費成本（舊欄位名稱為 packagingCost）
    #[serde(default, alias = "packagingCost", skip_serializing_if = "Option::is_none")]
    pub electricity_cost: Option<Decimal>,

    /// 設備成本
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_cost: Option<Decimal>,

    /// 不良率（%）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reject_percentage: Option<Decimal>,

    /// 稅率（%）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_percentage: Option<Decimal>,

    /// 利潤率（%）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_percentage: Option<Decimal>,

    /// 目前間接成本欄位的來源
    #[serde(default)]
    pub costing_mode: CostingMode,
}

impl Recipe {
    /// 創建新的配方
    pub fn new(id: String, name: String, yield_qty: Decimal, yield_unit: String) -> Self {
        Self {
            id,
            name,
            yield_qty,
            yield_unit,
            ingredients: Vec::new(),
            shell_ingredients: Vec::new(),
            labor_cost: None,
            electricity_cost: None,
            equipment_cost: None,
            reject_percentage: None,
            tax_percentage: None,
            margin_percentage: None,
            costing_mode: CostingMode::Manual,
        }
    }

    /// 建構器模式：添加主要用料
    pub fn with_ingredient(mut self, ingredient_id: &str, amount: Decimal) -> Self {
        self.ingredients.push(RecipeIngredient::new(ingredient_id, amount));
        self
    }

    /// 建構器模式：添加外殼用料
    pub fn with_shell_ingredient(mut self, ingredient_id: &str, amount: Decimal) -> Self {
        self.shell_ingredients.push(RecipeIngredient::new(ingredient_id, amount));
        self
    }

    /// 建構器模式：設置手動間接成本（人工、電費、設備）
    pub fn with_manual_costs(
        mut self,
        labor: Decimal,
        electricity: Decimal,
        equipment: Decimal,
    ) -> Self {
        self.labor_cost = Some(labor);
        self.electricity_cost = Some(electricity);
        self.equipment_cost = Some(equipment);
        self.costing_mode = CostingMode::Manual;
        self
    }

    /// 建構器模式：設置不良率
    pub fn with_reject_percentage(mut self, percentage: Decimal) -> Self {
        self.reject_percentage = Some(percentage);
        self
    }

    /// 建構器模式：設置稅率
    pub fn with_tax_percentage(mut self, percentage: Decimal) -> Self {
        self.tax_percentage = Some(percentage);
        self
    }

    /// 建構器模式：設置利潤率
    pub fn with_margin_percentage(mut self, percentage: Decimal) -> Self {
        self.margin_percentage = Some(percentage);
        self
    }

    /// 驗證產量
    pub fn validate(&self) -> crate::Result<()> {
        if self.yield_qty <= Decimal::ZERO {
            return Err(CostError::InvalidYield {
                recipe_id: self.id.clone(),
                yield_qty: self.yield_qty,
            });
        }
        Ok(())
    }

    /// 所有用料（主要 + 外殼）
    pub fn all_ingredients(&self) -> impl Iterator<Item = &RecipeIngredient> {
        self.ingredients.iter().chain(self.shell_ingredients.iter())
    }

    /// 檢查配方是否引用某原料
    pub fn uses_ingredient(&self, ingredient_id: &str) -> bool {
        self.all_ingredients().any(|item| item.ingredient_id == ingredient_id)
    }

    /// 套用更新，返回新的配方（原配方不變）
    pub fn with_patch(&self, patch: &RecipePatch) -> Recipe {
        let mut updated = self.clone();
        if let Some(labor) = patch.labor_cost {
            updated.labor_cost = Some(labor);
        }
        if let Some(electricity) = patch.electricity_cost {
            updated.electricity_cost = Some(electricity);
        }
        if let Some(equipment) = patch.equipment_cost {
            updated.equipment_cost = Some(equipment);
        }
        if let Some(mode) = patch.costing_mode {
            updated.costing_mode = mode;
        }
        updated
    }
}

/// 配方部分更新（由呼叫端負責寫回資料庫）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labor_cost: Option<Decimal>,

    #[serde(default, alias = "packagingCost", skip_serializing_if = "Option::is_none")]
    pub electricity_cost: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_cost: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub costing_mode: Option<CostingMode>,
}

impl RecipePatch {
    /// 檢查是否沒有任何欄位
    pub fn is_empty(&self) -> bool {
        self.labor_cost.is_none()
            && self.electricity_cost.is_none()
            && self.equipment_cost.is_none()
            && self.costing_mode.is_none()
    }

    /// 轉換為舊版文件格式（電費寫入 packagingCost，金額為 JSON 數字）
    pub fn to_legacy_document(&self) -> crate::Result<serde_json::Value> {
        let mut document =
            serde_json::to_value(self).map_err(|e| CostError::Serialization(e.to_string()))?;
        if let Some(fields) = document.as_object_mut() {
            if let Some(electricity) = fields.remove("electricityCost") {
                fields.insert("packagingCost".to_string(), electricity);
            }
        }
        Ok(document)
    }
}
