//! 成本計算配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::CostError;

/// 全域每克費率（人工、電費、設備）
///
/// 以單一設定記錄整筆讀取與儲存；缺少的欄位使用預設值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalCostRates {
    /// 人工成本（每克）
    pub labor_cost_per_gram: Decimal,

    /// 電費成本（每克）
    pub electricity_cost_per_gram: Decimal,

    /// 設備成本（每克）
    pub equipment_cost_per_gram: Decimal,
}

impl Default for GlobalCostRates {
    fn default() -> Self {
        Self {
            labor_cost_per_gram: Decimal::from(10),
            electricity_cost_per_gram: Decimal::from(5),
            equipment_cost_per_gram: Decimal::from(2),
        }
    }
}

impl GlobalCostRates {
    /// 創建新的費率
    pub fn new(labor: Decimal, electricity: Decimal, equipment: Decimal) -> Self {
        Self {
            labor_cost_per_gram: labor,
            electricity_cost_per_gram: electricity,
            equipment_cost_per_gram: equipment,
        }
    }

    /// 從 JSON 設定記錄解析
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let rates: Self =
            serde_json::from_str(json).map_err(|e| CostError::InvalidConfig(e.to_string()))?;
        rates.validate()?;
        Ok(rates)
    }

    /// 讀取設定，尚未儲存過時使用預設值
    pub fn load_or_default(stored: Option<&str>) -> crate::Result<Self> {
        match stored {
            Some(json) => Self::from_json(json),
            None => Ok(Self::default()),
        }
    }

    /// 序列化為 JSON 設定記錄（費率為 JSON 數字）
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string(self).map_err(|e| CostError::Serialization(e.to_string()))
    }

    /// 驗證費率不可為負
    pub fn validate(&self) -> crate::Result<()> {
        let rates = [
            ("laborCostPerGram", self.labor_cost_per_gram),
            ("electricityCostPerGram", self.electricity_cost_per_gram),
            ("equipmentCostPerGram", self.equipment_cost_per_gram),
        ];
        for (name, rate) in rates {
            if rate < Decimal::ZERO {
                return Err(CostError::InvalidRate(format!("{} = {}", name, rate)));
            }
        }
        Ok(())
    }
}

/// 售價計算策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PricingPolicy {
    /// 配方未設定利潤率時使用（%）
    pub default_margin_percentage: Decimal,

    /// 配方未設定稅率時使用（%）
    pub default_tax_percentage: Decimal,

    /// 顯示售價的進位單位
    pub price_rounding_step: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            default_margin_percentage: Decimal::from(30),
            default_tax_percentage: Decimal::from(10),
            price_rounding_step: Decimal::from(1000),
        }
    }
}

impl PricingPolicy {
    /// 建構器模式：設置預設利潤率
    pub fn with_default_margin(mut self, percentage: Decimal) -> Self {
        self.default_margin_percentage = percentage;
        self
    }

    /// 建構器模式：設置預設稅率
    pub fn with_default_tax(mut self, percentage: Decimal) -> Self {
        self.default_tax_percentage = percentage;
        self
    }

    /// 建構器模式：設置售價進位單位
    pub fn with_rounding_step(mut self, step: Decimal) -> Self {
        self.price_rounding_step = step;
        self
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.price_rounding_step <= Decimal::ZERO {
            return Err(CostError::InvalidRoundingStep(self.price_rounding_step));
        }
        Ok(())
    }
}
