//! 髒標記追蹤：原料或費率變動後需要重算的配方

use std::collections::{BTreeSet, HashMap, HashSet};

use costing_core::{CostingMode, Recipe};

/// 配方髒標記追蹤器
#[derive(Debug, Default)]
pub struct RecipeDirtyTracker {
    /// 原料ID → 引用它的配方
    dependents: HashMap<String, HashSet<String>>,

    /// 重量計算模式的配方
    weight_based: HashSet<String>,

    dirty_recipes: BTreeSet<String>,
}

impl RecipeDirtyTracker {
    /// 創建新的追蹤器
    pub fn new() -> Self {
        Self::default()
    }

    /// 從配方快照建立依賴索引
    pub fn from_recipes(recipes: &[Recipe]) -> Self {
        let mut tracker = Self::new();
        for recipe in recipes {
            tracker.index_recipe(recipe);
        }
        tracker
    }

    /// 加入或更新配方的依賴（主要與外殼用料）
    pub fn index_recipe(&mut self, recipe: &Recipe) {
        self.remove_recipe(&recipe.id);

        for item in recipe.all_ingredients() {
            self.dependents
                .entry(item.ingredient_id.clone())
                .or_default()
                .insert(recipe.id.clone());
        }
        if recipe.costing_mode == CostingMode::WeightBased {
            self.weight_based.insert(recipe.id.clone());
        }
    }

    /// 移除配方的所有依賴
    pub fn remove_recipe(&mut self, recipe_id: &str) {
        for recipes in self.dependents.values_mut() {
            recipes.remove(recipe_id);
        }
        self.dependents.retain(|_, recipes| !recipes.is_empty());
        self.weight_based.remove(recipe_id);
        self.dirty_recipes.remove(recipe_id);
    }

    /// 標記配方為髒
    pub fn mark_dirty(&mut self, recipe_id: String) {
        self.dirty_recipes.insert(recipe_id);
    }

    /// 原料價格或規格變動：標記所有引用它的配方
    pub fn mark_ingredient_changed(&mut self, ingredient_id: &str) -> usize {
        let Some(recipes) = self.dependents.get(ingredient_id) else {
            return 0;
        };
        let count = recipes.len();
        self.dirty_recipes.extend(recipes.iter().cloned());
        tracing::debug!("原料 {} 變動，影響配方 {} 筆", ingredient_id, count);
        count
    }

    /// 每克費率變動：標記所有重量計算模式的配方
    pub fn mark_rates_changed(&mut self) -> usize {
        self.dirty_recipes.extend(self.weight_based.iter().cloned());
        self.weight_based.len()
    }

    /// 檢查配方是否為髒
    pub fn is_dirty(&self, recipe_id: &str) -> bool {
        self.dirty_recipes.contains(recipe_id)
    }

    /// 取出所有髒配方（已排序）並清除標記
    pub fn take_dirty(&mut self) -> Vec<String> {
        std::mem::take(&mut self.dirty_recipes).into_iter().collect()
    }

    /// 清除所有髒標記
    pub fn clear(&mut self) {
        self.dirty_recipes.clear();
    }
}
