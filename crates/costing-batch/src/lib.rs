//! # Costing Batch
//!
//! 批次重算配方間接成本與髒標記追蹤

pub mod batch_update;
pub mod dirty_tracking;

// Re-export 主要類型
pub use batch_update::{BatchCostUpdater, BatchUpdateEntry, BatchUpdateReport};
pub use dirty_tracking::RecipeDirtyTracker;
