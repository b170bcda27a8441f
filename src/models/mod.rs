// src/models/mod.rs

pub mod account;
pub mod area;
pub mod batch;
pub mod category;
pub mod goods;
pub mod location;
pub mod retailer;
pub mod storage_condition;
pub mod supplier;
pub mod unit_measure;

pub use account::*;
pub use area::*;
pub use batch::*;
pub use category::*;
pub use goods::*;
pub use location::*;
pub use retailer::*;
pub use storage_condition::*;
pub use supplier::*;
pub use unit_measure::*;

use crate::entities::{Entity, EntityConfig, EntityKind};

// ==================== REGISTRY ====================

/// Configuration of an entity known only at runtime (dropdowns, CLI, stats).
pub fn config_for(kind: EntityKind) -> EntityConfig {
    match kind {
        EntityKind::Area => Area::config(),
        EntityKind::Location => Location::config(),
        EntityKind::StorageCondition => StorageCondition::config(),
        EntityKind::Goods => Goods::config(),
        EntityKind::Category => Category::config(),
        EntityKind::UnitMeasure => UnitMeasure::config(),
        EntityKind::Supplier => Supplier::config(),
        EntityKind::Retailer => Retailer::config(),
        EntityKind::Batch => Batch::config(),
        EntityKind::Account => Account::config(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_registry_is_consistent() {
        for kind in EntityKind::iter() {
            let config = config_for(kind);
            assert_eq!(config.kind, kind);
            assert!(config.endpoints.list.starts_with(kind.resource()));
            assert!(config.is_sortable(config.default_sort), "{:?} default sort", kind);
            assert!(config.form.field("status").is_some(), "{:?} has no status field", kind);
            for reference in config.form.references() {
                assert_ne!(reference, kind);
            }
        }
    }
}
