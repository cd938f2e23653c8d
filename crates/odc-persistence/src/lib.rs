//! Open data connector persistence
//!
//! SeaORM entities for the configuration and data asset tables, plus the
//! database-backed implementations of the engine's collaborator traits.

pub mod entity;
pub mod model;
pub mod sql;

// Re-export sea-orm for convenience
pub use sea_orm;

pub use entity::prelude::*;
pub use model::AssetStatus;
pub use sql::{DbAssetSource, DbConfigurationProvider};
