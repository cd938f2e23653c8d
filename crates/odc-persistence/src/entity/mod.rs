//! `SeaORM` entities

pub mod prelude;

pub mod configuration;
pub mod data_asset;
