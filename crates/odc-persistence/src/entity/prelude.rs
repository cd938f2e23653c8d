pub use super::configuration::Entity as Configuration;
pub use super::data_asset::Entity as DataAsset;
