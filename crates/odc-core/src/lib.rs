//! Self-description assembly engine
//!
//! Turns the current connector configuration and the published asset list into
//! a catalog, a connector descriptor and the broker/query message envelopes.

pub mod catalog;
pub mod connector;
pub mod error;
pub mod message;
pub mod model;
pub mod provider;
pub mod resource;
pub mod service;

pub use catalog::{AssetSourcePolicy, CatalogAssembler};
pub use error::{AssetBuildFailure, BuildError, EngineError, Result};
pub use model::{Asset, ConfigurationSnapshot};
pub use provider::{
    ArtifactContent, ArtifactStore, ConfigurationProvider, MemoryArtifactStore, MemoryAssetSource,
    MemoryConfigurationProvider, PublishedAssetSource, StaticTokenSupplier, TokenSupplier,
};
pub use service::{EngineOptions, SelfDescriptionService};
