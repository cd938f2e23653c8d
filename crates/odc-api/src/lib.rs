//! ODC API - Self-description and message models
//!
//! This crate provides:
//! - Information model constants and vocabulary enums
//! - Descriptor value types (connector, catalog, resource, endpoint, agent)
//! - Outbound message envelopes for brokers and peers

pub mod descriptor;
pub mod message;
pub mod model;

// Re-export commonly used types
pub use descriptor::*;
pub use message::*;
pub use model::*;
