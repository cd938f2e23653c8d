//! Open data connector server
//!
//! HTTP surface over the self-description engine, plus the broker transport
//! and the periodic broker update loop.

pub mod api;
pub mod error;
pub mod model;
pub mod service;
pub mod startup;
