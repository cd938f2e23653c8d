pub mod artifact;
pub mod broker;
