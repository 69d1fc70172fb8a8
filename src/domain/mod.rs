//! Core domain types and logic.

pub mod dataset;
pub mod numeric;
pub mod competitor;
pub mod integrity;
pub mod derivation;
pub mod gate;
pub mod classification;
pub mod payload;
pub mod session;
pub mod settings;
pub mod config_validation;
pub mod error;
