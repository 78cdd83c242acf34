//! Core domain types and logic.

pub mod asset;
pub mod column;
pub mod data;
pub mod error;
pub mod format;
pub mod indicator;
pub mod math;
pub mod set_settings;
pub mod time_unit;
