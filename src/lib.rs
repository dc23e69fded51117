//! Hierarchical cost and risk rollup for orbital systems.
//!
//! A system's bill of materials rolls up item → subsystem → system; the rolled-up
//! mass and procurement cost are then priced against a caller-supplied
//! [`config::RateTable`] into a [`breakdown::CostBreakdown`] and an
//! [`insurance::InsuranceEstimate`]. Every function is pure and deterministic.

pub mod bom;
pub mod breakdown;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod error;
pub mod estimate;
pub mod format;
pub mod insurance;
pub mod launch;
pub mod types;
pub mod validate;

pub use error::{Error, Result};
