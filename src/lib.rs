//! tickline: interactive time-series viewport engine.
//!
//! This crate turns an ordered stream of timestamped price/volume samples
//! into pannable, zoomable render geometry with derived analytics (trend
//! lines, event markers) and point-level selection. It stops at geometry:
//! colors, fonts, and styling belong to the host's presentation layer.

pub mod analytics;
pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod telemetry;

pub use api::{ViewEngine, ViewEngineConfig};
pub use error::{EngineError, EngineResult};
