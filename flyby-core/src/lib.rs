//! Core library for the `flyby` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over imagery-metadata providers (NASA Earth assets)
//! - Shared domain models (coordinates, captures, predictions)
//! - The revisit-interval statistic and next-capture projection
//!
//! It is used by `flyby-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod flyby;
pub mod model;
pub mod predict;
pub mod provider;

pub use config::Config;
pub use error::{FlybyError, RequestError};
pub use flyby::flyby;
pub use model::{CaptureQuery, CaptureRecord, CaptureSet, Coordinate, IntervalStatistic, Prediction};
pub use predict::predict_next_capture;
pub use provider::{ImageryProvider, provider_from_config};
