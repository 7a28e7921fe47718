//! Forest fire burned-area predictor.
//!
//! Trains a random forest on historical fire observations and serves burned-area
//! estimates with a coarse risk level over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod locale;
pub mod metrics;
pub mod ml;

pub use error::{AppError, Result};
