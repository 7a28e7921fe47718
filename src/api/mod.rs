pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::ml::FirePredictor;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup, read-only afterwards
    pub predictor: Arc<FirePredictor>,
}

impl AppState {
    pub fn new(predictor: Arc<FirePredictor>) -> Self {
        Self { predictor }
    }
}
