use std::sync::Arc;

use crate::controller::ViewController;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<ViewController>,
}

impl AppState {
    pub fn new(controller: Arc<ViewController>) -> Self {
        Self { controller }
    }
}
