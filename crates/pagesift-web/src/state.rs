use std::sync::Arc;

use pagesift_core::{FilterOptions, PdfBackend};

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub backend: Arc<dyn PdfBackend>,
    pub options: FilterOptions,
}
