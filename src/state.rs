use std::sync::Arc;

use crate::application::services::UrlService;
use crate::domain::access_worker::AccessRecorder;
use crate::domain::repositories::UrlRepository;

/// Shared handler state. Cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<UrlService<dyn UrlRepository>>,
    pub access_recorder: AccessRecorder,
    /// Deployment name reported by the health check.
    pub environment: String,
}

impl AppState {
    pub fn new(
        url_service: Arc<UrlService<dyn UrlRepository>>,
        access_recorder: AccessRecorder,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            url_service,
            access_recorder,
            environment: environment.into(),
        }
    }
}
