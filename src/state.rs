use std::sync::Arc;

use crate::backend::client::Backend;
use crate::backend::http::HttpBackend;
use crate::config::Config;
use crate::error::Result;

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The backend-as-a-service client.
    pub backend: Arc<dyn Backend>,
    /// The application's configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates a new `AppState` talking to the configured backend over HTTP.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub fn new(config: Config) -> Result<Self> {
        let backend = HttpBackend::new(&config)?;
        tracing::info!("✅ Backend client initialized for {}", config.baas_url);

        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    /// Creates a new `AppState` around an existing backend.
    pub fn with_backend(config: Config, backend: Arc<dyn Backend>) -> Self {
        AppState {
            backend,
            config: Arc::new(config),
        }
    }
}
