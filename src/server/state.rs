use crate::config::ServiceConfig;
use crate::convert::Pipeline;

/// Shared application state accessible from all handlers.
///
/// Built once at startup; read-only afterwards.
pub struct AppState {
    pub config: ServiceConfig,
    pub pipeline: Pipeline,
}

impl AppState {
    /// State with the default collaborators for `config`.
    pub fn from_config(config: ServiceConfig) -> Self {
        let pipeline = Pipeline::from_config(&config);
        Self { config, pipeline }
    }

    /// State with a caller-supplied pipeline (custom converter or reorganizer).
    pub fn with_pipeline(config: ServiceConfig, pipeline: Pipeline) -> Self {
        Self { config, pipeline }
    }
}
