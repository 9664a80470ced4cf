use std::sync::Arc;

use crate::{
    config::Config,
    errors::AppResult,
    providers::{HttpProviderFactory, ProviderFactory},
    services::PlanOrchestrator,
};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<PlanOrchestrator>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let config = Arc::new(config);
        let factory = Arc::new(HttpProviderFactory::new(Arc::clone(&config))?);

        Ok(Self::with_factory(config, factory))
    }

    /// Wires the pipeline against an arbitrary provider factory.
    pub fn with_factory(config: Arc<Config>, factory: Arc<dyn ProviderFactory>) -> Self {
        let orchestrator = Arc::new(PlanOrchestrator::new(factory, Arc::clone(&config)));

        Self {
            orchestrator,
            config,
        }
    }
}
