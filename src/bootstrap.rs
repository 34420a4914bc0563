//! Wiring from configuration to a ready controller.

use std::sync::Arc;

use crate::adapters::{FileFlowchartRepository, HttpOutcomeConfig, HttpOutcomeService, InMemoryFlowchartRepository};
use crate::application::{ControllerSettings, InteractionController};
use crate::config::{AppConfig, InferenceConfig, StorageBackend, StorageConfig};
use crate::domain::foundation::UserId;
use crate::ports::{FlowchartRepository, InferenceError, OutcomeService};

/// Builds the HTTP outcome service.
pub fn outcome_service(config: &InferenceConfig) -> Result<Arc<dyn OutcomeService>, InferenceError> {
    let service = HttpOutcomeService::new(HttpOutcomeConfig::from(config))?;
    Ok(Arc::new(service))
}

/// Builds the configured flowchart repository.
pub fn flowchart_repository(config: &StorageConfig) -> Arc<dyn FlowchartRepository> {
    match config.backend {
        StorageBackend::File => Arc::new(FileFlowchartRepository::new(&config.data_dir)),
        StorageBackend::Memory => Arc::new(InMemoryFlowchartRepository::new()),
    }
}

/// Builds a controller for `user` from the full configuration.
pub fn build_controller(config: &AppConfig, user: UserId) -> Result<InteractionController, InferenceError> {
    let service = outcome_service(&config.inference)?;
    let repository = flowchart_repository(&config.storage);
    tracing::info!(
        endpoint = %config.inference.endpoint,
        storage = ?config.storage.backend,
        "Building interaction controller"
    );
    Ok(InteractionController::new(
        service,
        repository,
        user,
        ControllerSettings::from_config(config),
    ))
}
