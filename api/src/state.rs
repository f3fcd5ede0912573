use axum::extract::FromRef;
use prometheus::Registry;
use shared::FieldRegistry;
use std::sync::Arc;

use crate::config::MediaConfig;
use crate::media::ImageOptimizer;
use crate::validation::{SchemaRegistry, ValidationGate};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub gate: ValidationGate,
    pub fields: Arc<FieldRegistry>,
    pub images: ImageOptimizer,
    pub registry: Registry,
}

impl AppState {
    pub fn new(registry: Registry) -> Self {
        Self::with_media_config(registry, MediaConfig::from_env())
    }

    pub fn with_media_config(registry: Registry, media: MediaConfig) -> Self {
        let schemas = SchemaRegistry::new();
        let fields = FieldRegistry::new();
        tracing::info!(
            schemas = schemas.len(),
            "Validation registries built"
        );

        Self {
            gate: ValidationGate::new(Arc::new(schemas)),
            fields: Arc::new(fields),
            images: ImageOptimizer::new(media),
            registry,
        }
    }
}

impl FromRef<AppState> for ValidationGate {
    fn from_ref(state: &AppState) -> Self {
        state.gate.clone()
    }
}

impl FromRef<AppState> for Arc<FieldRegistry> {
    fn from_ref(state: &AppState) -> Self {
        state.fields.clone()
    }
}

impl FromRef<AppState> for ImageOptimizer {
    fn from_ref(state: &AppState) -> Self {
        state.images.clone()
    }
}
