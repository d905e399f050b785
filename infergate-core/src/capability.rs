//! On-device capability probing.

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use crate::types::{CapabilityState, Operation};

/// Availability query implemented by each on-device inference backend.
///
/// Backends are free to fail here; the prober turns any failure into
/// [`CapabilityState::Unavailable`].
#[async_trait]
pub trait CapabilityProvider: Send + Sync + Debug {
    async fn availability(&self, operation: Operation) -> anyhow::Result<CapabilityState>;
}

/// Infallible wrapper around an optional [`CapabilityProvider`].
#[derive(Debug, Clone, Default)]
pub struct CapabilityProber {
    provider: Option<Arc<dyn CapabilityProvider>>,
}

impl CapabilityProber {
    pub fn new(provider: Arc<dyn CapabilityProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Prober for a host without any on-device engine
    pub fn absent() -> Self {
        Self { provider: None }
    }

    /// Current readiness for `operation`. Never fails and is not cached.
    pub async fn probe(&self, operation: Operation) -> CapabilityState {
        let Some(provider) = &self.provider else {
            tracing::debug!("[capability] no on-device engine registered");
            return CapabilityState::Unavailable;
        };

        match provider.availability(operation).await {
            Ok(state) => {
                tracing::debug!("[capability] {} -> {:?}", operation, state);
                state
            }
            Err(e) => {
                tracing::warn!("[capability] availability query failed for {}: {}", operation, e);
                CapabilityState::Unavailable
            }
        }
    }
}
