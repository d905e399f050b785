//! HybridProcessor implementation.
//!
//! The processor owns the routing chain: admission, then either the local
//! executor or a cloud path, then validation and classification. Every
//! failure leaving it is a [`ProcessingError`].

use arc_swap::ArcSwap;
use futures::StreamExt;
use std::sync::Arc;

use crate::admission::{AdmissionBlocker, AdmissionController, Decision};
use crate::capability::{CapabilityProber, CapabilityProvider};
use crate::classifier::{classify, hybrid_fallback};
use crate::config::InferenceConfig;
use crate::error::{InferenceError, ProcessingError};
use crate::local::{LocalEngine, LocalExecutor};
use crate::prompt::remote_prompt;
use crate::provider::{FallbackEndpoint, ProviderConnector};
use crate::strategy::StructuredOutputStrategy;
use crate::types::*;
use crate::validator::validate_output;

/// Builder for a [`HybridProcessor`].
///
/// # Example
///
/// ```ignore
/// let processor = HybridProcessor::builder()
///     .engine(Arc::new(my_engine))
///     .connector(HttpConnector::new().layer(LoggingLayer::new()))
///     .fallback_endpoint(SharedCloudEndpoint::new("https://ai.example.com/process"))
///     .credentials(saved_credentials)
///     .finish();
/// ```
#[derive(Default)]
pub struct HybridProcessorBuilder {
    capability: Option<Arc<dyn CapabilityProvider>>,
    engine: Option<Arc<dyn LocalEngine>>,
    strategy: Option<Box<dyn StructuredOutputStrategy>>,
    config: InferenceConfig,
    connector: Option<Arc<dyn ProviderConnector>>,
    endpoint: Option<Arc<dyn FallbackEndpoint>>,
    credentials: Vec<ProviderCredential>,
}

impl HybridProcessorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the on-device engine, used both for probing and execution
    pub fn engine<E: LocalEngine + 'static>(mut self, engine: Arc<E>) -> Self {
        let capability: Arc<dyn CapabilityProvider> = engine.clone();
        let engine: Arc<dyn LocalEngine> = engine;
        self.capability = Some(capability);
        self.engine = Some(engine);
        self
    }

    /// Override the structured-output strategy picked for the engine
    pub fn structured_output(mut self, strategy: Box<dyn StructuredOutputStrategy>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn config(mut self, config: InferenceConfig) -> Self {
        self.config = config;
        self
    }

    /// Connector used to reach providers with user credentials
    pub fn connector<C: ProviderConnector + 'static>(mut self, connector: C) -> Self {
        self.connector = Some(Arc::new(connector));
        self
    }

    /// Shared endpoint used when no credential is enabled
    pub fn fallback_endpoint<F: FallbackEndpoint + 'static>(mut self, endpoint: F) -> Self {
        self.endpoint = Some(Arc::new(endpoint));
        self
    }

    pub fn credentials(mut self, credentials: Vec<ProviderCredential>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Finish building and create a HybridProcessor
    pub fn finish(self) -> HybridProcessor {
        let prober = match self.capability {
            Some(provider) => CapabilityProber::new(provider),
            None => CapabilityProber::absent(),
        };

        let local = self.engine.map(|engine| {
            let executor = LocalExecutor::new(engine);
            match self.strategy {
                Some(strategy) => executor.with_strategy(strategy),
                None => executor,
            }
        });

        HybridProcessor {
            controller: AdmissionController::new(self.config.admission, prober),
            local,
            connector: self.connector,
            endpoint: self.endpoint,
            credentials: ArcSwap::from_pointee(self.credentials),
            config: self.config,
        }
    }
}

/// Routes requests between the on-device engine and the cloud.
///
/// Used through `&self`; independent requests may run concurrently.
pub struct HybridProcessor {
    controller: AdmissionController,
    local: Option<LocalExecutor>,
    connector: Option<Arc<dyn ProviderConnector>>,
    endpoint: Option<Arc<dyn FallbackEndpoint>>,
    credentials: ArcSwap<Vec<ProviderCredential>>,
    config: InferenceConfig,
}

impl HybridProcessor {
    /// Create a new builder
    pub fn builder() -> HybridProcessorBuilder {
        HybridProcessorBuilder::new()
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Replace the credential snapshot
    pub fn set_credentials(&self, credentials: Vec<ProviderCredential>) {
        self.credentials.store(Arc::new(credentials));
    }

    /// Current credential snapshot
    pub fn credentials(&self) -> Arc<Vec<ProviderCredential>> {
        self.credentials.load_full()
    }

    /// Current on-device readiness, for pre-flight checks
    pub async fn probe(&self, operation: Operation) -> CapabilityState {
        self.controller.prober().probe(operation).await
    }

    /// Admission decision without running anything
    pub async fn decide(&self, mode: ProcessingMode, text: &str, operation: Operation) -> Decision {
        self.controller.decide(mode, text, operation).await
    }

    /// Run the full routing chain for one request.
    ///
    /// In hybrid mode a request that cannot run locally goes straight to the
    /// cloud. A local attempt that fails is reported as `HYBRID_FALLBACK`;
    /// the caller decides whether to call [`process_remote`](Self::process_remote).
    pub async fn process(
        &self,
        request: &ProcessingRequest,
        mode: ProcessingMode,
    ) -> Result<ProcessingResult, ProcessingError> {
        let ctx = RequestContext::new(request.operation, mode);
        let operation = request.operation;

        if let Err(e) = request.validate() {
            tracing::warn!("[runtime] {} rejected: {}", ctx.request_id, e);
            return Err(classify(e, operation));
        }

        let decision = self.controller.decide(mode, &request.text, operation).await;
        tracing::info!(
            "[runtime] {} {} mode={:?}: {}",
            ctx.request_id,
            operation,
            mode,
            decision.reason
        );

        if decision.use_local {
            return self.process_local(&ctx, request, decision).await;
        }

        if decision.can_fallback {
            return self.remote(&ctx, request, decision).await;
        }

        let blocker = decision.blocker.unwrap_or(AdmissionBlocker::ModelUnavailable);
        let err = classify(
            InferenceError::Admission {
                blocker,
                reason: decision.reason,
            },
            operation,
        );
        tracing::warn!("[runtime] {} {}: {}", ctx.request_id, err.code, err.cause);
        Err(err)
    }

    /// Run `request` through the cloud path: the first enabled credential,
    /// otherwise the shared endpoint.
    pub async fn process_remote(
        &self,
        request: &ProcessingRequest,
    ) -> Result<ProcessingResult, ProcessingError> {
        let ctx = RequestContext::new(request.operation, ProcessingMode::Hybrid);
        request
            .validate()
            .map_err(|e| classify(e, request.operation))?;

        let decision = self
            .controller
            .decide(ProcessingMode::Hybrid, &request.text, request.operation)
            .await;
        self.remote(&ctx, request, decision).await
    }

    /// Process requests one at a time, in order
    pub async fn process_batch(
        &self,
        requests: Vec<ProcessingRequest>,
        mode: ProcessingMode,
    ) -> Vec<Result<ProcessingResult, ProcessingError>> {
        futures::stream::iter(requests)
            .then(|request| async move { self.process(&request, mode).await })
            .collect()
            .await
    }

    async fn process_local(
        &self,
        ctx: &RequestContext,
        request: &ProcessingRequest,
        decision: Decision,
    ) -> Result<ProcessingResult, ProcessingError> {
        let Some(local) = &self.local else {
            return Err(classify(
                InferenceError::configuration("no on-device engine registered"),
                request.operation,
            ));
        };

        match local.execute(request).await {
            Ok(output) => Ok(ProcessingResult {
                output,
                route: Route::Local,
                decision,
            }),
            Err(e) => {
                tracing::warn!("[runtime] {} local attempt failed: {}", ctx.request_id, e);
                if decision.can_fallback {
                    Err(hybrid_fallback(e, request.operation))
                } else {
                    Err(classify(e, request.operation))
                }
            }
        }
    }

    async fn remote(
        &self,
        ctx: &RequestContext,
        request: &ProcessingRequest,
        decision: Decision,
    ) -> Result<ProcessingResult, ProcessingError> {
        let operation = request.operation;
        let result = self.remote_output(request).await;

        match result {
            Ok((output, route)) => {
                tracing::debug!("[runtime] {} served by {:?}", ctx.request_id, route);
                Ok(ProcessingResult {
                    output,
                    route,
                    decision,
                })
            }
            Err(e) => {
                let err = classify(e, operation);
                tracing::error!(
                    "[runtime] {} {} failed with {}: {}",
                    ctx.request_id,
                    operation,
                    err.code,
                    err.cause
                );
                Err(err)
            }
        }
    }

    async fn remote_output(
        &self,
        request: &ProcessingRequest,
    ) -> Result<(ProcessingOutput, Route), InferenceError> {
        if request.operation == Operation::Multimodal {
            return Err(InferenceError::configuration(
                "image description is only available on device",
            ));
        }

        let credentials = self.credentials.load_full();
        let credential = credentials.iter().find(|c| c.enabled);

        if let (Some(credential), Some(connector)) = (credential, &self.connector) {
            let provider = connector.connect(credential)?;
            let prompt = remote_prompt(request);
            let text = provider.generate(&prompt, request.operation).await?;
            let output = validate_output(request.operation, text.trim())?;
            return Ok((output, Route::CustomProvider(credential.provider)));
        }

        if let Some(endpoint) = &self.endpoint {
            let body = endpoint.process(request).await?;
            let output = validate_output(request.operation, body)?;
            return Ok((output, Route::SharedCloud));
        }

        Err(InferenceError::configuration("no cloud provider configured"))
    }
}

impl std::fmt::Debug for HybridProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridProcessor")
            .field("controller", &self.controller)
            .field("local", &self.local)
            .field("connector", &self.connector)
            .field("endpoint", &self.endpoint)
            .field("credentials", &self.credentials.load().len())
            .finish()
    }
}
