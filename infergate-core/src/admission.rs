//! Admission control: decides whether a request runs on device, goes to the
//! cloud, or is refused before any expensive call is made.

use serde::{Deserialize, Serialize};

use crate::capability::CapabilityProber;
use crate::config::AdmissionPolicy;
use crate::types::{CapabilityState, Operation, ProcessingMode};

const REASON_LOCAL: &str = "Processing on device";
const REASON_MODEL_UNAVAILABLE: &str = "On-device model unavailable";
const REASON_TOO_LARGE: &str = "Content too large for on-device processing";
const REASON_HYBRID_UNAVAILABLE: &str = "On-device model unavailable, using cloud processing";
const REASON_HYBRID_TOO_LARGE: &str =
    "Content size exceeds local processing limits, using cloud processing";
const REASON_HYBRID_BOTH: &str =
    "On-device model unavailable and content size exceeds local processing limits, using cloud processing";

/// Why a request could not be served locally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionBlocker {
    ModelUnavailable,
    ContentTooLarge,
    Both,
}

impl AdmissionBlocker {
    fn from_flags(unavailable: bool, too_large: bool) -> Option<Self> {
        match (unavailable, too_large) {
            (true, true) => Some(AdmissionBlocker::Both),
            (true, false) => Some(AdmissionBlocker::ModelUnavailable),
            (false, true) => Some(AdmissionBlocker::ContentTooLarge),
            (false, false) => None,
        }
    }
}

/// Outcome of admission control for one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub use_local: bool,
    pub can_fallback: bool,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocker: Option<AdmissionBlocker>,
    pub capability: CapabilityState,
    pub estimated_tokens: usize,
    pub token_limit: usize,
}

impl Decision {
    /// Whether the request must be refused without trying any path
    pub fn is_rejected(&self) -> bool {
        !self.use_local && !self.can_fallback
    }
}

/// Decision engine combining the admission policy with capability probing
#[derive(Debug, Clone, Default)]
pub struct AdmissionController {
    policy: AdmissionPolicy,
    prober: CapabilityProber,
}

impl AdmissionController {
    pub fn new(policy: AdmissionPolicy, prober: CapabilityProber) -> Self {
        Self { policy, prober }
    }

    pub fn policy(&self) -> &AdmissionPolicy {
        &self.policy
    }

    pub fn prober(&self) -> &CapabilityProber {
        &self.prober
    }

    /// Decide the execution path for `text` under `mode`
    pub async fn decide(&self, mode: ProcessingMode, text: &str, operation: Operation) -> Decision {
        let estimated_tokens = self.policy.estimate_tokens(text);
        let token_limit = self.policy.ceiling(operation);
        let capability = self.prober.probe(operation).await;

        let decision = evaluate(mode, capability, estimated_tokens, token_limit);
        tracing::debug!(
            "[admission] {} mode={:?} capability={:?} tokens={}/{} -> local={} fallback={}",
            operation,
            mode,
            capability,
            estimated_tokens,
            token_limit,
            decision.use_local,
            decision.can_fallback
        );
        decision
    }
}

/// Pure decision table, separated from probing for testing
fn evaluate(
    mode: ProcessingMode,
    capability: CapabilityState,
    estimated_tokens: usize,
    token_limit: usize,
) -> Decision {
    let unavailable = !capability.is_ready();
    let too_large = estimated_tokens > token_limit;
    let blocker = AdmissionBlocker::from_flags(unavailable, too_large);

    let (use_local, can_fallback, reason, blocker) = match mode {
        ProcessingMode::OnDevice => {
            if unavailable {
                (
                    false,
                    false,
                    REASON_MODEL_UNAVAILABLE,
                    Some(AdmissionBlocker::ModelUnavailable),
                )
            } else if too_large {
                (
                    false,
                    false,
                    REASON_TOO_LARGE,
                    Some(AdmissionBlocker::ContentTooLarge),
                )
            } else {
                (true, false, REASON_LOCAL, None)
            }
        }
        ProcessingMode::Hybrid => match blocker {
            None => (true, true, REASON_LOCAL, None),
            Some(AdmissionBlocker::ModelUnavailable) => {
                (false, true, REASON_HYBRID_UNAVAILABLE, blocker)
            }
            Some(AdmissionBlocker::ContentTooLarge) => (false, true, REASON_HYBRID_TOO_LARGE, blocker),
            Some(AdmissionBlocker::Both) => (false, true, REASON_HYBRID_BOTH, blocker),
        },
    };

    Decision {
        use_local,
        can_fallback,
        reason: reason.to_string(),
        blocker,
        capability,
        estimated_tokens,
        token_limit,
    }
}
