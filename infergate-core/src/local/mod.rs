//! Local execution adapter.
//!
//! A request admitted for on-device processing runs through one scoped
//! session: the session is created for the operation, prompted once and
//! destroyed on every exit path.

pub mod executor;
pub mod session;

pub use executor::LocalExecutor;
pub use session::{LocalEngine, LocalPlan, LocalSession, PromptInput, SessionGuard, SessionOptions};
