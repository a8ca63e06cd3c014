pub mod clock;
pub mod drift;
pub mod executor;
pub mod lifecycle;
pub mod phase;
pub mod readiness;
pub mod reconciliation;
pub mod transition;

pub use clock::{Clock, ManualClock, SystemClock};
pub use drift::{DriftReport, detect_drift};
pub use executor::TransitionExecutor;
pub use lifecycle::{ApprovedTransition, LifecycleService, TransitionProposal};
pub use phase::compute_phase;
pub use readiness::{RequirementReport, check_publish_readiness};
pub use reconciliation::{Reconciler, ReconcilerConfig, SweepReport};
pub use transition::{ValidationResult, is_automatic, requires_confirmation, validate_transition};
