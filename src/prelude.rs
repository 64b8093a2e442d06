pub use crate::accessibility::{LiveRegion, LiveRegionAnnouncer, Politeness};
pub use crate::config::{ConfigError, LeadformConfig};
pub use crate::form::{
    Ack, FieldKey, FieldRule, FieldValidator, FormModel, FormValues, FormView, InMemoryView,
    RuleSet, SimulatedBackend, SubmissionController, SubmitBackend, SubmitError, SubmitOutcome,
    SubmitState, ValidationOutcome, contact_rules,
};
pub use crate::timing::{Debouncer, ManualScheduler, Scheduler, ThreadScheduler, Throttler};
