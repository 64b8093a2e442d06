mod controller;
mod rules;
mod submit;
mod validation;
mod view;


pub use controller::{
    ControllerOptions, FieldKey, FormError, FormResult, INVALID_FORM_MESSAGE,
    SUBMIT_FAILED_MESSAGE, Settlement, SubmissionController, SubmissionSnapshot, SubmitObserver,
    SubmitOutcome, SubmitState, SubmitTransition,
};
pub use leadform_form_derive::FormModel;
pub use rules::{FieldRule, Predicate, RuleMessages, RuleSet, contact, contact_rules};
pub use submit::{
    Ack, BoxedSubmitFuture, SimulatedBackend, SimulatedBackendConfig, SubmissionResult,
    SubmitBackend, SubmitError,
};
pub use validation::{
    FieldErrorSink, FieldValidator, FormModel, FormValues, ValidationOutcome, apply_outcome,
};
pub use view::{
    BANNER_MARKER, Banner, FormView, InMemoryView, SubmitPresentation, SuccessPanel, ViewState,
};
