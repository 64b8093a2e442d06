use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::submit::{SubmissionResult, SubmitBackend};
use super::validation::{FieldValidator, FormModel, FormValues, ValidationOutcome, apply_outcome};
use super::view::{Banner, FormView, SubmitPresentation, SuccessPanel};
use crate::timing::{Debouncer, Scheduler};

pub const INVALID_FORM_MESSAGE: &str = "Por favor, corrija os erros acima.";
pub const SUBMIT_FAILED_MESSAGE: &str = "Erro ao enviar formulário. Tente novamente.";

#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldKey(Cow<'static, str>);

impl FieldKey {
    pub const fn new(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }

    pub fn owned(value: impl Into<String>) -> Self {
        Self(Cow::Owned(value.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubmitState {
    Idle,
    Submitting,
}

/// How a submission left the `Submitting` state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Settlement {
    Succeeded,
    Failed,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SubmitTransition {
    pub from: SubmitState,
    pub to: SubmitState,
    pub settlement: Option<Settlement>,
}

/// Invoked on every submit state transition, after the view is updated.
pub trait SubmitObserver: Send + Sync {
    fn on_transition(&self, transition: &SubmitTransition);
}

impl<F> SubmitObserver for F
where
    F: Fn(&SubmitTransition) + Send + Sync,
{
    fn on_transition(&self, transition: &SubmitTransition) {
        (self)(transition)
    }
}

/// What a single submit request did.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmitOutcome {
    /// Dropped because a submission was in flight or the form is already done.
    Ignored,
    /// Validation failed; nothing was sent.
    Rejected,
    Settled(SubmissionResult),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ControllerOptions {
    pub banner_dismiss: Duration,
    pub input_debounce: Duration,
    pub name_field: FieldKey,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            banner_dismiss: Duration::from_secs(5),
            input_debounce: Duration::from_millis(300),
            name_field: super::rules::contact::NAME,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SubmissionSnapshot {
    pub submit_state: SubmitState,
    pub submit_count: u32,
    pub completed: bool,
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("form state lock poisoned while {0}")]
    StatePoisoned(&'static str),
    #[error("invalid submit state transition: {from:?} -> {to:?}")]
    InvalidStateTransition { from: SubmitState, to: SubmitState },
}

pub type FormResult<T> = Result<T, FormError>;

pub(super) struct SubmissionState {
    pub(super) submit_state: SubmitState,
    pub(super) submit_count: u32,
    pub(super) completed: bool,
}

/// Owns the submit guard and drives the view through the submit lifecycle.
#[derive(Clone)]
pub struct SubmissionController {
    options: ControllerOptions,
    validator: Arc<FieldValidator>,
    backend: Arc<dyn SubmitBackend>,
    view: Arc<dyn FormView>,
    scheduler: Arc<dyn Scheduler>,
    state: Arc<RwLock<SubmissionState>>,
    banner_ticket: Arc<AtomicU64>,
    observers: Arc<RwLock<Vec<Arc<dyn SubmitObserver>>>>,
    debouncers: Arc<RwLock<BTreeMap<FieldKey, Debouncer<String>>>>,
}

impl SubmissionController {
    pub fn new(
        validator: FieldValidator,
        backend: Arc<dyn SubmitBackend>,
        view: Arc<dyn FormView>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            options: ControllerOptions::default(),
            validator: Arc::new(validator),
            backend,
            view,
            scheduler,
            state: Arc::new(RwLock::new(SubmissionState {
                submit_state: SubmitState::Idle,
                submit_count: 0,
                completed: false,
            })),
            banner_ticket: Arc::new(AtomicU64::new(0)),
            observers: Arc::new(RwLock::new(Vec::new())),
            debouncers: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    pub fn with_options(mut self, options: ControllerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    pub fn validator(&self) -> &FieldValidator {
        &self.validator
    }

    pub fn register_observer(&self, observer: impl SubmitObserver + 'static) -> FormResult<()> {
        let mut observers = write_lock(&self.observers, "registering submit observer")?;
        observers.push(Arc::new(observer));
        Ok(())
    }

    /// Validates and applies the outcome right away, as on blur. Once the form
    /// has been submitted the outcome is still returned but the view is left
    /// alone.
    pub fn on_field_blur(&self, key: &FieldKey, raw: &str) -> FormResult<ValidationOutcome> {
        let outcome = self.validator.validate_field(key, raw);
        if !self.is_completed()? {
            apply_outcome(self.view.as_ref(), key, &outcome);
        }
        Ok(outcome)
    }

    /// Schedules a revalidation of `key`; a later input for the same field
    /// supersedes a pending one. Fields without a rule are never revalidated.
    pub fn on_field_input(&self, key: &FieldKey, raw: impl Into<String>) -> FormResult<()> {
        if self.validator.rules().get(key).is_none() || self.is_completed()? {
            return Ok(());
        }
        let mut debouncers = write_lock(&self.debouncers, "scheduling field revalidation")?;
        let debouncer = debouncers.entry(key.clone()).or_insert_with(|| {
            let validator = self.validator.clone();
            let view = self.view.clone();
            let key = key.clone();
            Debouncer::new(
                self.scheduler.clone(),
                self.options.input_debounce,
                move |raw: String| {
                    let outcome = validator.validate_field(&key, &raw);
                    apply_outcome(view.as_ref(), &key, &outcome);
                },
            )
        });
        debouncer.call(raw.into());
        Ok(())
    }

    pub async fn submit_model<M>(&self, model: &M) -> FormResult<SubmitOutcome>
    where
        M: FormModel,
    {
        self.on_submit_requested(model.to_values()).await
    }

    pub async fn on_submit_requested(&self, values: FormValues) -> FormResult<SubmitOutcome> {
        if self.is_busy()? {
            return Ok(SubmitOutcome::Ignored);
        }

        if !self.validator.validate_form(&values, self.view.as_ref()) {
            debug!("submit rejected by validation");
            self.show_banner(Banner::new(INVALID_FORM_MESSAGE));
            return Ok(SubmitOutcome::Rejected);
        }

        let started = {
            let mut state = write_lock(&self.state, "accepting submit request")?;
            if state.submit_state == SubmitState::Submitting || state.completed {
                return Ok(SubmitOutcome::Ignored);
            }
            state.submit_count = state.submit_count.saturating_add(1);
            transition_submit_state(&mut state, SubmitState::Submitting, None)?
        };
        self.view.set_submit_presentation(SubmitPresentation::Loading);
        self.notify(&started)?;

        let result = self.backend.submit(&values).await;
        match result {
            Ok(ack) => {
                let (settled, submit_count) = {
                    let mut state = write_lock(&self.state, "completing submit")?;
                    state.completed = true;
                    let settled = transition_submit_state(
                        &mut state,
                        SubmitState::Idle,
                        Some(Settlement::Succeeded),
                    )?;
                    (settled, state.submit_count)
                };
                self.cancel_pending_revalidation()?;
                let name = values
                    .get(&self.options.name_field)
                    .map(str::trim)
                    .unwrap_or_default();
                self.view.show_success(&SuccessPanel::new(name));
                info!(submit_count, ?ack, "form submitted");
                self.notify(&settled)?;
                Ok(SubmitOutcome::Settled(SubmissionResult::Success(values)))
            }
            Err(error) => {
                warn!(%error, "form submission failed");
                let settled = {
                    let mut state = write_lock(&self.state, "recording failed submit")?;
                    transition_submit_state(
                        &mut state,
                        SubmitState::Idle,
                        Some(Settlement::Failed),
                    )?
                };
                self.view.set_submit_presentation(SubmitPresentation::Normal);
                self.show_banner(Banner::new(SUBMIT_FAILED_MESSAGE));
                self.notify(&settled)?;
                Ok(SubmitOutcome::Settled(SubmissionResult::Failure(
                    error.reason().to_string(),
                )))
            }
        }
    }

    pub fn snapshot(&self) -> FormResult<SubmissionSnapshot> {
        let state = read_lock(&self.state, "creating submission snapshot")?;
        Ok(SubmissionSnapshot {
            submit_state: state.submit_state,
            submit_count: state.submit_count,
            completed: state.completed,
        })
    }

    fn is_completed(&self) -> FormResult<bool> {
        Ok(read_lock(&self.state, "reading completion")?.completed)
    }

    fn is_busy(&self) -> FormResult<bool> {
        let state = read_lock(&self.state, "checking submit guard")?;
        if state.submit_state == SubmitState::Submitting || state.completed {
            debug!(
                state = ?state.submit_state,
                completed = state.completed,
                "ignoring submit request"
            );
            return Ok(true);
        }
        Ok(false)
    }

    fn cancel_pending_revalidation(&self) -> FormResult<()> {
        let debouncers = read_lock(&self.debouncers, "cancelling field revalidation")?;
        for debouncer in debouncers.values() {
            debouncer.cancel();
        }
        Ok(())
    }

    /// Shows `banner` in the single banner slot and schedules its removal.
    /// A newer banner invalidates the pending removal of an older one.
    fn show_banner(&self, banner: Banner) {
        let ticket = self.banner_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        self.view.show_banner(&banner);

        let current = self.banner_ticket.clone();
        let view = self.view.clone();
        self.scheduler.schedule(
            self.options.banner_dismiss,
            Box::new(move || {
                if current.load(Ordering::SeqCst) == ticket {
                    view.clear_banner();
                }
            }),
        );
    }

    fn notify(&self, transition: &SubmitTransition) -> FormResult<()> {
        debug!(
            from = ?transition.from,
            to = ?transition.to,
            settlement = ?transition.settlement,
            "submit state transition"
        );
        let observers = read_lock(&self.observers, "reading submit observers")?.clone();
        for observer in observers {
            observer.on_transition(transition);
        }
        Ok(())
    }
}

pub(super) fn transition_submit_state(
    state: &mut SubmissionState,
    next: SubmitState,
    settlement: Option<Settlement>,
) -> FormResult<SubmitTransition> {
    let current = state.submit_state;
    let allowed = matches!(
        (current, next),
        (SubmitState::Idle, SubmitState::Submitting) | (SubmitState::Submitting, SubmitState::Idle)
    );
    if !allowed {
        return Err(FormError::InvalidStateTransition {
            from: current,
            to: next,
        });
    }
    state.submit_state = next;
    Ok(SubmitTransition {
        from: current,
        to: next,
        settlement,
    })
}

pub(crate) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(crate) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
