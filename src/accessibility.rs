use std::sync::Arc;

use crate::form::{Settlement, SubmitObserver, SubmitState, SubmitTransition};

pub const SUBMITTING_ANNOUNCEMENT: &str = "Enviando formulário...";
pub const SUCCEEDED_ANNOUNCEMENT: &str = "Formulário enviado com sucesso.";
pub const FAILED_ANNOUNCEMENT: &str = "Erro ao enviar formulário. Tente novamente.";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Politeness {
    Polite,
    Assertive,
}

impl Politeness {
    pub fn as_aria_live(self) -> &'static str {
        match self {
            Politeness::Polite => "polite",
            Politeness::Assertive => "assertive",
        }
    }
}

/// A live region read by assistive technology.
pub trait LiveRegion: Send + Sync {
    fn announce(&self, politeness: Politeness, message: &str);
}

/// Announces submit progress through a [`LiveRegion`].
#[derive(Clone)]
pub struct LiveRegionAnnouncer {
    region: Arc<dyn LiveRegion>,
}

impl LiveRegionAnnouncer {
    pub fn new(region: Arc<dyn LiveRegion>) -> Self {
        Self { region }
    }
}

impl SubmitObserver for LiveRegionAnnouncer {
    fn on_transition(&self, transition: &SubmitTransition) {
        match (transition.to, transition.settlement) {
            (SubmitState::Submitting, _) => self
                .region
                .announce(Politeness::Polite, SUBMITTING_ANNOUNCEMENT),
            (SubmitState::Idle, Some(Settlement::Succeeded)) => self
                .region
                .announce(Politeness::Polite, SUCCEEDED_ANNOUNCEMENT),
            (SubmitState::Idle, Some(Settlement::Failed)) => self
                .region
                .announce(Politeness::Assertive, FAILED_ANNOUNCEMENT),
            (SubmitState::Idle, None) => {}
        }
    }
}
