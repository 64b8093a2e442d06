use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::controller::FieldKey;
use super::validation::FieldErrorSink;
use crate::accessibility::{LiveRegion, Politeness};

/// Marker of the single banner slot; a new banner replaces the one carrying it.
pub const BANNER_MARKER: &str = "form-notification";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SubmitPresentation {
    #[default]
    Normal,
    Loading,
}

impl SubmitPresentation {
    pub fn label(self) -> &'static str {
        match self {
            SubmitPresentation::Normal => "Enviar Mensagem",
            SubmitPresentation::Loading => "Enviando...",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            SubmitPresentation::Normal => "send",
            SubmitPresentation::Loading => "spinner",
        }
    }

    pub fn is_disabled(self) -> bool {
        self == SubmitPresentation::Loading
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Banner {
    message: String,
}

impl Banner {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn marker(&self) -> &'static str {
        BANNER_MARKER
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Confirmation panel that replaces the form after a successful submit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SuccessPanel {
    name: String,
}

impl SuccessPanel {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> String {
        if self.name.is_empty() {
            "Obrigado!".to_string()
        } else {
            format!("Obrigado, {}!", self.name)
        }
    }

    pub fn body(&self) -> &'static str {
        "Recebemos sua mensagem e entraremos em contato em breve."
    }
}

/// Rendering surface driven by the submission controller.
pub trait FormView: FieldErrorSink {
    fn set_submit_presentation(&self, presentation: SubmitPresentation);
    fn show_banner(&self, banner: &Banner);
    fn clear_banner(&self);
    fn show_success(&self, panel: &SuccessPanel);
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ViewState {
    pub field_errors: BTreeMap<FieldKey, String>,
    pub presentation: SubmitPresentation,
    pub banner: Option<Banner>,
    pub success: Option<SuccessPanel>,
    pub announcements: Vec<(Politeness, String)>,
}

/// Headless view that keeps the latest presentation in memory.
#[derive(Debug, Default)]
pub struct InMemoryView {
    state: RwLock<ViewState>,
}

impl InMemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ViewState {
        self.read().clone()
    }

    pub fn field_error(&self, key: &FieldKey) -> Option<String> {
        self.read().field_errors.get(key).cloned()
    }

    pub fn presentation(&self) -> SubmitPresentation {
        self.read().presentation
    }

    pub fn banner(&self) -> Option<Banner> {
        self.read().banner.clone()
    }

    pub fn success(&self) -> Option<SuccessPanel> {
        self.read().success.clone()
    }

    pub fn announcements(&self) -> Vec<(Politeness, String)> {
        self.read().announcements.clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, ViewState> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, ViewState> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl FieldErrorSink for InMemoryView {
    fn set_field_error(&self, key: &FieldKey, message: Option<&str>) {
        let mut state = self.write();
        match message {
            Some(message) => {
                state.field_errors.insert(key.clone(), message.to_string());
            }
            None => {
                state.field_errors.remove(key);
            }
        }
    }
}

impl FormView for InMemoryView {
    fn set_submit_presentation(&self, presentation: SubmitPresentation) {
        self.write().presentation = presentation;
    }

    fn show_banner(&self, banner: &Banner) {
        self.write().banner = Some(banner.clone());
    }

    fn clear_banner(&self) {
        self.write().banner = None;
    }

    fn show_success(&self, panel: &SuccessPanel) {
        let mut state = self.write();
        state.field_errors.clear();
        state.success = Some(panel.clone());
    }
}

impl LiveRegion for InMemoryView {
    fn announce(&self, politeness: Politeness, message: &str) {
        self.write()
            .announcements
            .push((politeness, message.to_string()));
    }
}
