use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use regex::Regex;

use super::controller::FieldKey;
use crate::config::ConfigError;

pub type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Declarative validation rule for one form field.
#[derive(Clone)]
pub struct FieldRule {
    key: FieldKey,
    required: bool,
    min_length: Option<usize>,
    pattern: Option<Regex>,
    predicate: Option<Predicate>,
    message: String,
}

impl FieldRule {
    pub fn new(key: FieldKey, message: impl Into<String>) -> Self {
        Self {
            key,
            required: false,
            min_length: None,
            pattern: None,
            predicate: None,
            message: message.into(),
        }
    }

    pub fn required(mut self, value: bool) -> Self {
        self.required = value;
        self
    }

    pub fn min_length(mut self, value: usize) -> Self {
        self.min_length = Some(value);
        self
    }

    pub fn pattern(self, pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            field: self.key.to_string(),
            source,
        })?;
        Ok(self.pattern_regex(regex))
    }

    pub fn pattern_regex(mut self, regex: Regex) -> Self {
        self.pattern = Some(regex);
        self
    }

    pub fn predicate(mut self, predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    pub fn key(&self) -> &FieldKey {
        &self.key
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn minimum_length(&self) -> Option<usize> {
        self.min_length
    }

    pub fn regex(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    pub fn custom_predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Debug for FieldRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRule")
            .field("key", &self.key)
            .field("required", &self.required)
            .field("min_length", &self.min_length)
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("predicate", &self.predicate.is_some())
            .field("message", &self.message)
            .finish()
    }
}

/// Messages shared by every rule. `{min}` in the min-length template is
/// replaced with the rule's minimum.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RuleMessages {
    required: String,
    min_length: String,
}

impl RuleMessages {
    pub fn new(required: impl Into<String>, min_length: impl Into<String>) -> Self {
        Self {
            required: required.into(),
            min_length: min_length.into(),
        }
    }

    pub fn required(&self) -> &str {
        &self.required
    }

    pub fn min_length_template(&self) -> &str {
        &self.min_length
    }

    pub fn min_length_message(&self, min: usize) -> String {
        self.min_length.replace("{min}", &min.to_string())
    }
}

impl Default for RuleMessages {
    fn default() -> Self {
        Self::new("Este campo é obrigatório", "Mínimo de {min} caracteres")
    }
}

#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: BTreeMap<FieldKey, FieldRule>,
    messages: RuleMessages,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_messages(mut self, messages: RuleMessages) -> Self {
        self.messages = messages;
        self
    }

    pub fn insert(&mut self, rule: FieldRule) -> Result<(), ConfigError> {
        if self.rules.contains_key(rule.key()) {
            return Err(ConfigError::DuplicateRule(rule.key().to_string()));
        }
        self.rules.insert(rule.key().clone(), rule);
        Ok(())
    }

    pub fn with_rule(mut self, rule: FieldRule) -> Result<Self, ConfigError> {
        self.insert(rule)?;
        Ok(self)
    }

    /// Attaches a predicate to an existing rule. Used for rules loaded from
    /// configuration, which cannot carry code.
    pub fn with_predicate(
        mut self,
        key: &FieldKey,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Result<Self, ConfigError> {
        let rule = self
            .rules
            .remove(key)
            .ok_or_else(|| ConfigError::UnknownField(key.to_string()))?;
        self.rules.insert(key.clone(), rule.predicate(predicate));
        Ok(self)
    }

    pub fn get(&self, key: &FieldKey) -> Option<&FieldRule> {
        self.rules.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldRule> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn messages(&self) -> &RuleMessages {
        &self.messages
    }
}

pub mod contact {
    use crate::form::FieldKey;

    pub const NAME: FieldKey = FieldKey::new("name");
    pub const EMAIL: FieldKey = FieldKey::new("email");
    pub const PHONE: FieldKey = FieldKey::new("phone");
    pub const COMPANY: FieldKey = FieldKey::new("company");
    pub const GOALS: FieldKey = FieldKey::new("goals");

    pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
    pub const PHONE_PATTERN: &str = r"^[\d\s()+\-]+$";
    pub const PHONE_MIN_DIGITS: usize = 10;
}

/// Rule table of the landing page contact form.
pub fn contact_rules() -> Result<RuleSet, ConfigError> {
    RuleSet::new()
        .with_rule(
            FieldRule::new(contact::NAME, "Digite seu nome completo")
                .required(true)
                .min_length(3),
        )?
        .with_rule(
            FieldRule::new(contact::EMAIL, "Digite um email válido")
                .required(true)
                .pattern(contact::EMAIL_PATTERN)?,
        )?
        .with_rule(
            FieldRule::new(contact::PHONE, "Digite um telefone válido")
                .pattern(contact::PHONE_PATTERN)?
                .predicate(has_enough_phone_digits),
        )?
        .with_rule(FieldRule::new(contact::COMPANY, "Digite o nome da empresa").min_length(2))?
        .with_rule(
            FieldRule::new(contact::GOALS, "Conte um pouco mais sobre seus objetivos")
                .required(true)
                .min_length(10),
        )
}

pub(crate) fn has_enough_phone_digits(value: &str) -> bool {
    value.chars().filter(char::is_ascii_digit).count() >= contact::PHONE_MIN_DIGITS
}
