use super::controller::FieldKey;
use super::rules::{FieldRule, RuleSet};

/// Result of checking one field value against its rule.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValidationOutcome {
    Valid,
    Invalid(String),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ValidationOutcome::Valid => None,
            ValidationOutcome::Invalid(message) => Some(message),
        }
    }
}

/// Presentation adapter for inline field errors. `None` clears the error.
pub trait FieldErrorSink: Send + Sync {
    fn set_field_error(&self, key: &FieldKey, message: Option<&str>);
}

pub fn apply_outcome<S>(sink: &S, key: &FieldKey, outcome: &ValidationOutcome)
where
    S: FieldErrorSink + ?Sized,
{
    sink.set_field_error(key, outcome.message());
}

/// A struct whose fields can be flattened into raw form values.
pub trait FormModel {
    const FIELDS: &'static [FieldKey];

    fn to_values(&self) -> FormValues;
}

/// Raw field values in submission order. Keys are unique; pushing an existing
/// key replaces its value in place.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FormValues {
    entries: Vec<(FieldKey, String)>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: FieldKey, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn with(mut self, key: FieldKey, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    pub fn get(&self, key: &FieldKey) -> Option<&str> {
        self.entries
            .iter()
            .find_map(|(existing, value)| (existing == key).then_some(value.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &str)> {
        self.entries.iter().map(|(key, value)| (key, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> FromIterator<(FieldKey, V)> for FormValues
where
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (FieldKey, V)>>(iter: I) -> Self {
        let mut values = FormValues::new();
        for (key, value) in iter {
            values.push(key, value);
        }
        values
    }
}

/// Validates raw field values against an immutable [`RuleSet`].
#[derive(Clone, Debug)]
pub struct FieldValidator {
    rules: RuleSet,
}

impl FieldValidator {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Checks one field. Fields without a rule are always valid.
    pub fn validate_field(&self, key: &FieldKey, raw: &str) -> ValidationOutcome {
        let Some(rule) = self.rules.get(key) else {
            return ValidationOutcome::Valid;
        };
        self.check_rule(rule, raw.trim())
    }

    pub fn validate_all(&self, values: &FormValues) -> Vec<(FieldKey, ValidationOutcome)> {
        values
            .iter()
            .map(|(key, raw)| (key.clone(), self.validate_field(key, raw)))
            .collect()
    }

    /// Validates every field and pushes each outcome to `sink`, so all errors
    /// surface in one pass. Returns true only if every field is valid.
    pub fn validate_form<S>(&self, values: &FormValues, sink: &S) -> bool
    where
        S: FieldErrorSink + ?Sized,
    {
        let mut all_valid = true;
        for (key, outcome) in self.validate_all(values) {
            apply_outcome(sink, &key, &outcome);
            all_valid &= outcome.is_valid();
        }
        all_valid
    }

    fn check_rule(&self, rule: &FieldRule, value: &str) -> ValidationOutcome {
        let messages = self.rules.messages();
        if value.is_empty() {
            return if rule.is_required() {
                ValidationOutcome::Invalid(messages.required().to_string())
            } else {
                ValidationOutcome::Valid
            };
        }

        if let Some(min) = rule.minimum_length()
            && value.chars().count() < min
        {
            return ValidationOutcome::Invalid(messages.min_length_message(min));
        }

        if let Some(pattern) = rule.regex()
            && !pattern.is_match(value)
        {
            return ValidationOutcome::Invalid(rule.message().to_string());
        }

        if let Some(predicate) = rule.custom_predicate()
            && !predicate(value)
        {
            return ValidationOutcome::Invalid(rule.message().to_string());
        }

        ValidationOutcome::Valid
    }
}
