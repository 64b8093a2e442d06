use std::time::Duration;

use serde::Deserialize;

use crate::form::{
    ControllerOptions, FieldKey, FieldRule, RuleMessages, RuleSet, SimulatedBackendConfig,
    contact_rules,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid pattern for field `{field}`: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },
    #[error("duplicate rule for field `{0}`")]
    DuplicateRule(String),
    #[error("no rule registered for field `{0}`")]
    UnknownField(String),
    #[error("failure rate must be within 0.0..=1.0, got {0}")]
    FailureRate(f64),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration, usually read from a `leadform.toml`.
///
/// Every section is optional. An empty `rules` list selects the built-in
/// contact form table.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct LeadformConfig {
    pub submission: SubmissionSection,
    pub backend: BackendSection,
    pub messages: MessagesSection,
    pub rules: Vec<RuleEntry>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SubmissionSection {
    pub banner_dismiss_ms: u64,
    pub input_debounce_ms: u64,
    pub name_field: String,
}

impl Default for SubmissionSection {
    fn default() -> Self {
        Self {
            banner_dismiss_ms: 5_000,
            input_debounce_ms: 300,
            name_field: "name".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendSection {
    pub latency_ms: u64,
    pub failure_rate: f64,
    pub seed: Option<u64>,
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            latency_ms: 2_000,
            failure_rate: 0.1,
            seed: None,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct MessagesSection {
    pub required: Option<String>,
    pub min_length: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RuleEntry {
    pub field: String,
    #[serde(default)]
    pub required: bool,
    pub min_length: Option<usize>,
    pub pattern: Option<String>,
    pub message: String,
}

impl LeadformConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            banner_dismiss: Duration::from_millis(self.submission.banner_dismiss_ms),
            input_debounce: Duration::from_millis(self.submission.input_debounce_ms),
            name_field: FieldKey::owned(self.submission.name_field.clone()),
        }
    }

    pub fn backend_config(&self) -> Result<SimulatedBackendConfig, ConfigError> {
        let config = SimulatedBackendConfig::new(
            Duration::from_millis(self.backend.latency_ms),
            self.backend.failure_rate,
        )?;
        Ok(match self.backend.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        })
    }

    pub fn rule_messages(&self) -> RuleMessages {
        let defaults = RuleMessages::default();
        RuleMessages::new(
            self.messages
                .required
                .as_deref()
                .unwrap_or(defaults.required()),
            self.messages
                .min_length
                .as_deref()
                .unwrap_or(defaults.min_length_template()),
        )
    }

    pub fn rule_set(&self) -> Result<RuleSet, ConfigError> {
        let messages = self.rule_messages();
        if self.rules.is_empty() {
            return Ok(contact_rules()?.with_messages(messages));
        }

        let mut rules = RuleSet::new().with_messages(messages);
        for entry in &self.rules {
            rules.insert(entry.to_rule()?)?;
        }
        Ok(rules)
    }
}

impl RuleEntry {
    fn to_rule(&self) -> Result<FieldRule, ConfigError> {
        let mut rule =
            FieldRule::new(FieldKey::owned(self.field.clone()), self.message.clone())
                .required(self.required);
        if let Some(min) = self.min_length {
            rule = rule.min_length(min);
        }
        if let Some(pattern) = &self.pattern {
            rule = rule.pattern(pattern)?;
        }
        Ok(rule)
    }
}
