//! The moderation pipeline

use crate::audit::AuditLogger;
use crate::config::{
    AuditConfig, GuardConfig, HeuristicsConfig, InjectionConfig, LengthConfig, ProfanityConfig,
};
use crate::error::Result;
use crate::heuristics::Heuristics;
use crate::injection::{EncodedSignatures, InjectionTable};
use crate::normalize::normalize;
use crate::profanity::{LexiconFilter, ProfanityFilter};
use crate::types::{ModerationVerdict, ReasonCode};
use std::time::Instant;

/// Input moderator for the chat endpoint
///
/// Built once at start-up and shared by reference. Holds only compiled,
/// immutable tables, so concurrent calls need no locking.
pub struct Moderator {
    config: GuardConfig,
    profanity: Option<Box<dyn ProfanityFilter>>,
    heuristics: Heuristics,
    injection: InjectionTable,
    encoded: EncodedSignatures,
    audit_logger: AuditLogger,
}

impl std::fmt::Debug for Moderator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Moderator")
            .field("config", &self.config)
            .field("profanity", &self.profanity.is_some())
            .field("injection_patterns", &self.injection.len())
            .finish()
    }
}

impl Moderator {
    /// Create a moderator, compiling every table in `config`
    pub fn new(config: GuardConfig) -> Result<Self> {
        let profanity: Option<Box<dyn ProfanityFilter>> = if config.profanity.enabled {
            Some(Box::new(LexiconFilter::from_config(&config.profanity)?))
        } else {
            None
        };
        Self::assemble(config, profanity)
    }

    fn assemble(config: GuardConfig, profanity: Option<Box<dyn ProfanityFilter>>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            profanity,
            heuristics: Heuristics::new(&config.heuristics)?,
            injection: InjectionTable::new(&config.injection)?,
            encoded: EncodedSignatures::new()?,
            audit_logger: AuditLogger::new(config.audit.clone()),
            config,
        })
    }

    /// Create a builder for Moderator
    pub fn builder() -> ModeratorBuilder {
        ModeratorBuilder::new()
    }

    /// The configuration this moderator was built from
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Moderate one question
    pub fn moderate(&self, raw: &str) -> ModerationVerdict {
        let start = Instant::now();
        let verdict = self.evaluate(raw);
        self.audit_logger
            .log(raw, &verdict, start.elapsed().as_micros() as u64);
        verdict
    }

    /// Moderate a possibly missing question
    pub fn moderate_opt(&self, raw: Option<&str>) -> ModerationVerdict {
        match raw {
            Some(text) => self.moderate(text),
            None => self.reject_format("Input is missing"),
        }
    }

    /// Moderate an untyped JSON value; anything but a string is rejected
    pub fn moderate_value(&self, raw: &serde_json::Value) -> ModerationVerdict {
        match raw {
            serde_json::Value::String(text) => self.moderate(text),
            serde_json::Value::Null => self.reject_format("Input is missing"),
            other => self.reject_format(format!("Expected text, got {}", json_kind(other))),
        }
    }

    /// Quick check if content is acceptable
    pub fn is_acceptable(&self, raw: &str) -> bool {
        self.moderate(raw).accepted
    }

    fn reject_format(&self, detail: impl Into<String>) -> ModerationVerdict {
        let verdict = ModerationVerdict::reject_with(ReasonCode::InvalidFormat, detail);
        self.audit_logger.log("", &verdict, 0);
        verdict
    }

    /// Gate sequence. The first failing gate decides the verdict.
    fn evaluate(&self, raw: &str) -> ModerationVerdict {
        let text = normalize(raw);
        let len = text.chars().count();

        if len < self.config.length.min_chars {
            return ModerationVerdict::reject(ReasonCode::TooShort);
        }
        if len > self.config.length.max_chars {
            return ModerationVerdict::reject(ReasonCode::TooLong);
        }

        if let Some(filter) = &self.profanity {
            if filter.is_profane(&text) {
                return ModerationVerdict::reject(ReasonCode::Profanity);
            }
        }

        if let Some(detail) = self.heuristics.check_harmful(&text) {
            return ModerationVerdict::reject_with(ReasonCode::HarmfulContent, detail);
        }

        if let Some(detail) = self.heuristics.check_special_density(&text) {
            return ModerationVerdict::reject_with(ReasonCode::ExcessSpecialChars, detail);
        }

        if let Some(hit) = self.injection.detect(&text) {
            return ModerationVerdict::reject_with(
                ReasonCode::InjectionAttempt,
                format!(
                    "{} pattern #{} matched `{}`",
                    hit.category, hit.index, hit.matched
                ),
            );
        }

        // Raw input, so markers hidden by a failed or partial decode still count
        if let Some(signature) = self.encoded.detect(raw) {
            return ModerationVerdict::reject_with(
                ReasonCode::EncodedInjection,
                format!("Encoded signature `{}`", signature),
            );
        }

        ModerationVerdict::accept()
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Builder for Moderator configuration
pub struct ModeratorBuilder {
    config: GuardConfig,
    profanity_filter: Option<Box<dyn ProfanityFilter>>,
}

impl ModeratorBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: GuardConfig::default(),
            profanity_filter: None,
        }
    }

    /// Start from a full configuration
    pub fn with_config(mut self, config: GuardConfig) -> Self {
        self.config = config;
        self
    }

    /// Configure the length gate
    pub fn with_length(mut self, config: LengthConfig) -> Self {
        self.config.length = config;
        self
    }

    /// Configure the threat/spam and density gates
    pub fn with_heuristics(mut self, config: HeuristicsConfig) -> Self {
        self.config.heuristics = config;
        self
    }

    /// Configure the injection table
    pub fn with_injection(mut self, config: InjectionConfig) -> Self {
        self.config.injection = config;
        self
    }

    /// Configure the built-in lexicon
    pub fn with_profanity(mut self, config: ProfanityConfig) -> Self {
        self.config.profanity = config;
        self
    }

    /// Replace the built-in lexicon with another profanity filter
    pub fn with_profanity_filter(mut self, filter: impl ProfanityFilter + 'static) -> Self {
        self.config.profanity.enabled = true;
        self.profanity_filter = Some(Box::new(filter));
        self
    }

    /// Configure audit logging
    pub fn with_audit(mut self, config: AuditConfig) -> Self {
        self.config.audit = config;
        self
    }

    /// Build the Moderator
    pub fn build(self) -> Result<Moderator> {
        match self.profanity_filter {
            Some(filter) => Moderator::assemble(self.config, Some(filter)),
            None => Moderator::new(self.config),
        }
    }
}

impl Default for ModeratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
