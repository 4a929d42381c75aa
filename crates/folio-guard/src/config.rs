//! Configuration for Folio Guard

use crate::error::{GuardError, Result};
use serde::{Deserialize, Serialize};

/// Main configuration for the moderator
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GuardConfig {
    /// Length bounds
    pub length: LengthConfig,
    /// Threat, spam, flooding and symbol density
    pub heuristics: HeuristicsConfig,
    /// Injection pattern table
    pub injection: InjectionConfig,
    /// Profanity lexicon
    pub profanity: ProfanityConfig,
    /// Audit logging
    pub audit: AuditConfig,
}

impl GuardConfig {
    /// Check that the configured bounds make sense together
    pub fn validate(&self) -> Result<()> {
        if self.length.min_chars > self.length.max_chars {
            return Err(GuardError::ConfigError(format!(
                "length.min_chars ({}) exceeds length.max_chars ({})",
                self.length.min_chars, self.length.max_chars
            )));
        }
        if !(self.heuristics.special_char_ratio > 0.0 && self.heuristics.special_char_ratio <= 1.0)
        {
            return Err(GuardError::ConfigError(format!(
                "heuristics.special_char_ratio must be in (0, 1], got {}",
                self.heuristics.special_char_ratio
            )));
        }
        if self.heuristics.max_repeats == 0 {
            return Err(GuardError::ConfigError(
                "heuristics.max_repeats must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Length gate configuration, counted in characters after normalization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LengthConfig {
    /// Shorter inputs are rejected
    pub min_chars: usize,
    /// Longer inputs are rejected
    pub max_chars: usize,
}

impl Default for LengthConfig {
    fn default() -> Self {
        Self {
            min_chars: 2,
            max_chars: 1000,
        }
    }
}

/// Threat/spam and special-character gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicsConfig {
    /// A character followed by this many copies of itself is flooding
    pub max_repeats: usize,
    /// Reject when symbol count exceeds this share of the length
    pub special_char_ratio: f64,
    /// Extra spam phrases, matched case-insensitively
    pub extra_spam_phrases: Vec<String>,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            max_repeats: 10,
            special_char_ratio: 0.3,
            extra_spam_phrases: vec![],
        }
    }
}

/// Injection detection configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InjectionConfig {
    /// Additional regex patterns, appended after the built-in table
    pub custom_patterns: Vec<String>,
}

/// Profanity lexicon configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfanityConfig {
    /// Enable the built-in lexicon filter
    pub enabled: bool,
    /// Words added to the lexicon
    pub extra_words: Vec<String>,
    /// Words removed from the lexicon (false positives)
    pub allowed_words: Vec<String>,
}

impl Default for ProfanityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            extra_words: vec![],
            allowed_words: vec![],
        }
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Enable audit logging
    pub enabled: bool,
    /// Log a truncated copy of the content (vs. just hashes)
    pub log_content: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_content: false, // Privacy by default
        }
    }
}
