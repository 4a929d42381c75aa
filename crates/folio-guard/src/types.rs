//! Core types for Folio Guard

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a question was rejected, or [`ReasonCode::None`] when it was accepted.
///
/// Internal only. The transport layer maps every non-`None` code to the same
/// client-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    /// Input missing or not text
    InvalidFormat,
    /// Normalized input below the minimum length
    TooShort,
    /// Normalized input above the maximum length
    TooLong,
    /// Profanity lexicon matched
    Profanity,
    /// Threat, spam phrase or character flooding
    HarmfulContent,
    /// Too many symbol characters for the input length
    ExcessSpecialChars,
    /// One of the injection pattern tables matched
    InjectionAttempt,
    /// An encoded `<script` marker in the raw input
    EncodedInjection,
    /// Accepted
    None,
}

impl ReasonCode {
    /// Default human-readable detail for this code
    pub fn description(&self) -> &'static str {
        match self {
            ReasonCode::InvalidFormat => "Invalid input format",
            ReasonCode::TooShort => "Input is too short",
            ReasonCode::TooLong => "Input is too long",
            ReasonCode::Profanity => "Input contains inappropriate language",
            ReasonCode::HarmfulContent => "Input contains inappropriate content",
            ReasonCode::ExcessSpecialChars => "Input contains too many special characters",
            ReasonCode::InjectionAttempt => {
                "Input contains potentially harmful code or injection attempts"
            }
            ReasonCode::EncodedInjection => "Input contains encoded potentially harmful code",
            ReasonCode::None => "Accepted",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReasonCode::InvalidFormat => write!(f, "INVALID_FORMAT"),
            ReasonCode::TooShort => write!(f, "TOO_SHORT"),
            ReasonCode::TooLong => write!(f, "TOO_LONG"),
            ReasonCode::Profanity => write!(f, "PROFANITY"),
            ReasonCode::HarmfulContent => write!(f, "HARMFUL_CONTENT"),
            ReasonCode::ExcessSpecialChars => write!(f, "EXCESS_SPECIAL_CHARS"),
            ReasonCode::InjectionAttempt => write!(f, "INJECTION_ATTEMPT"),
            ReasonCode::EncodedInjection => write!(f, "ENCODED_INJECTION"),
            ReasonCode::None => write!(f, "NONE"),
        }
    }
}

/// Outcome of moderating one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationVerdict {
    /// True only when every gate passed
    pub accepted: bool,
    /// The first gate that failed, or `None`
    pub reason: ReasonCode,
    /// Internal detail for logs
    pub detail: String,
}

impl ModerationVerdict {
    /// Verdict for input that passed every gate
    pub fn accept() -> Self {
        Self {
            accepted: true,
            reason: ReasonCode::None,
            detail: ReasonCode::None.description().to_string(),
        }
    }

    /// Rejection with the code's default detail
    pub fn reject(reason: ReasonCode) -> Self {
        Self::reject_with(reason, reason.description())
    }

    /// Rejection with a specific detail
    pub fn reject_with(reason: ReasonCode, detail: impl Into<String>) -> Self {
        Self {
            accepted: false,
            reason,
            detail: detail.into(),
        }
    }

    /// Check if the input was rejected
    pub fn is_rejected(&self) -> bool {
        !self.accepted
    }
}

/// Pattern families in the injection table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InjectionCategory {
    /// SQL keywords, tautologies, time delays, schema enumeration
    Sql,
    /// Script tags, event handlers, dangerous JS globals
    Xss,
    /// Shell chaining, path traversal, process execution
    Command,
    /// MongoDB-style operators
    NoSql,
    /// LDAP filter syntax
    Ldap,
    /// External entities and doctypes
    Xml,
    /// Patterns supplied through configuration
    Custom,
}

impl std::fmt::Display for InjectionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InjectionCategory::Sql => write!(f, "SQL"),
            InjectionCategory::Xss => write!(f, "XSS"),
            InjectionCategory::Command => write!(f, "Command"),
            InjectionCategory::NoSql => write!(f, "NoSQL"),
            InjectionCategory::Ldap => write!(f, "LDAP"),
            InjectionCategory::Xml => write!(f, "XML/XXE"),
            InjectionCategory::Custom => write!(f, "Custom"),
        }
    }
}

/// Audit log entry for one moderation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the verdict was produced
    pub timestamp: DateTime<Utc>,
    /// Hash of the raw input
    pub content_hash: String,
    /// Length of the raw input in characters
    pub content_chars: usize,
    /// Verdict reason
    pub reason: ReasonCode,
    /// Verdict detail
    pub detail: String,
    /// Processing time in microseconds
    pub processing_time_us: u64,
}
