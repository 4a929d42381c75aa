//! Audit logging for moderation verdicts

use crate::config::AuditConfig;
use crate::types::{AuditEntry, ModerationVerdict};
use chrono::Utc;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

#[cfg(feature = "audit")]
use tracing::{debug, warn};

/// Audit logger
pub struct AuditLogger {
    config: AuditConfig,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(config: AuditConfig) -> Self {
        Self { config }
    }

    /// Record one verdict. Returns the entry that was emitted, if any.
    pub fn log(
        &self,
        raw: &str,
        verdict: &ModerationVerdict,
        duration_us: u64,
    ) -> Option<AuditEntry> {
        if !self.config.enabled {
            return None;
        }

        let entry = AuditEntry {
            timestamp: Utc::now(),
            content_hash: hash_content(raw),
            content_chars: raw.chars().count(),
            reason: verdict.reason,
            detail: verdict.detail.clone(),
            processing_time_us: duration_us,
        };

        self.emit(&entry, raw);
        Some(entry)
    }

    #[cfg(feature = "audit")]
    fn emit(&self, entry: &AuditEntry, raw: &str) {
        let content = if self.config.log_content {
            Some(truncate(raw, 200))
        } else {
            None
        };

        if entry.reason == crate::types::ReasonCode::None {
            debug!(
                content_hash = %entry.content_hash,
                content_chars = entry.content_chars,
                processing_time_us = entry.processing_time_us,
                content = ?content,
                "Question accepted"
            );
        } else {
            warn!(
                content_hash = %entry.content_hash,
                content_chars = entry.content_chars,
                reason = %entry.reason,
                detail = %entry.detail,
                processing_time_us = entry.processing_time_us,
                content = ?content,
                "Question rejected"
            );
        }
    }

    #[cfg(not(feature = "audit"))]
    fn emit(&self, _entry: &AuditEntry, _raw: &str) {}
}

/// Hash content for audit (privacy-preserving)
fn hash_content(content: &str) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

/// Truncate to `max_chars` characters for logging
#[cfg_attr(not(feature = "audit"), allow(dead_code))]
fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
