//! # Folio Guard
//!
//! Input moderation for the portfolio chat endpoint.
//!
//! Every visitor question passes through an ordered chain of gates before it
//! may reach a completion provider. The first gate that fails decides the
//! verdict; later gates are not evaluated.
//!
//! - **Format**: the question must be text
//! - **Length**: 2 to 1000 characters after trimming and percent-decoding
//! - **Profanity**: a replaceable lexicon behind [`ProfanityFilter`]
//! - **Harmful content**: threats, spam phrases, character flooding
//! - **Symbol density**: too many special characters for the length
//! - **Injection**: SQL, XSS, shell, NoSQL, LDAP and XML pattern tables
//! - **Encoded payloads**: `<script` markers hidden behind an encoding
//!
//! ## Quick Start
//!
//! ```rust
//! use folio_guard::{GuardConfig, Moderator, ReasonCode};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let moderator = Moderator::new(GuardConfig::default())?;
//!
//!     let verdict = moderator.moderate("Hi, can you tell me about your projects?");
//!     assert!(verdict.accepted);
//!
//!     let verdict = moderator.moderate("' OR 1=1 --");
//!     assert_eq!(verdict.reason, ReasonCode::InjectionAttempt);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐     ┌──────────────────┐     ┌─────────────────────┐
//! │ question │ ──► │ Moderator        │ ──► │ ModerationVerdict   │
//! └──────────┘     │                  │     │ {accepted, reason}  │
//!                  │ ┌──────────────┐ │     └─────────────────────┘
//!                  │ │ normalize    │ │
//!                  │ └──────────────┘ │
//!                  │ ┌──────────────┐ │
//!                  │ │ length       │ │
//!                  │ └──────────────┘ │
//!                  │ ┌──────────────┐ │
//!                  │ │ profanity    │ │
//!                  │ └──────────────┘ │
//!                  │ ┌──────────────┐ │
//!                  │ │ heuristics   │ │
//!                  │ └──────────────┘ │
//!                  │ ┌──────────────┐ │
//!                  │ │ injection    │ │
//!                  │ └──────────────┘ │
//!                  │ ┌──────────────┐ │
//!                  │ │ audit        │ │
//!                  │ └──────────────┘ │
//!                  └──────────────────┘
//! ```

pub mod audit;
pub mod config;
pub mod error;
pub mod heuristics;
pub mod injection;
pub mod moderator;
pub mod normalize;
pub mod pattern;
pub mod profanity;
pub mod types;

pub use config::GuardConfig;
pub use error::{GuardError, Result};
pub use moderator::{Moderator, ModeratorBuilder};
pub use profanity::{LexiconFilter, ProfanityFilter};
pub use types::*;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::GuardConfig;
    pub use crate::error::{GuardError, Result};
    pub use crate::moderator::Moderator;
    pub use crate::profanity::ProfanityFilter;
    pub use crate::types::*;
}
