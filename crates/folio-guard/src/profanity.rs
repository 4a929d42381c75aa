//! Profanity detection
//!
//! The moderator only needs "does this text contain profanity". Anything that
//! answers that implements [`ProfanityFilter`]; [`LexiconFilter`] is the
//! built-in word-list matcher.

use crate::config::ProfanityConfig;
use crate::error::Result;
use crate::pattern::compile;
use regex::Regex;
use std::collections::BTreeSet;

/// Capability to classify text as profane
pub trait ProfanityFilter: Send + Sync {
    /// Returns true when `text` contains profanity
    fn is_profane(&self, text: &str) -> bool;
}

impl<F> ProfanityFilter for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_profane(&self, text: &str) -> bool {
        self(text)
    }
}

/// Built-in lexicon. Matched as whole words, case-insensitively.
pub const DEFAULT_LEXICON: &[&str] = &[
    "arse",
    "arsehole",
    "ass",
    "asshole",
    "bastard",
    "bitch",
    "bitches",
    "bollocks",
    "bullshit",
    "cock",
    "cocksucker",
    "cunt",
    "damn",
    "dick",
    "dickhead",
    "dildo",
    "douche",
    "douchebag",
    "fag",
    "faggot",
    "fuck",
    "fucked",
    "fucker",
    "fucking",
    "motherfucker",
    "nigger",
    "piss",
    "pissed",
    "prick",
    "pussy",
    "retard",
    "shit",
    "shitty",
    "slut",
    "twat",
    "wank",
    "wanker",
    "whore",
];

/// Word-list profanity matcher
pub struct LexiconFilter {
    words: BTreeSet<String>,
    matcher: Option<Regex>,
}

impl LexiconFilter {
    /// Build a filter from an explicit word list
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: BTreeSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        let matcher = if words.is_empty() {
            None
        } else {
            let alternation = words
                .iter()
                .map(|w| regex::escape(w))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!(r"(?i)\b(?:{})\b", alternation);
            Some(compile("profanity", &pattern)?)
        };

        Ok(Self { words, matcher })
    }

    /// Build the default lexicon adjusted by configuration
    pub fn from_config(config: &ProfanityConfig) -> Result<Self> {
        let allowed: BTreeSet<String> = config
            .allowed_words
            .iter()
            .map(|w| w.trim().to_lowercase())
            .collect();

        let words = DEFAULT_LEXICON
            .iter()
            .map(|w| w.to_string())
            .chain(config.extra_words.iter().cloned())
            .filter(|w| !allowed.contains(&w.trim().to_lowercase()));

        Self::new(words)
    }

    /// The active word list, lowercased
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// First lexicon word found in `text`
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.matcher
            .as_ref()
            .and_then(|m| m.find(text))
            .map(|m| m.as_str())
    }
}

impl ProfanityFilter for LexiconFilter {
    fn is_profane(&self, text: &str) -> bool {
        self.matcher.as_ref().is_some_and(|m| m.is_match(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_filter() -> LexiconFilter {
        LexiconFilter::from_config(&ProfanityConfig::default()).unwrap()
    }

    #[test]
    fn test_detects_whole_words_case_insensitive() {
        let filter = default_filter();
        assert!(filter.is_profane("what the SHIT is this"));
        assert!(filter.is_profane("Damn."));
        assert_eq!(filter.find("you are a Bastard!"), Some("Bastard"));
    }

    #[test]
    fn test_ignores_embedded_substrings() {
        let filter = default_filter();
        assert!(!filter.is_profane("I passed the class assessment"));
        assert!(!filter.is_profane("Scunthorpe is a town"));
        assert!(!filter.is_profane("Hi, can you tell me about your projects?"));
    }

    #[test]
    fn test_word_next_to_non_ascii_letter() {
        let filter = default_filter();
        assert!(filter.is_profane("éshit"));
        assert!(filter.is_profane("damn中"));
    }

    #[test]
    fn test_allowed_words_removed() {
        let config = ProfanityConfig {
            allowed_words: vec!["Damn".to_string()],
            ..Default::default()
        };
        let filter = LexiconFilter::from_config(&config).unwrap();
        assert!(!filter.is_profane("damn good work"));
        assert!(filter.is_profane("shit"));
    }

    #[test]
    fn test_extra_words_added() {
        let config = ProfanityConfig {
            extra_words: vec!["frak".to_string()],
            ..Default::default()
        };
        let filter = LexiconFilter::from_config(&config).unwrap();
        assert!(filter.is_profane("oh frak"));
        assert!(filter.words().any(|w| w == "frak"));
    }

    #[test]
    fn test_empty_lexicon_never_matches() {
        let filter = LexiconFilter::new(Vec::<String>::new()).unwrap();
        assert!(!filter.is_profane("anything at all"));
    }

    #[test]
    fn test_closure_filter() {
        let filter = |text: &str| text.contains("heck");
        assert!(filter.is_profane("what the heck"));
        assert!(!ProfanityFilter::is_profane(&filter, "hello"));
    }
}
