//! Threat, spam, flooding and symbol-density heuristics

use crate::config::HeuristicsConfig;
use crate::error::{GuardError, Result};
use crate::pattern::compile;
use regex::Regex;

/// Violent verbs aimed at a person-referring target
const THREAT_PATTERN: &str = r"(?i)\b(kill|murder|harm|hurt|attack|violence|bomb|weapon)\s+(you|me|them|us|him|her|yourself)\b";

/// Built-in spam phrases, matched anywhere in the text
pub const SPAM_PHRASES: &[&str] = &[
    "spam",
    "advertisement",
    "promotion",
    "buy now",
    "click here",
    "limited time offer",
];

/// Symbols counted by the density gate
pub const SPECIAL_CHARS: &[char] = &[
    '<', '>', '{', '}', '[', ']', '\\', '|', '`', '~', '!', '@', '#', '$', '%', '^', '&', '*',
    '(', ')', '_', '+', '=',
];

/// Compiled heuristic checks
pub struct Heuristics {
    threat: Regex,
    spam: Regex,
    max_repeats: usize,
    special_char_ratio: f64,
}

impl Heuristics {
    /// Compile the heuristics from configuration
    pub fn new(config: &HeuristicsConfig) -> Result<Self> {
        let threat = compile("threat", THREAT_PATTERN)?;

        let phrases = SPAM_PHRASES
            .iter()
            .map(|p| p.to_string())
            .chain(config.extra_spam_phrases.iter().cloned())
            .filter(|p| !p.trim().is_empty())
            .map(|p| regex::escape(p.trim()))
            .collect::<Vec<_>>()
            .join("|");
        let spam_pattern = format!("(?i)(?:{})", phrases);
        let spam =
            Regex::new(&spam_pattern).map_err(|e| GuardError::pattern("spam", &spam_pattern, e))?;

        Ok(Self {
            threat,
            spam,
            max_repeats: config.max_repeats,
            special_char_ratio: config.special_char_ratio,
        })
    }

    /// Threat, spam or flooding. Returns the detail for the first hit.
    pub fn check_harmful(&self, text: &str) -> Option<String> {
        if let Some(m) = self.threat.find(text) {
            return Some(format!("Threat directed at a person: `{}`", m.as_str()));
        }
        if let Some(m) = self.spam.find(text) {
            return Some(format!("Spam phrase: `{}`", m.as_str()));
        }
        if let Some((ch, run)) = find_flood(text, self.max_repeats) {
            return Some(format!("Character {:?} repeated {} times in a row", ch, run));
        }
        None
    }

    /// Symbol density above the configured ratio. Returns the detail on a hit.
    pub fn check_special_density(&self, text: &str) -> Option<String> {
        let len = text.chars().count();
        let count = special_char_count(text);
        if count as f64 > len as f64 * self.special_char_ratio {
            Some(format!(
                "{} special characters in {} (limit {:.0}%)",
                count,
                len,
                self.special_char_ratio * 100.0
            ))
        } else {
            None
        }
    }
}

/// Number of characters from [`SPECIAL_CHARS`] in `text`
pub fn special_char_count(text: &str) -> usize {
    text.chars().filter(|c| SPECIAL_CHARS.contains(c)).count()
}

/// First character whose consecutive run exceeds `max_repeats` repeats
/// (i.e. runs of `max_repeats + 1` or more). Line breaks never count.
pub fn find_flood(text: &str, max_repeats: usize) -> Option<(char, usize)> {
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        let mut run = 1;
        while chars.peek() == Some(&ch) {
            chars.next();
            run += 1;
        }
        if run > max_repeats && !is_line_break(ch) {
            return Some((ch, run));
        }
    }
    None
}

fn is_line_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heuristics() -> Heuristics {
        Heuristics::new(&HeuristicsConfig::default()).unwrap()
    }

    #[test]
    fn test_threat_detection() {
        let h = heuristics();
        assert!(h.check_harmful("I will kill you").is_some());
        assert!(h.check_harmful("going to ATTACK   them tomorrow").is_some());
        assert!(h.check_harmful("How do I kill a zombie process?").is_none());
        assert!(h.check_harmful("the skill you have").is_none());
    }

    #[test]
    fn test_threat_next_to_non_ascii_letters() {
        let h = heuristics();
        assert!(h.check_harmful("ékill you").is_some());
        assert!(h.check_harmful("I will hurt youñ").is_some());
        assert!(h.check_harmful("I will hurt yourselves").is_none());
    }

    #[test]
    fn test_spam_detection() {
        let h = heuristics();
        assert!(h.check_harmful("Click HERE for prizes").is_some());
        assert!(h.check_harmful("Limited time offer on courses").is_some());
        assert!(h.check_harmful("What frameworks do you use?").is_none());
    }

    #[test]
    fn test_extra_spam_phrases() {
        let config = HeuristicsConfig {
            extra_spam_phrases: vec!["free crypto".to_string()],
            ..Default::default()
        };
        let h = Heuristics::new(&config).unwrap();
        assert!(h.check_harmful("get FREE crypto today").is_some());
    }

    #[test]
    fn test_flooding_threshold() {
        assert_eq!(find_flood("aaaaaaaaaa", 10), None); // 10 in a row
        assert_eq!(find_flood("aaaaaaaaaaa", 10), Some(('a', 11)));
        assert_eq!(find_flood(&format!("hey{}", "!".repeat(14)), 10), Some(('!', 14)));
        assert_eq!(find_flood("abababababababab", 10), None);
    }

    #[test]
    fn test_flooding_ignores_line_breaks() {
        let text = format!("first{}second", "\n".repeat(15));
        assert_eq!(find_flood(&text, 10), None);
    }

    #[test]
    fn test_flood_reports_full_run() {
        let text = format!("ab{}cd", "z".repeat(20));
        assert_eq!(find_flood(&text, 10), Some(('z', 20)));
    }

    #[test]
    fn test_special_density() {
        let h = heuristics();
        // 10 of 10
        assert!(h.check_special_density("!@#$%^&*()").is_some());
        // 3 of 10 is not above 30%
        assert!(h.check_special_density("abcdefg!!!").is_none());
        // 4 of 10 is
        assert!(h.check_special_density("abcdef!!!!").is_some());
    }

    #[test]
    fn test_special_char_count() {
        assert_eq!(special_char_count("a<b>c{d}"), 4);
        assert_eq!(special_char_count("plain words, no symbols."), 0);
        assert_eq!(special_char_count("'-:;?/\""), 0);
    }
}
