//! Injection pattern tables
//!
//! Patterns are data: each family is a slice of regex sources, flattened into
//! one ordered table of `(category, regex)` entries. A [`RegexSet`] answers
//! "does anything match" in one pass; the lowest matching index wins so the
//! table order decides which entry is reported.

use crate::config::InjectionConfig;
use crate::error::Result;
use crate::pattern::{compile, compile_set};
use crate::types::InjectionCategory;
use regex::{Regex, RegexSet};

/// SQL keywords, tautologies, time delays, file access and schema enumeration
pub const SQL_PATTERNS: &[&str] = &[
    r"(?i)\b(SELECT|INSERT|UPDATE|DELETE|DROP|CREATE|ALTER|EXEC|EXECUTE|TRUNCATE|MERGE)\b",
    r#"(?i)(\bOR\b|\bAND\b)\s+['"]?\d+['"]?\s*=\s*['"]?\d+"#,
    r"(?i)\bUNION\s+(ALL\s+)?SELECT\b",
    r#"(?i)(\bOR\b|\bAND\b)\s+['"]?1['"]?\s*=\s*['"]?1"#,
    r"(?i);\s*(DROP|DELETE|TRUNCATE|ALTER)",
    r#"(?i)(\bOR\b|\bAND\b)\s+['"]?['"]?\s*=\s*['"]?['"]?"#,
    r"(?i)\b(SLEEP|WAITFOR|DELAY)\s*\(",
    r"(?i)\b(BENCHMARK|PG_SLEEP)\s*\(",
    r"(?i)(\bOR\b|\bAND\b)\s+\d+\s*=\s*\d+",
    r"(?i)\bINTO\s+(OUTFILE|DUMPFILE)\b",
    r"(?i)\bLOAD_FILE\s*\(",
    r"(?i)\bCONCAT\s*\(",
    r"(?i)\bCHAR\s*\(",
    r"(?i)\bASCII\s*\(",
    r"(?i)\bSUBSTRING\s*\(",
    r"(?i)\bCAST\s*\(",
    r"(?i)\bCONVERT\s*\(",
    r"(?i)\bEXEC\s*\(",
    r"(?i)\bSP_EXECUTESQL\b",
    r"(?i)\bXP_CMDSHELL\b",
    r"(?i)\bINFORMATION_SCHEMA\b",
    r"(?i)\bSYS\.",
    r"(?i)\bpg_",
];

/// Script tags, script protocols, event handlers, embedding tags, JS sinks
pub const XSS_PATTERNS: &[&str] = &[
    r"(?i)<script[\s>]",
    r"(?i)</script>",
    r"(?i)javascript\s*:",
    r"(?i)data\s*:\s*text/html",
    r"(?i)vbscript\s*:",
    r"(?i)\bon\w+\s*=",
    r"(?i)\bonerror\s*=",
    r"(?i)\bonload\s*=",
    r"(?i)\bonclick\s*=",
    r"(?i)\bonmouseover\s*=",
    r"(?i)\bonfocus\s*=",
    r"(?i)\bonblur\s*=",
    r"(?i)<iframe[\s>]",
    r"(?i)<object[\s>]",
    r"(?i)<embed[\s>]",
    r"(?i)<link[\s>]",
    r"(?i)<meta[\s>]",
    r"(?i)<style[\s>]",
    r"(?i)<svg[\s>].*<script",
    r"(?i)expression\s*\(",
    r"(?i)data\s*:\s*text/html;base64",
    r"(?i)&#x?[0-9a-f]+;.*script",
    r"(?i)\b(eval|Function|setTimeout|setInterval)\s*\(",
    r"(?i)\bdocument\.(cookie|write|writeln|location)",
    r"(?i)\bwindow\.(location|open|eval)",
    r"(?i)\binnerHTML\s*=",
    r"(?i)\bouterHTML\s*=",
    r"(?i)\bXMLHttpRequest",
    r"(?i)\bfetch\s*\(",
];

/// Shell chaining with known commands, traversal, process execution
pub const COMMAND_PATTERNS: &[&str] = &[
    r"(?i);\s*(rm|cat|ls|pwd|whoami|id|uname|wget|curl|nc|netcat|sh|bash|cmd|powershell)",
    r"(?i)\|\s*(rm|cat|ls|pwd|whoami|id|uname|wget|curl|nc|netcat|sh|bash|cmd|powershell)",
    r"(?i)`[^`]*(rm|cat|ls|pwd|whoami|id|uname|wget|curl|nc|netcat|sh|bash|cmd|powershell)[^`]*`",
    r"(?i)\$\([^)]*(rm|cat|ls|pwd|whoami|id|uname|wget|curl|nc|netcat|sh|bash|cmd|powershell)[^)]*\)",
    r"(\.\./){2,}",
    r"(\.\.\\){2,}",
    r"(?i)\.\.%2F.*\.\.%2F",
    r"(?i)\.\.%5C.*\.\.%5C",
    r"(?i)\b(cmd|powershell|pwsh)\s*/[ck]",
    r#"(?i)\b(sh|bash|zsh|ksh)\s+-c\s+['"]"#,
    r"(?i)\b(rm\s+-rf|del\s+/f|format\s+\w+|mkfs|dd\s+if=)",
    r"(?i)\b(exec|system|popen|shell_exec|passthru|proc_open)\s*\(",
    r"\$\{[^}]*\}",
    r"[;&|]{2,}",
];

/// MongoDB-style query operators
pub const NOSQL_PATTERNS: &[&str] = &[
    r"(?i)\$where",
    r"(?i)\$ne\s*:",
    r"(?i)\$gt\s*:",
    r"(?i)\$lt\s*:",
    r"(?i)\$regex",
    r"(?i)\$exists",
    r"(?i)\$in\s*:",
    r"(?i)\$nin\s*:",
    r"(?i)\$or\s*:",
    r"(?i)\$and\s*:",
    r"(?i)\$nor\s*:",
    r"(?i)\$not\s*:",
    r"(?i)\$size\s*:",
    r"(?i)\$type\s*:",
    r"(?i)\$elemMatch",
    r"(?i)\$text",
    r"(?i)\$mod\s*:",
    r"(?i)\$all\s*:",
];

/// LDAP filter syntax
pub const LDAP_PATTERNS: &[&str] = &[
    r"\(&[^)]*\)",
    r"\(\|[^)]*\)",
    r"\(![^)]*\)",
    r"\*\)",
    r"[&|!]{2,}",
    r"\([&|!].*[=<>].*\)",
];

/// External entities, doctypes, entity references to URLs, CDATA smuggling
pub const XML_PATTERNS: &[&str] = &[
    r"(?i)<!ENTITY\s+\w+\s+SYSTEM",
    r"(?i)<!ENTITY\s+\w+\s+PUBLIC",
    r"(?i)<!DOCTYPE\s+\w+[^>]*SYSTEM",
    r"(?i)<!DOCTYPE\s+\w+[^>]*PUBLIC",
    r"(?i)%[a-zA-Z0-9_]+;.*(file|http|ftp|php|expect):",
    r"(?i)&[a-zA-Z0-9_]+;.*(file|http|ftp|php|expect):",
    r"(?i)<!\[CDATA\[.*(script|eval|exec)",
];

/// The built-in families in evaluation order
pub fn builtin_families() -> [(InjectionCategory, &'static [&'static str]); 6] {
    [
        (InjectionCategory::Sql, SQL_PATTERNS),
        (InjectionCategory::Xss, XSS_PATTERNS),
        (InjectionCategory::Command, COMMAND_PATTERNS),
        (InjectionCategory::NoSql, NOSQL_PATTERNS),
        (InjectionCategory::Ldap, LDAP_PATTERNS),
        (InjectionCategory::Xml, XML_PATTERNS),
    ]
}

/// One compiled entry in the table
struct TableEntry {
    category: InjectionCategory,
    regex: Regex,
}

/// A matched table entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionMatch {
    /// Family of the matching entry
    pub category: InjectionCategory,
    /// Position of the entry in the flattened table
    pub index: usize,
    /// Text the entry matched
    pub matched: String,
}

/// Flattened, ordered injection table.
///
/// Custom patterns go through the same ASCII rewrite of `\b`, `\w` and `\d`
/// as the built-in ones.
pub struct InjectionTable {
    entries: Vec<TableEntry>,
    set: RegexSet,
}

impl InjectionTable {
    /// Compile the built-in families followed by any custom patterns
    pub fn new(config: &InjectionConfig) -> Result<Self> {
        let mut sources: Vec<(InjectionCategory, String)> = builtin_families()
            .into_iter()
            .flat_map(|(category, patterns)| {
                patterns.iter().map(move |p| (category, p.to_string()))
            })
            .collect();
        sources.extend(
            config
                .custom_patterns
                .iter()
                .map(|p| (InjectionCategory::Custom, p.clone())),
        );

        Self::from_sources(sources)
    }

    /// Compile an explicit table
    pub fn from_sources(sources: Vec<(InjectionCategory, String)>) -> Result<Self> {
        let mut entries = Vec::with_capacity(sources.len());
        for (category, source) in &sources {
            let regex = compile("injection", source)?;
            entries.push(TableEntry {
                category: *category,
                regex,
            });
        }

        let set = compile_set("injection", sources.iter().map(|(_, s)| s.as_str()))?;

        Ok(Self { entries, set })
    }

    /// Number of entries in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fast check: does any entry match
    pub fn is_match(&self, text: &str) -> bool {
        self.set.is_match(text)
    }

    /// First entry, in table order, that matches `text`
    pub fn detect(&self, text: &str) -> Option<InjectionMatch> {
        let index = self.set.matches(text).iter().next()?;
        let entry = &self.entries[index];
        let matched = entry
            .regex
            .find(text)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        Some(InjectionMatch {
            category: entry.category,
            index,
            matched,
        })
    }
}

/// Encoded `<script` markers, tested against the raw input
pub const ENCODED_SIGNATURES: &[&str] = &[
    r"(?i)%3Cscript",
    r"(?i)%3C%2Fscript",
    r"(?i)&#60;script",
    r"(?i)&#x3C;script",
    r"(?i)\\x3Cscript",
    r"(?i)\\u003Cscript",
];

/// Matcher for [`ENCODED_SIGNATURES`]
pub struct EncodedSignatures {
    set: RegexSet,
}

impl EncodedSignatures {
    /// Compile the signature set
    pub fn new() -> Result<Self> {
        let set = compile_set("encoded", ENCODED_SIGNATURES)?;
        Ok(Self { set })
    }

    /// Source of the first signature found in `raw`
    pub fn detect(&self, raw: &str) -> Option<&'static str> {
        self.set
            .matches(raw)
            .iter()
            .next()
            .map(|i| ENCODED_SIGNATURES[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> InjectionTable {
        InjectionTable::new(&InjectionConfig::default()).unwrap()
    }

    fn category_of(text: &str) -> Option<InjectionCategory> {
        table().detect(text).map(|m| m.category)
    }

    #[test]
    fn test_all_builtin_patterns_compile() {
        let expected: usize = builtin_families().iter().map(|(_, p)| p.len()).sum();
        assert_eq!(table().len(), expected);
    }

    #[test]
    fn test_sql_patterns() {
        assert_eq!(category_of("' OR 1=1 --"), Some(InjectionCategory::Sql));
        assert_eq!(category_of("DROP TABLE users;"), Some(InjectionCategory::Sql));
        assert_eq!(
            category_of("1 union all select password"),
            Some(InjectionCategory::Sql)
        );
        assert_eq!(category_of("x'; waitfor (5)"), Some(InjectionCategory::Sql));
        assert_eq!(
            category_of("from information_schema.tables"),
            Some(InjectionCategory::Sql)
        );
    }

    #[test]
    fn test_keywords_glued_to_non_ascii_letters() {
        for text in [
            "éDROP TABLE users;",
            "中DROP TABLE users",
            "ñSELECT password FROM users",
            "üUNION SELECT 1",
        ] {
            assert_eq!(category_of(text), Some(InjectionCategory::Sql), "{:?}", text);
        }
        assert_eq!(category_of("éonerror=alert(1)"), Some(InjectionCategory::Xss));
        assert_eq!(category_of("ßeval(x)"), Some(InjectionCategory::Xss));
    }

    #[test]
    fn test_keywords_inside_ascii_words_pass() {
        let table = table();
        for text in ["Tell me about airdrops", "the reselection process", "a dropdown"] {
            assert!(!table.is_match(text), "false positive on {:?}", text);
        }
    }

    #[test]
    fn test_xss_patterns() {
        assert_eq!(
            category_of("<script>alert(1)</script>"),
            Some(InjectionCategory::Xss)
        );
        assert_eq!(
            category_of("<img src=x onerror=alert(1)>"),
            Some(InjectionCategory::Xss)
        );
        assert_eq!(
            category_of("go to javascript:void(0)"),
            Some(InjectionCategory::Xss)
        );
        assert_eq!(category_of("steal document.cookie"), Some(InjectionCategory::Xss));
        assert_eq!(category_of("<iframe src=evil>"), Some(InjectionCategory::Xss));
    }

    #[test]
    fn test_command_patterns() {
        assert_eq!(category_of("hello; whoami"), Some(InjectionCategory::Command));
        assert_eq!(
            category_of("read ../../../etc/passwd"),
            Some(InjectionCategory::Command)
        );
        assert_eq!(category_of("run rm -rf /"), Some(InjectionCategory::Command));
        assert_eq!(category_of("echo ${HOME}"), Some(InjectionCategory::Command));
    }

    #[test]
    fn test_nosql_patterns() {
        assert_eq!(
            category_of(r#"{password: {$ne: null}}"#),
            Some(InjectionCategory::NoSql)
        );
        assert_eq!(category_of("$where: sleep"), Some(InjectionCategory::NoSql));
    }

    #[test]
    fn test_ldap_patterns() {
        assert_eq!(category_of("admin*)(uid=*"), Some(InjectionCategory::Ldap));
        assert_eq!(category_of("(&(uid=x))"), Some(InjectionCategory::Ldap));
    }

    #[test]
    fn test_xml_patterns() {
        assert_eq!(
            category_of(r#"<!ENTITY xxe SYSTEM "file:///etc/passwd">"#),
            Some(InjectionCategory::Xml)
        );
        assert_eq!(
            category_of("<!DOCTYPE foo [ SYSTEM"),
            Some(InjectionCategory::Xml)
        );
    }

    #[test]
    fn test_first_entry_in_table_order_wins() {
        // Matches both the SQL keyword entry and the XSS script entry
        let m = table().detect("<script>select</script>").unwrap();
        assert_eq!(m.category, InjectionCategory::Sql);
        assert_eq!(m.index, 0);
        assert_eq!(m.matched.to_lowercase(), "select");
    }

    #[test]
    fn test_benign_questions_pass() {
        let table = table();
        for text in [
            "Hi, can you tell me about your projects?",
            "What is your favorite anime?",
            "Which languages do you know best",
            "ok",
        ] {
            assert!(!table.is_match(text), "false positive on {:?}", text);
        }
    }

    #[test]
    fn test_custom_patterns_appended() {
        let config = InjectionConfig {
            custom_patterns: vec![r"(?i)\bignore previous instructions\b".to_string()],
        };
        let table = InjectionTable::new(&config).unwrap();
        let m = table
            .detect("please IGNORE previous instructions now")
            .unwrap();
        assert_eq!(m.category, InjectionCategory::Custom);
        assert_eq!(m.index, table.len() - 1);
    }

    #[test]
    fn test_invalid_custom_pattern_is_config_error() {
        let config = InjectionConfig {
            custom_patterns: vec!["(unclosed".to_string()],
        };
        assert!(matches!(
            InjectionTable::new(&config),
            Err(crate::error::GuardError::Pattern { .. })
        ));
    }

    #[test]
    fn test_encoded_signatures() {
        let sigs = EncodedSignatures::new().unwrap();
        assert!(sigs.detect("%3cScRiPt").is_some());
        assert!(sigs.detect("&#x3C;script>").is_some());
        assert!(sigs.detect(r"\u003cscript").is_some());
        assert!(sigs.detect(r"\x3cscript").is_some());
        assert!(sigs.detect("<script>").is_none());
        assert!(sigs.detect("plain text").is_none());
    }
}
