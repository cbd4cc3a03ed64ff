//! Fixed cleanup chain for the business-name column.
//!
//! Kept as data so the emitted `mutate` block is a straight rendering of
//! these tables.

/// Column the cleanup chain applies to.
pub const NAME_FIELD: &str = "사업장명";

/// One `gsub` triple without its field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GsubRule {
    /// Regular expression as Logstash receives it.
    pub pattern: &'static str,
    pub replacement: &'static str,
}

const fn remove(pattern: &'static str) -> GsubRule {
    GsubRule {
        pattern,
        replacement: "",
    }
}

/// Applied in order: entity-type words, parenthesized text (ASCII then
/// full-width), whitespace collapse.
pub const NAME_CLEANUP_RULES: &[GsubRule] = &[
    remove("주식회사"),
    remove("유한회사"),
    remove("유한책임회사"),
    remove("합자회사"),
    remove("합명회사"),
    remove("사단법인"),
    remove("재단법인"),
    remove("농업회사법인"),
    remove("어업회사법인"),
    remove("영농조합법인"),
    remove("영어조합법인"),
    remove(r"\([^)]*\)"),
    remove("（[^）]*）"),
    GsubRule {
        pattern: r"\s+",
        replacement: " ",
    },
];

/// Fields trimmed after the substitutions.
pub const STRIP_FIELDS: &[&str] = &[NAME_FIELD];
