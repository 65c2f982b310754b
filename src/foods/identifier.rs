use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

lazy_static! {
    static ref CANONICAL_ID_RE: Regex = Regex::new(
        r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$"
    )
    .unwrap();
}

/// True when `raw` is a hyphenated 36-char identifier with version 1..5 and RFC variant.
pub fn is_canonical(raw: &str) -> bool {
    CANONICAL_ID_RE.is_match(raw)
}

/// Where a transient food candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceTag {
    /// Suggestion from photo recognition.
    Recognition,
    /// Suggestion from text search.
    Search,
    /// Entered by the user.
    Custom,
    /// Fixed payload used when recognition could not be parsed.
    Fallback,
    /// Anything that is neither prefixed nor canonical.
    Foreign,
}

impl SourceTag {
    const RESERVED: [SourceTag; 4] = [
        SourceTag::Recognition,
        SourceTag::Search,
        SourceTag::Custom,
        SourceTag::Fallback,
    ];

    pub const fn prefix(self) -> &'static str {
        match self {
            SourceTag::Recognition => "gemini_",
            SourceTag::Search => "search_",
            SourceTag::Custom => "custom_",
            SourceTag::Fallback => "fallback_",
            SourceTag::Foreign => "",
        }
    }
}

/// Identity of a food record: either a catalog row or a local placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FoodId {
    Persisted(Uuid),
    Transient(SourceTag, String),
}

impl FoodId {
    pub fn parse(raw: &str) -> Self {
        for tag in SourceTag::RESERVED {
            if let Some(token) = raw.strip_prefix(tag.prefix()) {
                return FoodId::Transient(tag, token.to_string());
            }
        }
        if is_canonical(raw) {
            if let Ok(id) = Uuid::parse_str(raw) {
                return FoodId::Persisted(id);
            }
        }
        FoodId::Transient(SourceTag::Foreign, raw.to_string())
    }

    /// Placeholder id stamped with the current unix millis, e.g. `search_1700000000000_2`.
    pub fn generate(tag: SourceTag, index: Option<usize>) -> Self {
        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        let token = match index {
            Some(i) => format!("{millis}_{i}"),
            None => millis.to_string(),
        };
        FoodId::Transient(tag, token)
    }

    pub fn persisted(&self) -> Option<Uuid> {
        match self {
            FoodId::Persisted(id) => Some(*id),
            FoodId::Transient(..) => None,
        }
    }
}

impl fmt::Display for FoodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FoodId::Persisted(id) => write!(f, "{}", id.hyphenated()),
            FoodId::Transient(tag, token) => write!(f, "{}{}", tag.prefix(), token),
        }
    }
}

impl From<String> for FoodId {
    fn from(raw: String) -> Self {
        FoodId::parse(&raw)
    }
}

impl From<FoodId> for String {
    fn from(id: FoodId) -> Self {
        id.to_string()
    }
}

impl From<Uuid> for FoodId {
    fn from(id: Uuid) -> Self {
        FoodId::Persisted(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_format_checks_version_and_variant() {
        assert!(is_canonical("a1b2c3d4-e5f6-4a1b-8c2d-1234567890ab"));
        assert!(is_canonical("A1B2C3D4-E5F6-4A1B-8C2D-1234567890AB"));
        // version nibble 0 and 7
        assert!(!is_canonical("a1b2c3d4-e5f6-0a1b-8c2d-1234567890ab"));
        assert!(!is_canonical("a1b2c3d4-e5f6-7a1b-8c2d-1234567890ab"));
        // variant nibble c
        assert!(!is_canonical("a1b2c3d4-e5f6-4a1b-cc2d-1234567890ab"));
        assert!(!is_canonical("a1b2c3d4e5f64a1b8c2d1234567890ab"));
        assert!(!is_canonical("gemini_1700000000_0"));
    }

    #[test]
    fn parse_classifies_reserved_prefixes_as_transient() {
        assert_eq!(
            FoodId::parse("gemini_1700000000_0"),
            FoodId::Transient(SourceTag::Recognition, "1700000000_0".into())
        );
        assert_eq!(
            FoodId::parse("search_1_2"),
            FoodId::Transient(SourceTag::Search, "1_2".into())
        );
        assert_eq!(
            FoodId::parse("custom_42"),
            FoodId::Transient(SourceTag::Custom, "42".into())
        );
        assert_eq!(
            FoodId::parse("fallback_42"),
            FoodId::Transient(SourceTag::Fallback, "42".into())
        );
    }

    #[test]
    fn prefixed_canonical_id_is_still_transient() {
        let id = FoodId::parse("custom_a1b2c3d4-e5f6-4a1b-8c2d-1234567890ab");
        assert!(id.persisted().is_none());
    }

    #[test]
    fn parse_accepts_canonical_and_tags_everything_else_foreign() {
        let id = FoodId::parse("a1b2c3d4-e5f6-4a1b-8c2d-1234567890ab");
        assert_eq!(
            id.persisted(),
            Some(Uuid::parse_str("a1b2c3d4-e5f6-4a1b-8c2d-1234567890ab").unwrap())
        );
        assert_eq!(
            FoodId::parse("3"),
            FoodId::Transient(SourceTag::Foreign, "3".into())
        );
    }

    #[test]
    fn display_restores_the_raw_string() {
        for raw in [
            "gemini_1700000000_0",
            "fallback_99",
            "a1b2c3d4-e5f6-4a1b-8c2d-1234567890ab",
            "whatever",
        ] {
            assert_eq!(FoodId::parse(raw).to_string(), raw);
        }
    }

    #[test]
    fn generate_uses_the_source_prefix() {
        let id = FoodId::generate(SourceTag::Search, Some(3)).to_string();
        assert!(id.starts_with("search_"));
        assert!(id.ends_with("_3"));
        let id = FoodId::generate(SourceTag::Custom, None).to_string();
        assert!(id.starts_with("custom_"));
    }

    #[test]
    fn serde_goes_through_the_string_form() {
        let id: FoodId = serde_json::from_str("\"gemini_5_1\"").unwrap();
        assert_eq!(id, FoodId::Transient(SourceTag::Recognition, "5_1".into()));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"gemini_5_1\"");
    }
}
