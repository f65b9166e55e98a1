use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::core::error::{Error, ErrorKind, Result};

/// Namespace for content-derived entry ids.
const ENTRY_NAMESPACE: Uuid = Uuid::from_u128(0x6f0d_3b8e_5c1a_4e8f_9a27_d4c1_0b6e_7a13);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryId(pub Uuid);

impl EntryId {
    pub fn new() -> Self {
        EntryId(Uuid::new_v4())
    }

    /// Same language pair and texts always give the same id, so inserting
    /// identical content twice replaces rather than duplicates.
    pub fn for_content(source_lang: &Language, target_lang: &Language, source: &str, translation: &str) -> Self {
        let mut key = Vec::with_capacity(source.len() + translation.len() + 16);
        for part in [source_lang.as_str(), target_lang.as_str(), source, translation] {
            key.extend_from_slice(part.as_bytes());
            key.push(0);
        }
        EntryId(Uuid::new_v5(&ENTRY_NAMESPACE, &key))
    }
}

impl Default for EntryId {
    fn default() -> Self {
        EntryId::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for EntryId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(EntryId)
            .map_err(|e| Error::new(ErrorKind::InvalidArgument, format!("Invalid entry id '{}': {}", s, e)))
    }
}

/// Canonical language tag: `pt-br` becomes `pt_BR`, `sr@latin` stays as is.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Language(String);

impl Language {
    pub fn parse(tag: &str) -> Result<Self> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(Error::new(ErrorKind::InvalidArgument, "Empty language tag".to_string()));
        }

        let invalid = || Error::new(ErrorKind::InvalidArgument, format!("Malformed language tag '{}'", tag));

        let (main, variant) = match tag.split_once('@') {
            Some((main, variant)) => (main, Some(variant)),
            None => (tag, None),
        };

        let mut parts = main.split(['_', '-']);
        let lang = parts.next().unwrap_or_default();
        if !(2..=8).contains(&lang.len()) || !lang.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }

        let mut canonical = lang.to_ascii_lowercase();
        for part in parts {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(invalid());
            }
            canonical.push('_');
            match part.len() {
                2 => canonical.push_str(&part.to_ascii_uppercase()),
                4 => {
                    // script subtag, e.g. Latn
                    let mut chars = part.chars();
                    if let Some(first) = chars.next() {
                        canonical.push(first.to_ascii_uppercase());
                    }
                    canonical.push_str(&chars.as_str().to_ascii_lowercase());
                }
                _ => canonical.push_str(part),
            }
        }

        if let Some(variant) = variant {
            if variant.is_empty() || !variant.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(invalid());
            }
            canonical.push('@');
            canonical.push_str(&variant.to_ascii_lowercase());
        }

        Ok(Language(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Bare language subtag (`pt` for `pt_BR`).
    pub fn lang(&self) -> &str {
        self.0.split(['_', '@']).next().unwrap_or(&self.0)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Language::parse(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LangPair {
    pub source: Language,
    pub target: Language,
}

impl LangPair {
    pub fn new(source: Language, target: Language) -> Self {
        LangPair { source, target }
    }
}

/// A stored translation. Never mutated after commit; updates are a delete
/// followed by an insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub source_lang: Language,
    pub target_lang: Language,
    pub source: String,
    pub translation: String,
    pub created_at: DateTime<Utc>,
}

impl Entry {
    pub fn new(
        source_lang: Language,
        target_lang: Language,
        source: String,
        translation: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        let id = EntryId::for_content(&source_lang, &target_lang, &source, &translation);
        Entry {
            id,
            source_lang,
            target_lang,
            source,
            translation,
            created_at,
        }
    }

    pub fn lang_pair(&self) -> LangPair {
        LangPair::new(self.source_lang.clone(), self.target_lang.clone())
    }

    pub fn matches_pair(&self, pair: &LangPair) -> bool {
        self.source_lang == pair.source && self.target_lang == pair.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_language_tags() {
        assert_eq!(Language::parse("pt-br").unwrap().as_str(), "pt_BR");
        assert_eq!(Language::parse("EN").unwrap().as_str(), "en");
        assert_eq!(Language::parse("sr@Latin").unwrap().as_str(), "sr@latin");
        assert_eq!(Language::parse("zh_hant_TW").unwrap().as_str(), "zh_Hant_TW");
        assert_eq!(Language::parse("es-419").unwrap().as_str(), "es_419");
        assert_eq!(Language::parse("pt_BR").unwrap().lang(), "pt");
    }

    #[test]
    fn rejects_malformed_tags() {
        assert!(Language::parse("").is_err());
        assert!(Language::parse("e").is_err());
        assert!(Language::parse("en__US").is_err());
        assert!(Language::parse("en@").is_err());
        assert!(Language::parse("1x").is_err());
    }

    #[test]
    fn content_ids_are_deterministic() {
        let en = Language::parse("en").unwrap();
        let fr = Language::parse("fr").unwrap();
        let a = EntryId::for_content(&en, &fr, "Hello", "Bonjour");
        let b = EntryId::for_content(&en, &fr, "Hello", "Bonjour");
        let c = EntryId::for_content(&en, &fr, "Hello", "Salut");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn entry_id_string_round_trip() {
        let id = EntryId::new();
        let parsed: EntryId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("not-a-uuid".parse::<EntryId>().is_err());
    }
}
