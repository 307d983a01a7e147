//! Locales and multi-locale text as the API sends them.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// UI/content language. Sent as the `x-lang` header and used as the key of
/// multi-locale fields.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
    Uz,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Ru, Locale::Uz];

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ru => "ru",
            Locale::Uz => "uz",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Locale {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ru" => Ok(Locale::Ru),
            "uz" => Ok(Locale::Uz),
            _ => Err(()),
        }
    }
}

/// A title or description: either a single string or a map keyed by locale code.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum LocalizedText {
    Plain(String),
    Map(BTreeMap<String, Option<String>>),
}

impl Default for LocalizedText {
    fn default() -> Self {
        LocalizedText::Plain(String::new())
    }
}

impl LocalizedText {
    /// Text for `locale`, falling back to English, then to any non-empty entry.
    pub fn get(&self, locale: Locale) -> Option<&str> {
        match self {
            LocalizedText::Plain(s) => non_empty(s),
            LocalizedText::Map(map) => {
                let lookup = |code: &str| map.get(code).and_then(|v| v.as_deref()).and_then(non_empty);
                lookup(locale.code())
                    .or_else(|| lookup(Locale::En.code()))
                    .or_else(|| map.values().flatten().find_map(|v| non_empty(v)))
            }
        }
    }

    /// Expands into one entry per known locale. A plain string fills every locale.
    pub fn to_locale_map(&self) -> BTreeMap<Locale, String> {
        match self {
            LocalizedText::Plain(s) => Locale::ALL
                .iter()
                .filter(|_| !s.trim().is_empty())
                .map(|l| (*l, s.clone()))
                .collect(),
            LocalizedText::Map(map) => map
                .iter()
                .filter_map(|(code, value)| {
                    let locale = code.parse::<Locale>().ok()?;
                    let value = value.as_deref().and_then(non_empty)?;
                    Some((locale, value.to_string()))
                })
                .collect(),
        }
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
