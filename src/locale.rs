//! Locale-aware lowercasing for deck-name search.
//!
//! The search filter compares a deck name against the pattern twice: once
//! folded under the user's locale and once under the root locale. The two
//! folds only disagree for a handful of scripts (Turkish and Azerbaijani
//! dotted/dotless `i` being the common case), which is exactly where a single
//! normalised comparison would miss matches.

use serde::{Deserialize, Serialize};

/// Case-folding rules for a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CaseLocale {
    /// Locale-independent Unicode lowercasing.
    #[default]
    Root,
    /// Turkish / Azerbaijani: `I` lowercases to dotless `ı`, `İ` to `i`.
    Turkic,
}

impl CaseLocale {
    /// Parse a POSIX or BCP 47 locale tag such as `tr_TR.UTF-8` or `az-Latn`.
    ///
    /// Unknown languages map to [`CaseLocale::Root`].
    pub fn from_tag(tag: &str) -> Self {
        let language = tag
            .split(['_', '-', '.', '@'])
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        match language.as_str() {
            "tr" | "az" => CaseLocale::Turkic,
            _ => CaseLocale::Root,
        }
    }

    /// Lowercase `s` under this locale's rules.
    pub fn fold(self, s: &str) -> String {
        match self {
            CaseLocale::Root => s.to_lowercase(),
            CaseLocale::Turkic => {
                let mut out = String::with_capacity(s.len());
                for ch in s.chars() {
                    match ch {
                        'I' => out.push('ı'),
                        'İ' => out.push('i'),
                        _ => out.extend(ch.to_lowercase()),
                    }
                }
                out
            }
        }
    }
}
