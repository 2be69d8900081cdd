use crate::locale::CaseLocale;
use crate::models::DeckId;

/// The always-present "Default" deck.
pub const DEFAULT_DECK_ID: DeckId = 1;

/// Separator between the components of a hierarchical deck name.
pub const DECK_NAME_SEPARATOR: &str = "::";

/// Nesting limit applied when a forest is validated and when ancestor chains
/// are walked.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Environment variables consulted for the default locale, in priority order.
pub const LOCALE_ENV_VARS: [&str; 3] = ["LC_ALL", "LC_CTYPE", "LANG"];

/// Resolve the process default locale used for case folding.
///
/// Falls back to [`CaseLocale::Root`] when no locale variable is set or the
/// value is not recognised.
pub fn default_locale() -> CaseLocale {
    LOCALE_ENV_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
        .map(|tag| CaseLocale::from_tag(&tag))
        .unwrap_or_default()
}
