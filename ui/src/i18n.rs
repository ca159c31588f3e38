//! Localization for the dashboard chrome (tabs, buttons, progress, errors).
//!
//! Layout (relative to this crate root):
//! ```text
//! i18n.toml
//! i18n/
//!   en-US/tunelog-ui.ftl   (fallback)
//!   de-DE/tunelog-ui.ftl
//! ```
//!
//! Call [`init`] once at app start, then look strings up with `t!`:
//! ```ignore
//! ui::i18n::init();
//! let label = ui::t!("export-data");
//! ```
//!
//! View names and block templates are data, not chrome, and stay untranslated.
use std::sync::Once;

use i18n_embed::fluent::FluentLanguageLoader;
use i18n_embed::LanguageLoader;
use once_cell::sync::Lazy;
use rust_embed::Embed;
use unic_langid::LanguageIdentifier;

pub use i18n_embed_fl::fl;

/// Shorthand for `fl!(&*LOADER, ...)`.
#[macro_export]
macro_rules! t {
    ($key:literal) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key)
    };
    ($key:literal, $( $arg:ident = $value:expr ),+ $(,)?) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key, $( $arg = $value ),+ )
    };
}

/// Fallback file is `i18n/en-US/{DOMAIN}.ftl`.
const DOMAIN: &str = "tunelog-ui";

#[derive(Embed)]
#[folder = "i18n"]
struct Localizations;

pub static LOADER: Lazy<FluentLanguageLoader> = Lazy::new(|| {
    let fallback: LanguageIdentifier = "en-US".parse().expect("valid fallback language identifier");
    FluentLanguageLoader::new(DOMAIN, fallback)
});

static INIT: Once = Once::new();

/// Load the bundles matching the user's languages. Safe to call repeatedly.
pub fn init() {
    INIT.call_once(|| {
        let requested = requested_languages();
        if let Err(err) = i18n_embed::select(&*LOADER, &Localizations, &requested) {
            tracing::warn!(%err, "language selection failed, using fallback");
        }
        disable_isolation();
    });
}

/// Switch language at runtime. Unparseable tags are ignored.
pub fn set_language(tag: &str) -> Result<(), i18n_embed::I18nEmbedError> {
    let lang: LanguageIdentifier = match tag.parse() {
        Ok(l) => l,
        Err(_) => return Ok(()),
    };
    let selected = i18n_embed::select(&*LOADER, &Localizations, &[lang]).map(|_| ());
    disable_isolation();
    selected
}

// Values end up in plain text and file names. Loading bundles resets the
// flag, so this runs after every selection.
fn disable_isolation() {
    LOADER.set_use_isolating(false);
}

/// Embedded language tags, sorted.
pub fn available_languages() -> Vec<String> {
    let mut langs = Localizations::iter()
        .filter_map(|path| path.split('/').next().map(|s| s.to_string()))
        .collect::<Vec<_>>();
    langs.sort();
    langs.dedup();
    langs
}

/// Tag of the language currently in use.
pub fn current_language() -> String {
    LOADER.current_language().to_string()
}

#[cfg(target_arch = "wasm32")]
fn requested_languages() -> Vec<LanguageIdentifier> {
    i18n_embed::WebLanguageRequester::requested_languages()
}

#[cfg(not(target_arch = "wasm32"))]
fn requested_languages() -> Vec<LanguageIdentifier> {
    i18n_embed::DesktopLanguageRequester::requested_languages()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_locales_are_embedded() {
        let langs = available_languages();
        assert!(langs.iter().any(|l| l == "en-US"));
        assert!(langs.iter().any(|l| l == "de-DE"));
    }

    #[test]
    fn fallback_lookup_works() {
        init();
        assert_eq!(fl!(&*LOADER, "app-title"), "Tunelog");
    }

    #[test]
    fn unknown_language_keeps_current_strings() {
        init();
        let before = fl!(&*LOADER, "app-title");
        let _ = set_language("zz-ZZ");
        assert_eq!(fl!(&*LOADER, "app-title"), before);
    }

    #[test]
    fn arguments_are_inserted_without_isolation_marks() {
        init();
        let text = fl!(&*LOADER, "export-saved-to", path = "/tmp/x.json");
        assert!(text.ends_with("/tmp/x.json"));
        assert!(!text.contains('\u{2068}'));
    }

    #[test]
    fn switching_language_keeps_arguments_plain() {
        init();
        set_language("en-US").unwrap();
        let text = fl!(&*LOADER, "block-error", error = "missing.json");
        assert!(!text.contains('\u{2068}') && !text.contains('\u{2069}'));
        assert!(text.contains("missing.json"));
    }

    #[test]
    fn current_language_is_a_known_tag() {
        init();
        let current = current_language();
        assert!(available_languages().contains(&current));
    }
}
