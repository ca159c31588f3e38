#![cfg(test)]
/*!
Theme selector lint for the desktop build.

The dashboard components and the table HTML emit these class names; the
shared theme (`ui/assets/theme/main.css`, embedded by the desktop shell)
must keep styling them. When renaming a class, change the component markup
and this list together.
*/

const THEME_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

const NAVBAR_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/styling/navbar.css"
));

const REQUIRED_SELECTORS: &[&str] = &[
    // Global / layout
    ":root",
    "body {",
    ".page {",
    // Buttons
    ".button {",
    ".button--primary",
    ".button--ghost",
    // Dashboard and blocks
    ".dashboard__notice",
    ".dashboard__error",
    ".view {",
    ".block {",
    ".block--text",
    ".block--chart",
    ".block--error",
    ".block__error",
    ".highlight",
    // Sortable tables
    ".data-table",
    ".sorting",
    ".sortingAsc",
    ".sortingDesc",
    // Export buttons
    ".export-bar",
    ".export-bar__meta--success",
    ".export-bar__meta--error",
    // Upload and filter
    ".upload {",
    ".upload__progress",
    ".upload__message",
    ".filter {",
    ".filter__field",
    ".filter__actions",
    // Responsive block
    "@media (max-width: 720px)",
];

const REQUIRED_NAVBAR_SELECTORS: &[&str] = &[
    ".navbar {",
    ".navbar__brand-mark",
    ".navbar__links",
    ".navbar__link {",
    ".navbar__link--active",
    ".navbar__locale",
];

fn missing(css: &str, selectors: &[&'static str]) -> Vec<&'static str> {
    selectors
        .iter()
        .copied()
        .filter(|sel| !css.contains(sel))
        .collect()
}

#[test]
fn unified_theme_contains_required_selectors() {
    let missing = missing(THEME_CSS, REQUIRED_SELECTORS);
    assert!(
        missing.is_empty(),
        "Missing {} required CSS selectors/tokens in unified theme:\n{}",
        missing.len(),
        missing.join("\n")
    );
}

#[test]
fn navbar_styles_cover_the_tabs() {
    let missing = missing(NAVBAR_CSS, REQUIRED_NAVBAR_SELECTORS);
    assert!(
        missing.is_empty(),
        "Missing navbar selectors:\n{}",
        missing.join("\n")
    );
}

#[test]
fn unified_theme_not_trivially_empty() {
    let non_ws_len = THEME_CSS.chars().filter(|c| !c.is_whitespace()).count();
    assert!(
        non_ws_len > 2_000,
        "Embedded theme appears unexpectedly small ({non_ws_len} non-whitespace chars); \
         did the file get truncated or the path change?"
    );
}
