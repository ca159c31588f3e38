//! Text blocks: `{placeholder}` templates bound to a scalar dictionary.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::dataset::{DataError, ScalarDict, ScalarValue};
use crate::core::format::format_number;
use crate::core::DashboardContext;

// "I" opening the text, a `<li>`/`<p>` element or a sentence.
static SENTENCE_START_I: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^\s*|<(?:li|p)>\s*|\.\s+)I\b").expect("valid pronoun pattern"));
static WORD_I: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bI\b").expect("valid pronoun pattern"));
static WORD_MY_UPPER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bMy\b").expect("valid pronoun pattern"));
static WORD_MY_LOWER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bmy\b").expect("valid pronoun pattern"));

#[derive(Debug, Clone, PartialEq)]
pub struct TextRenderer {
    template: String,
    dictionary: Option<String>,
}

impl TextRenderer {
    /// Template bound to the scalar dictionary `dictionary`.
    pub fn new(template: impl Into<String>, dictionary: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            dictionary: Some(dictionary.into()),
        }
    }

    /// Static text with nothing to substitute and nothing to export.
    pub fn fixed(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            dictionary: None,
        }
    }

    pub fn dictionary(&self) -> Option<&str> {
        self.dictionary.as_deref()
    }

    pub async fn render(&self, ctx: &DashboardContext) -> Result<String, DataError> {
        let values = match &self.dictionary {
            Some(name) => Some(ctx.cache().scalars(name).await?),
            None => None,
        };

        let mut text = if ctx.is_personalized() {
            personalize(&self.template)
        } else {
            self.template.clone()
        };
        if let Some(values) = values {
            text = substitute(&text, &values);
        }
        Ok(text)
    }
}

/// Replace every `{key}` that names an entry of `values`. Numbers are
/// formatted en-US; strings go in as-is. Unknown placeholders are kept.
pub fn substitute(template: &str, values: &ScalarDict) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find(['{', '}']) else {
            out.push_str(&rest[open..]);
            return out;
        };
        if after.as_bytes()[close] == b'{' {
            // nested brace: emit the stray `{` and retry from the inner one
            out.push('{');
            rest = after;
            continue;
        }

        let key = &after[..close];
        match values.get(key) {
            Some(ScalarValue::Number(number)) => out.push_str(&format_number(*number)),
            Some(ScalarValue::Text(text)) => out.push_str(text),
            None => {
                out.push('{');
                out.push_str(key);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

/// Rewrite first-person pronouns to second person.
pub fn personalize(text: &str) -> String {
    let text = SENTENCE_START_I.replace_all(text, "${1}You");
    let text = WORD_I.replace_all(&text, "you");
    let text = WORD_MY_UPPER.replace_all(&text, "Your");
    WORD_MY_LOWER.replace_all(&text, "your").into_owned()
}
