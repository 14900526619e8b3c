//! Token Resolvers
//!
//! Three whole-value substitution passes:
//! - translation tokens `$t:key`
//! - theme tokens `$theme.a.b`
//! - block variables `$name` (only while instantiating a block)
//!
//! Every pass soft-fails: a token that cannot be resolved is returned
//! untouched so missing copy or theme values stay visible in the output.
//! A value is rewritten by at most one pass, and the output of a pass is
//! never fed back into the same pass.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::Value;
use std::borrow::Cow;

use crate::model::{BlockVars, Props};
use crate::theme::{Languages, Theme};

pub const TRANSLATION_PREFIX: &str = "$t:";
pub const THEME_PREFIX: &str = "$theme.";

lazy_static! {
    /// `$name` occurrences inside a larger string (interpolation mode only).
    static ref INLINE_VAR_RE: Regex = Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").unwrap();
}

pub fn translation_key(value: &str) -> Option<&str> {
    value
        .strip_prefix(TRANSLATION_PREFIX)
        .filter(|key| !key.is_empty())
}

pub fn theme_path(value: &str) -> Option<&str> {
    value.strip_prefix(THEME_PREFIX).filter(|path| !path.is_empty())
}

/// Name of a whole-value block variable token, e.g. `$label` -> `label`.
pub fn variable_name(value: &str) -> Option<&str> {
    let name = value.strip_prefix('$')?;
    if name.is_empty() || translation_key(value).is_some() || theme_path(value).is_some() {
        return None;
    }
    Some(name)
}

pub fn resolve_translation_token<'a>(
    value: &'a Value,
    current_lang: &str,
    languages: &Languages,
) -> Cow<'a, Value> {
    match value.as_str().and_then(translation_key) {
        Some(key) => match languages.translate(current_lang, key) {
            Some(text) => Cow::Owned(Value::String(text.to_string())),
            None => Cow::Borrowed(value),
        },
        None => Cow::Borrowed(value),
    }
}

pub fn resolve_theme_token<'a>(value: &'a Value, theme: &Theme) -> Cow<'a, Value> {
    match value.as_str().and_then(theme_path) {
        Some(path) => match theme.lookup(path) {
            Some(found) => Cow::Owned(found.clone()),
            None => Cow::Borrowed(value),
        },
        None => Cow::Borrowed(value),
    }
}

pub fn resolve_block_variable<'a>(value: &'a Value, vars: &BlockVars) -> Cow<'a, Value> {
    match value.as_str().and_then(variable_name) {
        Some(name) => match vars.get(name) {
            Some(scalar) => Cow::Owned(scalar.to_value()),
            None => Cow::Borrowed(value),
        },
        None => Cow::Borrowed(value),
    }
}

/// Text form of a resolved value for places that only hold strings
/// (content, class names). Objects and arrays have no text form.
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RENDER-TIME PASS (translation → theme)
// ═══════════════════════════════════════════════════════════════════════════════

/// Translation and theme substitution bound to one render's read-only inputs.
#[derive(Debug, Clone, Copy)]
pub struct TokenPass<'a> {
    pub current_lang: &'a str,
    pub languages: &'a Languages,
    pub theme: &'a Theme,
}

/// Resolved `content` plus the translation key it came from, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedContent {
    pub text: String,
    pub translation_key: Option<String>,
}

impl<'a> TokenPass<'a> {
    pub fn new(current_lang: &'a str, languages: &'a Languages, theme: &'a Theme) -> Self {
        Self {
            current_lang,
            languages,
            theme,
        }
    }

    /// Resolve one leaf string. Translation wins; a translated string is final.
    pub fn resolve_str<'v>(&self, value: &'v Value) -> Cow<'v, Value> {
        let translated = resolve_translation_token(value, self.current_lang, self.languages);
        if let Cow::Owned(_) = translated {
            return translated;
        }
        resolve_theme_token(value, self.theme)
    }

    /// Resolve a value tree: strings anywhere inside objects and arrays.
    pub fn resolve_value(&self, value: &Value) -> Value {
        match value {
            Value::String(_) => self.resolve_str(value).into_owned(),
            Value::Array(items) => Value::Array(items.iter().map(|v| self.resolve_value(v)).collect()),
            Value::Object(map) => Value::Object(self.resolve_props(map)),
            other => other.clone(),
        }
    }

    /// A `style` written as a CSS string also gets its declaration values
    /// resolved, once, against the authored text.
    pub fn resolve_props(&self, props: &Props) -> Props {
        props
            .iter()
            .map(|(k, v)| {
                let resolved = match v {
                    Value::String(css) if k == "style" => self.resolve_declarations(v, css),
                    _ => self.resolve_value(v),
                };
                (k.clone(), resolved)
            })
            .collect()
    }

    /// `color: $theme.colors.primary; padding: 0` with each value theme-resolved.
    /// A whole-value token (e.g. a translated style string) is final as is.
    fn resolve_declarations(&self, value: &Value, css: &str) -> Value {
        if let Cow::Owned(whole) = self.resolve_str(value) {
            return whole;
        }
        if !css.contains(THEME_PREFIX) {
            return value.clone();
        }
        let declarations: Vec<String> = css
            .split(';')
            .map(|declaration| {
                let resolved = declaration.split_once(':').and_then(|(key, raw)| {
                    let found = self.theme.lookup(theme_path(raw.trim())?)?;
                    Some(format!("{}: {}", key.trim(), value_to_text(found)?))
                });
                resolved.unwrap_or_else(|| declaration.to_string())
            })
            .collect();
        Value::String(declarations.join(";"))
    }

    pub fn resolve_content(&self, content: &str) -> ResolvedContent {
        let raw = Value::String(content.to_string());
        let text = match self.resolve_str(&raw) {
            Cow::Owned(v) => value_to_text(&v).unwrap_or_else(|| content.to_string()),
            Cow::Borrowed(_) => content.to_string(),
        };
        let translation_key = translation_key(content)
            .filter(|key| self.languages.translate(self.current_lang, key).is_some())
            .map(str::to_string);
        ResolvedContent {
            text,
            translation_key,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BLOCK VARIABLE PASS
// ═══════════════════════════════════════════════════════════════════════════════

/// Substitute block variables in place, through nested objects and arrays.
///
/// Whole-value tokens keep the variable's scalar type. With `interpolate`,
/// `$name` occurrences inside larger strings are also replaced by the
/// variable's text form; unknown names are left as written.
pub fn substitute_vars(value: &mut Value, vars: &BlockVars, interpolate: bool) {
    match value {
        Value::String(s) => {
            if let Some(scalar) = variable_name(s).and_then(|name| vars.get(name)) {
                *value = scalar.to_value();
            } else if interpolate {
                if let Some(replaced) = interpolate_vars(s, vars) {
                    *s = replaced;
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                substitute_vars(item, vars, interpolate);
            }
        }
        Value::Object(map) => {
            for (_, v) in map.iter_mut() {
                substitute_vars(v, vars, interpolate);
            }
        }
        _ => {}
    }
}

/// Same as `substitute_vars` for string-only slots such as `content`.
pub fn substitute_vars_in_text(text: &str, vars: &BlockVars, interpolate: bool) -> String {
    if let Some(scalar) = variable_name(text).and_then(|name| vars.get(name)) {
        return scalar.to_text();
    }
    if interpolate {
        if let Some(replaced) = interpolate_vars(text, vars) {
            return replaced;
        }
    }
    text.to_string()
}

fn interpolate_vars(text: &str, vars: &BlockVars) -> Option<String> {
    if !text.contains('$') || translation_key(text).is_some() || theme_path(text).is_some() {
        return None;
    }
    let replaced = INLINE_VAR_RE.replace_all(text, |caps: &Captures| match vars.get(&caps[1]) {
        Some(scalar) => scalar.to_text(),
        None => caps[0].to_string(),
    });
    match replaced {
        Cow::Owned(s) => Some(s),
        Cow::Borrowed(_) => None,
    }
}
