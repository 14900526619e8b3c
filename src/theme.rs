use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;

/// Read-only theme configuration (`colors`, `shadows`, `spacing`,
/// `breakpoints`, `animations`, ...). Looked up by dotted path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Theme(Value);

impl Theme {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Walk `colors.primary` style paths. Numeric segments index arrays.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        self.lookup_segments(path.split('.'))
    }

    pub fn lookup_segments<'a, I>(&self, segments: I) -> Option<&Value>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut current = &self.0;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    fn group(&self, name: &str) -> Option<&serde_json::Map<String, Value>> {
        self.0.get(name)?.as_object()
    }

    /// Shadow token names in authored order.
    pub fn shadow_tokens(&self) -> impl Iterator<Item = &str> {
        self.group("shadows")
            .into_iter()
            .flat_map(|m| m.keys().map(String::as_str))
    }

    pub fn has_shadow(&self, token: &str) -> bool {
        self.group("shadows").is_some_and(|m| m.contains_key(token))
    }

    /// Spacing value as written. Bare numbers are px lengths (`16` -> `16px`).
    pub fn spacing(&self, key: &str) -> Option<Cow<'_, str>> {
        match self.group("spacing")?.get(key)? {
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) => Some(Cow::Owned(format!("{}px", n))),
            _ => None,
        }
    }

    pub fn animation(&self, name: &str) -> Option<&Value> {
        self.group("animations")?.get(name)
    }

    pub fn breakpoint(&self, name: &str) -> Option<&Value> {
        self.group("breakpoints")?.get(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Languages {
    pub default: String,
    #[serde(default)]
    pub translations: HashMap<String, HashMap<String, String>>,
}

impl Default for Languages {
    fn default() -> Self {
        Self {
            default: "en".to_string(),
            translations: HashMap::new(),
        }
    }
}

impl Languages {
    /// Exact lookup in one language, no fallback.
    pub fn get(&self, lang: &str, key: &str) -> Option<&str> {
        self.translations.get(lang)?.get(key).map(String::as_str)
    }

    /// Current language first, then the default language.
    pub fn translate(&self, lang: &str, key: &str) -> Option<&str> {
        self.get(lang, key).or_else(|| self.get(&self.default, key))
    }
}
