//! Style & Animation Composer
//!
//! Builds the final style bag of a component from five layers, merged left to
//! right so later layers win on key conflicts:
//!
//! 1. base layout style (`flex` / `grid` props)
//! 2. animation (explicit interactions, else type defaults)
//! 3. shadow (explicit `shadow` prop, else the type default)
//! 4. spacing (type default from `theme.spacing`)
//! 5. explicit prop-level style (`gap`, `style`)
//!
//! All lookup tables are pure functions of `(kind, theme)`.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Value};
use std::collections::HashSet;

use crate::animation::{compose_animation, shadow_value, Stagger};
use crate::model::{ComponentKind, Interactions, Props};
use crate::theme::Theme;

pub type StyleMap = Props;

lazy_static! {
    static ref STANDARD_SHADOWS: HashSet<&'static str> =
        ["none", "sm", "md", "lg", "xl", "2xl", "inner"].into_iter().collect();

    /// Properties React and the HTML renderer leave unitless.
    static ref UNITLESS_PROPERTIES: HashSet<&'static str> = [
        "opacity", "zIndex", "fontWeight", "lineHeight", "flex", "flexGrow", "flexShrink",
        "order", "zoom", "aspectRatio", "gridRow", "gridColumn", "columnCount", "scale",
    ]
    .into_iter()
    .collect();

    /// One CSS length/size component: `12px`, `1.5rem`, `50%`, `0`, `auto`, `calc(...)`.
    static ref CSS_SIZE_RE: Regex = {
        let unit = r"(?:-?(?:\d+(?:\.\d+)?|\.\d+)(?:px|rem|em|%|vh|vw|vmin|vmax|svh|dvh|lvh|ch|ex|pt)|0|auto|(?:calc|clamp|min|max|var)\([^;]*\))";
        Regex::new(&format!(r"^{unit}(?:\s+{unit})*$")).unwrap()
    };

    /// Utility class token such as `py-16` or `md:max-w-7xl`.
    static ref UTILITY_CLASS_RE: Regex =
        Regex::new(r"^(?:[a-z0-9]+:)*-?[a-z0-9]+(?:-[a-z0-9./\[\]%]+)+$").unwrap();
}

/// Props consumed by style composition; they never reach `finalProps`.
pub const STYLE_PROPS: &[&str] = &["style", "shadow"];
const FLEX_PROPS: &[&str] = &["direction", "align", "justify", "wrap", "gap"];
const GRID_PROPS: &[&str] = &["columns", "gap"];

/// Style, extra attributes and class names produced for one component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComposedStyle {
    pub style: StyleMap,
    pub attributes: Props,
    pub class_names: Vec<String>,
    pub stagger: Option<Stagger>,
}

/// How a theme spacing value lands on the element.
#[derive(Debug, Clone, PartialEq)]
pub enum Spacing {
    Inline(StyleMap),
    /// Not a CSS size, but a utility-class string the output layer understands.
    Class(String),
}

pub fn compose_style(
    kind: &ComponentKind,
    props: &Props,
    interactions: Option<&Interactions>,
    theme: &Theme,
) -> ComposedStyle {
    let mut composed = ComposedStyle::default();

    merge_into(&mut composed.style, layout_style(kind, props));

    let animation = compose_animation(kind, interactions, theme);
    merge_into(&mut composed.style, animation.style);
    composed.attributes = animation.attributes;
    composed.stagger = animation.stagger;

    let shadow = match props.get("shadow") {
        Some(explicit) => explicit_shadow(explicit),
        None => resolve_shadow(kind, theme),
    };
    if let Some(shadow) = shadow {
        merge_into(&mut composed.style, shadow);
    }

    match resolve_spacing(kind, theme) {
        Some(Spacing::Inline(spacing)) => merge_into(&mut composed.style, spacing),
        Some(Spacing::Class(class)) => composed.class_names.push(class),
        None => {}
    }

    let mut explicit = StyleMap::new();
    if is_layout_kind(kind) {
        if let Some(gap) = props.get("gap") {
            explicit.insert("gap".to_string(), css_value("gap", gap));
        }
    }
    if let Some(raw) = props.get("style") {
        merge_into(&mut explicit, parse_style(raw));
    }
    merge_into(&mut composed.style, explicit);

    composed
}

/// Keys of `props` that style composition consumed for this kind.
pub fn consumed_props(kind: &ComponentKind) -> impl Iterator<Item = &'static str> {
    let layout: &[&str] = match kind {
        ComponentKind::Flex => FLEX_PROPS,
        ComponentKind::Grid => GRID_PROPS,
        _ => &[],
    };
    STYLE_PROPS.iter().chain(layout.iter()).copied()
}

pub fn merge_into(target: &mut StyleMap, layer: StyleMap) {
    for (key, value) in layer {
        target.insert(key, value);
    }
}

fn is_layout_kind(kind: &ComponentKind) -> bool {
    matches!(kind, ComponentKind::Flex | ComponentKind::Grid)
}

// ═══════════════════════════════════════════════════════════════════════════════
// RAW STYLE PARSING
// ═══════════════════════════════════════════════════════════════════════════════

/// Normalize a token-resolved `style` (CSS declaration string or object) into
/// a camelCase map. Values are taken as they come out of the render pass.
pub fn parse_style(raw: &Value) -> StyleMap {
    let mut style = StyleMap::new();
    match raw {
        Value::String(css) => {
            for declaration in css.split(';') {
                let Some((key, value)) = declaration.split_once(':') else {
                    continue;
                };
                let (key, value) = (key.trim(), value.trim());
                if key.is_empty() || value.is_empty() {
                    continue;
                }
                style.insert(camel_case(key), Value::String(value.to_string()));
            }
        }
        Value::Object(map) => {
            for (key, value) in map {
                let key = camel_case(key);
                let value = css_value(&key, value);
                style.insert(key, value);
            }
        }
        _ => {}
    }
    style
}

/// Numbers on length properties gain `px`.
fn css_value(key: &str, value: &Value) -> Value {
    match value {
        Value::Number(n) if !UNITLESS_PROPERTIES.contains(key) && !key.starts_with("--") => {
            Value::String(format!("{}px", n))
        }
        other => other.clone(),
    }
}

/// `background-color` -> `backgroundColor`. Custom properties keep their name.
pub fn camel_case(key: &str) -> String {
    if key.starts_with("--") || !key.contains('-') {
        return key.to_string();
    }
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '-' {
            upper = !out.is_empty();
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

pub fn is_css_size(value: &str) -> bool {
    CSS_SIZE_RE.is_match(value.trim())
}

fn is_utility_classes(value: &str) -> bool {
    let mut parts = value.split_whitespace().peekable();
    parts.peek().is_some() && parts.all(|p| UTILITY_CLASS_RE.is_match(p))
}

// ═══════════════════════════════════════════════════════════════════════════════
// TYPE DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

fn layout_style(kind: &ComponentKind, props: &Props) -> StyleMap {
    let mut style = StyleMap::new();
    match kind {
        ComponentKind::Flex => {
            style.insert("display".to_string(), json!("flex"));
            if let Some(direction) = props.get("direction").and_then(Value::as_str) {
                style.insert("flexDirection".to_string(), json!(direction));
            }
            if let Some(align) = props.get("align").and_then(Value::as_str) {
                style.insert("alignItems".to_string(), json!(flex_alignment(align)));
            }
            if let Some(justify) = props.get("justify").and_then(Value::as_str) {
                style.insert("justifyContent".to_string(), json!(flex_alignment(justify)));
            }
            match props.get("wrap") {
                Some(Value::Bool(true)) => {
                    style.insert("flexWrap".to_string(), json!("wrap"));
                }
                Some(Value::String(mode)) => {
                    style.insert("flexWrap".to_string(), json!(mode));
                }
                _ => {}
            }
        }
        ComponentKind::Grid => {
            style.insert("display".to_string(), json!("grid"));
            match props.get("columns") {
                Some(Value::Number(n)) => {
                    style.insert(
                        "gridTemplateColumns".to_string(),
                        json!(format!("repeat({}, minmax(0, 1fr))", n)),
                    );
                }
                Some(Value::String(template)) => {
                    style.insert("gridTemplateColumns".to_string(), json!(template));
                }
                _ => {}
            }
        }
        _ => {}
    }
    style
}

fn flex_alignment(value: &str) -> &str {
    match value {
        "start" => "flex-start",
        "end" => "flex-end",
        "between" => "space-between",
        "around" => "space-around",
        "evenly" => "space-evenly",
        other => other,
    }
}

/// Default shadow token for a component type, if the theme defines it.
pub fn resolve_shadow(kind: &ComponentKind, theme: &Theme) -> Option<StyleMap> {
    let token = match kind {
        ComponentKind::ListItem => "sm",
        ComponentKind::Card => {
            if theme.has_shadow("md") {
                "md"
            } else {
                theme
                    .shadow_tokens()
                    .find(|t| !STANDARD_SHADOWS.contains(*t))?
            }
        }
        ComponentKind::Dropdown => "lg",
        ComponentKind::Modal => "xl",
        ComponentKind::Input => "inner",
        ComponentKind::Button => {
            if theme.has_shadow("brand") {
                "brand"
            } else {
                "md"
            }
        }
        _ => return None,
    };
    if !theme.has_shadow(token) {
        return None;
    }
    let mut style = StyleMap::new();
    style.insert("boxShadow".to_string(), json!(shadow_value(token)));
    Some(style)
}

fn explicit_shadow(value: &Value) -> Option<StyleMap> {
    let shadow = match value {
        Value::String(s) if !s.trim().is_empty() => shadow_value(s),
        Value::Bool(false) | Value::Null => "none".to_string(),
        _ => return None,
    };
    let mut style = StyleMap::new();
    style.insert("boxShadow".to_string(), json!(shadow));
    Some(style)
}

/// Default spacing for layout types from `theme.spacing`.
pub fn resolve_spacing(kind: &ComponentKind, theme: &Theme) -> Option<Spacing> {
    let key = match kind {
        ComponentKind::Section => "section",
        ComponentKind::Container => "container",
        ComponentKind::Flex => "gap",
        _ => return None,
    };
    let value = theme.spacing(key)?;
    let value = value.trim();

    if !is_css_size(value) {
        return is_utility_classes(value).then(|| Spacing::Class(value.to_string()));
    }

    let mut style = StyleMap::new();
    match kind {
        ComponentKind::Section => {
            style.insert("padding".to_string(), json!(value));
        }
        ComponentKind::Container => {
            style.insert("maxWidth".to_string(), json!(value));
            style.insert("marginLeft".to_string(), json!("auto"));
            style.insert("marginRight".to_string(), json!("auto"));
        }
        _ => {
            style.insert("gap".to_string(), json!(value));
        }
    }
    Some(Spacing::Inline(style))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme() -> Theme {
        Theme::new(json!({
            "colors": { "primary": "#123456" },
            "shadows": { "sm": "0 1px 2px", "md": "0 4px 6px", "brand": "0 0 0 3px blue" },
            "spacing": { "section": "4rem 1rem", "container": "80rem", "gap": "md" }
        }))
    }

    fn props(value: Value) -> Props {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_parse_style_string() {
        let style = parse_style(&json!("background-color: #123456; padding: 2px 4px;; --brand-hue: 200"));
        assert_eq!(style.get("backgroundColor"), Some(&json!("#123456")));
        assert_eq!(style.get("padding"), Some(&json!("2px 4px")));
        assert_eq!(style.get("--brand-hue"), Some(&json!("200")));
        assert_eq!(style.len(), 3);
    }

    #[test]
    fn test_parse_style_leaves_tokens_alone() {
        let style = parse_style(&json!({ "color": "$theme.colors.primary" }));
        assert_eq!(style.get("color"), Some(&json!("$theme.colors.primary")));
        let style = parse_style(&json!("color: $theme.colors.primary"));
        assert_eq!(style.get("color"), Some(&json!("$theme.colors.primary")));
    }

    #[test]
    fn test_parse_style_object_units() {
        let style = parse_style(&json!({ "margin-top": 8, "opacity": 0.5, "color": "red" }));
        assert_eq!(style.get("marginTop"), Some(&json!("8px")));
        assert_eq!(style.get("opacity"), Some(&json!(0.5)));
        assert_eq!(style.get("color"), Some(&json!("red")));
    }

    #[test]
    fn test_shadow_type_defaults() {
        let theme = theme();
        let shadow = |kind| resolve_shadow(&kind, &theme).and_then(|s| s.get("boxShadow").cloned());
        assert_eq!(shadow(ComponentKind::Card), Some(json!("var(--shadow-md)")));
        assert_eq!(shadow(ComponentKind::ListItem), Some(json!("var(--shadow-sm)")));
        assert_eq!(shadow(ComponentKind::Button), Some(json!("var(--shadow-brand)")));
        // lg / xl / inner are not in this theme
        assert_eq!(shadow(ComponentKind::Dropdown), None);
        assert_eq!(shadow(ComponentKind::Modal), None);
        assert_eq!(shadow(ComponentKind::Text), None);
    }

    #[test]
    fn test_card_falls_back_to_custom_shadow() {
        let theme = Theme::new(json!({ "shadows": { "sm": "a", "soft-glow": "b" } }));
        let style = resolve_shadow(&ComponentKind::Card, &theme).unwrap();
        assert_eq!(style.get("boxShadow"), Some(&json!("var(--shadow-soft-glow)")));
    }

    #[test]
    fn test_explicit_shadow_wins() {
        let composed = compose_style(
            &ComponentKind::Card,
            &props(json!({ "shadow": "brand" })),
            None,
            &theme(),
        );
        assert_eq!(composed.style.get("boxShadow"), Some(&json!("var(--shadow-brand)")));

        let none = compose_style(&ComponentKind::Card, &props(json!({ "shadow": "none" })), None, &theme());
        assert_eq!(none.style.get("boxShadow"), Some(&json!("none")));
    }

    #[test]
    fn test_spacing_only_applies_css_sizes() {
        let theme = theme();
        assert_eq!(
            resolve_spacing(&ComponentKind::Section, &theme),
            Some(Spacing::Inline(props(json!({ "padding": "4rem 1rem" }))))
        );
        let Some(Spacing::Inline(container)) = resolve_spacing(&ComponentKind::Container, &theme) else {
            panic!("container spacing")
        };
        assert_eq!(container.get("maxWidth"), Some(&json!("80rem")));
        assert_eq!(container.get("marginLeft"), Some(&json!("auto")));
        // "md" is a token name, not a size
        assert_eq!(resolve_spacing(&ComponentKind::Flex, &theme), None);
    }

    #[test]
    fn test_numeric_spacing_is_px() {
        let theme = Theme::new(json!({ "spacing": { "gap": 16, "section": 0 } }));
        assert_eq!(
            resolve_spacing(&ComponentKind::Flex, &theme),
            Some(Spacing::Inline(props(json!({ "gap": "16px" }))))
        );
        assert_eq!(
            resolve_spacing(&ComponentKind::Section, &theme),
            Some(Spacing::Inline(props(json!({ "padding": "0px" }))))
        );
    }

    #[test]
    fn test_spacing_utility_classes() {
        let theme = Theme::new(json!({ "spacing": { "section": "py-16 sm:py-20" } }));
        assert_eq!(
            resolve_spacing(&ComponentKind::Section, &theme),
            Some(Spacing::Class("py-16 sm:py-20".to_string()))
        );
    }

    #[test]
    fn test_css_size_detection() {
        for ok in ["16px", "1.5rem", "0", "50%", "auto", "calc(100% - 2rem)", "2rem 1rem", "-4px"] {
            assert!(is_css_size(ok), "{} should be a size", ok);
        }
        for bad in ["md", "large", "16", "px", "py-16"] {
            assert!(!is_css_size(bad), "{} should not be a size", bad);
        }
    }

    #[test]
    fn test_merge_order_explicit_style_wins() {
        let theme = theme();
        let composed = compose_style(
            &ComponentKind::Section,
            &props(json!({ "style": { "padding": "0" } })),
            None,
            &theme,
        );
        assert_eq!(composed.style.get("padding"), Some(&json!("0")));
    }

    #[test]
    fn test_flex_layout_props() {
        let theme = Theme::new(json!({ "spacing": { "gap": "1rem" } }));
        let composed = compose_style(
            &ComponentKind::Flex,
            &props(json!({ "direction": "column", "align": "center", "justify": "between", "wrap": true })),
            None,
            &theme,
        );
        assert_eq!(composed.style.get("display"), Some(&json!("flex")));
        assert_eq!(composed.style.get("flexDirection"), Some(&json!("column")));
        assert_eq!(composed.style.get("justifyContent"), Some(&json!("space-between")));
        assert_eq!(composed.style.get("flexWrap"), Some(&json!("wrap")));
        assert_eq!(composed.style.get("gap"), Some(&json!("1rem")));

        let with_gap = compose_style(&ComponentKind::Flex, &props(json!({ "gap": 8 })), None, &theme);
        assert_eq!(with_gap.style.get("gap"), Some(&json!("8px")));
    }

    #[test]
    fn test_grid_columns() {
        let composed = compose_style(
            &ComponentKind::Grid,
            &props(json!({ "columns": 3 })),
            None,
            &Theme::default(),
        );
        assert_eq!(
            composed.style.get("gridTemplateColumns"),
            Some(&json!("repeat(3, minmax(0, 1fr))"))
        );
        let consumed: Vec<_> = consumed_props(&ComponentKind::Grid).collect();
        assert!(consumed.contains(&"columns"));
        assert!(consumed.contains(&"style"));
    }

    #[test]
    fn test_plain_kind_has_no_style() {
        let composed = compose_style(&ComponentKind::Div, &Props::new(), None, &theme());
        assert_eq!(composed, ComposedStyle::default());
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("background-color"), "backgroundColor");
        assert_eq!(camel_case("-webkit-transform"), "webkitTransform");
        assert_eq!(camel_case("color"), "color");
        assert_eq!(camel_case("--brand-hue"), "--brand-hue");
    }
}
