//! Animation composition.
//!
//! Event-driven effects (scroll reveal, hover, click) are expressed as
//! declarative style plus `data-*` descriptors; wiring the listeners belongs
//! to the runtime layer.

use serde_json::{json, Value};

use crate::model::{ComponentKind, Interactions, Props};
use crate::theme::Theme;
use crate::tokens::resolve_theme_token;

const DEFAULT_ENTRANCE_DURATION: &str = "600ms";
const DEFAULT_HOVER_DURATION: &str = "200ms";
const DEFAULT_EASING: &str = "ease-out";
const DEFAULT_SCROLL_THRESHOLD: f64 = 0.1;

/// Output of the animation stage of style composition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationLayer {
    pub style: Props,
    pub attributes: Props,
    pub stagger: Option<Stagger>,
}

/// Per-child entrance delay: `base + index * step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stagger {
    pub base_ms: f64,
    pub step_ms: f64,
}

impl Stagger {
    pub fn delay_for(&self, index: usize) -> String {
        format_ms(self.base_ms + self.step_ms * index as f64)
    }
}

struct TypeDefault {
    theme_key: &'static str,
    keyframes: &'static str,
    duration: &'static str,
    easing: &'static str,
    tail: &'static str,
    on_scroll: bool,
}

fn type_default(kind: &ComponentKind) -> Option<TypeDefault> {
    match kind {
        ComponentKind::Toast => Some(TypeDefault {
            theme_key: "fadeOut",
            keyframes: "fade-out",
            duration: "300ms",
            easing: "ease-in",
            tail: "forwards",
            on_scroll: false,
        }),
        ComponentKind::Card => Some(TypeDefault {
            theme_key: "scaleUp",
            keyframes: "scale-up",
            duration: "500ms",
            easing: "ease-out",
            tail: "both",
            on_scroll: true,
        }),
        ComponentKind::Fab => Some(TypeDefault {
            theme_key: "float",
            keyframes: "float",
            duration: "3s",
            easing: "ease-in-out",
            tail: "infinite",
            on_scroll: false,
        }),
        _ => None,
    }
}

/// Explicit interactions first; the type default only fills in when the
/// component declares neither an entrance nor a scroll animation.
pub fn compose_animation(
    kind: &ComponentKind,
    interactions: Option<&Interactions>,
    theme: &Theme,
) -> AnimationLayer {
    let mut layer = AnimationLayer::default();
    let explicit_motion = interactions.is_some_and(|i| i.entrance.is_some() || i.scroll.is_some());
    if !explicit_motion {
        apply_type_animation(kind, &mut layer, theme);
    }
    if let Some(interactions) = interactions {
        apply_interactions(interactions, &mut layer, theme);
    }
    layer
}

/// Type-driven defaults: `toast` fades out, `card` scales up once scrolled
/// into view, `fab` floats forever. Applies only when the theme configures
/// the matching animation under `animations`.
pub fn apply_type_animation(kind: &ComponentKind, layer: &mut AnimationLayer, theme: &Theme) {
    let Some(default) = type_default(kind) else {
        return;
    };
    let Some(config) = theme.animation(default.theme_key) else {
        return;
    };

    let shorthand = match config {
        Value::Bool(true) => shorthand(
            default.keyframes,
            default.duration,
            default.easing,
            "0ms",
            default.tail,
        ),
        Value::String(custom) if !custom.trim().is_empty() => custom.trim().to_string(),
        Value::Object(cfg) => {
            if cfg.get("enabled").and_then(Value::as_bool) == Some(false) {
                return;
            }
            let duration = css_time(cfg.get("duration")).unwrap_or_else(|| default.duration.to_string());
            let delay = css_time(cfg.get("delay")).unwrap_or_else(|| "0ms".to_string());
            let easing = cfg
                .get("easing")
                .and_then(Value::as_str)
                .unwrap_or(default.easing);
            let name = cfg
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or(default.keyframes);
            shorthand(name, &duration, easing, &delay, default.tail)
        }
        _ => return,
    };

    layer.style.insert("animation".to_string(), Value::String(shorthand));
    if default.on_scroll {
        layer
            .style
            .insert("animationPlayState".to_string(), json!("paused"));
        layer
            .attributes
            .insert("data-scroll-animation".to_string(), json!(default.keyframes));
        layer.attributes.insert("data-scroll-once".to_string(), json!(true));
    }
}

pub fn apply_interactions(interactions: &Interactions, layer: &mut AnimationLayer, theme: &Theme) {
    if let Some(entrance) = &interactions.entrance {
        let delay = entrance.delay.as_deref().unwrap_or("0ms");
        layer.style.insert(
            "animation".to_string(),
            Value::String(shorthand(
                &kebab_case(&entrance.animation),
                entrance.duration.as_deref().unwrap_or(DEFAULT_ENTRANCE_DURATION),
                entrance.easing.as_deref().unwrap_or(DEFAULT_EASING),
                delay,
                "both",
            )),
        );
        layer.stagger = entrance.stagger.as_deref().and_then(parse_ms).map(|step_ms| Stagger {
            base_ms: parse_ms(delay).unwrap_or(0.0),
            step_ms,
        });
    }

    if let Some(scroll) = &interactions.scroll {
        let name = kebab_case(&scroll.animation);
        layer.style.insert(
            "animation".to_string(),
            Value::String(shorthand(
                &name,
                scroll.duration.as_deref().unwrap_or(DEFAULT_ENTRANCE_DURATION),
                scroll.easing.as_deref().unwrap_or(DEFAULT_EASING),
                scroll.delay.as_deref().unwrap_or("0ms"),
                "both",
            )),
        );
        layer
            .style
            .insert("animationPlayState".to_string(), json!("paused"));
        layer
            .attributes
            .insert("data-scroll-animation".to_string(), json!(name));
        layer.attributes.insert(
            "data-scroll-threshold".to_string(),
            json!(scroll.threshold.unwrap_or(DEFAULT_SCROLL_THRESHOLD)),
        );
        layer
            .attributes
            .insert("data-scroll-once".to_string(), json!(scroll.once.unwrap_or(true)));
    }

    if let Some(hover) = &interactions.hover {
        layer.style.insert(
            "transition".to_string(),
            Value::String(format!(
                "all {} {}",
                hover.duration.as_deref().unwrap_or(DEFAULT_HOVER_DURATION),
                hover.easing.as_deref().unwrap_or(DEFAULT_EASING)
            )),
        );

        let mut transforms = Vec::new();
        if let Some(scale) = hover.scale {
            transforms.push(format!("scale({})", scale));
        }
        if let Some(y) = &hover.translate_y {
            transforms.push(format!("translateY({})", y));
        }
        if let Some(r) = &hover.rotate {
            transforms.push(format!("rotate({})", r));
        }

        let mut descriptor = Props::new();
        if !transforms.is_empty() {
            descriptor.insert("transform".to_string(), json!(transforms.join(" ")));
        }
        if let Some(shadow) = &hover.shadow {
            descriptor.insert("boxShadow".to_string(), json!(shadow_value(shadow)));
        }
        for (key, value) in [
            ("backgroundColor", &hover.background_color),
            ("color", &hover.color),
            ("borderColor", &hover.border_color),
        ] {
            if let Some(v) = value {
                let raw = Value::String(v.clone());
                descriptor.insert(key.to_string(), resolve_theme_token(&raw, theme).into_owned());
            }
        }
        if let Some(opacity) = hover.opacity {
            descriptor.insert("opacity".to_string(), json!(opacity));
        }
        layer
            .attributes
            .insert("data-hover".to_string(), Value::Object(descriptor));
    }

    if let Some(click) = &interactions.click {
        let entries = [
            ("data-click-animation", click.animation.as_ref().map(|a| kebab_case(a))),
            ("data-click-navigate", click.navigate.clone()),
            ("data-click-open-url", click.open_url.clone()),
            ("data-click-scroll-to", click.scroll_to.clone()),
        ];
        for (key, value) in entries {
            if let Some(v) = value {
                layer.attributes.insert(key.to_string(), Value::String(v));
            }
        }
    }
}

/// Shadow token names become CSS variables; anything else is a raw value.
pub fn shadow_value(shadow: &str) -> String {
    let shadow = shadow.trim();
    if shadow == "none" {
        "none".to_string()
    } else if !shadow.is_empty()
        && shadow
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        format!("var(--shadow-{})", shadow)
    } else {
        shadow.to_string()
    }
}

fn shorthand(name: &str, duration: &str, easing: &str, delay: &str, tail: &str) -> String {
    format!("{} {} {} {} {}", name, duration, easing, delay, tail)
}

fn css_time(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(format!("{}ms", n)),
        _ => None,
    }
}

/// `"150ms"`, `"0.2s"` or `"150"` to milliseconds.
pub fn parse_ms(value: &str) -> Option<f64> {
    let value = value.trim();
    if let Some(ms) = value.strip_suffix("ms") {
        ms.trim().parse().ok()
    } else if let Some(s) = value.strip_suffix('s') {
        s.trim().parse::<f64>().ok().map(|s| s * 1000.0)
    } else {
        value.parse().ok()
    }
}

fn format_ms(ms: f64) -> String {
    if ms.fract() == 0.0 {
        format!("{}ms", ms as i64)
    } else {
        format!("{}ms", ms)
    }
}

/// `fadeIn` -> `fade-in`. Already-kebab names pass through.
pub fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClickEffect, EntranceAnimation, HoverEffect, ScrollAnimation};

    fn animated_theme() -> Theme {
        Theme::new(json!({
            "colors": { "accent": "#f60" },
            "animations": {
                "fadeOut": true,
                "scaleUp": { "duration": 400, "easing": "ease-in-out" },
                "float": "bob 2s linear infinite"
            }
        }))
    }

    #[test]
    fn test_type_defaults_require_theme_config() {
        let layer = compose_animation(&ComponentKind::Toast, None, &Theme::default());
        assert!(layer.style.is_empty());
        assert!(layer.attributes.is_empty());
    }

    #[test]
    fn test_toast_fades_out() {
        let layer = compose_animation(&ComponentKind::Toast, None, &animated_theme());
        assert_eq!(
            layer.style.get("animation"),
            Some(&json!("fade-out 300ms ease-in 0ms forwards"))
        );
    }

    #[test]
    fn test_card_waits_for_scroll() {
        let layer = compose_animation(&ComponentKind::Card, None, &animated_theme());
        assert_eq!(
            layer.style.get("animation"),
            Some(&json!("scale-up 400ms ease-in-out 0ms both"))
        );
        assert_eq!(layer.style.get("animationPlayState"), Some(&json!("paused")));
        assert_eq!(layer.attributes.get("data-scroll-animation"), Some(&json!("scale-up")));
    }

    #[test]
    fn test_fab_uses_custom_shorthand() {
        let layer = compose_animation(&ComponentKind::Fab, None, &animated_theme());
        assert_eq!(layer.style.get("animation"), Some(&json!("bob 2s linear infinite")));
    }

    #[test]
    fn test_disabled_config_is_ignored() {
        let theme = Theme::new(json!({ "animations": { "fadeOut": { "enabled": false } } }));
        assert!(compose_animation(&ComponentKind::Toast, None, &theme).style.is_empty());
    }

    #[test]
    fn test_explicit_entrance_beats_type_default() {
        let interactions = Interactions {
            entrance: Some(EntranceAnimation {
                animation: "fadeIn".to_string(),
                delay: Some("100ms".to_string()),
                stagger: Some("0.05s".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let layer = compose_animation(&ComponentKind::Card, Some(&interactions), &animated_theme());
        assert_eq!(
            layer.style.get("animation"),
            Some(&json!("fade-in 600ms ease-out 100ms both"))
        );
        assert!(layer.style.get("animationPlayState").is_none());
        let stagger = layer.stagger.expect("stagger");
        assert_eq!(stagger.delay_for(0), "100ms");
        assert_eq!(stagger.delay_for(2), "200ms");
    }

    #[test]
    fn test_scroll_descriptor() {
        let interactions = Interactions {
            scroll: Some(ScrollAnimation {
                animation: "slideUp".to_string(),
                threshold: Some(0.3),
                once: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        };
        let layer = compose_animation(&ComponentKind::Section, Some(&interactions), &Theme::default());
        assert_eq!(layer.style.get("animationPlayState"), Some(&json!("paused")));
        assert_eq!(layer.attributes.get("data-scroll-animation"), Some(&json!("slide-up")));
        assert_eq!(layer.attributes.get("data-scroll-threshold"), Some(&json!(0.3)));
        assert_eq!(layer.attributes.get("data-scroll-once"), Some(&json!(false)));
    }

    #[test]
    fn test_hover_and_click_descriptors() {
        let interactions = Interactions {
            hover: Some(HoverEffect {
                scale: Some(1.05),
                translate_y: Some("-2px".to_string()),
                shadow: Some("lg".to_string()),
                background_color: Some("$theme.colors.accent".to_string()),
                ..Default::default()
            }),
            click: Some(ClickEffect {
                animation: Some("pulse".to_string()),
                navigate: Some("/pricing".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let layer = compose_animation(&ComponentKind::Button, Some(&interactions), &animated_theme());
        assert_eq!(layer.style.get("transition"), Some(&json!("all 200ms ease-out")));
        assert_eq!(
            layer.attributes.get("data-hover"),
            Some(&json!({
                "transform": "scale(1.05) translateY(-2px)",
                "boxShadow": "var(--shadow-lg)",
                "backgroundColor": "#f60"
            }))
        );
        assert_eq!(layer.attributes.get("data-click-animation"), Some(&json!("pulse")));
        assert_eq!(layer.attributes.get("data-click-navigate"), Some(&json!("/pricing")));
    }

    #[test]
    fn test_time_helpers() {
        assert_eq!(parse_ms("150ms"), Some(150.0));
        assert_eq!(parse_ms("0.25s"), Some(250.0));
        assert_eq!(parse_ms("80"), Some(80.0));
        assert_eq!(parse_ms("soon"), None);
        assert_eq!(kebab_case("fadeInUp"), "fade-in-up");
        assert_eq!(kebab_case("fade-in"), "fade-in");
        assert_eq!(shadow_value("none"), "none");
        assert_eq!(shadow_value("0 1px 2px black"), "0 1px 2px black");
    }
}
