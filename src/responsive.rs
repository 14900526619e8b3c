//! Responsive Override Planner
//!
//! Per-breakpoint overrides are captured, never collapsed: a resolved element
//! carries one descriptor per authored breakpoint and the output layer turns
//! them into media-query scoped rules. Overrides are shallow, each key replaces
//! the base value wholesale.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::model::{Node, Props, ResolvedElement};
use crate::theme::Theme;

/// Breakpoints in ascending width order. `Ord` follows that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Mobile,
    Sm,
    Md,
    Lg,
    Xl,
    #[serde(rename = "2xl")]
    Xxl,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 6] = [
        Breakpoint::Mobile,
        Breakpoint::Sm,
        Breakpoint::Md,
        Breakpoint::Lg,
        Breakpoint::Xl,
        Breakpoint::Xxl,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Breakpoint::Mobile => "mobile",
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
            Breakpoint::Xl => "xl",
            Breakpoint::Xxl => "2xl",
        }
    }

    /// Minimum viewport width in px when the theme does not define one.
    fn default_min_width(self) -> u32 {
        match self {
            Breakpoint::Mobile => 0,
            Breakpoint::Sm => 640,
            Breakpoint::Md => 768,
            Breakpoint::Lg => 1024,
            Breakpoint::Xl => 1280,
            Breakpoint::Xxl => 1536,
        }
    }
}

/// Authored partial override for one breakpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakpointOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Props>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
}

pub type BreakpointOverrides = BTreeMap<Breakpoint, BreakpointOverride>;

/// Resolved override descriptor attached to a `ResolvedElement`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedOverride {
    pub media_query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Props>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ResolvedElement>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponsivePlan(BTreeMap<Breakpoint, ResolvedOverride>);

impl ResponsivePlan {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, breakpoint: Breakpoint) -> Option<&ResolvedOverride> {
        self.0.get(&breakpoint)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Breakpoint, &ResolvedOverride)> {
        self.0.iter()
    }
}

/// Resolves the token-bearing parts of an override on behalf of the planner.
///
/// The orchestrator implements this so override props, content and children
/// go through exactly the same passes as the base component.
pub trait OverrideResolver {
    fn resolve_props(&mut self, props: &Props) -> Props;
    fn resolve_content(&mut self, content: &str) -> String;
    fn resolve_children(&mut self, breakpoint: Breakpoint, children: &[Node])
        -> Vec<ResolvedElement>;
}

pub fn plan_responsive<R: OverrideResolver + ?Sized>(
    overrides: &BreakpointOverrides,
    theme: &Theme,
    resolver: &mut R,
) -> ResponsivePlan {
    let mut plan = BTreeMap::new();
    for (&breakpoint, ov) in overrides {
        let resolved = ResolvedOverride {
            media_query: media_query(breakpoint, theme),
            props: ov.props.as_ref().map(|p| resolver.resolve_props(p)),
            content: ov.content.as_deref().map(|c| resolver.resolve_content(c)),
            visible: ov.visible,
            children: ov
                .children
                .as_deref()
                .map(|c| resolver.resolve_children(breakpoint, c)),
        };
        plan.insert(breakpoint, resolved);
    }
    ResponsivePlan(plan)
}

/// Media query for a breakpoint. `mobile` covers everything below `sm`.
pub fn media_query(breakpoint: Breakpoint, theme: &Theme) -> String {
    match breakpoint {
        Breakpoint::Mobile => {
            let sm = breakpoint_px(Breakpoint::Sm, theme)
                .unwrap_or_else(|| Breakpoint::Sm.default_min_width() as f64);
            format!("(max-width: {}px)", format_px(sm - 1.0))
        }
        other => match theme.breakpoint(other.as_str()) {
            Some(Value::String(s)) => format!("(min-width: {})", s.trim()),
            Some(Value::Number(n)) => format!("(min-width: {}px)", n),
            _ => format!("(min-width: {}px)", other.default_min_width()),
        },
    }
}

fn breakpoint_px(breakpoint: Breakpoint, theme: &Theme) -> Option<f64> {
    match theme.breakpoint(breakpoint.as_str())? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().strip_suffix("px")?.trim().parse().ok(),
        _ => None,
    }
}

fn format_px(px: f64) -> String {
    if px.fract() == 0.0 {
        format!("{}", px as i64)
    } else {
        format!("{}", px)
    }
}
