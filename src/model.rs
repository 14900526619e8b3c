use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;

use crate::responsive::{BreakpointOverrides, ResponsivePlan};

/// String-keyed bag of mixed values. Backed by an insertion-ordered map so
/// resolved output keeps the authored key order.
pub type Props = serde_json::Map<String, Value>;

/// Variables supplied at a single block reference site.
pub type BlockVars = HashMap<String, Scalar>;

// ═══════════════════════════════════════════════════════════════════════════════
// COMPONENT KINDS
// ═══════════════════════════════════════════════════════════════════════════════

macro_rules! component_kinds {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// The fixed set of component types a page may use.
        ///
        /// Anything outside the set deserializes to `Other` so the
        /// orchestrator can report it instead of rejecting the whole page.
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum ComponentKind {
            $($variant,)*
            Other(String),
        }

        impl ComponentKind {
            pub fn from_name(name: &str) -> Self {
                match name {
                    $($name => Self::$variant,)*
                    other => Self::Other(other.to_string()),
                }
            }

            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $name,)*
                    Self::Other(name) => name,
                }
            }
        }
    };
}

component_kinds! {
    // layout
    Section => "section",
    Container => "container",
    Flex => "flex",
    Grid => "grid",
    Div => "div",
    Header => "header",
    Footer => "footer",
    Main => "main",
    Nav => "nav",
    Aside => "aside",
    Article => "article",
    Hero => "hero",
    Card => "card",
    Modal => "modal",
    Sidebar => "sidebar",
    Dropdown => "dropdown",
    Toast => "toast",
    List => "list",
    ListItem => "list-item",
    Accordion => "accordion",
    Tabs => "tabs",
    // content
    Text => "text",
    Heading => "heading",
    H1 => "h1",
    H2 => "h2",
    H3 => "h3",
    H4 => "h4",
    H5 => "h5",
    H6 => "h6",
    Paragraph => "paragraph",
    Span => "span",
    Code => "code",
    Pre => "pre",
    Blockquote => "blockquote",
    Badge => "badge",
    Alert => "alert",
    Icon => "icon",
    Divider => "divider",
    // interactive
    Button => "button",
    Link => "link",
    Fab => "fab",
    // media
    Image => "image",
    Video => "video",
    Audio => "audio",
    Iframe => "iframe",
    Avatar => "avatar",
    // form
    Form => "form",
    Input => "input",
    Textarea => "textarea",
    Select => "select",
    Checkbox => "checkbox",
    Radio => "radio",
    Label => "label",
    Fieldset => "fieldset",
}

impl ComponentKind {
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl Serialize for ComponentKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ComponentKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// INPUT TREE
// ═══════════════════════════════════════════════════════════════════════════════

/// A section entry or child: either an authored component or a pointer to a block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Reference(BlockReference),
    Component(Component),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub props: Props,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactions: Option<Interactions>,
    #[serde(default, skip_serializing_if = "BreakpointOverrides::is_empty")]
    pub responsive: BreakpointOverrides,
}

impl Component {
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            props: Props::new(),
            children: Vec::new(),
            content: None,
            interactions: None,
            responsive: BreakpointOverrides::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockReference {
    #[serde(rename = "$ref", alias = "ref", alias = "block")]
    pub name: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub vars: BlockVars,
}

/// A named, reusable component subtree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub name: String,
    #[serde(flatten)]
    pub component: Component,
}

/// Scalar value a block variable may carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    pub fn to_value(&self) -> Value {
        match self {
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Number(n) => Value::Number(n.clone()),
            Scalar::Text(s) => Value::String(s.clone()),
        }
    }

    /// Text form used when a variable lands inside a string.
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// INTERACTIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interactions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrance: Option<EntranceAnimation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll: Option<ScrollAnimation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover: Option<HoverEffect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click: Option<ClickEffect>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntranceAnimation {
    pub animation: String,
    #[serde(default, deserialize_with = "de_css_time")]
    pub delay: Option<String>,
    #[serde(default, deserialize_with = "de_css_time")]
    pub duration: Option<String>,
    #[serde(default)]
    pub easing: Option<String>,
    /// Extra delay added per child, in child order.
    #[serde(default, deserialize_with = "de_css_time")]
    pub stagger: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollAnimation {
    pub animation: String,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default, deserialize_with = "de_css_time")]
    pub delay: Option<String>,
    #[serde(default, deserialize_with = "de_css_time")]
    pub duration: Option<String>,
    #[serde(default)]
    pub easing: Option<String>,
    #[serde(default)]
    pub once: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverEffect {
    #[serde(default)]
    pub scale: Option<f64>,
    #[serde(default)]
    pub translate_y: Option<String>,
    #[serde(default)]
    pub rotate: Option<String>,
    #[serde(default)]
    pub shadow: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub border_color: Option<String>,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default, deserialize_with = "de_css_time")]
    pub duration: Option<String>,
    #[serde(default)]
    pub easing: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEffect {
    #[serde(default)]
    pub animation: Option<String>,
    #[serde(default)]
    pub navigate: Option<String>,
    #[serde(default)]
    pub open_url: Option<String>,
    #[serde(default)]
    pub scroll_to: Option<String>,
}

/// Accepts `"300ms"`, `"0.3s"` or a bare number of milliseconds.
fn de_css_time<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(format!("{}ms", n)),
        _ => None,
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT TREE
// ═══════════════════════════════════════════════════════════════════════════════

/// A fully substituted, style-composed node ready for the markup renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedElement {
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub final_props: Props,
    pub style: Props,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub children: Vec<ResolvedElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
    #[serde(default, skip_serializing_if = "ResponsivePlan::is_empty")]
    pub responsive: ResponsivePlan,
}
