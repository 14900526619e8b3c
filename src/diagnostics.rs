use serde::{Deserialize, Serialize};
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════════
// DIAGNOSTIC CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const W_BLOCK_UNKNOWN: &str = "W-BLOCK-UNKNOWN";
pub const W_BLOCK_CYCLE: &str = "W-BLOCK-CYCLE";
pub const W_BLOCK_DUPLICATE: &str = "W-BLOCK-DUPLICATE";
pub const W_DEPTH: &str = "W-DEPTH";
pub const W_TYPE_UNKNOWN: &str = "W-TYPE-UNKNOWN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    UnknownBlockReference,
    CycleDetected,
    MaxDepthExceeded,
    UnknownComponentType,
    DuplicateBlock,
}

impl DiagnosticKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::UnknownBlockReference => W_BLOCK_UNKNOWN,
            Self::CycleDetected => W_BLOCK_CYCLE,
            Self::MaxDepthExceeded => W_DEPTH,
            Self::UnknownComponentType => W_TYPE_UNKNOWN,
            Self::DuplicateBlock => W_BLOCK_DUPLICATE,
        }
    }

    fn guarantee(self) -> &'static str {
        match self {
            Self::UnknownBlockReference => {
                "A reference to a missing block renders as an absent element; siblings still render."
            }
            Self::CycleDetected => {
                "A block is never expanded inside itself; the cyclic reference renders as an absent element."
            }
            Self::MaxDepthExceeded => {
                "Branches deeper than the configured ceiling are dropped; the rest of the page still renders."
            }
            Self::UnknownComponentType => {
                "Only the enumerated component types are rendered; unknown types are omitted."
            }
            Self::DuplicateBlock => "Block names are unique; the first definition wins.",
        }
    }

    fn describe(self, name: &str) -> String {
        match self {
            Self::UnknownBlockReference => format!("unknown block reference '{}'", name),
            Self::CycleDetected => format!("cycle detected while resolving block '{}'", name),
            Self::MaxDepthExceeded => format!("max depth exceeded at '{}'", name),
            Self::UnknownComponentType => format!("unknown component type '{}'", name),
            Self::DuplicateBlock => format!("duplicate block '{}' ignored", name),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DIAGNOSTIC
// ═══════════════════════════════════════════════════════════════════════════════

/// Non-fatal event raised while resolving a page. Collected on the side,
/// never thrown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub code: String,
    pub kind: DiagnosticKind,
    /// Offending block name or component type.
    pub name: String,
    /// DFS path to the node, e.g. `sections[1].children[0].$ref(cta)`.
    pub path: String,
    pub message: String,
    pub guarantee: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, name: &str, path: &str) -> Self {
        Self {
            code: kind.code().to_string(),
            kind,
            name: name.to_string(),
            path: path.to_string(),
            message: kind.describe(name),
            guarantee: kind.guarantee().to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "[{}] {}", self.code, self.message)
        } else {
            write!(f, "[{}] {} at {}", self.code, self.message, self.path)
        }
    }
}
