//! Block Registry & Resolver
//!
//! Per reference site:
//!
//! ```text
//! START → LOOKUP → FOUND: CLONE → SUBSTITUTE_VARS → RESOLVE_SUBTREE → DONE
//!                → NOT_FOUND | CYCLE: WARN → DONE(None)
//! ```
//!
//! LOOKUP, CLONE and SUBSTITUTE_VARS live here; RESOLVE_SUBTREE and WARN are
//! driven by the orchestrator in `resolve`. The registry is read-only for a
//! whole render and only ever hands out clones.

use std::collections::HashMap;

use crate::model::{Block, BlockReference, BlockVars, Component, Scalar};
use crate::responsive::BreakpointOverride;
use crate::tokens::{substitute_vars, substitute_vars_in_text};
use crate::visitor::{walk_component, walk_override, NodeVisitor};

/// Ordered collection of blocks, indexed by name.
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    blocks: Vec<Block>,
    index: HashMap<String, usize>,
    duplicates: Vec<String>,
}

impl BlockRegistry {
    /// First definition of a name wins; later ones are recorded as duplicates.
    pub fn new(blocks: Vec<Block>) -> Self {
        let mut registry = Self::default();
        for block in blocks {
            if registry.index.contains_key(&block.name) {
                log::warn!("[PageResolver] duplicate block '{}' ignored", block.name);
                registry.duplicates.push(block.name);
                continue;
            }
            registry.index.insert(block.name.clone(), registry.blocks.len());
            registry.blocks.push(block);
        }
        log::debug!("[PageResolver] block registry built with {} blocks", registry.len());
        registry
    }

    pub fn get(&self, name: &str) -> Option<&Block> {
        self.index.get(name).map(|&i| &self.blocks[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }
}

/// Names of the blocks being expanded on the current DFS path.
///
/// Carried down the recursion rather than shared, so concurrent resolutions
/// of independent subtrees never observe each other.
#[derive(Debug, Clone, Default)]
pub struct ActiveBlocks {
    stack: Vec<String>,
}

impl ActiveBlocks {
    pub fn contains(&self, name: &str) -> bool {
        self.stack.iter().any(|n| n == name)
    }

    pub fn enter(&mut self, name: &str) {
        self.stack.push(name.to_string());
    }

    pub fn leave(&mut self) {
        self.stack.pop();
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

#[derive(Debug)]
pub enum Lookup<'a> {
    Found(&'a Block),
    NotFound,
    /// The block is already being expanded higher up this path.
    Cycle,
}

pub fn lookup<'a>(registry: &'a BlockRegistry, active: &ActiveBlocks, name: &str) -> Lookup<'a> {
    match registry.get(name) {
        None => Lookup::NotFound,
        Some(_) if active.contains(name) => Lookup::Cycle,
        Some(block) => Lookup::Found(block),
    }
}

/// CLONE + SUBSTITUTE_VARS: a fresh copy of the block's component with the
/// reference's variables applied. The registry's copy is never touched.
pub fn instantiate(block: &Block, reference: &BlockReference, interpolate: bool) -> Component {
    let mut component = block.component.clone();
    if !reference.vars.is_empty() {
        let mut substitution = VarSubstitution {
            vars: &reference.vars,
            interpolate,
        };
        substitution.visit_component(&mut component);
    }
    component
}

/// Applies `$name` variables to every string prop and content in a subtree,
/// including the vars of nested block references so values can be forwarded.
struct VarSubstitution<'a> {
    vars: &'a BlockVars,
    interpolate: bool,
}

impl VarSubstitution<'_> {
    fn text(&self, text: &mut String) {
        *text = substitute_vars_in_text(text, self.vars, self.interpolate);
    }
}

impl NodeVisitor for VarSubstitution<'_> {
    fn visit_component(&mut self, component: &mut Component) {
        for value in component.props.values_mut() {
            substitute_vars(value, self.vars, self.interpolate);
        }
        if let Some(content) = &mut component.content {
            self.text(content);
        }
        walk_component(self, component);
    }

    fn visit_reference(&mut self, reference: &mut BlockReference) {
        for value in reference.vars.values_mut() {
            if let Scalar::Text(text) = value {
                let mut substituted = serde_json::Value::String(std::mem::take(text));
                substitute_vars(&mut substituted, self.vars, self.interpolate);
                *value = match substituted {
                    serde_json::Value::String(s) => Scalar::Text(s),
                    serde_json::Value::Bool(b) => Scalar::Bool(b),
                    serde_json::Value::Number(n) => Scalar::Number(n),
                    other => Scalar::Text(other.to_string()),
                };
            }
        }
    }

    fn visit_override(&mut self, breakpoint_override: &mut BreakpointOverride) {
        if let Some(props) = &mut breakpoint_override.props {
            for value in props.values_mut() {
                substitute_vars(value, self.vars, self.interpolate);
            }
        }
        if let Some(content) = &mut breakpoint_override.content {
            self.text(content);
        }
        walk_override(self, breakpoint_override);
    }
}
