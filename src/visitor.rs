use crate::model::{BlockReference, Component, Node};
use crate::responsive::BreakpointOverride;

/// The NodeVisitor trait is the single traversal mechanism for authored
/// component trees.
///
/// Rules:
/// 1. Traversal is depth-first, pre-order, siblings in authored order.
/// 2. Implementers override `visit_*` methods to add behavior.
/// 3. Implementers MUST call the matching `walk_*` function to continue
///    traversal unless pruning is intended.
/// 4. Responsive override children are part of the tree and are walked
///    after the component's own children.
pub trait NodeVisitor {
    fn visit_node(&mut self, node: &mut Node) {
        walk_node(self, node);
    }

    fn visit_component(&mut self, component: &mut Component) {
        walk_component(self, component);
    }

    fn visit_reference(&mut self, _reference: &mut BlockReference) {
        // Leaf: the referenced block is not part of this tree
    }

    fn visit_override(&mut self, breakpoint_override: &mut BreakpointOverride) {
        walk_override(self, breakpoint_override);
    }

    fn visit_children(&mut self, children: &mut Vec<Node>) {
        walk_children(self, children);
    }
}

pub fn walk_node<V: NodeVisitor + ?Sized>(visitor: &mut V, node: &mut Node) {
    match node {
        Node::Component(c) => visitor.visit_component(c),
        Node::Reference(r) => visitor.visit_reference(r),
    }
}

pub fn walk_children<V: NodeVisitor + ?Sized>(visitor: &mut V, children: &mut Vec<Node>) {
    for node in children {
        visitor.visit_node(node);
    }
}

pub fn walk_component<V: NodeVisitor + ?Sized>(visitor: &mut V, component: &mut Component) {
    visitor.visit_children(&mut component.children);
    for breakpoint_override in component.responsive.values_mut() {
        visitor.visit_override(breakpoint_override);
    }
}

pub fn walk_override<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    breakpoint_override: &mut BreakpointOverride,
) {
    if let Some(children) = &mut breakpoint_override.children {
        visitor.visit_children(children);
    }
}
