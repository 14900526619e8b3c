//! # Page Resolver Ground Truth
//!
//! ## Resolution Invariants
//!
//! 1. **Read-only inputs**: the block registry, theme and languages are never
//!    mutated during a render. Blocks are cloned per reference site.
//!
//! 2. **Pass order**: every string prop and `content` goes through
//!    translation → theme, and block variables are applied only while
//!    instantiating a block. No pass rescans another pass's output.
//!
//! 3. **Soft failure**: a missing block, a cycle, an unknown component type or
//!    a branch past `maxDepth` resolves to nothing. Siblings still resolve and
//!    a `Diagnostic` is collected (W-BLOCK-UNKNOWN, W-BLOCK-CYCLE,
//!    W-TYPE-UNKNOWN, W-DEPTH).
//!
//! 4. **Style merge order**: layout → animation → shadow → spacing → explicit.
//!    Explicit props always win.
//!
//! 5. **Responsive overrides are planned, not collapsed**: each element
//!    carries one descriptor per authored breakpoint with its media query.
//!
//! 6. **Output order**: sections, children and diagnostics come out in
//!    authored order, whether sections resolve sequentially or on the rayon pool.

#[cfg(feature = "napi")]
use napi_derive::napi;

mod animation;
mod blocks;
mod diagnostics;
mod error;
mod model;
mod options;
mod resolve;
mod responsive;
mod style;
mod theme;
mod tokens;
mod visitor;


pub use animation::{apply_type_animation, compose_animation, AnimationLayer, Stagger};
pub use blocks::{instantiate, lookup, ActiveBlocks, BlockRegistry, Lookup};
pub use diagnostics::*;
pub use error::InputError;
pub use model::{
    Block, BlockReference, BlockVars, ClickEffect, Component, ComponentKind, EntranceAnimation,
    HoverEffect, Interactions, Node, Props, ResolvedElement, Scalar, ScrollAnimation,
};
pub use options::{ResolveOptions, DEFAULT_MAX_DEPTH};
pub use resolve::{
    resolve_page, resolve_page_json, resolve_pages, resolve_sections, Environment, PageInput,
    PageResolution, ResolutionContext,
};
pub use responsive::{
    media_query, Breakpoint, BreakpointOverride, BreakpointOverrides, ResolvedOverride,
    ResponsivePlan,
};
pub use style::{compose_style, resolve_shadow, resolve_spacing, ComposedStyle, Spacing};
pub use theme::{Languages, Theme};
pub use tokens::{
    resolve_block_variable, resolve_theme_token, resolve_translation_token, TokenPass,
};

#[cfg(feature = "napi")]
pub use resolve::resolve_page_native;

#[cfg(feature = "napi")]
#[napi]
pub fn resolver_bridge() -> String {
    "Page Resolver Native Bridge Connected".to_string()
}
