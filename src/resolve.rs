//! Tree Resolution Orchestrator
//!
//! Walks a page's section list depth-first, pre-order, and turns every node
//! into a `ResolvedElement`. Failing branches are omitted and reported as
//! diagnostics; siblings always continue.

#[cfg(feature = "napi")]
use napi_derive::napi;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::blocks::{instantiate, lookup, ActiveBlocks, BlockRegistry, Lookup};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::error::InputError;
use crate::model::{Block, BlockReference, Component, Node, Props, ResolvedElement};
use crate::options::ResolveOptions;
use crate::responsive::{plan_responsive, Breakpoint, OverrideResolver, ResponsivePlan};
use crate::style::{compose_style, consumed_props};
use crate::theme::{Languages, Theme};
use crate::tokens::{value_to_text, TokenPass};

/// Already-validated page description handed over by the schema layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInput {
    pub sections: Vec<Node>,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub languages: Languages,
    #[serde(default)]
    pub current_lang: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResolution {
    pub sections: Vec<ResolvedElement>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Read-only inputs shared by every resolution of one render.
#[derive(Debug, Clone, Copy)]
pub struct Environment<'a> {
    pub registry: &'a BlockRegistry,
    pub theme: &'a Theme,
    pub languages: &'a Languages,
    pub current_lang: &'a str,
    pub options: &'a ResolveOptions,
}

impl<'a> Environment<'a> {
    fn tokens(&self) -> TokenPass<'a> {
        TokenPass::new(self.current_lang, self.languages, self.theme)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESOLUTION CONTEXT
// ═══════════════════════════════════════════════════════════════════════════════

/// Working state of one DFS. Never shared between threads: each top-level
/// section gets its own.
pub struct ResolutionContext<'a> {
    env: Environment<'a>,
    active_blocks: ActiveBlocks,
    path: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(env: Environment<'a>) -> Self {
        Self {
            env,
            active_blocks: ActiveBlocks::default(),
            path: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn resolve(&mut self, node: &Node, depth: usize) -> Option<ResolvedElement> {
        if depth > self.env.options.max_depth {
            let name = match node {
                Node::Component(c) => c.kind.as_str(),
                Node::Reference(r) => r.name.as_str(),
            };
            self.emit(DiagnosticKind::MaxDepthExceeded, name);
            return None;
        }
        match node {
            Node::Reference(reference) => self.resolve_reference(reference, depth),
            Node::Component(component) => self.resolve_component(component, depth, None),
        }
    }

    fn resolve_reference(
        &mut self,
        reference: &BlockReference,
        depth: usize,
    ) -> Option<ResolvedElement> {
        self.path.push(format!("$ref({})", reference.name));

        let resolved = match lookup(self.env.registry, &self.active_blocks, &reference.name) {
            Lookup::NotFound => {
                self.emit(DiagnosticKind::UnknownBlockReference, &reference.name);
                None
            }
            Lookup::Cycle => {
                self.emit(DiagnosticKind::CycleDetected, &reference.name);
                None
            }
            Lookup::Found(block) => {
                let component =
                    instantiate(block, reference, self.env.options.interpolate_block_vars);
                self.active_blocks.enter(&block.name);
                let element = self.resolve_component(&component, depth, Some(&block.name));
                self.active_blocks.leave();
                element
            }
        };

        self.path.pop();
        resolved
    }

    fn resolve_component(
        &mut self,
        component: &Component,
        depth: usize,
        block: Option<&str>,
    ) -> Option<ResolvedElement> {
        if !component.kind.is_known() {
            self.emit(DiagnosticKind::UnknownComponentType, component.kind.as_str());
            return None;
        }

        let env = self.env;
        let tokens = env.tokens();

        // 1. Tokens (translation → theme)
        let props = tokens.resolve_props(&component.props);
        let content = component.content.as_deref().map(|c| tokens.resolve_content(c));

        // 2. Style / animation bag
        let composed = compose_style(
            &component.kind,
            &props,
            component.interactions.as_ref(),
            env.theme,
        );

        // 3. Final props
        let consumed: Vec<&str> = consumed_props(&component.kind).collect();
        let authored_test_id = props.get("data-testid").and_then(value_to_text);
        let mut final_props: Props = props
            .into_iter()
            .filter(|(key, _)| key != "data-testid" && !consumed.contains(&key.as_str()))
            .collect();
        final_props.extend(composed.attributes);
        if !composed.class_names.is_empty() {
            append_class_names(&mut final_props, &composed.class_names);
        }
        if let Some(key) = content.as_ref().and_then(|c| c.translation_key.as_deref()) {
            final_props.insert("data-translation-key".to_string(), Value::from(key));
        }
        if let Some(name) = block {
            final_props.insert("data-block".to_string(), Value::from(name));
        }
        let test_id = authored_test_id.or_else(|| {
            block
                .filter(|_| env.options.block_test_ids)
                .map(|name| format!("block-{}", name))
        });

        // 4. Responsive descriptors
        let responsive = if component.responsive.is_empty() {
            ResponsivePlan::default()
        } else {
            let mut scope = OverrideScope { ctx: self, depth };
            plan_responsive(&component.responsive, env.theme, &mut scope)
        };

        // 5. Children
        let mut children = self.resolve_children(&component.children, depth + 1);
        if let Some(stagger) = composed.stagger {
            for (index, child) in children.iter_mut().enumerate() {
                // an authored delay on the child wins
                child
                    .style
                    .entry("animationDelay")
                    .or_insert_with(|| Value::from(stagger.delay_for(index)));
            }
        }

        Some(ResolvedElement {
            kind: component.kind.clone(),
            final_props,
            style: composed.style,
            content: content.map(|c| c.text),
            children,
            test_id,
            responsive,
        })
    }

    fn resolve_children(&mut self, children: &[Node], depth: usize) -> Vec<ResolvedElement> {
        let mut resolved = Vec::with_capacity(children.len());
        for (index, child) in children.iter().enumerate() {
            self.path.push(format!("children[{}]", index));
            if let Some(element) = self.resolve(child, depth) {
                resolved.push(element);
            }
            self.path.pop();
        }
        resolved
    }

    fn emit(&mut self, kind: DiagnosticKind, name: &str) {
        let diagnostic = Diagnostic::new(kind, name, &self.path.join("."));
        log::warn!("[PageResolver] {}", diagnostic);
        self.diagnostics.push(diagnostic);
    }
}

fn append_class_names(props: &mut Props, class_names: &[String]) {
    let extra = class_names.join(" ");
    let merged = match props.get("className").and_then(Value::as_str) {
        Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), extra),
        _ => extra,
    };
    props.insert("className".to_string(), Value::String(merged));
}

/// Routes override props, content and children through the same passes as
/// the component that owns them.
struct OverrideScope<'c, 'a> {
    ctx: &'c mut ResolutionContext<'a>,
    depth: usize,
}

impl OverrideResolver for OverrideScope<'_, '_> {
    fn resolve_props(&mut self, props: &Props) -> Props {
        self.ctx.env.tokens().resolve_props(props)
    }

    fn resolve_content(&mut self, content: &str) -> String {
        self.ctx.env.tokens().resolve_content(content).text
    }

    fn resolve_children(
        &mut self,
        breakpoint: Breakpoint,
        children: &[Node],
    ) -> Vec<ResolvedElement> {
        self.ctx.path.push(format!("responsive.{}", breakpoint.as_str()));
        let resolved = self.ctx.resolve_children(children, self.depth + 1);
        self.ctx.path.pop();
        resolved
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ENTRY POINTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Resolve a section list. Each section gets its own context; with
/// `options.parallel` they run on the rayon pool. Output order is the
/// authored order either way.
pub fn resolve_sections(sections: &[Node], env: Environment<'_>) -> PageResolution {
    let resolve_one = |(index, node): (usize, &Node)| {
        let mut ctx = ResolutionContext::new(env);
        ctx.path.push(format!("sections[{}]", index));
        let element = ctx.resolve(node, 0);
        (element, ctx.into_diagnostics())
    };

    let results: Vec<_> = if env.options.parallel && sections.len() > 1 {
        sections.par_iter().enumerate().map(resolve_one).collect()
    } else {
        sections.iter().enumerate().map(resolve_one).collect()
    };

    let mut resolution = PageResolution::default();
    for (element, diagnostics) in results {
        resolution.sections.extend(element);
        resolution.diagnostics.extend(diagnostics);
    }
    resolution
}

pub fn resolve_page(page: &PageInput, options: &ResolveOptions) -> PageResolution {
    let registry = BlockRegistry::new(page.blocks.clone());
    let current_lang = options
        .current_lang
        .as_deref()
        .or(page.current_lang.as_deref())
        .unwrap_or(&page.languages.default);

    let env = Environment {
        registry: &registry,
        theme: &page.theme,
        languages: &page.languages,
        current_lang,
        options,
    };

    let mut resolution = resolve_sections(&page.sections, env);

    let duplicates: Vec<Diagnostic> = registry
        .duplicates()
        .iter()
        .map(|name| Diagnostic::new(DiagnosticKind::DuplicateBlock, name, "blocks"))
        .collect();
    resolution.diagnostics.splice(0..0, duplicates);

    log::debug!(
        "[PageResolver] resolved {} of {} sections ({}) with {} diagnostics",
        resolution.sections.len(),
        page.sections.len(),
        current_lang,
        resolution.diagnostics.len()
    );
    resolution
}

/// Batch build: every page is independent, so they resolve concurrently.
pub fn resolve_pages(pages: &[PageInput], options: &ResolveOptions) -> Vec<PageResolution> {
    if options.parallel {
        pages.par_iter().map(|page| resolve_page(page, options)).collect()
    } else {
        pages.iter().map(|page| resolve_page(page, options)).collect()
    }
}

/// JSON in, JSON out. Used by the Node bridge and by hosts that do not link
/// the typed API.
pub fn resolve_page_json(page_json: &str, options_json: Option<&str>) -> Result<String, InputError> {
    let page: PageInput = serde_json::from_str(page_json).map_err(InputError::InvalidPage)?;
    let options = match options_json {
        Some(raw) if !raw.trim().is_empty() => {
            serde_json::from_str(raw).map_err(InputError::InvalidOptions)?
        }
        _ => ResolveOptions::default(),
    };
    let resolution = resolve_page(&page, &options);
    serde_json::to_string(&resolution).map_err(InputError::Serialize)
}

#[cfg(feature = "napi")]
#[napi]
pub fn resolve_page_native(page_json: String, options_json: Option<String>) -> napi::Result<String> {
    resolve_page_json(&page_json, options_json.as_deref())
        .map_err(|e| napi::Error::from_reason(e.to_string()))
}
