//! Discovers the templates and stylesheets declared by component structs.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use syn::{Expr, ExprLit, Lit, LitStr};

use super::{ContainerRef, ResolutionStrategy, ResolvedResource, ResourceKind, ResourceProperty};
use crate::file_system::{FileSystem, WorkspacePath};
use crate::line_index::compute_line_starts_map;
use crate::program::{ComponentMetadataResolver, Node, SourceFile};

/// Offset of the first content character of a string literal whose token
/// (as written in the source, e.g. `"..."` or `r#"..."#`) begins at
/// `literal_offset`. For an ordinary literal this skips the opening quote.
pub fn inline_resource_start(literal_offset: usize, literal_token: &str) -> usize {
    literal_offset + opening_delimiter_len(literal_token)
}

fn opening_delimiter_len(token: &str) -> usize {
    token.find('"').map_or(0, |idx| idx + 1)
}

/// Source text between the delimiters of a string literal token.
pub(crate) fn literal_body(token: &str) -> Option<&str> {
    let open = opening_delimiter_len(token);
    let close = token.rfind('"')?;
    (open > 0 && close >= open).then(|| &token[open..close])
}

/// Collects resources while the orchestrator walks the program.
pub struct ComponentResourceCollector<'r> {
    pub templates: Vec<ResolvedResource>,
    pub stylesheets: Vec<ResolvedResource>,
    resolver: &'r dyn ComponentMetadataResolver,
}

impl<'r> ComponentResourceCollector<'r> {
    pub fn new(resolver: &'r dyn ComponentMetadataResolver) -> Self {
        Self {
            templates: Vec::new(),
            stylesheets: Vec::new(),
            resolver,
        }
    }

    /// Called once per node of the traversal; only structs are inspected.
    pub fn visit_node(&mut self, file: &SourceFile, node: Node<'_>, fs: &dyn FileSystem) {
        if let Some(item) = node.as_struct() {
            self.visit_struct(file, item, fs);
        }
    }

    fn visit_struct(&mut self, file: &SourceFile, item: &syn::ItemStruct, fs: &dyn FileSystem) {
        let Some(metadata) = self.resolver.component_metadata(item) else {
            return;
        };
        let container = ContainerRef {
            name: item.ident.to_string(),
            file: file.path().clone(),
        };
        let mut seen_external: HashSet<WorkspacePath> = HashSet::new();

        for property in &metadata.properties {
            let Some(resource_property) = ResourceProperty::from_name(&property.name) else {
                continue;
            };
            let literals = string_literals(&property.value, resource_property.accepts_list());

            for literal in literals {
                let resource = match resource_property.strategy() {
                    ResolutionStrategy::Inline => self.resolve_inline(file, literal, &container),
                    ResolutionStrategy::ExternalFile => {
                        let path = fs.resolve(&[file.path().parent(), Path::new(&literal.value())]);
                        if !seen_external.insert(path.clone()) {
                            continue;
                        }
                        self.resolve_external(path, Some(container.clone()), fs)
                    }
                };
                let Some(resource) = resource else {
                    continue;
                };
                match resource_property.kind() {
                    ResourceKind::Template => self.templates.push(resource),
                    ResourceKind::Stylesheet => self.stylesheets.push(resource),
                }
            }
        }
    }

    fn resolve_inline(&self, file: &SourceFile, literal: &LitStr, container: &ContainerRef) -> Option<ResolvedResource> {
        let token = literal.token().to_string();
        let content = literal_body(&token)?;
        let start = inline_resource_start(file.span_start(literal.span()), &token);

        Some(ResolvedResource::new(
            content.to_string(),
            true,
            start,
            file.path().clone(),
            Some(container.clone()),
            Arc::clone(file.line_starts()),
        ))
    }

    /// Resolve a stylesheet that lives in its own file, e.g. a global
    /// stylesheet that no component references. Missing files yield `None`.
    pub fn resolve_external_stylesheet(
        &self,
        path: &WorkspacePath,
        container: Option<ContainerRef>,
        fs: &dyn FileSystem,
    ) -> Option<ResolvedResource> {
        self.resolve_external(path.clone(), container, fs)
    }

    fn resolve_external(
        &self,
        path: WorkspacePath,
        container: Option<ContainerRef>,
        fs: &dyn FileSystem,
    ) -> Option<ResolvedResource> {
        // A reference into a half-migrated workspace may dangle; that is not a failure.
        if !fs.exists(&path) {
            tracing::debug!("Skipping missing resource {}", path);
            return None;
        }
        let content = fs.read(&path)?;
        let line_starts = compute_line_starts_map(&content).into();
        tracing::debug!("Resolved external resource {}", path);
        Some(ResolvedResource::new(content, false, 0, path, container, line_starts))
    }
}

/// String literals of a property value: a literal, or an array of them.
fn string_literals(value: &Expr, accepts_list: bool) -> Vec<&LitStr> {
    match value {
        Expr::Lit(ExprLit { lit: Lit::Str(lit), .. }) => vec![lit],
        Expr::Array(array) if accepts_list => array
            .elems
            .iter()
            .filter_map(|elem| match elem {
                Expr::Lit(ExprLit { lit: Lit::Str(lit), .. }) => Some(lit),
                _ => None,
            })
            .collect(),
        Expr::Reference(reference) => string_literals(&reference.expr, accepts_list),
        _ => Vec::new(),
    }
}
