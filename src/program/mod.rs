//! Parsed program: the set of source files one compilation unit covers.
//!
//! Sources are parsed with `syn`. Positions come from `proc-macro2` span
//! locations and are converted to byte offsets in the file text, so every
//! consumer works with the same coordinates as the edit ledger.

mod decorators;
mod loader;
mod walker;

use std::sync::Arc;

use proc_macro2::{LineColumn, Span};
use syn::spanned::Spanned;

pub use decorators::{
    AttributeMetadataResolver, ComponentMetadata, ComponentMetadataResolver, MetadataProperty,
};
pub use loader::{DEFAULT_SKIP_DIRS, discover_sources};

use crate::error::{UpdateError, UpdateResult};
use crate::file_system::{FileSystem, WorkspacePath};
use crate::line_index::{LineAndCharacter, compute_line_starts_map, get_line_and_character_from_position};

/// How a file takes part in a migration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Workspace source: traversed and migrated.
    Source,
    /// Only `extern` blocks and `use` items, nothing to migrate.
    Declaration,
    /// Belongs to an external, read-only library.
    Library,
}

/// One parsed file.
pub struct SourceFile {
    path: WorkspacePath,
    text: String,
    syntax: syn::File,
    kind: FileKind,
    line_starts: Arc<[usize]>,
    /// Starts of lines as `proc-macro2` counts them (LF only, BOM skipped).
    span_lines: Vec<usize>,
}

impl SourceFile {
    pub fn parse(path: WorkspacePath, text: impl Into<String>, kind: FileKind) -> UpdateResult<Self> {
        let text = text.into();
        let syntax = syn::parse_file(&text).map_err(|e| {
            let start = e.span().start();
            UpdateError::parse(
                path.as_path(),
                format!("{} (line {}, column {})", e, start.line, start.column + 1),
            )
        })?;

        let kind = if kind == FileKind::Source && is_declaration_only(&syntax) {
            FileKind::Declaration
        } else {
            kind
        };

        let bom = if text.starts_with('\u{feff}') { '\u{feff}'.len_utf8() } else { 0 };
        let mut span_lines = vec![bom];
        span_lines.extend(
            text.bytes()
                .enumerate()
                .skip(bom)
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );

        Ok(Self {
            line_starts: compute_line_starts_map(&text).into(),
            path,
            text,
            syntax,
            kind,
            span_lines,
        })
    }

    pub fn path(&self) -> &WorkspacePath {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn syntax(&self) -> &syn::File {
        &self.syntax
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// Shared line-start map of the full file text.
    pub fn line_starts(&self) -> &Arc<[usize]> {
        &self.line_starts
    }

    /// Byte offset of a span location in this file.
    pub fn offset_of(&self, location: LineColumn) -> usize {
        let Some(&line_start) = self.span_lines.get(location.line.saturating_sub(1)) else {
            return self.text.len();
        };
        let rest = &self.text[line_start..];
        let column = rest
            .char_indices()
            .nth(location.column)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        line_start + column
    }

    pub fn span_start(&self, span: Span) -> usize {
        self.offset_of(span.start())
    }

    pub fn span_end(&self, span: Span) -> usize {
        self.offset_of(span.end())
    }

    pub fn line_and_character(&self, offset: usize) -> LineAndCharacter {
        get_line_and_character_from_position(&self.line_starts, offset)
    }

    /// Visit every node of the file once, parents before children.
    pub fn walk(&self, callback: &mut dyn FnMut(Node<'_>)) {
        walker::walk_file(&self.syntax, callback);
    }
}

fn is_declaration_only(file: &syn::File) -> bool {
    let mut has_foreign = false;
    for item in &file.items {
        match item {
            syn::Item::ForeignMod(_) => has_foreign = true,
            syn::Item::Use(_) => {}
            _ => return false,
        }
    }
    has_foreign
}

/// A syntax node handed to migrations and the resource collector.
#[derive(Clone, Copy)]
pub enum Node<'ast> {
    Item(&'ast syn::Item),
    ImplItem(&'ast syn::ImplItem),
    Expr(&'ast syn::Expr),
    Type(&'ast syn::Type),
    Ident(&'ast proc_macro2::Ident),
}

impl<'ast> Node<'ast> {
    pub fn span(&self) -> Span {
        match self {
            Node::Item(item) => item.span(),
            Node::ImplItem(item) => item.span(),
            Node::Expr(expr) => expr.span(),
            Node::Type(ty) => ty.span(),
            Node::Ident(ident) => ident.span(),
        }
    }

    /// The struct declaration, if this node is one.
    pub fn as_struct(&self) -> Option<&'ast syn::ItemStruct> {
        match *self {
            Node::Item(syn::Item::Struct(item)) => Some(item),
            _ => None,
        }
    }

    /// The string literal, if this node is a string literal expression.
    pub fn as_string_literal(&self) -> Option<&'ast syn::LitStr> {
        match *self {
            Node::Expr(syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(lit),
                ..
            })) => Some(lit),
            _ => None,
        }
    }

    pub fn as_ident(&self) -> Option<&'ast proc_macro2::Ident> {
        match *self {
            Node::Ident(ident) => Some(ident),
            _ => None,
        }
    }
}

/// The files of one compilation unit.
#[derive(Default)]
pub struct Program {
    files: Vec<SourceFile>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and add a file. A path that is already present is replaced.
    pub fn add_file(&mut self, path: WorkspacePath, text: impl Into<String>, kind: FileKind) -> UpdateResult<()> {
        let file = SourceFile::parse(path, text, kind)?;
        self.files.retain(|f| f.path != file.path);
        self.files.push(file);
        Ok(())
    }

    /// Load files through the file system. Unreadable or unparsable files are
    /// skipped with a warning, matching a half-migrated workspace.
    pub fn load(fs: &dyn FileSystem, sources: &[WorkspacePath], libraries: &[WorkspacePath]) -> Self {
        let mut program = Self::new();
        let entries = sources
            .iter()
            .map(|p| (p, FileKind::Source))
            .chain(libraries.iter().map(|p| (p, FileKind::Library)));

        for (path, kind) in entries {
            let Some(text) = fs.read(path) else {
                tracing::warn!("Skipping unreadable file {}", path);
                continue;
            };
            if let Err(e) = program.add_file(path.clone(), text, kind) {
                tracing::warn!("Skipping {}", e);
            }
        }
        program
    }

    pub fn source_files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn file(&self, path: &WorkspacePath) -> Option<&SourceFile> {
        self.files.iter().find(|f| &f.path == path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_system::MemoryFileSystem;
    use std::path::Path;

    fn parse(text: &str) -> SourceFile {
        let fs = MemoryFileSystem::new("/ws");
        SourceFile::parse(fs.resolve(&[Path::new("lib.rs")]), text, FileKind::Source).unwrap()
    }

    #[test]
    fn test_span_offsets_match_text() {
        let text = "use a::B;\r\n\nfn main() {\n    let héllo = \"x\";\n}\n";
        let file = parse(text);
        let mut literal_offset = None;
        file.walk(&mut |node| {
            if let Some(lit) = node.as_string_literal() {
                literal_offset = Some(file.span_start(lit.span()));
            }
        });
        assert_eq!(literal_offset, text.find("\"x\""));
    }

    #[test]
    fn test_declaration_only_files() {
        let file = parse("use std::ffi::c_int;\nextern \"C\" { fn abs(x: c_int) -> c_int; }\n");
        assert_eq!(file.kind(), FileKind::Declaration);
        assert_eq!(parse("fn f() {}").kind(), FileKind::Source);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let fs = MemoryFileSystem::new("/ws");
        let err = SourceFile::parse(fs.resolve(&[Path::new("bad.rs")]), "fn {", FileKind::Source);
        assert!(matches!(err, Err(UpdateError::Parse { .. })));
    }

    #[test]
    fn test_load_skips_broken_files() {
        let mut fs = MemoryFileSystem::new("/ws");
        let good = fs.insert("good.rs", "struct A;");
        let bad = fs.insert("bad.rs", "struct");
        let missing = fs.resolve(&[Path::new("missing.rs")]);
        let program = Program::load(&fs, &[good.clone(), bad, missing], &[]);
        assert_eq!(program.len(), 1);
        assert!(program.file(&good).is_some());
    }

    #[test]
    fn test_walk_visits_nested_nodes() {
        let file = parse("struct A;\nimpl A { fn f(&self) -> u8 { 1 + 2 } }\n");
        let mut items = 0;
        let mut impl_items = 0;
        let mut exprs = 0;
        file.walk(&mut |node| match node {
            Node::Item(_) => items += 1,
            Node::ImplItem(_) => impl_items += 1,
            Node::Expr(_) => exprs += 1,
            _ => {}
        });
        assert_eq!(items, 2);
        assert_eq!(impl_items, 1);
        // `1 + 2`, `1`, `2`
        assert_eq!(exprs, 3);
    }
}
