//! Templates and stylesheets attached to components.

mod collector;

use std::sync::Arc;

pub use collector::{ComponentResourceCollector, inline_resource_start};
pub(crate) use collector::literal_body;

use crate::file_system::WorkspacePath;
use crate::line_index::{LineAndCharacter, get_line_and_character_from_position};

/// Whether a resource is a template or a stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Template,
    Stylesheet,
}

/// How a component property's value is turned into a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStrategy {
    /// The literal itself is the content.
    Inline,
    /// The literal is a path relative to the declaring source file.
    ExternalFile,
}

/// Component attribute properties that declare resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceProperty {
    Template,
    TemplateUrl,
    Styles,
    StyleUrl,
    StyleUrls,
}

impl ResourceProperty {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "template" => Some(Self::Template),
            "template_url" => Some(Self::TemplateUrl),
            "styles" => Some(Self::Styles),
            "style_url" => Some(Self::StyleUrl),
            "style_urls" => Some(Self::StyleUrls),
            _ => None,
        }
    }

    pub fn kind(self) -> ResourceKind {
        match self {
            Self::Template | Self::TemplateUrl => ResourceKind::Template,
            Self::Styles | Self::StyleUrl | Self::StyleUrls => ResourceKind::Stylesheet,
        }
    }

    pub fn strategy(self) -> ResolutionStrategy {
        match self {
            Self::Template | Self::Styles => ResolutionStrategy::Inline,
            Self::TemplateUrl | Self::StyleUrl | Self::StyleUrls => ResolutionStrategy::ExternalFile,
        }
    }

    /// Whether an array of literals is accepted in addition to a single one.
    pub fn accepts_list(self) -> bool {
        matches!(self, Self::Styles | Self::StyleUrls)
    }
}

/// Informational back-reference to the declaring struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRef {
    pub name: String,
    pub file: WorkspacePath,
}

/// One template or stylesheet, with its position mapping.
#[derive(Debug, Clone)]
pub struct ResolvedResource {
    pub content: String,
    pub inline: bool,
    /// Offset of `content` in the text of `file_path`; 0 for external files.
    pub start: usize,
    /// The file that receives edits for this resource.
    pub file_path: WorkspacePath,
    pub container: Option<ContainerRef>,
    line_starts: Arc<[usize]>,
}

impl ResolvedResource {
    pub(crate) fn new(
        content: String,
        inline: bool,
        start: usize,
        file_path: WorkspacePath,
        container: Option<ContainerRef>,
        line_starts: Arc<[usize]>,
    ) -> Self {
        Self {
            content,
            inline,
            start,
            file_path,
            container,
            line_starts,
        }
    }

    /// Translate an offset in `content` into an offset in the owning file.
    pub fn absolute_offset(&self, offset: usize) -> usize {
        self.start + offset
    }

    /// Line and character, in the owning file, of an offset in `content`.
    pub fn get_character_and_line_of_position(&self, offset: usize) -> LineAndCharacter {
        get_line_and_character_from_position(&self.line_starts, self.absolute_offset(offset))
    }
}
