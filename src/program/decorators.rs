//! Component attribute lookup.
//!
//! Answers one question for a struct: "does it carry a recognized component
//! attribute, and what is its argument list?". Everything about templates and
//! stylesheets is left to the resource collector.

use syn::punctuated::Punctuated;
use syn::{Expr, ItemStruct, Meta, MetaNameValue, Token};

/// One `name = value` argument of a component attribute.
pub struct MetadataProperty {
    pub name: String,
    pub value: Expr,
}

/// Arguments of a recognized component attribute.
pub struct ComponentMetadata {
    /// Last path segment of the attribute, e.g. `component`.
    pub attribute: String,
    pub properties: Vec<MetadataProperty>,
}

/// Decides whether a struct is component-like.
pub trait ComponentMetadataResolver {
    /// `None` when the struct is not a component or its attribute is malformed.
    fn component_metadata(&self, item: &ItemStruct) -> Option<ComponentMetadata>;
}

/// Recognizes `#[component(...)]` (or any configured name, matched on the
/// last path segment so `#[ui::component(...)]` works too).
#[derive(Debug, Clone)]
pub struct AttributeMetadataResolver {
    names: Vec<String>,
}

impl Default for AttributeMetadataResolver {
    fn default() -> Self {
        Self::new(["component"])
    }
}

impl AttributeMetadataResolver {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl ComponentMetadataResolver for AttributeMetadataResolver {
    fn component_metadata(&self, item: &ItemStruct) -> Option<ComponentMetadata> {
        let (attr, attribute) = item.attrs.iter().find_map(|attr| {
            let last = attr.path().segments.last()?;
            self.names
                .iter()
                .any(|n| last.ident == n.as_str())
                .then(|| (attr, last.ident.to_string()))
        })?;

        // `#[component]` and `#[component = ".."]` carry no argument list.
        let Meta::List(list) = &attr.meta else {
            return None;
        };
        let args = list
            .parse_args_with(Punctuated::<MetaNameValue, Token![,]>::parse_terminated)
            .ok()?;
        if args.is_empty() {
            return None;
        }

        let mut properties = Vec::with_capacity(args.len());
        for arg in args {
            let name = arg.path.get_ident()?.to_string();
            properties.push(MetadataProperty {
                name,
                value: arg.value,
            });
        }

        Some(ComponentMetadata {
            attribute,
            properties,
        })
    }
}
