//! Single recursive traversal over a parsed file.

use syn::visit::{self, Visit};

use super::Node;

struct NodeWalker<'c> {
    callback: &'c mut dyn FnMut(Node<'_>),
}

impl<'ast> Visit<'ast> for NodeWalker<'_> {
    fn visit_item(&mut self, node: &'ast syn::Item) {
        (self.callback)(Node::Item(node));
        visit::visit_item(self, node);
    }

    fn visit_impl_item(&mut self, node: &'ast syn::ImplItem) {
        (self.callback)(Node::ImplItem(node));
        visit::visit_impl_item(self, node);
    }

    fn visit_expr(&mut self, node: &'ast syn::Expr) {
        (self.callback)(Node::Expr(node));
        visit::visit_expr(self, node);
    }

    fn visit_type(&mut self, node: &'ast syn::Type) {
        (self.callback)(Node::Type(node));
        visit::visit_type(self, node);
    }

    fn visit_ident(&mut self, node: &'ast proc_macro2::Ident) {
        (self.callback)(Node::Ident(node));
    }
}

pub(super) fn walk_file(file: &syn::File, callback: &mut dyn FnMut(Node<'_>)) {
    let mut walker = NodeWalker { callback };
    walker.visit_file(file);
}
