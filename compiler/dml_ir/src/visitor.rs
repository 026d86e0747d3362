//! Syntax forest visitor.
//!
//! Default implementations call `walk_*` functions that traverse children.
//! Override `visit_*` methods to add behavior at specific nodes, and call the
//! matching `walk_*` function to keep descending.
//!
//! # Example
//!
//! ```text
//! struct CountEntities {
//!     count: usize,
//! }
//!
//! impl<'ast> SyntaxVisitor<'ast> for CountEntities {
//!     fn visit_entity(&mut self, entity: &'ast EntitySyntax) {
//!         self.count += 1;
//!         walk_entity(self, entity);
//!     }
//! }
//! ```

use crate::syntax::{
    AtomSyntax, EntitySyntax, EventSyntax, ExternalEnumSyntax, NamespaceMemberSyntax,
    NamespaceSyntax, PropertySyntax, SyntaxTree, ValueSyntax, WebApiCommandSyntax,
    WebApiMemberSyntax, WebApiPathSyntax, WebApiQuerySyntax, WebApiSyntax,
};

/// Syntax forest visitor trait.
///
/// The visitor can mutate its own state; the forest stays immutable.
pub trait SyntaxVisitor<'ast> {
    fn visit_tree(&mut self, tree: &'ast SyntaxTree) {
        walk_tree(self, tree);
    }

    fn visit_namespace(&mut self, namespace: &'ast NamespaceSyntax) {
        walk_namespace(self, namespace);
    }

    fn visit_entity(&mut self, entity: &'ast EntitySyntax) {
        walk_entity(self, entity);
    }

    fn visit_event(&mut self, event: &'ast EventSyntax) {
        walk_event(self, event);
    }

    fn visit_value(&mut self, value: &'ast ValueSyntax) {
        walk_value(self, value);
    }

    fn visit_external_enum(&mut self, external: &'ast ExternalEnumSyntax) {
        let _ = external;
    }

    fn visit_property(&mut self, property: &'ast PropertySyntax) {
        let _ = property;
    }

    /// Visit the root of a web-API surface.
    fn visit_web_api(&mut self, api: &'ast WebApiSyntax) {
        walk_web_api(self, api);
    }

    fn visit_path(&mut self, path: &'ast WebApiPathSyntax) {
        walk_path(self, path);
    }

    fn visit_query(&mut self, query: &'ast WebApiQuerySyntax) {
        walk_query(self, query);
    }

    fn visit_command(&mut self, command: &'ast WebApiCommandSyntax) {
        let _ = command;
    }

    /// Visit a query or path filter.
    fn visit_filter(&mut self, filter: &'ast AtomSyntax) {
        let _ = filter;
    }
}

pub fn walk_tree<'ast, V: SyntaxVisitor<'ast> + ?Sized>(visitor: &mut V, tree: &'ast SyntaxTree) {
    for namespace in &tree.namespaces {
        visitor.visit_namespace(namespace);
    }
}

pub fn walk_namespace<'ast, V: SyntaxVisitor<'ast> + ?Sized>(
    visitor: &mut V,
    namespace: &'ast NamespaceSyntax,
) {
    for member in &namespace.members {
        walk_namespace_member(visitor, member);
    }
}

/// Dispatch one namespace member to its `visit_*` method.
pub fn walk_namespace_member<'ast, V: SyntaxVisitor<'ast> + ?Sized>(
    visitor: &mut V,
    member: &'ast NamespaceMemberSyntax,
) {
    match member {
        NamespaceMemberSyntax::Namespace(namespace) => visitor.visit_namespace(namespace),
        NamespaceMemberSyntax::Entity(entity) => visitor.visit_entity(entity),
        NamespaceMemberSyntax::Value(value) => visitor.visit_value(value),
        NamespaceMemberSyntax::ExternalEnum(external) => visitor.visit_external_enum(external),
        NamespaceMemberSyntax::WebApi(api) => visitor.visit_web_api(api),
    }
}

pub fn walk_entity<'ast, V: SyntaxVisitor<'ast> + ?Sized>(
    visitor: &mut V,
    entity: &'ast EntitySyntax,
) {
    for event in &entity.events {
        visitor.visit_event(event);
    }
}

pub fn walk_event<'ast, V: SyntaxVisitor<'ast> + ?Sized>(
    visitor: &mut V,
    event: &'ast EventSyntax,
) {
    for property in &event.properties {
        visitor.visit_property(property);
    }
}

pub fn walk_value<'ast, V: SyntaxVisitor<'ast> + ?Sized>(
    visitor: &mut V,
    value: &'ast ValueSyntax,
) {
    for property in &value.properties {
        visitor.visit_property(property);
    }
}

pub fn walk_web_api<'ast, V: SyntaxVisitor<'ast> + ?Sized>(
    visitor: &mut V,
    api: &'ast WebApiSyntax,
) {
    visitor.visit_path(&api.path);
}

/// Filters first, then nested members in source order.
pub fn walk_path<'ast, V: SyntaxVisitor<'ast> + ?Sized>(
    visitor: &mut V,
    path: &'ast WebApiPathSyntax,
) {
    for filter in &path.filters {
        visitor.visit_filter(filter);
    }
    for member in &path.members {
        match member {
            WebApiMemberSyntax::Command(command) => visitor.visit_command(command),
            WebApiMemberSyntax::Query(query) => visitor.visit_query(query),
            WebApiMemberSyntax::Path(nested) => visitor.visit_path(nested),
        }
    }
}

pub fn walk_query<'ast, V: SyntaxVisitor<'ast> + ?Sized>(
    visitor: &mut V,
    query: &'ast WebApiQuerySyntax,
) {
    for filter in &query.filters {
        visitor.visit_filter(filter);
    }
}
