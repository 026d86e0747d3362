//! Semantic rule checking.
//!
//! Runs over every declaration of the merged namespace tree once, using the
//! symbol table for lookups. Rule violations are pushed into the
//! [`ObservationSink`] and never stop the pass: the caller sees every defect
//! of a compilation at once.
//!
//! # Rules
//!
//! - Entity: exactly one of identity type or base entity. The identity type
//!   must be a value type; the base must be another entity.
//! - Event / Value base: same kind (a value may also derive from a built-in),
//!   never itself, and (optionally) never through a longer cycle.
//! - Properties: value types only.
//! - Operations: value-typed result, queries return something, at most one
//!   argument with cardinality exactly one, scalar arguments for queries and
//!   paths, scalar zero-or-one filters.
//! - Any unresolvable reference: "The type or namespace '..' could not be found."

use std::sync::Arc;

use dml_diagnostic::ObservationSink;
use dml_ir::visitor::{
    walk_entity, walk_event, walk_namespace_member, walk_path, walk_query, walk_value,
    SyntaxVisitor,
};
use dml_ir::{
    AtomSyntax, DeclarationKind, EntitySyntax, EventSyntax, Identifier, OperationKind,
    OperationSyntax, PropertySyntax, QualifiedIdentifier, TypeReferenceSyntax, ValueSyntax,
    WebApiCommandSyntax, WebApiPathSyntax, WebApiQuerySyntax,
};

use crate::merge::{all_groups, NamespaceGroup};
use crate::{Declaration, Resolved, Scope, SymbolTable};

/// Switches for optional rules.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ValidationOptions {
    /// Report declarations whose base chain loops back to themselves.
    pub detect_base_cycles: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        ValidationOptions {
            detect_base_cycles: true,
        }
    }
}

/// Check every declaration in `groups` against the semantic rules.
#[tracing::instrument(level = "debug", skip_all, fields(groups = groups.len()))]
pub fn validate(
    groups: &[NamespaceGroup<'_>],
    table: &SymbolTable,
    options: &ValidationOptions,
    sink: &mut ObservationSink,
) {
    let before = sink.len();
    let mut rules = SemanticRules {
        table,
        detect_base_cycles: options.detect_base_cycles,
        sink: &mut *sink,
        scope: Scope::unit(Vec::new()),
    };
    for group in all_groups(groups) {
        for (member, scope) in group.members() {
            rules.scope = Arc::clone(scope);
            walk_namespace_member(&mut rules, member);
        }
    }
    tracing::debug!(observations = sink.len() - before, "validation complete");
}

struct SemanticRules<'t, 's> {
    table: &'t SymbolTable,
    detect_base_cycles: bool,
    sink: &'s mut ObservationSink,
    /// Scope the node being visited is written in.
    scope: Arc<Scope>,
}

impl<'t> SemanticRules<'t, '_> {
    fn resolve_and_validate(
        &mut self,
        reference: &QualifiedIdentifier,
        scope: &Scope,
    ) -> Option<Resolved<'t>> {
        let resolved = self.table.resolve_in(scope, reference);
        if resolved.is_none() {
            self.sink.fail(format!(
                "The type or namespace '{reference}' could not be found."
            ));
        }
        resolved
    }

    fn full_name(&self, name: &Identifier) -> QualifiedIdentifier {
        match self.scope.full_name() {
            Some(outer) => outer + name,
            None => QualifiedIdentifier::from(name),
        }
    }

    /// Run `walk` with `scope` as the current scope.
    fn within(&mut self, scope: Arc<Scope>, walk: impl FnOnce(&mut Self)) {
        let enclosing = std::mem::replace(&mut self.scope, scope);
        walk(self);
        self.scope = enclosing;
    }

    fn validate_base(
        &mut self,
        kind: DeclarationKind,
        name: &Identifier,
        base: Option<&TypeReferenceSyntax>,
        allow_builtin: bool,
    ) {
        let Some(base) = base else {
            return;
        };
        let scope = Arc::clone(&self.scope);
        let Some(resolved) = self.resolve_and_validate(&base.name, &scope) else {
            return;
        };

        let permitted = resolved.kind() == Some(kind)
            || (allow_builtin && matches!(resolved, Resolved::BuiltIn(_)));
        if !permitted {
            self.sink.fail(format!(
                "{kind} '{name}' cannot inherit from '{}'.",
                resolved.name()
            ));
            return;
        }

        let Resolved::Declaration(target) = resolved else {
            return;
        };
        let own = self.full_name(name);
        if target.full_name == own {
            self.sink
                .fail(format!("{kind} '{name}' cannot inherit from itself."));
        } else if self.detect_base_cycles && self.base_chain_returns_to(&own, kind, target) {
            self.sink
                .fail(format!("{kind} '{name}' has a circular base chain."));
        }
    }

    /// Follow same-kind bases from `first`; true if the chain reaches `origin`.
    fn base_chain_returns_to(
        &self,
        origin: &QualifiedIdentifier,
        kind: DeclarationKind,
        first: &'t Declaration,
    ) -> bool {
        let mut seen: Vec<&QualifiedIdentifier> = Vec::new();
        let mut current = first;
        loop {
            if &current.full_name == origin {
                return true;
            }
            if seen.contains(&&current.full_name) {
                // A loop that does not pass through the origin.
                return false;
            }
            seen.push(&current.full_name);
            match self.table.base_of(current) {
                Some(Resolved::Declaration(next)) if next.kind == kind => current = next,
                _ => return false,
            }
        }
    }

    fn validate_operation(
        &mut self,
        operation: &OperationSyntax,
        kind: OperationKind,
        own: &Scope,
    ) {
        let name = &operation.name;
        if let Some(result) = self.resolve_and_validate(&operation.result.name, own) {
            if !self.table.is_value(&result) {
                self.sink
                    .fail(format!("{kind} '{name}' must return a value type."));
            }
            if kind == OperationKind::Query && result.is_void() {
                self.sink
                    .fail(format!("{kind} '{name}' must return some result."));
            }
        }

        match operation.arguments.as_slice() {
            [] => {}
            [argument] => self.validate_argument(argument, operation, kind, own),
            _ => self
                .sink
                .fail(format!("{kind} '{name}' can only contain one argument.")),
        }
    }

    fn validate_argument(
        &mut self,
        argument: &AtomSyntax,
        operation: &OperationSyntax,
        kind: OperationKind,
        own: &Scope,
    ) {
        let name = &operation.name;
        let argument_name = &argument.name;
        self.sink.fail_if(!argument.ty.cardinality.is_exactly_one(), || {
            format!("{kind} argument '{argument_name}' for '{name}' must have a cardinality of exactly one.")
        });

        let Some(resolved) = self.resolve_and_validate(&argument.ty.name, own) else {
            return;
        };
        let needs_scalar = matches!(kind, OperationKind::Query | OperationKind::Path);
        if needs_scalar && !self.table.is_scalar(&resolved) {
            self.sink.fail(format!(
                "{kind} argument '{argument_name}' for '{name}' must be a scalar value."
            ));
        }
    }
}

impl<'ast> SyntaxVisitor<'ast> for SemanticRules<'_, '_> {
    fn visit_entity(&mut self, entity: &'ast EntitySyntax) {
        let name = &entity.name;
        let own = self.scope.enter_declaration(name);

        if let Some(identity) = &entity.identity_type {
            self.sink.fail_if(entity.base.is_some(), || {
                format!("Entity '{name}' must not specify a base entity if the identifier type is specified.")
            });
            if let Some(resolved) = self.resolve_and_validate(&identity.name, &own) {
                if !self.table.is_value(&resolved) {
                    self.sink
                        .fail(format!("Identity type for '{name}' must be a value type."));
                }
            }
        } else if entity.base.is_none() {
            self.sink.fail(format!(
                "Entity '{name}' must inherit from a base entity, or specify an identifier type."
            ));
        }

        self.validate_base(DeclarationKind::Entity, name, entity.base.as_ref(), false);
        self.within(own, |rules| walk_entity(rules, entity));
    }

    fn visit_event(&mut self, event: &'ast EventSyntax) {
        self.validate_base(DeclarationKind::Event, &event.name, event.base.as_ref(), false);
        let own = self.scope.enter_declaration(&event.name);
        self.within(own, |rules| walk_event(rules, event));
    }

    fn visit_value(&mut self, value: &'ast ValueSyntax) {
        self.validate_base(DeclarationKind::Value, &value.name, value.base.as_ref(), true);
        let own = self.scope.enter_declaration(&value.name);
        self.within(own, |rules| walk_value(rules, value));
    }

    fn visit_property(&mut self, property: &'ast PropertySyntax) {
        let scope = Arc::clone(&self.scope);
        if let Some(resolved) = self.resolve_and_validate(&property.atom.ty.name, &scope) {
            if !self.table.is_value(&resolved) {
                self.sink.fail(format!(
                    "Property '{}' type must be a value type.",
                    property.name()
                ));
            }
        }
    }

    fn visit_path(&mut self, path: &'ast WebApiPathSyntax) {
        let own = self.scope.enter_declaration(&path.operation.name);
        self.validate_operation(&path.operation, OperationKind::Path, &own);
        self.within(own, |rules| walk_path(rules, path));
    }

    fn visit_query(&mut self, query: &'ast WebApiQuerySyntax) {
        let own = self.scope.enter_declaration(&query.operation.name);
        self.validate_operation(&query.operation, OperationKind::Query, &own);
        self.within(own, |rules| walk_query(rules, query));
    }

    fn visit_command(&mut self, command: &'ast WebApiCommandSyntax) {
        let own = self.scope.enter_declaration(&command.operation.name);
        self.validate_operation(&command.operation, OperationKind::Command, &own);
    }

    fn visit_filter(&mut self, filter: &'ast AtomSyntax) {
        let name = &filter.name;
        let scope = Arc::clone(&self.scope);
        if let Some(resolved) = self.resolve_and_validate(&filter.ty.name, &scope) {
            if !self.table.is_scalar(&resolved) {
                self.sink
                    .fail(format!("Query filter '{name}' must be a scalar value."));
            }
        }
        self.sink.fail_if(!filter.ty.cardinality.is_exactly_zero_or_one(), || {
            format!("Query filter '{name}' must have a cardinality of zero or one.")
        });
    }
}
