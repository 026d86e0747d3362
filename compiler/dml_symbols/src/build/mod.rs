//! Symbol graph construction.
//!
//! Runs once validation raised no observations. Walks the merged namespace
//! tree parent-before-children, pushing one arena entry per declaration and
//! registering every type in a [`SymbolIndex`] keyed by full name. Type-valued
//! fields become deferred [`TypeLookup`]s closing over the scope they were
//! written in, the symbol table, and the index.
//!
//! # Member Order
//!
//! - namespace: its types in fragment order, then child namespaces
//! - entity: events in declaration order
//! - web-API root or path: commands, then queries, then nested paths
//!
//! # Lookup Scopes
//!
//! Bases resolve in the scope enclosing the declaration. Identity types,
//! properties, operation results, arguments and filters resolve in the
//! declaration's own scope.

use std::sync::Arc;

use dml_ir::{
    AnnotationSet, AtomSyntax, EntitySyntax, EventSyntax, ExternalEnumSyntax, NamespaceMemberSyntax,
    OperationKind, OperationSyntax, PropertySyntax, QualifiedIdentifier, TypeReferenceSyntax,
    ValueSyntax, WebApiCommandSyntax, WebApiMemberSyntax, WebApiPathSyntax, WebApiQuerySyntax,
};
use dml_sema::{NamespaceGroup, Resolved, Scope, SymbolTable};

use crate::compilation::SymbolIndex;
use crate::{
    AtomSymbol, Children, Compilation, ComplexValueSymbol, EntitySymbol, EventSymbol,
    ExternalValueSymbol, NamespaceSymbol, OperationSymbol, PathSymbol, QuerySymbol, Symbol,
    SymbolId, SymbolKind, TypeLookup, TypeRef, TypeReference,
};

/// Build the symbol graph for validated `groups`.
///
/// `table` must be the table the groups were validated against.
#[tracing::instrument(level = "debug", skip_all, fields(groups = groups.len()))]
pub fn build_compilation(groups: &[NamespaceGroup<'_>], table: Arc<SymbolTable>) -> Compilation {
    let mut builder = Builder {
        symbols: Vec::new(),
        table,
        index: Arc::new(SymbolIndex::default()),
    };
    let namespaces = builder.build_namespaces(None, groups);
    tracing::debug!(
        symbols = builder.symbols.len(),
        types = builder.index.len(),
        "build complete"
    );
    Compilation::new(builder.symbols, namespaces, builder.index)
}

struct Builder {
    symbols: Vec<Symbol>,
    table: Arc<SymbolTable>,
    index: Arc<SymbolIndex>,
}

fn annotations(syntax: &[dml_ir::Annotation]) -> AnnotationSet {
    syntax.iter().cloned().collect()
}

fn full_name_in(scope: &Scope, name: &dml_ir::Identifier) -> QualifiedIdentifier {
    match scope.full_name() {
        Some(outer) => outer + name,
        None => QualifiedIdentifier::from(name),
    }
}

impl Builder {
    fn push(&mut self, symbol: Symbol) -> SymbolId {
        let Ok(raw) = u32::try_from(self.symbols.len()) else {
            panic!("symbol arena exceeded u32::MAX entries");
        };
        self.symbols.push(symbol);
        SymbolId::new(raw)
    }

    fn assign_children(&mut self, id: SymbolId, children: Vec<SymbolId>) {
        match self.symbols[id.index()].children_mut() {
            Some(slot) => slot.assign(children),
            None => panic!("{id:?} cannot own children"),
        }
    }

    /// A lookup for `reference` as written in `scope`, resolved on first read.
    fn lookup(&self, reference: &QualifiedIdentifier, scope: &Arc<Scope>) -> TypeLookup {
        let table = Arc::clone(&self.table);
        let index = Arc::clone(&self.index);
        let scope = Arc::clone(scope);
        let reference = reference.clone();
        TypeLookup::deferred(move || match table.resolve_in(&scope, &reference)? {
            Resolved::BuiltIn(builtin) => Some(TypeRef::BuiltIn(builtin)),
            Resolved::External(external) => Some(TypeRef::External(external)),
            Resolved::Declaration(declaration) => {
                index.get(&declaration.full_name).map(TypeRef::Symbol)
            }
        })
    }

    fn reference(&self, syntax: &TypeReferenceSyntax, scope: &Arc<Scope>) -> TypeReference {
        TypeReference::new(self.lookup(&syntax.name, scope), syntax.cardinality)
    }

    fn atom(&self, syntax: &AtomSyntax, scope: &Arc<Scope>) -> AtomSymbol {
        AtomSymbol {
            name: syntax.name.clone(),
            annotations: annotations(&syntax.annotations),
            reference: self.reference(&syntax.ty, scope),
            alias: None,
        }
    }

    fn property(&self, syntax: &PropertySyntax, scope: &Arc<Scope>) -> AtomSymbol {
        AtomSymbol {
            alias: syntax.alias.clone(),
            ..self.atom(&syntax.atom, scope)
        }
    }

    fn build_namespaces(
        &mut self,
        parent: Option<SymbolId>,
        groups: &[NamespaceGroup<'_>],
    ) -> Vec<SymbolId> {
        let mut ids = Vec::with_capacity(groups.len());
        for group in groups {
            let id = self.push(Symbol {
                name: group.name().clone(),
                parent,
                annotations: AnnotationSet::new(),
                kind: SymbolKind::Namespace(NamespaceSymbol::default()),
            });
            let mut members = Vec::new();
            for (member, scope) in group.members() {
                if let Some(member) = self.build_member(id, member, scope) {
                    members.push(member);
                }
            }
            members.extend(self.build_namespaces(Some(id), &group.children));
            self.assign_children(id, members);
            ids.push(id);
        }
        ids
    }

    fn build_member(
        &mut self,
        parent: SymbolId,
        member: &NamespaceMemberSyntax,
        scope: &Arc<Scope>,
    ) -> Option<SymbolId> {
        let id = match member {
            NamespaceMemberSyntax::Namespace(_) => return None,
            NamespaceMemberSyntax::Entity(entity) => self.build_entity(parent, entity, scope),
            NamespaceMemberSyntax::Value(value) => self.build_value(parent, value, scope),
            NamespaceMemberSyntax::ExternalEnum(external) => {
                self.build_external_enum(parent, external, scope)
            }
            NamespaceMemberSyntax::WebApi(api) => {
                let id = self.build_path(parent, &api.path, scope, true);
                self.index.insert(full_name_in(scope, api.name()), id);
                id
            }
        };
        Some(id)
    }

    fn build_entity(
        &mut self,
        parent: SymbolId,
        entity: &EntitySyntax,
        scope: &Arc<Scope>,
    ) -> SymbolId {
        let own = scope.enter_declaration(&entity.name);
        let identity = entity
            .identity_type
            .as_ref()
            .map(|identity| self.reference(identity, &own));
        let base = entity.base.as_ref().map(|base| self.lookup(&base.name, scope));
        let id = self.push(Symbol {
            name: entity.name.clone(),
            parent: Some(parent),
            annotations: annotations(&entity.annotations),
            kind: SymbolKind::Entity(EntitySymbol {
                is_abstract: entity.is_abstract,
                identity,
                base,
                events: Children::new(),
            }),
        });
        self.index.insert(full_name_in(scope, &entity.name), id);

        let events = entity
            .events
            .iter()
            .map(|event| self.build_event(id, event, &own))
            .collect();
        self.assign_children(id, events);
        id
    }

    fn build_event(
        &mut self,
        parent: SymbolId,
        event: &EventSyntax,
        scope: &Arc<Scope>,
    ) -> SymbolId {
        let own = scope.enter_declaration(&event.name);
        let kind = SymbolKind::Event(EventSymbol {
            is_abstract: event.is_abstract,
            base: event.base.as_ref().map(|base| self.lookup(&base.name, scope)),
            properties: event
                .properties
                .iter()
                .map(|property| self.property(property, &own))
                .collect(),
        });
        let id = self.push(Symbol {
            name: event.name.clone(),
            parent: Some(parent),
            annotations: annotations(&event.annotations),
            kind,
        });
        self.index.insert(full_name_in(scope, &event.name), id);
        id
    }

    fn build_value(
        &mut self,
        parent: SymbolId,
        value: &ValueSyntax,
        scope: &Arc<Scope>,
    ) -> SymbolId {
        let base = value.base.as_ref().map(|base| self.lookup(&base.name, scope));
        let kind = if value.is_external {
            SymbolKind::ExternalValue(ExternalValueSymbol { base })
        } else {
            let own = scope.enter_declaration(&value.name);
            SymbolKind::ComplexValue(ComplexValueSymbol {
                is_abstract: value.is_abstract,
                base,
                properties: value
                    .properties
                    .iter()
                    .map(|property| self.property(property, &own))
                    .collect(),
                equal_by: value.equal_by.clone(),
            })
        };
        let id = self.push(Symbol {
            name: value.name.clone(),
            parent: Some(parent),
            annotations: annotations(&value.annotations),
            kind,
        });
        self.index.insert(full_name_in(scope, &value.name), id);
        id
    }

    fn build_external_enum(
        &mut self,
        parent: SymbolId,
        external: &ExternalEnumSyntax,
        scope: &Arc<Scope>,
    ) -> SymbolId {
        let id = self.push(Symbol {
            name: external.name.clone(),
            parent: Some(parent),
            annotations: annotations(&external.annotations),
            kind: SymbolKind::ExternalEnum,
        });
        self.index.insert(full_name_in(scope, &external.name), id);
        id
    }

    fn operation(
        &self,
        syntax: &OperationSyntax,
        kind: OperationKind,
        own: &Arc<Scope>,
    ) -> OperationSymbol {
        // Validation allows at most one argument.
        let argument = match syntax.arguments.as_slice() {
            [argument] => Some(self.atom(argument, own)),
            _ => None,
        };
        OperationSymbol {
            kind,
            result: self.reference(&syntax.result, own),
            argument,
        }
    }

    fn build_path(
        &mut self,
        parent: SymbolId,
        path: &WebApiPathSyntax,
        scope: &Arc<Scope>,
        is_root: bool,
    ) -> SymbolId {
        let syntax = &path.operation;
        let own = scope.enter_declaration(&syntax.name);
        let symbol = PathSymbol {
            operation: self.operation(syntax, OperationKind::Path, &own),
            filters: path.filters.iter().map(|filter| self.atom(filter, &own)).collect(),
            members: Children::new(),
        };
        let id = self.push(Symbol {
            name: syntax.name.clone(),
            parent: Some(parent),
            annotations: annotations(&syntax.annotations),
            kind: if is_root {
                SymbolKind::WebApi(symbol)
            } else {
                SymbolKind::WebApiPath(symbol)
            },
        });

        let mut members = Vec::with_capacity(path.members.len());
        for member in &path.members {
            if let WebApiMemberSyntax::Command(command) = member {
                members.push(self.build_command(id, command, &own));
            }
        }
        for member in &path.members {
            if let WebApiMemberSyntax::Query(query) = member {
                members.push(self.build_query(id, query, &own));
            }
        }
        for member in &path.members {
            if let WebApiMemberSyntax::Path(nested) = member {
                members.push(self.build_path(id, nested, &own, false));
            }
        }
        self.assign_children(id, members);
        id
    }

    fn build_query(
        &mut self,
        parent: SymbolId,
        query: &WebApiQuerySyntax,
        scope: &Arc<Scope>,
    ) -> SymbolId {
        let syntax = &query.operation;
        let own = scope.enter_declaration(&syntax.name);
        let symbol = QuerySymbol {
            operation: self.operation(syntax, OperationKind::Query, &own),
            filters: query.filters.iter().map(|filter| self.atom(filter, &own)).collect(),
        };
        self.push(Symbol {
            name: syntax.name.clone(),
            parent: Some(parent),
            annotations: annotations(&syntax.annotations),
            kind: SymbolKind::WebApiQuery(symbol),
        })
    }

    fn build_command(
        &mut self,
        parent: SymbolId,
        command: &WebApiCommandSyntax,
        scope: &Arc<Scope>,
    ) -> SymbolId {
        let syntax = &command.operation;
        let own = scope.enter_declaration(&syntax.name);
        let operation = self.operation(syntax, OperationKind::Command, &own);
        self.push(Symbol {
            name: syntax.name.clone(),
            parent: Some(parent),
            annotations: annotations(&syntax.annotations),
            kind: SymbolKind::WebApiCommand(operation),
        })
    }
}
