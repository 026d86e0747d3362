//! Global symbol table.
//!
//! The single source of truth for what a fully-qualified name refers to.
//! Seeded with the built-in scalar table, filled by walking the merged
//! namespace tree, and backed by an external [`TypeUniverse`].
//!
//! # Resolution Precedence
//!
//! [`SymbolTable::resolve`] tries, in order:
//! 1. the built-in table (exact keyword match)
//! 2. declarations registered by [`SymbolTable::define`]
//! 3. the external type universe
//!
//! Scope-chain resolution ([`SymbolTable::resolve_in`]) runs that lookup for
//! each candidate name the [`Scope`] produces.

use std::fmt;
use std::sync::Arc;

use dml_diagnostic::ObservationSink;
use dml_ir::visitor::{walk_entity, walk_namespace_member, SyntaxVisitor};
use dml_ir::{
    BuiltinType, DeclarationKind, EntitySyntax, EventSyntax, ExternalEnumSyntax, Identifier,
    QualifiedIdentifier, TypeReferenceSyntax, ValueSyntax, WebApiSyntax,
};
use rustc_hash::FxHashMap;

use crate::merge::{all_groups, NamespaceGroup};
use crate::{ExternalType, Scope, TypeUniverse};

/// A named declaration registered in the table.
#[derive(Clone, Debug)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub full_name: QualifiedIdentifier,
    /// External values are still [`DeclarationKind::Value`].
    pub is_external: bool,
    /// Base reference as written, if any.
    pub base: Option<QualifiedIdentifier>,
    pub has_properties: bool,
    /// The scope the declaration is written in. Its base resolves here.
    pub scope: Arc<Scope>,
}

impl Declaration {
    pub fn new(kind: DeclarationKind, full_name: QualifiedIdentifier, scope: Arc<Scope>) -> Self {
        Declaration {
            kind,
            full_name,
            is_external: false,
            base: None,
            has_properties: false,
            scope,
        }
    }

    pub fn name(&self) -> &Identifier {
        self.full_name.last()
    }

    /// The scope opened by the declaration itself; member types resolve here.
    pub fn own_scope(&self) -> Arc<Scope> {
        self.scope.enter_declaration(self.name())
    }

    fn with_base(mut self, base: Option<&TypeReferenceSyntax>) -> Self {
        self.base = base.map(|reference| reference.name.clone());
        self
    }
}

/// What a name resolved to.
#[derive(Clone, Debug)]
pub enum Resolved<'t> {
    BuiltIn(BuiltinType),
    Declaration(&'t Declaration),
    External(ExternalType),
}

impl Resolved<'_> {
    /// Short name, as used in messages.
    pub fn name(&self) -> String {
        match self {
            Resolved::BuiltIn(builtin) => builtin.keyword().to_owned(),
            Resolved::Declaration(declaration) => declaration.name().to_string(),
            Resolved::External(external) => external.full_name().last().to_string(),
        }
    }

    pub fn declaration(&self) -> Option<&Declaration> {
        match self {
            Resolved::Declaration(declaration) => Some(declaration),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<DeclarationKind> {
        self.declaration().map(|declaration| declaration.kind)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Resolved::BuiltIn(BuiltinType::Void))
    }
}

/// Registry of every declaration in one compilation.
pub struct SymbolTable {
    declarations: FxHashMap<QualifiedIdentifier, Declaration>,
    universe: Arc<dyn TypeUniverse>,
}

impl fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolTable")
            .field("declarations", &self.declarations.len())
            .field("universe", &self.universe)
            .finish()
    }
}

impl SymbolTable {
    /// An empty table backed by `universe`.
    pub fn new(universe: Arc<dyn TypeUniverse>) -> Self {
        SymbolTable {
            declarations: FxHashMap::default(),
            universe,
        }
    }

    /// Build a table from every declaration in the merged namespace tree.
    ///
    /// Definition conflicts are recorded in `sink`; the table keeps the
    /// first declaration for each name.
    #[tracing::instrument(level = "debug", skip_all, fields(groups = groups.len()))]
    pub fn from_groups(
        groups: &[NamespaceGroup<'_>],
        universe: Arc<dyn TypeUniverse>,
        sink: &mut ObservationSink,
    ) -> Self {
        let mut table = SymbolTable::new(universe);
        let before = sink.len();
        {
            let mut collector = DefinitionCollector {
                table: &mut table,
                sink: &mut *sink,
                scope: Scope::unit(Vec::new()),
            };
            for group in all_groups(groups) {
                for (member, scope) in group.members() {
                    collector.scope = Arc::clone(scope);
                    walk_namespace_member(&mut collector, member);
                }
            }
        }
        tracing::debug!(
            declarations = table.len(),
            conflicts = sink.len() - before,
            "symbol table complete"
        );
        table
    }

    /// Register a declaration under its fully-qualified name.
    ///
    /// Returns `false` and records an observation when the name is taken.
    pub fn define(&mut self, declaration: Declaration, sink: &mut ObservationSink) -> bool {
        if let Some(existing) = self.declarations.get(&declaration.full_name) {
            let name = declaration.name();
            if existing.kind == declaration.kind {
                sink.fail(format!("Duplicate definition of '{name}'."));
            } else {
                sink.fail(format!(
                    "'{name}' is defined as both a {} and a {}.",
                    existing.kind, declaration.kind
                ));
            }
            return false;
        }
        tracing::trace!(name = %declaration.full_name, kind = %declaration.kind, "define");
        self.declarations
            .insert(declaration.full_name.clone(), declaration);
        true
    }

    /// Resolve an exact fully-qualified name.
    pub fn resolve(&self, name: &QualifiedIdentifier) -> Option<Resolved<'_>> {
        if name.len() == 1 {
            if let Some(builtin) = BuiltinType::from_keyword(name.first().as_str()) {
                return Some(Resolved::BuiltIn(builtin));
            }
        }
        if let Some(declaration) = self.declarations.get(name) {
            return Some(Resolved::Declaration(declaration));
        }
        self.universe.lookup(name).map(|external| match external.builtin() {
            Some(builtin) => Resolved::BuiltIn(builtin),
            None => Resolved::External(external),
        })
    }

    /// Resolve a reference as written in `scope`.
    pub fn resolve_in(
        &self,
        scope: &Scope,
        reference: &QualifiedIdentifier,
    ) -> Option<Resolved<'_>> {
        let resolved = scope.resolve(reference, |candidate| self.resolve(candidate));
        tracing::trace!(%reference, found = resolved.is_some(), "resolve");
        resolved
    }

    /// The declaration registered under exactly `name`.
    pub fn declaration(&self, name: &QualifiedIdentifier) -> Option<&Declaration> {
        self.declarations.get(name)
    }

    /// The declaration a declaration's base resolves to, if any.
    pub fn base_of(&self, declaration: &Declaration) -> Option<Resolved<'_>> {
        let base = declaration.base.as_ref()?;
        self.resolve_in(&declaration.scope, base)
    }

    pub fn universe(&self) -> &Arc<dyn TypeUniverse> {
        &self.universe
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.values()
    }

    /// Built-ins, external enums, values, and external value types.
    pub fn is_value(&self, resolved: &Resolved<'_>) -> bool {
        match resolved {
            Resolved::BuiltIn(_) => true,
            Resolved::Declaration(declaration) => matches!(
                declaration.kind,
                DeclarationKind::ExternalEnum | DeclarationKind::Value
            ),
            Resolved::External(external) => self.universe.is_value_type(external),
        }
    }

    /// Built-ins, external enums, and property-less values whose base is
    /// itself scalar. A value without a base is not scalar.
    pub fn is_scalar<'t>(&'t self, resolved: &Resolved<'t>) -> bool {
        let mut seen: Vec<&'t QualifiedIdentifier> = Vec::new();
        let mut current = resolved.clone();
        loop {
            match current {
                Resolved::BuiltIn(_) => return true,
                Resolved::External(_) => return false,
                Resolved::Declaration(declaration) => match declaration.kind {
                    DeclarationKind::ExternalEnum => return true,
                    DeclarationKind::Value if !declaration.has_properties => {
                        if seen.contains(&&declaration.full_name) {
                            return false;
                        }
                        seen.push(&declaration.full_name);
                        match self.base_of(declaration) {
                            Some(base) => current = base,
                            None => return false,
                        }
                    }
                    _ => return false,
                },
            }
        }
    }
}

/// Registers every named declaration reachable from a namespace member.
struct DefinitionCollector<'t, 's> {
    table: &'t mut SymbolTable,
    sink: &'s mut ObservationSink,
    scope: Arc<Scope>,
}

impl DefinitionCollector<'_, '_> {
    fn full_name(&self, name: &Identifier) -> QualifiedIdentifier {
        match self.scope.full_name() {
            Some(outer) => outer + name,
            None => QualifiedIdentifier::from(name),
        }
    }

    fn define(&mut self, declaration: Declaration) {
        self.table.define(declaration, self.sink);
    }
}

impl<'ast> SyntaxVisitor<'ast> for DefinitionCollector<'_, '_> {
    fn visit_entity(&mut self, entity: &'ast EntitySyntax) {
        let declaration = Declaration::new(
            DeclarationKind::Entity,
            self.full_name(&entity.name),
            Arc::clone(&self.scope),
        )
        .with_base(entity.base.as_ref());
        self.define(declaration);

        let enclosing = Arc::clone(&self.scope);
        self.scope = enclosing.enter_declaration(&entity.name);
        walk_entity(self, entity);
        self.scope = enclosing;
    }

    fn visit_event(&mut self, event: &'ast EventSyntax) {
        let mut declaration = Declaration::new(
            DeclarationKind::Event,
            self.full_name(&event.name),
            Arc::clone(&self.scope),
        )
        .with_base(event.base.as_ref());
        declaration.has_properties = !event.properties.is_empty();
        self.define(declaration);
    }

    fn visit_value(&mut self, value: &'ast ValueSyntax) {
        let mut declaration = Declaration::new(
            DeclarationKind::Value,
            self.full_name(&value.name),
            Arc::clone(&self.scope),
        )
        .with_base(value.base.as_ref());
        declaration.is_external = value.is_external;
        declaration.has_properties = !value.properties.is_empty();
        self.define(declaration);
    }

    fn visit_external_enum(&mut self, external: &'ast ExternalEnumSyntax) {
        let declaration = Declaration::new(
            DeclarationKind::ExternalEnum,
            self.full_name(&external.name),
            Arc::clone(&self.scope),
        );
        self.define(declaration);
    }

    fn visit_web_api(&mut self, api: &'ast WebApiSyntax) {
        let declaration = Declaration::new(
            DeclarationKind::WebApi,
            self.full_name(api.name()),
            Arc::clone(&self.scope),
        );
        self.define(declaration);
    }
}
