//! The compilation root.
//!
//! A [`Compilation`] owns the symbol arena and the top-level namespaces of
//! one successful compile. It is immutable once built; deferred lookups
//! inside it resolve on first read.

use std::fmt;
use std::sync::Arc;

use dml_ir::{BuiltinType, QualifiedIdentifier};
use dml_sema::ExternalType;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::visitor::{Subject, SymbolVisitor};
use crate::{Symbol, SymbolId, SymbolKind, TypeLookup, TypeRef};

/// Built types by fully-qualified name.
///
/// Shared between the builder, which fills it, and every deferred lookup,
/// which reads it once the graph exists.
#[derive(Debug, Default)]
pub(crate) struct SymbolIndex {
    by_name: RwLock<FxHashMap<QualifiedIdentifier, SymbolId>>,
}

impl SymbolIndex {
    /// Register `id` under `name`. The first registration wins.
    pub(crate) fn insert(&self, name: QualifiedIdentifier, id: SymbolId) {
        self.by_name.write().entry(name).or_insert(id);
    }

    pub(crate) fn get(&self, name: &QualifiedIdentifier) -> Option<SymbolId> {
        self.by_name.read().get(name).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_name.read().len()
    }
}

/// A resolved type with the symbol borrowed out of the arena.
#[derive(Clone, Copy, Debug)]
pub enum ResolvedType<'c> {
    BuiltIn(BuiltinType),
    External(&'c ExternalType),
    Symbol(SymbolId, &'c Symbol),
}

/// The immutable symbol graph of one compilation.
pub struct Compilation {
    symbols: Vec<Symbol>,
    namespaces: Vec<SymbolId>,
    index: Arc<SymbolIndex>,
}

impl Compilation {
    pub(crate) fn new(
        symbols: Vec<Symbol>,
        namespaces: Vec<SymbolId>,
        index: Arc<SymbolIndex>,
    ) -> Self {
        Compilation {
            symbols,
            namespaces,
            index,
        }
    }

    /// Top-level namespaces in first-appearance order.
    pub fn namespaces(&self) -> &[SymbolId] {
        &self.namespaces
    }

    /// The symbol at `id`.
    ///
    /// # Panics
    /// If `id` was not produced by this compilation.
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    /// The type declared under exactly `full_name`.
    pub fn get(&self, full_name: &QualifiedIdentifier) -> Option<SymbolId> {
        self.index.get(full_name)
    }

    /// The namespace with exactly `full_name`.
    pub fn namespace(&self, full_name: &QualifiedIdentifier) -> Option<SymbolId> {
        let mut candidates = self.namespaces.as_slice();
        let mut found = None;
        for segment in full_name {
            let id = candidates.iter().copied().find(|&id| {
                let symbol = self.symbol(id);
                symbol.name == *segment && matches!(symbol.kind, SymbolKind::Namespace(_))
            })?;
            candidates = self.symbol(id).kind.children();
            found = Some(id);
        }
        found
    }

    /// Name of `id` prefixed by every enclosing symbol's name.
    pub fn full_name(&self, id: SymbolId) -> QualifiedIdentifier {
        let mut segments = vec![self.symbol(id).name.clone()];
        let mut current = self.symbol(id).parent;
        while let Some(parent) = current {
            let symbol = self.symbol(parent);
            segments.push(symbol.name.clone());
            current = symbol.parent;
        }
        segments.reverse();
        // Never empty: the symbol's own name is always present.
        QualifiedIdentifier::from_segments(segments)
            .unwrap_or_else(|_| QualifiedIdentifier::from(&self.symbol(id).name))
    }

    /// Read a lookup and borrow what it points at.
    pub fn resolve<'c>(&'c self, lookup: &'c TypeLookup) -> Option<ResolvedType<'c>> {
        Some(match lookup.get()? {
            TypeRef::BuiltIn(builtin) => ResolvedType::BuiltIn(*builtin),
            TypeRef::External(external) => ResolvedType::External(external),
            TypeRef::Symbol(id) => ResolvedType::Symbol(*id, self.symbol(*id)),
        })
    }

    /// The entity `id` derives from, if `id` is an entity with a base.
    pub fn base_entity(&self, id: SymbolId) -> Option<SymbolId> {
        let SymbolKind::Entity(entity) = &self.symbol(id).kind else {
            return None;
        };
        let base = entity.base.as_ref()?.get()?.symbol()?;
        matches!(self.symbol(base).kind, SymbolKind::Entity(_)).then_some(base)
    }

    /// The event or value `id` derives from, if any.
    ///
    /// A value deriving from a built-in has no base molecule.
    pub fn base_molecule(&self, id: SymbolId) -> Option<SymbolId> {
        let kind = &self.symbol(id).kind;
        let base = match kind {
            SymbolKind::Event(event) => event.base.as_ref(),
            SymbolKind::ComplexValue(value) => value.base.as_ref(),
            _ => None,
        }?;
        let base = base.get()?.symbol()?;
        let same_shape = matches!(
            (kind, &self.symbol(base).kind),
            (SymbolKind::Event(_), SymbolKind::Event(_))
                | (SymbolKind::ComplexValue(_), SymbolKind::ComplexValue(_))
        );
        same_shape.then_some(base)
    }

    /// Short name of a resolved type for display.
    pub fn describe(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::BuiltIn(builtin) => builtin.keyword().to_owned(),
            TypeRef::External(external) => external.to_string(),
            TypeRef::Symbol(id) => self.full_name(*id).to_string(),
        }
    }

    /// Every symbol in build order.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols.iter().enumerate().map(|(index, symbol)| {
            // The arena never holds more than u32::MAX symbols; see the builder.
            #[expect(clippy::cast_possible_truncation, reason = "arena size is bounded by u32")]
            let id = SymbolId::new(index as u32);
            (id, symbol)
        })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Walk the graph with `visitor`, starting at the root.
    pub fn accept<'c, V: SymbolVisitor<'c> + ?Sized>(&'c self, visitor: &mut V) {
        if visitor.not_interested_in(&Subject::Compilation) {
            return;
        }
        visitor.visit_compilation(self);
    }
}

impl fmt::Debug for Compilation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compilation")
            .field("symbols", &self.symbols.len())
            .field("namespaces", &self.namespaces)
            .field("types", &self.index.len())
            .finish()
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
