//! Deferred, memoized type lookups.
//!
//! Every type-valued field of the symbol graph is a [`TypeLookup`]. The
//! builder hands each one a resolver closure over the scope the reference
//! was written in; the closure runs on first read and its result is cached
//! for the lifetime of the graph. Declarations can therefore name each other
//! regardless of build order, including through cycles.
//!
//! # Invariants
//!
//! - A resolver runs at most once.
//! - Reading a lookup from inside its own resolver is a builder bug and
//!   panics instead of deadlocking.

use std::cell::RefCell;
use std::fmt;
use std::sync::OnceLock;

use dml_ir::{BuiltinType, Cardinality};
use dml_sema::ExternalType;
use parking_lot::ReentrantMutex;

use crate::SymbolId;

/// What a type reference points at once resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRef {
    BuiltIn(BuiltinType),
    External(ExternalType),
    /// A declaration built into the same compilation.
    Symbol(SymbolId),
}

impl TypeRef {
    pub fn symbol(&self) -> Option<SymbolId> {
        match self {
            TypeRef::Symbol(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::BuiltIn(BuiltinType::Void))
    }
}

type Resolver = Box<dyn FnOnce() -> Option<TypeRef> + Send>;

/// A type resolved on first access and cached afterwards.
pub struct TypeLookup {
    resolved: OnceLock<Option<TypeRef>>,
    /// Pending resolver. Reentrant so that a read from inside the resolver
    /// reaches the panic below rather than blocking on itself.
    resolver: ReentrantMutex<RefCell<Option<Resolver>>>,
}

impl TypeLookup {
    /// A lookup whose answer is already known.
    pub fn resolved(ty: Option<TypeRef>) -> Self {
        TypeLookup {
            resolved: OnceLock::from(ty),
            resolver: ReentrantMutex::new(RefCell::new(None)),
        }
    }

    /// A lookup answered by `resolver` the first time it is read.
    pub fn deferred<F>(resolver: F) -> Self
    where
        F: FnOnce() -> Option<TypeRef> + Send + 'static,
    {
        TypeLookup {
            resolved: OnceLock::new(),
            resolver: ReentrantMutex::new(RefCell::new(Some(Box::new(resolver)))),
        }
    }

    /// The resolved type, running the resolver if this is the first read.
    ///
    /// `None` means the reference did not resolve.
    pub fn get(&self) -> Option<&TypeRef> {
        if let Some(resolved) = self.resolved.get() {
            return resolved.as_ref();
        }

        let guard = self.resolver.lock();
        // Another thread may have finished while we waited for the lock.
        if let Some(resolved) = self.resolved.get() {
            return resolved.as_ref();
        }
        let pending = guard.borrow_mut().take();
        let Some(resolver) = pending else {
            panic!("type lookup read while it was being resolved");
        };
        let ty = resolver();
        tracing::trace!(resolved = ty.is_some(), "deferred type lookup");
        let _ = self.resolved.set(ty);
        drop(guard);
        self.resolved.get().and_then(Option::as_ref)
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }
}

impl fmt::Debug for TypeLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resolved.get() {
            Some(ty) => f.debug_tuple("TypeLookup").field(ty).finish(),
            None => f.write_str("TypeLookup(<pending>)"),
        }
    }
}

/// A deferred type paired with how many of it are expected.
#[derive(Debug)]
pub struct TypeReference {
    pub lookup: TypeLookup,
    pub cardinality: Cardinality,
}

impl TypeReference {
    pub fn new(lookup: TypeLookup, cardinality: Cardinality) -> Self {
        TypeReference {
            lookup,
            cardinality,
        }
    }

    /// Shorthand for `self.lookup.get()`.
    pub fn ty(&self) -> Option<&TypeRef> {
        self.lookup.get()
    }
}
