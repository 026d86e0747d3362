//! The external type universe.
//!
//! The compiler's only dependency on an outside type system. A universe
//! answers two questions: does a fully-qualified name denote an external
//! type, and is that type a value type.

use std::fmt;

use dml_ir::{BuiltinType, QualifiedIdentifier};
use rustc_hash::FxHashMap;

/// A type that lives outside the compiled sources.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExternalType {
    full_name: QualifiedIdentifier,
    /// Set when the external name is another spelling of a built-in.
    builtin: Option<BuiltinType>,
}

impl ExternalType {
    pub fn new(full_name: QualifiedIdentifier) -> Self {
        ExternalType {
            full_name,
            builtin: None,
        }
    }

    /// An external name that denotes a built-in scalar, e.g. `System.Int32`.
    pub fn builtin_alias(full_name: QualifiedIdentifier, builtin: BuiltinType) -> Self {
        ExternalType {
            full_name,
            builtin: Some(builtin),
        }
    }

    pub fn full_name(&self) -> &QualifiedIdentifier {
        &self.full_name
    }

    pub fn builtin(&self) -> Option<BuiltinType> {
        self.builtin
    }
}

impl fmt::Display for ExternalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.full_name, f)
    }
}

/// Lookup boundary to an outside type system.
///
/// Implementations must be shareable across threads: one universe may back
/// several independent compilations.
pub trait TypeUniverse: Send + Sync + fmt::Debug {
    /// Find the external type with exactly this fully-qualified name.
    fn lookup(&self, name: &QualifiedIdentifier) -> Option<ExternalType>;

    /// Whether `ty` may be used where a value type is required.
    fn is_value_type(&self, ty: &ExternalType) -> bool;
}

/// A universe with no types in it.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyUniverse;

impl TypeUniverse for EmptyUniverse {
    fn lookup(&self, _name: &QualifiedIdentifier) -> Option<ExternalType> {
        None
    }

    fn is_value_type(&self, _ty: &ExternalType) -> bool {
        false
    }
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    builtin: Option<BuiltinType>,
    value_type: bool,
}

/// A universe described up front by the host.
///
/// ```text
/// let universe = StaticUniverse::new()
///     .with_value_type(qi("System.TimeSpan"))
///     .with_reference_type(qi("System.Uri"))
///     .with_builtin_alias(qi("System.Int32"), BuiltinType::Int);
/// ```
#[derive(Clone, Debug, Default)]
pub struct StaticUniverse {
    types: FxHashMap<QualifiedIdentifier, Entry>,
}

impl StaticUniverse {
    pub fn new() -> Self {
        StaticUniverse::default()
    }

    #[must_use]
    pub fn with_value_type(mut self, name: QualifiedIdentifier) -> Self {
        self.types.insert(
            name,
            Entry {
                builtin: None,
                value_type: true,
            },
        );
        self
    }

    #[must_use]
    pub fn with_reference_type(mut self, name: QualifiedIdentifier) -> Self {
        self.types.insert(
            name,
            Entry {
                builtin: None,
                value_type: false,
            },
        );
        self
    }

    #[must_use]
    pub fn with_builtin_alias(mut self, name: QualifiedIdentifier, builtin: BuiltinType) -> Self {
        self.types.insert(
            name,
            Entry {
                builtin: Some(builtin),
                value_type: true,
            },
        );
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeUniverse for StaticUniverse {
    fn lookup(&self, name: &QualifiedIdentifier) -> Option<ExternalType> {
        self.types.get(name).map(|entry| ExternalType {
            full_name: name.clone(),
            builtin: entry.builtin,
        })
    }

    fn is_value_type(&self, ty: &ExternalType) -> bool {
        self.types
            .get(&ty.full_name)
            .is_some_and(|entry| entry.value_type)
    }
}
