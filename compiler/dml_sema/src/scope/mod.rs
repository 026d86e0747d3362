//! Lexical scope chains.
//!
//! A [`Scope`] is one frame of the syntactic nesting a reference was written
//! in: the source unit, a namespace block, or a declaration (entity, event,
//! value, web-API path or operation). Frames are reference counted and linked
//! to their parent, so declarations and deferred lookups can hold on to the
//! exact chain they were written in.
//!
//! # Resolution Order
//!
//! [`Scope::candidates`] lists the fully-qualified names tried for a
//! reference, most specific first:
//!
//! - declaration: `full_name + id`, then the enclosing frame
//! - namespace: `full_name + id`, each import `+ id`, each ancestor of the
//!   block's dotted name `+ id`, then the enclosing frame
//! - unit: `id` as written, then each unit import `+ id`
//!
//! Local scope always shadows imports, which shadow ancestor namespaces.

use std::sync::Arc;

use dml_ir::{Identifier, QualifiedIdentifier};

#[derive(Debug)]
enum Frame {
    Unit {
        imports: Vec<QualifiedIdentifier>,
    },
    Namespace {
        full_name: QualifiedIdentifier,
        /// Dotted name as written in the block header.
        local_name: QualifiedIdentifier,
        /// Full name of the enclosing namespace block, if nested.
        enclosing: Option<QualifiedIdentifier>,
        imports: Vec<QualifiedIdentifier>,
    },
    Declaration {
        full_name: QualifiedIdentifier,
    },
}

/// One frame of a scope chain.
#[derive(Debug)]
pub struct Scope {
    frame: Frame,
    parent: Option<Arc<Scope>>,
}

impl Scope {
    /// The root frame for one source unit.
    pub fn unit(imports: Vec<QualifiedIdentifier>) -> Arc<Scope> {
        Arc::new(Scope {
            frame: Frame::Unit { imports },
            parent: None,
        })
    }

    /// A namespace block nested in this frame.
    pub fn enter_namespace(
        self: &Arc<Self>,
        local_name: &QualifiedIdentifier,
        imports: Vec<QualifiedIdentifier>,
    ) -> Arc<Scope> {
        let enclosing = self.full_name().cloned();
        let full_name = match &enclosing {
            Some(outer) => outer + local_name,
            None => local_name.clone(),
        };
        Arc::new(Scope {
            frame: Frame::Namespace {
                full_name,
                local_name: local_name.clone(),
                enclosing,
                imports,
            },
            parent: Some(Arc::clone(self)),
        })
    }

    /// A named declaration nested in this frame.
    pub fn enter_declaration(self: &Arc<Self>, name: &Identifier) -> Arc<Scope> {
        let full_name = match self.full_name() {
            Some(outer) => outer + name,
            None => QualifiedIdentifier::from(name),
        };
        Arc::new(Scope {
            frame: Frame::Declaration { full_name },
            parent: Some(Arc::clone(self)),
        })
    }

    /// Fully-qualified name of this frame; `None` for a unit.
    pub fn full_name(&self) -> Option<&QualifiedIdentifier> {
        match &self.frame {
            Frame::Unit { .. } => None,
            Frame::Namespace { full_name, .. } | Frame::Declaration { full_name } => {
                Some(full_name)
            }
        }
    }

    pub fn parent(&self) -> Option<&Arc<Scope>> {
        self.parent.as_ref()
    }

    pub fn is_unit(&self) -> bool {
        matches!(self.frame, Frame::Unit { .. })
    }

    /// Every fully-qualified name tried for `reference`, in resolution order.
    ///
    /// The list may contain duplicates; the first name that resolves wins.
    pub fn candidates(&self, reference: &QualifiedIdentifier) -> Vec<QualifiedIdentifier> {
        let mut out = Vec::new();
        let mut current = Some(self);
        while let Some(scope) = current {
            scope.frame_candidates(reference, &mut out);
            current = scope.parent.as_deref();
        }
        out
    }

    fn frame_candidates(
        &self,
        reference: &QualifiedIdentifier,
        out: &mut Vec<QualifiedIdentifier>,
    ) {
        match &self.frame {
            Frame::Unit { imports } => {
                out.push(reference.clone());
                out.extend(imports.iter().map(|import| import + reference));
            }
            Frame::Namespace {
                full_name,
                local_name,
                enclosing,
                imports,
            } => {
                out.push(full_name + reference);
                out.extend(imports.iter().map(|import| import + reference));
                for ancestor in local_name.ancestors() {
                    let base = match enclosing {
                        Some(outer) => outer + &ancestor,
                        None => ancestor,
                    };
                    out.push(&base + reference);
                }
            }
            Frame::Declaration { full_name } => out.push(full_name + reference),
        }
    }

    /// Resolve `reference` by trying each candidate against `lookup`.
    ///
    /// Candidates are generated one frame at a time, so a hit in an inner
    /// frame never builds the names of the outer ones.
    pub fn resolve<T, F>(&self, reference: &QualifiedIdentifier, mut lookup: F) -> Option<T>
    where
        F: FnMut(&QualifiedIdentifier) -> Option<T>,
    {
        let mut frame = Vec::new();
        let mut current = Some(self);
        while let Some(scope) = current {
            frame.clear();
            scope.frame_candidates(reference, &mut frame);
            if let Some(found) = frame.iter().find_map(&mut lookup) {
                return Some(found);
            }
            current = scope.parent.as_deref();
        }
        None
    }
}
