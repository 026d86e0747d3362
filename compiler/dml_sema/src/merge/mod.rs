//! Namespace merge.
//!
//! Source units may each declare fragments of the same namespace. Merging
//! groups every fragment by its fully-qualified path and produces one
//! [`NamespaceGroup`] per distinct path, nested by path segment, so that
//! later passes see a single namespace tree.
//!
//! Every path prefix gets a group, even when no unit declares it directly:
//! `namespace A.B {}` yields a group `A` with no fragments and a child `A.B`.
//!
//! Duplicate declarations inside merged fragments are not detected here; the
//! symbol table reports them.

use std::sync::Arc;

use dml_ir::{Identifier, NamespaceMemberSyntax, NamespaceSyntax, QualifiedIdentifier, SyntaxTree};
use rustc_hash::FxHashMap;

use crate::Scope;

/// One namespace block from one source unit, with the scope it opens.
#[derive(Clone, Debug)]
pub struct Fragment<'ast> {
    pub syntax: &'ast NamespaceSyntax,
    pub scope: Arc<Scope>,
}

/// All fragments declared for one fully-qualified namespace path.
#[derive(Clone, Debug)]
pub struct NamespaceGroup<'ast> {
    pub full_name: QualifiedIdentifier,
    /// Fragments in source order (unit order, then position within the unit).
    pub fragments: Vec<Fragment<'ast>>,
    /// Groups one segment deeper, in first-appearance order.
    pub children: Vec<NamespaceGroup<'ast>>,
}

impl<'ast> NamespaceGroup<'ast> {
    /// Last segment of the path.
    pub fn name(&self) -> &Identifier {
        self.full_name.last()
    }

    /// Non-namespace members of every fragment, each with the scope of the
    /// fragment that declared it.
    pub fn members(&self) -> impl Iterator<Item = (&'ast NamespaceMemberSyntax, &Arc<Scope>)> + '_ {
        self.fragments.iter().flat_map(|fragment| {
            fragment
                .syntax
                .members
                .iter()
                .filter(|member| !matches!(member, NamespaceMemberSyntax::Namespace(_)))
                .map(move |member| (member, &fragment.scope))
        })
    }

    /// This group followed by all of its descendants, depth first.
    pub fn descendants(&self) -> Vec<&NamespaceGroup<'ast>> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(group) = stack.pop() {
            out.push(group);
            stack.extend(group.children.iter().rev());
        }
        out
    }
}

/// Every group in `groups` and below, depth first.
pub fn all_groups<'g, 'ast>(groups: &'g [NamespaceGroup<'ast>]) -> Vec<&'g NamespaceGroup<'ast>> {
    groups.iter().flat_map(NamespaceGroup::descendants).collect()
}

/// Fragments keyed by full path, remembering first-appearance order.
#[derive(Default)]
struct FragmentIndex<'ast> {
    order: Vec<QualifiedIdentifier>,
    by_name: FxHashMap<QualifiedIdentifier, Vec<Fragment<'ast>>>,
}

impl<'ast> FragmentIndex<'ast> {
    fn insert(&mut self, fragment: Fragment<'ast>) {
        let Some(full_name) = fragment.scope.full_name().cloned() else {
            return;
        };
        let slot = self.by_name.entry(full_name.clone()).or_insert_with(|| {
            self.order.push(full_name);
            Vec::new()
        });
        slot.push(fragment);
    }

    fn collect(&mut self, syntax: &'ast NamespaceSyntax, enclosing: &Arc<Scope>) {
        let scope = enclosing.enter_namespace(&syntax.name, syntax.imports.clone());
        self.insert(Fragment {
            syntax,
            scope: Arc::clone(&scope),
        });
        // Nested blocks are merged by their own full path.
        for nested in syntax.namespaces() {
            self.collect(nested, &scope);
        }
    }

    fn group(
        &self,
        parent: Option<&QualifiedIdentifier>,
        depth: usize,
    ) -> Vec<NamespaceGroup<'ast>> {
        let mut segments: Vec<&Identifier> = Vec::new();
        for name in &self.order {
            if parent.is_some_and(|prefix| !name.starts_with(prefix)) {
                continue;
            }
            if let Some(segment) = name.segments().get(depth) {
                if !segments.contains(&segment) {
                    segments.push(segment);
                }
            }
        }

        segments
            .into_iter()
            .map(|segment| {
                let full_name = match parent {
                    Some(prefix) => prefix + segment,
                    None => QualifiedIdentifier::from(segment),
                };
                let fragments = self.by_name.get(&full_name).cloned().unwrap_or_default();
                let children = self.group(Some(&full_name), depth + 1);
                NamespaceGroup {
                    full_name,
                    fragments,
                    children,
                }
            })
            .collect()
    }
}

/// Merge the namespace blocks of every tree into one namespace hierarchy.
#[tracing::instrument(level = "debug", skip_all, fields(trees = trees.len()))]
pub fn merge_namespaces(trees: &[SyntaxTree]) -> Vec<NamespaceGroup<'_>> {
    let mut index = FragmentIndex::default();
    for tree in trees {
        let unit = Scope::unit(tree.imports.clone());
        for namespace in &tree.namespaces {
            index.collect(namespace, &unit);
        }
    }

    let groups = index.group(None, 0);
    tracing::debug!(paths = index.order.len(), roots = groups.len(), "namespace merge complete");
    groups
}
