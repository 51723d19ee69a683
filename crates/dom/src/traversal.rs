//! Depth-first traversal of the element tree.
//!
//! [`crawl`] is the single primitive refiner passes use to visit and mutate the
//! tree. It runs the action on a node first, then snapshots that node's
//! children and descends into each one still present, so a pass that adds or
//! removes children while visiting never skips or revisits nodes.

use crate::element::{CodeElement, ElementId, ElementKind};
use crate::tree::CodeTree;

/// Restartable view over the children of an element.
///
/// Each call to [`ChildSequence::iter`] starts a fresh lazy walk in insertion
/// order (pre-order when recursive).
#[derive(Debug, Clone, Copy)]
pub struct ChildSequence<'a> {
    tree: &'a CodeTree,
    parent: ElementId,
    recursive: bool,
}

impl<'a> ChildSequence<'a> {
    /// Starts a new walk.
    pub fn iter(&self) -> ChildIter<'a> {
        let mut stack: Vec<ElementId> = self.tree.children(self.parent).to_vec();
        stack.reverse();
        ChildIter {
            tree: self.tree,
            stack,
            recursive: self.recursive,
        }
    }

    /// Children that are elements of `kind`.
    pub fn of_kind(&self, kind: ElementKind) -> impl Iterator<Item = ElementId> + 'a {
        let tree = self.tree;
        self.iter()
            .filter(move |id| tree.get(*id).is_some_and(|e| e.kind() == kind))
    }
}

impl<'a> IntoIterator for ChildSequence<'a> {
    type Item = ElementId;
    type IntoIter = ChildIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator produced by a [`ChildSequence`].
#[derive(Debug, Clone)]
pub struct ChildIter<'a> {
    tree: &'a CodeTree,
    stack: Vec<ElementId>,
    recursive: bool,
}

impl Iterator for ChildIter<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        if self.recursive {
            self.stack
                .extend(self.tree.children(next).iter().rev().copied());
        }
        Some(next)
    }
}

impl CodeTree {
    /// Children of `parent`; with `recursive`, every descendant in pre-order.
    pub fn get_children(&self, parent: ElementId, recursive: bool) -> ChildSequence<'_> {
        ChildSequence {
            tree: self,
            parent,
            recursive,
        }
    }

    /// `start` followed by all of its descendants in pre-order.
    pub fn walk(&self, start: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        self.contains(start)
            .then_some(start)
            .into_iter()
            .chain(self.get_children(start, true))
    }

    /// Handles of every element below `start` (inclusive) matching `predicate`.
    pub fn collect_matching(
        &self,
        start: ElementId,
        mut predicate: impl FnMut(&CodeElement) -> bool,
    ) -> Vec<ElementId> {
        self.walk(start)
            .filter(|id| self.get(*id).is_some_and(&mut predicate))
            .collect()
    }
}

/// Pre-order traversal that tolerates mutation by `action`.
///
/// `action` runs on every live node for which `predicate` holds, parents before
/// children and siblings in insertion order. A node's children are snapshotted
/// right after the node itself is handled; children removed later in the walk
/// are skipped, children added to an already snapshotted node are not visited.
pub fn crawl<E, P, A>(
    tree: &mut CodeTree,
    start: ElementId,
    mut predicate: P,
    mut action: A,
) -> Result<(), E>
where
    P: FnMut(&CodeTree, ElementId) -> bool,
    A: FnMut(&mut CodeTree, ElementId) -> Result<(), E>,
{
    let mut pending = vec![start];
    while let Some(current) = pending.pop() {
        if !tree.contains(current) {
            continue;
        }
        if predicate(tree, current) {
            action(tree, current)?;
        }
        let snapshot = tree.children(current).to_vec();
        pending.extend(snapshot.into_iter().rev());
    }
    Ok(())
}

/// Predicate for [`crawl`] selecting elements of one kind.
pub fn of_kind(kind: ElementKind) -> impl Fn(&CodeTree, ElementId) -> bool {
    move |tree, id| tree.get(id).is_some_and(|e| e.kind() == kind)
}
