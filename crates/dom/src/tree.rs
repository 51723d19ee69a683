//! Arena-backed element tree.
//!
//! The tree owns every element; parent/child edges are the only owning edges.
//! Elements are addressed by [`ElementId`] handles which stay valid until the
//! element is removed and are never handed out again afterwards.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::element::{
    CodeClass, CodeElement, CodeEnum, CodeInterface, CodeMethod, CodeNamespace, CodeParameter,
    CodeProperty, ElementId, ElementKind, ImportDeclaration, TypeReference,
};
use crate::error::{StructuralError, StructuralErrorKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Node {
    element: CodeElement,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

/// The code model of one generation run, rooted at a namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeTree {
    nodes: Vec<Option<Node>>,
}

const ROOT: ElementId = ElementId(0);

impl CodeTree {
    /// Creates a tree holding only the root namespace.
    pub fn new(root_namespace: impl Into<String>) -> Self {
        Self {
            nodes: vec![Some(Node {
                element: CodeElement::Namespace(CodeNamespace::new(root_namespace)),
                parent: None,
                children: Vec::new(),
            })],
        }
    }

    /// Handle of the root namespace.
    pub fn root(&self) -> ElementId {
        ROOT
    }

    /// Number of elements currently in the tree, the root included.
    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    /// Whether the tree holds nothing besides the root namespace.
    pub fn is_empty(&self) -> bool {
        self.children(ROOT).is_empty()
    }

    /// Whether the handle resolves.
    pub fn contains(&self, id: ElementId) -> bool {
        self.node(id).is_some()
    }

    fn node(&self, id: ElementId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Resolves a handle; `None` once the element was removed.
    pub fn get(&self, id: ElementId) -> Option<&CodeElement> {
        self.node(id).map(|n| &n.element)
    }

    /// Mutable counterpart of [`CodeTree::get`].
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut CodeElement> {
        self.node_mut(id).map(|n| &mut n.element)
    }

    /// Resolves a handle that must be live.
    pub fn element(&self, id: ElementId) -> Result<&CodeElement, StructuralError> {
        self.get(id).ok_or_else(|| Self::missing(id))
    }

    /// Mutable counterpart of [`CodeTree::element`].
    pub fn element_mut(&mut self, id: ElementId) -> Result<&mut CodeElement, StructuralError> {
        self.get_mut(id).ok_or_else(|| Self::missing(id))
    }

    fn missing(id: ElementId) -> StructuralError {
        StructuralError::new(StructuralErrorKind::MissingElement(id), id.to_string())
    }

    /// Parent of an element; `None` for the root and for removed elements.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Direct children in insertion order.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.node(id).map_or(&[][..], |n| n.children.as_slice())
    }

    /// All live handles in creation order.
    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_some())
            .map(|(i, _)| ElementId(i))
    }

    fn insert(
        &mut self,
        parent: ElementId,
        element: CodeElement,
    ) -> Result<ElementId, StructuralError> {
        let parent_kind = self.element(parent)?.kind();
        let kind = element.kind();
        if !kind.can_belong_to(parent_kind) {
            return Err(StructuralError::new(
                StructuralErrorKind::KindMismatch {
                    child: kind,
                    parent: parent_kind,
                },
                format!("{}::{}", self.qualified_path(parent), element.name()),
            ));
        }
        if element.name().is_empty() {
            return Err(StructuralError::new(
                StructuralErrorKind::EmptyName(kind),
                self.qualified_path(parent),
            ));
        }
        let id = ElementId(self.nodes.len());
        self.nodes.push(Some(Node {
            element,
            parent: Some(parent),
            children: Vec::new(),
        }));
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.push(id);
        }
        Ok(id)
    }

    /// Adds a child namespace.
    pub fn add_namespace(
        &mut self,
        parent: ElementId,
        namespace: CodeNamespace,
    ) -> Result<ElementId, StructuralError> {
        self.insert(parent, CodeElement::Namespace(namespace))
    }

    /// Adds a class to a namespace.
    pub fn add_class(
        &mut self,
        parent: ElementId,
        class: CodeClass,
    ) -> Result<ElementId, StructuralError> {
        self.insert(parent, CodeElement::Class(class))
    }

    /// Adds an interface to a namespace.
    pub fn add_interface(
        &mut self,
        parent: ElementId,
        interface: CodeInterface,
    ) -> Result<ElementId, StructuralError> {
        self.insert(parent, CodeElement::Interface(interface))
    }

    /// Adds an enum to a namespace.
    pub fn add_enum(
        &mut self,
        parent: ElementId,
        code_enum: CodeEnum,
    ) -> Result<ElementId, StructuralError> {
        self.insert(parent, CodeElement::Enum(code_enum))
    }

    /// Adds a method to a class.
    pub fn add_method(
        &mut self,
        parent: ElementId,
        method: CodeMethod,
    ) -> Result<ElementId, StructuralError> {
        self.insert(parent, CodeElement::Method(method))
    }

    /// Adds a property to a class or interface.
    pub fn add_property(
        &mut self,
        parent: ElementId,
        property: CodeProperty,
    ) -> Result<ElementId, StructuralError> {
        self.insert(parent, CodeElement::Property(property))
    }

    /// Appends a parameter to a method.
    pub fn add_parameter(
        &mut self,
        parent: ElementId,
        parameter: CodeParameter,
    ) -> Result<ElementId, StructuralError> {
        self.insert(parent, CodeElement::Parameter(parameter))
    }

    /// Adds an import to a class or interface.
    ///
    /// Returns `Ok(None)` when an import with the same key is already present.
    pub fn add_import(
        &mut self,
        parent: ElementId,
        import: ImportDeclaration,
    ) -> Result<Option<ElementId>, StructuralError> {
        let duplicate = self
            .children(parent)
            .iter()
            .filter_map(|c| self.get(*c).and_then(CodeElement::as_import))
            .any(|existing| existing.key() == import.key());
        if duplicate {
            return Ok(None);
        }
        self.insert(parent, CodeElement::Import(import)).map(Some)
    }

    /// Removes an element and its whole subtree, returning every removed handle.
    pub fn remove(&mut self, id: ElementId) -> Result<Vec<ElementId>, StructuralError> {
        if id == ROOT {
            return Err(StructuralError::new(
                StructuralErrorKind::RootIsFixed,
                self.qualified_path(id),
            ));
        }
        let parent = self.parent(id).ok_or_else(|| Self::missing(id))?;
        trace!(element = %self.qualified_path(id), "Removing element.");
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.retain(|c| *c != id);
        }
        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(current.0).and_then(Option::take) {
                stack.extend(node.children);
                removed.push(current);
            }
        }
        Ok(removed)
    }

    /// Re-parents an element, keeping its handle and subtree.
    pub fn move_element(
        &mut self,
        id: ElementId,
        new_parent: ElementId,
    ) -> Result<(), StructuralError> {
        if id == ROOT {
            return Err(StructuralError::new(
                StructuralErrorKind::RootIsFixed,
                self.qualified_path(id),
            ));
        }
        let kind = self.element(id)?.kind();
        let parent_kind = self.element(new_parent)?.kind();
        if !kind.can_belong_to(parent_kind) {
            return Err(StructuralError::new(
                StructuralErrorKind::KindMismatch {
                    child: kind,
                    parent: parent_kind,
                },
                self.qualified_path(id),
            ));
        }
        if self.ancestors_or_self(new_parent).any(|a| a == id) {
            return Err(StructuralError::new(
                StructuralErrorKind::InvalidMove,
                self.qualified_path(id),
            ));
        }
        let old_parent = self.parent(id).ok_or_else(|| Self::missing(id))?;
        if let Some(node) = self.node_mut(old_parent) {
            node.children.retain(|c| *c != id);
        }
        if let Some(node) = self.node_mut(new_parent) {
            node.children.push(id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = Some(new_parent);
        }
        trace!(element = %self.qualified_path(id), "Moved element.");
        Ok(())
    }

    /// Nulls every weak handle that points into `removed`. Returns how many were cleared.
    pub fn clear_references_to(&mut self, removed: &HashSet<ElementId>) -> usize {
        if removed.is_empty() {
            return 0;
        }
        let mut cleared = 0;
        for node in self.nodes.iter_mut().flatten() {
            node.element.for_each_type_reference_mut(&mut |t| {
                if t.type_definition.is_some_and(|d| removed.contains(&d)) {
                    t.type_definition = None;
                    cleared += 1;
                }
            });
            if let CodeElement::Method(method) = &mut node.element {
                for handle in [&mut method.original_method, &mut method.accessed_property] {
                    if handle.is_some_and(|d| removed.contains(&d)) {
                        *handle = None;
                        cleared += 1;
                    }
                }
            }
        }
        cleared
    }

    /// Removes an element and nulls every weak handle into its subtree.
    pub fn remove_and_clear(&mut self, id: ElementId) -> Result<Vec<ElementId>, StructuralError> {
        let removed = self.remove(id)?;
        let set: HashSet<ElementId> = removed.iter().copied().collect();
        self.clear_references_to(&set);
        Ok(removed)
    }

    /// Renames every type reference resolving to `definition` after its target was renamed.
    pub fn retarget_type_name(&mut self, definition: ElementId, new_name: &str) {
        for node in self.nodes.iter_mut().flatten() {
            node.element.for_each_type_reference_mut(&mut |t| {
                if t.type_definition == Some(definition) {
                    new_name.clone_into(&mut t.name);
                }
            });
        }
    }

    /// Resolves a type reference's definition through the tree.
    pub fn resolve(&self, type_ref: &TypeReference) -> Option<&CodeElement> {
        type_ref.type_definition.and_then(|d| self.get(d))
    }

    /// The element itself followed by its ancestors up to the root.
    pub fn ancestors_or_self(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        std::iter::successors(self.contains(id).then_some(id), |current| self.parent(*current))
    }

    /// Nearest enclosing element of `kind`, the element itself included.
    pub fn nearest_of_kind(&self, id: ElementId, kind: ElementKind) -> Option<ElementId> {
        self.ancestors_or_self(id)
            .find(|a| self.get(*a).is_some_and(|e| e.kind() == kind))
    }

    /// Nearest enclosing namespace, the element itself included.
    pub fn namespace_of(&self, id: ElementId) -> Option<ElementId> {
        self.nearest_of_kind(id, ElementKind::Namespace)
    }

    /// First direct child of `kind` named `name`.
    pub fn find_child(
        &self,
        parent: ElementId,
        kind: ElementKind,
        name: &str,
    ) -> Option<ElementId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|c| self.get(*c).is_some_and(|e| e.kind() == kind && e.name() == name))
    }

    /// Direct children of a given kind.
    pub fn children_of_kind(&self, parent: ElementId, kind: ElementKind) -> Vec<ElementId> {
        self.children(parent)
            .iter()
            .copied()
            .filter(|c| self.get(*c).is_some_and(|e| e.kind() == kind))
            .collect()
    }

    /// Human readable path such as `graph.users::UserRequestBuilder::Get`.
    ///
    /// Starts at the nearest namespace, which already carries its dotted name.
    pub fn qualified_path(&self, id: ElementId) -> String {
        let mut segments = Vec::new();
        for ancestor in self.ancestors_or_self(id) {
            let Some(element) = self.get(ancestor) else {
                break;
            };
            match element {
                CodeElement::Namespace(ns) => {
                    segments.push(if ns.name.is_empty() { "<root>" } else { ns.name.as_str() });
                    break;
                }
                other => segments.push(other.name()),
            }
        }
        if segments.is_empty() {
            return format!("<missing {id}>");
        }
        segments.reverse();
        segments.join("::")
    }
}
