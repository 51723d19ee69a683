//! Structural errors raised when the code model breaks one of its invariants.

use thiserror::Error;

use crate::element::{ElementId, ElementKind};

/// What invariant an element violates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralErrorKind {
    /// A non-constructor method has no return type.
    #[error("method has no return type")]
    MissingReturnType,

    /// A request generator or executor has no HTTP verb.
    #[error("request method has no HTTP verb")]
    MissingHttpVerb,

    /// A weak handle points at an element that is no longer in the tree.
    #[error("{field} points at removed element {target}")]
    DanglingReference {
        /// Field holding the handle.
        field: &'static str,
        /// Handle that no longer resolves.
        target: ElementId,
    },

    /// A weak handle points at an element of the wrong kind.
    #[error("{field} must point at a {expected}, found a {found}")]
    WrongReferenceKind {
        /// Field holding the handle.
        field: &'static str,
        /// Expected kind description.
        expected: &'static str,
        /// Kind actually found.
        found: ElementKind,
    },

    /// A child was added under a parent that cannot own it.
    #[error("a {child} cannot be owned by a {parent}")]
    KindMismatch {
        /// Kind of the rejected child.
        child: ElementKind,
        /// Kind of the parent.
        parent: ElementKind,
    },

    /// The handle does not resolve to an element.
    #[error("element {0} does not exist")]
    MissingElement(ElementId),

    /// Two siblings of the same category share a name.
    #[error("duplicate {kind} name '{name}'")]
    DuplicateName {
        /// Category of the siblings.
        kind: ElementKind,
        /// Shared name.
        name: String,
    },

    /// A serialized property has no wire name.
    #[error("serialized property has no serialization name")]
    MissingSerializationName,

    /// An element was given an empty name.
    #[error("{0} name is empty")]
    EmptyName(ElementKind),

    /// An element cannot be moved under itself or one of its descendants.
    #[error("cannot move an element under its own subtree")]
    InvalidMove,

    /// The root namespace is the only element without a parent and stays in place.
    #[error("the root namespace cannot be removed or moved")]
    RootIsFixed,
}

/// An invariant violation, with the element path and the pass that found it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at '{path}'{}", detected_by(.pass))]
pub struct StructuralError {
    /// Violated invariant.
    pub kind: StructuralErrorKind,
    /// Qualified path of the offending element.
    pub path: String,
    /// Pass that detected the violation, when raised inside a pipeline.
    pub pass: Option<&'static str>,
}

fn detected_by(pass: &Option<&'static str>) -> String {
    pass.map(|p| format!(" (detected by {p})")).unwrap_or_default()
}

impl StructuralError {
    /// Error for the element at `path`.
    pub fn new(kind: StructuralErrorKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            pass: None,
        }
    }

    /// Attributes the error to `pass` unless a pass is already recorded.
    pub fn in_pass(mut self, pass: &'static str) -> Self {
        self.pass.get_or_insert(pass);
        self
    }
}
