//! Language-neutral code model for generated client SDKs.
//!
//! The model is a tree of typed elements (namespaces, classes, interfaces,
//! enums, methods, properties, parameters and imports) owned by a
//! [`CodeTree`] arena. Type references link back to their definitions through
//! [`ElementId`] handles that resolve to nothing once the target is removed.
//!
//! ## Modules
//!
//! - `element`: the closed set of element variants and their kind tags
//! - `tree`: the arena, kind-checked insertion, removal and re-parenting
//! - `traversal`: lazy child sequences and the mutation-safe [`crawl`]
//! - `validate`: invariant checks shared by refiner pipelines
//! - `error`: [`StructuralError`]

mod element;
mod error;
mod traversal;
mod tree;
pub mod validate;

pub use element::{
    ClassKind, CodeClass, CodeElement, CodeEnum, CodeInterface, CodeMethod, CodeNamespace,
    CodeParameter, CodeProperty, CollectionKind, ElementId, ElementKind, HttpVerb,
    ImportDeclaration, MethodKind, ParameterKind, PropertyKind, TypeReference,
};
pub use error::{StructuralError, StructuralErrorKind};
pub use traversal::{crawl, of_kind, ChildIter, ChildSequence};
pub use tree::CodeTree;
