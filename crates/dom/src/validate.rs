//! Invariant checks over a whole tree.
//!
//! Refiner pipelines run [`check_input`] before their first pass, re-run
//! [`check_references`] after every pass and finish with [`check_output`],
//! which covers everything the writer layer relies on.

use std::collections::HashSet;

use crate::element::{CodeElement, ElementId, ElementKind, MethodKind};
use crate::error::{StructuralError, StructuralErrorKind};
use crate::tree::CodeTree;

/// Return types and HTTP verbs of every method.
pub fn check_methods(tree: &CodeTree) -> Result<(), StructuralError> {
    for id in tree.ids() {
        let Some(CodeElement::Method(method)) = tree.get(id) else {
            continue;
        };
        if method.kind.requires_return_type() && method.return_type.is_none() {
            return Err(StructuralError::new(
                StructuralErrorKind::MissingReturnType,
                tree.qualified_path(id),
            ));
        }
        if method.kind.requires_http_verb() && method.http_verb.is_none() {
            return Err(StructuralError::new(
                StructuralErrorKind::MissingHttpVerb,
                tree.qualified_path(id),
            ));
        }
    }
    Ok(())
}

/// Every weak handle is absent or resolves to an element of the right kind.
pub fn check_references(tree: &CodeTree) -> Result<(), StructuralError> {
    for id in tree.ids() {
        let Some(element) = tree.get(id) else {
            continue;
        };
        let mut failure = None;
        element.for_each_type_reference(&mut |t| {
            if failure.is_some() {
                return;
            }
            if let Some(target) = t.type_definition {
                failure = check_handle(
                    tree,
                    "type_definition",
                    target,
                    "class, enum or interface",
                    CodeElement::is_type_definition,
                )
                .err();
            }
        });
        if let Some(kind) = failure {
            return Err(StructuralError::new(kind, tree.qualified_path(id)));
        }
        if let CodeElement::Method(method) = element {
            if let Some(target) = method.original_method {
                check_handle(
                    tree,
                    "original_method",
                    target,
                    "method",
                    |e| e.kind() == ElementKind::Method,
                )
                .map_err(|kind| StructuralError::new(kind, tree.qualified_path(id)))?;
            }
            if let Some(target) = method.accessed_property {
                check_handle(
                    tree,
                    "accessed_property",
                    target,
                    "property",
                    |e| e.kind() == ElementKind::Property,
                )
                .map_err(|kind| StructuralError::new(kind, tree.qualified_path(id)))?;
            }
        }
    }
    Ok(())
}

fn check_handle(
    tree: &CodeTree,
    field: &'static str,
    target: ElementId,
    expected: &'static str,
    accepts: impl Fn(&CodeElement) -> bool,
) -> Result<(), StructuralErrorKind> {
    match tree.get(target) {
        None => Err(StructuralErrorKind::DanglingReference { field, target }),
        Some(found) if !accepts(found) => Err(StructuralErrorKind::WrongReferenceKind {
            field,
            expected,
            found: found.kind(),
        }),
        Some(_) => Ok(()),
    }
}

/// Siblings of one category have distinct names.
///
/// Methods flagged as overloads may share their name; imports are keyed by
/// declaration and checked on insertion instead.
pub fn check_unique_names(tree: &CodeTree) -> Result<(), StructuralError> {
    for parent in tree.ids() {
        let mut seen: HashSet<(ElementKind, &str)> = HashSet::new();
        for child in tree.children(parent) {
            let Some(element) = tree.get(*child) else {
                continue;
            };
            let category = match element {
                CodeElement::Import(_) => continue,
                CodeElement::Method(method) if method.is_overload() => continue,
                // types share one scope inside a namespace
                CodeElement::Class(_) | CodeElement::Interface(_) | CodeElement::Enum(_) => {
                    ElementKind::Class
                }
                other => other.kind(),
            };
            if !seen.insert((category, element.name())) {
                return Err(StructuralError::new(
                    StructuralErrorKind::DuplicateName {
                        kind: element.kind(),
                        name: element.name().to_string(),
                    },
                    tree.qualified_path(*child),
                ));
            }
        }
        if let Some(CodeElement::Enum(code_enum)) = tree.get(parent) {
            let mut members = HashSet::new();
            if let Some(dup) = code_enum.members.iter().find(|m| !members.insert(m.as_str())) {
                return Err(StructuralError::new(
                    StructuralErrorKind::DuplicateName {
                        kind: ElementKind::Enum,
                        name: dup.clone(),
                    },
                    tree.qualified_path(parent),
                ));
            }
        }
    }
    Ok(())
}

/// Serializable properties of classes with a serializer or deserializer carry a wire name.
pub fn check_serialization_names(tree: &CodeTree) -> Result<(), StructuralError> {
    for class in tree.collect_matching(tree.root(), |e| e.kind() == ElementKind::Class) {
        if !has_serialization_members(tree, class) {
            continue;
        }
        for child in tree.children(class) {
            if let Some(CodeElement::Property(property)) = tree.get(*child) {
                if property.is_serializable() && property.serialization_name.is_none() {
                    return Err(StructuralError::new(
                        StructuralErrorKind::MissingSerializationName,
                        tree.qualified_path(*child),
                    ));
                }
            }
        }
    }
    Ok(())
}

/// Whether a class declares a serializer or deserializer method.
pub fn has_serialization_members(tree: &CodeTree, class: ElementId) -> bool {
    tree.children(class).iter().any(|c| {
        tree.get(*c)
            .and_then(CodeElement::as_method)
            .is_some_and(|m| matches!(m.kind, MethodKind::Serializer | MethodKind::Deserializer))
    })
}

/// Preconditions a producer must satisfy before refinement.
pub fn check_input(tree: &CodeTree) -> Result<(), StructuralError> {
    check_methods(tree)?;
    check_references(tree)
}

/// Guarantees handed to the writer layer after refinement.
pub fn check_output(tree: &CodeTree) -> Result<(), StructuralError> {
    check_methods(tree)?;
    check_references(tree)?;
    check_unique_names(tree)?;
    check_serialization_names(tree)
}
