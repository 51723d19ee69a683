use std::collections::HashSet;

use sdkgen_dom::{
    crawl, ClassKind, CodeClass, CodeElement, CodeMethod, CodeParameter, CodeProperty, CodeTree,
    ElementId, ElementKind, MethodKind, ParameterKind, PropertyKind, TypeReference,
};
use tracing::debug;

use crate::error::{RefineError, UnsupportedConstructError};
use crate::naming::{capitalize_first, lower_first};

/// Name of the serializer synthesized on wrapper classes.
pub const WRAPPER_SERIALIZER: &str = "Serialize";
/// Name of the static factory synthesized on wrapper classes.
pub const WRAPPER_FACTORY: &str = "CreateFromDiscriminatorValue";

/// Replaces every "one-of-N" type with a synthesized wrapper class.
///
/// The wrapper lives in the owner's namespace, holds one nullable property per
/// alternative in declared order, and gets a serializer plus a static
/// deserializer factory. Uses of the same union name share one wrapper.
pub fn convert_union_types_to_wrapper(tree: &mut CodeTree) -> Result<(), RefineError> {
    let root = tree.root();
    let mut converted = 0usize;
    crawl(tree, root, owns_union, |tree, owner| -> Result<(), RefineError> {
        let Some(union) = declared_type(tree, owner).filter(|t| t.is_union()).cloned() else {
            return Ok(());
        };
        if union.alternatives.iter().any(TypeReference::is_union) {
            return Err(UnsupportedConstructError::new(
                "nested one-of type",
                tree.qualified_path(owner),
            )
            .into());
        }
        let namespace = tree.namespace_of(owner).unwrap_or_else(|| tree.root());
        let wrapper = wrapper_for(tree, namespace, owner, &union)?;
        let replacement = TypeReference {
            name: tree.element(wrapper)?.name().to_string(),
            is_external: false,
            is_nullable: union.is_nullable,
            collection_kind: union.collection_kind,
            type_definition: Some(wrapper),
            alternatives: Vec::new(),
        };
        if let Some(declared) = declared_type_mut(tree, owner) {
            *declared = replacement;
        }
        converted += 1;
        Ok(())
    })?;
    debug!(converted, "Converted union types to wrappers.");
    Ok(())
}

fn owns_union(tree: &CodeTree, id: ElementId) -> bool {
    declared_type(tree, id).is_some_and(TypeReference::is_union)
}

fn declared_type(tree: &CodeTree, id: ElementId) -> Option<&TypeReference> {
    match tree.get(id)? {
        CodeElement::Method(method) => method.return_type.as_ref(),
        CodeElement::Property(property) => Some(&property.type_),
        CodeElement::Parameter(parameter) => Some(&parameter.type_),
        _ => None,
    }
}

fn declared_type_mut(tree: &mut CodeTree, id: ElementId) -> Option<&mut TypeReference> {
    match tree.get_mut(id)? {
        CodeElement::Method(method) => method.return_type.as_mut(),
        CodeElement::Property(property) => Some(&mut property.type_),
        CodeElement::Parameter(parameter) => Some(&mut parameter.type_),
        _ => None,
    }
}

/// Property types a wrapper holds for `union`, in declared order.
fn member_types(union: &TypeReference) -> Vec<TypeReference> {
    union.alternatives.iter().map(|a| a.clone().nullable(true)).collect()
}

fn wrapper_for(
    tree: &mut CodeTree,
    namespace: ElementId,
    owner: ElementId,
    union: &TypeReference,
) -> Result<ElementId, RefineError> {
    let base = if union.name.trim().is_empty() {
        let owner_name = capitalize_first(tree.element(owner)?.name());
        let class_name = tree
            .nearest_of_kind(owner, ElementKind::Class)
            .and_then(|c| tree.get(c))
            .map(|c| c.name().to_string())
            .unwrap_or_default();
        format!("{class_name}{owner_name}")
    } else {
        capitalize_first(&union.name)
    };
    let expected = member_types(union);
    let mut name = base.clone();
    let mut attempt = 1;
    loop {
        let existing = tree
            .children(namespace)
            .iter()
            .copied()
            .find(|c| tree.get(*c).is_some_and(|e| e.is_type_definition() && e.name() == name));
        match existing {
            None => break,
            Some(candidate) if is_matching_wrapper(tree, candidate, &expected) => {
                return Ok(candidate);
            }
            Some(_) => {
                name = if attempt == 1 {
                    format!("{base}Wrapper")
                } else {
                    format!("{base}Wrapper{attempt}")
                };
                attempt += 1;
            }
        }
    }

    let mut class = CodeClass::new(name.as_str(), ClassKind::Model);
    class.is_union_wrapper = true;
    class.description = Some(format!(
        "Composed type wrapper for {}.",
        union.alternatives.iter().map(|a| a.name.as_str()).collect::<Vec<_>>().join(", ")
    ));
    let wrapper = tree.add_class(namespace, class)?;

    let mut taken = HashSet::new();
    for member_type in expected {
        let mut base = lower_first(&member_type.name);
        if base.is_empty() {
            base.push_str("value");
        }
        if member_type.is_collection() {
            base.push_str("Collection");
        }
        let mut member_name = base.clone();
        let mut suffix = 2;
        while !taken.insert(member_name.clone()) {
            member_name = format!("{base}{suffix}");
            suffix += 1;
        }
        let mut property = CodeProperty::new(member_name, PropertyKind::Custom, member_type);
        property.description = Some(format!(
            "Composed type representation for type {}",
            property.type_.name
        ));
        property.capture_serialization_name();
        tree.add_property(wrapper, property)?;
    }

    let serializer = tree.add_method(
        wrapper,
        CodeMethod::new(WRAPPER_SERIALIZER, MethodKind::Serializer)
            .returning(TypeReference::new("void").nullable(false)),
    )?;
    tree.add_parameter(
        serializer,
        CodeParameter::new(
            "writer",
            ParameterKind::Serializer,
            TypeReference::external("SerializationWriter").nullable(false),
        ),
    )?;
    let mut factory = CodeMethod::new(WRAPPER_FACTORY, MethodKind::Deserializer)
        .static_method()
        .returning(TypeReference::to_definition(name.as_str(), wrapper).nullable(false));
    factory.description =
        Some("Keeps the most specific alternative the payload parses as.".into());
    let factory = tree.add_method(wrapper, factory)?;
    tree.add_parameter(
        factory,
        CodeParameter::new(
            "parseNode",
            ParameterKind::ParseNode,
            TypeReference::external("ParseNode").nullable(false),
        ),
    )?;
    debug!(
        wrapper = %tree.qualified_path(wrapper),
        alternatives = union.alternatives.len(),
        "Synthesized union wrapper."
    );
    Ok(wrapper)
}

fn is_matching_wrapper(tree: &CodeTree, candidate: ElementId, expected: &[TypeReference]) -> bool {
    let is_wrapper = tree
        .get(candidate)
        .and_then(CodeElement::as_class)
        .is_some_and(|c| c.is_union_wrapper);
    if !is_wrapper {
        return false;
    }
    let held: Vec<&TypeReference> = tree
        .children_of_kind(candidate, ElementKind::Property)
        .into_iter()
        .filter_map(|p| tree.get(p).and_then(CodeElement::as_property))
        .map(|p| &p.type_)
        .collect();
    held.len() == expected.len() && held.iter().zip(expected).all(|(a, b)| *a == b)
}
