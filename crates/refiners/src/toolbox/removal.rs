use std::collections::HashSet;

use sdkgen_dom::{crawl, ClassKind, CodeElement, CodeTree, ElementId, MethodKind};
use tracing::debug;

use crate::error::RefineError;

/// Removes every model class, union wrappers included.
pub fn remove_model_classes(tree: &mut CodeTree) -> Result<(), RefineError> {
    let removed = remove_matching(tree, |e| {
        e.as_class().is_some_and(|c| c.kind == ClassKind::Model)
    })?;
    debug!(removed, "Removed model classes.");
    Ok(())
}

/// Removes every enum.
pub fn remove_enums(tree: &mut CodeTree) -> Result<(), RefineError> {
    let removed = remove_matching(tree, |e| matches!(e, CodeElement::Enum(_)))?;
    debug!(removed, "Removed enums.");
    Ok(())
}

/// Removes every regular constructor. Client constructors stay.
pub fn remove_constructors(tree: &mut CodeTree) -> Result<(), RefineError> {
    let removed = remove_matching(tree, |e| {
        e.as_method().is_some_and(|m| m.kind == MethodKind::Constructor)
    })?;
    debug!(removed, "Removed constructors.");
    Ok(())
}

/// Removes matching subtrees plus the symbol imports that pointed into them,
/// then clears every remaining handle into the removed set.
fn remove_matching(
    tree: &mut CodeTree,
    mut predicate: impl FnMut(&CodeElement) -> bool,
) -> Result<usize, RefineError> {
    let root = tree.root();
    let mut removed: HashSet<ElementId> = HashSet::new();
    let mut matched = 0usize;
    crawl(
        tree,
        root,
        |tree, id| tree.get(id).is_some_and(&mut predicate),
        |tree, id| -> Result<(), RefineError> {
            removed.extend(tree.remove(id)?);
            matched += 1;
            Ok(())
        },
    )?;
    if removed.is_empty() {
        return Ok(0);
    }
    let stale_imports = tree.collect_matching(root, |e| {
        e.as_import()
            .and_then(|i| i.declaration.as_ref())
            .and_then(|d| d.type_definition)
            .is_some_and(|d| removed.contains(&d))
    });
    for import in stale_imports {
        removed.extend(tree.remove(import)?);
    }
    tree.clear_references_to(&removed);
    Ok(matched)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use sdkgen_dom::{
        validate, CodeClass, CodeEnum, CodeMethod, CodeNamespace, CodeProperty, ElementKind,
        ImportDeclaration, PropertyKind, TypeReference,
    };

    #[test]
    fn test_removing_models_clears_handles_and_stale_imports() {
        let mut tree = CodeTree::new("api");
        let models = tree.add_namespace(tree.root(), CodeNamespace::new("api.models")).unwrap();
        let user = tree.add_class(models, CodeClass::new("User", ClassKind::Model)).unwrap();
        let color = tree.add_enum(models, CodeEnum::new("Color")).unwrap();
        let builder = tree
            .add_class(tree.root(), CodeClass::new("MeRequestBuilder", ClassKind::RequestBuilder))
            .unwrap();
        let get = tree
            .add_method(
                builder,
                CodeMethod::new("Get", MethodKind::Custom)
                    .returning(TypeReference::to_definition("User", user)),
            )
            .unwrap();
        tree.add_import(
            builder,
            ImportDeclaration::of_symbol("api.models", TypeReference::to_definition("User", user)),
        )
        .unwrap();
        tree.add_import(builder, ImportDeclaration::new("System")).unwrap();
        tree.add_property(
            builder,
            CodeProperty::new(
                "color",
                PropertyKind::QueryParameter,
                TypeReference::to_definition("Color", color),
            ),
        )
        .unwrap();

        remove_model_classes(&mut tree).unwrap();
        remove_enums(&mut tree).unwrap();

        assert!(!tree.contains(user));
        assert!(!tree.contains(color));
        validate::check_references(&tree).unwrap();
        let ret = tree
            .get(get)
            .and_then(CodeElement::as_method)
            .and_then(|m| m.return_type.clone())
            .unwrap();
        assert_eq!(ret.name, "User");
        assert_eq!(ret.type_definition, None);
        assert_eq!(tree.children_of_kind(builder, ElementKind::Import).len(), 1);
    }

    #[test]
    fn test_remove_constructors_keeps_client_constructor() {
        let mut tree = CodeTree::new("api");
        let client = tree
            .add_class(tree.root(), CodeClass::new("ApiClient", ClassKind::RequestBuilder))
            .unwrap();
        tree.add_method(client, CodeMethod::new("constructor", MethodKind::Constructor)).unwrap();
        let keep = tree
            .add_method(client, CodeMethod::new("ApiClient", MethodKind::ClientConstructor))
            .unwrap();
        remove_constructors(&mut tree).unwrap();
        assert_eq!(tree.children(client), [keep]);
    }
}
