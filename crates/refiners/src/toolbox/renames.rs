//! Identifier and placement passes.

use sdkgen_dom::{crawl, of_kind, validate, CodeElement, CodeTree, ElementKind};
use tracing::debug;

use super::refresh_import_namespaces;
use crate::error::RefineError;
use crate::naming::capitalize_first;

/// Renames properties whose name equals their class's name, ignoring case.
///
/// The old name is kept as wire name before `suffix` is appended. A numeric
/// counter follows the suffix if the result is already taken.
pub fn disambiguate_properties_with_class_names(
    tree: &mut CodeTree,
    suffix: &str,
) -> Result<(), RefineError> {
    let root = tree.root();
    crawl(tree, root, of_kind(ElementKind::Class), |tree, class| -> Result<(), RefineError> {
        let class_name = tree.element(class)?.name().to_string();
        let properties = tree.children_of_kind(class, ElementKind::Property);
        for property_id in &properties {
            let clashes = tree
                .get(*property_id)
                .is_some_and(|p| p.name().eq_ignore_ascii_case(&class_name));
            if !clashes {
                continue;
            }
            let old_name = tree.element(*property_id)?.name().to_string();
            let base = format!("{old_name}{suffix}");
            let mut name = base.clone();
            let mut counter = 2;
            while tree.find_child(class, ElementKind::Property, &name).is_some() {
                name = format!("{base}{counter}");
                counter += 1;
            }
            if let Some(property) =
                tree.get_mut(*property_id).and_then(CodeElement::as_property_mut)
            {
                property.capture_serialization_name();
                property.name.clone_from(&name);
            }
            debug!(
                class = %class_name,
                from = %old_name,
                to = %name,
                "Disambiguated property name."
            );
        }
        Ok(())
    })
}

/// Upper-cases the first letter of every namespace segment.
pub fn capitalize_namespaces_first_letters(tree: &mut CodeTree) -> Result<(), RefineError> {
    let root = tree.root();
    crawl(tree, root, of_kind(ElementKind::Namespace), |tree, id| -> Result<(), RefineError> {
        if let Some(namespace) = tree.get_mut(id).and_then(CodeElement::as_namespace_mut) {
            namespace.name = namespace
                .name
                .split('.')
                .map(capitalize_first)
                .collect::<Vec<_>>()
                .join(".");
        }
        Ok(())
    })?;
    refresh_import_namespaces(tree);
    Ok(())
}

/// Appends `Async` to asynchronous methods not already carrying it.
pub fn add_async_suffix(tree: &mut CodeTree) -> Result<(), RefineError> {
    let root = tree.root();
    crawl(tree, root, of_kind(ElementKind::Method), |tree, id| -> Result<(), RefineError> {
        if let Some(method) = tree.get_mut(id).and_then(CodeElement::as_method_mut) {
            if method.is_async && !method.name.ends_with("Async") {
                method.name.push_str("Async");
            }
        }
        Ok(())
    })
}

/// Moves a class into the child namespace whose last segment spells its name.
pub fn move_classes_with_namespace_names_under_namespace(
    tree: &mut CodeTree,
) -> Result<(), RefineError> {
    let root = tree.root();
    let mut moved = 0usize;
    crawl(
        tree,
        root,
        of_kind(ElementKind::Namespace),
        |tree, namespace| -> Result<(), RefineError> {
            let children = tree.children_of_kind(namespace, ElementKind::Namespace);
            for class in tree.children_of_kind(namespace, ElementKind::Class) {
                let class_name = tree.element(class)?.name().to_string();
                let target = children.iter().copied().find(|child| {
                    tree.get(*child)
                        .and_then(CodeElement::as_namespace)
                        .is_some_and(|n| n.last_segment().eq_ignore_ascii_case(&class_name))
                });
                if let Some(target) = target {
                    tree.move_element(class, target)?;
                    moved += 1;
                }
            }
            Ok(())
        },
    )?;
    if moved > 0 {
        refresh_import_namespaces(tree);
    }
    debug!(moved, "Moved classes under same-named namespaces.");
    Ok(())
}

/// Fixes the wire name of serialized properties once naming is final.
pub fn capture_serialization_names(tree: &mut CodeTree) -> Result<(), RefineError> {
    let root = tree.root();
    let mut captured = 0usize;
    crawl(
        tree,
        root,
        |tree, id| validate::has_serialization_members(tree, id),
        |tree, class| -> Result<(), RefineError> {
            for id in tree.children_of_kind(class, ElementKind::Property) {
                if let Some(property) = tree.get_mut(id).and_then(CodeElement::as_property_mut) {
                    if property.is_serializable() && property.serialization_name.is_none() {
                        property.capture_serialization_name();
                        captured += 1;
                    }
                }
            }
            Ok(())
        },
    )?;
    debug!(captured, "Captured serialization names.");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use sdkgen_dom::{
        ClassKind, CodeClass, CodeMethod, CodeNamespace, CodeProperty, ImportDeclaration,
        MethodKind, PropertyKind, TypeReference,
    };

    fn property_of(tree: &CodeTree, id: sdkgen_dom::ElementId) -> &CodeProperty {
        tree.get(id).and_then(CodeElement::as_property).unwrap()
    }

    #[test]
    fn test_property_named_like_its_class_is_disambiguated() {
        let mut tree = CodeTree::new("api");
        let user = tree.add_class(tree.root(), CodeClass::new("User", ClassKind::Model)).unwrap();
        let clash = tree
            .add_property(
                user,
                CodeProperty::new("user", PropertyKind::Custom, TypeReference::new("string")),
            )
            .unwrap();
        tree.add_property(
            user,
            CodeProperty::new("user_prop", PropertyKind::Custom, TypeReference::new("string")),
        )
        .unwrap();

        disambiguate_properties_with_class_names(&mut tree, "_prop").unwrap();
        disambiguate_properties_with_class_names(&mut tree, "_prop").unwrap();

        let property = property_of(&tree, clash);
        assert_eq!(property.name, "user_prop2");
        assert_eq!(property.serialization_name.as_deref(), Some("user"));
        validate::check_unique_names(&tree).unwrap();
    }

    #[test]
    fn test_capitalize_namespaces_updates_imports() {
        let mut tree = CodeTree::new("graph");
        let ns = tree.add_namespace(tree.root(), CodeNamespace::new("graph.me.messages")).unwrap();
        let message = tree.add_class(ns, CodeClass::new("Message", ClassKind::Model)).unwrap();
        let holder = tree
            .add_class(tree.root(), CodeClass::new("Holder", ClassKind::Model))
            .unwrap();
        let import = tree
            .add_import(
                holder,
                ImportDeclaration::of_symbol(
                    "graph.me.messages",
                    TypeReference::to_definition("Message", message),
                ),
            )
            .unwrap()
            .unwrap();
        capitalize_namespaces_first_letters(&mut tree).unwrap();
        assert_eq!(tree.get(ns).unwrap().name(), "Graph.Me.Messages");
        assert_eq!(tree.get(tree.root()).unwrap().name(), "Graph");
        assert_eq!(tree.get(import).unwrap().name(), "Graph.Me.Messages");
    }

    #[test]
    fn test_async_suffix_is_added_once() {
        let mut tree = CodeTree::new("api");
        let class = tree
            .add_class(tree.root(), CodeClass::new("Builder", ClassKind::RequestBuilder))
            .unwrap();
        let get = tree
            .add_method(
                class,
                CodeMethod::new("Get", MethodKind::Custom)
                    .asynchronous()
                    .returning(TypeReference::new("string")),
            )
            .unwrap();
        let sync = tree
            .add_method(
                class,
                CodeMethod::new("Put", MethodKind::Custom).returning(TypeReference::new("string")),
            )
            .unwrap();
        add_async_suffix(&mut tree).unwrap();
        add_async_suffix(&mut tree).unwrap();
        assert_eq!(tree.get(get).unwrap().name(), "GetAsync");
        assert_eq!(tree.get(sync).unwrap().name(), "Put");
    }

    #[test]
    fn test_class_moves_into_namespace_with_its_name() {
        let mut tree = CodeTree::new("graph");
        let root = tree.root();
        let users_ns = tree.add_namespace(root, CodeNamespace::new("graph.users")).unwrap();
        let users = tree
            .add_class(root, CodeClass::new("Users", ClassKind::RequestBuilder))
            .unwrap();
        let other = tree
            .add_class(root, CodeClass::new("Groups", ClassKind::RequestBuilder))
            .unwrap();
        move_classes_with_namespace_names_under_namespace(&mut tree).unwrap();
        move_classes_with_namespace_names_under_namespace(&mut tree).unwrap();
        assert_eq!(tree.parent(users), Some(users_ns));
        assert_eq!(tree.parent(other), Some(root));
    }

    #[test]
    fn test_capture_only_touches_serialized_classes() {
        let mut tree = CodeTree::new("api");
        let model = tree.add_class(tree.root(), CodeClass::new("User", ClassKind::Model)).unwrap();
        let id = tree
            .add_property(
                model,
                CodeProperty::new("id", PropertyKind::Custom, TypeReference::new("string")),
            )
            .unwrap();
        let store = tree
            .add_property(
                model,
                CodeProperty::new(
                    "store",
                    PropertyKind::BackingStore,
                    TypeReference::external("IBackingStore"),
                ),
            )
            .unwrap();
        let plain = tree
            .add_class(tree.root(), CodeClass::new("Options", ClassKind::Custom))
            .unwrap();
        let flag = tree
            .add_property(
                plain,
                CodeProperty::new("flag", PropertyKind::Custom, TypeReference::new("boolean")),
            )
            .unwrap();
        tree.add_method(
            model,
            CodeMethod::new("Serialize", MethodKind::Serializer)
                .returning(TypeReference::new("void")),
        )
        .unwrap();

        capture_serialization_names(&mut tree).unwrap();
        assert_eq!(property_of(&tree, id).serialization_name.as_deref(), Some("id"));
        assert_eq!(property_of(&tree, store).serialization_name, None);
        assert_eq!(property_of(&tree, flag).serialization_name, None);
        validate::check_output(&tree).unwrap();
    }
}
