//! Passes that attach import declarations.

use std::collections::BTreeSet;

use sdkgen_dom::{
    crawl, of_kind, ClassKind, CodeElement, CodeTree, ElementId, ElementKind, ImportDeclaration,
    MethodKind, TypeReference,
};
use tracing::debug;

use super::{import_owner_of, is_import_owner};
use crate::config::split_module;
use crate::conventions::PrimitiveType;
use crate::error::RefineError;

/// Imports a target attaches to every class and interface, plus extra ones per class kind.
#[derive(Debug, Clone, Copy)]
pub struct DefaultImportTable {
    /// Imported by every class and interface.
    pub common: &'static [&'static str],
    /// Imported only by classes of the paired kind.
    pub by_kind: &'static [(ClassKind, &'static [&'static str])],
}

impl DefaultImportTable {
    /// Import names for an owner; interfaces pass `None`.
    pub fn imports_for(&self, kind: Option<ClassKind>) -> impl Iterator<Item = &'static str> + '_ {
        let specific = self
            .by_kind
            .iter()
            .filter(move |(k, _)| Some(*k) == kind)
            .flat_map(|(_, names)| names.iter().copied());
        self.common.iter().copied().chain(specific)
    }
}

/// Attaches the target's default imports, skipping ones already present.
pub fn add_default_imports(
    tree: &mut CodeTree,
    table: &DefaultImportTable,
) -> Result<(), RefineError> {
    let root = tree.root();
    let mut added = 0usize;
    crawl(tree, root, is_import_owner, |tree, owner| -> Result<(), RefineError> {
        let kind = tree.get(owner).and_then(CodeElement::as_class).map(|c| c.kind);
        for name in table.imports_for(kind) {
            if tree.add_import(owner, ImportDeclaration::new(name))?.is_some() {
                added += 1;
            }
        }
        Ok(())
    })?;
    debug!(added, "Added default imports.");
    Ok(())
}

/// Which same-tree namespaces still need explicit imports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportScope {
    /// Import types defined in an enclosing namespace.
    pub include_parent_namespaces: bool,
    /// Import types defined in the owner's own namespace.
    pub include_current_namespace: bool,
}

/// Imports every type definition used by an owner's signature and members.
///
/// Looks at inherits and implements, property types, method return types and
/// parameter types. Imports carry a symbol declaration pointing at the
/// definition, so later renames of the type keep them accurate.
pub fn add_properties_and_method_types_imports(
    tree: &mut CodeTree,
    scope: ImportScope,
) -> Result<(), RefineError> {
    let root = tree.root();
    crawl(tree, root, is_import_owner, |tree, owner| -> Result<(), RefineError> {
        let mut used = BTreeSet::new();
        let members = std::iter::once(owner).chain(tree.get_children(owner, true));
        for id in members {
            let Some(element) = tree.get(id) else {
                continue;
            };
            if element.kind() == ElementKind::Import {
                continue;
            }
            element.for_each_type_reference(&mut |t| {
                if let Some(definition) = t.type_definition {
                    used.insert(definition);
                }
            });
        }

        let owner_namespace = tree.namespace_of(owner);
        let mut imports = Vec::new();
        for definition in used {
            if definition == owner {
                continue;
            }
            let Some(element) = tree.get(definition).filter(|e| e.is_type_definition()) else {
                continue;
            };
            let Some(namespace) = tree.namespace_of(definition) else {
                continue;
            };
            if Some(namespace) == owner_namespace && !scope.include_current_namespace {
                continue;
            }
            let is_parent = owner_namespace
                .is_some_and(|current| {
                    tree.ancestors_or_self(current).skip(1).any(|a| a == namespace)
                });
            if is_parent && !scope.include_parent_namespaces {
                continue;
            }
            let namespace_name = tree.element(namespace)?.name().to_string();
            let symbol = TypeReference::to_definition(element.name(), definition).nullable(false);
            imports.push(ImportDeclaration::of_symbol(namespace_name, symbol));
        }
        for import in imports {
            tree.add_import(owner, import)?;
        }
        Ok(())
    })
}

/// Registers the configured serialization modules on client constructors.
///
/// Each module is a `namespace.Symbol` reference; the client class imports it.
pub fn add_serialization_modules_import(
    tree: &mut CodeTree,
    serializers: &[String],
    deserializers: &[String],
) -> Result<(), RefineError> {
    let root = tree.root();
    let mut clients = 0usize;
    crawl(tree, root, of_kind(ElementKind::Method), |tree, id| -> Result<(), RefineError> {
        let Some(method) = tree
            .get_mut(id)
            .and_then(CodeElement::as_method_mut)
            .filter(|m| m.kind == MethodKind::ClientConstructor)
        else {
            return Ok(());
        };
        for module in serializers {
            if !method.serializer_modules.contains(module) {
                method.serializer_modules.push(module.clone());
            }
        }
        for module in deserializers {
            if !method.deserializer_modules.contains(module) {
                method.deserializer_modules.push(module.clone());
            }
        }
        clients += 1;
        let Some(class) = tree.parent(id) else {
            return Ok(());
        };
        for module in serializers.iter().chain(deserializers) {
            if let Some((namespace, symbol)) = split_module(module) {
                let declaration = TypeReference::external(symbol).nullable(false);
                tree.add_import(class, ImportDeclaration::of_symbol(namespace, declaration))?;
            }
        }
        Ok(())
    })?;
    debug!(clients, "Registered serialization modules.");
    Ok(())
}

/// Replaces the abstract `binary` type with a native symbol imported from `namespace`.
pub fn replace_binary_by_native_type(
    tree: &mut CodeTree,
    symbol: &str,
    namespace: &str,
) -> Result<(), RefineError> {
    let root = tree.root();
    let mut owners = BTreeSet::new();
    crawl(
        tree,
        root,
        |tree, id| tree.get(id).is_some_and(|e| e.kind() != ElementKind::Import),
        |tree, id| -> Result<(), RefineError> {
            let mut replaced = false;
            tree.element_mut(id)?.for_each_type_reference_mut(&mut |t| {
                let is_binary = !t.is_external
                    && t.type_definition.is_none()
                    && PrimitiveType::from_abstract(&t.name) == Some(PrimitiveType::Binary);
                if is_binary {
                    symbol.clone_into(&mut t.name);
                    t.is_external = true;
                    replaced = true;
                }
            });
            if replaced {
                owners.extend(import_owner_of(tree, id));
            }
            Ok(())
        },
    )?;
    for owner in &owners {
        tree.add_import(*owner, ImportDeclaration::new(namespace))?;
    }
    debug!(owners = owners.len(), symbol, "Replaced binary types.");
    Ok(())
}

/// Re-points symbol imports at the current name of their definition's namespace.
pub(crate) fn refresh_import_namespaces(tree: &mut CodeTree) {
    let updates: Vec<(ElementId, String)> = tree
        .ids()
        .filter_map(|id| {
            let import = tree.get(id)?.as_import()?;
            let definition = import.declaration.as_ref()?.type_definition?;
            let namespace = tree.namespace_of(definition)?;
            let name = tree.get(namespace)?.name();
            (import.name != name).then(|| (id, name.to_string()))
        })
        .collect();
    for (id, name) in updates {
        if let Some(import) = tree.get_mut(id).and_then(CodeElement::as_import_mut) {
            import.name = name;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use sdkgen_dom::{CodeClass, CodeMethod, CodeNamespace, CodeProperty, PropertyKind};

    fn import_keys(tree: &CodeTree, owner: ElementId) -> Vec<(String, Option<String>)> {
        tree.children_of_kind(owner, ElementKind::Import)
            .into_iter()
            .filter_map(|id| tree.get(id).and_then(CodeElement::as_import))
            .map(|i| (i.name.clone(), i.declaration.as_ref().map(|d| d.name.clone())))
            .collect()
    }

    const TABLE: DefaultImportTable = DefaultImportTable {
        common: &["System"],
        by_kind: &[(ClassKind::RequestBuilder, &["System.Threading.Tasks", "System"])],
    };

    #[test]
    fn test_default_imports_by_kind_and_deduplicated() {
        let mut tree = CodeTree::new("api");
        let model = tree.add_class(tree.root(), CodeClass::new("User", ClassKind::Model)).unwrap();
        let builder = tree
            .add_class(
                tree.root(),
                CodeClass::new("UsersRequestBuilder", ClassKind::RequestBuilder),
            )
            .unwrap();
        add_default_imports(&mut tree, &TABLE).unwrap();
        add_default_imports(&mut tree, &TABLE).unwrap();
        assert_eq!(import_keys(&tree, model), [("System".to_string(), None)]);
        assert_eq!(import_keys(&tree, builder).len(), 2);
    }

    #[test]
    fn test_type_imports_respect_scope() {
        let mut tree = CodeTree::new("api");
        let root = tree.root();
        let models = tree.add_namespace(root, CodeNamespace::new("api.models")).unwrap();
        let user = tree.add_class(models, CodeClass::new("User", ClassKind::Model)).unwrap();
        let root_model = tree.add_class(root, CodeClass::new("Entity", ClassKind::Model)).unwrap();
        let sibling = tree.add_class(models, CodeClass::new("Group", ClassKind::Model)).unwrap();
        for (name, target, id) in [("entity", "Entity", root_model), ("member", "User", user)] {
            tree.add_property(
                sibling,
                CodeProperty::new(
                    name,
                    PropertyKind::Custom,
                    TypeReference::to_definition(target, id),
                ),
            )
            .unwrap();
        }
        let builder = tree
            .add_class(root, CodeClass::new("MeRequestBuilder", ClassKind::RequestBuilder))
            .unwrap();
        tree.add_method(
            builder,
            CodeMethod::new("Get", MethodKind::Custom)
                .returning(TypeReference::to_definition("User", user)),
        )
        .unwrap();

        add_properties_and_method_types_imports(&mut tree, ImportScope::default()).unwrap();
        assert!(import_keys(&tree, sibling).is_empty());
        assert_eq!(
            import_keys(&tree, builder),
            [("api.models".to_string(), Some("User".to_string()))]
        );

        let scope = ImportScope {
            include_parent_namespaces: true,
            include_current_namespace: true,
        };
        add_properties_and_method_types_imports(&mut tree, scope).unwrap();
        assert_eq!(import_keys(&tree, sibling).len(), 2);
    }

    #[test]
    fn test_serialization_modules_registered_on_client() {
        let mut tree = CodeTree::new("api");
        let client = tree
            .add_class(tree.root(), CodeClass::new("ApiClient", ClassKind::RequestBuilder))
            .unwrap();
        let ctor = tree
            .add_method(client, CodeMethod::new("constructor", MethodKind::ClientConstructor))
            .unwrap();
        let serializers = vec!["Sdk.Json.JsonWriterFactory".to_string()];
        let deserializers = vec!["Sdk.Json.JsonParseNodeFactory".to_string()];
        add_serialization_modules_import(&mut tree, &serializers, &deserializers).unwrap();
        add_serialization_modules_import(&mut tree, &serializers, &deserializers).unwrap();
        let method = tree.get(ctor).and_then(CodeElement::as_method).unwrap();
        assert_eq!(method.serializer_modules, serializers);
        assert_eq!(method.deserializer_modules, deserializers);
        assert_eq!(
            import_keys(&tree, client),
            [
                ("Sdk.Json".to_string(), Some("JsonWriterFactory".to_string())),
                ("Sdk.Json".to_string(), Some("JsonParseNodeFactory".to_string())),
            ]
        );
    }

    #[test]
    fn test_binary_becomes_native_symbol() {
        let mut tree = CodeTree::new("api");
        let builder = tree
            .add_class(
                tree.root(),
                CodeClass::new("ContentRequestBuilder", ClassKind::RequestBuilder),
            )
            .unwrap();
        let get = tree
            .add_method(
                builder,
                CodeMethod::new("Get", MethodKind::Custom).returning(TypeReference::new("binary")),
            )
            .unwrap();
        replace_binary_by_native_type(&mut tree, "Stream", "System.IO").unwrap();
        let ret = tree
            .get(get)
            .and_then(CodeElement::as_method)
            .and_then(|m| m.return_type.clone())
            .unwrap();
        assert_eq!(ret.name, "Stream");
        assert!(ret.is_external);
        assert_eq!(import_keys(&tree, builder), [("System.IO".to_string(), None)]);
    }
}
