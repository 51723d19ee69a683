use sdkgen_dom::{crawl, CodeElement, CodeTree, ElementId};
use tracing::debug;

use super::refresh_import_namespaces;
use crate::conventions::LanguageConventions;
use crate::error::{ConfigurationError, RefineError};

/// Rewrites an identifier that collides with a reserved word.
pub type RenameFn = fn(&str) -> String;

/// Renames every identifier colliding with the target's reserved words.
///
/// Namespace names are handled segment by segment. Serializable properties
/// keep their old identifier as wire name, and type references follow renamed
/// classes, interfaces and enums.
pub fn replace_reserved_names(
    tree: &mut CodeTree,
    conventions: &dyn LanguageConventions,
    rename: RenameFn,
) -> Result<(), RefineError> {
    let root = tree.root();
    let mut renamed = 0usize;
    let mut namespaces_changed = false;
    crawl(tree, root, |_, _| true, |tree, id| -> Result<(), RefineError> {
        let mut retarget = None;
        match tree.element_mut(id)? {
            CodeElement::Namespace(namespace) => {
                let segments = namespace
                    .name
                    .split('.')
                    .map(|segment| {
                        Ok(replacement(conventions, rename, segment)?
                            .unwrap_or_else(|| segment.to_string()))
                    })
                    .collect::<Result<Vec<_>, RefineError>>()?;
                let name = segments.join(".");
                if name != namespace.name {
                    namespace.name = name;
                    namespaces_changed = true;
                    renamed += 1;
                }
            }
            CodeElement::Class(class) => {
                if let Some(name) = replacement(conventions, rename, &class.name)? {
                    class.name.clone_from(&name);
                    retarget = Some(name);
                }
            }
            CodeElement::Interface(interface) => {
                if let Some(name) = replacement(conventions, rename, &interface.name)? {
                    interface.name.clone_from(&name);
                    retarget = Some(name);
                }
            }
            CodeElement::Enum(code_enum) => {
                for member in &mut code_enum.members {
                    if let Some(name) = replacement(conventions, rename, member)? {
                        *member = name;
                        renamed += 1;
                    }
                }
                if let Some(name) = replacement(conventions, rename, &code_enum.name)? {
                    code_enum.name.clone_from(&name);
                    retarget = Some(name);
                }
            }
            // constructors are spelled by the writer
            CodeElement::Method(method) if !method.kind.is_constructor() => {
                if let Some(name) = replacement(conventions, rename, &method.name)? {
                    method.name = name;
                    renamed += 1;
                }
            }
            CodeElement::Property(property) => {
                if let Some(name) = replacement(conventions, rename, &property.name)? {
                    if property.is_serializable() {
                        property.capture_serialization_name();
                    }
                    property.name = name;
                    renamed += 1;
                }
            }
            CodeElement::Parameter(parameter) => {
                if let Some(name) = replacement(conventions, rename, &parameter.name)? {
                    parameter.name = name;
                    renamed += 1;
                }
            }
            CodeElement::Method(_) | CodeElement::Import(_) => {}
        }
        if let Some(name) = retarget {
            retarget_definition(tree, id, &name);
            renamed += 1;
        }
        Ok(())
    })?;
    if namespaces_changed {
        refresh_import_namespaces(tree);
    }
    debug!(renamed, "Replaced reserved names.");
    Ok(())
}

fn retarget_definition(tree: &mut CodeTree, id: ElementId, name: &str) {
    debug!(element = %tree.qualified_path(id), name, "Renamed reserved type name.");
    tree.retarget_type_name(id, name);
}

fn replacement(
    conventions: &dyn LanguageConventions,
    rename: RenameFn,
    name: &str,
) -> Result<Option<String>, RefineError> {
    if !conventions.is_reserved(name) {
        return Ok(None);
    }
    let replaced = rename(name);
    if replaced == name || conventions.is_reserved(&replaced) {
        return Err(ConfigurationError::Invalid {
            field: "rename",
            reason: format!("renaming reserved identifier '{name}' produced '{replaced}'"),
        }
        .into());
    }
    Ok(Some(replaced))
}
