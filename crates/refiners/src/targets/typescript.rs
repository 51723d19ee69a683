use std::collections::BTreeSet;

use sdkgen_dom::{
    crawl, ClassKind, CodeTree, ElementId, ElementKind, ImportDeclaration, TypeReference,
};
use tracing::debug;

use super::LanguageRefiner;
use crate::config::{GenerationConfiguration, GenerationLanguage};
use crate::conventions::{LanguageConventions, PrimitiveType, TypeScriptConventions};
use crate::error::RefineError;
use crate::pipeline::{PassId, Pipeline};
use crate::toolbox::{
    add_constructors_for_default_values, add_default_imports, add_parsable_implementation,
    add_properties_and_method_types_imports, add_serialization_modules_import,
    capture_serialization_names, convert_union_types_to_wrapper, import_owner_of,
    replace_reserved_names, DefaultImportTable, ImportScope,
};

const ABSTRACTIONS_MODULE: &str = "@sdkgen/abstractions";
const GUID_MODULE: &str = "guid-typescript";

const DEFAULT_IMPORTS: DefaultImportTable = DefaultImportTable {
    common: &[],
    by_kind: &[
        (ClassKind::RequestBuilder, &[ABSTRACTIONS_MODULE]),
        (ClassKind::Model, &[ABSTRACTIONS_MODULE]),
    ],
};

fn escape_reserved(name: &str) -> String {
    format!("{name}Escaped")
}

/// Module a corrected core type is imported from. `Date` is built in.
fn core_type_module(primitive: PrimitiveType) -> Option<&'static str> {
    match primitive {
        PrimitiveType::Date | PrimitiveType::Time | PrimitiveType::Duration => {
            Some(ABSTRACTIONS_MODULE)
        }
        PrimitiveType::Guid => Some(GUID_MODULE),
        _ => None,
    }
}

/// Spells abstract date, time and identifier types the way TypeScript code uses them.
fn correct_core_types(tree: &mut CodeTree) -> Result<(), RefineError> {
    let root = tree.root();
    let mut needed: BTreeSet<(ElementId, &'static str, &'static str)> = BTreeSet::new();
    crawl(
        tree,
        root,
        |tree, id| tree.get(id).is_some_and(|e| e.kind() != ElementKind::Import),
        |tree, id| -> Result<(), RefineError> {
            let mut symbols = Vec::new();
            tree.element_mut(id)?.for_each_type_reference_mut(&mut |t| {
                if t.is_external || t.type_definition.is_some() {
                    return;
                }
                let Some(primitive) = PrimitiveType::from_abstract(&t.name) else {
                    return;
                };
                if !matches!(
                    primitive,
                    PrimitiveType::Date
                        | PrimitiveType::DateTime
                        | PrimitiveType::Time
                        | PrimitiveType::Duration
                        | PrimitiveType::Guid
                ) {
                    return;
                }
                let native = TypeScriptConventions.native_type(primitive);
                native.clone_into(&mut t.name);
                t.is_external = true;
                if let Some(module) = core_type_module(primitive) {
                    symbols.push((module, native));
                }
            });
            if let Some(owner) = import_owner_of(tree, id) {
                needed.extend(symbols.into_iter().map(|(module, native)| (owner, module, native)));
            }
            Ok(())
        },
    )?;
    for (owner, module, symbol) in &needed {
        tree.add_import(
            *owner,
            ImportDeclaration::of_symbol(*module, TypeReference::external(*symbol).nullable(false)),
        )?;
    }
    debug!(imports = needed.len(), "Corrected core types.");
    Ok(())
}

/// TypeScript client.
#[derive(Debug, Clone)]
pub struct TypeScriptRefiner {
    config: GenerationConfiguration,
}

impl TypeScriptRefiner {
    /// Refiner for `config`.
    pub fn new(config: GenerationConfiguration) -> Self {
        Self { config }
    }
}

impl LanguageRefiner for TypeScriptRefiner {
    fn language(&self) -> GenerationLanguage {
        GenerationLanguage::TypeScript
    }

    fn configuration(&self) -> &GenerationConfiguration {
        &self.config
    }

    fn pipeline(&self) -> Pipeline<'_> {
        let config = &self.config;
        // every module imports what it uses, siblings included
        let scope = ImportScope {
            include_parent_namespaces: true,
            include_current_namespace: true,
        };
        Pipeline::new(GenerationLanguage::TypeScript)
            .pass(PassId::AddDefaultImports, |tree| add_default_imports(tree, &DEFAULT_IMPORTS))
            .pass(PassId::ConvertUnionTypesToWrapper, convert_union_types_to_wrapper)
            .pass(PassId::Bespoke("correct-core-types"), correct_core_types)
            .pass(PassId::AddPropertiesAndMethodTypesImports, move |tree| {
                add_properties_and_method_types_imports(tree, scope)
            })
            .pass(PassId::AddParsableImplementation, |tree| {
                add_parsable_implementation(tree, "Parsable", ABSTRACTIONS_MODULE)
            })
            .pass(PassId::ReplaceReservedNames, |tree| {
                replace_reserved_names(tree, &TypeScriptConventions, escape_reserved)
            })
            .pass(PassId::AddConstructorsForDefaultValues, |tree| {
                add_constructors_for_default_values(tree, true)
            })
            .pass(PassId::AddSerializationModulesImport, move |tree| {
                add_serialization_modules_import(tree, &config.serializers, &config.deserializers)
            })
            .pass(PassId::CaptureSerializationNames, capture_serialization_names)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use sdkgen_dom::{CodeClass, CodeElement, CodeProperty, PropertyKind};

    #[test]
    fn test_core_types_are_spelled_natively_and_imported() {
        let mut tree = CodeTree::new("api");
        let event = tree.add_class(tree.root(), CodeClass::new("Event", ClassKind::Model)).unwrap();
        let mut ids = Vec::new();
        for (name, ty) in [
            ("day", "date"),
            ("at", "datetime"),
            ("length", "duration"),
            ("id", "guid"),
            ("title", "string"),
        ] {
            ids.push(
                tree.add_property(
                    event,
                    CodeProperty::new(name, PropertyKind::Custom, TypeReference::new(ty)),
                )
                .unwrap(),
            );
        }
        correct_core_types(&mut tree).unwrap();
        correct_core_types(&mut tree).unwrap();

        let names: Vec<_> = ids
            .iter()
            .map(|id| tree.get(*id).and_then(CodeElement::as_property).unwrap().type_.name.clone())
            .collect();
        assert_eq!(names, ["DateOnly", "Date", "Duration", "Guid", "string"]);
        let imports: Vec<_> = tree
            .children_of_kind(event, ElementKind::Import)
            .into_iter()
            .filter_map(|id| tree.get(id).and_then(CodeElement::as_import))
            .map(|i| (i.name.as_str(), i.declaration.as_ref().map(|d| d.name.as_str())))
            .collect();
        assert_eq!(
            imports,
            [
                (ABSTRACTIONS_MODULE, Some("DateOnly")),
                (ABSTRACTIONS_MODULE, Some("Duration")),
                (GUID_MODULE, Some("Guid")),
            ]
        );
    }
}
