use sdkgen_dom::{crawl, CodeElement, CodeTree, ElementId, ElementKind};
use tracing::debug;

use super::LanguageRefiner;
use crate::config::{GenerationConfiguration, GenerationLanguage};
use crate::conventions::RubyConventions;
use crate::error::RefineError;
use crate::naming::to_snake_case;
use crate::pipeline::{PassId, Pipeline};
use crate::toolbox::{
    add_constructors_for_default_values, add_default_imports, add_parsable_implementation,
    add_properties_and_method_types_imports, add_serialization_modules_import,
    capture_serialization_names, convert_union_types_to_wrapper, replace_reserved_names,
    DefaultImportTable, ImportScope,
};

const ABSTRACTIONS_MODULE: &str = "sdkgen_abstractions";

const DEFAULT_IMPORTS: DefaultImportTable = DefaultImportTable {
    common: &[ABSTRACTIONS_MODULE],
    by_kind: &[],
};

fn escape_reserved(name: &str) -> String {
    format!("{name}_escaped")
}

/// Snake-cases method, property and parameter names.
///
/// Serialized properties keep their previous identifier as wire name. A new
/// name already used by a sibling of the same kind gets a counter suffix
/// (`display_name2`). Overloads share their original's name and are exempt.
fn snake_case_member_names(tree: &mut CodeTree) -> Result<(), RefineError> {
    let root = tree.root();
    let mut renamed = 0usize;
    crawl(
        tree,
        root,
        |tree, id| {
            tree.get(id).is_some_and(|e| {
                matches!(
                    e.kind(),
                    ElementKind::Method | ElementKind::Property | ElementKind::Parameter
                )
            })
        },
        |tree, id| -> Result<(), RefineError> {
            let element = tree.element(id)?;
            let old_name = element.name().to_string();
            let base = to_snake_case(&old_name);
            if base == old_name {
                return Ok(());
            }
            let mut name = base.clone();
            if !is_overload(element) {
                let mut counter = 2;
                while is_taken_by_sibling(tree, id, &name) {
                    name = format!("{base}{counter}");
                    counter += 1;
                }
            }
            match tree.element_mut(id)? {
                CodeElement::Property(property) => {
                    if property.is_serializable() {
                        property.capture_serialization_name();
                    }
                    property.name.clone_from(&name);
                }
                CodeElement::Method(method) => method.name.clone_from(&name),
                CodeElement::Parameter(parameter) => parameter.name.clone_from(&name),
                _ => return Ok(()),
            }
            if name != base {
                debug!(
                    path = %tree.qualified_path(id),
                    from = %old_name,
                    to = %name,
                    "Disambiguated snake-cased name."
                );
            }
            renamed += 1;
            Ok(())
        },
    )?;
    debug!(renamed, "Snake-cased member names.");
    Ok(())
}

fn is_overload(element: &CodeElement) -> bool {
    element.as_method().is_some_and(|m| m.is_overload())
}

/// Whether a sibling of `id` with the same kind, other than an overload, is named `name`.
fn is_taken_by_sibling(tree: &CodeTree, id: ElementId, name: &str) -> bool {
    let (Some(parent), Some(kind)) = (tree.parent(id), tree.get(id).map(CodeElement::kind)) else {
        return false;
    };
    tree.children(parent).iter().any(|sibling| {
        *sibling != id
            && tree
                .get(*sibling)
                .is_some_and(|e| e.kind() == kind && e.name() == name && !is_overload(e))
    })
}

/// Ruby client.
#[derive(Debug, Clone)]
pub struct RubyRefiner {
    config: GenerationConfiguration,
}

impl RubyRefiner {
    /// Refiner for `config`.
    pub fn new(config: GenerationConfiguration) -> Self {
        Self { config }
    }
}

impl LanguageRefiner for RubyRefiner {
    fn language(&self) -> GenerationLanguage {
        GenerationLanguage::Ruby
    }

    fn configuration(&self) -> &GenerationConfiguration {
        &self.config
    }

    fn pipeline(&self) -> Pipeline<'_> {
        let config = &self.config;
        let scope = ImportScope {
            include_parent_namespaces: true,
            include_current_namespace: true,
        };
        Pipeline::new(GenerationLanguage::Ruby)
            .pass(PassId::AddDefaultImports, |tree| add_default_imports(tree, &DEFAULT_IMPORTS))
            .pass(PassId::ConvertUnionTypesToWrapper, convert_union_types_to_wrapper)
            .pass(PassId::AddPropertiesAndMethodTypesImports, move |tree| {
                add_properties_and_method_types_imports(tree, scope)
            })
            .pass(PassId::AddParsableImplementation, |tree| {
                add_parsable_implementation(tree, "Parsable", ABSTRACTIONS_MODULE)
            })
            .pass(PassId::Bespoke("snake-case-member-names"), snake_case_member_names)
            .pass(PassId::ReplaceReservedNames, |tree| {
                replace_reserved_names(tree, &RubyConventions, escape_reserved)
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
