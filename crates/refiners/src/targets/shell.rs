use sdkgen_dom::ClassKind;

use super::LanguageRefiner;
use crate::config::{GenerationConfiguration, GenerationLanguage};
use crate::conventions::CSharpConventions;
use crate::naming::capitalize_first;
use crate::pipeline::{PassId, Pipeline};
use crate::toolbox::{
    add_async_suffix, add_constructors_for_default_values, add_default_imports,
    add_properties_and_method_types_imports, add_serialization_modules_import,
    capitalize_namespaces_first_letters, capture_serialization_names,
    convert_union_types_to_wrapper, disambiguate_properties_with_class_names,
    make_enum_properties_nullable, move_classes_with_namespace_names_under_namespace,
    remove_constructors, remove_enums, remove_model_classes, replace_binary_by_native_type,
    replace_reserved_names, turn_request_builders_into_command_builders, DefaultImportTable,
    ImportScope,
};

const DEFAULT_IMPORTS: DefaultImportTable = DefaultImportTable {
    common: &["System", "System.Collections.Generic", "System.Linq"],
    by_kind: &[(
        ClassKind::RequestBuilder,
        &[
            "System.Threading.Tasks",
            "System.IO",
            "Sdkgen.Abstractions",
            "Sdkgen.Abstractions.Serialization",
            "System.CommandLine",
            "System.CommandLine.Invocation",
        ],
    )],
};

fn escape_reserved(name: &str) -> String {
    format!("@{}", capitalize_first(name))
}

/// Command-line client built on `System.CommandLine`.
///
/// Request builders become static command factories and the data model is
/// dropped, since commands print raw payloads.
#[derive(Debug, Clone)]
pub struct ShellRefiner {
    config: GenerationConfiguration,
}

impl ShellRefiner {
    /// Refiner for `config`.
    pub fn new(config: GenerationConfiguration) -> Self {
        Self { config }
    }
}

impl LanguageRefiner for ShellRefiner {
    fn language(&self) -> GenerationLanguage {
        GenerationLanguage::Shell
    }

    fn configuration(&self) -> &GenerationConfiguration {
        &self.config
    }

    fn pipeline(&self) -> Pipeline<'_> {
        let config = &self.config;
        Pipeline::new(GenerationLanguage::Shell)
            .pass(PassId::AddDefaultImports, |tree| add_default_imports(tree, &DEFAULT_IMPORTS))
            .pass(
                PassId::MoveClassesWithNamespaceNamesUnderNamespace,
                move_classes_with_namespace_names_under_namespace,
            )
            .pass(PassId::ConvertUnionTypesToWrapper, convert_union_types_to_wrapper)
            .pass(PassId::AddPropertiesAndMethodTypesImports, |tree| {
                add_properties_and_method_types_imports(tree, ImportScope::default())
            })
            .pass(
                PassId::TurnRequestBuildersIntoCommandBuilders,
                turn_request_builders_into_command_builders,
            )
            .pass(PassId::RemoveModelClasses, remove_model_classes)
            .pass(PassId::RemoveEnums, remove_enums)
            .pass(PassId::RemoveConstructors, remove_constructors)
            .pass(PassId::AddAsyncSuffix, add_async_suffix)
            .pass(PassId::CapitalizeNamespacesFirstLetters, capitalize_namespaces_first_letters)
            .pass(PassId::ReplaceBinaryByNativeType, |tree| {
                replace_binary_by_native_type(tree, "Stream", "System.IO")
            })
            .pass(PassId::MakeEnumPropertiesNullable, make_enum_properties_nullable)
            .pass(PassId::ReplaceReservedNames, |tree| {
                replace_reserved_names(tree, &CSharpConventions, escape_reserved)
            })
            .pass(PassId::DisambiguatePropertiesWithClassNames, |tree| {
                disambiguate_properties_with_class_names(tree, "_prop")
            })
            .pass(PassId::AddConstructorsForDefaultValues, |tree| {
                add_constructors_for_default_values(tree, false)
            })
            .pass(PassId::AddSerializationModulesImport, move |tree| {
                add_serialization_modules_import(tree, &config.serializers, &config.deserializers)
            })
            .pass(PassId::CaptureSerializationNames, capture_serialization_names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builders_run_before_model_removal() {
        let refiner = ShellRefiner::new(GenerationConfiguration::new(
            GenerationLanguage::Shell,
            "ApiClient",
            "Sdk",
        ));
        let ids = refiner.pipeline().pass_ids();
        let position = |id| ids.iter().position(|x| *x == id);
        assert!(
            position(PassId::TurnRequestBuildersIntoCommandBuilders)
                < position(PassId::RemoveModelClasses)
        );
        assert!(
            position(PassId::AddPropertiesAndMethodTypesImports)
                < position(PassId::TurnRequestBuildersIntoCommandBuilders)
        );
        assert_eq!(ids.last(), Some(&PassId::CaptureSerializationNames));
    }
}
