use sdkgen_dom::ClassKind;

use super::LanguageRefiner;
use crate::config::{GenerationConfiguration, GenerationLanguage};
use crate::conventions::CSharpConventions;
use crate::naming::capitalize_first;
use crate::pipeline::{PassId, Pipeline};
use crate::toolbox::{
    add_async_suffix, add_backing_store, add_constructors_for_default_values, add_default_imports,
    add_parsable_implementation, add_properties_and_method_types_imports,
    add_serialization_modules_import, capitalize_namespaces_first_letters,
    capture_serialization_names, convert_union_types_to_wrapper,
    disambiguate_properties_with_class_names, make_enum_properties_nullable,
    move_classes_with_namespace_names_under_namespace, replace_binary_by_native_type,
    replace_reserved_names, BackingStoreSettings, DefaultImportTable, ImportScope,
};

const SERIALIZATION_NAMESPACE: &str = "Sdkgen.Abstractions.Serialization";

const DEFAULT_IMPORTS: DefaultImportTable = DefaultImportTable {
    common: &["System", "System.Collections.Generic", "System.Linq"],
    by_kind: &[
        (
            ClassKind::RequestBuilder,
            &["System.Threading", "System.Threading.Tasks", "Sdkgen.Abstractions"],
        ),
        (ClassKind::Model, &[SERIALIZATION_NAMESPACE]),
    ],
};

const BACKING_STORE: BackingStoreSettings = BackingStoreSettings {
    interface: "IBackedModel",
    store_type: "IBackingStore",
    module: "Sdkgen.Abstractions.Store",
};

fn escape_reserved(name: &str) -> String {
    format!("@{}", capitalize_first(name))
}

/// C# client.
#[derive(Debug, Clone)]
pub struct CSharpRefiner {
    config: GenerationConfiguration,
}

impl CSharpRefiner {
    /// Refiner for `config`.
    pub fn new(config: GenerationConfiguration) -> Self {
        Self { config }
    }
}

impl LanguageRefiner for CSharpRefiner {
    fn language(&self) -> GenerationLanguage {
        GenerationLanguage::CSharp
    }

    fn configuration(&self) -> &GenerationConfiguration {
        &self.config
    }

    fn pipeline(&self) -> Pipeline<'_> {
        let config = &self.config;
        Pipeline::new(GenerationLanguage::CSharp)
            .pass(PassId::AddDefaultImports, |tree| add_default_imports(tree, &DEFAULT_IMPORTS))
            .pass(
                PassId::MoveClassesWithNamespaceNamesUnderNamespace,
                move_classes_with_namespace_names_under_namespace,
            )
            .pass(PassId::ConvertUnionTypesToWrapper, convert_union_types_to_wrapper)
            .pass(PassId::AddPropertiesAndMethodTypesImports, |tree| {
                add_properties_and_method_types_imports(tree, ImportScope::default())
            })
            .pass_when(config.uses_backing_store, PassId::AddBackingStore, |tree| {
                add_backing_store(tree, &BACKING_STORE)
            })
            .pass(PassId::AddParsableImplementation, |tree| {
                add_parsable_implementation(tree, "IParsable", SERIALIZATION_NAMESPACE)
            })
            .pass(PassId::CapitalizeNamespacesFirstLetters, capitalize_namespaces_first_letters)
            .pass(PassId::AddAsyncSuffix, add_async_suffix)
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
    fn test_backing_store_follows_configuration() {
        let mut config = GenerationConfiguration::new(
            GenerationLanguage::CSharp,
            "ApiClient",
            "Sdk",
        );
        let without = CSharpRefiner::new(config.clone()).pipeline().pass_ids();
        config.uses_backing_store = true;
        let with = CSharpRefiner::new(config).pipeline().pass_ids();
        assert!(!without.contains(&PassId::AddBackingStore));
        assert!(with.contains(&PassId::AddBackingStore));
        assert_eq!(with.len(), without.len() + 1);
    }

    #[test]
    fn test_reserved_escape_prefixes_and_capitalizes() {
        assert_eq!(escape_reserved("class"), "@Class");
    }
}
