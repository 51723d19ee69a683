use sdkgen_dom::{
    crawl, of_kind, ClassKind, CodeElement, CodeTree, CollectionKind, ElementKind,
    ImportDeclaration,
};
use tracing::debug;

use super::LanguageRefiner;
use crate::config::{GenerationConfiguration, GenerationLanguage};
use crate::conventions::JavaConventions;
use crate::error::RefineError;
use crate::pipeline::{PassId, Pipeline};
use crate::toolbox::{
    add_backing_store, add_constructors_for_default_values, add_default_imports,
    add_getter_and_setter_methods, add_parsable_implementation,
    add_properties_and_method_types_imports, add_serialization_modules_import,
    capture_serialization_names, convert_union_types_to_wrapper, make_enum_properties_nullable,
    replace_binary_by_native_type, replace_reserved_names, BackingStoreSettings, DefaultImportTable,
    ImportScope,
};

const SERIALIZATION_PACKAGE: &str = "io.sdkgen.serialization";
const ENUM_SET_IMPORT: &str = "java.util.EnumSet";

const DEFAULT_IMPORTS: DefaultImportTable = DefaultImportTable {
    common: &["java.util.List", "java.util.Map"],
    by_kind: &[
        (
            ClassKind::RequestBuilder,
            &["io.sdkgen.abstractions", "java.util.concurrent.CompletableFuture"],
        ),
        (ClassKind::Model, &[SERIALIZATION_PACKAGE]),
    ],
};

const BACKING_STORE: BackingStoreSettings = BackingStoreSettings {
    interface: "BackedModel",
    store_type: "BackingStore",
    module: "io.sdkgen.store",
};

fn escape_reserved(name: &str) -> String {
    format!("{name}Escaped")
}

/// Lowers properties typed by flag enums to `EnumSet` collections.
fn convert_flag_enums_to_enum_sets(tree: &mut CodeTree) -> Result<(), RefineError> {
    let root = tree.root();
    let mut converted = 0usize;
    crawl(tree, root, of_kind(ElementKind::Property), |tree, id| -> Result<(), RefineError> {
        let is_flags = tree
            .get(id)
            .and_then(CodeElement::as_property)
            .filter(|p| !p.type_.is_collection())
            .and_then(|p| tree.resolve(&p.type_))
            .and_then(CodeElement::as_enum)
            .is_some_and(|e| e.flags);
        if !is_flags {
            return Ok(());
        }
        if let Some(property) = tree.get_mut(id).and_then(CodeElement::as_property_mut) {
            property.type_.collection_kind = CollectionKind::Complex;
        }
        if let Some(owner) = tree.parent(id) {
            tree.add_import(owner, ImportDeclaration::new(ENUM_SET_IMPORT))?;
        }
        converted += 1;
        Ok(())
    })?;
    debug!(converted, "Converted flag enum properties to EnumSet.");
    Ok(())
}

/// Java client.
#[derive(Debug, Clone)]
pub struct JavaRefiner {
    config: GenerationConfiguration,
}

impl JavaRefiner {
    /// Refiner for `config`.
    pub fn new(config: GenerationConfiguration) -> Self {
        Self { config }
    }
}

impl LanguageRefiner for JavaRefiner {
    fn language(&self) -> GenerationLanguage {
        GenerationLanguage::Java
    }

    fn configuration(&self) -> &GenerationConfiguration {
        &self.config
    }

    fn pipeline(&self) -> Pipeline<'_> {
        let config = &self.config;
        let scope = ImportScope {
            include_parent_namespaces: true,
            include_current_namespace: false,
        };
        Pipeline::new(GenerationLanguage::Java)
            .pass(PassId::AddDefaultImports, |tree| add_default_imports(tree, &DEFAULT_IMPORTS))
            .pass(PassId::ConvertUnionTypesToWrapper, convert_union_types_to_wrapper)
            .pass(PassId::AddPropertiesAndMethodTypesImports, move |tree| {
                add_properties_and_method_types_imports(tree, scope)
            })
            .pass(
                PassId::Bespoke("convert-flag-enums-to-enum-sets"),
                convert_flag_enums_to_enum_sets,
            )
            .pass_when(config.uses_backing_store, PassId::AddBackingStore, |tree| {
                add_backing_store(tree, &BACKING_STORE)
            })
            .pass(PassId::AddParsableImplementation, |tree| {
                add_parsable_implementation(tree, "Parsable", SERIALIZATION_PACKAGE)
            })
            .pass(PassId::ReplaceBinaryByNativeType, |tree| {
                replace_binary_by_native_type(tree, "InputStream", "java.io")
            })
            .pass(PassId::MakeEnumPropertiesNullable, make_enum_properties_nullable)
            .pass(PassId::AddGetterAndSetterMethods, |tree| {
                add_getter_and_setter_methods(tree, "get", "set")
            })
            .pass(PassId::ReplaceReservedNames, |tree| {
                replace_reserved_names(tree, &JavaConventions, escape_reserved)
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
