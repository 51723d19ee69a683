use sdkgen_dom::{
    crawl, ClassKind, CodeElement, CodeMethod, CodeTree, ElementId, ElementKind, MethodKind,
    PropertyKind,
};
use tracing::debug;

use super::LanguageRefiner;
use crate::config::{GenerationConfiguration, GenerationLanguage};
use crate::conventions::GoConventions;
use crate::error::{RefineError, UnsupportedConstructError};
use crate::naming::capitalize_first;
use crate::pipeline::{PassId, Pipeline};
use crate::toolbox::{
    add_constructors_for_default_values, add_default_imports, add_getter_and_setter_methods,
    add_parsable_implementation, add_properties_and_method_types_imports,
    add_serialization_modules_import, capture_serialization_names, convert_union_types_to_wrapper,
    replace_reserved_names, DefaultImportTable, ImportScope,
};

const ABSTRACTIONS_MODULE: &str = "github.com/sdkgen/abstractions-go";
const SERIALIZATION_MODULE: &str = "github.com/sdkgen/abstractions-go/serialization";

const DEFAULT_IMPORTS: DefaultImportTable = DefaultImportTable {
    common: &[],
    by_kind: &[
        (ClassKind::RequestBuilder, &[ABSTRACTIONS_MODULE, "context"]),
        (ClassKind::Model, &[SERIALIZATION_MODULE]),
    ],
};

fn escape_reserved(name: &str) -> String {
    format!("{name}Escaped")
}

fn is_request_builder(tree: &CodeTree, id: ElementId) -> bool {
    tree.get(id)
        .and_then(CodeElement::as_class)
        .is_some_and(|c| c.kind == ClassKind::RequestBuilder)
}

/// Go structs expose navigation through methods rather than fields.
fn turn_navigation_properties_into_methods(tree: &mut CodeTree) -> Result<(), RefineError> {
    let root = tree.root();
    let mut converted = 0usize;
    crawl(tree, root, is_request_builder, |tree, class| -> Result<(), RefineError> {
        for id in tree.children_of_kind(class, ElementKind::Property) {
            let Some(property) = tree
                .get(id)
                .and_then(CodeElement::as_property)
                .filter(|p| p.kind == PropertyKind::RequestBuilder)
            else {
                continue;
            };
            let name = capitalize_first(&property.name);
            let mut method = CodeMethod::new(
                name.as_str(),
                MethodKind::RequestBuilderBackwardCompatibility,
            )
            .returning(property.type_.clone().nullable(false));
            method.description = property.description.clone();
            if tree.find_child(class, ElementKind::Method, &name).is_some() {
                return Err(UnsupportedConstructError::new(
                    format!("navigation property colliding with method '{name}'"),
                    tree.qualified_path(id),
                )
                .into());
            }
            tree.add_method(class, method)?;
            tree.remove_and_clear(id)?;
            converted += 1;
        }
        Ok(())
    })?;
    debug!(converted, "Turned navigation properties into methods.");
    Ok(())
}

/// Go client.
#[derive(Debug, Clone)]
pub struct GoRefiner {
    config: GenerationConfiguration,
}

impl GoRefiner {
    /// Refiner for `config`.
    pub fn new(config: GenerationConfiguration) -> Self {
        Self { config }
    }
}

impl LanguageRefiner for GoRefiner {
    fn language(&self) -> GenerationLanguage {
        GenerationLanguage::Go
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
        Pipeline::new(GenerationLanguage::Go)
            .pass(PassId::AddDefaultImports, |tree| add_default_imports(tree, &DEFAULT_IMPORTS))
            .pass(PassId::ConvertUnionTypesToWrapper, convert_union_types_to_wrapper)
            .pass(
                PassId::Bespoke("turn-navigation-properties-into-methods"),
                turn_navigation_properties_into_methods,
            )
            .pass(PassId::AddPropertiesAndMethodTypesImports, move |tree| {
                add_properties_and_method_types_imports(tree, scope)
            })
            .pass(PassId::AddParsableImplementation, |tree| {
                add_parsable_implementation(tree, "Parsable", SERIALIZATION_MODULE)
            })
            .pass(PassId::AddGetterAndSetterMethods, |tree| {
                add_getter_and_setter_methods(tree, "Get", "Set")
            })
            .pass(PassId::ReplaceReservedNames, |tree| {
                replace_reserved_names(tree, &GoConventions, escape_reserved)
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
    use sdkgen_dom::{CodeClass, CodeProperty, TypeReference};

    fn builder_with_navigation() -> (CodeTree, ElementId, ElementId) {
        let mut tree = CodeTree::new("api");
        let me = tree
            .add_class(tree.root(), CodeClass::new("MeRequestBuilder", ClassKind::RequestBuilder))
            .unwrap();
        let messages = tree
            .add_class(
                tree.root(),
                CodeClass::new("MessagesRequestBuilder", ClassKind::RequestBuilder),
            )
            .unwrap();
        tree.add_property(
            me,
            CodeProperty::new(
                "messages",
                PropertyKind::RequestBuilder,
                TypeReference::to_definition("MessagesRequestBuilder", messages),
            ),
        )
        .unwrap();
        (tree, me, messages)
    }

    #[test]
    fn test_navigation_property_becomes_method() {
        let (mut tree, me, messages) = builder_with_navigation();
        turn_navigation_properties_into_methods(&mut tree).unwrap();
        turn_navigation_properties_into_methods(&mut tree).unwrap();
        assert!(tree.children_of_kind(me, ElementKind::Property).is_empty());
        let method = tree.find_child(me, ElementKind::Method, "Messages").unwrap();
        let method = tree.get(method).and_then(CodeElement::as_method).unwrap();
        assert_eq!(method.return_type.as_ref().unwrap().type_definition, Some(messages));
    }

    #[test]
    fn test_collision_with_existing_method_is_unsupported() {
        let (mut tree, me, _) = builder_with_navigation();
        tree.add_method(
            me,
            CodeMethod::new("Messages", MethodKind::Custom).returning(TypeReference::new("string")),
        )
        .unwrap();
        let err = turn_navigation_properties_into_methods(&mut tree).unwrap_err();
        assert!(err.is_target_local());
    }
}
