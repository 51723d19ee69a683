//! Ordered pass lists with declared prerequisites.
//!
//! A target assembles a [`Pipeline`] of named steps. Before anything runs the
//! pipeline checks that every pass comes after the passes it depends on, then
//! validates the input tree, runs the steps inside a tracing span, re-checks
//! reference integrity after each one and validates the writer guarantees at
//! the end.

use std::fmt;

use sdkgen_dom::{validate, CodeTree};
use tracing::{debug, info_span};

use crate::config::GenerationLanguage;
use crate::error::{ConfigurationError, RefineError};

/// Identity of a pass, used for ordering rules and error attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassId {
    /// [`crate::toolbox::add_default_imports`]
    AddDefaultImports,
    /// [`crate::toolbox::move_classes_with_namespace_names_under_namespace`]
    MoveClassesWithNamespaceNamesUnderNamespace,
    /// [`crate::toolbox::convert_union_types_to_wrapper`]
    ConvertUnionTypesToWrapper,
    /// [`crate::toolbox::add_properties_and_method_types_imports`]
    AddPropertiesAndMethodTypesImports,
    /// [`crate::toolbox::turn_request_builders_into_command_builders`]
    TurnRequestBuildersIntoCommandBuilders,
    /// [`crate::toolbox::remove_model_classes`]
    RemoveModelClasses,
    /// [`crate::toolbox::remove_enums`]
    RemoveEnums,
    /// [`crate::toolbox::remove_constructors`]
    RemoveConstructors,
    /// [`crate::toolbox::add_async_suffix`]
    AddAsyncSuffix,
    /// [`crate::toolbox::capitalize_namespaces_first_letters`]
    CapitalizeNamespacesFirstLetters,
    /// [`crate::toolbox::replace_binary_by_native_type`]
    ReplaceBinaryByNativeType,
    /// [`crate::toolbox::make_enum_properties_nullable`]
    MakeEnumPropertiesNullable,
    /// [`crate::toolbox::replace_reserved_names`]
    ReplaceReservedNames,
    /// [`crate::toolbox::disambiguate_properties_with_class_names`]
    DisambiguatePropertiesWithClassNames,
    /// [`crate::toolbox::add_constructors_for_default_values`]
    AddConstructorsForDefaultValues,
    /// [`crate::toolbox::add_serialization_modules_import`]
    AddSerializationModulesImport,
    /// [`crate::toolbox::add_getter_and_setter_methods`]
    AddGetterAndSetterMethods,
    /// [`crate::toolbox::add_parsable_implementation`]
    AddParsableImplementation,
    /// [`crate::toolbox::add_backing_store`]
    AddBackingStore,
    /// [`crate::toolbox::capture_serialization_names`]
    CaptureSerializationNames,
    /// A pass only one target runs.
    Bespoke(&'static str),
}

impl PassId {
    /// Kebab-case name used in logs and errors.
    pub fn name(self) -> &'static str {
        match self {
            PassId::AddDefaultImports => "add-default-imports",
            PassId::MoveClassesWithNamespaceNamesUnderNamespace => {
                "move-classes-with-namespace-names-under-namespace"
            }
            PassId::ConvertUnionTypesToWrapper => "convert-union-types-to-wrapper",
            PassId::AddPropertiesAndMethodTypesImports => "add-properties-and-method-types-imports",
            PassId::TurnRequestBuildersIntoCommandBuilders => {
                "turn-request-builders-into-command-builders"
            }
            PassId::RemoveModelClasses => "remove-model-classes",
            PassId::RemoveEnums => "remove-enums",
            PassId::RemoveConstructors => "remove-constructors",
            PassId::AddAsyncSuffix => "add-async-suffix",
            PassId::CapitalizeNamespacesFirstLetters => "capitalize-namespaces-first-letters",
            PassId::ReplaceBinaryByNativeType => "replace-binary-by-native-type",
            PassId::MakeEnumPropertiesNullable => "make-enum-properties-nullable",
            PassId::ReplaceReservedNames => "replace-reserved-names",
            PassId::DisambiguatePropertiesWithClassNames => {
                "disambiguate-properties-with-class-names"
            }
            PassId::AddConstructorsForDefaultValues => "add-constructors-for-default-values",
            PassId::AddSerializationModulesImport => "add-serialization-modules-import",
            PassId::AddGetterAndSetterMethods => "add-getter-and-setter-methods",
            PassId::AddParsableImplementation => "add-parsable-implementation",
            PassId::AddBackingStore => "add-backing-store",
            PassId::CaptureSerializationNames => "capture-serialization-names",
            PassId::Bespoke(name) => name,
        }
    }

    /// Passes that must run earlier whenever both are part of one pipeline.
    pub fn prerequisites(self) -> &'static [PassId] {
        match self {
            PassId::TurnRequestBuildersIntoCommandBuilders => &[
                PassId::ConvertUnionTypesToWrapper,
                PassId::AddPropertiesAndMethodTypesImports,
            ],
            PassId::RemoveModelClasses | PassId::RemoveEnums | PassId::RemoveConstructors => {
                &[PassId::TurnRequestBuildersIntoCommandBuilders]
            }
            PassId::MakeEnumPropertiesNullable | PassId::DisambiguatePropertiesWithClassNames => {
                &[PassId::ConvertUnionTypesToWrapper]
            }
            PassId::ReplaceReservedNames => &[
                PassId::ConvertUnionTypesToWrapper,
                PassId::AddPropertiesAndMethodTypesImports,
                PassId::AddGetterAndSetterMethods,
            ],
            PassId::AddSerializationModulesImport => &[PassId::AddDefaultImports],
            PassId::CaptureSerializationNames => &[
                PassId::ConvertUnionTypesToWrapper,
                PassId::ReplaceReservedNames,
                PassId::DisambiguatePropertiesWithClassNames,
            ],
            _ => &[],
        }
    }
}

impl fmt::Display for PassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

type PassFn<'a> = Box<dyn Fn(&mut CodeTree) -> Result<(), RefineError> + 'a>;

struct Step<'a> {
    id: PassId,
    run: PassFn<'a>,
}

/// An ordered list of passes for one target.
pub struct Pipeline<'a> {
    target: GenerationLanguage,
    steps: Vec<Step<'a>>,
}

impl fmt::Debug for Pipeline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("target", &self.target)
            .field("passes", &self.pass_ids())
            .finish()
    }
}

impl<'a> Pipeline<'a> {
    /// Empty pipeline for `target`.
    pub fn new(target: GenerationLanguage) -> Self {
        Self {
            target,
            steps: Vec::new(),
        }
    }

    /// Appends a pass.
    pub fn pass(
        mut self,
        id: PassId,
        run: impl Fn(&mut CodeTree) -> Result<(), RefineError> + 'a,
    ) -> Self {
        self.steps.push(Step {
            id,
            run: Box::new(run),
        });
        self
    }

    /// Appends a pass only when `enabled`.
    pub fn pass_when(
        self,
        enabled: bool,
        id: PassId,
        run: impl Fn(&mut CodeTree) -> Result<(), RefineError> + 'a,
    ) -> Self {
        if enabled { self.pass(id, run) } else { self }
    }

    /// Target this pipeline refines for.
    pub fn target(&self) -> GenerationLanguage {
        self.target
    }

    /// Pass identities in execution order.
    pub fn pass_ids(&self) -> Vec<PassId> {
        self.steps.iter().map(|s| s.id).collect()
    }

    /// Checks every declared prerequisite that is part of this pipeline runs first.
    pub fn check_order(&self) -> Result<(), ConfigurationError> {
        let ids = self.pass_ids();
        for (position, id) in ids.iter().enumerate() {
            for prerequisite in id.prerequisites() {
                let scheduled = ids.contains(prerequisite);
                let earlier = ids[..position].contains(prerequisite);
                if scheduled && !earlier {
                    return Err(ConfigurationError::PassOrder {
                        target: self.target,
                        pass: id.name(),
                        prerequisite: prerequisite.name(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Runs every pass over `tree` in order.
    pub fn run(&self, tree: &mut CodeTree) -> Result<(), RefineError> {
        self.check_order()?;
        let span = info_span!("refine", language = %self.target);
        let _entered = span.enter();
        validate::check_input(tree).map_err(|e| e.in_pass("validate-input"))?;
        for step in &self.steps {
            let pass = step.id.name();
            debug!(pass, elements = tree.len(), "Running refiner pass.");
            (step.run)(tree).map_err(|e| e.in_pass(pass, self.target))?;
            validate::check_references(tree).map_err(|e| e.in_pass(pass))?;
        }
        validate::check_output(tree).map_err(|e| e.in_pass("validate-output"))?;
        debug!(elements = tree.len(), "Refinement complete.");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use sdkgen_dom::{
        ClassKind, CodeClass, CodeElement, CodeMethod, CodeProperty, ElementKind, MethodKind,
        PropertyKind, StructuralErrorKind, TypeReference,
    };

    fn noop(_: &mut CodeTree) -> Result<(), RefineError> {
        Ok(())
    }

    #[test]
    fn test_prerequisite_scheduled_later_is_rejected() {
        let pipeline = Pipeline::new(GenerationLanguage::Shell)
            .pass(PassId::RemoveModelClasses, noop)
            .pass(PassId::TurnRequestBuildersIntoCommandBuilders, noop);
        let err = pipeline.check_order().unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::PassOrder {
                pass: "remove-model-classes",
                prerequisite: "turn-request-builders-into-command-builders",
                ..
            }
        ));

        let mut tree = CodeTree::new("api");
        assert!(matches!(pipeline.run(&mut tree), Err(RefineError::Configuration(_))));
    }

    #[test]
    fn test_absent_prerequisites_are_not_required() {
        Pipeline::new(GenerationLanguage::CSharp)
            .pass(PassId::RemoveEnums, noop)
            .check_order()
            .unwrap();
    }

    #[test]
    fn test_dangling_handle_is_attributed_to_the_pass_that_left_it() {
        let mut tree = CodeTree::new("api");
        let user = tree.add_class(tree.root(), CodeClass::new("User", ClassKind::Model)).unwrap();
        let holder = tree
            .add_class(tree.root(), CodeClass::new("Holder", ClassKind::Model))
            .unwrap();
        tree.add_property(
            holder,
            CodeProperty::new(
                "user",
                PropertyKind::Custom,
                TypeReference::to_definition("User", user),
            ),
        )
        .unwrap();
        let pipeline = Pipeline::new(GenerationLanguage::Go).pass(
            PassId::Bespoke("careless-removal"),
            move |tree| {
                tree.remove(user)?;
                Ok(())
            },
        );
        match pipeline.run(&mut tree).unwrap_err() {
            RefineError::Structural(err) => {
                assert!(matches!(err.kind, StructuralErrorKind::DanglingReference { .. }));
                assert_eq!(err.pass, Some("careless-removal"));
                assert_eq!(err.path, "api::Holder::user");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_input_is_validated_before_the_first_pass() {
        let mut tree = CodeTree::new("api");
        let class = tree
            .add_class(tree.root(), CodeClass::new("B", ClassKind::RequestBuilder))
            .unwrap();
        tree.add_method(
            class,
            CodeMethod::new("Get", MethodKind::RequestExecutor)
                .returning(TypeReference::new("string")),
        )
        .unwrap();
        let pipeline =
            Pipeline::new(GenerationLanguage::Java).pass(PassId::Bespoke("rename-all"), |tree| {
                for id in tree.ids().collect::<Vec<_>>() {
                    if let Some(CodeElement::Class(c)) = tree.get_mut(id) {
                        c.name.push('X');
                    }
                }
                Ok(())
            });
        match pipeline.run(&mut tree).unwrap_err() {
            RefineError::Structural(err) => {
                assert_eq!(err.kind, StructuralErrorKind::MissingHttpVerb);
                assert_eq!(err.pass, Some("validate-input"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(tree.find_child(tree.root(), ElementKind::Class, "B").is_some());
    }
}
