//! Passes that synthesize or adjust class members.

use sdkgen_dom::{
    crawl, of_kind, ClassKind, CodeElement, CodeMethod, CodeParameter, CodeProperty, CodeTree,
    ElementId, ElementKind, ImportDeclaration, MethodKind, ParameterKind, PropertyKind,
    TypeReference,
};
use tracing::debug;

use crate::error::RefineError;
use crate::naming::capitalize_first;

fn is_model(tree: &CodeTree, id: ElementId) -> bool {
    tree.get(id)
        .and_then(CodeElement::as_class)
        .is_some_and(|c| c.kind == ClassKind::Model)
}

fn is_base_model(tree: &CodeTree, id: ElementId) -> bool {
    tree.get(id)
        .and_then(CodeElement::as_class)
        .is_some_and(|c| c.kind == ClassKind::Model && c.inherits.is_none())
}

/// Makes every property typed by an enum nullable.
pub fn make_enum_properties_nullable(tree: &mut CodeTree) -> Result<(), RefineError> {
    let root = tree.root();
    crawl(tree, root, of_kind(ElementKind::Property), |tree, id| -> Result<(), RefineError> {
        let is_enum = tree
            .get(id)
            .and_then(CodeElement::as_property)
            .and_then(|p| tree.resolve(&p.type_))
            .is_some_and(|d| d.kind() == ElementKind::Enum);
        if is_enum {
            if let Some(property) = tree.get_mut(id).and_then(CodeElement::as_property_mut) {
                property.type_.is_nullable = true;
            }
        }
        Ok(())
    })
}

/// Adds a constructor to classes whose properties carry default values.
///
/// Request builders and query parameter classes are skipped, and classes with a
/// base class only get one when `add_if_inherited` is set.
pub fn add_constructors_for_default_values(
    tree: &mut CodeTree,
    add_if_inherited: bool,
) -> Result<(), RefineError> {
    let root = tree.root();
    let mut added = 0usize;
    crawl(tree, root, of_kind(ElementKind::Class), |tree, class| -> Result<(), RefineError> {
        let Some(code_class) = tree.get(class).and_then(CodeElement::as_class) else {
            return Ok(());
        };
        if matches!(code_class.kind, ClassKind::RequestBuilder | ClassKind::QueryParameters)
            || (code_class.inherits.is_some() && !add_if_inherited)
        {
            return Ok(());
        }
        let class_name = code_class.name.clone();
        let mut has_defaults = false;
        let mut has_constructor = false;
        for child in tree.children(class) {
            match tree.get(*child) {
                Some(CodeElement::Property(p)) => has_defaults |= p.default_value.is_some(),
                Some(CodeElement::Method(m)) => {
                    has_constructor |= m.kind == MethodKind::Constructor;
                }
                _ => {}
            }
        }
        if has_defaults && !has_constructor {
            let mut constructor = CodeMethod::new("constructor", MethodKind::Constructor);
            constructor.description = Some(format!(
                "Instantiates a new {class_name} and sets the default values."
            ));
            tree.add_method(class, constructor)?;
            added += 1;
        }
        Ok(())
    })?;
    debug!(added, "Added constructors for default values.");
    Ok(())
}

/// Adds accessor methods for the data-carrying properties of model classes.
///
/// Accessors point at their property through `accessed_property`; existing
/// accessors for a property are left alone.
pub fn add_getter_and_setter_methods(
    tree: &mut CodeTree,
    getter_prefix: &str,
    setter_prefix: &str,
) -> Result<(), RefineError> {
    let root = tree.root();
    crawl(tree, root, is_model, |tree, class| -> Result<(), RefineError> {
        for property_id in tree.children_of_kind(class, ElementKind::Property) {
            let Some(property) = tree.get(property_id).and_then(CodeElement::as_property) else {
                continue;
            };
            if !matches!(
                property.kind,
                PropertyKind::Custom | PropertyKind::AdditionalData | PropertyKind::BackingStore
            ) {
                continue;
            }
            let suffix = capitalize_first(&property.name);
            let value_type = property.type_.clone();
            let (has_getter, has_setter) = accessors_of(tree, class, property_id);
            if !has_getter {
                let mut getter =
                    CodeMethod::new(format!("{getter_prefix}{suffix}"), MethodKind::Getter)
                        .returning(value_type.clone());
                getter.accessed_property = Some(property_id);
                tree.add_method(class, getter)?;
            }
            if !has_setter {
                let mut setter = CodeMethod::new(
                    format!("{setter_prefix}{suffix}"),
                    MethodKind::Setter,
                )
                .returning(TypeReference::new("void").nullable(false));
                setter.accessed_property = Some(property_id);
                let setter = tree.add_method(class, setter)?;
                tree.add_parameter(
                    setter,
                    CodeParameter::new("value", ParameterKind::SetterValue, value_type),
                )?;
            }
        }
        Ok(())
    })
}

fn accessors_of(tree: &CodeTree, class: ElementId, property: ElementId) -> (bool, bool) {
    let mut found = (false, false);
    for child in tree.children(class) {
        if let Some(method) = tree.get(*child).and_then(CodeElement::as_method) {
            if method.accessed_property == Some(property) {
                match method.kind {
                    MethodKind::Getter => found.0 = true,
                    MethodKind::Setter => found.1 = true,
                    _ => {}
                }
            }
        }
    }
    found
}

/// Makes root model classes implement the serialization interface `interface` from `module`.
pub fn add_parsable_implementation(
    tree: &mut CodeTree,
    interface: &str,
    module: &str,
) -> Result<(), RefineError> {
    let root = tree.root();
    crawl(tree, root, is_base_model, |tree, class| -> Result<(), RefineError> {
        if let Some(code_class) = tree.get_mut(class).and_then(CodeElement::as_class_mut) {
            code_class.add_implements(TypeReference::external(interface).nullable(false));
        }
        tree.add_import(class, ImportDeclaration::new(module))?;
        Ok(())
    })
}

/// Types a target uses to back model values with a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackingStoreSettings {
    /// Interface implemented by backed models.
    pub interface: &'static str,
    /// Type of the store property.
    pub store_type: &'static str,
    /// Module both are imported from.
    pub module: &'static str,
}

/// Gives root model classes a backing store property and interface.
pub fn add_backing_store(
    tree: &mut CodeTree,
    settings: &BackingStoreSettings,
) -> Result<(), RefineError> {
    let root = tree.root();
    let mut added = 0usize;
    crawl(tree, root, is_base_model, |tree, class| -> Result<(), RefineError> {
        let has_store = tree.children(class).iter().any(|c| {
            tree.get(*c)
                .and_then(CodeElement::as_property)
                .is_some_and(|p| p.kind == PropertyKind::BackingStore)
        });
        if has_store {
            return Ok(());
        }
        if let Some(code_class) = tree.get_mut(class).and_then(CodeElement::as_class_mut) {
            code_class.add_implements(TypeReference::external(settings.interface).nullable(false));
        }
        let mut store = CodeProperty::new(
            "backingStore",
            PropertyKind::BackingStore,
            TypeReference::external(settings.store_type).nullable(false),
        );
        store.description = Some("Stores model information.".into());
        store.read_only = true;
        tree.add_property(class, store)?;
        tree.add_import(class, ImportDeclaration::new(settings.module))?;
        added += 1;
        Ok(())
    })?;
    debug!(added, "Added backing stores.");
    Ok(())
}
