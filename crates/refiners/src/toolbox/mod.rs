//! Reusable tree-mutation passes.
//!
//! Every pass walks the tree with [`sdkgen_dom::crawl`], is parameterized
//! explicitly by the calling target, and leaves weak handles either resolvable
//! or cleared. Unless noted, running a pass twice changes nothing the second time.

mod command_builders;
mod imports;
mod members;
mod removal;
mod renames;
mod reserved_names;
mod union_types;

pub use command_builders::{turn_request_builders_into_command_builders, COMMAND_TYPE};
pub use imports::{
    add_default_imports, add_properties_and_method_types_imports, add_serialization_modules_import,
    replace_binary_by_native_type, DefaultImportTable, ImportScope,
};
pub(crate) use imports::refresh_import_namespaces;
pub use members::{
    add_backing_store, add_constructors_for_default_values, add_getter_and_setter_methods,
    add_parsable_implementation, make_enum_properties_nullable, BackingStoreSettings,
};
pub use removal::{remove_constructors, remove_enums, remove_model_classes};
pub use renames::{
    add_async_suffix, capitalize_namespaces_first_letters, capture_serialization_names,
    disambiguate_properties_with_class_names, move_classes_with_namespace_names_under_namespace,
};
pub use reserved_names::{replace_reserved_names, RenameFn};
pub use union_types::{convert_union_types_to_wrapper, WRAPPER_FACTORY, WRAPPER_SERIALIZER};

use sdkgen_dom::{CodeTree, ElementId, ElementKind};

/// Crawl predicate for classes and interfaces, the elements that own imports.
pub(crate) fn is_import_owner(tree: &CodeTree, id: ElementId) -> bool {
    tree.get(id)
        .is_some_and(|e| matches!(e.kind(), ElementKind::Class | ElementKind::Interface))
}

/// Nearest class or interface enclosing `id`, itself included.
pub(crate) fn import_owner_of(tree: &CodeTree, id: ElementId) -> Option<ElementId> {
    tree.ancestors_or_self(id).find(|a| is_import_owner(tree, *a))
}
