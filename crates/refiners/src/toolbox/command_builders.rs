use sdkgen_dom::{
    crawl, ClassKind, CodeElement, CodeMethod, CodeParameter, CodeTree, ElementId, ElementKind,
    MethodKind, ParameterKind, PropertyKind, TypeReference,
};
use tracing::debug;

use crate::error::RefineError;
use crate::naming::capitalize_first;

/// Opaque command type returned by command builders.
pub const COMMAND_TYPE: &str = "Command";
const HTTP_CORE_TYPE: &str = "IHttpCore";

fn command_type() -> TypeReference {
    TypeReference::external(COMMAND_TYPE).nullable(false)
}

fn is_command_builder(method: &CodeMethod) -> bool {
    method.is_static
        && method
            .return_type
            .as_ref()
            .is_some_and(|t| t.is_external && t.name == COMMAND_TYPE)
}

fn is_request_builder(tree: &CodeTree, id: ElementId) -> bool {
    tree.get(id)
        .and_then(CodeElement::as_class)
        .is_some_and(|c| c.kind == ClassKind::RequestBuilder)
}

/// Turns request builders into static command factories.
///
/// Navigation properties become `Build<Name>Command` methods, request
/// executors become synchronous static `Build<Verb>Command` methods returning
/// the command type, and each builder gets a static `Build` entry point.
pub fn turn_request_builders_into_command_builders(tree: &mut CodeTree) -> Result<(), RefineError> {
    let root = tree.root();
    crawl(tree, root, is_request_builder, |tree, class| -> Result<(), RefineError> {
        if let Some(code_class) = tree.get_mut(class).and_then(CodeElement::as_class_mut) {
            code_class.is_static = true;
        }
        for child in tree.children(class).to_vec() {
            match tree.get(child) {
                Some(CodeElement::Property(property))
                    if property.kind == PropertyKind::RequestBuilder =>
                {
                    let name = format!("Build{}Command", capitalize_first(&property.name));
                    let description = property.description.clone();
                    if tree.find_child(class, ElementKind::Method, &name).is_none() {
                        let mut method = CodeMethod::new(
                            name.as_str(),
                            MethodKind::RequestBuilderBackwardCompatibility,
                        )
                        .static_method()
                        .returning(command_type());
                        method.description = description;
                        tree.add_method(class, method)?;
                    }
                    debug!(
                        property = %tree.qualified_path(child),
                        method = %name,
                        "Replaced navigation property with command builder."
                    );
                    tree.remove_and_clear(child)?;
                }
                Some(CodeElement::Method(method))
                    if method.kind == MethodKind::RequestExecutor && !is_command_builder(method) =>
                {
                    if let Some(method) = tree.get_mut(child).and_then(CodeElement::as_method_mut) {
                        method.is_async = false;
                        method.is_static = true;
                        method.name = format!("Build{}Command", capitalize_first(&method.name));
                        method.return_type = Some(command_type());
                    }
                }
                _ => {}
            }
        }
        if tree.find_child(class, ElementKind::Method, "Build").is_none() {
            let build = tree.add_method(
                class,
                CodeMethod::new("Build", MethodKind::Custom)
                    .static_method()
                    .returning(command_type()),
            )?;
            tree.add_parameter(
                build,
                CodeParameter::new(
                    "httpCore",
                    ParameterKind::HttpExecutionClient,
                    TypeReference::external(HTTP_CORE_TYPE).nullable(false),
                ),
            )?;
        }
        Ok(())
    })
}
