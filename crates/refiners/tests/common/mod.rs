//! Shared fixtures for refiner integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use sdkgen_dom::{
    ClassKind, CodeClass, CodeElement, CodeEnum, CodeMethod, CodeNamespace, CodeParameter,
    CodeProperty, CodeTree, CollectionKind, ElementId, HttpVerb, MethodKind, ParameterKind,
    PropertyKind, TypeReference,
};
use tracing_subscriber::EnvFilter;

/// Routes refiner logs to the test harness. Set `RUST_LOG=debug` to see passes.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Handles into [`sample_tree`].
pub struct Sample {
    pub tree: CodeTree,
    pub client: ElementId,
    pub me_builder: ElementId,
    pub messages_builder: ElementId,
    pub user: ElementId,
    pub message: ElementId,
    pub status: ElementId,
}

/// A small mail API: a client, two request builders and a data model.
///
/// ```text
/// api
/// ├── GraphClient            me -> MeRequestBuilder
/// ├── api.me
/// │   ├── MeRequestBuilder   messages -> MessagesRequestBuilder, Get
/// │   └── api.me.messages
/// │       └── MessagesRequestBuilder  Get, Post
/// └── api.models
///     ├── User      id, displayName, User, class, status, payload (Message | string)
///     ├── Message   subject = "", body: binary, sentDateTime
///     └── Status    active, default
/// ```
pub fn sample_tree() -> Sample {
    let mut tree = CodeTree::new("api");
    let root = tree.root();
    let me_ns = tree.add_namespace(root, CodeNamespace::new("api.me")).unwrap();
    let messages_ns = tree.add_namespace(me_ns, CodeNamespace::new("api.me.messages")).unwrap();
    let models = tree.add_namespace(root, CodeNamespace::new("api.models")).unwrap();

    let mut status = CodeEnum::new("Status");
    status.add_member("active");
    status.add_member("default");
    let status = tree.add_enum(models, status).unwrap();

    let message = tree.add_class(models, CodeClass::new("Message", ClassKind::Model)).unwrap();
    tree.add_property(
        message,
        CodeProperty::new("subject", PropertyKind::Custom, TypeReference::new("string"))
            .with_default("\"\""),
    )
    .unwrap();
    tree.add_property(
        message,
        CodeProperty::new("body", PropertyKind::Custom, TypeReference::new("binary")),
    )
    .unwrap();
    tree.add_property(
        message,
        CodeProperty::new("sentDateTime", PropertyKind::Custom, TypeReference::new("DateTime")),
    )
    .unwrap();

    let user = tree.add_class(models, CodeClass::new("User", ClassKind::Model)).unwrap();
    for name in ["id", "displayName", "User", "class"] {
        tree.add_property(
            user,
            CodeProperty::new(name, PropertyKind::Custom, TypeReference::new("string")),
        )
        .unwrap();
    }
    tree.add_property(
        user,
        CodeProperty::new(
            "status",
            PropertyKind::Custom,
            TypeReference::to_definition("Status", status),
        ),
    )
    .unwrap();
    tree.add_property(
        user,
        CodeProperty::new(
            "payload",
            PropertyKind::Custom,
            TypeReference::union(
                "MessageOrText",
                vec![
                    TypeReference::to_definition("Message", message),
                    TypeReference::new("string"),
                ],
            ),
        ),
    )
    .unwrap();

    let messages_builder = tree
        .add_class(messages_ns, CodeClass::new("MessagesRequestBuilder", ClassKind::RequestBuilder))
        .unwrap();
    tree.add_method(
        messages_builder,
        CodeMethod::new("Get", MethodKind::RequestExecutor)
            .with_verb(HttpVerb::Get)
            .asynchronous()
            .returning(
                TypeReference::to_definition("Message", message).collection(CollectionKind::Array),
            ),
    )
    .unwrap();
    let post = tree
        .add_method(
            messages_builder,
            CodeMethod::new("Post", MethodKind::RequestExecutor)
                .with_verb(HttpVerb::Post)
                .asynchronous()
                .returning(TypeReference::to_definition("Message", message)),
        )
        .unwrap();
    tree.add_parameter(
        post,
        CodeParameter::new(
            "body",
            ParameterKind::RequestBody,
            TypeReference::to_definition("Message", message),
        ),
    )
    .unwrap();

    let me_builder = tree
        .add_class(me_ns, CodeClass::new("MeRequestBuilder", ClassKind::RequestBuilder))
        .unwrap();
    tree.add_property(
        me_builder,
        CodeProperty::new(
            "messages",
            PropertyKind::RequestBuilder,
            TypeReference::to_definition("MessagesRequestBuilder", messages_builder),
        ),
    )
    .unwrap();
    tree.add_method(
        me_builder,
        CodeMethod::new("Get", MethodKind::RequestExecutor)
            .with_verb(HttpVerb::Get)
            .asynchronous()
            .returning(TypeReference::to_definition("User", user)),
    )
    .unwrap();

    let client = tree
        .add_class(root, CodeClass::new("GraphClient", ClassKind::RequestBuilder))
        .unwrap();
    tree.add_property(
        client,
        CodeProperty::new(
            "me",
            PropertyKind::RequestBuilder,
            TypeReference::to_definition("MeRequestBuilder", me_builder),
        ),
    )
    .unwrap();
    tree.add_method(client, CodeMethod::new("constructor", MethodKind::ClientConstructor))
        .unwrap();

    Sample {
        tree,
        client,
        me_builder,
        messages_builder,
        user,
        message,
        status,
    }
}

/// Pre-order list of `(depth, element)` pairs, comparable across runs.
pub fn snapshot(tree: &CodeTree) -> Vec<(usize, CodeElement)> {
    tree.walk(tree.root())
        .filter_map(|id| {
            let depth = tree.ancestors_or_self(id).count() - 1;
            tree.get(id).map(|e| (depth, e.clone()))
        })
        .collect()
}

/// Names of the direct children of `parent`.
pub fn child_names(tree: &CodeTree, parent: ElementId) -> Vec<String> {
    tree.children(parent)
        .iter()
        .filter_map(|c| tree.get(*c))
        .map(|e| e.name().to_string())
        .collect()
}
