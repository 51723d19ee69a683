//! End-to-end refiner runs over a small sample API.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::fs;

use sdkgen_dom::{
    validate, CodeElement, CodeMethod, CodeProperty, CodeTree, ElementKind, HttpVerb, MethodKind,
    PropertyKind, StructuralErrorKind, TypeReference,
};
use sdkgen_refiners::conventions::for_language;
use sdkgen_refiners::{
    refine_targets, refiner_for, GenerationConfiguration, GenerationLanguage, RefineError,
    UnionCodec, WrapperValue,
};
use serde_json::json;
use tempfile::TempDir;

use common::{child_names, init_tracing, sample_tree, snapshot};

fn config(language: GenerationLanguage) -> GenerationConfiguration {
    GenerationConfiguration::new(language, "GraphClient", "Graph.Sdk")
}

fn refine(language: GenerationLanguage, tree: &mut CodeTree) -> Result<(), RefineError> {
    refiner_for(&config(language)).expect("valid configuration").refine(tree)
}

fn property_named<'a>(
    tree: &'a CodeTree,
    class: sdkgen_dom::ElementId,
    name: &str,
) -> &'a CodeProperty {
    let id = tree
        .find_child(class, ElementKind::Property, name)
        .unwrap_or_else(|| panic!("no property {name}, found {:?}", child_names(tree, class)));
    tree.get(id).and_then(CodeElement::as_property).unwrap()
}

#[test]
fn test_csharp_disambiguates_property_named_after_its_class() {
    init_tracing();
    let mut sample = sample_tree();
    refine(GenerationLanguage::CSharp, &mut sample.tree).unwrap();

    let renamed = property_named(&sample.tree, sample.user, "User_prop");
    assert_eq!(renamed.serialization_name.as_deref(), Some("User"));
    assert!(sample.tree.find_child(sample.user, ElementKind::Property, "User").is_none());

    let escaped = property_named(&sample.tree, sample.user, "@Class");
    assert_eq!(escaped.wire_name(), "class");
}

#[test]
fn test_shell_turns_navigation_into_command_builders() {
    init_tracing();
    let mut sample = sample_tree();
    refine(GenerationLanguage::Shell, &mut sample.tree).unwrap();
    let tree = &sample.tree;

    let names = child_names(tree, sample.me_builder);
    assert!(names.iter().any(|n| n == "BuildMessagesCommand"), "{names:?}");
    assert!(names.iter().any(|n| n == "BuildGetCommand"), "{names:?}");
    assert!(tree.find_child(sample.me_builder, ElementKind::Property, "messages").is_none());

    let build = tree.find_child(sample.me_builder, ElementKind::Method, "Build").unwrap();
    let params = child_names(tree, build);
    assert_eq!(params, ["httpCore"]);

    let client = tree.get(sample.client).and_then(CodeElement::as_class).unwrap();
    assert!(client.is_static);
    assert!(tree.find_child(sample.client, ElementKind::Method, "BuildMeCommand").is_some());
    assert!(tree.find_child(sample.client, ElementKind::Method, "constructor").is_some());

    assert!(!tree.contains(sample.user));
    assert!(!tree.contains(sample.message));
    assert!(!tree.contains(sample.status));
}

#[test]
fn test_executor_without_verb_fails_before_any_pass() {
    init_tracing();
    let mut sample = sample_tree();
    sample
        .tree
        .add_method(
            sample.messages_builder,
            CodeMethod::new("Patch", MethodKind::RequestExecutor)
                .returning(TypeReference::new("string")),
        )
        .unwrap();
    let before = snapshot(&sample.tree);

    let err = refine(GenerationLanguage::CSharp, &mut sample.tree).unwrap_err();
    match err {
        RefineError::Structural(err) => {
            assert_eq!(err.kind, StructuralErrorKind::MissingHttpVerb);
            assert_eq!(err.pass, Some("validate-input"));
            assert!(err.path.ends_with("MessagesRequestBuilder::Patch"), "{}", err.path);
        }
        other => panic!("unexpected error {other}"),
    }
    assert_eq!(snapshot(&sample.tree), before);
}

#[test]
fn test_refining_twice_changes_nothing() {
    init_tracing();
    for language in GenerationLanguage::ALL {
        let mut sample = sample_tree();
        refine(language, &mut sample.tree).unwrap();
        let once = snapshot(&sample.tree);
        refine(language, &mut sample.tree).unwrap();
        assert_eq!(snapshot(&sample.tree), once, "{language} is not idempotent");
    }
}

#[test]
fn test_references_resolve_and_follow_renames() {
    init_tracing();
    for language in GenerationLanguage::ALL {
        let mut sample = sample_tree();
        refine(language, &mut sample.tree).unwrap();
        let tree = &sample.tree;
        validate::check_output(tree).unwrap();
        for id in tree.ids() {
            tree.get(id).unwrap().for_each_type_reference(&mut |t| {
                if let Some(definition) = t.type_definition {
                    assert_eq!(tree.get(definition).unwrap().name(), t.name, "{language}");
                }
                assert!(!t.is_union(), "{language} left a union at {}", tree.qualified_path(id));
            });
        }
    }
}

#[test]
fn test_no_identifier_is_a_reserved_word() {
    init_tracing();
    for language in GenerationLanguage::ALL {
        let conventions = for_language(language);
        let mut sample = sample_tree();
        refine(language, &mut sample.tree).unwrap();
        let tree = &sample.tree;
        for id in tree.ids() {
            let element = tree.get(id).unwrap();
            let names: Vec<&str> = match element {
                CodeElement::Import(_) => continue,
                CodeElement::Method(m) if m.kind.is_constructor() => continue,
                CodeElement::Namespace(ns) => ns.name.split('.').collect(),
                CodeElement::Enum(e) => {
                    e.members.iter().map(String::as_str).chain([e.name.as_str()]).collect()
                }
                other => vec![other.name()],
            };
            for name in names {
                assert!(
                    !conventions.is_reserved(name),
                    "{language} kept reserved '{name}' at {}",
                    tree.qualified_path(id)
                );
            }
        }
    }
}

#[test]
fn test_ruby_snake_cases_members_but_keeps_wire_names() {
    init_tracing();
    let mut sample = sample_tree();
    refine(GenerationLanguage::Ruby, &mut sample.tree).unwrap();
    let display = property_named(&sample.tree, sample.user, "display_name");
    assert_eq!(display.wire_name(), "displayName");
    let class = property_named(&sample.tree, sample.user, "class_escaped");
    assert_eq!(class.wire_name(), "class");
}

#[test]
fn test_go_and_java_add_accessors() {
    init_tracing();
    for (language, getter) in [
        (GenerationLanguage::Go, "GetDisplayName"),
        (GenerationLanguage::Java, "getDisplayName"),
    ] {
        let mut sample = sample_tree();
        refine(language, &mut sample.tree).unwrap();
        let id = sample
            .tree
            .find_child(sample.user, ElementKind::Method, getter)
            .unwrap_or_else(|| panic!("{language} has no {getter}"));
        let method = sample.tree.get(id).and_then(CodeElement::as_method).unwrap();
        assert_eq!(method.kind, MethodKind::Getter);
        let accessed = method.accessed_property.unwrap();
        assert_eq!(sample.tree.get(accessed).unwrap().name(), "displayName");
    }
}

#[test]
fn test_union_wrapper_round_trips_through_the_codec() {
    init_tracing();
    let mut sample = sample_tree();
    refine(GenerationLanguage::Java, &mut sample.tree).unwrap();
    let tree = &sample.tree;

    let payload = property_named(tree, sample.user, "payload");
    let wrapper = payload.type_.type_definition.expect("payload points at its wrapper");
    let codec = UnionCodec::new(tree, wrapper).unwrap();
    let members: Vec<String> = codec.member_names().map(str::to_string).collect();
    assert_eq!(members, ["message", "string"]);

    let message = json!({"subject": "hi", "body": "aGk=", "sentDateTime": "2024-01-01T00:00:00Z"});
    let decoded = codec.deserialize(&message).unwrap();
    assert_eq!(decoded, WrapperValue::with("message", message.clone()));
    assert_eq!(codec.serialize(&decoded).unwrap(), message);

    let text = json!("plain text");
    let decoded = codec.deserialize(&text).unwrap();
    assert_eq!(decoded, WrapperValue::with("string", text.clone()));
    assert_eq!(codec.serialize(&decoded).unwrap(), text);

    assert!(codec.deserialize(&json!({"unknown": true})).is_err());
}

#[test]
fn test_overlapping_numeric_alternatives_round_trip_after_java_escaping() {
    init_tracing();
    let mut sample = sample_tree();
    let union = TypeReference::union(
        "Score",
        vec![TypeReference::new("double"), TypeReference::new("integer")],
    );
    sample
        .tree
        .add_property(sample.user, CodeProperty::new("score", PropertyKind::Custom, union))
        .unwrap();
    refine(GenerationLanguage::Java, &mut sample.tree).unwrap();
    let tree = &sample.tree;

    let score = property_named(tree, sample.user, "score");
    let wrapper = score.type_.type_definition.expect("score points at its wrapper");
    let codec = UnionCodec::new(tree, wrapper).unwrap();
    let members: Vec<String> = codec.member_names().map(str::to_string).collect();
    assert_eq!(members, ["doubleEscaped", "integer"]);

    for (member, payload) in [("integer", json!(5)), ("doubleEscaped", json!(2.5))] {
        let value = WrapperValue::with(member, payload.clone());
        let wire = codec.serialize(&value).unwrap();
        assert_eq!(wire, payload);
        assert_eq!(codec.deserialize(&wire).unwrap(), value);
    }
}

#[test]
fn test_targets_refine_private_copies() {
    init_tracing();
    let sample = sample_tree();
    let before = snapshot(&sample.tree);
    let configs: Vec<_> = GenerationLanguage::ALL.into_iter().map(config).collect();

    let outcomes = refine_targets(&sample.tree, &configs);
    assert_eq!(snapshot(&sample.tree), before);
    assert_eq!(
        outcomes.iter().map(|o| o.language).collect::<Vec<_>>(),
        GenerationLanguage::ALL.to_vec()
    );
    for outcome in &outcomes {
        let tree = outcome.result.as_ref().unwrap();
        let has_prop_suffix = tree
            .find_child(sample.user, ElementKind::Property, "User_prop")
            .is_some();
        match outcome.language {
            GenerationLanguage::CSharp => assert!(has_prop_suffix),
            GenerationLanguage::Shell => assert!(!tree.contains(sample.user)),
            _ => assert!(!has_prop_suffix, "{}", outcome.language),
        }
    }
}

#[test]
fn test_one_failing_target_does_not_affect_the_others() {
    init_tracing();
    let mut sample = sample_tree();
    // Go turns `messages` into a `Messages` method, which is already taken.
    sample
        .tree
        .add_method(
            sample.me_builder,
            CodeMethod::new("Messages", MethodKind::Custom).returning(TypeReference::new("string")),
        )
        .unwrap();
    let mut configs: Vec<_> = GenerationLanguage::ALL.into_iter().map(config).collect();
    configs.push(GenerationConfiguration::new(GenerationLanguage::Java, "", "Graph"));

    let outcomes = refine_targets(&sample.tree, &configs);
    let (last, targets) = outcomes.split_last().unwrap();
    assert!(matches!(last.result, Err(RefineError::Configuration(_))));
    for outcome in targets {
        match (&outcome.language, &outcome.result) {
            (GenerationLanguage::Go, Err(err)) => {
                assert!(err.is_target_local());
                assert!(err.to_string().contains("go refiner"), "{err}");
            }
            (GenerationLanguage::Go, Ok(_)) => panic!("go should reject the colliding method"),
            (language, result) => assert!(result.is_ok(), "{language}: {result:?}"),
        }
    }
}

#[test]
fn test_configuration_file_drives_serialization_modules() {
    init_tracing();
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("sdkgen.toml");
    fs::write(
        &path,
        r#"
language = "csharp"
client_class_name = "GraphClient"
client_namespace_name = "Graph.Sdk"
serializers = ["Contoso.Json.JsonWriterFactory"]
deserializers = ["Contoso.Json.JsonParseNodeFactory"]
"#,
    )
    .unwrap();

    let config = GenerationConfiguration::load(&path).unwrap();
    assert_eq!(config.language, GenerationLanguage::CSharp);
    let mut sample = sample_tree();
    refiner_for(&config).unwrap().refine(&mut sample.tree).unwrap();

    let tree = &sample.tree;
    let constructor = tree
        .find_child(sample.client, ElementKind::Method, "constructor")
        .and_then(|id| tree.get(id))
        .and_then(CodeElement::as_method)
        .unwrap();
    assert_eq!(constructor.serializer_modules, ["Contoso.Json.JsonWriterFactory"]);
    assert_eq!(constructor.deserializer_modules, ["Contoso.Json.JsonParseNodeFactory"]);
    let imports = child_names(tree, sample.client);
    assert!(imports.iter().any(|n| n == "Contoso.Json"), "{imports:?}");
}

#[test]
fn test_verbs_survive_command_builder_conversion() {
    let mut sample = sample_tree();
    refine(GenerationLanguage::Shell, &mut sample.tree).unwrap();
    let tree = &sample.tree;
    let post = tree
        .find_child(sample.messages_builder, ElementKind::Method, "BuildPostCommand")
        .and_then(|id| tree.get(id))
        .and_then(CodeElement::as_method)
        .unwrap();
    assert_eq!(post.http_verb, Some(HttpVerb::Post));
    assert!(post.is_static && !post.is_async);
}
