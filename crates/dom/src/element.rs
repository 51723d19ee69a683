//! Element types of the code model.
//!
//! Every entity of generated code is one variant of the closed [`CodeElement`]
//! set. Owning edges live in the [`CodeTree`](crate::CodeTree) arena; the
//! handles stored here (`type_definition`, `original_method`,
//! `accessed_property`) are weak and may resolve to nothing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable handle to an element stored in a [`CodeTree`](crate::CodeTree).
///
/// Handles are never reused: once an element is removed, its handle resolves
/// to `None` for the lifetime of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub(crate) usize);

impl ElementId {
    /// Position of the element slot inside the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discriminant of a [`CodeElement`], used for parent/child rules and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// A namespace.
    Namespace,
    /// A class.
    Class,
    /// An interface.
    Interface,
    /// An enum.
    Enum,
    /// A method of a class.
    Method,
    /// A property of a class or interface.
    Property,
    /// A parameter of a method.
    Parameter,
    /// An import declaration of a class or interface.
    Import,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Namespace => "namespace",
            ElementKind::Class => "class",
            ElementKind::Interface => "interface",
            ElementKind::Enum => "enum",
            ElementKind::Method => "method",
            ElementKind::Property => "property",
            ElementKind::Parameter => "parameter",
            ElementKind::Import => "import",
        };
        f.write_str(name)
    }
}

impl ElementKind {
    /// Whether an element of this kind may be owned by a parent of kind `parent`.
    pub fn can_belong_to(self, parent: ElementKind) -> bool {
        use ElementKind::{Class, Enum, Import, Interface, Method, Namespace, Parameter, Property};
        matches!(
            (self, parent),
            (Namespace | Class | Interface | Enum, Namespace)
                | (Method, Class)
                | (Property | Import, Class | Interface)
                | (Parameter, Method)
        )
    }
}

/// Role of a class in the generated SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    /// Data model exchanged with the service.
    Model,
    /// Fluent navigation and request execution surface.
    RequestBuilder,
    /// Query string parameters of a request.
    QueryParameters,
    /// Anything else.
    Custom,
}

/// Role of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodKind {
    /// Regular constructor.
    Constructor,
    /// Constructor of the root API client.
    ClientConstructor,
    /// Property accessor.
    Getter,
    /// Property mutator.
    Setter,
    /// Writes the instance to a serialization writer.
    Serializer,
    /// Reads an instance from a parse node.
    Deserializer,
    /// Builds request information for an HTTP operation.
    RequestGenerator,
    /// Sends an HTTP operation and returns its response.
    RequestExecutor,
    /// Indexer kept for backward compatibility.
    IndexerBackwardCompatibility,
    /// Navigation method kept for backward compatibility.
    RequestBuilderBackwardCompatibility,
    /// Anything else.
    Custom,
}

impl MethodKind {
    /// Constructors are the only methods without a return type.
    pub fn requires_return_type(self) -> bool {
        !self.is_constructor()
    }

    /// Plain or client constructor.
    pub fn is_constructor(self) -> bool {
        matches!(self, MethodKind::Constructor | MethodKind::ClientConstructor)
    }

    /// Methods describing an HTTP operation must name their verb.
    pub fn requires_http_verb(self) -> bool {
        matches!(self, MethodKind::RequestGenerator | MethodKind::RequestExecutor)
    }
}

/// Role of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyKind {
    /// A model field exchanged on the wire.
    Custom,
    /// Catch-all bag for unknown wire fields.
    AdditionalData,
    /// The backing store container.
    BackingStore,
    /// Navigation to a child request builder.
    RequestBuilder,
    /// Path segment contributed by a request builder.
    PathSegment,
    /// Current URL path of a request builder.
    CurrentPath,
    /// HTTP execution client held by a request builder.
    HttpExecutionClient,
    /// Raw URL flag of a request builder.
    RawUrl,
    /// Field of a query parameters class.
    QueryParameter,
}

/// Role of a method parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterKind {
    /// Request payload.
    RequestBody,
    /// Query parameters configuration.
    QueryParameter,
    /// Request headers.
    Headers,
    /// Request options.
    Options,
    /// Custom response handler.
    ResponseHandler,
    /// HTTP execution client.
    HttpExecutionClient,
    /// Current URL path.
    CurrentPath,
    /// Raw URL flag.
    RawUrl,
    /// Backing store factory.
    BackingStore,
    /// Serialization writer of a serializer method.
    Serializer,
    /// Parse node of a deserializer method.
    ParseNode,
    /// Value passed to a setter.
    SetterValue,
    /// Anything else.
    Custom,
}

/// HTTP verb of a request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpVerb {
    /// GET
    Get,
    /// POST
    Post,
    /// PATCH
    Patch,
    /// PUT
    Put,
    /// DELETE
    Delete,
    /// OPTIONS
    Options,
    /// HEAD
    Head,
    /// CONNECT
    Connect,
    /// TRACE
    Trace,
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            HttpVerb::Get => "Get",
            HttpVerb::Post => "Post",
            HttpVerb::Patch => "Patch",
            HttpVerb::Put => "Put",
            HttpVerb::Delete => "Delete",
            HttpVerb::Options => "Options",
            HttpVerb::Head => "Head",
            HttpVerb::Connect => "Connect",
            HttpVerb::Trace => "Trace",
        };
        f.write_str(verb)
    }
}

/// Collection shape of a type reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    /// A single value.
    #[default]
    None,
    /// A native array.
    Array,
    /// A collection wrapper type.
    Complex,
}

/// Reference to a type, either a primitive/external name or a definition in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeReference {
    /// Type name as spelled in the code model.
    pub name: String,
    /// The type comes from a dependency rather than the generated code.
    pub is_external: bool,
    /// Whether the value may be absent.
    pub is_nullable: bool,
    /// Collection shape.
    #[serde(default)]
    pub collection_kind: CollectionKind,
    /// Weak link to the defining class, enum or interface.
    #[serde(default)]
    pub type_definition: Option<ElementId>,
    /// Alternatives of a "one-of-N" type, in declared order. Empty for plain types.
    #[serde(default)]
    pub alternatives: Vec<TypeReference>,
}

impl TypeReference {
    /// A nullable reference to a primitive or otherwise unresolved type name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_external: false,
            is_nullable: true,
            collection_kind: CollectionKind::None,
            type_definition: None,
            alternatives: Vec::new(),
        }
    }

    /// A reference to a type provided by a dependency.
    pub fn external(name: impl Into<String>) -> Self {
        Self {
            is_external: true,
            ..Self::new(name)
        }
    }

    /// A reference to a definition in the tree.
    pub fn to_definition(name: impl Into<String>, definition: ElementId) -> Self {
        Self {
            type_definition: Some(definition),
            ..Self::new(name)
        }
    }

    /// A "one-of-N" type over `alternatives`.
    pub fn union(name: impl Into<String>, alternatives: Vec<TypeReference>) -> Self {
        Self {
            alternatives,
            ..Self::new(name)
        }
    }

    /// Sets nullability.
    pub fn nullable(mut self, is_nullable: bool) -> Self {
        self.is_nullable = is_nullable;
        self
    }

    /// Sets the collection shape.
    pub fn collection(mut self, kind: CollectionKind) -> Self {
        self.collection_kind = kind;
        self
    }

    /// Whether this is a "one-of-N" type.
    pub fn is_union(&self) -> bool {
        !self.alternatives.is_empty()
    }

    /// Whether this describes a collection.
    pub fn is_collection(&self) -> bool {
        self.collection_kind != CollectionKind::None
    }

    /// Applies `f` to this reference and, depth first, to every nested alternative.
    pub fn visit_mut(&mut self, f: &mut dyn FnMut(&mut TypeReference)) {
        f(self);
        for alternative in &mut self.alternatives {
            alternative.visit_mut(f);
        }
    }

    /// Calls `f` on this reference and every nested alternative.
    pub fn visit(&self, f: &mut dyn FnMut(&TypeReference)) {
        f(self);
        for alternative in &self.alternatives {
            alternative.visit(f);
        }
    }
}

/// A namespace. Its name is the full dotted name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeNamespace {
    /// Full dotted name, e.g. `graph.users`.
    pub name: String,
    /// Documentation.
    pub description: Option<String>,
}

impl CodeNamespace {
    /// Namespace named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Last dot-separated segment of the name.
    pub fn last_segment(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// A class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeClass {
    /// Identifier.
    pub name: String,
    /// Documentation.
    pub description: Option<String>,
    /// Role.
    pub kind: ClassKind,
    /// Base class.
    pub inherits: Option<TypeReference>,
    /// Implemented interfaces, without duplicates.
    #[serde(default)]
    pub implements: Vec<TypeReference>,
    /// Emitted as a static class.
    #[serde(default)]
    pub is_static: bool,
    /// Synthesized to hold the alternatives of a "one-of-N" type.
    #[serde(default)]
    pub is_union_wrapper: bool,
}

impl CodeClass {
    /// Class named `name` of the given kind.
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            description: None,
            kind,
            inherits: None,
            implements: Vec::new(),
            is_static: false,
            is_union_wrapper: false,
        }
    }

    /// Adds an implemented interface unless one with the same name is present.
    pub fn add_implements(&mut self, interface: TypeReference) -> bool {
        if self.implements.iter().any(|x| x.name == interface.name) {
            return false;
        }
        self.implements.push(interface);
        true
    }
}

/// An interface: a class without executable members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeInterface {
    /// Identifier.
    pub name: String,
    /// Documentation.
    pub description: Option<String>,
    /// Base interface.
    pub inherits: Option<TypeReference>,
}

impl CodeInterface {
    /// Interface named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            inherits: None,
        }
    }
}

/// An enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeEnum {
    /// Identifier.
    pub name: String,
    /// Documentation.
    pub description: Option<String>,
    /// Members in declared order, unique.
    pub members: Vec<String>,
    /// Bitset semantics instead of exclusive values.
    #[serde(default)]
    pub flags: bool,
}

impl CodeEnum {
    /// Empty enum named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            members: Vec::new(),
            flags: false,
        }
    }

    /// Appends a member, keeping the set unique. Returns false on duplicates.
    pub fn add_member(&mut self, member: impl Into<String>) -> bool {
        let member = member.into();
        if self.members.contains(&member) {
            return false;
        }
        self.members.push(member);
        true
    }
}

/// A method of a class. Parameters are its children in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeMethod {
    /// Identifier.
    pub name: String,
    /// Documentation.
    pub description: Option<String>,
    /// Role.
    pub kind: MethodKind,
    /// Asynchronous method.
    #[serde(default)]
    pub is_async: bool,
    /// Static method.
    #[serde(default)]
    pub is_static: bool,
    /// HTTP verb of request methods.
    pub http_verb: Option<HttpVerb>,
    /// Return type; absent only for constructors.
    pub return_type: Option<TypeReference>,
    /// Weak link to the method this one overloads.
    #[serde(default)]
    pub original_method: Option<ElementId>,
    /// Weak link to the property read or written by an accessor.
    #[serde(default)]
    pub accessed_property: Option<ElementId>,
    /// Serialization writer factories registered by a client constructor.
    #[serde(default)]
    pub serializer_modules: Vec<String>,
    /// Parse node factories registered by a client constructor.
    #[serde(default)]
    pub deserializer_modules: Vec<String>,
}

impl CodeMethod {
    /// Synchronous instance method named `name`, without return type.
    pub fn new(name: impl Into<String>, kind: MethodKind) -> Self {
        Self {
            name: name.into(),
            description: None,
            kind,
            is_async: false,
            is_static: false,
            http_verb: None,
            return_type: None,
            original_method: None,
            accessed_property: None,
            serializer_modules: Vec::new(),
            deserializer_modules: Vec::new(),
        }
    }

    /// Sets the return type.
    pub fn returning(mut self, return_type: TypeReference) -> Self {
        self.return_type = Some(return_type);
        self
    }

    /// Sets the HTTP verb.
    pub fn with_verb(mut self, verb: HttpVerb) -> Self {
        self.http_verb = Some(verb);
        self
    }

    /// Marks the method asynchronous.
    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }

    /// Marks the method static.
    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Generated overloads point back at the method they overload.
    pub fn is_overload(&self) -> bool {
        self.original_method.is_some()
    }
}

/// A property of a class or interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeProperty {
    /// Identifier.
    pub name: String,
    /// Documentation.
    pub description: Option<String>,
    /// Role.
    pub kind: PropertyKind,
    /// Value type.
    #[serde(rename = "type")]
    pub type_: TypeReference,
    /// Default value expression.
    pub default_value: Option<String>,
    /// Wire name, independent of the identifier.
    pub serialization_name: Option<String>,
    /// Read-only property.
    #[serde(default)]
    pub read_only: bool,
}

impl CodeProperty {
    /// Property named `name`.
    pub fn new(name: impl Into<String>, kind: PropertyKind, type_: TypeReference) -> Self {
        Self {
            name: name.into(),
            description: None,
            kind,
            type_,
            default_value: None,
            serialization_name: None,
            read_only: false,
        }
    }

    /// Sets the default value expression.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Properties exchanged on the wire by name.
    pub fn is_serializable(&self) -> bool {
        self.kind == PropertyKind::Custom
    }

    /// Name used on the wire: the captured serialization name, else the identifier.
    pub fn wire_name(&self) -> &str {
        self.serialization_name.as_deref().unwrap_or(&self.name)
    }

    /// Records the current identifier as the wire name unless one is already set.
    pub fn capture_serialization_name(&mut self) {
        if self.serialization_name.is_none() {
            self.serialization_name = Some(self.name.clone());
        }
    }
}

/// A parameter of a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeParameter {
    /// Identifier.
    pub name: String,
    /// Documentation.
    pub description: Option<String>,
    /// Role.
    pub kind: ParameterKind,
    /// Whether callers may omit it.
    #[serde(default)]
    pub optional: bool,
    /// Value type.
    #[serde(rename = "type")]
    pub type_: TypeReference,
    /// Default value expression.
    pub default_value: Option<String>,
}

impl CodeParameter {
    /// Required parameter named `name`.
    pub fn new(name: impl Into<String>, kind: ParameterKind, type_: TypeReference) -> Self {
        Self {
            name: name.into(),
            description: None,
            kind,
            optional: false,
            type_,
            default_value: None,
        }
    }

    /// Marks the parameter optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// An import of a namespace or symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDeclaration {
    /// Imported namespace or module.
    pub name: String,
    /// Imported symbol, when the import targets one type.
    pub declaration: Option<TypeReference>,
}

impl ImportDeclaration {
    /// Import of a whole namespace or module.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declaration: None,
        }
    }

    /// Import of one symbol from `name`.
    pub fn of_symbol(name: impl Into<String>, symbol: TypeReference) -> Self {
        Self {
            name: name.into(),
            declaration: Some(symbol),
        }
    }

    /// Identity used to de-duplicate imports.
    pub fn key(&self) -> (&str, Option<&str>) {
        (
            self.name.as_str(),
            self.declaration.as_ref().map(|d| d.name.as_str()),
        )
    }
}

/// One element of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodeElement {
    /// A namespace.
    Namespace(CodeNamespace),
    /// A class.
    Class(CodeClass),
    /// An interface.
    Interface(CodeInterface),
    /// An enum.
    Enum(CodeEnum),
    /// A method.
    Method(CodeMethod),
    /// A property.
    Property(CodeProperty),
    /// A parameter.
    Parameter(CodeParameter),
    /// An import declaration.
    Import(ImportDeclaration),
}

impl CodeElement {
    /// Kind tag.
    pub fn kind(&self) -> ElementKind {
        match self {
            CodeElement::Namespace(_) => ElementKind::Namespace,
            CodeElement::Class(_) => ElementKind::Class,
            CodeElement::Interface(_) => ElementKind::Interface,
            CodeElement::Enum(_) => ElementKind::Enum,
            CodeElement::Method(_) => ElementKind::Method,
            CodeElement::Property(_) => ElementKind::Property,
            CodeElement::Parameter(_) => ElementKind::Parameter,
            CodeElement::Import(_) => ElementKind::Import,
        }
    }

    /// Identifier of the element.
    pub fn name(&self) -> &str {
        match self {
            CodeElement::Namespace(x) => &x.name,
            CodeElement::Class(x) => &x.name,
            CodeElement::Interface(x) => &x.name,
            CodeElement::Enum(x) => &x.name,
            CodeElement::Method(x) => &x.name,
            CodeElement::Property(x) => &x.name,
            CodeElement::Parameter(x) => &x.name,
            CodeElement::Import(x) => &x.name,
        }
    }

    /// Whether the element can be referenced by a type reference.
    pub fn is_type_definition(&self) -> bool {
        matches!(
            self,
            CodeElement::Class(_) | CodeElement::Interface(_) | CodeElement::Enum(_)
        )
    }

    /// Calls `f` on every type reference owned by this element, nested alternatives included.
    pub fn for_each_type_reference(&self, f: &mut dyn FnMut(&TypeReference)) {
        match self {
            CodeElement::Namespace(_) | CodeElement::Enum(_) => {}
            CodeElement::Class(class) => {
                if let Some(inherits) = &class.inherits {
                    inherits.visit(f);
                }
                for implemented in &class.implements {
                    implemented.visit(f);
                }
            }
            CodeElement::Interface(interface) => {
                if let Some(inherits) = &interface.inherits {
                    inherits.visit(f);
                }
            }
            CodeElement::Method(method) => {
                if let Some(return_type) = &method.return_type {
                    return_type.visit(f);
                }
            }
            CodeElement::Property(property) => property.type_.visit(f),
            CodeElement::Parameter(parameter) => parameter.type_.visit(f),
            CodeElement::Import(import) => {
                if let Some(declaration) = &import.declaration {
                    declaration.visit(f);
                }
            }
        }
    }

    /// Mutable counterpart of [`CodeElement::for_each_type_reference`].
    pub fn for_each_type_reference_mut(&mut self, f: &mut dyn FnMut(&mut TypeReference)) {
        match self {
            CodeElement::Namespace(_) | CodeElement::Enum(_) => {}
            CodeElement::Class(class) => {
                if let Some(inherits) = &mut class.inherits {
                    inherits.visit_mut(f);
                }
                for implemented in &mut class.implements {
                    implemented.visit_mut(f);
                }
            }
            CodeElement::Interface(interface) => {
                if let Some(inherits) = &mut interface.inherits {
                    inherits.visit_mut(f);
                }
            }
            CodeElement::Method(method) => {
                if let Some(return_type) = &mut method.return_type {
                    return_type.visit_mut(f);
                }
            }
            CodeElement::Property(property) => property.type_.visit_mut(f),
            CodeElement::Parameter(parameter) => parameter.type_.visit_mut(f),
            CodeElement::Import(import) => {
                if let Some(declaration) = &mut import.declaration {
                    declaration.visit_mut(f);
                }
            }
        }
    }

    /// Top-level type references owned by this element (alternatives not expanded).
    pub fn top_level_type_references_mut(&mut self) -> Vec<&mut TypeReference> {
        match self {
            CodeElement::Namespace(_) | CodeElement::Enum(_) => Vec::new(),
            CodeElement::Class(class) => class
                .inherits
                .iter_mut()
                .chain(class.implements.iter_mut())
                .collect(),
            CodeElement::Interface(interface) => interface.inherits.iter_mut().collect(),
            CodeElement::Method(method) => method.return_type.iter_mut().collect(),
            CodeElement::Property(property) => vec![&mut property.type_],
            CodeElement::Parameter(parameter) => vec![&mut parameter.type_],
            CodeElement::Import(import) => import.declaration.iter_mut().collect(),
        }
    }
}

macro_rules! element_accessors {
    ($($variant:ident => $ty:ty, $as_ref:ident, $as_mut:ident;)*) => {
        impl CodeElement {
            $(
                #[doc = concat!("The element as a [`", stringify!($ty), "`], if it is one.")]
                pub fn $as_ref(&self) -> Option<&$ty> {
                    match self {
                        CodeElement::$variant(x) => Some(x),
                        _ => None,
                    }
                }

                #[doc = concat!("The element as a mutable [`", stringify!($ty), "`], if it is one.")]
                pub fn $as_mut(&mut self) -> Option<&mut $ty> {
                    match self {
                        CodeElement::$variant(x) => Some(x),
                        _ => None,
                    }
                }
            )*
        }
    };
}

element_accessors! {
    Namespace => CodeNamespace, as_namespace, as_namespace_mut;
    Class => CodeClass, as_class, as_class_mut;
    Interface => CodeInterface, as_interface, as_interface_mut;
    Enum => CodeEnum, as_enum, as_enum_mut;
    Method => CodeMethod, as_method, as_method_mut;
    Property => CodeProperty, as_property, as_property_mut;
    Parameter => CodeParameter, as_parameter, as_parameter_mut;
    Import => ImportDeclaration, as_import, as_import_mut;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_rules() {
        assert!(ElementKind::Class.can_belong_to(ElementKind::Namespace));
        assert!(ElementKind::Method.can_belong_to(ElementKind::Class));
        assert!(ElementKind::Property.can_belong_to(ElementKind::Interface));
        assert!(!ElementKind::Method.can_belong_to(ElementKind::Interface));
        assert!(!ElementKind::Class.can_belong_to(ElementKind::Class));
        assert!(!ElementKind::Parameter.can_belong_to(ElementKind::Class));
    }

    #[test]
    fn test_visit_reaches_nested_alternatives() {
        let mut union = TypeReference::union(
            "Result",
            vec![
                TypeReference::new("string"),
                TypeReference::union("Inner", vec![TypeReference::new("integer")]),
            ],
        );
        let mut seen = Vec::new();
        union.visit(&mut |t| seen.push(t.name.clone()));
        assert_eq!(seen, ["Result", "string", "Inner", "integer"]);

        union.visit_mut(&mut |t| t.is_nullable = false);
        assert!(!union.alternatives[1].alternatives[0].is_nullable);
    }

    #[test]
    fn test_enum_members_stay_unique() {
        let mut color = CodeEnum::new("Color");
        assert!(color.add_member("red"));
        assert!(!color.add_member("red"));
        assert_eq!(color.members, ["red"]);
    }

    #[test]
    fn test_serialization_name_capture_is_sticky() {
        let mut prop = CodeProperty::new(
            "user",
            PropertyKind::Custom,
            TypeReference::new("string"),
        );
        prop.capture_serialization_name();
        prop.name = "user_prop".into();
        prop.capture_serialization_name();
        assert_eq!(prop.serialization_name.as_deref(), Some("user"));
        assert_eq!(prop.wire_name(), "user");
    }

    #[test]
    fn test_element_round_trips_through_json() {
        let method = CodeElement::Method(
            CodeMethod::new("get", MethodKind::RequestExecutor)
                .with_verb(HttpVerb::Get)
                .returning(TypeReference::new("string"))
                .asynchronous(),
        );
        let json = serde_json::to_string(&method).unwrap();
        let back: CodeElement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, method);
    }
}
