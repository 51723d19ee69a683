//! Wire behaviour of synthesized union wrappers over JSON payloads.
//!
//! A wrapper holds at most one populated member. Serializing writes that
//! member's value inline. Deserializing keeps the most specific alternative the
//! payload conforms to: an integer beats a double, a formatted string (date,
//! uuid) beats plain text, and a declared type beats an untyped one. Equally
//! specific alternatives keep declared order.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use sdkgen_dom::{
    CodeElement, CodeTree, CollectionKind, ElementId, ElementKind, PropertyKind, StructuralError,
    TypeReference,
};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::conventions::PrimitiveType;

/// Errors of [`UnionCodec`].
#[derive(Debug, Error)]
pub enum CodecError {
    /// The element is not a class flagged as union wrapper.
    #[error("'{0}' is not a union wrapper")]
    NotAWrapper(String),

    /// Serializing a wrapper with every member unset.
    #[error("no member of the wrapper is set")]
    NoMemberSet,

    /// Serializing a wrapper with more than one member set.
    #[error("only one member may be set, found {}", .0.join(", "))]
    SeveralMembersSet(Vec<String>),

    /// The value names a member the wrapper does not declare.
    #[error("unknown wrapper member '{0}'")]
    UnknownMember(String),

    /// The member value does not match the member type.
    #[error("value of member '{member}' is not a valid {expected}")]
    NonConforming {
        /// Member name.
        member: String,
        /// Name of the member type.
        expected: String,
    },

    /// No alternative accepts the payload.
    #[error("payload matches none of {}", .0.join(", "))]
    NoAlternativeMatches(Vec<String>),

    /// The wrapper handle does not resolve.
    #[error(transparent)]
    Structural(#[from] StructuralError),
}

/// In-memory value of a wrapper: member name to value, unset members absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WrapperValue {
    /// Set members.
    pub members: BTreeMap<String, Value>,
}

impl WrapperValue {
    /// Value with only `member` set.
    pub fn with(member: impl Into<String>, value: Value) -> Self {
        let mut members = BTreeMap::new();
        members.insert(member.into(), value);
        Self { members }
    }

    /// Members holding a non-null value.
    pub fn set_members(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.members
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.as_str(), v))
    }
}

#[derive(Debug, Clone)]
struct Member {
    name: String,
    type_: TypeReference,
}

/// Serializer and deserializer of one wrapper class.
#[derive(Debug)]
pub struct UnionCodec<'a> {
    tree: &'a CodeTree,
    members: Vec<Member>,
}

impl<'a> UnionCodec<'a> {
    /// Codec for the wrapper class `wrapper`.
    pub fn new(tree: &'a CodeTree, wrapper: ElementId) -> Result<Self, CodecError> {
        let is_wrapper = tree
            .element(wrapper)?
            .as_class()
            .is_some_and(|c| c.is_union_wrapper);
        if !is_wrapper {
            return Err(CodecError::NotAWrapper(tree.qualified_path(wrapper)));
        }
        let members = tree
            .children_of_kind(wrapper, ElementKind::Property)
            .into_iter()
            .filter_map(|id| tree.get(id).and_then(CodeElement::as_property))
            .map(|p| Member {
                name: p.name.clone(),
                type_: p.type_.clone(),
            })
            .collect();
        Ok(Self { tree, members })
    }

    /// Member names in declared order.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.name.as_str())
    }

    /// Writes the single set member.
    pub fn serialize(&self, value: &WrapperValue) -> Result<Value, CodecError> {
        let set: Vec<(&str, &Value)> = value.set_members().collect();
        let (name, payload) = match set.as_slice() {
            [] => return Err(CodecError::NoMemberSet),
            [single] => *single,
            several => {
                return Err(CodecError::SeveralMembersSet(
                    several.iter().map(|(n, _)| (*n).to_string()).collect(),
                ))
            }
        };
        let member = self
            .members
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| CodecError::UnknownMember(name.to_string()))?;
        if !conforms(self.tree, &member.type_, payload) {
            return Err(CodecError::NonConforming {
                member: member.name.clone(),
                expected: member.type_.name.clone(),
            });
        }
        Ok(payload.clone())
    }

    /// Reads a payload into the most specific alternative that accepts it.
    ///
    /// `null` decodes to a wrapper with no member set.
    pub fn deserialize(&self, payload: &Value) -> Result<WrapperValue, CodecError> {
        if payload.is_null() {
            return Ok(WrapperValue::default());
        }
        let chosen = self
            .members
            .iter()
            .filter(|m| conforms(self.tree, &m.type_, payload))
            .min_by_key(|m| Reverse(specificity(self.tree, &m.type_)));
        match chosen {
            Some(member) => {
                debug!(member = %member.name, "Selected union alternative.");
                Ok(WrapperValue::with(member.name.as_str(), payload.clone()))
            }
            None => Err(CodecError::NoAlternativeMatches(
                self.members.iter().map(|m| m.type_.name.clone()).collect(),
            )),
        }
    }
}

/// How narrowly `type_` constrains its payload. Higher wins among conforming
/// alternatives; collections rank by their item type.
fn specificity(tree: &CodeTree, type_: &TypeReference) -> u8 {
    match tree.resolve(type_) {
        Some(CodeElement::Enum(_)) => 6,
        Some(CodeElement::Class(_)) => 5,
        Some(CodeElement::Interface(_)) => 4,
        Some(_) => 0,
        None => match PrimitiveType::from_abstract(&type_.name) {
            Some(
                PrimitiveType::Date
                | PrimitiveType::DateTime
                | PrimitiveType::Time
                | PrimitiveType::Duration
                | PrimitiveType::Guid
                | PrimitiveType::Integer
                | PrimitiveType::Int64,
            ) => 3,
            Some(
                PrimitiveType::Float
                | PrimitiveType::Double
                | PrimitiveType::Decimal
                | PrimitiveType::Boolean,
            ) => 2,
            Some(PrimitiveType::String | PrimitiveType::Binary) => 1,
            Some(PrimitiveType::Void | PrimitiveType::Object) | None => 0,
        },
    }
}

/// Whether `value` is a valid encoding of `type_`.
fn conforms(tree: &CodeTree, type_: &TypeReference, value: &Value) -> bool {
    if value.is_null() {
        return type_.is_nullable;
    }
    if type_.is_collection() {
        let item = TypeReference {
            collection_kind: CollectionKind::None,
            ..type_.clone()
        };
        return value
            .as_array()
            .is_some_and(|items| items.iter().all(|v| conforms(tree, &item, v)));
    }
    match tree.resolve(type_) {
        Some(CodeElement::Enum(code_enum)) => value
            .as_str()
            .is_some_and(|s| code_enum.members.iter().any(|m| m == s)),
        Some(CodeElement::Class(_)) => match (type_.type_definition, value.as_object()) {
            (Some(class), Some(object)) => object_conforms(tree, class, object),
            _ => false,
        },
        Some(CodeElement::Interface(_)) => value.is_object(),
        Some(_) => false,
        None => primitive_conforms(type_, value),
    }
}

fn object_conforms(
    tree: &CodeTree,
    class: ElementId,
    object: &serde_json::Map<String, Value>,
) -> bool {
    let properties: Vec<_> = tree
        .children_of_kind(class, ElementKind::Property)
        .into_iter()
        .filter_map(|id| tree.get(id).and_then(CodeElement::as_property))
        .collect();
    let open = properties.iter().any(|p| p.kind == PropertyKind::AdditionalData);
    object.iter().all(|(key, v)| {
        match properties
            .iter()
            .find(|p| p.kind == PropertyKind::Custom && p.wire_name() == key)
        {
            Some(property) => conforms(tree, &property.type_, v),
            None => open,
        }
    })
}

fn primitive_conforms(type_: &TypeReference, value: &Value) -> bool {
    match PrimitiveType::from_abstract(&type_.name) {
        Some(PrimitiveType::String | PrimitiveType::Binary) => value.is_string(),
        Some(PrimitiveType::Date) => value.as_str().is_some_and(is_date),
        Some(PrimitiveType::DateTime) => value.as_str().is_some_and(is_date_time),
        Some(PrimitiveType::Time) => value.as_str().is_some_and(is_time),
        Some(PrimitiveType::Duration) => value.as_str().is_some_and(is_duration),
        Some(PrimitiveType::Guid) => value.as_str().is_some_and(is_guid),
        Some(PrimitiveType::Integer | PrimitiveType::Int64) => value.is_i64() || value.is_u64(),
        Some(PrimitiveType::Float | PrimitiveType::Double | PrimitiveType::Decimal) => {
            value.is_number()
        }
        Some(PrimitiveType::Boolean) => value.is_boolean(),
        Some(PrimitiveType::Void) => false,
        // untyped and external types accept any payload
        Some(PrimitiveType::Object) | None => true,
    }
}

/// `separator`-delimited groups of ASCII digits with exactly the given widths.
fn digit_groups(text: &str, separator: char, widths: &[usize]) -> bool {
    let groups: Vec<&str> = text.split(separator).collect();
    groups.len() == widths.len()
        && groups
            .iter()
            .zip(widths)
            .all(|(group, width)| {
                group.len() == *width && group.bytes().all(|b| b.is_ascii_digit())
            })
}

/// `2024-05-01`
fn is_date(text: &str) -> bool {
    digit_groups(text, '-', &[4, 2, 2])
}

/// `13:45`, `13:45:00` or `13:45:00.125`
fn is_time(text: &str) -> bool {
    let (clock, fraction) = text.split_once('.').unwrap_or((text, "0"));
    (digit_groups(clock, ':', &[2, 2, 2]) || digit_groups(clock, ':', &[2, 2]))
        && !fraction.is_empty()
        && fraction.bytes().all(|b| b.is_ascii_digit())
}

/// `2024-05-01T13:45:00Z`, with an optional numeric offset instead of `Z`.
fn is_date_time(text: &str) -> bool {
    let Some((date, rest)) = text.split_once(['T', 't', ' ']) else {
        return false;
    };
    let clock = rest
        .strip_suffix(['Z', 'z'])
        .unwrap_or_else(|| without_offset(rest));
    is_date(date) && is_time(clock)
}

/// `13:45:00` out of `13:45:00+02:00`.
fn without_offset(text: &str) -> &str {
    text.rfind(['+', '-'])
        .map(|at| text.split_at(at))
        .filter(|(_, offset)| offset.get(1..).is_some_and(|o| digit_groups(o, ':', &[2, 2])))
        .map_or(text, |(clock, _)| clock)
}

/// ISO 8601 duration such as `P1DT2H` or `-PT30M`.
fn is_duration(text: &str) -> bool {
    let body = text.strip_prefix('-').unwrap_or(text);
    body.strip_prefix('P').is_some_and(|rest| {
        !rest.is_empty()
            && rest.bytes().any(|b| b.is_ascii_alphabetic())
            && rest
                .bytes()
                .all(|b| b.is_ascii_digit() || b"YMWDTHS.,".contains(&b))
    })
}

/// `8-4-4-4-12` hexadecimal groups.
fn is_guid(text: &str) -> bool {
    let widths = [8, 4, 4, 4, 12];
    let groups: Vec<&str> = text.split('-').collect();
    groups.len() == widths.len()
        && groups
            .iter()
            .zip(widths)
            .all(|(group, width)| {
                group.len() == width && group.bytes().all(|b| b.is_ascii_hexdigit())
            })
}
