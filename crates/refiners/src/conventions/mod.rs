//! Per-language naming and type tables.
//!
//! Pure functions only: abstract primitive names to native spellings, the
//! reserved-word set of each language (matched case-insensitively) and the
//! capitalization rules applied to type and member names.

use std::collections::HashSet;
use std::fmt;

use crate::config::GenerationLanguage;
use crate::naming::{to_camel_case, to_pascal_case, to_snake_case};

mod csharp;
mod go;
mod java;
mod ruby;
mod typescript;

pub use csharp::CSharpConventions;
pub use go::GoConventions;
pub use java::JavaConventions;
pub use ruby::RubyConventions;
pub use typescript::TypeScriptConventions;

/// Primitive types of the language-neutral model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// Text.
    String,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    Int64,
    /// Single precision float.
    Float,
    /// Double precision float.
    Double,
    /// Arbitrary precision decimal.
    Decimal,
    /// Boolean.
    Boolean,
    /// Calendar date.
    Date,
    /// Date and time with offset.
    DateTime,
    /// Time of day.
    Time,
    /// Duration.
    Duration,
    /// Raw bytes.
    Binary,
    /// UUID.
    Guid,
    /// No value.
    Void,
    /// Untyped value.
    Object,
}

impl PrimitiveType {
    /// Parses an abstract type name, ignoring case.
    pub fn from_abstract(name: &str) -> Option<Self> {
        let primitive = match name.to_ascii_lowercase().as_str() {
            "string" => PrimitiveType::String,
            "integer" | "int" | "int32" => PrimitiveType::Integer,
            "int64" | "long" => PrimitiveType::Int64,
            "float" | "float32" => PrimitiveType::Float,
            "double" | "float64" | "number" => PrimitiveType::Double,
            "decimal" => PrimitiveType::Decimal,
            "boolean" | "bool" => PrimitiveType::Boolean,
            "date" | "dateonly" => PrimitiveType::Date,
            "datetime" | "datetimeoffset" => PrimitiveType::DateTime,
            "time" | "timeonly" => PrimitiveType::Time,
            "duration" | "timespan" => PrimitiveType::Duration,
            "binary" | "base64" | "stream" => PrimitiveType::Binary,
            "guid" | "uuid" => PrimitiveType::Guid,
            "void" => PrimitiveType::Void,
            "object" => PrimitiveType::Object,
            _ => return None,
        };
        Some(primitive)
    }

    /// Canonical abstract spelling.
    pub fn abstract_name(self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Int64 => "int64",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Decimal => "decimal",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Date => "date",
            PrimitiveType::DateTime => "datetime",
            PrimitiveType::Time => "time",
            PrimitiveType::Duration => "duration",
            PrimitiveType::Binary => "binary",
            PrimitiveType::Guid => "guid",
            PrimitiveType::Void => "void",
            PrimitiveType::Object => "object",
        }
    }
}

/// Capitalization rule for identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capitalization {
    /// `DisplayName`
    PascalCase,
    /// `displayName`
    CamelCase,
    /// `display_name`
    SnakeCase,
}

impl Capitalization {
    /// Rewrites `name` to this rule.
    pub fn apply(self, name: &str) -> String {
        match self {
            Capitalization::PascalCase => to_pascal_case(name),
            Capitalization::CamelCase => to_camel_case(name),
            Capitalization::SnakeCase => to_snake_case(name),
        }
    }
}

/// Naming and type facts of one target language.
pub trait LanguageConventions: fmt::Debug + Send + Sync {
    /// Reserved words, lower-cased.
    fn reserved_words(&self) -> &'static HashSet<&'static str>;

    /// Native spelling of a primitive.
    fn native_type(&self, primitive: PrimitiveType) -> &'static str;

    /// Rule for type names.
    fn type_case(&self) -> Capitalization {
        Capitalization::PascalCase
    }

    /// Rule for method and property names.
    fn member_case(&self) -> Capitalization;

    /// Whether `name` collides with a reserved word, ignoring case.
    fn is_reserved(&self, name: &str) -> bool {
        self.reserved_words().contains(name.to_ascii_lowercase().as_str())
    }

    /// Native spelling of an abstract type name, if it names a primitive.
    fn translate_type(&self, abstract_name: &str) -> Option<&'static str> {
        PrimitiveType::from_abstract(abstract_name).map(|p| self.native_type(p))
    }
}

/// Convention table for `language`. The shell target emits C#.
pub fn for_language(language: GenerationLanguage) -> &'static dyn LanguageConventions {
    match language {
        GenerationLanguage::CSharp | GenerationLanguage::Shell => &CSharpConventions,
        GenerationLanguage::Java => &JavaConventions,
        GenerationLanguage::TypeScript => &TypeScriptConventions,
        GenerationLanguage::Go => &GoConventions,
        GenerationLanguage::Ruby => &RubyConventions,
    }
}
