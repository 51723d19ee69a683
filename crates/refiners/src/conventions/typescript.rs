use std::collections::HashSet;
use std::sync::LazyLock;

use super::{Capitalization, LanguageConventions, PrimitiveType};

/// TypeScript reserved words that cannot be used as identifiers.
pub static TS_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "break",
        "case",
        "catch",
        "class",
        "const",
        "continue",
        "debugger",
        "default",
        "delete",
        "do",
        "else",
        "enum",
        "export",
        "extends",
        "false",
        "finally",
        "for",
        "function",
        "if",
        "import",
        "in",
        "instanceof",
        "new",
        "null",
        "return",
        "super",
        "switch",
        "this",
        "throw",
        "true",
        "try",
        "typeof",
        "var",
        "void",
        "while",
        "with",
        "yield",
        "let",
        "static",
        "implements",
        "interface",
        "package",
        "private",
        "protected",
        "public",
        "await",
        "async",
        "any",
        "boolean",
        "constructor",
        "declare",
        "module",
        "number",
        "require",
        "string",
        "symbol",
        "type",
    ]
    .into_iter()
    .collect()
});

/// TypeScript.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptConventions;

impl LanguageConventions for TypeScriptConventions {
    fn reserved_words(&self) -> &'static HashSet<&'static str> {
        &TS_RESERVED_WORDS
    }

    fn native_type(&self, primitive: PrimitiveType) -> &'static str {
        match primitive {
            PrimitiveType::String => "string",
            PrimitiveType::Integer
            | PrimitiveType::Int64
            | PrimitiveType::Float
            | PrimitiveType::Double
            | PrimitiveType::Decimal => "number",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Date => "DateOnly",
            PrimitiveType::DateTime => "Date",
            PrimitiveType::Time => "TimeOnly",
            PrimitiveType::Duration => "Duration",
            PrimitiveType::Binary => "ArrayBuffer",
            PrimitiveType::Guid => "Guid",
            PrimitiveType::Void => "void",
            PrimitiveType::Object => "object",
        }
    }

    fn member_case(&self) -> Capitalization {
        Capitalization::CamelCase
    }
}
