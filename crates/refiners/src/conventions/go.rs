use std::collections::HashSet;
use std::sync::LazyLock;

use super::{Capitalization, LanguageConventions, PrimitiveType};

/// Go keywords and predeclared identifiers generated code must not shadow.
pub static GO_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
        "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
        "return", "select", "struct", "switch", "type", "var", "string", "error", "bool", "byte",
        "rune", "int", "int32", "int64", "float32", "float64", "nil", "true", "false", "iota",
        "len", "make", "new", "append", "copy", "panic", "recover",
    ]
    .into_iter()
    .collect()
});

/// Go.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoConventions;

impl LanguageConventions for GoConventions {
    fn reserved_words(&self) -> &'static HashSet<&'static str> {
        &GO_RESERVED_WORDS
    }

    fn native_type(&self, primitive: PrimitiveType) -> &'static str {
        match primitive {
            PrimitiveType::String => "string",
            PrimitiveType::Integer => "int32",
            PrimitiveType::Int64 => "int64",
            PrimitiveType::Float => "float32",
            PrimitiveType::Double | PrimitiveType::Decimal => "float64",
            PrimitiveType::Boolean => "bool",
            PrimitiveType::Date => "DateOnly",
            PrimitiveType::DateTime => "time.Time",
            PrimitiveType::Time => "TimeOnly",
            PrimitiveType::Duration => "ISODuration",
            PrimitiveType::Binary => "[]byte",
            PrimitiveType::Guid => "uuid.UUID",
            // functions without a result declare none
            PrimitiveType::Void => "",
            PrimitiveType::Object => "any",
        }
    }

    fn member_case(&self) -> Capitalization {
        Capitalization::PascalCase
    }
}
