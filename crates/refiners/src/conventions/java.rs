use std::collections::HashSet;
use std::sync::LazyLock;

use super::{Capitalization, LanguageConventions, PrimitiveType};

/// Java keywords and literals.
pub static JAVA_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
        "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally",
        "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface",
        "long", "native", "new", "package", "private", "protected", "public", "return", "short",
        "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
        "transient", "try", "void", "volatile", "while", "true", "false", "null", "var", "record",
        "yield",
    ]
    .into_iter()
    .collect()
});

/// Java.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaConventions;

impl LanguageConventions for JavaConventions {
    fn reserved_words(&self) -> &'static HashSet<&'static str> {
        &JAVA_RESERVED_WORDS
    }

    fn native_type(&self, primitive: PrimitiveType) -> &'static str {
        match primitive {
            PrimitiveType::String => "String",
            PrimitiveType::Integer => "Integer",
            PrimitiveType::Int64 => "Long",
            PrimitiveType::Float => "Float",
            PrimitiveType::Double => "Double",
            PrimitiveType::Decimal => "BigDecimal",
            PrimitiveType::Boolean => "Boolean",
            PrimitiveType::Date => "LocalDate",
            PrimitiveType::DateTime => "OffsetDateTime",
            PrimitiveType::Time => "LocalTime",
            PrimitiveType::Duration => "PeriodAndDuration",
            PrimitiveType::Binary => "byte[]",
            PrimitiveType::Guid => "UUID",
            PrimitiveType::Void => "Void",
            PrimitiveType::Object => "Object",
        }
    }

    fn member_case(&self) -> Capitalization {
        Capitalization::CamelCase
    }
}
