use std::collections::HashSet;
use std::sync::LazyLock;

use super::{Capitalization, LanguageConventions, PrimitiveType};

/// C# keywords and contextual keywords.
pub static CSHARP_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
        "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
        "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
        "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
        "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
        "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
        "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
        "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
        "void", "volatile", "while", "async", "await", "dynamic", "var", "yield", "when", "record",
    ]
    .into_iter()
    .collect()
});

/// C# (also used by the shell target).
#[derive(Debug, Clone, Copy, Default)]
pub struct CSharpConventions;

impl LanguageConventions for CSharpConventions {
    fn reserved_words(&self) -> &'static HashSet<&'static str> {
        &CSHARP_RESERVED_WORDS
    }

    fn native_type(&self, primitive: PrimitiveType) -> &'static str {
        match primitive {
            PrimitiveType::String => "string",
            PrimitiveType::Integer => "int",
            PrimitiveType::Int64 => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Decimal => "decimal",
            PrimitiveType::Boolean => "bool",
            PrimitiveType::Date => "Date",
            PrimitiveType::DateTime => "DateTimeOffset",
            PrimitiveType::Time => "Time",
            PrimitiveType::Duration => "TimeSpan",
            PrimitiveType::Binary => "byte[]",
            PrimitiveType::Guid => "Guid",
            PrimitiveType::Void => "void",
            PrimitiveType::Object => "object",
        }
    }

    fn member_case(&self) -> Capitalization {
        Capitalization::PascalCase
    }
}
