use std::collections::HashSet;
use std::sync::LazyLock;

use super::{Capitalization, LanguageConventions, PrimitiveType};

/// Ruby keywords, lower-cased (`BEGIN` and `END` collapse into their lower-case forms).
pub static RUBY_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "__encoding__", "__line__", "__file__", "alias", "and", "begin", "break", "case", "class",
        "def", "defined?", "do", "else", "elsif", "end", "ensure", "false", "for", "if", "in",
        "module", "next", "nil", "not", "or", "redo", "rescue", "retry", "return", "self", "super",
        "then", "true", "undef", "unless", "until", "when", "while", "yield",
    ]
    .into_iter()
    .collect()
});

/// Ruby.
#[derive(Debug, Clone, Copy, Default)]
pub struct RubyConventions;

impl LanguageConventions for RubyConventions {
    fn reserved_words(&self) -> &'static HashSet<&'static str> {
        &RUBY_RESERVED_WORDS
    }

    fn native_type(&self, primitive: PrimitiveType) -> &'static str {
        match primitive {
            PrimitiveType::String | PrimitiveType::Binary => "String",
            PrimitiveType::Integer | PrimitiveType::Int64 => "Integer",
            PrimitiveType::Float | PrimitiveType::Double => "Float",
            PrimitiveType::Decimal => "BigDecimal",
            PrimitiveType::Boolean => "Boolean",
            PrimitiveType::Date => "Date",
            PrimitiveType::DateTime => "DateTime",
            PrimitiveType::Time => "Time",
            PrimitiveType::Duration => "ActiveSupport::Duration",
            PrimitiveType::Guid => "UUIDTools::UUID",
            PrimitiveType::Void => "nil",
            PrimitiveType::Object => "Object",
        }
    }

    fn member_case(&self) -> Capitalization {
        Capitalization::SnakeCase
    }
}
