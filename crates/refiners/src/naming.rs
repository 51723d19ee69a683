//! Identifier case helpers shared by passes and convention tables.

/// Capitalize the first letter of a string.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Lower-case the first letter of a string.
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

/// Convert a camelCase or PascalCase identifier to snake_case.
///
/// Runs of capitals stay together (`HTTPClient` becomes `http_client`) and
/// separators such as `-`, `.` and spaces become underscores.
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);
    for (i, c) in chars.iter().copied().enumerate() {
        if matches!(c, '-' | '.' | ' ') {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            continue;
        }
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let starts_word = prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit())
                || (prev.is_some_and(char::is_uppercase) && next.is_some_and(char::is_lowercase));
            if starts_word && !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Convert a separated or camelCase identifier to PascalCase.
pub fn to_pascal_case(s: &str) -> String {
    s.split(['_', '-', '.', ' '])
        .filter(|part| !part.is_empty())
        .map(capitalize_first)
        .collect()
}

/// Convert a separated or PascalCase identifier to camelCase.
pub fn to_camel_case(s: &str) -> String {
    lower_first(&to_pascal_case(s))
}
