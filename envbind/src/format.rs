//! Environment key derivation from field identifiers

/// Format a field identifier as an environment key segment.
///
/// Word boundaries are detected on case changes, so both Rust field names and
/// mixed-case identifiers produce upper snake case:
///
/// - `"allowed_origins"` -> `"ALLOWED_ORIGINS"`
/// - `"AllowedOrigins"` -> `"ALLOWED_ORIGINS"`
/// - `"DBName"` -> `"DB_NAME"`
/// - `"UserID"` -> `"USER_ID"`
///
/// ```
/// assert_eq!(envbind::format_key("TestA"), "TEST_A");
/// ```
pub fn format_key(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut key = String::with_capacity(ident.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() && chars[i - 1] != '_' {
            let prev_lower = chars[i - 1].is_lowercase();
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev_lower || next_lower {
                key.push('_');
            }
        }
        key.extend(c.to_uppercase());
    }

    key
}
