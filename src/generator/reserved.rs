//! Reserved-word guarding for generated identifiers.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Marker appended to identifiers that collide with a reserved word
pub const GUARD_MARKER: char = '_';

/// Java language keywords
pub const LANGUAGE_KEYWORDS: &[&str] = &[
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "try",
    "void",
    "volatile",
    "while",
];

/// Names owned by the base types generated classes extend.
///
/// A `properties` field would produce a Lombok `getProperties()` that shadows
/// the inherited accessor on hook targets.
pub const DOMAIN_RESERVED: &[&str] = &["properties"];

static RESERVED: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    LANGUAGE_KEYWORDS
        .iter()
        .chain(DOMAIN_RESERVED)
        .copied()
        .collect()
});

/// Whether `token` is a Java keyword (domain-reserved words excluded)
pub fn is_language_keyword(token: &str) -> bool {
    LANGUAGE_KEYWORDS.contains(&token)
}

/// Whether `token` needs guarding
pub fn is_reserved(token: &str) -> bool {
    RESERVED.contains(token)
}

/// Return a collision-safe identifier for `token`
///
/// Reserved tokens get a single [`GUARD_MARKER`] appended; everything else is
/// returned unchanged.
///
/// ```rust
/// use cfn_java_codegen::generator::guard;
///
/// assert_eq!(guard("enum"), "enum_");
/// assert_eq!(guard("properties"), "properties_");
/// assert_eq!(guard("name"), "name");
/// ```
pub fn guard(token: &str) -> String {
    if is_reserved(token) {
        let mut guarded = String::with_capacity(token.len() + 1);
        guarded.push_str(token);
        guarded.push(GUARD_MARKER);
        guarded
    } else {
        token.to_string()
    }
}
