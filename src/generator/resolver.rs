//! Resolution of flattened schema objects into Java class definitions
//!
//! Every [`FlattenedObject`] becomes exactly one [`ResolvedClass`]. Class names
//! come from the schema path, property identifiers are made legal and guarded,
//! and object references are rewritten to the referenced class's name.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::warn;

use super::flatten::{FlatType, FlattenedGraph, FlattenedObject, ObjectKey, Primitive};
use super::namespace::Namespace;
use super::operations::Operation;
use super::reserved::guard;
use crate::error::{Error, Result};

/// Well-known name of the top-level resource class
pub const ROOT_CLASS_NAME: &str = "ResourceModel";

/// Fallback base name for objects reached only through structural paths
const ANONYMOUS_CLASS_NAME: &str = "Object";

/// Class names that generated POJOs cannot take: JDK types the templates
/// import and the classes emitted next to them. The per-operation handler and
/// test classes are added from [`Operation::ALL`].
const TAKEN_CLASS_NAMES: &[&str] = &[
    "ArrayList",
    "BaseConfiguration",
    "BaseHandler",
    "Boolean",
    "CallbackContext",
    "Configuration",
    "Double",
    "HandlerWrapper",
    "Integer",
    "JSONObject",
    "List",
    "Map",
    "Object",
    "Set",
    "String",
];

/// A Java type reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JavaType {
    String,
    Integer,
    Double,
    Boolean,
    Object,
    /// A generated class, by resolved name
    Class(String),
    List(Box<JavaType>),
    Set(Box<JavaType>),
    Map(Box<JavaType>),
}

impl fmt::Display for JavaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("String"),
            Self::Integer => f.write_str("Integer"),
            Self::Double => f.write_str("Double"),
            Self::Boolean => f.write_str("Boolean"),
            Self::Object => f.write_str("Object"),
            Self::Class(name) => f.write_str(name),
            Self::List(item) => write!(f, "List<{item}>"),
            Self::Set(item) => write!(f, "Set<{item}>"),
            Self::Map(value) => write!(f, "Map<String, {value}>"),
        }
    }
}

/// A generation-ready property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProperty {
    /// Name as declared in the schema, used for the JSON binding
    pub name: String,
    /// Legal, guarded Java field identifier
    pub ident: String,
    pub ty: JavaType,
    pub required: bool,
}

impl ResolvedProperty {
    /// Lombok accessor suffix (`getFoo` / `setFoo`)
    pub fn accessor(&self) -> String {
        uppercase_first(&self.ident)
    }

    /// Java source form of the declared type
    pub fn java_type(&self) -> String {
        self.ty.to_string()
    }

    /// Schema name escaped for use inside a Java string literal
    pub fn name_literal(&self) -> String {
        self.name.replace('\\', "\\\\").replace('"', "\\\"")
    }
}

/// A generation-ready class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedClass {
    pub name: String,
    pub namespace: Namespace,
    /// Schema path of the object this class was resolved from
    pub key: ObjectKey,
    /// Schema declaration order, never reordered
    pub properties: Vec<ResolvedProperty>,
}

impl ResolvedClass {
    pub fn is_root(&self) -> bool {
        self.key.is_root()
    }
}

/// Resolved classes keyed by class name, in graph order
pub type ResolvedClasses = IndexMap<String, ResolvedClass>;

/// Resolve every object in `graph` into a class
///
/// The root object is named `root_name`; the others take the PascalCase form
/// of their schema name. Later objects whose name is already taken get a
/// numeric suffix, so the result is collision-free and deterministic. The
/// same rule applies to property identifiers within one class.
///
/// # Errors
///
/// Returns [`Error::UndefinedObject`] when a property refers to an object that
/// is not in the graph.
pub fn resolve(
    graph: &FlattenedGraph,
    root_name: &str,
    namespace: &Namespace,
) -> Result<ResolvedClasses> {
    let mut seen: HashSet<String> = TAKEN_CLASS_NAMES.iter().map(|s| (*s).to_string()).collect();
    for op in Operation::ALL {
        seen.insert(op.handler_class());
        seen.insert(op.test_class());
    }
    seen.remove(root_name);

    let mut names: IndexMap<&ObjectKey, String> = IndexMap::with_capacity(graph.len());
    for object in graph.iter() {
        let base = if object.key.is_root() {
            root_name.to_string()
        } else {
            class_base_name(&object.key)
        };
        names.insert(&object.key, unique_class_name(&mut seen, &base));
    }

    let mut classes = ResolvedClasses::with_capacity(graph.len());
    for object in graph.iter() {
        let name = names
            .get(&object.key)
            .cloned()
            .unwrap_or_else(|| root_name.to_string());
        let properties = resolve_properties(object, &name, &names)?;
        classes.insert(
            name.clone(),
            ResolvedClass {
                name,
                namespace: namespace.clone(),
                key: object.key.clone(),
                properties,
            },
        );
    }
    Ok(classes)
}

fn resolve_properties(
    object: &FlattenedObject,
    class_name: &str,
    names: &IndexMap<&ObjectKey, String>,
) -> Result<Vec<ResolvedProperty>> {
    let mut idents = HashSet::with_capacity(object.properties.len());
    object
        .properties
        .iter()
        .map(|prop| {
            let base = property_ident(&prop.name);
            let ident = next_free(&mut idents, &base);
            if ident != base {
                warn!(
                    class = %class_name,
                    property = %prop.name,
                    ident = %ident,
                    "Duplicate field identifier, using suffixed name"
                );
            }
            Ok(ResolvedProperty {
                name: prop.name.clone(),
                ident,
                ty: java_type(&prop.ty, class_name, names)?,
                required: prop.required,
            })
        })
        .collect()
}

fn java_type(
    ty: &FlatType,
    class_name: &str,
    names: &IndexMap<&ObjectKey, String>,
) -> Result<JavaType> {
    Ok(match ty {
        FlatType::Primitive(Primitive::String) => JavaType::String,
        FlatType::Primitive(Primitive::Integer) => JavaType::Integer,
        FlatType::Primitive(Primitive::Number) => JavaType::Double,
        FlatType::Primitive(Primitive::Boolean) => JavaType::Boolean,
        FlatType::Primitive(Primitive::Any) => JavaType::Object,
        FlatType::Object(key) => {
            let name = names.get(key).ok_or_else(|| Error::UndefinedObject {
                from: class_name.to_string(),
                missing: key.to_string(),
            })?;
            JavaType::Class(name.clone())
        }
        FlatType::List(item) => JavaType::List(Box::new(java_type(item, class_name, names)?)),
        FlatType::Set(item) => JavaType::Set(Box::new(java_type(item, class_name, names)?)),
        FlatType::Map(value) => JavaType::Map(Box::new(java_type(value, class_name, names)?)),
    })
}

/// Legal, guarded field identifier for a schema property name
///
/// ```rust
/// use cfn_java_codegen::generator::property_ident;
///
/// assert_eq!(property_ident("BucketName"), "bucketName");
/// assert_eq!(property_ident("enum"), "enum_");
/// assert_eq!(property_ident("2fa-code"), "_2fa_code");
/// ```
pub fn property_ident(name: &str) -> String {
    let mut ident = legal_chars(name);
    if ident.is_empty() {
        ident.push('_');
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    guard(&lowercase_first(&ident))
}

/// `name` with every character Java rejects in an identifier replaced by `_`
fn legal_chars(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// PascalCase class name from the last schema name on the key
pub fn class_base_name(key: &ObjectKey) -> String {
    let raw = key.base_name().unwrap_or(ANONYMOUS_CLASS_NAME);
    let mut name: String = raw
        .split(|c: char| !c.is_ascii_alphanumeric())
        .map(uppercase_first)
        .collect();
    if name.is_empty() {
        name.push_str(ANONYMOUS_CLASS_NAME);
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

pub(crate) fn unique_class_name(seen: &mut HashSet<String>, name: &str) -> String {
    let unique = next_free(seen, name);
    if unique != name {
        warn!(class = %name, renamed = %unique, "Duplicate class name, using suffixed name");
    }
    unique
}

/// `name`, or `name` with the lowest numeric suffix not yet in `seen`
fn next_free(seen: &mut HashSet<String>, name: &str) -> String {
    if seen.insert(name.to_string()) {
        return name.to_string();
    }
    let mut counter = 1;
    loop {
        let candidate = format!("{name}{counter}");
        if seen.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}

pub(crate) fn uppercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

pub(crate) fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// An identifier constant and its null-safe accessor chain on the root class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierKey {
    /// JSON pointer as declared, e.g. `/properties/Arn`
    pub pointer: String,
    /// `IDENTIFIER_KEY_ARN`
    pub const_name: String,
    /// `this.getArn()`
    pub getter_chain: String,
    /// `this.getArn() != null` (one check per nesting level)
    pub null_checks: String,
}

/// One additional identifier: a method name plus the keys it combines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierGroup {
    /// `getIdentifier_Arn`
    pub method_name: String,
    pub keys: Vec<IdentifierKey>,
}

/// `primaryIdentifier` and `additionalIdentifiers` of a resource schema
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceIdentifiers {
    pub primary: Vec<IdentifierKey>,
    pub additional: Vec<IdentifierGroup>,
}

impl ResourceIdentifiers {
    /// Read identifier declarations from a resource schema
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] if a pointer is not a string under
    /// `/properties/`.
    pub fn from_schema(schema: &Value) -> Result<Self> {
        let primary = match schema.get("primaryIdentifier") {
            Some(list) => identifier_list(list, "/primaryIdentifier")?,
            None => Vec::new(),
        };

        let mut additional = Vec::new();
        if let Some(groups) = schema.get("additionalIdentifiers") {
            let groups = groups.as_array().ok_or_else(|| Error::Schema {
                pointer: "#/additionalIdentifiers".to_string(),
                reason: "must be a list of identifier lists".to_string(),
            })?;
            for (i, group) in groups.iter().enumerate() {
                let keys = identifier_list(group, &format!("/additionalIdentifiers/{i}"))?;
                let method_name = keys.iter().fold("getIdentifier".to_string(), |acc, key| {
                    let last = key.pointer.rsplit('/').next().unwrap_or_default();
                    format!("{acc}_{}", uppercase_first(&legal_chars(last)))
                });
                additional.push(IdentifierGroup { method_name, keys });
            }
        }

        Ok(Self {
            primary,
            additional,
        })
    }

    /// Rewrite accessor chains to the field identifiers `classes` settled on
    ///
    /// Keys whose path cannot be followed through the resolved classes keep
    /// the accessors derived from the pointer alone.
    pub fn bind(mut self, classes: &ResolvedClasses) -> Self {
        let Some(root) = classes.values().find(|class| class.is_root()) else {
            return self;
        };
        let keys = self
            .primary
            .iter_mut()
            .chain(self.additional.iter_mut().flat_map(|group| group.keys.iter_mut()));
        for key in keys {
            if let Some(getters) = bound_getters(root, classes, &key.pointer) {
                key.set_getters(&getters);
            }
        }
        self
    }

    /// Every distinct key, primary first, for the constant declarations
    pub fn all_keys(&self) -> Vec<IdentifierKey> {
        let mut seen = HashSet::new();
        self.primary
            .iter()
            .chain(self.additional.iter().flat_map(|g| g.keys.iter()))
            .filter(|key| seen.insert(key.const_name.clone()))
            .cloned()
            .collect()
    }
}

fn identifier_list(value: &Value, location: &str) -> Result<Vec<IdentifierKey>> {
    let invalid = |reason: &str| Error::Schema {
        pointer: format!("#{location}"),
        reason: reason.to_string(),
    };
    value
        .as_array()
        .ok_or_else(|| invalid("must be a list of JSON pointers"))?
        .iter()
        .map(|pointer| {
            let pointer = pointer
                .as_str()
                .ok_or_else(|| invalid("identifier must be a string"))?;
            identifier_key(pointer).ok_or_else(|| {
                invalid(&format!("identifier '{pointer}' must start with /properties/"))
            })
        })
        .collect()
}

/// Property names along an identifier pointer, `None` unless it is under
/// `/properties/`
fn pointer_path(pointer: &str) -> Option<Vec<&str>> {
    let path: Vec<&str> = pointer
        .strip_prefix("/properties/")?
        .split('/')
        .filter(|c| !c.is_empty())
        .collect();
    (!path.is_empty()).then_some(path)
}

fn identifier_key(pointer: &str) -> Option<IdentifierKey> {
    let path = pointer_path(pointer)?;
    let const_name = path
        .iter()
        .map(|segment| legal_chars(segment).to_uppercase())
        .collect::<Vec<_>>()
        .join("_");
    let getters: Vec<String> = path
        .iter()
        .map(|c| format!("get{}()", uppercase_first(&property_ident(c))))
        .collect();

    let mut key = IdentifierKey {
        pointer: pointer.to_string(),
        const_name: format!("IDENTIFIER_KEY_{const_name}"),
        getter_chain: String::new(),
        null_checks: String::new(),
    };
    key.set_getters(&getters);
    Some(key)
}

/// Lombok getters for `pointer`, following property types from `root`
fn bound_getters(
    root: &ResolvedClass,
    classes: &ResolvedClasses,
    pointer: &str,
) -> Option<Vec<String>> {
    let path = pointer_path(pointer)?;
    let mut class = root;
    let mut getters = Vec::with_capacity(path.len());
    for (depth, segment) in path.iter().enumerate() {
        let prop = class.properties.iter().find(|p| p.name == *segment)?;
        getters.push(format!("get{}()", prop.accessor()));
        if depth + 1 < path.len() {
            class = match &prop.ty {
                JavaType::Class(name) => classes.get(name)?,
                _ => return None,
            };
        }
    }
    Some(getters)
}

impl IdentifierKey {
    fn set_getters(&mut self, getters: &[String]) {
        self.getter_chain = format!("this.{}", getters.join("."));
        self.null_checks = (1..=getters.len())
            .map(|depth| format!("this.{} != null", getters[..depth].join(".")))
            .collect::<Vec<_>>()
            .join(" && ");
    }
}
