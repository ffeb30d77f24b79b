//! Resource schema flattening
//!
//! Walks a JSON resource schema and hoists every object schema (the root,
//! inline nested objects and `$ref`'d definitions) into a flat,
//! insertion-ordered graph. Properties keep their declaration order and refer
//! to other objects by [`ObjectKey`] instead of nesting.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Schema path of a flattened object
///
/// The root object has an empty path; a definition lives at
/// `["definitions", name]`, an inline object at its property path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey(Vec<String>);

impl ObjectKey {
    /// Key of the schema root
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Key of a top-level definition
    pub fn definition(name: &str) -> Self {
        Self(vec!["definitions".to_string(), name.to_string()])
    }

    /// Build a key from raw path segments
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    fn child(&self, segment: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.to_string());
        Self(segments)
    }

    /// The schema-given name this object is known by, if any
    ///
    /// This is the last property or definition name on the path; structural
    /// segments (`items`, `patternProperties` and their patterns) are skipped.
    pub fn base_name(&self) -> Option<&str> {
        (1..self.0.len())
            .rev()
            .find(|&i| matches!(self.0[i - 1].as_str(), "properties" | "definitions"))
            .map(|i| self.0[i].as_str())
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("#")?;
        for segment in &self.0 {
            write!(f, "/{}", segment.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

/// Leaf JSON schema types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    String,
    Integer,
    Number,
    Boolean,
    /// No usable type information (`oneOf`, missing `type`, ...)
    Any,
}

/// A property's type in the flattened graph
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FlatType {
    Primitive(Primitive),
    /// Reference to another object in the graph
    Object(ObjectKey),
    List(Box<FlatType>),
    /// Array with `uniqueItems: true`
    Set(Box<FlatType>),
    /// String-keyed map (`patternProperties` or a property-less object)
    Map(Box<FlatType>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatProperty {
    /// Property name exactly as declared in the schema
    pub name: String,
    pub ty: FlatType,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedObject {
    pub key: ObjectKey,
    /// Declaration order
    pub properties: Vec<FlatProperty>,
}

/// Flattened objects in discovery order, root first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenedGraph {
    objects: IndexMap<ObjectKey, FlattenedObject>,
}

impl FlattenedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an object, keeping its original position on replace
    pub fn insert(&mut self, object: FlattenedObject) {
        self.objects.insert(object.key.clone(), object);
    }

    pub fn get(&self, key: &ObjectKey) -> Option<&FlattenedObject> {
        self.objects.get(key)
    }

    pub fn contains(&self, key: &ObjectKey) -> bool {
        self.objects.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlattenedObject> {
        self.objects.values()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Flatten a resource schema into an object graph
///
/// # Errors
///
/// Returns [`Error::Schema`] for shapes the flattener cannot interpret: a
/// non-object schema node, a non-object `properties`, a non-string `$ref` or a
/// `$ref` that does not name a top-level definition under `#/definitions/`.
///
/// A `$ref` to a definition that does not exist is emitted as-is; resolution
/// reports it.
pub fn flatten(schema: &Value) -> Result<FlattenedGraph> {
    let mut flattener = Flattener {
        schema,
        graph: FlattenedGraph::new(),
        resolving: HashSet::new(),
    };
    let root = schema
        .as_object()
        .ok_or_else(|| schema_error(&ObjectKey::root(), "schema must be an object"))?;
    flattener.flatten_object(ObjectKey::root(), root)?;
    Ok(flattener.graph)
}

struct Flattener<'a> {
    schema: &'a Value,
    graph: FlattenedGraph,
    /// Definitions currently being resolved, to break `$ref` alias loops
    resolving: HashSet<ObjectKey>,
}

impl Flattener<'_> {
    fn flatten_object(&mut self, key: ObjectKey, schema: &Map<String, Value>) -> Result<()> {
        if self.graph.contains(&key) {
            return Ok(());
        }
        // Reserve the slot first so the root stays first and cycles terminate
        self.graph.insert(FlattenedObject {
            key: key.clone(),
            properties: Vec::new(),
        });

        let required: HashSet<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut properties = Vec::new();
        match schema.get("properties") {
            None => {}
            Some(Value::Object(props)) => {
                let props_key = key.child("properties");
                for (name, prop) in props {
                    let ty = self.flatten_type(&props_key.child(name), prop)?;
                    properties.push(FlatProperty {
                        name: name.clone(),
                        ty,
                        required: required.contains(name.as_str()),
                    });
                }
            }
            Some(_) => return Err(schema_error(&key, "'properties' must be an object")),
        }

        self.graph.insert(FlattenedObject { key, properties });
        Ok(())
    }

    fn flatten_type(&mut self, path: &ObjectKey, schema: &Value) -> Result<FlatType> {
        let node = schema
            .as_object()
            .ok_or_else(|| schema_error(path, "schema node must be an object"))?;

        if let Some(reference) = node.get("$ref") {
            return self.flatten_ref(path, reference);
        }

        match declared_type(node) {
            Some("string") => Ok(FlatType::Primitive(Primitive::String)),
            Some("integer") => Ok(FlatType::Primitive(Primitive::Integer)),
            Some("number") => Ok(FlatType::Primitive(Primitive::Number)),
            Some("boolean") => Ok(FlatType::Primitive(Primitive::Boolean)),
            Some("array") => {
                let item = match node.get("items") {
                    Some(items) => self.flatten_type(&path.child("items"), items)?,
                    None => FlatType::Primitive(Primitive::Any),
                };
                if node.get("uniqueItems").and_then(Value::as_bool) == Some(true) {
                    Ok(FlatType::Set(Box::new(item)))
                } else {
                    Ok(FlatType::List(Box::new(item)))
                }
            }
            Some("object") | None if node.contains_key("properties") => {
                self.flatten_object(path.clone(), node)?;
                Ok(FlatType::Object(path.clone()))
            }
            Some("object") => self.flatten_map(path, node),
            None if node.contains_key("patternProperties") => self.flatten_map(path, node),
            None | Some("null") => Ok(FlatType::Primitive(Primitive::Any)),
            Some(other) => Err(schema_error(path, &format!("unsupported type '{other}'"))),
        }
    }

    fn flatten_ref(&mut self, path: &ObjectKey, reference: &Value) -> Result<FlatType> {
        let reference = reference
            .as_str()
            .ok_or_else(|| schema_error(path, "'$ref' must be a string"))?;
        let name = reference.strip_prefix(DEFINITIONS_PREFIX).ok_or_else(|| {
            schema_error(
                path,
                &format!("unsupported '$ref' '{reference}', expected '{DEFINITIONS_PREFIX}<name>'"),
            )
        })?;
        if name.is_empty() || name.contains('/') {
            return Err(schema_error(
                path,
                &format!("'$ref' '{reference}' must name a top-level definition"),
            ));
        }

        let key = ObjectKey::definition(name);
        let schema = self.schema;
        let Some(definition) = schema
            .get("definitions")
            .and_then(|defs| defs.get(name))
        else {
            return Ok(FlatType::Object(key));
        };

        if self.graph.contains(&key) {
            return Ok(FlatType::Object(key));
        }
        if !self.resolving.insert(key.clone()) {
            return Ok(FlatType::Primitive(Primitive::Any));
        }
        let resolved = self.flatten_type(&key, definition);
        self.resolving.remove(&key);
        resolved
    }

    fn flatten_map(&mut self, path: &ObjectKey, node: &Map<String, Value>) -> Result<FlatType> {
        let value = match node.get("patternProperties").and_then(Value::as_object) {
            Some(patterns) => match patterns.iter().next() {
                Some((pattern, schema)) => {
                    let value_path = path.child("patternProperties").child(pattern);
                    self.flatten_type(&value_path, schema)?
                }
                None => FlatType::Primitive(Primitive::Any),
            },
            None => FlatType::Primitive(Primitive::Any),
        };
        Ok(FlatType::Map(Box::new(value)))
    }
}

/// The first non-null entry of `type`, which may be a string or a list
fn declared_type(node: &Map<String, Value>) -> Option<&str> {
    match node.get("type")? {
        Value::String(ty) => Some(ty.as_str()),
        Value::Array(types) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|ty| *ty != "null"),
        _ => None,
    }
}

fn schema_error(path: &ObjectKey, reason: &str) -> Error {
    Error::Schema {
        pointer: path.to_string(),
        reason: reason.to_string(),
    }
}
