#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::reserved::{DOMAIN_RESERVED, LANGUAGE_KEYWORDS};
use super::resolver::{class_base_name, unique_class_name, IdentifierKey};
use super::templates::{render, render_stub_handler, HandlerBinding, PojoTemplateData};
use super::*;
use crate::error::Error;
use crate::project::parse_type_name;
use proptest::prelude::*;
use regex::Regex;
use serde_json::{json, Value};
use std::collections::HashSet;

fn resolve_schema(schema: &Value) -> crate::error::Result<ResolvedClasses> {
    let graph = flatten(schema)?;
    resolve(&graph, ROOT_CLASS_NAME, &derive_namespace(&["Vendor", "Service", "Resource"]))
}

fn class<'a>(classes: &'a ResolvedClasses, name: &str) -> &'a ResolvedClass {
    classes
        .get(name)
        .unwrap_or_else(|| panic!("no class {name} in {:?}", classes.keys().collect::<Vec<_>>()))
}

#[test]
fn test_guard_suffixes_every_reserved_word_once() {
    for token in LANGUAGE_KEYWORDS.iter().chain(DOMAIN_RESERVED) {
        assert_eq!(guard(token), format!("{token}{GUARD_MARKER}"));
    }
}

#[test]
fn test_guard_leaves_guarded_token_alone() {
    assert_eq!(guard(&guard("class")), "class_");
    assert_eq!(guard("Class"), "Class");
    assert_eq!(guard("property"), "property");
}

#[test]
fn test_derive_namespace_from_dotted_type_name() {
    let type_info = parse_type_name("vendor.service.resource").unwrap();
    let ns = derive_namespace(&type_info);
    assert_eq!(ns.segments(), ["com", "vendor", "service", "resource"]);
    assert_eq!(ns.dotted(), "com.vendor.service.resource");
    assert_eq!(
        ns.to_path(),
        std::path::PathBuf::from("com/vendor/service/resource")
    );
}

#[test]
fn test_derive_namespace_guards_and_lowercases() {
    let ns = derive_namespace(&["AWS", "Enum", "Properties"]);
    assert_eq!(ns.dotted(), "com.aws.enum_.properties_");
}

#[test]
fn test_derive_namespace_repairs_illegal_segments() {
    let ns = derive_namespace(&["My-Vendor", "3D", ""]);
    assert_eq!(ns.segments(), ["com", "my_vendor", "_3d", "_"]);
}

#[test]
fn test_derive_namespace_is_deterministic() {
    let type_info = parse_type_name("Vendor::Service::Resource").unwrap();
    assert_eq!(derive_namespace(&type_info), derive_namespace(&type_info));
}

#[test]
fn test_validate_namespace_accepts_clean_packages() {
    let ns = validate_namespace("org.example.widget_2").unwrap();
    assert_eq!(ns.segments(), ["org", "example", "widget_2"]);
    assert!(validate_namespace("_internal.pkg").is_ok());
}

#[test]
fn test_validate_namespace_rejections() {
    for bad in [
        "com.Example",
        "com..example",
        "com.example.",
        "com.class",
        "com.1abc",
        "com.has-dash",
    ] {
        let err = validate_namespace(bad).unwrap_err();
        assert!(
            matches!(err, Error::InvalidNamespace { .. }),
            "{bad} should be rejected, got {err:?}"
        );
    }
}

#[test]
fn test_validate_namespace_rejects_single_character_segment() {
    // Derivation can produce `_` segments, validation does not accept them
    assert!(validate_namespace("com.a").is_err());
    assert!(validate_namespace("com._").is_err());
    assert_eq!(derive_namespace(&[""]).dotted(), "com._");
}

#[test]
fn test_unique_class_name_suffixes() {
    let mut seen = HashSet::new();
    assert_eq!(unique_class_name(&mut seen, "Tag"), "Tag");
    assert_eq!(unique_class_name(&mut seen, "Tag"), "Tag1");
    assert_eq!(unique_class_name(&mut seen, "Tag"), "Tag2");
    seen.insert("Rule1".to_string());
    assert_eq!(unique_class_name(&mut seen, "Rule"), "Rule");
    assert_eq!(unique_class_name(&mut seen, "Rule"), "Rule2");
}

#[test]
fn test_class_base_name() {
    assert_eq!(class_base_name(&ObjectKey::definition("Tag")), "Tag");
    assert_eq!(class_base_name(&ObjectKey::definition("tag-set")), "TagSet");
    assert_eq!(
        class_base_name(&ObjectKey::from_segments(["properties", "Rules", "items"])),
        "Rules"
    );
    assert_eq!(class_base_name(&ObjectKey::definition("1st")), "_1st");
    assert_eq!(class_base_name(&ObjectKey::definition("--")), "Object");
}

#[test]
fn test_flatten_hoists_nested_and_referenced_objects() {
    let schema = json!({
        "properties": {
            "Name": {"type": "string"},
            "Config": {
                "type": "object",
                "properties": {"Enabled": {"type": "boolean"}}
            },
            "Tags": {"type": "array", "uniqueItems": true, "items": {"$ref": "#/definitions/Tag"}}
        },
        "required": ["Name"],
        "definitions": {
            "Tag": {
                "type": "object",
                "properties": {"Key": {"type": "string"}, "Value": {"type": "string"}}
            }
        }
    });
    let graph = flatten(&schema).unwrap();
    let keys: Vec<String> = graph.iter().map(|o| o.key.to_string()).collect();
    assert_eq!(keys, ["#", "#/properties/Config", "#/definitions/Tag"]);

    let root = graph.get(&ObjectKey::root()).unwrap();
    assert_eq!(root.properties[0].name, "Name");
    assert!(root.properties[0].required);
    assert!(!root.properties[1].required);
    assert_eq!(
        root.properties[2].ty,
        FlatType::Set(Box::new(FlatType::Object(ObjectKey::definition("Tag"))))
    );
}

#[test]
fn test_flatten_rejects_malformed_shapes() {
    let bad_properties = json!({"properties": ["Name"]});
    assert!(matches!(
        flatten(&bad_properties).unwrap_err(),
        Error::Schema { .. }
    ));

    let remote_ref = json!({"properties": {"X": {"$ref": "other.json#/Thing"}}});
    let err = flatten(&remote_ref).unwrap_err();
    match err {
        Error::Schema { pointer, .. } => assert_eq!(pointer, "#/properties/X"),
        other => panic!("unexpected error {other:?}"),
    }

    let nested_ref = json!({
        "properties": {"X": {"$ref": "#/definitions/Foo/properties/Bar"}},
        "definitions": {"Foo": {"type": "object", "properties": {"Bar": {"type": "string"}}}}
    });
    let err = flatten(&nested_ref).unwrap_err();
    assert_eq!(err.kind(), crate::error::ErrorKind::Validation);
    match err {
        Error::Schema { pointer, reason } => {
            assert_eq!(pointer, "#/properties/X");
            assert!(reason.contains("top-level definition"), "{reason}");
        }
        other => panic!("unexpected error {other:?}"),
    }

    assert!(flatten(&json!("not a schema")).is_err());
}

#[test]
fn test_flatten_terminates_on_cycles() {
    let schema = json!({
        "properties": {"Root": {"$ref": "#/definitions/Node"}},
        "definitions": {
            "Node": {
                "type": "object",
                "properties": {"Children": {"type": "array", "items": {"$ref": "#/definitions/Node"}}}
            },
            "A": {"$ref": "#/definitions/B"},
            "B": {"$ref": "#/definitions/A"}
        }
    });
    let classes = resolve_schema(&schema).unwrap();
    let node = class(&classes, "Node");
    assert_eq!(node.properties[0].java_type(), "List<Node>");

    let aliases = json!({
        "properties": {"Alias": {"$ref": "#/definitions/A"}},
        "definitions": {"A": {"$ref": "#/definitions/B"}, "B": {"$ref": "#/definitions/A"}}
    });
    let classes = resolve_schema(&aliases).unwrap();
    assert_eq!(classes.len(), 1);
    assert_eq!(class(&classes, ROOT_CLASS_NAME).properties[0].ty, JavaType::Object);
}

#[test]
fn test_resolve_names_root_and_orders_classes() {
    let schema = json!({
        "properties": {
            "Tag": {"type": "object", "properties": {"Key": {"type": "string"}}},
            "Tags": {"type": "array", "items": {"$ref": "#/definitions/Tag"}}
        },
        "definitions": {
            "Tag": {"type": "object", "properties": {"Value": {"type": "string"}}}
        }
    });
    let classes = resolve_schema(&schema).unwrap();
    let names: Vec<&str> = classes.keys().map(String::as_str).collect();
    assert_eq!(names, [ROOT_CLASS_NAME, "Tag", "Tag1"]);

    let root = class(&classes, ROOT_CLASS_NAME);
    assert!(root.is_root());
    assert_eq!(root.properties[0].ty, JavaType::Class("Tag".to_string()));
    assert_eq!(root.properties[1].java_type(), "List<Tag1>");
    assert_eq!(class(&classes, "Tag1").properties[0].name, "Value");
}

#[test]
fn test_resolve_avoids_generated_and_jdk_names() {
    let schema = json!({
        "properties": {
            "Map": {"type": "object", "properties": {"A": {"type": "string"}}},
            "HandlerWrapper": {"type": "object", "properties": {"B": {"type": "string"}}},
            "ResourceModel": {"type": "object", "properties": {"C": {"type": "string"}}}
        }
    });
    let classes = resolve_schema(&schema).unwrap();
    let names: Vec<&str> = classes.keys().map(String::as_str).collect();
    assert_eq!(names, ["ResourceModel", "Map1", "HandlerWrapper1", "ResourceModel1"]);

    let stubs = json!({
        "properties": {
            "A": {"$ref": "#/definitions/CreateHandler"},
            "B": {"$ref": "#/definitions/ListHandlerTest"}
        },
        "definitions": {
            "CreateHandler": {"type": "object", "properties": {"X": {"type": "string"}}},
            "ListHandlerTest": {"type": "object", "properties": {"Y": {"type": "string"}}}
        }
    });
    let classes = resolve_schema(&stubs).unwrap();
    let names: Vec<&str> = classes.keys().map(String::as_str).collect();
    assert_eq!(names, ["ResourceModel", "CreateHandler1", "ListHandlerTest1"]);
    for op in Operation::ALL {
        assert!(!classes.contains_key(&op.handler_class()));
        assert!(!classes.contains_key(&op.test_class()));
    }
}

#[test]
fn test_resolve_guards_property_identifiers() {
    let schema = json!({
        "properties": {
            "enum": {"type": "string"},
            "properties": {"type": "object", "patternProperties": {".*": {"type": "integer"}}},
            "Class": {"type": "number"},
            "Labels": {"type": "object"}
        }
    });
    let classes = resolve_schema(&schema).unwrap();
    let root = class(&classes, ROOT_CLASS_NAME);
    let idents: Vec<(&str, &str, String)> = root
        .properties
        .iter()
        .map(|p| (p.name.as_str(), p.ident.as_str(), p.java_type()))
        .collect();
    assert_eq!(
        idents,
        [
            ("enum", "enum_", "String".to_string()),
            ("properties", "properties_", "Map<String, Integer>".to_string()),
            ("Class", "class_", "Double".to_string()),
            ("Labels", "labels", "Map<String, Object>".to_string()),
        ]
    );
    assert_eq!(root.properties[0].accessor(), "Enum_");
}

#[test]
fn test_resolve_suffixes_colliding_property_identifiers() {
    let schema = json!({
        "properties": {
            "Name": {"type": "string"},
            "name": {"type": "integer"},
            "a-b": {"type": "string"},
            "a_b": {"type": "string"},
            "enum": {"type": "string"},
            "Enum": {"type": "string"}
        }
    });
    let classes = resolve_schema(&schema).unwrap();
    let idents: Vec<&str> = class(&classes, ROOT_CLASS_NAME)
        .properties
        .iter()
        .map(|p| p.ident.as_str())
        .collect();
    assert_eq!(idents, ["name", "name1", "a_b", "a_b1", "enum_", "enum_1"]);
    let unique: HashSet<&str> = idents.iter().copied().collect();
    assert_eq!(unique.len(), idents.len());

    // Same input, same names
    let again = resolve_schema(&schema).unwrap();
    assert_eq!(again, classes);
}

#[test]
fn test_identifiers_follow_suffixed_accessors() {
    let schema = json!({
        "properties": {
            "Name": {"type": "string"},
            "name": {"type": "string"},
            "Config": {
                "type": "object",
                "properties": {"arn": {"type": "string"}, "Arn": {"type": "string"}}
            }
        },
        "primaryIdentifier": ["/properties/name"],
        "additionalIdentifiers": [["/properties/Config/Arn"], ["/properties/Missing"]]
    });
    let classes = resolve_schema(&schema).unwrap();
    let ids = ResourceIdentifiers::from_schema(&schema).unwrap().bind(&classes);

    assert_eq!(ids.primary[0].getter_chain, "this.getName1()");
    assert_eq!(ids.primary[0].null_checks, "this.getName1() != null");
    assert_eq!(
        ids.additional[0].keys[0].getter_chain,
        "this.getConfig().getArn1()"
    );
    assert_eq!(ids.additional[1].keys[0].getter_chain, "this.getMissing()");
}

#[test]
fn test_identifier_names_are_legal_java() {
    let schema = json!({
        "primaryIdentifier": ["/properties/Tag-Name"],
        "additionalIdentifiers": [["/properties/Config/Key.Id"]]
    });
    let ids = ResourceIdentifiers::from_schema(&schema).unwrap();
    let legal = Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap();

    assert_eq!(ids.primary[0].const_name, "IDENTIFIER_KEY_TAG_NAME");
    assert_eq!(ids.primary[0].pointer, "/properties/Tag-Name");
    assert_eq!(ids.additional[0].method_name, "getIdentifier_Key_Id");
    for key in ids.all_keys() {
        assert!(legal.is_match(&key.const_name), "{}", key.const_name);
    }
    for group in &ids.additional {
        assert!(legal.is_match(&group.method_name), "{}", group.method_name);
    }
}

#[test]
fn test_resolve_fails_on_undefined_object() {
    let schema = json!({
        "properties": {"Tag": {"$ref": "#/definitions/Missing"}}
    });
    let err = resolve_schema(&schema).unwrap_err();
    match &err {
        Error::UndefinedObject { from, missing } => {
            assert_eq!(from, ROOT_CLASS_NAME);
            assert_eq!(missing, "#/definitions/Missing");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(err.kind(), crate::error::ErrorKind::Internal);
}

#[test]
fn test_identifiers_from_schema() {
    let schema = json!({
        "primaryIdentifier": ["/properties/Config/Arn"],
        "additionalIdentifiers": [["/properties/Name"], ["/properties/Name", "/properties/Region"]]
    });
    let ids = ResourceIdentifiers::from_schema(&schema).unwrap();
    assert_eq!(
        ids.primary,
        [IdentifierKey {
            pointer: "/properties/Config/Arn".to_string(),
            const_name: "IDENTIFIER_KEY_CONFIG_ARN".to_string(),
            getter_chain: "this.getConfig().getArn()".to_string(),
            null_checks: "this.getConfig() != null && this.getConfig().getArn() != null"
                .to_string(),
        }]
    );
    let methods: Vec<&str> = ids.additional.iter().map(|g| g.method_name.as_str()).collect();
    assert_eq!(methods, ["getIdentifier_Name", "getIdentifier_Name_Region"]);
    let consts: Vec<String> = ids.all_keys().into_iter().map(|k| k.const_name).collect();
    assert_eq!(
        consts,
        [
            "IDENTIFIER_KEY_CONFIG_ARN",
            "IDENTIFIER_KEY_NAME",
            "IDENTIFIER_KEY_REGION"
        ]
    );
}

#[test]
fn test_identifiers_reject_non_property_pointer() {
    let schema = json!({"primaryIdentifier": ["/definitions/Tag"]});
    assert!(matches!(
        ResourceIdentifiers::from_schema(&schema).unwrap_err(),
        Error::Schema { .. }
    ));
}

#[test]
fn test_operation_shapes() {
    let collections: Vec<Operation> = Operation::ALL
        .into_iter()
        .filter(|op| op.shape() == ReturnShape::Collection)
        .collect();
    assert_eq!(collections, [Operation::List]);
    assert_eq!(Operation::Create.handler_class(), "CreateHandler");
    assert_eq!(Operation::List.test_class(), "ListHandlerTest");
    assert_eq!(Operation::Delete.action(), "DELETE");
}

#[test]
fn test_list_stub_uses_collection_template() {
    let single = render_stub_handler("com.example.thing", Operation::Read, ROOT_CLASS_NAME).unwrap();
    let list = render_stub_handler("com.example.thing", Operation::List, ROOT_CLASS_NAME).unwrap();
    assert!(single.contains("public class ReadHandler"));
    assert!(list.contains("public class ListHandler"));
    assert!(list.contains("resourceModels"));
    assert!(!single.contains("resourceModels"));
}

#[test]
fn test_pojo_template_renders_root_class() {
    let schema = json!({
        "properties": {
            "Arn": {"type": "string"},
            "enum": {"type": "string"},
            "Tags": {"type": "array", "items": {"$ref": "#/definitions/Tag"}}
        },
        "definitions": {"Tag": {"type": "object", "properties": {"Key": {"type": "string"}}}},
        "primaryIdentifier": ["/properties/Arn"]
    });
    let classes = resolve_schema(&schema).unwrap();
    let ids = ResourceIdentifiers::from_schema(&schema).unwrap();

    let root = class(&classes, ROOT_CLASS_NAME);
    let data = PojoTemplateData::new(
        "Vendor::Service::Resource",
        root,
        &ids.primary,
        &ids.additional,
        ids.all_keys(),
    );
    let java = render("POJO.java", &data).unwrap();
    assert!(java.starts_with(crate::project::GENERATED_MARKER));
    assert!(java.contains("package com.vendor.service.resource;"));
    assert!(java.contains("public class ResourceModel {"));
    assert!(java.contains("public static final String TYPE_NAME = \"Vendor::Service::Resource\";"));
    assert!(java.contains("public static final String IDENTIFIER_KEY_ARN = \"/properties/Arn\";"));
    assert!(java.contains("@JsonProperty(\"enum\")\n    private String enum_;"));
    assert!(java.contains("private List<Tag> tags;"));
    assert!(java.contains("identifier.length() == 1"));

    let arn = java.find("private String arn;").unwrap();
    let tags = java.find("private List<Tag> tags;").unwrap();
    assert!(arn < tags);

    let tag = class(&classes, "Tag");
    let data = PojoTemplateData::new("Vendor::Service::Resource", tag, &ids.primary, &ids.additional, ids.all_keys());
    let java = render("POJO.java", &data).unwrap();
    assert!(java.contains("public class Tag {"));
    assert!(!java.contains("TYPE_NAME"));
    assert!(!java.contains("getPrimaryIdentifier"));
}

#[test]
fn test_handler_wrapper_binds_every_operation() {
    let data = templates::HandlerWrapperTemplateData {
        package_name: "com.example.thing".to_string(),
        pojo_name: ROOT_CLASS_NAME.to_string(),
        operations: Operation::ALL.into_iter().map(HandlerBinding::from).collect(),
    };
    let java = render("HandlerWrapper.java", &data).unwrap();
    for op in Operation::ALL {
        assert!(java.contains(&format!(
            "handlers.put(Action.{}, new {}());",
            op.action(),
            op.handler_class()
        )));
    }
}

proptest! {
    #[test]
    fn prop_guard_appends_marker_only_to_reserved(token in "[a-z_]{1,12}") {
        let guarded = guard(&token);
        if is_reserved(&token) {
            prop_assert_eq!(guarded, format!("{token}_"));
        } else {
            prop_assert_eq!(guarded, token);
        }
    }

    #[test]
    fn prop_derived_segments_are_legal(segments in proptest::collection::vec(".{0,10}", 1..4)) {
        let segment_re = Regex::new(r"^[a-z_][a-z0-9_]*$").unwrap();
        let ns = derive_namespace(&segments);
        prop_assert_eq!(ns.segments().len(), segments.len() + 1);
        for segment in ns.segments() {
            prop_assert!(segment_re.is_match(segment), "illegal segment {:?}", segment);
        }
    }

    #[test]
    fn prop_property_order_is_declaration_order(
        names in proptest::collection::hash_set("[A-Za-z][A-Za-z0-9]{0,8}", 1..12)
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let mut properties = serde_json::Map::new();
        for name in &names {
            properties.insert(name.clone(), json!({"type": "string"}));
        }
        let schema = json!({"properties": Value::Object(properties)});
        let classes = resolve_schema(&schema).unwrap();
        let resolved: Vec<String> = class(&classes, ROOT_CLASS_NAME)
            .properties
            .iter()
            .map(|p| p.name.clone())
            .collect();
        prop_assert_eq!(resolved, names);
    }
}
