use super::*;

#[test]
fn default_space_matches_overlay_metadata_layout() {
    let schema = SpaceSchema::wtf_metadata();

    assert_eq!(
        schema.to_string(),
        "space wtf key path attributes string blockmap, int directory, int mode, string owner, string group"
    );
    assert!(schema.validate().is_ok());
}

#[test]
fn space_without_attributes_omits_the_clause() {
    let schema = SpaceSchema {
        name: "kv".to_string(),
        key: "k".to_string(),
        attributes: vec![],
    };

    assert_eq!(schema.to_string(), "space kv key k");
}

#[test]
fn attribute_shadowing_the_key_is_rejected() {
    let mut schema = SpaceSchema::wtf_metadata();
    schema.attributes.push(Attribute {
        kind: AttributeType::Int,
        name: "path".to_string(),
    });

    assert!(schema.validate().is_err());
}

#[test]
fn identifiers_with_separators_are_rejected() {
    let mut schema = SpaceSchema::wtf_metadata();
    schema.attributes[0].name = "block map".to_string();

    assert!(schema.validate().is_err());
}
