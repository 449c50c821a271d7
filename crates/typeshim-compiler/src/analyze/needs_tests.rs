use indoc::indoc;

use super::*;
use crate::test_utils::lower_ok;

/// Identity verdict for every exported value, by name.
fn verdicts(json: &str) -> Vec<(String, bool)> {
    let model = lower_ok(json);
    let deps = analyze_dependencies(&model);
    let mut view = TypeView::new(&model, &deps);
    let roots: Vec<_> = model.exports().iter().map(|e| e.ty).collect();
    let needs = analyze_needs(&mut view, roots);

    model
        .exports()
        .iter()
        .map(|e| (model.name(e.name).to_string(), needs.is_identity(e.ty)))
        .collect()
}

#[test]
fn structural_types_of_primitives_are_identity() {
    let result = verdicts(indoc! {r#"
        {"modules": [{"modulePath": "M", "exportedValues": [
          {"name": "n", "type": {"kind": "primitive", "name": "int"}},
          {"name": "opt", "type": {"kind": "option", "inner": {"kind": "primitive", "name": "string"}}},
          {"name": "pair", "type": {"kind": "tuple", "elements": [
            {"kind": "primitive", "name": "int"},
            {"kind": "array", "inner": {"kind": "primitive", "name": "float"}}
          ]}},
          {"name": "rec", "type": {"kind": "record", "fields": [
            {"name": "a", "type": {"kind": "primitive", "name": "int"}, "mutable": true}
          ]}},
          {"name": "f", "type": {"kind": "function", "params": [
            {"type": {"kind": "primitive", "name": "int"}},
            {"type": {"kind": "primitive", "name": "int"}}
          ], "result": {"kind": "primitive", "name": "int"}}}
        ]}]}
    "#});

    assert!(result.iter().all(|(_, identity)| *identity), "{result:?}");
}

#[test]
fn intrinsic_conversions() {
    let result = verdicts(indoc! {r#"
        {"modules": [{"modulePath": "M", "exportedValues": [
          {"name": "weekday", "type": {"kind": "variant", "cases": [{"tag": "monday"}]}},
          {"name": "renamed", "type": {"kind": "record", "fields": [
            {"name": "_type", "as": "type", "type": {"kind": "primitive", "name": "string"}}
          ]}},
          {"name": "curried", "type": {"kind": "function", "curried": true, "params": [
            {"type": {"kind": "primitive", "name": "int"}},
            {"type": {"kind": "primitive", "name": "int"}}
          ], "result": {"kind": "primitive", "name": "int"}}},
          {"name": "curriedOne", "type": {"kind": "function", "curried": true, "params": [
            {"type": {"kind": "primitive", "name": "int"}}
          ], "result": {"kind": "primitive", "name": "int"}}},
          {"name": "labeled", "type": {"kind": "function", "params": [
            {"label": "x", "type": {"kind": "primitive", "name": "int"}}
          ], "result": {"kind": "primitive", "name": "int"}}},
          {"name": "nested", "type": {"kind": "option", "inner":
            {"kind": "option", "inner": {"kind": "primitive", "name": "int"}}}}
        ]}]}
    "#});

    assert_eq!(
        result,
        vec![
            ("weekday".to_string(), false),
            ("renamed".to_string(), false),
            ("curried".to_string(), false),
            ("curriedOne".to_string(), true),
            ("labeled".to_string(), false),
            ("nested".to_string(), false),
        ]
    );
}

#[test]
fn need_propagates_through_containers_and_cycles() {
    let result = verdicts(indoc! {r#"
        {"modules": [{"modulePath": "M",
          "typeDeclarations": [
            {"name": "color", "body": {"kind": "variant", "cases": [{"tag": "red"}, {"tag": "green"}]}},
            {"name": "plainTree", "body": {"kind": "record", "fields": [
              {"name": "label", "type": {"kind": "primitive", "name": "string"}},
              {"name": "left", "type": {"kind": "option", "inner": {"kind": "ref", "name": "plainTree"}}}
            ]}},
            {"name": "colorTree", "body": {"kind": "record", "fields": [
              {"name": "children", "type": {"kind": "array", "inner": {"kind": "ref", "name": "colorTree"}}},
              {"name": "leaf", "type": {"kind": "option", "inner": {"kind": "ref", "name": "color"}}}
            ]}},
            {"name": "box", "params": ["a"], "body": {"kind": "tuple", "elements": [
              {"kind": "var", "name": "a"}
            ]}}
          ],
          "exportedValues": [
            {"name": "plain", "type": {"kind": "ref", "name": "plainTree"}},
            {"name": "colored", "type": {"kind": "ref", "name": "colorTree"}},
            {"name": "intBox", "type": {"kind": "ref", "name": "box", "args": [
              {"kind": "primitive", "name": "int"}
            ]}},
            {"name": "colorBox", "type": {"kind": "ref", "name": "box", "args": [
              {"kind": "ref", "name": "color"}
            ]}},
            {"name": "callback", "type": {"kind": "function", "params": [
              {"type": {"kind": "ref", "name": "color"}}
            ], "result": {"kind": "primitive", "name": "unit"}}}
          ]}]}
    "#});

    assert_eq!(
        result,
        vec![
            ("plain".to_string(), true),
            ("colored".to_string(), false),
            ("intBox".to_string(), true),
            ("colorBox".to_string(), false),
            ("callback".to_string(), false),
        ]
    );
}

#[test]
fn optional_field_of_option_is_nested() {
    let result = verdicts(indoc! {r#"
        {"modules": [{"modulePath": "M", "exportedValues": [
          {"name": "plain", "type": {"kind": "record", "fields": [
            {"name": "a", "optional": true, "type": {"kind": "primitive", "name": "int"}}
          ]}},
          {"name": "nested", "type": {"kind": "record", "fields": [
            {"name": "a", "optional": true, "type": {"kind": "option", "inner": {"kind": "primitive", "name": "int"}}}
          ]}}
        ]}]}
    "#});

    assert_eq!(
        result,
        vec![("plain".to_string(), true), ("nested".to_string(), false)]
    );
}
