use indoc::indoc;

use crate::{Config, Error, Generator, ModuleFormat, shot_error};

const BROKEN_CHAIN: &str = indoc! {r#"
    {"modules": [
      {"modulePath": "A", "typeDeclarations": [
        {"name": "t", "body": {"kind": "ref", "name": "Missing"}}
      ]},
      {"modulePath": "B", "typeDeclarations": [
        {"name": "x", "body": {"kind": "ref", "name": "A.t"}}
      ]},
      {"modulePath": "C", "exportedValues": [
        {"name": "y", "type": {"kind": "primitive", "name": "int"}}
      ]}
    ]}
"#};

#[test]
fn failures_propagate_to_importing_modules() {
    shot_error!(r#"
        {"modules": [
          {"modulePath": "A", "typeDeclarations": [
            {"name": "t", "body": {"kind": "ref", "name": "Missing"}}
          ]},
          {"modulePath": "B", "typeDeclarations": [
            {"name": "x", "body": {"kind": "ref", "name": "A.t"}}
          ]},
          {"modulePath": "C", "exportedValues": [
            {"name": "y", "type": {"kind": "primitive", "name": "int"}}
          ]}
        ]}
    "#, @r"
    error: `Missing` is not defined
      --> A.t (model error)

    error: depends on `A.t`, which failed to generate
      --> B (conversion gap)
    ");
}

#[test]
fn sibling_modules_are_still_generated() {
    let output = Generator::from_json(BROKEN_CHAIN).unwrap().generate();

    assert!(!output.is_success());
    let failed: Vec<_> = output.failed.iter().map(String::as_str).collect();
    assert_eq!(failed, ["A", "B"]);
    let generated: Vec<_> = output.modules.keys().map(String::as_str).collect();
    assert_eq!(generated, ["C"]);

    let c = output.module("C").unwrap();
    assert_eq!(c.declarations_file(), "C.gen.d.ts");
    assert_eq!(c.shim_file(), "C.gen.js");
    assert!(c.shim.contains("export const y = CBS.y;"));
}

#[test]
fn into_result_reports_generation_failure() {
    let output = Generator::from_json(BROKEN_CHAIN).unwrap().generate();
    let err = output.into_result().unwrap_err();

    assert!(matches!(err, Error::GenerationFailed(_)));
    assert_eq!(err.to_string(), "generation failed with 2 errors");
}

#[test]
fn invalid_json_is_a_fatal_error() {
    let err = Generator::from_json(r#"{"modules": [{"typeDeclarations": []}]}"#).unwrap_err();

    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(err.to_string().starts_with("invalid input document: missing field `modulePath`"));
}

#[test]
fn name_collision_fails_the_module() {
    shot_error!(r#"
        {"modules": [{"modulePath": "M", "exportedValues": [
          {"name": "$$default", "type": {"kind": "primitive", "name": "int"}},
          {"name": "default", "type": {"kind": "primitive", "name": "int"}}
        ]}]}
    "#, @r"
    error: host name `$$default` is assigned twice
      --> M.default (name collision)
    ");
}

#[test]
fn conversion_gaps_fail_the_module() {
    let output = Generator::from_json(indoc! {r#"
        {"modules": [{"modulePath": "M", "exportedValues": [
          {"name": "y", "type": {"kind": "option", "inner": {"kind": "option", "inner":
            {"kind": "option", "inner": {"kind": "primitive", "name": "int"}}}}}
        ]}]}
    "#})
    .unwrap()
    .generate();

    assert!(output.module("M").is_none());
    assert_eq!(output.diagnostics.error_count(), 1);
}

#[test]
fn explicit_config_replaces_document_config() {
    let json = indoc! {r#"
        {"config": {"moduleFormat": "commonjs"},
         "modules": [{"modulePath": "M", "exportedValues": [
           {"name": "x", "type": {"kind": "primitive", "name": "int"}}
         ]}]}
    "#};

    let from_document = Generator::from_json(json).unwrap();
    assert_eq!(from_document.config().format(), ModuleFormat::CommonJs);

    let output = from_document
        .with_config(Config::new().header(false))
        .generate();
    insta::assert_snapshot!(output.module("M").unwrap().shim, @r"
    import * as MBS from './M.bs';

    export const x = MBS.x;
    ");
}

#[test]
fn output_is_deterministic() {
    let json = indoc! {r#"
        {"modules": [{"modulePath": "Types",
          "typeDeclarations": [
            {"name": "t", "body": {"kind": "variant", "cases": [
              {"tag": "A", "payload": [{"kind": "primitive", "name": "int"}]},
              {"tag": "B"}
            ]}}
          ],
          "exportedValues": [{"name": "v", "type": {"kind": "ref", "name": "t"}}]}]}
    "#};

    let first = Generator::from_json(json).unwrap().generate();
    let second = Generator::from_json(json).unwrap().generate();
    assert_eq!(first.modules, second.modules);
}

#[test]
fn plans_dump_is_part_of_the_output() {
    let output = Generator::from_json(indoc! {r#"
        {"modules": [{"modulePath": "M", "exportedValues": [
          {"name": "xs", "type": {"kind": "array", "inner":
            {"kind": "option", "inner": {"kind": "option", "inner": {"kind": "primitive", "name": "int"}}}}}
        ]}]}
    "#})
    .unwrap()
    .generate();

    insta::assert_snapshot!(output.module("M").unwrap().plans, @r"
    p1: array(p2)
    p2: nested-option(id)
    export M.xs = p1
    ");
}

#[test]
fn conversion_gaps_are_reported_alongside_model_errors() {
    shot_error!(r#"
        {"modules": [{"modulePath": "M",
          "typeDeclarations": [
            {"name": "bad", "body": {"kind": "ref", "name": "Missing"}},
            {"name": "t", "body": {"kind": "variant", "cases": [
              {"tag": "F", "payload": [{"kind": "function", "curried": true, "params": [
                {"type": {"kind": "primitive", "name": "int"}},
                {"type": {"kind": "primitive", "name": "int"}}
              ], "result": {"kind": "primitive", "name": "int"}}]}
            ]}}
          ],
          "exportedValues": [{"name": "v", "type": {"kind": "ref", "name": "t"}}]}]}
    "#, @r"
    error: `Missing` is not defined
      --> M.bad (model error)

    error: case `F` carries a function that needs conversion
      --> M.v.F (conversion gap)
      = hint: move the function into a record field, or make it uncurried and unlabeled
    ");
}

#[test]
fn broken_references_in_a_failed_module_are_reported_once() {
    let output = Generator::from_json(indoc! {r#"
        {"modules": [{"modulePath": "M", "exportedValues": [
          {"name": "x", "type": {"kind": "array", "inner": {"kind": "ref", "name": "Missing"}}}
        ]}]}
    "#})
    .unwrap()
    .generate();

    let failed: Vec<_> = output.failed.iter().map(String::as_str).collect();
    assert_eq!(failed, ["M"]);
    assert_eq!(output.diagnostics.len(), 1);
    assert!(output.module("M").is_none());
}
