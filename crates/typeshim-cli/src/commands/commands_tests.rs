use std::fs;
use std::path::PathBuf;

use indoc::indoc;
use tempfile::TempDir;
use typeshim_compiler::{Generator, ModuleFormat};

use super::check::{self, CheckArgs};
use super::generate::{self, GenerateArgs};
use super::{CommandError, plans};

const TWO_MODULES: &str = indoc! {r#"
    {"config": {"header": false},
     "modules": [
      {"modulePath": "A", "typeDeclarations": [
        {"name": "t", "body": {"kind": "variant", "cases": [{"tag": "red"}, {"tag": "green"}]}}
      ], "exportedValues": [
        {"name": "x", "type": {"kind": "primitive", "name": "int"}}
      ]},
      {"modulePath": "B", "exportedValues": [
        {"name": "paint", "type": {"kind": "function",
          "params": [{"type": {"kind": "ref", "name": "A.t"}}],
          "result": {"kind": "primitive", "name": "unit"}}}
      ]}
    ]}
"#};

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

fn write_input(dir: &TempDir, json: &str) -> PathBuf {
    let path = dir.path().join("types.json");
    fs::write(&path, json).unwrap();
    path
}

fn generate_into(
    dir: &TempDir,
    json: &str,
    format: Option<ModuleFormat>,
) -> Result<Vec<PathBuf>, CommandError> {
    generate::run(GenerateArgs {
        input: write_input(dir, json),
        out_dir: dir.path().join("out"),
        module_format: format,
        color: false,
    })
}

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

fn read(dir: &TempDir, name: &str) -> String {
    fs::read_to_string(dir.path().join("out").join(name)).unwrap()
}

#[test]
fn generate_writes_declarations_and_shims() {
    let dir = TempDir::new().unwrap();

    let written = generate_into(&dir, TWO_MODULES, None).unwrap();

    assert_eq!(
        file_names(&written),
        ["A.gen.d.ts", "A.gen.js", "B.gen.d.ts", "B.gen.js"]
    );
    assert!(read(&dir, "B.gen.d.ts").contains("import type {t as A_t} from './A.gen';"));
    assert!(read(&dir, "A.gen.js").contains("import * as ABS from './A.bs';"));
}

#[test]
fn module_format_flag_overrides_the_document() {
    let dir = TempDir::new().unwrap();

    generate_into(&dir, TWO_MODULES, Some(ModuleFormat::CommonJs)).unwrap();

    insta::assert_snapshot!(read(&dir, "A.gen.js"), @r"
    const ABS = require('./A.bs');

    const x = ABS.x;
    exports.x = x;
    ");
}

#[test]
fn failed_modules_do_not_stop_the_others() {
    let dir = TempDir::new().unwrap();

    let err = generate_into(&dir, BROKEN_CHAIN, None).unwrap_err();

    assert_eq!(err.to_string(), "generation failed for 2 of 3 modules");
    let CommandError::Failed { failed, .. } = err else {
        panic!("expected a generation failure");
    };
    assert_eq!(failed, ["A", "B"]);

    let out = dir.path().join("out");
    assert!(out.join("C.gen.js").exists());
    assert!(!out.join("A.gen.js").exists());
    assert!(!out.join("B.gen.d.ts").exists());
}

#[test]
fn missing_input_is_a_read_error() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("nope.json");

    let err = check::run(CheckArgs {
        input: input.clone(),
        color: false,
    })
    .unwrap_err();

    assert!(matches!(&err, CommandError::Read { path, .. } if path == &input));
    assert!(err.to_string().starts_with("failed to read "));
}

#[test]
fn malformed_input_is_reported() {
    let dir = TempDir::new().unwrap();

    let err = check::run(CheckArgs {
        input: write_input(&dir, r#"{"modules": [{}]}"#),
        color: false,
    })
    .unwrap_err();

    assert!(matches!(err, CommandError::Input(_)));
    assert!(
        err.to_string()
            .starts_with("invalid input document: missing field `modulePath`")
    );
}

#[test]
fn check_passes_on_valid_documents() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, TWO_MODULES);

    check::run(CheckArgs {
        input,
        color: false,
    })
    .unwrap();
    assert!(!dir.path().join("out").exists());
}

#[test]
fn plans_render_every_module() {
    let output = Generator::from_json(TWO_MODULES).unwrap().generate();

    insta::assert_snapshot!(plans::render(&output, None).unwrap(), @r#"
    # A
    export A.x = id

    # B
    p1: fn(p2) -> id
    p2 A.t: enum {0 <-> "red", 1 <-> "green"}
    export B.paint = p1
    "#);
}

#[test]
fn plans_of_one_module() {
    let output = Generator::from_json(TWO_MODULES).unwrap().generate();

    let b = plans::render(&output, Some("B")).unwrap();
    assert!(b.starts_with("p1: fn(p2) -> id"));

    let err = plans::render(&output, Some("Z")).unwrap_err();
    assert_eq!(err.to_string(), "no module named `Z`");
}
