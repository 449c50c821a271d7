use std::fmt::Write;

use indoc::indoc;

use super::*;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::model::Model;
use crate::test_utils::lower_ok;

fn names(json: &str) -> (Model, NameTable, Diagnostics) {
    let model = lower_ok(json);
    let mut diagnostics = Diagnostics::new();
    let table = assign_names(&model, &mut diagnostics);
    (model, table, diagnostics)
}

fn listing(model: &Model, table: &NameTable, module: &str) -> String {
    let id = model.module_by_name(module).expect("module exists").id;
    let names = table.module(id);
    let mut out = String::new();
    for (decl, name) in names.local_types() {
        writeln!(out, "type {} = {name}", model.decl_path(decl)).unwrap();
    }
    for import in names.imports() {
        writeln!(
            out,
            "import {} = {} from {}",
            model.decl_path(import.decl),
            import.local,
            import.module
        )
        .unwrap();
    }
    for (export, name) in names.values() {
        writeln!(out, "value {} = {name}", model.export_path(export)).unwrap();
    }
    out
}

#[test]
fn joins_namespace_paths() {
    let (model, table, diagnostics) = names(indoc! {r#"
        {"modules": [{"modulePath": "ModuleAliases",
          "typeDeclarations": [{"name": "t", "body": {"kind": "primitive", "name": "int"}}],
          "exportedValues": [{"name": "t", "type": {"kind": "ref", "name": "t"}}],
          "namespaces": [{"name": "Outer", "namespaces": [{"name": "Inner",
            "typeDeclarations": [
              {"name": "innerT", "body": {"kind": "record", "fields": [
                {"name": "inner", "type": {"kind": "primitive", "name": "string"}}
              ]}}
            ],
            "exportedValues": [{"name": "make", "type": {"kind": "ref", "name": "innerT"}}]
          }]}]
        }]}
    "#});

    assert!(diagnostics.is_empty());
    insta::assert_snapshot!(listing(&model, &table, "ModuleAliases"), @r"
    type ModuleAliases.t = t
    type ModuleAliases.Outer.Inner.innerT = Outer_Inner_innerT
    value ModuleAliases.t = t
    value ModuleAliases.Outer.Inner.make = Outer_Inner_make
    ");
    assert_eq!(
        table
            .module(model.module_by_name("ModuleAliases").unwrap().id)
            .origin_binding(),
        "ModuleAliasesBS"
    );
}

#[test]
fn reserved_words_are_escaped() {
    let (model, table, diagnostics) = names(indoc! {r#"
        {"modules": [{"modulePath": "Hooks",
          "typeDeclarations": [{"name": "string", "body": {"kind": "primitive", "name": "string"}}],
          "exportedValues": [
            {"name": "default", "type": {"kind": "primitive", "name": "int"}},
            {"name": "HooksBS", "type": {"kind": "primitive", "name": "int"}}
          ]
        }]}
    "#});

    assert!(diagnostics.is_empty());
    insta::assert_snapshot!(listing(&model, &table, "Hooks"), @r"
    type Hooks.string = $$string
    value Hooks.default = $$default
    value Hooks.HooksBS = Hooks_HooksBS
    ");
}

#[test]
fn collisions_are_qualified_then_numbered() {
    let (model, table, diagnostics) = names(indoc! {r#"
        {"modules": [{"modulePath": "Types",
          "typeDeclarations": [
            {"name": "A_b", "body": {"kind": "primitive", "name": "int"}},
            {"name": "Types_A_b", "body": {"kind": "primitive", "name": "int"}}
          ],
          "namespaces": [{"name": "A", "typeDeclarations": [
            {"name": "b", "body": {"kind": "primitive", "name": "int"}}
          ]}]
        }]}
    "#});

    assert!(diagnostics.is_empty());
    insta::assert_snapshot!(listing(&model, &table, "Types"), @r"
    type Types.A_b = A_b
    type Types.Types_A_b = Types_A_b
    type Types.A.b = A_b2
    ");
}

#[test]
fn escaped_name_that_still_collides_is_reported() {
    let (_, _, diagnostics) = names(indoc! {r#"
        {"modules": [{"modulePath": "M", "exportedValues": [
          {"name": "$$default", "type": {"kind": "primitive", "name": "int"}},
          {"name": "default", "type": {"kind": "primitive", "name": "int"}}
        ]}]}
    "#});

    let reported: Vec<_> = diagnostics.iter().map(|d| (d.kind(), d.path())).collect();
    assert_eq!(reported, vec![(DiagnosticKind::NameCollision, "M.default")]);
    insta::assert_snapshot!(diagnostics.render(), @r"
    error: host name `$$default` is assigned twice
      --> M.default
    ");
}

#[test]
fn foreign_declarations_are_imported_under_qualified_names() {
    let (model, table, diagnostics) = names(indoc! {r#"
        {"modules": [
          {"modulePath": "A",
           "typeDeclarations": [{"name": "t", "body": {"kind": "primitive", "name": "int"}}],
           "namespaces": [{"name": "Inner", "typeDeclarations": [
             {"name": "u", "body": {"kind": "primitive", "name": "int"}}
           ]}]},
          {"modulePath": "B",
           "typeDeclarations": [
             {"name": "A_t", "body": {"kind": "primitive", "name": "string"}},
             {"name": "x", "body": {"kind": "ref", "name": "A.t"}},
             {"name": "y", "body": {"kind": "ref", "name": "A.Inner.u"}}
           ]}
        ]}
    "#});

    assert!(diagnostics.is_empty());
    insta::assert_snapshot!(listing(&model, &table, "B"), @r"
    type B.A_t = A_t
    type B.x = x
    type B.y = y
    import A.t = A_t2 from A
    import A.Inner.u = A_Inner_u from A
    ");

    let b = table.module(model.module_by_name("B").unwrap().id);
    let imported: Vec<_> = b.imports().map(|i| i.imported.as_str()).collect();
    assert_eq!(imported, ["t", "Inner_u"]);
}

#[test]
fn component_display_names() {
    let model = lower_ok(indoc! {r#"
        {"modules": [{"modulePath": "Hooks",
          "exportedValues": [
            {"name": "default", "type": {"kind": "primitive", "name": "int"}},
            {"name": "other", "type": {"kind": "primitive", "name": "int"}}
          ],
          "namespaces": [{"name": "Inner", "exportedValues": [
            {"name": "make", "type": {"kind": "primitive", "name": "int"}},
            {"name": "other", "type": {"kind": "primitive", "name": "int"}}
          ]}]
        }]}
    "#});

    let shown: Vec<_> = model
        .exports()
        .iter()
        .map(|e| component_display_name(&model, e.id))
        .collect();
    assert_eq!(
        shown,
        ["Hooks", "Hooks_other", "Hooks_Inner", "Hooks_Inner_other"]
    );
}

#[test]
fn imported_values_get_checked_and_unchecked_bindings() {
    let (model, table, diagnostics) = names(indoc! {r#"
        {"modules": [{"modulePath": "M",
          "exportedValues": [
            {"name": "roundNotChecked", "type": {"kind": "primitive", "name": "int"}}
          ],
          "importedValues": [
            {"name": "round", "from": "./MyMath", "type": {"kind": "primitive", "name": "float"}},
            {"name": "default", "from": "./MyMath", "type": {"kind": "primitive", "name": "int"}}
          ]}]}
    "#});
    assert!(diagnostics.is_empty());

    let names = table.module(model.module_by_name("M").unwrap().id);
    let bindings: Vec<_> = names
        .values()
        .map(|(export, name)| (name.to_string(), names.host_binding(export).cloned()))
        .collect();

    assert_eq!(
        bindings,
        [
            ("roundNotChecked".to_string(), None),
            (
                "round".to_string(),
                Some(HostBinding {
                    unchecked: "roundNotChecked2".to_string(),
                    checked: "roundTypeChecked".to_string(),
                })
            ),
            (
                "$$default".to_string(),
                Some(HostBinding {
                    unchecked: "$$defaultNotChecked".to_string(),
                    checked: "$$defaultTypeChecked".to_string(),
                })
            ),
        ]
    );
}
