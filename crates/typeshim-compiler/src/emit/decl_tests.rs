use crate::shot_declarations;

#[test]
fn recursive_record_and_function() {
    shot_declarations!(r#"
        {"modules": [{"modulePath": "Types",
          "typeDeclarations": [
            {"name": "tree", "body": {"kind": "record", "fields": [
              {"name": "label", "type": {"kind": "primitive", "name": "string"}},
              {"name": "left", "type": {"kind": "option", "inner": {"kind": "ref", "name": "tree"}}},
              {"name": "right", "type": {"kind": "option", "inner": {"kind": "ref", "name": "tree"}}}
            ]}}
          ],
          "exportedValues": [
            {"name": "swap", "type": {"kind": "function",
              "params": [{"type": {"kind": "ref", "name": "tree"}}],
              "result": {"kind": "ref", "name": "tree"}}}
          ]}]}
    "#, "Types", @r"
    /* TypeScript file generated from Types by typeshim. */

    // recursive: tree
    export type tree = {
      readonly label: string;
      readonly left: (undefined | tree);
      readonly right: (undefined | tree);
    };

    export declare const swap: (_1: tree) => tree;
    ");
}

#[test]
fn variant_with_payload_is_a_tagged_union() {
    shot_declarations!(r#"
        {"modules": [{"modulePath": "Types",
          "typeDeclarations": [
            {"name": "t", "body": {"kind": "variant", "cases": [
              {"tag": "A", "payload": [
                {"kind": "primitive", "name": "int"},
                {"kind": "primitive", "name": "int"}
              ]},
              {"tag": "B"}
            ]}}
          ],
          "exportedValues": [
            {"name": "make", "type": {"kind": "function",
              "params": [{"type": {"kind": "ref", "name": "t"}}],
              "result": {"kind": "ref", "name": "t"}}}
          ]}]}
    "#, "Types", @r#"
    /* TypeScript file generated from Types by typeshim. */

    export type t =
      | { tag: "A"; value: [number, number] }
      | { tag: "B" };

    export declare const make: (_1: t) => t;
    "#);
}

#[test]
fn enums_are_string_unions() {
    shot_declarations!(r#"
        {"modules": [{"modulePath": "Days",
          "typeDeclarations": [
            {"name": "weekday", "body": {"kind": "variant", "polymorphic": true, "cases": [
              {"tag": "monday"}, {"tag": "tuesday"}
            ]}},
            {"name": "color", "body": {"kind": "variant", "cases": [
              {"tag": "red"}, {"tag": "green", "as": "GREEN"}
            ]}}
          ],
          "exportedValues": [
            {"name": "today", "type": {"kind": "ref", "name": "weekday"}},
            {"name": "paint", "type": {"kind": "function",
              "params": [{"type": {"kind": "ref", "name": "color"}}],
              "result": {"kind": "ref", "name": "color"}}}
          ]}]}
    "#, "Days", @r#"
    /* TypeScript file generated from Days by typeshim. */

    export type weekday = "monday" | "tuesday";

    export type color = "red" | "GREEN";

    export declare const today: weekday;

    export declare const paint: (_1: color) => color;
    "#);
}

#[test]
fn labeled_parameters_become_an_options_object() {
    shot_declarations!(r#"
        {"modules": [{"modulePath": "Uncurried", "exportedValues": [
          {"name": "f", "type": {"kind": "function", "curried": true, "params": [
            {"label": "a", "type": {"kind": "primitive", "name": "int"}},
            {"label": "b", "type": {"kind": "primitive", "name": "int"}},
            {"label": "c", "optional": true, "type": {"kind": "primitive", "name": "int"}}
          ], "result": {"kind": "primitive", "name": "int"}}},
          {"name": "g", "type": {"kind": "function", "params": [
            {"type": {"kind": "primitive", "name": "string"}},
            {"label": "x", "type": {"kind": "primitive", "name": "int"}},
            {"type": {"kind": "primitive", "name": "unit"}}
          ], "result": {"kind": "primitive", "name": "unit"}}},
          {"name": "k", "type": {"kind": "function", "params": [
            {"label": "x", "optional": true, "type": {"kind": "primitive", "name": "int"}},
            {"type": {"kind": "primitive", "name": "unit"}}
          ], "result": {"kind": "primitive", "name": "bool"}}}
        ]}]}
    "#, "Uncurried", @r"
    /* TypeScript file generated from Uncurried by typeshim. */

    export declare const f: (_1: { readonly a: number; readonly b: number; readonly c?: number }) => number;

    export declare const g: (_1: string, _2: { readonly x: number }) => void;

    export declare const k: (_1?: { readonly x?: number }) => boolean;
    ");
}

#[test]
fn generic_declarations_keep_their_parameters() {
    shot_declarations!(r#"
        {"modules": [{"modulePath": "G",
          "typeDeclarations": [
            {"name": "box", "params": ["a"], "body": {"kind": "record", "fields": [
              {"name": "value", "type": {"kind": "var", "name": "a"}}
            ]}}
          ],
          "exportedValues": [
            {"name": "make", "type": {"kind": "function",
              "params": [{"type": {"kind": "var", "name": "a"}}],
              "result": {"kind": "ref", "name": "box", "args": [{"kind": "var", "name": "a"}]}}}
          ]}]}
    "#, "G", @r"
    /* TypeScript file generated from G by typeshim. */

    export type box<a> = {
      readonly value: a;
    };

    export declare const make: <a>(_1: a) => box<a>;
    ");
}

#[test]
fn mutable_renamed_and_optional_fields() {
    shot_declarations!(r#"
        {"modules": [{"modulePath": "M",
          "typeDeclarations": [
            {"name": "r", "body": {"kind": "record", "fields": [
              {"name": "count", "mutable": true, "type": {"kind": "primitive", "name": "int"}},
              {"name": "_type", "as": "type", "optional": true,
               "type": {"kind": "option", "inner": {"kind": "primitive", "name": "string"}}}
            ]}}
          ]}]}
    "#, "M", @r"
    /* TypeScript file generated from M by typeshim. */

    export type r = {
      count: number;
      readonly type?: (undefined | null | string);
    };
    ");
}

#[test]
fn foreign_types_are_imported_and_components_use_react() {
    shot_declarations!(r#"
        {"modules": [
          {"modulePath": "A", "typeDeclarations": [
            {"name": "t", "params": ["a"], "body": {"kind": "opaque"}}
          ]},
          {"modulePath": "B",
           "typeDeclarations": [
             {"name": "x", "body": {"kind": "ref", "name": "A.t", "args": [
               {"kind": "primitive", "name": "int"}
             ]}}
           ],
           "exportedValues": [
             {"name": "make", "isComponent": true, "type": {"kind": "function", "params": [
               {"label": "name", "type": {"kind": "primitive", "name": "string"}},
               {"label": "count", "optional": true, "type": {"kind": "primitive", "name": "int"}},
               {"type": {"kind": "primitive", "name": "unit"}}
             ], "result": {"kind": "primitive", "name": "unknown"}}}
           ]}
        ]}
    "#, "B", @r"
    /* TypeScript file generated from B by typeshim. */

    import type {t as A_t} from './A.gen';
    import type * as React from 'react';

    export type x = A_t<number>;

    export declare const make: React.FC<{ readonly name: string; readonly count?: number }>;
    ");
}

#[test]
fn opaque_declaration() {
    shot_declarations!(r#"
        {"modules": [{"modulePath": "A", "typeDeclarations": [
          {"name": "t", "params": ["a"], "body": {"kind": "opaque"}}
        ]}]}
    "#, "A", @r"
    /* TypeScript file generated from A by typeshim. */

    export declare abstract class t<a> { protected opaque: any }
    ");
}

#[test]
fn default_export_and_disabled_header() {
    shot_declarations!(r#"
        {"config": {"header": false},
         "modules": [{"modulePath": "M", "exportedValues": [
           {"name": "default", "type": {"kind": "primitive", "name": "int"}}
         ]}]}
    "#, "M", @r"
    export declare const $$default: number;

    export default $$default;
    ");
}

#[test]
fn namespace_members_are_flattened() {
    shot_declarations!(r#"
        {"modules": [{"modulePath": "ModuleAliases",
          "namespaces": [
            {"name": "Outer", "namespaces": [{"name": "Inner",
              "typeDeclarations": [
                {"name": "innerT", "body": {"kind": "record", "fields": [
                  {"name": "inner", "type": {"kind": "primitive", "name": "string"}}
                ]}}
              ]
            }]},
            {"name": "Outer2", "aliasOf": "Outer"}
          ]
        }]}
    "#, "ModuleAliases", @r"
    /* TypeScript file generated from ModuleAliases by typeshim. */

    export type Outer_Inner_innerT = {
      readonly inner: string;
    };

    export type Outer2_Inner_innerT = Outer_Inner_innerT;
    ");
}

#[test]
fn nested_option_behind_a_generic_alias_admits_null() {
    shot_declarations!(r#"
        {"modules": [{"modulePath": "M",
          "typeDeclarations": [
            {"name": "maybe", "params": ["a"], "body": {"kind": "option", "inner": {"kind": "var", "name": "a"}}}
          ],
          "exportedValues": [
            {"name": "v", "type": {"kind": "option", "inner": {"kind": "ref", "name": "maybe", "args": [
              {"kind": "primitive", "name": "int"}
            ]}}},
            {"name": "w", "type": {"kind": "record", "fields": [
              {"name": "inner", "optional": true, "type": {"kind": "ref", "name": "maybe", "args": [
                {"kind": "primitive", "name": "string"}
              ]}}
            ]}}
          ]}]}
    "#, "M", @r"
    /* TypeScript file generated from M by typeshim. */

    export type maybe<a> = (undefined | a);

    export declare const v: (undefined | null | number);

    export declare const w: { readonly inner?: (undefined | null | string) };
    ");
}

#[test]
fn mutually_recursive_group_lists_its_members_first() {
    let out = crate::test_utils::declarations(
        indoc::indoc! {r#"
            {"config": {"header": false},
             "modules": [{"modulePath": "M", "typeDeclarations": [
              {"name": "a", "body": {"kind": "record", "fields": [
                {"name": "b", "type": {"kind": "option", "inner": {"kind": "ref", "name": "b"}}}
              ]}},
              {"name": "b", "body": {"kind": "record", "fields": [
                {"name": "a", "type": {"kind": "ref", "name": "a"}}
              ]}}
            ]}]}
        "#},
        "M",
    );

    let header = out.lines().next().unwrap();
    assert!(
        header == "// recursive: a, b" || header == "// recursive: b, a",
        "{out}"
    );
    assert!(out.contains("export type a = {") && out.contains("export type b = {"));
}

#[test]
fn imported_values_declare_their_host_type() {
    shot_declarations!(r#"
        {"modules": [{"modulePath": "ImportJsValue",
          "typeDeclarations": [
            {"name": "color", "body": {"kind": "variant", "cases": [{"tag": "tomato"}, {"tag": "gray"}]}}
          ],
          "importedValues": [
            {"name": "round", "from": "./MyMath", "type": {"kind": "function",
              "params": [{"type": {"kind": "primitive", "name": "float"}}],
              "result": {"kind": "primitive", "name": "float"}}},
            {"name": "useColor", "from": "./MyMath", "type": {"kind": "function",
              "params": [{"type": {"kind": "ref", "name": "color"}}],
              "result": {"kind": "primitive", "name": "int"}}}
          ]}]}
    "#, "ImportJsValue", @r#"
    /* TypeScript file generated from ImportJsValue by typeshim. */

    export type color = "tomato" | "gray";

    export declare const roundTypeChecked: (_1: number) => number;
    export declare const round: unknown;

    export declare const useColorTypeChecked: (_1: color) => number;
    export declare const useColor: unknown;
    "#);
}
