use crate::shot_plans;

#[test]
fn identity_types_are_elided() {
    shot_plans!(r#"
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
    "#, "Types", @"export Types.swap = id");
}

#[test]
fn variant_with_payload() {
    shot_plans!(r#"
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
    "#, "Types", @r"
    p1: fn(p2) -> p2
    p2 Types.t: variant {A: block 0 (id, id), B: const 0}
    export Types.make = p1
    ");
}

#[test]
fn enums_ordinary_and_polymorphic() {
    shot_plans!(r#"
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
    p1 Days.weekday: enum {#-949852400 <-> "monday", #323181965 <-> "tuesday"}
    p2: fn(p3) -> p3
    p3 Days.color: enum {0 <-> "red", 1 <-> "GREEN"}
    export Days.today = p1
    export Days.paint = p2
    "#);
}

#[test]
fn polymorphic_variant_with_payload() {
    shot_plans!(r#"
        {"modules": [{"modulePath": "Shapes",
          "exportedValues": [
            {"name": "shape", "type": {"kind": "variant", "polymorphic": true, "cases": [
              {"tag": "circle", "payload": [{"kind": "primitive", "name": "float"}]},
              {"tag": "x"}
            ]}}
          ]}]}
    "#, "Shapes", @r"
    p1: variant {circle: #-703761904 (id), x: #120}
    export Shapes.shape = p1
    ");
}

#[test]
fn curried_labeled_function() {
    shot_plans!(r#"
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
          {"name": "h", "type": {"kind": "function", "curried": true, "params": [
            {"type": {"kind": "primitive", "name": "int"}}
          ], "result": {"kind": "primitive", "name": "int"}}}
        ]}]}
    "#, "Uncurried", @r"
    p1: fn curried(~a: id, ~b: id, ~c?: id) -> id
    p2: fn(id, ~x: id, ()) -> id
    export Uncurried.f = p1
    export Uncurried.g = p2
    export Uncurried.h = id
    ");
}

#[test]
fn recursive_variant_reuses_reserved_plan() {
    shot_plans!(r#"
        {"modules": [{"modulePath": "Calc",
          "typeDeclarations": [
            {"name": "expr", "body": {"kind": "variant", "cases": [
              {"tag": "Num", "payload": [{"kind": "primitive", "name": "int"}]},
              {"tag": "Add", "payload": [{"kind": "ref", "name": "expr"}, {"kind": "ref", "name": "expr"}]}
            ]}}
          ],
          "exportedValues": [
            {"name": "eval", "type": {"kind": "function",
              "params": [{"type": {"kind": "ref", "name": "expr"}}],
              "result": {"kind": "primitive", "name": "int"}}}
          ]}]}
    "#, "Calc", @r"
    p1: fn(p2) -> id
    p2 Calc.expr: variant {Num: block 0 (id), Add: block 1 (p2, p2)}
    export Calc.eval = p1
    ");
}

#[test]
fn mutually_recursive_records() {
    shot_plans!(r#"
        {"modules": [{"modulePath": "M",
          "typeDeclarations": [
            {"name": "a", "body": {"kind": "record", "fields": [
              {"name": "b", "type": {"kind": "option", "inner": {"kind": "ref", "name": "b"}}},
              {"name": "_type", "as": "type", "type": {"kind": "primitive", "name": "string"}}
            ]}},
            {"name": "b", "body": {"kind": "record", "fields": [
              {"name": "a", "mutable": true, "type": {"kind": "ref", "name": "a"}}
            ]}}
          ],
          "exportedValues": [
            {"name": "root", "type": {"kind": "ref", "name": "a"}}
          ]}]}
    "#, "M", @r"
    p1 M.a: record {b: p2, _type as type: id}
    p2: option(p3)
    p3 M.b: record {mut a: p1}
    export M.root = p1
    ");
}

#[test]
fn generic_instantiations_get_distinct_plans() {
    shot_plans!(r#"
        {"modules": [{"modulePath": "G",
          "typeDeclarations": [
            {"name": "color", "body": {"kind": "variant", "cases": [{"tag": "red"}]}},
            {"name": "box", "params": ["a"], "body": {"kind": "record", "fields": [
              {"name": "value", "type": {"kind": "var", "name": "a"}},
              {"name": "label", "as": "name", "type": {"kind": "primitive", "name": "string"}}
            ]}}
          ],
          "exportedValues": [
            {"name": "a", "type": {"kind": "ref", "name": "box", "args": [{"kind": "primitive", "name": "int"}]}},
            {"name": "b", "type": {"kind": "ref", "name": "box", "args": [{"kind": "ref", "name": "color"}]}}
          ]}]}
    "#, "G", @r#"
    p1 G.box: record {value: id, label as name: id}
    p2 G.box#2: record {value: p3, label as name: id}
    p3 G.color: enum {0 <-> "red"}
    export G.a = p1
    export G.b = p2
    "#);
}

#[test]
fn optional_fields_and_nested_options() {
    shot_plans!(r#"
        {"modules": [{"modulePath": "M", "exportedValues": [
          {"name": "x", "type": {"kind": "option", "inner":
            {"kind": "option", "inner": {"kind": "primitive", "name": "int"}}}},
          {"name": "r", "type": {"kind": "record", "fields": [
            {"name": "a", "optional": true, "type": {"kind": "option", "inner": {"kind": "primitive", "name": "int"}}}
          ]}}
        ]}]}
    "#, "M", @r"
    p1: nested-option(id)
    p2: record {a?: p1}
    export M.x = p1
    export M.r = p2
    ");
}

#[test]
fn component_plan() {
    shot_plans!(r#"
        {"modules": [{"modulePath": "Hooks", "exportedValues": [
          {"name": "make", "isComponent": true, "type": {"kind": "function", "params": [
            {"label": "name", "type": {"kind": "primitive", "name": "string"}},
            {"type": {"kind": "primitive", "name": "unit"}}
          ], "result": {"kind": "primitive", "name": "unknown"}}}
        ]}]}
    "#, "Hooks", @r"
    p1: component(~name: id, ()) -> id
    export Hooks.make = p1
    ");
}

#[test]
fn deeply_nested_option_is_a_gap() {
    shot_plans!(r#"
        {"modules": [{"modulePath": "M", "exportedValues": [
          {"name": "y", "type": {"kind": "option", "inner": {"kind": "option", "inner":
            {"kind": "option", "inner": {"kind": "primitive", "name": "int"}}}}}
        ]}]}
    "#, "M", @r"
    p1: id
    export M.y = p1
    ---
    error: options nested more than two levels are not supported
      --> M.y
      = hint: wrap the inner option in a record or a variant
    ");
}

#[test]
fn converted_function_in_variant_payload_is_a_gap() {
    shot_plans!(r#"
        {"modules": [{"modulePath": "M",
          "typeDeclarations": [
            {"name": "t", "body": {"kind": "variant", "cases": [
              {"tag": "Cb", "payload": [{"kind": "function", "curried": true, "params": [
                {"type": {"kind": "primitive", "name": "int"}},
                {"type": {"kind": "primitive", "name": "int"}}
              ], "result": {"kind": "primitive", "name": "int"}}]},
              {"tag": "Plain", "payload": [{"kind": "function", "params": [
                {"type": {"kind": "primitive", "name": "int"}}
              ], "result": {"kind": "primitive", "name": "int"}}]}
            ]}}
          ],
          "exportedValues": [{"name": "v", "type": {"kind": "ref", "name": "t"}}]}]}
    "#, "M", @r"
    p1 M.t: variant {Cb: block 0 (p2), Plain: block 1 (id)}
    p2: fn curried(id, id) -> id
    export M.v = p1
    ---
    error: case `Cb` carries a function that needs conversion
      --> M.v.Cb
      = hint: move the function into a record field, or make it uncurried and unlabeled
    ");
}

#[test]
fn polymorphic_recursion_is_a_gap() {
    shot_plans!(r#"
        {"modules": [{"modulePath": "M",
          "typeDeclarations": [
            {"name": "nested", "params": ["a"], "body": {"kind": "variant", "cases": [
              {"tag": "Nil"},
              {"tag": "Cons", "payload": [
                {"kind": "var", "name": "a"},
                {"kind": "ref", "name": "nested", "args": [
                  {"kind": "array", "inner": {"kind": "var", "name": "a"}}
                ]}
              ]}
            ]}}
          ],
          "exportedValues": [
            {"name": "n", "type": {"kind": "ref", "name": "nested", "args": [
              {"kind": "primitive", "name": "int"}
            ]}}
          ]}]}
    "#, "M", @r"
    export M.n = id
    ---
    error: `M.nested` is instantiated at a different type inside its own definition
      --> M.n
      = hint: recursive references must use the declaration's own type parameters
    ");
}

#[test]
fn reference_to_broken_declaration_is_a_gap() {
    shot_plans!(r#"
        {"modules": [
          {"modulePath": "A", "typeDeclarations": [
            {"name": "t", "body": {"kind": "ref", "name": "Missing"}}
          ]},
          {"modulePath": "B", "exportedValues": [
            {"name": "x", "type": {"kind": "array", "inner": {"kind": "ref", "name": "A.t"}}}
          ]}
        ]}
    "#, "B", @r"
    export B.x = id
    ---
    error: depends on `A.t`, which failed to generate
      --> B.x
    ");
}

#[test]
fn structurally_equal_declarations_keep_their_own_plans() {
    shot_plans!(r#"
        {"modules": [{"modulePath": "M",
          "typeDeclarations": [
            {"name": "a", "body": {"kind": "variant", "cases": [{"tag": "X"}, {"tag": "Y"}]}},
            {"name": "b", "body": {"kind": "variant", "cases": [{"tag": "X"}, {"tag": "Y"}]}}
          ],
          "exportedValues": [
            {"name": "useB", "type": {"kind": "function",
              "params": [{"type": {"kind": "ref", "name": "b"}}],
              "result": {"kind": "ref", "name": "a"}}},
            {"name": "r", "type": {"kind": "record", "fields": [
              {"name": "c", "type": {"kind": "ref", "name": "a"}}
            ]}}
          ]}]}
    "#, "M", @r#"
    p1: fn(p2) -> p3
    p2 M.b: enum {0 <-> "X", 1 <-> "Y"}
    p3 M.a: enum {0 <-> "X", 1 <-> "Y"}
    p4: record {c: p3}
    export M.useB = p1
    export M.r = p4
    "#);
}

#[test]
fn imported_values_are_planned_after_exports() {
    shot_plans!(r#"
        {"modules": [{"modulePath": "M",
          "typeDeclarations": [
            {"name": "color", "body": {"kind": "variant", "cases": [{"tag": "tomato"}, {"tag": "gray"}]}}
          ],
          "exportedValues": [
            {"name": "answer", "type": {"kind": "primitive", "name": "int"}}
          ],
          "importedValues": [
            {"name": "useColor", "from": "./MyMath", "type": {"kind": "function",
              "params": [{"type": {"kind": "ref", "name": "color"}}],
              "result": {"kind": "primitive", "name": "int"}}}
          ]}]}
    "#, "M", @r#"
    p1: fn(p2) -> id
    p2 M.color: enum {0 <-> "tomato", 1 <-> "gray"}
    export M.answer = id
    import M.useColor = p1
    "#);
}
