//! Test utilities and snapshot macros.

use crate::analyze::analyze_dependencies;
use crate::diagnostics::Diagnostics;
use crate::model::Model;
use crate::plan::plan_module;

/// Lower a JSON document, tolerating diagnostics.
pub fn lower_any(json: &str) -> (Model, Diagnostics) {
    crate::lower_json(json).expect("test document must be valid JSON")
}

/// Lower a JSON document that must have no errors.
pub fn lower_ok(json: &str) -> Model {
    let (model, diagnostics) = lower_any(json);
    assert!(!diagnostics.has_errors(), "{}", diagnostics.render());
    model
}

/// Plan dump of `module`, followed by the planner's diagnostics if any.
pub fn plan_dump(json: &str, module: &str) -> String {
    let (model, _) = lower_any(json);
    let deps = analyze_dependencies(&model);
    let id = model
        .module_by_name(module)
        .unwrap_or_else(|| panic!("no module {module}"))
        .id;

    let mut diagnostics = Diagnostics::new();
    let plans = plan_module(&model, &deps, id, &mut diagnostics);

    let mut out = plans.dump(&model);
    if !diagnostics.is_empty() {
        out.push_str("---\n");
        out.push_str(&diagnostics.render());
    }
    out
}

/// Declarations of `module` rendered without color.
pub fn declarations(json: &str, module: &str) -> String {
    let output = crate::Generator::from_json(json)
        .expect("test document must be valid JSON")
        .generate();
    match output.module(module) {
        Some(generated) => generated.declarations.clone(),
        None => panic!(
            "module {module} failed:\n{}",
            output.diagnostics.render()
        ),
    }
}

/// Shim of `module`.
pub fn shim(json: &str, module: &str) -> String {
    let output = crate::Generator::from_json(json)
        .expect("test document must be valid JSON")
        .generate();
    match output.module(module) {
        Some(generated) => generated.shim.clone(),
        None => panic!(
            "module {module} failed:\n{}",
            output.diagnostics.render()
        ),
    }
}

/// Rendered diagnostics of a document, with error classes.
pub fn errors(json: &str) -> String {
    let output = crate::Generator::from_json(json)
        .expect("test document must be valid JSON")
        .generate();
    output.diagnostics.printer().show_class(true).render()
}

/// Snapshot test for a module's conversion plans.
#[macro_export]
macro_rules! shot_plans {
    ($json:literal, $module:literal, @$snapshot:literal) => {{
        let output = $crate::test_utils::plan_dump(indoc::indoc!($json), $module);
        insta::assert_snapshot!(output, @$snapshot);
    }};
}

/// Snapshot test for a module's host declarations.
#[macro_export]
macro_rules! shot_declarations {
    ($json:literal, $module:literal, @$snapshot:literal) => {{
        let output = $crate::test_utils::declarations(indoc::indoc!($json), $module);
        insta::assert_snapshot!(output, @$snapshot);
    }};
}

/// Snapshot test for a module's shim.
#[macro_export]
macro_rules! shot_shim {
    ($json:literal, $module:literal, @$snapshot:literal) => {{
        let output = $crate::test_utils::shim(indoc::indoc!($json), $module);
        insta::assert_snapshot!(output, @$snapshot);
    }};
}

/// Snapshot test for error diagnostics.
#[macro_export]
macro_rules! shot_error {
    ($json:literal, @$snapshot:literal) => {{
        let output = $crate::test_utils::errors(indoc::indoc!($json));
        insta::assert_snapshot!(output, @$snapshot);
    }};
}
