//! Shim emitter: the JavaScript module that sits between host callers and
//! the compiled origin module.
//!
//! Every exported value is re-exported either directly (identity plans) or
//! through a conversion. Converters of named declarations, variants, and
//! functions are hoisted into helpers named after the plan; enum tables are
//! hoisted as constants. Helpers are emitted only when referenced.

use std::collections::BTreeMap;

use indexmap::IndexSet;
use typeshim_core::utils::{is_identifier, member_access, property_key, quote_string};

use super::config::{Config, ModuleFormat};
use crate::model::{ExportId, Model};
use crate::naming::{ModuleNames, component_display_name};
use crate::plan::{
    ArgSlot, CasePlan, Convention, Converter, FieldPlan, FunctionPlan, ModulePlans, OriginTag,
    PlanId, VariantPlan,
};

/// Marker object the origin uses for `Some(None)`.
const NESTED_NONE_MARKER: &str = "BS_PRIVATE_NESTED_SOME_NONE";

/// Highest arity with a dedicated `Curry._N` entry point.
const MAX_CURRY_ARITY: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Direction {
    ToHost,
    ToOrigin,
}

impl Direction {
    fn flip(self) -> Self {
        match self {
            Direction::ToHost => Direction::ToOrigin,
            Direction::ToOrigin => Direction::ToHost,
        }
    }
}

/// Tables must be initialized before any helper runs at load time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum HelperKind {
    Table,
    Function,
}

/// Render the contents of `<Module>.gen.js`.
pub fn render_shim(
    model: &Model,
    names: &ModuleNames,
    plans: &ModulePlans,
    config: &Config,
) -> String {
    let mut shim = Shim {
        model,
        names,
        plans,
        config,
        requested: IndexSet::new(),
        uses_curry: false,
        uses_react: false,
    };
    let exports = shim.exports();
    let helpers = shim.helpers();
    shim.assemble(helpers, exports)
}

struct Shim<'a> {
    model: &'a Model,
    names: &'a ModuleNames,
    plans: &'a ModulePlans,
    config: &'a Config,
    /// Helpers referenced so far, in first-use order.
    requested: IndexSet<(PlanId, Direction)>,
    uses_curry: bool,
    uses_react: bool,
}

impl<'a> Shim<'a> {
    fn assemble(&self, helpers: Vec<String>, exports: Vec<String>) -> String {
        let module = &self.model.module(self.names.module()).name;
        let binding = self.names.origin_binding();
        let origin_path = format!("./{module}{}", self.config.origin_suffix);

        let mut blocks = Vec::new();
        if self.config.header {
            blocks.push(format!(
                "/* JavaScript file generated from {module} by typeshim. */\n"
            ));
        }

        let mut imports = String::new();
        if self.uses_curry {
            imports.push_str(&self.import("Curry", self.config.curry_import()));
        }
        imports.push_str(&self.import(binding, &origin_path));
        if self.uses_react {
            imports.push_str(&self.import("React", &self.config.react_module));
        }
        blocks.push(imports);

        let host_imports = self.host_imports();
        if !host_imports.is_empty() {
            blocks.push(host_imports);
        }

        blocks.extend(helpers);
        blocks.extend(exports);
        blocks.join("\n")
    }

    fn import(&self, binding: &str, path: &str) -> String {
        match self.config.module_format {
            ModuleFormat::Es6 => format!("import * as {binding} from '{path}';\n"),
            ModuleFormat::CommonJs => format!("const {binding} = require('{path}');\n"),
        }
    }

    /// Raw imports of the host values the origin module binds to.
    fn host_imports(&self) -> String {
        let module = self.model.module(self.names.module());
        let mut out = String::new();
        for id in module.root.all_exports() {
            let (Some(import), Some(binding)) =
                (&self.model.export(id).import, self.names.host_binding(id))
            else {
                continue;
            };
            let (from, imported, local) = (&import.from, &import.name, &binding.unchecked);
            out.push_str(&match self.config.module_format {
                ModuleFormat::Es6 => format!("import {{{imported} as {local}}} from '{from}';\n"),
                ModuleFormat::CommonJs => format!(
                    "const {local} = {};\n",
                    member_access(&format!("require('{from}')"), imported)
                ),
            });
        }
        out
    }

    fn exports(&mut self) -> Vec<String> {
        let module = self.model.module(self.names.module());
        let mut blocks = Vec::new();
        let mut default_export = None;

        for id in module.root.all_exports() {
            let names = self.names;
            let Some(name) = names.value_name(id) else {
                continue;
            };
            let export = self.model.export(id);
            if export.path.is_empty() && self.model.name(export.name) == "default" {
                default_export = Some(name.to_string());
            }
            match names.host_binding(id) {
                Some(binding) => {
                    blocks.push(self.binding(&binding.checked, &binding.unchecked));
                    let value = self.imported_value(id, &binding.checked);
                    blocks.push(self.binding(name, &value));
                }
                None => {
                    let value = self.value(id);
                    blocks.push(self.binding(name, &value));
                }
            }
        }

        if let Some(name) = default_export {
            blocks.push(match self.config.module_format {
                ModuleFormat::Es6 => format!("export default {name};\n"),
                ModuleFormat::CommonJs => format!("exports.default = {name};\n"),
            });
        }
        blocks
    }

    fn binding(&self, name: &str, value: &str) -> String {
        match self.config.module_format {
            ModuleFormat::Es6 => format!("export const {name} = {value};\n"),
            ModuleFormat::CommonJs => format!("const {name} = {value};\nexports.{name} = {name};\n"),
        }
    }

    /// Imported host value `checked`, wrapped so the origin can use it.
    fn imported_value(&mut self, id: ExportId, checked: &str) -> String {
        let export = self.model.export(id);
        let plans = self.plans;
        let plan = plans.export_plan(id);

        match plans.table.get(plan) {
            Some(entry) if !plan.is_identity() => match &entry.converter {
                Converter::Function(func) if export.is_component => {
                    let display = component_display_name(self.model, id);
                    self.function_expr(func, Direction::ToOrigin, checked, &display, "")
                }
                Converter::Function(func) if entry.named.is_none() => {
                    self.function_expr(func, Direction::ToOrigin, checked, "", "")
                }
                _ => self.conv(plan, Direction::ToOrigin, checked),
            },
            _ => checked.to_string(),
        }
    }

    /// Right-hand side of one export.
    fn value(&mut self, id: ExportId) -> String {
        let export = self.model.export(id);
        let access = self.origin_access(id);
        let plans = self.plans;
        let plan = plans.export_plan(id);

        match plans.table.get(plan) {
            Some(entry) if !plan.is_identity() => match &entry.converter {
                Converter::Function(func) if export.is_component => {
                    let display = component_display_name(self.model, id);
                    self.function_expr(func, Direction::ToHost, &access, &display, "")
                }
                Converter::Function(func) if entry.named.is_none() => {
                    self.function_expr(func, Direction::ToHost, &access, "", "")
                }
                _ => self.conv(plan, Direction::ToHost, &access),
            },
            _ => access,
        }
    }

    /// `TypesBS.Inner.make` for `Types.Inner.make`.
    fn origin_access(&self, id: ExportId) -> String {
        let export = self.model.export(id);
        let mut access = self.names.origin_binding().to_string();
        for &seg in &export.path {
            access = member_access(&access, self.model.name(seg));
        }
        member_access(&access, self.model.name(export.name))
    }

    /// Expression converting `expr` through `plan`.
    fn conv(&mut self, plan: PlanId, dir: Direction, expr: &str) -> String {
        if plan.is_identity() {
            return expr.to_string();
        }
        let plans = self.plans;
        let Some(entry) = plans.table.get(plan) else {
            return expr.to_string();
        };
        match &entry.converter {
            Converter::Identity | Converter::Pending => expr.to_string(),
            Converter::Enum(_) => {
                self.requested.insert((plan, dir));
                format!("{}[{expr}]", self.table_name(plan, dir))
            }
            Converter::Variant(_) | Converter::Function(_) => self.call_helper(plan, dir, expr),
            _ if entry.named.is_some() => self.call_helper(plan, dir, expr),
            _ => self.inline(plan, dir, expr),
        }
    }

    fn call_helper(&mut self, plan: PlanId, dir: Direction, expr: &str) -> String {
        self.requested.insert((plan, dir));
        format!("{}({expr})", self.helper_name(plan, dir))
    }

    /// Structural converters written out in place.
    fn inline(&mut self, plan: PlanId, dir: Direction, expr: &str) -> String {
        let plans = self.plans;
        match plans.table.converter(plan) {
            Converter::Option { inner, nested } => {
                let (nested, inner) = (*nested, *inner);
                if !is_identifier(expr) {
                    // Read the source once; it may be an accessor.
                    let body = self.option(inner, nested, dir, "v");
                    return format!("((v) => {body})({expr})");
                }
                self.option(inner, nested, dir, expr)
            }
            Converter::Array(inner) => {
                let element = self.conv(*inner, dir, "v");
                format!("{expr}.map((v) => {element})")
            }
            Converter::Tuple(elements) => {
                let parts: Vec<_> = elements
                    .iter()
                    .enumerate()
                    .map(|(i, &p)| self.conv(p, dir, &format!("{expr}[{i}]")))
                    .collect();
                format!("[{}]", parts.join(", "))
            }
            Converter::Record(fields) => self.record(fields, dir, expr),
            _ => expr.to_string(),
        }
    }

    /// Option conversion of `value`, which is read more than once.
    fn option(&mut self, inner: PlanId, nested: bool, dir: Direction, value: &str) -> String {
        let present = self.conv(inner, dir, value);
        match (dir, nested) {
            (Direction::ToHost, false) => {
                format!("({value} === undefined ? undefined : {present})")
            }
            (Direction::ToOrigin, false) => format!("({value} == null ? undefined : {present})"),
            (Direction::ToHost, true) => format!(
                "({value} === undefined ? undefined : {value}.{NESTED_NONE_MARKER} !== undefined ? null : {present})"
            ),
            (Direction::ToOrigin, true) => format!(
                "({value} === undefined ? undefined : {value} === null ? {{{NESTED_NONE_MARKER}: 0}} : {present})"
            ),
        }
    }

    /// Object literal copying every field. Mutable fields become accessor
    /// pairs over the source object so writes reach the other side.
    fn record(&mut self, fields: &[FieldPlan], dir: Direction, expr: &str) -> String {
        let mut parts = Vec::with_capacity(fields.len());
        for field in fields {
            let (from, to) = match dir {
                Direction::ToHost => (&field.name, &field.host_name),
                Direction::ToOrigin => (&field.host_name, &field.name),
            };
            let access = member_access(expr, from);
            let key = property_key(to);
            if field.mutable {
                let get = self.conv(field.plan, dir, &access);
                let set = self.conv(field.plan, dir.flip(), "v");
                parts.push(format!(
                    "get {key}() {{ return {get}; }}, set {key}(v) {{ {access} = {set}; }}"
                ));
            } else {
                let value = self.conv(field.plan, dir, &access);
                parts.push(format!("{key}: {value}"));
            }
        }
        format!("{{{}}}", parts.join(", "))
    }

    /// Emit every requested helper, including the ones requested while
    /// emitting others. Tables come first, then functions, each by plan.
    fn helpers(&mut self) -> Vec<String> {
        let mut bodies = BTreeMap::new();
        let mut next = 0;
        while let Some(&(plan, dir)) = self.requested.get_index(next) {
            next += 1;
            let (kind, body) = self.helper(plan, dir);
            bodies.insert((kind, plan, dir), body);
        }
        bodies.into_values().collect()
    }

    fn helper(&mut self, plan: PlanId, dir: Direction) -> (HelperKind, String) {
        let plans = self.plans;
        let name = self.helper_name(plan, dir);
        match plans.table.converter(plan) {
            Converter::Enum(table) => {
                let entries: Vec<_> = table
                    .entries
                    .iter()
                    .map(|e| {
                        let origin = e.origin.discriminant();
                        match dir {
                            Direction::ToHost => format!(
                                "{}: {}",
                                quote_string(&origin.to_string()),
                                quote_string(&e.host)
                            ),
                            Direction::ToOrigin => format!("{}: {origin}", quote_string(&e.host)),
                        }
                    })
                    .collect();
                let table_name = self.table_name(plan, dir);
                (
                    HelperKind::Table,
                    format!("const {table_name} = {{{}}};\n", entries.join(", ")),
                )
            }
            Converter::Variant(variant) => {
                let body = match dir {
                    Direction::ToHost => self.variant_to_host(variant),
                    Direction::ToOrigin => self.variant_to_origin(variant),
                };
                (
                    HelperKind::Function,
                    format!("function {name}(x) {{\n{body}}}\n"),
                )
            }
            Converter::Function(func) => {
                let wrapper = self.function_expr(func, dir, "f", "", "  ");
                (
                    HelperKind::Function,
                    format!("function {name}(f) {{\n  return {wrapper};\n}}\n"),
                )
            }
            _ => {
                let value = self.inline(plan, dir, "x");
                (
                    HelperKind::Function,
                    format!("function {name}(x) {{\n  return {value};\n}}\n"),
                )
            }
        }
    }

    fn variant_to_host(&mut self, variant: &VariantPlan) -> String {
        let (constants, blocks): (Vec<&CasePlan>, Vec<&CasePlan>) =
            variant.cases.iter().partition(|c| c.is_constant());
        let mut out = String::new();

        if !constants.is_empty() {
            out.push_str("  if (typeof x === \"number\") {\n    switch (x) {\n");
            for case in constants {
                out.push_str(&format!(
                    "      case {}: return {{tag: {}}};\n",
                    case.origin.discriminant(),
                    quote_string(&case.host_tag)
                ));
            }
            out.push_str("    }\n  }\n");
        }

        if !blocks.is_empty() {
            let discriminant = if variant.polymorphic { "x.NAME" } else { "x.TAG" };
            out.push_str(&format!("  switch ({discriminant}) {{\n"));
            for case in blocks {
                let sources: Vec<String> = (0..case.payload.len())
                    .map(|i| match case.origin {
                        OriginTag::Hash(_) if case.payload.len() == 1 => "x.VAL".to_string(),
                        OriginTag::Hash(_) => format!("x.VAL[{i}]"),
                        _ => format!("x._{i}"),
                    })
                    .collect();
                let values: Vec<String> = case
                    .payload
                    .iter()
                    .zip(&sources)
                    .map(|(&p, source)| self.conv(p, Direction::ToHost, source))
                    .collect();
                let value = match values.as_slice() {
                    [single] => single.clone(),
                    many => format!("[{}]", many.join(", ")),
                };
                out.push_str(&format!(
                    "    case {}: return {{tag: {}, value: {value}}};\n",
                    case.origin.discriminant(),
                    quote_string(&case.host_tag)
                ));
            }
            out.push_str("  }\n");
        }
        out
    }

    fn variant_to_origin(&mut self, variant: &VariantPlan) -> String {
        let mut out = String::from("  switch (x.tag) {\n");
        for case in &variant.cases {
            let sources: Vec<String> = match case.payload.len() {
                1 => vec!["x.value".to_string()],
                n => (0..n).map(|i| format!("x.value[{i}]")).collect(),
            };
            let values: Vec<String> = case
                .payload
                .iter()
                .zip(&sources)
                .map(|(&p, source)| self.conv(p, Direction::ToOrigin, source))
                .collect();

            let discriminant = case.origin.discriminant();
            let origin = match (case.origin, values.as_slice()) {
                (_, []) => discriminant.to_string(),
                (OriginTag::Hash(_), [single]) => {
                    format!("{{NAME: {discriminant}, VAL: {single}}}")
                }
                (OriginTag::Hash(_), many) => {
                    format!("{{NAME: {discriminant}, VAL: [{}]}}", many.join(", "))
                }
                (_, fields) => {
                    let fields: Vec<_> = fields
                        .iter()
                        .enumerate()
                        .map(|(i, v)| format!("_{i}: {v}"))
                        .collect();
                    format!("{{TAG: {discriminant}, {}}}", fields.join(", "))
                }
            };
            out.push_str(&format!(
                "    case {}: return {origin};\n",
                quote_string(&case.host_tag)
            ));
        }
        out.push_str("  }\n");
        out
    }

    /// Function expression adapting `callee` to the other calling convention.
    ///
    /// `ToHost` wraps an origin function for host callers; `ToOrigin` wraps a
    /// host function so the origin can call it. Lines after the first are
    /// prefixed with `indent`.
    fn function_expr(
        &mut self,
        func: &FunctionPlan,
        dir: Direction,
        callee: &str,
        name: &str,
        indent: &str,
    ) -> String {
        let (params, call, result) = match dir {
            Direction::ToHost => self.host_callable(func, callee),
            Direction::ToOrigin => self.origin_callable(func, callee),
        };
        format!(
            "function {name}({}) {{\n{indent}  const result = {call};\n{indent}  return {result};\n{indent}}}",
            params.join(", ")
        )
    }

    /// Host arguments converted to origin arguments, in origin order.
    fn host_callable(
        &mut self,
        func: &FunctionPlan,
        callee: &str,
    ) -> (Vec<String>, String, String) {
        let adapter = &func.adapter;
        let component = adapter.convention == Convention::Component;
        let options = if component { "Arg1" } else { "Options" };

        let mut params: Vec<String> = if component {
            vec!["Arg1".to_string()]
        } else {
            (1..=adapter.positional_count())
                .map(|i| format!("Arg{i}"))
                .collect()
        };
        if !component && adapter.has_labels() {
            params.push(if adapter.options_optional() {
                format!("{options} = {{}}")
            } else {
                options.to_string()
            });
        }

        let mut args = Vec::with_capacity(adapter.slots.len());
        let mut props = Vec::new();
        for (slot, &plan) in adapter.slots.iter().zip(&func.params) {
            match slot {
                ArgSlot::Positional(k) => {
                    args.push(self.conv(plan, Direction::ToOrigin, &format!("Arg{}", k + 1)));
                }
                ArgSlot::Labeled { name, optional } => {
                    let access = member_access(options, name);
                    let converted = self.conv(plan, Direction::ToOrigin, &access);
                    let value = if *optional {
                        format!("({access} == null ? undefined : {converted})")
                    } else {
                        converted
                    };
                    props.push(format!("{}: {value}", property_key(name)));
                    args.push(value);
                }
                ArgSlot::Unit => args.push("undefined".to_string()),
            }
        }

        let call = match adapter.convention {
            Convention::Component if adapter.has_labels() || adapter.positional_count() == 0 => {
                format!("{callee}({{{}}})", props.join(", "))
            }
            Convention::Component => {
                let first = args.into_iter().next().unwrap_or_default();
                format!("{callee}({first})")
            }
            Convention::Uncurried => format!("{callee}({})", args.join(", ")),
            Convention::Curried => self.curried_call(callee, &args),
        };
        let result = self.conv(func.result, Direction::ToHost, "result");
        (params, call, result)
    }

    /// Origin arguments converted to host arguments: positional ones in
    /// order, then one options object with the labeled ones.
    fn origin_callable(
        &mut self,
        func: &FunctionPlan,
        callee: &str,
    ) -> (Vec<String>, String, String) {
        let adapter = &func.adapter;
        if adapter.convention == Convention::Component {
            return self.origin_component(func, callee);
        }
        let params: Vec<String> = (1..=adapter.slots.len())
            .map(|i| format!("Arg{i}"))
            .collect();

        let mut args = Vec::new();
        let mut options = Vec::new();
        for (i, (slot, &plan)) in adapter.slots.iter().zip(&func.params).enumerate() {
            let param = &params[i];
            match slot {
                ArgSlot::Positional(_) => args.push(self.conv(plan, Direction::ToHost, param)),
                ArgSlot::Labeled { name, optional } => {
                    let converted = self.conv(plan, Direction::ToHost, param);
                    let value = if *optional && !plan.is_identity() {
                        format!("({param} === undefined ? undefined : {converted})")
                    } else {
                        converted
                    };
                    options.push(format!("{}: {value}", property_key(name)));
                }
                ArgSlot::Unit => {}
            }
        }
        if adapter.has_labels() {
            args.push(format!("{{{}}}", options.join(", ")));
        }

        let call = format!("{callee}({})", args.join(", "));
        let result = self.conv(func.result, Direction::ToOrigin, "result");
        (params, call, result)
    }

    /// The origin passes one props object; the host component is rendered
    /// through `React.createElement`.
    fn origin_component(
        &mut self,
        func: &FunctionPlan,
        callee: &str,
    ) -> (Vec<String>, String, String) {
        let adapter = &func.adapter;
        let slots = adapter.slots.iter().zip(&func.params);

        let props = if adapter.has_labels() || adapter.positional_count() == 0 {
            let mut fields = Vec::new();
            for (slot, &plan) in slots {
                let ArgSlot::Labeled { name, optional } = slot else {
                    continue;
                };
                let access = member_access("Arg1", name);
                let converted = self.conv(plan, Direction::ToHost, &access);
                let value = if *optional && !plan.is_identity() {
                    format!("({access} === undefined ? undefined : {converted})")
                } else {
                    converted
                };
                fields.push(format!("{}: {value}", property_key(name)));
            }
            format!("{{{}}}", fields.join(", "))
        } else {
            let plan = slots
                .filter(|(slot, _)| matches!(slot, ArgSlot::Positional(_)))
                .map(|(_, &plan)| plan)
                .next()
                .unwrap_or(PlanId::IDENTITY);
            self.conv(plan, Direction::ToHost, "Arg1")
        };

        self.uses_react = true;
        let call = format!("React.createElement({callee}, {props})");
        let result = self.conv(func.result, Direction::ToOrigin, "result");
        (vec!["Arg1".to_string()], call, result)
    }

    fn curried_call(&mut self, callee: &str, args: &[String]) -> String {
        self.uses_curry = true;
        if args.len() <= MAX_CURRY_ARITY {
            format!("Curry._{}({callee}, {})", args.len(), args.join(", "))
        } else {
            format!("Curry.app({callee}, [{}])", args.join(", "))
        }
    }

    /// Suffix shared by a plan's helpers: the declaration's host name for
    /// named plans (`box$2` for its second instantiation), else the plan index.
    fn helper_base(&self, plan: PlanId) -> String {
        let named = self.plans.table.get(plan).and_then(|p| p.named);
        match named.and_then(|n| self.names.type_name(n.decl).map(|name| (name, n.instance))) {
            Some((name, 0)) => name.to_string(),
            Some((name, instance)) => format!("{name}${}", instance + 1),
            None => plan.0.to_string(),
        }
    }

    fn helper_name(&self, plan: PlanId, dir: Direction) -> String {
        let prefix = match dir {
            Direction::ToHost => "$$toHost_",
            Direction::ToOrigin => "$$toOrigin_",
        };
        format!("{prefix}{}", self.helper_base(plan))
    }

    fn table_name(&self, plan: PlanId, dir: Direction) -> String {
        let prefix = match dir {
            Direction::ToHost => "$$hostTags_",
            Direction::ToOrigin => "$$originTags_",
        };
        format!("{prefix}{}", self.helper_base(plan))
    }
}
