use indexmap::IndexMap;
use typeshim_compiler::Diagnostics;
use typeshim_compiler::analyze::analyze_dependencies;
use typeshim_compiler::model::Model;
use typeshim_compiler::plan::{PlanId, plan_module};

use super::error::RuntimeError;
use super::runtime::Runtime;
use super::value::Value;

/// A planned module with its exports addressable by origin path.
#[derive(Clone)]
pub struct ModuleRuntime {
    runtime: Runtime,
    exports: IndexMap<String, PlanId>,
}

impl ModuleRuntime {
    /// Plan `module` of `model`. `None` if the model has no such module.
    ///
    /// Planning diagnostics are returned alongside; plans that hit a
    /// conversion gap behave as identity.
    pub fn plan(model: &Model, module: &str) -> Option<(Self, Diagnostics)> {
        let id = model.module_by_name(module)?.id;
        let deps = analyze_dependencies(model);
        let mut diagnostics = Diagnostics::new();
        let plans = plan_module(model, &deps, id, &mut diagnostics);

        let exports = plans
            .exports
            .iter()
            .map(|(&export, &plan)| (model.export_path(export), plan))
            .collect();
        let runtime = Self {
            runtime: Runtime::for_module(&plans),
            exports,
        };
        Some((runtime, diagnostics))
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Replace the runtime, e.g. to attach a tracer.
    pub fn map_runtime(mut self, f: impl FnOnce(Runtime) -> Runtime) -> Self {
        self.runtime = f(self.runtime);
        self
    }

    /// Plan of an export, by dotted origin path like `Types.Inner.make`.
    pub fn export(&self, path: &str) -> Option<PlanId> {
        self.exports.get(path).copied()
    }

    pub fn exports(&self) -> impl Iterator<Item = (&str, PlanId)> {
        self.exports.iter().map(|(path, &plan)| (path.as_str(), plan))
    }

    /// Convert the origin value of export `path` for the host.
    pub fn export_to_host(&self, path: &str, value: Value) -> Result<Value, RuntimeError> {
        let plan = self
            .export(path)
            .ok_or_else(|| RuntimeError::UnknownExport(path.to_string()))?;
        self.runtime.to_host(plan, value)
    }

    /// Wrap host value `value`, imported at origin path `path`, so the
    /// origin module can use it.
    pub fn import_to_origin(&self, path: &str, value: Value) -> Result<Value, RuntimeError> {
        let plan = self
            .export(path)
            .ok_or_else(|| RuntimeError::UnknownExport(path.to_string()))?;
        self.runtime.to_origin(plan, value)
    }
}
