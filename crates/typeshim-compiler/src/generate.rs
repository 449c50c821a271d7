//! Generator facade: input document to per-module artifacts.
//!
//! Pipeline: lower, analyze dependencies, assign names, plan, emit. Every
//! stage reports into one `Diagnostics` collection. A module with any error
//! produces nothing, and so does every module importing one of its types;
//! the other modules are generated normally.

use indexmap::{IndexMap, IndexSet};

use crate::analyze::analyze_dependencies;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::emit::{Config, build_decl_tree, render_declarations, render_shim};
use crate::input::{InputDocument, parse_document};
use crate::model::{Model, lower};
use crate::naming::{NameTable, assign_names};
use crate::plan::{ModulePlans, plan_module};
use crate::{Error, PassResult, Result};

/// Parse and lower a JSON document.
pub fn lower_json(json: &str) -> PassResult<Model> {
    let document = parse_document(json)?;
    Ok(lower(&document))
}

/// Artifacts of one successfully generated module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedModule {
    pub name: String,
    /// Contents of `<Module>.gen.d.ts`.
    pub declarations: String,
    /// Contents of `<Module>.gen.js`.
    pub shim: String,
    /// Dump of the module's conversion plans.
    pub plans: String,
}

impl GeneratedModule {
    pub fn declarations_file(&self) -> String {
        format!("{}.gen.d.ts", self.name)
    }

    pub fn shim_file(&self) -> String {
        format!("{}.gen.js", self.name)
    }
}

#[derive(Clone, Debug)]
pub struct GenerationOutput {
    /// Generated modules in document order.
    pub modules: IndexMap<String, GeneratedModule>,
    pub diagnostics: Diagnostics,
    /// Modules that produced no output.
    pub failed: IndexSet<String>,
}

impl GenerationOutput {
    pub fn module(&self, name: &str) -> Option<&GeneratedModule> {
        self.modules.get(name)
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// All modules, or the diagnostics if any module failed.
    pub fn into_result(self) -> Result<IndexMap<String, GeneratedModule>> {
        if self.failed.is_empty() {
            Ok(self.modules)
        } else {
            Err(Error::GenerationFailed(self.diagnostics))
        }
    }
}

/// Builder-style entry point.
///
/// ```ignore
/// let output = Generator::from_json(json)?
///     .with_config(Config::new().module_format(ModuleFormat::CommonJs))
///     .generate();
/// ```
#[derive(Clone, Debug)]
pub struct Generator {
    document: InputDocument,
    config: Config,
}

impl Generator {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::from_document(parse_document(json)?))
    }

    /// The document's `"config"` section is applied over the defaults.
    pub fn from_document(document: InputDocument) -> Self {
        let config = Config::default().apply(&document.config);
        Self { document, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the configuration. The document's section is not re-applied.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn document(&self) -> &InputDocument {
        &self.document
    }

    pub fn generate(&self) -> GenerationOutput {
        let (model, mut diagnostics) = lower(&self.document);
        tracing::debug!(
            modules = model.modules().len(),
            decls = model.decls().len(),
            exports = model.exports().len(),
            "lowered document"
        );

        let deps = analyze_dependencies(&model);
        let names = assign_names(&model, &mut diagnostics);

        let mut plans: IndexMap<String, ModulePlans> = IndexMap::new();
        for module in model.modules() {
            if diagnostics.module_has_errors(&module.name) {
                // Planned only for its conversion gaps; uses of the broken
                // types are already reported.
                let mut gaps = Diagnostics::new();
                plan_module(&model, &deps, module.id, &mut gaps);
                gaps.retain(|d| d.kind() != DiagnosticKind::DependsOnInvalidType);
                diagnostics.extend(gaps);
                continue;
            }
            let planned = plan_module(&model, &deps, module.id, &mut diagnostics);
            plans.insert(module.name.clone(), planned);
        }

        let failed = propagate_failures(&model, &names, &mut diagnostics);

        let mut modules = IndexMap::new();
        for module_names in names.iter() {
            let module = model.module(module_names.module());
            if failed.contains(&module.name) {
                continue;
            }
            let Some(module_plans) = plans.get(&module.name) else {
                continue;
            };

            let tree = build_decl_tree(&model, &deps, module_names);
            let declarations = render_declarations(&tree, &self.config);
            let shim = render_shim(&model, module_names, module_plans, &self.config);
            tracing::debug!(
                module = %module.name,
                items = tree.items.len(),
                "emitted module"
            );

            modules.insert(
                module.name.clone(),
                GeneratedModule {
                    name: module.name.clone(),
                    declarations,
                    shim,
                    plans: module_plans.dump(&model),
                },
            );
        }

        if !failed.is_empty() {
            tracing::debug!(failed = failed.len(), "modules skipped");
        }

        GenerationOutput {
            modules,
            diagnostics,
            failed,
        }
    }
}

/// Fail every module that imports a type of a failed module, until no more
/// modules fail.
fn propagate_failures(
    model: &Model,
    names: &NameTable,
    diagnostics: &mut Diagnostics,
) -> IndexSet<String> {
    let mut failed = diagnostics.failed_modules();
    loop {
        let mut changed = false;
        for module_names in names.iter() {
            let module = &model.module(module_names.module()).name;
            if failed.contains(module) {
                continue;
            }
            let broken = module_names
                .imports()
                .find(|import| failed.contains(&import.module));
            if let Some(import) = broken {
                diagnostics
                    .report(DiagnosticKind::DependsOnInvalidType, module, module.clone())
                    .message(model.decl_path(import.decl))
                    .emit();
                failed.insert(module.clone());
                changed = true;
            }
        }
        if !changed {
            return failed;
        }
    }
}
