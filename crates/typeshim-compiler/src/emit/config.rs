//! Configuration for declaration and shim emission.

use serde::Deserialize;
use typeshim_core::Colors;

/// Module system used by the emitted shim.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
    /// `import * as M from '...'` / `export const`
    #[default]
    Es6,
    /// `require('...')` / `exports.x = x`
    CommonJs,
}

impl ModuleFormat {
    fn default_curry_module(self) -> &'static str {
        match self {
            ModuleFormat::Es6 => "rescript/lib/es6/curry.js",
            ModuleFormat::CommonJs => "rescript/lib/js/curry.js",
        }
    }
}

/// The optional `"config"` section of an input document.
///
/// Every key is optional; absent keys keep the `Config` defaults.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigSection {
    pub module_format: Option<ModuleFormat>,
    pub origin_suffix: Option<String>,
    pub curry_module: Option<String>,
    pub react_module: Option<String>,
    pub component_type: Option<String>,
    pub header: Option<bool>,
}

/// Configuration for emission.
#[derive(Clone, Debug)]
pub struct Config {
    pub(crate) module_format: ModuleFormat,
    /// Suffix of the compiled origin module, relative to the generated file.
    pub(crate) origin_suffix: String,
    /// Override for the currying runtime import path
    pub(crate) curry_module: Option<String>,
    pub(crate) react_module: String,
    /// Host type constructor wrapped around component props
    pub(crate) component_type: String,
    /// Emit the "generated file" banner
    pub(crate) header: bool,
    /// Color configuration for declaration output
    pub(crate) colors: Colors,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            module_format: ModuleFormat::default(),
            origin_suffix: ".bs".to_string(),
            curry_module: None,
            react_module: "react".to_string(),
            component_type: "React.FC".to_string(),
            header: true,
            colors: Colors::OFF,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn module_format(mut self, value: ModuleFormat) -> Self {
        self.module_format = value;
        self
    }

    pub fn origin_suffix(mut self, value: impl Into<String>) -> Self {
        self.origin_suffix = value.into();
        self
    }

    pub fn curry_module(mut self, value: impl Into<String>) -> Self {
        self.curry_module = Some(value.into());
        self
    }

    pub fn react_module(mut self, value: impl Into<String>) -> Self {
        self.react_module = value.into();
        self
    }

    pub fn component_type(mut self, value: impl Into<String>) -> Self {
        self.component_type = value.into();
        self
    }

    pub fn header(mut self, value: bool) -> Self {
        self.header = value;
        self
    }

    /// Set whether declaration output is colored. Shim output never is.
    pub fn colored(mut self, enabled: bool) -> Self {
        self.colors = Colors::new(enabled);
        self
    }

    /// Overlay the document's `"config"` section onto this configuration.
    pub fn apply(mut self, section: &ConfigSection) -> Self {
        if let Some(format) = section.module_format {
            self.module_format = format;
        }
        if let Some(suffix) = &section.origin_suffix {
            self.origin_suffix = suffix.clone();
        }
        if let Some(curry) = &section.curry_module {
            self.curry_module = Some(curry.clone());
        }
        if let Some(react) = &section.react_module {
            self.react_module = react.clone();
        }
        if let Some(component) = &section.component_type {
            self.component_type = component.clone();
        }
        if let Some(header) = section.header {
            self.header = header;
        }
        self
    }

    pub fn format(&self) -> ModuleFormat {
        self.module_format
    }

    pub fn curry_import(&self) -> &str {
        self.curry_module
            .as_deref()
            .unwrap_or_else(|| self.module_format.default_curry_module())
    }
}
