//! Handlebars template compilation
//!
//! Each source file is parsed exactly once into a [`CompiledTemplate`]. Rendering
//! only walks the already-parsed template, so render cost never includes
//! compile cost.

use handlebars::Handlebars;

use super::types::{Render, TemplateError, TemplateResult};

/// Compiles template sources with a fixed set of engine options
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateCompiler {
    strict: bool,
}

impl TemplateCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Missing variables become render errors instead of empty strings
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Parse `source` into a reusable renderer named `name`
    pub fn compile(&self, name: &str, source: &str) -> TemplateResult<CompiledTemplate> {
        let mut engine = Handlebars::new();
        engine.set_strict_mode(self.strict);

        engine
            .register_template_string(name, source)
            .map_err(|e| TemplateError::Compile {
                name: name.to_string(),
                source: Box::new(e),
            })?;

        Ok(CompiledTemplate {
            name: name.to_string(),
            engine,
        })
    }
}

/// A parsed Handlebars template, immutable after compilation
pub struct CompiledTemplate {
    name: String,
    engine: Handlebars<'static>,
}

impl CompiledTemplate {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Render for CompiledTemplate {
    fn render(&self, vars: &serde_json::Value) -> TemplateResult<String> {
        self.engine
            .render(&self.name, vars)
            .map_err(|e| TemplateError::Render {
                key: self.name.clone(),
                message: e.to_string(),
            })
    }
}
