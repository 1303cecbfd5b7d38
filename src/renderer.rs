//! Template rendering for forgekit.
//! Templates are loaded by name from a template directory and rendered with a
//! JSON context using MiniJinja.
use crate::error::{Error, Result};
use log::debug;
use minijinja::{path_loader, Environment, UndefinedBehavior};
use std::io;
use std::path::Path;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Loads `template_file` from `template_dir` and renders it with the given context.
    ///
    /// # Arguments
    /// * `template_dir` - Directory the template is looked up in
    /// * `template_file` - Template file name, relative to `template_dir`
    /// * `context` - Context variables for rendering
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    ///
    /// # Errors
    /// * `Error::TemplateNotFound` if the file is not in `template_dir`
    /// * `Error::RenderError` if the template is invalid or the context does not fit it
    fn render(
        &self,
        template_dir: &Path,
        template_file: &str,
        context: &serde_json::Value,
    ) -> Result<String>;
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance, cloned for every template directory
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a new MiniJinjaRenderer.
    ///
    /// Block tags do not leave blank lines behind, trailing newlines are kept
    /// and undefined variables are errors.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(
        &self,
        template_dir: &Path,
        template_file: &str,
        context: &serde_json::Value,
    ) -> Result<String> {
        let template_path = template_dir.join(template_file);
        debug!("Template file: '{}'.", template_path.display());
        // Read directly: `path_loader` refuses names such as `.env.j2`.
        let source = std::fs::read_to_string(&template_path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::TemplateNotFound { path: template_path },
            _ => Error::IoError(e),
        })?;

        debug!("Creating template loader for dir: '{}'.", template_dir.display());
        let mut env = self.env.clone();
        env.set_loader(path_loader(template_dir.to_path_buf()));
        env.add_template_owned(template_file.to_string(), source)?;

        let tmpl = env.get_template(template_file)?;
        tmpl.render(context).map_err(Error::RenderError)
    }
}
