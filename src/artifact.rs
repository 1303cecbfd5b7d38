//! Renderable server files.
//!
//! Every generated file is an [`Artifact`]: a payload, the template it is
//! rendered with and the directory it is written to. The kinds of files only
//! differ by the [`ArtifactKind`] record they are created from.

use crate::constants::{context_keys, template_dirs};
use crate::error::{Error, Result};
use crate::fs::FileSystem;
use crate::payload::{ComposeMetadata, EnvPayload, Payload, WhitelistPayload};
use crate::paths::{
    artifact_filename, normalize_directory, output_file_path, resolve_output_file,
    resolve_template_path,
};
use crate::renderer::TemplateRenderer;
use crate::server::ServerSnapshot;
use log::{debug, error, info};
use std::path::{Path, PathBuf};

/// Defaults describing one kind of generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactKind {
    /// File stem
    pub name: &'static str,
    /// File extension, `None` for bare file names such as `.env`
    pub extension: Option<&'static str>,
    /// Template directory, relative to the templates root
    pub template_subdir: &'static str,
    pub template_file: &'static str,
    /// Key the payload is bound to. `None` places the payload fields at the
    /// context root.
    pub context_key: Option<&'static str>,
}

impl ArtifactKind {
    pub const WHITELIST: Self = Self {
        name: "whitelist",
        extension: Some("json"),
        template_subdir: template_dirs::JSON,
        template_file: "template_server_whitelist.j2",
        context_key: Some(context_keys::WHITELIST_PLAYERS),
    };

    pub const ENV: Self = Self {
        name: ".env",
        extension: None,
        template_subdir: template_dirs::DOTENV,
        template_file: "template_compose_forge_mod_dotenv.j2",
        context_key: Some(context_keys::ENV_DATA),
    };

    pub const COMPOSE: Self = Self {
        name: "docker-compose",
        extension: Some("yml"),
        template_subdir: template_dirs::FORGE_SERVER,
        template_file: "template_docker-compose.j2",
        context_key: None,
    };

    pub const RECREATE_SCRIPT: Self = Self {
        name: "recreate_server",
        extension: Some("sh"),
        template_subdir: template_dirs::SCRIPTS,
        template_file: "template_recreate_server_sh.j2",
        context_key: Some(context_keys::SERVER),
    };
}

/// Result of writing one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    /// File name of the artifact
    pub artifact: String,
    pub success: bool,
    /// Human readable description naming the output path
    pub reason: String,
    /// Path written to, `None` if nothing was written
    pub output_file: Option<PathBuf>,
}

/// A file rendered from a template and a payload.
#[derive(Debug, Clone)]
pub struct Artifact<P> {
    name: String,
    extension: Option<String>,
    output_directory: Option<String>,
    template_directory: String,
    template_file: String,
    context_key: Option<&'static str>,
    payload: P,
}

pub type WhitelistArtifact = Artifact<WhitelistPayload>;
pub type EnvArtifact = Artifact<EnvPayload>;
pub type ComposeArtifact = Artifact<ComposeMetadata>;
pub type ScriptArtifact = Artifact<ServerSnapshot>;

impl<P: Payload> Artifact<P> {
    /// Creates an artifact with the defaults of `kind`, looking its template
    /// up below `templates_root`.
    pub fn new(kind: &ArtifactKind, templates_root: &str, payload: P) -> Self {
        let template_directory = if templates_root.is_empty() {
            kind.template_subdir.to_string()
        } else {
            format!("{templates_root}/{}", kind.template_subdir)
        };
        Self {
            name: kind.name.to_string(),
            extension: kind.extension.map(str::to_string),
            output_directory: None,
            template_directory,
            template_file: kind.template_file.to_string(),
            context_key: kind.context_key,
            payload,
        }
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_extension(mut self, extension: Option<&str>) -> Self {
        self.extension = extension.map(str::to_string);
        self
    }

    /// Replaces the template location.
    pub fn with_template<S: Into<String>>(mut self, template_directory: S, template_file: S) -> Self {
        self.template_directory = template_directory.into();
        self.template_file = template_file.into();
        self
    }

    pub fn with_output_directory(mut self, output_directory: &str) -> Self {
        self.set_output_directory(output_directory);
        self
    }

    /// Sets the directory the artifact is written to. Trailing and repeated
    /// separators are dropped; an empty directory means the working directory.
    pub fn set_output_directory(&mut self, output_directory: &str) {
        let normalized = normalize_directory(output_directory);
        self.output_directory = if normalized.is_empty() { None } else { Some(normalized) };
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn output_directory(&self) -> Option<&str> {
        self.output_directory.as_deref()
    }

    pub fn filename(&self) -> String {
        artifact_filename(&self.name, self.extension.as_deref())
    }

    pub fn template_path(&self) -> PathBuf {
        resolve_template_path(&self.template_directory, &self.template_file)
    }

    /// Path the artifact will be written to, computed without side effects.
    pub fn output_file(&self) -> PathBuf {
        output_file_path(self.output_directory(), &self.filename())
    }

    /// Context handed to the template engine.
    pub fn context(&self) -> Result<serde_json::Value> {
        let payload = self.payload.to_context()?;
        Ok(match self.context_key {
            Some(key) => {
                let mut context = serde_json::Map::new();
                context.insert(key.to_string(), payload);
                serde_json::Value::Object(context)
            }
            None => payload,
        })
    }

    /// Renders the artifact's template with its payload.
    ///
    /// # Errors
    /// * `Error::TemplateNotFound` if the template file does not exist
    /// * `Error::RenderError` if the engine rejects the template or context
    pub fn render(&self, engine: &dyn TemplateRenderer, fs: &dyn FileSystem) -> Result<String> {
        let template_path = self.template_path();
        debug!("[{}] Template path: '{}'.", self.name, template_path.display());
        if !fs.exists(&template_path) {
            return Err(Error::TemplateNotFound { path: template_path });
        }

        let context = self.context()?;
        engine.render(Path::new(&self.template_directory), &self.template_file, &context)
    }

    /// Renders the artifact and writes it, truncating an existing file.
    ///
    /// # Returns
    /// * `Result<PathBuf>` - The path written to
    pub fn try_render_to_file(
        &self,
        engine: &dyn TemplateRenderer,
        fs: &dyn FileSystem,
    ) -> Result<PathBuf> {
        let content = self.render(engine, fs)?;
        let output_file = resolve_output_file(fs, self.output_directory(), &self.filename())?;
        fs.write_file(&output_file, &content)?;
        Ok(output_file)
    }

    /// Renders the artifact and writes it, reporting the outcome instead of
    /// returning an error.
    pub fn render_to_file(
        &self,
        engine: &dyn TemplateRenderer,
        fs: &dyn FileSystem,
    ) -> RenderOutcome {
        let artifact = self.filename();
        let outcome = match self.try_render_to_file(engine, fs) {
            Ok(output_file) => RenderOutcome {
                reason: format!(
                    "Successfully rendered template to: '{}'",
                    output_file.display()
                ),
                artifact,
                success: true,
                output_file: Some(output_file),
            },
            Err(e) => RenderOutcome {
                reason: format!(
                    "Failed to render template to: '{}'. {e}",
                    self.output_file().display()
                ),
                artifact,
                success: false,
                output_file: None,
            },
        };

        if outcome.success {
            info!("[{}] {}", outcome.artifact, outcome.reason);
        } else {
            error!("[{}] {}", outcome.artifact, outcome.reason);
        }
        outcome
    }
}

impl WhitelistArtifact {
    pub fn whitelist(templates_root: &str, players: WhitelistPayload) -> Self {
        Self::new(&ArtifactKind::WHITELIST, templates_root, players)
    }
}

impl EnvArtifact {
    pub fn env(templates_root: &str, env_data: EnvPayload) -> Self {
        Self::new(&ArtifactKind::ENV, templates_root, env_data)
    }
}

impl ComposeArtifact {
    pub fn compose(templates_root: &str, metadata: ComposeMetadata) -> Self {
        Self::new(&ArtifactKind::COMPOSE, templates_root, metadata)
    }
}
