//! Generation of a complete dockerized Minecraft Forge server.
//!
//! A [`ServerBundle`] owns the `.env`, `whitelist.json` and
//! `docker-compose.yml` artifacts of one server and writes them into
//! `<base_output_path>/<name>`. An existing server directory is never touched
//! again: creating the same server twice is a no-op.

use crate::artifact::{
    ArtifactKind, ComposeArtifact, EnvArtifact, RenderOutcome, ScriptArtifact, WhitelistArtifact,
};
use crate::constants::DEFAULT_SUBDIRECTORIES;
use crate::error::{Error, Result};
use crate::fs::FileSystem;
use crate::paths::{collapse_separators, normalize_directory, output_file_path};
use crate::payload::{ComposeMetadata, EnvPayload, Payload, WhitelistPayload};
use crate::renderer::TemplateRenderer;
use log::{debug, error, info, warn};
use serde::Serialize;
use std::path::PathBuf;

/// What happens when one of the server's artifacts fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Render every artifact and report the failed ones.
    #[default]
    CollectAll,
    /// Stop at the first failed artifact and return an error.
    AllOrNothing,
}

/// Progress of [`ServerBundle::create_server`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleState {
    Uncreated,
    DirectoriesReady,
    EnvDone,
    WhitelistDone,
    Complete,
    /// Every artifact was attempted, the listed ones failed.
    Partial { failed: Vec<String> },
    Aborted(String),
    SkippedAlreadyExists,
}

/// Per-artifact outcomes of a server creation, in render order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReport {
    pub output_dir: PathBuf,
    pub outcomes: Vec<RenderOutcome>,
}

impl CreateReport {
    /// True when every artifact was written.
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &RenderOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.success)
    }
}

/// Result of [`ServerBundle::create_server`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateStatus {
    Created(CreateReport),
    /// The server directory already existed, nothing was written. `missing`
    /// lists artifact files absent from it.
    Skipped { output_dir: PathBuf, missing: Vec<PathBuf> },
}

/// Read-only view of a server bundle, rendered by the recreate script.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerSnapshot {
    pub name: String,
    pub base_output_path: String,
    pub output_dir: String,
    pub subdirectories: Vec<String>,
    pub env_file: String,
    pub whitelist_file: String,
    pub compose_file: String,
    pub env: EnvPayload,
    pub whitelist_players: WhitelistPayload,
    pub compose: ComposeMetadata,
}

impl Payload for ServerSnapshot {
    fn to_context(&self) -> Result<serde_json::Value> {
        let mut value = serde_json::to_value(self)?;
        if let Some(obj) = value.as_object_mut() {
            obj.insert("env".to_string(), self.env.to_context()?);
        }
        Ok(value)
    }
}

/// The files of one dockerized Minecraft Forge server.
#[derive(Debug, Clone)]
pub struct ServerBundle {
    name: String,
    base_output_path: String,
    subdirectories: Vec<String>,
    env: EnvArtifact,
    whitelist: WhitelistArtifact,
    compose: ComposeArtifact,
    policy: FailurePolicy,
    state: BundleState,
}

impl ServerBundle {
    pub fn new(
        name: impl Into<String>,
        base_output_path: impl Into<String>,
        env: EnvArtifact,
        whitelist: WhitelistArtifact,
        compose: ComposeArtifact,
    ) -> Self {
        Self {
            name: name.into(),
            base_output_path: base_output_path.into(),
            subdirectories: DEFAULT_SUBDIRECTORIES.iter().map(|d| d.to_string()).collect(),
            env,
            whitelist,
            compose,
            policy: FailurePolicy::default(),
            state: BundleState::Uncreated,
        }
    }

    /// Replaces the subdirectories created inside the server directory.
    pub fn with_subdirectories(mut self, subdirectories: Vec<String>) -> Self {
        self.subdirectories = subdirectories;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_output_path(&self) -> &str {
        &self.base_output_path
    }

    pub fn subdirectories(&self) -> &[String] {
        &self.subdirectories
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn state(&self) -> &BundleState {
        &self.state
    }

    pub fn env(&self) -> &EnvArtifact {
        &self.env
    }

    pub fn whitelist(&self) -> &WhitelistArtifact {
        &self.whitelist
    }

    pub fn compose(&self) -> &ComposeArtifact {
        &self.compose
    }

    /// `base_output_path/name` with repeated and trailing separators removed.
    pub fn output_dir(&self) -> String {
        let joined = output_file_path(Some(&self.base_output_path), &self.name);
        normalize_directory(&collapse_separators(&joined.to_string_lossy()))
    }

    /// Paths of the three artifact files inside the server directory.
    pub fn expected_files(&self) -> Vec<PathBuf> {
        let output_dir = self.output_dir();
        [self.env.filename(), self.whitelist.filename(), self.compose.filename()]
            .iter()
            .map(|filename| output_file_path(Some(&output_dir), filename))
            .collect()
    }

    /// Artifact files absent from the server directory.
    pub fn missing_artifacts(&self, fs: &dyn FileSystem) -> Vec<PathBuf> {
        self.expected_files().into_iter().filter(|path| !fs.exists(path)).collect()
    }

    pub fn snapshot(&self) -> ServerSnapshot {
        ServerSnapshot {
            name: self.name.clone(),
            base_output_path: self.base_output_path.clone(),
            output_dir: self.output_dir(),
            subdirectories: self.subdirectories.clone(),
            env_file: self.env.filename(),
            whitelist_file: self.whitelist.filename(),
            compose_file: self.compose.filename(),
            env: self.env.payload().clone(),
            whitelist_players: self.whitelist.payload().clone(),
            compose: self.compose.payload().clone(),
        }
    }

    fn transition(&mut self, state: BundleState) {
        debug!("[{}] {:?} -> {:?}", self.name, self.state, state);
        self.state = state;
    }

    fn create_dir(&mut self, path: PathBuf, fs: &dyn FileSystem) -> Result<()> {
        if fs.exists(&path) {
            return Ok(());
        }
        fs.create_dir_all(&path).inspect_err(|e| {
            error!("[{}] {e}", self.name);
            self.transition(BundleState::Aborted(e.to_string()));
        })
    }

    fn record(
        &mut self,
        outcome: RenderOutcome,
        next: BundleState,
        report: &mut CreateReport,
    ) -> Result<()> {
        if !outcome.success && self.policy == FailurePolicy::AllOrNothing {
            error!("[{}] Aborting server creation, {} failed.", self.name, outcome.artifact);
            self.transition(BundleState::Aborted(outcome.reason.clone()));
            return Err(Error::ArtifactFailed { artifact: outcome.artifact, reason: outcome.reason });
        }
        report.outcomes.push(outcome);
        self.transition(next);
        Ok(())
    }

    /// Creates the server directory and renders `.env`, `whitelist.json` and
    /// `docker-compose.yml` into it, in that order.
    ///
    /// # Returns
    /// * `CreateStatus::Skipped` if the server directory already exists
    /// * `CreateStatus::Created` with one outcome per artifact otherwise
    ///
    /// # Errors
    /// * `Error::WriteError` if the server directories cannot be created
    /// * `Error::ArtifactFailed` if an artifact fails under `FailurePolicy::AllOrNothing`
    pub fn create_server(
        &mut self,
        engine: &dyn TemplateRenderer,
        fs: &dyn FileSystem,
    ) -> Result<CreateStatus> {
        let output_dir = self.output_dir();
        let output_path = PathBuf::from(&output_dir);

        if fs.exists(&output_path) {
            warn!(
                "Did not render Minecraft server template. Output directory already exists: '{output_dir}'."
            );
            let missing = self.missing_artifacts(fs);
            for path in &missing {
                debug!("[{}] Missing from existing server: '{}'.", self.name, path.display());
            }
            self.transition(BundleState::SkippedAlreadyExists);
            return Ok(CreateStatus::Skipped { output_dir: output_path, missing });
        }

        self.create_dir(output_path.clone(), fs)?;
        for subdirectory in self.subdirectories.clone() {
            self.create_dir(output_file_path(Some(&output_dir), &subdirectory), fs)?;
        }
        self.transition(BundleState::DirectoriesReady);

        self.env.set_output_directory(&output_dir);
        self.whitelist.set_output_directory(&output_dir);
        self.compose.set_output_directory(&output_dir);

        let mut report = CreateReport { output_dir: output_path, outcomes: Vec::new() };

        let outcome = self.env.render_to_file(engine, fs);
        self.record(outcome, BundleState::EnvDone, &mut report)?;
        let outcome = self.whitelist.render_to_file(engine, fs);
        self.record(outcome, BundleState::WhitelistDone, &mut report)?;
        let outcome = self.compose.render_to_file(engine, fs);
        self.record(outcome, BundleState::Complete, &mut report)?;

        if report.is_complete() {
            info!("[{}] Server created in '{output_dir}'.", self.name);
        } else {
            let failed: Vec<String> = report.failures().map(|o| o.artifact.clone()).collect();
            warn!("[{}] Server created with failed artifacts: {}.", self.name, failed.join(", "));
            self.transition(BundleState::Partial { failed });
        }

        Ok(CreateStatus::Created(report))
    }
}

impl ScriptArtifact {
    /// Script that tears down and recreates the containers of `server`,
    /// written into the server directory by default.
    pub fn recreate_server(templates_root: &str, server: &ServerBundle) -> Self {
        Self::new(&ArtifactKind::RECREATE_SCRIPT, templates_root, server.snapshot())
            .with_output_directory(&server.output_dir())
    }
}
