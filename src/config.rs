//! Server definition handling.
//! A server definition describes one server to generate: its name, the data
//! rendered into its files and the directories created next to them. JSON and
//! YAML formats are supported (server.json, server.yml, server.yaml).

use crate::artifact::{ComposeArtifact, EnvArtifact, WhitelistArtifact};
use crate::constants::{DEFAULT_SERVER_NAME, DEFAULT_SUBDIRECTORIES};
use crate::error::{Error, Result};
use crate::payload::{ComposeMetadata, EnvPayload, WhitelistPayload};
use crate::server::ServerBundle;
use log::debug;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::sync::LazyLock;

static SERVER_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("valid server name pattern"));

/// Contents of a server definition file. Every section is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerDefinition {
    pub name: String,
    pub subdirectories: Vec<String>,
    pub env: EnvPayload,
    pub whitelist: WhitelistPayload,
    pub compose: ComposeMetadata,
}

impl Default for ServerDefinition {
    fn default() -> Self {
        Self {
            name: DEFAULT_SERVER_NAME.to_string(),
            subdirectories: DEFAULT_SUBDIRECTORIES.iter().map(|d| d.to_string()).collect(),
            env: EnvPayload::default(),
            whitelist: WhitelistPayload::default(),
            compose: ComposeMetadata::default(),
        }
    }
}

impl ServerDefinition {
    /// Checks the basic shape of the definition.
    ///
    /// # Errors
    /// * `Error::ValidationError` if the server name or a subdirectory is not
    ///   a single path component, or a payload is malformed
    pub fn validate(&self) -> Result<()> {
        if !SERVER_NAME_RE.is_match(&self.name) || self.name == "." || self.name == ".." {
            return Err(Error::ValidationError(format!("invalid server name '{}'", self.name)));
        }
        if let Some(dir) = self
            .subdirectories
            .iter()
            .find(|d| d.is_empty() || d.split('/').any(|part| part == ".."))
        {
            return Err(Error::ValidationError(format!("invalid subdirectory '{dir}'")));
        }
        self.env.validate()?;
        self.whitelist.validate()
    }

    /// Builds the server bundle described by this definition.
    pub fn into_bundle(self, templates_root: &str, base_output_path: &str) -> ServerBundle {
        ServerBundle::new(
            self.name,
            base_output_path,
            EnvArtifact::env(templates_root, self.env),
            WhitelistArtifact::whitelist(templates_root, self.whitelist),
            ComposeArtifact::compose(templates_root, self.compose),
        )
        .with_subdirectories(self.subdirectories)
    }
}

/// Reads a server definition. `path` is either the definition file itself or
/// a directory containing one of `config_files`.
///
/// # Arguments
/// * `path` - Definition file or directory
/// * `config_files` - List of file names to try inside a directory
///
/// # Returns
/// * `Result<String>` - Contents of the definition file
///
/// # Errors
/// * `Error::ConfigError` if no definition file exists
pub fn load_config<P: AsRef<Path>>(path: P, config_files: &[&str]) -> Result<String> {
    let path = path.as_ref();
    if path.is_file() {
        debug!("Loading server definition from {}", path.display());
        return Ok(std::fs::read_to_string(path)?);
    }

    for file in config_files {
        let config_path = path.join(file);
        if config_path.exists() {
            debug!("Loading server definition from {}", config_path.display());
            return Ok(std::fs::read_to_string(&config_path)?);
        }
    }

    Err(Error::ConfigError(format!(
        "No server definition found at '{}' (tried: {})",
        path.display(),
        config_files.join(", ")
    )))
}

/// Parses a server definition, trying JSON first and YAML second.
///
/// # Errors
/// * `Error::ConfigError` if the content is neither valid JSON nor valid YAML
pub fn parse_config(content: &str) -> Result<ServerDefinition> {
    match serde_json::from_str(content) {
        Ok(definition) => Ok(definition),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid server definition: {e}"))),
    }
}

/// Loads, parses and validates the server definition at `path`.
pub fn get_config<P: AsRef<Path>>(path: P, config_files: &[&str]) -> Result<ServerDefinition> {
    let content = load_config(path, config_files)?;
    let definition = parse_config(&content)?;
    definition.validate()?;
    Ok(definition)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json() {
        let definition = parse_config(
            r#"{
                "name": "modded",
                "env": {"server_port": 25565, "modrinth_project_slugs": "jei, journeymap"},
                "whitelist": [{"id": "069a79f4-44e9-4726-a5be-fca90e38aaf5", "name": "Notch"}]
            }"#,
        )
        .unwrap();

        assert_eq!(definition.name, "modded");
        assert_eq!(definition.env.server_port, 25565);
        assert_eq!(definition.whitelist.players().len(), 1);
        assert_eq!(definition.subdirectories, vec!["data".to_string()]);
        assert_eq!(definition.compose.compose_ver, "3.8");
    }

    #[test]
    fn test_parse_yaml() {
        let definition = parse_config(
            "name: yaml_server\nsubdirectories: [data, mods]\ncompose:\n  compose_ver: \"3.9\"\n",
        )
        .unwrap();

        assert_eq!(definition.name, "yaml_server");
        assert_eq!(definition.subdirectories, vec!["data".to_string(), "mods".to_string()]);
        assert_eq!(definition.compose.compose_ver, "3.9");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(parse_config("name: [unclosed"), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_validate() {
        assert!(ServerDefinition::default().validate().is_ok());

        let definition = ServerDefinition { name: "../escape".to_string(), ..Default::default() };
        assert!(definition.validate().is_err());

        let definition = ServerDefinition { name: "..".to_string(), ..Default::default() };
        assert!(definition.validate().is_err());

        let definition =
            ServerDefinition { subdirectories: vec!["data/../..".to_string()], ..Default::default() };
        assert!(definition.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_multiline_env_values() {
        let definition = parse_config(
            r#"{"env": {"container_name": "mc\nMC_SERVER_PORT=1", "extra": {"K": "v\nEVIL=1"}}}"#,
        )
        .unwrap();
        assert!(matches!(definition.validate(), Err(Error::ValidationError(_))));

        let definition = parse_config(r#"{"env": {"extra": {"K": "v\nEVIL=1"}}}"#).unwrap();
        assert!(matches!(definition.validate(), Err(Error::ValidationError(_))));
    }

    #[test]
    fn test_get_config_from_directory() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("server.yml"), "name: from_dir\n").unwrap();

        let definition = get_config(temp_dir.path(), &crate::constants::CONFIG_FILES).unwrap();
        assert_eq!(definition.name, "from_dir");

        let definition =
            get_config(temp_dir.path().join("server.yml"), &crate::constants::CONFIG_FILES).unwrap();
        assert_eq!(definition.name, "from_dir");

        let empty = tempfile::TempDir::new().unwrap();
        assert!(matches!(
            get_config(empty.path(), &crate::constants::CONFIG_FILES),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_into_bundle() {
        let server = ServerDefinition::default().into_bundle("templates", "output/minecraft");
        assert_eq!(server.output_dir(), "output/minecraft/example_forge_server");
        assert_eq!(server.subdirectories(), ["data".to_string()]);
    }
}
