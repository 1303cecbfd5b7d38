//! Data rendered into server templates.
//!
//! Payloads are plain serde types built by the caller (usually deserialized
//! from a server definition) and never modified while rendering.

use crate::constants::DEFAULT_COMPOSE_VERSION;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{12}$")
        .expect("valid UUID pattern")
});
static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid slug pattern"));

/// Converts a payload into the value templates see.
pub trait Payload {
    fn to_context(&self) -> Result<serde_json::Value>;
}

/// A player entry of `whitelist.json`: `{"id": <uuid>, "name": <username>}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhitelistPlayer {
    /// UUID of the Minecraft account
    #[serde(default)]
    pub id: Option<String>,
    /// Minecraft username, must match `id` on Minecraft's servers
    #[serde(default)]
    pub name: Option<String>,
}

impl WhitelistPlayer {
    pub fn new<S: Into<String>>(id: S, name: S) -> Self {
        Self { id: Some(id.into()), name: Some(name.into()) }
    }

    /// Checks that `id`, when present, is UUID-shaped.
    pub fn validate(&self) -> Result<()> {
        let Some(id) = &self.id else {
            return Ok(());
        };
        if UUID_RE.is_match(id) {
            Ok(())
        } else {
            Err(Error::ValidationError(format!("player id '{id}' is not a UUID")))
        }
    }
}

/// Ordered list of whitelisted players. Order is kept in the rendered file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WhitelistPayload(pub Vec<WhitelistPlayer>);

impl WhitelistPayload {
    pub fn new(players: Vec<WhitelistPlayer>) -> Self {
        Self(players)
    }

    pub fn players(&self) -> &[WhitelistPlayer] {
        &self.0
    }

    pub fn validate(&self) -> Result<()> {
        self.0.iter().try_for_each(WhitelistPlayer::validate)
    }
}

impl From<Vec<WhitelistPlayer>> for WhitelistPayload {
    fn from(players: Vec<WhitelistPlayer>) -> Self {
        Self(players)
    }
}

impl Payload for WhitelistPayload {
    fn to_context(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Settings written to the server's `.env` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvPayload {
    pub image_tag: String,
    pub container_name: String,
    pub server_port: u16,
    pub server_type: String,
    pub server_ver: String,
    pub server_debug: bool,
    pub whitelist_enable: bool,
    pub mods_dir: String,
    pub whitelist_file: String,
    pub whitelist_override: bool,
    /// Comma separated Modrinth project slugs, e.g. `"jei, journeymap"`
    pub modrinth_project_slugs: String,
    /// Additional `KEY=VALUE` lines, rendered in insertion order
    pub extra: IndexMap<String, String>,
}

impl EnvPayload {
    /// The slug list joined by bare commas: `"a, b, c"` becomes `"a,b,c"`.
    pub fn project_slugs(&self) -> String {
        self.modrinth_project_slugs
            .split(',')
            .map(str::trim)
            .filter(|slug| !slug.is_empty())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Checks that every slug is a single token, every extra key is a usable
    /// variable name and no value spans more than one `.env` line.
    pub fn validate(&self) -> Result<()> {
        let project_slugs = self.project_slugs();
        if let Some(slug) = project_slugs.split(',').find(|s| !s.is_empty() && !SLUG_RE.is_match(s))
        {
            return Err(Error::ValidationError(format!("invalid modrinth project slug '{slug}'")));
        }
        if let Some(key) =
            self.extra.keys().find(|k| k.is_empty() || k.contains(['=', '\n', '\r']))
        {
            return Err(Error::ValidationError(format!("invalid environment key '{key}'")));
        }

        let fields = [
            ("image_tag", &self.image_tag),
            ("container_name", &self.container_name),
            ("server_type", &self.server_type),
            ("server_ver", &self.server_ver),
            ("mods_dir", &self.mods_dir),
            ("whitelist_file", &self.whitelist_file),
            ("modrinth_project_slugs", &self.modrinth_project_slugs),
        ];
        let values = fields.into_iter().chain(self.extra.iter().map(|(k, v)| (k.as_str(), v)));
        for (field, value) in values {
            if value.contains(['\n', '\r']) {
                return Err(Error::ValidationError(format!(
                    "value of '{field}' contains a line break"
                )));
            }
        }
        Ok(())
    }
}

impl Payload for EnvPayload {
    fn to_context(&self) -> Result<serde_json::Value> {
        let mut value = serde_json::to_value(self)?;
        if let Some(obj) = value.as_object_mut() {
            obj.insert("project_slugs".to_string(), self.project_slugs().into());
        }
        Ok(value)
    }
}

/// Compose file metadata. Everything else in the compose file comes from the
/// template itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeMetadata {
    pub compose_ver: String,
}

impl Default for ComposeMetadata {
    fn default() -> Self {
        Self { compose_ver: DEFAULT_COMPOSE_VERSION.to_string() }
    }
}

impl Payload for ComposeMetadata {
    fn to_context(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_slugs() {
        let env = EnvPayload { modrinth_project_slugs: "a, b, c".to_string(), ..Default::default() };
        assert_eq!(env.project_slugs(), "a,b,c");

        let env = EnvPayload { modrinth_project_slugs: "jei,  create ,".to_string(), ..Default::default() };
        assert_eq!(env.project_slugs(), "jei,create");

        assert_eq!(EnvPayload::default().project_slugs(), "");
    }

    #[test]
    fn test_env_context_contains_project_slugs() {
        let env = EnvPayload { modrinth_project_slugs: "a, b".to_string(), ..Default::default() };
        let context = env.to_context().unwrap();
        assert_eq!(context["project_slugs"], "a,b");
        assert_eq!(context["modrinth_project_slugs"], "a, b");
    }

    #[test]
    fn test_env_validate() {
        let env = EnvPayload { modrinth_project_slugs: "jei, journeymap".to_string(), ..Default::default() };
        assert!(env.validate().is_ok());

        let env = EnvPayload { modrinth_project_slugs: "jei, bad slug".to_string(), ..Default::default() };
        assert!(env.validate().is_err());

        let mut env = EnvPayload::default();
        env.extra.insert("BAD=KEY".to_string(), "1".to_string());
        assert!(env.validate().is_err());
    }

    #[test]
    fn test_env_validate_rejects_line_breaks() {
        let env = EnvPayload {
            container_name: "mc\nMC_SERVER_PORT=1".to_string(),
            ..Default::default()
        };
        assert!(matches!(env.validate(), Err(Error::ValidationError(_))));

        let env = EnvPayload { server_ver: "1.20.1\r".to_string(), ..Default::default() };
        assert!(env.validate().is_err());

        let mut env = EnvPayload::default();
        env.extra.insert("K".to_string(), "v\nEVIL=1".to_string());
        assert!(env.validate().is_err());

        let mut env = EnvPayload::default();
        env.extra.insert("K".to_string(), "v".to_string());
        assert!(env.validate().is_ok());
    }

    #[test]
    fn test_player_validate() {
        assert!(WhitelistPlayer::new("069a79f4-44e9-4726-a5be-fca90e38aaf5", "Notch").validate().is_ok());
        assert!(WhitelistPlayer::new("069a79f444e94726a5befca90e38aaf5", "Notch").validate().is_ok());
        assert!(WhitelistPlayer::new("not-a-uuid", "Notch").validate().is_err());
        assert!(WhitelistPlayer::default().validate().is_ok());
    }

    #[test]
    fn test_whitelist_deserializes_from_array() {
        let payload: WhitelistPayload =
            serde_json::from_str(r#"[{"id": "u1", "name": "p1"}, {"name": "p2"}]"#).unwrap();
        assert_eq!(payload.players().len(), 2);
        assert_eq!(payload.players()[1].id, None);
    }
}
