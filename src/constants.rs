//! Common constants used throughout forgekit.

/// Supported server definition file names
pub const CONFIG_FILES: [&str; 3] = ["server.json", "server.yml", "server.yaml"];

/// Server name used when the definition does not provide one
pub const DEFAULT_SERVER_NAME: &str = "example_forge_server";

/// Subdirectories created inside every generated server directory
pub const DEFAULT_SUBDIRECTORIES: [&str; 1] = ["data"];

/// Compose file format version rendered when none is configured
pub const DEFAULT_COMPOSE_VERSION: &str = "3.8";

/// Directory under the output root holding generated Minecraft servers
pub const MINECRAFT_OUTPUT_SUBDIR: &str = "minecraft";

/// Template subdirectories, relative to the templates root
pub mod template_dirs {
    pub const JSON: &str = "minecraft/json";
    pub const DOTENV: &str = "minecraft/dotenv";
    pub const SCRIPTS: &str = "minecraft/scripts";
    pub const FORGE_SERVER: &str = "minecraft/server_containers/forge_server";
}

/// Keys under which payloads are exposed to templates
pub mod context_keys {
    pub const WHITELIST_PLAYERS: &str = "whitelist_players";
    pub const ENV_DATA: &str = "env_data";
    pub const SERVER: &str = "server";
}
