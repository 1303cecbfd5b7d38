//! forgekit generates the files of a dockerized Minecraft Forge server.
//! Server data is rendered into `.env`, `whitelist.json` and
//! `docker-compose.yml` templates and written into one directory per server.

/// Renderable server files and their kinds
pub mod artifact;

/// Command-line interface module for forgekit
pub mod cli;

/// Server definition handling
/// Supports JSON and YAML formats (server.json, server.yml, server.yaml)
pub mod config;

/// Common constants
pub mod constants;

/// Error types and handling for forgekit
pub mod error;

/// Filesystem access
pub mod fs;

/// Logger setup for the binary
pub mod logger;

/// Output and template path construction
pub mod paths;

/// Data rendered into server templates
pub mod payload;

/// Template rendering through MiniJinja
pub mod renderer;

/// Generation of a complete server directory
pub mod server;
