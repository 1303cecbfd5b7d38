//! forgekit's main application entry point.
//! Handles command-line argument parsing and drives the generation of one
//! Minecraft Forge server.

use forgekit::{
    cli::{get_args, run},
    error::default_error_handler,
    logger::init_logger,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}
