//! Run command - start the shell

use anyhow::{Context, Result};
use clap::Args;
use felt_core::Shell;

use crate::headless::HeadlessApplication;

/// Run arguments
#[derive(Args)]
pub struct RunArgs {}

/// Start the shell and block until the host exits
pub fn run(_args: RunArgs) -> Result<()> {
    let mut shell = Shell::from_env();
    tracing::info!(root = %shell.root().path().display(), "Starting shell");

    shell
        .run::<HeadlessApplication>()
        .with_context(|| format!("felt failed to start from {}", shell.root().path().display()))
}
