use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod evaluate;
pub mod validate;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Application {
    #[command(subcommand)]
    pub command: SubCommands,
}

#[derive(Subcommand)]
pub enum SubCommands {
    /// Validate the configured targets and print the relation data that would
    /// be published to Parca.
    Evaluate(evaluate::Arguments),

    /// Check whether the given addresses are valid scrape targets.
    Validate(validate::Arguments),
}

pub fn handle_command(app: Application) -> Result<()> {
    match app.command {
        SubCommands::Evaluate(args) => evaluate::handle_command(args),
        SubCommands::Validate(args) => validate::handle_command(args),
    }
}
