use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shared::theme::Theme;

#[derive(Parser, Debug)]
struct Cli {
    /// TOML theme file; the built-in theme is used when omitted.
    #[arg(long, global = true)]
    theme: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print `@keyframes` blocks and `.animate-*` classes.
    Css,
    /// Print the theme as a framework `theme.extend` config object.
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let theme = match &cli.theme {
        Some(path) => load_theme(path)?,
        None => Theme::default(),
    };

    match cli.command {
        Command::Css => print!("{}", theme.render_css()?),
        Command::Json => {
            theme.validate()?;
            println!(
                "{}",
                serde_json::to_string_pretty(&theme.to_framework_config())?
            );
        }
    }

    Ok(())
}

fn load_theme(path: &Path) -> Result<Theme> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read theme {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("invalid theme file {}", path.display()))
}
