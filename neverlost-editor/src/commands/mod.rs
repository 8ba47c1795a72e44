pub mod auth;
pub mod edit;
pub mod layouts;

use crate::config::AppConfig;
use anyhow::{anyhow, Result};
use clap::Subcommand;
use neverlost_core::editor::StatusMessage;

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the configuration and where it lives
    Show,
    /// Remember the layout service URL
    SetApiUrl { url: String },
}

pub fn config(config: &mut AppConfig, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            if let Ok(path) = AppConfig::config_path() {
                println!("# {}", path.display());
            }
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        ConfigCommand::SetApiUrl { url } => {
            config.set_api_url(url);
            let path = config.save().map_err(|e| anyhow!("Failed to save config: {}", e))?;
            println!("Saved {}", path.display());
        }
    }
    Ok(())
}

/// Print an info status, turn an error status into the command's failure
pub(crate) fn report(status: Option<&StatusMessage>) -> Result<()> {
    match status {
        Some(StatusMessage::Info(text)) => {
            println!("{}", text);
            Ok(())
        }
        Some(StatusMessage::Error(text)) => Err(anyhow!("{}", text)),
        None => Ok(()),
    }
}
