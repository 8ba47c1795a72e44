use anyhow::Result;
use clap::{Parser, Subcommand};
use neverlost_core::gateway::HttpGateway;
use neverlost_core::session::{FileSessionStorage, SessionContext};

mod commands;
mod config;

use config::AppConfig;

/// NeverLost layout editor
#[derive(Parser, Debug)]
#[command(name = "neverlost")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the layout service
    #[arg(long, env = "NEVERLOST_API_URL", global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and log in
    Register {
        username: String,
        email: String,
        password: String,
        /// Password confirmation
        confirm_password: String,
    },

    /// Log in and remember the session
    Login { email: String, password: String },

    /// Forget the stored session
    Logout,

    /// Show who is logged in
    Whoami,

    /// List, create, show or delete layouts
    Layouts {
        #[command(subcommand)]
        command: commands::layouts::LayoutsCommand,
    },

    /// Load a layout, apply one edit and save it
    Edit {
        layout_id: String,
        #[command(subcommand)]
        edit: commands::edit::EditCommand,
    },

    /// Show or change the persistent configuration
    Config {
        #[command(subcommand)]
        command: commands::ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = AppConfig::load();
    let api_url = config.resolve_api_url(args.api_url.as_deref());
    log::debug!("Using layout service at {}", api_url);

    let gateway = HttpGateway::new(api_url);
    let mut session = match FileSessionStorage::default_location() {
        Ok(storage) => SessionContext::hydrate(storage),
        Err(e) => {
            log::warn!("Session will not be remembered: {}", e);
            SessionContext::ephemeral()
        }
    };

    match args.command {
        Command::Register {
            username,
            email,
            password,
            confirm_password,
        } => {
            commands::auth::register(&gateway, &mut session, username, email, password, confirm_password)
                .await
        }
        Command::Login { email, password } => commands::auth::login(&gateway, &mut session, &email, &password).await,
        Command::Logout => commands::auth::logout(&mut session),
        Command::Whoami => commands::auth::whoami(&session),
        Command::Layouts { command } => commands::layouts::run(&gateway, &session, command).await,
        Command::Edit { layout_id, edit } => commands::edit::run(gateway, &session, layout_id.into(), edit).await,
        Command::Config { command } => commands::config(&mut config, command),
    }
}
