use anyhow::{anyhow, Result};
use clap::Subcommand;
use neverlost_core::editor::create_layout;
use neverlost_core::error::{DELETE_FAILED, LIST_FAILED, LOAD_FAILED};
use neverlost_core::gateway::LayoutGateway;
use neverlost_core::layout::LayoutId;
use neverlost_core::session::SessionContext;

use super::report;

#[derive(Subcommand, Debug)]
pub enum LayoutsCommand {
    /// List your layouts
    List,
    /// Create a layout holding one default cube
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Print a layout's objects
    Show {
        layout_id: String,
        /// Print the raw JSON instead of one line per object
        #[arg(long)]
        json: bool,
    },
    /// Delete a layout
    Delete { layout_id: String },
}

pub async fn run(gateway: &impl LayoutGateway, session: &SessionContext, command: LayoutsCommand) -> Result<()> {
    match command {
        LayoutsCommand::List => {
            let layouts = gateway
                .list_layouts(session.token())
                .await
                .map_err(|e| anyhow!(e.user_message(LIST_FAILED)))?;
            if layouts.is_empty() {
                println!("No layouts yet");
            }
            for layout in layouts {
                println!("{}  {}  {}", layout.id, layout.name, layout.description);
            }
        }
        LayoutsCommand::Create { name, description } => {
            match create_layout(gateway, session, &name, &description).await {
                Ok(id) => println!("Created layout {}", id),
                Err(status) => report(Some(&status))?,
            }
        }
        LayoutsCommand::Show { layout_id, json } => {
            let layout = gateway
                .load_layout(&LayoutId::from(layout_id), session.token())
                .await
                .map_err(|e| anyhow!(e.user_message(LOAD_FAILED)))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&layout)?);
            } else {
                if !layout.name.is_empty() {
                    println!("{}: {}", layout.name, layout.description);
                }
                for object in &layout.objects {
                    println!(
                        "{}  pos {:?}  rot {:?}  scale {:?}  size {:?}  {}",
                        object.label(),
                        object.position,
                        object.rotation,
                        object.scale,
                        object.size,
                        object.color
                    );
                }
            }
        }
        LayoutsCommand::Delete { layout_id } => {
            let id = LayoutId::from(layout_id);
            gateway
                .delete_layout(&id, session.token())
                .await
                .map_err(|e| anyhow!(e.user_message(DELETE_FAILED)))?;
            println!("Deleted layout {}", id);
        }
    }
    Ok(())
}
