use anyhow::{anyhow, bail, Result};
use clap::Subcommand;
use neverlost_core::descriptor::{DescriptorId, ShapeKind};
use neverlost_core::editor::LayoutEditor;
use neverlost_core::error::SAVE_FAILED;
use neverlost_core::gateway::LayoutGateway;
use neverlost_core::gizmo::{GizmoEvent, GizmoMode};
use neverlost_core::layout::LayoutId;
use neverlost_core::selection::SelectionInput;
use neverlost_core::session::SessionContext;

use super::report;

#[derive(Subcommand, Debug)]
pub enum EditCommand {
    /// Add a shape (cube, sphere, rectangle) at the default position
    Add { kind: String },

    /// Remove a shape
    Remove { object: String },

    /// Set a shape's hex color
    Color { object: String, color: String },

    /// Set a shape's dimensions (width height length, or a sphere's diameter)
    Size {
        object: String,
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,
    },

    /// Drag a shape by an offset, as with the translate gizmo
    Move {
        object: String,
        #[arg(allow_negative_numbers = true)]
        dx: f64,
        #[arg(allow_negative_numbers = true)]
        dy: f64,
        #[arg(allow_negative_numbers = true)]
        dz: f64,
    },

    /// Rotate a shape by euler angles in radians, as with the rotate gizmo
    Rotate {
        object: String,
        #[arg(allow_negative_numbers = true)]
        rx: f64,
        #[arg(allow_negative_numbers = true)]
        ry: f64,
        #[arg(allow_negative_numbers = true)]
        rz: f64,
    },

    /// Place a shape at an exact position
    Place {
        object: String,
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        #[arg(allow_negative_numbers = true)]
        z: f64,
    },
}

pub async fn run<G: LayoutGateway>(
    gateway: G,
    session: &SessionContext,
    layout_id: LayoutId,
    edit: EditCommand,
) -> Result<()> {
    let mut editor = LayoutEditor::new(gateway, layout_id);
    if editor.open(session).await.is_err() {
        return report(editor.status());
    }

    match edit {
        EditCommand::Add { kind } => {
            let kind = ShapeKind::from(kind.as_str());
            if !ShapeKind::PICKABLE.contains(&kind) {
                bail!("Unknown shape {} (choose cube, sphere or rectangle)", kind);
            }
            editor.set_shape_kind(kind);
            let id = editor.add_shape();
            println!("Added {}", id);
        }
        EditCommand::Remove { object } => {
            select(&mut editor, &object)?;
            editor.remove_selected();
        }
        EditCommand::Color { object, color } => {
            select(&mut editor, &object)?;
            editor.set_color(color);
        }
        EditCommand::Size { object, values } => {
            select(&mut editor, &object)?;
            let expected = editor.selected().map(|d| d.kind.size_params()).unwrap_or_default();
            if values.len() != expected {
                bail!("Expected {} size values, got {}", expected, values.len());
            }
            editor.set_size(values);
        }
        EditCommand::Move { object, dx, dy, dz } => {
            select(&mut editor, &object)?;
            drag(&mut editor, GizmoMode::Translate, [dx, dy, dz]);
        }
        EditCommand::Rotate { object, rx, ry, rz } => {
            select(&mut editor, &object)?;
            drag(&mut editor, GizmoMode::Rotate, [rx, ry, rz]);
        }
        EditCommand::Place { object, x, y, z } => {
            select(&mut editor, &object)?;
            editor.set_position([x, y, z]);
        }
    }

    if let Some(selected) = editor.selected() {
        println!("{}  pos {:?}  rot {:?}", selected.label(), selected.position, selected.rotation);
    }

    match editor.save(session).await {
        Ok(()) => report(editor.status()),
        Err(e) => Err(anyhow!(e.user_message(SAVE_FAILED))),
    }
}

fn select<G: LayoutGateway>(editor: &mut LayoutEditor<G>, object: &str) -> Result<()> {
    editor.handle_selection(&SelectionInput::ListItem(DescriptorId::from(object)));
    if editor.selected().is_none() {
        bail!("No shape {} in layout {}", object, editor.layout_id());
    }
    Ok(())
}

fn drag<G: LayoutGateway>(editor: &mut LayoutEditor<G>, mode: GizmoMode, delta: [f64; 3]) {
    editor.set_gizmo_mode(mode);
    editor.gizmo_event(GizmoEvent::PointerDown);
    editor.gizmo_event(GizmoEvent::Drag(delta));
    editor.gizmo_event(GizmoEvent::PointerUp);
    editor.gizmo_event(GizmoEvent::DragEnd);
}
