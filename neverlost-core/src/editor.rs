//! Editor screen controller
//!
//! [`LayoutEditor`] is everything behind the edit screen of one layout: the
//! descriptor store with its undo history, the scene adapter the renderer
//! draws from, the transform gizmo and the one-line status shown to the user.

use crate::action::ActionExecutor;
use crate::actions::{AddDescriptorAction, RemoveDescriptorAction, UpdateDescriptorAction};
use crate::descriptor::{DescriptorId, DescriptorPatch, ObjectDescriptor, ShapeKind, Vec3};
use crate::edit::EditSession;
use crate::error::{self, GatewayError};
use crate::gateway::LayoutGateway;
use crate::gizmo::{GizmoEvent, GizmoMode, OrbitControl, TransformGizmo};
use crate::layout::{LayoutId, NewLayout};
use crate::scene::{PickHit, Ray, SceneGraph, ViewCamera};
use crate::selection::SelectionInput;
use crate::session::SessionContext;

pub const SAVE_SUCCEEDED: &str = "Layout saved successfully!";

/// One-line feedback for the user
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

impl StatusMessage {
    pub fn text(&self) -> &str {
        match self {
            StatusMessage::Info(text) | StatusMessage::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, StatusMessage::Error(_))
    }
}

pub struct LayoutEditor<G: LayoutGateway> {
    gateway: G,
    layout_id: LayoutId,
    executor: ActionExecutor,
    scene: SceneGraph,
    gizmo: TransformGizmo,
    orbit: OrbitControl,
    camera: ViewCamera,
    shape_kind: ShapeKind,
    status: Option<StatusMessage>,
}

impl<G: LayoutGateway> LayoutEditor<G> {
    /// An editor for `layout_id` with nothing loaded yet
    pub fn new(gateway: G, layout_id: LayoutId) -> Self {
        Self {
            gateway,
            layout_id,
            executor: ActionExecutor::new(EditSession::new()),
            scene: SceneGraph::new(),
            gizmo: TransformGizmo::new(),
            orbit: OrbitControl::default(),
            camera: ViewCamera::default(),
            shape_kind: ShapeKind::Cube,
            status: None,
        }
    }

    /// Fetch the layout and replace the working copy with it
    ///
    /// On failure the current descriptors stay as they were.
    pub async fn open(&mut self, session: &SessionContext) -> Result<(), GatewayError> {
        match self.gateway.load_layout(&self.layout_id, session.token()).await {
            Ok(layout) => {
                log::info!("Loaded layout {} ({} objects)", self.layout_id, layout.objects.len());
                self.open_with(layout.objects);
                Ok(())
            }
            Err(e) => {
                log::warn!("Error fetching layout {}: {}", self.layout_id, e);
                self.status = Some(StatusMessage::Error(e.user_message(error::LOAD_FAILED)));
                Err(e)
            }
        }
    }

    /// Start editing descriptors that are already in hand, skipping the fetch
    pub fn open_with(&mut self, descriptors: Vec<ObjectDescriptor>) {
        self.executor.load(descriptors);
        self.status = None;
        self.refresh();
    }

    /// Write the full descriptor sequence back to the service
    ///
    /// The working copy is never modified by a save, whatever the outcome.
    pub async fn save(&mut self, session: &SessionContext) -> Result<(), GatewayError> {
        let result = self
            .gateway
            .save_layout(&self.layout_id, self.executor.session().descriptors(), session.token())
            .await;

        match result {
            Ok(()) => {
                log::info!("Saved layout {}", self.layout_id);
                self.executor.mark_saved();
                self.status = Some(StatusMessage::Info(SAVE_SUCCEEDED.to_string()));
                Ok(())
            }
            Err(e) => {
                log::warn!("Error saving layout {}: {}", self.layout_id, e);
                self.status = Some(StatusMessage::Error(e.user_message(error::SAVE_FAILED)));
                Err(e)
            }
        }
    }

    /// Add a new shape of the chosen kind at the default spot
    pub fn add_shape(&mut self) -> DescriptorId {
        let descriptor = ObjectDescriptor::new(self.shape_kind.clone());
        let id = descriptor.id.clone();
        self.executor.execute(Box::new(AddDescriptorAction::new(descriptor)));
        self.refresh();
        id
    }

    /// Remove the selected shape; false if nothing was selected
    pub fn remove_selected(&mut self) -> bool {
        let Some(id) = self.selected_id() else {
            return false;
        };
        self.executor.execute(Box::new(RemoveDescriptorAction::new(id)));
        self.refresh();
        true
    }

    pub fn set_color(&mut self, color: impl Into<String>) -> bool {
        self.update_selected(DescriptorPatch::color(color))
    }

    pub fn set_size(&mut self, size: Vec<f64>) -> bool {
        self.update_selected(DescriptorPatch::size(size))
    }

    /// Side-panel position edit; written as given, without rounding
    pub fn set_position(&mut self, position: Vec3) -> bool {
        self.update_selected(DescriptorPatch::position(position))
    }

    fn update_selected(&mut self, patch: DescriptorPatch) -> bool {
        let Some(id) = self.selected_id() else {
            return false;
        };
        self.executor.execute(Box::new(UpdateDescriptorAction::new(id, patch)));
        self.refresh();
        true
    }

    pub fn handle_selection(&mut self, input: &SelectionInput) {
        let was_dragging = self.gizmo.is_dragging();
        self.executor.apply_selection(input);
        self.gizmo.attach(self.executor.session().selection().selected(), &mut self.orbit);

        // A cancelled drag must not leave its offset on the renderable
        if was_dragging && !self.gizmo.is_dragging() {
            self.scene.sync(self.executor.session().descriptors());
        }
    }

    /// Canvas click at `pixel` in a viewport of `viewport` pixels
    ///
    /// A shape selects it and empty space deselects. The ground swallows the
    /// click and leaves the selection alone.
    pub fn click(&mut self, pixel: (f64, f64), viewport: (f64, f64)) -> Option<PickHit> {
        let camera = ViewCamera {
            aspect: viewport.0 / viewport.1.max(1.0),
            ..self.camera.clone()
        };
        let ray = Ray::from_screen(pixel, viewport, &camera);
        let hit = self.scene.pick_surface(&ray);
        match &hit {
            Some(PickHit::Shape(id)) => {
                self.handle_selection(&SelectionInput::CanvasHit(Some(id.clone())))
            }
            Some(PickHit::Ground) => {}
            None => self.handle_selection(&SelectionInput::CanvasHit(None)),
        }
        hit
    }

    /// Forward a gizmo pointer event; true if it wrote a descriptor
    pub fn gizmo_event(&mut self, event: GizmoEvent) -> bool {
        match self.gizmo.handle(event, &mut self.scene, &mut self.orbit) {
            Some(reconciled) => {
                let changed = self
                    .executor
                    .session()
                    .store()
                    .get(&reconciled.id)
                    .is_some_and(|current| reconciled.patch.changes(current));
                if changed {
                    self.executor.execute(Box::new(UpdateDescriptorAction::transform(
                        reconciled.id,
                        reconciled.patch,
                    )));
                }
                self.refresh();
                changed
            }
            None => false,
        }
    }

    pub fn set_gizmo_mode(&mut self, mode: GizmoMode) {
        self.gizmo.set_mode(mode);
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.executor.undo();
        if undone {
            self.refresh();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.executor.redo();
        if redone {
            self.refresh();
        }
        redone
    }

    /// Bring the scene and gizmo in line with the descriptors
    fn refresh(&mut self) {
        self.scene.sync(self.executor.session().descriptors());
        self.gizmo.attach(self.executor.session().selection().selected(), &mut self.orbit);
    }

    fn selected_id(&self) -> Option<DescriptorId> {
        self.executor.session().selection().selected().cloned()
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn layout_id(&self) -> &LayoutId {
        &self.layout_id
    }

    pub fn descriptors(&self) -> &[ObjectDescriptor] {
        self.executor.session().descriptors()
    }

    pub fn selected(&self) -> Option<&ObjectDescriptor> {
        self.executor.session().selected()
    }

    pub fn shape_kind(&self) -> &ShapeKind {
        &self.shape_kind
    }

    /// The kind the next `add_shape` creates
    pub fn set_shape_kind(&mut self, kind: ShapeKind) {
        self.shape_kind = kind;
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn gizmo(&self) -> &TransformGizmo {
        &self.gizmo
    }

    pub fn orbit(&self) -> &OrbitControl {
        &self.orbit
    }

    pub fn camera(&self) -> &ViewCamera {
        &self.camera
    }

    pub fn executor(&self) -> &ActionExecutor {
        &self.executor
    }

    pub fn is_dirty(&self) -> bool {
        self.executor.is_dirty()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Leave the editor, handing the working copy to the viewer
    pub fn end_editing(self) -> Vec<ObjectDescriptor> {
        self.executor.session().store().to_vec()
    }
}

/// Create a layout seeded with the default cube
///
/// Errors come back as the line to show under the form.
pub async fn create_layout<G: LayoutGateway + ?Sized>(
    gateway: &G,
    session: &SessionContext,
    name: &str,
    description: &str,
) -> Result<LayoutId, StatusMessage> {
    let body = NewLayout::seeded(name, description);
    match gateway.create_layout(&body, session.token()).await {
        Ok(id) => {
            log::info!("Created layout {} ({})", name, id);
            Ok(id)
        }
        Err(e) => {
            log::warn!("Error creating layout {}: {}", name, e);
            Err(StatusMessage::Error(e.user_message(error::CREATE_FAILED)))
        }
    }
}
