//! Transform gizmo and reconciliation
//!
//! The gizmo moves the *renderable* of the selected descriptor while a drag
//! is in progress. Only when the drag finishes is the live transform read
//! back, rounded, and turned into a descriptor update. This is the single
//! path from interactive manipulation into descriptor data.

use crate::descriptor::{DescriptorId, DescriptorPatch, Vec3};
use crate::scene::{LiveTransform, SceneGraph};

/// Decimal places kept when a dragged transform is written back
pub const TRANSFORM_PRECISION: i32 = 2;

/// Round to [`TRANSFORM_PRECISION`] decimal places, half away from zero
pub fn round2(value: f64) -> f64 {
    let factor = 10f64.powi(TRANSFORM_PRECISION);
    let rounded = (value * factor).round() / factor;
    // Avoid persisting "-0.0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

pub fn round_vec3(v: Vec3) -> Vec3 {
    [round2(v[0]), round2(v[1]), round2(v[2])]
}

/// Camera orbit switch
///
/// Turned off for the length of a gizmo drag so the camera and the object
/// are never manipulated by the same pointer motion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrbitControl {
    enabled: bool,
}

impl Default for OrbitControl {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl OrbitControl {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// Which transform channel the handles drive
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GizmoMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

/// Pointer events reported by the gizmo handles
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GizmoEvent {
    PointerDown,
    /// Incremental motion along the mode's channel
    Drag(Vec3),
    PointerUp,
    DragEnd,
}

/// Rounded update produced when a drag finishes
#[derive(Clone, Debug, PartialEq)]
pub struct Reconciliation {
    pub id: DescriptorId,
    pub patch: DescriptorPatch,
}

/// Build the rounded patch for the channel `mode` manipulates
pub fn reconcile(live: &LiveTransform, mode: GizmoMode) -> DescriptorPatch {
    match mode {
        GizmoMode::Translate => DescriptorPatch::position(round_vec3(live.position)),
        GizmoMode::Rotate => DescriptorPatch::rotation(round_vec3(live.rotation)),
        GizmoMode::Scale => DescriptorPatch::scale(round_vec3(live.scale)),
    }
}

#[derive(Debug, Default)]
pub struct TransformGizmo {
    mode: GizmoMode,
    attached: Option<DescriptorId>,
    dragging: bool,
}

impl TransformGizmo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> GizmoMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: GizmoMode) {
        self.mode = mode;
    }

    pub fn attached(&self) -> Option<&DescriptorId> {
        self.attached.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Bind the handles to the current selection
    ///
    /// Re-binding cancels any drag in progress and hands the camera back.
    pub fn attach(&mut self, selected: Option<&DescriptorId>, orbit: &mut OrbitControl) {
        if self.attached.as_ref() != selected {
            if self.dragging {
                log::debug!("Selection changed mid-drag, cancelling drag");
            }
            self.dragging = false;
            orbit.set_enabled(true);
            self.attached = selected.cloned();
        }
    }

    /// Feed one pointer event; returns the update to write back, if any
    pub fn handle(
        &mut self,
        event: GizmoEvent,
        scene: &mut SceneGraph,
        orbit: &mut OrbitControl,
    ) -> Option<Reconciliation> {
        match event {
            GizmoEvent::PointerDown => {
                if self.attached.is_some() {
                    self.dragging = true;
                    orbit.set_enabled(false);
                }
                None
            }
            GizmoEvent::Drag(delta) => {
                self.drag(scene, delta);
                None
            }
            GizmoEvent::PointerUp | GizmoEvent::DragEnd => {
                orbit.set_enabled(true);
                self.finish(scene)
            }
        }
    }

    fn drag(&mut self, scene: &mut SceneGraph, delta: Vec3) {
        if !self.dragging {
            return;
        }
        let Some(id) = &self.attached else {
            return;
        };
        let Some(renderable) = scene.renderable_mut(id) else {
            return;
        };

        let channel = match self.mode {
            GizmoMode::Translate => &mut renderable.transform.position,
            GizmoMode::Rotate => &mut renderable.transform.rotation,
            GizmoMode::Scale => &mut renderable.transform.scale,
        };
        for (value, d) in channel.iter_mut().zip(delta) {
            *value += d;
        }
    }

    fn finish(&mut self, scene: &SceneGraph) -> Option<Reconciliation> {
        if !self.dragging {
            return None;
        }
        self.dragging = false;

        let id = self.attached.clone()?;
        let live = scene.live_transform(&id)?;
        let patch = reconcile(&live, self.mode);
        log::debug!("Reconciling {} after drag: {:?}", id, patch);
        Some(Reconciliation { id, patch })
    }
}
