//! Scene adapter
//!
//! Bridges descriptors to whatever draws them. The adapter owns the side
//! mapping from descriptor id to renderable; descriptors stay plain data and
//! never point back at a renderable.
//!
//! The renderables here carry exactly what editing needs (live transform,
//! bounds, color). A drawing backend reads them each frame; the transform
//! gizmo writes their live transform while a drag is in progress.
//!
//! ## Picking
//!
//! 1. **Screen to ray**: normalized device coordinates are unprojected
//!    through the inverse view-projection of the [`ViewCamera`].
//! 2. **Ray vs. bounds**: each renderable's local box is transformed to a
//!    world AABB and slab-tested.
//! 3. **Nearest wins**: the closest hit's descriptor id is returned.
//!
//! [`SceneGraph::pick_surface`] also reports the ground, a
//! [`GROUND_SIZE`]-wide square on `y = 0`, when it is nearer than any shape.

use crate::descriptor::{DescriptorId, ObjectDescriptor, ShapeKind, Vec3};
use cgmath::{
    Deg, EuclideanSpace, InnerSpace, Matrix4, PerspectiveFov, Point3, Rad, SquareMatrix, Vector3,
    Vector4,
};
use std::collections::HashMap;

/// Side length of the ground square centered on the origin
pub const GROUND_SIZE: f64 = 10.0;

/// What a pick ray landed on
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickHit {
    Shape(DescriptorId),
    Ground,
}

/// Live transform of a renderable
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LiveTransform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl LiveTransform {
    pub fn of(descriptor: &ObjectDescriptor) -> Self {
        Self {
            position: descriptor.position,
            rotation: descriptor.rotation,
            scale: descriptor.scale,
        }
    }

    /// Model matrix: translate * rotate(X, then Y, then Z) * scale
    pub fn to_matrix(&self) -> Matrix4<f64> {
        let [px, py, pz] = self.position;
        let [rx, ry, rz] = self.rotation;
        let [sx, sy, sz] = self.scale;

        Matrix4::from_translation(Vector3::new(px, py, pz))
            * Matrix4::from_angle_x(Rad(rx))
            * Matrix4::from_angle_y(Rad(ry))
            * Matrix4::from_angle_z(Rad(rz))
            * Matrix4::from_nonuniform_scale(sx, sy, sz)
    }
}

/// Handle to a renderable slot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderableHandle(usize);

/// Drawable counterpart of a descriptor
#[derive(Clone, Debug, PartialEq)]
pub struct Renderable {
    pub kind: ShapeKind,
    pub transform: LiveTransform,
    /// Half size of the untransformed shape along each axis
    pub half_extents: Vec3,
    pub color: String,
}

impl Renderable {
    pub fn from_descriptor(descriptor: &ObjectDescriptor) -> Self {
        Self {
            kind: descriptor.kind.clone(),
            transform: LiveTransform::of(descriptor),
            half_extents: half_extents(&descriptor.kind, &descriptor.size),
            color: descriptor.color.clone(),
        }
    }

    /// World-space bounding box
    pub fn world_bounds(&self) -> Aabb {
        let [hx, hy, hz] = self.half_extents;
        Aabb::new(Vector3::new(-hx, -hy, -hz), Vector3::new(hx, hy, hz))
            .transform(&self.transform.to_matrix())
    }
}

/// Geometry half extents for a kind and size array
///
/// Spheres take a diameter; box-like kinds take width, height, length.
/// Missing entries fall back to 1.
fn half_extents(kind: &ShapeKind, size: &[f64]) -> Vec3 {
    let dim = |i: usize| size.get(i).copied().unwrap_or(1.0) / 2.0;
    match kind {
        ShapeKind::Sphere => {
            let r = dim(0);
            [r, r, r]
        }
        _ => [dim(0), dim(1), dim(2)],
    }
}

/// A ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vector3<f64>,
    /// Normalized direction
    pub direction: Vector3<f64>,
}

impl Ray {
    pub fn new(origin: Vector3<f64>, direction: Vector3<f64>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Pick ray through a point given in normalized device coordinates
    /// (x and y in -1..1, y up)
    pub fn from_ndc(ndc: (f64, f64), camera: &ViewCamera) -> Self {
        let inv_view_proj = camera
            .view_projection()
            .invert()
            .unwrap_or_else(Matrix4::identity);

        let unproject = |z: f64| {
            let p = inv_view_proj * Vector4::new(ndc.0, ndc.1, z, 1.0);
            Vector3::new(p.x / p.w, p.y / p.w, p.z / p.w)
        };

        let near = unproject(-1.0);
        let far = unproject(1.0);
        Ray::new(near, far - near)
    }

    /// Distance to the ground square, if the ray crosses it
    pub fn intersect_ground(&self) -> Option<f64> {
        if self.direction.y.abs() < f64::EPSILON {
            return None;
        }
        let t = -self.origin.y / self.direction.y;
        if t < 0.0 {
            return None;
        }

        let half = GROUND_SIZE / 2.0;
        let x = self.origin.x + self.direction.x * t;
        let z = self.origin.z + self.direction.z * t;
        (x.abs() <= half && z.abs() <= half).then_some(t)
    }

    /// Pick ray through a pixel of a viewport of `size`
    pub fn from_screen(pixel: (f64, f64), size: (f64, f64), camera: &ViewCamera) -> Self {
        let ndc_x = (2.0 * pixel.0) / size.0 - 1.0;
        let ndc_y = 1.0 - (2.0 * pixel.1) / size.1;
        Self::from_ndc((ndc_x, ndc_y), camera)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f64>,
    pub max: Vector3<f64>,
}

impl Aabb {
    pub fn new(min: Vector3<f64>, max: Vector3<f64>) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: &[Vector3<f64>]) -> Self {
        let Some(first) = points.first() else {
            return Self::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 0.0));
        };

        let mut min = *first;
        let mut max = *first;
        for p in &points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }
        Self::new(min, max)
    }

    /// Bounds of this box after `matrix` (all eight corners transformed)
    pub fn transform(&self, matrix: &Matrix4<f64>) -> Self {
        let (lo, hi) = (self.min, self.max);
        let corners: Vec<Vector3<f64>> = [
            (lo.x, lo.y, lo.z),
            (hi.x, lo.y, lo.z),
            (lo.x, hi.y, lo.z),
            (lo.x, lo.y, hi.z),
            (hi.x, hi.y, lo.z),
            (hi.x, lo.y, hi.z),
            (lo.x, hi.y, hi.z),
            (hi.x, hi.y, hi.z),
        ]
        .iter()
        .map(|&(x, y, z)| {
            let p = matrix * Vector4::new(x, y, z, 1.0);
            Vector3::new(p.x / p.w, p.y / p.w, p.z / p.w)
        })
        .collect();

        Self::from_points(&corners)
    }

    /// Slab test; distance along the ray to the first hit
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f64> {
        let mut t_near = f64::NEG_INFINITY;
        let mut t_far = f64::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let dir = ray.direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if dir.abs() < f64::EPSILON {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let t1 = (lo - origin) / dir;
            let t2 = (hi - origin) / dir;
            t_near = t_near.max(t1.min(t2));
            t_far = t_far.min(t1.max(t2));
        }

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }
}

/// Perspective camera looking at a target
#[derive(Debug, Clone, PartialEq)]
pub struct ViewCamera {
    pub eye: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
    /// Vertical field of view in degrees
    pub fovy: f64,
    pub aspect: f64,
    pub znear: f64,
    pub zfar: f64,
}

impl Default for ViewCamera {
    fn default() -> Self {
        Self {
            eye: Point3::new(10.0, 10.0, 10.0),
            target: Point3::origin(),
            up: Vector3::unit_y(),
            fovy: 75.0,
            aspect: 1.0,
            znear: 0.1,
            zfar: 1000.0,
        }
    }
}

impl ViewCamera {
    pub fn view_projection(&self) -> Matrix4<f64> {
        let view = Matrix4::look_at_rh(self.eye, self.target, self.up);
        let proj: Matrix4<f64> = PerspectiveFov {
            fovy: Rad::from(Deg(self.fovy)),
            aspect: self.aspect,
            near: self.znear,
            far: self.zfar,
        }
        .into();
        proj * view
    }
}

/// Renderables keyed by descriptor id
#[derive(Debug, Default)]
pub struct SceneGraph {
    slots: Vec<Option<Renderable>>,
    free: Vec<usize>,
    handles: HashMap<DescriptorId, RenderableHandle>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the renderables in line with `descriptors`
    ///
    /// New ids get a renderable, existing ones are refreshed from their
    /// descriptor (discarding any live drag offset), and renderables whose
    /// descriptor disappeared are released.
    pub fn sync(&mut self, descriptors: &[ObjectDescriptor]) {
        let stale: Vec<DescriptorId> = self
            .handles
            .keys()
            .filter(|id| !descriptors.iter().any(|d| &d.id == *id))
            .cloned()
            .collect();
        for id in stale {
            self.release(&id);
        }

        for descriptor in descriptors {
            let renderable = Renderable::from_descriptor(descriptor);
            match self.handles.get(&descriptor.id) {
                Some(handle) => self.slots[handle.0] = Some(renderable),
                None => {
                    let handle = self.allocate(renderable);
                    self.handles.insert(descriptor.id.clone(), handle);
                }
            }
        }
    }

    fn allocate(&mut self, renderable: Renderable) -> RenderableHandle {
        if let Some(index) = self.free.pop() {
            self.slots[index] = Some(renderable);
            RenderableHandle(index)
        } else {
            self.slots.push(Some(renderable));
            RenderableHandle(self.slots.len() - 1)
        }
    }

    fn release(&mut self, id: &DescriptorId) {
        if let Some(handle) = self.handles.remove(id) {
            self.slots[handle.0] = None;
            self.free.push(handle.0);
        }
    }

    pub fn handle(&self, id: &DescriptorId) -> Option<RenderableHandle> {
        self.handles.get(id).copied()
    }

    pub fn renderable(&self, id: &DescriptorId) -> Option<&Renderable> {
        let handle = self.handle(id)?;
        self.slots.get(handle.0)?.as_ref()
    }

    pub fn renderable_mut(&mut self, id: &DescriptorId) -> Option<&mut Renderable> {
        let handle = self.handle(id)?;
        self.slots.get_mut(handle.0)?.as_mut()
    }

    /// Current transform of the renderable bound to `id`
    pub fn live_transform(&self, id: &DescriptorId) -> Option<LiveTransform> {
        self.renderable(id).map(|r| r.transform)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Id of the nearest renderable hit by `ray`
    pub fn pick(&self, ray: &Ray) -> Option<DescriptorId> {
        self.nearest(ray).map(|(_, id)| id.clone())
    }

    /// Nearest shape or ground hit by `ray`
    pub fn pick_surface(&self, ray: &Ray) -> Option<PickHit> {
        match (self.nearest(ray), ray.intersect_ground()) {
            (Some((shape, _)), Some(ground)) if ground < shape => Some(PickHit::Ground),
            (Some((_, id)), _) => Some(PickHit::Shape(id.clone())),
            (None, Some(_)) => Some(PickHit::Ground),
            (None, None) => None,
        }
    }

    fn nearest(&self, ray: &Ray) -> Option<(f64, &DescriptorId)> {
        let mut closest: Option<(f64, &DescriptorId)> = None;

        for (id, handle) in &self.handles {
            let Some(renderable) = self.slots[handle.0].as_ref() else {
                continue;
            };
            if let Some(distance) = renderable.world_bounds().intersect_ray(ray) {
                if closest.map_or(true, |(best, _)| distance < best) {
                    closest = Some((distance, id));
                }
            }
        }

        closest
    }
}
