//! Object descriptors
//!
//! A descriptor is the plain, serializable record of one scene member: its
//! shape kind, transform, color and size. Descriptors never hold references
//! to renderables; the scene adapter keeps that mapping on its side.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// World-space triple (meters for position, radians for rotation)
pub type Vec3 = [f64; 3];

/// Default color for shapes added from the editor (slate grey)
pub const DEFAULT_SHAPE_COLOR: &str = "#708090";

/// Color of the seed cube placed in newly created layouts
pub const DEFAULT_CUBE_COLOR: &str = "#00ff00";

/// Resting position for new shapes: centered, sitting on the ground plane
pub const DEFAULT_SHAPE_POSITION: Vec3 = [0.0, 0.5, 0.0];

/// Opaque descriptor identifier
///
/// Generated client-side as a random UUID. Older clients used millisecond
/// timestamps, so numeric ids are accepted on read and kept as their decimal
/// text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DescriptorId(String);

impl DescriptorId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DescriptorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DescriptorId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for DescriptorId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<Uuid> for DescriptorId {
    fn from(value: Uuid) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for DescriptorId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self(number.to_string()),
        })
    }
}

/// Shape kind of a descriptor
///
/// Determines how `size` is interpreted. Names the editor doesn't know are
/// preserved so a layout saved by a newer client survives a round trip.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShapeKind {
    Cube,
    Sphere,
    Rectangle,
    Box,
    Other(String),
}

impl ShapeKind {
    /// Shapes offered by the editor's shape picker
    pub const PICKABLE: [ShapeKind; 3] = [ShapeKind::Cube, ShapeKind::Sphere, ShapeKind::Rectangle];

    pub fn name(&self) -> &str {
        match self {
            ShapeKind::Cube => "cube",
            ShapeKind::Sphere => "sphere",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Box => "box",
            ShapeKind::Other(name) => name,
        }
    }

    /// Number of entries `size` must have for this kind
    ///
    /// Spheres take a single diameter; everything else (including unknown
    /// kinds, which render as boxes) takes width, height and length.
    pub fn size_params(&self) -> usize {
        match self {
            ShapeKind::Sphere => 1,
            _ => 3,
        }
    }

    /// Size a freshly added shape of this kind starts with
    pub fn default_size(&self) -> Vec<f64> {
        vec![1.0; self.size_params()]
    }
}

impl From<String> for ShapeKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "cube" => ShapeKind::Cube,
            "sphere" => ShapeKind::Sphere,
            "rectangle" => ShapeKind::Rectangle,
            "box" => ShapeKind::Box,
            _ => ShapeKind::Other(value),
        }
    }
}

impl From<&str> for ShapeKind {
    fn from(value: &str) -> Self {
        ShapeKind::from(value.to_string())
    }
}

impl From<ShapeKind> for String {
    fn from(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Other(name) => name,
            known => known.name().to_string(),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One scene member
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireDescriptor")]
pub struct ObjectDescriptor {
    /// Stable identifier, unique within a layout
    pub id: DescriptorId,

    /// Shape kind
    #[serde(rename = "type")]
    pub kind: ShapeKind,

    /// Position in meters
    pub position: Vec3,

    /// Euler rotation in radians
    pub rotation: Vec3,

    /// Per-axis scale factors
    pub scale: Vec3,

    /// Hex color string
    pub color: String,

    /// Shape-dependent dimensions, see [`ShapeKind::size_params`]
    pub size: Vec<f64>,
}

impl ObjectDescriptor {
    /// Create a new shape the way the editor's "Add Shape" button does
    pub fn new(kind: ShapeKind) -> Self {
        Self::with_id(DescriptorId::generate(), kind)
    }

    /// Create a shape with a caller-provided id
    pub fn with_id(id: DescriptorId, kind: ShapeKind) -> Self {
        Self {
            id,
            size: kind.default_size(),
            kind,
            position: DEFAULT_SHAPE_POSITION,
            rotation: [0.0; 3],
            scale: [1.0; 3],
            color: DEFAULT_SHAPE_COLOR.to_string(),
        }
    }

    /// The seed object placed in every newly created layout
    pub fn default_cube() -> Self {
        Self::new(ShapeKind::Cube).with_color(DEFAULT_CUBE_COLOR)
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_size(mut self, size: Vec<f64>) -> Self {
        self.size = size;
        self
    }

    /// Whether `size` has the number of entries the kind expects
    pub fn has_valid_size(&self) -> bool {
        self.size.len() == self.kind.size_params()
    }

    /// Row label used by the shape list ("cube - <id>")
    pub fn label(&self) -> String {
        format!("{} - {}", self.kind, self.id)
    }
}

/// Partial update for a descriptor
///
/// Only the fields that are `Some` are written. There is no id field, so
/// an update can never re-key a descriptor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DescriptorPatch {
    pub kind: Option<ShapeKind>,
    pub position: Option<Vec3>,
    pub rotation: Option<Vec3>,
    pub scale: Option<Vec3>,
    pub color: Option<String>,
    pub size: Option<Vec<f64>>,
}

impl DescriptorPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Default::default()
        }
    }

    pub fn position(position: Vec3) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn rotation(rotation: Vec3) -> Self {
        Self {
            rotation: Some(rotation),
            ..Default::default()
        }
    }

    pub fn scale(scale: Vec3) -> Self {
        Self {
            scale: Some(scale),
            ..Default::default()
        }
    }

    pub fn size(size: Vec<f64>) -> Self {
        Self {
            size: Some(size),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.position.is_none()
            && self.rotation.is_none()
            && self.scale.is_none()
            && self.color.is_none()
            && self.size.is_none()
    }

    /// Merge the present fields into `descriptor`
    pub fn apply_to(&self, descriptor: &mut ObjectDescriptor) {
        if let Some(kind) = &self.kind {
            descriptor.kind = kind.clone();
        }
        if let Some(position) = self.position {
            descriptor.position = position;
        }
        if let Some(rotation) = self.rotation {
            descriptor.rotation = rotation;
        }
        if let Some(scale) = self.scale {
            descriptor.scale = scale;
        }
        if let Some(color) = &self.color {
            descriptor.color = color.clone();
        }
        if let Some(size) = &self.size {
            descriptor.size = size.clone();
        }
    }

    /// Whether applying this patch would alter `descriptor`
    pub fn changes(&self, descriptor: &ObjectDescriptor) -> bool {
        let mut patched = descriptor.clone();
        self.apply_to(&mut patched);
        &patched != descriptor
    }
}

/// Lenient read-side shape of a descriptor
///
/// Layouts written by different client versions disagree on details:
/// transforms as `[x, y, z]` or `{x, y, z}`, missing rotation/scale/size.
#[derive(Deserialize)]
struct WireDescriptor {
    id: DescriptorId,
    #[serde(rename = "type")]
    kind: ShapeKind,
    #[serde(default, deserialize_with = "de_opt_vec3")]
    position: Option<Vec3>,
    #[serde(default, deserialize_with = "de_opt_vec3")]
    rotation: Option<Vec3>,
    #[serde(default, deserialize_with = "de_opt_vec3")]
    scale: Option<Vec3>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    size: Option<Vec<f64>>,
}

impl From<WireDescriptor> for ObjectDescriptor {
    fn from(wire: WireDescriptor) -> Self {
        Self {
            size: wire.size.unwrap_or_else(|| wire.kind.default_size()),
            id: wire.id,
            kind: wire.kind,
            position: wire.position.unwrap_or([0.0; 3]),
            rotation: wire.rotation.unwrap_or([0.0; 3]),
            scale: wire.scale.unwrap_or([1.0; 3]),
            color: wire.color.unwrap_or_else(|| DEFAULT_SHAPE_COLOR.to_string()),
        }
    }
}

fn de_opt_vec3<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec3>, D::Error> {
    #[derive(Deserialize)]
    struct Xyz {
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
        #[serde(default)]
        z: f64,
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawVec3 {
        Array(Vec3),
        Object(Xyz),
    }

    Ok(Option::<RawVec3>::deserialize(deserializer)?.map(|raw| match raw {
        RawVec3::Array(values) => values,
        RawVec3::Object(Xyz { x, y, z }) => [x, y, z],
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_shape_defaults() {
        let sphere = ObjectDescriptor::new(ShapeKind::Sphere);
        assert_eq!(sphere.size, vec![1.0]);
        assert_eq!(sphere.position, [0.0, 0.5, 0.0]);
        assert_eq!(sphere.color, DEFAULT_SHAPE_COLOR);
        assert!(sphere.has_valid_size());

        let cube = ObjectDescriptor::default_cube();
        assert_eq!(cube.kind, ShapeKind::Cube);
        assert_eq!(cube.size, vec![1.0, 1.0, 1.0]);
        assert_eq!(cube.color, DEFAULT_CUBE_COLOR);
        assert_eq!(cube.scale, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = ObjectDescriptor::new(ShapeKind::Cube);
        let b = ObjectDescriptor::new(ShapeKind::Cube);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let kind = ShapeKind::from("cylinder");
        assert_eq!(kind, ShapeKind::Other("cylinder".to_string()));
        assert_eq!(kind.size_params(), 3);
        assert_eq!(String::from(kind), "cylinder");
    }

    #[test]
    fn test_reads_array_transforms_and_numeric_id() {
        let value = json!({
            "id": 1717171717171u64,
            "type": "sphere",
            "position": [1.0, 2.0, 3.0],
            "color": "#ff0000",
            "size": [2.0]
        });
        let descriptor: ObjectDescriptor = serde_json::from_value(value).unwrap();
        assert_eq!(descriptor.id.as_str(), "1717171717171");
        assert_eq!(descriptor.kind, ShapeKind::Sphere);
        assert_eq!(descriptor.position, [1.0, 2.0, 3.0]);
        assert_eq!(descriptor.rotation, [0.0, 0.0, 0.0]);
        assert_eq!(descriptor.scale, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_reads_object_transforms_and_missing_size() {
        let value = json!({
            "id": "abc",
            "type": "cube",
            "color": "#00ff00",
            "position": { "x": 0, "y": 0.5, "z": 0 },
            "rotation": { "x": 0, "y": 1.5, "z": 0 },
            "scale": { "x": 1, "y": 2, "z": 1 },
            "_id": "server-side-field"
        });
        let descriptor: ObjectDescriptor = serde_json::from_value(value).unwrap();
        assert_eq!(descriptor.position, [0.0, 0.5, 0.0]);
        assert_eq!(descriptor.rotation, [0.0, 1.5, 0.0]);
        assert_eq!(descriptor.scale, [1.0, 2.0, 1.0]);
        assert_eq!(descriptor.size, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_writes_type_field_and_arrays() {
        let descriptor = ObjectDescriptor::with_id("d1".into(), ShapeKind::Rectangle);
        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(value["type"], "rectangle");
        assert_eq!(value["id"], "d1");
        assert_eq!(value["position"], json!([0.0, 0.5, 0.0]));
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn test_patch_applies_only_present_fields() {
        let mut descriptor = ObjectDescriptor::new(ShapeKind::Cube);
        let before = descriptor.clone();

        DescriptorPatch::color("#123456").apply_to(&mut descriptor);

        assert_eq!(descriptor.color, "#123456");
        assert_eq!(descriptor.id, before.id);
        assert_eq!(descriptor.position, before.position);
        assert_eq!(descriptor.size, before.size);
        assert!(DescriptorPatch::new().is_empty());
    }

    #[test]
    fn test_patch_changes() {
        let descriptor = ObjectDescriptor::new(ShapeKind::Cube);
        assert!(!DescriptorPatch::position(descriptor.position).changes(&descriptor));
        assert!(!DescriptorPatch::new().changes(&descriptor));
        assert!(DescriptorPatch::position([1.0, 0.5, 0.0]).changes(&descriptor));
    }
}
