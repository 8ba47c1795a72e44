//! Layout wire types
//!
//! Shapes of the JSON bodies exchanged with the layout service.

use crate::descriptor::ObjectDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned layout identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutId(String);

impl LayoutId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayoutId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for LayoutId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A full layout as returned by `GET /layouts/:id`
///
/// Only `objects` is guaranteed; the rest is filled in when the server sends it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<LayoutId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub objects: Vec<ObjectDescriptor>,
}

/// One entry of `GET /layouts`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutSummary {
    #[serde(rename = "_id")]
    pub id: LayoutId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Body of `POST /layouts`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewLayout {
    pub name: String,
    pub description: String,
    pub objects: Vec<ObjectDescriptor>,
}

impl NewLayout {
    /// A layout seeded with the default cube
    pub fn seeded(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            objects: vec![ObjectDescriptor::default_cube()],
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct CreatedLayout {
    #[serde(rename = "layoutId")]
    pub layout_id: LayoutId,
}

/// Body of `PUT /layouts/:id`
#[derive(Debug, Serialize)]
pub(crate) struct SaveLayoutRequest<'a> {
    pub objects: &'a [ObjectDescriptor],
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ObjectDescriptor>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<ObjectDescriptor>>::deserialize(deserializer)?.unwrap_or_default())
}
