//! Pedagogical resources: circles, exercises and activities
//!
//! A [`Resource`] is created and mutated on the platform only; this side
//! reads it to decide whether a working copy may be opened and how to name
//! its folder.
//!
//! # Example JSON
//!
//! ```json
//! {
//!   "id": "0c9d6d1e-...",
//!   "name": "Fractions",
//!   "type": "EXERCISE",
//!   "status": "DRAFT",
//!   "personal": false,
//!   "ownerId": "...",
//!   "levels": [],
//!   "topics": [],
//!   "createdAt": "2024-01-01T00:00:00Z",
//!   "updatedAt": "2024-01-01T00:00:00Z",
//!   "permissions": { "read": true, "write": true, "member": true, "watcher": false, "waiting": false }
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Kind of pedagogical unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    Circle,
    Exercise,
    Activity,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceType::Circle => write!(f, "circle"),
            ResourceType::Exercise => write!(f, "exercise"),
            ResourceType::Activity => write!(f, "activity"),
        }
    }
}

impl FromStr for ResourceType {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "circle" => Ok(ResourceType::Circle),
            "exercise" => Ok(ResourceType::Exercise),
            "activity" => Ok(ResourceType::Activity),
            _ => Err(Error::InvalidValue {
                what: "resource type",
                value: s.to_string(),
            }),
        }
    }
}

/// Usability status of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceStatus {
    Ready,
    Deprecated,
    Bugged,
    NotTested,
    Draft,
}

/// Permissions the requesting user holds on a resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePermissions {
    pub read: bool,
    pub write: bool,
    pub member: bool,
    pub watcher: bool,
    pub waiting: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing: Option<bool>,
}

/// A resource as returned by `GET resources/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    /// Alias used to address the resource files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    #[serde(default)]
    pub personal: bool,
    pub status: ResourceStatus,
    #[serde(default)]
    pub levels: Vec<Level>,
    #[serde(default)]
    pub topics: Vec<Topic>,
    pub owner_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_preview: Option<bool>,

    // Expandable fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<ResourcePermissions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<Resource>>,
    /// Raw metadata; decode with [`Resource::typed_meta`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<Box<Resource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistic: Option<ResourceStatistic>,
}

impl Resource {
    /// Whether the requesting user may edit the resource files.
    ///
    /// An unexpanded `permissions` field counts as no permission.
    pub fn can_write(&self) -> bool {
        self.permissions.is_some_and(|p| p.write)
    }

    /// Decode `metadata` into the variant matching `resource_type`.
    ///
    /// Returns `Ok(None)` when the metadata was not expanded.
    pub fn typed_meta(&self) -> Result<Option<ResourceMeta>> {
        let Some(raw) = &self.metadata else {
            return Ok(None);
        };

        let mismatch = |e: serde_json::Error| Error::MetaMismatch {
            id: self.id.clone(),
            resource_type: self.resource_type.to_string(),
            message: e.to_string(),
        };

        let meta = match self.resource_type {
            ResourceType::Circle => {
                ResourceMeta::Circle(serde_json::from_value(raw.clone()).map_err(mismatch)?)
            }
            ResourceType::Activity => {
                ResourceMeta::Activity(serde_json::from_value(raw.clone()).map_err(mismatch)?)
            }
            ResourceType::Exercise => {
                ResourceMeta::Exercise(serde_json::from_value(raw.clone()).map_err(mismatch)?)
            }
        };
        Ok(Some(meta))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tagger {
    pub name: String,
    pub email: String,
}

/// A tagged version of the resource files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileVersion {
    pub tag: String,
    pub tagger: Tagger,
    pub message: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleMeta {
    pub versions: Vec<FileVersion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityMeta {
    pub settings: Value,
    pub versions: Vec<FileVersion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseMeta {
    pub configurable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    pub versions: Vec<FileVersion>,
}

/// Metadata shape, one variant per [`ResourceType`]
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceMeta {
    Circle(CircleMeta),
    Activity(ActivityMeta),
    Exercise(ExerciseMeta),
}

impl ResourceMeta {
    pub fn versions(&self) -> &[FileVersion] {
        match self {
            ResourceMeta::Circle(m) => &m.versions,
            ResourceMeta::Activity(m) => &m.versions,
            ResourceMeta::Exercise(m) => &m.versions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleStatistic {
    pub children: u64,
    pub circles: u64,
    pub exercises: u64,
    pub activities: u64,
    pub ready: u64,
    pub deprecated: u64,
    pub bugged: u64,
    #[serde(rename = "not_tested")]
    pub not_tested: u64,
    pub draft: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStatistic {
    pub attempt_count: u64,
    pub average_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseReferences {
    pub total: u64,
    pub activity: u64,
    pub template: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseStatistic {
    pub attempt_count: u64,
    pub average_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<ExerciseReferences>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceStatistic {
    pub score: f64,
    pub members: u64,
    pub watchers: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circle: Option<CircleStatistic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<ActivityStatistic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise: Option<ExerciseStatistic>,
}
