//! Schema definitions for the platform API payloads
//!
//! Every payload served by the API is wrapped in an [`ApiEnvelope`]:
//!
//! ```json
//! { "resource": { "id": "...", "name": "...", "type": "EXERCISE" } }
//! ```

pub mod resource;
pub mod user;

use serde::{Deserialize, Serialize};

pub use resource::{
    ActivityMeta, ActivityStatistic, CircleMeta, CircleStatistic, ExerciseMeta,
    ExerciseReferences, ExerciseStatistic, FileVersion, Level, Resource, ResourceMeta,
    ResourcePermissions, ResourceStatistic, ResourceStatus, ResourceType, Tagger, Topic,
};
pub use user::{User, UserRole};

/// `{ "resource": T }` wrapper used by every API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub resource: T,
}

impl<T> ApiEnvelope<T> {
    pub fn into_inner(self) -> T {
        self.resource
    }
}
