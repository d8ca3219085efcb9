//! Builders for platform payloads

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{TimeZone, Utc};
use platon_meta::{Resource, ResourcePermissions, ResourceStatus, ResourceType, User, UserRole};
use serde_json::json;

/// Exercise named `name`; `write` controls the edit permission.
pub fn resource(id: &str, name: &str, write: bool) -> Resource {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    Resource {
        id: id.to_string(),
        created_at: at,
        updated_at: at,
        name: name.to_string(),
        code: None,
        desc: None,
        resource_type: ResourceType::Exercise,
        personal: false,
        status: ResourceStatus::Draft,
        levels: Vec::new(),
        topics: Vec::new(),
        owner_id: "owner".to_string(),
        parent_id: None,
        template_id: None,
        template_version: None,
        public_preview: None,
        permissions: Some(ResourcePermissions {
            read: true,
            write,
            member: write,
            watcher: false,
            waiting: false,
        }),
        parent: None,
        metadata: None,
        template: None,
        statistic: None,
    }
}

pub fn user(username: &str, first_name: &str) -> User {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    User {
        id: 1,
        username: username.to_string(),
        role: UserRole::Teacher,
        first_name: first_name.to_string(),
        last_name: "Doe".to_string(),
        email: format!("{username}@example.org"),
        created_at: at,
        updated_at: at,
    }
}

/// Unsigned JWT carrying `payload`, decodable by `platon_api::token`.
pub fn unsigned_token(payload: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.")
}

/// Unsigned access token whose payload names `username`.
pub fn access_token(username: &str) -> String {
    unsigned_token(&json!({ "username": username, "exp": 4_102_444_800u64 }))
}
