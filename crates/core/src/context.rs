use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::scope::ScopeKey;

/// Sentinel event name for payloads whose provider could not be identified.
pub const UNKNOWN_EVENT: &str = "unknown";

/// Envelope describing the inbound event itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInfo {
    /// Normalized event name, e.g. `pull_request.opened` or `push`.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_id: Option<String>,
    /// Defaults to the time of deserialization when absent.
    #[serde(default = "Utc::now")]
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryInfo {
    pub id: u64,
    pub owner: String,
    pub name: String,
    /// `owner/name`.
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorInfo {
    pub id: u64,
    pub login: String,
}

/// Canonical, provider-agnostic view of one inbound event.
///
/// Built once by the normalization layer and only borrowed afterwards.
/// Conditions address it by dotted path: `event.*`, `repository.*`,
/// `actor.*`, and `data.*` (the implicit root).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventContext {
    pub event: EventInfo,
    pub repository: RepositoryInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorInfo>,
    pub installation_id: u64,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl EventContext {
    /// Create a context for `event_name` on the given repository, received now.
    #[must_use]
    pub fn new(
        event_name: impl Into<String>,
        installation_id: u64,
        repository: RepositoryInfo,
    ) -> Self {
        Self {
            event: EventInfo {
                name: event_name.into(),
                delivery_id: None,
                received_at: Utc::now(),
            },
            repository,
            actor: None,
            installation_id,
            data: Map::new(),
        }
    }

    /// The owner scope this event's rules and workflows live under.
    #[must_use]
    pub fn scope(&self) -> ScopeKey {
        ScopeKey::new(self.installation_id, self.repository.id)
    }

    #[must_use]
    pub fn with_delivery_id(mut self, delivery_id: impl Into<String>) -> Self {
        self.event.delivery_id = Some(delivery_id.into());
        self
    }

    #[must_use]
    pub fn with_received_at(mut self, received_at: DateTime<Utc>) -> Self {
        self.event.received_at = received_at;
        self
    }

    #[must_use]
    pub fn with_actor(mut self, id: u64, login: impl Into<String>) -> Self {
        self.actor = Some(ActorInfo {
            id,
            login: login.into(),
        });
        self
    }

    /// Insert a top-level entry into `data`.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }
}

impl RepositoryInfo {
    /// Build repository info from its id and `owner/name` parts.
    #[must_use]
    pub fn new(id: u64, owner: impl Into<String>, name: impl Into<String>) -> Self {
        let owner = owner.into();
        let name = name.into();
        Self {
            id,
            full_name: format!("{owner}/{name}"),
            owner,
            name,
        }
    }
}
