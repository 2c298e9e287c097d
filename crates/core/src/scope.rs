use std::fmt;

use serde::{Deserialize, Serialize};

/// Tenant partition every stored rule and workflow belongs to.
///
/// Lookups never cross scopes, and there is no default scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeKey {
    pub installation_id: u64,
    pub repository_id: u64,
}

impl ScopeKey {
    #[must_use]
    pub fn new(installation_id: u64, repository_id: u64) -> Self {
        Self {
            installation_id,
            repository_id,
        }
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.installation_id, self.repository_id)
    }
}
