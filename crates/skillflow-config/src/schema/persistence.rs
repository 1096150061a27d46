//! Chat persistence behaviour.

use serde::{Deserialize, Serialize};

/// How the persistence bridge waits on remote writes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Spawn the write and only log failures.
    #[default]
    FireAndForget,
    /// Await the write and surface failures to the caller.
    Awaited,
}

/// What "delete conversation" does on the remote side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    /// Hide from the local history index only.
    #[default]
    LocalOnly,
    /// Merge `archived = true` into the remote document.
    Archive,
    /// Delete the remote document.
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PersistenceConfig {
    pub write_mode: WriteMode,
    pub delete_policy: DeletePolicy,
}
