use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static LAST_ID: AtomicU64 = AtomicU64::new(0);

/// Next time-ordered id: the current Unix time in milliseconds, bumped by one
/// whenever the clock has not moved past the previously issued value.
///
/// Ids are strictly increasing within a process, so sorting them as numbers
/// reproduces creation order.
pub fn next_id() -> String {
    let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let mut prev = LAST_ID.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(prev + 1);
        match LAST_ID.compare_exchange_weak(prev, candidate, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(_) => return candidate.to_string(),
            Err(actual) => prev = actual,
        }
    }
}

/// Short hex id used to tie log lines of one request together.
pub fn new_correlation_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    let bytes = uuid.as_bytes();
    format!(
        "{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3]
    )
}

/// Identifier of one conversation (the document id under `users/{uid}/chats`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new() -> Self {
        Self(next_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for ConversationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ConversationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_id_is_numeric() {
        let id = next_id();
        assert!(id.parse::<u64>().is_ok());
    }

    #[test]
    fn next_id_is_strictly_increasing() {
        let ids: Vec<u64> = (0..1000).map(|_| next_id().parse().unwrap()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn next_id_tracks_wall_clock() {
        let before = chrono::Utc::now().timestamp_millis() as u64;
        let id: u64 = next_id().parse().unwrap();
        assert!(id >= before);
    }

    #[test]
    fn correlation_id_length() {
        let cid = new_correlation_id();
        assert_eq!(cid.len(), 8);
        assert!(cid.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn conversation_ids_are_unique() {
        let a = ConversationId::new();
        let b = ConversationId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn conversation_id_display() {
        let id = ConversationId::from("1700000000000");
        assert_eq!(id.to_string(), "1700000000000");
        assert_eq!(id.as_str(), "1700000000000");
    }

    #[test]
    fn conversation_id_serializes_as_plain_string() {
        let id = ConversationId::from("42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"42\"");
        let back: ConversationId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
