//! # History Persistence
//!
//! Past exchanges live in a single JSON array, `~/.heartchat/history.json`
//! by default:
//!
//! ```json
//! [{ "userMessage": "hi", "assistantReply": "hey you", "timestamp": "2024-02-14T20:15:00Z" }]
//! ```
//!
//! Storage hides behind [`HistoryStore`] so the backend is swappable and its
//! failures stay at that boundary. Nothing in here is fatal: a corrupt or
//! unreadable file is logged and treated as an empty history.
//!
//! Two instances writing the same file race read-then-write with no locking;
//! the last writer wins.

use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::core::conversation::{Conversation, Message, Sender};

/// Number of past exchanges replayed on startup.
pub const DEFAULT_REPLAY_LIMIT: usize = 5;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub user_message: String,
    #[serde(alias = "aiResponse")]
    pub assistant_reply: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(user_message: impl Into<String>, assistant_reply: impl Into<String>) -> Self {
        Self {
            user_message: user_message.into(),
            assistant_reply: assistant_reply.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug)]
pub enum HistoryError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::Io(e) => write!(f, "history I/O error: {e}"),
            HistoryError::Parse(e) => write!(f, "history parse error: {e}"),
        }
    }
}

impl std::error::Error for HistoryError {}

impl From<io::Error> for HistoryError {
    fn from(e: io::Error) -> Self {
        HistoryError::Io(e)
    }
}

impl From<serde_json::Error> for HistoryError {
    fn from(e: serde_json::Error) -> Self {
        HistoryError::Parse(e)
    }
}

/// Where history entries are kept between runs.
pub trait HistoryStore: Send {
    /// Reads the persisted sequence. A missing store is an empty history.
    fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError>;

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError>;

    fn clear(&self) -> Result<(), HistoryError>;
}

/// History kept in a JSON file, written atomically via `.tmp` + rename.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HistoryStore for JsonFileStore {
    fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("tmp");
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), HistoryError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// In-process store. Clones share the same entries, so a test can keep a
/// handle and inspect what the cache wrote.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<Option<Vec<HistoryEntry>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<HistoryEntry>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(Some(entries))),
        }
    }

    /// The persisted entries, or `None` if nothing has been saved.
    pub fn snapshot(&self) -> Option<Vec<HistoryEntry>> {
        self.entries.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

impl HistoryStore for MemoryStore {
    fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        Ok(self.snapshot().unwrap_or_default())
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        if let Ok(mut guard) = self.entries.lock() {
            *guard = Some(entries.to_vec());
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), HistoryError> {
        if let Ok(mut guard) = self.entries.lock() {
            *guard = None;
        }
        Ok(())
    }
}

/// The session's history: in-memory entries plus the store behind them.
pub struct HistoryCache {
    entries: Vec<HistoryEntry>,
    store: Box<dyn HistoryStore>,
    /// When false, `record` keeps entries in memory only.
    persist: bool,
    replay_limit: usize,
}

impl HistoryCache {
    pub fn new(store: Box<dyn HistoryStore>, persist: bool, replay_limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            store,
            persist,
            replay_limit,
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Appends one exchange. Store failures are logged, never surfaced.
    pub fn record(&mut self, user_message: &str, assistant_reply: &str) {
        self.entries
            .push(HistoryEntry::new(user_message, assistant_reply));

        if !self.persist {
            debug!("History persistence disabled, kept {} entries in memory", self.entries.len());
            return;
        }
        if let Err(e) = self.store.save(&self.entries) {
            warn!("Failed to save history: {}", e);
        } else {
            debug!("History saved ({} entries)", self.entries.len());
        }
    }

    /// Loads the persisted sequence and replays the most recent entries into
    /// `conversation` as user/assistant pairs, oldest first.
    ///
    /// Returns the number of messages appended.
    pub fn load_and_replay(&mut self, conversation: &mut Conversation) -> usize {
        self.entries = match self.store.load() {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Error loading chat history, starting empty: {}", e);
                Vec::new()
            }
        };

        let start = self.entries.len().saturating_sub(self.replay_limit);
        let mut appended = 0;
        for entry in &self.entries[start..] {
            let when = entry.timestamp.with_timezone(&Local);
            conversation.append(Message::at(&entry.user_message, Sender::User, when));
            conversation.append(Message::at(&entry.assistant_reply, Sender::Assistant, when));
            appended += 2;
        }

        info!(
            "Replayed {} of {} history entries",
            appended / 2,
            self.entries.len()
        );
        appended
    }

    /// Empties both the in-memory sequence and the store.
    pub fn clear(&mut self) {
        self.entries.clear();
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear persisted history: {}", e);
        } else {
            info!("History cleared");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(n: usize) -> Vec<HistoryEntry> {
        (0..n)
            .map(|i| HistoryEntry::new(format!("question {i}"), format!("answer {i}")))
            .collect()
    }

    #[test]
    fn test_replay_takes_last_five_in_order() {
        let store = MemoryStore::with_entries(entries(7));
        let mut cache = HistoryCache::new(Box::new(store), true, DEFAULT_REPLAY_LIMIT);
        let mut conversation = Conversation::new();

        let appended = cache.load_and_replay(&mut conversation);

        assert_eq!(appended, 10);
        assert_eq!(cache.entries().len(), 7, "full history stays in memory");
        let messages = conversation.messages();
        for (pair, i) in messages.chunks(2).zip(2..7) {
            assert_eq!(pair[0].sender, Sender::User);
            assert_eq!(pair[0].content, format!("question {i}"));
            assert_eq!(pair[1].sender, Sender::Assistant);
            assert_eq!(pair[1].content, format!("answer {i}"));
        }
    }

    #[test]
    fn test_replay_fewer_than_limit() {
        let store = MemoryStore::with_entries(entries(2));
        let mut cache = HistoryCache::new(Box::new(store), true, DEFAULT_REPLAY_LIMIT);
        let mut conversation = Conversation::new();
        assert_eq!(cache.load_and_replay(&mut conversation), 4);
    }

    #[test]
    fn test_record_persists_when_enabled() {
        let store = MemoryStore::new();
        let mut cache = HistoryCache::new(Box::new(store.clone()), true, DEFAULT_REPLAY_LIMIT);
        cache.record("hello", "hi there");
        cache.record("how are you", "great");

        let saved = store.snapshot().expect("history should be saved");
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].user_message, "hello");
        assert_eq!(saved[1].assistant_reply, "great");
    }

    #[test]
    fn test_record_memory_only_when_disabled() {
        let store = MemoryStore::new();
        let mut cache = HistoryCache::new(Box::new(store.clone()), false, DEFAULT_REPLAY_LIMIT);
        cache.record("hello", "hi there");
        assert_eq!(cache.entries().len(), 1);
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn test_clear_empties_memory_and_store() {
        let store = MemoryStore::with_entries(entries(3));
        let mut cache = HistoryCache::new(Box::new(store.clone()), true, DEFAULT_REPLAY_LIMIT);
        cache.load_and_replay(&mut Conversation::new());
        cache.clear();

        assert!(cache.entries().is_empty());
        assert!(store.snapshot().is_none());

        let mut conversation = Conversation::new();
        assert_eq!(cache.load_and_replay(&mut conversation), 0);
        assert!(conversation.is_empty());
    }

    #[test]
    fn test_serialized_keys_are_camel_case() {
        let entry = HistoryEntry::new("hi", "hello");
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("userMessage").is_some());
        assert!(json.get("assistantReply").is_some());
        assert!(json.get("timestamp").is_some());
    }

    #[test]
    fn test_reads_ai_response_alias() {
        let json = r#"[{"userMessage":"hi","aiResponse":"hey","timestamp":"2024-02-14T20:15:00Z"}]"#;
        let parsed: Vec<HistoryEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed[0].assistant_reply, "hey");
    }
}
