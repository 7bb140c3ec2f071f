//! Persistent phonetic cache with batched, deduplicated lookups.
//!
//! Maps (lookup kind, input text) to the transcription returned by the
//! lookup backend. Entries are append-only: once a key is present it is
//! never looked up again for the lifetime of the cache file. Keys missed
//! during a collection pass are queued and resolved later in one batch call.

mod persistence;

use std::collections::{HashMap, HashSet};
use std::env;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use crate::backend::Transliterator;
use crate::resolver::ResolveError;
use crate::settings::CacheSettings;

const MAGIC: &[u8; 4] = b"JYPC";
const VERSION: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookupKind {
    /// hanzi → Jyutping
    Jyutping,
    /// Pinyin with tone marks → tone-numbered Pinyin
    Pinyin,
}

impl LookupKind {
    /// Normalization applied to backend output before it is cached.
    ///
    /// The Cantonese backend data follows Canton usage, where the split of
    /// tone 1 into 1 and 7 is contested, so 7 is folded into 1. It also
    /// capitalises syllables at random, hence the lower-casing.
    pub fn post_process(self, raw: &str) -> String {
        match self {
            LookupKind::Jyutping => raw.replace('7', "1").to_lowercase(),
            LookupKind::Pinyin => raw.to_string(),
        }
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKind::Jyutping => f.write_str("jyutping"),
            LookupKind::Pinyin => f.write_str("pinyin"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid header (too short)")]
    InvalidHeader,

    #[error("invalid magic bytes (expected JYPC)")]
    InvalidMagic,

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    #[error("serialization error: {0}")]
    Serialize(bincode::Error),

    #[error("deserialization error: {0}")]
    Deserialize(bincode::Error),
}

/// Insertion-ordered set of keys awaiting a batch lookup.
#[derive(Default)]
struct PendingQueue {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl PendingQueue {
    fn push(&mut self, key: &str) {
        if self.seen.insert(key.to_string()) {
            self.order.push(key.to_string());
        }
    }

    fn take(&mut self) -> Vec<String> {
        self.seen.clear();
        std::mem::take(&mut self.order)
    }
}

#[derive(Default)]
pub struct PhoneticCache {
    /// kind → (input → transcription)
    entries: HashMap<LookupKind, HashMap<String, String>>,
    jyutping_pending: PendingQueue,
    pinyin_pending: PendingQueue,
    /// Where `persist` writes; set by `load_or_default`.
    path: Option<PathBuf>,
}

/// Flat serialization format for bincode.
#[derive(Serialize, Deserialize)]
struct CacheData {
    records: Vec<CacheRecord>,
}

#[derive(Serialize, Deserialize)]
struct CacheRecord {
    kind: LookupKind,
    key: String,
    value: String,
}

/// Resolve the cache file location: explicit flag, then the configured
/// environment variable, then a fixed file in the temp directory.
pub fn resolve_path(flag: Option<&Path>, s: &CacheSettings) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    match env::var_os(&s.env_var) {
        Some(v) if !v.is_empty() => PathBuf::from(v),
        _ => env::temp_dir().join(&s.file_name),
    }
}

impl PhoneticCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: LookupKind, key: &str) -> Option<&str> {
        self.entries
            .get(&kind)
            .and_then(|inner| inner.get(key))
            .map(String::as_str)
    }

    pub fn contains(&self, kind: LookupKind, key: &str) -> bool {
        self.get(kind, key).is_some()
    }

    /// Insert a value. Existing keys are never overwritten; returns whether
    /// the value was stored.
    pub fn insert(&mut self, kind: LookupKind, key: &str, value: String) -> bool {
        let inner = self.entries.entry(kind).or_default();
        if inner.contains_key(key) {
            return false;
        }
        inner.insert(key.to_string(), value);
        true
    }

    /// Cached value, or queue `key` for the next batch and return `None`.
    pub fn lookup_or_queue(&mut self, kind: LookupKind, key: &str) -> Option<&str> {
        if !self.contains(kind, key) {
            self.queue_mut(kind).push(key);
            return None;
        }
        self.get(kind, key)
    }

    pub fn pending_len(&self, kind: LookupKind) -> usize {
        match kind {
            LookupKind::Jyutping => self.jyutping_pending.order.len(),
            LookupKind::Pinyin => self.pinyin_pending.order.len(),
        }
    }

    /// Send every pending key of `kind` to `backend` in one batch call and
    /// cache the results. An empty queue makes no call.
    ///
    /// A result count different from the input count means the backend is
    /// broken; nothing is cached in that case.
    pub fn drain_batch(
        &mut self,
        kind: LookupKind,
        backend: &dyn Transliterator,
        scheme: &str,
    ) -> Result<HashMap<String, String>, ResolveError> {
        let keys = self.queue_mut(kind).take();
        if keys.is_empty() {
            return Ok(HashMap::new());
        }
        let _span = debug_span!("drain_batch", %kind, count = keys.len()).entered();

        let values = backend.transliterate_batch(scheme, &keys)?;
        if values.len() != keys.len() {
            return Err(ResolveError::BatchSizeMismatch {
                kind,
                expected: keys.len(),
                got: values.len(),
            });
        }

        let mut resolved = HashMap::with_capacity(keys.len());
        for (key, raw) in keys.into_iter().zip(values) {
            let value = kind.post_process(&raw);
            self.insert(kind, &key, value.clone());
            resolved.insert(key, value);
        }
        debug!(resolved = resolved.len());
        Ok(resolved)
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of cached entries of one kind.
    pub fn count(&self, kind: LookupKind) -> usize {
        self.entries.get(&kind).map_or(0, HashMap::len)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn queue_mut(&mut self, kind: LookupKind) -> &mut PendingQueue {
        match kind {
            LookupKind::Jyutping => &mut self.jyutping_pending,
            LookupKind::Pinyin => &mut self.pinyin_pending,
        }
    }
}
