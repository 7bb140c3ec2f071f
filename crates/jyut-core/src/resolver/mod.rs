//! Reading resolution with a collect-then-resolve protocol.
//!
//! A run first walks all of its input in [`Phase::Collecting`], where every
//! lookup is only recorded; [`Resolver::finish_collecting`] then resolves
//! everything that was missed with one batch call per lookup kind, and the
//! second walk in [`Phase::Resolving`] is served from the cache.

pub mod pinyin;

use tracing::debug_span;

use crate::backend::{BackendError, Transliterator};
use crate::cache::{LookupKind, PhoneticCache};
use crate::settings::settings;

/// Returned for every Jyutping lookup during collection.
pub const PLACEHOLDER_JYUTPING: &str = "aai1";
/// Returned for every Pinyin normalization during collection.
pub const PLACEHOLDER_PINYIN: &str = "a5";

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("lookup backend failed: {0}")]
    Backend(#[from] BackendError),

    #[error("batch {kind} lookup returned {got} results for {expected} inputs")]
    BatchSizeMismatch {
        kind: LookupKind,
        expected: usize,
        got: usize,
    },

    #[error("pinyin normalizer returned nothing for {0:?}")]
    EmptyNormalization(String),

    #[error("no Cantonese reading for {0:?}")]
    NoReading(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Collecting,
    Resolving,
}

pub struct Resolver {
    backend: Box<dyn Transliterator>,
    cache: PhoneticCache,
    cantonese_scheme: String,
    pinyin_scheme: String,
    phase: Phase,
}

impl Resolver {
    /// Resolver using the scheme ids from the global settings.
    pub fn new(backend: Box<dyn Transliterator>, cache: PhoneticCache) -> Self {
        let s = &settings().backend;
        Self::with_schemes(backend, cache, &s.cantonese_scheme, &s.pinyin_scheme)
    }

    pub fn with_schemes(
        backend: Box<dyn Transliterator>,
        cache: PhoneticCache,
        cantonese_scheme: &str,
        pinyin_scheme: &str,
    ) -> Self {
        Self {
            backend,
            cache,
            cantonese_scheme: cantonese_scheme.to_string(),
            pinyin_scheme: pinyin_scheme.to_string(),
            phase: Phase::Collecting,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cache(&self) -> &PhoneticCache {
        &self.cache
    }

    pub fn into_cache(self) -> PhoneticCache {
        self.cache
    }

    /// Resolve everything queued so far (Jyutping first, then Pinyin) and
    /// switch to [`Phase::Resolving`].
    pub fn finish_collecting(&mut self) -> Result<(), ResolveError> {
        let _span = debug_span!("finish_collecting").entered();
        self.drain(LookupKind::Jyutping)?;
        self.drain(LookupKind::Pinyin)?;
        self.phase = Phase::Resolving;
        Ok(())
    }

    /// Jyutping for `text`.
    ///
    /// While collecting this only queues `text` and returns
    /// [`PLACEHOLDER_JYUTPING`]. When resolving, an empty reading is an error
    /// if `must_succeed` is set and `""` otherwise.
    pub fn resolve_jyutping(
        &mut self,
        text: &str,
        must_succeed: bool,
    ) -> Result<String, ResolveError> {
        let key = settings().apply_readings(text);
        let reading = match self.phase {
            Phase::Collecting => {
                self.cache.lookup_or_queue(LookupKind::Jyutping, &key);
                return Ok(PLACEHOLDER_JYUTPING.to_string());
            }
            Phase::Resolving => {
                self.drain(LookupKind::Jyutping)?;
                self.lookup(LookupKind::Jyutping, &key)?
            }
        };

        if reading.trim().is_empty() {
            if must_succeed {
                return Err(ResolveError::NoReading(text.to_string()));
            }
            return Ok(String::new());
        }
        Ok(reading)
    }

    /// Tone-numbered Pinyin (`zhong1guo2`) for Pinyin written with tone marks.
    ///
    /// While collecting this only queues `pinyin` and returns
    /// [`PLACEHOLDER_PINYIN`].
    pub fn normalize_pinyin(&mut self, pinyin: &str) -> Result<String, ResolveError> {
        if pinyin.trim().is_empty() {
            return Ok(String::new());
        }
        let raw = match self.phase {
            Phase::Collecting => {
                self.cache.lookup_or_queue(LookupKind::Pinyin, pinyin);
                return Ok(PLACEHOLDER_PINYIN.to_string());
            }
            Phase::Resolving => {
                self.drain(LookupKind::Pinyin)?;
                self.lookup(LookupKind::Pinyin, pinyin)?
            }
        };

        if raw.trim().is_empty() {
            return Err(ResolveError::EmptyNormalization(pinyin.to_string()));
        }
        Ok(pinyin::rewrite_normalized(&raw))
    }

    /// Queue a Pinyin line together with each of its words and each
    /// hyphen-separated part, which is how the grouping step looks them up.
    pub fn queue_pinyin(&mut self, pinyin: &str) {
        if pinyin.trim().is_empty() {
            return;
        }
        self.cache.lookup_or_queue(LookupKind::Pinyin, pinyin);
        for word in pinyin.split_whitespace() {
            for part in word.split('-').filter(|p| !p.is_empty()) {
                self.cache.lookup_or_queue(LookupKind::Pinyin, part);
            }
        }
    }

    fn drain(&mut self, kind: LookupKind) -> Result<(), ResolveError> {
        if self.cache.pending_len(kind) == 0 {
            return Ok(());
        }
        let scheme = match kind {
            LookupKind::Jyutping => &self.cantonese_scheme,
            LookupKind::Pinyin => &self.pinyin_scheme,
        };
        self.cache.drain_batch(kind, self.backend.as_ref(), scheme)?;
        Ok(())
    }

    /// Cached value, or a single (unbatched) lookup that is then cached.
    fn lookup(&mut self, kind: LookupKind, key: &str) -> Result<String, ResolveError> {
        if let Some(value) = self.cache.get(kind, key) {
            return Ok(value.to_string());
        }
        let scheme = match kind {
            LookupKind::Jyutping => &self.cantonese_scheme,
            LookupKind::Pinyin => &self.pinyin_scheme,
        };
        let value = kind.post_process(&self.backend.transliterate(scheme, key)?);
        self.cache.insert(kind, key, value.clone());
        Ok(value)
    }
}
