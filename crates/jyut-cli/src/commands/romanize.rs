//! Default action: romanize a batch, then write the cache back.

use std::path::Path;

use tracing::{debug, warn};

use jyut_core::backend::Transliterator;
use jyut_core::cache::PhoneticCache;
use jyut_core::resolver::Resolver;

use super::batch::{run_batch, BatchError, BatchOptions};

/// Resolver over the cache file at `cache_path`; an unreadable file starts
/// an empty cache that will replace it.
pub fn open_resolver(cache_path: &Path, backend: Box<dyn Transliterator>) -> Resolver {
    let cache = PhoneticCache::load_or_default(cache_path);
    debug!(path = %cache_path.display(), entries = cache.len(), "cache loaded");
    Resolver::new(backend, cache)
}

/// Run the batch and persist the cache on every outcome, so lookups that
/// completed before a failure are not paid for again.
pub fn romanize(
    resolver: &mut Resolver,
    lines: &[String],
    opts: &BatchOptions,
) -> Result<Vec<String>, BatchError> {
    let result = run_batch(resolver, lines, opts);
    let cache = resolver.cache();
    if let Err(e) = cache.persist() {
        let path = cache.path().map(|p| p.display().to_string()).unwrap_or_default();
        warn!("could not save cache {path}: {e}");
    }
    result
}
