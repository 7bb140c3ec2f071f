use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use super::{CacheData, CacheError, CacheRecord, PhoneticCache, MAGIC, VERSION};

impl PhoneticCache {
    /// Serialize to bytes (JYPC format).
    pub fn to_bytes(&self) -> Result<Vec<u8>, CacheError> {
        let body = bincode::serialize(&self.to_data()).map_err(CacheError::Serialize)?;

        let mut buf = Vec::with_capacity(5 + body.len());
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&body);
        Ok(buf)
    }

    /// Deserialize from bytes (JYPC format).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CacheError> {
        if bytes.len() < 5 {
            return Err(CacheError::InvalidHeader);
        }
        if &bytes[0..4] != MAGIC {
            return Err(CacheError::InvalidMagic);
        }
        if bytes[4] != VERSION {
            return Err(CacheError::UnsupportedVersion(bytes[4]));
        }
        let data: CacheData = bincode::deserialize(&bytes[5..]).map_err(CacheError::Deserialize)?;
        Ok(Self::from_data(data))
    }

    /// Write the cache to `path`, creating parent directories.
    ///
    /// The bytes go to a sibling `.tmp` file that is then renamed over
    /// `path`, so a reader never sees a half-written cache.
    pub fn save(&self, path: &Path) -> Result<(), CacheError> {
        let bytes = self.to_bytes()?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let staging = path.with_extension("tmp");
        fs::write(&staging, &bytes)?;
        fs::rename(&staging, path)?;
        debug!(path = %path.display(), entries = self.len(), "cache saved");
        Ok(())
    }

    /// Read a cache file. A missing file is an empty cache; a file that
    /// exists but is not a JYPC cache is an error.
    pub fn open(path: &Path) -> Result<Self, CacheError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(e.into()),
        };
        Self::from_bytes(&bytes)
    }

    /// Open for a run: any load failure starts from an empty cache.
    /// `persist` will write back to `path`.
    pub fn load_or_default(path: &Path) -> Self {
        let mut cache = Self::open(path).unwrap_or_else(|e| {
            debug!(path = %path.display(), "cache load failed, starting cold: {e}");
            Self::new()
        });
        cache.path = Some(path.to_path_buf());
        cache
    }

    /// Best-effort write back to the path given to `load_or_default`.
    pub fn persist(&self) -> Result<(), CacheError> {
        match &self.path {
            Some(path) => self.save(path),
            None => Ok(()),
        }
    }

    fn to_data(&self) -> CacheData {
        let mut records = Vec::with_capacity(self.len());
        for (kind, inner) in &self.entries {
            for (key, value) in inner {
                records.push(CacheRecord {
                    kind: *kind,
                    key: key.clone(),
                    value: value.clone(),
                });
            }
        }
        CacheData { records }
    }

    fn from_data(data: CacheData) -> Self {
        let mut cache = Self::new();
        for rec in data.records {
            cache.insert(rec.kind, &rec.key, rec.value);
        }
        cache
    }
}
