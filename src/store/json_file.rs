/*!
 * JSON file storage backend.
 *
 * Each key is stored as `<data_dir>/<key>.json`, wrapped in an envelope that
 * carries a SHA-256 checksum of the payload. Writes go to a temporary file in
 * the same directory which is then renamed over the target, so a crash never
 * leaves a half-written file behind.
 *
 * A file whose envelope does not parse or whose checksum does not match is
 * moved aside to `<key>.json.corrupt-<millis>` and the key reads as absent,
 * so the next write starts a fresh file. Only I/O failures are errors.
 */

use anyhow::{bail, Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::StorageBackend;

/// Current version of the envelope format
pub const ENVELOPE_VERSION: u32 = 1;

/// On-disk wrapper around a stored value
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    /// Format version
    version: u32,
    /// SHA-256 of `payload`
    checksum: String,
    /// The stored value
    payload: String,
}

fn checksum(payload: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Key/value storage as checksummed JSON files in a directory
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    data_dir: PathBuf,
}

impl JsonFileBackend {
    /// Use `data_dir`, creating it if needed
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;
        Ok(Self { data_dir })
    }

    /// File that holds `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.data_dir.join(format!("{}.json", file_name.to_lowercase()))
    }

    /// Where a corrupt copy of `path` is moved
    pub fn corrupt_backup_path(path: &Path, millis: i64) -> PathBuf {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(format!(".corrupt-{}", millis));
        path.with_file_name(name)
    }

    fn quarantine(path: &Path) -> Result<PathBuf> {
        let backup = Self::corrupt_backup_path(path, chrono::Utc::now().timestamp_millis());
        std::fs::rename(path, &backup)
            .with_context(|| format!("Failed to move corrupt storage file aside: {:?}", path))?;
        Ok(backup)
    }

    fn unwrap_envelope(path: &Path, content: &str) -> Result<String> {
        let envelope: Envelope = serde_json::from_str(content)
            .with_context(|| format!("Failed to parse storage envelope: {:?}", path))?;

        if envelope.version != ENVELOPE_VERSION {
            bail!(
                "Unsupported storage version {} in {:?} (expected {})",
                envelope.version,
                path,
                ENVELOPE_VERSION
            );
        }

        if checksum(&envelope.payload) != envelope.checksum {
            bail!("Integrity check failed for {:?}: checksum mismatch", path);
        }

        Ok(envelope.payload)
    }
}

impl StorageBackend for JsonFileBackend {
    fn name(&self) -> &str {
        "json_file"
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read storage file: {:?}", path))?;

        match Self::unwrap_envelope(&path, &content) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) => {
                let backup = Self::quarantine(&path)?;
                warn!("Discarding corrupt storage file ({:#}); kept a copy at {:?}", e, backup);
                Ok(None)
            }
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let envelope = Envelope {
            version: ENVELOPE_VERSION,
            checksum: checksum(value),
            payload: value.to_string(),
        };
        let json = serde_json::to_string_pretty(&envelope)
            .context("Failed to serialize storage envelope")?;

        let mut temp = NamedTempFile::new_in(&self.data_dir)
            .with_context(|| format!("Failed to create temporary file in {:?}", self.data_dir))?;
        temp.write_all(json.as_bytes())
            .context("Failed to write temporary storage file")?;
        temp.as_file().sync_all().context("Failed to sync temporary storage file")?;
        temp.persist(&path)
            .with_context(|| format!("Failed to replace storage file: {:?}", path))?;

        debug!("Wrote {} bytes to {:?}", json.len(), path);
        Ok(())
    }
}
