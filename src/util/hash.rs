//! Hashing utilities for checksums and package ids.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

/// Compute SHA256 hash of a file.
pub fn sha256_file(path: &Path) -> Result<String> {
    let file = File::open(path)
        .with_context(|| format!("failed to open file for hashing: {}", path.display()))?;

    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .with_context(|| format!("failed to read {}", path.display()))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// A hasher for building fingerprints from multiple components.
#[derive(Default)]
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    /// Create a new fingerprint builder.
    pub fn new() -> Self {
        Fingerprint {
            hasher: Sha256::new(),
        }
    }

    /// Add a string component to the fingerprint.
    pub fn update_str(&mut self, s: &str) -> &mut Self {
        self.hasher.update(s.as_bytes());
        self.hasher.update(b"\0"); // Separator
        self
    }

    /// Add an optional string component.
    pub fn update_opt(&mut self, opt: Option<&str>) -> &mut Self {
        match opt {
            Some(s) => {
                self.hasher.update(b"\x01"); // Present marker
                self.update_str(s);
            }
            None => {
                self.hasher.update(b"\x00"); // Absent marker
            }
        }
        self
    }

    /// Add a boolean component.
    pub fn update_bool(&mut self, b: bool) -> &mut Self {
        self.hasher.update([b as u8]);
        self
    }

    /// Finalize and return the fingerprint as a hex string.
    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }

    /// Finalize and return a short fingerprint (first 16 chars).
    pub fn finish_short(self) -> String {
        self.finish()[..16].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sha256_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("LICENSE");
        std::fs::write(&path, "hello").unwrap();

        let hash = sha256_file(&path).unwrap();
        assert_eq!(
            hash,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_fingerprint_optional_is_not_empty_string() {
        let absent = {
            let mut fp = Fingerprint::new();
            fp.update_str("Linux").update_opt(None);
            fp.finish_short()
        };
        let empty = {
            let mut fp = Fingerprint::new();
            fp.update_str("Linux").update_opt(Some(""));
            fp.finish_short()
        };

        assert_eq!(absent.len(), 16);
        assert_ne!(absent, empty);
    }

    #[test]
    fn test_fingerprint_bool_order_matters() {
        let a = {
            let mut fp = Fingerprint::new();
            fp.update_bool(true).update_bool(false);
            fp.finish()
        };
        let b = {
            let mut fp = Fingerprint::new();
            fp.update_bool(false).update_bool(true);
            fp.finish()
        };
        assert_ne!(a, b);
    }
}
