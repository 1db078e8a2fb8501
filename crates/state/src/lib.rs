//! JSON-file ledger store.
//!
//! The dedup ledger is a single flat JSON document. Load failures of any
//! kind degrade to an empty ledger: a duplicate notification beats a
//! silently dropped signal. Saves go through a sibling temp file and a
//! rename, so a crash mid-write never corrupts the existing file.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, warn};

use common::{Ledger, Result, StateStore};

/// Flat-file `StateStore`.
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut os = self.path.as_os_str().to_owned();
        os.push(".tmp");
        PathBuf::from(os)
    }
}

#[async_trait]
impl StateStore for JsonStateStore {
    async fn load(&self) -> Ledger {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(ledger) => ledger,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Corrupt ledger file — starting empty");
                    Ledger::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No ledger file yet");
                Ledger::default()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read ledger — starting empty");
                Ledger::default()
            }
        }
    }

    async fn save(&self, ledger: &Ledger) -> Result<()> {
        let json = serde_json::to_string(ledger)?;
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
