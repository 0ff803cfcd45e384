pub mod file;
pub mod session;
pub mod traits;

use std::path::PathBuf;
use anyhow::{anyhow, Result};

// Re-export
pub use file::FileTimeEntryRepository;
pub use session::FileSessionStore;
pub use traits::{SessionStore, TimeEntryRepository};

/// `~/.sirme`, unless the caller supplies a directory.
pub fn resolve_data_dir(base_dir: Option<PathBuf>) -> Result<PathBuf> {
    match base_dir {
        Some(dir) => Ok(dir),
        None => {
            let home_dir = dirs::home_dir()
                .ok_or_else(|| anyhow!("Could not determine home directory"))?;
            Ok(home_dir.join(".sirme"))
        }
    }
}
