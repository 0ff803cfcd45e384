use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::model::session::Session;
use crate::repository::resolve_data_dir;
use crate::repository::traits::SessionStore;

const SESSION_FILE_NAME: &str = "session.json";

pub struct FileSessionStore {
    file_path: PathBuf,
}

impl FileSessionStore {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut path = resolve_data_dir(base_dir)?;
        fs::create_dir_all(&path)?;
        path.push(SESSION_FILE_NAME);
        Ok(FileSessionStore { file_path: path })
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        if !self.file_path.exists() {
            return Ok(None);
        }
        let file = File::open(&self.file_path)?;
        let session = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Corrupt session file {}", self.file_path.display()))?;
        Ok(Some(session))
    }

    fn save(&self, session: &Session) -> Result<()> {
        let mut writer = BufWriter::new(File::create(&self.file_path)?);
        serde_json::to_writer_pretty(&mut writer, session)?;
        writer.flush()?;
        info!(user = %session.user.name, "Session saved");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.file_path.exists() {
            fs::remove_file(&self.file_path)?;
        }
        Ok(())
    }
}
