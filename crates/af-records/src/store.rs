//! Session storage API.
//!
//! Layout: `<root>/<session_id>/{manifest.json, readings.jsonl, commands.jsonl}`.

use crate::types::{CommandRecord, SessionManifest};
use crate::{RecordsError, RecordsResult};
use af_telemetry::Reading;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Component, Path, PathBuf};

const MANIFEST: &str = "manifest.json";
const READINGS: &str = "readings.jsonl";
const COMMANDS: &str = "commands.jsonl";

#[derive(Clone)]
pub struct SessionStore {
    root_dir: PathBuf,
}

impl SessionStore {
    pub fn new(root_dir: PathBuf) -> RecordsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    /// Directory of one session. The id must be a single plain path
    /// component so it cannot point outside the root.
    fn session_dir(&self, session_id: &str) -> RecordsResult<PathBuf> {
        let mut components = Path::new(session_id).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None)
                if *name == *session_id && !session_id.contains(['/', '\\']) =>
            {
                Ok(self.root_dir.join(session_id))
            }
            _ => Err(RecordsError::InvalidSessionId {
                session_id: session_id.to_string(),
            }),
        }
    }

    pub fn has_session(&self, session_id: &str) -> bool {
        self.session_dir(session_id)
            .is_ok_and(|dir| dir.join(MANIFEST).exists())
    }

    pub fn save_session(
        &self,
        manifest: &SessionManifest,
        readings: &[Reading],
        commands: &[CommandRecord],
    ) -> RecordsResult<()> {
        let dir = self.session_dir(&manifest.session_id)?;
        fs::create_dir_all(&dir)?;

        fs::write(dir.join(MANIFEST), serde_json::to_string_pretty(manifest)?)?;
        write_jsonl(&dir.join(READINGS), readings)?;
        write_jsonl(&dir.join(COMMANDS), commands)?;

        Ok(())
    }

    pub fn load_manifest(&self, session_id: &str) -> RecordsResult<SessionManifest> {
        let path = self.session_dir(session_id)?.join(MANIFEST);
        if !path.exists() {
            return Err(RecordsError::SessionNotFound {
                session_id: session_id.to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn load_readings(&self, session_id: &str) -> RecordsResult<Vec<Reading>> {
        read_jsonl(&self.session_dir(session_id)?.join(READINGS), session_id)
    }

    pub fn load_commands(&self, session_id: &str) -> RecordsResult<Vec<CommandRecord>> {
        read_jsonl(&self.session_dir(session_id)?.join(COMMANDS), session_id)
    }

    /// All sessions with a readable manifest, oldest first.
    pub fn list_sessions(&self) -> RecordsResult<Vec<SessionManifest>> {
        let mut sessions = Vec::new();

        if !self.root_dir.exists() {
            return Ok(sessions);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                let session_id = entry.file_name().to_string_lossy().to_string();
                if let Ok(manifest) = self.load_manifest(&session_id) {
                    sessions.push(manifest);
                }
            }
        }

        sessions.sort_by(|a, b| a.started_at.cmp(&b.started_at));
        Ok(sessions)
    }

    pub fn delete_session(&self, session_id: &str) -> RecordsResult<()> {
        let dir = self.session_dir(session_id)?;
        if dir.exists() {
            fs::remove_dir_all(dir)?;
        }
        Ok(())
    }
}

fn write_jsonl<T: Serialize>(path: &Path, items: &[T]) -> RecordsResult<()> {
    let mut content = String::new();
    for item in items {
        content.push_str(&serde_json::to_string(item)?);
        content.push('\n');
    }
    fs::write(path, content)?;
    Ok(())
}

fn read_jsonl<T: DeserializeOwned>(path: &Path, session_id: &str) -> RecordsResult<Vec<T>> {
    if !path.exists() {
        return Err(RecordsError::SessionNotFound {
            session_id: session_id.to_string(),
        });
    }

    let content = fs::read_to_string(path)?;
    let mut items = Vec::new();
    for line in content.lines() {
        if !line.trim().is_empty() {
            items.push(serde_json::from_str(line)?);
        }
    }
    Ok(items)
}
