//! JSON file
//!
//! The state of each user is kept in a pretty-printed JSON document `<user>.json` inside the
//! data directory. Documents are replaced atomically by writing to a temporary file first.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use club38_domain as domain;
use log::debug;

#[derive(Debug, Clone)]
pub struct JsonFile {
    dir: PathBuf,
}

impl JsonFile {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, user: &domain::UserID) -> PathBuf {
        self.dir.join(format!("{user}.json"))
    }
}

fn storage_error(err: std::io::Error) -> domain::StorageError {
    domain::StorageError::Other(Box::new(err))
}

impl domain::AppStateRepository for JsonFile {
    async fn read_state(
        &self,
        user: &domain::UserID,
    ) -> Result<Option<domain::AppState>, domain::ReadError> {
        let path = self.path(user);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("{} does not exist", path.display());
                return Ok(None);
            }
            Err(err) => return Err(storage_error(err).into()),
        };
        let state = serde_json::from_str(&content)
            .map_err(|err| domain::ReadError::Other(Box::new(err)))?;
        Ok(Some(state))
    }

    async fn write_state(
        &self,
        user: &domain::UserID,
        state: &domain::AppState,
    ) -> Result<(), domain::UpdateError> {
        let content = serde_json::to_string_pretty(state)
            .map_err(|err| domain::UpdateError::Other(Box::new(err)))?;
        let path = self.path(user);
        let temporary = path.with_extension("json.tmp");

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(storage_error)?;
        tokio::fs::write(&temporary, content)
            .await
            .map_err(storage_error)?;
        tokio::fs::rename(&temporary, &path)
            .await
            .map_err(storage_error)?;

        debug!("wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use club38_domain::AppStateRepository;
    use pretty_assertions::assert_eq;

    use super::*;

    fn user(id: &str) -> domain::UserID {
        domain::UserID::new(id).unwrap()
    }

    fn state() -> domain::AppState {
        let mut state = domain::AppState {
            is_onboarded: true,
            discipline_mode: domain::DisciplineMode::Intense,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..domain::AppState::default()
        };
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 2, 18, 0, 0).unwrap();
        state.set_history.record(
            "Lat Pulldowns",
            1,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            domain::LoggedSet {
                reps: 12,
                weight: 50.0,
                timestamp,
            },
        );
        state
            .personal_bests
            .offer("Lat Pulldowns", 50.0, 12, timestamp);
        state
    }

    #[tokio::test]
    async fn test_read_unknown_user() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonFile::new(dir.path());
        assert!(repository.read_state(&user("bob")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_and_read_state() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonFile::new(dir.path().join("data"));

        repository.write_state(&user("alice"), &state()).await.unwrap();

        assert_eq!(
            repository.read_state(&user("alice")).await.unwrap(),
            Some(state())
        );
        assert!(repository.read_state(&user("bob")).await.unwrap().is_none());
        assert!(dir.path().join("data").join("alice.json").exists());
        assert!(!dir.path().join("data").join("alice.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_write_replaces_state() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonFile::new(dir.path());

        repository.write_state(&user("alice"), &state()).await.unwrap();
        repository
            .write_state(&user("alice"), &domain::AppState::default())
            .await
            .unwrap();

        assert_eq!(
            repository.read_state(&user("alice")).await.unwrap(),
            Some(domain::AppState::default())
        );
    }

    #[tokio::test]
    async fn test_read_corrupt_state() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("alice.json"), "{ not json").unwrap();
        let repository = JsonFile::new(dir.path());

        assert!(matches!(
            repository.read_state(&user("alice")).await,
            Err(domain::ReadError::Other(_))
        ));
    }

    #[tokio::test]
    async fn test_document_format() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonFile::new(dir.path());
        repository.write_state(&user("alice"), &state()).await.unwrap();

        let content = std::fs::read_to_string(dir.path().join("alice.json")).unwrap();
        let document = serde_json::from_str::<serde_json::Value>(&content).unwrap();
        assert!(content.contains('\n'));
        assert_eq!(document["isOnboarded"], true);
        assert_eq!(document["disciplineMode"], "intense");
        assert_eq!(document["setHistory"]["Lat Pulldowns"][0]["weekNumber"], 1);
    }
}
