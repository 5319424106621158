use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Result;
use async_trait::async_trait;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::debug;

/// A local string-keyed store holding one text blob per key. The façade
/// treats this as an opaque service; the file-backed implementation below is
/// the only one shipped, tests mock it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the blob stored under `key`, or `None` if the key was never
    /// written (or has been removed).
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the whole value under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes every listed key in one batch. Missing keys are not an error.
    async fn remove_many<'a>(&self, keys: &[&'a str]) -> Result<()>;
}

/// Store keeping each key as a `<key>.json` file inside the application
/// directory.
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    pub fn new(dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&dir)?;

        Ok(Self { dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    async fn replace_contents(file: &mut File, value: &str) -> Result<(), std::io::Error> {
        file.set_len(0).await?;
        file.write_all(value.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn read_inner(path: &Path) -> Result<String, std::io::Error> {
        debug!("Reading {path:?}");
        let mut file = File::open(path).await?;
        file.lock_shared()?;
        let mut contents = String::new();
        let result = file.read_to_string(&mut contents).await;
        file.unlock_async().await?;
        result?;
        Ok(contents)
    }
}

#[async_trait]
impl KeyValueStore for FileKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match Self::read_inner(&self.key_path(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e)?,
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.key_path(key))
            .await?;

        // Semi-safe acquire-release for a file
        file.lock_exclusive()?;
        let result = Self::replace_contents(&mut file, value).await;
        file.unlock_async().await?;
        result?;
        Ok(())
    }

    async fn remove_many<'a>(&self, keys: &[&'a str]) -> Result<()> {
        for key in keys {
            match tokio::fs::remove_file(self.key_path(key)).await {
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => Err(e)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use crate::utils::logging::TEST_LOGGING;

    use super::{FileKvStore, KeyValueStore};

    #[tokio::test]
    async fn test_absent_key_reads_as_none() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let store = FileKvStore::new(dir.path().to_owned())?;

        assert_eq!(store.get("performance_metrics").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_then_get_roundtrips() -> Result<()> {
        let dir = tempdir()?;
        let store = FileKvStore::new(dir.path().to_owned())?;

        store.set("app_settings", "{\"theme\":\"dark\"}").await?;
        assert_eq!(
            store.get("app_settings").await?.as_deref(),
            Some("{\"theme\":\"dark\"}")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_set_replaces_whole_value() -> Result<()> {
        let dir = tempdir()?;
        let store = FileKvStore::new(dir.path().to_owned())?;

        store.set("performance_metrics", "a long initial payload").await?;
        store.set("performance_metrics", "[]").await?;
        assert_eq!(store.get("performance_metrics").await?.as_deref(), Some("[]"));
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_many_tolerates_missing_keys() -> Result<()> {
        let dir = tempdir()?;
        let store = FileKvStore::new(dir.path().to_owned())?;

        store.set("performance_goals", "[]").await?;
        store
            .remove_many(&["performance_goals", "never_written"])
            .await?;
        assert_eq!(store.get("performance_goals").await?, None);
        Ok(())
    }
}
