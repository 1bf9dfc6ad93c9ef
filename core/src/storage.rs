use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::models::{LogEntry, Profile};

pub const PROFILE_KEY: &str = "astrasync_profile";
pub const LOGS_KEY: &str = "astrasync_logs";

/// Maks antall dagsinnslag som beholdes (nyeste først).
pub const MAX_LOGS: usize = 60;

/// Nøkkel/verdi-lager med strengverdier (samme kontrakt som localStorage).
pub trait KeyValueBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    items: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Én `<nøkkel>.json` per nøkkel i en katalog.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path_for(key);
        std::fs::write(&path, value).map_err(|source| StoreError::Io { path, source })
    }
}

/// Profil og dagslogg over et injisert lager.
#[derive(Debug, Clone)]
pub struct HealthRepository<B> {
    backend: B,
}

impl<B: KeyValueBackend> HealthRepository<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_inner(self) -> B {
        self.backend
    }

    // Tom streng regnes som fraværende verdi.
    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.backend.get(key)? {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StoreError::Corrupt { key: key.to_string(), source }),
            _ => Ok(None),
        }
    }

    fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|source| StoreError::Encode { key: key.to_string(), source })?;
        self.backend.set(key, &json)
    }

    /// Mangler profilen, returneres en tom default-profil.
    pub fn load_profile(&self) -> Result<Profile, StoreError> {
        match self.read::<Profile>(PROFILE_KEY)? {
            Some(profile) => {
                log::debug!("Profil lastet (user_id={:?})", profile.user_id);
                Ok(profile)
            }
            None => {
                log::info!("Fant ingen profil under {PROFILE_KEY}, returnerer default");
                Ok(Profile::default())
            }
        }
    }

    pub fn save_profile(&mut self, profile: &Profile) -> Result<(), StoreError> {
        self.write(PROFILE_KEY, profile)?;
        log::info!("Profil lagret (user_id={:?})", profile.user_id);
        Ok(())
    }

    /// Nyeste først, slik de ble lagret.
    pub fn load_logs(&self) -> Result<Vec<LogEntry>, StoreError> {
        Ok(self.read::<Vec<LogEntry>>(LOGS_KEY)?.unwrap_or_default())
    }

    /// Lagrer maks `MAX_LOGS` innslag; resten kastes.
    pub fn save_logs(&mut self, logs: &[LogEntry]) -> Result<(), StoreError> {
        let kept = &logs[..logs.len().min(MAX_LOGS)];
        self.write(LOGS_KEY, kept)
    }

    /// Legg nytt innslag først og kutt til `MAX_LOGS`. Returnerer ny lengde.
    pub fn add_log(&mut self, entry: LogEntry) -> Result<usize, StoreError> {
        let mut logs = self.load_logs()?;
        logs.insert(0, entry);
        logs.truncate(MAX_LOGS);
        self.save_logs(&logs)?;
        log::info!("Dagslogg lagret ({} innslag)", logs.len());
        Ok(logs.len())
    }

    pub fn recent_logs(&self, n: usize) -> Result<Vec<LogEntry>, StoreError> {
        let mut logs = self.load_logs()?;
        logs.truncate(n);
        Ok(logs)
    }
}

/// Dagens dato (lokal tid).
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Dagens dato som `YYYY-MM-DD`.
pub fn today_iso() -> String {
    today().format("%Y-%m-%d").to_string()
}
