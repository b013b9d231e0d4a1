//! Wizard persistence
//!
//! The wizard depends on the [`PersistenceAdapter`] port only. The bundled
//! adapter, [`KeyValueAdapter`], lays a snapshot out as two independent
//! entries in a string key-value store:
//!
//! | Entry | Default key      | Value                                   |
//! |-------|------------------|-----------------------------------------|
//! | A     | `signupFormData` | JSON object with every form field       |
//! | B     | `signupStep`     | current step as a decimal string `1`-`7`|
//!
//! Two stores are provided: [`MemoryStore`] for tests and embedding, and
//! [`FileStore`] which keeps one file per key in a directory.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, WizardError};
use crate::form_data::FormData;
use crate::state::WizardState;
use crate::types::Step;

/// Default key of the form-data entry
pub const FORM_DATA_KEY: &str = "signupFormData";

/// Default key of the current-step entry
pub const STEP_KEY: &str = "signupStep";

/// Durable home of a wizard snapshot.
///
/// # Contract
///
/// - `save()` writes the whole snapshot; the latest call wins.
/// - `load()` returns `Ok(None)` when nothing was saved and an error when a
///   saved snapshot cannot be read back.
/// - `clear()` removes the saved snapshot so a following `load()` is `None`.
///
/// The wizard never lets an adapter error interrupt navigation.
pub trait PersistenceAdapter {
    fn save(&mut self, snapshot: &WizardState) -> Result<()>;

    fn load(&self) -> Result<Option<WizardState>>;

    fn clear(&mut self) -> Result<()>;
}

impl<A: PersistenceAdapter + ?Sized> PersistenceAdapter for Box<A> {
    fn save(&mut self, snapshot: &WizardState) -> Result<()> {
        (**self).save(snapshot)
    }

    fn load(&self) -> Result<Option<WizardState>> {
        (**self).load()
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }
}

/// String key-value storage, in the manner of browser local storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removing a missing key is not an error
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Keys under which the two snapshot entries are stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryKeys {
    pub form_data: String,
    pub step: String,
}

impl Default for EntryKeys {
    fn default() -> Self {
        Self {
            form_data: FORM_DATA_KEY.to_string(),
            step: STEP_KEY.to_string(),
        }
    }
}

/// Adapter storing a snapshot as two entries of a [`KeyValueStore`]
#[derive(Debug, Clone, Default)]
pub struct KeyValueAdapter<S> {
    store: S,
    keys: EntryKeys,
}

impl<S: KeyValueStore> KeyValueAdapter<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            keys: EntryKeys::default(),
        }
    }

    pub fn with_keys(store: S, keys: EntryKeys) -> Self {
        Self { store, keys }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn keys(&self) -> &EntryKeys {
        &self.keys
    }

    fn parse_form_data(&self, raw: &str) -> Result<FormData> {
        serde_json::from_str(raw).map_err(|e| WizardError::malformed(&self.keys.form_data, e))
    }

    fn parse_step(&self, raw: &str) -> Result<Step> {
        let n: u8 = raw
            .trim()
            .parse()
            .map_err(|e| WizardError::malformed(&self.keys.step, e))?;
        Step::from_number(n).ok_or_else(|| {
            WizardError::malformed(&self.keys.step, format!("step {} is outside 1-7", n))
        })
    }
}

impl<S: KeyValueStore> PersistenceAdapter for KeyValueAdapter<S> {
    fn save(&mut self, snapshot: &WizardState) -> Result<()> {
        let form_json = serde_json::to_string(snapshot.form_data())?;
        self.store.set(&self.keys.form_data, &form_json)?;
        self.store
            .set(&self.keys.step, &snapshot.current_step().number().to_string())?;
        Ok(())
    }

    /// Entries are read independently: a missing entry falls back to its
    /// default, an unreadable one fails the whole load.
    fn load(&self) -> Result<Option<WizardState>> {
        let form_raw = self.store.get(&self.keys.form_data)?;
        let step_raw = self.store.get(&self.keys.step)?;

        if form_raw.is_none() && step_raw.is_none() {
            return Ok(None);
        }

        let form_data = match form_raw {
            Some(raw) => self.parse_form_data(&raw)?,
            None => FormData::default(),
        };
        let step = match step_raw {
            Some(raw) => self.parse_step(&raw)?,
            None => Step::FIRST,
        };

        Ok(Some(WizardState::from_parts(step, form_data)))
    }

    fn clear(&mut self) -> Result<()> {
        self.store.remove(&self.keys.form_data)?;
        self.store.remove(&self.keys.step)?;
        Ok(())
    }
}

/// In-memory key-value store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one entry, e.g. to simulate a tampered store
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of `set` calls so far
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.writes += 1;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Directory-backed key-value store, one file per key
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        // Write then rename: readers never see a partial entry
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.tmp", key));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form_data::{FormDataPatch, FormField};
    use crate::types::UserType;

    fn owner_on_address() -> WizardState {
        WizardState::initial()
            .with_form_data(
                &FormDataPatch::new()
                    .with_user_type(UserType::BoardingOwner)
                    .with_text(FormField::Country, "Sri Lanka")
                    .with_text(FormField::PostalCode, "10100"),
            )
            .with_step(Step::Address)
    }

    #[test]
    fn test_load_from_empty_store_is_none() {
        let adapter = KeyValueAdapter::new(MemoryStore::new());
        assert!(adapter.load().unwrap().is_none());
    }

    #[test]
    fn test_save_writes_two_entries() {
        let mut adapter = KeyValueAdapter::new(MemoryStore::new());
        adapter.save(&owner_on_address()).unwrap();

        let store = adapter.store();
        assert_eq!(store.write_count(), 2);
        assert_eq!(store.raw(STEP_KEY), Some("5"));
        let form: serde_json::Value =
            serde_json::from_str(store.raw(FORM_DATA_KEY).unwrap()).unwrap();
        assert_eq!(form["userType"], "boarding_owner");
        assert_eq!(form["postalCode"], "10100");
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let mut adapter = KeyValueAdapter::new(MemoryStore::new());
        let snapshot = owner_on_address();
        adapter.save(&snapshot).unwrap();
        assert_eq!(adapter.load().unwrap(), Some(snapshot));
    }

    #[test]
    fn test_clear_removes_entries() {
        let mut adapter = KeyValueAdapter::new(MemoryStore::new());
        adapter.save(&owner_on_address()).unwrap();
        adapter.clear().unwrap();
        assert!(adapter.store().is_empty());
        assert!(adapter.load().unwrap().is_none());
    }

    #[test]
    fn test_unparsable_form_entry_is_malformed() {
        let store = MemoryStore::new()
            .with_entry(FORM_DATA_KEY, "{not json")
            .with_entry(STEP_KEY, "2");
        let err = KeyValueAdapter::new(store).load().unwrap_err();
        assert!(matches!(
            err,
            WizardError::MalformedSnapshot { ref key, .. } if key == FORM_DATA_KEY
        ));
    }

    #[test]
    fn test_out_of_range_step_entry_is_malformed() {
        for raw in ["0", "8", "-1", "two", ""] {
            let store = MemoryStore::new().with_entry(STEP_KEY, raw);
            let err = KeyValueAdapter::new(store).load().unwrap_err();
            assert!(
                matches!(err, WizardError::MalformedSnapshot { ref key, .. } if key == STEP_KEY),
                "step entry {:?} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_missing_step_entry_defaults_to_first_step() {
        let store =
            MemoryStore::new().with_entry(FORM_DATA_KEY, r#"{"userType":"boarding_finder"}"#);
        let loaded = KeyValueAdapter::new(store).load().unwrap().unwrap();
        assert_eq!(loaded.current_step(), Step::RoleSelection);
        assert_eq!(loaded.user_type(), UserType::BoardingFinder);
    }

    #[test]
    fn test_restored_snapshot_is_not_revalidated() {
        let store = MemoryStore::new()
            .with_entry(FORM_DATA_KEY, r#"{"userType":"boarding_finder"}"#)
            .with_entry(STEP_KEY, "4");
        let loaded = KeyValueAdapter::new(store).load().unwrap().unwrap();
        assert_eq!(loaded.current_step(), Step::Contact);
        assert!(!loaded.is_consistent());
    }

    #[test]
    fn test_custom_keys() {
        let keys = EntryKeys {
            form_data: "fd".to_string(),
            step: "st".to_string(),
        };
        let mut adapter = KeyValueAdapter::with_keys(MemoryStore::new(), keys);
        adapter.save(&WizardState::initial()).unwrap();
        assert_eq!(adapter.store().raw("st"), Some("1"));
        assert!(adapter.store().raw(STEP_KEY).is_none());
    }

    #[test]
    fn test_boxed_adapter_delegates() {
        let mut adapter: Box<dyn PersistenceAdapter> =
            Box::new(KeyValueAdapter::new(MemoryStore::new()));
        adapter.save(&owner_on_address()).unwrap();
        assert_eq!(
            adapter.load().unwrap().map(|s| s.current_step()),
            Some(Step::Address)
        );
    }
}
