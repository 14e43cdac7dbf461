use crate::charge::Charge;
use crate::charge::ChargePatch;
use crate::charge::seed_charges;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Key the charge list is persisted under.
pub const STORAGE_KEY: &str = "charges-data";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode charges: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("charge {0} not found")]
    NotFound(String),
}

/// String key/value persistence behind the store.
pub trait Storage {
    /// `Ok(None)` when nothing has been saved under `key` yet.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside `dir`.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path(key);
        fs::write(&path, value).map_err(|source| StoreError::Io { path, source })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiAction {
    Create,
    Update,
    Delete,
}

impl ApiAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ApiAction::Create => "create",
            ApiAction::Update => "update",
            ApiAction::Delete => "delete",
        }
    }
}

/// The request line logged for every create/update/delete.
pub fn api_request(action: ApiAction, charge_id: &str) -> String {
    format!(
        "{{'url': 'api_url', 'action': '{}', 'charge_id':'{charge_id}'}}",
        action.as_str()
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&[Charge])>;

/// The shared charge list.
///
/// Every successful mutation runs the subscribed listeners with the new list, then persists it.
/// A persistence failure is returned to the caller but the in-memory change and the notifications
/// have already happened.
pub struct ChargeStore<S: Storage> {
    charges: Vec<Charge>,
    storage: S,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: Storage> ChargeStore<S> {
    /// Loads the saved list, falling back to the sample data when nothing usable is stored.
    pub fn open(storage: S) -> Self {
        let charges = match storage.load(STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<Charge>>(&json) {
                Ok(charges) => charges,
                Err(err) => {
                    log::warn!("stored charges are unreadable, using sample data: {err}");
                    seed_charges()
                }
            },
            Ok(None) => {
                log::info!("no stored charges, using sample data");
                seed_charges()
            }
            Err(err) => {
                log::warn!("failed to load charges, using sample data: {err}");
                seed_charges()
            }
        };
        Self {
            charges,
            storage,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn list(&self) -> &[Charge] {
        &self.charges
    }

    pub fn get(&self, charge_id: &str) -> Option<&Charge> {
        self.charges.iter().find(|c| c.charge_id == charge_id)
    }

    pub fn contains(&self, charge_id: &str) -> bool {
        self.get(charge_id).is_some()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Registers `listener`; it runs after every mutation until unsubscribed.
    pub fn subscribe(&mut self, listener: impl FnMut(&[Charge]) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Appends a charge.
    pub fn add(&mut self, charge: Charge) -> Result<(), StoreError> {
        log::info!("{}", api_request(ApiAction::Create, &charge.charge_id));
        self.charges.push(charge);
        self.commit()
    }

    pub fn update(&mut self, charge_id: &str, patch: &ChargePatch) -> Result<(), StoreError> {
        let charge = self
            .charges
            .iter_mut()
            .find(|c| c.charge_id == charge_id)
            .ok_or_else(|| StoreError::NotFound(charge_id.to_string()))?;
        log::info!("{}", api_request(ApiAction::Update, charge_id));
        patch.apply(charge);
        self.commit()
    }

    pub fn delete(&mut self, charge_id: &str) -> Result<(), StoreError> {
        let index = self
            .charges
            .iter()
            .position(|c| c.charge_id == charge_id)
            .ok_or_else(|| StoreError::NotFound(charge_id.to_string()))?;
        log::info!("{}", api_request(ApiAction::Delete, charge_id));
        self.charges.remove(index);
        self.commit()
    }

    /// Restores the sample data. Logs no request.
    pub fn reset_to_seed_data(&mut self) -> Result<(), StoreError> {
        self.charges = seed_charges();
        self.commit()
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        for (_, listener) in &mut self.listeners {
            listener(&self.charges);
        }
        let json = serde_json::to_string(&self.charges)?;
        self.storage.save(STORAGE_KEY, &json).inspect_err(|err| {
            log::error!("failed to save charges: {err}");
        })
    }
}
