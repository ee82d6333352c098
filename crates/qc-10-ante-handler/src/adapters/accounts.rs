//! Account records kept in the ledger's key/value store.
//!
//! ```text
//! [0x01] ++ 'n' ++ packed name   -> auth address
//! [0x01] ++ 'a' ++ address       -> AuthRecord
//! [0x01] ++ '#'                  -> next account number
//! ```
//!
//! Records share the store with the ledger, so a [`CacheStore`] branch
//! carries sequence bumps and stored keys together with balance writes and
//! discards them together.
//!
//! Auth records are provisioned lazily on first touch, taking the next
//! account number. Name accounts must be registered explicitly.
//!
//! [`CacheStore`]: qc_04_asset_ledger::CacheStore

use crate::domain::errors::AnteError;
use crate::domain::tx::PubKey;
use crate::ports::outbound::AccountKeeper;
use qc_04_asset_ledger::adapters::codec;
use qc_04_asset_ledger::{AccountEnsurer, AssetError, AuthLookup, KvStore, MemoryStore};
use serde::{Deserialize, Serialize};
use shared_types::{AccountId, Address, BlockContext, Name};
use tracing::{debug, warn};

/// Leading byte of every account key.
pub const ACCOUNT_MODULE_KEY_PREFIX: u8 = 0x01;

const NAME_TAG: u8 = b'n';
const AUTH_TAG: u8 = b'a';
const NEXT_NUMBER_TAG: u8 = b'#';

fn name_key(name: &Name) -> Vec<u8> {
    let mut key = vec![ACCOUNT_MODULE_KEY_PREFIX, NAME_TAG];
    key.extend_from_slice(name.as_bytes());
    key
}

fn auth_key(auth: &Address) -> Vec<u8> {
    let mut key = vec![ACCOUNT_MODULE_KEY_PREFIX, AUTH_TAG];
    key.extend_from_slice(auth.as_bytes());
    key
}

fn next_number_key() -> Vec<u8> {
    vec![ACCOUNT_MODULE_KEY_PREFIX, NEXT_NUMBER_TAG]
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRecord {
    pub account_number: u64,
    pub sequence: u64,
    pub pub_key: Option<PubKey>,
}

/// Account keeper over any [`KvStore`].
pub struct StoreAccountKeeper<S: KvStore> {
    store: S,
}

/// Account keeper with a private memory store, for unit tests.
pub type InMemoryAccountKeeper = StoreAccountKeeper<MemoryStore>;

impl InMemoryAccountKeeper {
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }
}

impl Default for InMemoryAccountKeeper {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: KvStore> StoreAccountKeeper<S> {
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register `name` controlled by `auth`, returning the auth's account number.
    pub fn add_name_account(&self, name: Name, auth: Address) -> Result<u64, AssetError> {
        self.store.set(&name_key(&name), auth.as_bytes().to_vec());
        let number = self.load_or_provision(&auth)?.account_number;
        debug!(module = "account", %name, %auth, number, "name account registered");
        Ok(number)
    }

    /// Provision the auth record of `auth`, returning its account number.
    pub fn ensure_auth(&self, auth: &Address) -> Result<u64, AssetError> {
        Ok(self.load_or_provision(auth)?.account_number)
    }

    pub fn has_account(&self, id: &AccountId) -> bool {
        match id {
            AccountId::Empty => false,
            AccountId::Name(name) => self.store.has(&name_key(name)),
            AccountId::Address(addr) => self.store.has(&auth_key(addr)),
        }
    }

    /// Auth record of `auth`, if provisioned.
    pub fn auth_record(&self, auth: &Address) -> Result<Option<AuthRecord>, AssetError> {
        self.store
            .get(&auth_key(auth))
            .map(|bytes| codec::decode(&bytes))
            .transpose()
    }

    fn lookup_name(&self, name: &Name) -> Option<Address> {
        let bytes = self.store.get(&name_key(name))?;
        match Address::from_slice(&bytes) {
            Ok(addr) => Some(addr),
            Err(err) => {
                warn!(module = "account", %name, error = %err, "corrupt name record");
                None
            }
        }
    }

    fn save(&self, auth: &Address, record: &AuthRecord) -> Result<(), AssetError> {
        self.store.set(&auth_key(auth), codec::encode(record)?);
        Ok(())
    }

    fn load_or_provision(&self, auth: &Address) -> Result<AuthRecord, AssetError> {
        if let Some(record) = self.auth_record(auth)? {
            return Ok(record);
        }
        let number: u64 = self
            .store
            .get(&next_number_key())
            .map(|bytes| codec::decode(&bytes))
            .transpose()?
            .unwrap_or(0);
        self.store.set(&next_number_key(), codec::encode(&(number + 1))?);

        let record = AuthRecord {
            account_number: number,
            ..AuthRecord::default()
        };
        self.save(auth, &record)?;
        Ok(record)
    }
}

impl<S: KvStore> AccountKeeper for StoreAccountKeeper<S> {
    fn get_auth(&self, _ctx: &BlockContext, name: &Name) -> Option<Address> {
        self.lookup_name(name)
    }

    fn get_auth_sequence(&self, ctx: &BlockContext, auth: &Address) -> Result<(u64, u64), AnteError> {
        // genesis txs are signed over zero
        if ctx.is_genesis() {
            return Ok((0, 0));
        }
        let record = self.load_or_provision(auth)?;
        Ok((record.sequence, record.account_number))
    }

    fn inc_auth_sequence(&self, _ctx: &BlockContext, auth: &Address) -> Result<(), AnteError> {
        let mut record = self.load_or_provision(auth)?;
        record.sequence = record.sequence.checked_add(1).ok_or_else(|| {
            AnteError::InvalidRequest(format!("sequence overflow for {}", auth))
        })?;
        self.save(auth, &record)?;
        Ok(())
    }

    fn get_pub_key(&self, _ctx: &BlockContext, auth: &Address) -> Option<PubKey> {
        match self.auth_record(auth) {
            Ok(record) => record.and_then(|r| r.pub_key),
            Err(err) => {
                warn!(module = "account", %auth, error = %err, "corrupt auth record");
                None
            }
        }
    }

    fn set_pub_key(&self, _ctx: &BlockContext, auth: &Address, pub_key: PubKey) -> Result<(), AnteError> {
        let mut record = self.load_or_provision(auth)?;
        record.pub_key = Some(pub_key);
        self.save(auth, &record)?;
        Ok(())
    }
}

impl<S: KvStore> AccountEnsurer for StoreAccountKeeper<S> {
    fn ensure_account(&self, _ctx: &BlockContext, id: &AccountId) -> Result<(), AssetError> {
        match id {
            AccountId::Address(addr) => self.ensure_auth(addr).map(|_| ()),
            AccountId::Name(name) if self.store.has(&name_key(name)) => Ok(()),
            _ => Err(AssetError::ToAccountEmpty.wrap(format!("account not found: {}", id))),
        }
    }
}

impl<S: KvStore> AuthLookup for StoreAccountKeeper<S> {
    fn get_auth(&self, name: &Name) -> Option<Address> {
        self.lookup_name(name)
    }
}
