use crate::domain::AssetError;
use shared_types::{AccountId, Address, BlockContext, Name};
use std::sync::Arc;

/// Lazily provisions account records for recipients.
pub trait AccountEnsurer: Send + Sync {
    fn ensure_account(&self, ctx: &BlockContext, id: &AccountId) -> Result<(), AssetError>;
}

/// Resolves the address authorized to act for a name account.
pub trait AuthLookup: Send + Sync {
    fn get_auth(&self, name: &Name) -> Option<Address>;
}

impl<T: AccountEnsurer + ?Sized> AccountEnsurer for Arc<T> {
    fn ensure_account(&self, ctx: &BlockContext, id: &AccountId) -> Result<(), AssetError> {
        (**self).ensure_account(ctx, id)
    }
}

impl<T: AuthLookup + ?Sized> AuthLookup for Arc<T> {
    fn get_auth(&self, name: &Name) -> Option<Address> {
        (**self).get_auth(name)
    }
}
