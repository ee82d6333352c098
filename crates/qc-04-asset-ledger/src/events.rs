//! Events emitted by the asset message handler.

use serde::{Deserialize, Serialize};

pub const EVENT_TYPE_CREATE: &str = "create";
pub const EVENT_TYPE_ISSUE: &str = "issue";
pub const EVENT_TYPE_BURN: &str = "burn";
pub const EVENT_TYPE_TRANSFER: &str = "transfer";
pub const EVENT_TYPE_LOCK: &str = "lock";
pub const EVENT_TYPE_UNLOCK: &str = "unlock";
pub const EVENT_TYPE_EXERCISE: &str = "exercise";
pub const EVENT_TYPE_APPROVE: &str = "approve";

pub const ATTRIBUTE_KEY_MODULE: &str = "module";
pub const ATTRIBUTE_KEY_FROM: &str = "from";
pub const ATTRIBUTE_KEY_TO: &str = "to";
pub const ATTRIBUTE_KEY_SPENDER: &str = "spender";
pub const ATTRIBUTE_KEY_AMOUNT: &str = "amount";
pub const ATTRIBUTE_KEY_CREATOR: &str = "creator";
pub const ATTRIBUTE_KEY_SYMBOL: &str = "symbol";
pub const ATTRIBUTE_KEY_MAX_SUPPLY: &str = "max";
pub const ATTRIBUTE_KEY_UNLOCK_HEIGHT: &str = "unlockHeight";
pub const ATTRIBUTE_KEY_CAN_ISSUE: &str = "canIssue";
pub const ATTRIBUTE_KEY_CAN_LOCK: &str = "canLock";
pub const ATTRIBUTE_KEY_ISSUE_TO_HEIGHT: &str = "issueToHeight";
pub const ATTRIBUTE_KEY_INIT: &str = "init";
pub const ATTRIBUTE_KEY_DESCRIPTION: &str = "desc";

/// Module name carried by every event.
pub const ATTRIBUTE_VALUE_CATEGORY: &str = "asset";

/// A typed event with ordered string attributes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: String,
    pub attributes: Vec<(String, String)>,
}

impl Event {
    /// New event already tagged with the module attribute.
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            attributes: vec![(
                ATTRIBUTE_KEY_MODULE.to_string(),
                ATTRIBUTE_VALUE_CATEGORY.to_string(),
            )],
        }
    }

    pub fn attr(mut self, key: &str, value: impl ToString) -> Self {
        self.attributes.push((key.to_string(), value.to_string()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
