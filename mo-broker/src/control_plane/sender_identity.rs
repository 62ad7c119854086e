//! Pointer identity for shared sender trait objects.

use crate::api::transport::MessageSender;
use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Hashable handle comparing senders by `Arc` allocation, not by value.
#[derive(Clone)]
pub(crate) struct SenderIdentityKey {
    sender: Arc<dyn MessageSender>,
}

impl SenderIdentityKey {
    pub(crate) fn new(sender: Arc<dyn MessageSender>) -> Self {
        Self { sender }
    }

    pub(crate) fn sender(&self) -> Arc<dyn MessageSender> {
        self.sender.clone()
    }

    fn address(&self) -> *const () {
        Arc::as_ptr(&self.sender) as *const ()
    }
}

impl Hash for SenderIdentityKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address().hash(state);
    }
}

impl PartialEq for SenderIdentityKey {
    fn eq(&self, other: &Self) -> bool {
        self.address() == other.address()
    }
}

impl Eq for SenderIdentityKey {}

impl Debug for SenderIdentityKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SenderIdentityKey")
            .field("address", &self.address())
            .finish()
    }
}
