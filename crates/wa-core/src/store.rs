//! In-memory message store.

use std::sync::Mutex;

use time::OffsetDateTime;

use crate::{generate_message_id, NewMessage, StoreError, StoredMessage};

/// Default number of records returned by [`MessageStore::list`].
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Equality filters applied by [`MessageStore::list`].
#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    pub sender: Option<String>,
    pub recipient: Option<String>,
}

impl MessageFilter {
    fn matches(&self, message: &StoredMessage) -> bool {
        self.sender
            .as_deref()
            .map_or(true, |sender| sender == message.sender)
            && self
                .recipient
                .as_deref()
                .map_or(true, |recipient| recipient == message.recipient)
    }
}

/// Insertion-ordered collection of message records, held in process
/// memory and lost on restart.
///
/// Construct one per process and share it behind an `Arc`. Every
/// operation takes the internal lock and scans linearly, so lookups and
/// filtered lists cost O(n) over the stored records. The lock is never
/// held across an await point.
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: Mutex<Vec<StoredMessage>>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record at the end of the collection.
    ///
    /// An absent id is generated, an absent timestamp defaults to the
    /// time of receipt, and the read flag starts false. A client-supplied
    /// id that collides with a stored record is rejected; ids are unique
    /// within the store at any instant.
    pub fn append(&self, new: NewMessage) -> Result<StoredMessage, StoreError> {
        let id = match new.id {
            Some(id) if !id.is_empty() => id,
            _ => generate_message_id(),
        };

        let mut messages = self.messages.lock().expect("message store lock poisoned");
        if messages.iter().any(|m| m.id == id) {
            return Err(StoreError::DuplicateId(id));
        }

        let message = StoredMessage {
            id,
            sender: new.sender,
            recipient: new.recipient,
            encrypted_content: new.encrypted_content,
            timestamp: new.timestamp.unwrap_or_else(OffsetDateTime::now_utc),
            read: false,
        };
        messages.push(message.clone());
        Ok(message)
    }

    /// Return the most recent `limit` records matching `filter`, in
    /// original insertion order.
    pub fn list(&self, filter: &MessageFilter, limit: usize) -> Vec<StoredMessage> {
        let messages = self.messages.lock().expect("message store lock poisoned");
        let matching: Vec<&StoredMessage> =
            messages.iter().filter(|m| filter.matches(m)).collect();
        let skip = matching.len().saturating_sub(limit);
        matching.into_iter().skip(skip).cloned().collect()
    }

    /// Fetch the record with an exact id match.
    pub fn get(&self, id: &str) -> Result<StoredMessage, StoreError> {
        let messages = self.messages.lock().expect("message store lock poisoned");
        messages
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Set the read flag on the record with `id` and return the updated
    /// record.
    pub fn mark_read(&self, id: &str) -> Result<StoredMessage, StoreError> {
        let mut messages = self.messages.lock().expect("message store lock poisoned");
        let message = messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        message.read = true;
        Ok(message.clone())
    }

    /// Delete the record with `id`, leaving the order of the remaining
    /// records intact.
    pub fn remove(&self, id: &str) -> Result<(), StoreError> {
        let mut messages = self.messages.lock().expect("message store lock poisoned");
        let index = messages
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        messages.remove(index);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.messages
            .lock()
            .expect("message store lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
