//! List view model: the last fetched collection plus local patching

use crate::api::{ApiClient, ApiResource};
use crate::error::Result;
use crate::models::{Record, Saved};

/// The records a list view is showing.
///
/// The copy is never authoritative. Mutations made through this list patch
/// it in place when the server's reply allows it; otherwise the list is
/// marked stale and the view should call [`refresh`](Self::refresh).
pub struct RecordList<R: ApiResource> {
    items: Vec<R::Record>,
    stale: bool,
}

impl<R: ApiResource> RecordList<R> {
    /// An empty list that has never been fetched
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            stale: true,
        }
    }

    pub fn from_records(items: Vec<R::Record>) -> Self {
        Self {
            items,
            stale: false,
        }
    }

    pub fn items(&self) -> &[R::Record] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&R::Record> {
        self.items.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.get(id).is_some()
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Replace the collection with the server's current one.
    /// On failure the previous items are kept and the list stays stale.
    pub async fn refresh(&mut self, client: &ApiClient) -> Result<&[R::Record]> {
        match client.resource::<R>().list().await {
            Ok(items) => {
                self.items = items;
                self.stale = false;
                Ok(&self.items)
            }
            Err(e) => {
                self.stale = true;
                Err(e)
            }
        }
    }

    /// Delete on the server, then drop the record locally
    pub async fn delete(&mut self, client: &ApiClient, id: i64) -> Result<()> {
        client.resource::<R>().delete(id).await?;
        self.remove(id);
        Ok(())
    }

    pub async fn create(
        &mut self,
        client: &ApiClient,
        draft: &R::Draft,
    ) -> Result<Saved<R::Record>> {
        let saved = client.resource::<R>().create(draft).await?;
        self.apply(&saved);
        Ok(saved)
    }

    pub async fn update(
        &mut self,
        client: &ApiClient,
        id: i64,
        draft: &R::Draft,
    ) -> Result<Saved<R::Record>> {
        let saved = client.resource::<R>().update(id, draft).await?;
        self.apply(&saved);
        Ok(saved)
    }

    /// Insert a record, or replace the one with the same id
    pub fn upsert(&mut self, record: R::Record) {
        match self.items.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record,
            None => self.items.push(record),
        }
    }

    pub fn remove(&mut self, id: i64) -> Option<R::Record> {
        let index = self.items.iter().position(|r| r.id() == id)?;
        Some(self.items.remove(index))
    }

    fn apply(&mut self, saved: &Saved<R::Record>) {
        match saved.record() {
            Some(record) => self.upsert(record.clone()),
            // Only an acknowledgement came back; the local copy can't be patched
            None => self.mark_stale(),
        }
    }
}

impl<R: ApiResource> Default for RecordList<R> {
    fn default() -> Self {
        Self::new()
    }
}
