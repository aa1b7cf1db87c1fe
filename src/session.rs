//! Rating session: sequencer + rating store over two storage ports
//!
//! A session pairs one immutable item sequence with the persisted walk
//! state and rating collection for a session key, and owns every traversal
//! and rating operation. All mutating operations take `&mut self`, so a
//! caller cannot overlap two operations on one session; storage calls are
//! the only suspension points.
//!
//! A failed storage write leaves the in-memory walk in its already-mutated
//! state. Callers wanting the persisted record back in sync re-issue the
//! write (e.g. by retrying the same operation's persistence), not the
//! logical operation, to avoid double counting.

use std::collections::HashSet;
use std::sync::Arc;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{SessionError, SessionResult, StorageError};
use crate::progress::ProgressSink;
use crate::storage::StoragePort;
use crate::walk::WalkState;

/// One persisted rating
///
/// Identity is `key` (the rated item); every other field is caller-defined
/// and round-trips untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    /// The rated item
    pub key: String,
    /// Caller-defined rating fields, flattened into the record
    #[serde(flatten)]
    pub fields: serde_json::Map<String, Value>,
}

impl RatingRecord {
    /// Bare record with no rating fields
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            fields: serde_json::Map::new(),
        }
    }

    /// Add one rating field
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }
}

/// The item currently under the walk position, with its rating if rated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    /// The item identifier
    pub key: String,
    /// The stored rating, if this item has one
    pub rating: Option<RatingRecord>,
}

/// One namespaced pairing of an item sequence with persisted walk and
/// rating state
///
/// Constructed with [`open`](Self::open); thereafter the single handle for
/// traversal, rating, export, and reset. The item sequence is caller-owned
/// in ordering: it must be identical (same items, same order) every time
/// the same session key is opened, since only the walk tuple is persisted.
/// A persisted position that no longer fits the item list is rejected at
/// open with `InvalidArgument` instead of surfacing later as an index
/// panic.
pub struct RatingSession {
    key: String,
    items: Vec<String>,
    walk: WalkState,
    meta: Arc<dyn StoragePort>,
    ratings: Arc<dyn StoragePort>,
    sink: Arc<dyn ProgressSink>,
}

impl RatingSession {
    /// Open the session for `key`, loading persisted walk state or
    /// generating and persisting a fresh one
    ///
    /// Seeds the walk RNG from OS entropy; see
    /// [`open_with_rng`](Self::open_with_rng) for reproducible walks.
    pub async fn open(
        items: Vec<String>,
        key: impl Into<String>,
        meta: Arc<dyn StoragePort>,
        ratings: Arc<dyn StoragePort>,
        sink: Arc<dyn ProgressSink>,
    ) -> SessionResult<Self> {
        let mut rng = SmallRng::from_os_rng();
        Self::open_with_rng(items, key, meta, ratings, sink, &mut rng).await
    }

    /// [`open`](Self::open) with an explicit RNG for the first-seen walk
    /// generation
    ///
    /// Argument validation happens before any storage access: an empty item
    /// list or empty key fails with `InvalidArgument` and persists nothing.
    pub async fn open_with_rng(
        items: Vec<String>,
        key: impl Into<String>,
        meta: Arc<dyn StoragePort>,
        ratings: Arc<dyn StoragePort>,
        sink: Arc<dyn ProgressSink>,
        rng: &mut impl Rng,
    ) -> SessionResult<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(SessionError::InvalidArgument("session key is empty".to_string()));
        }
        if items.is_empty() {
            return Err(SessionError::InvalidArgument("item sequence is empty".to_string()));
        }

        let walk = if meta.exists(&key).await? {
            let record = meta
                .get(&key)
                .await?
                .ok_or_else(|| StorageError::Backend(format!("walk record for {key} vanished")))?;
            let walk: WalkState = serde_json::from_value(record).map_err(StorageError::from)?;
            if walk.position >= items.len() {
                return Err(SessionError::InvalidArgument(format!(
                    "persisted position {} is out of range for {} items (item list changed under key {key}?)",
                    walk.position,
                    items.len()
                )));
            }
            info!(%key, position = walk.position, step = walk.step, saved = walk.saved_count, "resumed walk");
            walk
        } else {
            let walk = WalkState::generate(&key, items.len(), rng);
            meta.save(serde_json::to_value(&walk).map_err(StorageError::from)?).await?;
            info!(%key, position = walk.position, step = walk.step, "started new walk");
            walk
        };

        let session = Self {
            key,
            items,
            walk,
            meta,
            ratings,
            sink,
        };
        session.sink.update(session.walk.saved_count, session.items.len());
        Ok(session)
    }

    /// Session key namespacing the persisted state
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The item sequence this session walks
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Number of items in the sequence
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        // The constructor rejects empty sequences
        false
    }

    /// Current walk position
    pub fn position(&self) -> usize {
        self.walk.position
    }

    /// Traversal step
    pub fn step(&self) -> usize {
        self.walk.step
    }

    /// Number of distinct items rated so far
    pub fn saved_count(&self) -> usize {
        self.walk.saved_count
    }

    /// Items not yet rated
    pub fn remaining(&self) -> usize {
        self.items.len().saturating_sub(self.walk.saved_count)
    }

    async fn persist_walk(&self) -> SessionResult<()> {
        let record = serde_json::to_value(&self.walk).map_err(StorageError::from)?;
        self.meta.save(record).await?;
        Ok(())
    }

    async fn rating_for(&self, item: &str) -> SessionResult<Option<RatingRecord>> {
        match self.ratings.get(item).await? {
            Some(value) => Ok(Some(serde_json::from_value(value).map_err(StorageError::from)?)),
            None => Ok(None),
        }
    }

    /// The item at the current position, with its rating if one exists
    ///
    /// Pure read: no mutation, no persistence write.
    pub async fn current(&self) -> SessionResult<Entry> {
        let key = self.items[self.walk.position].clone();
        debug!(position = self.walk.position, item = %key, "current");
        let rating = self.rating_for(&key).await?;
        Ok(Entry { key, rating })
    }

    /// Step forward, persist the walk, and return the new current entry
    pub async fn advance(&mut self) -> SessionResult<Entry> {
        self.walk.advance(self.items.len());
        self.persist_walk().await?;
        self.current().await
    }

    /// Step backward, persist the walk, and return the new current entry
    ///
    /// Undoes the immediately preceding [`advance`](Self::advance) exactly,
    /// and vice versa.
    pub async fn retreat(&mut self) -> SessionResult<Entry> {
        self.walk.retreat(self.items.len());
        self.persist_walk().await?;
        self.current().await
    }

    /// Step forward until an unrated item is current, persisting the walk
    /// once
    ///
    /// Returns `Ok(None)` without mutating anything when every item already
    /// has a rating. Otherwise terminates within `len` steps: the step is
    /// coprime to `len`, so repeated advances visit every index before
    /// repeating.
    pub async fn advance_to_unrated(&mut self) -> SessionResult<Option<Entry>> {
        let rated: HashSet<String> = self.ratings.keys().await?.into_iter().collect();
        if rated.len() >= self.items.len() {
            debug!(key = %self.key, "all items rated");
            return Ok(None);
        }

        loop {
            self.walk.advance(self.items.len());
            if !rated.contains(&self.items[self.walk.position]) {
                break;
            }
        }
        self.persist_walk().await?;
        self.current().await.map(Some)
    }

    /// Record a rating for an item
    ///
    /// The first rating for an item increments the saved count; a repeat
    /// overwrites the stored record without counting again. Walk state is
    /// persisted before the rating record, and the progress sink sees the
    /// new `{saved, max}` afterward.
    pub async fn record_rating(&mut self, record: RatingRecord) -> SessionResult<()> {
        if self.ratings.exists(&record.key).await? {
            if let Some(old) = self.ratings.get(&record.key).await? {
                debug!(key = %record.key, %old, "replacing existing rating");
            }
        } else {
            self.walk.saved_count += 1;
        }

        self.persist_walk().await?;
        self.ratings
            .save(serde_json::to_value(&record).map_err(StorageError::from)?)
            .await?;
        self.sink.update(self.walk.saved_count, self.items.len());
        Ok(())
    }

    /// Every stored rating as a flat text block
    ///
    /// Wire format consumed by export tooling, kept stable: a header line
    /// `Ratings (<key>) : <count>`, then one JSON record per line, CRLF
    /// separators, trailing CRLF.
    pub async fn export(&self) -> SessionResult<String> {
        let records = self.ratings.all().await?;
        let body = records
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StorageError::from)?
            .join("\r\n");
        Ok(format!("Ratings ({}) : {}\r\n{}\r\n", self.key, records.len(), body))
    }

    /// Delete every rating and zero the saved count
    ///
    /// Position and step are untouched, so the walk resumes from the same
    /// place over a freshly unrated collection.
    pub async fn reset(&mut self) -> SessionResult<()> {
        info!(key = %self.key, "resetting ratings");
        self.walk.saved_count = 0;
        self.persist_walk().await?;
        self.ratings.clear().await?;
        self.sink.update(0, self.items.len());
        Ok(())
    }
}
