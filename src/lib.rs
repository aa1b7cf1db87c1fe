//! ratewalk - full-coverage pseudo-random rating walk
//!
//! Step through a fixed, ordered collection of items (media files to be
//! rated) in a pseudo-randomized order that covers every item exactly once
//! per cycle, persist a rating per item, and resume exactly where the user
//! left off across sessions.
//!
//! # How the walk works
//!
//! Each session persists a `{position, step, saved_count}` tuple. The step
//! is generated coprime to the collection length, so repeatedly adding it
//! modulo the length visits every index once before repeating, which makes
//! "next unrated" searches terminate and gives full coverage without
//! shuffling the sequence itself.
//!
//! # Architecture
//!
//! - [`walk`] - persisted walk tuple and step generation (pure arithmetic)
//! - [`session`] - the session handle: traversal, rating, export, reset
//! - [`storage`] - async storage port plus memory and file backends
//! - [`progress`] - `{saved, max}` sink for presentation layers
//! - [`config`] / [`cli`] - configuration and argument parsing for `rw`
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use ratewalk::{MemoryStore, NoopProgress, RatingRecord, RatingSession};
//!
//! let items = vec!["a.wav".to_string(), "b.wav".to_string()];
//! let mut session = RatingSession::open(
//!     items,
//!     "voices",
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(NoopProgress),
//! )
//! .await?;
//!
//! let entry = session.advance_to_unrated().await?.unwrap();
//! session
//!     .record_rating(RatingRecord::new(&entry.key).with_field("score", 4.into()))
//!     .await?;
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod progress;
pub mod session;
pub mod storage;
pub mod walk;

pub use error::{SessionError, SessionResult, StorageError};
pub use progress::{ConsoleProgress, LogProgress, NoopProgress, ProgressSink};
pub use session::{Entry, RatingRecord, RatingSession};
pub use storage::{JsonStore, MemoryStore, StoragePort};
pub use walk::{STEP_PRIMES, WalkState};
