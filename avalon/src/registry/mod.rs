//! Registry module hosting many matches side by side.
//!
//! This module implements:
//! - MatchManager: One live match per key, each behind its own lock
//! - MatchConfig: Per-match settings with validation
//! - Host-only start and cancel, bot seat filling on start
//!
//! ## Architecture
//!
//! The registry map sits behind a tokio `RwLock` and each match behind its
//! own `Mutex`, so operations on different matches never wait on each other
//! while operations on one match are applied one at a time. Every operation
//! returns a [`MatchUpdate`] with the new snapshot and the events it raised.
//!
//! ## Example
//!
//! ```no_run
//! use avalon::registry::{MatchConfig, MatchManager};
//!
//! #[tokio::main]
//! async fn main() {
//!     let manager = MatchManager::new();
//!     manager
//!         .create_match(42, MatchConfig::default(), 1, "alice")
//!         .await
//!         .unwrap();
//!
//!     // Bots fill the remaining seats up to the target
//!     let update = manager.start(42, 1).await.unwrap();
//!     println!("{}", update.view);
//! }
//! ```

pub mod config;
pub mod errors;
pub mod manager;

pub use config::{BotDifficulty, MatchConfig};
pub use errors::{RegistryError, RegistryResult};
pub use manager::{MatchKey, MatchManager, MatchMetadata, MatchUpdate};
