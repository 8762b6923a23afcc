//! # Change Notifications
//!
//! Every committed write in the collection service produces one
//! `ChangeEvent`, published in commit order to all live subscribers.
//!
//! ## Invariants
//!
//! - Sequence numbers strictly increase per publisher
//! - Publishing never fails; delivery is best effort

pub mod errors;
pub mod event;
pub mod publisher;

pub use errors::{RealtimeError, RealtimeResult};
pub use event::{ChangeEvent, EventType};
pub use publisher::{ChangePublisher, ChangeSubscriber};
