//! # sprint-board
//!
//! Loads board data into a [`BoardSnapshot`](sprint_core::board::BoardSnapshot).
//!
//! Two sources are supported:
//! - the Trello REST API via [`TrelloClient::fetch_snapshot`]
//! - JSON snapshot files via [`load_snapshot_file`]
//!
//! Trello cards, lists, members and card actions are normalized so the
//! analysis crates never see provider-specific shapes.

mod client;
mod error;
mod http;
pub mod normalize;
mod snapshot_file;
pub mod wire;

pub use client::TrelloClient;
pub use error::BoardError;
pub use normalize::normalize;
pub use snapshot_file::{load_snapshot_file, save_snapshot_file};
