// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod id;
pub mod snapshot;
pub mod feed;

pub use feed::{FeedEntry, FeedList};
pub use id::{Address, Identity};
pub use snapshot::{IdentityCache, ScoreSnapshot};
