// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Feed lookup by address.

use crate::types::feed::FeedList;
use crate::types::id::Address;

/// True iff some feed is named exactly the canonical form of `address`.
///
/// Names are compared verbatim: a feed registered under a differently cased
/// spelling of the same address does not match.
pub fn has_feed(address: &Address, feed_list: &FeedList) -> bool {
    feed_index(address, feed_list).is_some()
}

pub fn feed_index(address: &Address, feed_list: &FeedList) -> Option<usize> {
    feed_list.index_of(&address.canonical())
}
