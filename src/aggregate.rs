/**
 * TrackRate
 * Copyright (C) 2026 The TrackRate Authors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use fnv::FnvHashMap;
use tracing::{debug, warn};

use crate::config::Retention;
use crate::events::{self, Interaction, SkippedRecord};
use crate::types::{ItemId, UserId};

/// Items observed for one user, mapped to their count if counting was requested. Under
/// `Retention::FirstItem` this holds at most one entry.
pub type ItemCounts = FnvHashMap<ItemId, Option<u32>>;

pub type UserEvents = FnvHashMap<UserId, ItemCounts>;

/// The result of aggregating the records of one event kind.
#[derive(Debug, Default)]
pub struct Aggregation {
    pub by_user: UserEvents,
    pub skipped: Vec<SkippedRecord>,
}

impl Aggregation {

    /// Looks up whether `user` has a recorded event for `item`. The inner option holds the count.
    #[inline]
    pub fn lookup(&self, user: UserId, item: ItemId) -> Option<Option<u32>> {
        self.by_user.get(&user)?.get(&item).copied()
    }

    pub fn num_users(&self) -> usize {
        self.by_user.len()
    }
}

/// Reduces a list of records of one kind to a per-user summary. Records lacking an identifier are
/// skipped and reported, they never stop the aggregation of the remaining records.
pub fn aggregate_by_user<R: Interaction>(
    records: &[R],
    with_count: bool,
    retention: Retention,
) -> Aggregation {

    let mut by_user: UserEvents =
        FnvHashMap::with_capacity_and_hasher(records.len(), Default::default());
    let mut skipped = Vec::new();

    let initial_count = if with_count { Some(1) } else { None };

    for (position, record) in records.iter().enumerate() {

        let (user, item) = match events::extract(record) {
            Ok(identifiers) => identifiers,
            Err(missing) => {
                warn!(kind = %R::KIND, position, %missing, "skipping record with missing field");
                skipped.push(SkippedRecord { kind: R::KIND, position, missing });
                continue;
            }
        };

        let items = by_user.entry(user).or_insert_with(ItemCounts::default);
        observe(items, item, retention, initial_count);
    }

    debug!(
        kind = %R::KIND,
        records = records.len(),
        users = by_user.len(),
        skipped = skipped.len(),
        "aggregated records"
    );

    Aggregation { by_user, skipped }
}

/// Records one more event of `item` for a user, constant time under both retentions.
fn observe(
    items: &mut ItemCounts,
    item: ItemId,
    retention: Retention,
    initial_count: Option<u32>,
) {

    let existing = match retention {
        Retention::FirstItem => items.values_mut().next(),
        Retention::PerItem => items.get_mut(&item),
    };

    match existing {
        Some(count) => {
            if let Some(count) = count.as_mut() {
                *count = count.saturating_add(1);
            }
        },
        None => {
            items.insert(item, initial_count);
        },
    }
}
