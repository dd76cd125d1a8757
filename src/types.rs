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

use std::collections::HashMap;

use fnv::FnvHashMap;

use crate::events::SkippedRecord;

pub type UserId = u32;
pub type ItemId = u32;

pub type ScoreVector = Vec<f32>;

pub fn new_score_vector(dimensions: usize) -> ScoreVector {
    vec![0.0; dimensions]
}

/// Dense user-by-item score matrix. Rows follow the order of the requested users, columns the
/// order of the requested items.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyMatrix {
    user_ids: Vec<UserId>,
    item_ids: Vec<ItemId>,
    user_rows: FnvHashMap<UserId, usize>,
    item_columns: FnvHashMap<ItemId, usize>,
    rows: Vec<ScoreVector>,
    skipped: Vec<SkippedRecord>,
}

impl FrequencyMatrix {

    pub(crate) fn new(
        user_ids: Vec<UserId>,
        user_rows: FnvHashMap<UserId, usize>,
        item_ids: Vec<ItemId>,
        item_columns: FnvHashMap<ItemId, usize>,
        rows: Vec<ScoreVector>,
        skipped: Vec<SkippedRecord>,
    ) -> Self {
        FrequencyMatrix { user_ids, item_ids, user_rows, item_columns, rows, skipped }
    }

    pub fn num_users(&self) -> usize {
        self.user_ids.len()
    }

    pub fn num_items(&self) -> usize {
        self.item_ids.len()
    }

    pub fn user_ids(&self) -> &[UserId] {
        &self.user_ids
    }

    pub fn item_ids(&self) -> &[ItemId] {
        &self.item_ids
    }

    pub fn row(&self, user: UserId) -> Option<&[f32]> {
        self.user_rows.get(&user).map(|&index| self.rows[index].as_slice())
    }

    pub fn score(&self, user: UserId, item: ItemId) -> Option<f32> {
        let column = *self.item_columns.get(&item)?;
        self.row(user).map(|row| row[column])
    }

    /// Records that could not be aggregated because a field was missing.
    pub fn skipped_records(&self) -> &[SkippedRecord] {
        &self.skipped
    }

    /// Rows in the order of the requested users.
    pub fn iter(&self) -> impl Iterator<Item=(UserId, &[f32])> + '_ {
        self.user_ids.iter()
            .zip(self.rows.iter())
            .map(|(user, row)| (*user, row.as_slice()))
    }

    pub fn into_map(self) -> HashMap<UserId, ScoreVector> {
        self.user_ids.into_iter().zip(self.rows.into_iter()).collect()
    }
}
