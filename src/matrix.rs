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

use std::hash::Hash;
use std::time::Instant;

use fnv::FnvHashMap;
use scoped_pool::Pool;
use tracing::{debug, warn};

use crate::aggregate::{self, Aggregation};
use crate::config::ScoringConfig;
use crate::error::{Error, Result};
use crate::events::{CollectionRecord, DownloadRecord, PlayRecord};
use crate::types::{self, FrequencyMatrix, ItemId, ScoreVector, UserId};
use crate::utils;

/// Computes the capped user-by-item scores with the default scoring and a single thread.
pub fn build_frequency_matrix(
    user_ids: &[UserId],
    item_ids: &[ItemId],
    downloads: &[DownloadRecord],
    plays: &[PlayRecord],
    collections: &[CollectionRecord],
) -> Result<FrequencyMatrix> {
    FrequencyMatrixBuilder::new().build(user_ids, item_ids, downloads, plays, collections)
}

#[derive(Debug, Clone)]
pub struct FrequencyMatrixBuilder {
    config: ScoringConfig,
    num_workers: usize,
}

impl Default for FrequencyMatrixBuilder {
    fn default() -> Self {
        FrequencyMatrixBuilder { config: ScoringConfig::default(), num_workers: 1 }
    }
}

/// The three aggregated event kinds. They are fully built before any row is scored and only read
/// afterwards, so workers can share them without locking.
struct Signals {
    downloads: Aggregation,
    collections: Aggregation,
    plays: Aggregation,
}

impl FrequencyMatrixBuilder {

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: ScoringConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn build(
        &self,
        user_ids: &[UserId],
        item_ids: &[ItemId],
        downloads: &[DownloadRecord],
        plays: &[PlayRecord],
        collections: &[CollectionRecord],
    ) -> Result<FrequencyMatrix> {

        self.config.validate()?;

        if self.num_workers == 0 {
            return Err(Error::InvalidConfig(String::from("at least one worker is required")));
        }

        let user_rows = index_of(user_ids).map_err(Error::DuplicateUser)?;
        let item_columns = index_of(item_ids).map_err(Error::DuplicateItem)?;

        let retention = self.config.retention;

        // Repeat counts only matter for plays
        let signals = Signals {
            downloads: aggregate::aggregate_by_user(downloads, false, retention),
            collections: aggregate::aggregate_by_user(collections, false, retention),
            plays: aggregate::aggregate_by_user(plays, true, retention),
        };

        let build_start = Instant::now();

        let mut rows: Vec<ScoreVector> = vec![Vec::new(); user_ids.len()];

        if self.num_workers == 1 || user_ids.len() < 2 {
            for (row, user) in rows.iter_mut().zip(user_ids.iter()) {
                *row = score_user(*user, item_ids, &signals, &self.config);
            }
        } else {
            let pool = Pool::new(self.num_workers);
            let chunk_size = (user_ids.len() + self.num_workers - 1) / self.num_workers;

            pool.scoped(|scope| {
                for (rows_chunk, users_chunk) in rows.chunks_mut(chunk_size)
                    .zip(user_ids.chunks(chunk_size)) {

                    let signals = &signals;
                    let config = &self.config;

                    scope.execute(move || {
                        for (row, user) in rows_chunk.iter_mut().zip(users_chunk.iter()) {
                            *row = score_user(*user, item_ids, signals, config);
                        }
                    });
                }
            });

            pool.shutdown();
        }

        debug!(
            users = user_ids.len(),
            items = item_ids.len(),
            workers = self.num_workers,
            millis = utils::to_millis(build_start.elapsed()),
            "assembled frequency matrix"
        );

        let Signals { downloads, collections, plays } = signals;

        let mut skipped = downloads.skipped;
        skipped.extend(collections.skipped);
        skipped.extend(plays.skipped);

        if !skipped.is_empty() {
            warn!(skipped = skipped.len(), "some event records could not be aggregated");
        }

        Ok(FrequencyMatrix::new(
            user_ids.to_vec(),
            user_rows,
            item_ids.to_vec(),
            item_columns,
            rows,
            skipped,
        ))
    }
}

/// Scores a single row. Every cell starts at zero before any event is added.
fn score_user(
    user: UserId,
    item_ids: &[ItemId],
    signals: &Signals,
    config: &ScoringConfig,
) -> ScoreVector {

    let mut scores = types::new_score_vector(item_ids.len());

    for (score, item) in scores.iter_mut().zip(item_ids.iter()) {

        if signals.downloads.lookup(user, *item).is_some() {
            *score += config.download_score;
        }

        if signals.collections.lookup(user, *item).is_some() {
            *score += config.collection_score;
        }

        if let Some(count) = signals.plays.lookup(user, *item) {
            *score += config.play_score + count.unwrap_or(0) as f32;
        }

        *score = config.clamp(*score);
    }

    scores
}

/// Maps each identifier to its position, rejecting the first duplicate.
fn index_of<T: Copy + Eq + Hash>(ids: &[T]) -> std::result::Result<FnvHashMap<T, usize>, T> {
    let mut positions = FnvHashMap::with_capacity_and_hasher(ids.len(), Default::default());

    for (position, id) in ids.iter().enumerate() {
        if positions.insert(*id, position).is_some() {
            return Err(*id);
        }
    }

    Ok(positions)
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::config::Retention;
    use crate::events::{EventKind, MissingField, SkippedRecord};

    fn single_score(
        downloads: &[DownloadRecord],
        plays: &[PlayRecord],
        collections: &[CollectionRecord],
    ) -> f32 {
        let matrix = build_frequency_matrix(&[1], &[100], downloads, plays, collections).unwrap();
        matrix.score(1, 100).unwrap()
    }

    #[test]
    fn single_event_scores() {
        assert_eq!(single_score(&[DownloadRecord::new(1, 100)], &[], &[]), 2.0);
        assert_eq!(single_score(&[], &[], &[CollectionRecord::new(1, 100)]), 5.0);
        assert_eq!(single_score(&[], &[PlayRecord::new(1, 100)], &[]), 2.0);
    }

    #[test]
    fn nine_plays_hit_the_cap_exactly() {
        let plays = vec![PlayRecord::new(1, 100); 9];
        assert_eq!(single_score(&[], &plays, &[]), 10.0);
    }

    #[test]
    fn combined_events_are_capped() {
        let plays = vec![PlayRecord::new(1, 100); 5];
        let score = single_score(
            &[DownloadRecord::new(1, 100)],
            &plays,
            &[CollectionRecord::new(1, 100)],
        );
        assert_eq!(score, 10.0);
    }

    #[test]
    fn end_to_end() {
        let matrix = build_frequency_matrix(
            &[1],
            &[100, 200],
            &[DownloadRecord::new(1, 100)],
            &[PlayRecord::new(1, 200), PlayRecord::new(1, 200)],
            &[],
        ).unwrap();

        assert_eq!(matrix.row(1), Some(&[2.0, 3.0][..]));
    }

    #[test]
    fn users_without_events_score_zero() {
        let matrix = build_frequency_matrix(
            &[1, 2, 3],
            &[100, 200, 300],
            &[DownloadRecord::new(1, 100)],
            &[],
            &[],
        ).unwrap();

        assert_eq!(matrix.num_users(), 3);
        for (user, row) in matrix.iter() {
            assert_eq!(row.len(), 3);
            if user != 1 {
                assert!(row.iter().all(|score| *score == 0.0));
            }
        }
        assert_eq!(matrix.row(1), Some(&[2.0, 0.0, 0.0][..]));
    }

    #[test]
    fn empty_universes() {
        let no_items = build_frequency_matrix(&[1, 2], &[], &[], &[], &[]).unwrap();
        assert_eq!(no_items.num_users(), 2);
        assert_eq!(no_items.row(2), Some(&[][..]));

        let no_users = build_frequency_matrix(&[], &[1, 2], &[], &[], &[]).unwrap();
        assert_eq!(no_users.num_users(), 0);
    }

    #[test]
    fn rejects_duplicate_identifiers() {
        match build_frequency_matrix(&[1, 2, 1], &[100], &[], &[], &[]) {
            Err(Error::DuplicateUser(1)) => {},
            other => panic!("unexpected result {:?}", other),
        }

        match build_frequency_matrix(&[1], &[100, 100], &[], &[], &[]) {
            Err(Error::DuplicateItem(100)) => {},
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn rejects_invalid_configuration() {
        let config = ScoringConfig { max_score: -1.0, ..Default::default() };
        let result = FrequencyMatrixBuilder::new()
            .with_config(config)
            .build(&[1], &[100], &[], &[], &[]);
        assert!(result.is_err());

        let result = FrequencyMatrixBuilder::new()
            .with_workers(0)
            .build(&[1], &[100], &[], &[], &[]);
        assert!(result.is_err());
    }

    #[test]
    fn repeated_builds_are_identical() {
        let users = [1, 2];
        let items = [100, 200];
        let downloads = [DownloadRecord::new(2, 200)];
        let plays = [PlayRecord::new(1, 100), PlayRecord::new(1, 100)];
        let collections = [CollectionRecord::new(1, 100)];

        let first = build_frequency_matrix(&users, &items, &downloads, &plays, &collections);
        let second = build_frequency_matrix(&users, &items, &downloads, &plays, &collections);

        assert_eq!(first.unwrap(), second.unwrap());
    }

    #[test]
    fn parallel_build_matches_sequential() {
        let users: Vec<UserId> = (0..50).collect();
        let items: Vec<ItemId> = (0..20).map(|item| item * 10).collect();

        let plays: Vec<PlayRecord> = (0..500)
            .map(|n| PlayRecord::new(n % 50, (n % 7) * 10))
            .collect();
        let downloads: Vec<DownloadRecord> = (0..50)
            .map(|n| DownloadRecord::new(n, (n % 20) * 10))
            .collect();
        let collections: Vec<CollectionRecord> = (0..25)
            .map(|n| CollectionRecord::new(n * 2, (n % 3) * 10))
            .collect();

        let sequential = FrequencyMatrixBuilder::new()
            .build(&users, &items, &downloads, &plays, &collections)
            .unwrap();

        let parallel = FrequencyMatrixBuilder::new()
            .with_workers(4)
            .build(&users, &items, &downloads, &plays, &collections)
            .unwrap();

        assert_eq!(sequential, parallel);

        for (_, row) in parallel.iter() {
            assert!(row.iter().all(|score| *score >= 0.0 && *score <= 10.0));
        }
    }

    #[test]
    fn only_the_first_item_per_kind_is_scored() {
        let matrix = build_frequency_matrix(
            &[1],
            &[100, 200],
            &[],
            &[PlayRecord::new(1, 100), PlayRecord::new(1, 200)],
            &[],
        ).unwrap();

        assert_eq!(matrix.row(1), Some(&[3.0, 0.0][..]));
    }

    #[test]
    fn per_item_retention_scores_every_item() {
        let config = ScoringConfig { retention: Retention::PerItem, ..Default::default() };

        let matrix = FrequencyMatrixBuilder::new()
            .with_config(config)
            .build(
                &[1],
                &[100, 200],
                &[DownloadRecord::new(1, 100), DownloadRecord::new(1, 200)],
                &[PlayRecord::new(1, 100), PlayRecord::new(1, 200), PlayRecord::new(1, 200)],
                &[],
            ).unwrap();

        assert_eq!(matrix.row(1), Some(&[4.0, 5.0][..]));
    }

    #[test]
    fn dense_per_item_matrix() {
        let users: Vec<UserId> = (0..100).collect();
        let items: Vec<ItemId> = (0..500).collect();

        let plays: Vec<PlayRecord> = users.iter()
            .flat_map(|user| items.iter().map(move |item| PlayRecord::new(*user, *item)))
            .collect();

        let config = ScoringConfig { retention: Retention::PerItem, ..Default::default() };

        let matrix = FrequencyMatrixBuilder::new()
            .with_config(config)
            .with_workers(2)
            .build(&users, &items, &[], &plays, &[])
            .unwrap();

        assert_eq!(matrix.num_users(), 100);
        for (_, row) in matrix.iter() {
            assert_eq!(row.len(), 500);
            assert!(row.iter().all(|score| *score == 2.0));
        }
    }

    #[test]
    fn malformed_records_are_reported() {
        let matrix = build_frequency_matrix(
            &[1],
            &[100],
            &[DownloadRecord::from((Some(1), None))],
            &[PlayRecord::new(1, 100)],
            &[],
        ).unwrap();

        assert_eq!(matrix.score(1, 100), Some(2.0));
        assert_eq!(matrix.skipped_records(), &[
            SkippedRecord { kind: EventKind::Download, position: 0, missing: MissingField::ItemId }
        ][..]);
    }
}
