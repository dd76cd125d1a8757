/*
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

//! Implicit ratings from listening behaviour. Plays, downloads and collections (favorites) of
//! songs are aggregated per user and turned into a dense, capped user-by-item score matrix, which
//! can stand in for explicit ratings in a collaborative filtering pipeline.

extern crate csv;
extern crate fnv;
extern crate scoped_pool;

mod utils;
pub mod types;
pub mod events;
pub mod error;
pub mod config;
pub mod aggregate;
pub mod matrix;
pub mod io;

pub use config::{Retention, ScoringConfig};
pub use error::{Error, Result};
pub use events::{CollectionRecord, DownloadRecord, EventKind, Interaction, PlayRecord};
pub use matrix::{build_frequency_matrix, FrequencyMatrixBuilder};
pub use types::{FrequencyMatrix, ItemId, UserId};
