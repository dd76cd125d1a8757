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

use std::env;
use std::process;

use getopts::{Matches, Options};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use trackrate::io;
use trackrate::{CollectionRecord, DownloadRecord, PlayRecord};
use trackrate::{FrequencyMatrixBuilder, Retention, ScoringConfig};

fn main() {

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("u", "users", "File with one user id per line (required). Each user becomes a \
        row of the matrix.", "PATH");
    opts.optopt("i", "items", "File with one item id per line (required). The line order \
        determines the column order of the matrix.", "PATH");
    opts.optopt("p", "plays", "Play events (optional). A user and item pair per line, separated \
        by a tab.", "PATH");
    opts.optopt("d", "downloads", "Download events (optional), same format as plays.", "PATH");
    opts.optopt("c", "collections", "Collection events (optional), same format as plays.", "PATH");
    opts.optopt("o", "outputfile", "Output file name (optional, output will be written to stdout \
        by default).", "PATH");
    opts.optopt("t", "threads", "Number of worker threads (optional, defaults to the number of \
        CPUs).", "NUMBER");
    opts.optflag("", "per-item", "Score every item a user interacted with, instead of only the \
        first one per event kind");
    opts.optflag("h", "help", "Print this help menu");

    let matches = match opts.parse(&args[1..]) {
        Ok(matches) => matches,
        Err(failure) => {
            let hint = failure.to_string();
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    if matches.opt_present("h") {
        return print_usage_and_exit(&program, opts, None);
    }

    for (option, name) in [("u", "users"), ("i", "items")].iter() {
        if !matches.opt_present(option) {
            let hint = format!("Please specify a file via --{}.", name);
            return print_usage_and_exit(&program, opts, Some(&hint));
        }
    }

    let num_workers: usize = match matches.opt_get_default("t", num_cpus::get()) {
        Ok(num_workers) => num_workers,
        Err(failure) => {
            let hint = format!("Problem with option 't': {}", failure.to_string());
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    if let Err(failure) = compute_matrix(&matches, num_workers) {
        error!("{}", failure);
        process::exit(1);
    }
}

fn print_usage_and_exit(
    program: &str,
    opts: Options,
    hint: Option<&str>
) {

    if let Some(hint) = hint {
        eprintln!("\n{}\n", hint);
    }

    let brief = format!("Usage: {} [options]", program);
    eprint!("{}", opts.usage(&brief));
    process::exit(usage_exit_code(hint));
}

/// Asking for help is not a failure, a usage hint means the invocation was wrong.
fn usage_exit_code(hint: Option<&str>) -> i32 {
    match hint {
        Some(_) => 2,
        None => 0,
    }
}

fn compute_matrix(matches: &Matches, num_workers: usize) -> trackrate::Result<()> {

    let users_path = matches.opt_str("u").unwrap_or_default();
    let items_path = matches.opt_str("i").unwrap_or_default();

    let user_ids = io::read_identifiers_from(&users_path)?;
    let item_ids = io::read_identifiers_from(&items_path)?;

    info!("Found {} users in {} and {} items in {}.",
        user_ids.len(), users_path, item_ids.len(), items_path);

    let plays: Vec<PlayRecord> = io::read_events_from(matches.opt_str("p").as_deref())?;
    let downloads: Vec<DownloadRecord> = io::read_events_from(matches.opt_str("d").as_deref())?;
    let collections: Vec<CollectionRecord> =
        io::read_events_from(matches.opt_str("c").as_deref())?;

    info!("Read {} plays, {} downloads and {} collections.",
        plays.len(), downloads.len(), collections.len());

    let retention = if matches.opt_present("per-item") {
        Retention::PerItem
    } else {
        Retention::FirstItem
    };

    let config = ScoringConfig { retention, ..Default::default() };

    info!("Computing frequency matrix with {} workers", num_workers);

    let matrix = FrequencyMatrixBuilder::new()
        .with_config(config)
        .with_workers(num_workers)
        .build(&user_ids, &item_ids, &downloads, &plays, &collections)?;

    let num_skipped = matrix.skipped_records().len();
    if num_skipped > 0 {
        info!("Skipped {} malformed event records.", num_skipped);
    }

    info!("Writing frequency matrix...");
    io::write_matrix(&matrix, matches.opt_str("o"))?;

    Ok(())
}
