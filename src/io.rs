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

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;

use serde_derive::Serialize;

use crate::error::{Error, Result};
use crate::types::{FrequencyMatrix, UserId};

/// We expect NO headers and a user-item tuple per line with tab separation. Rows may be short or
/// have empty fields, these end up as records with missing identifiers.
pub fn tsv_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .delimiter(b'\t')
        .flexible(true);
    builder
}

pub fn csv_reader<P: AsRef<Path>>(file: P) -> Result<csv::Reader<File>> {
    Ok(tsv_builder().from_path(file)?)
}

/// Reads user-item events. A field which is present but not an integer is an error, an absent or
/// empty field is not.
pub fn read_events<R, E>(reader: &mut csv::Reader<R>) -> Result<Vec<E>>
    where R: Read, E: From<(Option<u32>, Option<u32>)> {

    let mut events = Vec::new();

    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|position| position.line() as usize).unwrap_or(0);

        let user = parse_field(record.get(0), line)?;
        let item = parse_field(record.get(1), line)?;

        events.push(E::from((user, item)));
    }

    Ok(events)
}

/// Reads the events from a file, a missing path means there are none.
pub fn read_events_from<E>(path: Option<&str>) -> Result<Vec<E>>
    where E: From<(Option<u32>, Option<u32>)> {

    match path {
        Some(path) => read_events(&mut csv_reader(path)?),
        None => Ok(Vec::new()),
    }
}

fn parse_field(field: Option<&str>, line: usize) -> Result<Option<u32>> {
    match field.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse()
            .map(Some)
            .map_err(|_| Error::InvalidIdentifier { line, value: value.to_owned() }),
    }
}

/// Reads one identifier per line, blank lines are ignored. Order is preserved.
pub fn read_identifiers<R: BufRead>(reader: R) -> Result<Vec<u32>> {
    let mut identifiers = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let value = line.trim();

        if value.is_empty() {
            continue;
        }

        let identifier = value.parse()
            .map_err(|_| Error::InvalidIdentifier { line: index + 1, value: value.to_owned() })?;

        identifiers.push(identifier);
    }

    Ok(identifiers)
}

pub fn read_identifiers_from<P: AsRef<Path>>(path: P) -> Result<Vec<u32>> {
    read_identifiers(BufReader::new(File::open(path)?))
}

/// Struct used for JSON serialization of a matrix row. Field names will be used in JSON.
#[derive(Serialize)]
struct MatrixRow<'a> {
    user: UserId,
    scores: &'a [f32],
}

/// Writes one JSON object per user, in the order of the requested users.
pub fn write_rows<W: Write>(matrix: &FrequencyMatrix, out: &mut W) -> Result<()> {
    for (user, scores) in matrix.iter() {
        serde_json::to_writer(&mut *out, &MatrixRow { user, scores })?;
        out.write_all(b"\n")?;
    }

    out.flush()?;
    Ok(())
}

/// If a `matrix_path` is supplied, we write to a file at the specified path, otherwise, we output
/// to stdout.
pub fn write_matrix(matrix: &FrequencyMatrix, matrix_path: Option<String>) -> Result<()> {
    let mut out: Box<dyn Write> = match matrix_path {
        Some(path) => Box::new(io::BufWriter::new(File::create(&Path::new(&path))?)),
        _ => Box::new(io::BufWriter::new(io::stdout())),
    };

    write_rows(matrix, &mut out)
}
