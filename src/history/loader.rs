//! Allele history file loading.
//!
//! Reads the IMGT/HLA `Allelelist_history.txt` layout: a header row
//! `HLA_ID` followed by one column per release, then one row per accession
//! with the allele name carried at each release:
//!
//! ```text
//! HLA_ID    3250          3200
//! HLA00053  A*24:03:01:01 A*24:03:01
//! HLA14804  A*24:03:01:02
//! ```
//!
//! Both tab- and comma-separated files are accepted, optionally gzipped.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use log::{debug, info, warn};

use super::index::{AlleleHistoryBuilder, AlleleHistoryIndex, AlleleId};
use super::version::DbVersion;
use crate::error::GlError;

/// Cell values that mean "allele absent at this release"
const ABSENT: &[&str] = &["", "NA", "nan", "NaN"];

const NAMESPACE_PREFIX: &str = "HLA-";

/// Load a history file from a path (supports plain text and `.gz`).
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<AlleleHistoryIndex, GlError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| GlError::Io {
        msg: format!("Failed to open history file {}: {}", path.display(), e),
    })?;

    info!("Loading allele history from {}", path.display());
    if path.to_string_lossy().ends_with(".gz") {
        parse(flate2::read::GzDecoder::new(file))
    } else {
        parse(file)
    }
}

/// Parse history data from a reader.
pub fn parse<R: Read>(reader: R) -> Result<AlleleHistoryIndex, GlError> {
    let reader = BufReader::new(reader);
    let mut builder = AlleleHistoryBuilder::new();
    let mut header: Option<Header> = None;
    let mut rows = 0usize;

    for (idx, line_result) in reader.lines().enumerate() {
        let line_num = idx + 1;
        let line = line_result.map_err(|e| GlError::Io {
            msg: format!("Failed to read line {}: {}", line_num, e),
        })?;
        let line = line.strip_prefix('\u{feff}').unwrap_or(&line);
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let Some(header) = header.as_ref() else {
            let parsed = Header::parse(line, line_num)?;
            for version in &parsed.versions {
                builder.add_version(*version);
            }
            header = Some(parsed);
            continue;
        };

        let cells: Vec<&str> = line.split(header.delimiter).collect();
        if cells.len() != header.versions.len() + 1 {
            return Err(GlError::History {
                msg: format!(
                    "Line {}: expected {} columns, got {}",
                    line_num,
                    header.versions.len() + 1,
                    cells.len()
                ),
            });
        }

        let id = cells[0].trim();
        if id.is_empty() {
            return Err(GlError::History {
                msg: format!("Line {}: missing accession ID", line_num),
            });
        }
        let id = AlleleId::new(id);

        for (version, cell) in header.versions.iter().zip(&cells[1..]) {
            let Some(name) = normalize_cell(cell) else {
                continue;
            };
            if name.contains(char::is_whitespace) {
                warn!(
                    "Line {}: skipping malformed name '{}' for {} at {}",
                    line_num, name, id, version
                );
                continue;
            }
            builder
                .insert(&id, *version, name)
                .map_err(|e| GlError::History {
                    msg: format!("Line {}: {}", line_num, e),
                })?;
        }
        rows += 1;
    }

    let Some(header) = header else {
        return Err(GlError::History {
            msg: "No header row found".to_string(),
        });
    };

    let index = builder.build();
    info!(
        "Loaded {} accessions across {} versions",
        index.id_count(),
        header.versions.len()
    );
    debug!("Read {} history rows", rows);
    Ok(index)
}

/// `None` for absent cells, the bare name otherwise
fn normalize_cell(cell: &str) -> Option<&str> {
    let cell = cell.trim();
    if ABSENT.contains(&cell) {
        return None;
    }
    Some(cell.strip_prefix(NAMESPACE_PREFIX).unwrap_or(cell))
}

struct Header {
    delimiter: char,
    versions: Vec<DbVersion>,
}

impl Header {
    fn parse(line: &str, line_num: usize) -> Result<Self, GlError> {
        let delimiter = if line.contains('\t') { '\t' } else { ',' };
        let mut columns = line.split(delimiter).map(str::trim);

        let first = columns.next().unwrap_or_default();
        if !first.eq_ignore_ascii_case("HLA_ID") {
            return Err(GlError::History {
                msg: format!(
                    "Line {}: expected header starting with HLA_ID, found '{}'",
                    line_num, first
                ),
            });
        }

        let versions = columns
            .map(|col| {
                col.parse::<DbVersion>().map_err(|_| GlError::History {
                    msg: format!("Line {}: invalid version column '{}'", line_num, col),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if versions.is_empty() {
            return Err(GlError::History {
                msg: format!("Line {}: header has no version columns", line_num),
            });
        }
        Ok(Self {
            delimiter,
            versions,
        })
    }
}
