use crate::config::check_coordinate_range;
use crate::{EngineError, InvalidParameterSnafu};
use rand::RngExt;
use snafu::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::slice::ChunksExact;

pub const MIN_DIMENSION: usize = 2;
pub const MIN_COUNT: usize = 2;

/// Largest flat buffer a point set may hold.
const MAX_COORDINATES: usize = isize::MAX as usize / size_of::<f32>();

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum PointFileError {
    #[snafu(display("can't open point file {}", path.display()))]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("can't read point file {}", path.display()))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("can't write point file {}", path.display()))]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("{}:{line}: {reason}", path.display()))]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

/// N points of a fixed dimension, stored row-major in one flat buffer:
/// point `i` occupies `coords[i * dimension..(i + 1) * dimension]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointSet {
    dimension: usize,
    coords: Vec<f32>,
}

fn check_shape(dimension: usize, count: usize) -> Result<(), EngineError> {
    ensure!(
        dimension >= MIN_DIMENSION,
        InvalidParameterSnafu {
            name: "dimension",
            reason: format!("{dimension} is below the minimum of {MIN_DIMENSION}"),
        }
    );
    ensure!(
        count >= MIN_COUNT,
        InvalidParameterSnafu {
            name: "point count",
            reason: format!("{count} is below the minimum of {MIN_COUNT}"),
        }
    );
    ensure!(
        coordinate_count(dimension, count).is_some(),
        InvalidParameterSnafu {
            name: "point count",
            reason: format!("{count} points of dimension {dimension} don't fit in memory"),
        }
    );
    Ok(())
}

fn coordinate_count(dimension: usize, count: usize) -> Option<usize> {
    dimension
        .checked_mul(count)
        .filter(|&n| n <= MAX_COORDINATES)
}

impl PointSet {
    /// Wraps an existing row-major buffer. The buffer length must be a
    /// multiple of `dimension` and hold at least two points.
    pub fn from_flat(dimension: usize, coords: Vec<f32>) -> Result<Self, EngineError> {
        ensure!(
            dimension >= MIN_DIMENSION,
            InvalidParameterSnafu {
                name: "dimension",
                reason: format!("{dimension} is below the minimum of {MIN_DIMENSION}"),
            }
        );
        ensure!(
            coords.len().is_multiple_of(dimension),
            InvalidParameterSnafu {
                name: "coordinate count",
                reason: format!("{} is not a multiple of dimension {dimension}", coords.len()),
            }
        );
        check_shape(dimension, coords.len() / dimension)?;

        Ok(Self { dimension, coords })
    }

    /// Samples `count` points with every coordinate drawn independently from
    /// `[-range, range)`. This is a per-axis uniform sampler, not a uniform
    /// sampler over a ball.
    pub fn generate(
        rng: &mut impl RngExt,
        dimension: usize,
        count: usize,
        range: f32,
    ) -> Result<Self, EngineError> {
        check_shape(dimension, count)?;
        check_coordinate_range(range)?;

        let coords = (0..dimension * count)
            .map(|_| rng.random_range(-range..range))
            .collect();

        Ok(Self { dimension, coords })
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, PointFileError> {
        let path = path.as_ref();
        let file = File::open(path).context(OpenSnafu { path })?;
        parse(BufReader::new(file), path)
    }

    /// Writes the set in the same text format [`PointSet::load_from_file`] reads.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), PointFileError> {
        let path = path.as_ref();
        let file = File::create(path).context(WriteSnafu { path })?;
        let mut out = BufWriter::new(file);

        writeln!(out, "{}", self.len()).context(WriteSnafu { path })?;
        writeln!(out, "{}", self.dimension).context(WriteSnafu { path })?;
        for point in self.iter() {
            let row = point
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(out, "{row}").context(WriteSnafu { path })?;
        }
        out.flush().context(WriteSnafu { path })
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.coords.len() / self.dimension
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    #[inline]
    pub fn point(&self, i: usize) -> &[f32] {
        &self.coords[i * self.dimension..(i + 1) * self.dimension]
    }

    pub fn iter(&self) -> ChunksExact<'_, f32> {
        // chunks_exact panics on zero, an empty set has nothing to yield anyway
        self.coords.chunks_exact(self.dimension.max(1))
    }

    pub fn as_flat(&self) -> &[f32] {
        &self.coords
    }
}

type NumberedLine = (usize, std::io::Result<String>);

fn read_header(
    lines: &mut impl Iterator<Item = NumberedLine>,
    path: &Path,
    line_no: usize,
    what: &str,
) -> Result<usize, PointFileError> {
    let (_, line) = lines.next().context(MalformedSnafu {
        path,
        line: line_no,
        reason: format!("missing {what}"),
    })?;
    let line = line.context(ReadSnafu { path })?;
    let trimmed = line.trim();

    trimmed.parse::<usize>().ok().context(MalformedSnafu {
        path,
        line: line_no,
        reason: format!("expected {what}, got {trimmed:?}"),
    })
}

/// Header is the point count then the dimension, one per line, followed by one
/// whitespace-separated row per point. Blank lines are skipped; any mismatch
/// between the header and the rows is rejected.
fn parse(reader: impl BufRead, path: &Path) -> Result<PointSet, PointFileError> {
    let mut lines = reader.lines().enumerate().map(|(i, l)| (i + 1, l));

    let count = read_header(&mut lines, path, 1, "point count")?;
    let dimension = read_header(&mut lines, path, 2, "dimension")?;
    ensure!(
        count >= MIN_COUNT,
        MalformedSnafu {
            path,
            line: 1usize,
            reason: format!("point count must be at least {MIN_COUNT}, got {count}"),
        }
    );
    ensure!(
        dimension >= MIN_DIMENSION,
        MalformedSnafu {
            path,
            line: 2usize,
            reason: format!("dimension must be at least {MIN_DIMENSION}, got {dimension}"),
        }
    );

    let total = coordinate_count(dimension, count).context(MalformedSnafu {
        path,
        line: 1usize,
        reason: format!("{count} points of dimension {dimension} don't fit in memory"),
    })?;

    // The header is untrusted, don't let it drive a huge allocation up front
    let mut coords = Vec::with_capacity(total.min(1 << 20));
    let mut rows = 0;
    let mut last_line = 2;

    for (line_no, line) in lines {
        let line = line.context(ReadSnafu { path })?;
        last_line = line_no;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        ensure!(
            rows < count,
            MalformedSnafu {
                path,
                line: line_no,
                reason: format!("header declares {count} points but more rows follow"),
            }
        );

        let before = coords.len();
        for token in trimmed.split_whitespace() {
            let value = token
                .parse::<f32>()
                .ok()
                .with_context(|| MalformedSnafu {
                    path,
                    line: line_no,
                    reason: format!("invalid coordinate {token:?}"),
                })?;
            // f32 parsing accepts "nan", "inf" and out-of-range literals like 1e39
            ensure!(
                value.is_finite(),
                MalformedSnafu {
                    path,
                    line: line_no,
                    reason: format!("non-finite coordinate {token:?}"),
                }
            );
            coords.push(value);
        }

        let found = coords.len() - before;
        ensure!(
            found == dimension,
            MalformedSnafu {
                path,
                line: line_no,
                reason: format!("expected {dimension} coordinates, found {found}"),
            }
        );
        rows += 1;
    }

    ensure!(
        rows == count,
        MalformedSnafu {
            path,
            line: last_line,
            reason: format!("header declares {count} points, found {rows}"),
        }
    );

    Ok(PointSet { dimension, coords })
}
