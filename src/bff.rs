//! Reading puzzles from `.bff` files.
//!
//! ```text
//! # comments and blank lines are skipped
//! GRID START
//! o B o
//! o o x
//! GRID STOP
//! A 2
//! C 1
//! L 0 1 1 1
//! P 6 3
//! ```
//!
//! The grid holds open cells `o`, cells where nothing may be placed `x`, and fixed blocks
//! `A` (reflect), `B` (opaque) and `C` (refract). `A n`, `B n` and `C n` give the number of movable
//! blocks of each kind, `L x y dx dy` a laser and `P x y` a sink, all on the doubled lattice.
//! Lines starting with anything else are ignored.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::block::Variant;
use crate::board::Board;
use crate::builder::{BoardBuilder, BuilderInvalidReason};
use crate::cell::Cell;
use crate::location::{Direction, Location, Point};

/// Why a puzzle could not be read.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file could not be read.
    #[error("could not read puzzle: {0}")]
    Io(#[from] std::io::Error),
    /// The input has no grid.
    #[error("no GRID START ... GRID STOP block")]
    MissingGrid,
    /// The grid runs to the end of the input.
    #[error("line {line}: GRID START is never closed by GRID STOP")]
    UnterminatedGrid {
        /// Line of the `GRID START`.
        line: usize,
    },
    /// A grid row is not as wide as the first one.
    #[error("line {line}: grid row has {found} cells, expected {expected}")]
    RaggedGrid {
        /// Line of the row.
        line: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of this row.
        found: usize,
    },
    /// A grid code other than `o`, `x`, `A`, `B` or `C`.
    #[error("line {line}: unknown cell code `{code}`")]
    UnknownCell {
        /// Line of the row.
        line: usize,
        /// The code as written.
        code: String,
    },
    /// A value that should be an integer.
    #[error("line {line}: `{token}` is not a number")]
    BadNumber {
        /// Line of the value.
        line: usize,
        /// The value as written.
        token: String,
    },
    /// A block count, laser or sink with the wrong number of values.
    #[error("line {line}: `{tag}` takes {expected} values, found {found}")]
    WrongArity {
        /// Line of the entry.
        line: usize,
        /// `A`, `B`, `C`, `L` or `P`.
        tag: String,
        /// Values the tag takes.
        expected: usize,
        /// Values given.
        found: usize,
    },
    /// A laser heading that is not one of the four diagonals.
    #[error("line {line}: laser direction ({dx}, {dy}) is not diagonal")]
    BadDirection {
        /// Line of the laser.
        line: usize,
        /// Horizontal component as written.
        dx: i64,
        /// Vertical component as written.
        dy: i64,
    },
    /// The puzzle parsed but does not describe a valid board.
    #[error("invalid puzzle: {0:?}")]
    Invalid(Vec<BuilderInvalidReason>),
}

/// Read and parse the puzzle at `path`.
pub fn read(path: impl AsRef<Path>) -> Result<Board, ParseError> {
    parse(&fs::read_to_string(path)?)
}

/// Parse the contents of a `.bff` file.
pub fn parse(input: &str) -> Result<Board, ParseError> {
    let mut lines = input.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

    let mut grid: Option<Vec<Vec<Cell>>> = None;
    let mut movable = Vec::new();
    let mut lasers = Vec::new();
    let mut sinks = Vec::new();

    while let Some((number, line)) = lines.next() {
        if line == "GRID START" {
            grid = Some(read_grid(number, &mut lines)?);
            continue;
        }

        let mut tokens = line.split_whitespace();
        let Some(tag) = tokens.next() else { continue };
        let values = tokens.collect::<Vec<_>>();

        match tag {
            "A" | "B" | "C" => {
                let [count] = numbers::<1>(number, tag, &values)?;
                let count = usize::try_from(count).map_err(|_| ParseError::BadNumber { line: number, token: count.to_string() })?;
                // the tag is always a valid code here
                if let Ok(variant) = Variant::from_str(tag) {
                    movable.push((variant, count));
                }
            }
            "L" => {
                let [x, y, dx, dy] = numbers::<4>(number, tag, &values)?;
                let direction = Direction::from_delta(dx, dy).ok_or(ParseError::BadDirection { line: number, dx, dy })?;
                lasers.push((Point(x, y), direction));
            }
            "P" => {
                let [x, y] = numbers::<2>(number, tag, &values)?;
                sinks.push(Point(x, y));
            }
            _ => {}
        }
    }

    let grid = grid.ok_or(ParseError::MissingGrid)?;
    let width = grid.first().map_or(0, Vec::len);

    let mut builder = BoardBuilder::with_dims((width, grid.len()));
    for (row, cells) in grid.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            builder.set_cell(Location(col + 1, row + 1), *cell);
        }
    }
    for (variant, count) in movable {
        builder.add_movable(variant, count);
    }
    for (position, direction) in lasers {
        builder.add_laser(position, direction);
    }
    for sink in sinks {
        builder.add_sink(sink);
    }

    builder.build().map_err(|reasons| ParseError::Invalid(reasons.clone()))
}

fn read_grid<'a>(start: usize, lines: &mut impl Iterator<Item = (usize, &'a str)>) -> Result<Vec<Vec<Cell>>, ParseError> {
    let mut rows: Vec<Vec<Cell>> = Vec::new();

    for (number, line) in lines.by_ref() {
        if line == "GRID STOP" {
            return Ok(rows);
        }

        let row = line.split_whitespace()
            .map(|code| Cell::from_code(code).ok_or_else(|| ParseError::UnknownCell { line: number, code: code.to_string() }))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(ParseError::RaggedGrid { line: number, expected: first.len(), found: row.len() });
            }
        }
        rows.push(row);
    }

    Err(ParseError::UnterminatedGrid { line: start })
}

fn numbers<const N: usize>(line: usize, tag: &str, values: &[&str]) -> Result<[i64; N], ParseError> {
    if values.len() != N {
        return Err(ParseError::WrongArity { line, tag: tag.to_string(), expected: N, found: values.len() });
    }

    let mut out = [0; N];
    for (slot, token) in out.iter_mut().zip(values) {
        *slot = token.parse().map_err(|_| ParseError::BadNumber { line, token: token.to_string() })?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{parse, ParseError};
    use crate::block::{Block, Variant};
    use crate::builder::BuilderInvalidReason;
    use crate::location::{Direction, Location, Point};
    use crate::ray::Ray;

    const SAMPLE: &str = "# a small puzzle
GRID START
o   B o
o o x
GRID STOP

A 2
C 1

L 0 1 1 1
L 6 3 -1 -1
P 6 3
P 1 0
";

    #[test]
    fn reads_sample() {
        let board = parse(SAMPLE).unwrap();
        assert_eq!(format!("{}", board), "oBo
oox
");
        assert_eq!(board.dims(), (3, 2));
        assert_eq!(board.fixed_blocks(), vec![Block::new(Variant::Opaque, Location(2, 1))]);
        assert_eq!(board.movable_kinds(), vec![Variant::Refract, Variant::Reflect, Variant::Reflect]);
        assert_eq!(board.lasers(), &[
            Ray::new(Point(0, 1), Direction::DownRight),
            Ray::new(Point(6, 3), Direction::UpLeft),
        ]);
        assert_eq!(board.sinks(), &[Point(6, 3), Point(1, 0)]);
    }

    #[test]
    fn grid_errors() {
        assert!(matches!(parse("A 1\nL 0 0 1 1\nP 1 1\n"), Err(ParseError::MissingGrid)));
        assert!(matches!(parse("GRID START\no o\n"), Err(ParseError::UnterminatedGrid { line: 1 })));
        assert!(matches!(parse("GRID START\no o\no\nGRID STOP\n"), Err(ParseError::RaggedGrid { line: 3, expected: 2, found: 1 })));
        match parse("GRID START\no q\nGRID STOP\n") {
            Err(ParseError::UnknownCell { line: 2, code }) => assert_eq!(code, "q"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn line_errors() {
        let grid = "GRID START\no o\nGRID STOP\n";
        assert!(matches!(parse(&format!("{grid}L 0 1 1\n")), Err(ParseError::WrongArity { line: 4, expected: 4, found: 3, .. })));
        assert!(matches!(parse(&format!("{grid}P 1 y\n")), Err(ParseError::BadNumber { line: 4, .. })));
        assert!(matches!(parse(&format!("{grid}A -2\n")), Err(ParseError::BadNumber { line: 4, .. })));
        assert!(matches!(parse(&format!("{grid}L 0 1 0 1\n")), Err(ParseError::BadDirection { line: 4, dx: 0, dy: 1 })));
    }

    #[test]
    fn builder_errors_surface() {
        match parse("GRID START\no o\nGRID STOP\nA 3\nL 0 1 1 1\nP 9 9\n") {
            Err(ParseError::Invalid(reasons)) => assert_eq!(reasons, vec![BuilderInvalidReason::SinkOutOfBounds]),
            other => panic!("unexpected {:?}", other),
        }
        match parse("GRID START\no o\nGRID STOP\nA 3\nL 0 1 1 1\nP 1 2\n") {
            Err(ParseError::Invalid(reasons)) => assert_eq!(reasons, vec![BuilderInvalidReason::TooManyMovableBlocks]),
            other => panic!("unexpected {:?}", other),
        }
    }
}
