use std::collections::HashSet;
use std::fmt;

use itertools::Itertools;
use miette::Diagnostic;
use nom::{
    bytes::complete::tag,
    character::complete::{char, i32 as parse_i32, newline},
    combinator::map,
    multi::separated_list1,
    sequence::separated_pair,
    IResult,
};
use thiserror::Error;

/// Sand pours into the cave from this cell.
pub const SAND_SPAWN: Coord = Coord { x: 500, y: 0 };

#[derive(Debug, Error, Diagnostic)]
pub enum CaveError {
    #[error("failed to parse rock paths: {0}")]
    #[diagnostic(code(day14::parse_error))]
    Parse(String),

    #[error("rock path segment {from} -> {to} changes both axes")]
    #[diagnostic(code(day14::diagonal_segment))]
    DiagonalSegment { from: Coord, to: Coord },

    #[error("no rock geometry to settle on")]
    #[diagnostic(code(day14::empty_geometry))]
    EmptyGeometry,

    #[error("spawn point {0} is already occupied")]
    #[diagnostic(code(day14::spawn_blocked))]
    SpawnBlocked(Coord),
}

impl<E> From<nom::Err<E>> for CaveError
where
    E: std::fmt::Debug,
{
    fn from(err: nom::Err<E>) -> Self {
        CaveError::Parse(format!("{:?}", err))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn down(self) -> Self {
        Self::new(self.x, self.y + 1)
    }

    fn down_left(self) -> Self {
        Self::new(self.x - 1, self.y + 1)
    }

    fn down_right(self) -> Self {
        Self::new(self.x + 1, self.y + 1)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// What happens below the lowest rock row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorPolicy {
    /// Units falling past the lowest rock are lost.
    Open,
    /// A solid floor row stops every unit.
    Closed { floor: i32 },
}

/// Terminal state of one falling unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitOutcome {
    Rested(Coord),
    Escaped,
}

/// Sparse cave: fixed rock cells plus the sand that has come to rest so far.
#[derive(Debug, Clone)]
pub struct Cave {
    rocks: HashSet<Coord>,
    sand: HashSet<Coord>,
    spawn: Coord,
    lowest_rock: i32,
    policy: FloorPolicy,
    trail: Vec<Coord>,
    count_deltas: Vec<u64>,
}

impl Cave {
    pub fn open(rocks: HashSet<Coord>) -> Result<Self, CaveError> {
        Self::with_policy(rocks, false)
    }

    pub fn closed(rocks: HashSet<Coord>) -> Result<Self, CaveError> {
        Self::with_policy(rocks, true)
    }

    fn with_policy(rocks: HashSet<Coord>, closed: bool) -> Result<Self, CaveError> {
        let lowest_rock = rocks
            .iter()
            .map(|c| c.y)
            .max()
            .ok_or(CaveError::EmptyGeometry)?;

        let policy = if closed {
            FloorPolicy::Closed {
                floor: lowest_rock + 2,
            }
        } else {
            FloorPolicy::Open
        };

        Ok(Self {
            rocks,
            sand: HashSet::new(),
            spawn: SAND_SPAWN,
            lowest_rock,
            policy,
            trail: Vec::new(),
            count_deltas: Vec::new(),
        })
    }

    fn is_empty(&self, pos: Coord) -> bool {
        if self.rocks.contains(&pos) || self.sand.contains(&pos) {
            return false;
        }
        match self.policy {
            FloorPolicy::Open => true,
            FloorPolicy::Closed { floor } => pos.y != floor,
        }
    }

    /// Start position for the next unit: the deepest cell of the previous
    /// unit's falling path, or the spawn point when no path is remembered.
    /// Cells on the remembered path were empty when visited and only the
    /// previous unit's resting cell has been filled since.
    fn release_unit(&mut self) -> Result<Coord, CaveError> {
        if let Some(resume) = self.trail.pop() {
            return Ok(resume);
        }
        if !self.is_empty(self.spawn) {
            return Err(CaveError::SpawnBlocked(self.spawn));
        }
        Ok(self.spawn)
    }

    /// Steps one unit to its terminal state, trying straight-down, then
    /// down-left, then down-right until no move is legal.
    pub fn drop_unit(&mut self) -> Result<UnitOutcome, CaveError> {
        let mut pos = self.release_unit()?;

        loop {
            self.trail.push(pos);

            // A unit at the lowest rock row has nothing left to land on.
            // Assumes no overhang juts out below the lowest rock cell.
            if matches!(self.policy, FloorPolicy::Open) && pos.y >= self.lowest_rock {
                self.count_deltas.push(0);
                return Ok(UnitOutcome::Escaped);
            }

            match [pos.down(), pos.down_left(), pos.down_right()]
                .into_iter()
                .find(|&target| self.is_empty(target))
            {
                Some(next) => pos = next,
                None => {
                    self.sand.insert(pos);
                    self.trail.pop();
                    self.count_deltas.push(1);
                    return Ok(UnitOutcome::Rested(pos));
                }
            }
        }
    }

    pub fn resting_units(&self) -> usize {
        self.sand.len()
    }

    pub fn sand(&self) -> &HashSet<Coord> {
        &self.sand
    }

    pub fn lowest_rock(&self) -> i32 {
        self.lowest_rock
    }

    /// Per-unit change of the resting count: 1 for a rest, 0 for an escape.
    pub fn count_deltas(&self) -> &[u64] {
        &self.count_deltas
    }
}

impl fmt::Display for Cave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells = || self.rocks.iter().chain(self.sand.iter());
        let min_x = cells().map(|c| c.x).min().unwrap_or(self.spawn.x).min(self.spawn.x);
        let max_x = cells().map(|c| c.x).max().unwrap_or(self.spawn.x).max(self.spawn.x);
        let max_y = cells().map(|c| c.y).max().unwrap_or(self.spawn.y).max(self.spawn.y);

        for y in self.spawn.y.min(0)..=max_y {
            for x in min_x..=max_x {
                let pos = Coord::new(x, y);
                let glyph = if pos == self.spawn {
                    '+'
                } else if self.rocks.contains(&pos) {
                    '#'
                } else if self.sand.contains(&pos) {
                    'o'
                } else {
                    '.'
                };
                write!(f, "{}", glyph)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Expands polyline rock paths into the set of occupied rock cells.
pub fn parse_rock_paths(input: &str) -> Result<HashSet<Coord>, CaveError> {
    let (_, paths) = parse_paths(input.trim())?;

    let mut rocks = HashSet::new();
    for path in paths {
        for (from, to) in path.into_iter().tuple_windows() {
            if from.x != to.x && from.y != to.y {
                return Err(CaveError::DiagonalSegment { from, to });
            }
            for x in from.x.min(to.x)..=from.x.max(to.x) {
                for y in from.y.min(to.y)..=from.y.max(to.y) {
                    rocks.insert(Coord::new(x, y));
                }
            }
        }
    }

    Ok(rocks)
}

// region: nom parser
fn parse_coord(input: &str) -> IResult<&str, Coord> {
    map(
        separated_pair(parse_i32, char(','), parse_i32),
        |(x, y)| Coord::new(x, y),
    )(input)
}

fn parse_path(input: &str) -> IResult<&str, Vec<Coord>> {
    separated_list1(tag(" -> "), parse_coord)(input)
}

fn parse_paths(input: &str) -> IResult<&str, Vec<Vec<Coord>>> {
    separated_list1(newline, parse_path)(input)
}
// endregion
