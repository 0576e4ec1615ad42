use std::collections::HashSet;
use std::fmt;

use miette::Diagnostic;
use nom::{
    branch::alt,
    character::complete::char,
    combinator::{all_consuming, value},
    multi::many1,
    IResult,
};
use thiserror::Error;

pub const CHAMBER_WIDTH: i64 = 7;

/// Rocks appear two cells in from the left wall, with a three-row gap
/// above the tower.
const SPAWN_LEFT: i64 = 2;
const SPAWN_GAP: i64 = 4;

/// Shape cells as (x, y) offsets from the bottom-left anchor, y pointing up.
/// Shapes cycle in this order: bar, plus, corner, pole, square.
const ROCK_SHAPES: [&[(i64, i64)]; 5] = [
    &[(0, 0), (1, 0), (2, 0), (3, 0)],
    &[(0, 1), (1, 0), (1, 1), (1, 2), (2, 1)],
    &[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)],
    &[(0, 0), (0, 1), (0, 2), (0, 3)],
    &[(0, 0), (0, 1), (1, 0), (1, 1)],
];

pub const ROCK_SHAPE_COUNT: usize = ROCK_SHAPES.len();

#[derive(Debug, Error, Diagnostic)]
pub enum ChamberError {
    #[error("failed to parse jet pattern: {0}")]
    #[diagnostic(code(day17::parse_error))]
    Parse(String),

    #[error("chamber width {width} cannot hold a rock")]
    #[diagnostic(code(day17::degenerate_chamber))]
    DegenerateChamber { width: i64 },

    #[error("jet pattern is empty")]
    #[diagnostic(code(day17::empty_jet_pattern))]
    EmptyJetPattern,
}

impl<E> From<nom::Err<E>> for ChamberError
where
    E: std::fmt::Debug,
{
    fn from(err: nom::Err<E>) -> Self {
        ChamberError::Parse(format!("{:?}", err))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub x: i64,
    pub y: i64,
}

impl Coord {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    fn offset(self, dx: i64, dy: i64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// One lateral push from the jet stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jet {
    Left,
    Right,
}

impl Jet {
    fn dx(self) -> i64 {
        match self {
            Jet::Left => -1,
            Jet::Right => 1,
        }
    }
}

#[derive(Debug, Clone)]
struct Rock {
    cells: Vec<Coord>,
}

impl Rock {
    fn spawn(shape: usize, left: i64, bottom: i64) -> Self {
        Self {
            cells: ROCK_SHAPES[shape]
                .iter()
                .map(|&(dx, dy)| Coord::new(left + dx, bottom + dy))
                .collect(),
        }
    }

    fn can_move(&self, chamber: &Chamber, dx: i64, dy: i64) -> bool {
        self.cells
            .iter()
            .all(|&cell| chamber.is_available(cell.offset(dx, dy)))
    }

    fn apply(&mut self, dx: i64, dy: i64) {
        for cell in &mut self.cells {
            *cell = cell.offset(dx, dy);
        }
    }
}

/// Tall chamber with solid side walls and a solid floor at y = 0. Landed
/// rock cells accumulate in a sparse occupancy set; the tower height and
/// the per-rock height gain are tracked as rocks land.
#[derive(Debug, Clone)]
pub struct Chamber {
    width: i64,
    occupied: HashSet<Coord>,
    jets: Vec<Jet>,
    jet_cursor: usize,
    shape_cursor: usize,
    tower_height: i64,
    height_deltas: Vec<i64>,
}

impl Chamber {
    pub fn new(width: i64, jets: Vec<Jet>) -> Result<Self, ChamberError> {
        if width <= 0 {
            return Err(ChamberError::DegenerateChamber { width });
        }
        if jets.is_empty() {
            return Err(ChamberError::EmptyJetPattern);
        }

        Ok(Self {
            width,
            occupied: HashSet::new(),
            jets,
            jet_cursor: 0,
            shape_cursor: 0,
            tower_height: 0,
            height_deltas: Vec::new(),
        })
    }

    fn is_available(&self, pos: Coord) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y > 0 && !self.occupied.contains(&pos)
    }

    fn next_jet(&mut self) -> Jet {
        let jet = self.jets[self.jet_cursor];
        self.jet_cursor = (self.jet_cursor + 1) % self.jets.len();
        jet
    }

    fn next_shape(&mut self) -> usize {
        let shape = self.shape_cursor;
        self.shape_cursor = (self.shape_cursor + 1) % ROCK_SHAPE_COUNT;
        shape
    }

    /// Drops one rock: alternating jet push and fall until the rock cannot
    /// fall, then merges it into the occupancy set.
    pub fn drop_rock(&mut self) {
        let shape = self.next_shape();
        let mut rock = Rock::spawn(shape, SPAWN_LEFT, self.tower_height + SPAWN_GAP);
        let before = self.tower_height;

        loop {
            let dx = self.next_jet().dx();
            if rock.can_move(self, dx, 0) {
                rock.apply(dx, 0);
            }

            if rock.can_move(self, 0, -1) {
                rock.apply(0, -1);
            } else {
                for &cell in &rock.cells {
                    self.tower_height = self.tower_height.max(cell.y);
                }
                self.occupied.extend(rock.cells.iter().copied());
                self.height_deltas.push(self.tower_height - before);
                return;
            }
        }
    }

    pub fn simulate(&mut self, rocks: u64) {
        for _ in 0..rocks {
            self.drop_rock();
        }
    }

    pub fn tower_height(&self) -> i64 {
        self.tower_height
    }

    /// Height gained by each rock dropped so far, in drop order.
    pub fn height_deltas(&self) -> &[i64] {
        &self.height_deltas
    }

    pub fn rocks_dropped(&self) -> usize {
        self.height_deltas.len()
    }
}

impl fmt::Display for Chamber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (1..=self.tower_height).rev() {
            write!(f, "|")?;
            for x in 0..self.width {
                let glyph = if self.occupied.contains(&Coord::new(x, y)) {
                    '#'
                } else {
                    '.'
                };
                write!(f, "{}", glyph)?;
            }
            writeln!(f, "|")?;
        }

        write!(f, "+")?;
        for _ in 0..self.width {
            write!(f, "-")?;
        }
        writeln!(f, "+")
    }
}

/// Parses a jet pattern line of `<` and `>` characters.
pub fn parse_jets(input: &str) -> Result<Vec<Jet>, ChamberError> {
    let (_, jets) = jet_pattern(input.trim())?;
    Ok(jets)
}

// region: nom parser
fn jet_pattern(input: &str) -> IResult<&str, Vec<Jet>> {
    all_consuming(many1(alt((
        value(Jet::Left, char('<')),
        value(Jet::Right, char('>')),
    ))))(input)
}
// endregion

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::mixed("><>", vec![Jet::Right, Jet::Left, Jet::Right])]
    #[case::all_left("<<", vec![Jet::Left, Jet::Left])]
    #[case::trailing_newline(">><\n", vec![Jet::Right, Jet::Right, Jet::Left])]
    fn test_parse_jets(#[case] input: &str, #[case] expected: Vec<Jet>) -> miette::Result<()> {
        assert_eq!(parse_jets(input)?, expected);
        Ok(())
    }

    #[rstest]
    #[case::stray_character("><x>")]
    #[case::empty("")]
    #[case::blank_line("\n")]
    fn test_parse_jets_rejects(#[case] input: &str) {
        assert!(matches!(parse_jets(input), Err(ChamberError::Parse(_))));
    }

    #[test]
    fn test_degenerate_chamber_is_rejected() {
        assert!(matches!(
            Chamber::new(0, vec![Jet::Left]),
            Err(ChamberError::DegenerateChamber { width: 0 })
        ));
        assert!(matches!(
            Chamber::new(CHAMBER_WIDTH, Vec::new()),
            Err(ChamberError::EmptyJetPattern)
        ));
    }

    #[test_log::test]
    fn test_first_rock_lands_on_floor() -> miette::Result<()> {
        let mut chamber = Chamber::new(CHAMBER_WIDTH, parse_jets(">>><<")?)?;
        chamber.drop_rock();

        // The bar falls through the three-row gap and lands flush on the
        // floor, one cell tall.
        assert_eq!(chamber.tower_height(), 1);
        assert_eq!(chamber.height_deltas(), [1]);
        Ok(())
    }

    #[test]
    fn test_shapes_and_jets_cycle_deterministically() -> miette::Result<()> {
        let jets = parse_jets("><")?;
        let mut first = Chamber::new(CHAMBER_WIDTH, jets.clone())?;
        let mut second = Chamber::new(CHAMBER_WIDTH, jets)?;

        first.simulate(10);
        second.simulate(10);

        assert_eq!(first.rocks_dropped(), 10);
        assert_eq!(first.height_deltas(), second.height_deltas());
        assert_eq!(first.tower_height(), second.tower_height());
        Ok(())
    }

    #[test]
    fn test_display_draws_walls_and_floor() -> miette::Result<()> {
        let mut chamber = Chamber::new(CHAMBER_WIDTH, parse_jets("><")?)?;
        chamber.drop_rock();

        let drawn = chamber.to_string();
        assert!(drawn.lines().all(|line| line.len() == 9));
        assert!(drawn.ends_with("+-------+\n"));
        assert!(drawn.contains('#'));
        Ok(())
    }
}
