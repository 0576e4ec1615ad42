use crate::cave::{parse_rock_paths, Cave, UnitOutcome};

#[tracing::instrument]
pub fn process(input: &str) -> miette::Result<String> {
    let rocks = parse_rock_paths(input)?;
    let mut cave = Cave::open(rocks)?;

    loop {
        match cave.drop_unit()? {
            UnitOutcome::Rested(_) => {}
            UnitOutcome::Escaped => break,
        }
    }

    tracing::debug!(
        resting = cave.resting_units(),
        lowest_rock = cave.lowest_rock(),
        "unit fell past the lowest rock"
    );

    Ok(cave.resting_units().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process() -> miette::Result<()> {
        let input = "\
498,4 -> 498,6 -> 496,6
503,4 -> 502,4 -> 502,9 -> 494,9";
        assert_eq!("24", process(input)?);
        Ok(())
    }

    #[test]
    fn test_process_cup() -> miette::Result<()> {
        // Two short walls and a bottom directly under the spawn point. Ten
        // units fill the cup and its rim; the eleventh slides off the left
        // wall and falls past the lowest rock row.
        let input = "498,3 -> 498,5 -> 502,5 -> 502,3";
        assert_eq!("10", process(input)?);
        Ok(())
    }

    #[test]
    fn test_process_rejects_diagonal_path() {
        assert!(process("498,4 -> 499,5").is_err());
    }
}
