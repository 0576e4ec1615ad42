use crate::cave::{parse_rock_paths, Cave, CaveError};

#[tracing::instrument]
pub fn process(input: &str) -> miette::Result<String> {
    let rocks = parse_rock_paths(input)?;
    let mut cave = Cave::closed(rocks)?;

    loop {
        match cave.drop_unit() {
            Ok(_) => {}
            Err(CaveError::SpawnBlocked(_)) => break,
            Err(err) => return Err(err.into()),
        }
    }

    tracing::debug!(resting = cave.resting_units(), "spawn point blocked");

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
        assert_eq!("93", process(input)?);
        Ok(())
    }

    #[test]
    fn test_closed_cup_outlasts_open_cup() -> miette::Result<()> {
        // Same geometry as the open-floor cup run, which rests 10 units.
        let input = "498,3 -> 498,5 -> 502,5 -> 502,3";
        let resting: usize = process(input)?.parse().unwrap();
        assert!(resting > 10);
        Ok(())
    }
}
