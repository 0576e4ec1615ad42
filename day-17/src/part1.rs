use crate::chamber::{parse_jets, Chamber, CHAMBER_WIDTH};

pub const ROCK_COUNT: u64 = 2022;

#[tracing::instrument]
pub fn process(input: &str) -> miette::Result<String> {
    let jets = parse_jets(input)?;
    let mut chamber = Chamber::new(CHAMBER_WIDTH, jets)?;

    chamber.simulate(ROCK_COUNT);

    tracing::debug!(
        rocks = chamber.rocks_dropped(),
        height = chamber.tower_height(),
        "simulation complete"
    );

    Ok(chamber.tower_height().to_string())
}
