use miette::miette;

use crate::chamber::{parse_jets, Chamber, CHAMBER_WIDTH};
use crate::cycle::{find_repeat, project};

pub const ROCK_COUNT: u64 = 1_000_000_000_000;

/// Rocks simulated to record the delta sequence the repeat search runs on.
const SAMPLE_ROCKS: u64 = 10_000;

#[tracing::instrument]
pub fn process(input: &str, total_rocks: u64) -> miette::Result<String> {
    let jets = parse_jets(input)?;
    let mut chamber = Chamber::new(CHAMBER_WIDTH, jets)?;

    let sample_rocks = SAMPLE_ROCKS.min(total_rocks);
    chamber.simulate(sample_rocks);

    let deltas = chamber.height_deltas().to_vec();
    let Some((offset, period)) = find_repeat(&deltas) else {
        tracing::debug!(
            sample_rocks,
            "no repeating block in the sampled deltas, simulating every rock"
        );
        chamber.simulate(total_rocks - sample_rocks);
        return Ok(chamber.tower_height().to_string());
    };
    tracing::debug!(offset, period, "found repeating block");

    let offset_deltas = &deltas[..offset];
    let cycle_deltas = &deltas[offset..offset + period];

    // The projection must reproduce the simulated sample exactly before it
    // can be trusted beyond it.
    let check = project(sample_rocks, offset_deltas, cycle_deltas);
    if check != chamber.tower_height() {
        return Err(miette!(
            "projection disagrees with simulation after {} rocks: {} != {}",
            sample_rocks,
            check,
            chamber.tower_height()
        ));
    }

    Ok(project(total_rocks, offset_deltas, cycle_deltas).to_string())
}
