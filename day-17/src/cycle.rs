use itertools::Itertools;

/// Searches a recorded delta sequence for a periodic suffix.
///
/// Offsets are scanned ascending over `0..len / 2`, and for each offset,
/// period lengths ascending over `1..(len - offset) / 2`, so the smallest
/// offset wins and, for that offset, the smallest period. A candidate
/// matches when the sequence from `offset` on is an exact repetition of
/// its first `period` elements; a trailing partial block is ignored.
pub fn find_repeat(seq: &[i64]) -> Option<(usize, usize)> {
    for offset in 0..seq.len() / 2 {
        let tail = &seq[offset..];
        for period in 1..tail.len() / 2 {
            if tail
                .chunks(period)
                .filter(|chunk| chunk.len() == period)
                .all_equal()
            {
                return Some((offset, period));
            }
        }
    }

    None
}

/// Cumulative sum of the first `total_units` elements of the sequence
/// `offset_deltas` followed by `cycle_deltas` repeated forever, without
/// materializing it. `cycle_deltas` must not be empty.
pub fn project(total_units: u64, offset_deltas: &[i64], cycle_deltas: &[i64]) -> i64 {
    if total_units <= offset_deltas.len() as u64 {
        return offset_deltas[..total_units as usize].iter().sum();
    }

    let remaining = total_units - offset_deltas.len() as u64;
    let full_cycles = remaining / cycle_deltas.len() as u64;
    let remainder = (remaining % cycle_deltas.len() as u64) as usize;

    offset_deltas.iter().sum::<i64>()
        + full_cycles as i64 * cycle_deltas.iter().sum::<i64>()
        + cycle_deltas[..remainder].iter().sum::<i64>()
}
