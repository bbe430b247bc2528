//! Parameter modulation primitives.

/*
Parameter Modulation
====================

An LFO on a step voice adds to exactly one parameter: oscillator pitch,
envelope gain, or filter cutoff.

    modulated_value = base_value + (modulator_output × depth)

Example: cutoff 1000 Hz, depth 500, sine LFO in [-1, +1]

    LFO = -1.0  ->  cutoff =  500 Hz
    LFO =  0.0  ->  cutoff = 1000 Hz
    LFO = +1.0  ->  cutoff = 1500 Hz

Gain is the odd one out. The envelope is itself automation on the gain, so
the LFO is added on top of whatever the envelope is doing at that moment,
and can push the gain negative for a moment when depth exceeds the level.


Block-Rate Modulation
---------------------

Nodes are rendered one render quantum (128 samples) at a time, and the
modulated parameter is updated once per quantum from the average of the
LFO over that quantum. At 48 kHz a quantum is ~2.7 ms, so an LFO at 10 Hz
is sampled ~37 times per cycle.

The target node clamps the result to its valid range. Pitch stays in
[20, 20000] Hz, cutoff in [10 Hz, 0.49 × sample rate].
*/

/// Average of a modulator signal over a block.
#[inline]
pub fn block_average(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f32>() / samples.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_average() {
        let samples = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(block_average(&samples), 2.5);
    }

    #[test]
    fn test_block_average_empty() {
        let samples: [f32; 0] = [];
        assert_eq!(block_average(&samples), 0.0);
    }
}
