//! Potentiometer-to-delay conversion for long-press detection.
//!
//! The delay pot is sampled by a 10-bit ADC. Each count is worth 6 ms, the
//! lowest settings collapse to zero ("already expired") and the top of the
//! range is capped at six seconds.

/// Milliseconds contributed by each ADC count.
pub const DELAY_SCALE: u32 = 6;
/// Longest long-press delay the pot can select.
pub const DELAY_CEILING_MS: u16 = 6_000;
/// Delays at or below this value convert to zero.
pub const DELAY_FLOOR_MS: u16 = 600;
/// Floor used by the earlier PIC18LF4550 board revision.
pub const LEGACY_DELAY_FLOOR_MS: u16 = 500;
/// Largest sample the 10-bit converter produces.
pub const MAX_POT_SAMPLE: u16 = 1_023;

/// Maps a raw pot sample to a clamped millisecond delay.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DelayTimeConverter {
    floor_ms: u16,
}

impl DelayTimeConverter {
    /// Creates a converter using the provided zero floor.
    #[must_use]
    pub const fn new(floor_ms: u16) -> Self {
        Self { floor_ms }
    }

    /// Returns the floor below which every delay reads as zero.
    #[must_use]
    pub const fn floor_ms(&self) -> u16 {
        self.floor_ms
    }

    /// Converts a raw sample into a delay in milliseconds.
    ///
    /// Samples above the 10-bit range are accepted and simply clamp to the
    /// ceiling.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn convert(&self, sample: u16) -> u16 {
        let scaled = sample as u32 * DELAY_SCALE;
        if scaled <= self.floor_ms as u32 {
            0
        } else if scaled > DELAY_CEILING_MS as u32 {
            DELAY_CEILING_MS
        } else {
            scaled as u16
        }
    }
}

impl Default for DelayTimeConverter {
    fn default() -> Self {
        Self::new(DELAY_FLOOR_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bottom_of_range_reads_as_zero() {
        let converter = DelayTimeConverter::default();
        assert_eq!(converter.convert(0), 0);
        assert_eq!(converter.convert(100), 0);
        assert_eq!(converter.convert(101), 606);
    }

    #[test]
    fn top_of_range_clamps_to_ceiling() {
        let converter = DelayTimeConverter::default();
        assert_eq!(converter.convert(1_000), DELAY_CEILING_MS);
        assert_eq!(converter.convert(MAX_POT_SAMPLE), DELAY_CEILING_MS);
        assert_eq!(converter.convert(u16::MAX), DELAY_CEILING_MS);
    }

    #[test]
    fn conversion_is_monotonic() {
        let converter = DelayTimeConverter::default();
        let mut previous = 0;
        for sample in 0..=MAX_POT_SAMPLE {
            let delay = converter.convert(sample);
            assert!(delay >= previous, "sample {sample} went backwards");
            previous = delay;
        }
    }

    #[test]
    fn legacy_floor_admits_shorter_delays() {
        let converter = DelayTimeConverter::new(LEGACY_DELAY_FLOOR_MS);
        assert_eq!(converter.convert(83), 0);
        assert_eq!(converter.convert(84), 504);
        assert_eq!(converter.convert(100), 600);
    }
}
