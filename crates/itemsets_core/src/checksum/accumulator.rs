//! Running total with the client's carry and band-crossing behaviour.

const INITIAL_TOTAL: i64 = 83;
const INITIAL_BASELINE: i64 = 0x8080;
const LOW_BYTE_LIMIT: i64 = 128;
const CARRY: i64 = 0x8000;
const BAND_WIDTH: i64 = 256;
const BAND_PADDING: i64 = 128;

/// `(total, baseline)` pair threaded through one checksum computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Accumulator {
    total: i64,
    baseline: i64,
}

impl Accumulator {
    pub(crate) fn new() -> Self {
        Self {
            total: INITIAL_TOTAL,
            baseline: INITIAL_BASELINE,
        }
    }

    pub(crate) fn total(&self) -> i64 {
        self.total
    }

    /// Subtracts `value` without any carry or band handling.
    pub(crate) fn rebate(&mut self, value: i64) {
        self.total -= value;
    }

    /// Adds `value`.
    ///
    /// Crossing 128 from below carries `0x8000` first. Afterwards every time
    /// the total passes the baseline, the baseline moves up one 256-wide band
    /// and the total pays 128 extra; the padding itself can cross the next
    /// band too.
    pub(crate) fn accumulate(&mut self, value: i64) {
        if self.total < LOW_BYTE_LIMIT && value + self.total >= LOW_BYTE_LIMIT {
            self.total += CARRY;
        }

        self.total += value;
        while self.total > self.baseline {
            self.baseline += BAND_WIDTH;
            self.total += BAND_PADDING;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Accumulator;

    #[test]
    fn starts_at_initial_state() {
        let acc = Accumulator::new();
        assert_eq!(acc.total, 83);
        assert_eq!(acc.baseline, 0x8080);
    }

    #[test]
    fn small_values_below_low_byte_limit_add_plainly() {
        let mut acc = Accumulator::new();
        acc.accumulate(44);
        assert_eq!(acc.total(), 127);
        assert_eq!(acc.baseline, 0x8080);
    }

    #[test]
    fn crossing_low_byte_limit_carries_into_high_byte() {
        let mut acc = Accumulator::new();
        acc.accumulate(45);
        // 83 + 0x8000 + 45 = 32896 sits exactly on the baseline: no band.
        assert_eq!(acc.total(), 32896);
        assert_eq!(acc.baseline, 0x8080);

        acc.accumulate(1);
        assert_eq!(acc.total(), 32897 + 128);
        assert_eq!(acc.baseline, 0x8180);
    }

    #[test]
    fn padding_can_cross_more_than_one_band() {
        let mut acc = Accumulator {
            total: 33000,
            baseline: 33024,
        };
        acc.accumulate(200);
        // 33200 > 33024 -> 33328 > 33280 -> 33456 <= 33536.
        assert_eq!(acc.total(), 33456);
        assert_eq!(acc.baseline, 33536);
    }

    #[test]
    fn rebate_skips_carry_and_bands() {
        let mut acc = Accumulator::new();
        acc.rebate(128);
        assert_eq!(acc.total(), -45);
        assert_eq!(acc.baseline, 0x8080);
    }
}
