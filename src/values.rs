use rand::Rng;

/// Source of freshly spawned tile values.
///
/// Values come from whatever `Rng` the caller supplies, so a seeded
/// `StdRng` gives reproducible games.
pub struct ValueGenerator;

impl ValueGenerator {
    /// Out of ten draws, this many produce a 2.
    pub const TWO_WEIGHT: u32 = 9;

    /// Return 2 (90%) or 4 (10%).
    ///
    /// ```
    /// use grid_2048::values::ValueGenerator;
    /// use rand::{rngs::StdRng, SeedableRng};
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let v = ValueGenerator::generate(&mut rng);
    /// assert!(v == 2 || v == 4);
    /// ```
    #[inline]
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> u32 {
        if rng.gen_range(0..10) < Self::TWO_WEIGHT { 2 } else { 4 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn only_twos_and_fours() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1_000 {
            let v = ValueGenerator::generate(&mut rng);
            assert!(v == 2 || v == 4, "unexpected value {v}");
        }
    }

    #[test]
    fn twos_dominate() {
        let mut rng = StdRng::seed_from_u64(2);
        let n = 10_000;
        let twos = (0..n).filter(|_| ValueGenerator::generate(&mut rng) == 2).count();
        // 90% expected; a wide band keeps this robust to the seed
        assert!(twos > n * 85 / 100 && twos < n * 95 / 100, "twos = {twos}");
    }

    #[test]
    fn seeded_sources_repeat() {
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        let xs: Vec<u32> = (0..64).map(|_| ValueGenerator::generate(&mut a)).collect();
        let ys: Vec<u32> = (0..64).map(|_| ValueGenerator::generate(&mut b)).collect();
        assert_eq!(xs, ys);
    }
}
