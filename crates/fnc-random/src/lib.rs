#![forbid(unsafe_code)]

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;
const MIX_CONST1: u64 = 0xBF58_476D_1CE4_E5B9;
const MIX_CONST2: u64 = 0x94D0_49BB_1331_11EB;
pub const DEFAULT_RNG_SEED: u64 = 0xC0DE_CAFE_F00D_BAAD;

/// One in `EXTENDED_EXTREME_ODDS` extended-mode draws lands exactly on a bound.
pub const EXTENDED_EXTREME_ODDS: u64 = 8;

pub const RANDOM_REASON_CODES: [&str; 4] = [
    "random_upper_bound_rejected",
    "random_range_inverted",
    "random_bounded_output_contract",
    "random_seed_determinism_contract",
];

/// How a candidate value is drawn.
///
/// The mode is always passed explicitly; generators never infer it from the
/// property being exercised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationMode {
    /// Between the negative-one and positive-one equivalents (zero and one
    /// for unsigned types).
    Unit,
    /// Small values whose canonical string form is exact.
    LowMagnitude,
    /// The full representable range, extremes included.
    Extended,
    /// General-purpose range chosen by the candidate type.
    Default,
}

impl GenerationMode {
    pub const ALL: [Self; 4] = [
        Self::Unit,
        Self::LowMagnitude,
        Self::Extended,
        Self::Default,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::LowMagnitude => "low_magnitude",
            Self::Extended => "extended",
            Self::Default => "default",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "unit" => Some(Self::Unit),
            "low_magnitude" | "low" => Some(Self::LowMagnitude),
            "extended" => Some(Self::Extended),
            "default" => Some(Self::Default),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomError {
    InvalidUpperBound,
    InvertedRange,
}

impl RandomError {
    #[must_use]
    pub const fn reason_code(self) -> &'static str {
        match self {
            Self::InvalidUpperBound => "random_upper_bound_rejected",
            Self::InvertedRange => "random_range_inverted",
        }
    }
}

impl std::fmt::Display for RandomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUpperBound => write!(f, "upper_bound must be > 0"),
            Self::InvertedRange => write!(f, "range low bound exceeds high bound"),
        }
    }
}

impl std::error::Error for RandomError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeterministicRng {
    stream_seed: u64,
    counter: u64,
}

impl DeterministicRng {
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            stream_seed: seed,
            counter: 0,
        }
    }

    #[must_use]
    pub const fn from_state(seed: u64, counter: u64) -> Self {
        Self {
            stream_seed: seed,
            counter,
        }
    }

    #[must_use]
    pub const fn state(self) -> (u64, u64) {
        (self.stream_seed, self.counter)
    }

    pub fn jump_ahead(&mut self, steps: u64) {
        self.counter = self.counter.wrapping_add(steps);
    }

    #[must_use]
    pub fn next_u64(&mut self) -> u64 {
        self.counter = self.counter.wrapping_add(1);
        splitmix64(
            self.stream_seed
                .wrapping_add(self.counter.wrapping_mul(GOLDEN_GAMMA)),
        )
    }

    #[must_use]
    pub fn next_u128(&mut self) -> u128 {
        let high = u128::from(self.next_u64());
        let low = u128::from(self.next_u64());
        (high << 64) | low
    }

    #[must_use]
    pub fn next_f64(&mut self) -> f64 {
        // Sample the high 53 bits for IEEE754 mantissa precision in [0, 1).
        let sample = self.next_u64() >> 11;
        sample as f64 / (1u64 << 53) as f64
    }

    #[must_use]
    pub fn next_bool(&mut self) -> bool {
        self.next_u64() >> 63 == 1
    }

    pub fn bounded_u64(&mut self, upper_bound: u64) -> Result<u64, RandomError> {
        if upper_bound == 0 {
            return Err(RandomError::InvalidUpperBound);
        }

        let threshold = u64::MAX - u64::MAX % upper_bound;

        loop {
            let candidate = self.next_u64();
            if candidate < threshold {
                return Ok(candidate % upper_bound);
            }
        }
    }

    pub fn bounded_u128(&mut self, upper_bound: u128) -> Result<u128, RandomError> {
        if let Ok(narrow) = u64::try_from(upper_bound) {
            return self.bounded_u64(narrow).map(u128::from);
        }

        let threshold = u128::MAX - u128::MAX % upper_bound;

        loop {
            let candidate = self.next_u128();
            if candidate < threshold {
                return Ok(candidate % upper_bound);
            }
        }
    }

    /// Uniform draw from `[low, high]`, both ends inclusive.
    pub fn next_i128_inclusive(&mut self, low: i128, high: i128) -> Result<i128, RandomError> {
        if high < low {
            return Err(RandomError::InvertedRange);
        }
        let span = high.wrapping_sub(low) as u128;
        if span == u128::MAX {
            return Ok(self.next_u128() as i128);
        }
        let offset = self.bounded_u128(span + 1)?;
        Ok(low.wrapping_add(offset as i128))
    }

    /// Draw from `[low, high]`. Interpolates rather than scaling `high - low`
    /// so that spans wider than `f64::MAX` stay finite. Infinite endpoints
    /// interpolate over the finite part of the range.
    pub fn next_f64_between(&mut self, low: f64, high: f64) -> Result<f64, RandomError> {
        if high < low || low.is_nan() || high.is_nan() {
            return Err(RandomError::InvertedRange);
        }
        if low == high {
            return Ok(low);
        }
        let finite_low = low.max(f64::MIN);
        let finite_high = high.min(f64::MAX);
        let t = self.next_f64();
        let sample = finite_low * (1.0 - t) + finite_high * t;
        Ok(sample.clamp(low, high))
    }

    #[must_use]
    pub fn fill_u64(&mut self, len: usize) -> Vec<u64> {
        (0..len).map(|_| self.next_u64()).collect()
    }
}

/// Derives an independent stream seed from a base seed and a list of tags,
/// so every (candidate, property) pair replays without touching the others.
#[must_use]
pub fn derive_seed(base: u64, tags: &[&str]) -> u64 {
    let mut mixed = splitmix64(base);
    for (idx, tag) in tags.iter().enumerate() {
        let idx_u64 = u64::try_from(idx).unwrap_or(u64::MAX);
        mixed = splitmix64(mixed ^ (idx_u64 + 1).wrapping_mul(GOLDEN_GAMMA));
        for byte in tag.bytes() {
            mixed = splitmix64(mixed ^ u64::from(byte));
        }
    }
    mixed
}

/// Values the generator knows how to draw.
pub trait RandomCandidate: Copy + PartialOrd {
    /// Inclusive `(low, high)` range the given mode draws from.
    fn mode_bounds(mode: GenerationMode) -> (Self, Self);

    /// Uniform draw from `[low, high]`. Callers pass ordered bounds.
    fn sample_between(rng: &mut DeterministicRng, low: Self, high: Self) -> Self;

    fn sample(rng: &mut DeterministicRng, mode: GenerationMode) -> Self {
        let (low, high) = Self::mode_bounds(mode);
        if mode == GenerationMode::Extended
            && rng.bounded_u64(EXTENDED_EXTREME_ODDS).unwrap_or(1) == 0
        {
            return if rng.next_bool() { high } else { low };
        }
        Self::sample_between(rng, low, high)
    }
}

/// Integer-backed domain description shared by fixed-point and integer
/// candidates. Everything is expressed in raw (unscaled) units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawDomain {
    pub min: i128,
    pub max: i128,
    /// Raw value of the positive-one equivalent.
    pub one: i128,
    pub low_magnitude: i128,
    pub default_magnitude: i128,
}

impl RawDomain {
    /// Plain integer domain: `one == 1`, low magnitude 1000, default is the
    /// full range.
    #[must_use]
    pub const fn integer(min: i128, max: i128) -> Self {
        let magnitude = if -min > max { -min } else { max };
        Self {
            min,
            max,
            one: 1,
            low_magnitude: 1000,
            default_magnitude: magnitude,
        }
    }

    #[must_use]
    pub const fn is_signed(&self) -> bool {
        self.min < 0
    }

    #[must_use]
    pub fn mode_bounds(&self, mode: GenerationMode) -> (i128, i128) {
        let (low, high) = match mode {
            GenerationMode::Unit => {
                let low = if self.is_signed() { -self.one } else { 0 };
                (low, self.one)
            }
            GenerationMode::LowMagnitude => (-self.low_magnitude, self.low_magnitude),
            GenerationMode::Extended => (self.min, self.max),
            GenerationMode::Default => (-self.default_magnitude, self.default_magnitude),
        };
        (low.max(self.min), high.min(self.max))
    }

    #[must_use]
    pub fn sample_between(&self, rng: &mut DeterministicRng, low: i128, high: i128) -> i128 {
        rng.next_i128_inclusive(low, high).unwrap_or(low)
    }
}

macro_rules! primitive_integer_random {
    ($($ty:ty),* $(,)?) => {
        $(
            impl RandomCandidate for $ty {
                fn mode_bounds(mode: GenerationMode) -> (Self, Self) {
                    let domain =
                        RawDomain::integer(i128::from(<$ty>::MIN), i128::from(<$ty>::MAX));
                    let (low, high) = domain.mode_bounds(mode);
                    (
                        <$ty>::try_from(low).unwrap_or(<$ty>::MIN),
                        <$ty>::try_from(high).unwrap_or(<$ty>::MAX),
                    )
                }

                fn sample_between(rng: &mut DeterministicRng, low: Self, high: Self) -> Self {
                    rng.next_i128_inclusive(i128::from(low), i128::from(high))
                        .ok()
                        .and_then(|raw| <$ty>::try_from(raw).ok())
                        .unwrap_or(low)
                }
            }
        )*
    };
}

primitive_integer_random!(u8, u16, i32, i64);

pub const FLOAT_LOW_MAGNITUDE: f64 = 1000.0;
pub const FLOAT_DEFAULT_MAGNITUDE: f64 = 1.0e6;

macro_rules! primitive_float_random {
    ($($ty:ty),* $(,)?) => {
        $(
            impl RandomCandidate for $ty {
                fn mode_bounds(mode: GenerationMode) -> (Self, Self) {
                    match mode {
                        GenerationMode::Unit => (-1.0, 1.0),
                        GenerationMode::LowMagnitude => {
                            (-FLOAT_LOW_MAGNITUDE as $ty, FLOAT_LOW_MAGNITUDE as $ty)
                        }
                        GenerationMode::Extended => (<$ty>::MIN, <$ty>::MAX),
                        GenerationMode::Default => {
                            (-FLOAT_DEFAULT_MAGNITUDE as $ty, FLOAT_DEFAULT_MAGNITUDE as $ty)
                        }
                    }
                }

                fn sample_between(rng: &mut DeterministicRng, low: Self, high: Self) -> Self {
                    rng.next_f64_between(f64::from(low), f64::from(high))
                        .map_or(low, |sample| (sample as $ty).clamp(low, high))
                }
            }
        )*
    };
}

primitive_float_random!(f32, f64);

fn splitmix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(MIX_CONST1);
    x ^= x >> 27;
    x = x.wrapping_mul(MIX_CONST2);
    x ^ (x >> 31)
}

/// Mode-driven value generator handed to every property check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueGenerator {
    rng: DeterministicRng,
}

impl ValueGenerator {
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            rng: DeterministicRng::new(seed),
        }
    }

    #[must_use]
    pub const fn from_rng(rng: DeterministicRng) -> Self {
        Self { rng }
    }

    #[must_use]
    pub fn rng(&self) -> &DeterministicRng {
        &self.rng
    }

    pub fn rng_mut(&mut self) -> &mut DeterministicRng {
        &mut self.rng
    }

    #[must_use]
    pub fn next_value<T: RandomCandidate>(&mut self, mode: GenerationMode) -> T {
        T::sample(&mut self.rng, mode)
    }

    /// Draws from between two bounds given in either order.
    #[must_use]
    pub fn next_in_range<T: RandomCandidate>(&mut self, bound1: T, bound2: T) -> T {
        let (low, high) = order_bounds(bound1, bound2);
        T::sample_between(&mut self.rng, low, high)
    }

    /// Draws between optional bounds; a missing bound falls back to the
    /// mode's own bound on that side. When the supplied bound lies beyond
    /// the mode's opposite bound, the full range stands in for the missing
    /// side, so the supplied bound is always honored.
    #[must_use]
    pub fn next_in_range_with<T: RandomCandidate>(
        &mut self,
        mode: GenerationMode,
        low: Option<T>,
        high: Option<T>,
    ) -> T {
        let (mode_low, mode_high) = T::mode_bounds(mode);
        let (full_low, full_high) = T::mode_bounds(GenerationMode::Extended);
        match (low, high) {
            (None, None) => self.next_value(mode),
            (Some(low), Some(high)) => self.next_in_range(low, high),
            (Some(low), None) => {
                let high = if low <= mode_high {
                    mode_high
                } else if low <= full_high {
                    full_high
                } else {
                    low
                };
                T::sample_between(&mut self.rng, low, high)
            }
            (None, Some(high)) => {
                let low = if mode_low <= high {
                    mode_low
                } else if full_low <= high {
                    full_low
                } else {
                    high
                };
                T::sample_between(&mut self.rng, low, high)
            }
        }
    }
}

#[must_use]
pub fn order_bounds<T: PartialOrd>(bound1: T, bound2: T) -> (T, T) {
    if bound2 < bound1 {
        (bound2, bound1)
    } else {
        (bound1, bound2)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DeterministicRng, GenerationMode, RANDOM_REASON_CODES, RandomCandidate, RandomError,
        RawDomain, ValueGenerator, derive_seed, order_bounds,
    };
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
    struct Tenths(i64);

    const TENTHS: RawDomain = RawDomain {
        min: -1_000_000,
        max: 1_000_000,
        one: 10,
        low_magnitude: 100,
        default_magnitude: 10_000,
    };

    impl RandomCandidate for Tenths {
        fn mode_bounds(mode: GenerationMode) -> (Self, Self) {
            let (low, high) = TENTHS.mode_bounds(mode);
            (Self(low as i64), Self(high as i64))
        }

        fn sample_between(rng: &mut DeterministicRng, low: Self, high: Self) -> Self {
            Self(TENTHS.sample_between(rng, i128::from(low.0), i128::from(high.0)) as i64)
        }
    }

    #[test]
    fn reason_code_registry_is_stable() {
        assert_eq!(
            RANDOM_REASON_CODES,
            [
                "random_upper_bound_rejected",
                "random_range_inverted",
                "random_bounded_output_contract",
                "random_seed_determinism_contract",
            ]
        );
        assert_eq!(
            RandomError::InvertedRange.reason_code(),
            RANDOM_REASON_CODES[1]
        );
    }

    #[test]
    fn same_seed_replays_identical_stream() {
        let mut lhs = DeterministicRng::new(0xDEAD_BEEF_u64);
        let mut rhs = DeterministicRng::new(0xDEAD_BEEF_u64);

        for _ in 0..128 {
            assert_eq!(lhs.next_u64(), rhs.next_u64());
        }
    }

    #[test]
    fn jump_ahead_matches_repeated_advancement() {
        let steps = 1024u64;
        let mut jumped = DeterministicRng::new(42);
        let mut stepped = DeterministicRng::new(42);

        jumped.jump_ahead(steps);
        for _ in 0..steps {
            let _ = stepped.next_u64();
        }

        assert_eq!(jumped.next_u64(), stepped.next_u64());
    }

    #[test]
    fn state_restore_replays_identical_sequence() {
        let mut source = DeterministicRng::new(99);
        let _ = source.fill_u64(16);

        let (seed, counter) = source.state();
        let mut restored = DeterministicRng::from_state(seed, counter);
        for _ in 0..32 {
            assert_eq!(source.next_u64(), restored.next_u64());
        }
    }

    #[test]
    fn bounded_u64_rejects_zero_upper_bound() {
        let mut rng = DeterministicRng::new(123);
        let err = rng
            .bounded_u64(0)
            .expect_err("upper bound zero must be rejected");
        assert_eq!(err, RandomError::InvalidUpperBound);
        assert_eq!(err.reason_code(), "random_upper_bound_rejected");
    }

    #[test]
    fn inclusive_range_rejects_inverted_bounds() {
        let mut rng = DeterministicRng::new(5);
        assert_eq!(
            rng.next_i128_inclusive(10, 9),
            Err(RandomError::InvertedRange)
        );
        assert_eq!(
            rng.next_f64_between(1.0, -1.0),
            Err(RandomError::InvertedRange)
        );
    }

    #[test]
    fn inclusive_range_covers_full_i128_span() {
        let mut rng = DeterministicRng::new(7);
        for _ in 0..64 {
            let _ = rng
                .next_i128_inclusive(i128::MIN, i128::MAX)
                .expect("full span is valid");
        }
        assert_eq!(rng.next_i128_inclusive(3, 3), Ok(3));
    }

    #[test]
    fn inclusive_range_reaches_both_ends() {
        let mut rng = DeterministicRng::new(11);
        let draws = (0..512)
            .map(|_| rng.next_i128_inclusive(-1, 1).expect("valid range"))
            .collect::<Vec<_>>();
        assert!(draws.contains(&-1));
        assert!(draws.contains(&0));
        assert!(draws.contains(&1));
    }

    #[test]
    fn float_range_survives_full_f64_span() {
        let mut rng = DeterministicRng::new(13);
        for _ in 0..256 {
            let sample = rng
                .next_f64_between(f64::MIN, f64::MAX)
                .expect("ordered bounds");
            assert!(sample.is_finite(), "sample={sample}");
        }
    }

    #[test]
    fn derived_seeds_are_stable_and_distinct() {
        let a = derive_seed(1, &["fix64", "byte_round_trip"]);
        let b = derive_seed(1, &["fix64", "byte_round_trip"]);
        let c = derive_seed(1, &["fix64", "string_round_trip"]);
        let d = derive_seed(2, &["fix64", "byte_round_trip"]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn raw_domain_unit_bounds_follow_signedness() {
        assert_eq!(TENTHS.mode_bounds(GenerationMode::Unit), (-10, 10));
        let unsigned = RawDomain::integer(0, 255);
        assert_eq!(unsigned.mode_bounds(GenerationMode::Unit), (0, 1));
        assert_eq!(unsigned.mode_bounds(GenerationMode::Extended), (0, 255));
        assert_eq!(unsigned.mode_bounds(GenerationMode::LowMagnitude), (0, 255));
        assert_eq!(unsigned.mode_bounds(GenerationMode::Default), (0, 255));
    }

    #[test]
    fn extended_mode_hits_extremes() {
        let mut generator = ValueGenerator::new(17);
        let draws = (0..512)
            .map(|_| generator.next_value::<Tenths>(GenerationMode::Extended))
            .collect::<Vec<_>>();
        assert!(draws.contains(&Tenths(-1_000_000)));
        assert!(draws.contains(&Tenths(1_000_000)));
    }

    #[test]
    fn infinite_float_bounds_never_yield_nan() {
        let mut rng = DeterministicRng::new(23);
        for (low, high) in [
            (f64::NEG_INFINITY, f64::INFINITY),
            (1.0, f64::INFINITY),
            (f64::NEG_INFINITY, -1.0),
        ] {
            for _ in 0..256 {
                let sample = rng.next_f64_between(low, high).expect("ordered bounds");
                assert!(low <= sample && sample <= high, "sample={sample}");
            }
        }
        assert_eq!(
            rng.next_f64_between(f64::INFINITY, f64::INFINITY),
            Ok(f64::INFINITY)
        );
        assert_eq!(rng.next_f64_between(2.5, 2.5), Ok(2.5));
    }

    #[test]
    fn primitives_draw_inside_every_mode() {
        let mut generator = ValueGenerator::new(29);
        for mode in GenerationMode::ALL {
            for _ in 0..128 {
                let (low, high) = u8::mode_bounds(mode);
                let value = generator.next_value::<u8>(mode);
                assert!(low <= value && value <= high, "u8 {mode:?} {value}");

                let (low, high) = u16::mode_bounds(mode);
                let value = generator.next_value::<u16>(mode);
                assert!(low <= value && value <= high, "u16 {mode:?} {value}");

                let (low, high) = i32::mode_bounds(mode);
                let value = generator.next_value::<i32>(mode);
                assert!(low <= value && value <= high, "i32 {mode:?} {value}");

                let (low, high) = i64::mode_bounds(mode);
                let value = generator.next_value::<i64>(mode);
                assert!(low <= value && value <= high, "i64 {mode:?} {value}");

                let (low, high) = f32::mode_bounds(mode);
                let value = generator.next_value::<f32>(mode);
                assert!(value.is_finite() && low <= value && value <= high, "f32 {mode:?} {value}");

                let (low, high) = f64::mode_bounds(mode);
                let value = generator.next_value::<f64>(mode);
                assert!(value.is_finite() && low <= value && value <= high, "f64 {mode:?} {value}");
            }
        }
        assert_eq!(i32::mode_bounds(GenerationMode::Unit), (-1, 1));
        assert_eq!(u16::mode_bounds(GenerationMode::Unit), (0, 1));
    }

    #[test]
    fn lone_low_bound_above_mode_range_is_honored() {
        let mut generator = ValueGenerator::new(31);
        for _ in 0..256 {
            let value = generator.next_in_range_with::<i32>(GenerationMode::Unit, Some(5), None);
            assert!(value >= 5, "value={value}");
            let value = generator.next_in_range_with::<i32>(GenerationMode::Unit, None, Some(-5));
            assert!(value <= -5, "value={value}");
        }
        let at_max = generator.next_in_range_with(GenerationMode::Unit, Some(u8::MAX), None);
        assert_eq!(at_max, u8::MAX);
    }

    #[test]
    fn optional_bounds_fall_back_to_mode_bounds() {
        let mut generator = ValueGenerator::new(19);
        for _ in 0..256 {
            let value = generator.next_in_range_with(GenerationMode::Unit, Some(Tenths(5)), None);
            assert!(value >= Tenths(5) && value <= Tenths(10), "value={value:?}");
        }
    }

    #[test]
    fn mode_parse_round_trips_names() {
        for mode in GenerationMode::ALL {
            assert_eq!(GenerationMode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(GenerationMode::parse("gigantic"), None);
    }

    proptest! {
        #[test]
        fn next_in_range_tolerates_unordered_bounds(
            seed in any::<u64>(),
            b1 in -1_000_000i64..=1_000_000,
            b2 in -1_000_000i64..=1_000_000,
        ) {
            let mut generator = ValueGenerator::new(seed);
            let value = generator.next_in_range(Tenths(b1), Tenths(b2));
            let (low, high) = order_bounds(Tenths(b1), Tenths(b2));
            prop_assert!(low <= value && value <= high);
        }

        #[test]
        fn mode_samples_stay_inside_mode_bounds(seed in any::<u64>(), idx in 0usize..4) {
            let mode = GenerationMode::ALL[idx];
            let mut generator = ValueGenerator::new(seed);
            let (low, high) = Tenths::mode_bounds(mode);
            let value = generator.next_value::<Tenths>(mode);
            prop_assert!(low <= value && value <= high);
        }
    }
}
