use fnc_conformance::{ConformanceHarness, FailureKind, HarnessConfig, Property, PropertyOutcome};
use fnc_dtype::{CodecError, NumericCandidate, NumericCapabilities, fixed_width};
use fnc_numeric::{ClampedU8, Fix64, UFix32, Vector3};
use fnc_random::{DeterministicRng, GenerationMode, RandomCandidate, RawDomain, ValueGenerator};

fn harness() -> ConformanceHarness {
    let mut config = HarnessConfig::default_settings().with_iterations(48);
    config.log_results = false;
    ConformanceHarness::new(config)
}

#[test]
fn eight_bit_unsigned_bounds_round_trip() {
    let max = ClampedU8::max_value();
    let min = ClampedU8::min_value();
    assert_eq!(max.get(), 255);
    assert_eq!(min.get(), 0);
    assert_eq!(ClampedU8::decode(&max.encode()), Ok(max));
    assert_eq!(ClampedU8::decode(&min.encode()), Ok(min));
}

#[test]
fn eight_bit_unsigned_range_accepts_reversed_bounds() {
    let mut generator = ValueGenerator::new(0xC0FFEE);
    let (b1, b2) = (ClampedU8::new(200), ClampedU8::new(50));
    let mut seen_low = false;
    let mut seen_high = false;
    for _ in 0..4_096 {
        let value = generator.next_in_range(b1, b2).get();
        assert!((50..=200).contains(&value), "drew {value}");
        seen_low |= value == 50;
        seen_high |= value == 200;
    }
    assert!(seen_low && seen_high, "both ends of the range are reachable");

    let result = harness().run_range_containment_between(b1, b2);
    assert!(result.outcome.is_passed(), "{result:?}");
}

#[test]
fn signed_fixed_point_epsilon_survives_codec() {
    let epsilon = Fix64::epsilon();
    assert_eq!(epsilon.raw(), 1);
    assert_eq!(Fix64::decode(&epsilon.encode()), Ok(epsilon));
    assert_eq!(epsilon.to_string().parse::<Fix64>(), Ok(epsilon));

    let result = harness().run_byte_round_trip::<Fix64>();
    assert!(result.outcome.is_passed(), "{result:?}");
}

#[test]
fn capability_gating_is_reported_as_skip_not_failure() {
    let h = harness();
    let report = h.run_scalar_battery::<f64>().expect("battery runs");
    let string = report
        .result(Property::StringRoundTrip)
        .expect("string property recorded");
    assert!(string.outcome.is_skipped());
    let special = report
        .result(Property::SpecialValues)
        .expect("special values recorded");
    assert!(special.outcome.is_passed(), "{special:?}");

    // The only failure is the primitive type code.
    assert_eq!(report.failures.len(), 1, "{:?}", report.failures);
    assert!(report.failures[0].contains("type_code_contract"));
}

#[test]
fn vector_construction_keeps_extended_components() {
    let components = [Fix64::max_value(), Fix64::min_value(), Fix64::epsilon()];
    let result = harness().run_construction_contract::<Vector3<Fix64>>(&components);
    assert!(result.outcome.is_passed(), "{result:?}");

    let random = harness().run_random_construction_contract::<Vector3<UFix32>>();
    assert_eq!(random.mode, Some(GenerationMode::Extended));
    assert!(random.outcome.is_passed(), "{random:?}");
}

/// 16-bit candidate with two planted bugs: the high byte is lost on encode
/// and `to_bool` treats 1 as false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct LossyU16(u16);

const LOSSY_DOMAIN: RawDomain = RawDomain::integer(0, u16::MAX as i128);

impl RandomCandidate for LossyU16 {
    fn mode_bounds(mode: GenerationMode) -> (Self, Self) {
        let (low, high) = LOSSY_DOMAIN.mode_bounds(mode);
        (Self(low as u16), Self(high as u16))
    }

    fn sample_between(rng: &mut DeterministicRng, low: Self, high: Self) -> Self {
        Self(LOSSY_DOMAIN.sample_between(rng, i128::from(low.0), i128::from(high.0)) as u16)
    }
}

impl NumericCandidate for LossyU16 {
    const NAME: &'static str = "lossy_u16";
    const CAPABILITIES: NumericCapabilities = NumericCapabilities::unsigned_integer();
    const BYTE_WIDTH: usize = 2;

    fn zero() -> Self {
        Self(0)
    }

    fn min_value() -> Self {
        Self(0)
    }

    fn max_value() -> Self {
        Self(u16::MAX)
    }

    fn epsilon() -> Self {
        Self(1)
    }

    fn encode(&self) -> Vec<u8> {
        vec![self.0.to_le_bytes()[0], 0]
    }

    fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        fixed_width(bytes).map(|le| Self(u16::from_le_bytes(le)))
    }

    fn format(&self) -> String {
        self.0.to_string()
    }

    fn parse(raw: &str) -> Result<Self, CodecError> {
        raw.parse().map(Self).map_err(|_| CodecError::InvalidDigit)
    }

    fn to_bool(&self) -> bool {
        self.0 > 1
    }
}

#[test]
fn broken_candidate_failures_carry_counterexamples() {
    let h = harness();

    let bytes = h.run_byte_round_trip::<LossyU16>();
    let PropertyOutcome::Failed(failure) = &bytes.outcome else {
        panic!("expected byte round-trip failure, got {bytes:?}");
    };
    assert_eq!(failure.kind, FailureKind::RoundTripMismatch);
    assert_eq!(failure.counterexample, "LossyU16(65535)");

    let boolean = h.run_boolean_conversion_contract::<LossyU16>();
    let failure = boolean.outcome.failure().expect("to_bool bug is caught");
    assert_eq!(failure.kind, FailureKind::BooleanConversionMismatch);
    assert_eq!(failure.counterexample, "LossyU16(1)");
    assert_eq!(
        failure.reason_code(),
        "conformance_boolean_conversion_mismatch"
    );
}

#[test]
fn broken_properties_do_not_affect_siblings() {
    let report = harness()
        .run_scalar_battery::<LossyU16>()
        .expect("battery runs");
    assert!(!report.all_passed());
    assert_eq!(report.failures.len(), 2, "{:?}", report.failures);
    for property in [
        Property::CapabilityContract,
        Property::BoundsContract,
        Property::TypeCodeContract,
        Property::StringRoundTrip,
        Property::RandomRangeContainment,
        Property::UnsignedFloorContract,
    ] {
        let result = report.result(property).expect("property recorded");
        assert!(result.outcome.is_passed(), "{result:?}");
    }
}
