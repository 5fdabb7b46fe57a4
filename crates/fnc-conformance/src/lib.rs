#![forbid(unsafe_code)]

pub mod registry;

use fnc_dtype::{Capability, NumericCandidate, TypeCode, VectorCandidate};
use fnc_random::{GenerationMode, ValueGenerator, derive_seed, order_bounds};
use serde::Serialize;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

pub use registry::{
    CandidateFamily, CandidateRegistry, RegisteredCandidate, default_registry, run_all_registered,
};

pub const DEFAULT_HARNESS_SEED: u64 = 0x5EED_F1C5_D00D_2026;
pub const DEFAULT_ITERATIONS: usize = 64;

pub const SEED_ENV_VAR: &str = "FNC_CONFORMANCE_SEED";
pub const ITERATIONS_ENV_VAR: &str = "FNC_CONFORMANCE_ITERATIONS";
pub const LOG_PATH_ENV_VAR: &str = "FNC_CONFORMANCE_LOG_PATH";

pub const CONFORMANCE_REASON_CODES: [&str; 8] = [
    "conformance_round_trip_mismatch",
    "conformance_string_round_trip_mismatch",
    "conformance_unexpected_type_classification",
    "conformance_boolean_conversion_mismatch",
    "conformance_range_containment_violation",
    "conformance_construction_field_mismatch",
    "conformance_bounds_violation",
    "conformance_inconsistent_capabilities",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub seed: u64,
    /// Random draws per property; single-shot checks always run.
    pub iterations: usize,
    /// Append every property result to the JSONL log when a path is set.
    pub log_results: bool,
}

impl HarnessConfig {
    #[must_use]
    pub const fn default_settings() -> Self {
        Self {
            seed: DEFAULT_HARNESS_SEED,
            iterations: DEFAULT_ITERATIONS,
            log_results: true,
        }
    }

    /// Defaults overridden by `FNC_CONFORMANCE_SEED` and
    /// `FNC_CONFORMANCE_ITERATIONS` when set.
    pub fn from_env() -> Result<Self, String> {
        let mut config = Self::default_settings();
        if let Ok(raw) = std::env::var(SEED_ENV_VAR) {
            config.seed = parse_seed(&raw)
                .ok_or_else(|| format!("{SEED_ENV_VAR}: invalid seed '{raw}'"))?;
        }
        if let Ok(raw) = std::env::var(ITERATIONS_ENV_VAR) {
            config.iterations = raw
                .trim()
                .parse()
                .map_err(|err| format!("{ITERATIONS_ENV_VAR}: invalid count '{raw}': {err}"))?;
        }
        Ok(config)
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub const fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::default_settings()
    }
}

/// Accepts decimal or `0x`-prefixed hexadecimal.
#[must_use]
pub fn parse_seed(raw: &str) -> Option<u64> {
    let trimmed = raw.trim().replace('_', "");
    match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => trimmed.parse().ok(),
    }
}

/// Every property the battery knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    CapabilityContract,
    BoundsContract,
    TypeCodeContract,
    ByteRoundTrip,
    StringRoundTrip,
    BooleanConversion,
    RandomRangeContainment,
    SignedUnitContract,
    UnsignedFloorContract,
    SpecialValues,
    ConstructionContract,
    VectorByteRoundTrip,
    VectorRangeContainment,
}

impl Property {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CapabilityContract => "capability_contract",
            Self::BoundsContract => "bounds_contract",
            Self::TypeCodeContract => "type_code_contract",
            Self::ByteRoundTrip => "byte_round_trip",
            Self::StringRoundTrip => "string_round_trip",
            Self::BooleanConversion => "boolean_conversion",
            Self::RandomRangeContainment => "random_range_containment",
            Self::SignedUnitContract => "signed_unit_contract",
            Self::UnsignedFloorContract => "unsigned_floor_contract",
            Self::SpecialValues => "special_values",
            Self::ConstructionContract => "construction_contract",
            Self::VectorByteRoundTrip => "vector_byte_round_trip",
            Self::VectorRangeContainment => "vector_range_containment",
        }
    }

    /// Mode the randomized runner of the property draws with. Runs over
    /// caller-supplied inputs record no mode, and vector construction picks
    /// its mode by component count, see [`construction_mode`].
    #[must_use]
    pub const fn generation_mode(self) -> Option<GenerationMode> {
        match self {
            Self::ByteRoundTrip
            | Self::SignedUnitContract
            | Self::UnsignedFloorContract
            | Self::VectorByteRoundTrip => Some(GenerationMode::Unit),
            Self::StringRoundTrip => Some(GenerationMode::LowMagnitude),
            Self::BooleanConversion
            | Self::RandomRangeContainment
            | Self::VectorRangeContainment => Some(GenerationMode::Default),
            Self::CapabilityContract
            | Self::BoundsContract
            | Self::TypeCodeContract
            | Self::SpecialValues
            | Self::ConstructionContract => None,
        }
    }
}

/// 3-component vectors are constructed from extended-magnitude inputs,
/// narrower ones from the default range.
#[must_use]
pub const fn construction_mode(components: usize) -> GenerationMode {
    if components >= 3 {
        GenerationMode::Extended
    } else {
        GenerationMode::Default
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    RoundTripMismatch,
    StringRoundTripMismatch,
    UnexpectedTypeClassification,
    BooleanConversionMismatch,
    RangeContainmentViolation,
    ConstructionFieldMismatch,
    BoundsViolation,
    InconsistentCapabilities,
}

impl FailureKind {
    #[must_use]
    pub const fn reason_code(self) -> &'static str {
        match self {
            Self::RoundTripMismatch => "conformance_round_trip_mismatch",
            Self::StringRoundTripMismatch => "conformance_string_round_trip_mismatch",
            Self::UnexpectedTypeClassification => "conformance_unexpected_type_classification",
            Self::BooleanConversionMismatch => "conformance_boolean_conversion_mismatch",
            Self::RangeContainmentViolation => "conformance_range_containment_violation",
            Self::ConstructionFieldMismatch => "conformance_construction_field_mismatch",
            Self::BoundsViolation => "conformance_bounds_violation",
            Self::InconsistentCapabilities => "conformance_inconsistent_capabilities",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::RoundTripMismatch => "byte round-trip mismatch",
            Self::StringRoundTripMismatch => "string round-trip mismatch",
            Self::UnexpectedTypeClassification => "unexpected type classification",
            Self::BooleanConversionMismatch => "boolean conversion mismatch",
            Self::RangeContainmentViolation => "range containment violation",
            Self::ConstructionFieldMismatch => "construction field mismatch",
            Self::BoundsViolation => "bounds violation",
            Self::InconsistentCapabilities => "inconsistent capabilities",
        };
        f.write_str(label)
    }
}

/// A concrete counterexample for one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConformanceFailure {
    pub kind: FailureKind,
    /// `Debug` rendering of the offending input.
    pub counterexample: String,
    pub message: String,
}

impl ConformanceFailure {
    fn new(kind: FailureKind, counterexample: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            counterexample: counterexample.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn reason_code(&self) -> &'static str {
        self.kind.reason_code()
    }
}

impl fmt::Display for ConformanceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (input: {})",
            self.kind, self.message, self.counterexample
        )
    }
}

impl std::error::Error for ConformanceFailure {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipReason {
    pub required: Capability,
}

impl SkipReason {
    #[must_use]
    pub fn message(&self) -> String {
        format!("requires {} capability", self.required.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyOutcome {
    Passed,
    Skipped(SkipReason),
    Failed(ConformanceFailure),
}

impl PropertyOutcome {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "pass",
            Self::Skipped(_) => "skip",
            Self::Failed(_) => "fail",
        }
    }

    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    #[must_use]
    pub const fn failure(&self) -> Option<&ConformanceFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyResult {
    pub candidate: String,
    pub property: Property,
    pub mode: Option<GenerationMode>,
    pub seed: u64,
    pub outcome: PropertyOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteReport {
    pub suite: String,
    pub case_count: usize,
    pub pass_count: usize,
    pub skip_count: usize,
    pub skipped: Vec<String>,
    pub failures: Vec<String>,
    pub results: Vec<PropertyResult>,
}

impl SuiteReport {
    #[must_use]
    pub fn new(suite: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            case_count: 0,
            pass_count: 0,
            skip_count: 0,
            skipped: Vec::new(),
            failures: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn record(&mut self, result: PropertyResult) {
        self.case_count += 1;
        match &result.outcome {
            PropertyOutcome::Passed => self.pass_count += 1,
            PropertyOutcome::Skipped(reason) => {
                self.skip_count += 1;
                self.skipped
                    .push(format!("{}: {}", result.property.as_str(), reason.message()));
            }
            PropertyOutcome::Failed(failure) => self.failures.push(format!(
                "{}/{}: {}: {failure}",
                result.candidate,
                result.property.as_str(),
                failure.reason_code()
            )),
        }
        self.results.push(result);
    }

    /// Skips are not failures.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failures.is_empty() && self.case_count == self.pass_count + self.skip_count
    }

    #[must_use]
    pub fn result(&self, property: Property) -> Option<&PropertyResult> {
        self.results.iter().find(|result| result.property == property)
    }
}

#[derive(Debug, Serialize)]
struct ConformanceLogEntry<'a> {
    suite: &'a str,
    candidate: &'a str,
    property: &'static str,
    mode: Option<&'static str>,
    seed: u64,
    outcome: &'static str,
    reason_code: Option<&'static str>,
    counterexample: Option<&'a str>,
    message: Option<String>,
}

impl<'a> ConformanceLogEntry<'a> {
    fn from_result(suite: &'a str, result: &'a PropertyResult) -> Self {
        let (reason_code, counterexample, message) = match &result.outcome {
            PropertyOutcome::Passed => (None, None, None),
            PropertyOutcome::Skipped(reason) => (None, None, Some(reason.message())),
            PropertyOutcome::Failed(failure) => (
                Some(failure.reason_code()),
                Some(failure.counterexample.as_str()),
                Some(failure.message.clone()),
            ),
        };
        Self {
            suite,
            candidate: &result.candidate,
            property: result.property.as_str(),
            mode: result.mode.map(GenerationMode::as_str),
            seed: result.seed,
            outcome: result.outcome.label(),
            reason_code,
            counterexample,
            message,
        }
    }
}

static CONFORMANCE_LOG_PATH: OnceLock<Mutex<Option<PathBuf>>> = OnceLock::new();

pub fn set_conformance_log_path(path: Option<PathBuf>) {
    let cell = CONFORMANCE_LOG_PATH.get_or_init(|| Mutex::new(None));
    if let Ok(mut slot) = cell.lock() {
        *slot = path;
    }
}

fn maybe_append_conformance_log(entry: &ConformanceLogEntry<'_>) -> Result<(), String> {
    let configured = CONFORMANCE_LOG_PATH
        .get()
        .and_then(|cell| cell.lock().ok())
        .and_then(|slot| slot.clone());
    let from_env = std::env::var_os(LOG_PATH_ENV_VAR).map(PathBuf::from);
    let Some(path) = configured.or(from_env) else {
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| format!("failed creating {}: {err}", parent.display()))?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|err| format!("failed opening {}: {err}", path.display()))?;
    let line = serde_json::to_string(entry)
        .map_err(|err| format!("failed serializing conformance log entry: {err}"))?;
    let mut payload = line.into_bytes();
    payload.push(b'\n');
    file.write_all(&payload)
        .map_err(|err| format!("failed appending conformance log {}: {err}", path.display()))
}

type Check = Result<(), ConformanceFailure>;

/// Runs the property battery; each property seeds its own generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConformanceHarness {
    config: HarnessConfig,
}

impl ConformanceHarness {
    #[must_use]
    pub const fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    fn seed_for(&self, candidate: &str, property: Property) -> u64 {
        derive_seed(self.config.seed, &[candidate, property.as_str()])
    }

    fn conclude(
        candidate: &str,
        property: Property,
        mode: Option<GenerationMode>,
        seed: u64,
        check: Check,
    ) -> PropertyResult {
        PropertyResult {
            candidate: candidate.to_string(),
            property,
            mode,
            seed,
            outcome: match check {
                Ok(()) => PropertyOutcome::Passed,
                Err(failure) => PropertyOutcome::Failed(failure),
            },
        }
    }

    fn skipped(
        candidate: &str,
        property: Property,
        seed: u64,
        required: Capability,
    ) -> PropertyResult {
        PropertyResult {
            candidate: candidate.to_string(),
            property,
            mode: property.generation_mode(),
            seed,
            outcome: PropertyOutcome::Skipped(SkipReason { required }),
        }
    }

    #[must_use]
    pub fn run_capability_contract<T: NumericCandidate>(&self) -> PropertyResult {
        let property = Property::CapabilityContract;
        let seed = self.seed_for(T::NAME, property);
        let check = T::CAPABILITIES.validate().map_err(|err| {
            ConformanceFailure::new(
                FailureKind::InconsistentCapabilities,
                format!("{:?}", T::CAPABILITIES),
                format!("{err} ({})", err.reason_code()),
            )
        });
        Self::conclude(T::NAME, property, None, seed, check)
    }

    #[must_use]
    pub fn run_bounds_contract<T: NumericCandidate>(&self) -> PropertyResult {
        let property = Property::BoundsContract;
        let seed = self.seed_for(T::NAME, property);
        let (min, zero, epsilon, max) = (T::min_value(), T::zero(), T::epsilon(), T::max_value());
        let check = if !(min <= zero) {
            Err(bounds_failure(&min, "min_value exceeds zero"))
        } else if !(zero < epsilon) {
            Err(bounds_failure(&epsilon, "epsilon is not above zero"))
        } else if !(epsilon <= max) {
            Err(bounds_failure(&max, "max_value is below epsilon"))
        } else {
            Ok(())
        };
        Self::conclude(T::NAME, property, None, seed, check)
    }

    #[must_use]
    pub fn run_type_code_contract<T: NumericCandidate>(&self) -> PropertyResult {
        let property = Property::TypeCodeContract;
        let seed = self.seed_for(T::NAME, property);
        let code = T::type_code();
        let check = if code == TypeCode::Object {
            Ok(())
        } else {
            Err(ConformanceFailure::new(
                FailureKind::UnexpectedTypeClassification,
                code.name(),
                format!(
                    "expected {} type code, candidate reports primitive {}",
                    TypeCode::Object.name(),
                    code.name()
                ),
            ))
        };
        Self::conclude(T::NAME, property, None, seed, check)
    }

    #[must_use]
    pub fn run_byte_round_trip<T: NumericCandidate>(&self) -> PropertyResult {
        let property = Property::ByteRoundTrip;
        let mode = GenerationMode::Unit;
        let seed = self.seed_for(T::NAME, property);
        let mut generator = ValueGenerator::new(seed);
        let check = (|| -> Check {
            for value in [T::max_value(), T::min_value(), T::epsilon()] {
                check_byte_round_trip(&value)?;
            }
            for _ in 0..self.config.iterations {
                check_byte_round_trip(&generator.next_value::<T>(mode))?;
            }
            Ok(())
        })();
        Self::conclude(T::NAME, property, Some(mode), seed, check)
    }

    #[must_use]
    pub fn run_string_round_trip<T: NumericCandidate>(&self) -> PropertyResult {
        let property = Property::StringRoundTrip;
        let mode = GenerationMode::LowMagnitude;
        let seed = self.seed_for(T::NAME, property);
        if let Some(skip) = gate::<T>(property, seed, Capability::FixedPrecision) {
            return skip;
        }
        let mut generator = ValueGenerator::new(seed);
        let check = (|| -> Check {
            for _ in 0..self.config.iterations {
                check_string_round_trip(&generator.next_value::<T>(mode))?;
            }
            Ok(())
        })();
        Self::conclude(T::NAME, property, Some(mode), seed, check)
    }

    #[must_use]
    pub fn run_boolean_conversion_contract<T: NumericCandidate>(&self) -> PropertyResult {
        let property = Property::BooleanConversion;
        let mode = GenerationMode::Default;
        let seed = self.seed_for(T::NAME, property);
        let mut generator = ValueGenerator::new(seed);
        let check = (|| -> Check {
            check_boolean(&T::zero())?;
            check_boolean(&T::epsilon())?;
            for _ in 0..self.config.iterations {
                check_boolean(&generator.next_value::<T>(mode))?;
            }
            Ok(())
        })();
        Self::conclude(T::NAME, property, Some(mode), seed, check)
    }

    #[must_use]
    pub fn run_random_range_containment<T: NumericCandidate>(&self) -> PropertyResult {
        let property = Property::RandomRangeContainment;
        let mode = GenerationMode::Default;
        let seed = self.seed_for(T::NAME, property);
        let mut generator = ValueGenerator::new(seed);
        let check = (|| -> Check {
            for _ in 0..self.config.iterations {
                let bound1 = generator.next_value::<T>(mode);
                let bound2 = generator.next_value::<T>(mode);
                check_range_containment(&mut generator, bound1, bound2)?;
            }
            Ok(())
        })();
        Self::conclude(T::NAME, property, Some(mode), seed, check)
    }

    /// Caller-chosen bounds, given in either order. No generation mode
    /// drives the draw, so the result records `mode: None`.
    #[must_use]
    pub fn run_range_containment_between<T: NumericCandidate>(
        &self,
        bound1: T,
        bound2: T,
    ) -> PropertyResult {
        let property = Property::RandomRangeContainment;
        let seed = self.seed_for(T::NAME, property);
        let mut generator = ValueGenerator::new(seed);
        let check = (|| -> Check {
            for _ in 0..self.config.iterations.max(1) {
                check_range_containment(&mut generator, bound1, bound2)?;
            }
            Ok(())
        })();
        Self::conclude(T::NAME, property, None, seed, check)
    }

    #[must_use]
    pub fn run_signed_unit_contract<T: NumericCandidate>(&self) -> PropertyResult {
        let property = Property::SignedUnitContract;
        let mode = GenerationMode::Unit;
        let seed = self.seed_for(T::NAME, property);
        if let Some(skip) = gate::<T>(property, seed, Capability::Signed) {
            return skip;
        }
        let mut generator = ValueGenerator::new(seed);
        let check = (|| -> Check {
            let min = T::min_value();
            if !(min < T::zero()) {
                return Err(bounds_failure(&min, "signed candidate has no negative values"));
            }
            let low = parse_unit_literal::<T>("-1")?;
            let high = parse_unit_literal::<T>("1")?;
            for _ in 0..self.config.iterations {
                check_within(&generator.next_value::<T>(mode), &low, &high)?;
            }
            Ok(())
        })();
        Self::conclude(T::NAME, property, Some(mode), seed, check)
    }

    #[must_use]
    pub fn run_unsigned_floor_contract<T: NumericCandidate>(&self) -> PropertyResult {
        let property = Property::UnsignedFloorContract;
        let mode = GenerationMode::Unit;
        let seed = self.seed_for(T::NAME, property);
        if let Some(skip) = gate::<T>(property, seed, Capability::Unsigned) {
            return skip;
        }
        let mut generator = ValueGenerator::new(seed);
        let check = (|| -> Check {
            let min = T::min_value();
            if !min.same_value(&T::zero()) {
                return Err(bounds_failure(&min, "unsigned min_value is not zero"));
            }
            let high = parse_unit_literal::<T>("1")?;
            for _ in 0..self.config.iterations {
                check_within(&generator.next_value::<T>(mode), &T::zero(), &high)?;
            }
            Ok(())
        })();
        Self::conclude(T::NAME, property, Some(mode), seed, check)
    }

    #[must_use]
    pub fn run_special_values_contract<T: NumericCandidate>(&self) -> PropertyResult {
        let property = Property::SpecialValues;
        let seed = self.seed_for(T::NAME, property);
        let caps = T::CAPABILITIES;
        if !caps.has_nan && !caps.has_infinity {
            return Self::skipped(T::NAME, property, seed, Capability::NaN);
        }
        let check = (|| -> Check {
            if caps.has_nan {
                let nan = T::nan().ok_or_else(|| {
                    ConformanceFailure::new(
                        FailureKind::InconsistentCapabilities,
                        format!("{caps:?}"),
                        "declares has_nan but provides no NaN value",
                    )
                })?;
                check_nan_round_trip(&nan)?;
            }
            if caps.has_infinity {
                let infinity = T::infinity().ok_or_else(|| {
                    ConformanceFailure::new(
                        FailureKind::InconsistentCapabilities,
                        format!("{caps:?}"),
                        "declares has_infinity but provides no infinity value",
                    )
                })?;
                if !(infinity > T::max_value()) {
                    return Err(bounds_failure(&infinity, "infinity is not above max_value"));
                }
                check_byte_round_trip(&infinity)?;
            }
            Ok(())
        })();
        Self::conclude(T::NAME, property, None, seed, check)
    }

    #[must_use]
    pub fn run_construction_contract<V: VectorCandidate>(
        &self,
        components: &[V::Scalar],
    ) -> PropertyResult {
        let name = V::name();
        let property = Property::ConstructionContract;
        let seed = self.seed_for(&name, property);
        let check = check_construction::<V>(components);
        Self::conclude(&name, property, None, seed, check)
    }

    #[must_use]
    pub fn run_random_construction_contract<V: VectorCandidate>(&self) -> PropertyResult {
        let name = V::name();
        let property = Property::ConstructionContract;
        let mode = construction_mode(V::COMPONENTS);
        let seed = self.seed_for(&name, property);
        let mut generator = ValueGenerator::new(seed);
        let check = (|| -> Check {
            for _ in 0..self.config.iterations {
                let components = draw_components::<V>(&mut generator, mode);
                check_construction::<V>(&components)?;
            }
            Ok(())
        })();
        Self::conclude(&name, property, Some(mode), seed, check)
    }

    #[must_use]
    pub fn run_vector_byte_round_trip<V: VectorCandidate>(&self) -> PropertyResult {
        let name = V::name();
        let property = Property::VectorByteRoundTrip;
        let mode = GenerationMode::Unit;
        let seed = self.seed_for(&name, property);
        let mut generator = ValueGenerator::new(seed);
        let check = (|| -> Check {
            let singles = [
                <V::Scalar as NumericCandidate>::max_value(),
                <V::Scalar as NumericCandidate>::min_value(),
                <V::Scalar as NumericCandidate>::epsilon(),
            ];
            for scalar in singles {
                let vector = build_vector::<V>(&vec![scalar; V::COMPONENTS])?;
                check_vector_byte_round_trip(&vector)?;
            }
            for _ in 0..self.config.iterations {
                let components = draw_components::<V>(&mut generator, mode);
                check_vector_byte_round_trip(&build_vector::<V>(&components)?)?;
            }
            Ok(())
        })();
        Self::conclude(&name, property, Some(mode), seed, check)
    }

    #[must_use]
    pub fn run_vector_range_containment<V: VectorCandidate>(&self) -> PropertyResult {
        let name = V::name();
        let property = Property::VectorRangeContainment;
        let mode = GenerationMode::Default;
        let seed = self.seed_for(&name, property);
        let mut generator = ValueGenerator::new(seed);
        let check = (|| -> Check {
            for _ in 0..self.config.iterations {
                let bound1 = build_vector::<V>(&draw_components::<V>(&mut generator, mode))?;
                let bound2 = build_vector::<V>(&draw_components::<V>(&mut generator, mode))?;
                let drawn = bound1
                    .components()
                    .into_iter()
                    .zip(bound2.components())
                    .map(|(b1, b2)| generator.next_in_range(b1, b2))
                    .collect::<Vec<_>>();
                let result = build_vector::<V>(&drawn)?;
                check_vector_containment(&bound1, &bound2, &result)?;
            }
            Ok(())
        })();
        Self::conclude(&name, property, Some(mode), seed, check)
    }

    #[must_use]
    pub fn scalar_results<T: NumericCandidate>(&self) -> Vec<PropertyResult> {
        vec![
            self.run_capability_contract::<T>(),
            self.run_bounds_contract::<T>(),
            self.run_type_code_contract::<T>(),
            self.run_byte_round_trip::<T>(),
            self.run_string_round_trip::<T>(),
            self.run_boolean_conversion_contract::<T>(),
            self.run_random_range_containment::<T>(),
            self.run_signed_unit_contract::<T>(),
            self.run_unsigned_floor_contract::<T>(),
            self.run_special_values_contract::<T>(),
        ]
    }

    #[must_use]
    pub fn vector_results<V: VectorCandidate>(&self) -> Vec<PropertyResult> {
        vec![
            self.run_random_construction_contract::<V>(),
            self.run_vector_byte_round_trip::<V>(),
            self.run_vector_range_containment::<V>(),
        ]
    }

    pub fn run_scalar_battery<T: NumericCandidate>(&self) -> Result<SuiteReport, String> {
        self.collect(T::NAME, self.scalar_results::<T>())
    }

    pub fn run_vector_battery<V: VectorCandidate>(&self) -> Result<SuiteReport, String> {
        self.collect(&V::name(), self.vector_results::<V>())
    }

    fn collect(&self, suite: &str, results: Vec<PropertyResult>) -> Result<SuiteReport, String> {
        let mut report = SuiteReport::new(suite);
        for result in results {
            if self.config.log_results {
                maybe_append_conformance_log(&ConformanceLogEntry::from_result(suite, &result))?;
            }
            report.record(result);
        }
        Ok(report)
    }
}

fn gate<T: NumericCandidate>(
    property: Property,
    seed: u64,
    required: Capability,
) -> Option<PropertyResult> {
    if T::CAPABILITIES.supports(required) {
        None
    } else {
        Some(ConformanceHarness::skipped(T::NAME, property, seed, required))
    }
}

fn bounds_failure<T: fmt::Debug>(value: &T, message: &str) -> ConformanceFailure {
    ConformanceFailure::new(FailureKind::BoundsViolation, format!("{value:?}"), message)
}

fn check_byte_round_trip<T: NumericCandidate>(value: &T) -> Check {
    let bytes = value.encode();
    if bytes.len() != T::BYTE_WIDTH {
        return Err(ConformanceFailure::new(
            FailureKind::RoundTripMismatch,
            format!("{value:?}"),
            format!(
                "encoded {} bytes, declared width is {}",
                bytes.len(),
                T::BYTE_WIDTH
            ),
        ));
    }
    match T::decode(&bytes) {
        Ok(decoded) if decoded.same_value(value) => Ok(()),
        Ok(decoded) => Err(ConformanceFailure::new(
            FailureKind::RoundTripMismatch,
            format!("{value:?}"),
            format!("bytes {bytes:02x?} decoded to {decoded:?}"),
        )),
        Err(err) => Err(ConformanceFailure::new(
            FailureKind::RoundTripMismatch,
            format!("{value:?}"),
            format!(
                "decode rejected bytes {bytes:02x?}: {err} ({})",
                err.reason_code()
            ),
        )),
    }
}

fn check_nan_round_trip<T: NumericCandidate>(nan: &T) -> Check {
    let bytes = nan.encode();
    match T::decode(&bytes) {
        Ok(decoded) if decoded.is_nan() => Ok(()),
        Ok(decoded) => Err(ConformanceFailure::new(
            FailureKind::RoundTripMismatch,
            format!("{nan:?}"),
            format!("NaN bytes {bytes:02x?} decoded to non-NaN {decoded:?}"),
        )),
        Err(err) => Err(ConformanceFailure::new(
            FailureKind::RoundTripMismatch,
            format!("{nan:?}"),
            format!("decode rejected NaN bytes {bytes:02x?}: {err}"),
        )),
    }
}

fn check_string_round_trip<T: NumericCandidate>(value: &T) -> Check {
    let text = value.format();
    match T::parse(&text) {
        Ok(parsed) if parsed.same_value(value) => Ok(()),
        Ok(parsed) => Err(ConformanceFailure::new(
            FailureKind::StringRoundTripMismatch,
            format!("{value:?}"),
            format!("formatted as {text:?}, parsed back as {parsed:?}"),
        )),
        Err(err) => Err(ConformanceFailure::new(
            FailureKind::StringRoundTripMismatch,
            format!("{value:?}"),
            format!(
                "parse rejected own format {text:?}: {err} ({})",
                err.reason_code()
            ),
        )),
    }
}

fn check_boolean<T: NumericCandidate>(value: &T) -> Check {
    let expected = !value.is_zero();
    let actual = value.to_bool();
    if actual == expected {
        Ok(())
    } else {
        Err(ConformanceFailure::new(
            FailureKind::BooleanConversionMismatch,
            format!("{value:?}"),
            format!("to_bool returned {actual}, expected {expected}"),
        ))
    }
}

fn check_range_containment<T: NumericCandidate>(
    generator: &mut ValueGenerator,
    bound1: T,
    bound2: T,
) -> Check {
    let drawn = generator.next_in_range(bound1, bound2);
    let (low, high) = order_bounds(bound1, bound2);
    if low <= drawn && drawn <= high {
        Ok(())
    } else {
        Err(ConformanceFailure::new(
            FailureKind::RangeContainmentViolation,
            format!("bounds=({bound1:?}, {bound2:?})"),
            format!("drew {drawn:?} outside [{low:?}, {high:?}]"),
        ))
    }
}

fn check_within<T: NumericCandidate>(value: &T, low: &T, high: &T) -> Check {
    if low <= value && value <= high {
        Ok(())
    } else {
        Err(ConformanceFailure::new(
            FailureKind::RangeContainmentViolation,
            format!("{value:?}"),
            format!("unit draw outside [{low:?}, {high:?}]"),
        ))
    }
}

fn parse_unit_literal<T: NumericCandidate>(literal: &str) -> Result<T, ConformanceFailure> {
    T::parse(literal).map_err(|err| {
        ConformanceFailure::new(
            FailureKind::StringRoundTripMismatch,
            literal,
            format!("cannot parse unit literal: {err} ({})", err.reason_code()),
        )
    })
}

fn draw_components<V: VectorCandidate>(
    generator: &mut ValueGenerator,
    mode: GenerationMode,
) -> Vec<V::Scalar> {
    (0..V::COMPONENTS)
        .map(|_| generator.next_value::<V::Scalar>(mode))
        .collect()
}

fn component_name<V: VectorCandidate>(idx: usize) -> String {
    V::COMPONENT_NAMES
        .get(idx)
        .map_or_else(|| format!("component[{idx}]"), |name| (*name).to_string())
}

fn build_vector<V: VectorCandidate>(components: &[V::Scalar]) -> Result<V, ConformanceFailure> {
    V::from_components(components).ok_or_else(|| {
        ConformanceFailure::new(
            FailureKind::ConstructionFieldMismatch,
            format!("{components:?}"),
            format!(
                "constructor rejected {} components, expected {}",
                components.len(),
                V::COMPONENTS
            ),
        )
    })
}

fn check_construction<V: VectorCandidate>(components: &[V::Scalar]) -> Check {
    let vector = build_vector::<V>(components)?;
    let fields = vector.components();
    if fields.len() != components.len() {
        return Err(ConformanceFailure::new(
            FailureKind::ConstructionFieldMismatch,
            format!("{components:?}"),
            format!(
                "vector exposes {} fields for {} arguments",
                fields.len(),
                components.len()
            ),
        ));
    }
    for (idx, (field, argument)) in fields.iter().zip(components).enumerate() {
        if !field.same_value(argument) {
            return Err(ConformanceFailure::new(
                FailureKind::ConstructionFieldMismatch,
                format!("{components:?}"),
                format!(
                    "field {} holds {field:?}, constructed with {argument:?}",
                    component_name::<V>(idx)
                ),
            ));
        }
    }
    Ok(())
}

fn check_vector_byte_round_trip<V: VectorCandidate>(vector: &V) -> Check {
    let bytes = vector.encode();
    match V::decode(&bytes) {
        Ok(decoded) if decoded.same_value(vector) => Ok(()),
        Ok(decoded) => Err(ConformanceFailure::new(
            FailureKind::RoundTripMismatch,
            format!("{vector:?}"),
            format!("bytes {bytes:02x?} decoded to {decoded:?}"),
        )),
        Err(err) => Err(ConformanceFailure::new(
            FailureKind::RoundTripMismatch,
            format!("{vector:?}"),
            format!(
                "decode rejected bytes {bytes:02x?}: {err} ({})",
                err.reason_code()
            ),
        )),
    }
}

fn check_vector_containment<V: VectorCandidate>(bound1: &V, bound2: &V, result: &V) -> Check {
    let lows = bound1.components();
    let highs = bound2.components();
    for (idx, value) in result.components().iter().enumerate() {
        let (Some(b1), Some(b2)) = (lows.get(idx), highs.get(idx)) else {
            return Err(ConformanceFailure::new(
                FailureKind::ConstructionFieldMismatch,
                format!("{result:?}"),
                format!("result has more fields than bounds ({idx})"),
            ));
        };
        let (low, high) = order_bounds(b1, b2);
        if !(low <= value && value <= high) {
            return Err(ConformanceFailure::new(
                FailureKind::RangeContainmentViolation,
                format!("bounds=({bound1:?}, {bound2:?})"),
                format!(
                    "field {} drew {value:?} outside [{low:?}, {high:?}]",
                    component_name::<V>(idx)
                ),
            ));
        }
    }
    Ok(())
}
