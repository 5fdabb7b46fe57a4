use crate::{ConformanceHarness, HarnessConfig, SuiteReport};
use fnc_dtype::{NumericCandidate, VectorCandidate};
use fnc_numeric::{
    CheckedI64, CheckedU16, ClampedI16, ClampedI32, ClampedU8, Fix64, UFix32, Vector2, Vector3,
    WrappingI32, WrappingU8,
};

type BatteryFn = fn(&ConformanceHarness) -> Result<SuiteReport, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateFamily {
    Scalar,
    Vector,
}

impl CandidateFamily {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Vector => "vector",
        }
    }
}

/// A candidate type erased down to its battery entry point.
#[derive(Debug, Clone)]
pub struct RegisteredCandidate {
    pub name: String,
    pub family: CandidateFamily,
    battery: BatteryFn,
}

impl RegisteredCandidate {
    pub fn run(&self, harness: &ConformanceHarness) -> Result<SuiteReport, String> {
        (self.battery)(harness)
    }
}

fn scalar_battery<T: NumericCandidate>(harness: &ConformanceHarness) -> Result<SuiteReport, String> {
    harness.run_scalar_battery::<T>()
}

fn vector_battery<V: VectorCandidate>(harness: &ConformanceHarness) -> Result<SuiteReport, String> {
    harness.run_vector_battery::<V>()
}

/// Ordered set of candidates the gate runs. Registering a name twice
/// replaces the earlier entry in place.
#[derive(Debug, Clone, Default)]
pub struct CandidateRegistry {
    entries: Vec<RegisteredCandidate>,
}

impl CandidateRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_scalar<T: NumericCandidate>(&mut self) -> &mut Self {
        self.insert(RegisteredCandidate {
            name: T::NAME.to_string(),
            family: CandidateFamily::Scalar,
            battery: scalar_battery::<T>,
        })
    }

    pub fn register_vector<V: VectorCandidate>(&mut self) -> &mut Self {
        self.insert(RegisteredCandidate {
            name: V::name(),
            family: CandidateFamily::Vector,
            battery: vector_battery::<V>,
        })
    }

    fn insert(&mut self, candidate: RegisteredCandidate) -> &mut Self {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.name == candidate.name)
        {
            Some(slot) => *slot = candidate,
            None => self.entries.push(candidate),
        }
        self
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RegisteredCandidate> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredCandidate> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One report per registered candidate, in registration order.
    pub fn run_all(&self, config: &HarnessConfig) -> Result<Vec<SuiteReport>, String> {
        let harness = ConformanceHarness::new(config.clone());
        self.entries
            .iter()
            .map(|entry| {
                entry
                    .run(&harness)
                    .map_err(|err| format!("{}: {err}", entry.name))
            })
            .collect()
    }
}

/// Every wrapper shipped by `fnc-numeric`.
///
/// Primitive `u8`/`i32`/`f64` implement the candidate traits too, but they
/// report primitive type codes and are left out of the default gate.
#[must_use]
pub fn default_registry() -> CandidateRegistry {
    let mut registry = CandidateRegistry::new();
    registry
        .register_scalar::<Fix64>()
        .register_scalar::<UFix32>()
        .register_scalar::<ClampedU8>()
        .register_scalar::<ClampedI16>()
        .register_scalar::<ClampedI32>()
        .register_scalar::<CheckedU16>()
        .register_scalar::<CheckedI64>()
        .register_scalar::<WrappingU8>()
        .register_scalar::<WrappingI32>()
        .register_vector::<Vector2<Fix64>>()
        .register_vector::<Vector3<Fix64>>()
        .register_vector::<Vector2<ClampedI32>>()
        .register_vector::<Vector3<UFix32>>()
        .register_vector::<Vector2<WrappingU8>>();
    registry
}

pub fn run_all_registered(config: &HarnessConfig) -> Result<Vec<SuiteReport>, String> {
    default_registry().run_all(config)
}
