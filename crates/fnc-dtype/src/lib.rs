#![forbid(unsafe_code)]

use fnc_random::RandomCandidate;
use std::fmt;
use std::num::{IntErrorKind, ParseIntError};

/// Type classification reported by a candidate.
///
/// Primitive codes identify builtin scalars; `Object` is the generic marker
/// reported by structured wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCode {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Object,
}

impl TypeCode {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "bool",
            Self::Int8 => "i8",
            Self::Int16 => "i16",
            Self::Int32 => "i32",
            Self::Int64 => "i64",
            Self::UInt8 => "u8",
            Self::UInt16 => "u16",
            Self::UInt32 => "u32",
            Self::UInt64 => "u64",
            Self::Float32 => "f32",
            Self::Float64 => "f64",
            Self::Object => "object",
        }
    }

    #[must_use]
    pub const fn item_size(self) -> usize {
        match self {
            Self::Boolean | Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
            Self::Object => 0, // candidate-defined
        }
    }

    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "bool" | "boolean" => Some(Self::Boolean),
            "i8" | "int8" => Some(Self::Int8),
            "i16" | "int16" => Some(Self::Int16),
            "i32" | "int32" => Some(Self::Int32),
            "i64" | "int64" => Some(Self::Int64),
            "u8" | "uint8" => Some(Self::UInt8),
            "u16" | "uint16" => Some(Self::UInt16),
            "u32" | "uint32" => Some(Self::UInt32),
            "u64" | "uint64" => Some(Self::UInt64),
            "f32" | "float32" => Some(Self::Float32),
            "f64" | "float64" => Some(Self::Float64),
            "object" => Some(Self::Object),
            _ => None,
        }
    }

    /// Returns `true` for every code except the `Object` marker.
    #[must_use]
    pub const fn is_primitive(self) -> bool {
        !matches!(self, Self::Object)
    }
}

/// A single capability the harness can gate a property on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Signed,
    Unsigned,
    Integral,
    FloatingPoint,
    /// Not floating point: fixed-point or integral.
    FixedPrecision,
    NaN,
    Infinity,
}

impl Capability {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Signed => "signed",
            Self::Unsigned => "unsigned",
            Self::Integral => "integral",
            Self::FloatingPoint => "floating_point",
            Self::FixedPrecision => "fixed_precision",
            Self::NaN => "nan",
            Self::Infinity => "infinity",
        }
    }
}

/// Declared numeric traits of a candidate type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NumericCapabilities {
    pub is_signed: bool,
    pub is_integral: bool,
    pub has_floating_point: bool,
    pub has_nan: bool,
    pub has_infinity: bool,
    pub is_unsigned: bool,
}

impl NumericCapabilities {
    #[must_use]
    pub const fn signed_integer() -> Self {
        Self {
            is_signed: true,
            is_integral: true,
            has_floating_point: false,
            has_nan: false,
            has_infinity: false,
            is_unsigned: false,
        }
    }

    #[must_use]
    pub const fn unsigned_integer() -> Self {
        Self {
            is_signed: false,
            is_unsigned: true,
            ..Self::signed_integer()
        }
    }

    #[must_use]
    pub const fn signed_fixed_point() -> Self {
        Self {
            is_integral: false,
            ..Self::signed_integer()
        }
    }

    #[must_use]
    pub const fn unsigned_fixed_point() -> Self {
        Self {
            is_integral: false,
            ..Self::unsigned_integer()
        }
    }

    #[must_use]
    pub const fn ieee_float() -> Self {
        Self {
            is_signed: true,
            is_integral: false,
            has_floating_point: true,
            has_nan: true,
            has_infinity: true,
            is_unsigned: false,
        }
    }

    #[must_use]
    pub const fn supports(self, capability: Capability) -> bool {
        match capability {
            Capability::Signed => self.is_signed,
            Capability::Unsigned => self.is_unsigned,
            Capability::Integral => self.is_integral,
            Capability::FloatingPoint => self.has_floating_point,
            Capability::FixedPrecision => !self.has_floating_point,
            Capability::NaN => self.has_nan,
            Capability::Infinity => self.has_infinity,
        }
    }

    pub fn validate(self) -> Result<(), CapabilityError> {
        if self.is_signed == self.is_unsigned {
            return Err(CapabilityError::SignednessAmbiguous);
        }
        if self.has_nan && !self.has_floating_point {
            return Err(CapabilityError::NaNWithoutFloatingPoint);
        }
        if self.has_infinity && !self.has_floating_point {
            return Err(CapabilityError::InfinityWithoutFloatingPoint);
        }
        if self.is_integral && self.has_floating_point {
            return Err(CapabilityError::IntegralFloatingPoint);
        }
        if self.is_unsigned && self.has_floating_point {
            return Err(CapabilityError::UnsignedFloatingPoint);
        }
        Ok(())
    }

    /// Names of the capabilities that are set, in declaration order.
    #[must_use]
    pub fn describe(self) -> Vec<&'static str> {
        [
            Capability::Signed,
            Capability::Unsigned,
            Capability::Integral,
            Capability::FloatingPoint,
            Capability::NaN,
            Capability::Infinity,
        ]
        .into_iter()
        .filter(|cap| self.supports(*cap))
        .map(Capability::as_str)
        .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityError {
    SignednessAmbiguous,
    NaNWithoutFloatingPoint,
    InfinityWithoutFloatingPoint,
    IntegralFloatingPoint,
    UnsignedFloatingPoint,
}

impl CapabilityError {
    #[must_use]
    pub const fn reason_code(self) -> &'static str {
        match self {
            Self::SignednessAmbiguous => "capability_signedness_ambiguous",
            Self::NaNWithoutFloatingPoint => "capability_nan_requires_floating_point",
            Self::InfinityWithoutFloatingPoint => "capability_infinity_requires_floating_point",
            Self::IntegralFloatingPoint => "capability_integral_floating_point_conflict",
            Self::UnsignedFloatingPoint => "capability_unsigned_floating_point_conflict",
        }
    }
}

impl fmt::Display for CapabilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignednessAmbiguous => {
                write!(f, "exactly one of is_signed/is_unsigned must be declared")
            }
            Self::NaNWithoutFloatingPoint => write!(f, "has_nan requires has_floating_point"),
            Self::InfinityWithoutFloatingPoint => {
                write!(f, "has_infinity requires has_floating_point")
            }
            Self::IntegralFloatingPoint => {
                write!(f, "is_integral and has_floating_point are exclusive")
            }
            Self::UnsignedFloatingPoint => {
                write!(f, "is_unsigned and has_floating_point are exclusive")
            }
        }
    }
}

impl std::error::Error for CapabilityError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    Truncated { expected: usize, actual: usize },
    TrailingBytes { expected: usize, actual: usize },
    Empty,
    InvalidDigit,
    OutOfRange,
    PrecisionOverflow,
    ComponentCount { expected: usize, actual: usize },
}

impl CodecError {
    #[must_use]
    pub const fn reason_code(self) -> &'static str {
        match self {
            Self::Truncated { .. } => "codec_bytes_truncated",
            Self::TrailingBytes { .. } => "codec_trailing_bytes",
            Self::Empty => "codec_empty_input",
            Self::InvalidDigit => "codec_invalid_digit",
            Self::OutOfRange => "codec_out_of_range",
            Self::PrecisionOverflow => "codec_precision_overflow",
            Self::ComponentCount { .. } => "codec_component_count_mismatch",
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { expected, actual } => {
                write!(f, "expected {expected} bytes, got {actual}")
            }
            Self::TrailingBytes { expected, actual } => {
                write!(f, "expected {expected} bytes, got {actual} (trailing data)")
            }
            Self::Empty => write!(f, "cannot parse empty input"),
            Self::InvalidDigit => write!(f, "invalid digit in numeric literal"),
            Self::OutOfRange => write!(f, "value outside representable range"),
            Self::PrecisionOverflow => write!(f, "fraction has more digits than the type holds"),
            Self::ComponentCount { expected, actual } => {
                write!(f, "expected {expected} components, got {actual}")
            }
        }
    }
}

impl std::error::Error for CodecError {}

/// Checks a decode buffer holds exactly `width` bytes.
pub fn check_width(bytes: &[u8], width: usize) -> Result<(), CodecError> {
    match bytes.len() {
        len if len < width => Err(CodecError::Truncated {
            expected: width,
            actual: len,
        }),
        len if len > width => Err(CodecError::TrailingBytes {
            expected: width,
            actual: len,
        }),
        _ => Ok(()),
    }
}

pub fn fixed_width<const N: usize>(bytes: &[u8]) -> Result<[u8; N], CodecError> {
    check_width(bytes, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok(out)
}

#[must_use]
pub fn classify_int_error(err: &ParseIntError) -> CodecError {
    match err.kind() {
        IntErrorKind::Empty => CodecError::Empty,
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => CodecError::OutOfRange,
        _ => CodecError::InvalidDigit,
    }
}

/// The contract every scalar under test exposes to the harness.
pub trait NumericCandidate: RandomCandidate + fmt::Debug {
    const NAME: &'static str;
    const CAPABILITIES: NumericCapabilities;
    const BYTE_WIDTH: usize;

    fn zero() -> Self;
    fn min_value() -> Self;
    fn max_value() -> Self;
    /// Smallest positive increment from zero.
    fn epsilon() -> Self;

    fn encode(&self) -> Vec<u8>;
    fn decode(bytes: &[u8]) -> Result<Self, CodecError>;

    fn format(&self) -> String;
    fn parse(raw: &str) -> Result<Self, CodecError>;

    fn to_bool(&self) -> bool;

    fn type_code() -> TypeCode {
        TypeCode::Object
    }

    /// Bit-exact equality; the round-trip properties compare with this.
    fn same_value(&self, other: &Self) -> bool {
        self == other
    }

    fn is_zero(&self) -> bool {
        self.same_value(&Self::zero())
    }

    fn nan() -> Option<Self> {
        None
    }

    fn infinity() -> Option<Self> {
        None
    }

    fn is_nan(&self) -> bool {
        false
    }
}

/// Multi-component candidates built from scalar candidates.
pub trait VectorCandidate: Copy + fmt::Debug {
    type Scalar: NumericCandidate;

    const KIND: &'static str;
    const COMPONENTS: usize;
    const COMPONENT_NAMES: &'static [&'static str];

    /// Registry name, e.g. `vector3<fix64>`.
    fn name() -> String {
        format!("{}<{}>", Self::KIND, <Self::Scalar as NumericCandidate>::NAME)
    }

    /// `None` when `components.len() != COMPONENTS`.
    fn from_components(components: &[Self::Scalar]) -> Option<Self>;
    fn components(&self) -> Vec<Self::Scalar>;

    fn encode(&self) -> Vec<u8> {
        self.components()
            .iter()
            .flat_map(|component| component.encode())
            .collect()
    }

    fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let width = <Self::Scalar as NumericCandidate>::BYTE_WIDTH;
        check_width(bytes, width * Self::COMPONENTS)?;
        let components = bytes
            .chunks(width)
            .map(<Self::Scalar as NumericCandidate>::decode)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_components(&components).ok_or(CodecError::ComponentCount {
            expected: Self::COMPONENTS,
            actual: components.len(),
        })
    }

    fn same_value(&self, other: &Self) -> bool {
        let lhs = self.components();
        let rhs = other.components();
        lhs.len() == rhs.len() && lhs.iter().zip(&rhs).all(|(a, b)| a.same_value(b))
    }
}

macro_rules! primitive_integer_candidate {
    ($ty:ty, $code:expr, $caps:expr) => {
        impl NumericCandidate for $ty {
            const NAME: &'static str = stringify!($ty);
            const CAPABILITIES: NumericCapabilities = $caps;
            const BYTE_WIDTH: usize = std::mem::size_of::<$ty>();

            fn zero() -> Self {
                0
            }

            fn min_value() -> Self {
                <$ty>::MIN
            }

            fn max_value() -> Self {
                <$ty>::MAX
            }

            fn epsilon() -> Self {
                1
            }

            fn encode(&self) -> Vec<u8> {
                self.to_le_bytes().to_vec()
            }

            fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
                fixed_width(bytes).map(<$ty>::from_le_bytes)
            }

            fn format(&self) -> String {
                self.to_string()
            }

            fn parse(raw: &str) -> Result<Self, CodecError> {
                raw.trim()
                    .parse::<$ty>()
                    .map_err(|err| classify_int_error(&err))
            }

            fn to_bool(&self) -> bool {
                *self != 0
            }

            fn type_code() -> TypeCode {
                $code
            }
        }
    };
}

primitive_integer_candidate!(u8, TypeCode::UInt8, NumericCapabilities::unsigned_integer());
primitive_integer_candidate!(u16, TypeCode::UInt16, NumericCapabilities::unsigned_integer());
primitive_integer_candidate!(i32, TypeCode::Int32, NumericCapabilities::signed_integer());
primitive_integer_candidate!(i64, TypeCode::Int64, NumericCapabilities::signed_integer());

macro_rules! primitive_float_candidate {
    ($ty:ty, $code:expr) => {
        impl NumericCandidate for $ty {
            const NAME: &'static str = stringify!($ty);
            const CAPABILITIES: NumericCapabilities = NumericCapabilities::ieee_float();
            const BYTE_WIDTH: usize = std::mem::size_of::<$ty>();

            fn zero() -> Self {
                0.0
            }

            fn min_value() -> Self {
                <$ty>::MIN
            }

            fn max_value() -> Self {
                <$ty>::MAX
            }

            fn epsilon() -> Self {
                // Smallest positive subnormal.
                <$ty>::from_bits(1)
            }

            fn encode(&self) -> Vec<u8> {
                self.to_le_bytes().to_vec()
            }

            fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
                fixed_width(bytes).map(<$ty>::from_le_bytes)
            }

            fn format(&self) -> String {
                self.to_string()
            }

            fn parse(raw: &str) -> Result<Self, CodecError> {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(CodecError::Empty);
                }
                trimmed
                    .parse::<$ty>()
                    .map_err(|_| CodecError::InvalidDigit)
            }

            fn to_bool(&self) -> bool {
                *self != 0.0
            }

            fn type_code() -> TypeCode {
                $code
            }

            fn same_value(&self, other: &Self) -> bool {
                self.to_bits() == other.to_bits()
            }

            fn is_zero(&self) -> bool {
                *self == 0.0
            }

            fn nan() -> Option<Self> {
                Some(<$ty>::NAN)
            }

            fn infinity() -> Option<Self> {
                Some(<$ty>::INFINITY)
            }

            fn is_nan(&self) -> bool {
                <$ty>::is_nan(*self)
            }
        }
    };
}

primitive_float_candidate!(f32, TypeCode::Float32);
primitive_float_candidate!(f64, TypeCode::Float64);

#[cfg(test)]
mod tests {
    use super::{
        Capability, CapabilityError, CodecError, NumericCandidate, NumericCapabilities, TypeCode,
        check_width,
    };
    use fnc_random::{GenerationMode, ValueGenerator};

    fn all_type_codes() -> [TypeCode; 12] {
        [
            TypeCode::Boolean,
            TypeCode::Int8,
            TypeCode::Int16,
            TypeCode::Int32,
            TypeCode::Int64,
            TypeCode::UInt8,
            TypeCode::UInt16,
            TypeCode::UInt32,
            TypeCode::UInt64,
            TypeCode::Float32,
            TypeCode::Float64,
            TypeCode::Object,
        ]
    }

    #[test]
    fn type_code_names_parse_back() {
        for code in all_type_codes() {
            assert_eq!(TypeCode::parse(code.name()), Some(code), "{code:?}");
        }
        assert_eq!(TypeCode::parse("complex64"), None);
    }

    #[test]
    fn only_object_is_unclassified() {
        let unclassified = all_type_codes()
            .into_iter()
            .filter(|code| !code.is_primitive())
            .collect::<Vec<_>>();
        assert_eq!(unclassified, vec![TypeCode::Object]);
        assert_eq!(TypeCode::Object.item_size(), 0);
    }

    #[test]
    fn preset_capabilities_are_consistent() {
        for caps in [
            NumericCapabilities::signed_integer(),
            NumericCapabilities::unsigned_integer(),
            NumericCapabilities::signed_fixed_point(),
            NumericCapabilities::unsigned_fixed_point(),
            NumericCapabilities::ieee_float(),
        ] {
            assert_eq!(caps.validate(), Ok(()), "{caps:?}");
        }
    }

    #[test]
    fn inconsistent_capabilities_are_rejected() {
        let nan_without_float = NumericCapabilities {
            has_nan: true,
            ..NumericCapabilities::signed_fixed_point()
        };
        assert_eq!(
            nan_without_float.validate(),
            Err(CapabilityError::NaNWithoutFloatingPoint)
        );

        let both_signs = NumericCapabilities {
            is_unsigned: true,
            ..NumericCapabilities::signed_integer()
        };
        assert_eq!(
            both_signs.validate(),
            Err(CapabilityError::SignednessAmbiguous)
        );

        let integral_float = NumericCapabilities {
            is_integral: true,
            ..NumericCapabilities::ieee_float()
        };
        assert_eq!(
            integral_float.validate().map_err(CapabilityError::reason_code),
            Err("capability_integral_floating_point_conflict")
        );
    }

    #[test]
    fn capability_queries_follow_flags() {
        let caps = NumericCapabilities::unsigned_fixed_point();
        assert!(caps.supports(Capability::Unsigned));
        assert!(caps.supports(Capability::FixedPrecision));
        assert!(!caps.supports(Capability::Signed));
        assert!(!caps.supports(Capability::Integral));
        assert!(!caps.supports(Capability::NaN));
        assert_eq!(caps.describe(), vec!["unsigned"]);
        assert_eq!(
            NumericCapabilities::ieee_float().describe(),
            vec!["signed", "floating_point", "nan", "infinity"]
        );
    }

    #[test]
    fn width_check_distinguishes_short_and_long_input() {
        assert_eq!(
            check_width(&[1, 2], 4),
            Err(CodecError::Truncated {
                expected: 4,
                actual: 2
            })
        );
        assert_eq!(
            check_width(&[0; 5], 4).map_err(CodecError::reason_code),
            Err("codec_trailing_bytes")
        );
        assert_eq!(check_width(&[0; 4], 4), Ok(()));
    }

    #[test]
    fn primitive_integers_report_primitive_codes() {
        assert_eq!(<u8 as NumericCandidate>::type_code(), TypeCode::UInt8);
        assert_eq!(<i64 as NumericCandidate>::type_code(), TypeCode::Int64);
        assert_eq!(<u8 as NumericCandidate>::decode(&[255]), Ok(255));
        assert_eq!(
            <i32 as NumericCandidate>::parse("99999999999"),
            Err(CodecError::OutOfRange)
        );
        assert_eq!(<u16 as NumericCandidate>::parse(""), Err(CodecError::Empty));
        assert_eq!(
            <u16 as NumericCandidate>::parse("12x"),
            Err(CodecError::InvalidDigit)
        );
    }

    #[test]
    fn float_special_values_and_zero_sign() {
        let nan = <f64 as NumericCandidate>::nan().expect("f64 has NaN");
        assert!(NumericCandidate::is_nan(&nan));
        assert!(!nan.same_value(&0.0));
        assert!((-0.0f64).is_zero());
        assert!(!(-0.0f64).to_bool());
        assert!(!(-0.0f64).same_value(&0.0));
        assert!(<f32 as NumericCandidate>::epsilon() > 0.0);
    }

    #[test]
    fn float_extended_samples_are_finite() {
        let mut generator = ValueGenerator::new(31);
        for _ in 0..512 {
            let value = generator.next_value::<f64>(GenerationMode::Extended);
            assert!(value.is_finite(), "value={value}");
            let narrow = generator.next_value::<f32>(GenerationMode::Extended);
            assert!(narrow.is_finite(), "value={narrow}");
        }
    }
}
