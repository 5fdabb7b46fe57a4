use fnc_dtype::{CodecError, NumericCandidate, NumericCapabilities, classify_int_error, fixed_width};
use fnc_random::{DeterministicRng, GenerationMode, RandomCandidate, RawDomain};
use std::fmt;
use std::str::FromStr;

macro_rules! integer_candidate {
    ($name:ident, $inner:ty, $label:literal, $caps:expr) => {
        impl $name {
            pub const MIN: Self = Self(<$inner>::MIN);
            pub const MAX: Self = Self(<$inner>::MAX);
            pub const DOMAIN: RawDomain =
                RawDomain::integer(<$inner>::MIN as i128, <$inner>::MAX as i128);

            #[must_use]
            pub const fn from_inner(value: $inner) -> Self {
                Self(value)
            }

            #[must_use]
            pub const fn get(self) -> $inner {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = CodecError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as NumericCandidate>::parse(s)
            }
        }

        impl RandomCandidate for $name {
            fn mode_bounds(mode: GenerationMode) -> (Self, Self) {
                let (low, high) = Self::DOMAIN.mode_bounds(mode);
                (
                    <$inner>::try_from(low).map_or(Self::MIN, Self),
                    <$inner>::try_from(high).map_or(Self::MAX, Self),
                )
            }

            fn sample_between(rng: &mut DeterministicRng, low: Self, high: Self) -> Self {
                let raw = Self::DOMAIN.sample_between(rng, i128::from(low.0), i128::from(high.0));
                <$inner>::try_from(raw).map_or(low, Self)
            }
        }

        impl NumericCandidate for $name {
            const NAME: &'static str = $label;
            const CAPABILITIES: NumericCapabilities = $caps;
            const BYTE_WIDTH: usize = std::mem::size_of::<$inner>();

            fn zero() -> Self {
                Self(0)
            }

            fn min_value() -> Self {
                Self::MIN
            }

            fn max_value() -> Self {
                Self::MAX
            }

            fn epsilon() -> Self {
                Self(1)
            }

            fn encode(&self) -> Vec<u8> {
                self.0.to_le_bytes().to_vec()
            }

            fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
                fixed_width(bytes).map(|le| Self(<$inner>::from_le_bytes(le)))
            }

            fn format(&self) -> String {
                self.0.to_string()
            }

            fn parse(raw: &str) -> Result<Self, CodecError> {
                raw.trim()
                    .parse::<$inner>()
                    .map(Self)
                    .map_err(|err| classify_int_error(&err))
            }

            fn to_bool(&self) -> bool {
                self.0 != 0
            }
        }
    };
}

macro_rules! clamped_integer {
    ($(#[$meta:meta])* $name:ident, $inner:ty, $label:literal, $caps:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name($inner);

        impl $name {
            /// Saturates `value` into the representable range.
            #[must_use]
            pub const fn new(value: i128) -> Self {
                let min = <$inner>::MIN as i128;
                let max = <$inner>::MAX as i128;
                let clamped = if value < min {
                    min
                } else if value > max {
                    max
                } else {
                    value
                };
                Self(clamped as $inner)
            }
        }

        integer_candidate!($name, $inner, $label, $caps);
    };
}

macro_rules! checked_integer {
    ($(#[$meta:meta])* $name:ident, $inner:ty, $label:literal, $caps:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name($inner);

        impl $name {
            /// `None` when `value` is not representable.
            #[must_use]
            pub fn new(value: i128) -> Option<Self> {
                <$inner>::try_from(value).ok().map(Self)
            }
        }

        integer_candidate!($name, $inner, $label, $caps);
    };
}

macro_rules! wrapping_integer {
    ($(#[$meta:meta])* $name:ident, $inner:ty, $label:literal, $caps:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name($inner);

        impl $name {
            /// Reduces `value` modulo `2^BITS`.
            #[must_use]
            pub const fn new(value: i128) -> Self {
                Self(value as $inner)
            }
        }

        integer_candidate!($name, $inner, $label, $caps);
    };
}

clamped_integer!(
    /// 8-bit unsigned integer saturating at 0 and 255.
    ClampedU8,
    u8,
    "clamped_u8",
    NumericCapabilities::unsigned_integer()
);
clamped_integer!(
    ClampedI16,
    i16,
    "clamped_i16",
    NumericCapabilities::signed_integer()
);
clamped_integer!(
    ClampedI32,
    i32,
    "clamped_i32",
    NumericCapabilities::signed_integer()
);

checked_integer!(
    CheckedU16,
    u16,
    "checked_u16",
    NumericCapabilities::unsigned_integer()
);
checked_integer!(
    CheckedI64,
    i64,
    "checked_i64",
    NumericCapabilities::signed_integer()
);

wrapping_integer!(
    /// 8-bit unsigned integer with modular construction.
    WrappingU8,
    u8,
    "wrapping_u8",
    NumericCapabilities::unsigned_integer()
);
wrapping_integer!(
    WrappingI32,
    i32,
    "wrapping_i32",
    NumericCapabilities::signed_integer()
);

#[cfg(test)]
mod tests {
    use super::{CheckedI64, CheckedU16, ClampedI16, ClampedU8, WrappingI32, WrappingU8};
    use fnc_dtype::{CodecError, NumericCandidate};
    use fnc_random::{GenerationMode, RandomCandidate};

    #[test]
    fn construction_policies_differ_outside_range() {
        assert_eq!(ClampedU8::new(300), ClampedU8::MAX);
        assert_eq!(ClampedU8::new(-5), ClampedU8::MIN);
        assert_eq!(ClampedI16::new(i128::MIN), ClampedI16::MIN);
        assert_eq!(CheckedU16::new(65_536), None);
        assert_eq!(CheckedU16::new(65_535), Some(CheckedU16::MAX));
        assert_eq!(CheckedI64::new(i128::from(i64::MIN) - 1), None);
        assert_eq!(WrappingU8::new(256).get(), 0);
        assert_eq!(WrappingU8::new(-1).get(), 255);
        assert_eq!(
            WrappingI32::new(i128::from(i32::MAX) + 1),
            WrappingI32::MIN
        );
    }

    #[test]
    fn integer_codecs_use_decimal_and_le_bytes() {
        assert_eq!(ClampedU8::max_value().encode(), vec![255]);
        assert_eq!(ClampedU8::decode(&[255]), Ok(ClampedU8::MAX));
        assert_eq!(
            WrappingI32::decode(&[0, 0, 0, 0, 0]),
            Err(CodecError::TrailingBytes {
                expected: 4,
                actual: 5
            })
        );
        assert_eq!("-42".parse::<ClampedI16>(), Ok(ClampedI16::from_inner(-42)));
        assert_eq!("256".parse::<WrappingU8>(), Err(CodecError::OutOfRange));
        assert_eq!(CheckedI64::min_value().to_string(), i64::MIN.to_string());
    }

    #[test]
    fn unit_and_low_magnitude_bounds() {
        assert_eq!(
            ClampedU8::mode_bounds(GenerationMode::Unit),
            (ClampedU8::from_inner(0), ClampedU8::from_inner(1))
        );
        assert_eq!(
            ClampedI16::mode_bounds(GenerationMode::LowMagnitude),
            (ClampedI16::from_inner(-1000), ClampedI16::from_inner(1000))
        );
        assert_eq!(
            CheckedI64::mode_bounds(GenerationMode::Extended),
            (CheckedI64::MIN, CheckedI64::MAX)
        );
    }

    #[test]
    fn boolean_view_is_non_zero() {
        assert!(!ClampedU8::zero().to_bool());
        assert!(WrappingI32::from_inner(-7).to_bool());
        assert!(CheckedU16::epsilon().to_bool());
    }
}
