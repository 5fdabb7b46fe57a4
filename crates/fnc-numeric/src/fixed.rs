use fnc_dtype::{CodecError, NumericCandidate, NumericCapabilities, fixed_width};
use fnc_random::{DeterministicRng, GenerationMode, RandomCandidate, RawDomain};
use std::fmt;
use std::str::FromStr;

/// Renders a binary fixed-point magnitude as an exact decimal string.
///
/// `frac / 2^F == frac * 5^F / 10^F`, so the fraction always has at most
/// `frac_bits` decimal digits and never needs rounding.
pub(crate) fn format_fixed(negative: bool, magnitude: u128, frac_bits: u32) -> String {
    let int_part = magnitude >> frac_bits;
    let frac = magnitude & ((1u128 << frac_bits) - 1);

    let mut out = String::new();
    if negative && magnitude != 0 {
        out.push('-');
    }
    out.push_str(&int_part.to_string());
    if frac != 0 {
        let digits = frac * 5u128.pow(frac_bits);
        let mut text = format!("{digits:0width$}", width = frac_bits as usize);
        while text.ends_with('0') {
            text.pop();
        }
        out.push('.');
        out.push_str(&text);
    }
    out
}

/// Parses a decimal literal into `(negative, magnitude)` in raw units,
/// rounding the fraction half-up to the nearest raw unit.
pub(crate) fn parse_fixed(raw: &str, frac_bits: u32) -> Result<(bool, u128), CodecError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CodecError::Empty);
    }
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let (int_text, frac_text) = body.split_once('.').unwrap_or((body, ""));
    if int_text.is_empty() && frac_text.is_empty() {
        return Err(CodecError::InvalidDigit);
    }
    if !int_text.bytes().all(|b| b.is_ascii_digit()) || !frac_text.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(CodecError::InvalidDigit);
    }
    if frac_text.len() > frac_bits as usize {
        return Err(CodecError::PrecisionOverflow);
    }

    let int_part = if int_text.is_empty() {
        0
    } else {
        int_text
            .parse::<u128>()
            .map_err(|_| CodecError::OutOfRange)?
    };
    let frac_raw = if frac_text.is_empty() {
        0
    } else {
        let scale = 5u128.pow(frac_bits);
        let padded = format!("{frac_text:0<width$}", width = frac_bits as usize);
        let decimal = padded
            .parse::<u128>()
            .map_err(|_| CodecError::InvalidDigit)?;
        (decimal + scale / 2) / scale
    };

    let magnitude = int_part
        .checked_mul(1u128 << frac_bits)
        .and_then(|int_raw| int_raw.checked_add(frac_raw))
        .ok_or(CodecError::OutOfRange)?;
    Ok((negative, magnitude))
}

macro_rules! fixed_point {
    (
        $(#[$meta:meta])*
        $name:ident, $raw:ty, $frac_bits:expr, $label:literal, $caps:expr, $domain:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name {
            raw: $raw,
        }

        impl $name {
            pub const FRAC_BITS: u32 = $frac_bits;
            pub const ONE: Self = Self {
                raw: 1 << $frac_bits,
            };
            pub const DOMAIN: RawDomain = $domain;

            #[must_use]
            pub const fn from_raw(raw: $raw) -> Self {
                Self { raw }
            }

            #[must_use]
            pub const fn raw(self) -> $raw {
                self.raw
            }

            /// `None` when the integer part does not fit.
            #[must_use]
            pub fn from_int(value: i64) -> Option<Self> {
                let scaled = i128::from(value).checked_mul(1i128 << $frac_bits)?;
                <$raw>::try_from(scaled).ok().map(Self::from_raw)
            }

            fn from_wide(raw: i128) -> Option<Self> {
                <$raw>::try_from(raw).ok().map(Self::from_raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&NumericCandidate::format(self))
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
                    Self::from_wide(low).unwrap_or(Self::from_raw(<$raw>::MIN)),
                    Self::from_wide(high).unwrap_or(Self::from_raw(<$raw>::MAX)),
                )
            }

            fn sample_between(rng: &mut DeterministicRng, low: Self, high: Self) -> Self {
                let raw =
                    Self::DOMAIN.sample_between(rng, i128::from(low.raw), i128::from(high.raw));
                Self::from_wide(raw).unwrap_or(low)
            }
        }

        impl NumericCandidate for $name {
            const NAME: &'static str = $label;
            const CAPABILITIES: NumericCapabilities = $caps;
            const BYTE_WIDTH: usize = std::mem::size_of::<$raw>();

            fn zero() -> Self {
                Self::from_raw(0)
            }

            fn min_value() -> Self {
                Self::from_raw(<$raw>::MIN)
            }

            fn max_value() -> Self {
                Self::from_raw(<$raw>::MAX)
            }

            fn epsilon() -> Self {
                Self::from_raw(1)
            }

            fn encode(&self) -> Vec<u8> {
                self.raw.to_le_bytes().to_vec()
            }

            fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
                fixed_width(bytes).map(|le| Self::from_raw(<$raw>::from_le_bytes(le)))
            }

            fn format(&self) -> String {
                let wide = i128::from(self.raw);
                format_fixed(wide < 0, wide.unsigned_abs(), $frac_bits)
            }

            fn parse(raw: &str) -> Result<Self, CodecError> {
                let (negative, magnitude) = parse_fixed(raw, $frac_bits)?;
                let magnitude = i128::try_from(magnitude).map_err(|_| CodecError::OutOfRange)?;
                let signed = if negative { -magnitude } else { magnitude };
                Self::from_wide(signed).ok_or(CodecError::OutOfRange)
            }

            fn to_bool(&self) -> bool {
                self.raw != 0
            }
        }
    };
}

fixed_point!(
    /// Signed Q32.32 fixed-point number.
    Fix64,
    i64,
    32,
    "fix64",
    NumericCapabilities::signed_fixed_point(),
    RawDomain {
        min: i64::MIN as i128,
        max: i64::MAX as i128,
        one: 1 << 32,
        low_magnitude: (1024 << 32) - 1,
        default_magnitude: (65_536 << 32) - 1,
    }
);

fixed_point!(
    /// Unsigned Q16.16 fixed-point number.
    UFix32,
    u32,
    16,
    "ufix32",
    NumericCapabilities::unsigned_fixed_point(),
    RawDomain {
        min: 0,
        max: u32::MAX as i128,
        one: 1 << 16,
        low_magnitude: (1024 << 16) - 1,
        default_magnitude: u32::MAX as i128,
    }
);
