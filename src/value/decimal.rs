//! 96-bit scaled decimal in the `System.Decimal` layout.
//!
//! A decimal is a 96-bit unsigned mantissa split over three 32-bit words (`lo`, `mid`,
//! `hi`), and a flags word that carries the sign in bit 31 and the power-of-ten scale
//! (0 to 28) in bits 16 to 23. The value is `(-1)^sign * mantissa / 10^scale`.
//!
//! Trailing zeros are significant for display (`1.50` keeps its scale of 2) but not for
//! equality.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use crate::{Error, Result};

const SIGN_MASK: u32 = 0x8000_0000;
const SCALE_MASK: u32 = 0x00FF_0000;
const SCALE_SHIFT: u32 = 16;
const MAX_SCALE: u8 = 28;
const MAX_MANTISSA: u128 = (1 << 96) - 1;

const fn pow10(exp: u8) -> u128 {
    let mut result = 1u128;
    let mut i = 0;
    while i < exp {
        result *= 10;
        i += 1;
    }
    result
}

/// A `System.Decimal` value.
#[derive(Clone, Copy, Default)]
pub struct Decimal {
    lo: u32,
    mid: u32,
    hi: u32,
    flags: u32,
}

impl Decimal {
    /// The value zero
    pub const ZERO: Decimal = Decimal {
        lo: 0,
        mid: 0,
        hi: 0,
        flags: 0,
    };

    /// The largest representable value, 79228162514264337593543950335
    pub const MAX: Decimal = Decimal {
        lo: u32::MAX,
        mid: u32::MAX,
        hi: u32::MAX,
        flags: 0,
    };

    /// The smallest representable value, -79228162514264337593543950335
    pub const MIN: Decimal = Decimal {
        lo: u32::MAX,
        mid: u32::MAX,
        hi: u32::MAX,
        flags: SIGN_MASK,
    };

    /// Create a decimal from its mantissa words, sign and scale.
    ///
    /// # Errors
    /// Returns [`crate::Error::Argument`] if `scale` exceeds 28.
    pub fn from_parts(lo: u32, mid: u32, hi: u32, negative: bool, scale: u8) -> Result<Self> {
        if scale > MAX_SCALE {
            return Err(Error::Argument(format!(
                "Decimal scale must be between 0 and {MAX_SCALE}, got {scale}"
            )));
        }

        let sign = if negative { SIGN_MASK } else { 0 };
        Ok(Decimal {
            lo,
            mid,
            hi,
            flags: sign | (u32::from(scale) << SCALE_SHIFT),
        })
    }

    /// Create a decimal from its four raw words `[lo, mid, hi, flags]`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Argument`] if the flags word sets bits other than sign and
    /// scale, or carries a scale above 28.
    pub fn from_bits(bits: [u32; 4]) -> Result<Self> {
        let [lo, mid, hi, flags] = bits;
        let scale = (flags & SCALE_MASK) >> SCALE_SHIFT;
        if flags & !(SIGN_MASK | SCALE_MASK) != 0 || scale > u32::from(MAX_SCALE) {
            return Err(Error::Argument(format!(
                "Decimal flags 0x{flags:08X} are not valid"
            )));
        }

        Ok(Decimal { lo, mid, hi, flags })
    }

    /// Create a decimal equal to `mantissa / 10^scale`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Overflow`] if the magnitude of `mantissa` needs more than
    /// 96 bits, or [`crate::Error::Argument`] if `scale` exceeds 28.
    pub fn new(mantissa: i128, scale: u8) -> Result<Self> {
        let magnitude = mantissa.unsigned_abs();
        if magnitude > MAX_MANTISSA {
            return Err(Error::Overflow {
                value: mantissa.to_string(),
                target: "System.Decimal".to_string(),
            });
        }

        Self::from_magnitude(magnitude, mantissa < 0, scale)
    }

    fn from_magnitude(magnitude: u128, negative: bool, scale: u8) -> Result<Self> {
        #[allow(clippy::cast_possible_truncation)]
        Self::from_parts(
            magnitude as u32,
            (magnitude >> 32) as u32,
            (magnitude >> 64) as u32,
            negative,
            scale,
        )
    }

    /// Convert a double using its shortest round-trip representation.
    ///
    /// # Errors
    /// Returns [`crate::Error::Overflow`] for NaN, infinities and magnitudes beyond
    /// [`Decimal::MAX`].
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::Overflow {
                value: value.to_string(),
                target: "System.Decimal".to_string(),
            });
        }

        value.to_string().parse()
    }

    /// Convert a single using its shortest round-trip representation.
    ///
    /// # Errors
    /// Same as [`Decimal::from_f64`].
    pub fn from_f32(value: f32) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::Overflow {
                value: value.to_string(),
                target: "System.Decimal".to_string(),
            });
        }

        value.to_string().parse()
    }

    /// The raw words `[lo, mid, hi, flags]`
    #[must_use]
    pub fn to_bits(&self) -> [u32; 4] {
        [self.lo, self.mid, self.hi, self.flags]
    }

    /// The unsigned 96-bit mantissa
    #[must_use]
    pub fn mantissa(&self) -> u128 {
        u128::from(self.lo) | (u128::from(self.mid) << 32) | (u128::from(self.hi) << 64)
    }

    /// The power-of-ten scale, 0 to 28
    #[must_use]
    pub fn scale(&self) -> u8 {
        #[allow(clippy::cast_possible_truncation)]
        let scale = ((self.flags & SCALE_MASK) >> SCALE_SHIFT) as u8;
        scale
    }

    /// Whether the sign bit is set (negative zero included)
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.flags & SIGN_MASK != 0
    }

    /// Whether the value is zero, regardless of sign and scale
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.mantissa() == 0
    }

    /// Round to the nearest integer; midpoints round to the even neighbour.
    #[must_use]
    pub fn round_to_integer(&self) -> i128 {
        let divisor = pow10(self.scale());
        let mantissa = self.mantissa();
        let mut quotient = mantissa / divisor;
        let remainder = mantissa % divisor;
        let half = divisor / 2;

        if divisor > 1 && (remainder > half || (remainder == half && quotient % 2 == 1)) {
            quotient += 1;
        }

        // The quotient is at most 2^96, which always fits
        #[allow(clippy::cast_possible_wrap)]
        let quotient = quotient as i128;
        if self.is_negative() {
            -quotient
        } else {
            quotient
        }
    }

    /// Nearest double to this value
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }

    /// Nearest single to this value
    #[must_use]
    pub fn to_f32(&self) -> f32 {
        self.to_string().parse().unwrap_or(f32::NAN)
    }

    /// Mantissa and scale with trailing zeros removed
    fn normalized(&self) -> (u128, u8) {
        let mut mantissa = self.mantissa();
        let mut scale = self.scale();
        while scale > 0 && mantissa % 10 == 0 {
            mantissa /= 10;
            scale -= 1;
        }
        (mantissa, scale)
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        if self.is_zero() && other.is_zero() {
            return true;
        }

        self.is_negative() == other.is_negative() && self.normalized() == other.normalized()
    }
}

impl Eq for Decimal {}

impl Hash for Decimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if self.is_zero() {
            0u128.hash(state);
            return;
        }

        self.is_negative().hash(state);
        self.normalized().hash(state);
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal({self})")
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa().to_string();
        let scale = usize::from(self.scale());

        if self.is_negative() && !self.is_zero() {
            f.write_str("-")?;
        }

        if scale == 0 {
            return f.write_str(&digits);
        }

        if digits.len() > scale {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            write!(f, "{int_part}.{frac_part}")
        } else {
            write!(f, "0.{}{digits}", "0".repeat(scale - digits.len()))
        }
    }
}

impl FromStr for Decimal {
    type Err = Error;

    /// Parse `[+-]digits[.digits]`, surrounded by optional whitespace.
    ///
    /// Fractional digits beyond a scale of 28 or beyond 96 bits of mantissa are rounded,
    /// midpoints to even.
    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        let (negative, unsigned) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };

        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (unsigned, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty())
            || !all_digits(int_part)
            || !all_digits(frac_part)
        {
            return Err(Error::Format(format!("'{s}' is not a valid decimal")));
        }

        let overflow = || Error::Overflow {
            value: s.trim().to_string(),
            target: "System.Decimal".to_string(),
        };

        let mut mantissa = 0u128;
        for digit in int_part.bytes().map(|b| u128::from(b - b'0')) {
            mantissa = mantissa * 10 + digit;
            if mantissa > MAX_MANTISSA {
                return Err(overflow());
            }
        }

        let mut scale = 0u8;
        let mut dropped = frac_part.bytes().map(|b| b - b'0').peekable();
        while let Some(&digit) = dropped.peek() {
            let next = mantissa * 10 + u128::from(digit);
            if scale == MAX_SCALE || next > MAX_MANTISSA {
                break;
            }
            mantissa = next;
            scale += 1;
            dropped.next();
        }

        if let Some(first) = dropped.next() {
            let sticky = dropped.any(|digit| digit != 0);
            let round_up = first > 5 || (first == 5 && (sticky || mantissa % 2 == 1));
            if round_up {
                mantissa += 1;
                if mantissa > MAX_MANTISSA {
                    if scale == 0 {
                        return Err(overflow());
                    }
                    mantissa = (mantissa + 5) / 10;
                    scale -= 1;
                }
            }
        }

        Decimal::from_magnitude(mantissa, negative, scale)
    }
}

macro_rules! decimal_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Decimal {
                fn from(value: $ty) -> Self {
                    let value = i128::from(value);
                    let magnitude = value.unsigned_abs();
                    #[allow(clippy::cast_possible_truncation)]
                    Decimal {
                        lo: magnitude as u32,
                        mid: (magnitude >> 32) as u32,
                        hi: (magnitude >> 64) as u32,
                        flags: if value < 0 { SIGN_MASK } else { 0 },
                    }
                }
            }
        )*
    };
}

decimal_from_int!(i8, u8, i16, u16, i32, u32, i64, u64);
