// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Printf-style number formats used by numeric indicators.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValueError;

/// Conversion of a [`NumberFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conversion {
    /// Fixed-point (`f`).
    Fixed,
    /// Integer (`d`); fractional parts are truncated.
    Integer,
}

/// A `[width][.precision](f|d)` format such as `2.1f` or `d`.
///
/// The width is a minimum; shorter output is right-aligned with spaces.
/// A fixed-point format without a precision prints six decimals. Width and
/// precision are each limited to [`MAX_FIELD`](Self::MAX_FIELD).
///
/// # Examples
///
/// ```
/// use halwatch::widget::NumberFormat;
///
/// let format: NumberFormat = "6.2f".parse().unwrap();
/// assert_eq!(format.format(3.14159), "  3.14");
///
/// let format: NumberFormat = "d".parse().unwrap();
/// assert_eq!(format.format(-7.9), "-7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NumberFormat {
    width: usize,
    precision: Option<usize>,
    conversion: Conversion,
}

impl NumberFormat {
    /// Default precision of `f` without an explicit precision.
    pub const DEFAULT_PRECISION: usize = 6;

    /// Largest accepted width or precision.
    pub const MAX_FIELD: usize = 64;

    /// The float indicator default, `2.1f`.
    pub const FLOAT: Self = Self {
        width: 2,
        precision: Some(1),
        conversion: Conversion::Fixed,
    };

    /// The integer indicator default, `d`.
    pub const INTEGER: Self = Self {
        width: 0,
        precision: None,
        conversion: Conversion::Integer,
    };

    /// Returns the minimum field width.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the explicit precision, if any.
    #[must_use]
    pub const fn precision(&self) -> Option<usize> {
        self.precision
    }

    /// Returns the conversion.
    #[must_use]
    pub const fn conversion(&self) -> Conversion {
        self.conversion
    }

    /// Formats `value`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn format(&self, value: f64) -> String {
        let width = self.width;
        match self.conversion {
            Conversion::Fixed => {
                let precision = self.precision.unwrap_or(Self::DEFAULT_PRECISION);
                format!("{value:>width$.precision$}")
            }
            Conversion::Integer => {
                // `as` saturates and maps NaN to 0
                let value = value.trunc() as i64;
                format!("{value:>width$}")
            }
        }
    }
}

impl FromStr for NumberFormat {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValueError::InvalidFormat(s.to_string());
        let directive = s.trim().trim_start_matches('%');

        let conversion = match directive.chars().last() {
            Some('f') => Conversion::Fixed,
            Some('d') => Conversion::Integer,
            _ => return Err(invalid()),
        };
        let body = &directive[..directive.len() - 1];

        let (width, precision) = match body.split_once('.') {
            Some((w, p)) => (w, Some(p)),
            None => (body, None),
        };
        let width = if width.is_empty() {
            0
        } else {
            width.parse().map_err(|_| invalid())?
        };
        let precision = match precision {
            Some("") => Some(0),
            Some(p) => Some(p.parse().map_err(|_| invalid())?),
            None => None,
        };
        if conversion == Conversion::Integer && precision.is_some() {
            return Err(invalid());
        }
        if width > Self::MAX_FIELD || precision.is_some_and(|p| p > Self::MAX_FIELD) {
            return Err(invalid());
        }

        Ok(Self {
            width,
            precision,
            conversion,
        })
    }
}

impl fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.width > 0 {
            write!(f, "{}", self.width)?;
        }
        if let Some(p) = self.precision {
            write!(f, ".{p}")?;
        }
        f.write_str(match self.conversion {
            Conversion::Fixed => "f",
            Conversion::Integer => "d",
        })
    }
}

impl Serialize for NumberFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NumberFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_variants() {
        assert_eq!("2.1f".parse::<NumberFormat>().unwrap(), NumberFormat::FLOAT);
        assert_eq!("d".parse::<NumberFormat>().unwrap(), NumberFormat::INTEGER);
        assert_eq!("%5d".parse::<NumberFormat>().unwrap().width(), 5);
        assert_eq!(".3f".parse::<NumberFormat>().unwrap().precision(), Some(3));
        assert_eq!("f".parse::<NumberFormat>().unwrap().precision(), None);
    }

    #[test]
    fn parse_errors() {
        for bad in ["", "x", "2.1", "a.1f", "2.bf", "3.2d", "1.2.3f"] {
            assert!(bad.parse::<NumberFormat>().is_err(), "{bad:?} should fail");
        }
    }

    #[test]
    fn oversized_fields_are_rejected() {
        assert_eq!("64d".parse::<NumberFormat>().unwrap().width(), NumberFormat::MAX_FIELD);
        for bad in ["65d", "999999999999f", "2.65f", "99999999999999999999999f"] {
            assert_eq!(
                bad.parse::<NumberFormat>(),
                Err(ValueError::InvalidFormat(bad.to_string()))
            );
        }
        assert!(crate::widget::WidgetProps::from_json(r#"{"format": "999999999999f"}"#).is_err());
    }

    #[test]
    fn formatting() {
        assert_eq!(NumberFormat::FLOAT.format(0.0), "0.0");
        assert_eq!(NumberFormat::FLOAT.format(12.345), "12.3");
        assert_eq!("f".parse::<NumberFormat>().unwrap().format(1.5), "1.500000");
        assert_eq!("4d".parse::<NumberFormat>().unwrap().format(42.0), "  42");
        assert_eq!(NumberFormat::INTEGER.format(f64::NAN), "0");
    }

    #[test]
    fn display_roundtrip() {
        for s in ["2.1f", "d", "5d", ".3f", "f"] {
            let format: NumberFormat = s.parse().unwrap();
            assert_eq!(format.to_string(), s);
        }
    }

    #[test]
    fn serde_as_string() {
        let format: NumberFormat = serde_json::from_str("\"3.2f\"").unwrap();
        assert_eq!(serde_json::to_string(&format).unwrap(), "\"3.2f\"");
        assert!(serde_json::from_str::<NumberFormat>("\"zz\"").is_err());
    }
}
