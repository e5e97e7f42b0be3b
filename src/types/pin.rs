// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HAL pin scalar types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction of a pin, seen from the component that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinDirection {
    /// Driven from outside; the component only reads it.
    In,
    /// Driven by the component.
    Out,
}

impl PinDirection {
    /// Returns `true` if the owning component may write the pin.
    #[must_use]
    pub const fn is_writable(self) -> bool {
        matches!(self, Self::Out)
    }
}

impl fmt::Display for PinDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::In => "in",
            Self::Out => "out",
        })
    }
}

/// Scalar type of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinType {
    /// Boolean.
    Bit,
    /// Signed 32-bit integer.
    S32,
    /// Unsigned 32-bit integer.
    U32,
    /// Double-precision float.
    Float,
}

impl PinType {
    /// Returns the zero value of this type.
    #[must_use]
    pub const fn default_value(self) -> PinValue {
        match self {
            Self::Bit => PinValue::Bit(false),
            Self::S32 => PinValue::S32(0),
            Self::U32 => PinValue::U32(0),
            Self::Float => PinValue::Float(0.0),
        }
    }
}

impl fmt::Display for PinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bit => "bit",
            Self::S32 => "s32",
            Self::U32 => "u32",
            Self::Float => "float",
        })
    }
}

/// A typed pin value.
///
/// Equality is plain `PartialEq`, so a `Float(NaN)` never compares equal to
/// itself and is reported as a change on every tick.
///
/// # Examples
///
/// ```
/// use halwatch::types::{PinType, PinValue};
///
/// let v = PinValue::from(true);
/// assert_eq!(v.pin_type(), PinType::Bit);
/// assert_eq!(v.as_f64(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PinValue {
    /// A bit value.
    Bit(bool),
    /// A signed 32-bit value.
    S32(i32),
    /// An unsigned 32-bit value.
    U32(u32),
    /// A floating-point value.
    Float(f64),
}

impl PinValue {
    /// Returns the scalar type of this value.
    #[must_use]
    pub const fn pin_type(&self) -> PinType {
        match self {
            Self::Bit(_) => PinType::Bit,
            Self::S32(_) => PinType::S32,
            Self::U32(_) => PinType::U32,
            Self::Float(_) => PinType::Float,
        }
    }

    /// Returns the value as a bit; numeric values are true when non-zero.
    #[must_use]
    pub fn as_bool(&self) -> bool {
        match *self {
            Self::Bit(b) => b,
            Self::S32(v) => v != 0,
            Self::U32(v) => v != 0,
            Self::Float(v) => v != 0.0,
        }
    }

    /// Returns the value widened to `f64`.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Bit(b) => f64::from(u8::from(b)),
            Self::S32(v) => f64::from(v),
            Self::U32(v) => f64::from(v),
            Self::Float(v) => v,
        }
    }

    /// Returns the value as an index, if it is a non-negative integer or bit.
    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        match *self {
            Self::Bit(b) => Some(usize::from(b)),
            Self::S32(v) => usize::try_from(v).ok(),
            Self::U32(v) => usize::try_from(v).ok(),
            Self::Float(_) => None,
        }
    }
}

impl fmt::Display for PinValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bit(b) => write!(f, "{}", u8::from(*b)),
            Self::S32(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for PinValue {
    fn from(value: bool) -> Self {
        Self::Bit(value)
    }
}

impl From<i32> for PinValue {
    fn from(value: i32) -> Self {
        Self::S32(value)
    }
}

impl From<u32> for PinValue {
    fn from(value: u32) -> Self {
        Self::U32(value)
    }
}

impl From<f64> for PinValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}
