// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis mask type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Bitmask of joint indices that are real, enabled machine axes.
///
/// Bit `i` is set iff joint `i` is an active axis. Indices at or above 32
/// are never active.
///
/// # Examples
///
/// ```
/// use halwatch::types::AxisMask;
///
/// let mask = AxisMask::from_axes(&[0, 1, 2]);
/// assert_eq!(mask.bits(), 0b0111);
/// assert!(mask.contains(2));
/// assert!(!mask.contains(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AxisMask(u32);

impl AxisMask {
    /// Mask with no active axes.
    pub const NONE: Self = Self(0);

    /// Creates a mask from raw bits.
    #[must_use]
    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    /// Creates a mask with the given joint indices set.
    ///
    /// Indices of 32 or more are ignored.
    #[must_use]
    pub fn from_axes(axes: &[usize]) -> Self {
        let bits = axes
            .iter()
            .filter(|&&i| i < 32)
            .fold(0u32, |acc, &i| acc | (1 << i));
        Self(bits)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if joint `index` is an active axis.
    #[must_use]
    pub const fn contains(self, index: usize) -> bool {
        index < 32 && self.0 & (1 << index) != 0
    }

    /// Returns the total number of active axes.
    #[must_use]
    pub const fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns the number of active axes among joints `0..joints`.
    #[must_use]
    pub fn count_within(self, joints: usize) -> usize {
        (0..joints).filter(|&i| self.contains(i)).count()
    }
}

impl From<u32> for AxisMask {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl fmt::Display for AxisMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#b}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_and_count() {
        let mask = AxisMask::new(0b1010_0111);
        assert!(mask.contains(0));
        assert!(!mask.contains(3));
        assert!(mask.contains(7));
        assert_eq!(mask.count(), 5);
        assert_eq!(mask.count_within(4), 3);
    }

    #[test]
    fn high_indices_are_inactive() {
        let mask = AxisMask::new(u32::MAX);
        assert!(mask.contains(31));
        assert!(!mask.contains(32));
        assert_eq!(AxisMask::from_axes(&[40]), AxisMask::NONE);
    }

    #[test]
    fn display_is_binary() {
        assert_eq!(AxisMask::new(0b111).to_string(), "0b111");
    }
}
