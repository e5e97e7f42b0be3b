// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Widget construction properties.

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::NumberFormat;

/// Properties a layout description may set on an element.
///
/// Every field is optional; each element reads the ones it understands and
/// ignores the rest. Layout-style spellings (`min_`, `max_`, `disablepin`)
/// are accepted when deserializing.
///
/// # Examples
///
/// ```
/// use halwatch::widget::WidgetProps;
///
/// let props = WidgetProps::from_json(r#"{"halpin": "feed", "min_": -1, "max_": 1}"#).unwrap();
/// assert_eq!(props.halpin.as_deref(), Some("feed"));
/// assert_eq!(props.min, Some(-1.0));
///
/// let props = WidgetProps::new().with_halpin("spindle-on").with_disable_pin();
/// assert!(props.disable_pin);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetProps {
    /// Base pin name; generated from the element family when absent.
    pub halpin: Option<String>,
    /// Whether to create a `<halpin>.disable` companion pin.
    #[serde(alias = "disablepin")]
    pub disable_pin: bool,
    /// Number format for numeric elements.
    pub format: Option<NumberFormat>,
    /// Lower bound.
    #[serde(alias = "min_")]
    pub min: Option<f64>,
    /// Upper bound.
    #[serde(alias = "max_")]
    pub max: Option<f64>,
    /// Initial value (or initial choice index for radio buttons).
    pub initval: Option<f64>,
    /// Step size for spin boxes and scales.
    pub resolution: Option<f64>,
    /// Choice names for radio buttons.
    pub choices: Vec<String>,
    /// Image names for image selectors, indexed by pin value.
    pub images: Vec<String>,
    /// Static text for labels.
    pub text: Option<String>,
    /// Detents per revolution for dials and jog wheels.
    pub cpr: Option<u32>,
}

impl WidgetProps {
    /// Creates empty properties.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses properties from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) on malformed input.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the base pin name.
    #[must_use]
    pub fn with_halpin(mut self, halpin: impl Into<String>) -> Self {
        self.halpin = Some(halpin.into());
        self
    }

    /// Requests a `.disable` companion pin.
    #[must_use]
    pub fn with_disable_pin(mut self) -> Self {
        self.disable_pin = true;
        self
    }

    /// Sets the number format.
    #[must_use]
    pub fn with_format(mut self, format: NumberFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Sets both bounds.
    #[must_use]
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Sets the initial value.
    #[must_use]
    pub fn with_initval(mut self, initval: f64) -> Self {
        self.initval = Some(initval);
        self
    }

    /// Sets the step size.
    #[must_use]
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = Some(resolution);
        self
    }

    /// Sets the radio button choices.
    #[must_use]
    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the image names.
    #[must_use]
    pub fn with_images<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.images = images.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the label text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the detents per revolution.
    #[must_use]
    pub fn with_cpr(mut self, cpr: u32) -> Self {
        self.cpr = Some(cpr);
        self
    }
}
