// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Control elements: widgets that write pins from user interaction.
//!
//! User input (`press`, `set_value`, `select`, ...) only changes the
//! widget's own state. The pins are written on the next
//! [`update`](BoundWidget::update).

use std::f64::consts::TAU;

use crate::error::{Result, ValueError};
use crate::pin::PinHandle;
use crate::types::PinType;

use super::indicators::check_range;
use super::{BoundWidget, NumberFormat, PinAccessor, PinBinder, WidgetProps};

/// Momentary push button on a bit output.
///
/// With a `.disable` pin, presses and releases are ignored while the
/// button is disabled.
#[derive(Debug)]
pub struct Button {
    pin: PinHandle,
    disable: Option<PinHandle>,
    disabled: bool,
    pending: Option<bool>,
}

impl Button {
    pub(crate) fn build(binder: &mut PinBinder<'_>, props: &WidgetProps) -> Result<Self> {
        let base = binder.base_name(props.halpin.as_deref(), "button");
        let pin = binder.output(&base, PinType::Bit)?;
        let disable = binder.disable_pin(&base, props.disable_pin)?;
        Ok(Self {
            pin,
            disable,
            disabled: false,
            pending: None,
        })
    }

    /// Presses the button.
    pub fn press(&mut self) {
        if !self.disabled {
            self.pending = Some(true);
        }
    }

    /// Releases the button.
    pub fn release(&mut self) {
        if !self.disabled {
            self.pending = Some(false);
        }
    }

    /// Returns `true` if the button was disabled on the last update.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl BoundWidget for Button {
    fn kind(&self) -> &'static str {
        "button"
    }

    fn update(&mut self, pins: &PinAccessor<'_>) -> Result<()> {
        if let Some(disable) = &self.disable {
            self.disabled = pins.read_bool(disable)?;
        }
        if let Some(pressed) = self.pending.take()
            && !self.disabled
        {
            pins.write(&self.pin, pressed)?;
        }
        Ok(())
    }

    fn pins(&self) -> Vec<&PinHandle> {
        std::iter::once(&self.pin).chain(&self.disable).collect()
    }
}

/// Toggle on a bit output. An `initval` of 0.5 or more starts checked.
#[derive(Debug)]
pub struct CheckButton {
    pin: PinHandle,
    checked: bool,
}

impl CheckButton {
    pub(crate) fn build(binder: &mut PinBinder<'_>, props: &WidgetProps) -> Result<Self> {
        let base = binder.base_name(props.halpin.as_deref(), "checkbutton");
        let pin = binder.output(base, PinType::Bit)?;
        Ok(Self {
            pin,
            checked: props.initval.unwrap_or(0.0) >= 0.5,
        })
    }

    /// Returns `true` if checked.
    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Sets the checked state.
    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    /// Flips the checked state.
    pub fn toggle(&mut self) {
        self.checked = !self.checked;
    }
}

impl BoundWidget for CheckButton {
    fn kind(&self) -> &'static str {
        "checkbutton"
    }

    fn update(&mut self, pins: &PinAccessor<'_>) -> Result<()> {
        pins.write(&self.pin, self.checked)
    }

    fn pins(&self) -> Vec<&PinHandle> {
        vec![&self.pin]
    }
}

/// Bounded float value shared by spin boxes and scales.
#[derive(Debug, Clone, Copy)]
struct Range {
    min: f64,
    max: f64,
    step: f64,
    value: f64,
}

impl Range {
    fn from_props(props: &WidgetProps, default_max: f64) -> Result<Self> {
        let min = props.min.unwrap_or(0.0);
        let max = props.max.unwrap_or(default_max);
        check_range(min, max)?;
        let step = props.resolution.unwrap_or(1.0);
        if step <= 0.0 || !step.is_finite() {
            return Err(ValueError::InvalidProperty {
                property: "resolution",
                message: format!("must be a positive number, got {step}"),
            }
            .into());
        }
        Ok(Self {
            min,
            max,
            step,
            value: props.initval.unwrap_or(0.0).clamp(min, max),
        })
    }

    fn set(&mut self, value: f64) {
        if !value.is_nan() {
            self.value = value.clamp(self.min, self.max);
        }
    }
}

/// Float output edited with up/down steps.
#[derive(Debug)]
pub struct SpinBox {
    pin: PinHandle,
    range: Range,
    format: NumberFormat,
    text: String,
}

impl SpinBox {
    pub(crate) fn build(binder: &mut PinBinder<'_>, props: &WidgetProps) -> Result<Self> {
        let range = Range::from_props(props, 100.0)?;
        let base = binder.base_name(props.halpin.as_deref(), "spinbox");
        let pin = binder.output(base, PinType::Float)?;
        let format = props.format.unwrap_or(NumberFormat::FLOAT);
        Ok(Self {
            pin,
            range,
            format,
            text: format.format(range.value),
        })
    }

    /// Returns the current value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.range.value
    }

    /// Returns the rendered text as of the last update.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Sets the value, clamped to the range. NaN is ignored.
    pub fn set_value(&mut self, value: f64) {
        self.range.set(value);
    }

    /// Increases the value by one step.
    pub fn step_up(&mut self) {
        self.range.set(self.range.value + self.range.step);
    }

    /// Decreases the value by one step.
    pub fn step_down(&mut self) {
        self.range.set(self.range.value - self.range.step);
    }
}

impl BoundWidget for SpinBox {
    fn kind(&self) -> &'static str {
        "spinbox"
    }

    fn update(&mut self, pins: &PinAccessor<'_>) -> Result<()> {
        pins.write(&self.pin, self.range.value)?;
        self.text = self.format.format(self.range.value);
        Ok(())
    }

    fn pins(&self) -> Vec<&PinHandle> {
        vec![&self.pin]
    }
}

/// Slider driving a float output `<pin>-f` and an integer output `<pin>-i`.
#[derive(Debug)]
pub struct Scale {
    float_pin: PinHandle,
    int_pin: PinHandle,
    range: Range,
}

impl Scale {
    pub(crate) fn build(binder: &mut PinBinder<'_>, props: &WidgetProps) -> Result<Self> {
        let range = Range::from_props(props, 10.0)?;
        let base = binder.base_name(props.halpin.as_deref(), "scale");
        let int_pin = binder.output(format!("{base}-i"), PinType::S32)?;
        let float_pin = binder.output(format!("{base}-f"), PinType::Float)?;
        Ok(Self {
            float_pin,
            int_pin,
            range,
        })
    }

    /// Returns the current value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.range.value
    }

    /// Moves the slider, clamped to the range. NaN is ignored.
    pub fn set_value(&mut self, value: f64) {
        self.range.set(value);
    }

    /// Moves the slider up by one resolution step.
    pub fn step_up(&mut self) {
        self.range.set(self.range.value + self.range.step);
    }

    /// Moves the slider down by one resolution step.
    pub fn step_down(&mut self) {
        self.range.set(self.range.value - self.range.step);
    }
}

impl BoundWidget for Scale {
    fn kind(&self) -> &'static str {
        "scale"
    }

    #[allow(clippy::cast_possible_truncation)]
    fn update(&mut self, pins: &PinAccessor<'_>) -> Result<()> {
        let value = self.range.value;
        pins.write(&self.float_pin, value)?;
        // Truncates toward zero and saturates at the i32 bounds.
        pins.write(&self.int_pin, value.trunc() as i32)?;
        Ok(())
    }

    fn pins(&self) -> Vec<&PinHandle> {
        vec![&self.int_pin, &self.float_pin]
    }
}

/// Detent count used when `cpr` is not set.
const DEFAULT_CPR: u32 = 40;

fn detent_angle(props: &WidgetProps) -> Result<f64> {
    match props.cpr.unwrap_or(DEFAULT_CPR) {
        0 => Err(ValueError::InvalidProperty {
            property: "cpr",
            message: "must be at least 1".to_string(),
        }
        .into()),
        cpr => Ok(TAU / f64::from(cpr)),
    }
}

/// Rotary knob on a float output, `<pin>` or `dial.<n>.out`.
///
/// Each detent moves the value to the next multiple of the current
/// resolution, clamped to `[min, max]`. The resolution can be scaled by
/// powers of ten and restored, as can the initial value.
#[derive(Debug)]
pub struct Dial {
    pin: PinHandle,
    min: f64,
    max: f64,
    initial: f64,
    resolution: f64,
    initial_resolution: f64,
    detent: f64,
    angle: f64,
    value: f64,
}

impl Dial {
    pub(crate) fn build(binder: &mut PinBinder<'_>, props: &WidgetProps) -> Result<Self> {
        let min = props.min.unwrap_or(-1e20);
        let max = props.max.unwrap_or(1e20);
        check_range(min, max)?;
        let resolution = props.resolution.unwrap_or(0.1);
        if resolution <= 0.0 || !resolution.is_finite() {
            return Err(ValueError::InvalidProperty {
                property: "resolution",
                message: format!("must be a positive number, got {resolution}"),
            }
            .into());
        }
        let detent = detent_angle(props)?;
        let name = match props.halpin.as_deref() {
            Some(halpin) => halpin.to_string(),
            None => format!("{}.out", binder.base_name(None, "dial")),
        };
        let pin = binder.output(name, PinType::Float)?;
        let initial = props.initval.unwrap_or(0.0);
        Ok(Self {
            pin,
            min,
            max,
            initial,
            resolution,
            initial_resolution: resolution,
            detent,
            angle: 0.0,
            value: snap(initial, resolution),
        })
    }

    /// Returns the current value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns the current resolution.
    #[must_use]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Returns the knob angle in radians; one detent per step taken.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Turns the knob one detent up.
    pub fn step_up(&mut self) {
        let counts = (self.value / self.resolution + self.resolution * 1e-6).floor() + 1.0;
        self.turn((counts * self.resolution).min(self.max), self.detent);
    }

    /// Turns the knob one detent down.
    pub fn step_down(&mut self) {
        let counts = (self.value / self.resolution - self.resolution * 1e-6).ceil() - 1.0;
        self.turn((counts * self.resolution).max(self.min), -self.detent);
    }

    fn turn(&mut self, value: f64, detent: f64) {
        if value.to_bits() != self.value.to_bits() {
            self.angle += detent;
        }
        self.value = value;
    }

    /// Divides the resolution by ten.
    pub fn finer(&mut self) {
        self.resolution /= 10.0;
    }

    /// Multiplies the resolution by ten.
    pub fn coarser(&mut self) {
        self.resolution *= 10.0;
    }

    /// Restores the initial resolution.
    pub fn reset_resolution(&mut self) {
        self.resolution = self.initial_resolution;
    }

    /// Restores the initial value, snapped to the current resolution.
    pub fn reset_value(&mut self) {
        self.value = snap(self.initial, self.resolution);
    }
}

fn snap(value: f64, resolution: f64) -> f64 {
    (value / resolution).round() * resolution
}

impl BoundWidget for Dial {
    fn kind(&self) -> &'static str {
        "dial"
    }

    fn update(&mut self, pins: &PinAccessor<'_>) -> Result<()> {
        pins.write(&self.pin, self.value)
    }

    fn pins(&self) -> Vec<&PinHandle> {
        vec![&self.pin]
    }
}

/// Jog wheel counting detents on a float output, `<pin>` or
/// `jogwheel.<n>.count`.
///
/// The count is unbounded in both directions.
#[derive(Debug)]
pub struct JogWheel {
    pin: PinHandle,
    detent: f64,
    angle: f64,
    count: i64,
}

impl JogWheel {
    pub(crate) fn build(binder: &mut PinBinder<'_>, props: &WidgetProps) -> Result<Self> {
        let detent = detent_angle(props)?;
        let name = match props.halpin.as_deref() {
            Some(halpin) => halpin.to_string(),
            None => format!("{}.count", binder.base_name(None, "jogwheel")),
        };
        let pin = binder.output(name, PinType::Float)?;
        Ok(Self {
            pin,
            detent,
            angle: 0.0,
            count: 0,
        })
    }

    /// Returns the detent count.
    #[must_use]
    pub fn count(&self) -> i64 {
        self.count
    }

    /// Returns the wheel angle in radians.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Turns the wheel one detent up.
    pub fn up(&mut self) {
        self.count += 1;
        self.angle += self.detent;
    }

    /// Turns the wheel one detent down.
    pub fn down(&mut self) {
        self.count -= 1;
        self.angle -= self.detent;
    }
}

impl BoundWidget for JogWheel {
    fn kind(&self) -> &'static str {
        "jogwheel"
    }

    #[allow(clippy::cast_precision_loss)]
    fn update(&mut self, pins: &PinAccessor<'_>) -> Result<()> {
        pins.write(&self.pin, self.count as f64)
    }

    fn pins(&self) -> Vec<&PinHandle> {
        vec![&self.pin]
    }
}

/// One bit output per choice, `<pin>.<choice>`; exactly one is high.
#[derive(Debug)]
pub struct RadioButton {
    choices: Vec<String>,
    pins: Vec<PinHandle>,
    selected: usize,
}

impl RadioButton {
    pub(crate) fn build(binder: &mut PinBinder<'_>, props: &WidgetProps) -> Result<Self> {
        if props.choices.is_empty() {
            return Err(ValueError::InvalidProperty {
                property: "choices",
                message: "at least one choice is required".to_string(),
            }
            .into());
        }
        let base = binder.base_name(props.halpin.as_deref(), "radiobutton");
        let pins = props
            .choices
            .iter()
            .map(|choice| binder.output(format!("{base}.{choice}"), PinType::Bit))
            .collect::<Result<Vec<_>>>()?;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let initial = props
            .initval
            .filter(|v| *v >= 0.0)
            .map_or(0, |v| v as usize);

        Ok(Self {
            choices: props.choices.clone(),
            pins,
            selected: if initial < props.choices.len() { initial } else { 0 },
        })
    }

    /// Returns the selected index.
    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Returns the selected choice name.
    #[must_use]
    pub fn selected_choice(&self) -> &str {
        &self.choices[self.selected]
    }

    /// Selects a choice by index.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidProperty`] if `index` is out of range.
    pub fn select(&mut self, index: usize) -> Result<()> {
        if index >= self.choices.len() {
            return Err(ValueError::InvalidProperty {
                property: "choices",
                message: format!("index {index} out of range for {} choices", self.choices.len()),
            }
            .into());
        }
        self.selected = index;
        Ok(())
    }
}

impl BoundWidget for RadioButton {
    fn kind(&self) -> &'static str {
        "radiobutton"
    }

    fn update(&mut self, pins: &PinAccessor<'_>) -> Result<()> {
        for (i, pin) in self.pins.iter().enumerate() {
            pins.write(pin, i == self.selected)?;
        }
        Ok(())
    }

    fn pins(&self) -> Vec<&PinHandle> {
        self.pins.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::{MemoryPinStore, PinStore};
    use crate::types::PinValue;

    fn tick(store: &MemoryPinStore, widget: &mut dyn BoundWidget) {
        widget.update(&PinAccessor::new(store)).unwrap();
    }

    #[test]
    fn button_writes_on_next_update() {
        let store = MemoryPinStore::new();
        let mut binder = PinBinder::new(&store);
        let mut button = Button::build(&mut binder, &WidgetProps::new().with_halpin("cycle-start")).unwrap();

        button.press();
        assert_eq!(store.read("cycle-start").unwrap(), PinValue::Bit(false));
        tick(&store, &mut button);
        assert_eq!(store.read("cycle-start").unwrap(), PinValue::Bit(true));
        button.release();
        tick(&store, &mut button);
        assert_eq!(store.read("cycle-start").unwrap(), PinValue::Bit(false));
    }

    #[test]
    fn disabled_button_ignores_presses() {
        let store = MemoryPinStore::new();
        let mut binder = PinBinder::new(&store);
        let mut button = Button::build(&mut binder, &WidgetProps::new().with_disable_pin()).unwrap();

        store.drive("button.0.disable", true).unwrap();
        tick(&store, &mut button);
        assert!(button.is_disabled());

        button.press();
        tick(&store, &mut button);
        assert_eq!(store.read("button.0").unwrap(), PinValue::Bit(false));
    }

    #[test]
    fn checkbutton_initval_threshold() {
        let store = MemoryPinStore::new();
        let mut binder = PinBinder::new(&store);
        let mut on = CheckButton::build(&mut binder, &WidgetProps::new().with_initval(0.5)).unwrap();
        let off = CheckButton::build(&mut binder, &WidgetProps::new().with_initval(0.49)).unwrap();
        assert!(on.is_checked());
        assert!(!off.is_checked());

        tick(&store, &mut on);
        assert_eq!(store.read("checkbutton.0").unwrap(), PinValue::Bit(true));
        on.toggle();
        tick(&store, &mut on);
        assert_eq!(store.read("checkbutton.0").unwrap(), PinValue::Bit(false));
    }

    #[test]
    fn spinbox_clamps_and_steps() {
        let store = MemoryPinStore::new();
        let mut binder = PinBinder::new(&store);
        let props = WidgetProps::new()
            .with_range(0.0, 1.0)
            .with_resolution(0.25)
            .with_initval(5.0);
        let mut spin = SpinBox::build(&mut binder, &props).unwrap();
        assert!((spin.value() - 1.0).abs() < f64::EPSILON);

        spin.step_up();
        assert!((spin.value() - 1.0).abs() < f64::EPSILON);
        spin.step_down();
        tick(&store, &mut spin);
        assert_eq!(store.read("spinbox.0").unwrap(), PinValue::Float(0.75));
        assert_eq!(spin.text(), "0.8");

        spin.set_value(f64::NAN);
        assert!((spin.value() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn spinbox_rejects_bad_resolution() {
        let store = MemoryPinStore::new();
        let mut binder = PinBinder::new(&store);
        assert!(SpinBox::build(&mut binder, &WidgetProps::new().with_resolution(0.0)).is_err());
    }

    #[test]
    fn scale_writes_float_and_int() {
        let store = MemoryPinStore::new();
        let mut binder = PinBinder::new(&store);
        let props = WidgetProps::new().with_halpin("feed").with_range(-33.0, 26.0);
        let mut scale = Scale::build(&mut binder, &props).unwrap();

        scale.set_value(-2.7);
        tick(&store, &mut scale);
        assert_eq!(store.read("feed-f").unwrap(), PinValue::Float(-2.7));
        assert_eq!(store.read("feed-i").unwrap(), PinValue::S32(-2));
    }

    #[test]
    fn dial_steps_snap_to_resolution() {
        let store = MemoryPinStore::new();
        let mut binder = PinBinder::new(&store);
        let props = WidgetProps::new()
            .with_range(-1.0, 0.5)
            .with_resolution(0.25)
            .with_initval(0.3)
            .with_cpr(4);
        let mut dial = Dial::build(&mut binder, &props).unwrap();
        assert!((dial.value() - 0.25).abs() < 1e-9);

        dial.step_up();
        assert!((dial.value() - 0.5).abs() < 1e-9);
        let angle = dial.angle();
        dial.step_up();
        assert!((dial.value() - 0.5).abs() < 1e-9);
        assert!((dial.angle() - angle).abs() < 1e-9);

        tick(&store, &mut dial);
        assert_eq!(store.read("dial.0.out").unwrap(), PinValue::Float(0.5));

        for _ in 0..10 {
            dial.step_down();
        }
        assert!((dial.value() + 1.0).abs() < 1e-9);
    }

    #[test]
    fn dial_resolution_scaling() {
        let store = MemoryPinStore::new();
        let mut binder = PinBinder::new(&store);
        let props = WidgetProps::new().with_halpin("flow").with_resolution(1.0).with_initval(3.0);
        let mut dial = Dial::build(&mut binder, &props).unwrap();

        dial.finer();
        dial.step_up();
        assert!((dial.value() - 3.1).abs() < 1e-9);
        dial.coarser();
        dial.coarser();
        dial.step_down();
        assert!((dial.value() - 0.0).abs() < 1e-9);

        dial.reset_resolution();
        assert!((dial.resolution() - 1.0).abs() < f64::EPSILON);
        dial.reset_value();
        tick(&store, &mut dial);
        assert_eq!(store.read("flow").unwrap(), PinValue::Float(3.0));
    }

    #[test]
    fn dial_rejects_zero_cpr() {
        let store = MemoryPinStore::new();
        let mut binder = PinBinder::new(&store);
        assert!(Dial::build(&mut binder, &WidgetProps::new().with_cpr(0)).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn jogwheel_counts_detents() {
        let store = MemoryPinStore::new();
        let mut binder = PinBinder::new(&store);
        let mut wheel = JogWheel::build(&mut binder, &WidgetProps::new()).unwrap();

        tick(&store, &mut wheel);
        assert_eq!(store.read("jogwheel.0.count").unwrap(), PinValue::Float(0.0));

        wheel.up();
        wheel.up();
        wheel.up();
        wheel.down();
        assert_eq!(wheel.count(), 2);
        assert_eq!(store.read("jogwheel.0.count").unwrap(), PinValue::Float(0.0));
        tick(&store, &mut wheel);
        assert_eq!(store.read("jogwheel.0.count").unwrap(), PinValue::Float(2.0));

        for _ in 0..5 {
            wheel.down();
        }
        tick(&store, &mut wheel);
        assert_eq!(store.read("jogwheel.0.count").unwrap(), PinValue::Float(-3.0));
    }

    #[test]
    fn radiobutton_sets_exactly_one() {
        let store = MemoryPinStore::new();
        let mut binder = PinBinder::new(&store);
        let props = WidgetProps::new()
            .with_halpin("jog")
            .with_choices(["x", "y", "z"])
            .with_initval(1.0);
        let mut radio = RadioButton::build(&mut binder, &props).unwrap();
        assert_eq!(radio.selected_choice(), "y");

        tick(&store, &mut radio);
        let bits: Vec<_> = ["jog.x", "jog.y", "jog.z"]
            .iter()
            .map(|p| store.read(p).unwrap())
            .collect();
        assert_eq!(bits, vec![PinValue::Bit(false), PinValue::Bit(true), PinValue::Bit(false)]);

        radio.select(2).unwrap();
        assert!(radio.select(3).is_err());
        tick(&store, &mut radio);
        assert_eq!(store.read("jog.z").unwrap(), PinValue::Bit(true));
        assert_eq!(store.read("jog.y").unwrap(), PinValue::Bit(false));
    }

    #[test]
    fn radiobutton_needs_choices() {
        let store = MemoryPinStore::new();
        let mut binder = PinBinder::new(&store);
        assert!(RadioButton::build(&mut binder, &WidgetProps::new()).is_err());
    }
}
