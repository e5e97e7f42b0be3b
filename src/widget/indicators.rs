// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Indicator elements: widgets that only read pins.

use std::f64::consts::FRAC_PI_2;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::{Result, ValueError};
use crate::pin::PinHandle;
use crate::types::{PinType, PinValue};

use super::{BoundWidget, NumberFormat, PinAccessor, PinBinder, WidgetProps};

/// What an LED currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedState {
    /// Input pin is low.
    Off,
    /// Input pin is high.
    On,
    /// The `.disable` pin is high; overrides on/off.
    Disabled,
}

/// Round (`led`) or rectangular (`rectled`) LED on a bit input.
#[derive(Debug)]
pub struct Led {
    kind: &'static str,
    pin: PinHandle,
    disable: Option<PinHandle>,
    state: LedState,
}

impl Led {
    pub(crate) fn build(kind: &'static str, binder: &mut PinBinder<'_>, props: &WidgetProps) -> Result<Self> {
        let base = binder.base_name(props.halpin.as_deref(), "led");
        let pin = binder.input(&base, PinType::Bit)?;
        let disable = binder.disable_pin(&base, props.disable_pin)?;
        Ok(Self {
            kind,
            pin,
            disable,
            state: LedState::Off,
        })
    }

    /// Returns the displayed state.
    #[must_use]
    pub fn state(&self) -> LedState {
        self.state
    }

    /// Returns the input pin.
    #[must_use]
    pub fn pin(&self) -> &PinHandle {
        &self.pin
    }
}

impl BoundWidget for Led {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn update(&mut self, pins: &PinAccessor<'_>) -> Result<()> {
        self.state = if pins.read_bool(&self.pin)? {
            LedState::On
        } else {
            LedState::Off
        };
        if let Some(disable) = &self.disable
            && pins.read_bool(disable)?
        {
            self.state = LedState::Disabled;
        }
        Ok(())
    }

    fn pins(&self) -> Vec<&PinHandle> {
        std::iter::once(&self.pin).chain(&self.disable).collect()
    }
}

/// Numeric text display (`number`, `s32`, `u32`).
///
/// The text is only re-rendered when the value changes.
#[derive(Debug)]
pub struct Number {
    kind: &'static str,
    pin: PinHandle,
    format: NumberFormat,
    value: Option<PinValue>,
    text: String,
}

impl Number {
    pub(crate) fn build(
        kind: &'static str,
        pin_type: PinType,
        binder: &mut PinBinder<'_>,
        props: &WidgetProps,
    ) -> Result<Self> {
        let base = binder.base_name(props.halpin.as_deref(), "number");
        let pin = binder.input(base, pin_type)?;
        let format = props.format.unwrap_or(if pin_type == PinType::Float {
            NumberFormat::FLOAT
        } else {
            NumberFormat::INTEGER
        });
        Ok(Self {
            kind,
            pin,
            format,
            value: None,
            text: format.format(0.0),
        })
    }

    /// Returns the rendered text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the last value read.
    #[must_use]
    pub fn value(&self) -> Option<PinValue> {
        self.value
    }
}

impl BoundWidget for Number {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn update(&mut self, pins: &PinAccessor<'_>) -> Result<()> {
        let value = pins.read(&self.pin)?;
        if self.value != Some(value) {
            self.text = self.format.format(value.as_f64());
            self.value = Some(value);
        }
        Ok(())
    }

    fn pins(&self) -> Vec<&PinHandle> {
        vec![&self.pin]
    }
}

/// Horizontal bar showing a float within `[min, max]`.
#[derive(Debug)]
pub struct Bar {
    pin: PinHandle,
    min: f64,
    max: f64,
    value: f64,
    text: String,
}

impl Bar {
    pub(crate) fn build(binder: &mut PinBinder<'_>, props: &WidgetProps) -> Result<Self> {
        let min = props.min.unwrap_or(0.0);
        let max = props.max.unwrap_or(100.0);
        check_range(min, max)?;
        let base = binder.base_name(props.halpin.as_deref(), "bar");
        let pin = binder.input(base, PinType::Float)?;
        Ok(Self {
            pin,
            min,
            max,
            value: 0.0,
            text: format!("{:3.1}", 0.0),
        })
    }

    /// Returns the filled fraction of the bar, in `[0, 1]`.
    #[must_use]
    pub fn fill(&self) -> f64 {
        ((self.value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    /// Returns the value text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl BoundWidget for Bar {
    fn kind(&self) -> &'static str {
        "bar"
    }

    fn update(&mut self, pins: &PinAccessor<'_>) -> Result<()> {
        let value = pins.read_f64(&self.pin)?;
        if value.to_bits() != self.value.to_bits() {
            self.value = value;
            self.text = format!("{value:3.1}");
        }
        Ok(())
    }

    fn pins(&self) -> Vec<&PinHandle> {
        vec![&self.pin]
    }
}

/// Half of the sweep of a meter needle, in radians.
const METER_HALF_SWEEP: f64 = 2.5;

/// Analog meter showing a float input as a needle angle.
///
/// The needle sweeps 5 radians centred on straight up. Values outside
/// `[min, max]` pin the needle to the end stop.
#[derive(Debug)]
pub struct Meter {
    pin: PinHandle,
    min: f64,
    max: f64,
    value: f64,
}

impl Meter {
    pub(crate) fn build(binder: &mut PinBinder<'_>, props: &WidgetProps) -> Result<Self> {
        let min = props.min.unwrap_or(0.0);
        let max = props.max.unwrap_or(100.0);
        check_range(min, max)?;
        let name = match props.halpin.as_deref() {
            Some(halpin) => halpin.to_string(),
            None => format!("{}.value", binder.base_name(None, "meter")),
        };
        let pin = binder.input(name, PinType::Float)?;
        Ok(Self {
            pin,
            min,
            max,
            value: 0.0,
        })
    }

    /// Returns the last value read.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns the needle angle in radians, measured clockwise from the
    /// positive x axis of a screen.
    #[must_use]
    pub fn angle(&self) -> f64 {
        let low = -FRAC_PI_2 - METER_HALF_SWEEP;
        let high = -FRAC_PI_2 + METER_HALF_SWEEP;
        let fraction = (self.value - self.min) / (self.max - self.min);
        (low + fraction * (high - low)).clamp(low, high)
    }
}

impl BoundWidget for Meter {
    fn kind(&self) -> &'static str {
        "meter"
    }

    fn update(&mut self, pins: &PinAccessor<'_>) -> Result<()> {
        self.value = pins.read_f64(&self.pin)?;
        Ok(())
    }

    fn pins(&self) -> Vec<&PinHandle> {
        vec![&self.pin]
    }
}

/// Static text, optionally greyed out by a `.disable` pin.
#[derive(Debug)]
pub struct Label {
    text: String,
    disable: Option<PinHandle>,
    disabled: bool,
}

impl Label {
    pub(crate) fn build(binder: &mut PinBinder<'_>, props: &WidgetProps) -> Result<Self> {
        let disable = if props.disable_pin {
            let base = binder.base_name(props.halpin.as_deref(), "label");
            binder.disable_pin(&base, true)?
        } else {
            None
        };
        Ok(Self {
            text: props.text.clone().unwrap_or_default(),
            disable,
            disabled: false,
        })
    }

    /// Returns the label text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` if the label is shown disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl BoundWidget for Label {
    fn kind(&self) -> &'static str {
        "label"
    }

    fn update(&mut self, pins: &PinAccessor<'_>) -> Result<()> {
        if let Some(disable) = &self.disable {
            self.disabled = pins.read_bool(disable)?;
        }
        Ok(())
    }

    fn pins(&self) -> Vec<&PinHandle> {
        self.disable.iter().collect()
    }
}

/// Elapsed-time display driven by `.run` and `.reset` bit inputs.
///
/// Time accumulates while `run` is high and holds while it is low. A rising
/// edge on `reset` sets the accumulated time to zero.
#[derive(Debug)]
pub struct Timer {
    reset: PinHandle,
    run: PinHandle,
    last_reset: bool,
    last_run: bool,
    started: Instant,
    base: Duration,
    text: String,
}

impl Timer {
    pub(crate) fn build(binder: &mut PinBinder<'_>, props: &WidgetProps) -> Result<Self> {
        let base = binder.base_name(props.halpin.as_deref(), "timer");
        let reset = binder.input(format!("{base}.reset"), PinType::Bit)?;
        let run = binder.input(format!("{base}.run"), PinType::Bit)?;
        Ok(Self {
            reset,
            run,
            last_reset: false,
            last_run: false,
            started: Instant::now(),
            base: Duration::ZERO,
            text: format_hms(Duration::ZERO),
        })
    }

    /// Returns the accumulated run time as of the last update.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        if self.last_run {
            self.base + self.started.elapsed()
        } else {
            self.base
        }
    }

    /// Returns the `HH:MM:SS` text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl BoundWidget for Timer {
    fn kind(&self) -> &'static str {
        "timer"
    }

    fn update(&mut self, pins: &PinAccessor<'_>) -> Result<()> {
        let reset = pins.read_bool(&self.reset)?;
        let run = pins.read_bool(&self.run)?;
        let now = Instant::now();

        if reset != self.last_reset {
            self.last_reset = reset;
            if reset {
                self.base = Duration::ZERO;
                self.started = now;
            }
        }
        if run != self.last_run {
            self.last_run = run;
            if run {
                self.started = now;
            } else {
                self.base += now.duration_since(self.started);
            }
        }

        let total = if run {
            self.base + now.duration_since(self.started)
        } else {
            self.base
        };
        self.text = format_hms(total);
        Ok(())
    }

    fn pins(&self) -> Vec<&PinHandle> {
        vec![&self.reset, &self.run]
    }
}

fn format_hms(total: Duration) -> String {
    let secs = total.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, secs % 3600 / 60, secs % 60)
}

/// Shows one of several named images, selected by a bit (`image_bit`) or
/// u32 (`image_u32`) input.
///
/// An index with no image keeps the previous image.
#[derive(Debug)]
pub struct ImageSelector {
    kind: &'static str,
    pin: PinHandle,
    images: Vec<String>,
    last: Option<PinValue>,
    current: Option<usize>,
}

impl ImageSelector {
    pub(crate) fn build(
        kind: &'static str,
        pin_type: PinType,
        binder: &mut PinBinder<'_>,
        props: &WidgetProps,
    ) -> Result<Self> {
        let base = binder.base_name(props.halpin.as_deref(), "number");
        let pin = binder.input(base, pin_type)?;
        Ok(Self {
            kind,
            pin,
            images: props.images.clone(),
            last: None,
            current: None,
        })
    }

    /// Returns the name of the image shown, if any.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.current
            .and_then(|i| self.images.get(i))
            .map(String::as_str)
    }
}

impl BoundWidget for ImageSelector {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn update(&mut self, pins: &PinAccessor<'_>) -> Result<()> {
        let value = pins.read(&self.pin)?;
        if self.last != Some(value) {
            match value.as_index().filter(|&i| i < self.images.len()) {
                Some(index) => self.current = Some(index),
                None => tracing::warn!(pin = self.pin.name(), %value, "Unknown image index"),
            }
        }
        self.last = Some(value);
        Ok(())
    }

    fn pins(&self) -> Vec<&PinHandle> {
        vec![&self.pin]
    }
}

/// Layout container (`vbox`, `hbox`). Has no pins and nothing to update.
#[derive(Debug)]
pub struct Container {
    kind: &'static str,
}

impl Container {
    pub(crate) fn new(kind: &'static str) -> Self {
        Self { kind }
    }
}

impl BoundWidget for Container {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn update(&mut self, _pins: &PinAccessor<'_>) -> Result<()> {
        Ok(())
    }
}

pub(crate) fn check_range(min: f64, max: f64) -> Result<()> {
    if min < max {
        Ok(())
    } else {
        Err(ValueError::InvalidProperty {
            property: "max",
            message: format!("must be greater than min ({min}), got {max}"),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::{MemoryPinStore, PinStore};

    fn tick(store: &MemoryPinStore, widget: &mut dyn BoundWidget) {
        widget.update(&PinAccessor::new(store)).unwrap();
    }

    #[test]
    fn led_follows_pin_and_disable() {
        let store = MemoryPinStore::new();
        let mut binder = PinBinder::new(&store);
        let mut led = Led::build("led", &mut binder, &WidgetProps::new().with_disable_pin()).unwrap();
        assert_eq!(led.pin().name(), "led.0");

        tick(&store, &mut led);
        assert_eq!(led.state(), LedState::Off);
        store.drive("led.0", true).unwrap();
        tick(&store, &mut led);
        assert_eq!(led.state(), LedState::On);
        store.drive("led.0.disable", true).unwrap();
        tick(&store, &mut led);
        assert_eq!(led.state(), LedState::Disabled);
        assert_eq!(led.pins().len(), 2);
    }

    #[test]
    fn number_renders_on_change() {
        let store = MemoryPinStore::new();
        let mut binder = PinBinder::new(&store);
        let mut number = Number::build("number", PinType::Float, &mut binder, &WidgetProps::new()).unwrap();
        assert_eq!(number.text(), "0.0");

        store.drive("number.0", 12.34).unwrap();
        tick(&store, &mut number);
        assert_eq!(number.text(), "12.3");

        let mut count = Number::build("s32", PinType::S32, &mut binder, &WidgetProps::new()).unwrap();
        store.drive("number.1", -8).unwrap();
        tick(&store, &mut count);
        assert_eq!(count.text(), "-8");
    }

    #[test]
    fn bar_fill_is_clamped() {
        let store = MemoryPinStore::new();
        let mut binder = PinBinder::new(&store);
        let mut bar = Bar::build(&mut binder, &WidgetProps::new().with_range(-10.0, 10.0)).unwrap();

        tick(&store, &mut bar);
        assert!((bar.fill() - 0.5).abs() < 1e-9);
        store.drive("bar.0", 50.0).unwrap();
        tick(&store, &mut bar);
        assert!((bar.fill() - 1.0).abs() < 1e-9);
        assert_eq!(bar.text(), "50.0");
    }

    #[test]
    fn bar_rejects_empty_range() {
        let store = MemoryPinStore::new();
        let mut binder = PinBinder::new(&store);
        assert!(Bar::build(&mut binder, &WidgetProps::new().with_range(1.0, 1.0)).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn meter_needle_stops_at_the_ends() {
        let store = MemoryPinStore::new();
        let mut binder = PinBinder::new(&store);
        let mut meter = Meter::build(&mut binder, &WidgetProps::new().with_range(-20.0, 20.0)).unwrap();
        assert_eq!(meter.pins()[0].name(), "meter.0.value");

        tick(&store, &mut meter);
        assert!((meter.angle() + FRAC_PI_2).abs() < 1e-9);

        store.drive("meter.0.value", 20.0).unwrap();
        tick(&store, &mut meter);
        let full = meter.angle();
        assert!((full - (METER_HALF_SWEEP - FRAC_PI_2)).abs() < 1e-9);

        store.drive("meter.0.value", 500.0).unwrap();
        tick(&store, &mut meter);
        assert!((meter.value() - 500.0).abs() < f64::EPSILON);
        assert!((meter.angle() - full).abs() < 1e-9);
    }

    #[test]
    fn label_without_disable_has_no_pins() {
        let store = MemoryPinStore::new();
        let mut binder = PinBinder::new(&store);
        let mut label = Label::build(&mut binder, &WidgetProps::new().with_text("Spindle")).unwrap();
        tick(&store, &mut label);
        assert_eq!(label.text(), "Spindle");
        assert!(label.pins().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn timer_accumulates_while_running() {
        let store = MemoryPinStore::new();
        let mut binder = PinBinder::new(&store);
        let mut timer = Timer::build(&mut binder, &WidgetProps::new().with_halpin("cycle")).unwrap();

        store.drive("cycle.run", true).unwrap();
        tick(&store, &mut timer);
        tokio::time::advance(Duration::from_secs(3725)).await;
        tick(&store, &mut timer);
        assert_eq!(timer.text(), "01:02:05");

        store.drive("cycle.run", false).unwrap();
        tick(&store, &mut timer);
        tokio::time::advance(Duration::from_secs(60)).await;
        tick(&store, &mut timer);
        assert_eq!(timer.text(), "01:02:05");

        store.drive("cycle.reset", true).unwrap();
        tick(&store, &mut timer);
        assert_eq!(timer.elapsed(), Duration::ZERO);
        assert_eq!(timer.text(), "00:00:00");
    }

    #[test]
    fn image_selector_keeps_last_known_image() {
        let store = MemoryPinStore::new();
        let mut binder = PinBinder::new(&store);
        let props = WidgetProps::new().with_images(["idle", "busy"]);
        let mut image = ImageSelector::build("image_u32", PinType::U32, &mut binder, &props).unwrap();

        tick(&store, &mut image);
        assert_eq!(image.image(), Some("idle"));
        store.drive("number.0", 1u32).unwrap();
        tick(&store, &mut image);
        assert_eq!(image.image(), Some("busy"));
        store.drive("number.0", 7u32).unwrap();
        tick(&store, &mut image);
        assert_eq!(image.image(), Some("busy"));
        assert_eq!(store.read("number.0").unwrap(), PinValue::U32(7));
    }
}
