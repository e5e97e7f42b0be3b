// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element tag registry.

use crate::error::{Error, Result};
use crate::types::PinType;

use super::controls::{Button, CheckButton, Dial, JogWheel, RadioButton, Scale, SpinBox};
use super::indicators::{Bar, Container, ImageSelector, Label, Led, Meter, Number, Timer};
use super::{BoundWidget, PinBinder, WidgetProps};

/// Builds an element, creating its pins through the binder.
pub type Constructor = fn(&mut PinBinder<'_>, &WidgetProps) -> Result<Box<dyn BoundWidget>>;

/// Every element tag and its constructor.
pub const REGISTRY: &[(&str, Constructor)] = &[
    ("led", led),
    ("rectled", rectled),
    ("number", number),
    ("s32", number_s32),
    ("u32", number_u32),
    ("bar", bar),
    ("meter", meter),
    ("label", label),
    ("timer", timer),
    ("image_bit", image_bit),
    ("image_u32", image_u32),
    ("button", button),
    ("checkbutton", checkbutton),
    ("spinbox", spinbox),
    ("scale", scale),
    ("dial", dial),
    ("jogwheel", jogwheel),
    ("radiobutton", radiobutton),
    ("vbox", vbox),
    ("hbox", hbox),
    ("labelframe", labelframe),
    ("tabs", tabs),
    ("table", table),
];

fn led(b: &mut PinBinder<'_>, p: &WidgetProps) -> Result<Box<dyn BoundWidget>> {
    Ok(Box::new(Led::build("led", b, p)?))
}

fn rectled(b: &mut PinBinder<'_>, p: &WidgetProps) -> Result<Box<dyn BoundWidget>> {
    Ok(Box::new(Led::build("rectled", b, p)?))
}

fn number(b: &mut PinBinder<'_>, p: &WidgetProps) -> Result<Box<dyn BoundWidget>> {
    Ok(Box::new(Number::build("number", PinType::Float, b, p)?))
}

fn number_s32(b: &mut PinBinder<'_>, p: &WidgetProps) -> Result<Box<dyn BoundWidget>> {
    Ok(Box::new(Number::build("s32", PinType::S32, b, p)?))
}

fn number_u32(b: &mut PinBinder<'_>, p: &WidgetProps) -> Result<Box<dyn BoundWidget>> {
    Ok(Box::new(Number::build("u32", PinType::U32, b, p)?))
}

fn bar(b: &mut PinBinder<'_>, p: &WidgetProps) -> Result<Box<dyn BoundWidget>> {
    Ok(Box::new(Bar::build(b, p)?))
}

fn meter(b: &mut PinBinder<'_>, p: &WidgetProps) -> Result<Box<dyn BoundWidget>> {
    Ok(Box::new(Meter::build(b, p)?))
}

fn label(b: &mut PinBinder<'_>, p: &WidgetProps) -> Result<Box<dyn BoundWidget>> {
    Ok(Box::new(Label::build(b, p)?))
}

fn timer(b: &mut PinBinder<'_>, p: &WidgetProps) -> Result<Box<dyn BoundWidget>> {
    Ok(Box::new(Timer::build(b, p)?))
}

fn image_bit(b: &mut PinBinder<'_>, p: &WidgetProps) -> Result<Box<dyn BoundWidget>> {
    Ok(Box::new(ImageSelector::build("image_bit", PinType::Bit, b, p)?))
}

fn image_u32(b: &mut PinBinder<'_>, p: &WidgetProps) -> Result<Box<dyn BoundWidget>> {
    Ok(Box::new(ImageSelector::build("image_u32", PinType::U32, b, p)?))
}

fn button(b: &mut PinBinder<'_>, p: &WidgetProps) -> Result<Box<dyn BoundWidget>> {
    Ok(Box::new(Button::build(b, p)?))
}

fn checkbutton(b: &mut PinBinder<'_>, p: &WidgetProps) -> Result<Box<dyn BoundWidget>> {
    Ok(Box::new(CheckButton::build(b, p)?))
}

fn spinbox(b: &mut PinBinder<'_>, p: &WidgetProps) -> Result<Box<dyn BoundWidget>> {
    Ok(Box::new(SpinBox::build(b, p)?))
}

fn scale(b: &mut PinBinder<'_>, p: &WidgetProps) -> Result<Box<dyn BoundWidget>> {
    Ok(Box::new(Scale::build(b, p)?))
}

fn dial(b: &mut PinBinder<'_>, p: &WidgetProps) -> Result<Box<dyn BoundWidget>> {
    Ok(Box::new(Dial::build(b, p)?))
}

fn jogwheel(b: &mut PinBinder<'_>, p: &WidgetProps) -> Result<Box<dyn BoundWidget>> {
    Ok(Box::new(JogWheel::build(b, p)?))
}

fn radiobutton(b: &mut PinBinder<'_>, p: &WidgetProps) -> Result<Box<dyn BoundWidget>> {
    Ok(Box::new(RadioButton::build(b, p)?))
}

fn vbox(_: &mut PinBinder<'_>, _: &WidgetProps) -> Result<Box<dyn BoundWidget>> {
    Ok(Box::new(Container::new("vbox")))
}

fn hbox(_: &mut PinBinder<'_>, _: &WidgetProps) -> Result<Box<dyn BoundWidget>> {
    Ok(Box::new(Container::new("hbox")))
}

fn labelframe(_: &mut PinBinder<'_>, _: &WidgetProps) -> Result<Box<dyn BoundWidget>> {
    Ok(Box::new(Container::new("labelframe")))
}

fn tabs(_: &mut PinBinder<'_>, _: &WidgetProps) -> Result<Box<dyn BoundWidget>> {
    Ok(Box::new(Container::new("tabs")))
}

fn table(_: &mut PinBinder<'_>, _: &WidgetProps) -> Result<Box<dyn BoundWidget>> {
    Ok(Box::new(Container::new("table")))
}

/// Returns the constructor registered for `tag`.
#[must_use]
pub fn lookup(tag: &str) -> Option<Constructor> {
    REGISTRY
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, constructor)| *constructor)
}

/// Returns every registered tag, in registry order.
pub fn tags() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|(name, _)| *name)
}

/// Builds the element registered for `tag`.
///
/// # Errors
///
/// Returns [`Error::UnknownWidget`] for an unregistered tag, or the
/// constructor's error.
///
/// # Examples
///
/// ```
/// use halwatch::pin::{MemoryPinStore, PinStore};
/// use halwatch::widget::{PinBinder, WidgetProps, registry};
///
/// let store = MemoryPinStore::new();
/// let mut binder = PinBinder::new(&store);
///
/// let led = registry::build("led", &mut binder, &WidgetProps::new()).unwrap();
/// assert_eq!(led.kind(), "led");
/// assert!(store.read("led.0").is_ok());
///
/// assert!(registry::build("include", &mut binder, &WidgetProps::new()).is_err());
/// ```
pub fn build(tag: &str, binder: &mut PinBinder<'_>, props: &WidgetProps) -> Result<Box<dyn BoundWidget>> {
    let constructor = lookup(tag).ok_or_else(|| Error::UnknownWidget(tag.to_string()))?;
    constructor(binder, props)
}
