//! Parameter editing capability.
//!
//! Editors (the TUI instrument panel, sliders in a GUI) see every tweakable
//! component as a flat list of named, ranged values. Implementors clamp
//! incoming values to the advertised range.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterInfo {
    pub name: &'static str,
    /// Partial or filter index for parameters that repeat per slot.
    pub slot: Option<usize>,
    pub value: f32,
    pub min: f32,
    pub max: f32,
}

impl ParameterInfo {
    pub fn new(name: &'static str, value: f32, min: f32, max: f32) -> Self {
        Self {
            name,
            slot: None,
            value,
            min,
            max,
        }
    }

    pub fn in_slot(mut self, slot: usize) -> Self {
        self.slot = Some(slot);
        self
    }

    /// Step size that moves the value across its range in 100 steps.
    pub fn step(&self) -> f32 {
        (self.max - self.min) / 100.0
    }
}

pub trait Tweakable {
    fn parameter_count(&self) -> usize;

    /// Returns `None` when `index` is out of range.
    fn parameter(&self, index: usize) -> Option<ParameterInfo>;

    /// Returns `false` when `index` is out of range.
    fn set_parameter(&mut self, index: usize, value: f32) -> bool;

    /// Nudge a parameter by `steps` of its natural step size.
    fn nudge_parameter(&mut self, index: usize, steps: f32) -> bool {
        match self.parameter(index) {
            Some(info) => self.set_parameter(index, info.value + info.step() * steps),
            None => false,
        }
    }
}
