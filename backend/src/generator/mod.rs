//! Generator capability
//!
//! The external event generator is reached only through [`EventGenerator`]:
//! accept settings, initialize once, produce events, report cross sections.
//! Anything implementing it can sit behind the adapter, including scripted
//! stubs in tests.

pub mod physics;
pub mod toy;

pub use toy::ToyGenerator;

use thiserror::Error;

use crate::models::{EventInfo, EventRecord};
use crate::settings::{SettingKey, SettingTarget, SettingValue};

/// Errors reported by a generator implementation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeneratorError {
    /// The generator refused to start; the message is its own diagnostic.
    #[error("{0}")]
    Init(String),

    /// The generator's settings store refused a value.
    #[error("{0}")]
    Setting(String),
}

/// The narrow interface an external event generator must offer.
///
/// Implementations are not expected to be thread-safe. One instance serves
/// one caller at a time; parallel hosts create one generator per worker.
pub trait EventGenerator: SettingTarget {
    /// Bring the generator up from the settings applied so far.
    fn init(&mut self) -> Result<(), GeneratorError>;

    /// Generate the next event. `false` means this attempt produced no event;
    /// the caller may try again.
    fn next_event(&mut self) -> bool;

    /// Info for the most recent event.
    fn info(&self) -> &EventInfo;

    /// Record of the most recent event.
    fn event(&self) -> &EventRecord;

    /// Current total cross section estimate, mb.
    fn sigma_total(&self) -> f64;

    /// Current elastic cross section estimate, mb.
    fn sigma_elastic(&self) -> f64;
}

impl<G: SettingTarget + ?Sized> SettingTarget for Box<G> {
    fn apply_setting(
        &mut self,
        key: SettingKey,
        value: SettingValue,
    ) -> Result<(), GeneratorError> {
        (**self).apply_setting(key, value)
    }
}

impl<G: EventGenerator + ?Sized> EventGenerator for Box<G> {
    fn init(&mut self) -> Result<(), GeneratorError> {
        (**self).init()
    }

    fn next_event(&mut self) -> bool {
        (**self).next_event()
    }

    fn info(&self) -> &EventInfo {
        (**self).info()
    }

    fn event(&self) -> &EventRecord {
        (**self).event()
    }

    fn sigma_total(&self) -> f64 {
        (**self).sigma_total()
    }

    fn sigma_elastic(&self) -> f64 {
        (**self).sigma_elastic()
    }
}

/// A settings target that accepts everything and stores nothing.
///
/// Used to validate settings (e.g. a run configuration) without a generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTarget;

impl SettingTarget for NullTarget {
    fn apply_setting(&mut self, _: SettingKey, _: SettingValue) -> Result<(), GeneratorError> {
        Ok(())
    }
}
