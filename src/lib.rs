#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

// This must go first so the logging macros are visible to every module.
mod fmt;

pub mod calibration;
pub mod config;
pub mod console;
pub mod report;
mod scd30;
pub mod sensor;
pub mod session;
#[cfg(feature = "rp2040")]
mod usb_console;

#[cfg(test)]
mod testing;

pub use scd30::{SCD30_I2C_ADDRESS, SCD30Sensor};
pub use sensor::Co2Sensor;
pub use session::{PollOutcome, Session, SessionError};
#[cfg(feature = "rp2040")]
pub use usb_console::UsbConsole;

/// One measurement as delivered by the sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SCD30Response {
    /// CO2 concentration in ppm.
    pub co2: f32,
    /// Relative humidity in percent.
    pub humidity: f32,
    /// Temperature in degrees Celsius.
    pub temperature: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SCD30Error {
    #[error("no measurement has been read yet")]
    NoData,
    #[error("I2C communication error")]
    I2CError,
    #[error("CRC mismatch in sensor response")]
    CrcMismatch,
    #[error("argument out of range for the sensor")]
    InvalidArgument,
}
