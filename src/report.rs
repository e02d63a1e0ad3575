//! Text rendering of the configuration report and of measurements.

use core::fmt::{self, Display, Write};

use crate::{SCD30Error, SCD30Response};
use crate::console::NEWLINE;
use crate::sensor::Co2Sensor;

pub const SELF_CALIBRATION_ENABLED: &str = "Self calibration enabled";
pub const SELF_CALIBRATION_DISABLED: &str = "Self calibration disabled";

/// Device settings read back for display. `None` marks a property that
/// could not be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Configuration {
    pub firmware_version: Option<(u8, u8)>,
    pub measurement_interval: Option<u16>,
    pub ambient_pressure_offset: Option<u16>,
    pub altitude_offset: Option<u16>,
    /// Hundredths of a degree Celsius.
    pub temperature_offset: Option<u16>,
    pub forced_recalibration_reference: Option<u16>,
    pub self_calibration_enabled: Option<bool>,
}

impl Configuration {
    /// Reads every reported property. A failed read is logged and left as
    /// `None`.
    pub async fn read_from<S: Co2Sensor>(sensor: &mut S) -> Self {
        Self {
            firmware_version: sensor.firmware_version().await.map_err(log_failure).ok(),
            measurement_interval: sensor.measurement_interval().await.map_err(log_failure).ok(),
            ambient_pressure_offset: sensor.ambient_pressure_offset().await.map_err(log_failure).ok(),
            altitude_offset: sensor.altitude_offset().await.map_err(log_failure).ok(),
            temperature_offset: sensor.temperature_offset().await.map_err(log_failure).ok(),
            forced_recalibration_reference: sensor
                .forced_recalibration_reference()
                .await
                .map_err(log_failure)
                .ok(),
            self_calibration_enabled: sensor.self_calibration_enabled().await.map_err(log_failure).ok(),
        }
    }
}

fn log_failure(e: SCD30Error) {
    warn!("Configuration read failed: {}", e);
}

struct Property<T>(Option<T>);

impl<T: Display> Display for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str("unavailable"),
        }
    }
}

/// Degrees Celsius with two decimals from a value in hundredths.
struct Hundredths(u16);

impl Display for Hundredths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", f32::from(self.0) / 100.0)
    }
}

struct Version((u8, u8));

impl Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0.0, self.0.1)
    }
}

pub fn write_configuration<W: Write>(out: &mut W, config: &Configuration) -> fmt::Result {
    write!(out, "Sensor Configuration{NEWLINE}")?;
    write!(out, "===================={NEWLINE}")?;
    write!(
        out,
        "Firmware version: {}{NEWLINE}",
        Property(config.firmware_version.map(Version))
    )?;
    write!(
        out,
        "Measurement interval: {} seconds{NEWLINE}",
        Property(config.measurement_interval)
    )?;
    write!(
        out,
        "Ambient pressure offset: {} mBar{NEWLINE}",
        Property(config.ambient_pressure_offset)
    )?;
    write!(out, "Altitude offset: {} meters{NEWLINE}", Property(config.altitude_offset))?;
    write!(
        out,
        "Temperature offset: {} degrees C{NEWLINE}",
        Property(config.temperature_offset.map(Hundredths))
    )?;
    write!(
        out,
        "Forced Recalibration reference: {} ppm{NEWLINE}",
        Property(config.forced_recalibration_reference)
    )?;
    // An unreadable flag reads as disabled; the line is always one of the two.
    if config.self_calibration_enabled == Some(true) {
        write!(out, "{SELF_CALIBRATION_ENABLED}{NEWLINE}")?;
    } else {
        write!(out, "{SELF_CALIBRATION_DISABLED}{NEWLINE}")?;
    }
    out.write_str(NEWLINE)
}

/// Three labelled lines and a blank line.
pub fn write_sample<W: Write>(out: &mut W, sample: &SCD30Response) -> fmt::Result {
    write!(out, "Temperature: {:.2} degrees C{NEWLINE}", sample.temperature)?;
    write!(out, "Relative Humidity: {:.2} %{NEWLINE}", sample.humidity)?;
    write!(out, "CO2: {:.3} ppm{NEWLINE}", sample.co2)?;
    out.write_str(NEWLINE)
}
