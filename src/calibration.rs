//! One-time factory calibration of the sensor's non-volatile registers.

use crate::SCD30Error;
use crate::config::CalibrationConfig;
use crate::console::{Console, println};
use crate::sensor::Co2Sensor;

/// Calibration writes, in the order they are applied.
///
/// The order matters: the altitude offset overrides any pressure offset and
/// the forced recalibration replaces whatever self calibration history the
/// sensor holds, so self calibration is configured before recalibrating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationStep {
    AltitudeOffset,
    TemperatureOffset,
    SelfCalibration,
    ForcedRecalibration,
}

impl CalibrationStep {
    pub const ALL: [CalibrationStep; 4] = [
        CalibrationStep::AltitudeOffset,
        CalibrationStep::TemperatureOffset,
        CalibrationStep::SelfCalibration,
        CalibrationStep::ForcedRecalibration,
    ];

    /// Operator message printed when this step fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            CalibrationStep::AltitudeOffset => "Failed to set altitude offset",
            CalibrationStep::TemperatureOffset => "Failed to set temperature offset",
            CalibrationStep::SelfCalibration => "Failed to enable or disable self calibration",
            CalibrationStep::ForcedRecalibration => "Failed to force recalibration with reference",
        }
    }

    async fn apply<S: Co2Sensor>(self, sensor: &mut S, config: &CalibrationConfig) -> Result<(), SCD30Error> {
        match self {
            CalibrationStep::AltitudeOffset => sensor.set_altitude_offset(config.altitude_offset).await,
            CalibrationStep::TemperatureOffset => sensor.set_temperature_offset(config.temperature_offset).await,
            CalibrationStep::SelfCalibration => sensor.set_self_calibration_enabled(config.self_calibration).await,
            CalibrationStep::ForcedRecalibration => {
                sensor
                    .force_recalibration_with_reference(config.forced_recalibration_reference)
                    .await
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("calibration step {step:?} failed: {source}")]
pub struct CalibrationError {
    pub step: CalibrationStep,
    pub source: SCD30Error,
}

/// Writes the calibration registers in order, stopping at the first failure.
/// Registers written before the failure keep their new values.
pub async fn calibrate<S: Co2Sensor, C: Console>(
    sensor: &mut S,
    console: &mut C,
    config: &CalibrationConfig,
) -> Result<(), CalibrationError> {
    println(console, "Calibration started").await;
    info!("Calibration started: {}", config);

    for step in CalibrationStep::ALL {
        if let Err(source) = step.apply(sensor, config).await {
            error!("Calibration step {} failed: {}", step, source);
            println(console, step.failure_message()).await;
            return Err(CalibrationError { step, source });
        }
        debug!("Calibration step {} done", step);
    }

    println(console, "Calibration successful").await;
    info!("Calibration successful");
    Ok(())
}
