//! Compile-time configuration of the monitor.

/// Values written to the sensor's non-volatile registers by
/// [`calibrate`](crate::calibration::calibrate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationConfig {
    /// Meters above sea level.
    pub altitude_offset: u16,
    /// Hundredths of a degree Celsius.
    pub temperature_offset: u16,
    pub self_calibration: bool,
    /// Known CO2 concentration in ppm, 400..=2000.
    pub forced_recalibration_reference: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionConfig {
    /// Line rate the operator's terminal is expected to use.
    pub console_baud_rate: u32,
    pub console_poll_ms: u32,
    pub poll_interval_ms: u32,
    pub halt_idle_ms: u32,
    pub run_calibration: bool,
    pub calibration: CalibrationConfig,
}

/// Seconds between measurements. The sensor is set to this interval by
/// `begin` and the session polls at the same pace.
pub const MEASUREMENT_INTERVAL_S: u16 = 2;

pub const CALIBRATION: CalibrationConfig = CalibrationConfig {
    altitude_offset: 315,
    temperature_offset: 400,
    self_calibration: false,
    forced_recalibration_reference: 400,
};

pub const CONFIG: SessionConfig = SessionConfig {
    console_baud_rate: 115_200,
    console_poll_ms: 100,
    poll_interval_ms: MEASUREMENT_INTERVAL_S as u32 * 1000,
    halt_idle_ms: 1000,
    run_calibration: cfg!(feature = "calibration"),
    calibration: CALIBRATION,
};

impl Default for SessionConfig {
    fn default() -> Self {
        CONFIG
    }
}
