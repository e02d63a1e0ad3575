//! The operations the session needs from a CO2 sensor.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::{SCD30Error, SCD30Response, SCD30Sensor};

/// CO2, temperature and humidity sensor with non-volatile calibration
/// registers.
pub trait Co2Sensor {
    async fn begin(&mut self) -> Result<(), SCD30Error>;

    /// Non-blocking check for a pending measurement.
    async fn data_ready(&mut self) -> Result<bool, SCD30Error>;

    async fn read(&mut self) -> Result<SCD30Response, SCD30Error>;

    async fn measurement_interval(&mut self) -> Result<u16, SCD30Error>;
    async fn set_measurement_interval(&mut self, seconds: u16) -> Result<(), SCD30Error>;

    async fn ambient_pressure_offset(&mut self) -> Result<u16, SCD30Error>;
    async fn set_ambient_pressure_offset(&mut self, pressure_mbar: u16) -> Result<(), SCD30Error>;

    async fn altitude_offset(&mut self) -> Result<u16, SCD30Error>;
    async fn set_altitude_offset(&mut self, meters: u16) -> Result<(), SCD30Error>;

    /// Hundredths of a degree Celsius.
    async fn temperature_offset(&mut self) -> Result<u16, SCD30Error>;
    async fn set_temperature_offset(&mut self, hundredths: u16) -> Result<(), SCD30Error>;

    async fn forced_recalibration_reference(&mut self) -> Result<u16, SCD30Error>;
    async fn force_recalibration_with_reference(&mut self, ppm: u16) -> Result<(), SCD30Error>;

    async fn self_calibration_enabled(&mut self) -> Result<bool, SCD30Error>;
    async fn set_self_calibration_enabled(&mut self, enabled: bool) -> Result<(), SCD30Error>;

    async fn firmware_version(&mut self) -> Result<(u8, u8), SCD30Error>;
}

impl<T: I2c, D: DelayNs> Co2Sensor for SCD30Sensor<'_, T, D> {
    async fn begin(&mut self) -> Result<(), SCD30Error> {
        SCD30Sensor::begin(self).await
    }

    async fn data_ready(&mut self) -> Result<bool, SCD30Error> {
        SCD30Sensor::data_ready(self).await
    }

    async fn read(&mut self) -> Result<SCD30Response, SCD30Error> {
        SCD30Sensor::read(self).await
    }

    async fn measurement_interval(&mut self) -> Result<u16, SCD30Error> {
        SCD30Sensor::measurement_interval(self).await
    }

    async fn set_measurement_interval(&mut self, seconds: u16) -> Result<(), SCD30Error> {
        SCD30Sensor::set_measurement_interval(self, seconds).await
    }

    async fn ambient_pressure_offset(&mut self) -> Result<u16, SCD30Error> {
        SCD30Sensor::ambient_pressure_offset(self).await
    }

    async fn set_ambient_pressure_offset(&mut self, pressure_mbar: u16) -> Result<(), SCD30Error> {
        SCD30Sensor::set_ambient_pressure_offset(self, pressure_mbar).await
    }

    async fn altitude_offset(&mut self) -> Result<u16, SCD30Error> {
        SCD30Sensor::altitude_offset(self).await
    }

    async fn set_altitude_offset(&mut self, meters: u16) -> Result<(), SCD30Error> {
        SCD30Sensor::set_altitude_offset(self, meters).await
    }

    async fn temperature_offset(&mut self) -> Result<u16, SCD30Error> {
        SCD30Sensor::temperature_offset(self).await
    }

    async fn set_temperature_offset(&mut self, hundredths: u16) -> Result<(), SCD30Error> {
        SCD30Sensor::set_temperature_offset(self, hundredths).await
    }

    async fn forced_recalibration_reference(&mut self) -> Result<u16, SCD30Error> {
        SCD30Sensor::forced_recalibration_reference(self).await
    }

    async fn force_recalibration_with_reference(&mut self, ppm: u16) -> Result<(), SCD30Error> {
        SCD30Sensor::force_recalibration_with_reference(self, ppm).await
    }

    async fn self_calibration_enabled(&mut self) -> Result<bool, SCD30Error> {
        SCD30Sensor::self_calibration_enabled(self).await
    }

    async fn set_self_calibration_enabled(&mut self, enabled: bool) -> Result<(), SCD30Error> {
        SCD30Sensor::set_self_calibration_enabled(self, enabled).await
    }

    async fn firmware_version(&mut self) -> Result<(u8, u8), SCD30Error> {
        SCD30Sensor::firmware_version(self).await
    }
}
