use crc::{CRC_8_NRSC_5, Crc};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::config::MEASUREMENT_INTERVAL_S;
use crate::{SCD30Error, SCD30Response};

/// Default 7-bit I2C address of the SCD30.
pub const SCD30_I2C_ADDRESS: u8 = 0x61;

// Sensirion word checksum: poly 0x31, init 0xFF, no reflection.
const CRC8: Crc<u8> = Crc::<u8>::new(&CRC_8_NRSC_5);

/// The SCD30 needs at least 3 ms between a command and the following read.
const READ_DELAY_MS: u32 = 4;
const RESET_DELAY_MS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
enum Command {
    /// Argument is the ambient pressure in mBar, 0 disables compensation.
    StartContinuousMeasurement = 0x0010,
    StopContinuousMeasurement = 0x0104,
    MeasurementInterval = 0x4600,
    GetDataReady = 0x0202,
    ReadMeasurement = 0x0300,
    SelfCalibration = 0x5306,
    ForcedRecalibration = 0x5204,
    TemperatureOffset = 0x5403,
    AltitudeOffset = 0x5102,
    FirmwareVersion = 0xD100,
    SoftReset = 0xD304,
}

impl Command {
    fn bytes(self) -> [u8; 2] {
        (self as u16).to_be_bytes()
    }
}

/// Async driver for the Sensirion SCD30 CO2, temperature and humidity sensor.
pub struct SCD30Sensor<'a, T: I2c, D: DelayNs> {
    i2c: &'a mut T,
    delay: D,
    address: u8,
    last_response: Option<SCD30Response>,
}

impl<'a, T: I2c, D: DelayNs> SCD30Sensor<'a, T, D> {
    pub fn new(i2c: &'a mut T, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            last_response: None,
        }
    }

    /// Resets the sensor and starts continuous measurement every
    /// [`MEASUREMENT_INTERVAL_S`] seconds.
    pub async fn begin(&mut self) -> Result<(), SCD30Error> {
        self.soft_reset().await?;
        // The first transfer after a reset is sometimes NACKed.
        if self.start_continuous_measurement(0).await.is_err() {
            debug!("Start measurement NACKed after reset, retrying");
            self.start_continuous_measurement(0).await?;
        }
        self.set_measurement_interval(MEASUREMENT_INTERVAL_S)
            .await?;
        info!("SCD30 initialized at address {=u8:#x}", self.address);
        Ok(())
    }

    pub async fn soft_reset(&mut self) -> Result<(), SCD30Error> {
        self.send_command(Command::SoftReset).await?;
        self.delay.delay_ms(RESET_DELAY_MS).await;
        Ok(())
    }

    /// Starts continuous measurement; `pressure_mbar` of 0 disables
    /// pressure compensation.
    pub async fn start_continuous_measurement(&mut self, pressure_mbar: u16) -> Result<(), SCD30Error> {
        if pressure_mbar != 0 && !(700..=1400).contains(&pressure_mbar) {
            return Err(SCD30Error::InvalidArgument);
        }
        self.send_command_with_argument(Command::StartContinuousMeasurement, pressure_mbar)
            .await
    }

    pub async fn stop_continuous_measurement(&mut self) -> Result<(), SCD30Error> {
        self.send_command(Command::StopContinuousMeasurement).await
    }

    pub async fn data_ready(&mut self) -> Result<bool, SCD30Error> {
        Ok(self.read_register(Command::GetDataReady).await? == 1)
    }

    /// Reads the pending measurement. Call after `data_ready` reports true.
    pub async fn read(&mut self) -> Result<SCD30Response, SCD30Error> {
        let mut buf = [0u8; 18];
        self.read_words(Command::ReadMeasurement, &mut buf).await?;
        trace!("Received I2C data: {:?}", &buf);

        let co2 = decode_f32(&buf[0..6]);
        let temperature = decode_f32(&buf[6..12]);
        let humidity = decode_f32(&buf[12..18]);
        let response = SCD30Response {
            co2,
            temperature,
            humidity,
        };
        self.last_response = Some(response);
        Ok(response)
    }

    /// Most recent measurement returned by `read`.
    pub fn last_response(&self) -> Result<SCD30Response, SCD30Error> {
        self.last_response.ok_or(SCD30Error::NoData)
    }

    pub async fn measurement_interval(&mut self) -> Result<u16, SCD30Error> {
        self.read_register(Command::MeasurementInterval).await
    }

    pub async fn set_measurement_interval(&mut self, seconds: u16) -> Result<(), SCD30Error> {
        if !(2..=1800).contains(&seconds) {
            return Err(SCD30Error::InvalidArgument);
        }
        self.send_command_with_argument(Command::MeasurementInterval, seconds)
            .await
    }

    pub async fn ambient_pressure_offset(&mut self) -> Result<u16, SCD30Error> {
        self.read_register(Command::StartContinuousMeasurement).await
    }

    /// Restarts measurement with the given ambient pressure. Overrides any
    /// altitude offset.
    pub async fn set_ambient_pressure_offset(&mut self, pressure_mbar: u16) -> Result<(), SCD30Error> {
        self.start_continuous_measurement(pressure_mbar).await
    }

    pub async fn altitude_offset(&mut self) -> Result<u16, SCD30Error> {
        self.read_register(Command::AltitudeOffset).await
    }

    /// Stored in non-volatile memory. Overrides any ambient pressure offset.
    pub async fn set_altitude_offset(&mut self, meters: u16) -> Result<(), SCD30Error> {
        self.send_command_with_argument(Command::AltitudeOffset, meters)
            .await
    }

    /// Temperature offset in hundredths of a degree Celsius.
    pub async fn temperature_offset(&mut self) -> Result<u16, SCD30Error> {
        self.read_register(Command::TemperatureOffset).await
    }

    pub async fn set_temperature_offset(&mut self, hundredths: u16) -> Result<(), SCD30Error> {
        self.send_command_with_argument(Command::TemperatureOffset, hundredths)
            .await
    }

    pub async fn forced_recalibration_reference(&mut self) -> Result<u16, SCD30Error> {
        self.read_register(Command::ForcedRecalibration).await
    }

    /// Recalibrates against a known concentration of 400..=2000 ppm,
    /// replacing any self calibration history.
    pub async fn force_recalibration_with_reference(&mut self, ppm: u16) -> Result<(), SCD30Error> {
        if !(400..=2000).contains(&ppm) {
            return Err(SCD30Error::InvalidArgument);
        }
        self.send_command_with_argument(Command::ForcedRecalibration, ppm)
            .await
    }

    pub async fn self_calibration_enabled(&mut self) -> Result<bool, SCD30Error> {
        Ok(self.read_register(Command::SelfCalibration).await? == 1)
    }

    /// Enabling self calibration overrides any forced recalibration value.
    pub async fn set_self_calibration_enabled(&mut self, enabled: bool) -> Result<(), SCD30Error> {
        self.send_command_with_argument(Command::SelfCalibration, u16::from(enabled))
            .await
    }

    /// Firmware version as (major, minor).
    pub async fn firmware_version(&mut self) -> Result<(u8, u8), SCD30Error> {
        let [major, minor] = self
            .read_register(Command::FirmwareVersion)
            .await?
            .to_be_bytes();
        Ok((major, minor))
    }

    async fn send_command(&mut self, command: Command) -> Result<(), SCD30Error> {
        debug!("Command {=u16:#x}", command as u16);
        self.i2c_write(&command.bytes()).await
    }

    async fn send_command_with_argument(&mut self, command: Command, argument: u16) -> Result<(), SCD30Error> {
        debug!("Command {=u16:#x} argument {=u16}", command as u16, argument);
        let [c0, c1] = command.bytes();
        let [a0, a1] = argument.to_be_bytes();
        self.i2c_write(&[c0, c1, a0, a1, sensirion_crc8(&[a0, a1])])
            .await
    }

    async fn read_register(&mut self, command: Command) -> Result<u16, SCD30Error> {
        let mut buf = [0u8; 3];
        self.read_words(command, &mut buf).await?;
        Ok(u16::from_be_bytes([buf[0], buf[1]]))
    }

    /// Writes `command`, waits, then fills `buf` with CRC-checked words.
    async fn read_words(&mut self, command: Command, buf: &mut [u8]) -> Result<(), SCD30Error> {
        self.i2c_write(&command.bytes()).await?;
        self.delay.delay_ms(READ_DELAY_MS).await;
        self.i2c_read(buf).await?;
        for word in buf.chunks_exact(3) {
            if sensirion_crc8(&word[..2]) != word[2] {
                warn!("CRC mismatch for command {=u16:#x}", command as u16);
                return Err(SCD30Error::CrcMismatch);
            }
        }
        Ok(())
    }

    async fn i2c_read(&mut self, read: &mut [u8]) -> Result<(), SCD30Error> {
        match self.i2c.read(self.address, read).await {
            Ok(_) => Ok(()),
            Err(_) => Err(SCD30Error::I2CError),
        }
    }

    async fn i2c_write(&mut self, write: &[u8]) -> Result<(), SCD30Error> {
        match self.i2c.write(self.address, write).await {
            Ok(_) => Ok(()),
            Err(_) => Err(SCD30Error::I2CError),
        }
    }
}

/// Two CRC-checked words holding a big-endian IEEE-754 float.
fn decode_f32(words: &[u8]) -> f32 {
    f32::from_be_bytes([words[0], words[1], words[3], words[4]])
}

#[inline]
pub fn sensirion_crc8(data: &[u8]) -> u8 {
    CRC8.checksum(data)
}
