//! Sensor session: bring the sensor up once, then poll it forever.

use embedded_hal_async::delay::DelayNs;

use crate::calibration::{CalibrationError, calibrate};
use crate::config::SessionConfig;
use crate::console::{Console, Text, print, println};
use crate::report::{Configuration, write_configuration, write_sample};
use crate::sensor::Co2Sensor;
use crate::{SCD30Error, SCD30Response};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionError {
    #[error("sensor not found: {0}")]
    SensorNotFound(SCD30Error),
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
}

/// Result of a single poll of the sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollOutcome {
    NotReady,
    Sample(SCD30Response),
    ReadFailed(SCD30Error),
}

pub struct Session<S, C, D> {
    sensor: S,
    console: C,
    delay: D,
    config: SessionConfig,
}

impl<S: Co2Sensor, C: Console, D: DelayNs> Session<S, C, D> {
    pub fn new(sensor: S, console: C, delay: D, config: SessionConfig) -> Self {
        Self {
            sensor,
            console,
            delay,
            config,
        }
    }

    /// Waits for the operator's terminal, initializes the sensor, runs the
    /// optional calibration and prints the sensor configuration.
    pub async fn start(&mut self) -> Result<(), SessionError> {
        self.wait_for_console().await;

        if let Err(e) = self.sensor.begin().await {
            error!("Sensor initialization failed: {}", e);
            println(&mut self.console, "Failed to find SCD30 chip").await;
            return Err(SessionError::SensorNotFound(e));
        }

        if self.config.run_calibration {
            calibrate(&mut self.sensor, &mut self.console, &self.config.calibration).await?;
        }

        self.print_configuration().await;
        Ok(())
    }

    /// Blocks until a terminal is attached. There is no timeout.
    pub async fn wait_for_console(&mut self) {
        while !self.console.is_ready() {
            self.delay.delay_ms(self.config.console_poll_ms).await;
        }
        info!("Console attached, expecting {=u32} baud", self.config.console_baud_rate);
    }

    pub async fn print_configuration(&mut self) {
        let configuration = Configuration::read_from(&mut self.sensor).await;
        let mut text = Text::new();
        if write_configuration(&mut text, &configuration).is_err() {
            warn!("Configuration report truncated");
        }
        print(&mut self.console, &text).await;
    }

    /// Checks for a new measurement and prints it. Does not wait.
    pub async fn poll(&mut self) -> PollOutcome {
        match self.sensor.data_ready().await {
            Ok(true) => {}
            Ok(false) => return PollOutcome::NotReady,
            Err(e) => {
                warn!("Data ready check failed: {}", e);
                return PollOutcome::NotReady;
            }
        }

        let sample = match self.sensor.read().await {
            Ok(sample) => sample,
            Err(e) => {
                error!("Read failed: {}", e);
                println(&mut self.console, "Error reading sensor data").await;
                return PollOutcome::ReadFailed(e);
            }
        };

        debug!("Sample: {}", sample);
        let mut text = Text::new();
        if write_sample(&mut text, &sample).is_err() {
            warn!("Sample output truncated");
        }
        print(&mut self.console, &text).await;
        PollOutcome::Sample(sample)
    }

    /// One loop iteration: poll, then wait the poll interval whatever the
    /// outcome, so a failing sensor is not hammered.
    pub async fn step(&mut self) -> PollOutcome {
        let outcome = self.poll().await;
        self.delay.delay_ms(self.config.poll_interval_ms).await;
        outcome
    }

    pub async fn run(&mut self) -> ! {
        info!("Polling every {=u32} ms", self.config.poll_interval_ms);
        loop {
            self.step().await;
        }
    }

    /// Terminal state after a fatal error. Nothing but a power cycle leaves
    /// it.
    pub async fn halt(&mut self) -> ! {
        error!("Halted");
        loop {
            self.delay.delay_ms(self.config.halt_idle_ms).await;
        }
    }
}
