//! Fakes shared by the unit tests.

use std::collections::VecDeque;

use embedded_hal_async::delay::DelayNs;

use crate::console::{Console, PacketPort};
use crate::scd30::sensirion_crc8;
use crate::sensor::Co2Sensor;
use crate::{SCD30Error, SCD30Response};

pub struct NoopDelay;

impl DelayNs for NoopDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}

/// Records every millisecond delay instead of sleeping. Once
/// `pending_after` delays are recorded, the last one never completes, which
/// freezes an endless loop for inspection.
#[derive(Default)]
pub struct RecordingDelay {
    pub delays_ms: Vec<u32>,
    pub pending_after: Option<usize>,
}

impl RecordingDelay {
    pub fn pending_after(delays: usize) -> Self {
        Self {
            delays_ms: Vec::new(),
            pending_after: Some(delays),
        }
    }

    async fn record(&mut self, ms: u32) {
        self.delays_ms.push(ms);
        if self.pending_after.is_some_and(|limit| self.delays_ms.len() >= limit) {
            core::future::pending::<()>().await;
        }
    }
}

impl DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.record(ns / 1_000_000).await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.record(ms).await;
    }
}

/// Polls `future` once with a waker that does nothing.
pub fn poll_once<F: core::future::Future>(future: F) -> core::task::Poll<F::Output> {
    let mut future = core::pin::pin!(future);
    let mut cx = core::task::Context::from_waker(core::task::Waker::noop());
    future.as_mut().poll(&mut cx)
}

/// A word as it appears on the wire: big-endian value and its CRC.
pub fn encode_word(value: u16) -> [u8; 3] {
    let [hi, lo] = value.to_be_bytes();
    [hi, lo, sensirion_crc8(&[hi, lo])]
}

pub fn encode_f32(value: f32) -> [u8; 6] {
    let [b0, b1, b2, b3] = value.to_be_bytes();
    [b0, b1, sensirion_crc8(&[b0, b1]), b2, b3, sensirion_crc8(&[b2, b3])]
}

/// Terminal that attaches after a number of readiness polls and captures
/// everything written to it.
pub struct FakeConsole {
    polls_until_ready: usize,
    pub fail_writes: bool,
    written: Vec<u8>,
}

impl FakeConsole {
    pub fn ready() -> Self {
        Self::attached_after(0)
    }

    pub fn attached_after(polls: usize) -> Self {
        Self {
            polls_until_ready: polls,
            fail_writes: false,
            written: Vec::new(),
        }
    }

    pub fn output(&self) -> String {
        String::from_utf8(self.written.clone()).unwrap()
    }
}

impl Console for FakeConsole {
    type Error = ();

    fn is_ready(&mut self) -> bool {
        if self.polls_until_ready == 0 {
            return true;
        }
        self.polls_until_ready -= 1;
        false
    }

    async fn write(&mut self, buf: &[u8]) -> Result<(), ()> {
        if self.fail_writes {
            return Err(());
        }
        self.written.extend_from_slice(buf);
        Ok(())
    }
}

/// Packet port recording every packet. After `connected_packets` packets
/// the terminal is gone.
pub struct FakePort {
    packet_size: usize,
    pub connected_packets: Option<usize>,
    pub packets: Vec<Vec<u8>>,
}

impl FakePort {
    pub fn connected(packet_size: usize) -> Self {
        Self {
            packet_size,
            connected_packets: None,
            packets: Vec::new(),
        }
    }

    pub fn packet_lengths(&self) -> Vec<usize> {
        self.packets.iter().map(Vec::len).collect()
    }
}

impl PacketPort for FakePort {
    type Error = ();

    fn connected(&self) -> bool {
        self.connected_packets.is_none_or(|limit| self.packets.len() < limit)
    }

    fn max_packet_size(&self) -> usize {
        self.packet_size
    }

    async fn write_packet(&mut self, packet: &[u8]) -> Result<(), ()> {
        self.packets.push(packet.to_vec());
        Ok(())
    }
}

/// In-memory sensor. Records the name of every call; the call named by
/// `fail_on` fails with a bus error. Data is ready while `samples` is not
/// empty.
pub struct FakeSensor {
    pub calls: Vec<&'static str>,
    pub fail_on: Option<&'static str>,
    pub samples: VecDeque<Result<SCD30Response, SCD30Error>>,
    pub measurement_interval: u16,
    pub ambient_pressure_offset: u16,
    pub altitude_offset: u16,
    pub temperature_offset: u16,
    pub forced_recalibration_reference: u16,
    pub self_calibration: bool,
}

impl Default for FakeSensor {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            fail_on: None,
            samples: VecDeque::new(),
            measurement_interval: 2,
            ambient_pressure_offset: 0,
            altitude_offset: 0,
            temperature_offset: 0,
            forced_recalibration_reference: 400,
            self_calibration: true,
        }
    }
}

impl FakeSensor {
    fn call(&mut self, name: &'static str) -> Result<(), SCD30Error> {
        self.calls.push(name);
        if self.fail_on == Some(name) {
            return Err(SCD30Error::I2CError);
        }
        Ok(())
    }
}

impl Co2Sensor for FakeSensor {
    async fn begin(&mut self) -> Result<(), SCD30Error> {
        self.call("begin")
    }

    async fn data_ready(&mut self) -> Result<bool, SCD30Error> {
        self.call("data_ready")?;
        Ok(!self.samples.is_empty())
    }

    async fn read(&mut self) -> Result<SCD30Response, SCD30Error> {
        self.call("read")?;
        self.samples.pop_front().unwrap_or(Err(SCD30Error::NoData))
    }

    async fn measurement_interval(&mut self) -> Result<u16, SCD30Error> {
        self.call("measurement_interval")?;
        Ok(self.measurement_interval)
    }

    async fn set_measurement_interval(&mut self, seconds: u16) -> Result<(), SCD30Error> {
        self.call("set_measurement_interval")?;
        self.measurement_interval = seconds;
        Ok(())
    }

    async fn ambient_pressure_offset(&mut self) -> Result<u16, SCD30Error> {
        self.call("ambient_pressure_offset")?;
        Ok(self.ambient_pressure_offset)
    }

    async fn set_ambient_pressure_offset(&mut self, pressure_mbar: u16) -> Result<(), SCD30Error> {
        self.call("set_ambient_pressure_offset")?;
        self.ambient_pressure_offset = pressure_mbar;
        Ok(())
    }

    async fn altitude_offset(&mut self) -> Result<u16, SCD30Error> {
        self.call("altitude_offset")?;
        Ok(self.altitude_offset)
    }

    async fn set_altitude_offset(&mut self, meters: u16) -> Result<(), SCD30Error> {
        self.call("set_altitude_offset")?;
        self.altitude_offset = meters;
        Ok(())
    }

    async fn temperature_offset(&mut self) -> Result<u16, SCD30Error> {
        self.call("temperature_offset")?;
        Ok(self.temperature_offset)
    }

    async fn set_temperature_offset(&mut self, hundredths: u16) -> Result<(), SCD30Error> {
        self.call("set_temperature_offset")?;
        self.temperature_offset = hundredths;
        Ok(())
    }

    async fn forced_recalibration_reference(&mut self) -> Result<u16, SCD30Error> {
        self.call("forced_recalibration_reference")?;
        Ok(self.forced_recalibration_reference)
    }

    async fn force_recalibration_with_reference(&mut self, ppm: u16) -> Result<(), SCD30Error> {
        self.call("force_recalibration_with_reference")?;
        if !(400..=2000).contains(&ppm) {
            return Err(SCD30Error::InvalidArgument);
        }
        self.forced_recalibration_reference = ppm;
        Ok(())
    }

    async fn self_calibration_enabled(&mut self) -> Result<bool, SCD30Error> {
        self.call("self_calibration_enabled")?;
        Ok(self.self_calibration)
    }

    async fn set_self_calibration_enabled(&mut self, enabled: bool) -> Result<(), SCD30Error> {
        self.call("set_self_calibration_enabled")?;
        self.self_calibration = enabled;
        Ok(())
    }

    async fn firmware_version(&mut self) -> Result<(u8, u8), SCD30Error> {
        self.call("firmware_version")?;
        Ok((3, 66))
    }
}
