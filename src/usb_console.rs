use embassy_usb::class::cdc_acm::CdcAcmClass;
use embassy_usb::driver::{Driver, EndpointError};

use crate::console::{Console, PacketPort, write_packets};

impl<'d, D: Driver<'d>> PacketPort for CdcAcmClass<'d, D> {
    type Error = EndpointError;

    /// A terminal opening the port raises DTR.
    fn connected(&self) -> bool {
        self.dtr()
    }

    fn max_packet_size(&self) -> usize {
        usize::from(CdcAcmClass::max_packet_size(self))
    }

    async fn write_packet(&mut self, packet: &[u8]) -> Result<(), EndpointError> {
        CdcAcmClass::write_packet(self, packet).await
    }
}

/// USB CDC-ACM serial port as the operator console.
pub struct UsbConsole<'d, D: Driver<'d>> {
    class: CdcAcmClass<'d, D>,
    baud_rate: u32,
    attached: bool,
}

impl<'d, D: Driver<'d>> UsbConsole<'d, D> {
    pub fn new(class: CdcAcmClass<'d, D>, baud_rate: u32) -> Self {
        Self {
            class,
            baud_rate,
            attached: false,
        }
    }
}

impl<'d, D: Driver<'d>> Console for UsbConsole<'d, D> {
    type Error = EndpointError;

    fn is_ready(&mut self) -> bool {
        let ready = self.class.dtr();
        if ready && !self.attached {
            let rate = self.class.line_coding().data_rate();
            if rate != self.baud_rate {
                warn!("Terminal opened at {=u32} baud, expected {=u32}", rate, self.baud_rate);
            }
        }
        self.attached = ready;
        ready
    }

    async fn write(&mut self, buf: &[u8]) -> Result<(), EndpointError> {
        write_packets(&mut self.class, buf).await
    }
}
