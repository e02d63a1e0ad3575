//! Write-only text channel to the operator's terminal.

/// Capacity of one formatted block of output.
pub const TEXT_CAPACITY: usize = 384;

/// Buffer a block of output is formatted into before it is written.
pub type Text = heapless::String<TEXT_CAPACITY>;

pub const NEWLINE: &str = "\r\n";

pub trait Console {
    type Error;

    /// True once a terminal is attached to the channel.
    fn is_ready(&mut self) -> bool;

    async fn write(&mut self, buf: &[u8]) -> Result<(), Self::Error>;
}

impl<C: Console> Console for &mut C {
    type Error = C::Error;

    fn is_ready(&mut self) -> bool {
        C::is_ready(self)
    }

    async fn write(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        C::write(self, buf).await
    }
}

/// Packet-oriented serial port, e.g. a USB CDC-ACM data endpoint.
pub trait PacketPort {
    type Error;

    /// True while a terminal holds the port open.
    fn connected(&self) -> bool;

    fn max_packet_size(&self) -> usize;

    async fn write_packet(&mut self, packet: &[u8]) -> Result<(), Self::Error>;
}

/// Splits `buf` into packets and writes them, ending a transfer whose last
/// packet is full with a zero-length packet. Output is dropped while no
/// terminal is connected: the host stops collecting packets then and a
/// write would never complete.
pub async fn write_packets<P: PacketPort>(port: &mut P, buf: &[u8]) -> Result<(), P::Error> {
    let packet_size = port.max_packet_size();
    for chunk in buf.chunks(packet_size) {
        if !port.connected() {
            trace!("No terminal, dropping {=usize} bytes", chunk.len());
            return Ok(());
        }
        port.write_packet(chunk).await?;
    }
    if !buf.is_empty() && buf.len() % packet_size == 0 && port.connected() {
        port.write_packet(&[]).await?;
    }
    Ok(())
}

/// Writes `text`. Nobody acknowledges the output, so a failed write is only
/// logged.
pub async fn print<C: Console>(console: &mut C, text: &str) {
    if console.write(text.as_bytes()).await.is_err() {
        warn!("Console write failed, {=usize} bytes dropped", text.len());
    }
}

/// Writes `line` followed by a line break.
pub async fn println<C: Console>(console: &mut C, line: &str) {
    print(console, line).await;
    print(console, NEWLINE).await;
}
