#![no_std]
#![no_main]

use defmt::{error, info};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_futures::join::join;
use embassy_rp::peripherals::{I2C0, USB};
use embassy_rp::{bind_interrupts, i2c, usb};
use embassy_scd30_sensor::config::CONFIG;
use embassy_scd30_sensor::{SCD30_I2C_ADDRESS, SCD30Sensor, Session, UsbConsole};
use embassy_time::Delay;
use embassy_usb::class::cdc_acm::{CdcAcmClass, State};
use embassy_usb::{Builder, Config};
use panic_probe as _;

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
    USBCTRL_IRQ => usb::InterruptHandler<USB>;
});

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    // USB serial console
    let driver = usb::Driver::new(p.USB, Irqs);
    let mut usb_config = Config::new(0xc0de, 0xcafe);
    usb_config.manufacturer = Some("Embassy");
    usb_config.product = Some("SCD30 monitor");
    usb_config.serial_number = Some("12345678");
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;

    let mut config_descriptor = [0; 256];
    let mut bos_descriptor = [0; 256];
    let mut control_buf = [0; 64];
    let mut state = State::new();
    let mut builder = Builder::new(
        driver,
        usb_config,
        &mut config_descriptor,
        &mut bos_descriptor,
        &mut [],
        &mut control_buf,
    );
    let class = CdcAcmClass::new(&mut builder, &mut state, 64);
    let mut usb = builder.build();

    let sda = p.PIN_0;
    let scl = p.PIN_1;

    // The SCD30 stretches the clock and is specified up to 100 kHz.
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = 50_000;
    let mut i2c = i2c::I2c::new_async(p.I2C0, scl, sda, Irqs, i2c_config);

    let monitor = async {
        let sensor = SCD30Sensor::new(&mut i2c, Delay, SCD30_I2C_ADDRESS);
        let console = UsbConsole::new(class, CONFIG.console_baud_rate);
        let mut session = Session::new(sensor, console, Delay, CONFIG);

        if let Err(e) = session.start().await {
            error!("Startup failed: {}", e);
            session.halt().await;
        }
        info!("Startup complete");
        session.run().await
    };

    join(usb.run(), monitor).await;
}
