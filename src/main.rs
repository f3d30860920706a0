#![no_std]
#![no_main]

use core::cell::Cell;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{UART0, UART1};
use embassy_rp::uart::{
    BufferedInterruptHandler, BufferedUart, BufferedUartRx, BufferedUartTx, Config as UartConfig,
};
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Delay, Duration, Timer};
use led_link::{BootSequencer, LedBank, LinkConfig, LinkStatus, Links, OutputPort, Session};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

// Program metadata
#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"Pico2W LED Server"),
    embassy_rp::binary_info::rp_program_description!(
        c"LED control over an AT-command Wi-Fi module"
    ),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

const RADIO_BAUDRATE: u32 = 115_200;
const CONSOLE_BAUDRATE: u32 = 115_200;

/// GP0..GP15, bit `i` drives GPi.
const LED_BITS: u32 = 0x0000_FFFF;

// Latest state published by the link task for the heartbeat.
static STATUS: Mutex<CriticalSectionRawMutex, Cell<LinkStatus>> =
    Mutex::new(Cell::new(LinkStatus {
        leds: LedBank::ALL_OFF,
        client_connected: false,
    }));

/// The 16 LED pins, written together through the SIO output register.
struct LedPort {
    _pins: [Output<'static>; 16],
}

impl OutputPort for LedPort {
    fn write_mask(&mut self, mask: u16) {
        embassy_rp::pac::SIO
            .gpio_out(0)
            .value()
            .modify(|v| *v = (*v & !LED_BITS) | u32::from(mask));
    }
}

#[embassy_executor::task]
async fn link_task(
    mut radio_tx: BufferedUartTx,
    radio_rx: BufferedUartRx,
    console_tx: BufferedUartTx,
    console_rx: BufferedUartRx,
    leds: LedPort,
) -> ! {
    let config = LinkConfig::default();
    info!("Link task started, network: {}", config.wifi.ssid);

    let mut delay = Delay;
    let mut session = Session::new(leds);

    // Replies are not checked; they show up on the console once the loop runs.
    let sequencer = BootSequencer::new(config);
    if let Err(e) = sequencer.run(&mut radio_tx, &mut delay).await {
        error!("Boot sequence aborted: {:?}", e);
    }

    let mut links = Links {
        radio_rx,
        radio_tx,
        console_rx,
        console_tx,
    };
    let publish = |status| STATUS.lock(|s| s.set(status));
    session.run(&mut links, &mut delay, publish).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("=========================================");
    info!("Pico2W LED Server Starting...");
    info!("=========================================");

    let p = embassy_rp::init(Default::default());

    let leds = LedPort {
        _pins: [
            Output::new(p.PIN_0, Level::Low),
            Output::new(p.PIN_1, Level::Low),
            Output::new(p.PIN_2, Level::Low),
            Output::new(p.PIN_3, Level::Low),
            Output::new(p.PIN_4, Level::Low),
            Output::new(p.PIN_5, Level::Low),
            Output::new(p.PIN_6, Level::Low),
            Output::new(p.PIN_7, Level::Low),
            Output::new(p.PIN_8, Level::Low),
            Output::new(p.PIN_9, Level::Low),
            Output::new(p.PIN_10, Level::Low),
            Output::new(p.PIN_11, Level::Low),
            Output::new(p.PIN_12, Level::Low),
            Output::new(p.PIN_13, Level::Low),
            Output::new(p.PIN_14, Level::Low),
            Output::new(p.PIN_15, Level::Low),
        ],
    };

    static RADIO_TX_BUF: StaticCell<[u8; 2048]> = StaticCell::new();
    static RADIO_RX_BUF: StaticCell<[u8; 2048]> = StaticCell::new();
    static CONSOLE_TX_BUF: StaticCell<[u8; 2048]> = StaticCell::new();
    static CONSOLE_RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

    let mut radio_config = UartConfig::default();
    radio_config.baudrate = RADIO_BAUDRATE;
    info!("Radio UART: {} baud, GP16 TX, GP17 RX", RADIO_BAUDRATE);
    let radio = BufferedUart::new(
        p.UART0,
        p.PIN_16,
        p.PIN_17,
        Irqs,
        RADIO_TX_BUF.init([0u8; 2048]),
        RADIO_RX_BUF.init([0u8; 2048]),
        radio_config,
    );

    let mut console_config = UartConfig::default();
    console_config.baudrate = CONSOLE_BAUDRATE;
    info!("Console UART: {} baud, GP20 TX, GP21 RX", CONSOLE_BAUDRATE);
    let console = BufferedUart::new(
        p.UART1,
        p.PIN_20,
        p.PIN_21,
        Irqs,
        CONSOLE_TX_BUF.init([0u8; 2048]),
        CONSOLE_RX_BUF.init([0u8; 256]),
        console_config,
    );

    let (radio_tx, radio_rx) = radio.split();
    let (console_tx, console_rx) = console.split();
    spawner.spawn(
        link_task(radio_tx, radio_rx, console_tx, console_rx, leds)
            .expect("Failed to spawn link task"),
    );

    let mut counter = 0u32;
    loop {
        Timer::after(Duration::from_secs(1)).await;

        counter += 1;
        if counter % 20 == 0 {
            let status = STATUS.lock(|s| s.get());
            info!(
                "System alive... leds={:#x} client={}",
                status.leds.mask(),
                status.client_connected
            );
        }
    }
}
