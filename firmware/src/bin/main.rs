#![no_std]
#![no_main]

use autopilot_firmware::input::{
    CrsfInput, CrsfTelemetry, GpsBytes, GpsQueue, GpsReceiver, SharedChannels,
};
use autopilot_firmware::servo::{servo_config, AileronServo, SERVO_CENTER_US};
use autopilot_firmware::{
    Autopilot, ControlMode, ControlOutput, BEARING, CONTROL_TICK_HZ, DEFAULT_CHANNEL_MAP,
    DEFAULT_GAINS, ORIENTATION,
};
use crsf_proto::{RcChannels, CRSF_BAUDRATE_ELRS};
use defmt::{error, info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{UART0, UART1};
use embassy_rp::pwm::Pwm;
use embassy_rp::uart::{Config as UartConfig, Uart};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};
use nmea_proto::{NavFix, GPS_BAUDRATE};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

#[cfg(feature = "gps-echo")]
type Echo = autopilot_firmware::DefmtEcho;
#[cfg(not(feature = "gps-echo"))]
type Echo = nmea_proto::NoEcho;

bind_interrupts!(struct Irqs {
    UART0_IRQ => embassy_rp::uart::InterruptHandler<UART0>;
    UART1_IRQ => embassy_rp::uart::InterruptHandler<UART1>;
});

/// GPS bytes waiting for the next control tick.
static GPS_QUEUE: GpsQueue = GpsQueue::new();

/// Latest RC channels; all zero (manual) until the first CRSF frame.
static RC_CHANNELS: SharedChannels = SharedChannels::new(RcChannels::new());

/// Signal for passing the control output to the servo task.
/// Using Signal instead of Channel provides "latest value wins" semantics:
/// the servo only ever needs the most recent command.
static OUTPUT_SIGNAL: StaticCell<Signal<CriticalSectionRawMutex, ControlOutput>> =
    StaticCell::new();

/// Signal for passing each committed fix to the telemetry task.
static FIX_SIGNAL: StaticCell<Signal<CriticalSectionRawMutex, NavFix>> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Autopilot starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    let outputs = OUTPUT_SIGNAL.init(Signal::new());
    let fixes = FIX_SIGNAL.init(Signal::new());

    // --- GPS UART Setup ---
    let mut gps_config = UartConfig::default();
    gps_config.baudrate = GPS_BAUDRATE;

    let gps_uart = Uart::new(
        p.UART0,
        p.PIN_0, // TX
        p.PIN_1, // RX
        Irqs,
        p.DMA_CH0,
        p.DMA_CH1,
        gps_config,
    );
    let (_gps_tx, gps_rx) = gps_uart.split();
    let gps_input = GpsReceiver::new(gps_rx, &GPS_QUEUE);

    // --- CRSF UART Setup ---
    let mut crsf_config = UartConfig::default();
    crsf_config.baudrate = CRSF_BAUDRATE_ELRS;

    let crsf_uart = Uart::new(
        p.UART1,
        p.PIN_8, // TX
        p.PIN_9, // RX
        Irqs,
        p.DMA_CH2,
        p.DMA_CH3,
        crsf_config,
    );
    let (crsf_tx, crsf_rx) = crsf_uart.split();
    let crsf_input = CrsfInput::new(crsf_rx, &RC_CHANNELS);
    let telemetry = CrsfTelemetry::new(crsf_tx);

    // --- Servo Setup ---
    let pwm_config = servo_config(embassy_rp::clocks::clk_sys_freq(), SERVO_CENTER_US);
    let pwm = Pwm::new_output_a(p.PWM_SLICE1, p.PIN_2, pwm_config.clone());
    let servo = AileronServo::new(pwm, pwm_config);

    // On-board LED for link error indication
    let led = Output::new(p.PIN_25, Level::Low);

    let autopilot = Autopilot::with_echo(DEFAULT_GAINS, DEFAULT_CHANNEL_MAP, Echo::default());

    // Spawn tasks (unwrap the SpawnToken, then spawn)
    spawner.spawn(gps_task(gps_input).unwrap());
    spawner.spawn(crsf_task(crsf_input, led).unwrap());
    spawner.spawn(telemetry_task(telemetry, fixes).unwrap());
    spawner.spawn(servo_task(servo, outputs).unwrap());
    let gps_bytes = GpsBytes::new(&GPS_QUEUE);
    spawner.spawn(control_task(autopilot, gps_bytes, outputs, fixes).unwrap());

    info!("Autopilot initialized, manual until the first RC frame");
}

/// GPS task - moves UART bytes into the queue.
#[embassy_executor::task]
async fn gps_task(mut gps: GpsReceiver<'static>) {
    loop {
        if let Err(e) = gps.receive().await {
            warn!("GPS UART error: {:?}", e);
        }
    }
}

/// CRSF task - parses RC frames and publishes the channel snapshot.
#[embassy_executor::task]
async fn crsf_task(mut input: CrsfInput<'static>, mut led: Output<'static>) {
    loop {
        if let Err(e) = input.receive().await {
            error!("CRSF input error: {:?}", e);
            // Toggle LED to indicate error
            led.toggle();
        }
    }
}

/// Telemetry task - reports each new fix to the transmitter.
#[embassy_executor::task]
async fn telemetry_task(
    mut telemetry: CrsfTelemetry<'static>,
    fixes: &'static Signal<CriticalSectionRawMutex, NavFix>,
) {
    loop {
        let fix = fixes.wait().await;
        if let Err(e) = telemetry.send_fix(&fix).await {
            warn!("Telemetry error: {:?}", e);
        }
    }
}

/// Control task - one cycle per tick over a single input snapshot.
#[embassy_executor::task]
async fn control_task(
    mut autopilot: Autopilot<Echo>,
    mut gps: GpsBytes,
    outputs: &'static Signal<CriticalSectionRawMutex, ControlOutput>,
    fixes: &'static Signal<CriticalSectionRawMutex, NavFix>,
) {
    let mut ticker = Ticker::every(Duration::from_hz(CONTROL_TICK_HZ));

    loop {
        ticker.next().await;

        if autopilot.drain_gps(&mut gps) {
            let fix = *autopilot.fix();
            info!("Fix: heading {} deg, {} m/s", fix.heading_deg, fix.speed_mps());
            fixes.signal(fix);
        }

        let channels = RC_CHANNELS.snapshot();
        let inputs = autopilot.sample(&ORIENTATION, &BEARING, &channels);
        outputs.signal(autopilot.step(&inputs));
    }
}

/// Servo task - applies the latest aileron command.
#[embassy_executor::task]
async fn servo_task(
    mut servo: AileronServo<'static>,
    outputs: &'static Signal<CriticalSectionRawMutex, ControlOutput>,
) {
    let mut mode: Option<ControlMode> = None;

    loop {
        let out = outputs.wait().await;
        let pulse = servo.set_command(out.aileron);
        if mode != Some(out.mode) {
            info!("Aileron {} at {} us", out.mode, pulse);
            mode = Some(out.mode);
        }
    }
}
