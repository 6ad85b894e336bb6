//! AirStation Firmware — Main Entry Point
//!
//! Hexagonal architecture around a single cooperative control loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  StationHardware   PanelUart      Uplink        Esp32Time    │
//! │  (Sensor+Siren)    (PanelSink/    (WiFi+Report  (ClockPort)  │
//! │  LogEventSink       PanelSource)   +Alert)                   │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ────────────────────   │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │            StationService (pure logic)                 │  │
//! │  │  Schedule · Alarm · PanelLink · Readings               │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Boot order: peripherals → panel page 0 → WiFi + SNTP → blocking
//! clean-air calibration → page 1 → control loop.  The station is not
//! usable until calibration finishes.
#![deny(unused_must_use)]

use anyhow::{anyhow, Result};
use log::{info, warn};

use esp_idf_hal::gpio::PinDriver;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::sntp::EspSntp;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

use airstation::adapters::alert_http::HttpNotifier;
use airstation::adapters::hardware::StationHardware;
use airstation::adapters::log_sink::LogEventSink;
use airstation::adapters::panel_uart::PanelUart;
use airstation::adapters::report_http::HttpReporter;
use airstation::adapters::time::Esp32TimeAdapter;
use airstation::adapters::uplink::Uplink;
use airstation::adapters::wifi::WifiAdapter;
use airstation::app::ports::{ClockPort, ConnectivityPort};
use airstation::app::service::StationService;
use airstation::config::StationConfig;
use airstation::drivers;
use airstation::drivers::siren::SirenDriver;
use airstation::sensors::SensorHub;

// ── Site configuration ────────────────────────────────────────
//
// Network credentials and collaborator endpoints are build-time site
// constants; everything tunable at runtime lives in StationConfig.

const WIFI_SSID: &str = "airstation-site";
const WIFI_PASSWORD: &str = "change-me-on-site";
const REPORT_URL: &str = "https://ingest.example.com/airstation/rows";
const ALERT_URL: &str = "https://gateway.example.com/v1/messages";
const ALERT_TO: &str = "+50370000000";
const ALERT_FROM: &str = "+15550001111";

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("AirStation v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripherals and one-shot hardware init ─────────────
    let peripherals =
        Peripherals::take().map_err(|e| anyhow!("peripherals already taken: {e}"))?;

    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        // In production this triggers the watchdog reset after timeout.
        log::error!("HAL init failed: {e} — halting");
        #[allow(clippy::empty_loop)]
        loop {}
    }
    if let Err(e) = drivers::hw_init::init_isr_service() {
        log::error!("ISR service init failed: {e} — wind readings will stay 0");
    }

    let config = StationConfig::default();
    let clock = Esp32TimeAdapter::new();
    let mut events = LogEventSink::new();

    // ── 3. Construct adapters ─────────────────────────────────
    let siren_pin = PinDriver::output(peripherals.pins.gpio23)?;
    let mut hw = StationHardware::new(SensorHub::new(), SirenDriver::new(siren_pin));

    let mut panel = PanelUart::new().map_err(|e| anyhow!("panel UART: {e}"))?;

    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let esp_wifi = EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?;
    let wifi = WifiAdapter::new(
        BlockingWifi::wrap(esp_wifi, sysloop)?,
        WIFI_SSID,
        WIFI_PASSWORD,
    );
    let mut uplink = Uplink::new(
        wifi,
        HttpReporter::new(REPORT_URL, config.report_timeout_ms),
        HttpNotifier::new(ALERT_URL, ALERT_TO, ALERT_FROM, config.report_timeout_ms),
    );

    // ── 4. Service + boot sequence on the panel ───────────────
    let mut service = StationService::new(&config);

    service.panel().show_page(&mut panel, 0);
    service.panel().loading_progress(&mut panel, 0);

    service.panel().boot_status(&mut panel, "Connecting to WiFi...");
    service.panel().loading_progress(&mut panel, 12);
    let _sntp = match uplink.connect() {
        Ok(()) => {
            service.panel().boot_status(&mut panel, "WiFi connected");
            match EspSntp::new_default() {
                Ok(sntp) => Some(sntp),
                Err(e) => {
                    warn!("SNTP start failed ({e}); panel shows placeholder time");
                    None
                }
            }
        }
        Err(e) => {
            // Offline operation is degraded but valid: sampling, alarms
            // and the display keep running; reporting waits for poll()
            // to bring the link back.
            warn!("WiFi connect failed ({e}); continuing offline");
            service.panel().boot_status(&mut panel, "Connection failed");
            None
        }
    };
    service.panel().loading_progress(&mut panel, 25);

    // Blocking clean-air calibration (~5 s per channel).
    service.calibrate(&mut hw, &mut panel, &mut events);
    service.panel().loading_progress(&mut panel, 100);

    service.panel().boot_status(&mut panel, "Starting...");
    std::thread::sleep(std::time::Duration::from_millis(1000));
    service.panel().show_page(&mut panel, 1);

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        let now_ms = clock.uptime_ms();
        service.tick(now_ms, &mut hw, &mut panel, &mut uplink, &clock, &mut events);

        // WiFi reconnection poll (exponential backoff).
        uplink.poll();

        std::thread::sleep(std::time::Duration::from_millis(25));
    }
}
