//! GPIO / peripheral pin assignments for the AirStation main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Gas sensors — Analog (ADC1)
// ---------------------------------------------------------------------------

/// MQ-2 (LPG / smoke / H2) — analog output via on-board divider.
pub const MQ2_ADC_GPIO: i32 = 32;
/// MQ-3 (alcohol / benzene).
pub const MQ3_ADC_GPIO: i32 = 33;
/// MQ-7 (carbon monoxide).
pub const MQ7_ADC_GPIO: i32 = 34;
/// MQ-135 (toluene / ammonia / CO2).
pub const MQ135_ADC_GPIO: i32 = 35;

/// ADC1 channel numbers for the MQ bank (GPIO 32–35 on classic ESP32).
pub const ADC1_CH_MQ2: u32 = 4;
pub const ADC1_CH_MQ3: u32 = 5;
pub const ADC1_CH_MQ7: u32 = 6;
pub const ADC1_CH_MQ135: u32 = 7;

// ---------------------------------------------------------------------------
// Climate sensor (DHT22, single-wire)
// ---------------------------------------------------------------------------

pub const DHT_GPIO: i32 = 21;

// ---------------------------------------------------------------------------
// Anemometer — open-collector pulse output, interrupt-driven
// ---------------------------------------------------------------------------

/// Falling-edge pulses, internal pull-up.
pub const ANEMOMETER_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Siren actuator
// ---------------------------------------------------------------------------

/// Digital output driving the siren relay (active HIGH).
pub const SIREN_GPIO: i32 = 23;

// ---------------------------------------------------------------------------
// Display panel UART
// ---------------------------------------------------------------------------

/// UART port number wired to the panel.
pub const PANEL_UART_PORT: u32 = 2;
pub const PANEL_UART_RX_GPIO: i32 = 16;
pub const PANEL_UART_TX_GPIO: i32 = 17;
pub const PANEL_UART_BAUD: u32 = 9600;
