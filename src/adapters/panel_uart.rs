//! Panel UART adapter.
//!
//! Implements [`PanelSink`] and [`PanelSource`] over the UART wired to
//! the display panel (9600 8N1).  Outbound frames are written as-is —
//! the codec already appended the terminator.  Inbound bytes are
//! assembled into single-line commands terminated by `\n` or NUL.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: raw `uart_*` sys calls against UART2.
//! - **all other targets**: outbound frames are dropped after a trace
//!   log; no inbound traffic.  Host tests exercise the domain with mock
//!   panel ports instead.

#[cfg(not(target_os = "espidf"))]
use log::trace;
use log::warn;

use crate::app::ports::{PanelSink, PanelSource, MAX_PANEL_COMMAND};
#[cfg(target_os = "espidf")]
use crate::pins;

pub struct PanelUart {
    /// Inbound line assembly buffer.
    line: heapless::String<MAX_PANEL_COMMAND>,
    /// Set after an overflow: discard bytes until the next terminator.
    discarding: bool,
}

impl PanelUart {
    /// Install and configure the UART driver.
    #[cfg(target_os = "espidf")]
    pub fn new() -> Result<Self, crate::Error> {
        use esp_idf_svc::sys::*;

        let config = uart_config_t {
            baud_rate: pins::PANEL_UART_BAUD as i32,
            data_bits: uart_word_length_t_UART_DATA_8_BITS,
            parity: uart_parity_t_UART_PARITY_DISABLE,
            stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
            flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
            ..Default::default()
        };
        // SAFETY: one-shot driver install against a dedicated UART port,
        // called once from main() before the control loop.
        unsafe {
            let port = pins::PANEL_UART_PORT as i32;
            if uart_param_config(port, &config) != ESP_OK {
                return Err(crate::Error::Init("panel UART param config"));
            }
            if uart_set_pin(
                port,
                pins::PANEL_UART_TX_GPIO,
                pins::PANEL_UART_RX_GPIO,
                -1,
                -1,
            ) != ESP_OK
            {
                return Err(crate::Error::Init("panel UART pin mux"));
            }
            if uart_driver_install(port, 256, 0, 0, core::ptr::null_mut(), 0) != ESP_OK {
                return Err(crate::Error::Init("panel UART driver install"));
            }
        }
        Ok(Self {
            line: heapless::String::new(),
            discarding: false,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Result<Self, crate::Error> {
        Ok(Self {
            line: heapless::String::new(),
            discarding: false,
        })
    }

    #[cfg(target_os = "espidf")]
    fn read_byte(&mut self) -> Option<u8> {
        let mut byte = 0u8;
        // SAFETY: zero-timeout read against the installed driver; returns
        // the number of bytes actually read.
        let n = unsafe {
            esp_idf_svc::sys::uart_read_bytes(
                pins::PANEL_UART_PORT as i32,
                (&mut byte as *mut u8).cast(),
                1,
                0,
            )
        };
        (n == 1).then_some(byte)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_byte(&mut self) -> Option<u8> {
        None
    }

    /// Feed one inbound byte; returns the completed line on a terminator.
    fn push_byte(&mut self, byte: u8) -> Option<heapless::String<MAX_PANEL_COMMAND>> {
        if byte == b'\n' || byte == 0 {
            let complete = (!self.discarding && !self.line.is_empty()).then(|| self.line.clone());
            self.discarding = false;
            self.line.clear();
            return complete;
        }
        if self.discarding {
            return None;
        }
        if self.line.push(byte as char).is_err() {
            // Overlong garbage — discard through the next terminator.
            warn!("panel: inbound line overflow, dropping");
            self.line.clear();
            self.discarding = true;
        }
        None
    }
}

impl PanelSink for PanelUart {
    #[cfg(target_os = "espidf")]
    fn send(&mut self, frame: &[u8]) {
        // SAFETY: blocking write of a short frame into the TX FIFO.
        let written = unsafe {
            esp_idf_svc::sys::uart_write_bytes(
                pins::PANEL_UART_PORT as i32,
                frame.as_ptr().cast(),
                frame.len(),
            )
        };
        if written < 0 || written as usize != frame.len() {
            warn!("panel: short UART write ({written} of {})", frame.len());
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn send(&mut self, frame: &[u8]) {
        trace!("panel(sim): {} bytes", frame.len());
    }
}

impl PanelSource for PanelUart {
    fn poll_command(&mut self) -> Option<heapless::String<MAX_PANEL_COMMAND>> {
        // Drain at most one line per poll; stop at the first terminator.
        while let Some(byte) = self.read_byte() {
            if let Some(line) = self.push_byte(byte) {
                return Some(line);
            }
        }
        None
    }
}
