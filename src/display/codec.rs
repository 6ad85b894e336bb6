//! Panel command codec.
//!
//! The display panel speaks a textual command protocol over serial where
//! every command is terminated by the fixed three-byte `0xFF 0xFF 0xFF`
//! marker:
//!
//! ```text
//! <object>.txt="<value>"ÿÿÿ        text field
//! <object>.val=<int>ÿÿÿ            numeric field (gauge / progress bar)
//! add <object>.id,<ch>,<0..255>ÿÿÿ waveform sample append
//! ```
//!
//! One encode function per command kind guarantees the framing and value
//! formatting are reproduced byte-for-byte; callers never concatenate
//! protocol strings by hand.

use core::fmt::Write as _;

use crate::error::DisplayError;

/// Command terminator required by the panel after every command.
pub const TERMINATOR: [u8; 3] = [0xFF, 0xFF, 0xFF];

/// Longest command text the codec accepts.
pub const MAX_CMD: usize = 93;
/// Full frame capacity (command + terminator).
pub const MAX_FRAME: usize = MAX_CMD + 3;

/// One fully framed panel command, ready for the UART.
pub type Frame = heapless::Vec<u8, MAX_FRAME>;

fn frame(cmd: &str) -> Result<Frame, DisplayError> {
    if cmd.len() > MAX_CMD {
        return Err(DisplayError::BufferOverflow);
    }
    let mut out = Frame::new();
    // Capacity checked above; extend cannot fail.
    let _ = out.extend_from_slice(cmd.as_bytes());
    let _ = out.extend_from_slice(&TERMINATOR);
    Ok(out)
}

/// Encode a text-field assignment: `<obj>.txt="<value>"`.
pub fn set_text(obj: &str, value: &str) -> Result<Frame, DisplayError> {
    let mut cmd: heapless::String<MAX_CMD> = heapless::String::new();
    write!(cmd, "{obj}.txt=\"{value}\"").map_err(|_| DisplayError::BufferOverflow)?;
    frame(&cmd)
}

/// Encode a numeric-field assignment: `<obj>.val=<int>`.
pub fn set_value(obj: &str, value: i32) -> Result<Frame, DisplayError> {
    let mut cmd: heapless::String<MAX_CMD> = heapless::String::new();
    write!(cmd, "{obj}.val={value}").map_err(|_| DisplayError::BufferOverflow)?;
    frame(&cmd)
}

/// Encode a waveform sample append: `add <obj>.id,<channel>,<sample>`.
/// The sample is a byte by construction, matching the widget's range.
pub fn waveform_append(obj: &str, channel: u8, sample: u8) -> Result<Frame, DisplayError> {
    let mut cmd: heapless::String<MAX_CMD> = heapless::String::new();
    write!(cmd, "add {obj}.id,{channel},{sample}").map_err(|_| DisplayError::BufferOverflow)?;
    frame(&cmd)
}

/// Frame a raw panel command verbatim (page switches, boot status).
pub fn raw(cmd: &str) -> Result<Frame, DisplayError> {
    frame(cmd)
}
