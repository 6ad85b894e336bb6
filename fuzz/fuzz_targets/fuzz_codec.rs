//! Fuzz the panel command codec.
//!
//! Any object/value pair either encodes to a frame that ends in the
//! 3-byte terminator with no interior terminator bytes, or is rejected
//! with a buffer-overflow error — never a panic, never a malformed frame.

#![no_main]

use libfuzzer_sys::fuzz_target;

use airstation::display::codec;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let mut mid = text.len() / 2;
    while !text.is_char_boundary(mid) {
        mid += 1;
    }
    let (obj, value) = text.split_at(mid);

    if let Ok(frame) = codec::set_text(obj, value) {
        assert!(frame.len() >= 3);
        assert_eq!(&frame[frame.len() - 3..], &codec::TERMINATOR);
        assert!(
            !frame[..frame.len() - 3].windows(3).any(|w| w == codec::TERMINATOR),
            "terminator bytes must not appear inside the command text"
        );
    }
});
