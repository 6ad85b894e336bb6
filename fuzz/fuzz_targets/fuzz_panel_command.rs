//! Fuzz the inbound panel-command parser.
//!
//! Arbitrary bytes off the panel UART must never panic the parser, and
//! must never toggle a pause flag unless the line is exactly one of the
//! documented commands.

#![no_main]

use libfuzzer_sys::fuzz_target;

use airstation::display::{PanelLink, PauseFlags};

fuzz_target!(|data: &[u8]| {
    let Ok(line) = core::str::from_utf8(data) else {
        return;
    };

    let mut link = PanelLink::new();
    let toggled = link.handle_command(line);

    if toggled {
        assert_ne!(
            link.flags(),
            PauseFlags::default(),
            "a recognised command must flip exactly one flag"
        );
        assert!(
            line.trim_matches(|c: char| c == '\0' || c.is_whitespace())
                .ends_with("_toggle"),
            "only *_toggle commands may be recognised"
        );
    } else {
        assert_eq!(link.flags(), PauseFlags::default());
    }
});
