//! Fuzz target: `SentryConfig::from_json`
//!
//! Arbitrary override documents must either be rejected or produce a
//! config that passes validation and can drive the patrol.
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use fireguard::config::SentryConfig;
use fireguard::control::patrol::PatrolController;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = core::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = SentryConfig::from_json(json) else {
        return;
    };

    assert!(config.validate().is_ok());

    let mut patrol = PatrolController::new(&config).expect("validated config builds a patrol");
    for _ in 0..64 {
        patrol.advance();
        assert!(patrol.position() < config.sweep_range_steps);
    }
});
