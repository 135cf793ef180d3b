//! Fuzz target: NVS config blob decoding at boot
//!
//! Stores arbitrary bytes as the persisted config blob and runs the boot
//! resolution path.  Invariants checked:
//! - No panics under any byte sequence
//! - The resolved config always passes `validate()`
//! - A blob that decodes to a valid config is used verbatim
//!
//! cargo fuzz run fuzz_config_blob

#![no_main]

use ledtoggle::adapters::nvs::NvsAdapter;
use ledtoggle::app::ports::ConfigPort;
use ledtoggle::config::SystemConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(mut nvs) = NvsAdapter::new() else {
        return;
    };
    nvs.put_raw(data);
    let decoded = nvs.load();

    let cfg = SystemConfig::load_or_default(&mut nvs);
    assert!(cfg.validate().is_ok(), "boot config must be valid");

    if let Ok(stored) = decoded {
        if stored.validate().is_ok() {
            assert_eq!(cfg, stored);
        }
    }
});
