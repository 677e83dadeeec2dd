#![no_main]

use libfuzzer_sys::fuzz_target;
use volley::config::{from_model, render_toml, to_model, AmmoDocument};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let Ok(document) = toml::from_str::<AmmoDocument>(input) else {
            return;
        };
        if let Ok(model) = to_model(document) {
            let restored = from_model(&model);
            if let Ok(rendered) = render_toml(&restored) {
                let reparsed: Result<AmmoDocument, _> = toml::from_str(&rendered);
                debug_assert!(reparsed.is_ok());
                if let Ok(reparsed) = reparsed {
                    debug_assert!(to_model(reparsed).is_ok());
                }
            }
        }
    }
});
