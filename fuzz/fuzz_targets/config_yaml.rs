#![no_main]

use libfuzzer_sys::fuzz_target;
use volley::config::{from_model, to_model, AmmoDocument};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let Ok(document) = serde_yaml::from_str::<AmmoDocument>(input) else {
            return;
        };
        if let Ok(model) = to_model(document) {
            let round_trip = to_model(from_model(&model));
            debug_assert!(round_trip.is_ok());
            if let Ok(round_trip) = round_trip {
                debug_assert!(round_trip == model);
            }
        }
    }
});
