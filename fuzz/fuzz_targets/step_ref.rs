#![no_main]

use libfuzzer_sys::fuzz_target;
use volley::ammo::StepRef;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(step_ref) = input.parse::<StepRef>() {
            let rendered = step_ref.to_string();
            debug_assert_eq!(rendered.parse::<StepRef>().ok(), Some(step_ref));
        }
    }
});
