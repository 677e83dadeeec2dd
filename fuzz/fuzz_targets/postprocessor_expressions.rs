#![no_main]

use std::collections::BTreeMap;

use libfuzzer_sys::fuzz_target;
use volley::postprocess::{Extractor, HEADER_KIND, JSONPATH_KIND, XPATH_KIND};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        for kind in [HEADER_KIND, XPATH_KIND, JSONPATH_KIND] {
            let mapping = BTreeMap::from([("value".to_owned(), input.to_owned())]);
            let _ = Extractor::build("fuzz", kind, mapping);
        }
    }
});
