#![no_main]

use libfuzzer_sys::fuzz_target;
use serde_json::json;
use volley::scope::Scope;
use volley::template::Template;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let mut scope = Scope::new();
        let seed = input.chars().take(32).collect::<String>();
        scope.insert("input", json!(seed));
        scope.insert("items", json!([{"id": 1}, {"id": 2}]));
        if let Ok(template) = Template::compile("fuzz", input) {
            let _ = template.render_text(&scope);
        }
    }
});
