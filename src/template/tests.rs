use std::collections::BTreeMap;
use std::sync::Barrier;

use http::Method;
use serde_json::json;

use super::*;
use crate::error::TemplateError;
use crate::scope::{Scope, Vars};

fn request(url: &str, headers: &[(&str, &str)], body: Option<&str>) -> RequestParts {
    RequestParts {
        method: Method::GET,
        url: url.to_owned(),
        headers: headers
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect::<BTreeMap<_, _>>(),
        body: body.map(str::to_owned),
    }
}

fn user_scope(id: &str) -> Scope {
    let users = Vars::from([("id".to_owned(), json!(id))]);
    let mut scope = Scope::seeded([("users".to_owned(), users)]);
    scope.insert("token", json!("abc"));
    scope
}

#[test]
fn text_templater_renders_every_field() -> Result<(), String> {
    let templater = StepTemplater::text();
    let mut parts = request(
        "/users/{{ source.users.id }}",
        &[("Authorization", "Bearer {{token}}")],
        Some(r#"{"id": "{{ .source.users.id }}"}"#),
    );
    templater
        .apply(&mut parts, &user_scope("7"), "s", "get_user")
        .map_err(|err| err.to_string())?;

    if parts.url != "/users/7" {
        return Err(format!("Unexpected url: {}", parts.url));
    }
    if parts.headers.get("Authorization").map(String::as_str) != Some("Bearer abc") {
        return Err(format!("Unexpected headers: {:?}", parts.headers));
    }
    if parts.body.as_deref() != Some(r#"{"id": "7"}"#) {
        return Err(format!("Unexpected body: {:?}", parts.body));
    }
    Ok(())
}

#[test]
fn cached_template_renders_each_scope() -> Result<(), String> {
    let templater = StepTemplater::text();

    let mut first = request("/users/{{ source.users.id }}", &[], None);
    templater
        .apply(&mut first, &user_scope("1"), "s", "get_user")
        .map_err(|err| err.to_string())?;
    let mut second = request("/users/{{ source.users.id }}", &[], None);
    templater
        .apply(&mut second, &user_scope("2"), "s", "get_user")
        .map_err(|err| err.to_string())?;

    if first.url != "/users/1" || second.url != "/users/2" {
        return Err(format!("Unexpected urls: {} {}", first.url, second.url));
    }
    if templater.cache().len() != 1 {
        return Err(format!(
            "Expected one cached template, got {}",
            templater.cache().len()
        ));
    }
    Ok(())
}

#[test]
fn concurrent_first_use_shares_one_entry() -> Result<(), String> {
    const WORKERS: usize = 8;
    let templater = StepTemplater::text();
    let barrier = Barrier::new(WORKERS);

    let outcomes: Vec<Result<(), String>> = std::thread::scope(|threads| {
        let handles: Vec<_> = (0..WORKERS)
            .map(|worker| {
                let templater = &templater;
                let barrier = &barrier;
                threads.spawn(move || {
                    let id = worker.to_string();
                    let mut parts = request(
                        "/users/{{ source.users.id }}",
                        &[("Authorization", "Bearer {{ token }}")],
                        None,
                    );
                    barrier.wait();
                    templater
                        .apply(&mut parts, &user_scope(&id), "s", "get_user")
                        .map_err(|err| err.to_string())?;
                    if parts.url != format!("/users/{}", id) {
                        return Err(format!("Worker {} rendered {}", worker, parts.url));
                    }
                    Ok(())
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .map_err(|panic| format!("Worker panicked: {:?}", panic))
                    .and_then(|outcome| outcome)
            })
            .collect()
    });

    for outcome in outcomes {
        outcome?;
    }
    if templater.cache().len() != 2 {
        return Err(format!(
            "Expected one entry per field, got {}",
            templater.cache().len()
        ));
    }
    Ok(())
}

#[test]
fn html_templater_escapes_values_only() -> Result<(), String> {
    let templater = StepTemplater::html();
    let mut scope = Scope::new();
    scope.insert("name", json!("<b>\"Tom\" & 'Jerry'</b>"));
    let mut parts = request("/", &[], Some("<p>{{ name }}</p>"));
    templater
        .apply(&mut parts, &scope, "s", "page")
        .map_err(|err| err.to_string())?;

    let expected = "<p>&lt;b&gt;&#34;Tom&#34; &amp; &#39;Jerry&#39;&lt;/b&gt;</p>";
    if parts.body.as_deref() != Some(expected) {
        return Err(format!("Unexpected body: {:?}", parts.body));
    }
    Ok(())
}

fn render_html(body: &str, scope: &Scope) -> Result<String, String> {
    let templater = StepTemplater::html();
    let mut parts = request("/", &[], Some(body));
    templater
        .apply(&mut parts, scope, "s", "page")
        .map_err(|err| err.to_string())?;
    parts.body.ok_or_else(|| "Expected a body".to_owned())
}

#[test]
fn html_templater_escapes_by_markup_context() -> Result<(), String> {
    let mut scope = Scope::new();
    scope.insert("q", json!("a b&c=d"));
    scope.insert("link", json!("javascript:alert(1)"));
    scope.insert("page", json!("/docs/a page"));
    scope.insert("title", json!("\"x\" y"));
    scope.insert("user", json!({"name": "</script>"}));
    scope.insert("quote", json!("it's"));

    let cases = [
        (
            r#"<a href="/search?q={{ q }}">go</a>"#,
            r#"<a href="/search?q=a%20b%26c%3Dd">go</a>"#,
        ),
        (
            r#"<a href="{{ link }}">x</a>"#,
            r#"<a href="about:invalid#blocked">x</a>"#,
        ),
        (
            r#"<img src="{{ page }}">"#,
            r#"<img src="/docs/a%20page">"#,
        ),
        (
            r#"<input value={{ title }}>"#,
            "<input value=&#34;x&#34;&#32;y>",
        ),
        (
            "<script>var user = {{ user }};</script>",
            r#"<script>var user = {"name":"\u003c/script\u003e"};</script>"#,
        ),
        (
            "<script>var s = '{{ quote }}';</script><p>{{ quote }}</p>",
            "<script>var s = 'it\\u0027s';</script><p>it&#39;s</p>",
        ),
        ("<!-- {{ q }} --><p>ok</p>", "<!--  --><p>ok</p>"),
    ];
    for (body, expected) in cases {
        let rendered = render_html(body, &scope)?;
        if rendered != expected {
            return Err(format!("Rendering {:?} gave {:?}, expected {:?}", body, rendered, expected));
        }
    }
    Ok(())
}

#[test]
fn html_templater_blocks_unsafe_attribute_names() -> Result<(), String> {
    let mut scope = Scope::new();
    scope.insert("attr", json!("onclick"));
    scope.insert("plain", json!("Disabled"));
    let rendered = render_html("<button {{ attr }}=1 {{ plain }}>", &scope)?;
    if rendered != "<button blocked=1 disabled>" {
        return Err(format!("Unexpected rendering: {}", rendered));
    }
    Ok(())
}

#[test]
fn missing_variable_is_rendering_error() -> Result<(), String> {
    let templater = StepTemplater::text();
    let mut parts = request("/users/{{ source.users.email }}", &[], None);
    match templater.apply(&mut parts, &user_scope("1"), "s", "get_user") {
        Err(TemplateError::MissingVariable { key, path })
            if key == "url" && path == "source.users.email" =>
        {
            Ok(())
        }
        other => Err(format!("Expected MissingVariable, got {:?}", other)),
    }
}

#[test]
fn header_error_stops_before_body() -> Result<(), String> {
    let templater = StepTemplater::text();
    let mut parts = request("/", &[("X-Id", "{{ unknown }}")], Some("{{ token }}"));
    match templater.apply(&mut parts, &user_scope("1"), "s", "step") {
        Err(TemplateError::MissingVariable { key, .. }) if key == "header:X-Id" => {}
        other => return Err(format!("Expected header failure, got {:?}", other)),
    }
    if parts.body.as_deref() != Some("{{ token }}") {
        return Err("Expected body to stay unrendered".to_owned());
    }
    Ok(())
}

#[test]
fn unterminated_placeholder_is_syntax_error() -> Result<(), String> {
    match Template::compile("body", "hello {{ name") {
        Err(TemplateError::Unterminated { offset, .. }) if offset == 6 => Ok(()),
        other => Err(format!("Expected Unterminated, got {:?}", other)),
    }
}

#[test]
fn invalid_paths_are_syntax_errors() -> Result<(), String> {
    for input in ["{{ }}", "{{ a..b }}", "{{ a b }}", "{{ . }}"] {
        match Template::compile("url", input) {
            Err(TemplateError::InvalidPlaceholder { .. }) => {}
            other => return Err(format!("Expected InvalidPlaceholder for {:?}, got {:?}", input, other)),
        }
    }
    Ok(())
}

#[test]
fn values_render_by_type() -> Result<(), String> {
    let mut scope = Scope::new();
    scope.insert("count", json!(3));
    scope.insert("flag", json!(true));
    scope.insert("none", json!(null));
    scope.insert("ids", json!(["a", "b"]));
    let template = Template::compile("body", "{{count}}|{{flag}}|{{none}}|{{ids}}|{{ids.1}}")
        .map_err(|err| err.to_string())?;
    let rendered = template.render_text(&scope).map_err(|err| err.to_string())?;
    if rendered != r#"3|true||["a","b"]|b"# {
        return Err(format!("Unexpected rendering: {}", rendered));
    }
    Ok(())
}

#[test]
fn templater_kinds_round_trip() -> Result<(), String> {
    for kind in [TEXT_KIND, HTML_KIND] {
        let templater = StepTemplater::from_kind(kind).ok_or("Expected known kind")?;
        if templater.kind() != kind {
            return Err(format!("Kind mismatch for {}", kind));
        }
    }
    if StepTemplater::from_kind("jinja").is_some() {
        return Err("Expected unknown templater to be rejected".to_owned());
    }
    if StepTemplater::default() != StepTemplater::text() || !StepTemplater::default().is_default() {
        return Err("Expected text to be the default templater".to_owned());
    }
    Ok(())
}
