mod support;

use std::path::Path;

use tempfile::tempdir;

use support::{describe, run_volley, spawn_http_server_or_skip, write_file};

fn block_document(users_csv: &Path, filters_json: &Path) -> String {
    format!(
        r#"
[[variable_source]]
name = "users"
type = "file/csv"
file = "{users}"
fields = ["user_id", "name", "pass"]
ignore_first_line = true
delimiter = ","

[[variable_source]]
name = "filter_src"
type = "file/json"
file = "{filters}"

[[variable_source]]
name = "variables"
type = "variables"
variables = {{ header = "yandex", b = "s" }}

[[request]]
name = "auth_req"
method = "POST"
uri = "/auth"
body = '{{"user_id": "{{{{ source.users.user_id }}}}"}}'
headers = {{ Content-Type = "application/json", Useragent = "{{{{ source.variables.header }}}}" }}

[[request.postprocessor]]
type = "var/jsonpath"
mapping = {{ token = "$.token" }}

[[request]]
name = "list_req"
method = "GET"
uri = "/list/{{{{ source.filter_src.filter }}}}?token={{{{ token }}}}"

[[request.postprocessor]]
type = "var/jsonpath"
mapping = {{ listed = "$.path" }}

[[request.postprocessor]]
type = "var/header"
mapping = {{ kind = "Content-Type|lower" }}

[[scenario]]
name = "scenario1"
weight = 50
min_waiting_time = 10
requests = ["auth_req(1)", "sleep(5)", "list_req(1)", "list_req(2)"]

[[scenario]]
name = "scenario2"
requests = ["auth_req", "list_req(2)"]
"#,
        users = users_csv.display(),
        filters = filters_json.display(),
    )
}

fn prep_document(dir: &Path) -> Result<std::path::PathBuf, String> {
    let users = write_file(dir, "users.csv", "id,name,pass\n1,ann,x\n2,bob,y\n")?;
    let filters = write_file(dir, "filter.json", r#"[{"filter": "new"}, {"filter": "hot"}]"#)?;
    write_file(dir, "ammo.toml", &block_document(&users, &filters))
}

#[test]
fn e2e_check_block_document() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let ammo = prep_document(dir.path())?;

    let output = run_volley([Path::new("check"), ammo.as_path()])?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    for expected in [
        "Variable sources: 3",
        "users (file/csv): 2 records",
        "variables (variables): 2 variables",
        "Scenarios: 2",
        "scenario1 (weight: 50, min_waiting_time: 10ms, references: 4, requests: 3)",
    ] {
        if !stdout.contains(expected) {
            return Err(format!("Missing {:?}\n{}", expected, describe(&output)));
        }
    }
    Ok(())
}

#[test]
fn e2e_check_rejects_unresolved_reference() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let ammo = write_file(
        dir.path(),
        "ammo.yaml",
        r#"
requests:
  - name: ping
    method: GET
    uri: /ping
scenarios:
  - name: broken
    requests: ["ping", "pong(2)"]
"#,
    )?;

    let output = run_volley([Path::new("check"), ammo.as_path()])?;
    if output.status.success() {
        return Err(format!("Expected failure\n{}", describe(&output)));
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.contains("pong") {
        return Err(format!("Expected the unknown request to be named\n{}", describe(&output)));
    }
    Ok(())
}

#[test]
fn e2e_check_rejects_missing_source_file() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let missing = dir.path().join("absent.json");
    let ammo = write_file(
        dir.path(),
        "ammo.json",
        &format!(
            r#"{{"variable_sources": [{{"name": "users", "type": "file/json", "file": "{}"}}]}}"#,
            missing.display()
        ),
    )?;

    let output = run_volley([Path::new("check"), ammo.as_path()])?;
    if output.status.success() {
        return Err(format!("Expected failure\n{}", describe(&output)));
    }
    Ok(())
}

#[test]
fn e2e_convert_yaml_to_toml() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let ammo = write_file(
        dir.path(),
        "ammo.yml",
        r#"
variable_sources:
  - name: vars
    type: variables
    variables:
      host: yandex
requests:
  - name: page
    method: get
    uri: /{{ source.vars.host }}
    templater:
      type: html
    postprocessors:
      - type: var/xpath
        mapping:
          title: //title
scenarios:
  - name: browse
    weight: 0
    min_waiting_time: 0
    requests: [page, sleep(50), page(2)]
"#,
    )?;
    let converted = dir.path().join("converted.toml");

    let output = run_volley([
        Path::new("convert"),
        ammo.as_path(),
        Path::new("--output"),
        converted.as_path(),
    ])?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let rendered = std::fs::read_to_string(&converted)
        .map_err(|err| format!("read converted failed: {}", err))?;
    for expected in [
        "[[variable_source]]",
        "[[request]]",
        "[[request.postprocessor]]",
        "templater = \"html\"",
        "method = \"GET\"",
        "weight = 0",
        "min_waiting_time = 0",
        "\"page(1)\"",
        "\"sleep(50)\"",
    ] {
        if !rendered.contains(expected) {
            return Err(format!("Missing {:?} in:\n{}", expected, rendered));
        }
    }

    let recheck = run_volley([Path::new("check"), converted.as_path()])?;
    if !recheck.status.success() {
        return Err(describe(&recheck));
    }
    Ok(())
}

#[test]
fn e2e_convert_prints_to_stdout() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let ammo = prep_document(dir.path())?;

    let output = run_volley([Path::new("convert"), ammo.as_path()])?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.contains("name = \"scenario2\"") || stdout.contains("templater") {
        return Err(format!("Unexpected rendering\n{}", describe(&output)));
    }
    Ok(())
}

#[test]
fn e2e_convert_to_hcl_follows_output_extension() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let ammo = prep_document(dir.path())?;
    let converted = dir.path().join("converted.hcl");

    let output = run_volley([
        Path::new("convert"),
        ammo.as_path(),
        Path::new("--output"),
        converted.as_path(),
    ])?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let rendered = std::fs::read_to_string(&converted)
        .map_err(|err| format!("read converted failed: {}", err))?;
    for expected in [
        r#"variable_source "users" "file/csv" {"#,
        r#"request "auth_req" {"#,
        r#"postprocessor "var/jsonpath" {"#,
        r#"scenario "scenario2" {"#,
    ] {
        if !rendered.contains(expected) {
            return Err(format!("Missing {:?} in:\n{}", expected, rendered));
        }
    }

    let recheck = run_volley([Path::new("check"), converted.as_path()])?;
    if !recheck.status.success() {
        return Err(describe(&recheck));
    }
    let stdout = String::from_utf8_lossy(&recheck.stdout);
    if !stdout.contains("Scenarios: 2") || !stdout.contains("users (file/csv): 2 records") {
        return Err(format!("Unexpected check output\n{}", describe(&recheck)));
    }
    Ok(())
}

#[test]
fn e2e_run_against_local_server() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let ammo = prep_document(dir.path())?;

    let output = run_volley([
        "run",
        &*ammo.to_string_lossy(),
        "--base-url",
        url.as_str(),
        "--iterations",
        "3",
        "--scenario",
        "scenario1",
    ])?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    for iteration in 1..=3 {
        let expected = format!("#{} scenario1 steps=4", iteration);
        if !stdout.contains(&expected) {
            return Err(format!("Missing {:?}\n{}", expected, describe(&output)));
        }
    }
    if stdout.contains("failed") {
        return Err(format!("Unexpected failed iteration\n{}", describe(&output)));
    }
    Ok(())
}
