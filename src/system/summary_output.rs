use volley::ammo::{AmmoModel, StepRef};
use volley::runner::IterationReport;
use volley::source::{Source, VariableSource};

pub(crate) fn check_summary_lines(model: &AmmoModel) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!("Variable sources: {}", model.sources().len()));
    for source in model.sources() {
        let records = match source {
            Source::Inline(inline) => format!("{} variables", inline.literals().len()),
            Source::JsonFile(_) | Source::CsvFile(_) => source
                .record_count()
                .map_or_else(|| "not loaded".to_owned(), |count| format!("{} records", count)),
        };
        lines.push(format!("  {} ({}): {}", source.name(), source.kind(), records));
    }

    lines.push(format!("Requests: {}", model.steps().len()));
    for step in model.steps() {
        lines.push(format!(
            "  {} {} {} (templater: {}, postprocessors: {})",
            step.name,
            step.method,
            step.uri,
            step.templater.kind(),
            step.postprocessors.len()
        ));
    }

    lines.push(format!("Scenarios: {}", model.scenarios().len()));
    for scenario in model.scenarios() {
        let weight = scenario
            .weight
            .map_or_else(|| "default".to_owned(), |weight| weight.to_string());
        let wait = scenario.min_waiting_time.map_or_else(
            || "none".to_owned(),
            |wait| format!("{}ms", wait.as_millis()),
        );
        let requests = scenario
            .refs
            .iter()
            .filter(|step_ref| matches!(step_ref, StepRef::Request { .. }))
            .count();
        lines.push(format!(
            "  {} (weight: {}, min_waiting_time: {}, references: {}, requests: {})",
            scenario.name,
            weight,
            wait,
            scenario.refs.len(),
            requests
        ));
    }
    lines
}

pub(crate) fn iteration_line(iteration: u64, report: &IterationReport) -> String {
    let outcome = match report.failure.as_ref() {
        None => "ok".to_owned(),
        Some(failure) => format!("failed: {}", failure),
    };
    format!(
        "#{} {} steps={} elapsed_ms={} {}",
        iteration,
        report.scenario,
        report.samples.len(),
        report.elapsed.as_millis(),
        outcome
    )
}
