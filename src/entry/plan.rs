use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use volley::args::{Command, OutputFormat, RunArgs, VolleyArgs};
use volley::config::{from_model, load_document, load_model, render_hcl, render_toml, to_model};
use volley::error::{AppError, AppResult};
use volley::runner::ScenarioRunner;
use volley::transport::HttpTransport;

use crate::system::summary_output::{check_summary_lines, iteration_line};

pub(super) enum RunPlan {
    Check(PathBuf),
    Convert {
        ammo: PathBuf,
        output: Option<PathBuf>,
        format: OutputFormat,
    },
    Run(RunArgs),
}

pub(super) fn build_plan(args: VolleyArgs) -> RunPlan {
    match args.command {
        Command::Check(check) => RunPlan::Check(check.ammo),
        Command::Convert(convert) => RunPlan::Convert {
            format: convert
                .format
                .unwrap_or_else(|| OutputFormat::for_path(convert.output.as_deref())),
            ammo: convert.ammo,
            output: convert.output,
        },
        Command::Run(run) => RunPlan::Run(run),
    }
}

pub(super) async fn execute_plan(plan: RunPlan) -> AppResult<()> {
    match plan {
        RunPlan::Check(ammo) => check(&ammo),
        RunPlan::Convert {
            ammo,
            output,
            format,
        } => convert(&ammo, output.as_deref(), format),
        RunPlan::Run(args) => run(args).await,
    }
}

fn check(ammo: &Path) -> AppResult<()> {
    let model = load_model(ammo)?;
    model.init_sources()?;
    for line in check_summary_lines(&model) {
        println!("{}", line);
    }
    println!("{}: ok", ammo.display());
    Ok(())
}

fn convert(ammo: &Path, output: Option<&Path>, format: OutputFormat) -> AppResult<()> {
    let model = to_model(load_document(ammo)?)?;
    let document = from_model(&model);
    let rendered = match format {
        OutputFormat::Toml => render_toml(&document)?,
        OutputFormat::Hcl => render_hcl(&document)?,
    };
    match output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            info!("Wrote {}.", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

async fn run(args: RunArgs) -> AppResult<()> {
    let model = load_model(&args.ammo)?;
    let transport = HttpTransport::from_base_url(&args.base_url).map_err(AppError::transport)?;
    let model = Arc::new(model);
    let runner = if args.scenario.is_some() {
        ScenarioRunner::pinned(model, Arc::new(transport))?
    } else {
        ScenarioRunner::new(model, Arc::new(transport))?
    };

    let mut failed: u64 = 0;
    for iteration in 1..=args.iterations.get() {
        let report = match args.scenario.as_deref() {
            Some(name) => runner.run_scenario(name).await?,
            None => runner.run_iteration().await?,
        };
        if !report.is_success() {
            failed = failed.saturating_add(1);
        }
        println!("{}", iteration_line(iteration, &report));
    }

    if failed > 0 {
        warn!(
            "{} of {} iterations failed.",
            failed,
            args.iterations.get()
        );
    }
    Ok(())
}
