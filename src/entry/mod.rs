mod plan;

use clap::{CommandFactory, FromArgMatches};

use volley::args::VolleyArgs;
use volley::error::AppResult;
use plan::{build_plan, execute_plan};

pub(crate) fn run() -> AppResult<()> {
    let matches = VolleyArgs::command().get_matches();
    let args = VolleyArgs::from_arg_matches(&matches)?;

    crate::system::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(execute_plan(build_plan(args)))
}
