use std::env;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use log::debug;
use swiftfmt_cli::cli_args::parse_arguments;
use swiftfmt_cli::dispatch::{Dispatcher, Outcome, Toolchain};
use swiftfmt_cli::report;
use swiftfmt_core::error::Result;
use swiftfmt_core::paths::HostEnvironment;

fn execute() -> Result<Outcome> {
    let args = parse_arguments(env::args_os())?;
    let host = HostEnvironment::from_process()?;

    let dispatcher = Dispatcher::new(Arc::new(Toolchain), host)
        .with_styled_errors(report::stderr_is_styled());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut err = io::stderr();
    let outcome = dispatcher.run(&args, io::stdin(), &mut out, &mut err)?;
    out.flush()?;
    Ok(outcome)
}

fn main() -> ExitCode {
    env_logger::init();

    match execute() {
        Ok(outcome) => {
            debug!("Finished: {outcome:?}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            report::print_error(&e);
            ExitCode::from(e.exit_code())
        }
    }
}
