use std::io;
use std::process::ExitCode;

use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt, EnvFilter};

use tripoly::session::run_session;

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_env("TRIPOLY_LOG"))
        .init();

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    match run_session(stdin, stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("tripoly: {e}");
            ExitCode::FAILURE
        }
    }
}
