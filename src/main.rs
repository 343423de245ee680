use std::process::ExitCode;

mod app;
mod logging;

fn main() -> ExitCode {
    let args = farwrite::cli::parse();
    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
