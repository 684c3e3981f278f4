use std::process::ExitCode;

fn main() -> ExitCode {
    deploymap::cli::run()
}
