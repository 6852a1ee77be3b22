use std::process::ExitCode;

fn main() -> ExitCode {
    menucheck_cli::run()
}
