use std::process::ExitCode;

fn main() -> ExitCode {
    quotekit_cli::run()
}
