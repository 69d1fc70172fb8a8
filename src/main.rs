use bcgmatrix::cli::{init_tracing, run, Cli};
use clap::Parser;

fn main() -> std::process::ExitCode {
    if let Err(e) = init_tracing() {
        eprintln!("warning: logging disabled: {e}");
    }

    run(Cli::parse())
}
