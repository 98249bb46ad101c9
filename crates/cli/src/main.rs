//! s3nav - terminal browser for S3-compatible object storage

use clap::Parser;

use s3nav::commands::{self, Cli};
use s3nav::exit_code::ExitCode;
use s3nav::logging;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.log_file.as_deref(), cli.debug) {
        eprintln!("Error: {e:#}");
        std::process::exit(ExitCode::GeneralError.as_i32());
    }

    let exit_code = commands::execute(cli);
    std::process::exit(exit_code.as_i32());
}
