use clap::Parser;
use gocab::cli::Cli;
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    gocab::logging::init(cli.verbose());
    cli.run()
}
