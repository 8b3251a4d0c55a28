//! Offline front end for SoundStage: render wave files and inspect the direction grid.
//!
//! Set `RUST_LOG=debug` to watch filter switches as the source moves.
mod cli_args;
mod commands;
mod wav;

fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();

    let args = cli_args::CliArgs::parse();
    commands::dispatch_command(args)
}
