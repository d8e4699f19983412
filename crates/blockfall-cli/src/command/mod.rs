use clap::{Parser, Subcommand};

use self::{generate::GenerateArg, play::PlayArg, simulate::SimulateArg};

mod generate;
mod play;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play pieces read from the line protocol
    Play(#[clap(flatten)] PlayArg),
    /// Play a generated piece sequence and report the final statistics
    Simulate(#[clap(flatten)] SimulateArg),
    /// Print a random piece sequence in the line protocol
    Generate(#[clap(flatten)] GenerateArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::Generate(arg) => generate::run(&arg)?,
    }
    Ok(())
}
