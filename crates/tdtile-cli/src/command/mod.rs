use clap::{Parser, Subcommand};

use self::episodes::EpisodesArg;

mod episodes;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Train the player by self-play with TD(0)
    Train(#[clap(flatten)] EpisodesArg),
    /// Play episodes without updating the player's weights
    Evaluate(#[clap(flatten)] EpisodesArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => episodes::run(&arg, true)?,
        Mode::Evaluate(arg) => episodes::run(&arg, false)?,
    }
    Ok(())
}
