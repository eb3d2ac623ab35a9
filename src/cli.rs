use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP daemon.
    Daemon {},

    /// Answer a single question from the terminal.
    Ask {
        /// The question to ask.
        message: String,
    },
}
