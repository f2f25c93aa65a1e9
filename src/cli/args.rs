use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tutor")]
#[command(about = "Conversational English tutor backed by Gemini")]
#[command(version)]
pub struct Args {
    /// Suppress non-essential output
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the relay server (POST /api/chat plus static assets)
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides PORT)
        #[arg(short = 'p', long)]
        port: Option<u16>,

        /// Generative model name
        #[arg(short = 'm', long)]
        model: Option<String>,

        /// Directory served for non-API paths
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
    /// Practice a conversation with the tutor
    Chat {
        /// Relay URL
        #[arg(short = 'e', long)]
        endpoint: Option<String>,

        /// Language code replies are translated into (ISO 639-1, e.g., id, ja)
        #[arg(short = 't', long = "to")]
        to: Option<String>,

        /// Do not translate replies
        #[arg(long, conflicts_with = "to")]
        no_translate: bool,

        /// Do not speak replies aloud
        #[arg(long)]
        mute: bool,
    },
    /// Configure tutor settings
    Configure {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// List supported language codes
    Languages,
    /// List speech synthesizer voices
    Voices,
}
