use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tutor_chat::cli::commands::{chat, configure, serve, voices};
use tutor_chat::cli::{Args, Command};
use tutor_chat::config::{ClientResolveOptions, ServerResolveOptions};
use tutor_chat::notice;
use tutor_chat::output::{self, OutputConfig};
use tutor_chat::translation::{print_languages, validate_language};
use tutor_chat::ui::Style;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let defaults = OutputConfig::default();
    output::init(OutputConfig {
        quiet: args.quiet,
        no_color: args.no_color || defaults.no_color,
    });

    // The relay logs requests; the chat client only surfaces warnings
    let default_filter = match args.command {
        Command::Serve { .. } => "info",
        _ => "warn",
    };
    init_tracing(default_filter);

    if let Err(e) = run(args.command).await {
        notice!("{} {e:#}", Style::error("Error:"));
        std::process::exit(exitcode::SOFTWARE);
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!output::is_no_color())
        .init();
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Serve {
            host,
            port,
            model,
            static_dir,
        } => {
            let options = ServerResolveOptions {
                host,
                port,
                model,
                static_dir,
            };
            serve::run_serve(options).await?;
        }
        Command::Chat {
            endpoint,
            to,
            no_translate,
            mute,
        } => {
            if let Some(ref lang) = to {
                validate_language(lang)?;
            }

            let options = ClientResolveOptions {
                endpoint,
                to,
                no_translate,
                mute,
            };
            chat::run_chat(options).await?;
        }
        Command::Configure { show } => {
            configure::run_configure(show)?;
        }
        Command::Languages => {
            print_languages();
        }
        Command::Voices => {
            voices::print_voices().await?;
        }
    }

    Ok(())
}
