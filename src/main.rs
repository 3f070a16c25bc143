use std::net::SocketAddr;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use hpscan::{
    cli, config, error,
    types::{DATE_TYPE_MEASURED, InnerscanQuery, TAG_WEIGHT},
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in to HealthPlanet and print measurements
    Fetch(FetchOptions),

    /// Serve measurements over a local HTTP endpoint
    Serve(ServeOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct FetchOptions {
    /// 0 = registration date, 1 = measurement date
    #[clap(long, default_value_t = DATE_TYPE_MEASURED)]
    pub date_type: u8,

    /// Innerscan tag(s), comma separated (6021 = weight, 6022 = body fat)
    #[clap(long, default_value = TAG_WEIGHT)]
    pub tag: String,

    /// Print the series as JSON instead of a table
    #[clap(long)]
    pub json: bool,

    /// Per-request timeout in seconds
    #[clap(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Address to bind, overrides SERVER_ADDRESS
    #[clap(long)]
    pub addr: Option<SocketAddr>,

    /// Per-request timeout in seconds
    #[clap(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Fetch(opt) => {
            let query = InnerscanQuery {
                date_type: opt.date_type,
                tag: opt.tag,
            };
            cli::fetch(query, opt.json, opt.timeout).await
        }
        Command::Serve(opt) => cli::serve(opt.addr, opt.timeout).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
