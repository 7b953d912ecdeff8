use clap::{
    Args, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use playlist_migrator::{
    cli::{self, Selection},
    config::{self, MigratorConfig},
    error, info,
    spotify::{DemoApi, SpotifyApi},
    types::{AccountRole, Credential},
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
    /// List playlists of the source account
    List(ListOptions),

    /// Copy playlists from the source to the target account
    Migrate(MigrateOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Args, Debug, Clone)]
pub struct ModeOptions {
    /// Use built-in demo data instead of calling Spotify (no tokens needed)
    #[clap(long)]
    pub demo: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ListOptions {
    /// Access token of the source account
    #[clap(long, env = "MIGRATOR_SOURCE_TOKEN", hide_env_values = true)]
    pub source_token: Option<String>,

    #[command(flatten)]
    pub mode: ModeOptions,
}

#[derive(Parser, Debug, Clone)]
#[command(group(
    clap::ArgGroup::new("selection")
        .required(true)
        .args(["all", "playlist"]),
))]
pub struct MigrateOptions {
    /// Access token of the source account
    #[clap(long, env = "MIGRATOR_SOURCE_TOKEN", hide_env_values = true)]
    pub source_token: Option<String>,

    /// Access token of the target account
    #[clap(long, env = "MIGRATOR_TARGET_TOKEN", hide_env_values = true)]
    pub target_token: Option<String>,

    /// Copy every playlist of the source account
    #[clap(long)]
    pub all: bool,

    /// Playlist id or exact name to copy; can be repeated
    #[clap(long, num_args = 1)]
    pub playlist: Vec<String>,

    #[command(flatten)]
    pub mode: ModeOptions,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

/// Token from the flag, else from the configuration; exits when neither is set.
fn credential(
    flag: Option<String>,
    configured: Option<&Credential>,
    role: AccountRole,
) -> Credential {
    let credential = flag
        .map(Credential::new)
        .filter(|c| !c.is_empty())
        .or_else(|| configured.cloned());

    match credential {
        Some(c) => c,
        None => error!(
            "Missing {role} token. Pass --{role}-token or set MIGRATOR_{upper}_TOKEN.",
            role = role,
            upper = role.to_string().to_uppercase()
        ),
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }
    let config = MigratorConfig::from_env();

    let cli = Cli::parse();

    match cli.command {
        Command::List(opt) => {
            if opt.mode.demo || config.demo {
                info!("Demo mode: no requests are sent to Spotify.");
                cli::list_playlists(DemoApi::new(), DemoApi::source_credential()).await
            } else {
                let source = credential(
                    opt.source_token,
                    config.source_token.as_ref(),
                    AccountRole::Source,
                );
                cli::list_playlists(SpotifyApi::new(&config), source).await
            }
        }
        Command::Migrate(opt) => {
            let selection = if opt.all {
                Selection::All
            } else {
                Selection::Named(opt.playlist)
            };

            if opt.mode.demo || config.demo {
                info!("Demo mode: no requests are sent to Spotify.");
                cli::migrate(
                    DemoApi::new(),
                    DemoApi::source_credential(),
                    DemoApi::target_credential(),
                    selection,
                )
                .await
            } else {
                let source = credential(
                    opt.source_token,
                    config.source_token.as_ref(),
                    AccountRole::Source,
                );
                let target = credential(
                    opt.target_token,
                    config.target_token.as_ref(),
                    AccountRole::Target,
                );
                cli::migrate(SpotifyApi::new(&config), source, target, selection).await
            }
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
