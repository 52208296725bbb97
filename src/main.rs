//! JobBlog CLI binary entry point.

use jobblog::cli::{commands, Cli, Commands};
use jobblog::error::{JobBlogError, RecoverySuggestion};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        if let Some(hint) = hint(&e) {
            eprintln!("{hint}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), JobBlogError> {
    let client = commands::connect(&cli.global).await?;
    match cli.command {
        Commands::Me => commands::handle_me(&client).await,
        Commands::Health => commands::handle_health(&client).await,
        Commands::Posts(args) => commands::handle_posts(&client, args.command).await,
        Commands::Calendar(args) => commands::handle_calendar(&client, args).await,
        Commands::Attachments(args) => commands::handle_attachments(&client, args.command).await,
        Commands::LoginUrl => commands::handle_login_url(&client),
        Commands::Logout => commands::handle_logout(&client).await,
    }
}

fn hint(error: &JobBlogError) -> Option<&'static str> {
    match error.recovery_suggestion() {
        RecoverySuggestion::SignInAgain => {
            Some("Sign in again: pass --refresh-token or set JOBBLOG_REFRESH_TOKEN")
        }
        RecoverySuggestion::RetryLater => Some("The server could not be reached; try again later"),
        RecoverySuggestion::CheckConfiguration => Some("Check JOBBLOG_* settings or your .env file"),
        RecoverySuggestion::FixInput | RecoverySuggestion::ContactSupport => None,
    }
}
