//! CLI entry point for the JobBlog client.

pub mod commands;

use std::path::PathBuf;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{ArgGroup, Args, Parser, Subcommand};

use crate::api::job_posts::local_date_time;
use crate::api::JobStatus;

/// JobBlog command-line client
#[derive(Parser, Debug)]
#[command(name = "jobblog", version, about = "Track job postings from the terminal")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection and credential options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// API base URL (defaults to JOBBLOG_API_BASE_URL or http://localhost:8080)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Refresh credential, sent as the refreshToken cookie
    #[arg(long, global = true, env = "JOBBLOG_REFRESH_TOKEN", hide_env_values = true)]
    pub refresh_token: Option<String>,

    /// Access token to start the session with
    #[arg(long, global = true, env = "JOBBLOG_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the signed-in account
    Me,
    /// Check that the API is reachable
    Health,
    /// Manage job postings
    Posts(PostsArgs),
    /// Show a month of postings grouped by closing day
    Calendar(CalendarArgs),
    /// Manage attachments
    Attachments(AttachmentsArgs),
    /// Print the Google sign-in URL
    LoginUrl,
    /// Sign out and invalidate the refresh credential
    Logout,
}

/// Arguments for the `posts` subcommand group.
#[derive(Parser, Debug)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub command: PostCommands,
}

#[derive(Subcommand, Debug)]
pub enum PostCommands {
    /// List your postings
    Mine,
    /// Show one posting
    Show { id: i64 },
    /// Postings closing within a date range (at least one bound)
    #[command(group(ArgGroup::new("range").required(true).multiple(true).args(["from", "to"])))]
    Search {
        /// First closing day (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last closing day (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Create a posting
    Create(CreatePostArgs),
    /// Change the status of a posting
    Status {
        id: i64,
        /// saved, applied, rejected, interviewed or expired
        status: JobStatus,
    },
    /// Delete a posting
    Delete { id: i64 },
}

/// Arguments for `jobblog posts create`.
#[derive(Parser, Debug)]
pub struct CreatePostArgs {
    #[arg(long)]
    pub company: String,

    #[arg(long)]
    pub title: String,

    /// Closing date (YYYY-MM-DD) or date-time (YYYY-MM-DDTHH:MM)
    #[arg(long, value_parser = parse_closing)]
    pub closing: NaiveDateTime,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long, default_value = "")]
    pub apply_url: String,

    #[arg(long, default_value = "saved")]
    pub status: JobStatus,
}

/// Arguments for the `calendar` subcommand.
#[derive(Parser, Debug)]
pub struct CalendarArgs {
    /// Month to show (YYYY-MM); defaults to the current month
    #[arg(long, value_parser = parse_month)]
    pub month: Option<NaiveDate>,
}

/// Arguments for the `attachments` subcommand group.
#[derive(Parser, Debug)]
pub struct AttachmentsArgs {
    #[command(subcommand)]
    pub command: AttachmentCommands,
}

#[derive(Subcommand, Debug)]
pub enum AttachmentCommands {
    /// Upload a file
    Upload {
        path: PathBuf,
        /// Override the detected content type
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Print a temporary download link
    DownloadUrl { id: i64 },
    /// Delete an attachment
    Delete { id: i64 },
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// A bare date closes at the last minute of that day.
fn parse_closing(raw: &str) -> Result<NaiveDateTime, String> {
    if let Some(at) = local_date_time::parse(raw) {
        return Ok(at);
    }
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(|day| day.and_time(NaiveTime::MIN) + Duration::minutes(24 * 60 - 1))
        .map_err(|_| format!("expected YYYY-MM-DD or YYYY-MM-DDTHH:MM, got '{raw}'"))
}

fn parse_month(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
        .map_err(|_| format!("expected YYYY-MM, got '{raw}'"))
}
