//! CLI command handlers.

use std::sync::Arc;

use chrono::{Datelike, Local};

use super::{AttachmentCommands, CalendarArgs, CreatePostArgs, GlobalArgs, PostCommands};
use crate::api::attachments::{format_file_size, guess_content_type};
use crate::api::{google_authorize_url, JobBlogClient, JobPostRequest, JobPostSummary};
use crate::auth::Session;
use crate::calendar::{calendar_days, group_by_closing_day, search_window};
use crate::client::HttpTransport;
use crate::config::ClientConfig;
use crate::error::{JobBlogError, Result};

/// Build a client from flags and environment, bootstrapping from the
/// refresh credential when no access token was given.
pub async fn connect(global: &GlobalArgs) -> Result<JobBlogClient> {
    let mut config = ClientConfig::from_env();
    if let Some(base_url) = &global.base_url {
        config = config.with_base_url(base_url.clone());
    }

    let transport = HttpTransport::new(&config)?;
    if let Some(refresh) = &global.refresh_token {
        transport.set_refresh_credential(refresh)?;
    }

    let session = Session::new();
    if let Some(access) = &global.access_token {
        session.set_token(access.as_str());
    }

    let client = JobBlogClient::with_transport(config, Arc::new(transport), session);
    if !client.session().is_authenticated() && global.refresh_token.is_some() {
        client.oauth().bootstrap().await;
    }
    Ok(client)
}

fn require_session(client: &JobBlogClient) -> Result<()> {
    if client.session().is_authenticated() {
        Ok(())
    } else {
        Err(JobBlogError::NotSignedIn)
    }
}

/// Handle `jobblog me`.
pub async fn handle_me(client: &JobBlogClient) -> Result<()> {
    require_session(client)?;
    println!("{}", client.users().me().await?);
    Ok(())
}

/// Handle `jobblog health`.
pub async fn handle_health(client: &JobBlogClient) -> Result<()> {
    if client.users().health().await {
        println!("ok: {}", client.config().base_url);
        Ok(())
    } else {
        Err(JobBlogError::Configuration(format!(
            "API at {} is not reachable",
            client.config().base_url
        )))
    }
}

fn print_summaries(posts: &[JobPostSummary]) {
    if posts.is_empty() {
        println!("No postings.");
        return;
    }
    for post in posts {
        println!(
            "{:>6}  {:<12}  {}  {} - {}",
            post.id,
            post.status.label(),
            post.closing_date_time.format("%Y-%m-%d %H:%M"),
            post.company_name,
            post.title
        );
    }
}

/// Handle `jobblog posts ...`.
pub async fn handle_posts(client: &JobBlogClient, command: PostCommands) -> Result<()> {
    require_session(client)?;
    let posts = client.job_posts();
    match command {
        PostCommands::Mine => print_summaries(&posts.list_mine().await?),
        PostCommands::Search { from, to } => print_summaries(&posts.search(from, to).await?),
        PostCommands::Show { id } => {
            let post = posts.get(id).await?;
            println!("{} - {}", post.company_name, post.title);
            println!("Status:  {}", post.status.label());
            println!("Closes:  {}", post.closing_date_time.format("%Y-%m-%d %H:%M"));
            if !post.apply_url.is_empty() {
                println!("Apply:   {}", post.apply_url);
            }
            if !post.description.is_empty() {
                println!();
                println!("{}", post.description);
            }
        }
        PostCommands::Create(args) => {
            let id = posts.create(&create_request(args)).await?;
            println!("Created posting {id}");
        }
        PostCommands::Status { id, status } => {
            posts.set_status(id, status).await?;
            println!("Posting {id} is now {}", status.label());
        }
        PostCommands::Delete { id } => {
            posts.delete(id).await?;
            println!("Deleted posting {id}");
        }
    }
    Ok(())
}

fn create_request(args: CreatePostArgs) -> JobPostRequest {
    JobPostRequest::builder()
        .company_name(args.company)
        .title(args.title)
        .description(args.description)
        .apply_url(args.apply_url)
        .closing_date_time(args.closing)
        .status(args.status)
        .build()
}

/// Handle `jobblog calendar`.
pub async fn handle_calendar(client: &JobBlogClient, args: CalendarArgs) -> Result<()> {
    require_session(client)?;
    let month = args.month.unwrap_or_else(|| Local::now().date_naive());
    let (from, to) = search_window(month);
    let posts = client.job_posts().search(Some(from), Some(to)).await?;
    let by_day = group_by_closing_day(&posts);

    println!("{}", month.format("%B %Y"));
    for day in calendar_days(month) {
        if day.month() != month.month() {
            continue;
        }
        let Some(closing) = by_day.get(&day) else {
            continue;
        };
        println!("{} ({})", day.format("%a %d"), closing.len());
        for post in closing {
            println!("    [{}] {} - {}", post.status.label(), post.company_name, post.title);
        }
    }
    Ok(())
}

/// Handle `jobblog attachments ...`.
pub async fn handle_attachments(client: &JobBlogClient, command: AttachmentCommands) -> Result<()> {
    require_session(client)?;
    let attachments = client.attachments();
    match command {
        AttachmentCommands::Upload { path, content_type } => {
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| {
                    JobBlogError::InvalidArgument(format!("not a file path: {}", path.display()))
                })?
                .to_string();
            let content_type = content_type.unwrap_or_else(|| guess_content_type(&file_name));
            let bytes = tokio::fs::read(&path).await?;
            let attachment = attachments.upload(&file_name, &content_type, bytes).await?;
            println!(
                "Uploaded {} ({}) as attachment {}",
                attachment.original_name,
                format_file_size(attachment.size),
                attachment.id
            );
        }
        AttachmentCommands::DownloadUrl { id } => {
            println!("{}", attachments.download_url(id).await?);
        }
        AttachmentCommands::Delete { id } => {
            attachments.delete(id).await?;
            println!("Deleted attachment {id}");
        }
    }
    Ok(())
}

/// Handle `jobblog login-url`.
pub fn handle_login_url(client: &JobBlogClient) -> Result<()> {
    let google = client.config().google.as_ref().ok_or_else(|| {
        JobBlogError::Configuration(
            "set JOBBLOG_GOOGLE_CLIENT_ID and JOBBLOG_GOOGLE_REDIRECT_URI".to_string(),
        )
    })?;
    println!("{}", google_authorize_url(google)?);
    Ok(())
}

/// Handle `jobblog logout`.
pub async fn handle_logout(client: &JobBlogClient) -> Result<()> {
    client.oauth().logout().await;
    println!("Signed out");
    Ok(())
}
