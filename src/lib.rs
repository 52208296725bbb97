//! JobBlog client
//!
//! Authenticated access to the JobBlog backend: an access-token session,
//! single-flight token refresh, a request pipeline that renews tokens
//! before they expire and retries once on a 401, and typed endpoints for
//! job posts, attachments and accounts.
//!
//! # Quick Start
//!
//! ```no_run
//! use jobblog::prelude::*;
//!
//! # async fn example() -> jobblog::error::Result<()> {
//! let client = JobBlogClient::new(ClientConfig::from_env(), Session::new())?;
//! client.oauth().bootstrap().await;
//! let posts = client.job_posts().list_mine().await?;
//! println!("{} postings", posts.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod calendar;
pub mod client;
pub mod config;
pub mod error;
pub mod prelude;

#[cfg(feature = "cli")]
pub mod cli;
