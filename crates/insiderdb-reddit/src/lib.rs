//! Subreddit listing client and insider-alert text extraction.

mod client;
mod error;
mod parse;

pub use client::{RedditClient, RedditPost};
pub use error::RedditError;
pub use parse::parse_insider_alert;
