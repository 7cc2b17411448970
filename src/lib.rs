//! # CoBoard - Forum Service Client
//!
//! CoBoard is a board/forum service: boards hold forums, forums hold
//! schedulable topics, topics hold posts with comments and likes. Forums are
//! access-controlled by cohort-prefix or exact member-id entries, and users
//! keep bookmarks, a file archive, and a profile. This crate is the client
//! side: the decision logic, the typed backend contract, and a CLI front end.
//!
//! ## Features
//!
//! - **Access Resolution**: Pure decision functions for who may open a forum,
//!   with the requester always passed explicitly.
//! - **Topic Scheduling**: Publish/expiry gating at calendar-day resolution;
//!   expired topics stay readable but refuse interaction.
//! - **Slug Addressing**: The frozen forum-name-to-URL-slug transformation
//!   used by every forum route.
//! - **Typed API Client**: Every backend endpoint with typed payloads, no
//!   retries, timeouts from config.
//! - **Entry Validation**: Access entry shapes checked at input time with
//!   the exact user-facing messages.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use coboard::api::CoboardClient;
//! use coboard::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let requester = config.requester();
//!     let client = CoboardClient::new(config.api.clone());
//!
//!     let page = client.fetch_board("cpe").await?;
//!     for forum in &page.forums {
//!         let decision = page.resolve_forum_access(forum, &requester);
//!         println!("{}: {:?}", forum.forum.forum_name, decision);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`forum`] - Pure domain logic: access, scheduling, slugs, list filters
//! - [`models`] - Typed payloads for the backend contract
//! - [`api`] - The REST client
//! - [`config`] - Configuration loading and validation
//! - [`validation`] - Access entry validation
//! - [`logutil`] - Logging setup and log sanitization

pub mod api;
pub mod config;
pub mod forum;
pub mod logutil;
pub mod models;
pub mod validation;
