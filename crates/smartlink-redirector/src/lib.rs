//! Redirect resolution for short links.
//!
//! The [`RedirectorService`] turns a short code into its destination URL,
//! counting the click. Expired records are deleted on sight (lazy expiry), so
//! no lookup ever serves a link past its expiry even if the background sweeper
//! has not caught up yet.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use jiff::Timestamp;
//! use smartlink_core::{LinkRecord, NoopEvents, Repository, ShortCode};
//! use smartlink_redirector::RedirectorService;
//! use smartlink_storage::InMemoryRepository;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repository = Arc::new(InMemoryRepository::new());
//! let code = ShortCode::new("abc123")?;
//! repository
//!     .insert(LinkRecord::new(code.clone(), "https://example.com", None, Timestamp::now()))
//!     .await?;
//!
//! let service = RedirectorService::new(repository, Arc::new(NoopEvents));
//! let target = service.resolve(&code, Timestamp::now()).await?;
//! assert_eq!(target, "https://example.com");
//! # Ok(())
//! # }
//! ```

pub mod redirector;
pub mod service;

pub use redirector::Redirector;
pub use service::RedirectorService;
pub use smartlink_core::RedirectError;

pub type Result<T> = std::result::Result<T, RedirectError>;
