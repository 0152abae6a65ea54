//! Background work of dinebot.
//!
//! - **Worker** (`dispatch`) - takes one dining request off the work queue, finds a
//!   matching restaurant and mails it to the requester
//! - **Seeder** (`seeder`, `directory`) - fills the restaurant store from the business
//!   directory, independent of the conversation path
//!
//! ```text
//! WorkQueue → Worker → SearchIndex → RestaurantStore → Mailer
//! DirectoryClient → Seeder → RestaurantStore
//! ```

pub mod directory;
pub mod dispatch;
pub mod mailer;
pub mod search;
pub mod seeder;
pub mod template;
pub mod wiring;

pub use directory::{Business, DirectoryClient, DirectoryQuery, HttpDirectoryClient};
pub use dispatch::{DispatchError, DispatchOutcome, Worker, NO_MATCH_ERROR};
pub use mailer::{Email, HttpMailer, LogMailer, Mailer};
pub use search::{HttpSearchIndex, SearchError, SearchIndex, StoreSearchIndex};
pub use seeder::{CuisineReport, SeedError, SeedReport, Seeder};
