pub mod account;
pub mod client;
pub mod normalize;

pub use account::analyze_account;
pub use client::{GitHubClient, RemoteSource};
pub use normalize::{normalize_commit, ApiCommit, ApiRepo};
