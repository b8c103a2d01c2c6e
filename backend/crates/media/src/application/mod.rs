//! Application Layer - Use Cases
//!
//! Request pipeline: resolve → authenticate → (solve) → poll.

pub mod authenticate;
pub mod config;
pub mod poll_job;
pub mod resolve_media;
pub mod search_videos;

pub use authenticate::AuthenticateUseCase;
pub use poll_job::PollJobUseCase;
pub use resolve_media::{ResolveMediaInput, ResolveMediaUseCase};
pub use search_videos::SearchVideosUseCase;
