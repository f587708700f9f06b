//! Trivia provider client.
//!
//! Provides the reqwest-backed Open Trivia Database client and the
//! token-aware batch prefetcher used by both game modes.

mod client;
mod prefetch;

pub use client::{OpenTdbClient, TriviaApi};
pub use prefetch::{PrefetchConfig, Prefetcher};
