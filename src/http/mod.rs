//! HTTP layer: client wrapper and fetched-page representation

pub mod client;

pub use client::{FetchedPage, HttpClient};
