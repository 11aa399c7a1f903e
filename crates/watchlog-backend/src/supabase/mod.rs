pub mod auth;
pub mod client;
pub mod storage;
pub mod store;

pub use client::SupabaseClient;
