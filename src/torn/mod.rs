pub mod client;
pub mod fetcher;
pub mod fixture;
pub mod models;

pub use client::TornApi;
pub use fetcher::{collect_records, Fetcher, HttpTransport, Page, PageRequest, Transport};
pub use fixture::FixtureTransport;
pub use models::{FactionId, PlayerId};
