pub mod client;
pub mod error;
pub mod retry;
pub mod types;

pub use client::PlacesClient;
pub use error::PlacesError;
pub use retry::retry_with_backoff;
pub use types::{Geocoded, SearchPage};
