pub mod structs;
pub mod sentiment;
pub mod news;
pub mod filter;
pub mod text_serializer;

pub use structs::NewsDigest;
pub use sentiment::SentimentFetcher;
pub use news::NewsSentinel;
pub use filter::extract_digest;
