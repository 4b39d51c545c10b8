mod fetcher;
mod fs_source;
mod http_source;
mod routing;
mod source;

pub use fetcher::DocumentFetcher;
pub use fs_source::FilesystemSource;
pub use http_source::{HttpSource, DEFAULT_FETCH_TIMEOUT};
pub use routing::RoutingSource;
pub use source::{is_http_location, join_location, DocumentSource};
