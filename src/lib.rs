pub mod downloader;
pub mod error;
pub mod extract;
pub mod page;
pub mod server;
pub mod status;

pub use downloader::Downloader;
pub use error::{ExtractError, RetrievalError};
pub use extract::{CandidateSet, Identifier};
pub use page::{Extraction, PageResolver};
