use std::path::{Path, PathBuf};

use reqwest::{Client, Response};
use tokio::io::AsyncWriteExt;

use crate::{
    error::RetrievalError,
    extract::Identifier,
    status::{done, pending},
};

mod partial;

pub use partial::PartialFile;

/// Saves candidate media urls to disk, one file per call.
#[derive(Clone, Debug, Default)]
pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new() -> Downloader {
        Downloader {
            client: Client::new(),
        }
    }

    /// Starts fetching `video_url`, failing on a non-success status.
    pub async fn fetch(&self, video_url: &str) -> Result<Response, RetrievalError> {
        pending(format!("Downloading {}...", video_url).as_str());
        let response = self.client.get(video_url).send().await?;
        if !response.status().is_success() {
            Err(RetrievalError::Status(response.status()))?
        }
        Ok(response)
    }

    /// Fetches `video_url` and stores the body as `{identifier}.mp4` in `out`,
    /// numbered like `{identifier} (1).mp4` when that name is taken.
    ///
    /// The body is written to a `.part` file first which only gets renamed
    /// once everything arrived. Any other exit removes it again.
    pub async fn download(
        &self,
        video_url: &str,
        identifier: &Identifier,
        out: &Path,
    ) -> Result<PathBuf, RetrievalError> {
        let destination = out.join(identifier.file_name());
        let mut response = self.fetch(video_url).await?;
        let (partial, mut file) = PartialFile::create(&destination).await?;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        drop(file);
        let saved = partial.persist().await?;
        done(format!("Saved {}.", saved.display()).as_str());
        Ok(saved)
    }
}
