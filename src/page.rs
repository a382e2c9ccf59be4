use reqwest::{header, Client};

use crate::{
    error::ExtractError,
    extract::{self, identifier, CandidateSet, Identifier},
    status::{done, fail, pending},
};

/// Sent with every page request. Deliberately not configurable.
pub const USER_AGENT: &str = "mp4-dl";

#[derive(Clone, Debug)]
pub struct Extraction {
    pub candidates: CandidateSet,
    pub identifier: Identifier,
}

#[derive(Clone, Debug, Default)]
pub struct PageResolver {
    pub client: Client,
}

impl PageResolver {
    pub fn new() -> PageResolver {
        PageResolver {
            client: Client::new(),
        }
    }

    /// Fetches `video_url` and collects the media links found on it.
    pub async fn resolve(&self, video_url: &str) -> Result<Extraction, ExtractError> {
        let identifier = identifier::derive(video_url);
        pending(format!("Fetching {} (id \"{}\")...", video_url, identifier).as_str());
        let page = self.fetch_page(video_url).await.map_err(|err| {
            fail(format!("Failed to fetch {}: {}", video_url, err).as_str());
            err
        })?;
        let candidates = extract::extract_candidates(&page);
        done(format!("Found {} mp4 link(s) on {}.", candidates.len(), video_url).as_str());
        Ok(Extraction {
            candidates,
            identifier,
        })
    }

    async fn fetch_page(&self, video_url: &str) -> Result<String, ExtractError> {
        let response = self
            .client
            .get(video_url)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await?;
        if !response.status().is_success() {
            Err(ExtractError::Upstream {
                status: response.status(),
            })?
        }
        Ok(response.text().await?)
    }
}
