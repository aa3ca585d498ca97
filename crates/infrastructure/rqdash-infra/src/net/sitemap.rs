use reqwest::Url;
use rqdash_core::EndpointKey;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteMapError {
    #[error("invalid monitor url {url}: {reason}")]
    InvalidBase { url: String, reason: String },
    #[error("monitor url {0} cannot be a base")]
    CannotBeBase(String),
    #[error("bad endpoint url from {base}: {reason}")]
    Join { base: String, reason: String },
}

/// Resolves endpoint keys against the monitor's base URL and optional prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteMap {
    base: Url,
}

impl SiteMap {
    pub fn new(base_url: &str, prefix: Option<&str>) -> Result<Self, SiteMapError> {
        let mut base = Url::parse(base_url).map_err(|e| SiteMapError::InvalidBase {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(SiteMapError::CannotBeBase(base_url.to_string()));
        }

        {
            let mut segs = base
                .path_segments_mut()
                .map_err(|_| SiteMapError::CannotBeBase(base_url.to_string()))?;
            segs.pop_if_empty();
            for seg in prefix
                .unwrap_or_default()
                .split('/')
                .filter(|s| !s.is_empty())
            {
                segs.push(seg);
            }
        }

        // `Url::join` replaces the last segment unless the path ends in a slash.
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn url(&self, endpoint: EndpointKey) -> Result<Url, SiteMapError> {
        self.base
            .join(endpoint.path())
            .map_err(|e| SiteMapError::Join {
                base: self.base.to_string(),
                reason: e.to_string(),
            })
    }
}
