use thiserror::Error;

#[derive(Debug, Error)]
pub enum SlidesError {
    #[error("request to SlidesGPT failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid SlidesGPT API URL: {0}")]
    InvalidUrl(String),

    #[error("SlidesGPT returned a body that is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("SlidesGPT response (HTTP {status}) carried no presentation id")]
    MissingId { status: u16 },

    #[error("SlidesGPT answered HTTP {0}")]
    Status(u16),

    #[error("presentation still not ready after {attempts} attempt(s)")]
    NotReady { attempts: u32 },

    #[error("failed to store presentation: {0}")]
    Io(#[from] std::io::Error),
}
