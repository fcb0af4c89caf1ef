//! Document fetching for the reference resolver.
//!
//! Local references read from the filesystem; remote references go through a
//! blocking HTTP client with an optional on-disk cache keyed by the SHA-256
//! of the URL. Concurrent fetches of the same canonical URL are deduplicated
//! to a single in-flight request, since a graph commonly references one
//! external file from many places.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use crate::document::DocumentLocation;
use crate::error::{OaslintError, Result};

/// Source of document content, by canonical location.
///
/// Swapped out in tests for canned content.
pub trait DocumentFetcher: Send + Sync {
    fn fetch(&self, location: &DocumentLocation) -> Result<String>;
}

/// Default fetcher: filesystem for local paths, HTTP for URLs.
pub struct Fetcher {
    http: HttpFetcher,
}

impl Fetcher {
    pub fn new() -> Self {
        Self {
            http: HttpFetcher::new(),
        }
    }

    /// Enable the on-disk cache for remote fetches.
    pub fn with_cache_dir(mut self, cache_dir: PathBuf) -> Self {
        self.http = self.http.with_cache_dir(cache_dir);
        self
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentFetcher for Fetcher {
    fn fetch(&self, location: &DocumentLocation) -> Result<String> {
        match location {
            DocumentLocation::Local(path) => {
                std::fs::read_to_string(path).map_err(|e| OaslintError::Fetch {
                    location: path.display().to_string(),
                    message: e.to_string(),
                })
            }
            DocumentLocation::Remote(url) => self.http.fetch(url),
        }
    }
}

/// Shared or cloned outcome of one HTTP request.
type FetchOutcome = std::result::Result<String, String>;

struct Flight {
    outcome: Mutex<Option<FetchOutcome>>,
    ready: Condvar,
}

impl Flight {
    fn new() -> Self {
        Self {
            outcome: Mutex::new(None),
            ready: Condvar::new(),
        }
    }

    fn publish(&self, outcome: FetchOutcome) {
        let mut guard = self.outcome.lock().unwrap();
        *guard = Some(outcome);
        self.ready.notify_all();
    }

    fn wait(&self) -> FetchOutcome {
        let mut guard = self.outcome.lock().unwrap();
        loop {
            match guard.as_ref() {
                Some(outcome) => return outcome.clone(),
                None => guard = self.ready.wait(guard).unwrap(),
            }
        }
    }
}

/// Fetches remote documents over HTTP/HTTPS.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    cache_dir: Option<PathBuf>,
    inflight: Mutex<HashMap<String, Arc<Flight>>>,
}

impl HttpFetcher {
    /// Create a fetcher with the default 30-second timeout.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::blocking::Client::builder()
                .user_agent("oaslint")
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            cache_dir: None,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_cache_dir(mut self, cache_dir: PathBuf) -> Self {
        self.cache_dir = Some(cache_dir);
        self
    }

    /// Fetch a URL, deduplicating concurrent requests to one in-flight call.
    pub fn fetch(&self, url: &str) -> Result<String> {
        if let Some(cached) = self.read_cache(url) {
            tracing::debug!(url, "remote document served from cache");
            return Ok(cached);
        }

        enum Role {
            Leader(Arc<Flight>),
            Follower(Arc<Flight>),
        }

        let role = {
            let mut inflight = self.inflight.lock().unwrap();
            match inflight.get(url) {
                Some(flight) => Role::Follower(Arc::clone(flight)),
                None => {
                    let flight = Arc::new(Flight::new());
                    inflight.insert(url.to_string(), Arc::clone(&flight));
                    Role::Leader(flight)
                }
            }
        };

        let outcome = match role {
            Role::Leader(flight) => {
                tracing::debug!(url, "fetching remote document");
                let outcome = self.fetch_remote(url);
                if let Ok(content) = &outcome {
                    self.write_cache(url, content);
                }
                self.inflight.lock().unwrap().remove(url);
                flight.publish(outcome.clone());
                outcome
            }
            Role::Follower(flight) => {
                tracing::debug!(url, "waiting on in-flight fetch");
                flight.wait()
            }
        };

        outcome.map_err(|message| OaslintError::Fetch {
            location: url.to_string(),
            message,
        })
    }

    fn fetch_remote(&self, url: &str) -> FetchOutcome {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }
        response.text().map_err(|e| e.to_string())
    }

    fn cache_path(&self, url: &str) -> Option<PathBuf> {
        use sha2::{Digest, Sha256};
        let dir = self.cache_dir.as_ref()?;
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let hash = hex::encode(hasher.finalize());
        Some(dir.join(format!("{}.yml", hash)))
    }

    fn read_cache(&self, url: &str) -> Option<String> {
        let path = self.cache_path(url)?;
        std::fs::read_to_string(path).ok()
    }

    fn write_cache(&self, url: &str, content: &str) {
        let Some(path) = self.cache_path(url) else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = std::fs::write(&path, content) {
            tracing::warn!(url, error = %e, "failed to write fetch cache");
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}
