use std::cell::RefCell;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::model::search::{SearchRequest, SearchResponse};
use crate::model::tag::{Tag, TagLabel};
use crate::ops::corpus::Corpus;

/// Error type for search endpoint operations
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("could not open corpus {path}: {source}")]
    OpenCorpus {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse corpus {path}: {source}")]
    ParseCorpus { path: PathBuf, source: csv::Error },
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// The external search endpoint: query text in, ranked candidates out.
///
/// Implementations must be read-only; the same query may be sent many times.
pub trait SearchBackend: Send + Sync {
    fn search(&self, query: &str) -> Result<Vec<Tag>, SearchError>;
}

/// Searches a CSV corpus held in memory.
#[derive(Debug, Clone)]
pub struct CorpusBackend {
    corpus: Corpus,
    limit: usize,
}

impl CorpusBackend {
    pub fn new(corpus: Corpus, limit: usize) -> Self {
        CorpusBackend { corpus, limit }
    }

    /// Load a `tag,times_used` CSV file.
    pub fn open(path: &Path, limit: usize) -> Result<Self, SearchError> {
        let file = File::open(path).map_err(|e| SearchError::OpenCorpus {
            path: path.to_path_buf(),
            source: e,
        })?;
        let corpus = Corpus::from_csv(file).map_err(|e| SearchError::ParseCorpus {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!(path = %path.display(), tags = corpus.len(), "loaded corpus");
        Ok(CorpusBackend::new(corpus, limit))
    }
}

impl SearchBackend for CorpusBackend {
    fn search(&self, query: &str) -> Result<Vec<Tag>, SearchError> {
        Ok(self.corpus.search(query, self.limit))
    }
}

/// Body returned by the HTTP endpoint: `{"results": [{"tag": .., "times_used": ..}]}`
#[derive(Debug, Deserialize)]
struct HttpResults {
    #[serde(default)]
    results: Vec<HttpResult>,
}

#[derive(Debug, Deserialize)]
struct HttpResult {
    tag: String,
    /// Sent as a number or as the raw CSV string
    #[serde(default)]
    times_used: Option<serde_json::Value>,
}

impl HttpResult {
    fn into_tag(self) -> Option<Tag> {
        let label = TagLabel::new(&self.tag)?;
        let usage = match self.times_used {
            Some(serde_json::Value::Number(n)) => n.as_u64(),
            Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        Some(Tag::new(label, usage))
    }
}

/// Queries a remote endpoint as `GET <endpoint>?q=<query>`.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::blocking::Client,
    endpoint: String,
    limit: usize,
}

impl HttpBackend {
    pub fn new(endpoint: &str, timeout: Duration, limit: usize) -> Result<Self, SearchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(HttpBackend {
            client,
            endpoint: endpoint.to_string(),
            limit,
        })
    }
}

impl SearchBackend for HttpBackend {
    fn search(&self, query: &str) -> Result<Vec<Tag>, SearchError> {
        let body: HttpResults = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()?
            .error_for_status()?
            .json()?;
        Ok(body
            .results
            .into_iter()
            .filter_map(HttpResult::into_tag)
            .take(self.limit)
            .collect())
    }
}

/// Runs search requests on a background thread.
///
/// The event loop submits requests and drains responses with [`poll`]
/// each tick. Requests that queue up behind a slow one are coalesced: only
/// the newest is sent, since older answers would be discarded anyway.
///
/// [`poll`]: SearchWorker::poll
pub struct SearchWorker {
    tx: mpsc::Sender<SearchRequest>,
    rx: mpsc::Receiver<SearchResponse>,
    /// Failures for requests that could not reach the worker thread
    undelivered: RefCell<Vec<SearchResponse>>,
}

impl SearchWorker {
    pub fn spawn(backend: Arc<dyn SearchBackend>) -> Self {
        let (req_tx, req_rx) = mpsc::channel::<SearchRequest>();
        let (resp_tx, resp_rx) = mpsc::channel();

        thread::spawn(move || {
            while let Ok(mut request) = req_rx.recv() {
                while let Ok(newer) = req_rx.try_recv() {
                    request = newer;
                }
                let outcome = backend.search(&request.query).map_err(|e| {
                    warn!(query = %request.query, error = %e, "search failed");
                    e.to_string()
                });
                let response = SearchResponse {
                    token: request.token,
                    outcome,
                };
                if resp_tx.send(response).is_err() {
                    break;
                }
            }
        });

        SearchWorker {
            tx: req_tx,
            rx: resp_rx,
            undelivered: RefCell::new(Vec::new()),
        }
    }

    /// Queue a request. A dead worker turns into an immediate failure response
    /// on the next poll rather than a panic.
    pub fn submit(&self, request: SearchRequest) {
        debug!(token = request.token.0, query = %request.query, "search request");
        if let Err(mpsc::SendError(request)) = self.tx.send(request) {
            warn!(token = request.token.0, "search worker is gone");
            self.undelivered.borrow_mut().push(SearchResponse {
                token: request.token,
                outcome: Err("search worker stopped".to_string()),
            });
        }
    }

    /// Non-blocking poll for finished requests (may be empty).
    pub fn poll(&self) -> Vec<SearchResponse> {
        let mut responses = std::mem::take(&mut *self.undelivered.borrow_mut());
        while let Ok(resp) = self.rx.try_recv() {
            responses.push(resp);
        }
        responses
    }

    /// Block up to `timeout` for the next response.
    pub fn wait(&self, timeout: Duration) -> Option<SearchResponse> {
        if let Some(resp) = self.undelivered.borrow_mut().pop() {
            return Some(resp);
        }
        match self.rx.recv_timeout(timeout) {
            Ok(resp) => Some(resp),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
