use crossbeam_channel::{Receiver, Sender, unbounded};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::error::SourceError;
use crate::listing::{DirectoryEntry, DirectoryLister, ListingResponse};
use crate::picker::{ListingReply, ListingRequest, RequestMethod};

/// Something that can answer a widget's listing request.
pub trait ListingSource: Send + Sync {
    fn fetch(&self, request: &ListingRequest) -> Result<Vec<DirectoryEntry>, SourceError>;
}

/// Answers requests in-process from a local directory. Entry paths come back
/// with the request's base directory in front, the way a server reporting
/// absolute paths would send them.
#[derive(Debug, Clone)]
pub struct LocalSource {
    lister: DirectoryLister,
}

impl LocalSource {
    pub fn new(lister: DirectoryLister) -> Self {
        LocalSource { lister }
    }
}

impl ListingSource for LocalSource {
    fn fetch(&self, request: &ListingRequest) -> Result<Vec<DirectoryEntry>, SourceError> {
        let mut entries = self.lister.list(&request.dir)?;
        if !request.base_directory.is_empty() {
            for entry in &mut entries {
                entry.path.insert_str(0, &request.base_directory);
            }
        }
        Ok(entries)
    }
}

/// Talks to a listing endpoint over HTTP. The request's own endpoint wins
/// over the default one when it is set.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::blocking::Client,
    default_endpoint: String,
}

impl HttpSource {
    pub fn new(default_endpoint: impl Into<String>) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(HttpSource {
            client,
            default_endpoint: default_endpoint.into(),
        })
    }

    fn endpoint<'a>(&'a self, request: &'a ListingRequest) -> &'a str {
        if request.endpoint.is_empty() {
            &self.default_endpoint
        } else {
            &request.endpoint
        }
    }
}

impl ListingSource for HttpSource {
    fn fetch(&self, request: &ListingRequest) -> Result<Vec<DirectoryEntry>, SourceError> {
        let params = [
            ("baseDirectory", request.base_directory.as_str()),
            ("dir", request.dir.as_str()),
        ];
        let endpoint = self.endpoint(request);
        let builder = match request.method {
            RequestMethod::Get => self.client.get(endpoint).query(&params),
            RequestMethod::Post => self.client.post(endpoint).form(&params),
            RequestMethod::Put => self.client.put(endpoint).form(&params),
            RequestMethod::Delete => self.client.delete(endpoint).form(&params),
        };

        tracing::debug!(request = %request.id, endpoint, dir = %request.dir, "fetching listing");
        let response = builder.send()?.error_for_status()?;
        let body: ListingResponse = response
            .json()
            .map_err(|e| SourceError::Decode(e.to_string()))?;
        body.into_result().map_err(SourceError::Listing)
    }
}

/// Runs listing requests off the UI thread and hands the replies back over
/// a channel.
#[derive(Clone)]
pub struct Fetcher {
    source: Arc<dyn ListingSource>,
    tx: Sender<ListingReply>,
}

impl Fetcher {
    pub fn new(source: Arc<dyn ListingSource>) -> (Self, Receiver<ListingReply>) {
        let (tx, rx) = unbounded();
        (Fetcher { source, tx }, rx)
    }

    pub fn submit(&self, request: ListingRequest) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = source.fetch(&request).map_err(|e| {
                tracing::warn!(request = %request.id, error = %e, "listing failed");
                e.to_string()
            });
            // The receiver is gone once the front-end has shut down.
            let _ = tx.send(ListingReply {
                id: request.id,
                result,
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::FileKind;
    use crate::picker::{RequestId, TriggerId};
    use std::fs;
    use tempfile::tempdir;

    fn request(dir: &str) -> ListingRequest {
        ListingRequest {
            id: RequestId {
                trigger: TriggerId::new("t"),
                session: 1,
                seq: 1,
            },
            endpoint: String::new(),
            method: RequestMethod::Post,
            dir: dir.to_string(),
            base_directory: String::new(),
        }
    }

    #[test]
    fn local_source_lists_the_requested_directory() {
        let root = tempdir().unwrap();
        fs::create_dir(root.path().join("sub")).unwrap();
        fs::write(root.path().join("sub/a.png"), b"\x89PNG\r\n\x1a\n0000").unwrap();

        let source = LocalSource::new(DirectoryLister::new(root.path()));
        let entries = source.fetch(&request("/sub")).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "/sub/a.png");
        assert_eq!(entries[0].file_type, Some(FileKind::Image));
    }

    #[test]
    fn local_source_prefixes_the_base_directory() {
        let root = tempdir().unwrap();
        fs::create_dir(root.path().join("srvdata")).unwrap();

        let source = LocalSource::new(DirectoryLister::new(root.path()));
        let mut req = request("");
        req.base_directory = "/srv".into();
        let entries = source.fetch(&req).unwrap();
        assert_eq!(entries[0].path, "/srv/srvdata");
    }

    #[test]
    fn local_source_reports_missing_directories_as_listing_errors() {
        let root = tempdir().unwrap();
        let source = LocalSource::new(DirectoryLister::new(root.path()));
        let err = source.fetch(&request("/nope")).unwrap_err();
        assert_eq!(err.to_string(), "This directory does not exist");
    }

    #[test]
    fn fetcher_replies_with_the_request_id() {
        let root = tempdir().unwrap();
        fs::write(root.path().join("x.txt"), b"hello").unwrap();
        let (fetcher, replies) =
            Fetcher::new(Arc::new(LocalSource::new(DirectoryLister::new(root.path()))));

        let req = request("");
        fetcher.submit(req.clone());
        let reply = replies.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(reply.id, req.id);
        assert_eq!(reply.result.unwrap()[0].name, "x.txt");
    }

    #[test]
    fn fetcher_turns_failures_into_messages() {
        let root = tempdir().unwrap();
        let (fetcher, replies) =
            Fetcher::new(Arc::new(LocalSource::new(DirectoryLister::new(root.path()))));

        fetcher.submit(request("missing"));
        let reply = replies.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(reply.result, Err("This directory does not exist".to_string()));
    }

    #[test]
    fn http_source_prefers_the_request_endpoint() {
        let source = HttpSource::new("http://localhost:8080/filepicker").unwrap();
        let mut req = request("");
        assert_eq!(source.endpoint(&req), "http://localhost:8080/filepicker");
        req.endpoint = "http://other/list".into();
        assert_eq!(source.endpoint(&req), "http://other/list");
    }
}
