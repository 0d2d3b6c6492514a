//! EasyData (State Bank of Pakistan) API client.
//!
//! One call = one GET:
//!
//! `{base}/series/{id}/data?api_key=..&start_date=..&end_date=..&format=..`
//!
//! A successful body is saved verbatim next to the caller (see
//! [`crate::io::payload`]) and parsed into a [`SeriesTable`].
//!
//! The key travels in the query string because that is the upstream contract;
//! anything logged from here has it redacted.

use std::path::PathBuf;

use chrono::NaiveDate;
use reqwest::Url;
use tracing::{debug, warn};

use crate::data::credential::Session;
use crate::data::transport::{ReqwestTransport, Transport};
use crate::domain::{ResponseFormat, SeriesRequest, SeriesTable};
use crate::error::EasyDataError;
use crate::io::{parse_payload, write_payload};

pub const DEFAULT_BASE_URL: &str = "https://easydata.sbp.org.pk/api/v1";

pub const BASE_URL_ENV: &str = "EASYDATA_BASE_URL";
pub const OUTPUT_DIR_ENV: &str = "EASYDATA_OUTPUT_DIR";

/// Where to send requests and where to save payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Directory payload files are written to (the working directory by default).
    pub output_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl ClientConfig {
    /// Defaults, overridden by `EASYDATA_BASE_URL` / `EASYDATA_OUTPUT_DIR` (`.env` honoured).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let mut config = Self::default();
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            config.base_url = url;
        }
        if let Ok(dir) = std::env::var(OUTPUT_DIR_ENV) {
            config.output_dir = PathBuf::from(dir);
        }
        config
    }
}

pub struct EasyDataClient<T = ReqwestTransport> {
    transport: T,
    config: ClientConfig,
    session: Session,
}

impl<T: Transport> EasyDataClient<T> {
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
            session: Session::new(),
        }
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn set_up(&mut self, key: &str) -> Result<(), EasyDataError> {
        self.session.set_up(key)
    }

    pub fn has_key(&self) -> bool {
        self.session.has_key()
    }

    pub fn get_key(&self) -> Result<&str, EasyDataError> {
        self.session.get_key()
    }

    /// Like [`fetch`](Self::fetch), taking the format as text (`"csv"` / `"json"`).
    ///
    /// An unsupported format is rejected before anything else happens.
    pub fn fetch_series(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        format: &str,
    ) -> Result<SeriesTable, EasyDataError> {
        let format: ResponseFormat = format.parse()?;
        self.fetch(&SeriesRequest::new(series_id, start, end, format))
    }

    /// Download one series, save the raw body, and parse it.
    pub fn fetch(&self, request: &SeriesRequest) -> Result<SeriesTable, EasyDataError> {
        request.validate()?;
        let body = self.download(request)?;
        write_payload(&self.config.output_dir, request, &body)?;
        parse_payload(&body, request.format)
    }

    /// GET the series and return the body of a 2xx response.
    fn download(&self, request: &SeriesRequest) -> Result<String, EasyDataError> {
        let key = self.session.get_key()?;
        let url = series_url(&self.config.base_url, request, key)?;
        debug!(url = %redact_key(&url), "requesting series");

        let resp = self.transport.get(&url)?;
        if !resp.is_success() {
            warn!(status = resp.status, series = %request.series_id, "series request failed");
            return Err(EasyDataError::Http {
                status: resp.status,
                body: resp.body,
            });
        }

        Ok(resp.body)
    }
}

/// Build the request URL for `request`.
pub fn series_url(base_url: &str, request: &SeriesRequest, key: &str) -> Result<Url, EasyDataError> {
    let mut url =
        Url::parse(base_url).map_err(|e| EasyDataError::Transport(format!("Invalid base URL '{base_url}': {e}")))?;

    url.path_segments_mut()
        .map_err(|_| EasyDataError::Transport(format!("Base URL '{base_url}' cannot take a path")))?
        .pop_if_empty()
        .extend(["series", request.series_id.as_str(), "data"]);

    url.query_pairs_mut()
        .append_pair("api_key", key)
        .append_pair("start_date", &request.start.format("%Y-%m-%d").to_string())
        .append_pair("end_date", &request.end.format("%Y-%m-%d").to_string())
        .append_pair("format", request.format.as_str());

    Ok(url)
}

fn redact_key(url: &Url) -> Url {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "api_key" { "<redacted>".into() } else { v };
            (k.into_owned(), v.into_owned())
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::fs;

    use super::*;
    use crate::data::transport::HttpResponse;
    use crate::domain::Cell;

    const KEY: &str = "C10D3D29160CE5693F56AA9846ABB2C438D8B230";
    const CSV: &str = "Observation Date,Observation Value\n2023-01-01,10\n2023-01-02,15\n";

    /// Canned transport that records every URL it is asked for.
    struct StubTransport {
        status: u16,
        body: String,
        calls: RefCell<Vec<Url>>,
    }

    impl StubTransport {
        fn new(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for StubTransport {
        fn get(&self, url: &Url) -> Result<HttpResponse, EasyDataError> {
            self.calls.borrow_mut().push(url.clone());
            Ok(HttpResponse {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }

    struct FailingTransport;

    impl Transport for FailingTransport {
        fn get(&self, _url: &Url) -> Result<HttpResponse, EasyDataError> {
            Err(EasyDataError::Transport("connection refused".to_string()))
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn client<T: Transport>(transport: T, dir: &std::path::Path) -> EasyDataClient<T> {
        let config = ClientConfig {
            base_url: "http://stub.local/api/v1".to_string(),
            output_dir: dir.to_path_buf(),
        };
        let mut client = EasyDataClient::new(transport, config);
        client.set_up(KEY).unwrap();
        client
    }

    #[test]
    fn url_carries_all_parameters() {
        let req = SeriesRequest::new("TS GP/1", d(2023, 1, 1), d(2023, 1, 2), ResponseFormat::Json);
        let url = series_url("https://easydata.sbp.org.pk/api/v1/", &req, KEY).unwrap();
        assert_eq!(
            url.as_str(),
            format!(
                "https://easydata.sbp.org.pk/api/v1/series/TS%20GP%2F1/data?api_key={KEY}&start_date=2023-01-01&end_date=2023-01-02&format=json"
            )
        );
    }

    #[test]
    fn bad_base_url_is_transport_error() {
        let req = SeriesRequest::new("1", d(2023, 1, 1), d(2023, 1, 2), ResponseFormat::Csv);
        assert!(matches!(series_url("not a url", &req, KEY), Err(EasyDataError::Transport(_))));
        assert!(matches!(series_url("mailto:x@y.z", &req, KEY), Err(EasyDataError::Transport(_))));
    }

    #[test]
    fn redaction_hides_key_only() {
        let req = SeriesRequest::new("1", d(2023, 1, 1), d(2023, 1, 2), ResponseFormat::Csv);
        let url = series_url(DEFAULT_BASE_URL, &req, KEY).unwrap();
        let shown = redact_key(&url).to_string();
        assert!(!shown.contains(KEY));
        assert!(shown.contains("start_date=2023-01-01"));
    }

    #[test]
    fn fetch_saves_body_and_parses_rows() {
        let dir = tempfile::tempdir().unwrap();
        let stub = StubTransport::new(200, CSV);
        let client = client(&stub, dir.path());

        let table = client.fetch_series("123", d(2023, 1, 1), d(2023, 1, 2), "csv").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1][1], Cell::Number(15.0));

        let saved = fs::read_to_string(dir.path().join("123_2023-01-01_2023-01-02.csv")).unwrap();
        assert_eq!(saved, CSV);

        let calls = stub.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].path(), "/api/v1/series/123/data");
    }

    #[test]
    fn invalid_format_makes_no_request() {
        let dir = tempfile::tempdir().unwrap();
        let stub = StubTransport::new(200, CSV);
        let client = client(&stub, dir.path());

        let err = client.fetch_series("123", d(2023, 1, 1), d(2023, 1, 2), "xml").unwrap_err();
        assert!(matches!(err, EasyDataError::InvalidFormat(_)));
        assert!(stub.calls.borrow().is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn path_like_series_id_makes_no_request_and_writes_nothing() {
        let root = tempfile::tempdir().unwrap();
        let out = root.path().join("out");
        fs::create_dir(&out).unwrap();
        let stub = StubTransport::new(200, CSV);
        let client = client(&stub, &out);

        for id in ["../escaped", "TS GP/1"] {
            let err = client.fetch_series(id, d(2023, 1, 1), d(2023, 1, 2), "csv").unwrap_err();
            assert!(matches!(err, EasyDataError::InvalidSeriesId(_)), "{id}: {err:?}");
        }
        assert!(stub.calls.borrow().is_empty());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
        assert!(!root.path().join("escaped_2023-01-01_2023-01-02.csv").exists());
    }

    #[test]
    fn fetch_json_saves_body_verbatim_and_parses_rows() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"[{"Observation Date":"2023-01-01","Observation Value":10},{"Observation Date":"2023-01-02","Observation Value":15.5}]"#;
        let stub = StubTransport::new(200, body);
        let client = client(&stub, dir.path());

        let table = client.fetch_series("123", d(2023, 1, 1), d(2023, 1, 2), "json").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.columns(), ["Observation Date", "Observation Value"]);
        assert_eq!(table.rows()[1][1], Cell::Number(15.5));

        let saved = fs::read_to_string(dir.path().join("123_2023-01-01_2023-01-02.json")).unwrap();
        assert_eq!(saved, body);
        assert_eq!(stub.calls.borrow()[0].query_pairs().find(|(k, _)| k == "format").unwrap().1, "json");
    }

    #[test]
    fn missing_key_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let stub = StubTransport::new(200, CSV);
        let config = ClientConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: dir.path().to_path_buf(),
        };
        let client = EasyDataClient::new(&stub, config);

        let err = client.fetch_series("123", d(2023, 1, 1), d(2023, 1, 2), "csv").unwrap_err();
        assert!(matches!(err, EasyDataError::MissingCredential));
        assert!(stub.calls.borrow().is_empty());
    }

    #[test]
    fn http_error_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let stub = StubTransport::new(404, "series not found");
        let client = client(&stub, dir.path());

        let err = client.fetch_series("123", d(2023, 1, 1), d(2023, 1, 2), "csv").unwrap_err();
        match err {
            EasyDataError::Http { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "series not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn transport_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let client = client(FailingTransport, dir.path());
        let err = client.fetch_series("123", d(2023, 1, 1), d(2023, 1, 2), "csv").unwrap_err();
        assert!(matches!(err, EasyDataError::Transport(_)));
    }

    #[test]
    fn unparsable_body_is_saved_then_reported() {
        let dir = tempfile::tempdir().unwrap();
        let stub = StubTransport::new(200, "{oops");
        let client = client(&stub, dir.path());

        let err = client.fetch_series("123", d(2023, 1, 1), d(2023, 1, 2), "json").unwrap_err();
        assert!(matches!(err, EasyDataError::Parse(_)));
        assert!(dir.path().join("123_2023-01-01_2023-01-02.json").exists());
    }

    #[test]
    fn saved_file_reloads_to_same_table() {
        let dir = tempfile::tempdir().unwrap();
        let body = "Observation Date,Observation Value,Unit\n2023-01-01,10,PKR\n2023-01-02,,PKR\n";
        let stub = StubTransport::new(200, body);
        let client = client(&stub, dir.path());

        let req = SeriesRequest::new("123", d(2023, 1, 1), d(2023, 1, 2), ResponseFormat::Csv);
        let fetched = client.fetch(&req).unwrap();
        let reloaded = crate::io::load_saved(&dir.path().join(req.file_name()), req.format).unwrap();
        assert_eq!(fetched, reloaded);
    }
}
