//! Google Sheets v4 REST store.
//!
//! Rows are addressed by their 1-based sheet row number; the first row of
//! the worksheet is the header. Deleting a row clears its cells instead of
//! removing it, so row numbers held by other handles stay valid. Blank rows
//! are skipped when listing.

use std::cell::{OnceCell, RefCell};
use std::collections::BTreeMap;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{RemoteRow, RowStore, StoreError, Worksheet};
use crate::clean::{IntoCell, RowData};

/// Public Sheets API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://sheets.googleapis.com/v4";

/// Response body of `spreadsheets.values.get`.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Request body for writes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WriteBody<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendResponse {
    updates: AppendUpdates,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendUpdates {
    updated_range: String,
}

/// Row store talking to the Google Sheets v4 API.
///
/// The HTTP session is created on first use and reused until [`close`]
/// is called.
///
/// [`close`]: SheetsApiStore::close
#[derive(Debug)]
pub struct SheetsApiStore {
    base_url: String,
    access_token: Option<String>,
    source: String,
    session: OnceCell<Client>,
    /// Header rows seen per worksheet
    headers: RefCell<BTreeMap<String, Vec<String>>>,
}

impl SheetsApiStore {
    /// Creates a store authenticating with an OAuth2 bearer token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            access_token: Some(access_token.into()),
            source: format!("sheetsync/{}", crate::version()),
            session: OnceCell::new(),
            headers: RefCell::new(BTreeMap::new()),
        }
    }

    /// Creates a store without credentials. Every call fails with
    /// [`StoreError::NotConfigured`].
    pub fn unauthenticated() -> Self {
        Self {
            access_token: None,
            ..Self::new(String::new())
        }
    }

    /// Overrides the API endpoint (used for proxies and test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Uses a preconfigured HTTP client instead of building one on first
    /// use. The client is expected to carry its own credentials.
    pub fn with_client(mut self, client: Client) -> Self {
        self.session = OnceCell::from(client);
        self
    }

    /// Sets the identity reported to the service as the user agent.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Returns the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns true once a session has been established.
    pub fn is_connected(&self) -> bool {
        self.session.get().is_some()
    }

    /// Drops the HTTP session and cached headers. The next call reconnects.
    pub fn close(&mut self) {
        if self.session.take().is_some() {
            tracing::debug!("Closed Sheets API session");
        }
        self.headers.get_mut().clear();
    }

    /// Returns the session, establishing it on first use.
    fn client(&self) -> Result<&Client, StoreError> {
        if let Some(client) = self.session.get() {
            return Ok(client);
        }

        let token = self
            .access_token
            .as_deref()
            .ok_or_else(|| StoreError::NotConfigured("missing access token".to_string()))?;

        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| StoreError::NotConfigured(e.to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        let agent =
            HeaderValue::from_str(&self.source).map_err(|e| StoreError::NotConfigured(e.to_string()))?;
        headers.insert(USER_AGENT, agent);

        let client = Client::builder()
            .default_headers(headers)
            .build()?;

        tracing::debug!(source = %self.source, "Opened Sheets API session");
        Ok(self.session.get_or_init(|| client))
    }

    fn values_url(&self, target: &Worksheet, range: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}",
            self.base_url,
            urlencoding::encode(&target.spreadsheet),
            urlencoding::encode(range)
        )
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    fn fetch_values(&self, target: &Worksheet, range: &str) -> Result<Vec<Vec<Value>>, StoreError> {
        let client = self.client()?;
        let response = self.send(client.get(self.values_url(target, range)))?;
        let body: ValueRange = response
            .json()
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(body.values)
    }

    /// Returns the header row, fetching it when not yet seen.
    fn header(&self, target: &Worksheet) -> Result<Vec<String>, StoreError> {
        if let Some(header) = self.headers.borrow().get(&target.to_string()) {
            return Ok(header.clone());
        }

        let values = self.fetch_values(target, &a1_range(&target.worksheet, "1:1"))?;
        let header = values.into_iter().next().map(header_cells).unwrap_or_default();
        self.remember_header(target, header.clone());
        Ok(header)
    }

    fn remember_header(&self, target: &Worksheet, header: Vec<String>) {
        self.headers
            .borrow_mut()
            .insert(target.to_string(), header);
    }

    /// Writes a header row into an empty worksheet, key column first.
    fn init_header(&self, target: &Worksheet, data: &RowData) -> Result<Vec<String>, StoreError> {
        let mut header = vec![target.key_column.clone()];
        header.extend(data.keys().filter(|k| **k != target.key_column).cloned());

        let range = a1_range(
            &target.worksheet,
            &format!("A1:{}1", column_letter(header.len())),
        );
        self.put_values(target, &range, header.clone())?;
        tracing::info!(worksheet = %target, columns = header.len(), "Initialized header row");

        self.remember_header(target, header.clone());
        Ok(header)
    }

    fn put_values(&self, target: &Worksheet, range: &str, cells: Vec<String>) -> Result<(), StoreError> {
        let client = self.client()?;
        let body = WriteBody {
            range,
            major_dimension: "ROWS",
            values: vec![cells],
        };
        self.send(
            client
                .put(self.values_url(target, range))
                .query(&[("valueInputOption", "RAW")])
                .json(&body),
        )?;
        Ok(())
    }

    fn row_range(&self, target: &Worksheet, row: &RemoteRow, width: usize) -> Result<String, StoreError> {
        let number: u64 = row
            .id
            .parse()
            .map_err(|_| StoreError::Unknown(row.id.clone()))?;
        Ok(a1_range(
            &target.worksheet,
            &format!("A{n}:{}{n}", column_letter(width.max(1)), n = number),
        ))
    }
}

impl RowStore for SheetsApiStore {
    fn list_rows(&self, target: &Worksheet) -> Result<Vec<RemoteRow>, StoreError> {
        let mut values = self.fetch_values(target, &a1_range(&target.worksheet, ""))?.into_iter();
        let header = values.next().map(header_cells).unwrap_or_default();
        let rows = parse_rows(&header, values, &target.key_column);

        tracing::debug!(worksheet = %target, rows = rows.len(), "Listed remote rows");
        self.remember_header(target, header);
        Ok(rows)
    }

    fn insert_row(&self, target: &Worksheet, data: &RowData) -> Result<RemoteRow, StoreError> {
        let mut header = self.header(target)?;
        if header.is_empty() {
            header = self.init_header(target, data)?;
        }
        require_key_column(&header, target)?;
        let (cells, stored) = row_cells(&header, data, target);

        let client = self.client()?;
        let range = a1_range(&target.worksheet, "A1");
        let body = WriteBody {
            range: &range,
            major_dimension: "ROWS",
            values: vec![cells],
        };
        let response = self.send(
            client
                .post(format!("{}:append", self.values_url(target, &range)))
                .query(&[("valueInputOption", "RAW")])
                .json(&body),
        )?;
        let appended: AppendResponse = response
            .json()
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        let number = parse_updated_row(&appended.updates.updated_range).ok_or_else(|| {
            StoreError::Decode(format!(
                "unexpected updated range '{}'",
                appended.updates.updated_range
            ))
        })?;

        Ok(RemoteRow {
            id: number.to_string(),
            title: title_of(&stored, &target.key_column),
            custom: stored,
        })
    }

    fn update_row(
        &self,
        target: &Worksheet,
        row: &RemoteRow,
        data: &RowData,
    ) -> Result<RemoteRow, StoreError> {
        let header = self.header(target)?;
        require_key_column(&header, target)?;
        let (cells, stored) = row_cells(&header, data, target);
        let range = self.row_range(target, row, header.len())?;
        self.put_values(target, &range, cells)?;

        Ok(RemoteRow {
            id: row.id.clone(),
            title: title_of(&stored, &target.key_column),
            custom: stored,
        })
    }

    fn delete_row(&self, target: &Worksheet, row: &RemoteRow) -> Result<(), StoreError> {
        let header = self.header(target)?;
        let range = self.row_range(target, row, header.len())?;
        let client = self.client()?;
        self.send(
            client
                .post(format!("{}:clear", self.values_url(target, &range)))
                .json(&serde_json::json!({})),
        )?;
        Ok(())
    }
}

/// Builds an A1 range on a worksheet, quoting names that need it.
///
/// An empty `range` addresses the whole worksheet.
pub(crate) fn a1_range(worksheet: &str, range: &str) -> String {
    let needs_quotes = !worksheet.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    let name = if needs_quotes {
        format!("'{}'", worksheet.replace('\'', "''"))
    } else {
        worksheet.to_string()
    };

    if range.is_empty() {
        name
    } else {
        format!("{}!{}", name, range)
    }
}

/// Converts a 1-based column index to its letter form (1 -> A, 27 -> AA).
pub(crate) fn column_letter(mut index: usize) -> String {
    let mut letters = Vec::new();
    while index > 0 {
        let rem = (index - 1) % 26;
        letters.push(b'A' + rem as u8);
        index = (index - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Extracts the first row number from a range like `Sheet1!A5:C5`.
pub(crate) fn parse_updated_row(range: &str) -> Option<u64> {
    let cells = range.rsplit('!').next()?;
    let first = cells.split(':').next()?;
    let digits: String = first.chars().skip_while(|c| c.is_ascii_alphabetic()).collect();
    digits.parse().ok()
}

fn header_cells(row: Vec<Value>) -> Vec<String> {
    row.into_iter()
        .map(|v| v.into_cell().unwrap_or_default())
        .collect()
}

/// Turns value rows (header excluded) into handles numbered from row 2.
pub(crate) fn parse_rows(
    header: &[String],
    values: impl IntoIterator<Item = Vec<Value>>,
    key_column: &str,
) -> Vec<RemoteRow> {
    let mut rows = Vec::new();
    for (offset, cells) in values.into_iter().enumerate() {
        let mut custom = RowData::new();
        for (i, column) in header.iter().enumerate() {
            if column.is_empty() {
                continue;
            }
            let cell = cells
                .get(i)
                .cloned()
                .and_then(IntoCell::into_cell)
                .filter(|s| !s.is_empty());
            custom.insert(column.clone(), cell);
        }

        if custom.values().all(Option::is_none) {
            continue;
        }

        rows.push(RemoteRow {
            id: (offset + 2).to_string(),
            title: title_of(&custom, key_column),
            custom,
        });
    }
    rows
}

/// Writes need the key column; a row stored without its key can never be
/// matched again.
fn require_key_column(header: &[String], target: &Worksheet) -> Result<(), StoreError> {
    if header.contains(&target.key_column) {
        return Ok(());
    }
    Err(StoreError::MissingColumn {
        worksheet: target.to_string(),
        column: target.key_column.clone(),
    })
}

/// Orders `data` by header, returning the cells to send and what the sheet
/// will hold afterwards.
fn row_cells(header: &[String], data: &RowData, target: &Worksheet) -> (Vec<String>, RowData) {
    let dropped: Vec<&String> = data.keys().filter(|k| !header.contains(*k)).collect();
    if !dropped.is_empty() {
        tracing::warn!(worksheet = %target, columns = ?dropped, "Dropping columns missing from header");
    }

    let mut stored = RowData::new();
    let cells = header
        .iter()
        .map(|column| {
            let cell = data.get(column).cloned().flatten().filter(|s| !s.is_empty());
            if !column.is_empty() {
                stored.insert(column.clone(), cell.clone());
            }
            cell.unwrap_or_default()
        })
        .collect();
    (cells, stored)
}

fn title_of(data: &RowData, key_column: &str) -> String {
    data.get(key_column).cloned().flatten().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::clean;
    use serde_json::json;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;

    #[test]
    fn test_a1_range_plain_name() {
        assert_eq!(a1_range("Sheet1", "A1"), "Sheet1!A1");
        assert_eq!(a1_range("Sheet1", ""), "Sheet1");
    }

    #[test]
    fn test_a1_range_quotes_names() {
        assert_eq!(a1_range("My Sheet", "1:1"), "'My Sheet'!1:1");
        assert_eq!(a1_range("Bond's", ""), "'Bond''s'");
    }

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
        assert_eq!(column_letter(52), "AZ");
        assert_eq!(column_letter(703), "AAA");
    }

    #[test]
    fn test_parse_updated_row() {
        assert_eq!(parse_updated_row("Sheet1!A5:C5"), Some(5));
        assert_eq!(parse_updated_row("'My Sheet'!A12:AB12"), Some(12));
        assert_eq!(parse_updated_row("nonsense"), None);
    }

    #[test]
    fn test_parse_rows_numbers_and_skips_blank() {
        let header = vec!["pk".to_string(), "name".to_string()];
        let values = vec![
            vec![json!("1"), json!("Bond")],
            vec![],
            vec![json!("2")],
        ];

        let rows = parse_rows(&header, values, "pk");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "2");
        assert_eq!(rows[0].title, "1");
        assert_eq!(rows[0].custom["name"].as_deref(), Some("Bond"));
        // Missing trailing cells read as blank
        assert_eq!(rows[1].id, "4");
        assert_eq!(rows[1].custom["name"], None);
    }

    #[test]
    fn test_row_cells_follow_header_order() {
        let header = vec!["pk".to_string(), "name".to_string(), "age".to_string()];
        let data = clean(vec![
            ("age", json!(42)),
            ("pk", json!("7")),
            ("extra", json!("dropped")),
        ]);
        let target = Worksheet::new("book", "Sheet1", "pk");

        let (cells, stored) = row_cells(&header, &data, &target);
        assert_eq!(cells, vec!["7", "", "42"]);
        assert!(!stored.contains_key("extra"));
        assert_eq!(stored["name"], None);
    }

    #[test]
    fn test_values_url_encodes_range() {
        let store = SheetsApiStore::new("token").with_base_url("http://localhost:9000/");
        let target = Worksheet::new("abc", "My Sheet", "pk");
        let url = store.values_url(&target, &a1_range(&target.worksheet, "A1"));
        assert_eq!(
            url,
            "http://localhost:9000/spreadsheets/abc/values/%27My%20Sheet%27%21A1"
        );
    }

    #[test]
    fn test_session_is_lazy() {
        let store = SheetsApiStore::new("token");
        assert!(!store.is_connected());
        store.client().unwrap();
        assert!(store.is_connected());
    }

    #[test]
    fn test_close_drops_session() {
        let mut store = SheetsApiStore::new("token");
        store.client().unwrap();
        store.close();
        assert!(!store.is_connected());
    }

    #[test]
    fn test_require_key_column() {
        let target = Worksheet::new("book", "Sheet1", "pk");
        let header = vec!["name".to_string(), "email".to_string()];
        assert!(matches!(
            require_key_column(&header, &target),
            Err(StoreError::MissingColumn { column, .. }) if column == "pk"
        ));

        let header = vec!["name".to_string(), "pk".to_string()];
        assert!(require_key_column(&header, &target).is_ok());
    }

    #[test]
    fn test_list_rows_over_http() {
        let server = StubServer::start(vec![(
            200,
            r#"{"range":"Sheet1","values":[["pk","name"],["1","Bond"],[],["2","M"]]}"#,
        )]);
        let store = server.store();
        let target = Worksheet::new("book", "Sheet1", "pk");

        let rows = store.list_rows(&target).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].id, "4");
        assert_eq!(rows[1].title, "2");

        let requests = server.finish();
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].path, "/spreadsheets/book/values/Sheet1");
    }

    #[test]
    fn test_insert_into_empty_sheet_writes_header() {
        let server = StubServer::start(vec![
            (200, r#"{"range":"Sheet1!A1:Z1"}"#),
            (200, r#"{}"#),
            (200, r#"{"updates":{"updatedRange":"Sheet1!A2:B2"}}"#),
        ]);
        let store = server.store();
        let target = Worksheet::new("book", "Sheet1", "pk");

        let data = clean(vec![("name", "Bond"), ("pk", "1")]);
        let row = store.insert_row(&target, &data).unwrap();
        assert_eq!(row.id, "2");
        assert_eq!(row.title, "1");
        assert_eq!(row.custom["name"].as_deref(), Some("Bond"));

        let requests = server.finish();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].path, "/spreadsheets/book/values/Sheet1%211%3A1");

        assert_eq!(requests[1].method, "PUT");
        assert_eq!(
            requests[1].path,
            "/spreadsheets/book/values/Sheet1%21A1%3AB1?valueInputOption=RAW"
        );
        assert!(requests[1].body.contains(r#"[["pk","name"]]"#));

        assert_eq!(requests[2].method, "POST");
        assert_eq!(
            requests[2].path,
            "/spreadsheets/book/values/Sheet1%21A1:append?valueInputOption=RAW"
        );
        assert!(requests[2].body.contains(r#"[["1","Bond"]]"#));
    }

    #[test]
    fn test_insert_refuses_header_without_key_column() {
        let server = StubServer::start(vec![(
            200,
            r#"{"range":"Sheet1!A1:Z1","values":[["name","email"]]}"#,
        )]);
        let store = server.store();
        let target = Worksheet::new("book", "Sheet1", "pk");

        let data = clean(vec![("pk", "1"), ("name", "Bond")]);
        let result = store.insert_row(&target, &data);
        assert!(matches!(result, Err(StoreError::MissingColumn { .. })));

        // Only the header was read; nothing was appended
        let requests = server.finish();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
    }

    #[test]
    fn test_update_puts_row_range() {
        let server = StubServer::start(vec![
            (200, r#"{"range":"Sheet1!A1:Z1","values":[["pk","name"]]}"#),
            (200, r#"{}"#),
        ]);
        let store = server.store();
        let target = Worksheet::new("book", "Sheet1", "pk");
        let existing = RemoteRow {
            id: "5".to_string(),
            title: "1".to_string(),
            custom: clean(vec![("pk", "1"), ("name", "Bond")]),
        };

        let data = clean(vec![("pk", "1"), ("name", "James Bond")]);
        let updated = store.update_row(&target, &existing, &data).unwrap();
        assert_eq!(updated.id, "5");
        assert_eq!(updated.custom["name"].as_deref(), Some("James Bond"));

        let requests = server.finish();
        assert_eq!(requests[1].method, "PUT");
        assert_eq!(
            requests[1].path,
            "/spreadsheets/book/values/Sheet1%21A5%3AB5?valueInputOption=RAW"
        );
        assert!(requests[1].body.contains(r#"[["1","James Bond"]]"#));
    }

    #[test]
    fn test_delete_clears_row() {
        let server = StubServer::start(vec![
            (200, r#"{"range":"Sheet1!A1:Z1","values":[["pk","name"]]}"#),
            (200, r#"{}"#),
        ]);
        let store = server.store();
        let target = Worksheet::new("book", "Sheet1", "pk");
        let existing = RemoteRow {
            id: "3".to_string(),
            title: "1".to_string(),
            custom: clean(vec![("pk", "1")]),
        };

        store.delete_row(&target, &existing).unwrap();

        let requests = server.finish();
        assert_eq!(requests[1].method, "POST");
        assert_eq!(
            requests[1].path,
            "/spreadsheets/book/values/Sheet1%21A3%3AB3:clear"
        );
    }

    #[test]
    fn test_error_status_is_reported() {
        let server = StubServer::start(vec![(403, r#"{"error":"permission denied"}"#)]);
        let store = server.store();
        let target = Worksheet::new("book", "Sheet1", "pk");

        match store.list_rows(&target) {
            Err(StoreError::Status { status, body }) => {
                assert_eq!(status, 403);
                assert!(body.contains("permission denied"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
        server.finish();
    }

    #[test]
    fn test_unauthenticated_store_fails() {
        let store = SheetsApiStore::unauthenticated();
        let target = Worksheet::new("abc", "Sheet1", "pk");
        let result = store.list_rows(&target);
        assert!(matches!(result, Err(StoreError::NotConfigured(_))));
    }

    /// A request as seen by [`StubServer`].
    #[derive(Debug)]
    struct Recorded {
        method: String,
        path: String,
        body: String,
    }

    /// Minimal HTTP endpoint answering one canned response per connection.
    struct StubServer {
        base_url: String,
        handle: thread::JoinHandle<Vec<Recorded>>,
    }

    impl StubServer {
        fn start(responses: Vec<(u16, &'static str)>) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let base_url = format!("http://{}", listener.local_addr().unwrap());

            let handle = thread::spawn(move || {
                let mut recorded = Vec::new();
                for (status, body) in responses {
                    let (stream, _) = listener.accept().unwrap();
                    recorded.push(answer(stream, status, body));
                }
                recorded
            });

            Self { base_url, handle }
        }

        fn store(&self) -> SheetsApiStore {
            let client = Client::builder().no_proxy().build().unwrap();
            SheetsApiStore::new("token")
                .with_base_url(self.base_url.clone())
                .with_client(client)
        }

        /// Waits for every canned response to be served.
        fn finish(self) -> Vec<Recorded> {
            self.handle.join().unwrap()
        }
    }

    fn answer(stream: TcpStream, status: u16, body: &str) -> Recorded {
        let mut reader = BufReader::new(stream);

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        let mut parts = request_line.split_whitespace();
        let method = parts.next().unwrap_or_default().to_string();
        let path = parts.next().unwrap_or_default().to_string();

        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
        }

        let mut request_body = vec![0; content_length];
        reader.read_exact(&mut request_body).unwrap();

        let response = format!(
            "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let mut stream = reader.into_inner();
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();

        Recorded {
            method,
            path,
            body: String::from_utf8(request_body).unwrap(),
        }
    }
}
