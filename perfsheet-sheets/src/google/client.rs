//! Google Sheets v4 REST client

use super::auth::{AuthClock, ServiceAccountAuth, ServiceAccountKey};
use super::types::{ApiErrorEnvelope, SpreadsheetMetadata, ValueRange};
use super::{invalid_response, request_failed, transport};
use crate::{SheetsBackend, Worksheet};
use async_trait::async_trait;
use perfsheet_core::{CellRef, Grid, SheetsError, SheetsResult, SpreadsheetKey};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Quoted sheet-name range covering a whole worksheet, e.g. `'Run''s'`.
pub fn sheet_range(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Single-cell A1 range on a worksheet, e.g. `'Runtime'!B7`.
pub fn cell_range(title: &str, cell: CellRef) -> String {
    format!("{}!{}", sheet_range(title), cell.to_a1())
}

fn build_http(timeout: Duration) -> SheetsResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| transport("client setup", e))
}

/// Sheets v4 client authenticated as a service account.
pub struct GoogleSheetsClient {
    http: reqwest::Client,
    base_url: String,
    auth: ServiceAccountAuth,
}

impl GoogleSheetsClient {
    /// Build a client with a per-request timeout.
    ///
    /// `base_url` is the API root, e.g. `https://sheets.googleapis.com/v4`.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        auth: ServiceAccountAuth,
    ) -> SheetsResult<Self> {
        Ok(Self {
            http: build_http(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Build a client whose token exchange shares the same HTTP pool and timeout.
    pub fn from_service_account(
        base_url: &str,
        timeout: Duration,
        key: ServiceAccountKey,
        clock: Arc<dyn AuthClock>,
    ) -> SheetsResult<Self> {
        let http = build_http(timeout)?;
        let auth = ServiceAccountAuth::new(key, http.clone(), clock);
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    fn metadata_url(&self, spreadsheet: &SpreadsheetKey) -> String {
        format!(
            "{}/spreadsheets/{}?fields=sheets.properties",
            self.base_url,
            urlencoding::encode(spreadsheet.as_str())
        )
    }

    fn values_url(&self, spreadsheet: &SpreadsheetKey, range: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}",
            self.base_url,
            urlencoding::encode(spreadsheet.as_str()),
            urlencoding::encode(range)
        )
    }

    async fn parse_response<T: DeserializeOwned>(
        operation: &str,
        response: reqwest::Response,
    ) -> SheetsResult<T> {
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| transport(operation, e))?;
        parse_body(operation, status, &text)
    }
}

/// Decode a response body, mapping non-2xx statuses to `RequestFailed`.
///
/// The message comes from the Google error envelope when the body is one,
/// otherwise the raw body is kept.
fn parse_body<T: DeserializeOwned>(operation: &str, status: u16, text: &str) -> SheetsResult<T> {
    if (200..300).contains(&status) {
        return serde_json::from_str::<T>(text)
            .map_err(|e| invalid_response(operation, e.to_string()));
    }
    let message = match serde_json::from_str::<ApiErrorEnvelope>(text) {
        Ok(envelope) => envelope.error.message,
        Err(_) => text.to_string(),
    };
    Err(request_failed(operation, status, message))
}

fn find_worksheet(
    spreadsheet: &SpreadsheetKey,
    metadata: SpreadsheetMetadata,
    title: &str,
) -> SheetsResult<Worksheet> {
    metadata
        .sheets
        .into_iter()
        .map(|s| s.properties)
        .find(|p| p.title == title)
        .map(|p| Worksheet {
            spreadsheet: spreadsheet.clone(),
            title: p.title,
            sheet_id: p.sheet_id,
        })
        .ok_or_else(|| SheetsError::WorksheetNotFound {
            spreadsheet: spreadsheet.to_string(),
            title: title.to_string(),
        })
}

#[async_trait]
impl SheetsBackend for GoogleSheetsClient {
    async fn worksheet(
        &self,
        spreadsheet: &SpreadsheetKey,
        title: &str,
    ) -> SheetsResult<Worksheet> {
        let token = self.auth.access_token().await?;
        let response = self
            .http
            .get(self.metadata_url(spreadsheet))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| transport("worksheet lookup", e))?;

        let metadata: SpreadsheetMetadata =
            Self::parse_response("worksheet lookup", response).await?;
        find_worksheet(spreadsheet, metadata, title)
    }

    async fn get_all_values(&self, worksheet: &Worksheet) -> SheetsResult<Grid> {
        let token = self.auth.access_token().await?;
        let url = self.values_url(&worksheet.spreadsheet, &sheet_range(&worksheet.title));
        let response = self
            .http
            .get(url)
            .query(&[("majorDimension", "ROWS")])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| transport("get values", e))?;

        let range: ValueRange = Self::parse_response("get values", response).await?;
        Ok(Grid::new(range.into_string_rows()))
    }

    async fn update_cell(
        &self,
        worksheet: &Worksheet,
        cell: CellRef,
        value: &str,
    ) -> SheetsResult<()> {
        let cell = CellRef::new(cell.row, cell.col)?;
        let range = cell_range(&worksheet.title, cell);
        let token = self.auth.access_token().await?;
        let response = self
            .http
            .put(self.values_url(&worksheet.spreadsheet, &range))
            .query(&[("valueInputOption", "USER_ENTERED")])
            .bearer_auth(token)
            .json(&ValueRange::single(range.clone(), value))
            .send()
            .await
            .map_err(|e| transport("update cell", e))?;

        let _: serde_json::Value = Self::parse_response("update cell", response).await?;
        tracing::trace!(worksheet = %worksheet.title, %range, "Cell updated");
        Ok(())
    }
}

impl std::fmt::Debug for GoogleSheetsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSheetsClient")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::google::FixedAuthClock;

    const SERVICE_ACCOUNT: &str = include_str!("../../tests/fixtures/service_account.json");

    fn client() -> GoogleSheetsClient {
        let key = ServiceAccountKey::from_json(SERVICE_ACCOUNT).unwrap();
        GoogleSheetsClient::from_service_account(
            "https://sheets.googleapis.com/v4/",
            Duration::from_secs(5),
            key,
            Arc::new(FixedAuthClock(0)),
        )
        .unwrap()
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let key = ServiceAccountKey::from_json(SERVICE_ACCOUNT).unwrap();
        let auth =
            ServiceAccountAuth::new(key, reqwest::Client::new(), Arc::new(FixedAuthClock(0)));
        let client =
            GoogleSheetsClient::new("http://localhost:9000///", Duration::from_secs(1), auth)
                .unwrap();
        assert_eq!(client.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_sheet_range_quotes_and_escapes() {
        assert_eq!(sheet_range("Timestamps"), "'Timestamps'");
        assert_eq!(sheet_range("Bob's runs"), "'Bob''s runs'");
    }

    #[test]
    fn test_cell_range() {
        let cell = CellRef::new(22, 4).unwrap();
        assert_eq!(cell_range("STATUS", cell), "'STATUS'!D22");
    }

    #[test]
    fn test_values_url_encodes_range() {
        let client = client();
        let key = SpreadsheetKey::new("1eAVNnz2170dgAiSywvYeeip6c4Yw6MrPTXxYkJYbHWo");
        let url = client.values_url(&key, "'Runtime'!B7");
        assert_eq!(
            url,
            concat!(
                "https://sheets.googleapis.com/v4/spreadsheets/",
                "1eAVNnz2170dgAiSywvYeeip6c4Yw6MrPTXxYkJYbHWo/values/%27Runtime%27%21B7"
            )
        );
    }

    #[test]
    fn test_metadata_url() {
        let client = client();
        let key = SpreadsheetKey::new("abc");
        assert_eq!(
            client.metadata_url(&key),
            "https://sheets.googleapis.com/v4/spreadsheets/abc?fields=sheets.properties"
        );
    }

    #[test]
    fn test_debug_hides_private_key() {
        let debug = format!("{:?}", client());
        assert!(debug.contains("sheets.googleapis.com"));
        assert!(!debug.contains("BEGIN PRIVATE KEY"));
    }
    #[test]
    fn test_error_envelope_maps_to_request_failed() {
        let body = r#"{"error":{
            "code":403,
            "message":"The caller does not have permission",
            "status":"PERMISSION_DENIED"
        }}"#;
        let err = parse_body::<serde_json::Value>("get values", 403, body).unwrap_err();
        assert_eq!(
            err,
            SheetsError::RequestFailed {
                operation: "get values".to_string(),
                status: 403,
                message: "The caller does not have permission".to_string(),
            }
        );
    }

    #[test]
    fn test_non_json_error_body_is_kept_verbatim() {
        let err = parse_body::<serde_json::Value>("update cell", 502, "<html>Bad Gateway</html>")
            .unwrap_err();
        assert_eq!(
            err,
            SheetsError::RequestFailed {
                operation: "update cell".to_string(),
                status: 502,
                message: "<html>Bad Gateway</html>".to_string(),
            }
        );
    }

    #[test]
    fn test_malformed_success_body_is_invalid_response() {
        let err = parse_body::<SpreadsheetMetadata>("worksheet lookup", 200, "[1, 2").unwrap_err();
        assert!(matches!(
            err,
            SheetsError::InvalidResponse { ref operation, .. } if operation == "worksheet lookup"
        ));
    }

    #[test]
    fn test_range_without_values_is_empty_grid() {
        let body = r#"{"range":"'Properties'!A1:Z1000","majorDimension":"ROWS"}"#;
        let range: ValueRange = parse_body("get values", 200, body).unwrap();
        let grid = Grid::new(range.into_string_rows());
        assert!(grid.is_empty());
        assert_eq!(grid.header_width(), 0);
    }

    #[test]
    fn test_find_worksheet_by_title() {
        let key = SpreadsheetKey::new("book");
        let metadata: SpreadsheetMetadata = parse_body(
            "worksheet lookup",
            200,
            r#"{"sheets":[
                {"properties":{"sheetId":0,"title":"Timestamps"}},
                {"properties":{"sheetId":917,"title":"STATUS"}}
            ]}"#,
        )
        .unwrap();

        let ws = find_worksheet(&key, metadata.clone(), "STATUS").unwrap();
        assert_eq!(ws.sheet_id, 917);
        assert_eq!(ws.spreadsheet, key);

        let err = find_worksheet(&key, metadata, "Runtime").unwrap_err();
        assert_eq!(
            err,
            SheetsError::WorksheetNotFound {
                spreadsheet: "book".to_string(),
                title: "Runtime".to_string(),
            }
        );
    }
}
