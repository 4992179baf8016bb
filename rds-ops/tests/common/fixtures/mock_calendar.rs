//! Mock national holiday calendar server
//!
//! Serves the calendar CSV encoded as Shift_JIS, the way the Cabinet Office
//! publishes it.

use encoding_rs::SHIFT_JIS;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const CALENDAR_PATH: &str = "/chosei/shukujitsu/syukujitsu.csv";

/// Header plus a few rows spanning two years
pub const SAMPLE_CALENDAR: &str = "国民の祝日・休日月日,国民の祝日・休日名称\r\n\
2024/11/23,勤労感謝の日\r\n\
2025/1/1,元日\r\n\
2025/1/13,成人の日\r\n\
2025/2/11,建国記念の日\r\n\
2025/5/5,こどもの日\r\n\
2026/1/1,元日\r\n";

pub struct MockCalendarServer {
    pub server: MockServer,
}

impl MockCalendarServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn url(&self) -> String {
        format!("{}{}", self.server.uri(), CALENDAR_PATH)
    }

    /// Serve `csv` encoded as Shift_JIS
    pub async fn mock_calendar(&self, csv: &str) {
        let (bytes, _, _) = SHIFT_JIS.encode(csv);
        self.mock_raw(bytes.into_owned()).await;
    }

    /// Serve raw bytes as the calendar body
    pub async fn mock_raw(&self, body: Vec<u8>) {
        Mock::given(method("GET"))
            .and(path(CALENDAR_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/csv")
                    .set_body_bytes(body),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn mock_failure(&self, status_code: u16) {
        Mock::given(method("GET"))
            .and(path(CALENDAR_PATH))
            .respond_with(ResponseTemplate::new(status_code))
            .mount(&self.server)
            .await;
    }

    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}
