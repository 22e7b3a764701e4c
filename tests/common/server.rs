//! Mock appraisal server helpers and test client construction

use appraisal_report::{ApiConfig, AppraisalClient, Config, ExportConfig, ReportExporter};
use serde_json::Value;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path the report endpoint is mounted at on mock servers
pub const REPORT_PATH: &str = "/v3/appraise/order";

/// Build a client config pointed at a mock server
pub fn mock_config(server: &MockServer) -> Config {
    Config {
        api: ApiConfig {
            endpoint: format!("{}{}", server.uri(), REPORT_PATH),
            ..ApiConfig::default()
        },
        ..Config::default()
    }
}

/// Create a client pointed at a mock server
pub fn mock_client(server: &MockServer) -> AppraisalClient {
    AppraisalClient::new(mock_config(server)).expect("embedded credentials must decode")
}

/// Create an exporter writing into a fresh temp directory
///
/// Keep the returned `TempDir` alive for the duration of the test.
pub fn temp_exporter() -> (ReportExporter, TempDir) {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let exporter = ReportExporter::new(ExportConfig {
        output_dir: temp_dir.path().to_path_buf(),
        ..ExportConfig::default()
    })
    .expect("default export options are valid");
    (exporter, temp_dir)
}

/// Mount a GET handler for the report endpoint returning `status` and `body`
pub async fn mount_report(server: &MockServer, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path(REPORT_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a PNG photo at `photo_path`
pub async fn mount_photo(server: &MockServer, photo_path: &str, png: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(photo_path))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "image/png")
                .set_body_bytes(png),
        )
        .mount(server)
        .await;
}
