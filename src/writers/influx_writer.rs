use crate::config::InfluxConfig;
use crate::error::{ProcessingError, Result};
use crate::models::Point;
use crate::utils::constants::{UNPROCESSABLE_STATUS, WRITE_ENDPOINT, WRITE_PRECISION};
use crate::writers::line_protocol::encode_batch;
use crate::writers::{PointSink, WriteOutcome};
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Error body returned by the InfluxDB v2 API
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Synchronous writer for the InfluxDB v2 `/api/v2/write` endpoint.
///
/// Each call to [`PointSink::write`] is one blocking request; the caller
/// does not continue until the server has answered.
pub struct InfluxWriter {
    client: Client,
    write_url: String,
    token: String,
    org: String,
    bucket: String,
}

impl InfluxWriter {
    pub fn new(config: &InfluxConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            write_url: write_url(&config.url),
            token: config.token.clone(),
            org: config.org.clone(),
            bucket: config.bucket.clone(),
        })
    }
}

impl PointSink for InfluxWriter {
    fn write(&mut self, points: &[Point]) -> Result<WriteOutcome> {
        debug!("Writing {} points to bucket {}", points.len(), self.bucket);

        let response = self
            .client
            .post(&self.write_url)
            .query(&[
                ("org", self.org.as_str()),
                ("bucket", self.bucket.as_str()),
                ("precision", WRITE_PRECISION),
            ])
            .header(AUTHORIZATION, format!("Token {}", self.token))
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(encode_batch(points))
            .send()?;

        let status = response.status();
        if status.is_success() {
            return Ok(WriteOutcome::Accepted);
        }

        let body = match response.text() {
            Ok(body) => body,
            Err(e) => {
                debug!("Could not read body of {} response: {}", status, e);
                String::new()
            }
        };
        classify_response(status, &body)
    }
}

fn write_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), WRITE_ENDPOINT)
}

/// Map a write response to an outcome.
///
/// 422 means the batch conflicts with the types already stored for a
/// measurement; every other failure status is returned as an error.
pub fn classify_response(status: StatusCode, body: &str) -> Result<WriteOutcome> {
    if status.is_success() {
        return Ok(WriteOutcome::Accepted);
    }

    let message = error_message(body);
    if status.as_u16() == UNPROCESSABLE_STATUS {
        Ok(WriteOutcome::Conflict { message })
    } else {
        Err(ProcessingError::WriteRejected {
            status: status.as_u16(),
            message,
        })
    }
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(ApiErrorBody {
            message: Some(message),
            ..
        }) => message,
        Ok(ApiErrorBody {
            code: Some(code), ..
        }) => code,
        _ => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> InfluxConfig {
        InfluxConfig {
            url: url.to_string(),
            token: "secret".to_string(),
            org: "home".to_string(),
            bucket: "weather".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_write_url() -> Result<()> {
        let writer = InfluxWriter::new(&config("http://localhost:8086/"))?;
        assert_eq!(writer.write_url, "http://localhost:8086/api/v2/write");

        let writer = InfluxWriter::new(&config("https://influx.example.org"))?;
        assert_eq!(writer.write_url, "https://influx.example.org/api/v2/write");
        Ok(())
    }

    #[test]
    fn test_success_is_accepted() {
        let outcome = classify_response(StatusCode::NO_CONTENT, "").unwrap();
        assert_eq!(outcome, WriteOutcome::Accepted);
    }

    #[test]
    fn test_unprocessable_is_conflict() {
        let body = r#"{"code":"unprocessable entity","message":"failure writing points to database: partial write: field type conflict"}"#;
        let outcome = classify_response(StatusCode::UNPROCESSABLE_ENTITY, body).unwrap();

        match outcome {
            WriteOutcome::Conflict { message } => {
                assert!(message.contains("field type conflict"));
            }
            other => panic!("expected Conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_other_statuses_are_errors() {
        let body = r#"{"code":"unauthorized","message":"unauthorized access"}"#;
        let err = classify_response(StatusCode::UNAUTHORIZED, body).unwrap_err();

        match err {
            ProcessingError::WriteRejected { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "unauthorized access");
            }
            other => panic!("expected WriteRejected, got {:?}", other),
        }
        assert!(classify_response(StatusCode::INTERNAL_SERVER_ERROR, "").is_err());
        assert!(classify_response(StatusCode::BAD_REQUEST, "").is_err());
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message(r#"{"code":"not found"}"#), "not found");
        assert_eq!(error_message("  bucket missing \n"), "bucket missing");
    }
}
