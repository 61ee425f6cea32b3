use log::debug;
use reqwest::{
    header::{ACCEPT, USER_AGENT},
    Client, StatusCode,
};

use crate::config::ProviderSettings;
use crate::error::{AppError, Context, Result};

use super::{decode::parse_chart_payload, Candle};

/// Thin async client for the chart endpoint. Cheap to clone; share one per run.
#[derive(Clone)]
pub struct HistoryClient {
    client: Client,
    endpoint: String,
    user_agent: String,
}

impl HistoryClient {
    pub fn new(settings: &ProviderSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .context("Failed to construct history HTTP client")?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            user_agent: settings.user_agent.clone(),
        })
    }

    pub fn chart_url(&self, ticker: &str) -> String {
        format!("{}/{}", self.endpoint, ticker)
    }

    /// Download OHLCV history for `ticker`.
    ///
    /// A 429 response becomes `AppError::RateLimited`; every other non-success
    /// status is reported with the status text so the caller can log it.
    /// Error text never embeds the symbol or the request URL.
    pub async fn fetch_history(
        &self,
        ticker: &str,
        period: &str,
        interval: &str,
    ) -> Result<Vec<Candle>> {
        let url = self.chart_url(ticker);
        debug!("requesting {url} range={period} interval={interval}");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("range", period),
                ("interval", interval),
                ("includePrePost", "false"),
            ])
            .header(USER_AGENT, self.user_agent.as_str())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("History request failed")?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::RateLimited {
                ticker: ticker.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to read history body")?;

        if !status.is_success() {
            // The chart endpoint explains most rejections in a JSON error block.
            if let Err(err @ AppError::Message(_)) = parse_chart_payload(&body) {
                return Err(AppError::message(format!("{err} [status {status}]")));
            }
            return Err(AppError::message(format!(
                "History request failed with status {status}"
            )));
        }

        parse_chart_payload(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{classify, FailureKind};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answer exactly one HTTP request with a canned response. The task yields
    /// the raw request head it received.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (HistoryClient, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request: Vec<u8> = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                let read = socket.read(&mut chunk).await.unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..read]);
            }

            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).into_owned()
        });

        let settings = ProviderSettings {
            endpoint: format!("http://{addr}/v8/finance/chart"),
            ..ProviderSettings::default()
        };
        (HistoryClient::new(&settings).unwrap(), server)
    }

    #[tokio::test]
    async fn too_many_requests_becomes_rate_limited() {
        let (client, server) = serve_once("429 Too Many Requests", "Too Many Requests").await;

        let err = client.fetch_history("TCS.NS", "1y", "1d").await.unwrap_err();

        assert!(matches!(err, AppError::RateLimited { .. }));
        assert_eq!(classify(&err), FailureKind::RateLimited);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn rejected_numeric_symbol_is_a_plain_failure() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let (client, server) = serve_once("404 Not Found", body).await;

        let err = client.fetch_history("500429.BO", "1y", "1d").await.unwrap_err();

        assert!(matches!(err, AppError::Message(_)));
        let text = err.to_string();
        assert!(text.contains("delisted"));
        assert!(text.contains("[status 404 Not Found]"));
        assert_eq!(classify(&err), FailureKind::Other);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn non_json_error_body_reports_the_status() {
        let (client, server) = serve_once("503 Service Unavailable", "<html>busy</html>").await;

        let err = client.fetch_history("6429.T", "1y", "1d").await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "History request failed with status 503 Service Unavailable"
        );
        assert_eq!(classify(&err), FailureKind::Other);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn successful_response_is_decoded_and_query_is_sent() {
        let body = r#"{"chart":{"result":[{"timestamp":[1704166200],"indicators":{"quote":[{"open":[10.0],"high":[11.0],"low":[9.5],"close":[10.5],"volume":[1200]}]}}],"error":null}}"#;
        let (client, server) = serve_once("200 OK", body).await;

        let candles = client.fetch_history("INFY.NS", "6mo", "1wk").await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].volume, 1200);
        assert!(request.starts_with("GET /v8/finance/chart/INFY.NS?"));
        assert!(request.contains("range=6mo"));
        assert!(request.contains("interval=1wk"));
        assert!(request.to_ascii_lowercase().contains("user-agent: mozilla"));
    }

    #[test]
    fn chart_url_joins_endpoint_and_ticker() {
        let settings = ProviderSettings {
            endpoint: "http://localhost:8080/v8/finance/chart/".to_string(),
            ..ProviderSettings::default()
        };
        let client = HistoryClient::new(&settings).unwrap();
        assert_eq!(
            client.chart_url("^NSEI"),
            "http://localhost:8080/v8/finance/chart/^NSEI"
        );
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn fetches_live_history() {
        let client = HistoryClient::new(&ProviderSettings::default()).unwrap();
        let candles = client.fetch_history("RELIANCE.NS", "1mo", "1d").await.unwrap();
        assert!(!candles.is_empty());
    }
}
