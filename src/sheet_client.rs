use crate::errors::AppError;
use std::time::Duration;

/// Client that downloads the roster workbook.
#[derive(Clone)]
pub struct SheetClient {
    client: reqwest::Client,
    url: String,
}

impl SheetClient {
    /// Creates a new `SheetClient`.
    ///
    /// # Arguments
    ///
    /// * `url` - Direct download link of the workbook.
    /// * `timeout` - Per-request timeout.
    pub fn new(url: String, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create sheet client: {}", e))
            })?;

        Ok(Self { client, url })
    }

    /// Downloads the workbook bytes.
    pub async fn fetch_workbook(&self) -> Result<Vec<u8>, AppError> {
        tracing::info!("Downloading roster workbook");
        // Share links carry their access key in the query string
        tracing::debug!(
            "Workbook URL: {}?[REDACTED]",
            self.url.split('?').next().unwrap_or_default()
        );

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Sheet request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::ExternalApiError(format!(
                "Sheet download returned {}",
                status
            )));
        }

        let bytes = response.bytes().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to read sheet body: {}", e))
        })?;

        tracing::debug!("Workbook downloaded: {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}
