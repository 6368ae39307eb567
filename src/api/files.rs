//! Uploaded-file endpoints.

use futures::StreamExt;
use tracing::debug;

use crate::error::Result;

use super::http::status_to_error;
use super::ApiClient;

impl ApiClient {
    /// Fetch a file's binary content (a PDF), streaming the body.
    pub async fn fetch_file(&self, file_id: i64) -> Result<Vec<u8>> {
        let resp = self
            .authorized(self.http().get(self.url(&format!("/api/files/{file_id}"))))
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body));
        }

        let mut bytes = Vec::new();
        let mut stream = resp.bytes_stream();
        while let Some(chunk) = stream.next().await {
            bytes.extend_from_slice(&chunk?);
        }
        debug!(file_id, len = bytes.len(), "fetched file");
        Ok(bytes)
    }

    /// Delete an uploaded file.
    pub async fn delete_file(&self, file_id: i64) -> Result<()> {
        debug!(file_id, "delete file");
        let resp = self
            .authorized(
                self.http()
                    .delete(self.url(&format!("/api/files/{file_id}"))),
            )
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body));
        }
        Ok(())
    }
}
