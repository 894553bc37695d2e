use reqwest::Client;
use tokio::task::JoinHandle;

use crate::{info_time, Result};

/// Spawns the request for a document so it can download while the previous one is parsed.
pub(crate) fn spawn_request(client: &Client, url: &str) -> JoinHandle<Result<String>> {
    tokio::spawn({
        // Client uses Arc so we can clone cheaply
        let client = client.clone();
        let url = url.to_string();
        async move { request_html(&client, &url).await }
    })
}

/// Requests a document and returns a `Result<String>` containing the HTML.
/// Error statuses are turned into errors, there is no retrying.
pub(crate) async fn request_html(client: &Client, url: &str) -> Result<String> {
    info_time!("Requesting {url}");
    let res = client.get(url).send().await?.error_for_status()?;
    let html = res.text().await?;
    Ok(html)
}
