use std::process::Stdio;
use std::time::Duration;

use anyhow::Context as _;
use bytes::Bytes;
use http_body_util::{BodyExt as _, Full};
use hyper::{Method, Request};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use tokio::io::{AsyncBufReadExt as _, BufReader};

async fn fetch(
    client: &Client<HttpConnector, Full<Bytes>>,
    method: Method,
    url: &str,
) -> anyhow::Result<(u16, serde_json::Value)> {
    let req = Request::builder()
        .method(method)
        .uri(url)
        .body(Full::default())
        .context("build request")?;

    let res = client.request(req).await.context("send request")?;
    let status = res.status().as_u16();
    let body = res
        .into_body()
        .collect()
        .await
        .context("read body")?
        .to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).context("parse body json")?;
    Ok((status, json))
}

#[tokio::test]
async fn e2e_control_api_runs_and_serves_results() -> anyhow::Result<()> {
    let exe = env!("CARGO_BIN_EXE_faceoff");

    let mut child = tokio::process::Command::new(exe)
        .arg("serve")
        .arg("--embedded")
        .arg("--bind")
        .arg("127.0.0.1:0")
        .arg("--levels")
        .arg("1,2")
        .arg("--stream-items")
        .arg("5")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .context("spawn faceoff serve")?;

    let stderr = child.stderr.take().context("missing stderr")?;
    let mut stderr_lines = BufReader::new(stderr).lines();

    let base_url = tokio::time::timeout(Duration::from_secs(10), async {
        while let Some(line) = stderr_lines.next_line().await? {
            if let Some(v) = line.strip_prefix("control_api=") {
                return Ok::<_, anyhow::Error>(v.trim().to_string());
            }
        }
        anyhow::bail!("control api url not found on stderr");
    })
    .await
    .context("timed out waiting for control api url")??;

    let client: Client<HttpConnector, Full<Bytes>> =
        Client::builder(TokioExecutor::new()).build_http();

    // No run yet: the store is empty and the API says so.
    let (status, body) = fetch(&client, Method::GET, &format!("{base_url}/api/results")).await?;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "No benchmark results available.");

    // Trigger a run against the embedded backends.
    let (status, body) = fetch(
        &client,
        Method::POST,
        &format!("{base_url}/api/run-benchmark"),
    )
    .await?;
    assert_eq!(status, 200, "run failed: {body}");
    assert_eq!(body["success"], true);
    let backends = body["results"]["backends"]
        .as_array()
        .context("results should list backends")?;
    assert_eq!(backends.len(), 2);
    assert_eq!(backends[0]["name"], "grpc");
    assert_eq!(backends[1]["name"], "http");

    // The stored report is now reachable.
    let (status, body) = fetch(&client, Method::GET, &format!("{base_url}/api/results")).await?;
    assert_eq!(status, 200);
    assert_eq!(
        body["backends"][0]["scalability"]["query"]
            .as_array()
            .map(Vec::len),
        Some(2)
    );
    assert!(body["cpuUsage"]["initial"]["memoryMb"].is_number());

    child.kill().await.context("kill faceoff serve")?;
    Ok(())
}
