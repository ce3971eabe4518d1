pub mod ledger;

use crate::api::responses::RpcResp;
use log::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::{Error, ErrorKind};
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

fn _version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
fn _pkg_name() -> &'static str {
    env!("CARGO_PKG_NAME")
}

pub fn version() -> String {
    format!("{}: {}", _pkg_name(), _version())
}

#[test]
fn test_version() {
    println!("{}", version());
}

pub fn get_url(host: &str, port: u16, use_tls: bool) -> String {
    let scheme = if use_tls { "https" } else { "http" };
    format!("{scheme}://{host}:{port}/")
}

pub fn get_client(timeout_secs: u64) -> Result<Client, Error> {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(version())
        .build()
        .map_err(|e| Error::other(format!("{e:?}")))
}

pub fn build_headers(additional_headers: &Option<HashMap<String, String>>) -> Result<HeaderMap, Error> {
    let mut header_map = HeaderMap::new();
    if let Some(m) = additional_headers {
        for (k, v) in m {
            header_map.insert(
                HeaderName::from_str(k).map_err(|e| {
                    Error::new(
                        ErrorKind::InvalidData,
                        format!("Failed to Parse Header Name {k},\r\n {e}"),
                    )
                })?,
                HeaderValue::from_str(v).map_err(|e| {
                    Error::new(
                        ErrorKind::InvalidData,
                        format!("Failed to Parse Header value {v},\r\n {e}"),
                    )
                })?,
            );
        }
    }
    Ok(header_map)
}

pub fn build_request(method: &str, params: Value, id: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    })
}

/// Unwraps a JSON-RPC envelope, turning an `error` member or a missing `result` into an `Error`.
pub fn parse_response<T>(method: &str, body: &str) -> Result<T, Error>
where
    T: DeserializeOwned,
{
    let resp: RpcResp<T> = serde_json::from_str(body).map_err(|e| {
        Error::new(
            ErrorKind::InvalidData,
            format!("Failed to Parse Json {body},\r\n {e}"),
        )
    })?;
    if let Some(err) = resp.error {
        return Err(Error::other(format!(
            "{method} failed with code {}: {}",
            err.code, err.message
        )));
    }
    resp.result.ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidData,
            format!("{method} returned neither a result nor an error"),
        )
    })
}

pub async fn call<T>(
    client: &Client,
    url: &str,
    method: &str,
    params: Value,
    additional_headers: &Option<HashMap<String, String>>,
) -> Result<T, Error>
where
    T: DeserializeOwned,
{
    let id = Uuid::new_v4().to_string();
    debug!("-> {method} ({id})");
    let request = build_request(method, params, &id);
    match client
        .post(url)
        .headers(build_headers(additional_headers)?)
        .json(&request)
        .send()
        .await
    {
        Ok(resp) => match resp.status() {
            reqwest::StatusCode::OK => {
                let body = resp
                    .text()
                    .await
                    .map_err(|e| Error::new(ErrorKind::InvalidData, e.to_string()))?;
                debug!("<- {method} ({id}) {} bytes", body.len());
                parse_response(method, &body)
            }
            status => Err(Error::new(
                ErrorKind::InvalidData,
                format!("Bad Status Code: {status:?}, for URL {url:?}"),
            )),
        },
        Err(err) if err.is_timeout() => Err(Error::new(ErrorKind::TimedOut, format!("{err:?}"))),
        Err(err) => Err(Error::new(ErrorKind::ConnectionRefused, format!("{err:?}"))),
    }
}
