use std::{fs, time::Duration};

use anyhow::Context;
use url::Url;

use crate::cli::Address;

const USER_AGENT: &str = concat!("publist/", env!("CARGO_PKG_VERSION"));

/// Settings for the single HTTP request made per run.
#[derive(Clone, Debug)]
pub struct FetchConfig {
    pub timeout_connect: Duration,
    pub timeout_global: Duration,
    pub max_redirects: u32,
    /// Largest response body accepted, in bytes.
    pub max_body: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            timeout_connect: Duration::from_secs(5),
            timeout_global: Duration::from_secs(30),
            max_redirects: 10,
            max_body: 64 * 1024 * 1024,
        }
    }
}

/// The data URL for a person page: DBLP serves the same page as XML under `.xml`.
pub fn data_url(url: &Url) -> Url {
    let mut url = url.clone();
    if let Some(stem) = url.path().strip_suffix(".html") {
        let path = format!("{stem}.xml");
        url.set_path(&path);
    }
    url
}

/// The address actually read for `address`, with person pages swapped for their XML form.
pub fn resolve(address: &Address) -> Address {
    match address {
        Address::Remote(url) => Address::Remote(data_url(url)),
        Address::Local(path) => Address::Local(path.clone()),
    }
}

/// Read the document behind `address` as text.
pub fn fetch(address: &Address, config: &FetchConfig) -> anyhow::Result<String> {
    match address {
        Address::Remote(url) => get(url, config),
        Address::Local(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
    }
}

fn get(url: &Url, config: &FetchConfig) -> anyhow::Result<String> {
    let cfg = ureq::Agent::config_builder()
        .timeout_connect(Some(config.timeout_connect))
        .timeout_global(Some(config.timeout_global))
        .max_redirects(config.max_redirects)
        .build();
    let agent = ureq::Agent::new_with_config(cfg);
    let body = agent
        .get(url.as_str())
        .header("User-Agent", USER_AGENT)
        .call()
        .with_context(|| format!("failed request for {url}"))?
        .into_body()
        .with_config()
        .limit(config.max_body)
        .read_to_string()
        .with_context(|| format!("failed to read response body from {url}"))?;
    Ok(body)
}
