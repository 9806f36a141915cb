//! Protocol statistics
//!
//! One-shot, unauthenticated GETs against each protocol's public stats
//! endpoints. A failed request or a missing field produces a "Failed to
//! fetch" line instead of an error; nothing is retried.

use serde_json::Value;
use std::fmt;
use std::time::Duration;

const KELPDAO_TVL_URL: &str = "https://universe.kelpdao.xyz/rseth/tvl/?lrtToken";
const KELPDAO_APY_URL: &str = "https://universe.kelpdao.xyz/rseth/apy";
const RENZO_STATS_URL: &str = "https://app.renzoprotocol.com/api/stats";
const ETHERFI_TVL_URL: &str = "https://app.ether.fi/api/protocol/tvl";
const ETHERFI_APY_URL: &str = "https://app.ether.fi/api/lrt2/apr";
const INCEPTION_APR_URL: &str = "https://bff.prod.inceptionlrt.com/stakingwatch/proxy/metric/apr/";
const SWELL_TVL_URL: &str = "https://v3-lrt.svc.swellnetwork.io/api/tokens/rsweth/tvl";
const SWELL_APY_URL: &str = "https://v3-lrt.svc.swellnetwork.io/api/tokens/rsweth/apr";

/// Base staking APR added on top of EtherFi's restaking APR
const ETHERFI_BASE_APR: f64 = 2.9;

/// LST paths Inception reports a 7-day APR for
const INCEPTION_ASSETS: [&str; 9] = [
    "lido/steth/",
    "rocket-pool/reth/",
    "frax/sfrxeth/",
    "ankr/ankreth/",
    "coinbase/cbeth/",
    "swell/sweth/",
    "stader/ethx/",
    "mantle/meth/",
    "inceptionlrt/insteth/",
];

/// One labelled statistic, `None` when it could not be fetched
#[derive(Debug, Clone, PartialEq)]
pub struct StatLine {
    pub label: String,
    pub value: Option<String>,
}

impl StatLine {
    fn new(label: impl Into<String>, value: Option<String>) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

impl fmt::Display for StatLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}: {}", self.label, value),
            None => write!(f, "Failed to fetch {}.", self.label),
        }
    }
}

/// HTTP client for the stats endpoints
pub struct StatsClient {
    http: reqwest::Client,
}

impl StatsClient {
    pub fn new(timeout: Duration) -> crate::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    /// GET `url` and return the top-level `key` of its JSON body
    async fn fetch_field(&self, url: &str, key: &str) -> Option<Value> {
        let response = match self.http.get(url).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                tracing::warn!(url, status = %r.status(), "Stats request failed");
                return None;
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "Stats request failed");
                return None;
            }
        };

        match response.json::<Value>().await {
            Ok(mut body) => body.get_mut(key).map(Value::take),
            Err(e) => {
                tracing::warn!(url, error = %e, "Stats response was not JSON");
                None
            }
        }
    }

    pub async fn kelpdao(&self) -> Vec<StatLine> {
        let tvl = self.fetch_field(KELPDAO_TVL_URL, "usdTvl").await;
        let apy = self.fetch_field(KELPDAO_APY_URL, "value").await;
        vec![
            StatLine::new("KelpDAO TVL in USD", tvl.as_ref().map(display)),
            StatLine::new("KelpDAO APY", apy.as_ref().map(|v| format!("{}%", display(v)))),
        ]
    }

    pub async fn renzo(&self) -> Vec<StatLine> {
        let data = self.fetch_field(RENZO_STATS_URL, "data").await;
        renzo_lines(data.as_ref())
    }

    pub async fn etherfi(&self) -> Vec<StatLine> {
        let tvl = self.fetch_field(ETHERFI_TVL_URL, "tvl").await;
        let apr = self.fetch_field(ETHERFI_APY_URL, "lrt2Apr").await;
        etherfi_lines(tvl.as_ref(), apr.as_ref())
    }

    pub async fn inception(&self) -> Vec<StatLine> {
        let mut lines = Vec::with_capacity(INCEPTION_ASSETS.len());
        for asset in INCEPTION_ASSETS {
            let url = format!("{}{}apr_7d", INCEPTION_APR_URL, asset);
            let data = self.fetch_field(&url, "data").await;
            lines.push(StatLine::new(
                format!("Inception APY for {}", asset),
                data.as_ref()
                    .and_then(|d| d.get("value"))
                    .and_then(as_f64)
                    .map(|v| format!("{}%", round2(v))),
            ));
        }
        lines
    }

    pub async fn swell(&self) -> Vec<StatLine> {
        let tvl = self.fetch_field(SWELL_TVL_URL, "s").await;
        let apy = self.fetch_field(SWELL_APY_URL, "value").await;
        vec![
            StatLine::new("Swell Finance TVL", tvl.as_ref().map(display)),
            StatLine::new(
                "Swell Finance APY",
                apy.as_ref().map(|v| format!("{}%", display(v))),
            ),
        ]
    }

    /// Every protocol in turn
    pub async fn all(&self) -> Vec<StatLine> {
        let mut lines = self.kelpdao().await;
        lines.extend(self.renzo().await);
        lines.extend(self.etherfi().await);
        lines.extend(self.inception().await);
        lines.extend(self.swell().await);
        lines
    }
}

fn renzo_lines(data: Option<&Value>) -> Vec<StatLine> {
    let at = |path: &[&str]| data.and_then(|d| lookup(d, path));

    vec![
        StatLine::new(
            "Restaked TVL (ezETH) in USD",
            at(&["restakedTVL", "ezETH", "usd"]).map(display),
        ),
        StatLine::new(
            "Restaked TVL (pzETH) in USD",
            at(&["restakedTVL", "pzETH", "usd"]).map(display),
        ),
        StatLine::new(
            "ezETH APR",
            at(&["apr", "data", "rate"])
                .and_then(as_f64)
                .map(|v| format!("{}%", round2(v))),
        ),
        StatLine::new(
            "pzETH APR",
            at(&["apr", "pzETHAPR", "rate"])
                .and_then(as_f64)
                .map(|v| format!("{}%", round2(v))),
        ),
    ]
}

fn etherfi_lines(tvl: Option<&Value>, apr: Option<&Value>) -> Vec<StatLine> {
    vec![
        StatLine::new("Etherfi TVL in USD", tvl.map(display)),
        StatLine::new(
            "Etherfi APY",
            apr.and_then(as_f64)
                .map(|v| format!("{}%", round2(ETHERFI_BASE_APR + v))),
        ),
    ]
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, key| v.get(*key))
}

/// Numbers, or strings holding numbers
fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
