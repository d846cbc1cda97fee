use std::sync::OnceLock;
use std::time::Duration;

// If no data is read for this period of time during a request, the request will be failed.
const REQUEST_TIMEOUT_READ_SECS: u64 = 20;
// If no data is written for this period of time during a request, the request will be failed.
const REQUEST_TIMEOUT_WRITE_SECS: u64 = 20;

/// The ureq agent used for all catalog requests.
static AGENT: OnceLock<ureq::Agent> = OnceLock::new();

pub fn get_agent() -> &'static ureq::Agent {
    AGENT.get_or_init(|| {
        ureq::AgentBuilder::new()
            .timeout_read(Duration::from_secs(REQUEST_TIMEOUT_READ_SECS))
            .timeout_write(Duration::from_secs(REQUEST_TIMEOUT_WRITE_SECS))
            .https_only(true)
            .try_proxy_from_env(true)
            .user_agent(format!("rvb-agent/{}", env!("CARGO_PKG_VERSION")).as_str())
            .build()
    })
}
