use crate::domain::model::Classification;
use crate::domain::ports::{ConfigProvider, Prober};
use crate::utils::error::{ProbeFailure, Result};
use reqwest::{redirect, Client};
use std::error::Error as StdError;
use std::io::ErrorKind;
use std::time::Duration;
use url::Url;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_USER_AGENT: &str = concat!("keepitalive/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub connect_timeout: Duration,
    /// End-to-end limit on top of the connect timeout. `None` leaves it unbounded.
    pub request_timeout: Option<Duration>,
    pub follow_redirects: bool,
    pub user_agent: String,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: None,
            follow_redirects: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ProbeSettings {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            connect_timeout: config.connect_timeout(),
            request_timeout: config.request_timeout(),
            follow_redirects: config.follow_redirects(),
            user_agent: config.user_agent().to_string(),
        }
    }
}

/// Probe executor backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(settings: &ProbeSettings) -> Result<Self> {
        let redirect_policy = if settings.follow_redirects {
            redirect::Policy::limited(10)
        } else {
            redirect::Policy::none()
        };

        // Probes go straight to the site, proxy environment variables are ignored.
        let mut builder = Client::builder()
            .no_proxy()
            .connect_timeout(settings.connect_timeout)
            .redirect(redirect_policy)
            .user_agent(settings.user_agent.clone());
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    async fn try_probe(&self, url: &str) -> std::result::Result<(), ProbeFailure> {
        let parsed =
            Url::parse(url).map_err(|e| ProbeFailure::MalformedUrl(parse_error_tag(e)))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| ProbeFailure::Transport(transport_error_tag(&e)))?;

        let status = response.status();
        tracing::debug!("Probe {} answered {}", url, status);

        if status.is_success() {
            Ok(())
        } else {
            Err(ProbeFailure::UnexpectedStatus(status.as_u16()))
        }
    }
}

impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> Classification {
        match self.try_probe(url).await {
            Ok(()) => Classification::Up,
            Err(failure) => {
                tracing::debug!("Probe {} failed: {}", url, failure);
                failure.into()
            }
        }
    }
}

fn parse_error_tag(error: url::ParseError) -> &'static str {
    use url::ParseError;

    match error {
        ParseError::EmptyHost => "EmptyHost",
        ParseError::IdnaError => "IdnaError",
        ParseError::InvalidPort => "InvalidPort",
        ParseError::InvalidIpv4Address => "InvalidIpv4Address",
        ParseError::InvalidIpv6Address => "InvalidIpv6Address",
        ParseError::InvalidDomainCharacter => "InvalidDomainCharacter",
        ParseError::RelativeUrlWithoutBase => "RelativeUrlWithoutBase",
        _ => "MalformedUrl",
    }
}

/// Every detail a transport failure can resolve to.
pub const TRANSPORT_TAGS: &[&str] = &[
    "TimeoutError",
    "ConnectError",
    "ConnectionReset",
    "ConnectionAborted",
    "RedirectError",
    "RequestBuildError",
    "BodyError",
    "RequestError",
];

// Timeout is checked first: a connect timeout reports both.
fn transport_error_tag(error: &reqwest::Error) -> &'static str {
    if error.is_timeout() {
        "TimeoutError"
    } else if error.is_connect() {
        "ConnectError"
    } else if let Some(tag) = io_error_tag(error) {
        tag
    } else if error.is_redirect() {
        "RedirectError"
    } else if error.is_builder() {
        "RequestBuildError"
    } else if error.is_body() || error.is_decode() {
        "BodyError"
    } else {
        "RequestError"
    }
}

/// Looks down the source chain for an I/O error worth its own tag.
fn io_error_tag(error: &(dyn StdError + 'static)) -> Option<&'static str> {
    let mut current = Some(error);
    while let Some(err) = current {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            match io.kind() {
                ErrorKind::ConnectionReset => return Some("ConnectionReset"),
                ErrorKind::ConnectionAborted => return Some("ConnectionAborted"),
                _ => {}
            }
        }
        current = err.source();
    }
    None
}
