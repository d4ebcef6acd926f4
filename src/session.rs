//! Authenticated access to the site.
//!
//! All network traffic goes through [`Transport`], so the scraping code can be
//! driven by an in-memory fake in tests. [`HttpTransport`] is the real thing:
//! a `reqwest` client with a cookie store, which is all a "session" is here.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Response, Url};
use tracing::debug;

use crate::config::SiteConfig;
use crate::credentials::CredentialProvider;
use crate::error::{BeboError, Result};
use crate::retry::RetryPolicy;

/// A fetched HTML page and the URL it was finally served from.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub url: String,
    pub body: String,
}

#[async_trait(?Send)]
pub trait Transport {
    async fn get(&self, url: &str) -> Result<Page>;
    async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<Page>;
    async fn fetch_bytes(&self, url: &str) -> Result<Bytes>;
}

pub(crate) fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|_| BeboError::MalformedUrl(url.to_owned()))
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<HttpTransport> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|err| BeboError::Connect(err.to_string()))?;

        Ok(HttpTransport { client })
    }

    async fn into_page(response: Response) -> Result<Page> {
        let status = response.status();
        let url = response.url().to_string();
        if !status.is_success() {
            return Err(BeboError::Connect(format!("{} responded with {}", url, status)));
        }

        let body = response.text().await.map_err(|err| BeboError::Connect(err.to_string()))?;
        Ok(Page { url, body })
    }
}

#[async_trait(?Send)]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Page> {
        debug!("GET {}", url);
        let response = self.client
            .get(parse_url(url)?)
            .send()
            .await
            .map_err(|err| BeboError::Connect(err.to_string()))?;

        Self::into_page(response).await
    }

    async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<Page> {
        debug!("POST {}", url);
        let response = self.client
            .post(parse_url(url)?)
            .form(fields)
            .send()
            .await
            .map_err(|err| BeboError::Connect(err.to_string()))?;

        Self::into_page(response).await
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Bytes> {
        debug!("GET {}", url);
        let response = self.client
            .get(parse_url(url)?)
            .send()
            .await
            .map_err(|err| BeboError::Download(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BeboError::Download(format!("{} responded with {}", url, status)));
        }

        response.bytes().await.map_err(|err| BeboError::Download(err.to_string()))
    }
}

/// A logged-in transport plus the site and account it is logged into.
pub struct Session<T: Transport> {
    transport: T,
    site: SiteConfig,
    username: String,
}

impl<T: Transport> Session<T> {
    /// Asks `provider` for credentials, seeds cookies from the secure root,
    /// then posts the sign-in form. A provider that can't deliver (e.g. a
    /// cancelled prompt) surfaces as `BeboError::Io`.
    ///
    /// Landing back on the sign-in redirect means the site rejected the
    /// credentials. There is exactly one attempt: a failed login is reported,
    /// not retried.
    pub async fn login<C>(transport: T, site: SiteConfig, provider: &C) -> Result<Session<T>>
    where
        C: CredentialProvider + ?Sized,
    {
        let credentials = provider.credentials()?;
        let policy = RetryPolicy::once();

        policy.run("session cookies", || transport.get(&site.secure_root)).await?;

        let form = site.sign_in_form(&credentials.username, &credentials.password);
        let landing = policy
            .run("sign in", || transport.post_form(&site.sign_in_url, &form))
            .await?;

        if landing.url == site.sign_in_rejected_url {
            return Err(BeboError::InvalidCredentials);
        }

        Ok(Session { transport, site, username: credentials.username })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn get(&self, url: &str) -> Result<Page> {
        self.transport.get(url).await
    }

    /// Resolves `href` against the site's base origin.
    pub fn absolute_url(&self, href: &str) -> Result<String> {
        let base = parse_url(&self.site.base_origin)?;
        base.join(href)
            .map(String::from)
            .map_err(|_| BeboError::MalformedUrl(href.to_owned()))
    }
}
