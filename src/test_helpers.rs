//! In-memory transport for driving the scrapers in tests.

use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;

use crate::credentials::{Credentials, StaticCredentials};
use crate::error::{BeboError, Result};
use crate::session::{parse_url, Page, Session, Transport};

#[derive(Debug, Clone)]
pub enum Reply {
    Page { url: Option<String>, body: String },
    Bytes(Vec<u8>),
    ConnectFailure,
    DownloadFailure,
}

impl Reply {
    pub fn page(body: &str) -> Reply {
        Reply::Page { url: None, body: body.to_owned() }
    }

    pub fn redirect(to: &str, body: &str) -> Reply {
        Reply::Page { url: Some(to.to_owned()), body: body.to_owned() }
    }

    pub fn bytes(data: &[u8]) -> Reply {
        Reply::Bytes(data.to_vec())
    }
}

/// Replies are scripted per URL and consumed in order; the last one repeats.
#[derive(Default)]
pub struct FakeTransport {
    replies: RefCell<HashMap<String, Vec<Reply>>>,
    requests: RefCell<Vec<String>>,
    forms: RefCell<Vec<Vec<(String, String)>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        FakeTransport::default()
    }

    pub fn on(self, url: &str, reply: Reply) -> Self {
        self.replies.borrow_mut().entry(url.to_owned()).or_default().push(reply);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn count(&self, url: &str) -> usize {
        self.requests.borrow().iter().filter(|r| r.as_str() == url).count()
    }

    pub fn forms(&self) -> Vec<Vec<(String, String)>> {
        self.forms.borrow().clone()
    }

    fn next(&self, url: &str) -> Option<Reply> {
        self.requests.borrow_mut().push(url.to_owned());
        let mut replies = self.replies.borrow_mut();
        let queue = replies.get_mut(url)?;
        if queue.len() > 1 { Some(queue.remove(0)) } else { queue.first().cloned() }
    }

    fn page(&self, url: &str) -> Result<Page> {
        match self.next(url) {
            Some(Reply::Page { url: landing, body }) => Ok(Page {
                url: landing.unwrap_or_else(|| url.to_owned()),
                body,
            }),
            Some(Reply::DownloadFailure) => Err(BeboError::Download(url.to_owned())),
            _ => Err(BeboError::Connect(url.to_owned())),
        }
    }
}

#[async_trait(?Send)]
impl Transport for FakeTransport {
    async fn get(&self, url: &str) -> Result<Page> {
        self.page(url)
    }

    async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<Page> {
        self.forms.borrow_mut().push(
            fields.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
        );
        self.page(url)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Bytes> {
        parse_url(url)?;
        match self.next(url) {
            Some(Reply::Bytes(data)) => Ok(Bytes::from(data)),
            Some(Reply::ConnectFailure) => Err(BeboError::Connect(url.to_owned())),
            _ => Err(BeboError::Download(url.to_owned())),
        }
    }
}

/// Logs the fake in against the default site so tests start from a session.
pub async fn logged_in(transport: FakeTransport) -> Session<FakeTransport> {
    let site = crate::config::SiteConfig::default();
    let transport = transport
        .on(&site.secure_root, Reply::page("<html></html>"))
        .on(&site.sign_in_url, Reply::page("<html>welcome</html>"));
    let credentials = StaticCredentials(Credentials {
        username: "alice".into(),
        password: "pw".into(),
    });

    match Session::login(transport, site, &credentials).await {
        Ok(session) => session,
        Err(err) => panic!("fake login failed: {}", err),
    }
}
