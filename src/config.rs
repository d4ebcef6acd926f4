use std::path::PathBuf;

use crate::retry::RetryPolicy;

static SECURE_ROOT: &str = "https://secure.bebo.com";
static SIGN_IN_URL: &str = "https://secure.bebo.com/SignIn.jsp";
static SIGN_IN_REJECTED_URL: &str = "https://secure.bebo.com/JSRedirect.jsp?Location=SignIn.jsp";
static BASE_ORIGIN: &str = "http://www.bebo.com";
static FILE_HOST: &str = "http://i4.bebo.com/";
static BB_HOST: &str = "http://bb.bebo.com/bb";

pub static LOG_ENV: &str = "BEBO_DL_LOG";
const MAX_PHOTO_FAILURES: usize = 5;

/// Everything that ties the tool to the site's current layout.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub secure_root: String,
    pub sign_in_url: String,
    /// Landing page after a rejected sign-in.
    pub sign_in_rejected_url: String,
    /// Origin used to absolutize relative links.
    pub base_origin: String,
    /// Replaces the `file` prefix of photo locators.
    pub file_host: String,
    /// Replaces the `bb` prefix of photo locators.
    pub bb_host: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            secure_root: SECURE_ROOT.to_owned(),
            sign_in_url: SIGN_IN_URL.to_owned(),
            sign_in_rejected_url: SIGN_IN_REJECTED_URL.to_owned(),
            base_origin: BASE_ORIGIN.to_owned(),
            file_host: FILE_HOST.to_owned(),
            bb_host: BB_HOST.to_owned(),
        }
    }
}

impl SiteConfig {
    pub fn sign_in_form<'a>(&self, username: &'a str, password: &'a str) -> Vec<(&'static str, &'a str)> {
        vec![
            ("EmailUsername", username),
            ("Password", password),
            ("fpLogin", "Log In"),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub site: SiteConfig,
    pub retry: RetryPolicy,
    /// An album is abandoned once more photos than this have failed.
    pub max_photo_failures: usize,
    pub outdir: PathBuf,
}

impl RunConfig {
    pub fn new(outdir: PathBuf) -> Self {
        RunConfig {
            site: SiteConfig::default(),
            retry: RetryPolicy::default(),
            max_photo_failures: MAX_PHOTO_FAILURES,
            outdir,
        }
    }
}
