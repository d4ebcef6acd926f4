mod albums;
mod cli;
mod config;
mod credentials;
mod downloader;
mod error;
mod html;
mod model;
mod naming;
mod navigation;
mod progress;
mod retry;
mod session;
#[cfg(test)]
mod test_helpers;

use std::io::stdout;
use std::path::PathBuf;
use std::process::exit;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::albums::list_albums;
use crate::cli::{build_cli, DownloadCmd};
use crate::config::{RunConfig, LOG_ENV};
use crate::credentials::PromptCredentials;
use crate::downloader::AlbumDownloader;
use crate::error::{BeboError, Result};
use crate::model::album::Album;
use crate::naming::{sanitize, unique_directory};
use crate::navigation::find_photos_link;
use crate::session::{HttpTransport, Session, Transport};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();

    let cmd = DownloadCmd::build(&build_cli()).unwrap_or_else(|err| {
        fail(&format!("Unable to read the current directory: {}", err))
    });
    let prompt = PromptCredentials { username: cmd.username.clone() };
    let config = RunConfig::new(cmd.outdir);

    let transport = HttpTransport::new().unwrap_or_else(|err| {
        debug!("http client: {}", err);
        fail("Unable to connect to bebo.")
    });
    let session = match Session::login(transport, config.site.clone(), &prompt).await {
        Ok(session) => session,
        Err(BeboError::InvalidCredentials) => fail("Incorrect username or password."),
        Err(BeboError::Io(err)) => fail(&format!("Unable to read login details: {}", err)),
        Err(err) => {
            debug!("login failed: {}", err);
            fail("Unable to connect to bebo.")
        }
    };
    println!("Login Successful.");

    let userdir = user_directory(&config, session.username())
        .unwrap_or_else(|err| fail(&format!("ERROR: Unable to create download folder: {}", err)));

    let albums = match load_albums(&session).await {
        Ok(albums) => albums,
        Err(BeboError::Parse(msg)) => {
            debug!("album info: {}", msg);
            fail("ERROR: Unable to parse album info.")
        }
        Err(err) => {
            debug!("album info: {}", err);
            fail("ERROR: Unable to load album info")
        }
    };
    println!("📚 found {} albums", albums.len());

    let summary = AlbumDownloader::new(&session, &config)
        .download_all(&mut stdout(), &albums, &userdir)
        .await
        .unwrap_or_else(|err| fail(&format!("ERROR: {}", err)));
    if !summary.failed.is_empty() {
        println!("{} of {} albums could not be downloaded.", summary.failed.len(), albums.len());
    }
    debug!("{} albums saved", summary.downloaded.len());

    println!("Done");
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn user_directory(config: &RunConfig, username: &str) -> Result<PathBuf> {
    let dir = unique_directory(&config.outdir.join(sanitize(username)))?;
    debug!("downloading into {:?}", dir);
    Ok(dir)
}

async fn load_albums<T: Transport>(session: &Session<T>) -> Result<Vec<Album>> {
    let photos_url = find_photos_link(session).await?;
    let photos_url = session.absolute_url(&photos_url)?;
    list_albums(session, &photos_url).await
}

fn fail(msg: &str) -> ! {
    eprintln!("❌  {}", msg);
    exit(1);
}
