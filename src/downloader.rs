//! Album downloads.
//!
//! The album page embeds its photo list as a `DynamicValues = {...};`
//! script. Each photo is fetched into its own uniquely named file; failed
//! photos are skipped, but once more than `max_photo_failures` have failed
//! the whole album is abandoned, since at that point the site is broken
//! rather than a single file.

use std::io::Write;
use std::path::{Path, PathBuf};

use scraper::Html;
use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::error::{BeboError, Result};
use crate::html;
use crate::model::album::Album;
use crate::model::photo::{AlbumMetadata, PhotoRecord, METADATA_MARKER};
use crate::naming::{photo_filename, photo_url, sanitize, split_extension, unique_directory, unique_filename};
use crate::progress::{photo_counter, rewrite_message};
use crate::retry::RetryPolicy;
use crate::session::{Session, Transport};

const UNNAMED_ALBUM: &str = "ALBUM";

#[derive(Debug, Clone, PartialEq)]
pub struct AlbumReport {
    pub directory: PathBuf,
    pub photos: usize,
    pub failures: usize,
}

#[derive(Debug, Default)]
pub struct DownloadSummary {
    pub downloaded: Vec<AlbumReport>,
    /// Names of the albums that were abandoned.
    pub failed: Vec<String>,
}

pub struct AlbumDownloader<'a, T: Transport> {
    session: &'a Session<T>,
    retry: RetryPolicy,
    max_photo_failures: usize,
}

impl<'a, T: Transport> AlbumDownloader<'a, T> {
    pub fn new(session: &'a Session<T>, config: &RunConfig) -> Self {
        AlbumDownloader {
            session,
            retry: config.retry.clone(),
            max_photo_failures: config.max_photo_failures,
        }
    }

    /// Downloads the albums one after the other and prints a line per
    /// album. A failed album is reported and the next one still runs.
    pub async fn download_all<W: Write>(&self, out: &mut W, albums: &[Album], outdir: &Path) -> Result<DownloadSummary> {
        let mut summary = DownloadSummary::default();
        for album in albums {
            match self.download_album(out, album, outdir).await {
                Ok(report) => {
                    debug!("album {} written to {:?}", album, report.directory);
                    if report.failures > 0 {
                        writeln!(
                            out,
                            "Album \"{}\" downloaded, {} of {} photos could not be fetched.",
                            album.name, report.failures, report.photos
                        )?;
                    } else {
                        writeln!(out, "Album \"{}\" downloaded successfully.", album.name)?;
                    }
                    summary.downloaded.push(report);
                }
                Err(err) => {
                    writeln!(out, "Error loading album \"{}\": {}", album.name, err)?;
                    summary.failed.push(album.name.clone());
                }
            }
        }

        Ok(summary)
    }

    /// Downloads one album into a fresh directory under `outdir`, printing
    /// progress to `out`. The progress line always ends with a newline,
    /// whatever the outcome, so the caller's summary starts on a line of
    /// its own.
    pub async fn download_album<W: Write>(&self, out: &mut W, album: &Album, outdir: &Path) -> Result<AlbumReport> {
        write!(out, "Downloading: \"{}\"", album.name)?;
        out.flush()?;

        let result = self.save_album(out, album, outdir).await;
        writeln!(out)?;
        result
    }

    async fn save_album<W: Write>(&self, out: &mut W, album: &Album, outdir: &Path) -> Result<AlbumReport> {
        let page = self.retry
            .run("album page", || self.session.get(&album.url))
            .await?;
        let metadata = album_metadata(&page.body)?;

        let mut dir_name = sanitize(&album.name);
        if dir_name.trim().is_empty() {
            dir_name = UNNAMED_ALBUM.to_owned();
        }
        let directory = unique_directory(&outdir.join(dir_name))?;

        let photos = match metadata.photos() {
            Some(photos) => photos,
            None => {
                warn!("album {} has no photo list", album);
                return Ok(AlbumReport { directory, photos: 0, failures: 0 });
            }
        };

        let mut failures = 0;
        for (index, photo) in photos.iter().enumerate() {
            let url = photo_url(&photo.locator, self.session.site());
            let path = unique_filename(&directory, &filename_for(photo));

            if let Err(err) = self.fetch_photo(&url, &path).await {
                failures += 1;
                writeln!(out, "\nError downloading file: {}\n", url)?;
                warn!("photo {} of album {} failed: {}", photo, album.name, err);
                if failures > self.max_photo_failures {
                    return Err(err);
                }
            }

            rewrite_message(out, &photo_counter(index + 1, photos.len()))?;
        }

        info!("album {} saved to {:?}: {} photos, {} failed", album.name, directory, photos.len(), failures);
        Ok(AlbumReport { directory, photos: photos.len(), failures })
    }

    async fn fetch_photo(&self, url: &str, path: &Path) -> Result<()> {
        let transport = self.session.transport();
        self.retry
            .run("photo", || async move {
                let data = transport.fetch_bytes(url).await?;
                tokio::fs::write(path, &data).await?;
                Ok::<(), BeboError>(())
            })
            .await
    }
}

fn album_metadata(body: &str) -> Result<AlbumMetadata> {
    let document = Html::parse_document(body);
    let script = document
        .select(&html::selector("script")?)
        .map(|s| s.text().collect::<String>())
        .find(|text| text.contains(METADATA_MARKER))
        .ok_or_else(|| BeboError::Parse("album page: no photo metadata".to_owned()))?;

    AlbumMetadata::from_script(&script)
}

fn filename_for(photo: &PhotoRecord) -> String {
    let (_, ext) = split_extension(&photo.locator);
    photo_filename(photo.caption.as_deref().unwrap_or(""), &photo.created, ext)
}
