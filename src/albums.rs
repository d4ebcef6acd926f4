//! Album listing: the photos page plus every page its paginator links to.

use scraper::Html;
use tracing::debug;

use crate::error::Result;
use crate::html;
use crate::model::album::Album;
use crate::session::{Session, Transport};

struct ListingPage {
    /// `(title, href)` as written in the markup.
    albums: Vec<(String, String)>,
    other_pages: Vec<String>,
}

/// Albums in page order, then in grid order within a page.
pub async fn list_albums<T: Transport>(session: &Session<T>, photos_url: &str) -> Result<Vec<Album>> {
    let first = session.get(photos_url).await?;
    let listing = parse_listing(&first.body)?;

    let mut entries = listing.albums;
    for href in listing.other_pages {
        let url = session.absolute_url(&href)?;
        debug!("album listing continues on {}", url);
        let page = session.get(&url).await?;
        entries.extend(album_entries(&Html::parse_document(&page.body))?);
    }

    entries
        .into_iter()
        .map(|(name, href)| Ok(Album { name, url: session.absolute_url(&href)? }))
        .collect()
}

fn parse_listing(body: &str) -> Result<ListingPage> {
    let document = Html::parse_document(body);
    let albums = album_entries(&document)?;
    let other_pages = other_pages(&document)?;

    Ok(ListingPage { albums, other_pages })
}

/// Links of the paginator's `<li>`s that carry no class; the current
/// page's item is the one with a class.
fn other_pages(document: &Html) -> Result<Vec<String>> {
    let paginator = match document.select(&html::selector("#paginator")?).next() {
        Some(paginator) => paginator,
        None => {
            debug!("no paginator, album listing is a single page");
            return Ok(vec![]);
        }
    };

    let links = paginator
        .select(&html::selector("li:not([class]) a[href]")?)
        .filter_map(|a| a.value().attr("href").map(str::to_owned))
        .collect();

    Ok(links)
}

fn album_entries(document: &Html) -> Result<Vec<(String, String)>> {
    let grid = html::find(document, ".grid.albums-grid", "albums grid")?;

    let mut entries = vec![];
    for item in grid.select(&html::selector("li")?) {
        let link = html::find_in(&item, ".thumb-label a", "album link")?;
        let title = html::attr(&link, "title", "album link")?;
        let href = html::attr(&link, "href", "album link")?;
        entries.push((title, href));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BeboError;
    use crate::test_helpers::{logged_in, FakeTransport, Reply};

    const PHOTOS_URL: &str = "http://www.bebo.com/c/photos?MemberId=42";
    const PAGE_2: &str = "http://www.bebo.com/c/photos?MemberId=42&Page=2";
    const PAGE_3: &str = "http://www.bebo.com/c/photos?MemberId=42&Page=3";

    fn listing(paginator: &str, albums: &[(&str, &str)]) -> String {
        let items: String = albums
            .iter()
            .map(|(title, href)| format!(
                r#"<li><div class="thumb"><img src="t.jpg"></div>
                   <div class="thumb-label"><a title="{}" href="{}">{}</a></div></li>"#,
                title, href, title
            ))
            .collect();
        format!(
            r#"<html><body>{}<ul class="grid albums-grid">{}</ul></body></html>"#,
            paginator, items
        )
    }

    #[tokio::test]
    async fn visits_every_non_current_page() {
        let paginator = r#"<ul id="paginator">
            <li class="current"><a href="/c/photos?MemberId=42&amp;Page=1">1</a></li>
            <li><a href="/c/photos?MemberId=42&amp;Page=2">2</a></li>
            <li><a href="http://www.bebo.com/c/photos?MemberId=42&amp;Page=3">3</a></li>
        </ul>"#;
        let transport = FakeTransport::new()
            .on(PHOTOS_URL, Reply::page(&listing(paginator, &[("Summer", "/Album.jsp?id=1")])))
            .on(PAGE_2, Reply::page(&listing(paginator, &[("Winter", "/Album.jsp?id=2"), ("Spring", "/Album.jsp?id=3")])))
            .on(PAGE_3, Reply::page(&listing(paginator, &[("Autumn", "http://www.bebo.com/Album.jsp?id=4")])));
        let session = logged_in(transport).await;

        let albums = list_albums(&session, PHOTOS_URL).await.unwrap();

        let names: Vec<&str> = albums.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Summer", "Winter", "Spring", "Autumn"]);
        assert_eq!(albums[1].url, "http://www.bebo.com/Album.jsp?id=2");
        assert_eq!(albums[3].url, "http://www.bebo.com/Album.jsp?id=4");
        assert_eq!(session.transport().count(PHOTOS_URL), 1);
        assert_eq!(session.transport().count(PAGE_2), 1);
        assert_eq!(session.transport().count(PAGE_3), 1);
    }

    #[tokio::test]
    async fn current_page_is_not_fetched_again() {
        let paginator = r#"<ul id="paginator">
            <li class="current"><a href="/c/photos?MemberId=42">1</a></li>
            <li><a href="/c/photos?MemberId=42&amp;Page=2">2</a></li>
        </ul>"#;
        let transport = FakeTransport::new()
            .on(PHOTOS_URL, Reply::page(&listing(paginator, &[("One", "/Album.jsp?id=1")])))
            .on(PAGE_2, Reply::page(&listing(paginator, &[("Two", "/Album.jsp?id=2")])));
        let session = logged_in(transport).await;

        let albums = list_albums(&session, PHOTOS_URL).await.unwrap();

        assert_eq!(albums.len(), 2);
        assert_eq!(session.transport().count(PHOTOS_URL), 1);
    }

    #[tokio::test]
    async fn listing_without_paginator_is_one_page() {
        let transport = FakeTransport::new()
            .on(PHOTOS_URL, Reply::page(&listing("", &[("Only", "/Album.jsp?id=9")])));
        let session = logged_in(transport).await;

        let albums = list_albums(&session, PHOTOS_URL).await.unwrap();

        assert_eq!(albums, vec![Album { name: "Only".into(), url: "http://www.bebo.com/Album.jsp?id=9".into() }]);
    }

    #[tokio::test]
    async fn missing_grid_is_a_parse_error() {
        let transport = FakeTransport::new()
            .on(PHOTOS_URL, Reply::page("<html><body><p>Something went wrong</p></body></html>"));
        let session = logged_in(transport).await;

        let result = list_albums(&session, PHOTOS_URL).await;

        assert!(matches!(result, Err(BeboError::Parse(_))));
    }
}
