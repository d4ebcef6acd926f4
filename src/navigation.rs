use scraper::{ElementRef, Html};
use tracing::debug;

use crate::error::{BeboError, Result};
use crate::html;
use crate::session::{Session, Transport};

const PHOTOS_LABEL: &str = "Photos";

/// Finds the link to the album listing in the home page's site menu.
pub async fn find_photos_link<T: Transport>(session: &Session<T>) -> Result<String> {
    let home = session.get(&session.site().secure_root).await?;
    let href = photos_link(&home.body)?;
    debug!("photos page is {}", href);

    Ok(href)
}

/// The menu entry is an `<a>` whose own `<span>` reads "Photos". Nested
/// spans further down don't count.
pub(crate) fn photos_link(body: &str) -> Result<String> {
    let document = Html::parse_document(body);
    let menu = html::find(&document, "#site-menu", "site menu on home page")?;

    let link = menu
        .select(&html::selector("a")?)
        .find(|a| has_label(a, PHOTOS_LABEL))
        .ok_or_else(|| BeboError::Parse("no photos link in site menu".to_owned()))?;

    html::attr(&link, "href", "photos link")
}

fn has_label(anchor: &ElementRef, label: &str) -> bool {
    anchor
        .children()
        .filter_map(ElementRef::wrap)
        .any(|child| child.value().name() == "span" && child.text().collect::<String>().trim() == label)
}
