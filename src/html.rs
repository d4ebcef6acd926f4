//! Small helpers over `scraper` shared by the page parsers.

use scraper::{ElementRef, Html, Selector};

use crate::error::{BeboError, Result};

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|err| BeboError::Parse(format!("selector '{}': {}", css, err)))
}

/// First element under the whole document matching `css`, or a parse error naming `what`.
pub(crate) fn find<'a>(document: &'a Html, css: &str, what: &str) -> Result<ElementRef<'a>> {
    document
        .select(&selector(css)?)
        .next()
        .ok_or_else(|| BeboError::Parse(format!("no {}", what)))
}

/// First element below `element` matching `css`.
pub(crate) fn find_in<'a>(element: &ElementRef<'a>, css: &str, what: &str) -> Result<ElementRef<'a>> {
    element
        .select(&selector(css)?)
        .next()
        .ok_or_else(|| BeboError::Parse(format!("no {}", what)))
}

pub(crate) fn attr(element: &ElementRef, name: &str, what: &str) -> Result<String> {
    element
        .value()
        .attr(name)
        .map(str::to_owned)
        .ok_or_else(|| BeboError::Parse(format!("{} has no {}", what, name)))
}
