use std::fmt;
use std::fmt::Formatter;

/// An album as listed on the photos page.
#[derive(Debug, Clone, PartialEq)]
pub struct Album {
    pub name: String,
    pub url: String,
}

impl fmt::Display for Album {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "(name={}, url={})", self.name, self.url)
    }
}
