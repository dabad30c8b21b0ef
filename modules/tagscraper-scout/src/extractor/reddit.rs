// Subreddit "new" listing.
//
// Each post is a `.thing` container. Its title sits under a paragraph
// (`p .title`) and its permalink is the anchor in the `.first` entry of the
// button list. Both are read from the same container, so a post missing one
// of them is dropped instead of shifting every later title onto the wrong
// link.

use scraper::Html;
use url::Url;

use tagscraper_common::{Record, RecordSet, Result};

use super::{element_text, resolve, selector, url_with_path};

pub(crate) fn listing_url(base: &Url, subreddit: &str) -> Url {
    url_with_path(base, &["r", subreddit, "new"])
}

pub fn parse_listing(html: &str, base: &Url) -> Result<RecordSet> {
    let document = Html::parse_document(html);
    let item_selector = selector(".thing")?;
    let title_selector = selector("p .title")?;
    let permalink_selector = selector(".first > a")?;

    let records = document
        .select(&item_selector)
        .filter_map(|thing| {
            let title = thing.select(&title_selector).next()?;
            let href = thing.select(&permalink_selector).next()?.value().attr("href")?;
            Some(Record::new(element_text(&title), resolve(base, href)?))
        })
        .collect();
    Ok(records)
}
