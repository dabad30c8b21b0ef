// "Questions tagged X, newest first" listing.
//
// Every question summary is an <h3> wrapping an anchor to the question. The
// page header also uses <h3>, inside a parent with class="header"; those are
// skipped.

use scraper::{ElementRef, Html};
use url::Url;

use tagscraper_common::{Record, RecordSet, Result};

use super::{element_text, resolve, selector, url_with_path};

pub(crate) fn listing_url(base: &Url, tag: &str) -> Url {
    let mut url = url_with_path(base, &["questions", "tagged", tag]);
    url.query_pairs_mut().append_pair("sort", "newest");
    url
}

pub fn parse_listing(html: &str, base: &Url) -> Result<RecordSet> {
    let document = Html::parse_document(html);
    let heading = selector("h3")?;

    let records = document
        .select(&heading)
        .filter(|h3| !in_page_header(h3))
        .filter_map(|h3| {
            let href = child_anchor(&h3)?.value().attr("href")?;
            Some(Record::new(element_text(&h3), resolve(base, href)?))
        })
        .collect();
    Ok(records)
}

fn in_page_header(element: &ElementRef) -> bool {
    element
        .parent()
        .and_then(ElementRef::wrap)
        .and_then(|parent| parent.value().attr("class"))
        == Some("header")
}

fn child_anchor<'a>(element: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == "a")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://www.stackoverflow.com").unwrap()
    }

    #[test]
    fn listing_url_sorts_by_newest() {
        assert_eq!(
            listing_url(&base(), "rust").as_str(),
            "http://www.stackoverflow.com/questions/tagged/rust?sort=newest"
        );
    }

    #[test]
    fn extracts_question_headings() {
        let html = r#"
            <div class="header"><h3><a href="/questions">All Questions</a></h3></div>
            <div class="summary">
              <h3><a href="/questions/1/borrow-checker">Borrow checker?</a></h3>
            </div>
            <div class="summary">
              <h3><a href="/questions/2/lifetimes">Lifetimes</a></h3>
            </div>
        "#;
        let records = parse_listing(html, &base()).unwrap();
        assert_eq!(
            records,
            vec![
                Record::new("Borrow checker?", "http://www.stackoverflow.com/questions/1/borrow-checker"),
                Record::new("Lifetimes", "http://www.stackoverflow.com/questions/2/lifetimes"),
            ]
        );
    }

    #[test]
    fn header_match_is_exact_class() {
        let html = r#"
            <div class="header sticky"><h3><a href="/q/1">Kept</a></h3></div>
            <h3><a href="/q/2">No wrapper class</a></h3>
        "#;
        let records = parse_listing(html, &base()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn headings_without_direct_anchor_are_skipped() {
        let html = r#"
            <div><h3>Related tags</h3></div>
            <div><h3><span><a href="/q/9">Nested</a></span></h3></div>
            <div><h3><a>No href</a></h3></div>
        "#;
        assert!(parse_listing(html, &base()).unwrap().is_empty());
    }
}
