// Topic page: question texts, each holding a link to the question.

use scraper::Html;
use url::Url;

use tagscraper_common::{Record, RecordSet, Result};

use super::{element_text, resolve, selector, url_with_path};

pub(crate) fn listing_url(base: &Url, topic: &str) -> Url {
    url_with_path(base, &["topic", topic])
}

pub fn parse_listing(html: &str, base: &Url) -> Result<RecordSet> {
    let document = Html::parse_document(html);
    let question = selector("div .QuestionText")?;
    let link = selector(".question_link")?;

    let records = document
        .select(&question)
        .filter_map(|text| {
            let href = text.select(&link).next()?.value().attr("href")?;
            Some(Record::new(element_text(&text), resolve(base, href)?))
        })
        .collect();
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://www.quora.com").unwrap()
    }

    #[test]
    fn listing_url_is_topic_page() {
        assert_eq!(
            listing_url(&base(), "Rust-programming-language").as_str(),
            "http://www.quora.com/topic/Rust-programming-language"
        );
    }

    #[test]
    fn extracts_question_texts() {
        let html = r#"
            <div class="feed">
              <div class="QuestionText">
                <a class="question_link" href="/Why-is-Rust-fast">Why is Rust fast?</a>
              </div>
              <div class="QuestionText">
                <span><a class="question_link" href="/Is-Rust-hard">Is Rust hard?</a></span>
              </div>
              <div class="QuestionText">No link here</div>
            </div>
        "#;
        let records = parse_listing(html, &base()).unwrap();
        assert_eq!(
            records,
            vec![
                Record::new("Why is Rust fast?", "http://www.quora.com/Why-is-Rust-fast"),
                Record::new("Is Rust hard?", "http://www.quora.com/Is-Rust-hard"),
            ]
        );
    }

    #[test]
    fn question_text_outside_div_is_ignored() {
        let html = r#"<span class="QuestionText"><a class="question_link" href="/x">X</a></span>"#;
        assert!(parse_listing(html, &base()).unwrap().is_empty());
    }
}
