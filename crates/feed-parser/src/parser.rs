// crates/feed-parser/src/parser.rs
//! RSS parsing logic
//!
//! Handles RSS 2.0 with the iTunes podcast extensions the consumed feeds
//! use (`itunes:duration`, `itunes:image`, categories, enclosures). Item
//! text fields are entity-decoded; descriptions additionally have HTML
//! stripped.

use crate::error::{FeedError, FeedResult};
use crate::feed::{Enclosure, Feed, FeedItem};
use crate::sanitize;
use chrono::DateTime;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Feed parser
pub struct FeedParser;

impl FeedParser {
    /// Parses an RSS feed from a string
    pub fn parse(content: &str) -> FeedResult<Feed> {
        if !content.contains("<rss") {
            return Err(FeedError::UnsupportedFormat(
                "expected an RSS 2.0 document".to_string(),
            ));
        }
        Self::parse_rss(content)
    }

    fn parse_rss(content: &str) -> FeedResult<Feed> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);

        let mut feed = Feed::new(String::new());
        let mut current_item: Option<FeedItem> = None;
        let mut text_buffer = String::new();
        let mut in_image = false;

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    match name.as_str() {
                        "item" => current_item = Some(FeedItem::default()),
                        "image" => in_image = true,
                        "enclosure" => {
                            // Some feeds write <enclosure ...></enclosure>
                            if let Some(item) = current_item.as_mut() {
                                item.enclosure = Self::read_enclosure(&e);
                            }
                        }
                        "itunes:image" => Self::apply_itunes_image(&e, &mut current_item, &mut feed),
                        _ => {}
                    }
                }
                Ok(Event::Empty(e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    match name.as_str() {
                        "enclosure" => {
                            if let Some(item) = current_item.as_mut() {
                                item.enclosure = Self::read_enclosure(&e);
                            }
                        }
                        "itunes:image" => Self::apply_itunes_image(&e, &mut current_item, &mut feed),
                        _ => {}
                    }
                }
                Ok(Event::Text(e)) => {
                    text_buffer = e.unescape().map(|s| s.to_string()).unwrap_or_default();
                }
                Ok(Event::CData(e)) => {
                    text_buffer = String::from_utf8_lossy(&e.into_inner()).to_string();
                }
                Ok(Event::End(e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();

                    if let Some(item) = current_item.as_mut() {
                        match name.as_str() {
                            "title" => item.title = sanitize::decode_entities(&text_buffer),
                            "description" | "content:encoded" => {
                                item.description = Some(sanitize::clean_text(&text_buffer));
                            }
                            "link" => item.url = Some(text_buffer.clone()),
                            "guid" => item.guid = Some(text_buffer.clone()),
                            "category" if item.category.is_none() => {
                                item.category = Some(sanitize::decode_entities(&text_buffer));
                            }
                            "itunes:duration" => item.duration_raw = Some(text_buffer.clone()),
                            "pubDate" => {
                                item.published_raw = Some(text_buffer.clone());
                                item.published = DateTime::parse_from_rfc2822(&text_buffer)
                                    .ok()
                                    .map(|dt| dt.with_timezone(&chrono::Utc));
                            }
                            _ => {}
                        }

                        if name == "item" {
                            if let Some(done) = current_item.take() {
                                feed.add_item(done);
                            }
                        }
                    } else {
                        match name.as_str() {
                            "title" if feed.title.is_empty() && !in_image => {
                                feed.title = sanitize::decode_entities(&text_buffer);
                            }
                            "description" => {
                                feed.description = Some(sanitize::clean_text(&text_buffer));
                            }
                            "link" if !in_image => feed.url = Some(text_buffer.clone()),
                            "language" => feed.language = Some(text_buffer.clone()),
                            "url" if in_image => feed.image_url = Some(text_buffer.clone()),
                            "image" => in_image = false,
                            _ => {}
                        }
                    }

                    text_buffer.clear();
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(FeedError::from(e)),
                _ => {}
            }
            buf.clear();
        }

        if feed.title.is_empty() {
            return Err(FeedError::MissingField("title".to_string()));
        }

        Ok(feed)
    }

    fn read_enclosure(e: &BytesStart<'_>) -> Option<Enclosure> {
        let mut url = None;
        let mut mime_type = None;
        let mut length = None;

        for attr in e.attributes().flatten() {
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = String::from_utf8_lossy(&attr.value).to_string();
            match key.as_str() {
                "url" => url = Some(value),
                "type" => mime_type = Some(value),
                "length" => length = value.parse().ok(),
                _ => {}
            }
        }

        url.map(|url| Enclosure {
            url,
            mime_type,
            length,
        })
    }

    fn apply_itunes_image(
        e: &BytesStart<'_>,
        current_item: &mut Option<FeedItem>,
        feed: &mut Feed,
    ) {
        let href = e
            .attributes()
            .flatten()
            .find(|a| a.key.as_ref() == b"href")
            .map(|a| String::from_utf8_lossy(&a.value).to_string());

        if let Some(href) = href {
            match current_item {
                Some(item) => item.image_url = Some(href),
                None => feed.image_url = Some(href),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_rss() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>Storynory</title>
    <description>Free audio stories</description>
    <link>https://www.storynory.com</link>
  </channel>
</rss>"#;

        let feed = FeedParser::parse(rss).expect("Should parse RSS");
        assert_eq!(feed.title, "Storynory");
        assert_eq!(feed.description, Some("Free audio stories".to_string()));
        assert!(feed.is_empty());
    }

    #[test]
    fn test_parse_item_fields() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0" xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd">
  <channel>
    <title>Storynory</title>
    <item>
      <title>The Gingerbread Man</title>
      <description>&lt;p&gt;A classic chase story &amp;amp; a snack.&lt;/p&gt;</description>
      <link>https://www.storynory.com/the-gingerbread-man/</link>
      <pubDate>Mon, 01 Jan 2024 12:00:00 GMT</pubDate>
      <category>Fairy Tales</category>
      <itunes:duration>12:34</itunes:duration>
      <itunes:image href="https://www.storynory.com/cover.png"/>
      <enclosure url="https://www.storynory.com/audio/gingerbread.mp3" type="audio/mpeg" length="9000000"/>
    </item>
  </channel>
</rss>"#;

        let feed = FeedParser::parse(rss).expect("Should parse RSS");
        assert_eq!(feed.item_count(), 1);

        let item = &feed.items[0];
        assert_eq!(item.title, "The Gingerbread Man");
        assert_eq!(
            item.description.as_deref(),
            Some("A classic chase story & a snack.")
        );
        assert_eq!(item.category.as_deref(), Some("Fairy Tales"));
        assert_eq!(item.duration_raw.as_deref(), Some("12:34"));
        assert_eq!(
            item.image_url.as_deref(),
            Some("https://www.storynory.com/cover.png")
        );
        assert!(item.published.is_some());
        assert!(item.has_audio());
        assert_eq!(
            item.audio_url(),
            Some("https://www.storynory.com/audio/gingerbread.mp3")
        );
    }

    #[test]
    fn test_channel_image_does_not_clobber_title() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>Real Title</title>
    <image>
      <url>https://example.com/logo.png</url>
      <title>Logo title</title>
      <link>https://example.com</link>
    </image>
  </channel>
</rss>"#;

        let feed = FeedParser::parse(rss).expect("Should parse RSS");
        assert_eq!(feed.title, "Real Title");
        assert_eq!(feed.image_url, Some("https://example.com/logo.png".to_string()));
    }

    #[test]
    fn test_parse_invalid_input() {
        assert!(FeedParser::parse("not xml at all").is_err());
        assert!(FeedParser::parse("<feed xmlns=\"http://www.w3.org/2005/Atom\"/>").is_err());
    }

    #[test]
    fn test_parse_rss_missing_title() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <description>No title</description>
  </channel>
</rss>"#;

        assert!(FeedParser::parse(rss).is_err());
    }

    #[test]
    fn test_first_category_wins() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>Feed</title>
    <item>
      <title>Ep</title>
      <category>First</category>
      <category>Second</category>
    </item>
  </channel>
</rss>"#;

        let feed = FeedParser::parse(rss).expect("Should parse RSS");
        assert_eq!(feed.items[0].category.as_deref(), Some("First"));
    }
}
