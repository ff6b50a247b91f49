#![allow(dead_code)]
use std::sync::Once;

use xmltv::{XmltvEvent, XmltvParser};

static LOGGER_INIT: Once = Once::new();

// Rust runs the tests concurrently, so the logger must only be set up once.
pub fn ensure_env_logger_initialized() {
    use std::io::Write;

    LOGGER_INIT.call_once(|| {
        let mut builder = env_logger::Builder::from_default_env();
        let _ = builder
            .format(|buf, record| writeln!(buf, "[{}] - {}", record.level(), record.args()))
            .is_test(true)
            .try_init();
    });
}

pub const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE tv SYSTEM "xmltv.dtd">
<tv source-info-name="Sample listings" generator-info-name="hand">
  <channel id="bbc1.bbc.co.uk">
    <display-name lang="en">BBC One</display-name>
    <display-name lang="en">BBC1</display-name>
    <icon src="http://example.com/bbc1.png" />
  </channel>
  <channel id="tf1.fr">
    <display-name>Télé Française 1</display-name>
  </channel>
  <!-- the evening schedule -->
  <programme start="20150603190000 +0100" stop="20150603193000 +0100" channel="bbc1.bbc.co.uk">
    <title lang="en">News at Seven</title>
    <title lang="cy">Newyddion</title>
    <desc lang="en">The day&apos;s headlines &amp; weather.</desc>
    <category lang="en">News</category>
    <length units="minutes">30</length>
    <icon src="http://example.com/news.png" width="100" height="75"/>
    <country>UK</country>
  </programme>
  <programme start="20150603193000 +0100" stop="20150603203000 +0100" channel="bbc1.bbc.co.uk">
    <title>Doctor Who</title>
    <sub-title>The <![CDATA[Day & Night]]></sub-title>
    <credits>
      <director>Jane Doe</director>
      <actor role="Doctor">John Smith</actor>
      <actor>Second Companion</actor>
      <presenter>Host</presenter>
    </credits>
    <date>2005</date>
    <episode-num system="onscreen">S02E05</episode-num>
    <episode-num system="xmltv_ns">1.4/13.</episode-num>
    <rating system="BBFC">
      <value>PG</value>
    </rating>
    <star-rating>
      <value>4/5</value>
    </star-rating>
    <large-image-url>http://example.com/who-l.jpg</large-image-url>
    <small-image-url>http://example.com/who-s.jpg</small-image-url>
  </programme>
  <programme start="sometime" channel="tf1.fr">
    <title>Journal</title>
    <length units="fortnights">1</length>
  </programme>
</tv>
"#;

/// Feeds `chunks` one after the other, draining the parser between chunks
pub fn parse_chunks<'a, I: IntoIterator<Item = &'a str>>(chunks: I) -> Vec<XmltvEvent> {
    let mut parser = XmltvParser::new();
    let mut events = Vec::new();
    for chunk in chunks {
        parser.feed_str(chunk);
        events.extend((&mut parser).map(|e| e.expect("well-formed document")));
    }
    parser.finish();
    events.extend((&mut parser).map(|e| e.expect("well-formed document")));
    events
}
