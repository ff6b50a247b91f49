mod fixtures;

use fixtures::*;
use jiff::Timestamp;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use xmltv::{
    Channel, Credit, CreditKind, EpisodeNum, Icon, Image, ImageSize, ParserSettings, Programme,
    Rating, ReadRecords, XmltvEvent, XmltvParser,
};

fn ts(s: &str) -> Option<Timestamp> {
    Some(s.parse().expect("valid timestamp"))
}

fn programmes(events: &[XmltvEvent]) -> Vec<&Programme> {
    events
        .iter()
        .filter_map(|e| match e {
            XmltvEvent::Programme(p) => Some(p),
            _ => None,
        })
        .collect()
}

#[test]
fn test_single_channel_and_programme() {
    ensure_env_logger_initialized();
    let events = parse_chunks(vec![
        "<tv><channel id=\"c1\"><display-name>Chan One</display-name></channel>",
        "<programme channel=\"c1\" start=\"20150603190000 +0000\"><title>News</title></programme></tv>",
    ]);

    assert_eq!(
        events,
        vec![
            XmltvEvent::Channel(Channel {
                name: Some("c1".to_owned()),
                display_name: Some("Chan One".to_owned()),
                icon: None,
            }),
            XmltvEvent::Programme(Programme {
                channel: Some("c1".to_owned()),
                start: ts("2015-06-03T19:00:00Z"),
                title: vec!["News".to_owned()],
                ..Programme::default()
            }),
            XmltvEvent::End,
        ]
    );
}

#[test]
fn test_sample_document() {
    ensure_env_logger_initialized();
    let events = parse_chunks(vec![SAMPLE]);
    assert_eq!(events.len(), 6);
    assert_eq!(events.last(), Some(&XmltvEvent::End));

    assert_eq!(
        events[0],
        XmltvEvent::Channel(Channel {
            name: Some("bbc1.bbc.co.uk".to_owned()),
            display_name: Some("BBC1".to_owned()),
            icon: Some("http://example.com/bbc1.png".to_owned()),
        })
    );
    match events[1] {
        XmltvEvent::Channel(ref channel) => {
            assert_eq!(channel.display_name.as_deref(), Some("Télé Française 1"))
        }
        ref other => panic!("expected a channel, got {:?}", other),
    }

    let progs = programmes(&events);
    assert_eq!(progs.len(), 3);

    let news = progs[0];
    assert_eq!(news.start, ts("2015-06-03T18:00:00Z"));
    assert_eq!(news.end, ts("2015-06-03T18:30:00Z"));
    assert_eq!(news.title, vec!["News at Seven", "Newyddion"]);
    assert_eq!(news.desc, vec!["The day's headlines & weather."]);
    assert_eq!(news.category, vec!["News"]);
    assert_eq!(news.country, vec!["UK"]);
    assert_eq!(news.length, Some(1800));
    assert_eq!(
        news.icon,
        vec![Icon {
            src: Some("http://example.com/news.png".to_owned()),
            width: Some("100".to_owned()),
            height: Some("75".to_owned()),
        }]
    );

    let who = progs[1];
    assert_eq!(who.secondary_title, vec!["The Day & Night"]);
    assert_eq!(
        who.credits,
        vec![
            Credit {
                kind: CreditKind::Director,
                role: None,
                name: "Jane Doe".to_owned(),
            },
            Credit {
                kind: CreditKind::Actor,
                role: Some("Doctor".to_owned()),
                name: "John Smith".to_owned(),
            },
            Credit {
                kind: CreditKind::Actor,
                role: None,
                name: "Second Companion".to_owned(),
            },
            Credit {
                kind: CreditKind::Presenter,
                role: None,
                name: "Host".to_owned(),
            },
        ]
    );
    assert_eq!(who.date, Some(2005));
    assert_eq!(
        who.episode_num,
        vec![
            EpisodeNum {
                system: Some("onscreen".to_owned()),
                value: "S02E05".to_owned(),
            },
            EpisodeNum {
                system: Some("xmltv_ns".to_owned()),
                value: "1.4/13.".to_owned(),
            },
        ]
    );
    assert_eq!(who.season(None), Some(2));
    // Only <value> directly below <rating> counts
    assert_eq!(
        who.rating,
        vec![Rating {
            system: Some("BBFC".to_owned()),
            value: "PG".to_owned(),
        }]
    );
    assert_eq!(
        who.images,
        vec![
            Image {
                size: ImageSize::Large,
                url: "http://example.com/who-l.jpg".to_owned(),
            },
            Image {
                size: ImageSize::Small,
                url: "http://example.com/who-s.jpg".to_owned(),
            },
        ]
    );
    assert!(who.icon.is_empty());

    let journal = progs[2];
    assert_eq!(journal.channel.as_deref(), Some("tf1.fr"));
    assert_eq!(journal.start, None);
    assert_eq!(journal.end, None);
    assert_eq!(journal.length, None);
    assert_eq!(journal.title, vec!["Journal"]);
}

#[test]
fn test_records_appear_as_soon_as_closed() {
    ensure_env_logger_initialized();
    let mut parser = XmltvParser::new();
    parser.feed_str("<tv><channel id='a'></channel><programme channel='a'><title>Half");
    let first: Vec<_> = (&mut parser).collect();
    assert_eq!(first.len(), 1);
    assert!(matches!(first[0], Ok(XmltvEvent::Channel(_))));
    assert_eq!(
        parser.builder().active_programme().map(|p| p.channel.clone()),
        Some(Some("a".to_owned()))
    );

    parser.feed_str(" time</title></programme></tv>");
    match parser.next() {
        Some(Ok(XmltvEvent::Programme(programme))) => {
            assert_eq!(programme.title, vec!["Half time"])
        }
        other => panic!("expected a programme, got {:?}", other),
    }
    assert!(parser.next().is_none());
    parser.finish();
    assert!(matches!(parser.next(), Some(Ok(XmltvEvent::End))));
}

#[test]
fn test_configured_time_format() {
    ensure_env_logger_initialized();
    let settings = ParserSettings::default()
        .time_format("YYYY-MM-DD HH:mm")
        .strict_time(false);
    let mut parser = XmltvParser::with_settings(&settings);
    parser.feed_str("<tv><programme channel='a' start='2015-06-03 19:30'/></tv>");
    parser.finish();

    match parser.next() {
        Some(Ok(XmltvEvent::Programme(programme))) => {
            assert_eq!(programme.start, ts("2015-06-03T19:30:00Z"));
            assert_eq!(programme.end, None);
        }
        other => panic!("expected a programme, got {:?}", other),
    }
}

#[test]
fn test_read_records_matches_parser() {
    ensure_env_logger_initialized();
    let from_reader: Vec<_> = ReadRecords::new(SAMPLE.as_bytes())
        .collect::<Result<_, _>>()
        .expect("well-formed document");
    assert_eq!(from_reader, parse_chunks(vec![SAMPLE]));
}

#[test]
fn test_programme_nested_in_channel() {
    ensure_env_logger_initialized();
    let events = parse_chunks(vec![
        "<tv><channel id='a'><programme channel='a'><title>T</title></programme>",
        "<display-name>X</display-name></channel></tv>",
    ]);
    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], XmltvEvent::Programme(_)));
    assert_eq!(
        events[1],
        XmltvEvent::Channel(Channel {
            name: Some("a".to_owned()),
            display_name: Some("X".to_owned()),
            icon: None,
        })
    );
    assert_eq!(events[2], XmltvEvent::End);
}

#[test]
fn test_title_of_brackets_in_cdata() {
    let brackets = "]".repeat(300);
    let doc = format!(
        "<tv><programme channel='a'><title><![CDATA[{}]]></title></programme></tv>",
        brackets
    );
    let events = parse_chunks(vec![doc.as_str()]);
    match events[0] {
        XmltvEvent::Programme(ref programme) => assert_eq!(programme.title, vec![brackets]),
        ref other => panic!("expected a programme, got {:?}", other),
    }
}

#[test]
fn test_json_output() {
    let events = parse_chunks(vec![
        "<tv><programme channel='a' start='20150603190000 +0000'><credits><actor role='Self'>Me</actor></credits></programme></tv>",
    ]);
    let json = serde_json::to_value(&events[0]).expect("serializable");
    assert_eq!(json["programme"]["channel"], "a");
    assert_eq!(json["programme"]["start"], "2015-06-03T19:00:00Z");
    assert_eq!(json["programme"]["credits"][0]["type"], "actor");
    assert_eq!(json["programme"]["credits"][0]["role"], "Self");
    assert_eq!(json["programme"]["secondaryTitle"], serde_json::json!([]));
}

fn split_at_points(input: &str, mut points: Vec<usize>) -> Vec<&str> {
    points.retain(|&p| input.is_char_boundary(p));
    points.sort_unstable();
    points.dedup();

    let mut chunks = Vec::with_capacity(points.len() + 1);
    let mut last = 0;
    for p in points {
        chunks.push(&input[last..p]);
        last = p;
    }
    chunks.push(&input[last..]);
    chunks
}

proptest! {
    #[test]
    fn chunk_boundaries_do_not_change_records(
        points in prop::collection::vec(0..SAMPLE.len(), 0..24)
    ) {
        let expected = parse_chunks(vec![SAMPLE]);
        let chunked = parse_chunks(split_at_points(SAMPLE, points));
        prop_assert_eq!(chunked, expected);
    }

    #[test]
    fn fixed_chunk_sizes_do_not_change_records(chunk in 1usize..64) {
        let expected = parse_chunks(vec![SAMPLE]);
        let chunks: Vec<&str> = {
            let points: Vec<usize> = (0..SAMPLE.len()).step_by(chunk).collect();
            split_at_points(SAMPLE, points)
        };
        prop_assert_eq!(parse_chunks(chunks), expected);
    }
}
