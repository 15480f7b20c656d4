use feedcal_core::ics::{decode, encode, escape_text, fold_line, unescape_text, unfold};
use feedcal_core::{EventRecord, EventSource, EventStatus};
use proptest::prelude::*;

// 2024-01-01T00:00:00Z .. 2025-12-31T00:00:00Z
const RANGE_START: i64 = 1_704_067_200;
const RANGE_END: i64 = 1_767_139_200;

fn arb_text() -> impl Strategy<Value = String> {
    "[A-Za-z0-9,;\\\\.!?()][A-Za-z0-9 ,;\\\\.!?()\n-]{0,80}[A-Za-z0-9,;\\\\.!?()]"
}

fn arb_optional_text() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), arb_text()]
}

fn arb_record() -> impl Strategy<Value = EventRecord> {
    (
        "[a-f0-9]{8}-[a-f0-9]{4}@feedcal",
        arb_text(),
        arb_optional_text(),
        arb_optional_text(),
        RANGE_START..RANGE_END,
        1i64..86_400,
        RANGE_START..RANGE_END,
    )
        .prop_map(|(uid, summary, location, description, dtstart, duration, dtstamp)| {
            EventRecord {
                id: "test-id".to_string(),
                uid,
                summary,
                location,
                description,
                dtstart,
                dtend: dtstart + duration,
                dtstamp,
                source: EventSource::Import,
                status: EventStatus::Active,
            }
        })
}

fn arb_records() -> impl Strategy<Value = Vec<EventRecord>> {
    proptest::collection::vec(arb_record(), 1..10).prop_map(|records| {
        // uids must be unique for the lookup below
        records
            .into_iter()
            .enumerate()
            .map(|(i, mut r)| {
                r.uid = format!("{}-{}", i, r.uid);
                r
            })
            .collect()
    })
}

// Encoding then decoding gives back every record's fields.
proptest! {
    #[test]
    fn prop_encode_decode_roundtrip(records in arb_records()) {
        let ics = encode(&records);
        let decoded = decode(&ics).unwrap();

        prop_assert!(decoded.skipped.is_empty());
        prop_assert_eq!(decoded.events.len(), records.len());

        for event in &decoded.events {
            let original = records.iter().find(|r| r.uid == event.uid);
            prop_assert!(original.is_some(), "Unknown uid {}", event.uid);
            let original = original.unwrap();

            prop_assert_eq!(&event.summary, &original.summary);
            prop_assert_eq!(event.dtstart, original.dtstart);
            prop_assert_eq!(event.dtend, original.dtend);
            prop_assert_eq!(event.dtstamp, original.dtstamp);
            prop_assert_eq!(&event.location, &original.location);
            prop_assert_eq!(&event.description, &original.description);
        }
    }
}

// Deleted records never show up in the feed; active ones keep their order.
proptest! {
    #[test]
    fn prop_only_active_records_are_encoded(
        records in arb_records(),
        deleted in proptest::collection::vec(any::<bool>(), 10),
    ) {
        let records: Vec<EventRecord> = records
            .into_iter()
            .zip(deleted)
            .map(|(mut r, d)| {
                if d {
                    r.status = EventStatus::Deleted;
                }
                r
            })
            .collect();

        let decoded = decode(&encode(&records)).unwrap();

        let expected: Vec<&str> = records
            .iter()
            .filter(|r| r.status == EventStatus::Active)
            .map(|r| r.uid.as_str())
            .collect();
        let actual: Vec<&str> = decoded.events.iter().map(|e| e.uid.as_str()).collect();
        prop_assert_eq!(actual, expected);
    }
}

// Escaping special characters is exactly reversible.
proptest! {
    #[test]
    fn prop_unescape_inverts_escape_specials(s in "[\\\\;,\nnN a-z]{0,60}") {
        prop_assert_eq!(unescape_text(&escape_text(&s)), s);
    }

    #[test]
    fn prop_unescape_inverts_escape_any(s in any::<String>()) {
        prop_assert_eq!(unescape_text(&escape_text(&s)), s);
    }
}

// Folding never loses or adds characters and respects the line limit.
proptest! {
    #[test]
    fn prop_unfold_inverts_fold(line in "[^\r\n]{0,400}") {
        let folded = fold_line(&line);

        for physical in &folded {
            prop_assert!(physical.chars().count() <= 75);
        }
        prop_assert_eq!(unfold(&folded.join("\r\n")), line);
    }
}

// Arbitrary input never panics the decoder.
proptest! {
    #[test]
    fn prop_decode_total(text in any::<String>()) {
        let _ = decode(&text);
    }

    #[test]
    fn prop_decode_total_on_event_shaped_input(
        body in "(BEGIN:VEVENT|END:VEVENT|UID:[a-z]{0,3}|DTSTART[;:][0-9TZ]{0,17}|DTEND:[0-9TZ]{0,17}|\r\n|\n| |\t){0,30}"
    ) {
        let _ = decode(&body);
    }
}
