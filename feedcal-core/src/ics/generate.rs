//! ICS feed generation.

use tracing::{debug, warn};

use super::datetime::format_utc;
use super::escape::escape_text;
use super::fold::fold_line;
use crate::event::EventRecord;

/// Product identifier written into every feed.
pub const PRODID: &str = "-//feedcal//Calendar Feed//EN";

/// Generate a calendar containing every ACTIVE record, in order.
///
/// Records with another status are left out. Lines end in CRLF, including
/// the last one, and lines over 75 characters are folded.
pub fn encode(records: &[EventRecord]) -> String {
    let mut out = String::new();
    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, &format!("PRODID:{}", PRODID));
    push_line(&mut out, "CALSCALE:GREGORIAN");
    push_line(&mut out, "METHOD:PUBLISH");

    let mut written = 0;
    for record in records.iter().filter(|r| r.is_active()) {
        if push_event(&mut out, record) {
            written += 1;
        }
    }

    push_line(&mut out, "END:VCALENDAR");

    debug!(events = written, total = records.len(), "Encoded calendar");
    out
}

/// Append one VEVENT. Returns false (and writes nothing) when a timestamp
/// has no `YYYYMMDDTHHMMSSZ` form.
fn push_event(out: &mut String, record: &EventRecord) -> bool {
    let (Some(dtstamp), Some(dtstart), Some(dtend)) = (
        format_utc(record.dtstamp),
        format_utc(record.dtstart),
        format_utc(record.dtend),
    ) else {
        warn!(uid = %record.uid, "Skipping event with out-of-range timestamp");
        return false;
    };

    push_line(out, "BEGIN:VEVENT");
    push_line(out, &format!("UID:{}", record.uid));
    push_line(out, &format!("DTSTAMP:{}", dtstamp));
    push_line(out, &format!("DTSTART:{}", dtstart));
    push_line(out, &format!("DTEND:{}", dtend));
    push_line(out, &format!("SUMMARY:{}", escape_text(&record.summary)));

    if !record.location.is_empty() {
        push_line(out, &format!("LOCATION:{}", escape_text(&record.location)));
    }

    if !record.description.is_empty() {
        push_line(out, &format!("DESCRIPTION:{}", escape_text(&record.description)));
    }

    push_line(out, "END:VEVENT");
    true
}

fn push_line(out: &mut String, line: &str) {
    for physical in fold_line(line) {
        out.push_str(&physical);
        out.push_str("\r\n");
    }
}
