//! ICS decoding.
//!
//! Works on the raw text instead of a full component tree: unfold, cut out
//! each `BEGIN:VEVENT`..`END:VEVENT` span, then pick the handful of fields
//! feedcal stores out of each span.

use std::fmt;

use chrono::FixedOffset;
use thiserror::Error;
use tracing::{debug, warn};

use super::datetime::{DEFAULT_FLOATING_OFFSET_SECS, parse_datetime};
use super::escape::unescape_text;
use super::fold::unfold;
use crate::event::{DEFAULT_SUMMARY, DecodedEvent, now_timestamp};

const BEGIN_EVENT: &str = "BEGIN:VEVENT";
const END_EVENT: &str = "END:VEVENT";

/// A decode that failed as a whole. No events are usable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Invalid {field} '{value}' in event '{uid}'")]
    InvalidDateTime {
        uid: String,
        field: &'static str,
        value: String,
    },
}

/// An event block that was dropped because required fields were missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBlock {
    /// Position of the block among all VEVENT blocks in the input
    pub index: usize,
    pub uid: Option<String>,
    pub missing: Vec<&'static str>,
}

impl fmt::Display for SkippedBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "event #{} ({}) is missing {}",
            self.index + 1,
            self.uid.as_deref().unwrap_or("no UID"),
            self.missing.join(", ")
        )
    }
}

/// Result of a successful decode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoded {
    pub events: Vec<DecodedEvent>,
    pub skipped: Vec<SkippedBlock>,
}

/// ICS decoder.
///
/// Floating date-times (no `Z`) and plain dates are read at a fixed offset,
/// UTC+8 unless set otherwise.
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    floating_offset_secs: i32,
}

impl Default for Decoder {
    fn default() -> Self {
        Decoder {
            floating_offset_secs: DEFAULT_FLOATING_OFFSET_SECS,
        }
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read floating date-times at `offset` instead of UTC+8.
    pub fn with_floating_offset(offset: FixedOffset) -> Self {
        Decoder {
            floating_offset_secs: offset.local_minus_utc(),
        }
    }

    pub fn decode(&self, text: &str) -> Result<Decoded, DecodeError> {
        self.decode_at(text, now_timestamp())
    }

    /// Decode, using `now` (Unix seconds) for events whose DTSTAMP is
    /// missing or unreadable.
    pub fn decode_at(&self, text: &str, now: i64) -> Result<Decoded, DecodeError> {
        let unfolded = unfold(text);
        let mut decoded = Decoded::default();

        for (index, block) in event_blocks(&unfolded).enumerate() {
            let fields = BlockFields::extract(block);

            let (Some(uid), Some(dtstart), Some(dtend)) = (fields.uid, fields.dtstart, fields.dtend)
            else {
                let skipped = SkippedBlock {
                    index,
                    uid: fields.uid.map(str::to_string),
                    missing: fields.missing_required(),
                };
                warn!(
                    index,
                    uid = fields.uid.unwrap_or_default(),
                    missing = ?skipped.missing,
                    "Skipping event due to missing fields"
                );
                decoded.skipped.push(skipped);
                continue;
            };

            let dtstart = self.timestamp(uid, "DTSTART", dtstart)?;
            let dtend = self.timestamp(uid, "DTEND", dtend)?;
            let dtstamp = match fields.dtstamp {
                Some(value) => parse_datetime(value, self.floating_offset_secs).unwrap_or_else(|| {
                    warn!(uid, value, "Unreadable DTSTAMP, using current time");
                    now
                }),
                None => now,
            };

            decoded.events.push(DecodedEvent {
                uid: uid.to_string(),
                summary: fields
                    .summary
                    .map(unescape_text)
                    .unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
                location: fields.location.map(unescape_text).unwrap_or_default(),
                description: fields.description.map(unescape_text).unwrap_or_default(),
                dtstart,
                dtend,
                dtstamp,
            });
        }

        debug!(
            events = decoded.events.len(),
            skipped = decoded.skipped.len(),
            "Decoded calendar"
        );

        Ok(decoded)
    }

    fn timestamp(&self, uid: &str, field: &'static str, value: &str) -> Result<i64, DecodeError> {
        parse_datetime(value, self.floating_offset_secs).ok_or_else(|| {
            DecodeError::InvalidDateTime {
                uid: uid.to_string(),
                field,
                value: value.to_string(),
            }
        })
    }
}

/// Decode with the default decoder (floating times at UTC+8).
pub fn decode(text: &str) -> Result<Decoded, DecodeError> {
    Decoder::default().decode(text)
}

/// Non-overlapping `BEGIN:VEVENT`..`END:VEVENT` spans, markers included.
///
/// Each span ends at the first end marker after its begin marker. A begin
/// marker with no end marker after it ends the scan.
fn event_blocks(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let start = rest.find(BEGIN_EVENT)?;
        let block = &rest[start..];
        let end = block[BEGIN_EVENT.len()..].find(END_EVENT)? + BEGIN_EVENT.len() + END_EVENT.len();
        rest = &block[end..];
        Some(&block[..end])
    })
}

/// The raw (still escaped) values feedcal reads from one block.
/// Empty values count as absent.
struct BlockFields<'a> {
    uid: Option<&'a str>,
    summary: Option<&'a str>,
    location: Option<&'a str>,
    description: Option<&'a str>,
    dtstamp: Option<&'a str>,
    dtstart: Option<&'a str>,
    dtend: Option<&'a str>,
}

impl<'a> BlockFields<'a> {
    fn extract(block: &'a str) -> Self {
        let get = |name: &str| field_value(block, name).filter(|v| !v.is_empty());
        BlockFields {
            uid: get("UID"),
            summary: get("SUMMARY"),
            location: get("LOCATION"),
            description: get("DESCRIPTION"),
            dtstamp: get("DTSTAMP"),
            dtstart: get("DTSTART"),
            dtend: get("DTEND"),
        }
    }

    fn missing_required(&self) -> Vec<&'static str> {
        [
            ("UID", self.uid),
            ("DTSTART", self.dtstart),
            ("DTEND", self.dtend),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Value of the first line that is `NAME:value` or `NAME;params:value`.
///
/// The name match is case-sensitive. Parameters run up to the first colon.
fn field_value<'a>(block: &'a str, name: &str) -> Option<&'a str> {
    block.split(['\r', '\n']).find_map(|line| {
        let rest = line.strip_prefix(name)?;
        let value = match rest.as_bytes().first()? {
            b':' => &rest[1..],
            b';' => &rest[rest.find(':')? + 1..],
            _ => return None,
        };
        Some(value.trim())
    })
}
