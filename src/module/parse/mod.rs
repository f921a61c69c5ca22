//! Format parsers. Pure text-in, records-out; selection is driven by the
//! source spec's parser tag, never by source-name matching.

mod block_table;
mod tle;
mod yuma;

pub use block_table::parse_block_table;
pub use tle::parse_tle;
pub use yuma::parse_almanac;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{ParserKind, SourceSpec};
use crate::error::ParseError;
use crate::model::record::{AlmanacBatch, BlockTypeRow, RawCapture, TleBatch};

/// Timestamp layout used in raw captures and failure entries.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ParsedPayload {
    Tle(TleBatch),
    Almanac(AlmanacBatch),
    BlockTable(Vec<BlockTypeRow>),
    Raw(RawCapture),
}

impl ParsedPayload {
    pub fn record_count(&self) -> usize {
        match self {
            ParsedPayload::Tle(batch) => batch.satellites.len(),
            ParsedPayload::Almanac(batch) => batch.satellites.len(),
            ParsedPayload::BlockTable(rows) => rows.len(),
            ParsedPayload::Raw(_) => 1,
        }
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Dispatches raw source text to the parser named by the spec.
pub fn parse_source(
    spec: &SourceSpec,
    content: String,
    week: u32,
    fetched_at: DateTime<Utc>,
) -> Result<ParsedPayload, ParseError> {
    match spec.parser {
        ParserKind::Tle => Ok(ParsedPayload::Tle(parse_tle(&content, week)?)),
        ParserKind::AlmanacText => Ok(ParsedPayload::Almanac(parse_almanac(&content, week)?)),
        ParserKind::HtmlTable => Ok(ParsedPayload::BlockTable(parse_block_table(&content)?)),
        ParserKind::Raw => Ok(ParsedPayload::Raw(RawCapture {
            name: spec.id.clone(),
            timestamp: fetched_at.format(TIMESTAMP_FORMAT).to_string(),
            url: spec.url.clone(),
            content,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransportProfile;
    use chrono::TimeZone;

    fn spec(parser: ParserKind) -> SourceSpec {
        SourceSpec {
            id: "test".to_string(),
            url: "https://example.com/data".to_string(),
            interval_hours: 48,
            parser,
            transport: TransportProfile::Standard,
            sink_dir: None,
        }
    }

    #[test]
    fn test_raw_capture_wraps_content() {
        let fetched_at = Utc.with_ymd_and_hms(2026, 8, 29, 6, 30, 0).unwrap();
        let payload =
            parse_source(&spec(ParserKind::Raw), "opaque body".to_string(), 291, fetched_at)
                .unwrap();

        let ParsedPayload::Raw(capture) = &payload else {
            panic!("expected raw payload");
        };
        assert_eq!(capture.name, "test");
        assert_eq!(capture.timestamp, "20260829_063000");
        assert_eq!(capture.content, "opaque body");
        assert_eq!(payload.record_count(), 1);
    }

    #[test]
    fn test_tle_payload_serializes_with_week_tag() {
        let content = "SAT\n\
            1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927\n\
            2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537\n";
        let payload = parse_source(
            &spec(ParserKind::Tle),
            content.to_string(),
            291,
            Utc::now(),
        )
        .unwrap();

        let json = payload.to_pretty_json().unwrap();
        assert!(json.contains("\"week\": 291"));
        assert!(json.contains("\"satellites\""));
    }
}
