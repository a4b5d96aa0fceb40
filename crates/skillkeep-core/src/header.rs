//! Snapshot metadata header
//!
//! Every stored snapshot starts with a small HTML comment block recording
//! when it was taken and why:
//!
//! ```text
//! <!-- VERSION INFO
//! timestamp: 20241208_141234
//! message: tighten trigger list
//! -->
//! ...document body...
//! ```
//!
//! Parsing is tolerant. A missing or unterminated block is not an error; the
//! whole text is treated as the body and the header is absent.

use serde::Serialize;

/// First line of the header block
pub const HEADER_OPEN: &str = "<!-- VERSION INFO";

/// Marker closing the header block
pub const HEADER_CLOSE: &str = "-->";

const TIMESTAMP_KEY: &str = "timestamp:";
const MESSAGE_KEY: &str = "message:";

/// Metadata embedded at the top of a snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VersionHeader {
    /// Snapshot timestamp as written (`YYYYMMDD_HHMMSS`)
    pub timestamp: String,
    /// Free-text message, single line
    pub message: String,
}

/// A snapshot split into its header and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSnapshot<'a> {
    /// Header, if the text starts with a complete header block
    pub header: Option<VersionHeader>,
    /// Everything after the closing marker line
    pub body: &'a str,
}

impl ParsedSnapshot<'_> {
    /// Message from the header, empty when there is none
    pub fn message(&self) -> &str {
        self.header.as_ref().map_or("", |h| h.message.as_str())
    }
}

impl VersionHeader {
    /// Create a header, folding the message onto a single line
    pub fn new(timestamp: impl Into<String>, message: &str) -> Self {
        Self {
            timestamp: timestamp.into(),
            message: sanitize_message(message),
        }
    }

    /// Render the header followed by `body`
    pub fn encode(&self, body: &str) -> String {
        format!(
            "{HEADER_OPEN}\n{TIMESTAMP_KEY} {}\n{MESSAGE_KEY} {}\n{HEADER_CLOSE}\n{body}",
            self.timestamp, self.message
        )
    }

    /// Split stored snapshot text into header and body
    pub fn parse(text: &str) -> ParsedSnapshot<'_> {
        let mut lines = text.split_inclusive('\n');

        let opens = lines
            .next()
            .is_some_and(|first| first.trim_end() == HEADER_OPEN);
        if !opens {
            return ParsedSnapshot {
                header: None,
                body: text,
            };
        }

        let mut header = VersionHeader::default();
        let mut offset = text.find('\n').map_or(text.len(), |i| i + 1);

        for line in lines {
            offset += line.len();

            if line.contains(HEADER_CLOSE) {
                return ParsedSnapshot {
                    header: Some(header),
                    body: &text[offset..],
                };
            }

            let line = line.trim();
            if let Some(value) = line.strip_prefix(TIMESTAMP_KEY) {
                header.timestamp = value.trim().to_string();
            } else if let Some(value) = line.strip_prefix(MESSAGE_KEY) {
                header.message = value.trim().to_string();
            }
        }

        // Unterminated block
        ParsedSnapshot {
            header: None,
            body: text,
        }
    }

    /// Body of a stored snapshot with any header removed
    pub fn strip(text: &str) -> &str {
        Self::parse(text).body
    }
}

/// Keep messages on one line and out of the closing marker's way
fn sanitize_message(message: &str) -> String {
    message
        .trim()
        .replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
        .replace(HEADER_CLOSE, "- ->")
}
