//! Lossless text serialization of a conversation log, and the inverse parse.
//!
//! The format is meant to be read by humans first and machines second:
//!
//! ```text
//! Prompt:
//!   What's the weather in London?
//!
//! Tool Input name=get_weather:
//!   {
//!     "location": "London"
//!   }
//!
//! Tool Output name=get_weather duration=142ms:
//!   Partly cloudy
//!
//! Response:
//!   It's partly cloudy in London.
//! ```
//!
//! Each entry is a header line followed by its content, every content line
//! indented by two spaces; entries are separated by one blank line; the file
//! ends with a trailing newline. `parse(format(entries)) == entries` for any
//! entry sequence. `format` never fails and `parse` never errors — malformed
//! input degrades to a best-effort partial reconstruction.

use regex_lite::Regex;
use std::sync::OnceLock;
use steward_core::entry::ConversationEntry;
use tracing::trace;

const INDENT: &str = "  ";

fn header(entry: &ConversationEntry) -> String {
    match entry {
        ConversationEntry::Prompt { .. } => "Prompt:".to_string(),
        ConversationEntry::Response { .. } => "Response:".to_string(),
        ConversationEntry::ToolInput { name, .. } => format!("Tool Input name={name}:"),
        ConversationEntry::ToolOutput {
            name, duration_ms, ..
        } => format!("Tool Output name={name} duration={duration_ms}ms:"),
    }
}

fn content(entry: &ConversationEntry) -> &str {
    match entry {
        ConversationEntry::Prompt { content }
        | ConversationEntry::Response { content }
        | ConversationEntry::ToolInput { content, .. }
        | ConversationEntry::ToolOutput { content, .. } => content,
    }
}

/// Serialize an entry sequence to the log text format.
///
/// Every content line is indented, including empty ones, so an empty-content
/// entry renders as a header followed by a line of two spaces.
pub fn format(entries: &[ConversationEntry]) -> String {
    let mut out = String::new();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&header(entry));
        out.push('\n');
        for line in content(entry).split('\n') {
            out.push_str(INDENT);
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

fn tool_input_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Tool Input name=(.+):$").unwrap())
}

fn tool_output_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Tool Output name=(.+) duration=(\d+)ms:$").unwrap())
}

/// Fallback for tool-output headers missing the duration field; such
/// entries parse with `duration_ms = 0`.
fn tool_output_bare_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Tool Output name=(.+):$").unwrap())
}

enum Header {
    Prompt,
    Response,
    ToolInput { name: String },
    ToolOutput { name: String, duration_ms: u64 },
}

fn match_header(line: &str) -> Option<Header> {
    if line == "Prompt:" {
        return Some(Header::Prompt);
    }
    if line == "Response:" {
        return Some(Header::Response);
    }
    if let Some(caps) = tool_output_re().captures(line) {
        return Some(Header::ToolOutput {
            name: caps[1].to_string(),
            duration_ms: caps[2].parse().unwrap_or(0),
        });
    }
    if let Some(caps) = tool_output_bare_re().captures(line) {
        return Some(Header::ToolOutput {
            name: caps[1].to_string(),
            duration_ms: 0,
        });
    }
    if let Some(caps) = tool_input_re().captures(line) {
        return Some(Header::ToolInput {
            name: caps[1].to_string(),
        });
    }
    None
}

/// Parse log text back into its entry sequence.
///
/// Scans for header lines and consumes the indented block that follows.
/// A blank line inside a block belongs to the content iff the line after it
/// is itself indented (lookahead); otherwise it separates entries. Lines
/// that are neither headers, indented content, nor blanks are skipped.
pub fn parse(text: &str) -> Vec<ConversationEntry> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut entries = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(hdr) = match_header(lines[i]) else {
            if !lines[i].trim().is_empty() {
                trace!(line = lines[i], "skipping unrecognized log line");
            }
            i += 1;
            continue;
        };
        i += 1;

        let mut block: Vec<&str> = Vec::new();
        while i < lines.len() {
            let line = lines[i];
            if let Some(rest) = line.strip_prefix(INDENT) {
                block.push(rest);
                i += 1;
            } else if line.is_empty() {
                // Lookahead: an internal blank line is followed by more
                // indented content; an inter-entry blank is not.
                match lines.get(i + 1) {
                    Some(next) if next.starts_with(INDENT) => {
                        block.push("");
                        i += 1;
                    }
                    _ => break,
                }
            } else {
                break;
            }
        }

        let content = block.join("\n");
        entries.push(match hdr {
            Header::Prompt => ConversationEntry::Prompt { content },
            Header::Response => ConversationEntry::Response { content },
            Header::ToolInput { name } => ConversationEntry::ToolInput { name, content },
            Header::ToolOutput { name, duration_ms } => ConversationEntry::ToolOutput {
                name,
                content,
                duration_ms,
            },
        });
    }

    entries
}
