//! EML draft writer
//!
//! Wraps caller-supplied HTML body content in a fixed, styled page and packs it as a
//! single-part MIME message marked as an unsent draft. Mail clients open such a file
//! as a new message ready to edit.

use std::fmt::Write as FmtWrite;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};

use crate::common::xml::escape_xml;
use crate::error::FormatError;

pub const DEFAULT_LANGUAGE: &str = "cs-CZ";

/// Base64 body lines are wrapped at this width.
const LINE_WIDTH: usize = 76;
/// Bytes of subject text per encoded word, keeping each word under 75 characters.
const SUBJECT_CHUNK: usize = 45;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl Priority {
    /// `X-Priority` value.
    fn x_priority(self) -> u8 {
        match self {
            Priority::Low => 5,
            Priority::Normal => 3,
            Priority::High => 1,
        }
    }

    /// `Importance` value.
    fn importance(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Normal => "Normal",
            Priority::High => "High",
        }
    }
}

impl FromStr for Priority {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            other => Err(FormatError::InvalidInput(format!(
                "unknown priority '{other}' (expected low, normal or high)"
            ))),
        }
    }
}

/// Everything needed to write one draft.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmailDraft {
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    /// Body HTML, without `<html>`/`<head>`/`<body>`.
    pub content: String,
    pub priority: Priority,
    /// BCP 47 tag used for proofing, e.g. `en-US`.
    pub language: String,
}

impl EmailDraft {
    pub fn new(subject: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            content: content.into(),
            language: DEFAULT_LANGUAGE.to_string(),
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<(), FormatError> {
        if self.subject.trim().is_empty() {
            return Err(FormatError::InvalidInput("subject must not be empty".to_string()));
        }
        if self.content.trim().is_empty() {
            return Err(FormatError::InvalidInput("content must not be empty".to_string()));
        }
        Ok(())
    }

    fn language(&self) -> &str {
        let language = self.language.trim();
        if language.is_empty() {
            DEFAULT_LANGUAGE
        } else {
            language
        }
    }
}

/// The full HTML page the body content is placed in.
pub fn html_shell(content: &str, language: &str) -> String {
    let lang = escape_xml(language);
    format!(
        r#"<html lang="{lang}">
<head>
<meta http-equiv="Content-Type" content="text/html; charset=utf-8">
<style>
body {{ font-family: Arial, sans-serif; font-size: 10pt; color: rgb(0, 20, 137); }}
p, li, td {{ font-family: Arial, sans-serif; font-size: 10pt; color: rgb(0, 20, 137); }}
h2 {{ font-size: 10pt; font-weight: bold; color: rgb(0, 20, 137); }}
h3 {{ font-size: 10pt; font-weight: normal; text-decoration: underline; color: rgb(0, 20, 137); }}
</style>
</head>
<body lang="{lang}">
{content}
</body>
</html>
"#
    )
}

/// Assemble the draft, dated now.
pub fn render_eml(draft: &EmailDraft) -> Result<Vec<u8>, FormatError> {
    let now = Local::now();
    render_eml_at(draft, now.with_timezone(now.offset()))
}

/// Assemble the draft with a fixed `Date` header.
pub fn render_eml_at(draft: &EmailDraft, date: DateTime<FixedOffset>) -> Result<Vec<u8>, FormatError> {
    draft.validate()?;

    let mut message = String::with_capacity(draft.content.len() * 2 + 1024);
    for (name, addresses) in [("To", &draft.to), ("Cc", &draft.cc), ("Bcc", &draft.bcc)] {
        let joined = addresses
            .iter()
            .map(|a| header_value(a))
            .filter(|a| !a.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        if !joined.is_empty() {
            write!(message, "{name}: {joined}\r\n")?;
        }
    }
    write!(message, "Subject: {}\r\n", encode_subject(&draft.subject))?;
    write!(message, "Date: {}\r\n", date.to_rfc2822())?;
    message.push_str("X-Unsent: 1\r\n");
    message.push_str("Status: RO\r\n");
    message.push_str("X-Mozilla-Draft-Info: internal/draft; vcard=0\r\n");
    write!(message, "X-Priority: {}\r\n", draft.priority.x_priority())?;
    write!(message, "Importance: {}\r\n", draft.priority.importance())?;
    write!(message, "Content-Language: {}\r\n", header_value(draft.language()))?;
    message.push_str("MIME-Version: 1.0\r\n");
    message.push_str("Content-Type: text/html; charset=\"utf-8\"\r\n");
    message.push_str("Content-Transfer-Encoding: base64\r\n\r\n");

    let body = STANDARD.encode(html_shell(&draft.content, draft.language()));
    for line in wrap_ascii(&body, LINE_WIDTH) {
        message.push_str(line);
        message.push_str("\r\n");
    }
    Ok(message.into_bytes())
}

/// Header values cannot carry line breaks.
fn header_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .collect::<String>()
        .trim()
        .to_string()
}

/// RFC 2047 `B` encoding, split into folded encoded words on character boundaries.
pub fn encode_subject(subject: &str) -> String {
    let subject = header_value(subject);
    let mut words = Vec::new();
    let mut chunk = String::new();
    for c in subject.chars() {
        if chunk.len() + c.len_utf8() > SUBJECT_CHUNK {
            words.push(format!("=?utf-8?b?{}?=", STANDARD.encode(&chunk)));
            chunk.clear();
        }
        chunk.push(c);
    }
    if !chunk.is_empty() || words.is_empty() {
        words.push(format!("=?utf-8?b?{}?=", STANDARD.encode(&chunk)));
    }
    words.join("\r\n ")
}

fn wrap_ascii(text: &str, width: usize) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let (line, tail) = rest.split_at(rest.len().min(width));
        rest = tail;
        Some(line)
    })
}
