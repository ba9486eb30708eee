//! MIME message adapter on top of `mailparse`.

use mailparse::{MailHeaderMap, ParsedMail};

/// Errors raised while decoding an inbound message.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("malformed message: {0}")]
    Parse(#[from] mailparse::MailParseError),
}

/// The parts of an inbound message the analyzer reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageContent {
    /// `Subject` header, empty when absent.
    pub subject: String,
    /// Decoded body of the first `text/html` part.
    pub html: Option<String>,
    /// Decoded body of the first `text/plain` part.
    pub text: Option<String>,
}

impl MessageContent {
    /// Parses raw RFC 5322 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Parse`] if the headers or MIME structure cannot be decoded.
    pub fn parse(raw: &[u8]) -> Result<Self, MessageError> {
        let mail = mailparse::parse_mail(raw)?;

        let subject = mail.headers.get_first_value("Subject").unwrap_or_default();
        let html = find_part(&mail, "text/html").transpose()?;
        let text = find_part(&mail, "text/plain").transpose()?;

        Ok(Self {
            subject,
            html,
            text,
        })
    }
}

/// Depth-first search for the first part of type `mime`.
fn find_part(
    part: &ParsedMail<'_>,
    mime: &str,
) -> Option<Result<String, mailparse::MailParseError>> {
    let ctype = part.ctype.mimetype.to_ascii_lowercase();
    if ctype.starts_with(mime) {
        return Some(part.get_body());
    }
    if ctype.starts_with("multipart/") {
        return part.subparts.iter().find_map(|sub| find_part(sub, mime));
    }
    None
}
