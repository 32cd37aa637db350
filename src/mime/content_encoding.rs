//-
// Copyright (c) 2026, the letterbox developers
//
// This file is part of letterbox.
//
// Letterbox is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free
// Software Foundation, either version 3 of the License, or (at your option)
// any later version.
//
// Letterbox is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
// more details.
//
// You should have received a copy of the GNU General Public License along
// with letterbox. If not, see <http://www.gnu.org/licenses/>.

use std::borrow::Cow;

use crate::mime::quoted_printable::qp_decode;
use crate::support::error::Error;

/// The `Content-Transfer-Encoding` of a body part.
///
/// Transports report this either as a token or as a numeric code; both map
/// onto this enum. Anything unrecognised becomes `Other`, which decodes as
/// the identity, since many servers mislabel encodings and the content is
/// more useful untransformed than dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentTransferEncoding {
    SevenBit,
    EightBit,
    Binary,
    Base64,
    QuotedPrintable,
    Other,
}

impl Default for ContentTransferEncoding {
    fn default() -> Self {
        ContentTransferEncoding::SevenBit
    }
}

impl ContentTransferEncoding {
    /// Parses an encoding token, case-insensitively.
    pub fn from_token(token: &str) -> Self {
        let token = token.trim();
        if token.eq_ignore_ascii_case("7bit") {
            ContentTransferEncoding::SevenBit
        } else if token.eq_ignore_ascii_case("8bit") {
            ContentTransferEncoding::EightBit
        } else if token.eq_ignore_ascii_case("binary") {
            ContentTransferEncoding::Binary
        } else if token.eq_ignore_ascii_case("base64") {
            ContentTransferEncoding::Base64
        } else if token.eq_ignore_ascii_case("quoted-printable") {
            ContentTransferEncoding::QuotedPrintable
        } else {
            ContentTransferEncoding::Other
        }
    }

    /// Maps the transport's numeric encoding code (0 = 7bit, 1 = 8bit,
    /// 2 = binary, 3 = base64, 4 = quoted-printable).
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => ContentTransferEncoding::SevenBit,
            1 => ContentTransferEncoding::EightBit,
            2 => ContentTransferEncoding::Binary,
            3 => ContentTransferEncoding::Base64,
            4 => ContentTransferEncoding::QuotedPrintable,
            _ => ContentTransferEncoding::Other,
        }
    }
}

impl From<&str> for ContentTransferEncoding {
    fn from(token: &str) -> Self {
        ContentTransferEncoding::from_token(token)
    }
}

impl From<u32> for ContentTransferEncoding {
    fn from(code: u32) -> Self {
        ContentTransferEncoding::from_code(code)
    }
}

/// Decodes `data` according to its declared transfer encoding.
///
/// This never fails. The identity encodings (and `Other`) are returned
/// borrowed; garbage inside base64 or quoted-printable input degrades to a
/// best-effort decode rather than an error.
pub fn decode(
    data: &[u8],
    encoding: ContentTransferEncoding,
) -> Cow<'_, [u8]> {
    match encoding {
        ContentTransferEncoding::Base64 => {
            Cow::Owned(base64_decode_lenient(data))
        },
        ContentTransferEncoding::QuotedPrintable => qp_decode(data),
        _ => Cow::Borrowed(data),
    }
}

fn base64_decode_lenient(data: &[u8]) -> Vec<u8> {
    // Drop everything outside the base64 alphabet, typically the line breaks
    // RFC 2045 requires every 76 characters, then decode only whole quanta.
    let mut filtered = Vec::with_capacity(data.len());
    for &byte in data {
        match byte {
            b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'+' | b'/' | b'=' => {
                filtered.push(byte)
            },
            _ => (),
        }
    }

    let usable_length = filtered.len() / 4 * 4;
    let mut decoded = Vec::new();
    let _ = base64::decode_config_buf(
        &filtered[..usable_length],
        base64::STANDARD,
        &mut decoded,
    );
    decoded
}

/// Converts `data` from the charset labelled `from` to the charset labelled
/// `to`.
///
/// Labels are resolved per the WHATWG encoding registry; an iconv-style
/// suffix on a label (e.g. `UTF-8//TRANSLIT`) is ignored for lookup.
/// Unmappable characters are replaced rather than failing; an unknown label
/// is the only error.
pub fn transliterate(
    data: &[u8],
    from: &str,
    to: &str,
) -> Result<Vec<u8>, Error> {
    let from = encoding_for_label(from)?;
    let to = encoding_for_label(to)?;

    let (text, _, _) = from.decode(data);
    let (converted, _, _) = to.encode(&text);
    Ok(converted.into_owned())
}

fn encoding_for_label(
    label: &str,
) -> Result<&'static encoding_rs::Encoding, Error> {
    let label = label.split("//").next().unwrap_or(label).trim();
    encoding_rs::Encoding::for_label(label.as_bytes())
        .ok_or_else(|| Error::UnsupportedCharset(label.to_owned()))
}
