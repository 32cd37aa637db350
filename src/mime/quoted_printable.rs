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
use std::str;

/// Decodes quoted-printable encoding, as described by RFC 2045.
///
/// Encoded bytes and soft line endings are both handled, the latter by
/// discarding. UNIX line endings are handled as well as DOS line endings.
///
/// This never fails. Invalid sequences are passed through untransformed, as
/// is a truncated escape at the very end of the input (the input here is a
/// complete part body, so there is nothing more to wait for). Certain
/// restrictions, such as not having trailing whitespace on a line, are not
/// enforced, and are passed through. 8-bit characters are passed through,
/// including invalid UTF-8.
pub fn qp_decode(s: &[u8]) -> Cow<'_, [u8]> {
    if !s.contains(&b'=') {
        return Cow::Borrowed(s);
    }

    let mut transformed = Vec::with_capacity(s.len());
    let mut i = 0;
    while i < s.len() {
        let byte = s[i];
        if b'=' != byte {
            transformed.push(byte);
            i += 1;
            continue;
        }

        let rest = &s[i + 1..];
        if rest.starts_with(b"\r\n") {
            // Soft line break with DOS ending, discard
            i += 3;
        } else if rest.starts_with(b"\n") {
            // Soft line break with UNIX ending, discard
            i += 2;
        } else if let Some(ch) = rest
            .get(..2)
            .and_then(|encoded| str::from_utf8(encoded).ok())
            .and_then(|encoded| u8::from_str_radix(encoded, 16).ok())
        {
            // Valid encoded byte
            transformed.push(ch);
            i += 3;
        } else {
            // Invalid or truncated escape, keep the '=' verbatim
            transformed.push(b'=');
            i += 1;
        }
    }

    Cow::Owned(transformed)
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    fn assert_qp(expected: &[u8], input: &[u8]) {
        let actual = qp_decode(input);
        assert_eq!(expected, &actual[..]);
    }

    #[test]
    fn test_qp_decode() {
        assert_qp(b"hello world", b"hello world");
        assert_qp(b"\xabfoo", b"=ABfoo");
        assert_qp(b"fo\xabo", b"fo=ABo");
        assert_qp(b"foo\xab", b"foo=AB");

        assert_qp(b"foo\xab\xcd", b"foo=AB=CD");
        assert_qp(b"foo\xabbar\xcd", b"foo=ABbar=CD");

        assert_qp(b"foo", b"foo=\n");
        assert_qp(b"foobar", b"foo=\nbar");
        assert_qp(b"foo", b"foo=\r\n");
        assert_qp(b"foobar", b"foo=\r\nbar");

        assert_qp(b"foo=()bar", b"foo=()bar");
        assert_qp(b"foo=\xabbar", b"foo==ABbar");
        assert_qp(b"foo=A\xabbar", b"foo=A=ABbar");
        assert_qp("foo=ゑbar".as_bytes(), "foo=ゑbar".as_bytes());
        assert_qp(b"foo=\x80\x80bar", b"foo=\x80\x80bar");

        assert_qp(b"foo=", b"foo=");
        assert_qp(b"foo=A", b"foo=A");
        assert_qp(b"foo=\r", b"foo=\r");
    }

    #[test]
    fn test_qp_decode_borrows_when_untouched() {
        assert_matches!(Cow::Borrowed(_), qp_decode(b"plain text"));
        assert_matches!(Cow::Owned(_), qp_decode(b"enc=6Fded"));
    }

    proptest! {
        #[test]
        fn qp_decode_never_fails_for_str(s in ".*") {
            qp_decode(s.as_bytes());
        }

        #[test]
        fn qp_decode_never_fails_for_bytes(
            s in prop::collection::vec(prop::num::u8::ANY, 0..20)
        ) {
            qp_decode(&s);
        }

        #[test]
        fn qp_decode_without_equals_is_identity(
            s in "[^=]*"
        ) {
            prop_assert_eq!(s.as_bytes(), &qp_decode(s.as_bytes())[..]);
        }
    }
}
