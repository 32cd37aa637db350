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

//! Letterbox is a small client-side library for working with a single mail
//! message fetched from an IMAP-style transport.
//!
//! The transport layer (session handling, wire protocol, retries) is not
//! part of this crate; it is consumed through the narrow
//! [`Transport`](message::transport::Transport) trait. What this crate does
//! provide is everything between the transport's structured records and
//! something displayable:
//!
//! - recursive traversal of the message's body-structure tree, assigning
//!   each part its dotted positional identifier;
//! - classification of each leaf as body content or attachment;
//! - transfer-encoding and (narrowly) charset decoding of body fragments;
//! - aggregation into exactly one plaintext and one HTML body plus an
//!   ordered attachment list;
//! - address normalization and flag bookkeeping.
//!
//! The entry point is [`Message`](message::message::Message), which performs
//! an all-or-nothing load at construction and caches each fetched group
//! until explicitly reloaded.

#[cfg(test)]
macro_rules! assert_matches {
    ($expected:pat, $actual:expr) => {
        match $actual {
            $expected => (),
            unexpected => panic!(
                "Expected {} matches {}, got {:?}",
                stringify!($expected),
                stringify!($actual),
                unexpected
            ),
        }
    };
}

pub mod message;
pub mod mime;
pub mod support;

pub use crate::message::message::{Message, MessageConfig};
pub use crate::message::transport::Transport;
pub use crate::support::error::Error;
