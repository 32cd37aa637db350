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

//! The `Message` aggregate: one fully-loaded mailbox message and its
//! public read/query/mutate surface.
//!
//! A `Message` is created through `open`, which performs the whole load
//! up-front: overview, headers, structure, and the body walk. There is no
//! partially-loaded state. After that, reads come out of the caches and
//! the only round trips are explicit force reloads, attachment fetches,
//! and flag/delete mutations.

use std::borrow::Cow;

use chrono::{DateTime, FixedOffset};
use log::{debug, warn};

use crate::message::model::{
    normalize_addresses, Address, AddressField, Attachment, Flag,
    HeaderRecord, Overview, StructureNode, Uid,
};
use crate::message::transport::Transport;
use crate::message::walk::{self, WalkedBodies};
use crate::mime::content_encoding;
use crate::support::error::Error;

/// Per-message settings.
#[derive(Clone, Debug)]
pub struct MessageConfig {
    /// The charset body text is delivered in. Bytes declared us-ascii are
    /// transliterated into this charset when it is not an ASCII superset.
    pub output_charset: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        MessageConfig {
            output_charset: "UTF-8".to_owned(),
        }
    }
}

/// The normalized address fields of a loaded header block.
#[derive(Clone, Debug, Default)]
struct Addresses {
    to: Vec<Address>,
    cc: Vec<Address>,
    from: Vec<Address>,
    reply_to: Vec<Address>,
}

/// One message in the currently selected mailbox.
pub struct Message<T> {
    uid: Uid,
    transport: T,
    config: MessageConfig,
    overview: Option<Overview>,
    headers: Option<HeaderRecord>,
    addresses: Addresses,
    structure: Option<StructureNode>,
    bodies: WalkedBodies,
}

impl<T: Transport> Message<T> {
    /// Opens the message with UID `uid`, loading everything through
    /// `transport` with the default configuration.
    pub fn open(uid: Uid, transport: T) -> Result<Self, Error> {
        Message::open_with_config(uid, transport, MessageConfig::default())
    }

    /// Opens the message, performing the full load: overview, headers,
    /// structure, and the body walk. Any failure aborts construction.
    pub fn open_with_config(
        uid: Uid,
        transport: T,
        config: MessageConfig,
    ) -> Result<Self, Error> {
        let mut message = Message {
            uid,
            transport,
            config,
            overview: None,
            headers: None,
            addresses: Addresses::default(),
            structure: None,
            bodies: WalkedBodies::default(),
        };
        message.load_overview(false)?;
        message.load_headers(false)?;
        message.load_structure(false)?;
        message.walk_structure()?;
        Ok(message)
    }

    pub fn uid(&self) -> Uid {
        self.uid
    }

    /// Direct access to the underlying transport, e.g. to expunge after
    /// `delete`.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Fetches the overview record if not already cached, or
    /// unconditionally when `force` is set.
    pub fn load_overview(&mut self, force: bool) -> Result<&Overview, Error> {
        if force || self.overview.is_none() {
            debug!("{}: Fetch overview", self.uid);
            self.overview = Some(self.transport.fetch_overview(self.uid)?);
        }
        Ok(self.overview.as_ref().expect("overview just loaded"))
    }

    /// Fetches and parses the header block if not already cached, or
    /// unconditionally when `force` is set.
    ///
    /// Fails with `MissingFromAddress` if the parsed headers carry no
    /// from-address; the previous cached headers are kept in that case.
    pub fn load_headers(
        &mut self,
        force: bool,
    ) -> Result<&HeaderRecord, Error> {
        if force || self.headers.is_none() {
            debug!("{}: Fetch and parse headers", self.uid);
            let raw = self.transport.fetch_raw_headers(self.uid)?;
            let headers = self.transport.parse_headers(&raw)?;

            let from = normalize_addresses(&headers.from);
            if from.is_empty() {
                return Err(Error::MissingFromAddress);
            }
            let reply_to = if headers.reply_to.is_empty() {
                from.clone()
            } else {
                normalize_addresses(&headers.reply_to)
            };
            self.addresses = Addresses {
                to: normalize_addresses(&headers.to),
                cc: normalize_addresses(&headers.cc),
                from,
                reply_to,
            };
            self.headers = Some(headers);
        }
        Ok(self.headers.as_ref().expect("headers just loaded"))
    }

    /// Fetches the structure tree if not already cached, or unconditionally
    /// when `force` is set.
    ///
    /// Reloading the structure does not re-run the body walk; call
    /// `walk_structure` afterwards to refresh bodies and attachments.
    pub fn load_structure(
        &mut self,
        force: bool,
    ) -> Result<&StructureNode, Error> {
        if force || self.structure.is_none() {
            debug!("{}: Fetch structure", self.uid);
            self.structure = Some(self.transport.fetch_structure(self.uid)?);
        }
        Ok(self.structure.as_ref().expect("structure just loaded"))
    }

    /// Walks the (cached) structure tree, replacing the plaintext body, the
    /// HTML body, and the attachment list.
    pub fn walk_structure(&mut self) -> Result<(), Error> {
        self.load_structure(false)?;

        let structure = self.structure.take().expect("structure just loaded");
        let uid = self.uid;
        let transport = &mut self.transport;
        let result =
            walk::walk(&structure, &self.config.output_charset, &mut |part| {
                transport.fetch_body(uid, part)
            });
        self.structure = Some(structure);

        self.bodies = result?;
        Ok(())
    }

    /// Returns the requested body kind, falling back to a best-effort
    /// conversion of the other kind, or `None` when the message has no
    /// textual body at all.
    ///
    /// HTML requested with only plaintext present synthesizes HTML by
    /// marking line breaks; plaintext requested with only HTML present
    /// strips markup tags.
    pub fn body(&self, html: bool) -> Option<Cow<'_, str>> {
        match (html, &self.bodies.html, &self.bodies.plaintext) {
            (true, Some(h), _) => Some(Cow::Borrowed(&**h)),
            (true, None, Some(p)) => Some(Cow::Owned(insert_line_breaks(p))),
            (false, _, Some(p)) => Some(Cow::Borrowed(&**p)),
            (false, Some(h), None) => Some(Cow::Owned(strip_markup(h))),
            _ => None,
        }
    }

    /// The normalized addresses of the given field. Empty means the field
    /// was absent or empty in the headers, except `from` (never empty) and
    /// `reply-to` (defaults to the from-list).
    pub fn addresses(&self, field: AddressField) -> &[Address] {
        match field {
            AddressField::To => &self.addresses.to,
            AddressField::Cc => &self.addresses.cc,
            AddressField::From => &self.addresses.from,
            AddressField::ReplyTo => &self.addresses.reply_to,
        }
    }

    /// The message's first from-address. Guaranteed present once loaded.
    pub fn from_address(&self) -> &Address {
        &self.addresses.from[0]
    }

    /// Renders the given address field as a comma-separated string, or
    /// `None` when the field is empty.
    pub fn address_string(&self, field: AddressField) -> Option<String> {
        let addresses = self.addresses(field);
        if addresses.is_empty() {
            return None;
        }
        Some(
            addresses
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        )
    }

    /// All attachments found by the last structure walk, in depth-first
    /// tree order.
    pub fn attachments(&self) -> &[Attachment] {
        &self.bodies.attachments
    }

    /// The attachments whose resolved filename equals `filename` exactly.
    pub fn attachments_named(&self, filename: &str) -> Vec<&Attachment> {
        self.bodies
            .attachments
            .iter()
            .filter(|a| a.filename == filename)
            .collect()
    }

    /// Fetches and decodes the content of the `index`th attachment, or
    /// `None` if there is no such attachment.
    pub fn fetch_attachment(
        &mut self,
        index: usize,
    ) -> Result<Option<Vec<u8>>, Error> {
        let (part_id, encoding) = match self.bodies.attachments.get(index) {
            Some(a) => (a.part_id.clone(), a.node.encoding),
            None => return Ok(None),
        };

        let raw = self.transport.fetch_body(self.uid, part_id.as_ref())?;
        Ok(Some(content_encoding::decode(&raw, encoding).into_owned()))
    }

    /// Whether `flag` was set the last time the overview was loaded.
    pub fn check_flag(&self, flag: Flag) -> bool {
        self.overview
            .as_ref()
            .map_or(false, |o| o.flags.contains(flag))
    }

    /// Sets or clears `flag` on the server.
    ///
    /// The cached flag state is not mutated; reload the overview to observe
    /// the change. `recent` is server-assigned and cannot be set.
    pub fn set_flag(&mut self, flag: Flag, enable: bool) -> Result<bool, Error> {
        if !flag.is_settable() {
            return Err(Error::InvalidFlag(flag.name().to_owned()));
        }
        self.transport.set_flag(self.uid, flag.token(), enable)
    }

    /// As `set_flag`, with the flag given by name.
    pub fn set_flag_named(
        &mut self,
        name: &str,
        enable: bool,
    ) -> Result<bool, Error> {
        self.set_flag(name.parse()?, enable)
    }

    /// Marks the message deleted on the server. Removal itself is deferred
    /// to a later expunge on the transport.
    pub fn delete(&mut self) -> Result<bool, Error> {
        self.transport.delete(self.uid)
    }

    pub fn subject(&self) -> Option<&str> {
        self.overview.as_ref().and_then(|o| o.subject.as_deref())
    }

    /// The raw date string, preferring the header date over the overview
    /// date.
    pub fn date_string(&self) -> Option<&str> {
        self.headers
            .as_ref()
            .and_then(|h| h.date.as_deref())
            .or_else(|| self.overview.as_ref().and_then(|o| o.date.as_deref()))
    }

    /// The message date, if the date string parses as RFC 2822.
    pub fn date(&self) -> Option<DateTime<FixedOffset>> {
        self.date_string().and_then(parse_date)
    }

    pub fn size(&self) -> u64 {
        self.overview.as_ref().map_or(0, |o| o.size)
    }
}

fn parse_date(text: &str) -> Option<DateTime<FixedOffset>> {
    match DateTime::parse_from_rfc2822(text.trim()) {
        Ok(date) => Some(date),
        Err(e) => {
            warn!("Unparseable date {:?}: {}", text, e);
            None
        }
    }
}

/// Marks every line break in `text` with `<br>`, keeping the break itself.
fn insert_line_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if Some(&'\n') == chars.peek() {
                    chars.next();
                }
                out.push_str("<br>\n");
            }
            '\n' => out.push_str("<br>\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Removes everything between `<` and `>`, inclusive.
fn strip_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => (),
        }
    }
    out
}
