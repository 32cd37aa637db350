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

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::message::flags::FlagSet;
use crate::mime::content_encoding::ContentTransferEncoding;
use crate::support::error::Error;

/// The transport-assigned identifier that uniquely names a message within
/// its mailbox for the lifetime of a `Message` instance.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uid(pub u32);

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Uid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Uid({})", self.0)
    }
}

/// The broad class of a body part, as reported in the structure tree.
///
/// Transports report this as a numeric code; out-of-range codes map to
/// `Other`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartType {
    Text,
    Multipart,
    Message,
    Application,
    Audio,
    Image,
    Video,
    Other,
}

impl Default for PartType {
    fn default() -> Self {
        PartType::Text
    }
}

impl PartType {
    /// Maps the transport's numeric body-type code.
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => PartType::Text,
            1 => PartType::Multipart,
            2 => PartType::Message,
            3 => PartType::Application,
            4 => PartType::Audio,
            5 => PartType::Image,
            6 => PartType::Video,
            _ => PartType::Other,
        }
    }

    /// The lowercase name of this type.
    pub fn name(self) -> &'static str {
        match self {
            PartType::Text => "text",
            PartType::Multipart => "multipart",
            PartType::Message => "message",
            PartType::Application => "application",
            PartType::Audio => "audio",
            PartType::Image => "image",
            PartType::Video => "video",
            PartType::Other => "other",
        }
    }
}

/// One node of a message's body-structure tree.
///
/// Immutable once fetched; a forced structure reload replaces the whole
/// tree. `parms` carries the content-type parameters and `dparms` the
/// content-disposition parameters, each as ordered attribute/value pairs the
/// way the transport reported them.
#[derive(Clone, Debug, Default)]
pub struct StructureNode {
    pub part_type: PartType,
    /// The content subtype, e.g. "plain" or "html".
    pub subtype: String,
    pub encoding: ContentTransferEncoding,
    pub parms: Vec<(String, String)>,
    pub dparms: Vec<(String, String)>,
    /// Child parts, in wire order. Empty for leaves.
    pub parts: Vec<StructureNode>,
}

impl StructureNode {
    /// Flattens `parms` and `dparms` into one case-insensitive map.
    ///
    /// Attribute names are lower-cased; `dparms` entries are processed
    /// second and therefore win on key collision.
    pub fn merged_parms(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        for &(ref name, ref value) in self.parms.iter().chain(&self.dparms) {
            map.insert(name.to_ascii_lowercase(), value.clone());
        }
        map
    }

    /// Whether this node has no child parts.
    pub fn is_leaf(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Dotted positional identifier locating a part within the structure tree,
/// e.g. "2.1" for the first child of the second top-level part.
///
/// Subscripts are 1-based. The root itself has no identifier; operations
/// take `Option<&PartId>` with `None` meaning the whole message body.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartId(Vec<u32>);

impl PartId {
    /// Identifier of the `index`th (0-based) top-level part.
    pub fn top(index: usize) -> Self {
        PartId(vec![index as u32 + 1])
    }

    /// Identifier of this part's `index`th (0-based) child.
    pub fn child(&self, index: usize) -> Self {
        let mut subscripts = self.0.clone();
        subscripts.push(index as u32 + 1);
        PartId(subscripts)
    }

    pub fn subscripts(&self) -> &[u32] {
        &self.0
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, subscript) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", subscript)?;
        }
        Ok(())
    }
}

/// Summary information the transport reports for a message without opening
/// its content.
#[derive(Clone, Debug, Default)]
pub struct Overview {
    pub subject: Option<String>,
    /// The raw date string, as found in the message.
    pub date: Option<String>,
    /// Message size in bytes.
    pub size: u64,
    /// Flags currently set on the server, `\Recent` included.
    pub flags: FlagSet,
}

/// The parsed header block of a message, as produced by the transport
/// layer's header parser from the raw bytes.
#[derive(Clone, Debug, Default)]
pub struct HeaderRecord {
    pub to: Vec<RawAddress>,
    pub cc: Vec<RawAddress>,
    pub from: Vec<RawAddress>,
    pub reply_to: Vec<RawAddress>,
    pub date: Option<String>,
}

/// A single address record as parsed out of a header, before normalization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawAddress {
    /// The local part, left of the '@'.
    pub mailbox: String,
    /// The domain, right of the '@'.
    pub host: String,
    /// The display name, if one was given.
    pub personal: Option<String>,
}

/// A normalized address: `mailbox@host` plus optional display name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    pub address: String,
    pub name: Option<String>,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.name {
            Some(ref name) => write!(f, "{} <{}>", name, self.address),
            None => write!(f, "{}", self.address),
        }
    }
}

/// Converts raw parsed address records into normalized addresses.
///
/// Empty input yields an empty list, not an error.
pub fn normalize_addresses(raw: &[RawAddress]) -> Vec<Address> {
    raw.iter()
        .map(|record| Address {
            address: format!("{}@{}", record.mailbox, record.host),
            name: record.personal.clone(),
        })
        .collect()
}

/// Which address header of a message to query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressField {
    To,
    Cc,
    From,
    ReplyTo,
}

/// A per-message boolean status marker tracked by the mailbox server.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Recent,
    Flagged,
    Answered,
    Deleted,
    Seen,
    Draft,
}

impl Flag {
    /// The whole fixed vocabulary.
    pub const ALL: [Flag; 6] = [
        Flag::Recent,
        Flag::Flagged,
        Flag::Answered,
        Flag::Deleted,
        Flag::Seen,
        Flag::Draft,
    ];

    /// The lowercase name of this flag.
    pub fn name(self) -> &'static str {
        match self {
            Flag::Recent => "recent",
            Flag::Flagged => "flagged",
            Flag::Answered => "answered",
            Flag::Deleted => "deleted",
            Flag::Seen => "seen",
            Flag::Draft => "draft",
        }
    }

    /// The server-side token for this flag: the capitalised name with a
    /// backslash prefix.
    pub fn token(self) -> &'static str {
        match self {
            Flag::Recent => "\\Recent",
            Flag::Flagged => "\\Flagged",
            Flag::Answered => "\\Answered",
            Flag::Deleted => "\\Deleted",
            Flag::Seen => "\\Seen",
            Flag::Draft => "\\Draft",
        }
    }

    /// Whether this flag may be changed by the client. `recent` is assigned
    /// by the server only.
    pub fn is_settable(self) -> bool {
        !matches!(self, Flag::Recent)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        <Flag as fmt::Display>::fmt(self, f)
    }
}

impl FromStr for Flag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Flag::ALL
            .iter()
            .copied()
            .find(|flag| s.eq_ignore_ascii_case(flag.name()))
            .ok_or_else(|| Error::InvalidFlag(s.to_owned()))
    }
}

/// Descriptor for a part classified as an attachment during the structure
/// walk.
#[derive(Clone, Debug)]
pub struct Attachment {
    /// The structure node the attachment was found at.
    pub node: StructureNode,
    /// The node's part identifier; `None` when the attachment is the entire
    /// single-part message body.
    pub part_id: Option<PartId>,
    /// Filename resolved from the node's `filename` or `name` parameter.
    pub filename: String,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn merged_parms_lowercases_and_merges() {
        let node = StructureNode {
            parms: vec![
                ("CHARSET".to_owned(), "us-ascii".to_owned()),
                ("Name".to_owned(), "a.txt".to_owned()),
            ],
            dparms: vec![("FILENAME".to_owned(), "b.txt".to_owned())],
            ..StructureNode::default()
        };

        let parms = node.merged_parms();
        assert_eq!(Some("us-ascii"), parms.get("charset").map(|s| &**s));
        assert_eq!(Some("a.txt"), parms.get("name").map(|s| &**s));
        assert_eq!(Some("b.txt"), parms.get("filename").map(|s| &**s));
        assert_eq!(3, parms.len());
    }

    #[test]
    fn merged_parms_dparms_win_collisions() {
        let node = StructureNode {
            parms: vec![("name".to_owned(), "inner.txt".to_owned())],
            dparms: vec![("NAME".to_owned(), "outer.txt".to_owned())],
            ..StructureNode::default()
        };
        assert_eq!(
            Some("outer.txt"),
            node.merged_parms().get("name").map(|s| &**s)
        );
    }

    #[test]
    fn merged_parms_empty_lists_yield_empty_map() {
        assert!(StructureNode::default().merged_parms().is_empty());
    }

    #[test]
    fn part_id_display_and_children() {
        let second = PartId::top(1);
        assert_eq!("2", second.to_string());
        assert_eq!("2.1", second.child(0).to_string());
        assert_eq!("2.2", second.child(1).to_string());
        assert_eq!(&[2, 1], second.child(0).subscripts());
    }

    #[test]
    fn part_type_codes() {
        assert_eq!(PartType::Text, PartType::from_code(0));
        assert_eq!(PartType::Multipart, PartType::from_code(1));
        assert_eq!(PartType::Message, PartType::from_code(2));
        assert_eq!(PartType::Other, PartType::from_code(7));
        assert_eq!(PartType::Other, PartType::from_code(42));
        assert_eq!("message", PartType::Message.name());
    }

    #[test]
    fn flag_parsing_and_tokens() {
        assert_eq!(Flag::Flagged, "flagged".parse::<Flag>().unwrap());
        assert_eq!(Flag::Seen, "SEEN".parse::<Flag>().unwrap());
        assert_eq!("\\Flagged", Flag::Flagged.token());
        assert_eq!("\\Recent", Flag::Recent.token());
        assert!(!Flag::Recent.is_settable());
        assert!(Flag::Draft.is_settable());
        assert_matches!(
            Err(Error::InvalidFlag(_)),
            "important".parse::<Flag>()
        );
    }

    #[test]
    fn address_normalization_and_display() {
        let raw = vec![
            RawAddress {
                mailbox: "a".to_owned(),
                host: "b.com".to_owned(),
                personal: Some("A B".to_owned()),
            },
            RawAddress {
                mailbox: "c".to_owned(),
                host: "d.org".to_owned(),
                personal: None,
            },
        ];

        let normalized = normalize_addresses(&raw);
        assert_eq!(2, normalized.len());
        assert_eq!("a@b.com", normalized[0].address);
        assert_eq!("A B <a@b.com>", normalized[0].to_string());
        assert_eq!("c@d.org", normalized[1].to_string());

        assert!(normalize_addresses(&[]).is_empty());
    }
}
