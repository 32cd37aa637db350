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

//! The recursive body-structure traversal.
//!
//! Given an already-fetched structure tree and a callback that retrieves
//! raw part bytes, `walk` classifies every node as an attachment or body
//! content and accumulates the plaintext body, the HTML body, and the
//! ordered attachment list in one depth-first pass.

use std::borrow::Cow;

use crate::message::model::{Attachment, PartId, PartType, StructureNode};
use crate::mime::content_encoding;
use crate::support::error::Error;

/// Everything a traversal of a structure tree produces.
#[derive(Clone, Debug, Default)]
pub struct WalkedBodies {
    /// Concatenation of all plaintext-routed fragments, blank-line
    /// separated, or `None` if no leaf contributed.
    pub plaintext: Option<String>,
    /// Concatenation of all HTML-routed fragments, `<br><br>` separated,
    /// or `None` if no leaf contributed.
    pub html: Option<String>,
    /// Attachments in the left-to-right depth-first order their nodes
    /// appear in the tree.
    pub attachments: Vec<Attachment>,
}

/// Walks `root` depth-first, fetching and decoding body leaves through
/// `fetch` and collecting attachments.
///
/// `fetch` is called with `None` exactly when the root itself is a body
/// leaf (single-part message), and with the dotted part identifier
/// otherwise. Fetch failures and unsupported transliteration charsets abort
/// the walk.
pub fn walk<F>(
    root: &StructureNode,
    output_charset: &str,
    fetch: &mut F,
) -> Result<WalkedBodies, Error>
where
    F: FnMut(Option<&PartId>) -> Result<Vec<u8>, Error>,
{
    let mut out = WalkedBodies::default();
    process_node(root, None, output_charset, fetch, &mut out)?;
    Ok(out)
}

fn process_node<F>(
    node: &StructureNode,
    part_id: Option<PartId>,
    output_charset: &str,
    fetch: &mut F,
    out: &mut WalkedBodies,
) -> Result<(), Error>
where
    F: FnMut(Option<&PartId>) -> Result<Vec<u8>, Error>,
{
    let parms = node.merged_parms();

    if parms.contains_key("name") || parms.contains_key("filename") {
        // A name or filename parameter marks the node as an attachment
        // no matter what its declared type says.
        let filename = parms
            .get("filename")
            .or_else(|| parms.get("name"))
            .cloned()
            .unwrap_or_default();
        out.attachments.push(Attachment {
            node: node.clone(),
            part_id: part_id.clone(),
            filename,
        });
    } else if matches!(node.part_type, PartType::Text | PartType::Message) {
        let raw = fetch(part_id.as_ref())?;
        let decoded = content_encoding::decode(&raw, node.encoding);
        let decoded = match parms.get("charset") {
            Some(charset)
                if wants_transliteration(charset, output_charset) =>
            {
                Cow::Owned(content_encoding::transliterate(
                    &decoded,
                    charset,
                    output_charset,
                )?)
            }
            _ => decoded,
        };

        let fragment = String::from_utf8_lossy(&decoded);
        let fragment = fragment.trim();
        if "plain".eq_ignore_ascii_case(&node.subtype)
            || PartType::Message == node.part_type
        {
            append_fragment(&mut out.plaintext, fragment, "\n\n");
        } else {
            append_fragment(&mut out.html, fragment, "<br><br>");
        }
    }
    // Other leaf types with no attachment parameters contribute nothing.

    for (index, part) in node.parts.iter().enumerate() {
        let child_id = match part_id {
            Some(ref id) => id.child(index),
            None => PartId::top(index),
        };
        process_node(part, Some(child_id), output_charset, fetch, out)?;
    }

    Ok(())
}

/// Transliteration is deliberately narrow: only bytes declared us-ascii
/// get converted, and only when the target charset is something other
/// than UTF-8 or an ISO-8859-1 derivative (both of which are ASCII
/// supersets already).
fn wants_transliteration(declared: &str, target: &str) -> bool {
    !declared.eq_ignore_ascii_case(target)
        && declared.eq_ignore_ascii_case("us-ascii")
        && !target.eq_ignore_ascii_case("utf-8")
        && !target.to_ascii_lowercase().contains("iso-8859-1")
}

fn append_fragment(acc: &mut Option<String>, fragment: &str, sep: &str) {
    match acc {
        Some(body) => {
            body.push_str(sep);
            body.push_str(fragment);
        }
        None => *acc = Some(fragment.to_owned()),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mime::content_encoding::ContentTransferEncoding;

    fn text_leaf(subtype: &str) -> StructureNode {
        StructureNode {
            part_type: PartType::Text,
            subtype: subtype.to_owned(),
            ..StructureNode::default()
        }
    }

    fn named_leaf(parm: &str, value: &str) -> StructureNode {
        StructureNode {
            part_type: PartType::Application,
            subtype: "octet-stream".to_owned(),
            parms: vec![(parm.to_owned(), value.to_owned())],
            ..StructureNode::default()
        }
    }

    fn multipart(parts: Vec<StructureNode>) -> StructureNode {
        StructureNode {
            part_type: PartType::Multipart,
            subtype: "mixed".to_owned(),
            parts,
            ..StructureNode::default()
        }
    }

    fn walk_with_bodies(
        root: &StructureNode,
        bodies: &[(&str, &[u8])],
    ) -> WalkedBodies {
        let mut fetched = Vec::new();
        let out = walk(root, "UTF-8", &mut |part| {
            let key = part.map(|p| p.to_string()).unwrap_or_default();
            fetched.push(key.clone());
            Ok(bodies
                .iter()
                .find(|&&(id, _)| id == key)
                .map(|&(_, body)| body.to_vec())
                .unwrap_or_default())
        })
        .unwrap();
        out
    }

    #[test]
    fn single_plain_leaf_fetches_whole_body() {
        let root = text_leaf("plain");
        let mut requested = Vec::new();
        let out = walk(&root, "UTF-8", &mut |part| {
            requested.push(part.map(|p| p.to_string()));
            Ok(b"  hello world\n".to_vec())
        })
        .unwrap();

        // The root leaf is fetched with no part identifier.
        assert_eq!(vec![None], requested);
        assert_eq!(Some("hello world"), out.plaintext.as_deref());
        assert_eq!(None, out.html.as_deref());
        assert!(out.attachments.is_empty());
    }

    #[test]
    fn html_leaf_routes_to_html() {
        let root = multipart(vec![text_leaf("html")]);
        let out = walk_with_bodies(&root, &[("1", b"<p>hi</p>")]);
        assert_eq!(None, out.plaintext.as_deref());
        assert_eq!(Some("<p>hi</p>"), out.html.as_deref());
    }

    #[test]
    fn message_leaf_routes_to_plaintext_regardless_of_subtype() {
        let root = multipart(vec![StructureNode {
            part_type: PartType::Message,
            subtype: "rfc822".to_owned(),
            ..StructureNode::default()
        }]);
        let out = walk_with_bodies(&root, &[("1", b"inner message")]);
        assert_eq!(Some("inner message"), out.plaintext.as_deref());
    }

    #[test]
    fn name_parameter_overrides_body_classification() {
        // Even a text/plain leaf becomes an attachment if named, and its
        // bytes are never fetched.
        let mut leaf = text_leaf("plain");
        leaf.parms.push(("name".to_owned(), "note.txt".to_owned()));
        let root = multipart(vec![leaf]);

        let out = walk(&root, "UTF-8", &mut |_| {
            panic!("attachment bytes must not be fetched")
        })
        .unwrap();

        assert_eq!(None, out.plaintext);
        assert_eq!(1, out.attachments.len());
        assert_eq!("note.txt", out.attachments[0].filename);
        assert_eq!(
            Some("1"),
            out.attachments[0].part_id.as_ref().map(|p| p.to_string()).as_deref()
        );
    }

    #[test]
    fn filename_parameter_takes_precedence_over_name() {
        let mut leaf = named_leaf("name", "fallback.bin");
        leaf.dparms
            .push(("filename".to_owned(), "real.bin".to_owned()));
        let out = walk_with_bodies(&multipart(vec![leaf]), &[]);
        assert_eq!("real.bin", out.attachments[0].filename);
    }

    #[test]
    fn attachment_order_is_depth_first() {
        let root = multipart(vec![
            named_leaf("name", "a.txt"),
            multipart(vec![
                named_leaf("name", "c.txt"),
                named_leaf("name", "d.txt"),
            ]),
        ]);

        let out = walk_with_bodies(&root, &[]);
        let names: Vec<&str> =
            out.attachments.iter().map(|a| &*a.filename).collect();
        assert_eq!(vec!["a.txt", "c.txt", "d.txt"], names);

        let ids: Vec<String> = out
            .attachments
            .iter()
            .map(|a| a.part_id.as_ref().unwrap().to_string())
            .collect();
        assert_eq!(vec!["1", "2.1", "2.2"], ids);
    }

    #[test]
    fn named_multipart_is_still_recursed() {
        let mut outer = multipart(vec![text_leaf("plain")]);
        outer
            .parms
            .push(("name".to_owned(), "bundle".to_owned()));
        let root = multipart(vec![outer]);

        let out = walk_with_bodies(&root, &[("1.1", b"inner text")]);
        assert_eq!(1, out.attachments.len());
        assert_eq!(Some("inner text"), out.plaintext.as_deref());
    }

    #[test]
    fn unhandled_leaf_types_are_skipped() {
        let root = multipart(vec![StructureNode {
            part_type: PartType::Image,
            subtype: "png".to_owned(),
            ..StructureNode::default()
        }]);

        let out = walk(&root, "UTF-8", &mut |_| {
            panic!("non-body leaves must not be fetched")
        })
        .unwrap();
        assert_eq!(None, out.plaintext);
        assert_eq!(None, out.html);
        assert!(out.attachments.is_empty());
    }

    #[test]
    fn fragments_join_with_separators() {
        let root = multipart(vec![
            text_leaf("plain"),
            text_leaf("html"),
            text_leaf("plain"),
            text_leaf("html"),
        ]);
        let out = walk_with_bodies(
            &root,
            &[
                ("1", b" one "),
                ("2", b"<i>a</i>"),
                ("3", b"two"),
                ("4", b"<i>b</i>\n"),
            ],
        );
        assert_eq!(Some("one\n\ntwo"), out.plaintext.as_deref());
        assert_eq!(Some("<i>a</i><br><br><i>b</i>"), out.html.as_deref());
    }

    #[test]
    fn encoded_leaves_are_decoded() {
        let mut leaf = text_leaf("plain");
        leaf.encoding = ContentTransferEncoding::Base64;
        let root = multipart(vec![leaf]);
        let out = walk_with_bodies(&root, &[("1", b"aGVsbG8=")]);
        assert_eq!(Some("hello"), out.plaintext.as_deref());
    }

    #[test]
    fn ascii_supersets_skip_transliteration() {
        assert!(!wants_transliteration("us-ascii", "UTF-8"));
        assert!(!wants_transliteration("us-ascii", "utf-8"));
        assert!(!wants_transliteration("us-ascii", "ISO-8859-1"));
        assert!(!wants_transliteration("US-ASCII", "us-ascii"));
        // Only declared us-ascii triggers at all.
        assert!(!wants_transliteration("koi8-r", "windows-1252"));
        assert!(wants_transliteration("us-ascii", "windows-1252"));
    }

    #[test]
    fn transliteration_failure_aborts_walk() {
        let mut leaf = text_leaf("plain");
        leaf.parms
            .push(("charset".to_owned(), "us-ascii".to_owned()));
        let root = multipart(vec![leaf]);

        let result = walk(&root, "not-a-charset", &mut |_| Ok(b"hi".to_vec()));
        assert_matches!(Err(Error::UnsupportedCharset(_)), result);
    }

    #[test]
    fn fetch_errors_propagate() {
        let root = text_leaf("plain");
        let result = walk(&root, "UTF-8", &mut |_| {
            Err(Error::Transport("gone".to_owned()))
        });
        assert_matches!(Err(Error::Transport(_)), result);
    }

    #[test]
    fn empty_tree_yields_no_bodies() {
        let out = walk_with_bodies(&multipart(vec![]), &[]);
        assert_eq!(None, out.plaintext);
        assert_eq!(None, out.html);
        assert!(out.attachments.is_empty());
    }
}
