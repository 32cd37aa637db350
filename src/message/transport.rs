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

use crate::message::model::{
    HeaderRecord, Overview, PartId, StructureNode, Uid,
};
use crate::support::error::Error;

/// Access to the mailbox server, scoped to whatever mailbox is currently
/// selected.
///
/// `Message` drives all of its server interaction through this trait, which
/// lets tests substitute a canned implementation and lets callers layer
/// their own connection handling underneath.
pub trait Transport {
    /// Fetches the overview record for `uid`.
    fn fetch_overview(&mut self, uid: Uid) -> Result<Overview, Error>;

    /// Fetches the raw, undecoded header block of `uid`.
    fn fetch_raw_headers(&mut self, uid: Uid) -> Result<Vec<u8>, Error>;

    /// Parses a raw header block into structured records.
    fn parse_headers(&mut self, raw: &[u8]) -> Result<HeaderRecord, Error>;

    /// Fetches the body-structure tree of `uid`.
    fn fetch_structure(&mut self, uid: Uid) -> Result<StructureNode, Error>;

    /// Fetches the raw content of one body part, or of the whole body when
    /// `part` is `None`.
    fn fetch_body(
        &mut self,
        uid: Uid,
        part: Option<&PartId>,
    ) -> Result<Vec<u8>, Error>;

    /// Sets or clears the flag named by `token` (e.g. `\Seen`) on `uid`.
    ///
    /// Returns whether the server accepted the change.
    fn set_flag(
        &mut self,
        uid: Uid,
        token: &str,
        enable: bool,
    ) -> Result<bool, Error>;

    /// Marks `uid` deleted on the server. Returns whether the server
    /// accepted the change.
    fn delete(&mut self, uid: Uid) -> Result<bool, Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn fetch_overview(&mut self, uid: Uid) -> Result<Overview, Error> {
        (**self).fetch_overview(uid)
    }

    fn fetch_raw_headers(&mut self, uid: Uid) -> Result<Vec<u8>, Error> {
        (**self).fetch_raw_headers(uid)
    }

    fn parse_headers(&mut self, raw: &[u8]) -> Result<HeaderRecord, Error> {
        (**self).parse_headers(raw)
    }

    fn fetch_structure(&mut self, uid: Uid) -> Result<StructureNode, Error> {
        (**self).fetch_structure(uid)
    }

    fn fetch_body(
        &mut self,
        uid: Uid,
        part: Option<&PartId>,
    ) -> Result<Vec<u8>, Error> {
        (**self).fetch_body(uid, part)
    }

    fn set_flag(
        &mut self,
        uid: Uid,
        token: &str,
        enable: bool,
    ) -> Result<bool, Error> {
        (**self).set_flag(uid, token, enable)
    }

    fn delete(&mut self, uid: Uid) -> Result<bool, Error> {
        (**self).delete(uid)
    }
}
