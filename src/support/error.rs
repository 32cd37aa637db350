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

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A flag name outside the fixed vocabulary, or `recent`, was passed to
    /// a set operation.
    #[error("Unable to set invalid or read-only flag \"{0}\"")]
    InvalidFlag(String),
    /// The loaded header record carried no intelligible from-address.
    #[error("Message has no from-address")]
    MissingFromAddress,
    /// A charset label could not be resolved for transliteration.
    #[error("Unsupported charset \"{0}\"")]
    UnsupportedCharset(String),
    /// A transport round trip failed. Never retried at this layer.
    #[error("Transport request failed: {0}")]
    Transport(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}
