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

//! The message aggregate and its collaborators.
//!
//! `model` holds the passive data types shared across the module: the
//! structure tree, part identifiers, address records, and flags. `transport`
//! defines the collaborator contract the aggregate is loaded from. `walk`
//! is the recursive structure processor, a pure function so it can be
//! exercised without a `Message`. `message` ties them together into the
//! cached, explicitly-reloadable aggregate.

pub mod flags;
pub mod message;
pub mod model;
pub mod transport;
pub mod walk;
