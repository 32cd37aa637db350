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

use std::collections::HashSet;
use std::fmt;
use std::iter::FromIterator;

use crate::message::model::Flag;

/// The set of flags currently known to be set on a message.
///
/// Since the vocabulary is fixed and small, this is a plain set with no
/// notion of unknown keywords.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct FlagSet(HashSet<Flag>);

impl FlagSet {
    pub fn new() -> Self {
        FlagSet::default()
    }

    pub fn contains(&self, flag: Flag) -> bool {
        self.0.contains(&flag)
    }

    /// Returns whether the flag was newly inserted.
    pub fn insert(&mut self, flag: Flag) -> bool {
        self.0.insert(flag)
    }

    /// Returns whether the flag was present.
    pub fn remove(&mut self, flag: Flag) -> bool {
        self.0.remove(&flag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates the set flags in the fixed vocabulary order.
    pub fn iter(&self) -> impl Iterator<Item = Flag> + '_ {
        Flag::ALL.iter().copied().filter(move |&f| self.contains(f))
    }
}

impl FromIterator<Flag> for FlagSet {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        FlagSet(iter.into_iter().collect())
    }
}

impl Extend<Flag> for FlagSet {
    fn extend<I: IntoIterator<Item = Flag>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl fmt::Debug for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn basic_set_operations() {
        let mut flags = FlagSet::new();
        assert!(flags.is_empty());
        assert!(!flags.contains(Flag::Seen));

        assert!(flags.insert(Flag::Seen));
        assert!(!flags.insert(Flag::Seen));
        assert!(flags.contains(Flag::Seen));
        assert_eq!(1, flags.len());

        assert!(flags.remove(Flag::Seen));
        assert!(!flags.remove(Flag::Seen));
        assert!(flags.is_empty());
    }

    #[test]
    fn iteration_in_vocabulary_order() {
        let flags: FlagSet =
            vec![Flag::Draft, Flag::Recent, Flag::Deleted].into_iter().collect();
        assert_eq!(
            vec![Flag::Recent, Flag::Deleted, Flag::Draft],
            flags.iter().collect::<Vec<_>>()
        );
    }
}
