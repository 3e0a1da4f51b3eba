/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! Allow-list gate: the whole access-control model of the bridge.

use std::collections::HashSet;

use identity_bridge_types::ExternalProfile;

/// Provider account ids permitted to receive a custom token.
///
/// Membership is byte-exact: no case folding, no prefix or substring match.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    ids: HashSet<String>,
}

impl AllowList {
    /// Parse a comma-separated id list. Entries are trimmed; blank entries
    /// are dropped so an unset variable allows nobody.
    pub fn parse(csv: &str) -> Self {
        csv.split(',').collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let ids = iter
            .into_iter()
            .map(|id| id.as_ref().trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        Self { ids }
    }
}

pub fn is_allowed(profile: &ExternalProfile, allow_list: &AllowList) -> bool {
    allow_list.contains(&profile.id)
}
