//! Translation tables between a target's native names and the canonical
//! [`Platform`] and [`Media`] enums.
//!
//! Both tables build their inverse when constructed. Platforms must map
//! one-to-one; media may share a canonical value between several native
//! keys, in which case the first key in table order is the one written.

use std::collections::HashMap;

use retrobox_core::{Media, Platform};

use crate::FrontendError;

#[derive(Debug, Clone, Default)]
pub struct PlatformTable {
    entries: Vec<(String, Platform)>,
    inverse: HashMap<Platform, String>,
}

impl PlatformTable {
    pub fn new<K: Into<String>>(
        entries: impl IntoIterator<Item = (K, Platform)>,
    ) -> Result<Self, FrontendError> {
        let mut table = Self::default();
        for (key, platform) in entries {
            table.insert(key.into(), platform)?;
        }
        Ok(table)
    }

    fn insert(&mut self, key: String, platform: Platform) -> Result<(), FrontendError> {
        if let Some(first) = self.inverse.get(&platform) {
            return Err(FrontendError::DuplicateMapping {
                platform,
                first: first.clone(),
                second: key,
            });
        }
        self.inverse.insert(platform, key.clone());
        self.entries.push((key, platform));
        Ok(())
    }

    /// Copy of this table where `overrides` replace the static entries of
    /// the same platform or the same native key.
    pub fn with_overrides(&self, overrides: &[(Platform, String)]) -> Result<Self, FrontendError> {
        let kept = self.entries.iter().filter(|(key, platform)| {
            !overrides
                .iter()
                .any(|(p, k)| p == platform || k == key)
        });
        let merged: Vec<(String, Platform)> = kept
            .cloned()
            .chain(overrides.iter().map(|(p, k)| (k.clone(), *p)))
            .collect();
        Self::new(merged)
    }

    pub fn platform(&self, key: &str) -> Option<Platform> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, platform)| *platform)
    }

    pub fn key(&self, platform: Platform) -> Option<&str> {
        self.inverse.get(&platform).map(String::as_str)
    }

    pub fn platforms(&self) -> impl Iterator<Item = Platform> + '_ {
        self.entries.iter().map(|(_, platform)| *platform)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct MediaTable {
    entries: &'static [(&'static str, Media)],
    inverse: HashMap<Media, &'static str>,
}

impl MediaTable {
    pub fn new(entries: &'static [(&'static str, Media)]) -> Self {
        let mut inverse = HashMap::new();
        for (key, media) in entries {
            inverse.entry(*media).or_insert(*key);
        }
        Self { entries, inverse }
    }

    pub fn media(&self, key: &str) -> Option<Media> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, media)| *media)
    }

    /// Preferred native key for `media`.
    pub fn key(&self, media: Media) -> Option<&'static str> {
        self.inverse.get(&media).copied()
    }

    pub fn supports(&self, media: Media) -> bool {
        self.inverse.contains_key(&media)
    }

    /// Native keys in table order.
    pub fn entries(&self) -> &'static [(&'static str, Media)] {
        self.entries
    }
}

#[cfg(test)]
#[path = "tests/mapping_tests.rs"]
mod tests;
