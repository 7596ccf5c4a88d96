//! Filtering of generations by model, status, tag, user and free text.

use crate::generation::Generation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Selected filter values. An empty set places no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationFilter {
    pub models: BTreeSet<String>,
    pub statuses: BTreeSet<String>,
    /// A generation matches when it carries any of these tags
    pub tags: BTreeSet<String>,
    pub users: BTreeSet<String>,
    /// Case-insensitive text matched against model, prompt and response
    pub search: Option<String>,
}

impl GenerationFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.models.insert(model.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.statuses.insert(status.into());
        self
    }

    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.users.insert(user.into());
        self
    }

    /// Set the search text; blank text clears it.
    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.search = (!text.trim().is_empty()).then_some(text);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
            && self.statuses.is_empty()
            && self.tags.is_empty()
            && self.users.is_empty()
            && self.search.is_none()
    }

    #[must_use]
    pub fn matches(&self, generation: &Generation) -> bool {
        if !self.models.is_empty() && !self.models.contains(&generation.name) {
            return false;
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&generation.status) {
            return false;
        }
        if !self.tags.is_empty() && !generation.tags.iter().any(|t| self.tags.contains(t)) {
            return false;
        }
        if !self.users.is_empty()
            && !generation
                .user
                .as_ref()
                .is_some_and(|u| self.users.contains(u))
        {
            return false;
        }
        match &self.search {
            Some(text) => matches_text(generation, &text.to_lowercase()),
            None => true,
        }
    }

    /// Generations passing the filter, in input order.
    pub fn apply<'a>(&'a self, generations: &'a [Generation]) -> impl Iterator<Item = &'a Generation> {
        generations.iter().filter(move |g| self.matches(g))
    }
}

fn matches_text(generation: &Generation, needle: &str) -> bool {
    let contains = |haystack: &str| haystack.to_lowercase().contains(needle);
    contains(&generation.name)
        || generation.messages().iter().any(|m| contains(&m.text))
        || generation.response_text().is_some_and(contains)
}

/// Distinct values offered by the filter controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub models: Vec<String>,
    pub statuses: Vec<String>,
    pub tags: Vec<String>,
    pub users: Vec<String>,
}

impl FilterOptions {
    /// Collect the sorted distinct values present in `generations`.
    #[must_use]
    pub fn collect(generations: &[Generation]) -> Self {
        let mut models = BTreeSet::new();
        let mut statuses = BTreeSet::new();
        let mut tags = BTreeSet::new();
        let mut users = BTreeSet::new();
        for g in generations {
            models.insert(g.name.clone());
            statuses.insert(g.status.clone());
            tags.extend(g.tags.iter().cloned());
            users.extend(g.user.clone());
        }
        Self {
            models: models.into_iter().collect(),
            statuses: statuses.into_iter().collect(),
            tags: tags.into_iter().collect(),
            users: users.into_iter().collect(),
        }
    }
}
