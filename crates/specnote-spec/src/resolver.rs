//! Fuzzy query resolution
//!
//! Maps free-text or positional queries onto stories and scenarios of a
//! [`Specification`]. Only the two best-ranked candidates are considered:
//! a negligible best score means no match, two equivalent scores that point
//! at different objects mean an ambiguous query.

use crate::error::{ResolveError, Target};
use crate::model::{Scenario, Specification, Story};
use indexmap::IndexMap;
use specnote_artifact::fuzzy;

/// Up to two closest terms from `pool`
///
/// Empty if the best is negligible; two (sorted) if the best two are tied.
fn closest_match<I, S>(term: &str, pool: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut ranked = fuzzy::rank(term, pool).into_iter();
    let Some(best) = ranked.next() else {
        return Vec::new();
    };
    if best.is_negligible() {
        return Vec::new();
    }

    match ranked.next() {
        Some(second) if best.is_equivalent(&second) => {
            let mut tied = vec![best.term, second.term];
            tied.sort();
            tied
        }
        _ => vec![best.term],
    }
}

impl Specification {
    /// Story best matching `query` by trimmed source path or name
    ///
    /// # Errors
    /// [`ResolveError::NotFound`] if nothing matches,
    /// [`ResolveError::Ambiguous`] if two different stories tie
    pub fn resolve_story(&self, query: &str) -> Result<&Story, ResolveError> {
        let mut keys: IndexMap<String, &Story> = IndexMap::new();
        for story in self.stories() {
            if let Some(trimmed) = self.trimmed_source(&story.source) {
                keys.entry(trimmed).or_insert(story);
            }
            keys.entry(story.name.clone()).or_insert(story);
        }

        let mut matches: Vec<&Story> = closest_match(query, keys.keys().cloned())
            .iter()
            .filter_map(|key| keys.get(key).copied())
            .collect();
        matches.dedup_by_key(|story| story.id);

        match matches.as_slice() {
            [] => Err(ResolveError::not_found(Target::Story, query)),
            [story] => Ok(*story),
            [first, second, ..] => Err(ResolveError::Ambiguous {
                target: Target::Story,
                first: first.name.clone(),
                second: second.name.clone(),
            }),
        }
    }

    /// Scenario best matching `query`, optionally within a story
    ///
    /// A positive integer query is a 1-based position when exactly one
    /// story is in scope; otherwise scenario names are ranked.
    ///
    /// # Errors
    /// [`ResolveError::NotFound`] if nothing matches or the position is out
    /// of range, [`ResolveError::Ambiguous`] if two names tie. Errors from
    /// resolving `story_query` are propagated.
    pub fn resolve_scenario(
        &self,
        query: &str,
        story_query: Option<&str>,
    ) -> Result<&Scenario, ResolveError> {
        let scope: Vec<&Story> = match story_query {
            Some(story_query) => vec![self.resolve_story(story_query)?],
            None => self.stories().iter().collect(),
        };

        if let (Ok(position), [story]) = (query.trim().parse::<usize>(), scope.as_slice()) {
            if position > 0 {
                let story: &Story = story;
                return story
                    .scenarios
                    .get(position - 1)
                    .ok_or_else(|| ResolveError::not_found(Target::Scenario, query));
            }
        }

        let mut by_name: IndexMap<&str, &Scenario> = IndexMap::new();
        for scenario in scope.iter().flat_map(|story| story.scenarios.iter()) {
            by_name.entry(scenario.name.as_str()).or_insert(scenario);
        }

        let matches: Vec<&Scenario> = closest_match(query, by_name.keys().copied())
            .iter()
            .filter_map(|name| by_name.get(name.as_str()).copied())
            .collect();

        match matches.as_slice() {
            [] => Err(ResolveError::not_found(Target::Scenario, query)),
            [scenario] => Ok(*scenario),
            [first, second, ..] => Err(ResolveError::Ambiguous {
                target: Target::Scenario,
                first: self.display_name(first, second),
                second: self.display_name(second, first),
            }),
        }
    }

    /// Scenario name, qualified by story when `other` is in another story
    fn display_name(&self, scenario: &Scenario, other: &Scenario) -> String {
        if scenario.story == other.story {
            return scenario.name.clone();
        }
        match self.story_of(scenario) {
            Some(story) => format!("{}/{}", story.name, scenario.name),
            None => scenario.name.clone(),
        }
    }
}
