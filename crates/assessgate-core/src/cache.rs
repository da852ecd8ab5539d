//! Memoized assessment evaluation.
//!
//! Form layers re-evaluate after every keystroke, usually with an unchanged
//! schema and a response map that differs in one key or not at all. The
//! cache buckets results by structural fingerprints of both inputs and keeps
//! the inputs next to each result; a hit requires them to compare equal, so
//! a fingerprint collision costs a recomputation, never a wrong state.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::aggregate::{evaluate_assessment, AssessmentState};
use crate::model::Assessment;
use crate::response::ResponseMap;

const DEFAULT_CAPACITY: usize = 64;

/// Structural hash of an assessment schema.
pub fn assessment_fingerprint(assessment: &Assessment) -> u64 {
    let mut hasher = DefaultHasher::new();
    format!("{assessment:?}").hash(&mut hasher);
    hasher.finish()
}

/// Structural hash of a response map's contents, ignoring its version.
pub fn responses_fingerprint(responses: &ResponseMap) -> u64 {
    let mut hasher = DefaultHasher::new();
    for (id, value) in responses.iter() {
        id.hash(&mut hasher);
        format!("{value:?}").hash(&mut hasher);
    }
    hasher.finish()
}

#[derive(Debug)]
struct CacheEntry {
    assessment: Assessment,
    responses: ResponseMap,
    state: AssessmentState,
}

impl CacheEntry {
    fn matches(&self, assessment: &Assessment, responses: &ResponseMap) -> bool {
        self.assessment == *assessment && self.responses.iter().eq(responses.iter())
    }
}

/// Bounded memo table for [`evaluate_assessment`].
#[derive(Debug)]
pub struct EvaluationCache {
    entries: HashMap<(u64, u64), CacheEntry>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for EvaluationCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl EvaluationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A capacity of zero disables caching.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Evaluate, reusing a previous result for identical inputs.
    pub fn evaluate(&mut self, assessment: &Assessment, responses: &ResponseMap) -> AssessmentState {
        let key = (
            assessment_fingerprint(assessment),
            responses_fingerprint(responses),
        );

        match self.entries.get(&key) {
            Some(entry) if entry.matches(assessment, responses) => {
                self.hits += 1;
                tracing::debug!(
                    assessment = %assessment.id,
                    version = responses.version(),
                    "evaluation cache hit"
                );
                return entry.state.clone();
            }
            Some(_) => tracing::debug!(
                assessment = %assessment.id,
                "evaluation cache fingerprint collision"
            ),
            None => tracing::debug!(
                assessment = %assessment.id,
                version = responses.version(),
                "evaluation cache miss"
            ),
        }

        self.misses += 1;
        let state = evaluate_assessment(assessment, responses);

        if self.capacity > 0 {
            if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
                self.entries.clear();
            }
            self.entries.insert(
                key,
                CacheEntry {
                    assessment: assessment.clone(),
                    responses: responses.clone(),
                    state: state.clone(),
                },
            );
        }
        state
    }

    pub fn invalidate(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (hits, misses) since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}
