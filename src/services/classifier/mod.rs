// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Page topic classification.
//!
//! Two strategies share the [`PageClassifier`] contract: a keyword heuristic
//! and a small TF-IDF + naive Bayes model. The model is trained once at
//! start-up and handed to [`Classifier`] as an immutable dependency.

mod rule_based;
mod statistical;

pub use rule_based::RuleBasedClassifier;
pub use statistical::{StatisticalClassifier, TRAINING_CORPUS};

use std::sync::Arc;

/// Label returned when nothing else applies
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Text in, label out. Implementations never fail and never return an empty label.
pub trait PageClassifier: Send + Sync {
    fn classify(&self, body: &str) -> String;
}

/// Which classifier to run for a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierStrategy {
    #[default]
    RuleBased,
    Statistical,
}

impl ClassifierStrategy {
    pub fn from_flag(use_statistical: bool) -> Self {
        if use_statistical {
            ClassifierStrategy::Statistical
        } else {
            ClassifierStrategy::RuleBased
        }
    }
}

/// Holds both strategies and dispatches on [`ClassifierStrategy`]
#[derive(Clone)]
pub struct Classifier {
    rule_based: RuleBasedClassifier,
    statistical: Arc<StatisticalClassifier>,
}

impl Classifier {
    pub fn new(statistical: Arc<StatisticalClassifier>) -> Self {
        Self {
            rule_based: RuleBasedClassifier,
            statistical,
        }
    }

    /// Classify `body` with the rule-based strategy, or the statistical one
    /// when `use_statistical` is set
    pub fn classify(&self, body: &str, use_statistical: bool) -> String {
        self.classify_with(body, ClassifierStrategy::from_flag(use_statistical))
    }

    pub fn classify_with(&self, body: &str, strategy: ClassifierStrategy) -> String {
        self.strategy(strategy).classify(body)
    }

    fn strategy(&self, strategy: ClassifierStrategy) -> &dyn PageClassifier {
        match strategy {
            ClassifierStrategy::RuleBased => &self.rule_based,
            ClassifierStrategy::Statistical => self.statistical.as_ref(),
        }
    }
}
