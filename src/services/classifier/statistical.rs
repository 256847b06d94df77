// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use super::{PageClassifier, UNCATEGORIZED};
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;
use tracing::debug;

/// Tokens of two or more word characters
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("static token pattern must compile"));

/// Laplace smoothing for the naive Bayes feature counts
const ALPHA: f64 = 1.0;

/// One labelled example per category
pub const TRAINING_CORPUS: [(&str, &str); 3] = [
    ("buy this amazing toaster", "ecommerce"),
    ("outdoors is beautiful for camping", "blog"),
    ("politics and the snowden leak", "news"),
];

/// TF-IDF features fed into a multinomial naive Bayes model.
///
/// Fitted once and read-only afterwards. Text made only of words outside the
/// training vocabulary gets equal scores for every label and resolves to the
/// alphabetically first one.
#[derive(Debug, Clone)]
pub struct StatisticalClassifier {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    /// Sorted; index is the class id
    labels: Vec<String>,
    class_log_prior: Vec<f64>,
    /// `[class][feature]`
    feature_log_prob: Vec<Vec<f64>>,
}

impl StatisticalClassifier {
    /// Fit on [`TRAINING_CORPUS`]
    pub fn trained() -> Self {
        Self::train(&TRAINING_CORPUS)
    }

    pub fn train(corpus: &[(&str, &str)]) -> Self {
        let documents: Vec<Vec<String>> = corpus.iter().map(|(text, _)| tokenize(text)).collect();

        let terms: BTreeSet<&str> = documents.iter().flatten().map(String::as_str).collect();
        let vocabulary: HashMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(index, term)| (term.to_string(), index))
            .collect();

        // Smoothed idf: ln((1 + n) / (1 + df)) + 1
        let n_documents = documents.len() as f64;
        let mut document_frequency = vec![0usize; vocabulary.len()];
        for document in &documents {
            let unique: BTreeSet<usize> = document.iter().map(|t| vocabulary[t]).collect();
            for feature in unique {
                document_frequency[feature] += 1;
            }
        }
        let idf = document_frequency
            .iter()
            .map(|&df| ((1.0 + n_documents) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let labels: Vec<String> = corpus
            .iter()
            .map(|(_, label)| label.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut model = Self {
            vocabulary,
            idf,
            labels,
            class_log_prior: Vec::new(),
            feature_log_prob: Vec::new(),
        };

        let mut class_count = vec![0usize; model.labels.len()];
        let mut feature_count = vec![vec![0.0; model.vocabulary.len()]; model.labels.len()];
        for (document, (_, label)) in documents.iter().zip(corpus) {
            let class = model.class_index(label);
            class_count[class] += 1;
            let features = model.weigh(document);
            for (total, value) in feature_count[class].iter_mut().zip(features) {
                *total += value;
            }
        }

        model.class_log_prior = class_count
            .iter()
            .map(|&count| (count as f64 / n_documents).ln())
            .collect();
        model.feature_log_prob = feature_count
            .iter()
            .map(|counts| {
                let smoothed_total: f64 = counts.iter().map(|c| c + ALPHA).sum();
                counts
                    .iter()
                    .map(|c| ((c + ALPHA) / smoothed_total).ln())
                    .collect()
            })
            .collect();

        debug!(
            "Trained statistical classifier: {} labels, {} features",
            model.labels.len(),
            model.vocabulary.len()
        );
        model
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Label with the highest joint log-likelihood for `text`
    pub fn predict(&self, text: &str) -> &str {
        let features = self.weigh(&tokenize(text));

        let mut best: Option<(usize, f64)> = None;
        for (class, prior) in self.class_log_prior.iter().enumerate() {
            let score = prior
                + features
                    .iter()
                    .zip(&self.feature_log_prob[class])
                    .map(|(x, log_prob)| x * log_prob)
                    .sum::<f64>();
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((class, score));
            }
        }

        best.map_or(UNCATEGORIZED, |(class, _)| self.labels[class].as_str())
    }

    fn class_index(&self, label: &str) -> usize {
        self.labels
            .binary_search_by(|candidate| candidate.as_str().cmp(label))
            .unwrap_or_default()
    }

    /// L2-normalized TF-IDF vector; out-of-vocabulary tokens are ignored
    fn weigh(&self, tokens: &[String]) -> Vec<f64> {
        let mut vector = vec![0.0; self.vocabulary.len()];
        for token in tokens {
            if let Some(&feature) = self.vocabulary.get(token) {
                vector[feature] += self.idf[feature];
            }
        }

        let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

impl PageClassifier for StatisticalClassifier {
    fn classify(&self, body: &str) -> String {
        self.predict(body).to_string()
    }
}

fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_sorted() {
        let model = StatisticalClassifier::trained();
        assert_eq!(model.labels(), ["blog", "ecommerce", "news"]);
    }

    #[test]
    fn test_training_examples_classify_as_themselves() {
        let model = StatisticalClassifier::trained();
        for (text, label) in TRAINING_CORPUS {
            assert_eq!(model.predict(text), label);
        }
    }

    #[test]
    fn test_nearest_label() {
        let model = StatisticalClassifier::trained();
        assert_eq!(model.predict("Amazing TOASTER deals"), "ecommerce");
        assert_eq!(model.predict("camping in the outdoors"), "blog");
        assert_eq!(model.predict("Snowden"), "news");
    }

    #[test]
    fn test_unknown_vocabulary_falls_back_to_first_label() {
        let model = StatisticalClassifier::trained();
        assert_eq!(model.predict(""), "blog");
        assert_eq!(model.predict("zebra quantum xylophone"), "blog");
    }

    #[test]
    fn test_single_letter_tokens_are_ignored() {
        assert_eq!(tokenize("a I buy x"), vec!["buy".to_string()]);
    }

    #[test]
    fn test_empty_model_returns_uncategorized() {
        let model = StatisticalClassifier::train(&[]);
        assert_eq!(model.predict("anything"), UNCATEGORIZED);
    }
}
