// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use super::{PageClassifier, UNCATEGORIZED};

/// Keyword groups checked in order; the first group with a substring match wins
const RULES: [(&[&str], &str); 3] = [
    (&["toaster", "kitchen"], "E-commerce - Kitchen Appliance"),
    (&["camp", "outdoors"], "Camping / Outdoor Blog"),
    (&["politics", "snowden"], "News - Politics"),
];

/// Keyword heuristic over the lower-cased body text
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedClassifier;

impl PageClassifier for RuleBasedClassifier {
    fn classify(&self, body: &str) -> String {
        let text = body.to_lowercase();
        RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
            .map_or(UNCATEGORIZED, |(_, label)| *label)
            .to_string()
    }
}
