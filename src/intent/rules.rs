//! Rule-based intent classifier.
//!
//! A compiled-regex implementation of the [`IntentExtractor`] boundary for
//! local use and tests. Classification order matters: questions are checked
//! before approvals so a positive adjective inside a question ("does this
//! look good?") is never read as approval, and modification keywords are
//! checked before approvals so "yes, but make it shorter" stays a
//! modification request.

use async_trait::async_trait;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::IntentError;

use super::{Intent, IntentExtractor, RequiredSlots, SlotKind};

/// Synonym table mapping free-text phrasings to canonical enum values.
static SYNONYMS: &[(&str, &[&str])] = &[
    ("fat_loss", &["lose weight", "lose fat", "weight loss", "cut"]),
    ("muscle_gain", &["build muscle", "gain muscle", "bulk", "get stronger"]),
    ("general_fitness", &["stay fit", "overall fitness", "general health"]),
    ("beginner", &["new to training", "never trained", "just starting"]),
    ("intermediate", &["a few years", "moderate experience"]),
    ("advanced", &["very experienced", "competitive"]),
    ("vegan", &["plant based", "plant-based"]),
    ("omnivore", &["eat everything", "no restrictions"]),
];

/// Regex-driven classifier satisfying the extractor boundary.
pub struct RuleBasedExtractor {
    question: Regex,
    modification: Regex,
    approval: Regex,
    number: Regex,
    an_hour: Regex,
}

impl RuleBasedExtractor {
    pub fn new() -> Self {
        Self {
            question: Regex::new(
                r"(?i)(\?|^(what|how|why|when|where|which|who|can you|could you|should i|do i|does|is it|are there)\b)",
            )
            .unwrap(),
            modification: Regex::new(
                r"(?i)\b(change|swap|replace|instead|switch|make it|increase|decrease|reduce|fewer|shorter|longer|rather|adjust)\b",
            )
            .unwrap(),
            approval: Regex::new(
                r"(?i)^(yes|yep|yeah|yup|sure|ok(ay)?|sounds good|looks good|looks great|perfect|approved?|confirm(ed)?|let'?s (do it|go)|i approve|works for me|go ahead|that works)\b",
            )
            .unwrap(),
            number: Regex::new(r"\d+").unwrap(),
            an_hour: Regex::new(r"(?i)\ban?\s+hour\b").unwrap(),
        }
    }

    fn classify_inner(&self, utterance: &str, schema: &RequiredSlots) -> Intent {
        let text = utterance.trim();
        if text.is_empty() {
            return Intent::ambiguous();
        }

        if self.question.is_match(text) {
            return Intent::question();
        }

        if self.modification.is_match(text) {
            let slots = self.extract_slots(text, schema);
            debug!(stage = schema.stage, slots = slots.len(), "modification request");
            return Intent::modification(slots);
        }

        if self.approval.is_match(text) {
            debug!(stage = schema.stage, "explicit approval");
            return Intent::approval();
        }

        let slots = self.extract_slots(text, schema);
        if slots.is_empty() {
            Intent::ambiguous()
        } else {
            debug!(stage = schema.stage, slots = slots.len(), "slot update");
            Intent::slot_update(slots)
        }
    }

    fn extract_slots(&self, text: &str, schema: &RequiredSlots) -> Map<String, Value> {
        // '/' separates split names ("Push/Pull/Legs"); normalize to spaces
        // so enum matching works on plain words.
        let lower = text.to_lowercase().replace('/', " ");
        let mut slots = Map::new();

        for spec in schema.slots {
            match spec.kind {
                SlotKind::Enumerated(values) => {
                    if let Some(value) = match_enumerated(&lower, values) {
                        slots.insert(spec.name.to_string(), Value::String(value.to_string()));
                    }
                }
                SlotKind::Integer { min, max } => {
                    if let Some(n) = self.match_integer(&lower, spec.keywords, min, max) {
                        slots.insert(spec.name.to_string(), Value::from(n));
                    }
                }
                SlotKind::Text => {
                    if spec.keywords.iter().any(|kw| lower.contains(kw)) {
                        slots.insert(spec.name.to_string(), Value::String(text.to_string()));
                    }
                }
                SlotKind::List(vocab) => {
                    if let Some(items) = match_list(&lower, spec.keywords, vocab) {
                        slots.insert(
                            spec.name.to_string(),
                            Value::Array(items.into_iter().map(Value::from).collect()),
                        );
                    }
                }
            }
        }

        slots
    }

    /// Find an integer near one of the slot's hint words.
    fn match_integer(
        &self,
        lower: &str,
        keywords: &'static [&'static str],
        min: i64,
        max: i64,
    ) -> Option<i64> {
        let duration_slot = keywords.iter().any(|kw| *kw == "minute");
        if duration_slot && self.an_hour.is_match(lower) {
            return Some(60);
        }

        for m in self.number.find_iter(lower) {
            let window_start = m.start().saturating_sub(20);
            let window_end = (m.end() + 20).min(lower.len());
            // Byte offsets from the regex are char boundaries for ASCII; fall
            // back to the whole text if the window cuts a multibyte char.
            let window = lower.get(window_start..window_end).unwrap_or(lower);
            if !keywords.iter().any(|kw| window.contains(kw)) {
                continue;
            }
            let mut value: i64 = match m.as_str().parse() {
                Ok(v) => v,
                Err(_) => continue,
            };
            if duration_slot && window.contains("hour") {
                value *= 60;
            }
            if (min..=max).contains(&value) {
                return Some(value);
            }
        }
        None
    }
}

impl Default for RuleBasedExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IntentExtractor for RuleBasedExtractor {
    async fn classify(
        &self,
        utterance: &str,
        schema: &RequiredSlots,
    ) -> Result<Intent, IntentError> {
        Ok(self.classify_inner(utterance, schema))
    }
}

/// Match one of the canonical values (or a registered synonym) in the text.
fn match_enumerated(lower: &str, values: &'static [&'static str]) -> Option<&'static str> {
    for value in values {
        let spoken = value.to_lowercase().replace(['_', '/'], " ");
        if lower.contains(&spoken) {
            return Some(value);
        }
        if let Some((_, synonyms)) = SYNONYMS.iter().find(|(canon, _)| canon == value) {
            if synonyms.iter().any(|syn| lower.contains(syn)) {
                return Some(value);
            }
        }
    }
    None
}

/// Collect vocabulary items present in the text. "no <keyword>" declares the
/// list explicitly empty.
fn match_list(
    lower: &str,
    keywords: &'static [&'static str],
    vocab: &'static [&'static str],
) -> Option<Vec<String>> {
    for kw in keywords {
        let negation = format!("no {kw}");
        if lower.contains(&negation) {
            return Some(Vec::new());
        }
    }

    let items: Vec<String> = vocab
        .iter()
        .filter(|item| lower.contains(*item))
        .map(|item| item.to_string())
        .collect();
    if items.is_empty() { None } else { Some(items) }
}
