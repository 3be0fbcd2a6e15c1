//! Rule-based recognizer: regex patterns for numeric and temporal entities,
//! shape rules for organizations and people, and a gazetteer for places,
//! groups and languages.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::{EntityLabel, EntityRecognizer, RecognizeError, TextSpan};

const MONTHS: &str =
    "January|February|March|April|May|June|July|August|September|October|November|December";
const ORG_SUFFIXES: &str = "Corp|Corporation|Inc|Incorporated|LLC|Ltd|Limited|Company|Co|Group|Holdings|Technologies|Labs|Bank|University|Institute|Foundation|Association|Agency|Partners|Ventures|Capital|Systems|Industries";

/// A pattern rule. Lower priority wins when two candidates cover the same range.
struct Rule {
    regex: Regex,
    label: EntityLabel,
    priority: u8,
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    let rule = |pattern: &str, label, priority| Rule {
        regex: Regex::new(pattern).unwrap(),
        label,
        priority,
    };
    vec![
        rule(
            r"[$€£¥]\s?\d[\d,]*(?:\.\d+)?(?:\s?(?:million|billion|trillion|thousand|[mMbB]n))?",
            EntityLabel::Money,
            0,
        ),
        rule(
            r"\b\d[\d,]*(?:\.\d+)?\s(?:million\s|billion\s)?(?:dollars|euros|pounds sterling|yen)\b",
            EntityLabel::Money,
            0,
        ),
        rule(r"\b\d+(?:\.\d+)?\s?(?:%|percent\b)", EntityLabel::Percent, 1),
        rule(
            r"\b\d[\d,]*(?:\.\d+)?\s?(?:km|kilometers|kilometres|miles|kg|kilograms|pounds|tons|tonnes|meters|metres|feet|acres|square feet|mph)\b",
            EntityLabel::Quantity,
            2,
        ),
        rule(
            r"(?i)\b\d{1,2}(?::\d{2})?\s?[ap]\.?m\b|\b\d{1,2}:\d{2}\b",
            EntityLabel::Time,
            3,
        ),
        rule(
            &format!(r"\b(?:{MONTHS})\s+\d{{1,2}}(?:,\s*\d{{4}})?\b|\b\d{{1,2}}\s+(?:{MONTHS})(?:\s+\d{{4}})?\b|\b(?:{MONTHS})\s+\d{{4}}\b"),
            EntityLabel::Date,
            4,
        ),
        rule(
            r"\b\d{4}-\d{2}-\d{2}\b|\b\d{1,2}/\d{1,2}/\d{2,4}\b|\b\d{1,2}-\d{1,2}-\d{4}\b",
            EntityLabel::Date,
            4,
        ),
        rule(
            r"\b(?:Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday|yesterday|today|tomorrow)\b",
            EntityLabel::Date,
            4,
        ),
        rule(r"\b(?:1[5-9]\d{2}|20\d{2})s?\b", EntityLabel::Date, 4),
        rule(
            r"(?i)\b(?:first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth|\d+(?:st|nd|rd|th))\b",
            EntityLabel::Ordinal,
            5,
        ),
        rule(
            &format!(r"\b(?:\p{{Lu}}[\w&'-]*\s+){{1,4}}(?:{ORG_SUFFIXES})\b"),
            EntityLabel::Org,
            6,
        ),
        rule(
            r"\b(?:Mr|Mrs|Ms|Mx|Dr|Prof|Sir|Dame)\.?\s+([A-Z][a-z]+(?:\s+[A-Z][a-z'-]+){0,2})",
            EntityLabel::Person,
            7,
        ),
        rule(
            r"(?i:\b(?:by|ceo|chief executive|founder|co-founder|president|chairman|chairwoman|director|spokesperson|spokesman|spokeswoman)\s+)([A-Z][a-z]+(?:\s+[A-Z]\.)?\s+[A-Z][a-z'-]+)",
            EntityLabel::Person,
            7,
        ),
        rule(
            r"(?i)\b(?:one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|twenty|thirty|forty|fifty|hundred|dozens?)(?:\s+(?:hundred|thousand|million|billion))*\b",
            EntityLabel::Cardinal,
            9,
        ),
        rule(
            r"\b(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?(?:\s(?:million|billion))?\b",
            EntityLabel::Cardinal,
            9,
        ),
    ]
});

const DEFAULT_GAZETTEER: &[(&str, EntityLabel)] = &[
    ("United States", EntityLabel::Gpe),
    ("United Kingdom", EntityLabel::Gpe),
    ("European Union", EntityLabel::Org),
    ("U.S.", EntityLabel::Gpe),
    ("US", EntityLabel::Gpe),
    ("UK", EntityLabel::Gpe),
    ("America", EntityLabel::Gpe),
    ("Canada", EntityLabel::Gpe),
    ("Mexico", EntityLabel::Gpe),
    ("Brazil", EntityLabel::Gpe),
    ("Germany", EntityLabel::Gpe),
    ("France", EntityLabel::Gpe),
    ("Spain", EntityLabel::Gpe),
    ("Italy", EntityLabel::Gpe),
    ("China", EntityLabel::Gpe),
    ("Japan", EntityLabel::Gpe),
    ("India", EntityLabel::Gpe),
    ("Australia", EntityLabel::Gpe),
    ("Russia", EntityLabel::Gpe),
    ("Texas", EntityLabel::Gpe),
    ("California", EntityLabel::Gpe),
    ("New York", EntityLabel::Gpe),
    ("San Francisco", EntityLabel::Gpe),
    ("Los Angeles", EntityLabel::Gpe),
    ("Austin", EntityLabel::Gpe),
    ("Boston", EntityLabel::Gpe),
    ("Chicago", EntityLabel::Gpe),
    ("Seattle", EntityLabel::Gpe),
    ("London", EntityLabel::Gpe),
    ("Paris", EntityLabel::Gpe),
    ("Berlin", EntityLabel::Gpe),
    ("Tokyo", EntityLabel::Gpe),
    ("Beijing", EntityLabel::Gpe),
    ("Silicon Valley", EntityLabel::Location),
    ("Europe", EntityLabel::Location),
    ("Asia", EntityLabel::Location),
    ("Africa", EntityLabel::Location),
    ("Pacific Ocean", EntityLabel::Location),
    ("Atlantic Ocean", EntityLabel::Location),
    ("American", EntityLabel::Norp),
    ("British", EntityLabel::Norp),
    ("Chinese", EntityLabel::Norp),
    ("German", EntityLabel::Norp),
    ("French", EntityLabel::Norp),
    ("Japanese", EntityLabel::Norp),
    ("Democrats", EntityLabel::Norp),
    ("Republicans", EntityLabel::Norp),
    ("English", EntityLabel::Language),
    ("Spanish", EntityLabel::Language),
    ("Mandarin", EntityLabel::Language),
    ("Ethereum", EntityLabel::Product),
    ("Bitcoin", EntityLabel::Product),
];

const GAZETTEER_PRIORITY: u8 = 8;

/// Deterministic recognizer built from fixed rules plus an extensible
/// gazetteer of exact, case-sensitive phrases.
pub struct RuleRecognizer {
    gazetteer: BTreeMap<String, EntityLabel>,
    gazetteer_regex: Option<Regex>,
}

impl RuleRecognizer {
    pub fn new() -> Self {
        let gazetteer = DEFAULT_GAZETTEER
            .iter()
            .map(|(term, label)| (term.to_string(), *label))
            .collect();
        let gazetteer_regex = compile_gazetteer(&gazetteer).ok().flatten();
        Self {
            gazetteer,
            gazetteer_regex,
        }
    }

    /// Add or relabel gazetteer phrases.
    pub fn with_terms<I, S>(mut self, terms: I) -> Result<Self, RecognizeError>
    where
        I: IntoIterator<Item = (S, EntityLabel)>,
        S: Into<String>,
    {
        for (term, label) in terms {
            let term = term.into();
            if !term.trim().is_empty() && label.is_known() {
                self.gazetteer.insert(term.trim().to_string(), label);
            }
        }
        self.gazetteer_regex = compile_gazetteer(&self.gazetteer)?;
        Ok(self)
    }

    pub fn gazetteer_len(&self) -> usize {
        self.gazetteer.len()
    }

    fn candidates(&self, text: &str) -> Vec<Candidate> {
        let mut found = Vec::new();

        for rule in RULES.iter() {
            for caps in rule.regex.captures_iter(text) {
                let Some(m) = caps.get(1).or_else(|| caps.get(0)) else {
                    continue;
                };
                let (start, end) = trim_determiner(text, m.start(), m.end(), rule.label);
                if start < end {
                    found.push(Candidate {
                        start,
                        end,
                        label: rule.label,
                        priority: rule.priority,
                    });
                }
            }
        }

        if let Some(regex) = &self.gazetteer_regex {
            for m in regex.find_iter(text) {
                let ends_word = text[m.end()..]
                    .chars()
                    .next()
                    .is_none_or(|c| !c.is_alphanumeric());
                if !ends_word {
                    continue;
                }
                if let Some(label) = self.gazetteer.get(m.as_str()) {
                    found.push(Candidate {
                        start: m.start(),
                        end: m.end(),
                        label: *label,
                        priority: GAZETTEER_PRIORITY,
                    });
                }
            }
        }

        found
    }
}

impl Default for RuleRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRecognizer for RuleRecognizer {
    fn recognize(&self, text: &str) -> Result<Vec<TextSpan>, RecognizeError> {
        let selected = resolve_overlaps(self.candidates(text));
        Ok(to_char_spans(text, selected))
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    start: usize,
    end: usize,
    label: EntityLabel,
    priority: u8,
}

fn compile_gazetteer(
    gazetteer: &BTreeMap<String, EntityLabel>,
) -> Result<Option<Regex>, RecognizeError> {
    if gazetteer.is_empty() {
        return Ok(None);
    }
    // Longest phrases first so "New York" is preferred over a shorter entry.
    let mut terms: Vec<&str> = gazetteer.keys().map(String::as_str).collect();
    terms.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    let alternation = terms
        .iter()
        .map(|term| regex::escape(term))
        .collect::<Vec<_>>()
        .join("|");
    // No trailing `\b`: phrases may end in punctuation ("U.S."), so the word
    // boundary after a match is checked by the caller.
    let pattern = format!(r"\b(?:{alternation})");
    Regex::new(&pattern)
        .map(Some)
        .map_err(|e| RecognizeError::Model(e.to_string()))
}

/// Capitalized function words that open a sentence or clause. They match the
/// ORG shape rule but are never part of the name that follows.
const LEADING_FUNCTION_WORDS: &[&str] = &[
    "The", "A", "An", "When", "After", "Before", "While", "Since", "Until", "If", "But",
    "And", "Or", "As", "At", "In", "On", "For", "From", "With", "By", "Of", "To", "This",
    "That", "Then", "Meanwhile", "Although", "Though", "Because", "Under", "Today",
    "Yesterday", "Last", "Earlier", "Later", "Now", "Also", "Yet", "So",
];

/// Leading articles and clause openers are not part of an organization's
/// name. At least two words always remain.
fn trim_determiner(text: &str, start: usize, end: usize, label: EntityLabel) -> (usize, usize) {
    if label != EntityLabel::Org {
        return (start, end);
    }
    let mut start = start;
    loop {
        let span = &text[start..end];
        let Some((first, rest)) = span.split_once(char::is_whitespace) else {
            break;
        };
        let rest = rest.trim_start();
        if !LEADING_FUNCTION_WORDS.contains(&first) || !rest.contains(char::is_whitespace) {
            break;
        }
        start = end - rest.len();
    }
    (start, end)
}

/// Earliest start wins, then the longest span, then the lower priority.
fn resolve_overlaps(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then((b.end - b.start).cmp(&(a.end - a.start)))
            .then(a.priority.cmp(&b.priority))
    });

    let mut selected: Vec<Candidate> = Vec::new();
    let mut covered_until = 0;
    for candidate in candidates {
        if candidate.start >= covered_until {
            covered_until = candidate.end;
            selected.push(candidate);
        }
    }
    selected
}

/// Convert byte ranges (ascending, disjoint) into character offsets.
fn to_char_spans(text: &str, selected: Vec<Candidate>) -> Vec<TextSpan> {
    let mut spans = Vec::with_capacity(selected.len());
    let mut byte_cursor = 0;
    let mut char_cursor = 0;

    for candidate in selected {
        char_cursor += text[byte_cursor..candidate.start].chars().count();
        let start = char_cursor;
        let surface = &text[candidate.start..candidate.end];
        char_cursor += surface.chars().count();
        byte_cursor = candidate.end;

        spans.push(TextSpan {
            label: candidate.label,
            text: surface.to_string(),
            start,
            end: char_cursor,
        });
    }
    spans
}
