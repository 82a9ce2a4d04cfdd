//! Location text normalization
//!
//! Scraped location strings mix the city with work-mode keywords, locale filler
//! words, postal codes and sometimes the country name, e.g.
//! `"Teletrabajo en 28001 Madrid, Comunidad de Madrid"`. Both pipeline stages
//! reduce such text to a city name with a [`LocationNormalizer`]; each stage
//! supplies its own noise-word list and comma policy.

use itertools::Itertools;
use regex::Regex;

use crate::error::Result;
use crate::models::UNKNOWN_CITY;

/// Keywords marking a posting as remote or hybrid when found in its location
pub const REMOTE_KEYWORDS: [&str; 5] = ["teletrabajo", "remote", "homeoffice", "híbrido", "hybrid"];

/// Noise words stripped by the integration stage
pub const INTEGRATION_NOISE_WORDS: [&str; 9] = [
    "trabajo híbrido",
    "teletrabajo",
    "homeoffice",
    "híbrido",
    "remote",
    "hybrid",
    "in",
    "au",
    "en",
];

/// Noise words stripped by the cleaning stage, including literal country names
pub const CLEANING_NOISE_WORDS: [&str; 19] = [
    "teletrabajo",
    "trabajo",
    "híbrido",
    "hybrid",
    "remote",
    "homeoffice",
    "work",
    "in",
    "en",
    "at",
    "España",
    "Spain",
    "Deutschland",
    "Germany",
    "United States",
    "USA",
    "UK",
    "France",
    "Francia",
];

/// Standalone four- or five-digit tokens
pub const POSTAL_CODE_PATTERN: &str = r"\b\d{4,5}\b";

/// Punctuation left dangling once keywords are removed, e.g. `"Hybrid - Berlin"`
const EDGE_SEPARATORS: [char; 7] = ['-', '–', '—', '·', '|', '/', ','];

/// Where the comma split happens relative to noise stripping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentPolicy {
    /// Keep the text before the first comma, then strip noise from it
    FirstSegmentBeforeStrip,
    /// Strip noise from the whole text, then keep the first non-blank comma segment
    FirstNonEmptyAfterStrip,
}

/// Reduces raw location text to a title-cased city name
#[derive(Debug, Clone)]
pub struct LocationNormalizer {
    noise: Option<Regex>,
    postal_code: Regex,
    policy: SegmentPolicy,
    min_len: usize,
}

impl LocationNormalizer {
    /// Build a normalizer stripping `noise_words` case-insensitively on word boundaries
    pub fn new(noise_words: &[&str], policy: SegmentPolicy) -> Result<Self> {
        let noise = if noise_words.is_empty() {
            None
        } else {
            // Longest first so phrases win over the single words they contain
            let alternatives = noise_words
                .iter()
                .sorted_by_key(|word| std::cmp::Reverse(word.chars().count()))
                .map(|word| regex::escape(word))
                .join("|");
            Some(Regex::new(&format!(r"(?i)\b(?:{alternatives})\b"))?)
        };

        Ok(Self {
            noise,
            postal_code: Regex::new(POSTAL_CODE_PATTERN)?,
            policy,
            min_len: 1,
        })
    }

    /// Normalizer used when building the merged table
    pub fn for_integration() -> Result<Self> {
        Self::new(&INTEGRATION_NOISE_WORDS, SegmentPolicy::FirstNonEmptyAfterStrip)
    }

    /// Normalizer used when re-deriving cities in the cleaned table
    pub fn for_cleaning() -> Result<Self> {
        Ok(Self::new(&CLEANING_NOISE_WORDS, SegmentPolicy::FirstSegmentBeforeStrip)?.with_min_len(2))
    }

    /// Replace the postal-code pattern
    pub fn with_postal_code_pattern(mut self, pattern: &str) -> Result<Self> {
        self.postal_code = Regex::new(pattern)?;
        Ok(self)
    }

    /// Results shorter than `min_len` characters become the unknown-city sentinel
    #[must_use]
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    /// City name for a raw location, or the sentinel when nothing usable remains
    #[must_use]
    pub fn normalize(&self, raw: Option<&str>) -> String {
        let Some(raw) = raw else {
            return UNKNOWN_CITY.to_string();
        };

        let city = match self.policy {
            SegmentPolicy::FirstSegmentBeforeStrip => {
                let segment = raw.split(',').next().unwrap_or_default();
                tidy(&self.strip(segment))
            }
            SegmentPolicy::FirstNonEmptyAfterStrip => self
                .strip(raw)
                .split(',')
                .map(tidy)
                .find(|segment| !segment.is_empty())
                .unwrap_or_default(),
        };

        if city.chars().count() < self.min_len.max(1) {
            UNKNOWN_CITY.to_string()
        } else {
            city
        }
    }

    fn strip(&self, text: &str) -> String {
        let without_noise = match &self.noise {
            Some(noise) => noise.replace_all(text, " ").into_owned(),
            None => text.to_string(),
        };
        self.postal_code
            .replace_all(&without_noise, " ")
            .into_owned()
    }
}

/// Collapse whitespace, drop dangling separators and title-case
fn tidy(segment: &str) -> String {
    let collapsed = segment.split_whitespace().join(" ");
    let trimmed = collapsed.trim_matches(|c: char| c.is_whitespace() || EDGE_SEPARATORS.contains(&c));
    title_case(trimmed)
}

/// Whether location text mentions remote or hybrid work
#[must_use]
pub fn is_remote(raw: Option<&str>) -> bool {
    raw.is_some_and(|text| {
        let lower = text.to_lowercase();
        REMOTE_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
    })
}

/// Title-case text: a letter following a non-letter is uppercased, any other letter lowercased
#[must_use]
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }
    out
}
