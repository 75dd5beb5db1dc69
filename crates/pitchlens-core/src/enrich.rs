//! Mock company enrichment.
//!
//! Stands in for a public-data lookup. Values are derived from a SHA-256
//! digest of the label, so the same filename always enriches the same way.

use sha2::{Digest, Sha256};

use crate::models::EnrichedData;

const LOCATIONS: [&str; 4] = [
    "San Francisco, CA",
    "New York, NY",
    "London, UK",
    "Berlin, Germany",
];

const INDUSTRIES: [&str; 5] = ["FinTech", "HealthTech", "EdTech", "AI", "SaaS"];

const MIN_FUNDING: u64 = 100_000;
const MAX_FUNDING: u64 = 10_000_000;
const MIN_TEAM: u32 = 5;
const MAX_TEAM: u32 = 50;

/// Produce mock enrichment attributes for an uploaded file label.
pub fn enrich(label: &str) -> EnrichedData {
    let digest = Sha256::digest(label.as_bytes());
    let word = |i: usize| {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&digest[i * 8..i * 8 + 8]);
        u64::from_le_bytes(buf)
    };

    let funding = MIN_FUNDING + word(0) % (MAX_FUNDING - MIN_FUNDING + 1);
    let team_size = MIN_TEAM + (word(1) % u64::from(MAX_TEAM - MIN_TEAM + 1)) as u32;
    let location = LOCATIONS[(word(2) % LOCATIONS.len() as u64) as usize];
    let industry = INDUSTRIES[(word(3) % INDUSTRIES.len() as u64) as usize];

    EnrichedData {
        company_name: company_name(label),
        funding_raised: format!("${}", group_thousands(funding)),
        team_size,
        location: location.to_string(),
        industry: industry.to_string(),
    }
}

/// `"acme_health.pdf"` → `"Acme Health"`.
pub fn company_name(label: &str) -> String {
    title_case(&label.replace(".pdf", "").replace('_', " "))
}

/// Upper-case the first letter of each alphabetic run, lower-case the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
