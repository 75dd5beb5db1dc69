//! Keyword-triggered section segmenter.
//!
//! Partitions flat deck text into [`PitchSections`] in a single pass over
//! its lines. A line whose lowercased form contains a trigger word switches
//! the current section and is itself discarded; every other line is
//! appended to the current section, or dropped when no section has been
//! opened yet.
//!
//! Triggers are checked in a fixed priority order, so a line mentioning
//! both "team" and "market" opens the team section:
//!
//! | Priority | Trigger substring(s) | Section |
//! |----------|----------------------|---------|
//! | 1 | `team` | [`Section::Team`] |
//! | 2 | `market` | [`Section::Market`] |
//! | 3 | `product`, `traction` | [`Section::ProductTraction`] |

use crate::models::{PitchSections, NO_DATA_EXTRACTED};

/// One of the three named pitch sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Team,
    Market,
    ProductTraction,
}

impl Section {
    fn index(self) -> usize {
        match self {
            Section::Team => 0,
            Section::Market => 1,
            Section::ProductTraction => 2,
        }
    }
}

/// Classification of a single input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Switches the current section; the line is not content.
    Trigger(Section),
    /// Appended to the current section, if any.
    Content,
}

/// Trigger table, in priority order.
const TRIGGERS: &[(&[&str], Section)] = &[
    (&["team"], Section::Team),
    (&["market"], Section::Market),
    (&["product", "traction"], Section::ProductTraction),
];

/// Classify a line against the trigger table. First match wins.
pub fn classify(line: &str) -> LineKind {
    let lowered = line.to_lowercase();
    TRIGGERS
        .iter()
        .find(|(words, _)| words.iter().any(|w| lowered.contains(w)))
        .map(|(_, section)| LineKind::Trigger(*section))
        .unwrap_or(LineKind::Content)
}

/// Split deck text into the three pitch sections.
///
/// Total over any input: empty text yields the sentinel in all three
/// fields.
pub fn segment(text: &str) -> PitchSections {
    let mut buffers: [Vec<&str>; 3] = [Vec::new(), Vec::new(), Vec::new()];
    let mut current: Option<Section> = None;

    for line in text.split('\n') {
        match classify(line) {
            LineKind::Trigger(section) => current = Some(section),
            LineKind::Content => {
                if let Some(section) = current {
                    buffers[section.index()].push(line);
                }
            }
        }
    }

    let [team, market, product_traction] = buffers.map(|lines| finish(&lines));
    PitchSections {
        team,
        market,
        product_traction,
    }
}

fn finish(lines: &[&str]) -> String {
    let joined = lines.join(" ");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        NO_DATA_EXTRACTED.to_string()
    } else {
        trimmed.to_string()
    }
}
