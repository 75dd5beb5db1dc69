//! Core data models shared by the pipeline, the stores, and the API layer.
//!
//! The serialized field names are the public wire shape returned by the
//! HTTP API and persisted by the stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Substituted for a section that is empty after trimming.
pub const NO_DATA_EXTRACTED: &str = "No data extracted";

/// The three named sections of a pitch deck.
///
/// Every field is either extracted text or [`NO_DATA_EXTRACTED`]; a field is
/// never absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchSections {
    pub team: String,
    pub market: String,
    pub product_traction: String,
}

/// Supplementary company attributes attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedData {
    pub company_name: String,
    pub funding_raised: String,
    pub team_size: u32,
    pub location: String,
    pub industry: String,
}

/// Strengths / weaknesses / opportunities / threats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swot {
    pub strengths: String,
    pub weaknesses: String,
    pub opportunities: String,
    pub threats: String,
}

/// Narrative analysis attached to a record.
///
/// `swot` is `None` only for degraded analyses and serializes as `{}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    #[serde(with = "swot_or_empty")]
    pub swot: Option<Swot>,
    pub risks: Vec<String>,
}

/// Summary used when the analysis failed.
pub const DEGRADED_SUMMARY: &str = "Error generating summary";

/// Tagged outcome of a single analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// Summary, SWOT, and exactly three risks.
    Complete(AnalysisResult),
    /// A model call failed; `reason` describes the failure.
    Degraded { reason: String },
}

impl AnalysisOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, AnalysisOutcome::Degraded { .. })
    }

    /// Flatten into the persisted shape.
    ///
    /// A degraded outcome becomes the fixed error summary, an empty SWOT,
    /// and a single risk entry embedding the failure reason.
    pub fn into_result(self) -> AnalysisResult {
        match self {
            AnalysisOutcome::Complete(result) => result,
            AnalysisOutcome::Degraded { reason } => AnalysisResult {
                summary: DEGRADED_SUMMARY.to_string(),
                swot: None,
                risks: vec![format!("Analysis error: {}", reason)],
            },
        }
    }
}

/// A persisted pitch: sections, enrichment, and analysis under one ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchRecord {
    pub pitch_id: String,
    pub filename: String,
    pub sections: PitchSections,
    pub enriched_data: EnrichedData,
    pub analysis: AnalysisResult,
    pub created_at: DateTime<Utc>,
}

impl PitchRecord {
    /// Create a record with a fresh UUID v4 and the current time.
    pub fn new(
        filename: impl Into<String>,
        sections: PitchSections,
        enriched_data: EnrichedData,
        analysis: AnalysisResult,
    ) -> Self {
        Self {
            pitch_id: uuid::Uuid::new_v4().to_string(),
            filename: filename.into(),
            sections,
            enriched_data,
            analysis,
            created_at: Utc::now(),
        }
    }
}

mod swot_or_empty {
    use super::Swot;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    struct PartialSwot {
        strengths: Option<String>,
        weaknesses: Option<String>,
        opportunities: Option<String>,
        threats: Option<String>,
    }

    pub fn serialize<S: Serializer>(swot: &Option<Swot>, serializer: S) -> Result<S::Ok, S::Error> {
        match swot {
            Some(swot) => swot.serialize(serializer),
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Swot>, D::Error> {
        let partial = PartialSwot::deserialize(deserializer)?;
        match (
            partial.strengths,
            partial.weaknesses,
            partial.opportunities,
            partial.threats,
        ) {
            (Some(strengths), Some(weaknesses), Some(opportunities), Some(threats)) => {
                Ok(Some(Swot {
                    strengths,
                    weaknesses,
                    opportunities,
                    threats,
                }))
            }
            _ => Ok(None),
        }
    }
}
