//! Narrative analysis of segmented pitch sections.
//!
//! [`Analyzer::analyze`] runs four steps:
//!
//! 1. Summarize the labelled sections (truncated to
//!    [`MAX_SUMMARY_INPUT_CHARS`] characters).
//! 2. Prompt a text generator for risks, seeded with the summary.
//! 3. Parse numbered lines out of the generated text and normalize the list
//!    to exactly [`RISK_COUNT`] entries.
//! 4. Build a template SWOT from the team and market sections.
//!
//! A failure in steps 1–3 produces [`AnalysisOutcome::Degraded`]; partial
//! work is discarded. The analyzer never returns an error to its caller.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::generation::{GenerateParams, ModelError, SummarizeParams, Summarizer, TextGenerator};
use crate::models::{AnalysisOutcome, AnalysisResult, PitchSections, Swot};

/// Character budget for the summarizer input. This approximates the
/// summarization model's 1024-token window and may cut mid-word.
pub const MAX_SUMMARY_INPUT_CHARS: usize = 1024;

/// Number of risks in a complete analysis.
pub const RISK_COUNT: usize = 3;

/// Characters of a section quoted in the SWOT templates.
const SWOT_EXCERPT_CHARS: usize = 50;

const NO_SUMMARY: &str = "No summary generated";

/// Appended in order when fewer than [`RISK_COUNT`] risks are parsed.
pub const FALLBACK_RISKS: [&str; RISK_COUNT] = [
    "Unknown market dynamics could impact growth.",
    "Team execution risks in scaling operations.",
    "Intensifying competition from incumbents.",
];

pub const SUMMARIZE_PARAMS: SummarizeParams = SummarizeParams {
    max_length: 200,
    min_length: 30,
    do_sample: false,
};

pub const RISK_GENERATE_PARAMS: GenerateParams = GenerateParams {
    max_length: 150,
    num_return_sequences: 1,
    temperature: 0.8,
    do_sample: true,
    pad_with_eos: true,
};

/// Narrative analyzer over injected model clients.
///
/// Cheap to clone; the model clients are shared.
#[derive(Clone)]
pub struct Analyzer {
    summarizer: Arc<dyn Summarizer>,
    generator: Arc<dyn TextGenerator>,
}

impl Analyzer {
    pub fn new(summarizer: Arc<dyn Summarizer>, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            summarizer,
            generator,
        }
    }

    /// Analyze the sections. Model failures yield a degraded outcome.
    pub async fn analyze(&self, sections: &PitchSections) -> AnalysisOutcome {
        match self.try_analyze(sections).await {
            Ok(result) => {
                info!(risks = ?result.risks, "analysis complete");
                AnalysisOutcome::Complete(result)
            }
            Err(e) => {
                warn!(error = %e, "analysis degraded");
                AnalysisOutcome::Degraded {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn try_analyze(&self, sections: &PitchSections) -> Result<AnalysisResult, ModelError> {
        let input = summary_input(sections);
        debug!(
            model = self.summarizer.model_name(),
            chars = input.chars().count(),
            "summarizing"
        );
        let summary = self
            .summarizer
            .summarize(&input, &SUMMARIZE_PARAMS)
            .await?
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| NO_SUMMARY.to_string());

        let prompt = risk_prompt(&summary);
        debug!(model = self.generator.model_name(), %prompt, "generating risks");
        let generated = self
            .generator
            .generate(&prompt, &RISK_GENERATE_PARAMS)
            .await?;

        let risks = normalize_risks(parse_risks(&generated, &prompt));

        Ok(AnalysisResult {
            summary,
            swot: Some(build_swot(sections)),
            risks: risks.to_vec(),
        })
    }
}

/// Labelled section blob, truncated to [`MAX_SUMMARY_INPUT_CHARS`].
pub fn summary_input(sections: &PitchSections) -> String {
    let combined = format!(
        "Team: {}\nMarket: {}\nProduct/Traction: {}",
        sections.team, sections.market, sections.product_traction
    );
    truncate_chars(&combined, MAX_SUMMARY_INPUT_CHARS).to_string()
}

pub fn risk_prompt(summary: &str) -> String {
    format!(
        "Based on this startup pitch summary: {}. Potential risks: 1.",
        summary
    )
}

/// Extract numbered risks from generated text.
///
/// The prompt is removed first. A trimmed line is a candidate when it
/// starts with a numeric character (any script, e.g. `"１."` or `"٣."`)
/// and contains a period; the risk is whatever follows the first period.
pub fn parse_risks(generated: &str, prompt: &str) -> Vec<String> {
    let body = generated.replace(prompt, "");
    body.trim()
        .split('\n')
        .map(str::trim)
        .filter(|line| line.starts_with(char::is_numeric))
        .filter_map(|line| line.split_once('.'))
        .map(|(_, rest)| rest.trim().to_string())
        .collect()
}

/// Pad with [`FALLBACK_RISKS`] or truncate to exactly [`RISK_COUNT`].
pub fn normalize_risks(risks: Vec<String>) -> [String; RISK_COUNT] {
    let mut parsed = risks.into_iter();
    let mut fallbacks = FALLBACK_RISKS.iter().map(|r| r.to_string());
    std::array::from_fn(|_| {
        parsed
            .next()
            .or_else(|| fallbacks.next())
            .unwrap_or_default()
    })
}

pub fn build_swot(sections: &PitchSections) -> Swot {
    Swot {
        strengths: format!(
            "Strong team expertise based on: {}...",
            truncate_chars(&sections.team, SWOT_EXCERPT_CHARS)
        ),
        weaknesses: "Limited information on scalability provided.".to_string(),
        opportunities: format!(
            "Large market potential: {}...",
            truncate_chars(&sections.market, SWOT_EXCERPT_CHARS)
        ),
        threats: "Competitive landscape in the industry.".to_string(),
    }
}

/// Prefix of at most `max` characters, cut on a char boundary.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::DisabledModel;
    use crate::models::NO_DATA_EXTRACTED;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedSummarizer {
        output: Option<String>,
        seen: Mutex<Vec<String>>,
    }

    impl FixedSummarizer {
        fn new(output: Option<&str>) -> Self {
            Self {
                output: output.map(str::to_string),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Summarizer for FixedSummarizer {
        fn model_name(&self) -> &str {
            "fixed"
        }
        async fn summarize(
            &self,
            text: &str,
            _params: &SummarizeParams,
        ) -> Result<Option<String>, ModelError> {
            self.seen.lock().unwrap().push(text.to_string());
            Ok(self.output.clone())
        }
    }

    /// Echoes the prompt followed by a fixed continuation, like a
    /// `return_full_text` generation endpoint.
    struct EchoGenerator {
        continuation: String,
    }

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        fn model_name(&self) -> &str {
            "echo"
        }
        async fn generate(
            &self,
            prompt: &str,
            _params: &GenerateParams,
        ) -> Result<String, ModelError> {
            Ok(format!("{}{}", prompt, self.continuation))
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        fn model_name(&self) -> &str {
            "failing"
        }
        async fn generate(
            &self,
            _prompt: &str,
            _params: &GenerateParams,
        ) -> Result<String, ModelError> {
            Err(ModelError::Api {
                status: 503,
                message: "model is loading".to_string(),
            })
        }
    }

    fn sections() -> PitchSections {
        PitchSections {
            team: "Alice (ex-Google) and Bob (ex-Stripe) lead a team of twelve engineers".to_string(),
            market: "Global payments TAM of $2T growing 8% annually across emerging markets".to_string(),
            product_traction: "10k MAU, $40k MRR".to_string(),
        }
    }

    fn analyzer(summary: Option<&str>, continuation: &str) -> Analyzer {
        Analyzer::new(
            Arc::new(FixedSummarizer::new(summary)),
            Arc::new(EchoGenerator {
                continuation: continuation.to_string(),
            }),
        )
    }

    fn complete(outcome: AnalysisOutcome) -> AnalysisResult {
        match outcome {
            AnalysisOutcome::Complete(r) => r,
            AnalysisOutcome::Degraded { reason } => panic!("unexpected degraded: {}", reason),
        }
    }

    #[test]
    fn summary_input_is_labelled_in_order() {
        let input = summary_input(&sections());
        assert!(input.starts_with("Team: Alice"));
        let team = input.find("Team:").unwrap();
        let market = input.find("\nMarket:").unwrap();
        let product = input.find("\nProduct/Traction:").unwrap();
        assert!(team < market && market < product);
    }

    #[test]
    fn summary_input_truncates_to_1024_chars() {
        let long = PitchSections {
            team: "é".repeat(2000),
            market: NO_DATA_EXTRACTED.to_string(),
            product_traction: NO_DATA_EXTRACTED.to_string(),
        };
        let input = summary_input(&long);
        assert_eq!(input.chars().count(), MAX_SUMMARY_INPUT_CHARS);
        assert!(!input.contains("Market:"));
    }

    #[test]
    fn parse_strips_prompt_and_reads_numbered_lines() {
        let prompt = risk_prompt("A fintech startup.");
        let generated = format!(
            "{} Regulatory exposure.\n2. Customer churn in SMB segment.\nnot numbered\n3.  Burn rate  \n4 no period",
            prompt
        );
        let risks = parse_risks(&generated, &prompt);
        assert_eq!(
            risks,
            vec!["Customer churn in SMB segment.", "Burn rate"]
        );
    }

    #[test]
    fn parse_accepts_non_ascii_numerals() {
        let risks = parse_risks("１. Fullwidth risk.\n٣. Arabic-Indic risk.\nx. nope", "");
        assert_eq!(risks, vec!["Fullwidth risk.", "Arabic-Indic risk."]);
    }

    #[test]
    fn parse_takes_text_after_first_period_only() {
        let risks = parse_risks("1. Churn. Then more.\n2.", "");
        assert_eq!(risks, vec!["Churn. Then more.", ""]);
    }

    #[test]
    fn normalize_pads_from_fallbacks_in_order() {
        let zero = normalize_risks(vec![]);
        assert_eq!(zero, FALLBACK_RISKS.map(str::to_string));

        let one = normalize_risks(vec!["Churn".to_string()]);
        assert_eq!(
            one,
            [
                "Churn".to_string(),
                FALLBACK_RISKS[0].to_string(),
                FALLBACK_RISKS[1].to_string()
            ]
        );
    }

    #[test]
    fn normalize_keeps_first_three() {
        let five: Vec<String> = (1..=5).map(|i| format!("risk {}", i)).collect();
        let risks = normalize_risks(five);
        assert_eq!(risks, ["risk 1", "risk 2", "risk 3"].map(str::to_string));
    }

    #[test]
    fn swot_quotes_first_50_chars() {
        let swot = build_swot(&sections());
        let team_excerpt: String = sections().team.chars().take(50).collect();
        assert_eq!(
            swot.strengths,
            format!("Strong team expertise based on: {}...", team_excerpt)
        );
        assert!(swot.opportunities.starts_with("Large market potential: Global payments"));
        assert!(swot.opportunities.ends_with("..."));
        assert_eq!(swot.weaknesses, "Limited information on scalability provided.");
        assert_eq!(swot.threats, "Competitive landscape in the industry.");
    }

    #[tokio::test]
    async fn analyze_uses_generated_risks_then_fallbacks() {
        let outcome = analyzer(
            Some("Payments startup with strong traction."),
            "\n2. Regulatory changes in key markets.\n",
        )
        .analyze(&sections())
        .await;
        let result = complete(outcome);

        assert_eq!(result.summary, "Payments startup with strong traction.");
        assert_eq!(
            result.risks,
            vec![
                "Regulatory changes in key markets.".to_string(),
                FALLBACK_RISKS[0].to_string(),
                FALLBACK_RISKS[1].to_string(),
            ]
        );
        assert!(result.swot.is_some());
    }

    #[tokio::test]
    async fn analyze_always_yields_three_risks() {
        for continuation in [
            "",
            "\n2. One.",
            "\n2. One.\n3. Two.\n4. Three.",
            "\n2. a\n3. b\n4. c\n5. d\n6. e",
        ] {
            let result = complete(analyzer(Some("ok"), continuation).analyze(&sections()).await);
            assert_eq!(result.risks.len(), RISK_COUNT, "continuation {:?}", continuation);
        }
    }

    #[tokio::test]
    async fn empty_summary_falls_back() {
        let result = complete(analyzer(None, "").analyze(&sections()).await);
        assert_eq!(result.summary, "No summary generated");

        let result = complete(analyzer(Some("   "), "").analyze(&sections()).await);
        assert_eq!(result.summary, "No summary generated");
    }

    #[tokio::test]
    async fn summarizer_receives_truncated_input() {
        let summarizer = Arc::new(FixedSummarizer::new(Some("s")));
        let analyzer = Analyzer::new(
            summarizer.clone(),
            Arc::new(EchoGenerator {
                continuation: String::new(),
            }),
        );
        let long = PitchSections {
            team: "x".repeat(5000),
            market: "m".to_string(),
            product_traction: "p".to_string(),
        };
        analyzer.analyze(&long).await;
        let seen = summarizer.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].chars().count(), MAX_SUMMARY_INPUT_CHARS);
    }

    #[tokio::test]
    async fn generation_failure_degrades() {
        let analyzer = Analyzer::new(
            Arc::new(FixedSummarizer::new(Some("fine"))),
            Arc::new(FailingGenerator),
        );
        let outcome = analyzer.analyze(&sections()).await;
        assert!(outcome.is_degraded());

        let result = outcome.into_result();
        assert_eq!(result.summary, "Error generating summary");
        assert!(result.swot.is_none());
        assert_eq!(result.risks.len(), 1);
        assert!(result.risks[0].contains("Analysis error"));
        assert!(result.risks[0].contains("model is loading"));
    }

    #[tokio::test]
    async fn disabled_models_degrade() {
        let analyzer = Analyzer::new(Arc::new(DisabledModel), Arc::new(DisabledModel));
        let result = analyzer.analyze(&sections()).await.into_result();
        assert_eq!(
            result.risks,
            vec!["Analysis error: model provider is disabled".to_string()]
        );
    }
}
