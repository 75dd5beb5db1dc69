#![allow(dead_code)]

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use pitchlens_core::generation::{
    GenerateParams, ModelError, SummarizeParams, Summarizer, TextGenerator,
};

pub const DECK_LINES: &[&str] = &[
    "Our Team",
    "Alice Chen ran payments at a large bank.",
    "Market Opportunity",
    "Small businesses spend billions on invoicing.",
    "Traction",
    "We grew revenue tenfold this year.",
];

/// Build a PDF with one page per slice, one text object per line.
pub fn build_pdf(pages: &[&[&str]]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            let y = 720 - 20 * i as i64;
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
            ));
            operations.push(Operation::new(
                "Td",
                vec![Object::Integer(72), Object::Integer(y)],
            ));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

pub fn sample_deck() -> Vec<u8> {
    build_pdf(&[DECK_LINES])
}

pub const STUB_SUMMARY: &str = "An invoicing startup for small businesses.";

pub struct StubSummarizer;

#[async_trait]
impl Summarizer for StubSummarizer {
    fn model_name(&self) -> &str {
        "stub-summarizer"
    }

    async fn summarize(
        &self,
        _text: &str,
        _params: &SummarizeParams,
    ) -> Result<Option<String>, ModelError> {
        Ok(Some(STUB_SUMMARY.to_string()))
    }
}

/// Echoes the prompt followed by two numbered risks, so the analyzer pads
/// with one fallback.
pub struct StubGenerator;

#[async_trait]
impl TextGenerator for StubGenerator {
    fn model_name(&self) -> &str {
        "stub-generator"
    }

    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerateParams,
    ) -> Result<String, ModelError> {
        Ok(format!(
            "{}\n1. Incumbent banks bundle invoicing.\n2. Churn among tiny customers.",
            prompt
        ))
    }
}
