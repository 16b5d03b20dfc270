//! Terminal rendering of pipeline results.

use hrchat::{ingest::IngestionResult, AnswerType, ChatState};

/// Formats the final answer with its verification verdict and sources.
pub fn format_answer(state: &ChatState) -> String {
    let mut out = state.final_answer.clone();
    if state.answer_type != Some(AnswerType::RagAnswer) {
        return out;
    }

    let mut sources: Vec<&str> = Vec::new();
    for doc in &state.retrieved_docs {
        let source = doc.source();
        if !source.is_empty() && !sources.contains(&source) {
            sources.push(source);
        }
    }
    if !sources.is_empty() {
        out.push_str("\n\n📄 출처: ");
        out.push_str(&sources.join(", "));
    }
    if let Some(verification) = state.verification {
        out.push_str(&format!("\n🔎 검증: {verification}"));
    }
    out
}

pub fn format_ingestion(result: &IngestionResult) -> String {
    if result.skipped {
        return "Index already populated; nothing ingested. Use --recreate to rebuild it."
            .to_string();
    }
    let mut out = format!(
        "Ingested {} chunks from {} documents.",
        result.documents_added,
        result.sources.len()
    );
    if result.deleted_existing {
        out.push_str(" Existing vectors were deleted first.");
    }
    if !result.missing.is_empty() {
        out.push_str(&format!("\nMissing: {}", result.missing.join(", ")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrchat::{Document, Verification};

    #[test]
    fn rag_answers_list_unique_sources_and_verdict() {
        let state = ChatState {
            final_answer: "연차는 15일입니다.".to_string(),
            answer_type: Some(AnswerType::RagAnswer),
            verification: Some(Verification::Consistent),
            retrieved_docs: vec![
                Document::new("a").with_source("03_휴가정책_v1.0.md"),
                Document::new("b").with_source("03_휴가정책_v1.0.md"),
                Document::new("c").with_source("04_복지정책_v1.0.md"),
            ],
            ..Default::default()
        };
        assert_eq!(
            format_answer(&state),
            "연차는 15일입니다.\n\n📄 출처: 03_휴가정책_v1.0.md, 04_복지정책_v1.0.md\n🔎 검증: 일치함"
        );
    }

    #[test]
    fn other_answers_are_printed_as_is() {
        let state = ChatState {
            final_answer: "재무팀으로 문의하세요.".to_string(),
            answer_type: Some(AnswerType::DepartmentContact),
            ..Default::default()
        };
        assert_eq!(format_answer(&state), "재무팀으로 문의하세요.");
    }

    #[test]
    fn ingestion_summary() {
        let result = IngestionResult {
            sources: vec!["a.md".to_string()],
            missing: vec!["b.md".to_string()],
            documents_added: 4,
            deleted_existing: true,
            ..Default::default()
        };
        assert_eq!(
            format_ingestion(&result),
            "Ingested 4 chunks from 1 documents. Existing vectors were deleted first.\nMissing: b.md"
        );

        let skipped = IngestionResult {
            skipped: true,
            ..Default::default()
        };
        assert!(format_ingestion(&skipped).contains("--recreate"));
    }
}
