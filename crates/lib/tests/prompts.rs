//! # Prompt Template Tests
//!
//! Checks task naming and placeholder rendering for the pipeline prompts.

use hrchat::prompts::{render, tasks, Task, TaskPrompt};

#[test]
fn test_task_names_round_trip() {
    for task in Task::ALL {
        assert_eq!(Task::from_name(task.name()), Some(task));
    }
    assert_eq!(Task::from_name("summarize"), None);
    assert_eq!(Task::HrClassification.to_string(), "hr_classification");
}

#[test]
fn test_default_roles() {
    assert_eq!(Task::HrClassification.default_role(), "router1");
    assert_eq!(Task::RouteClassification.default_role(), "router2");
    assert_eq!(Task::RefineQuestion.default_role(), "gen");
    assert_eq!(Task::RagAnswer.default_role(), "gen");
}

#[test]
fn test_render_replaces_only_known_placeholders() {
    let rendered = render(
        "질문: {question}\n{\"route\": \"rag\"} {unknown}",
        &[("question", "연차 규정")],
    );
    assert_eq!(rendered, "질문: 연차 규정\n{\"route\": \"rag\"} {unknown}");
}

#[test]
fn test_render_keeps_braces_inside_values() {
    let rendered = render(
        "# 질문\n{question}\n\n# 출처 문서\n{context}",
        &[("question", "{context} 뭐야?"), ("context", "[1] (a.md)\n기밀")],
    );
    assert_eq!(rendered, "# 질문\n{context} 뭐야?\n\n# 출처 문서\n[1] (a.md)\n기밀");

    let verify = Task::AnswerVerification.default_prompt();
    let (_, user) = verify.render(&[
        ("question", "연차 일수"),
        ("context", "- 문서에 {answer} 라는 문구가 있음\n"),
        ("answer", "15일입니다."),
    ]);
    assert!(user.contains("- 문서에 {answer} 라는 문구가 있음"));
    assert_eq!(user.matches("15일입니다.").count(), 1);
}

#[test]
fn test_route_prompt_lists_departments() {
    let prompt = Task::RouteClassification.default_prompt();
    let (system, user) = prompt.render(&[
        ("departments", "재무, 인사"),
        ("fallback_department", "인사"),
        ("question", "법인카드 한도"),
    ]);
    assert!(system.contains("다음 중 하나여야 합니다: 재무, 인사"));
    assert!(system.contains("인사(으)로 지정"));
    // The JSON examples in the prompt must survive rendering.
    assert!(system.contains(r#"{"route": "rag"}"#));
    assert_eq!(user, "정제된 질문: \"법인카드 한도\"");
}

#[test]
fn test_contact_template() {
    let answer = render(
        tasks::CONTACT_ANSWER_TEMPLATE,
        &[("name", "보안"), ("email", "se@gaida.play.com"), ("slack", "#ask-se")],
    );
    assert!(answer.contains("**보안팀**"));
    assert!(answer.contains("se@gaida.play.com"));
    assert!(answer.contains("#ask-se"));
}

#[test]
fn test_custom_task_prompt() {
    let prompt = TaskPrompt::new("system {question}", "user {question}");
    let (system, user) = prompt.render(&[("question", "q")]);
    assert_eq!(system, "system q");
    assert_eq!(user, "user q");
}
