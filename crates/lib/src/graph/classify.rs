//! Parsing of the JSON labels returned by the two router prompts.

use serde::Deserialize;

#[derive(Deserialize, Debug)]
struct HrAnalysis {
    is_hr_question: bool,
}

#[derive(Deserialize, Debug)]
struct RouteAnalysis {
    route: String,
    #[serde(default)]
    department: Option<String>,
}

/// Where the second router sends an HR question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Rag,
    Department(Option<String>),
}

/// Finds the JSON object in a reply that may be wrapped in a markdown fence or prose.
pub(crate) fn extract_json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (start < end).then(|| &reply[start..=end])
}

pub(crate) fn parse_hr_analysis(reply: &str) -> Option<bool> {
    let json = extract_json_object(reply)?;
    serde_json::from_str::<HrAnalysis>(json)
        .ok()
        .map(|a| a.is_hr_question)
}

/// Any route other than `rag` is a department hand-off.
pub(crate) fn parse_route(reply: &str) -> Option<RouteDecision> {
    let json = extract_json_object(reply)?;
    let analysis: RouteAnalysis = serde_json::from_str(json).ok()?;
    if analysis.route.trim().eq_ignore_ascii_case("rag") {
        Some(RouteDecision::Rag)
    } else {
        Some(RouteDecision::Department(
            analysis.department.filter(|d| !d.trim().is_empty()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_hr_analysis() {
        let reply = "```json\n{\"is_hr_question\": true}\n```";
        assert_eq!(parse_hr_analysis(reply), Some(true));
        assert_eq!(parse_hr_analysis("{\"is_hr_question\": false}"), Some(false));
        assert_eq!(parse_hr_analysis("HR 질문입니다"), None);
    }

    #[test]
    fn parses_routes() {
        assert_eq!(parse_route("{\"route\": \"rag\"}"), Some(RouteDecision::Rag));
        assert_eq!(
            parse_route("결과: {\"route\": \"department\", \"department\": \"재무\"}"),
            Some(RouteDecision::Department(Some("재무".to_string())))
        );
        assert_eq!(
            parse_route("{\"route\": \"department\", \"department\": \"\"}"),
            Some(RouteDecision::Department(None))
        );
        assert_eq!(parse_route("{\"department\": \"재무\"}"), None);
    }
}
