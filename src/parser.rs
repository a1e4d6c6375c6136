use crate::models::Priority;
use regex::Regex;

#[derive(Debug, PartialEq)]
pub struct ParsedTask {
    pub title: String,
    pub priority: Option<Priority>,
    pub due_date: Option<String>,
}

/// Pulls `!low|!medium|!high` (or `!1..!3`) and `due:<date>` out of a title.
/// The first token of each kind wins; every token is stripped.
pub fn parse_task_input(input: &str) -> ParsedTask {
    let priority_re = Regex::new(r"(?i)!(low|medium|high|[1-3])\b\s*").unwrap();
    let due_re = Regex::new(r"(?i)\bdue:(\S+)\s*").unwrap();

    let mut priority = None;
    let mut due_date = None;

    // Priority
    for caps in priority_re.captures_iter(input) {
        if let Some(priority_match) = caps.get(1) {
            let p = match priority_match.as_str().to_ascii_lowercase().as_str() {
                "low" | "1" => Priority::Low,
                "medium" | "2" => Priority::Medium,
                _ => Priority::High,
            };
            if priority.is_none() {
                priority = Some(p);
            }
        }
    }

    // Due date
    if let Some(caps) = due_re.captures(input) {
        due_date = caps.get(1).map(|m| m.as_str().to_string());
    }

    let title = priority_re.replace_all(input, "").to_string();
    let title = due_re.replace_all(&title, "").to_string();

    let title = Regex::new(r"\s+")
        .unwrap()
        .replace_all(&title, " ")
        .trim()
        .to_string();

    ParsedTask {
        title,
        priority,
        due_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_title() {
        let input = "  Update   software documentation ";
        let expected = ParsedTask {
            title: "Update software documentation".to_string(),
            priority: None,
            due_date: None,
        };
        assert_eq!(parse_task_input(input), expected);
    }

    #[test]
    fn test_parse_with_priority_in_middle() {
        let input = "Fix bugs !high    in the code";
        let expected = ParsedTask {
            title: "Fix bugs in the code".to_string(),
            priority: Some(Priority::High),
            due_date: None,
        };
        assert_eq!(parse_task_input(input), expected);
    }

    #[test]
    fn test_parse_numeric_priority_and_due_date() {
        let input = "Deploy to production !2 due:2026-10-31";
        let expected = ParsedTask {
            title: "Deploy to production".to_string(),
            priority: Some(Priority::Medium),
            due_date: Some("2026-10-31".to_string()),
        };
        assert_eq!(parse_task_input(input), expected);
    }

    #[test]
    fn test_parse_with_multiple_priorities_keeps_first() {
        let input = "  !LOW  !high Organize    team building !medium event ";
        let expected = ParsedTask {
            title: "Organize team building event".to_string(),
            priority: Some(Priority::Low),
            due_date: None,
        };
        assert_eq!(parse_task_input(input), expected);
    }

    #[test]
    fn test_parse_ignores_unknown_priority() {
        let input = "Check logs !8 immediately !urgent";
        let expected = ParsedTask {
            title: "Check logs !8 immediately !urgent".to_string(),
            priority: None,
            due_date: None,
        };
        assert_eq!(parse_task_input(input), expected);
    }

    #[test]
    fn test_parse_keeps_raw_due_text() {
        let parsed = parse_task_input("due:tomorrow Call mom");
        assert_eq!(parsed.title, "Call mom");
        assert_eq!(parsed.due_date.as_deref(), Some("tomorrow"));
    }
}
