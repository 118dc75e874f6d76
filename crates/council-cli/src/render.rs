use console::style;
use council::council::{FanOutResult, MemberOutcome};
use council::models::outcome::CallOutcome;

/// Format every member's outcome in request order, followed by a tally
pub fn responses(result: &FanOutResult) -> String {
    let mut output = String::new();
    for entry in result {
        output.push_str(&member(entry));
    }

    let answered = result.successes().count();
    output.push_str(&format!(
        "{}\n\n",
        style(format!("{}/{} members answered", answered, result.len())).dim()
    ));
    output
}

fn member(entry: &MemberOutcome) -> String {
    match &entry.outcome {
        CallOutcome::Success { content, .. } => format!(
            "{} {}\n{}\n\n",
            style("●").green(),
            style(&entry.model).bold(),
            content.as_text().trim()
        ),
        CallOutcome::Failure { reason } => format!(
            "{} {} {}\n{}\n\n",
            style("✗").red(),
            style(&entry.model).bold(),
            style(format!("[{}]", reason.kind())).dim(),
            style(reason).red()
        ),
    }
}

pub fn synthesis(chairman: &str, outcome: &CallOutcome) -> String {
    match outcome {
        CallOutcome::Success { content, .. } => format!(
            "{} {}\n{}\n",
            style("Chairman").cyan().bold(),
            style(format!("({})", chairman)).dim(),
            content.as_text().trim()
        ),
        CallOutcome::Failure { reason } => format!(
            "{} {}\n{}\n",
            style("Chairman").cyan().bold(),
            style(format!("({}) could not synthesize", chairman)).dim(),
            style(reason).red()
        ),
    }
}
