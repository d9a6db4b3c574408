/// Textual cleanup of generator output before execution. Strips one
/// surrounding fenced code block (tagged or bare) and splits the rest into
/// `;`-terminated statements, order preserved. No grammar validation
/// happens here; malformed SQL surfaces at execution time.
pub fn sanitize(raw: &str) -> Vec<String> {
    strip_fence(raw)
        .split(';')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| format!("{};", fragment))
        .collect()
}

/// Re-serializes a statement set the way reports present it.
pub fn join_statements(statements: &[String]) -> String {
    statements.join("\n")
}

fn strip_fence(raw: &str) -> &str {
    let text = raw.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Opening fence line may carry a language tag; the body starts after
    // the first newline. A fence with no newline keeps its content inline.
    let body = match rest.split_once('\n') {
        Some((_tag, body)) => body,
        None => rest,
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}
