use crate::config::{graph_flag, ResolvedQuery};

/// Hash, author, author date, committer, committer date, subject
const RECORD_PLACEHOLDERS: [&str; 6] = ["%H", "%aN", "%ai", "%cN", "%ci", "%s"];

/// `--pretty` format for one record per line, NUL separated.
///
/// In graph mode git prints the graph glyphs in front of the formatted
/// text, so a leading empty field is reserved for them.
pub fn log_format(graph: bool) -> String {
    let fields = RECORD_PLACEHOLDERS.join("%x00");
    if graph {
        format!("%x00{}", fields)
    } else {
        fields
    }
}

/// Builds the `git log` argument list for a query.
pub fn build_log_args(query: &ResolvedQuery) -> Vec<String> {
    let mut args = vec![
        "log".to_string(),
        format!("--pretty={}", log_format(query.graph)),
        query.order.flag().to_string(),
    ];

    if query.graph && graph_flag(&query.extra_args) != Some(true) {
        args.push("--graph".to_string());
    }

    if query.all {
        args.push("--all".to_string());
    }

    if query.reverse {
        args.push("--reverse".to_string());
    }

    args.extend(query.extra_args.iter().cloned());
    args
}

/// Renders a command line for logs and error messages
pub fn display_command(program: &std::path::Path, args: &[String]) -> String {
    let mut command = program.display().to_string();
    for arg in args {
        command.push(' ');
        command.push_str(arg);
    }
    command
}
