use crate::item::{ActionData, DisplayItem};
use std::path::Path;

/// Separator between fields of one log line. Cannot occur in names,
/// dates or subjects.
pub const FIELD_SEPARATOR: char = '\0';

/// graph, hash, author, author date, committer, committer date, subject
const RECORD_FIELDS: usize = 7;

/// Converts one line of `git log` output into an item for the host.
///
/// Without graph mode the output has no graph column, so the fields start
/// at the hash. A line that carries no separator at all is a graph
/// connector and becomes a structural item. Lines with any other field
/// count are kept as structural items showing the raw line.
pub fn parse_log_line(cwd: &Path, line: &str, graph: bool) -> DisplayItem {
    let mut fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();

    if graph && fields.len() == 1 {
        return structural(cwd, line);
    }
    if !graph {
        fields.insert(0, "");
    }
    if fields.len() != RECORD_FIELDS {
        log::debug!(
            "Unexpected field count {} in log line: {:?}",
            fields.len(),
            line
        );
        return structural(cwd, line);
    }

    let action = ActionData {
        cwd: cwd.to_path_buf(),
        graph: fields[0].to_string(),
        hash: Some(fields[1].to_string()),
        author: fields[2].to_string(),
        author_date: fields[3].to_string(),
        committer: fields[4].to_string(),
        committer_date: fields[5].to_string(),
        subject: fields[6].to_string(),
    };

    let short = action.short_hash().unwrap_or_default();
    let word = format!(
        "{} {} by {}({})",
        short, action.subject, action.author, action.committer
    );
    let display = if graph {
        format!("{} {} {}", action.graph, short, action.subject)
    } else {
        format!("{} {}", short, action.subject)
    };

    DisplayItem::new(word, display, action)
}

fn structural(cwd: &Path, line: &str) -> DisplayItem {
    DisplayItem::new(
        String::new(),
        line.to_string(),
        ActionData::structural(cwd.to_path_buf(), line.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn cwd() -> PathBuf {
        PathBuf::from("/work/repo")
    }

    #[test]
    fn test_parse_commit_line() {
        let line = "abcdef1234567890\0Alice\02024-01-01\0Bob\02024-01-02\0Fix bug";
        let item = parse_log_line(&cwd(), line, false);

        assert_eq!(item.word, "abcdef Fix bug by Alice(Bob)");
        assert_eq!(item.display, "abcdef Fix bug");
        assert_eq!(item.kind, "git_commit");
        assert_eq!(item.action.hash.as_deref(), Some("abcdef1234567890"));
        assert_eq!(item.action.graph, "");
        assert_eq!(item.action.author_date, "2024-01-01");
        assert_eq!(item.action.committer_date, "2024-01-02");
        assert_eq!(item.action.cwd, cwd());
    }

    #[test]
    fn test_parse_graph_commit_line() {
        let line = "* \0abcdef1234567890\0Alice\02024-01-01\0Alice\02024-01-01\0Fix bug";
        let item = parse_log_line(&cwd(), line, true);

        assert_eq!(item.word, "abcdef Fix bug by Alice(Alice)");
        assert_eq!(item.display, "*  abcdef Fix bug");
        assert_eq!(item.action.graph, "* ");
    }

    #[test]
    fn test_parse_graph_connector_line() {
        let item = parse_log_line(&cwd(), "| \\", true);

        assert_eq!(item.word, "");
        assert_eq!(item.display, "| \\");
        assert_eq!(item.action.graph, "| \\");
        assert!(!item.action.is_commit());
    }

    #[test]
    fn test_graph_mode_only_changes_display_prefix() {
        let fields = "0123456789\0Ann\0d1\0Ben\0d2\0Subject";
        let plain = parse_log_line(&cwd(), fields, false);
        let graphed = parse_log_line(&cwd(), &format!("| * \0{}", fields), true);

        assert_eq!(plain.word, graphed.word);
        assert_eq!(graphed.display, format!("| *  {}", plain.display));
    }

    #[test]
    fn test_malformed_line_is_structural() {
        let item = parse_log_line(&cwd(), "abc\0only-two", false);
        assert_eq!(item.word, "");
        assert_eq!(item.display, "abc\0only-two");
        assert!(!item.action.is_commit());

        let item = parse_log_line(&cwd(), "plain text", false);
        assert_eq!(item.display, "plain text");
        assert!(!item.action.is_commit());
    }

    #[test]
    fn test_non_ascii_hash_is_not_split() {
        let item = parse_log_line(&cwd(), "ééééééé\0A\0d\0C\0d\0S", false);
        assert_eq!(item.display, "éééééé S");
    }
}
