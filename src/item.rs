use serde::Serialize;
use std::path::PathBuf;

/// Kind tag telling the host which action handler consumes an item.
pub const KIND: &str = "git_commit";

/// Number of hash characters shown in labels and display text.
pub const SHORT_HASH_LEN: usize = 6;

/// Action payload attached to every item.
///
/// A record without a `hash` is a pure graph line: it renders, but it has
/// no commit identity and must not be acted upon as a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionData {
    pub cwd: PathBuf,
    pub graph: String,
    pub hash: Option<String>,
    pub author: String,
    pub author_date: String,
    pub committer: String,
    pub committer_date: String,
    pub subject: String,
}

impl ActionData {
    pub fn structural(cwd: PathBuf, graph: String) -> Self {
        Self {
            cwd,
            graph,
            ..Self::default()
        }
    }

    pub fn is_commit(&self) -> bool {
        self.hash.is_some()
    }

    /// First six characters of the hash, if this record has one
    pub fn short_hash(&self) -> Option<&str> {
        self.hash.as_deref().map(|hash| {
            let end = hash
                .char_indices()
                .nth(SHORT_HASH_LEN)
                .map_or(hash.len(), |(idx, _)| idx);
            &hash[..end]
        })
    }
}

/// One selectable entry handed to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayItem {
    pub word: String,
    pub display: String,
    pub action: ActionData,
    pub kind: &'static str,
}

impl DisplayItem {
    pub fn new(word: String, display: String, action: ActionData) -> Self {
        Self {
            word,
            display,
            action,
            kind: KIND,
        }
    }
}
