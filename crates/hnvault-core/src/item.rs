//! Items as served by the remote API.
//!
//! An item is read-only input. Every field except `id` may be absent from the
//! JSON payload; deleted items in particular carry little more than an id, a
//! timestamp and the `deleted` flag.

use serde::{Deserialize, Serialize};

/// Remote item id. Assigned sequentially by the remote system.
pub type ItemId = u64;

/// The `type` discriminant of an item.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
  Story,
  Comment,
  Job,
  Poll,
  PollOpt,
  /// Absent or unrecognised `type`.
  #[default]
  #[serde(other)]
  Other,
}

impl ItemKind {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Story => "story",
      Self::Comment => "comment",
      Self::Job => "job",
      Self::Poll => "poll",
      Self::PollOpt => "pollopt",
      Self::Other => "other",
    }
  }
}

impl std::fmt::Display for ItemKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A single item from the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
  pub id:          ItemId,
  #[serde(rename = "type", default)]
  pub kind:        ItemKind,
  pub by:          Option<String>,
  /// Creation time, unix seconds.
  pub time:        Option<i64>,
  pub title:       Option<String>,
  pub score:       Option<i64>,
  pub url:         Option<String>,
  /// Total comment count of a story.
  pub descendants: Option<i64>,
  pub parent:      Option<ItemId>,
  pub text:        Option<String>,
  #[serde(default)]
  pub kids:        Vec<ItemId>,
  #[serde(default)]
  pub deleted:     bool,
  #[serde(default)]
  pub dead:        bool,
}

impl Item {
  /// An item with only `id` and `kind` set.
  pub fn new(id: ItemId, kind: ItemKind) -> Self {
    Self {
      id,
      kind,
      by: None,
      time: None,
      title: None,
      score: None,
      url: None,
      descendants: None,
      parent: None,
      text: None,
      kids: Vec::new(),
      deleted: false,
      dead: false,
    }
  }

  /// Deleted and dead items are never archived.
  pub fn is_flagged(&self) -> bool { self.deleted || self.dead }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decodes_story_payload() {
    let json = r#"{
      "by": "dhouston", "descendants": 71, "id": 8863, "kids": [8952, 9224],
      "score": 111, "time": 1175714200, "title": "My YC app: Dropbox",
      "type": "story", "url": "http://www.getdropbox.com/u/2/screencast.html"
    }"#;
    let item: Item = serde_json::from_str(json).unwrap();
    assert_eq!(item.id, 8863);
    assert_eq!(item.kind, ItemKind::Story);
    assert_eq!(item.descendants, Some(71));
    assert_eq!(item.kids, vec![8952, 9224]);
    assert!(!item.is_flagged());
  }

  #[test]
  fn decodes_deleted_comment_without_author() {
    let json = r#"{"deleted": true, "id": 42, "parent": 41, "time": 1, "type": "comment"}"#;
    let item: Item = serde_json::from_str(json).unwrap();
    assert_eq!(item.kind, ItemKind::Comment);
    assert!(item.by.is_none());
    assert!(item.is_flagged());
  }

  #[test]
  fn unknown_or_missing_type_is_other() {
    let unknown: Item = serde_json::from_str(r#"{"id": 1, "type": "launch"}"#).unwrap();
    assert_eq!(unknown.kind, ItemKind::Other);

    let missing: Item = serde_json::from_str(r#"{"id": 2}"#).unwrap();
    assert_eq!(missing.kind, ItemKind::Other);

    let pollopt: Item = serde_json::from_str(r#"{"id": 3, "type": "pollopt"}"#).unwrap();
    assert_eq!(pollopt.kind, ItemKind::PollOpt);
  }
}
