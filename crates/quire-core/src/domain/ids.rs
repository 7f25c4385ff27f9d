//! Domain identifiers.
//!
//! # ULID ベースの ID
//! タスクの ID には ULID を使います。生成順でソートでき、
//! 永続化スロットに文字列として書き出しても順序が崩れません。
//!
//! `Id<T>` は Phantom type で種類を区別するジェネリック ID です。
//! 現在は `TaskId` だけですが、ID の取り違えは型で防ぎます。
//!
//! `BookId` はリモート側が振る外部 ID です。こちらで生成することはなく、
//! ワイヤー上では文字列でも整数でも届きます。

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use ulid::Ulid;

/// IdMarker は各 ID 型のマーカー trait
pub trait IdMarker: Send + Sync + 'static {
    /// Display で使うプレフィックス（例: "task-"）
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// Error returned when a textual id cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid id '{0}'")]
pub struct ParseIdError(String);

/// Accepts both the prefixed display form (`task-01H...`) and a bare ULID.
impl<T: IdMarker> FromStr for Id<T> {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix(T::prefix()).unwrap_or(s);
        Ulid::from_string(raw)
            .map(Self::from_ulid)
            .map_err(|_| ParseIdError(s.to_string()))
    }
}

/// Task のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskMarker {}

impl IdMarker for TaskMarker {
    fn prefix() -> &'static str {
        "task-"
    }
}

/// Identifier of a user-enqueued download task.
pub type TaskId = Id<TaskMarker>;

/// External identifier of a book, assigned by the remote side.
///
/// Join key between persisted tasks and the status endpoint's reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for BookId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for BookId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for BookId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

// The status endpoint is not consistent about the JSON type of book ids.
impl<'de> Deserialize<'de> for BookId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => BookId(s),
            Raw::Unsigned(n) => BookId(n.to_string()),
            Raw::Signed(n) => BookId(n.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_id_display_has_prefix() {
        let id = TaskId::from_ulid(Ulid::new());
        assert!(id.to_string().starts_with("task-"));
    }

    #[test]
    fn task_id_parses_with_and_without_prefix() {
        let id = TaskId::from_ulid(Ulid::new());

        let prefixed: TaskId = id.to_string().parse().unwrap();
        let bare: TaskId = id.as_ulid().to_string().parse().unwrap();

        assert_eq!(prefixed, id);
        assert_eq!(bare, id);
        assert!("task-nope".parse::<TaskId>().is_err());
    }

    #[test]
    fn task_id_serializes_as_plain_ulid_string() {
        let id = TaskId::from_ulid(Ulid::new());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_ulid()));

        let back: TaskId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn ulid_ids_are_sortable() {
        let id1 = TaskId::from_ulid(Ulid::new());
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = TaskId::from_ulid(Ulid::new());

        assert!(id1 < id2);
    }

    #[test]
    fn book_id_accepts_string_and_integer() {
        let from_text: BookId = serde_json::from_str("\"111\"").unwrap();
        let from_number: BookId = serde_json::from_str("111").unwrap();

        assert_eq!(from_text, BookId::from("111"));
        assert_eq!(from_number, BookId::from("111"));
        assert_eq!(serde_json::to_string(&from_number).unwrap(), "\"111\"");
    }
}
