use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ListingError;

/// Raw filesystem kind of an entry, as reported in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Link,
    Fifo,
    Char,
    Block,
    Socket,
    #[serde(other)]
    Unknown,
}

/// Coarse content classification derived from a file's leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Flash,
    Photoshop,
    File,
}

impl FileKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Image => "image",
            FileKind::Flash => "flash",
            FileKind::Photoshop => "photoshop",
            FileKind::File => "file",
        }
    }
}

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    /// Separator-prefixed path relative to the listing base, e.g. `/sub/a.png`.
    pub path: String,
    /// Size in kilobytes (1000 bytes), rounded up.
    pub size: u64,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(
        rename = "fileType",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "file_type_or_flag"
    )]
    pub file_type: Option<FileKind>,
    pub date: String,
}

// Some listing servers send `"fileType": false` for non-files, and unknown
// classifications should degrade to a plain file rather than fail the listing.
fn file_type_or_flag<'de, D>(deserializer: D) -> Result<Option<FileKind>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Kind(FileKind),
        Flag(bool),
        Other(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Kind(kind)) => Some(kind),
        Some(Raw::Other(_)) => Some(FileKind::File),
        Some(Raw::Flag(_)) | None => None,
    })
}

/// Wire shape of a listing: `{success: true, contents}` or `{success: false, error}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<DirectoryEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ListingResponse {
    pub fn ok(contents: Vec<DirectoryEntry>) -> Self {
        ListingResponse {
            success: true,
            contents: Some(contents),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        ListingResponse {
            success: false,
            contents: None,
            error: Some(message.into()),
        }
    }

    /// Collapses the wire record into a `Result`. A successful response without
    /// `contents` is treated as an empty directory.
    pub fn into_result(self) -> Result<Vec<DirectoryEntry>, String> {
        if self.success {
            Ok(self.contents.unwrap_or_default())
        } else {
            Err(self
                .error
                .unwrap_or_else(|| "The directory could not be listed".to_string()))
        }
    }
}

impl From<Result<Vec<DirectoryEntry>, ListingError>> for ListingResponse {
    fn from(result: Result<Vec<DirectoryEntry>, ListingError>) -> Self {
        match result {
            Ok(contents) => ListingResponse::ok(contents),
            Err(err) => ListingResponse::failure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn png_entry() -> DirectoryEntry {
        DirectoryEntry {
            name: "img.png".into(),
            path: "/img.png".into(),
            size: 12,
            kind: EntryKind::File,
            file_type: Some(FileKind::Image),
            date: "2024-01-01 00:00:00".into(),
        }
    }

    #[test]
    fn success_serializes_with_wire_field_names() {
        let value = serde_json::to_value(ListingResponse::ok(vec![png_entry()])).unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "contents": [{
                    "name": "img.png",
                    "path": "/img.png",
                    "size": 12,
                    "type": "file",
                    "fileType": "image",
                    "date": "2024-01-01 00:00:00"
                }]
            })
        );
    }

    #[test]
    fn directories_carry_no_file_type() {
        let dir = DirectoryEntry {
            name: "sub".into(),
            path: "/sub".into(),
            size: 4,
            kind: EntryKind::Dir,
            file_type: None,
            date: "2024-01-01 00:00:00".into(),
        };
        let value = serde_json::to_value(&dir).unwrap();
        assert_eq!(value["type"], "dir");
        assert!(value.get("fileType").is_none());
    }

    #[test]
    fn failure_carries_only_error() {
        let value = serde_json::to_value(ListingResponse::from(Err(ListingError::NotFound(
            "nope".into(),
        ))))
        .unwrap();
        assert_eq!(
            value,
            json!({"success": false, "error": "This directory does not exist"})
        );
    }

    #[test]
    fn unknown_kinds_from_other_servers_still_parse() {
        let parsed: DirectoryEntry = serde_json::from_value(json!({
            "name": "dev",
            "path": "/dev",
            "size": 0,
            "type": "whiteout",
            "date": "2024-01-01 00:00:00"
        }))
        .unwrap();
        assert_eq!(parsed.kind, EntryKind::Unknown);
        assert_eq!(parsed.file_type, None);
    }

    #[test]
    fn false_file_type_means_unclassified() {
        let parsed: DirectoryEntry = serde_json::from_value(json!({
            "name": "sub",
            "path": "/sub",
            "size": 4,
            "type": "dir",
            "fileType": false,
            "date": "2024-01-01 00:00:00"
        }))
        .unwrap();
        assert_eq!(parsed.file_type, None);
    }

    #[test]
    fn failed_response_without_message_gets_a_default() {
        let response = ListingResponse {
            success: false,
            contents: None,
            error: None,
        };
        assert!(response.into_result().unwrap_err().contains("could not be listed"));
    }
}
