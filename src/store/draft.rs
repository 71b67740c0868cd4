//! Compose draft: pending text plus mock attachments.

use std::path::Path;

use serde::Serialize;

/// What the compose box will send next.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub text: String,
    /// Image reference (the picked path)
    pub image: Option<String>,
    /// File name of the picked file
    pub file: Option<String>,
    /// Next message is tagged as a voice message
    pub recording: bool,
}

impl Draft {
    /// A draft is sendable when it has non-blank text or any attachment.
    pub fn is_sendable(&self) -> bool {
        !self.text.trim().is_empty() || self.image.is_some() || self.file.is_some() || self.recording
    }

    pub fn attach_image(&mut self, path: &str) {
        self.image = Some(path.to_string());
    }

    /// Keep only the file name, like a browser file input does.
    pub fn attach_file(&mut self, path: &str) {
        let name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());
        self.file = Some(name);
    }

    /// Take the draft, leaving an empty one behind.
    pub fn take(&mut self) -> Draft {
        std::mem::take(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_draft_not_sendable() {
        let mut draft = Draft::default();
        assert!(!draft.is_sendable());
        draft.text = "   \t".to_string();
        assert!(!draft.is_sendable());
    }

    #[test]
    fn test_attachment_makes_sendable() {
        let mut draft = Draft::default();
        draft.recording = true;
        assert!(draft.is_sendable());

        let mut draft = Draft::default();
        draft.attach_image("/tmp/photo.jpg");
        assert!(draft.is_sendable());
    }

    #[test]
    fn test_attach_file_keeps_name_only() {
        let mut draft = Draft::default();
        draft.attach_file("/home/alice/docs/report.pdf");
        assert_eq!(draft.file.as_deref(), Some("report.pdf"));
    }

    #[test]
    fn test_take_clears() {
        let mut draft = Draft {
            text: "hi".to_string(),
            recording: true,
            ..Default::default()
        };
        let taken = draft.take();
        assert_eq!(taken.text, "hi");
        assert!(taken.recording);
        assert_eq!(draft, Draft::default());
    }
}
