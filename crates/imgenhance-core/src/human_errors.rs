// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the enhancer UI.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives how the presentation layer shows the message.

use crate::error::EnhanceError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Trying the same action again may work.
    Transient,
    /// User must do something (pick a different file, load an image first).
    ActionRequired,
    /// Cannot be fixed by retrying. The file itself is unusable.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether repeating the action could succeed.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert an `EnhanceError` into a `HumanError` suitable for display.
pub fn humanize_error(err: &EnhanceError) -> HumanError {
    match err {
        EnhanceError::Decode(detail) => humanize_decode_error(detail),

        EnhanceError::Encode(_) => HumanError {
            message: "We couldn't save the enhanced image.".into(),
            suggestion: "Try downloading again. Your image and settings are unchanged.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        EnhanceError::NoImageLoaded => HumanError {
            message: "No image selected.".into(),
            suggestion: "Upload an image to start enhancing.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        EnhanceError::UnknownParameter(name) => HumanError {
            message: "That adjustment isn't available.".into(),
            suggestion: format!(
                "Use brightness, contrast, saturation, blur or sharpness. (Got: {name})"
            ),
            retriable: false,
            severity: Severity::Permanent,
        },

        EnhanceError::RenderCancelled => HumanError {
            message: "The preview was interrupted.".into(),
            suggestion: "Move a slider again to refresh the preview.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        EnhanceError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "We don't have permission to use that location.".into(),
                    suggestion: "Choose a different folder, or check the file permissions.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        EnhanceError::Serialization(_) => HumanError {
            message: "The enhancer had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}

/// Distinguish oversized images from unreadable ones.
fn humanize_decode_error(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("limit") || lower.contains("too large") {
        HumanError {
            message: "This image is too large to enhance.".into(),
            suggestion: "Try a smaller copy of the image (for example, one exported for the web).".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("empty") {
        HumanError {
            message: "The selected file is empty.".into(),
            suggestion: "Choose the image again. It may not have finished downloading.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else {
        HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_image_is_permanent() {
        let err = EnhanceError::Decode("format error: invalid PNG signature".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Permanent);
        assert!(!human.retriable);
    }

    #[test]
    fn oversized_image_is_action_required() {
        let err = EnhanceError::Decode("limit error: image is too large".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
    }

    #[test]
    fn no_image_is_action_required() {
        let human = humanize_error(&EnhanceError::NoImageLoaded);
        assert_eq!(human.severity, Severity::ActionRequired);
    }

    #[test]
    fn encode_failure_is_retriable() {
        let human = humanize_error(&EnhanceError::Encode("writer closed".into()));
        assert!(human.retriable);
        assert_eq!(human.severity, Severity::Transient);
    }

    #[test]
    fn unknown_parameter_mentions_name() {
        let human = humanize_error(&EnhanceError::UnknownParameter("hue".into()));
        assert!(human.suggestion.contains("hue"));
    }
}
