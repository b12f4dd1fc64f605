//! CanonText v1: LF line endings, no trailing spaces, NFC, and a closed set
//! of forbidden characters.

use unicode_normalization::UnicodeNormalization;

use crate::canonicalizer::CanonicalizationError;
use crate::hygiene::{HygieneReport, HygieneStatus};
use crate::identifiers::ProfileId;

const ZERO_WIDTH: [char; 4] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}'];

/// Text that satisfies every CanonText rule. Only [`TextCanonicalizer`]
/// constructs it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalText(String);

impl CanonicalText {
    /// Canonical text as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// UTF-8 bytes fed to the hasher.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Consumes the wrapper.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for CanonicalText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonical text plus the hygiene report of what was rewritten.
#[derive(Debug, Clone)]
pub struct TextCanonicalization {
    /// The canonical text.
    pub text: CanonicalText,
    /// What normalization changed.
    pub report: HygieneReport,
}

/// CanonText canonicalizer.
pub struct TextCanonicalizer {
    profile: ProfileId,
}

impl Default for TextCanonicalizer {
    fn default() -> Self {
        Self::new(ProfileId::canon_text())
    }
}

impl TextCanonicalizer {
    /// Creates a canonicalizer that stamps `profile` on its reports.
    pub fn new(profile: ProfileId) -> Self {
        Self { profile }
    }

    /// Canonicalizes `raw`, discarding the report on failure.
    pub fn canonicalize(&self, raw: &str) -> Result<TextCanonicalization, CanonicalizationError> {
        self.canonicalize_with_report(raw).map_err(|(err, _)| err)
    }

    /// Canonicalizes `raw`; the report is returned on both paths.
    ///
    /// Steps run in a fixed order: line endings, trailing spaces, NFC, then a
    /// left-to-right scan where the first forbidden character decides the
    /// error.
    pub fn canonicalize_with_report(
        &self,
        raw: &str,
    ) -> Result<TextCanonicalization, (CanonicalizationError, HygieneReport)> {
        let mut report = HygieneReport::new(self.profile.clone());

        let crlf = raw.matches("\r\n").count() as u64;
        let unified = raw.replace("\r\n", "\n");
        let bare_cr = unified.matches('\r').count() as u64;
        let unified = unified.replace('\r', "\n");
        report.note("LineEndingsNormalized", "line_endings_normalized", crlf + bare_cr);

        let mut stripped_lines = 0u64;
        let stripped = unified
            .split('\n')
            .map(|line| {
                let trimmed = line.trim_end_matches(' ');
                if trimmed.len() != line.len() {
                    stripped_lines += 1;
                }
                trimmed
            })
            .collect::<Vec<_>>()
            .join("\n");
        report.note("TrailingSpacesStripped", "lines_stripped", stripped_lines);

        let composed: String = stripped.nfc().collect();
        if composed != stripped {
            report.note("NfcComposed", "nfc_rewrites", 1);
        }

        if let Err(e) = scan_forbidden(&composed) {
            report.status = HygieneStatus::Invalid;
            return Err((e, report));
        }

        Ok(TextCanonicalization {
            text: CanonicalText(composed),
            report,
        })
    }
}

fn scan_forbidden(text: &str) -> Result<(), CanonicalizationError> {
    for (offset, ch) in text.chars().enumerate() {
        let codepoint = ch as u32;
        if ch == '\t' {
            return Err(CanonicalizationError::TabForbidden { offset });
        }
        if ZERO_WIDTH.contains(&ch) {
            return Err(CanonicalizationError::ZeroWidthForbidden { offset, codepoint });
        }
        if (codepoint < 0x20 && ch != '\n') || codepoint == 0x7F {
            return Err(CanonicalizationError::ControlCharForbidden { offset, codepoint });
        }
    }
    Ok(())
}

/// Canonicalizes `raw` under the CanonText v1 rules.
pub fn canon_text(raw: &str) -> Result<CanonicalText, CanonicalizationError> {
    TextCanonicalizer::default()
        .canonicalize(raw)
        .map(|result| result.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon(raw: &str) -> String {
        canon_text(raw).unwrap().into_string()
    }

    #[test]
    fn normalizes_line_endings_and_trailing_spaces() {
        assert_eq!(
            canon("line one  \r\nline two \rline three   "),
            "line one\nline two\nline three"
        );
    }

    #[test]
    fn strips_only_ascii_spaces() {
        assert_eq!(canon("a\u{00A0} "), "a\u{00A0}");
        assert_eq!(canon("  lead"), "  lead");
    }

    #[test]
    fn composes_to_nfc() {
        assert_eq!(canon("cafe\u{0301}"), "caf\u{00E9}");
    }

    #[test]
    fn tab_is_forbidden() {
        let err = canon_text("a\tb").unwrap_err();
        assert_eq!(err, CanonicalizationError::TabForbidden { offset: 1 });
        assert_eq!(err.code(), "TAB_FORBIDDEN");
    }

    #[test]
    fn zero_width_and_bom_are_forbidden() {
        for raw in ["zero\u{200B}width", "\u{FEFF}bom", "x\u{200C}", "\u{200D}"] {
            assert_eq!(canon_text(raw).unwrap_err().code(), "ZERO_WIDTH_FORBIDDEN");
        }
    }

    #[test]
    fn control_and_del_are_forbidden() {
        assert_eq!(canon_text("bell\u{7}").unwrap_err().code(), "CONTROL_CHAR_FORBIDDEN");
        assert_eq!(canon_text("del\u{7F}").unwrap_err().code(), "CONTROL_CHAR_FORBIDDEN");
    }

    #[test]
    fn first_violation_wins() {
        let err = canon_text("\u{200D} then \t").unwrap_err();
        assert_eq!(
            err,
            CanonicalizationError::ZeroWidthForbidden {
                offset: 0,
                codepoint: 0x200D
            }
        );
    }

    #[test]
    fn carriage_returns_never_reach_the_scan() {
        assert_eq!(canon("a\r"), "a\n");
    }

    #[test]
    fn idempotent_on_valid_input() {
        for raw in ["", "x  \r\n", "e\u{0301} \n\n  ", "plain"] {
            let once = canon(raw);
            assert_eq!(canon(&once), once);
        }
    }

    #[test]
    fn report_reflects_rewrites() {
        let clean = TextCanonicalizer::default().canonicalize("ok\n").unwrap();
        assert!(clean.report.is_clean());

        let dirty = TextCanonicalizer::default()
            .canonicalize("a \r\nb \r\n")
            .unwrap();
        assert_eq!(dirty.report.status, HygieneStatus::Ambiguous);
        assert_eq!(dirty.report.metrics.get("line_endings_normalized"), Some(&2));
        assert_eq!(dirty.report.metrics.get("lines_stripped"), Some(&2));
    }

    #[test]
    fn report_marks_invalid_input() {
        let (_, report) = TextCanonicalizer::default()
            .canonicalize_with_report("\t")
            .unwrap_err();
        assert_eq!(report.status, HygieneStatus::Invalid);
    }
}
