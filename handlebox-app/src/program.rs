//! Deployable program artifacts.
//!
//! The application ships as two independently deployed logic programs: the
//! approval program ([`lifecycle::evaluate`](crate::lifecycle::evaluate))
//! and the clear-state program. Each is described by a versioned
//! [`ProgramArtifact`] that renders to a one-payload text file — a header
//! line followed by the hex-encoded borsh payload — which the deployment
//! tool reads back and submits to the node for compilation.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::ProgramError;

/// Artifact format version, bumped on any encoding change.
pub const PROGRAM_FORMAT_VERSION: u32 = 1;

const ARTIFACT_MAGIC: &str = "#handlebox-program";

/// Which of the two logic programs an artifact describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum ProgramKind {
    /// Runs on every application call.
    Approval,
    /// Runs on clear-state calls only.
    ClearState,
}

impl ProgramKind {
    /// Stable name used in artifact headers and file names.
    pub fn name(&self) -> &'static str {
        match self {
            ProgramKind::Approval => "approval",
            ProgramKind::ClearState => "clear",
        }
    }
}

/// A deployable description of one logic program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ProgramArtifact {
    kind: ProgramKind,
    version: u32,
}

impl ProgramArtifact {
    /// The approval program at the current format version.
    pub fn approval() -> Self {
        Self {
            kind: ProgramKind::Approval,
            version: PROGRAM_FORMAT_VERSION,
        }
    }

    /// The clear-state program at the current format version.
    pub fn clear_state() -> Self {
        Self {
            kind: ProgramKind::ClearState,
            version: PROGRAM_FORMAT_VERSION,
        }
    }

    pub fn kind(&self) -> ProgramKind {
        self.kind
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Render the artifact to its text form:
    ///
    /// ```text
    /// #handlebox-program approval v1
    /// <hex of borsh payload>
    /// ```
    pub fn render(&self) -> Result<String, ProgramError> {
        let payload = borsh::to_vec(self).map_err(|e| ProgramError::InvalidPayload {
            reason: e.to_string(),
        })?;
        Ok(format!(
            "{} {} v{}\n{}\n",
            ARTIFACT_MAGIC,
            self.kind.name(),
            self.version,
            hex::encode(payload)
        ))
    }

    /// Parse an artifact back from its text form, verifying that the header
    /// and the payload agree.
    pub fn parse(text: &str) -> Result<Self, ProgramError> {
        let mut lines = text.lines();
        let header = lines.next().unwrap_or_default();

        let mut parts = header.split_whitespace();
        let (magic, kind_name, version_tag) =
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(magic), Some(kind), Some(version), None) => (magic, kind, version),
                _ => {
                    return Err(ProgramError::MalformedHeader {
                        line: header.to_string(),
                    })
                }
            };
        if magic != ARTIFACT_MAGIC || !version_tag.starts_with('v') {
            return Err(ProgramError::MalformedHeader {
                line: header.to_string(),
            });
        }

        let payload_hex = lines.next().ok_or_else(|| ProgramError::InvalidPayload {
            reason: "missing payload line".to_string(),
        })?;
        let payload = hex::decode(payload_hex.trim()).map_err(|e| ProgramError::InvalidPayload {
            reason: e.to_string(),
        })?;
        let artifact =
            ProgramArtifact::try_from_slice(&payload).map_err(|e| ProgramError::InvalidPayload {
                reason: e.to_string(),
            })?;

        let announced = format!("{} v{}", kind_name, &version_tag[1..]);
        let decoded = format!("{} v{}", artifact.kind.name(), artifact.version);
        if announced != decoded {
            return Err(ProgramError::HeaderMismatch {
                header: announced,
                payload: decoded,
            });
        }
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_parse_roundtrip() {
        for artifact in [ProgramArtifact::approval(), ProgramArtifact::clear_state()] {
            let text = artifact.render().unwrap();
            assert!(text.starts_with(ARTIFACT_MAGIC));
            assert_eq!(ProgramArtifact::parse(&text).unwrap(), artifact);
        }
    }

    #[test]
    fn test_programs_are_distinct_artifacts() {
        let approval = ProgramArtifact::approval().render().unwrap();
        let clear = ProgramArtifact::clear_state().render().unwrap();
        assert_ne!(approval, clear);
        assert!(approval.contains("approval"));
        assert!(clear.contains("clear"));
    }

    #[test]
    fn test_malformed_header_rejected() {
        let err = ProgramArtifact::parse("not an artifact\nabcd\n").unwrap_err();
        assert!(matches!(err, ProgramError::MalformedHeader { .. }));
    }

    #[test]
    fn test_tampered_header_rejected() {
        let text = ProgramArtifact::approval().render().unwrap();
        let tampered = text.replace("approval", "clear");
        let err = ProgramArtifact::parse(&tampered).unwrap_err();
        assert!(matches!(err, ProgramError::HeaderMismatch { .. }));
    }

    #[test]
    fn test_bad_payload_rejected() {
        let err =
            ProgramArtifact::parse("#handlebox-program approval v1\nzz-not-hex\n").unwrap_err();
        assert!(matches!(err, ProgramError::InvalidPayload { .. }));
    }
}
