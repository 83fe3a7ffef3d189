//! Sweep configuration and its JSON form.

use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sweep_curves::{Axis, ShapeConfig};

use crate::deform::DeformStack;
use crate::error::SweepResult;
use crate::frame::UpReference;
use crate::topology::SeamPolicy;

/// Everything needed to build a [`crate::Sweep`].
///
/// Missing JSON keys take their defaults and unknown keys are ignored, so
/// configurations saved by older versions still load. Lists are replaced
/// wholesale on load.
///
/// # Example
///
/// ```
/// use mesh_sweep::SweepConfig;
///
/// let config = SweepConfig::from_json(r#"{"endcaps": true, "legacy_field": 3}"#)?;
/// assert!(config.endcaps);
/// assert_eq!(config.path, SweepConfig::default().path);
/// # Ok::<(), mesh_sweep::SweepError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Guide curve; one ring per point.
    pub path: ShapeConfig,
    /// Cross-section, sampled in its local XY plane.
    pub profile: ShapeConfig,
    /// Cap the ends of open paths with ngons.
    pub endcaps: bool,
    /// Orientation reference of the first ring.
    pub up: UpReference,
    /// Seam handling for spun closed tubes.
    pub seam: SeamPolicy,
    /// Edits applied on every recompute.
    pub deform: DeformStack,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            path: ShapeConfig::line(Axis::Z, 4.0, 8),
            profile: ShapeConfig::ellipse(1.0, 1.0, 12),
            endcaps: false,
            up: UpReference::default(),
            seam: SeamPolicy::default(),
            deform: DeformStack::default(),
        }
    }
}

impl SweepConfig {
    /// Configuration with the given path and profile and no edits.
    #[must_use]
    pub fn new(path: ShapeConfig, profile: ShapeConfig) -> Self {
        Self {
            path,
            profile,
            ..Self::default()
        }
    }

    /// Builder form of the end cap flag.
    #[must_use]
    pub fn with_endcaps(mut self, endcaps: bool) -> Self {
        self.endcaps = endcaps;
        self
    }

    /// Builder form of the deformation stack.
    #[must_use]
    pub fn with_deform(mut self, deform: DeformStack) -> Self {
        self.deform = deform;
        self
    }

    /// Parse a configuration from JSON text.
    pub fn from_json(json: &str) -> SweepResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty-printed JSON text.
    pub fn to_json(&self) -> SweepResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a JSON configuration from a reader.
    pub fn from_reader<R: Read>(reader: R) -> SweepResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn to_writer<W: Write>(&self, writer: W) -> SweepResult<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Load a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> SweepResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> SweepResult<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deform::{LocationEdit, Noise};
    use crate::falloff::FalloffSpec;
    use nalgebra::Vector3;

    #[test]
    fn json_round_trip() {
        let config = SweepConfig::default().with_deform(DeformStack {
            twist: 1.25,
            path_edits: vec![LocationEdit::absolute(
                0.5,
                Vector3::x(),
                FalloffSpec::run(2, 3),
            )],
            noise: Noise {
                amplitude: Vector3::new(0.0, 0.1, 0.0),
                seed: 42,
            },
            ..DeformStack::default()
        });
        let json = config.to_json().unwrap_or_default();
        let back = SweepConfig::from_json(&json);
        assert!(back.is_ok());
        assert_eq!(back.unwrap_or_default(), config);
    }

    #[test]
    fn partial_json_takes_defaults() {
        let config = SweepConfig::from_json(
            r#"{"deform": {"twist": 2.0, "path_edits": [{"amount": 1.0}]}}"#,
        )
        .unwrap_or_default();
        assert_eq!(config.deform.twist, 2.0);
        assert_eq!(config.deform.path_edits.len(), 1);
        assert_eq!(config.deform.path_edits[0].axis, Vector3::z());
        assert_eq!(config.profile, SweepConfig::default().profile);
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        let err = SweepConfig::from_json("{ not json").err();
        assert!(matches!(err, Some(crate::SweepError::Serialization(_))));
    }

    #[test]
    fn writer_and_reader_agree() {
        let config = SweepConfig::default().with_endcaps(true);
        let mut buf = Vec::new();
        assert!(config.to_writer(&mut buf).is_ok());
        let back = SweepConfig::from_reader(buf.as_slice()).unwrap_or_default();
        assert_eq!(back, config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SweepConfig::load("/nonexistent/sweep.json").err();
        assert!(matches!(err, Some(crate::SweepError::Io(_))));
    }
}
