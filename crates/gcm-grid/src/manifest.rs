//! Per-model grid manifests.
//!
//! A manifest is the static table that maps a model family's raw coordinate
//! names (`Zp1`, `phalf`, ...) onto the logical grid vocabulary (axis plus
//! centre/edge placement) and records periodicity, required variables, and
//! the names of the physical spacing and partial-cell factor variables.
//! Manifests are immutable: adapters take their own copy and never write
//! back.
//!
//! Built-in manifests cover the MITgcm and GFDL families; custom ones can be
//! loaded from YAML the same way per-model configuration is handled
//! elsewhere in the stack.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GcmError, Result};

/// Logical grid axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Staggered placement of a coordinate on its axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Placement {
    /// Cell centres (scalar points on an Arakawa C-grid).
    Centre,
    /// Cell edges / interfaces (flux points).
    Edge,
    /// Lower sub-level interfaces (vertical only).
    Lower,
    /// Upper sub-level interfaces (vertical only).
    Upper,
}

impl Placement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::Centre => "centre",
            Placement::Edge => "edge",
            Placement::Lower => "lower",
            Placement::Upper => "upper",
        }
    }
}

/// Logical label of a coordinate: axis plus placement, e.g. `z_edge`.
///
/// This is the explicit staggering descriptor used everywhere instead of
/// string-prefix matching on raw names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GridLabel {
    pub axis: Axis,
    pub placement: Placement,
}

impl GridLabel {
    pub const X_CENTRE: GridLabel = GridLabel::new(Axis::X, Placement::Centre);
    pub const X_EDGE: GridLabel = GridLabel::new(Axis::X, Placement::Edge);
    pub const Y_CENTRE: GridLabel = GridLabel::new(Axis::Y, Placement::Centre);
    pub const Y_EDGE: GridLabel = GridLabel::new(Axis::Y, Placement::Edge);
    pub const Z_CENTRE: GridLabel = GridLabel::new(Axis::Z, Placement::Centre);
    pub const Z_EDGE: GridLabel = GridLabel::new(Axis::Z, Placement::Edge);
    pub const Z_LOWER: GridLabel = GridLabel::new(Axis::Z, Placement::Lower);
    pub const Z_UPPER: GridLabel = GridLabel::new(Axis::Z, Placement::Upper);

    pub const fn new(axis: Axis, placement: Placement) -> Self {
        Self { axis, placement }
    }

    /// Parse a label such as `"x_centre"` or `"z_lower"`.
    pub fn parse(s: &str) -> Option<GridLabel> {
        let (axis, placement) = s.split_once('_')?;
        let axis = match axis {
            "x" => Axis::X,
            "y" => Axis::Y,
            "z" => Axis::Z,
            _ => return None,
        };
        let placement = match placement {
            "centre" => Placement::Centre,
            "edge" => Placement::Edge,
            "lower" => Placement::Lower,
            "upper" => Placement::Upper,
            _ => return None,
        };
        // lower/upper sub-levels only exist on the vertical axis
        if axis != Axis::Z && matches!(placement, Placement::Lower | Placement::Upper) {
            return None;
        }
        Some(GridLabel { axis, placement })
    }
}

impl fmt::Display for GridLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.axis.as_str(), self.placement.as_str())
    }
}

impl From<GridLabel> for String {
    fn from(label: GridLabel) -> String {
        label.to_string()
    }
}

impl TryFrom<String> for GridLabel {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        GridLabel::parse(&s).ok_or_else(|| format!("unknown grid label '{s}'"))
    }
}

/// Manifest entry for one raw coordinate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordSpec {
    /// Human-readable name, e.g. "Height (edges)".
    pub name: String,
    /// Physical units, e.g. "m" or "hPa".
    pub units: String,
    /// Logical axis/placement label.
    pub label: GridLabel,
    /// Whether the axis wraps around at this coordinate.
    #[serde(default)]
    pub periodic: bool,
}

/// Names of the three partial-cell thickness factor variables, keyed by the
/// horizontal staggering of the fields they apply to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HfacVars {
    /// Centre-X / centre-Y (tracer points).
    pub centre: String,
    /// Edge-X / centre-Y (zonal velocity points).
    pub west: String,
    /// Centre-X / edge-Y (meridional velocity points).
    pub south: String,
}

/// Static per-model grid metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Model family name, e.g. "mitgcm".
    pub model: String,
    /// Raw coordinate name -> logical spec.
    pub coords: BTreeMap<String, CoordSpec>,
    /// Variables that must be present in a dataset of this family.
    #[serde(default)]
    pub required_vars: Vec<String>,
    /// Dataset title prefix identifying this family, for auto-detection.
    #[serde(default)]
    pub title_signature: Option<String>,
    /// Partial-cell factor variable names, when the family has them.
    #[serde(default)]
    pub hfac: Option<HfacVars>,
    /// Full-cell vertical thickness variable (MITgcm `drF` style).
    #[serde(default)]
    pub cell_thickness: Option<String>,
    /// Centre-to-centre vertical spacing variable (MITgcm `drC` style).
    #[serde(default)]
    pub centre_spacing: Option<String>,
}

impl Manifest {
    /// The MITgcm grid manifest.
    pub fn mitgcm() -> Manifest {
        let mut coords = BTreeMap::new();
        coords.insert("X".into(), coord("X position", "m", GridLabel::X_CENTRE, false));
        coords.insert(
            "Xp1".into(),
            coord("X position (edges)", "m", GridLabel::X_EDGE, false),
        );
        coords.insert("Y".into(), coord("Y position", "m", GridLabel::Y_CENTRE, false));
        coords.insert(
            "Yp1".into(),
            coord("Y position (edges)", "m", GridLabel::Y_EDGE, false),
        );
        coords.insert("Z".into(), coord("Height", "m", GridLabel::Z_CENTRE, false));
        coords.insert(
            "Zp1".into(),
            coord("Height (edges)", "m", GridLabel::Z_EDGE, false),
        );
        coords.insert(
            "Zl".into(),
            coord("Height (lower)", "m", GridLabel::Z_LOWER, false),
        );
        coords.insert(
            "Zu".into(),
            coord("Height (upper)", "m", GridLabel::Z_UPPER, false),
        );
        Manifest {
            model: "mitgcm".into(),
            coords,
            required_vars: vec![
                "Z".into(),
                "Zp1".into(),
                "Zl".into(),
                "Zu".into(),
                "X".into(),
                "Xp1".into(),
                "Y".into(),
                "Yp1".into(),
                "drF".into(),
                "drC".into(),
            ],
            title_signature: Some("MITgcm".into()),
            hfac: Some(HfacVars {
                centre: "HFacC".into(),
                west: "HFacW".into(),
                south: "HFacS".into(),
            }),
            cell_thickness: Some("drF".into()),
            centre_spacing: Some("drC".into()),
        }
    }

    /// The GFDL grid manifest.
    pub fn gfdl() -> Manifest {
        let mut coords = BTreeMap::new();
        coords.insert(
            "lat".into(),
            coord("Latitude", "degrees N", GridLabel::Y_CENTRE, false),
        );
        coords.insert(
            "latb".into(),
            coord("Latitude (edges)", "degrees N", GridLabel::Y_EDGE, false),
        );
        coords.insert(
            "lon".into(),
            coord("Longitude", "degrees E", GridLabel::X_CENTRE, true),
        );
        coords.insert(
            "lonb".into(),
            coord("Longitude (edges)", "degrees E", GridLabel::X_EDGE, true),
        );
        coords.insert(
            "pfull".into(),
            coord("Pressure", "hPa", GridLabel::Z_CENTRE, false),
        );
        coords.insert(
            "phalf".into(),
            coord("Pressure (edges)", "hPa", GridLabel::Z_EDGE, false),
        );
        Manifest {
            model: "gfdl".into(),
            coords,
            required_vars: vec![
                "phalf".into(),
                "pfull".into(),
                "lat".into(),
                "lon".into(),
                "latb".into(),
                "lonb".into(),
            ],
            title_signature: Some("GFDL".into()),
            hfac: None,
            cell_thickness: None,
            centre_spacing: None,
        }
    }

    /// All built-in manifests.
    pub fn builtin() -> Vec<Manifest> {
        vec![Manifest::mitgcm(), Manifest::gfdl()]
    }

    /// Look up a built-in manifest by model name.
    pub fn for_model(name: &str) -> Result<Manifest> {
        match name.to_ascii_lowercase().as_str() {
            "mitgcm" | "mit" => Ok(Manifest::mitgcm()),
            "gfdl" => Ok(Manifest::gfdl()),
            other => Err(GcmError::configuration(format!(
                "no built-in manifest for model '{other}'"
            ))),
        }
    }

    /// Match a dataset title against the built-in family signatures.
    pub fn detect(title: &str) -> Result<Manifest> {
        for manifest in Manifest::builtin() {
            if let Some(sig) = &manifest.title_signature {
                if title.starts_with(sig.as_str()) {
                    tracing::debug!(model = %manifest.model, "auto-detected model manifest from title");
                    return Ok(manifest);
                }
            }
        }
        Err(GcmError::configuration(format!(
            "dataset title '{title}' matches no known model signature"
        )))
    }

    /// Load a manifest from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Manifest> {
        serde_yaml::from_str(yaml)
            .map_err(|e| GcmError::configuration(format!("invalid manifest YAML: {e}")))
    }

    /// Raw names of coordinates on the given axis.
    pub fn coords_on_axis(&self, axis: Axis) -> impl Iterator<Item = &str> {
        self.coords
            .iter()
            .filter(move |(_, spec)| spec.label.axis == axis)
            .map(|(raw, _)| raw.as_str())
    }
}

fn coord(name: &str, units: &str, label: GridLabel, periodic: bool) -> CoordSpec {
    CoordSpec {
        name: name.into(),
        units: units.into(),
        label,
        periodic,
    }
}
