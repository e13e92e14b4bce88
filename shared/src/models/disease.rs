//! Disease detection signal models
//!
//! Detections come from an external image classifier; only the class label and the
//! classifier confidence are consumed here.

use serde::{Deserialize, Serialize};

/// Tobacco leaf disease classes emitted by the detector
///
/// Labels outside the known table are kept verbatim in `Unknown`, so two different
/// unrecognised labels still count as two disease types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(from = "String", into = "String")]
pub enum DiseaseClass {
    Healthy,
    BrownSpot,
    FrogEyeLeafSpot,
    MosaicVirus,
    BacterialWilt,
    BlackShank,
    BlueMold,
    TargetSpot,
    Unknown(String),
}

impl DiseaseClass {
    /// Fractional yield loss at full severity
    pub fn base_yield_impact(&self) -> f64 {
        match self {
            DiseaseClass::Healthy => 0.0,
            DiseaseClass::BrownSpot => 0.15,
            DiseaseClass::FrogEyeLeafSpot => 0.20,
            DiseaseClass::MosaicVirus => 0.35,
            DiseaseClass::BacterialWilt => 0.50,
            DiseaseClass::BlackShank => 0.60,
            DiseaseClass::BlueMold => 0.45,
            DiseaseClass::TargetSpot => 0.25,
            DiseaseClass::Unknown(_) => 0.0,
        }
    }

    /// Field management actions for the disease
    pub fn management_actions(&self) -> &'static [&'static str] {
        match self {
            DiseaseClass::BrownSpot => &[
                "Apply copper-based fungicides",
                "Improve field drainage",
                "Remove infected leaves",
            ],
            DiseaseClass::FrogEyeLeafSpot => &[
                "Apply fungicides (chlorothalonil or mancozeb)",
                "Rotate crops to reduce pathogen buildup",
                "Ensure proper plant spacing",
            ],
            DiseaseClass::MosaicVirus => &[
                "Remove and destroy infected plants",
                "Control aphid vectors with insecticides",
                "Use virus-resistant varieties in future plantings",
            ],
            DiseaseClass::BacterialWilt => &[
                "Remove infected plants immediately",
                "Improve soil drainage",
                "Avoid overhead irrigation",
                "Consider soil fumigation for severe cases",
            ],
            DiseaseClass::BlackShank => &[
                "Apply metalaxyl-based fungicides",
                "Improve field drainage",
                "Use resistant varieties",
                "Rotate with non-host crops",
            ],
            DiseaseClass::BlueMold => &[
                "Apply systemic fungicides immediately",
                "Increase air circulation",
                "Reduce humidity in field",
                "Scout regularly for early detection",
            ],
            DiseaseClass::TargetSpot => &[
                "Apply azoxystrobin or pyraclostrobin",
                "Remove crop debris",
                "Ensure adequate plant nutrition",
            ],
            DiseaseClass::Healthy | DiseaseClass::Unknown(_) => &[],
        }
    }
}

impl DiseaseClass {
    /// Detector label, e.g. `brown_spot`
    pub fn as_str(&self) -> &str {
        match self {
            DiseaseClass::Healthy => "healthy",
            DiseaseClass::BrownSpot => "brown_spot",
            DiseaseClass::FrogEyeLeafSpot => "frog_eye_leaf_spot",
            DiseaseClass::MosaicVirus => "mosaic_virus",
            DiseaseClass::BacterialWilt => "bacterial_wilt",
            DiseaseClass::BlackShank => "black_shank",
            DiseaseClass::BlueMold => "blue_mold",
            DiseaseClass::TargetSpot => "target_spot",
            DiseaseClass::Unknown(label) => label,
        }
    }
}

impl From<String> for DiseaseClass {
    fn from(label: String) -> Self {
        match label.as_str() {
            "healthy" => DiseaseClass::Healthy,
            "brown_spot" => DiseaseClass::BrownSpot,
            "frog_eye_leaf_spot" => DiseaseClass::FrogEyeLeafSpot,
            "mosaic_virus" => DiseaseClass::MosaicVirus,
            "bacterial_wilt" => DiseaseClass::BacterialWilt,
            "black_shank" => DiseaseClass::BlackShank,
            "blue_mold" => DiseaseClass::BlueMold,
            "target_spot" => DiseaseClass::TargetSpot,
            _ => DiseaseClass::Unknown(label),
        }
    }
}

impl From<DiseaseClass> for String {
    fn from(class: DiseaseClass) -> Self {
        match class {
            DiseaseClass::Unknown(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for DiseaseClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One classifier detection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiseaseDetection {
    #[serde(rename = "class")]
    pub disease: DiseaseClass,
    #[serde(default)]
    pub confidence: f64,
}

/// Reduced disease signal for a field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseAssessment {
    /// Mean detection confidence, capped at 1
    pub severity_score: f64,
    pub primary_disease: DiseaseClass,
    pub detection_count: usize,
    pub disease_types: usize,
    /// Fractional yield loss attributed to disease, in `[0, 1]`
    pub yield_impact: f64,
    pub recommendations: Vec<String>,
}
