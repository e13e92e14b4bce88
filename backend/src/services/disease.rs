//! Disease impact integration
//!
//! Reduces classifier detections for a field into a severity score and a fractional
//! yield loss, then combines that loss with the physics stress into a yield outlook.

use std::collections::BTreeMap;

use shared::{DiseaseAssessment, DiseaseClass, DiseaseDetection, PhysicsSummary, YieldOutlook};

/// Extra loss applied when more than one disease type is present
const MULTI_DISEASE_FACTOR: f64 = 1.2;

const HIGH_SEVERITY: f64 = 0.7;
const MODERATE_SEVERITY: f64 = 0.4;

#[derive(Default)]
struct ClassTally {
    count: usize,
    total_confidence: f64,
}

/// Severity, primary disease and yield impact for a set of detections
pub fn assess_detections(detections: &[DiseaseDetection]) -> DiseaseAssessment {
    if detections.is_empty() {
        return DiseaseAssessment {
            severity_score: 0.0,
            primary_disease: DiseaseClass::Healthy,
            detection_count: 0,
            disease_types: 0,
            yield_impact: 0.0,
            recommendations: disease_recommendations(&DiseaseClass::Healthy, 0.0, 0),
        };
    }

    let mut tallies: BTreeMap<DiseaseClass, ClassTally> = BTreeMap::new();
    let mut total_confidence = 0.0;
    for detection in detections {
        let confidence = if detection.confidence.is_finite() {
            detection.confidence
        } else {
            0.0
        };
        let tally = tallies.entry(detection.disease.clone()).or_default();
        tally.count += 1;
        tally.total_confidence += confidence;
        total_confidence += confidence;
    }

    let primary_disease = tallies
        .iter()
        .max_by(|(_, a), (_, b)| {
            a.count
                .cmp(&b.count)
                .then(a.total_confidence.total_cmp(&b.total_confidence))
        })
        .map(|(class, _)| class.clone())
        .unwrap_or(DiseaseClass::Healthy);

    let severity_score = (total_confidence / detections.len() as f64).min(1.0);
    let disease_types = tallies.len();

    let mut yield_impact = primary_disease.base_yield_impact() * severity_score;
    if disease_types > 1 {
        yield_impact *= MULTI_DISEASE_FACTOR;
    }
    let yield_impact = yield_impact.clamp(0.0, 1.0);

    tracing::debug!(
        primary = %primary_disease,
        severity = severity_score,
        detections = detections.len(),
        "Assessed disease detections"
    );

    let recommendations = disease_recommendations(&primary_disease, severity_score, disease_types);

    DiseaseAssessment {
        severity_score,
        primary_disease,
        detection_count: detections.len(),
        disease_types,
        yield_impact,
        recommendations,
    }
}

fn disease_recommendations(
    primary: &DiseaseClass,
    severity: f64,
    disease_types: usize,
) -> Vec<String> {
    if *primary == DiseaseClass::Healthy {
        return vec!["Crop appears healthy. Continue regular monitoring.".to_string()];
    }

    let band = if severity > HIGH_SEVERITY {
        "HIGH SEVERITY: Immediate intervention required"
    } else if severity > MODERATE_SEVERITY {
        "MODERATE SEVERITY: Treatment recommended"
    } else {
        "LOW SEVERITY: Monitor closely"
    };

    let mut recommendations = vec![band.to_string()];
    recommendations.extend(primary.management_actions().iter().map(|a| a.to_string()));
    if disease_types > 1 {
        recommendations
            .push("Multiple diseases detected - consult agricultural extension officer".to_string());
    }
    recommendations
}

/// Combine the mean physics stress with the disease loss
pub fn yield_outlook(
    summary: &PhysicsSummary,
    disease: Option<&DiseaseAssessment>,
    base_yield_kg_per_ha: Option<f64>,
) -> YieldOutlook {
    let physics_factor = 1.0 - summary.average_yield_impact_percent / 100.0;
    let disease_factor = 1.0 - disease.map_or(0.0, |d| d.yield_impact);
    let retained = physics_factor * disease_factor;

    YieldOutlook {
        physics_factor,
        disease_factor,
        total_yield_reduction_percent: (1.0 - retained) * 100.0,
        expected_yield_kg_per_ha: base_yield_kg_per_ha.map(|base| base * retained),
    }
}
