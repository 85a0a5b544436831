use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Disease;
use crate::error::{ExchangeError, Result};

/// The fixed set of public-health interventions a prediction can simulate.
/// Serialized under the user-facing labels the frontend displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Intervention {
    #[serde(rename = "Vaksinasi Massal")]
    MassVaccination,
    #[serde(rename = "Pembatasan Sosial")]
    SocialDistancing,
    #[serde(rename = "Peningkatan Tes & Lacak")]
    TestingAndTracing,
    #[serde(rename = "Kampanye Kesehatan Masyarakat")]
    PublicHealthCampaign,
    #[serde(rename = "Peningkatan Sanitasi")]
    SanitationImprovement,
    #[serde(rename = "Pengendalian Vektor")]
    VectorControl,
}

impl Intervention {
    pub const ALL: [Intervention; 6] = [
        Intervention::MassVaccination,
        Intervention::SocialDistancing,
        Intervention::TestingAndTracing,
        Intervention::PublicHealthCampaign,
        Intervention::SanitationImprovement,
        Intervention::VectorControl,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Intervention::MassVaccination => "Vaksinasi Massal",
            Intervention::SocialDistancing => "Pembatasan Sosial",
            Intervention::TestingAndTracing => "Peningkatan Tes & Lacak",
            Intervention::PublicHealthCampaign => "Kampanye Kesehatan Masyarakat",
            Intervention::SanitationImprovement => "Peningkatan Sanitasi",
            Intervention::VectorControl => "Pengendalian Vektor",
        }
    }

    pub fn try_from_label(label: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|i| i.label() == label)
            .ok_or_else(|| ExchangeError::UnknownIntervention(label.to_string()))
    }
}

/// Enabled interventions mapped to an effectiveness percentage.
///
/// A present key means the intervention is enabled; absence means disabled.
/// Percentages are clamped into [0, 100] on insertion. Iteration order is
/// stable so the request text is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterventionSet(BTreeMap<Intervention, u8>);

impl InterventionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable an intervention at the given effectiveness, clamped to [0, 100].
    pub fn enable(&mut self, intervention: Intervention, effectiveness: i64) {
        self.0.insert(intervention, effectiveness.clamp(0, 100) as u8);
    }

    pub fn disable(&mut self, intervention: Intervention) {
        self.0.remove(&intervention);
    }

    pub fn effectiveness(&self, intervention: Intervention) -> Option<u8> {
        self.0.get(&intervention).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Intervention, u8)> + '_ {
        self.0.iter().map(|(i, pct)| (*i, *pct))
    }
}

/// Methodology label injected into the prediction request. Purely descriptive
/// text for the model; it does not change local control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    #[serde(rename = "Random Forest")]
    RandomForest,
    #[serde(rename = "Regresi Linier")]
    LinearRegression,
    #[serde(rename = "LSTM (Long Short-Term Memory)")]
    Lstm,
    #[serde(rename = "Temporal Fusion Transformer (TFT)")]
    TemporalFusionTransformer,
}

impl ModelKind {
    pub const ALL: [ModelKind; 4] = [
        ModelKind::RandomForest,
        ModelKind::LinearRegression,
        ModelKind::Lstm,
        ModelKind::TemporalFusionTransformer,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ModelKind::RandomForest => "Random Forest",
            ModelKind::LinearRegression => "Regresi Linier",
            ModelKind::Lstm => "LSTM (Long Short-Term Memory)",
            ModelKind::TemporalFusionTransformer => "Temporal Fusion Transformer (TFT)",
        }
    }

    pub fn try_from_label(label: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.label() == label)
            .ok_or_else(|| ExchangeError::UnknownModel(label.to_string()))
    }
}

/// Outbreak risk assessment returned by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

/// One point of the combined historical/forecast chart.
///
/// Historical periods carry `cases` and no `predicted`; forecast periods the
/// reverse. A missing numeric field deserializes to `None` and serializes as
/// an explicit `null` — never zero, never omitted — so chart rendering can
/// distinguish "no data" from "value 0".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub name: String,
    #[serde(default)]
    pub cases: Option<f64>,
    #[serde(default)]
    pub predicted: Option<f64>,
}

/// A complete prediction, created wholesale from one model response. A new
/// request fully replaces any previous result; a failed request leaves none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub insights: String,
    pub risk_level: RiskLevel,
    pub recommendations: Vec<String>,
    pub chart_data: Vec<ChartPoint>,
}

pub const MIN_PREDICTION_MONTHS: u32 = 1;
pub const MAX_PREDICTION_MONTHS: u32 = 60;

/// Inputs for one prediction exchange.
///
/// Construction clamps the forecast horizon into [1, 60] months and rejects
/// empty case data. The CSV text itself is not validated locally; malformed
/// tabular data is forwarded as-is and rejection is the model's business.
#[derive(Debug, Clone)]
pub struct PredictionRequest {
    pub disease: &'static Disease,
    pub csv_data: String,
    pub interventions: InterventionSet,
    pub model: ModelKind,
    pub prediction_months: u32,
}

impl PredictionRequest {
    pub fn new(
        disease: &'static Disease,
        csv_data: impl Into<String>,
        interventions: InterventionSet,
        model: ModelKind,
        prediction_months: i64,
    ) -> Result<Self> {
        let csv_data = csv_data.into();
        if csv_data.trim().is_empty() {
            return Err(ExchangeError::EmptyData);
        }
        Ok(Self {
            disease,
            csv_data,
            interventions,
            model,
            prediction_months: prediction_months
                .clamp(MIN_PREDICTION_MONTHS as i64, MAX_PREDICTION_MONTHS as i64)
                as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_disease;

    #[test]
    fn effectiveness_is_clamped() {
        let mut set = InterventionSet::new();
        set.enable(Intervention::MassVaccination, 150);
        set.enable(Intervention::VectorControl, -20);
        set.enable(Intervention::SocialDistancing, 50);

        assert_eq!(set.effectiveness(Intervention::MassVaccination), Some(100));
        assert_eq!(set.effectiveness(Intervention::VectorControl), Some(0));
        assert_eq!(set.effectiveness(Intervention::SocialDistancing), Some(50));
    }

    #[test]
    fn disable_removes_the_key() {
        let mut set = InterventionSet::new();
        set.enable(Intervention::SanitationImprovement, 50);
        assert_eq!(set.len(), 1);

        set.disable(Intervention::SanitationImprovement);
        assert!(set.is_empty());
        assert_eq!(
            set.effectiveness(Intervention::SanitationImprovement),
            None
        );
    }

    #[test]
    fn horizon_is_clamped() {
        let disease = find_disease("rabies").unwrap();
        let request = PredictionRequest::new(
            disease,
            "Bulan,Kasus\nJan,10",
            InterventionSet::new(),
            ModelKind::RandomForest,
            600,
        )
        .unwrap();
        assert_eq!(request.prediction_months, 60);

        let request = PredictionRequest::new(
            disease,
            "Bulan,Kasus\nJan,10",
            InterventionSet::new(),
            ModelKind::RandomForest,
            0,
        )
        .unwrap();
        assert_eq!(request.prediction_months, 1);
    }

    #[test]
    fn empty_case_data_is_rejected() {
        let disease = find_disease("rabies").unwrap();
        let result = PredictionRequest::new(
            disease,
            "   \n",
            InterventionSet::new(),
            ModelKind::Lstm,
            12,
        );
        assert!(matches!(result, Err(ExchangeError::EmptyData)));
    }

    #[test]
    fn labels_round_trip() {
        for intervention in Intervention::ALL {
            assert_eq!(
                Intervention::try_from_label(intervention.label()).unwrap(),
                intervention
            );
        }
        for model in ModelKind::ALL {
            assert_eq!(ModelKind::try_from_label(model.label()).unwrap(), model);
        }
        assert!(Intervention::try_from_label("Lockdown Total").is_err());
        assert!(ModelKind::try_from_label("ARIMA").is_err());
    }

    #[test]
    fn risk_level_wire_names() {
        assert_eq!(
            serde_json::to_value(RiskLevel::VeryHigh).unwrap(),
            "Very High"
        );
        assert_eq!(
            serde_json::from_value::<RiskLevel>(serde_json::json!("Low")).unwrap(),
            RiskLevel::Low
        );
    }

    #[test]
    fn intervention_set_serializes_as_label_map() {
        let mut set = InterventionSet::new();
        set.enable(Intervention::MassVaccination, 75);
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["Vaksinasi Massal"], 75);
    }
}
