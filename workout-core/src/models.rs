//! Documents exchanged with the external webhooks.
//!
//! The backend speaks Portuguese keys (`introducao`, `aquecimento`, ...);
//! English keys are accepted as aliases.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Shown when the generation service answers with something that is not a plan.
pub const INVALID_PLAN_MESSAGE: &str =
    "A IA retornou uma resposta em formato inválido. Tente novamente.";

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("workout plan must be a JSON object")]
    NotAnObject,

    #[error("workout plan is missing the `{0}` section")]
    MissingSection(&'static str),

    #[error("workout plan is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Top-level plan sections: (wire key, English alias).
const REQUIRED_SECTIONS: [(&str, &str); 4] = [
    ("introducao", "introduction"),
    ("aquecimento", "warmup"),
    ("treino_principal", "mainSet"),
    ("desaquecimento", "cooldown"),
];

/// A workout plan as produced by the generation service.
///
/// The original JSON document is kept untouched and is what gets serialized
/// back out, so saving a plan forwards exactly what the service returned.
/// The typed [`PlanOutline`] is only a read-only view for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct WorkoutPlan {
    document: Value,
    outline: PlanOutline,
}

impl WorkoutPlan {
    pub fn outline(&self) -> &PlanOutline {
        &self.outline
    }

    pub fn document(&self) -> &Value {
        &self.document
    }
}

impl TryFrom<Value> for WorkoutPlan {
    type Error = PlanError;

    fn try_from(document: Value) -> Result<Self, Self::Error> {
        let object = document.as_object().ok_or(PlanError::NotAnObject)?;
        for (key, alias) in REQUIRED_SECTIONS {
            if !object.contains_key(key) && !object.contains_key(alias) {
                return Err(PlanError::MissingSection(key));
            }
        }

        let outline = PlanOutline::deserialize(&document)?;
        Ok(Self { document, outline })
    }
}

impl From<WorkoutPlan> for Value {
    fn from(plan: WorkoutPlan) -> Self {
        plan.document
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlanOutline {
    #[serde(rename = "introducao", alias = "introduction")]
    pub introduction: Introduction,
    #[serde(rename = "aquecimento", alias = "warmup")]
    pub warmup: Vec<Exercise>,
    #[serde(rename = "treino_principal", alias = "mainSet")]
    pub main_set: Vec<Exercise>,
    #[serde(rename = "desaquecimento", alias = "cooldown")]
    pub cooldown: Vec<Exercise>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Warmup,
    MainSet,
    Cooldown,
}

impl Section {
    pub fn title(self) -> &'static str {
        match self {
            Section::Warmup => "Aquecimento",
            Section::MainSet => "Treino Principal",
            Section::Cooldown => "Desaquecimento",
        }
    }
}

impl PlanOutline {
    /// Exercise groups in the order they are performed.
    pub fn sections(&self) -> [(Section, &[Exercise]); 3] {
        [
            (Section::Warmup, self.warmup.as_slice()),
            (Section::MainSet, self.main_set.as_slice()),
            (Section::Cooldown, self.cooldown.as_slice()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Introduction {
    #[serde(rename = "mensagem", alias = "message", default, deserialize_with = "text")]
    pub message: String,
    #[serde(rename = "foco", alias = "focus", default, deserialize_with = "text")]
    pub focus: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Exercise {
    #[serde(rename = "exercicio", alias = "name", deserialize_with = "text")]
    pub name: String,
    #[serde(rename = "orientacao", alias = "orientation", default, deserialize_with = "text")]
    pub orientation: String,
    #[serde(rename = "duracao", alias = "duration", default, deserialize_with = "optional_text")]
    pub duration: Option<String>,
    #[serde(rename = "series", alias = "sets", default, deserialize_with = "optional_text")]
    pub sets: Option<String>,
    #[serde(rename = "repeticoes", alias = "reps", default, deserialize_with = "optional_text")]
    pub reps: Option<String>,
    #[serde(rename = "descanso", alias = "rest", default, deserialize_with = "optional_text")]
    pub rest: Option<String>,
}

/// A plan previously stored by the persistence webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedWorkout {
    #[serde(deserialize_with = "text")]
    pub id: String,
    #[serde(default, deserialize_with = "text")]
    pub date: String,
    #[serde(rename = "foco", alias = "focus", default, deserialize_with = "text")]
    pub focus: String,
    #[serde(rename = "workout", alias = "plan")]
    pub plan: WorkoutPlan,
}

/// Language models are loose about scalar types ("3" vs 3), so any scalar is
/// accepted and rendered as text.
fn scalar_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        other => Some(other.to_string()),
    }
}

fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_to_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_to_text(Value::deserialize(deserializer)?))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Value};

    pub fn plan_document() -> Value {
        json!({
            "introducao": {
                "mensagem": "Bora treinar!",
                "foco": "Perda de peso em casa"
            },
            "aquecimento": [
                { "exercicio": "Polichinelo", "duracao": "5 minutos", "orientacao": "Ritmo leve" }
            ],
            "treino_principal": [
                {
                    "exercicio": "Agachamento",
                    "series": 4,
                    "repeticoes": "12",
                    "descanso": "60 segundos",
                    "orientacao": "Joelhos alinhados"
                }
            ],
            "desaquecimento": [
                { "exercicio": "Alongamento de quadríceps", "duracao": "30 segundos", "orientacao": "Sem balanço" }
            ],
            "observacoes": "campo extra do backend"
        })
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::plan_document;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plan_parses_wire_document() {
        let plan = WorkoutPlan::try_from(plan_document()).unwrap();
        let outline = plan.outline();

        assert_eq!(outline.introduction.focus, "Perda de peso em casa");
        assert_eq!(outline.main_set[0].sets.as_deref(), Some("4"));
        assert_eq!(outline.main_set[0].reps.as_deref(), Some("12"));
        assert_eq!(outline.warmup[0].sets, None);
    }

    #[test]
    fn test_plan_serializes_original_document() {
        let document = plan_document();
        let plan = WorkoutPlan::try_from(document.clone()).unwrap();

        assert_eq!(serde_json::to_value(&plan).unwrap(), document);
    }

    #[test]
    fn test_plan_requires_every_section() {
        for (key, _) in REQUIRED_SECTIONS {
            let mut document = plan_document();
            document.as_object_mut().unwrap().remove(key);

            let err = WorkoutPlan::try_from(document).unwrap_err();
            assert!(matches!(err, PlanError::MissingSection(missing) if missing == key));
        }
    }

    #[test]
    fn test_plan_rejects_non_objects() {
        assert!(matches!(
            WorkoutPlan::try_from(json!("treino")),
            Err(PlanError::NotAnObject)
        ));
        assert!(matches!(
            WorkoutPlan::try_from(json!({
                "introducao": {}, "aquecimento": "nope",
                "treino_principal": [], "desaquecimento": []
            })),
            Err(PlanError::Malformed(_))
        ));
    }

    #[test]
    fn test_plan_accepts_english_keys() {
        let plan = WorkoutPlan::try_from(json!({
            "introduction": { "message": "Go", "focus": "Strength" },
            "warmup": [],
            "mainSet": [{ "name": "Push-up", "orientation": "Straight back", "sets": "3" }],
            "cooldown": []
        }))
        .unwrap();

        assert_eq!(plan.outline().main_set[0].name, "Push-up");
    }

    #[test]
    fn test_sections_follow_workout_order() {
        let plan = WorkoutPlan::try_from(plan_document()).unwrap();
        let order: Vec<Section> = plan
            .outline()
            .sections()
            .iter()
            .map(|(section, _)| *section)
            .collect();

        assert_eq!(order, vec![Section::Warmup, Section::MainSet, Section::Cooldown]);
    }

    #[test]
    fn test_saved_workout_accepts_numeric_id() {
        let record: SavedWorkout = serde_json::from_value(json!({
            "id": 42,
            "date": "2026-10-15T12:00:00.000Z",
            "foco": "Hipertrofia",
            "workout": plan_document()
        }))
        .unwrap();

        assert_eq!(record.id, "42");
        assert_eq!(record.focus, "Hipertrofia");
    }
}
