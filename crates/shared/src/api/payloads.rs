use serde::{Deserialize, Serialize};

use crate::types::{ExerciseId, PlanId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsAdminResponse {
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRequest {
    pub exercise: ExerciseId,
    pub repetitions: i64,
    pub weight: f64,
}

/// Body for both creating and updating a workout. On update the name is
/// replaced and any sets are appended to the existing ones
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkoutRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sets: Vec<SetRequest>,
}

/// Plan submission as it arrives over the wire. Dates and frequency are kept
/// loose here so malformed values come back as validation errors instead of
/// body rejections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertPlanRequest {
    pub exercise: ExerciseId,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub frequency_days: Option<i64>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OccurrencesQuery {
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccurrencesResponse {
    pub plan_id: PlanId,
    pub dates: Vec<String>,
}
