use serde::Serialize;
use uuid::Uuid;

use super::repo::NutritionLogEntry;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub nutrition_log: Vec<NutritionLogEntry>,
}
