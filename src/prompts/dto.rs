use serde::{Deserialize, Serialize};
use std::fmt;

use crate::sessions::NutritionLogEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    MealPlan,
    Nutrition,
    Coaching,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::MealPlan, Mode::Nutrition, Mode::Coaching];

    pub fn label(self) -> &'static str {
        match self {
            Mode::MealPlan => "Scenario 1: Tailored Meal Planning",
            Mode::Nutrition => "Scenario 2: Dynamic Nutritional Insights",
            Mode::Coaching => "Scenario 3: Virtual Nutrition Coaching",
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            Mode::MealPlan => "📅 Personalized Weekly Meal Plan",
            Mode::Nutrition => "🔍 Nutritional Breakdown",
            Mode::Coaching => "💬 Virtual Nutrition Coach",
        }
    }

    pub fn button(self) -> &'static str {
        match self {
            Mode::MealPlan => "Generate Meal Plan",
            Mode::Nutrition => "Analyze Nutrition",
            Mode::Coaching => "Ask Coach",
        }
    }

    pub fn progress(self) -> &'static str {
        match self {
            Mode::MealPlan => "Generating your personalized meal plan...",
            Mode::Nutrition => "Analyzing nutritional content...",
            Mode::Coaching => "Consulting your AI Coach...",
        }
    }

    /// Heading shown above a successful result.
    pub fn heading(self) -> &'static str {
        match self {
            Mode::MealPlan => "Your Customized Plan:",
            Mode::Nutrition => "Detailed Nutritional Report:",
            Mode::Coaching => "Coach's Advice:",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityLevel {
    #[default]
    Sedentary,
    #[serde(rename = "Lightly Active")]
    LightlyActive,
    #[serde(rename = "Moderately Active")]
    ModeratelyActive,
    #[serde(rename = "Very Active")]
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 4] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary",
            ActivityLevel::LightlyActive => "Lightly Active",
            ActivityLevel::ModeratelyActive => "Moderately Active",
            ActivityLevel::VeryActive => "Very Active",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MealPlanFields {
    pub restrictions: String,
    pub health: String,
    pub activity: ActivityLevel,
    pub preference: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NutritionFields {
    pub food_item: String,
    pub barcode: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CoachingFields {
    pub question: String,
}

/// `{ "mode": ..., "fields": { ... } }`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "mode", content = "fields", rename_all = "snake_case")]
pub enum PromptRequest {
    MealPlan(MealPlanFields),
    Nutrition(NutritionFields),
    Coaching(CoachingFields),
}

impl PromptRequest {
    pub fn mode(&self) -> Mode {
        match self {
            PromptRequest::MealPlan(_) => Mode::MealPlan,
            PromptRequest::Nutrition(_) => Mode::Nutrition,
            PromptRequest::Coaching(_) => Mode::Coaching,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPrompt {
    pub mode: Mode,
    pub text: String,
    /// Analyzed item label; only set for nutrition lookups.
    pub item: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ModeInfo {
    pub mode: Mode,
    pub label: &'static str,
    pub header: &'static str,
    pub button: &'static str,
    pub progress: &'static str,
    pub heading: &'static str,
}

impl From<Mode> for ModeInfo {
    fn from(mode: Mode) -> Self {
        Self {
            mode,
            label: mode.label(),
            header: mode.header(),
            button: mode.button(),
            progress: mode.progress(),
            heading: mode.heading(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub mode: Mode,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub mode: Mode,
    pub heading: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrition_log: Option<Vec<NutritionLogEntry>>,
}
