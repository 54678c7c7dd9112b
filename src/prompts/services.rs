use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{
    AskResponse, BuiltPrompt, CoachingFields, MealPlanFields, NutritionFields, PromptRequest,
};
use crate::llm::CompletionError;
use crate::state::AppState;

pub const SYSTEM_PROMPT: &str =
    "You are a certified professional nutritionist and diet planning expert.";

#[derive(Debug, thiserror::Error)]
pub enum AskError {
    #[error("session {0} not found")]
    UnknownSession(Uuid),
    #[error(transparent)]
    Completion(#[from] CompletionError),
}

/// `food_item` when given, otherwise a barcode reference (possibly with an empty barcode).
pub fn item_label(food_item: &str, barcode: &str) -> String {
    if food_item.is_empty() {
        format!("Product with barcode {}", barcode)
    } else {
        food_item.to_string()
    }
}

pub fn build_prompt(request: &PromptRequest) -> BuiltPrompt {
    let mode = request.mode();
    match request {
        PromptRequest::MealPlan(fields) => BuiltPrompt {
            mode,
            text: meal_plan_prompt(fields),
            item: None,
        },
        PromptRequest::Nutrition(fields) => {
            let item = item_label(&fields.food_item, &fields.barcode);
            BuiltPrompt {
                mode,
                text: nutrition_prompt(&item),
                item: Some(item),
            }
        }
        PromptRequest::Coaching(fields) => BuiltPrompt {
            mode,
            text: coaching_prompt(fields),
            item: None,
        },
    }
}

fn meal_plan_prompt(f: &MealPlanFields) -> String {
    format!(
        "Create a detailed 7-day personalized meal plan.

Dietary Restrictions: {}
Health Conditions: {}
Activity Level: {}
Taste Preferences: {}

Include:
- Breakfast, Lunch, Dinner
- Nutritional breakdown
- Grocery list
",
        f.restrictions, f.health, f.activity, f.preference
    )
}

fn nutrition_prompt(item: &str) -> String {
    format!(
        "Provide detailed nutritional analysis for: {}

Include:

1. Macronutrients:
   - Protein (grams)
   - Carbohydrates (grams)
   - Fats (grams)

2. Micronutrients:
   - Vitamins
   - Minerals

3. Total Estimated Calories

4. Health Benefits

5. Possible Health Risks (if consumed excessively)
",
        item
    )
}

fn coaching_prompt(f: &CoachingFields) -> String {
    format!(
        "Act as a certified nutritionist.

Answer this question in detail:
{}

Provide scientific explanation and practical advice.
",
        f.question
    )
}

/// Runs one action for a session. The nutrition log is only appended after the
/// completion call succeeded.
#[instrument(skip(st, request), fields(mode = ?request.mode()))]
pub async fn ask(
    st: &AppState,
    session_id: Uuid,
    request: &PromptRequest,
) -> Result<AskResponse, AskError> {
    if !st.sessions.contains(session_id) {
        return Err(AskError::UnknownSession(session_id));
    }

    let prompt = build_prompt(request);
    let result = st.completer.complete(SYSTEM_PROMPT, &prompt.text).await?;

    let nutrition_log = match &prompt.item {
        Some(item) => {
            let log = st
                .sessions
                .record_lookup(session_id, item)
                .ok_or(AskError::UnknownSession(session_id))?;
            if let Some(last) = log.last() {
                info!(%session_id, entry = %last, "nutrition lookup recorded");
            }
            Some(log)
        }
        None => None,
    };

    info!(%session_id, model = %st.config.llm.model, result_len = result.len(), "completion delivered");
    Ok(AskResponse {
        mode: prompt.mode,
        heading: prompt.mode.heading(),
        item: prompt.item,
        result,
        nutrition_log,
    })
}
