//! The generation prompt.
//!
//! One user turn carries the whole request: the client profile rendered as
//! labelled lines, then the six sections the renderer knows how to lay out.
//! The section names and the `DAY n:` / `**Recipe Name**` conventions asked
//! for here are exactly the shapes [`crate::pipeline::classify`] recognises,
//! so edits to one usually need the other.

use crate::profile::ClientProfile;
use std::fmt::Write as _;

fn list_or(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}

fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Build the full generation prompt for a profile.
pub fn build_nutrition_prompt(p: &ClientProfile) -> String {
    let days = p.plan_duration_days;
    let budget = p.budget_label();
    let mut s = String::with_capacity(6 * 1024);

    s.push_str(
        "You are an expert nutritionist and meal planning specialist. Create a comprehensive, \
         personalised nutrition plan based on the following client information.\n\n\
         IMPORTANT: Use British English spelling throughout (optimise, colour, fibre, etc.) \
         and UK currency (£).\n\n",
    );

    let _ = writeln!(s, "CLIENT PROFILE:");
    let _ = writeln!(s, "- Name: {}", p.name);
    let _ = writeln!(s, "- Age: {}, Gender: {}", p.age, p.gender);
    let _ = writeln!(s, "- Height: {}", p.height);
    let _ = writeln!(s, "- Current Weight: {}", p.current_weight);
    let _ = writeln!(s, "- Ideal Weight: {}", p.ideal_weight);
    let _ = writeln!(s, "- Activity Level: {}\n", p.activity_level);

    let _ = writeln!(s, "GOALS:");
    let _ = writeln!(s, "- Primary Goal: {}", p.goal);
    let _ = writeln!(
        s,
        "- CRITICAL: Muscle preservation is paramount. Calculate protein targets to maintain lean muscle mass."
    );
    let _ = writeln!(
        s,
        "- Calculate optimal daily calories to reach their ideal weight healthily\n"
    );

    let _ = writeln!(s, "DIETARY REQUIREMENTS:");
    let _ = writeln!(s, "- Diet Type: {}", p.diet_type);
    let _ = writeln!(s, "- Allergies: {}", list_or(&p.allergies, "None"));
    let _ = writeln!(s, "- Foods to Avoid: {}", list_or(&p.dislikes, "None"));
    let _ = writeln!(
        s,
        "- Cuisine Preferences: {}\n",
        list_or(&p.cuisine_preferences, "Varied")
    );

    let _ = writeln!(s, "PRACTICAL CONSTRAINTS:");
    let _ = writeln!(s, "- Weekly Budget: {budget}");
    let _ = writeln!(s, "- Cooking Skill: {}", p.cooking_skill);
    let _ = writeln!(
        s,
        "- Available Prep Time: {} minutes per day",
        p.prep_time_minutes
    );
    let _ = writeln!(s, "- Meals Per Day: {}", p.meals_per_day);
    let _ = writeln!(s, "- Plan Duration: {days} days");
    let _ = writeln!(s, "- Meal Prep Style: {}\n", p.meal_prep_style);

    s.push_str("Please create a comprehensive nutrition plan that includes:\n\n");

    s.push_str(
        "1. **NUTRITIONAL ANALYSIS**\n\
         \x20  - Calculate optimal daily calories based on their current weight, ideal weight, and activity level\n\
         \x20  - Recommended macro split (protein/carbs/fats in grams and percentages)\n\
         \x20  - Prioritise protein to preserve muscle mass (minimum 1.6-2.2g per kg of bodyweight)\n\
         \x20  - Clear explanation of the nutritional strategy and why it works for their goals\n\
         \x20  - Context about their journey and what to expect\n\n",
    );

    let _ = write!(
        s,
        "2. **{days}-DAY MEAL PLAN**\n\
         \x20  - Complete meal plan for {days} days\n\
         \x20  - Format each day clearly with \"DAY 1:\", \"DAY 2:\", etc. as headers\n\
         \x20  - Each day should include all meals (breakfast, lunch, dinner, snacks as needed)\n\
         \x20  - Include portion sizes and estimated calories/macros per meal\n\
         \x20  - Keep recipes within their cooking skill level and time constraints\n\
         \x20  - Consider budget constraints\n\
         \x20  - Use British spelling and terminology\n\n"
    );

    s.push_str(
        "3. **RECIPES**\n\
         \x20  - Detailed recipes for each unique meal mentioned in the meal plan\n\
         \x20  - Clearly label each recipe with its name as a header (use ** for bold)\n\
         \x20  - Ingredients with quantities (use metric where possible)\n\
         \x20  - Step-by-step cooking instructions\n\
         \x20  - Prep time and cook time\n\
         \x20  - Nutritional information (calories, protein, carbs, fats)\n\
         \x20  - Use British spelling (e.g., courgette not zucchini, aubergine not eggplant)\n\n",
    );

    let _ = write!(
        s,
        "4. **SHOPPING LIST**\n\
         \x20  - Organised by category (produce, proteins, dairy, pantry, etc.)\n\
         \x20  - Quantities needed for the full {days}-day plan\n\
         \x20  - Estimated cost breakdown to stay within {budget} budget\n\
         \x20  - Money-saving tips for staying within budget\n\
         \x20  - Use UK terminology and £ for prices\n\n"
    );

    let _ = write!(
        s,
        "5. **MEAL PREP GUIDE**\n\
         \x20  - {} meal prep strategy\n\
         \x20  - What to prep in advance to save time during the week\n\
         \x20  - Storage instructions and how long meals keep\n\
         \x20  - Reheating guidelines for best results\n\
         \x20  - Time-saving tips for efficient meal preparation\n\
         \x20  - Batch cooking suggestions\n\n",
        capitalise(&p.meal_prep_style.to_string())
    );

    s.push_str(
        "6. **ADDITIONAL TIPS & ADVICE**\n\
         \x20  - Hydration recommendations for optimal performance and recovery\n\
         \x20  - Supplement suggestions if appropriate for their goals (be specific and explain why)\n\
         \x20  - Tips for staying on track when eating out or socialising\n\
         \x20  - How to adjust portions if feeling too hungry or too full\n\
         \x20  - Signs of progress to look for beyond the scales\n\
         \x20  - Encouragement and motivation for staying consistent\n\
         \x20  - What to do if they have a \"bad\" day\n\n",
    );

    let _ = write!(
        s,
        "Make this plan practical, achievable, and tailored specifically to {}'s needs. \
         Use a warm, encouraging, and supportive tone throughout - this is a premium service \
         and should feel personalised and caring. Write as if you're speaking directly to them, \
         not about them. Use British English spelling throughout.",
        p.name
    );

    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Gender, MealPrepStyle};

    fn profile() -> ClientProfile {
        ClientProfile::builder("Priya Shah")
            .age(41)
            .gender(Gender::Female)
            .height("165cm")
            .current_weight("78kg")
            .ideal_weight("68kg")
            .allergies(vec!["peanuts".into(), "shellfish".into()])
            .budget("£70")
            .plan_duration_days(5)
            .meal_prep_style(MealPrepStyle::Batch)
            .build()
            .unwrap()
    }

    #[test]
    fn prompt_carries_profile_fields() {
        let prompt = build_nutrition_prompt(&profile());
        assert!(prompt.contains("- Name: Priya Shah"));
        assert!(prompt.contains("- Age: 41, Gender: F"));
        assert!(prompt.contains("- Allergies: peanuts, shellfish"));
        assert!(prompt.contains("- Foods to Avoid: None"));
        assert!(prompt.contains("- Cuisine Preferences: Varied"));
        assert!(prompt.contains("- Weekly Budget: £70"));
    }

    #[test]
    fn prompt_names_every_section_the_renderer_knows() {
        let prompt = build_nutrition_prompt(&profile());
        for section in [
            "**NUTRITIONAL ANALYSIS**",
            "**5-DAY MEAL PLAN**",
            "**RECIPES**",
            "**SHOPPING LIST**",
            "**MEAL PREP GUIDE**",
            "**ADDITIONAL TIPS & ADVICE**",
        ] {
            assert!(prompt.contains(section), "missing {section}");
        }
        assert!(prompt.contains("   - Batch meal prep strategy"));
        assert!(prompt.contains("\"DAY 1:\""));
    }

    #[test]
    fn flexible_budget_when_unset() {
        let p = ClientProfile::builder("A")
            .age(30)
            .gender(Gender::Male)
            .height("180cm")
            .current_weight("80kg")
            .ideal_weight("78kg")
            .build()
            .unwrap();
        assert!(build_nutrition_prompt(&p).contains("within Flexible budget"));
    }
}
