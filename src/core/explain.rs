use crate::models::{Plan, PlanType, Priority, UserProfile};

/// Deterministic explanation for a scored plan
///
/// The first sentence names the plan, provider and score. The second lists
/// the type-specific rationale followed by any priority clauses.
pub fn explain_match(plan: &Plan, match_score: u8, profile: &UserProfile) -> String {
    let mut explanation = format!(
        "{} from {} matches your {} insurance needs at {}%.",
        plan.name, plan.provider_name, plan.plan_type, match_score
    );

    let mut clauses: Vec<String> = Vec::new();
    if let Some(rationale) = type_rationale(plan, profile) {
        clauses.push(rationale);
    }
    for priority in &profile.priorities {
        if let Some(clause) = priority_clause(priority, plan, profile) {
            if !clauses.contains(&clause) {
                clauses.push(clause);
            }
        }
    }

    if !clauses.is_empty() {
        explanation.push(' ');
        explanation.push_str(&capitalize(&join_clauses(&clauses)));
        explanation.push('.');
    }

    explanation
}

fn type_rationale(plan: &Plan, profile: &UserProfile) -> Option<String> {
    match profile.plan_type {
        PlanType::Health => {
            let conditions: Vec<&str> = profile.declared_conditions().collect();
            Some(if conditions.is_empty() {
                "it offers comprehensive health coverage".to_string()
            } else if plan.has_feature_mentioning(&["pre-existing", "condition"]) {
                format!("it covers pre-existing conditions such as {}", conditions.join(", "))
            } else {
                format!("review how it handles your {} before enrolling", conditions.join(", "))
            })
        }
        PlanType::Life => Some(match (profile.age, profile.family_size) {
            (Some(age), Some(family)) => {
                format!("it is suited to someone aged {} supporting a family of {}", age, family)
            }
            (Some(age), None) => format!("it is suited to someone aged {}", age),
            (None, Some(family)) => format!("it is sized for a family of {}", family),
            (None, None) => "it provides dependable life coverage".to_string(),
        }),
        PlanType::Auto => Some(match profile.driving_record.as_deref() {
            Some(record) => format!("it is priced with your {} driving record in mind", record.to_lowercase()),
            None => "it provides reliable auto coverage".to_string(),
        }),
        PlanType::Home => Some(match profile.property_value {
            Some(value) => format!("it protects a property valued at {}", format_amount(value)),
            None => "it provides solid protection for your home".to_string(),
        }),
        PlanType::Other(_) => None,
    }
}

fn priority_clause(priority: &Priority, plan: &Plan, profile: &UserProfile) -> Option<String> {
    match priority {
        Priority::Price => Some(match profile.budget {
            Some(budget) if plan.price <= budget => {
                format!("it fits within your budget of {}", format_amount(budget))
            }
            _ => format!("it is competitively priced at {}", format_amount(plan.price)),
        }),
        Priority::Coverage => Some(format!(
            "it includes {} coverage feature{}",
            plan.feature_count(),
            if plan.feature_count() == 1 { "" } else { "s" }
        )),
        Priority::Network => Some("it gives you access to a broad provider network".to_string()),
        _ => None,
    }
}

fn join_clauses(clauses: &[String]) -> String {
    match clauses {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whole amounts print without decimals
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}
