use crate::models::{Priority, UserProfile, WeightVector};

/// Pure per-priority rule applied to the raw weight vector
pub type WeightAdjustment = fn(WeightVector) -> WeightVector;

/// Look up the adjustment rule for a priority
///
/// Priorities without a rule leave the weights untouched.
pub fn adjustment_for(priority: &Priority) -> Option<WeightAdjustment> {
    match priority {
        Priority::Price => Some(favor_price),
        Priority::Coverage => Some(favor_coverage),
        _ => None,
    }
}

fn favor_price(w: WeightVector) -> WeightVector {
    WeightVector {
        price: w.price + 0.15,
        coverage: w.coverage - 0.05,
        features: w.features - 0.05,
        demographics: w.demographics - 0.05,
        ..w
    }
}

fn favor_coverage(w: WeightVector) -> WeightVector {
    WeightVector {
        coverage: w.coverage + 0.15,
        price: w.price - 0.05,
        features: w.features - 0.05,
        demographics: w.demographics - 0.05,
        ..w
    }
}

/// Builds a normalized weight vector from a base and an ordered list of priorities
///
/// Intermediate weights are never clamped, so repeated priorities can push an
/// axis below zero before normalization.
#[derive(Debug, Clone, Copy)]
pub struct WeightBuilder {
    raw: WeightVector,
}

impl WeightBuilder {
    pub fn new(base: WeightVector) -> Self {
        Self { raw: base }
    }

    pub fn apply(self, priority: &Priority) -> Self {
        match adjustment_for(priority) {
            Some(rule) => Self { raw: rule(self.raw) },
            None => self,
        }
    }

    pub fn apply_all<'a, I>(self, priorities: I) -> Self
    where
        I: IntoIterator<Item = &'a Priority>,
    {
        priorities.into_iter().fold(self, |builder, p| builder.apply(p))
    }

    /// Weights after adjustment, before normalization
    pub fn raw(&self) -> WeightVector {
        self.raw
    }

    /// Divide every weight by the post-adjustment sum
    pub fn normalize(self) -> WeightVector {
        let sum = self.raw.sum();
        if !sum.is_finite() || sum.abs() < f64::EPSILON {
            tracing::warn!("Degenerate weight sum {}, falling back to defaults", sum);
            return WeightVector::default();
        }

        WeightVector {
            coverage: self.raw.coverage / sum,
            price: self.raw.price / sum,
            features: self.raw.features / sum,
            demographics: self.raw.demographics / sum,
            priorities: self.raw.priorities / sum,
        }
    }
}

/// Weights for a profile starting from `base`
pub fn weights_for_profile(base: WeightVector, profile: &UserProfile) -> WeightVector {
    WeightBuilder::new(base)
        .apply_all(&profile.priorities)
        .normalize()
}
