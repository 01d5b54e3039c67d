// ABOUTME: Locally synthesized workout plans used when no provider call is possible or one fails
// ABOUTME: Warm-up, main, and cool-down blocks chosen from focus, equipment, and energy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use workout_core::constants::{defaults, sources};
use workout_core::errors::{AppError, AppResult};
use workout_core::models::{Energy, GenerationContext, LlmBlock, LlmExercise, LlmPlan, TodayPlan};

use crate::transform::{SchemaTransformer, TransformOutcome};

/// Broad movement focus the fallback library is organised by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FocusArea {
    Upper,
    Lower,
    Core,
    FullBody,
}

impl FocusArea {
    fn classify(focus: &str) -> Self {
        let focus = focus.to_lowercase();
        if ["upper", "push", "pull", "chest", "back", "arm", "shoulder"]
            .iter()
            .any(|k| focus.contains(k))
        {
            Self::Upper
        } else if ["lower", "leg", "glute", "hamstring", "quad"]
            .iter()
            .any(|k| focus.contains(k))
        {
            Self::Lower
        } else if ["core", "abs", "trunk"].iter().any(|k| focus.contains(k)) {
            Self::Core
        } else {
            Self::FullBody
        }
    }
}

/// Loaded implement available for the main block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Implement {
    Dumbbell,
    Kettlebell,
    Band,
    Bodyweight,
}

impl Implement {
    fn from_equipment(equipment: &[String]) -> Self {
        let has = |needle: &str| {
            equipment
                .iter()
                .any(|item| item.to_lowercase().contains(needle))
        };
        if has("dumbbell") {
            Self::Dumbbell
        } else if has("kettlebell") {
            Self::Kettlebell
        } else if has("band") {
            Self::Band
        } else {
            Self::Bodyweight
        }
    }
}

fn main_movements(area: FocusArea, implement: Implement) -> [&'static str; 3] {
    match (area, implement) {
        (FocusArea::Upper, Implement::Dumbbell) => {
            ["Dumbbell floor press", "One-arm dumbbell row", "Dumbbell shoulder press"]
        }
        (FocusArea::Upper, Implement::Kettlebell) => {
            ["Kettlebell floor press", "Kettlebell row", "Kettlebell halo"]
        }
        (FocusArea::Upper, Implement::Band) => ["Band chest press", "Band row", "Band pull-apart"],
        (FocusArea::Upper, Implement::Bodyweight) => ["Push-up", "Pike push-up", "Towel row"],
        (FocusArea::Lower, Implement::Dumbbell) => {
            ["Goblet squat", "Dumbbell Romanian deadlift", "Dumbbell reverse lunge"]
        }
        (FocusArea::Lower, Implement::Kettlebell) => {
            ["Kettlebell goblet squat", "Kettlebell swing", "Kettlebell split squat"]
        }
        (FocusArea::Lower, Implement::Band) => ["Banded squat", "Band good morning", "Banded glute bridge"],
        (FocusArea::Lower, Implement::Bodyweight) => ["Air squat", "Reverse lunge", "Glute bridge"],
        (FocusArea::Core, Implement::Dumbbell) => {
            ["Dumbbell dead bug", "Suitcase carry", "Renegade row"]
        }
        (FocusArea::Core, Implement::Kettlebell) => {
            ["Kettlebell pullover", "Suitcase carry", "Kettlebell windmill"]
        }
        (FocusArea::Core, Implement::Band) => ["Pallof press", "Band woodchop", "Dead bug"],
        (FocusArea::Core, Implement::Bodyweight) => ["Plank", "Dead bug", "Side plank"],
        (FocusArea::FullBody, Implement::Dumbbell) => {
            ["Goblet squat", "One-arm dumbbell row", "Dumbbell thruster"]
        }
        (FocusArea::FullBody, Implement::Kettlebell) => {
            ["Kettlebell swing", "Kettlebell goblet squat", "Kettlebell push press"]
        }
        (FocusArea::FullBody, Implement::Band) => ["Banded squat", "Band row", "Band chest press"],
        (FocusArea::FullBody, Implement::Bodyweight) => ["Air squat", "Push-up", "Reverse lunge"],
    }
}

const fn prescription(energy: Energy) -> &'static str {
    match energy {
        Energy::Easy => "2 x 8",
        Energy::Moderate => "3 x 10",
        Energy::Intense => "4 x 12",
    }
}

const fn rest_cue(energy: Energy) -> &'static str {
    match energy {
        Energy::Easy => "Rest 90 s between sets.",
        Energy::Moderate => "Rest 60 s between sets.",
        Energy::Intense => "Rest 30 s between sets.",
    }
}

/// Split a session into warm-up, main, and cool-down minutes
///
/// Sessions under three minutes get a single main block.
fn split_minutes(total: u32) -> Vec<(&'static str, u32)> {
    if total < 3 {
        return vec![("Main set", total.max(1))];
    }
    let warm_up = (total.saturating_mul(15) / 100).max(1);
    let cool_down = (total / 10).max(1);
    vec![
        ("Warm-up", warm_up),
        ("Main set", total - warm_up - cool_down),
        ("Cool-down", cool_down),
    ]
}

/// Loose fallback plan for a merged generation context
#[must_use]
pub fn build_fallback_plan(context: &GenerationContext) -> LlmPlan {
    let duration = context
        .environment
        .time_minutes
        .filter(|minutes| *minutes > 0)
        .unwrap_or(defaults::WORKOUT_MINUTES);
    let focus = context
        .preferences
        .focus_bias
        .as_deref()
        .map(str::trim)
        .filter(|focus| !focus.is_empty())
        .unwrap_or(defaults::WORKOUT_FOCUS)
        .to_owned();
    let equipment = if context.environment.equipment.is_empty() {
        vec![defaults::WORKOUT_EQUIPMENT.to_owned()]
    } else {
        context.environment.equipment.clone()
    };
    let energy = context.preferences.energy.unwrap_or_default();
    let area = FocusArea::classify(&focus);
    let implement = Implement::from_equipment(&equipment);

    let blocks = split_minutes(duration)
        .into_iter()
        .map(|(title, minutes)| {
            let exercises = match title {
                "Warm-up" => vec![
                    exercise("Jumping jacks", "2 x 30 s", None),
                    exercise("World's greatest stretch", "1 x 5 per side", None),
                ],
                "Cool-down" => vec![
                    exercise("Child's pose", "1 x 60 s", Some("Breathe slowly through the nose.")),
                    exercise("Hamstring stretch", "1 x 45 s per side", None),
                ],
                _ => main_movements(area, implement)
                    .into_iter()
                    .map(|name| exercise(name, prescription(energy), Some(rest_cue(energy))))
                    .collect(),
            };
            LlmBlock {
                title: title.to_owned(),
                duration_minutes: minutes,
                focus: if title == "Main set" {
                    focus.clone()
                } else {
                    "mobility".to_owned()
                },
                exercises,
            }
        })
        .collect();

    LlmPlan {
        summary: format!(
            "A {duration}-minute {focus} session at {energy} intensity built on the device. \
             Generate again later for a personalised plan."
        ),
        focus,
        duration_minutes: duration,
        equipment,
        source: sources::FALLBACK.to_owned(),
        energy,
        blocks,
    }
}

fn exercise(name: &str, prescription: &str, detail: Option<&str>) -> LlmExercise {
    LlmExercise {
        name: name.to_owned(),
        prescription: prescription.to_owned(),
        detail: detail.map(str::to_owned),
    }
}

/// Canonical fallback plan with fresh identifiers
///
/// # Errors
///
/// Returns an internal error if the built plan fails canonical validation.
pub fn fallback_today_plan(
    transformer: &SchemaTransformer,
    context: &GenerationContext,
) -> AppResult<TodayPlan> {
    match transformer.canonicalize(&build_fallback_plan(context)) {
        TransformOutcome::Success { plan, .. } => Ok(plan),
        TransformOutcome::Failure { error, .. } => Err(AppError::internal(format!(
            "Fallback plan failed validation: {error}"
        ))),
    }
}
