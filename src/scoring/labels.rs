//! Personality labels and description fragments.
//!
//! One label per primary category; descriptions are assembled from the
//! label blurb plus strength fragments for the top two categories.

use super::Category;

/// Label assigned when the given category scores highest.
pub fn label_for(primary: Category) -> &'static str {
    match primary {
        Category::Collaboration => "The Team Builder",
        Category::Communication => "The Storyteller",
        Category::Creativity => "The Imaginative Explorer",
        Category::CriticalThinking => "The Curious Analyst",
        Category::Character => "The Steady Achiever",
        Category::Citizenship => "The Community Helper",
    }
}

/// Opening sentence keyed by the label's primary category.
fn blurb(primary: Category) -> &'static str {
    match primary {
        Category::Collaboration => {
            "This child comes alive around other people and learns best through shared work and play."
        }
        Category::Communication => {
            "This child loves to put experiences into words and connects with others through conversation."
        }
        Category::Creativity => {
            "This child sees possibilities everywhere and learns best when there is room to invent."
        }
        Category::CriticalThinking => {
            "This child wants to know how things work and enjoys puzzling ideas out step by step."
        }
        Category::Character => {
            "This child brings quiet determination to whatever they take on and keeps going when things get hard."
        }
        Category::Citizenship => {
            "This child pays close attention to the people around them and wants to make things better for everyone."
        }
    }
}

/// Short noun-phrase fragment naming a category strength.
fn strength(category: Category) -> &'static str {
    match category {
        Category::Collaboration => "working with others",
        Category::Communication => "expressing ideas",
        Category::Creativity => "imagining new possibilities",
        Category::CriticalThinking => "reasoning things through",
        Category::Character => "sticking with hard things",
        Category::Citizenship => "caring for the wider community",
    }
}

/// Assemble the profile description from the top two categories.
pub(super) fn describe(primary: Category, secondary: Category) -> String {
    format!(
        "{} Their strongest area is {}, closely followed by {}.",
        blurb(primary),
        strength(primary),
        strength(secondary)
    )
}
