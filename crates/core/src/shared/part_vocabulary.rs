use thiserror::Error;

use crate::shared::label_map::Label;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VocabularyError {
    #[error("unknown part name: {0}")]
    UnknownPart(String),
    #[error("no grouping defined for new part: {0}")]
    UnknownGroup(String),
}

/// DensePose part names, indexed by part ID.
pub const PART_NAMES: [&str; 25] = [
    "background",
    "back",
    "chest",
    "right_hand",
    "left_hand",
    "left_foot",
    "right_foot",
    "back_upper_front_leg",
    "back_upper_left_leg",
    "right_upper_leg",
    "left_upper_leg",
    "back_right_lower_leg",
    "back_left_lower_leg",
    "right_lower_leg",
    "left_lower_leg",
    "left_upper_arm1",
    "right_upper_arm1",
    "left_upper_arm2",
    "right_upper_arm2",
    "left_lower_arm1",
    "right_lower_arm1",
    "left_lower_arm2",
    "right_lower_arm2",
    "left_head",
    "right_head",
];

pub fn part_name(id: Label) -> Option<&'static str> {
    PART_NAMES.get(id as usize).copied()
}

pub fn part_id(name: &str) -> Result<Label, VocabularyError> {
    PART_NAMES
        .iter()
        .position(|p| *p == name)
        .map(|idx| idx as Label)
        .ok_or_else(|| VocabularyError::UnknownPart(name.to_string()))
}
