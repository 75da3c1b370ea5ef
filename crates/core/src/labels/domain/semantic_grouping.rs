use crate::labels::domain::remap::RemapTable;
use crate::shared::label_map::Label;
use crate::shared::part_vocabulary::{part_id, VocabularyError};

/// Named groups of DensePose part names, in insertion order.
///
/// Compiled into a [`RemapTable`] against an ordered list of group names;
/// a group's position in that list becomes its new label.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SemanticGrouping {
    groups: Vec<(String, Vec<String>)>,
}

impl SemanticGrouping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a group.
    pub fn with_group(mut self, name: &str, parts: &[&str]) -> Self {
        let parts: Vec<String> = parts.iter().map(|p| p.to_string()).collect();
        match self.groups.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = parts,
            None => self.groups.push((name.to_string(), parts)),
        }
        self
    }

    pub fn group_names(&self) -> Vec<&str> {
        self.groups.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn parts_of(&self, name: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, parts)| parts.as_slice())
    }

    /// Resolves old part names through the vocabulary and new names to their
    /// index in `new_part_list`.
    ///
    /// When an old part appears under several groups, the group listed later
    /// in `new_part_list` wins.
    pub fn to_remap_table(&self, new_part_list: &[&str]) -> Result<RemapTable, VocabularyError> {
        let mut table = RemapTable::new();
        for (new_id, new_name) in new_part_list.iter().enumerate() {
            let old_parts = self
                .parts_of(new_name)
                .ok_or_else(|| VocabularyError::UnknownGroup(new_name.to_string()))?;
            for old in old_parts {
                table.insert(part_id(old)?, new_id as Label);
            }
        }
        log::debug!(
            "Compiled {} groups into a remap table of {} entries",
            new_part_list.len(),
            table.len()
        );
        Ok(table)
    }
}

/// Coarse body regions over the 24 DensePose parts, background first so it
/// keeps label 0.
pub fn coarse_body_grouping() -> SemanticGrouping {
    SemanticGrouping::new()
        .with_group("background", &["background"])
        .with_group("back", &["back"])
        .with_group("chest", &["chest"])
        .with_group("hand", &["right_hand", "left_hand"])
        .with_group("foot", &["left_foot", "right_foot"])
        .with_group(
            "leg",
            &[
                "back_upper_front_leg",
                "back_upper_left_leg",
                "right_upper_leg",
                "left_upper_leg",
                "back_right_lower_leg",
                "back_left_lower_leg",
                "right_lower_leg",
                "left_lower_leg",
            ],
        )
        .with_group(
            "arm",
            &[
                "left_upper_arm1",
                "right_upper_arm1",
                "left_upper_arm2",
                "right_upper_arm2",
                "left_lower_arm1",
                "right_lower_arm1",
                "left_lower_arm2",
                "right_lower_arm2",
            ],
        )
        .with_group("head", &["left_head", "right_head"])
}
