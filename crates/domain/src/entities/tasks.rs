//! Daily task checklist.
//!
//! Wizards get a level-derived list of reminders each day; any class can add
//! its own tasks. Completion of custom tasks resets on a long rest.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::game_systems::CharacterClass;
use crate::value_objects::CharacterLevel;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTask {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    /// Level-derived tasks are regenerated and cannot be toggled or removed.
    #[serde(default, skip_serializing)]
    pub derived: bool,
}

impl DailyTask {
    fn derived(text: impl Into<String>, completed: bool) -> Self {
        Self {
            text: text.into(),
            completed,
            derived: true,
        }
    }
}

/// User-added tasks and their completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskChecklist {
    custom: Vec<DailyTask>,
}

impl TaskChecklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn custom(&self) -> &[DailyTask] {
        &self.custom
    }

    /// # Errors
    ///
    /// `DomainError::Validation` for blank text.
    pub fn add_task(&mut self, text: impl Into<String>) -> Result<(), DomainError> {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(DomainError::validation("Task text cannot be empty"));
        }
        self.custom.push(DailyTask {
            text,
            completed: false,
            derived: false,
        });
        Ok(())
    }

    /// Flip a custom task. Returns the new completion state.
    pub fn toggle_task(&mut self, index: usize) -> Result<bool, DomainError> {
        let task = self
            .custom
            .get_mut(index)
            .ok_or_else(|| DomainError::not_found("Task", index.to_string()))?;
        task.completed = !task.completed;
        Ok(task.completed)
    }

    pub fn remove_task(&mut self, index: usize) -> Result<DailyTask, DomainError> {
        if index >= self.custom.len() {
            return Err(DomainError::not_found("Task", index.to_string()));
        }
        Ok(self.custom.remove(index))
    }

    /// Clear completion on every task.
    pub fn reset(&mut self) {
        for task in &mut self.custom {
            task.completed = false;
        }
    }
}

/// Full checklist for the day: wizard reminders first, then custom tasks.
///
/// Non-wizard classes only see their custom tasks.
pub fn daily_tasks(
    class: CharacterClass,
    level: CharacterLevel,
    arcane_recovery_used: bool,
    subclass: &str,
    checklist: &TaskChecklist,
) -> Vec<DailyTask> {
    let mut tasks = Vec::new();
    if class == CharacterClass::Wizard {
        let level = level.value();
        tasks.push(DailyTask::derived(
            "Prepare spells (INT mod + Wizard level)",
            false,
        ));
        tasks.push(DailyTask::derived(
            "Copy new spells into spellbook (50gp and 2 hours per spell level)",
            false,
        ));
        tasks.push(DailyTask::derived(
            "Check Arcane Recovery (once per day after short rest)",
            arcane_recovery_used,
        ));
        if level >= 2 {
            tasks.push(DailyTask::derived(
                format!("Use Arcane Tradition: {} features", subclass),
                false,
            ));
        }
        if level >= 10 {
            tasks.push(DailyTask::derived(
                "Consider using Arcane Tradition capstone abilities",
                false,
            ));
        }
        if level >= 18 {
            tasks.push(DailyTask::derived(
                "Use Spell Mastery for free 1st and 2nd level spells",
                false,
            ));
        }
        if level >= 20 {
            tasks.push(DailyTask::derived(
                "Use Signature Spells for free 3rd level spells (1/rest)",
                false,
            ));
        }
    }
    tasks.extend(checklist.custom.iter().cloned());
    tasks
}
