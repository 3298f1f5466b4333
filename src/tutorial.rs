//! Tutorial sequencer
//!
//! A fixed, ordered list of steps. Steps with a target action advance once
//! the player performs it; the rest advance only on an explicit continue.

use serde::{Deserialize, Serialize};

/// Player action a tutorial step waits for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TutorialAction {
    MoveLeft,
    MoveRight,
    Jump,
    ClassifyCorrect,
}

impl TutorialAction {
    /// Delay between performing the action and moving to the next step
    pub fn advance_delay(&self) -> f64 {
        match self {
            TutorialAction::Jump => 0.8,
            _ => 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorialStep {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub instruction: &'static str,
    pub target_action: Option<TutorialAction>,
    pub completion_message: Option<&'static str>,
}

pub static TUTORIAL_STEPS: [TutorialStep; 6] = [
    TutorialStep {
        id: "welcome",
        title: "Welcome to EcoRunner!",
        description: "You will learn to sort waste and help the environment.",
        instruction: "Read the information and press \"Continue\"",
        target_action: None,
        completion_message: None,
    },
    TutorialStep {
        id: "move-left",
        title: "Lane movement",
        description: "Use the arrow keys or A/D to switch lanes.",
        instruction: "Move your runner to the left",
        target_action: Some(TutorialAction::MoveLeft),
        completion_message: Some("Nice! Now try moving right"),
    },
    TutorialStep {
        id: "move-right",
        title: "Lane movement",
        description: "Every lane leads to a different container.",
        instruction: "Move your runner to the right",
        target_action: Some(TutorialAction::MoveRight),
        completion_message: Some("Great, you can reach every lane"),
    },
    TutorialStep {
        id: "jumping",
        title: "Jump and sort",
        description: "Press SPACE near the containers to jump and sort your item.",
        instruction: "Press SPACE to jump",
        target_action: Some(TutorialAction::Jump),
        completion_message: Some("Excellent! Jumping at a container sorts your item."),
    },
    TutorialStep {
        id: "trash-types",
        title: "Containers and colors",
        description: "Left to right: glass (green), organic (brown), paper (blue), plastic (yellow).",
        instruction: "Memorize which color takes which waste",
        target_action: None,
        completion_message: None,
    },
    TutorialStep {
        id: "classification",
        title: "Sort correctly",
        description: "Move to the lane of the right container before you reach it.",
        instruction: "Sort the item shown on screen correctly",
        target_action: Some(TutorialAction::ClassifyCorrect),
        completion_message: Some("Perfect! You know how to recycle."),
    },
];

/// Result of moving the sequencer forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorialProgress {
    /// Now on the step with this index
    Step(usize),
    /// Ran past the last step
    Completed,
}

/// Position in the tutorial
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tutorial {
    index: usize,
    completed: bool,
    /// Target action already satisfied, advance pending
    #[serde(skip)]
    satisfied: bool,
}

impl Tutorial {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart from the first step
    pub fn reset(&mut self) {
        self.index = 0;
        self.satisfied = false;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn current(&self) -> Option<&'static TutorialStep> {
        TUTORIAL_STEPS.get(self.index)
    }

    /// Move to the next step, completing the tutorial past the end
    pub fn advance(&mut self) -> TutorialProgress {
        self.satisfied = false;
        let next = self.index + 1;
        if next >= TUTORIAL_STEPS.len() {
            self.index = TUTORIAL_STEPS.len();
            self.completed = true;
            return TutorialProgress::Completed;
        }
        self.index = next;
        TutorialProgress::Step(next)
    }

    /// Skip whatever is left
    pub fn finish(&mut self) {
        self.index = TUTORIAL_STEPS.len();
        self.completed = true;
        self.satisfied = false;
    }

    /// Record a player action; returns the satisfied step the first time the
    /// current step's target action is performed
    pub fn observe(&mut self, action: TutorialAction) -> Option<&'static TutorialStep> {
        if self.satisfied {
            return None;
        }
        let step = self.current()?;
        if step.target_action == Some(action) {
            self.satisfied = true;
            Some(step)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_welcome() {
        let tutorial = Tutorial::new();
        assert_eq!(tutorial.current().map(|s| s.id), Some("welcome"));
        assert!(!tutorial.is_completed());
    }

    #[test]
    fn test_advance_to_completion() {
        let mut tutorial = Tutorial::new();
        for expected in 1..TUTORIAL_STEPS.len() {
            assert_eq!(tutorial.advance(), TutorialProgress::Step(expected));
        }
        assert_eq!(tutorial.advance(), TutorialProgress::Completed);
        assert!(tutorial.is_completed());
        assert!(tutorial.current().is_none());
    }

    #[test]
    fn test_observe_matches_target_once() {
        let mut tutorial = Tutorial::new();
        // Welcome has no target action
        assert!(tutorial.observe(TutorialAction::MoveLeft).is_none());

        tutorial.advance();
        assert!(tutorial.observe(TutorialAction::Jump).is_none());
        let step = tutorial.observe(TutorialAction::MoveLeft);
        assert_eq!(step.map(|s| s.id), Some("move-left"));
        // Already satisfied until the step advances
        assert!(tutorial.observe(TutorialAction::MoveLeft).is_none());

        tutorial.advance();
        assert!(tutorial.observe(TutorialAction::MoveRight).is_some());
    }

    #[test]
    fn test_reset_keeps_completion_flag() {
        let mut tutorial = Tutorial::new();
        while tutorial.advance() != TutorialProgress::Completed {}
        tutorial.reset();
        assert_eq!(tutorial.index(), 0);
        assert!(tutorial.is_completed());
    }

    #[test]
    fn test_jump_advances_faster() {
        assert!(TutorialAction::Jump.advance_delay() < TutorialAction::MoveLeft.advance_delay());
    }

    #[test]
    fn test_finish_skips_remaining_steps() {
        let mut tutorial = Tutorial::new();
        tutorial.advance();
        tutorial.finish();
        assert!(tutorial.is_completed());
        assert!(tutorial.current().is_none());
        assert_eq!(tutorial.index(), TUTORIAL_STEPS.len());
    }
}
