//! Intake - the two questions asked before the first generation.

/// Answers used when the user skips the intake.
pub const DEFAULT_SITUATION: &str = "Default situation";
pub const DEFAULT_ACTION: &str = "Default action";

/// One intake question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeQuestion {
    Situation,
    Action,
}

impl IntakeQuestion {
    pub fn prompt(&self) -> &'static str {
        match self {
            IntakeQuestion::Situation => "Set the scene",
            IntakeQuestion::Action => "Your Move.",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            IntakeQuestion::Situation => {
                "Describe your current situation or environment. This context helps us tailor our assistance."
            }
            IntakeQuestion::Action => {
                "Given your situation, what's the first step or course of action you plan to take?"
            }
        }
    }
}

/// Where the intake stands after an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeProgress {
    /// Ask this question next.
    Ask(IntakeQuestion),
    /// Both answers are in.
    Ready { situation: String, action: String },
}

/// Collects the situation and the first action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Intake {
    situation: Option<String>,
    action: Option<String>,
}

impl Intake {
    pub fn new() -> Self {
        Self::default()
    }

    /// The question awaiting an answer, or `None` once both are answered.
    pub fn current(&self) -> Option<IntakeQuestion> {
        match (&self.situation, &self.action) {
            (None, _) => Some(IntakeQuestion::Situation),
            (Some(_), None) => Some(IntakeQuestion::Action),
            (Some(_), Some(_)) => None,
        }
    }

    /// Records the answer to the current question.
    ///
    /// Answering after completion replaces the action.
    pub fn answer(&mut self, text: impl Into<String>) -> IntakeProgress {
        let text = text.into();
        match self.current() {
            Some(IntakeQuestion::Situation) => self.situation = Some(text),
            Some(IntakeQuestion::Action) | None => self.action = Some(text),
        }
        self.progress()
    }

    /// Fills both answers with the defaults.
    pub fn skip(&mut self) -> IntakeProgress {
        self.situation = Some(DEFAULT_SITUATION.to_string());
        self.action = Some(DEFAULT_ACTION.to_string());
        self.progress()
    }

    /// Forgets the action so it is asked again; the situation is kept.
    pub fn retry_action(&mut self) -> IntakeProgress {
        self.action = None;
        self.progress()
    }

    pub fn situation(&self) -> Option<&str> {
        self.situation.as_deref()
    }

    fn progress(&self) -> IntakeProgress {
        match (&self.situation, &self.action) {
            (Some(situation), Some(action)) => IntakeProgress::Ready {
                situation: situation.clone(),
                action: action.clone(),
            },
            _ => IntakeProgress::Ask(self.current().unwrap_or(IntakeQuestion::Situation)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asks_situation_then_action() {
        let mut intake = Intake::new();
        assert_eq!(intake.current(), Some(IntakeQuestion::Situation));

        assert_eq!(intake.answer("lost in a maze"), IntakeProgress::Ask(IntakeQuestion::Action));
        assert_eq!(
            intake.answer("go left"),
            IntakeProgress::Ready {
                situation: "lost in a maze".to_string(),
                action: "go left".to_string(),
            }
        );
        assert_eq!(intake.current(), None);
    }

    #[test]
    fn skip_uses_defaults() {
        let mut intake = Intake::new();
        assert_eq!(
            intake.skip(),
            IntakeProgress::Ready {
                situation: DEFAULT_SITUATION.to_string(),
                action: DEFAULT_ACTION.to_string(),
            }
        );
    }

    #[test]
    fn retry_action_keeps_the_situation() {
        let mut intake = Intake::new();
        intake.answer("lost in a maze");
        intake.answer("go left");

        assert_eq!(intake.retry_action(), IntakeProgress::Ask(IntakeQuestion::Action));
        assert_eq!(intake.situation(), Some("lost in a maze"));
        assert_eq!(
            intake.answer("go right"),
            IntakeProgress::Ready {
                situation: "lost in a maze".to_string(),
                action: "go right".to_string(),
            }
        );
    }

    #[test]
    fn prompts_match_questions() {
        assert_eq!(IntakeQuestion::Situation.prompt(), "Set the scene");
        assert_eq!(IntakeQuestion::Action.prompt(), "Your Move.");
    }
}
