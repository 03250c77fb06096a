//! Instruction screen catalogue and sequencer

use serde::Serialize;

use crate::state::{FeedbackMode, OpStatus};

/// Which configurations an instruction screen is shown to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Audience {
    All,
    FeedbackWith,
    FeedbackWithout,
}

impl Audience {
    fn admits(self, mode: FeedbackMode) -> bool {
        match self {
            Audience::All => true,
            Audience::FeedbackWith => mode == FeedbackMode::With,
            Audience::FeedbackWithout => mode == FeedbackMode::Without,
        }
    }
}

/// One instruction screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct InstructionItem {
    pub slug: &'static str,
    pub body: &'static str,
    pub audience: Audience,
}

/// The fixed, ordered catalogue of instruction screens.
pub fn default_catalogue() -> Vec<InstructionItem> {
    vec![
        InstructionItem {
            slug: "welcome",
            body: "You will play ten rounds with a partner. Each of you has \
                   two doors; one of each pair hides a prize.",
            audience: Audience::All,
        },
        InstructionItem {
            slug: "message-step",
            body: "Each round starts with you suggesting which of your \
                   partner's doors they should open. Your suggestion is not \
                   binding.",
            audience: Audience::All,
        },
        InstructionItem {
            slug: "choice-step",
            body: "Your partner then suggests one of your doors. After seeing \
                   their suggestion, you pick a door to open.",
            audience: Audience::All,
        },
        InstructionItem {
            slug: "payoffs",
            body: "If you both open your prize door, each of you earns 75 \
                   Units. If only one of you does, that person earns 100 Units \
                   and the other earns nothing.",
            audience: Audience::All,
        },
        InstructionItem {
            slug: "feedback-shown",
            body: "After every round you will see which doors were opened and \
                   what you earned.",
            audience: Audience::FeedbackWith,
        },
        InstructionItem {
            slug: "feedback-hidden",
            body: "You will not see round results while you play; your \
                   earnings are revealed after the final survey.",
            audience: Audience::FeedbackWithout,
        },
        InstructionItem {
            slug: "ready",
            body: "When you are ready, begin the game.",
            audience: Audience::All,
        },
    ]
}

/// Forward-only walk through the instruction screens active for a
/// configuration.
///
/// Built once config is known: the catalogue is filtered to items tagged
/// for all runs or for the run's feedback mode, preserving catalogue
/// order. No backward navigation.
#[derive(Clone, Debug)]
pub struct InstructionSequencer {
    items: Vec<InstructionItem>,
    current: usize,
}

impl InstructionSequencer {
    pub fn new(catalogue: Vec<InstructionItem>, mode: FeedbackMode) -> Self {
        let items = catalogue
            .into_iter()
            .filter(|item| item.audience.admits(mode))
            .collect();
        Self { items, current: 0 }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn current(&self) -> Option<&InstructionItem> {
        self.items.get(self.current)
    }

    /// True on the final screen; reaching it signals readiness to start
    /// the game.
    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.items.len()
    }

    /// Step forward one screen. A no-op at the last screen.
    pub fn advance(&mut self) -> OpStatus {
        if self.is_last() {
            return OpStatus::Ignored;
        }
        self.current += 1;
        OpStatus::Applied
    }
}
