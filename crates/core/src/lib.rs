#![forbid(unsafe_code)]

pub mod model {
    /// Board column an item currently lives in. Terminal state is `Done`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum Category {
        Pending,
        Scheduled,
        InProgress,
        Support,
        Cancelled,
        Done,
    }

    impl Category {
        pub fn as_str(self) -> &'static str {
            match self {
                Category::Pending => "pending",
                Category::Scheduled => "scheduled",
                Category::InProgress => "in_progress",
                Category::Support => "support",
                Category::Cancelled => "cancelled",
                Category::Done => "done",
            }
        }

        /// Accepts canonical names plus the column names earlier board
        /// generations persisted. Serialization is always canonical.
        pub fn parse(value: &str) -> Option<Self> {
            match value.trim() {
                "pending" | "lead" => Some(Category::Pending),
                "scheduled" => Some(Category::Scheduled),
                "in_progress" | "inNegotiation" | "in_negotiation" => Some(Category::InProgress),
                "support" | "prospect" => Some(Category::Support),
                "cancelled" | "closed" | "lost" => Some(Category::Cancelled),
                "done" => Some(Category::Done),
                _ => None,
            }
        }

        pub fn initial() -> Self {
            Category::Pending
        }

        pub fn is_terminal(self) -> bool {
            matches!(self, Category::Done)
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
    pub enum Urgency {
        Low,
        Normal,
        High,
        Critical,
    }

    impl Urgency {
        pub fn as_str(self) -> &'static str {
            match self {
                Urgency::Low => "low",
                Urgency::Normal => "normal",
                Urgency::High => "high",
                Urgency::Critical => "critical",
            }
        }

        pub fn parse(value: &str) -> Option<Self> {
            match value.trim() {
                "low" => Some(Urgency::Low),
                "normal" => Some(Urgency::Normal),
                "high" => Some(Urgency::High),
                "critical" => Some(Urgency::Critical),
                _ => None,
            }
        }
    }

    impl Default for Urgency {
        fn default() -> Self {
            Urgency::Normal
        }
    }

    pub const DEFAULT_SERVICE_TYPE: &str = "general";

    /// One board record. Timestamps are epoch milliseconds; `created_at_ms`
    /// is `None` only for rows that predate the column.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct Item {
        pub id: i64,
        pub title: String,
        pub description: String,
        pub category: Category,
        pub service_type: String,
        pub urgency: Urgency,
        pub scheduled_at_ms: Option<i64>,
        pub completed_by: Option<String>,
        pub created_at_ms: Option<i64>,
        pub completed_at_ms: Option<i64>,
    }

    impl Item {
        /// `completed_by` and `completed_at_ms` are a pair: both absent or
        /// both present.
        pub fn attestation_paired(&self) -> bool {
            self.completed_by.is_some() == self.completed_at_ms.is_some()
        }
    }
}

pub mod lifecycle {
    use super::model::{Category, Urgency};

    /// Explicit transition request. The caller decides which variant a
    /// payload means before invoking the engine; the engine never infers
    /// intent from optional-field presence.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Transition {
        Move {
            category: Category,
        },
        Conclude {
            attestor: String,
            at_ms: Option<i64>,
        },
        UpdateDetails {
            urgency: Option<Urgency>,
            scheduled_at_ms: Option<i64>,
        },
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum LifecycleError {
        EmptyTitle,
        InvalidAttestation,
        TerminalState,
        EmptyUpdate,
    }

    impl LifecycleError {
        pub fn code(&self) -> &'static str {
            match self {
                LifecycleError::EmptyTitle => "VALIDATION_FAILED",
                LifecycleError::InvalidAttestation => "INVALID_ATTESTATION",
                LifecycleError::TerminalState => "TERMINAL_STATE",
                LifecycleError::EmptyUpdate => "VALIDATION_FAILED",
            }
        }
    }

    impl std::fmt::Display for LifecycleError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Self::EmptyTitle => write!(f, "title must not be empty"),
                Self::InvalidAttestation => {
                    write!(f, "concluding requires a non-empty attestor name")
                }
                Self::TerminalState => write!(f, "item is concluded and cannot move"),
                Self::EmptyUpdate => write!(f, "update names no fields"),
            }
        }
    }

    impl std::error::Error for LifecycleError {}

    pub fn validate_create(title: &str) -> Result<(), LifecycleError> {
        if title.trim().is_empty() {
            return Err(LifecycleError::EmptyTitle);
        }
        Ok(())
    }

    /// Gate a transition against the item's current category.
    ///
    /// Concluded items are immutable for moves and re-concludes; detail
    /// updates stay allowed because they cannot touch the attestation pair.
    pub fn validate_transition(
        current: Category,
        transition: &Transition,
    ) -> Result<(), LifecycleError> {
        match transition {
            Transition::Move { category } => {
                if current.is_terminal() {
                    return Err(LifecycleError::TerminalState);
                }
                if category.is_terminal() {
                    // A plain move may not enter `done`; that path requires
                    // an attestor and is a Conclude.
                    return Err(LifecycleError::InvalidAttestation);
                }
                Ok(())
            }
            Transition::Conclude { attestor, .. } => {
                if current.is_terminal() {
                    return Err(LifecycleError::TerminalState);
                }
                if attestor.trim().is_empty() {
                    return Err(LifecycleError::InvalidAttestation);
                }
                Ok(())
            }
            Transition::UpdateDetails {
                urgency,
                scheduled_at_ms,
            } => {
                if urgency.is_none() && scheduled_at_ms.is_none() {
                    return Err(LifecycleError::EmptyUpdate);
                }
                Ok(())
            }
        }
    }
}
