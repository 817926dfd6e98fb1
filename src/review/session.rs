use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Logical clock of one learner in one course.
///
/// Advances at most once per calendar day of activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCounter {
    pub current_session: i64,
    pub last_session_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTick {
    pub counter: SessionCounter,
    pub is_new_session: bool,
}

impl SessionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records activity on `today`.
    ///
    /// A clock that moved backwards leaves the counter where it is.
    pub fn advance(&self, today: NaiveDate) -> SessionTick {
        match self.last_session_date {
            None => SessionTick {
                counter: SessionCounter {
                    current_session: self.current_session.max(0) + 1,
                    last_session_date: Some(today),
                },
                is_new_session: true,
            },
            Some(last) if today > last => SessionTick {
                counter: SessionCounter {
                    current_session: self.current_session.max(0) + 1,
                    last_session_date: Some(today),
                },
                is_new_session: true,
            },
            Some(last) => {
                if today < last {
                    tracing::warn!(%today, %last, "activity date before last session date, counter kept");
                }
                SessionTick {
                    counter: SessionCounter {
                        current_session: self.current_session.max(1),
                        ..*self
                    },
                    is_new_session: false,
                }
            }
        }
    }

    pub fn advance_today(&self) -> SessionTick {
        self.advance(Utc::now().date_naive())
    }

    pub fn is_first_session(&self) -> bool {
        self.current_session <= 1
    }
}
