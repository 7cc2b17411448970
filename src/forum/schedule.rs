//! Topic publish/expiry gating.
//!
//! Topics are scheduled at calendar-day granularity: an optional publish date
//! before which the topic is hidden, and an optional expiry date at which it
//! locks. Visibility and interactivity are independent states; an expired
//! topic stays readable but refuses posts, likes, and comments.
//!
//! Boundary behavior is asymmetric and load-bearing: a topic publishing today
//! is visible today, while a topic expiring today is already locked today.

use chrono::NaiveDate;

/// A topic's schedule window. Absent dates mean "no constraint".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TopicWindow {
    pub publish: Option<NaiveDate>,
    pub expired: Option<NaiveDate>,
}

impl TopicWindow {
    pub fn new(publish: Option<NaiveDate>, expired: Option<NaiveDate>) -> Self {
        TopicWindow { publish, expired }
    }

    /// Whether the topic's content may be shown on `today`.
    ///
    /// Visible iff no publish date is set or the publish date has been
    /// reached (inclusive).
    pub fn is_visible(&self, today: NaiveDate) -> bool {
        match self.publish {
            Some(publish) => publish <= today,
            None => true,
        }
    }

    /// Whether the topic has passed its expiry date on `today` (inclusive).
    pub fn is_locked(&self, today: NaiveDate) -> bool {
        match self.expired {
            Some(expired) => expired <= today,
            None => false,
        }
    }

    /// Whether mutation affordances (add post, like, comment) are permitted.
    ///
    /// Interactive iff visible and not locked.
    pub fn is_interactive(&self, today: NaiveDate) -> bool {
        self.is_visible(today) && !self.is_locked(today)
    }
}

/// Today's date in the local timezone, at calendar-day resolution.
pub fn today_local() -> NaiveDate {
    chrono::Local::now().date_naive()
}
