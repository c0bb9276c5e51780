//! State carried from one ordered case to the next

use crate::error::{HarnessError, HarnessResult};

/// Run-scoped fixture slot.
///
/// Written only by the listing case, read by edit and delete. Nothing is
/// stored before the first successful listing.
#[derive(Debug, Clone, Default)]
pub struct FixtureState {
    last_known_id: Option<String>,
}

impl FixtureState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id captured by the most recent listing
    pub fn last_known_id(&self) -> HarnessResult<&str> {
        self.last_known_id
            .as_deref()
            .ok_or(HarnessError::MissingFixture(
                "no idea id captured yet; get_all_ideas must run first",
            ))
    }

    pub fn peek(&self) -> Option<&str> {
        self.last_known_id.as_deref()
    }

    /// Overwrite the slot with the id of the last listed idea.
    ///
    /// `None` clears it, which is what happens when the last element carries
    /// no id.
    pub(crate) fn record_listed_id(&mut self, id: Option<String>) {
        self.last_known_id = id;
    }
}
