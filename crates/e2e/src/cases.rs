//! The ordered contract cases
//!
//! Each case sends exactly one request through the shared [`Session`] and
//! asserts once. Cases 3 and 4 depend on the id that case 2 leaves in the
//! [`FixtureState`], so the suite only makes sense in [`IdeaCase::ORDERED`].

use ideacenter_common::{
    messages, paths, ApiEnvelope, IdeaRecord, IDEA_ID_PARAM, KNOWN_ABSENT_IDEA_ID,
};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{HarnessError, HarnessResult};
use crate::fixture::FixtureState;
use crate::session::{ApiResponse, Session};

const BODY_SNIPPET_CHARS: usize = 200;

/// One case of the suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdeaCase {
    CreateIdeaWithRequiredFields,
    GetAllIdeas,
    EditExistingIdea,
    DeleteExistingIdea,
    CreateIdeaWithoutRequiredFields,
    EditNonExistingIdea,
    DeleteNonExistingIdea,
}

impl IdeaCase {
    /// Execution order. Not reorderable.
    pub const ORDERED: [IdeaCase; 7] = [
        IdeaCase::CreateIdeaWithRequiredFields,
        IdeaCase::GetAllIdeas,
        IdeaCase::EditExistingIdea,
        IdeaCase::DeleteExistingIdea,
        IdeaCase::CreateIdeaWithoutRequiredFields,
        IdeaCase::EditNonExistingIdea,
        IdeaCase::DeleteNonExistingIdea,
    ];

    /// 1-based position in the suite
    pub fn order(self) -> u32 {
        match self {
            IdeaCase::CreateIdeaWithRequiredFields => 1,
            IdeaCase::GetAllIdeas => 2,
            IdeaCase::EditExistingIdea => 3,
            IdeaCase::DeleteExistingIdea => 4,
            IdeaCase::CreateIdeaWithoutRequiredFields => 5,
            IdeaCase::EditNonExistingIdea => 6,
            IdeaCase::DeleteNonExistingIdea => 7,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            IdeaCase::CreateIdeaWithRequiredFields => "create_idea_with_required_fields",
            IdeaCase::GetAllIdeas => "get_all_ideas",
            IdeaCase::EditExistingIdea => "edit_existing_idea",
            IdeaCase::DeleteExistingIdea => "delete_existing_idea",
            IdeaCase::CreateIdeaWithoutRequiredFields => "create_idea_without_required_fields",
            IdeaCase::EditNonExistingIdea => "edit_non_existing_idea",
            IdeaCase::DeleteNonExistingIdea => "delete_non_existing_idea",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ORDERED.into_iter().find(|c| c.name() == name)
    }

    /// Cases that read the id captured by [`IdeaCase::GetAllIdeas`]
    pub fn reads_fixture(self) -> bool {
        matches!(self, IdeaCase::EditExistingIdea | IdeaCase::DeleteExistingIdea)
    }

    pub async fn execute(self, session: &Session, fixture: &mut FixtureState) -> HarnessResult<()> {
        debug!("Running case {} ({})", self.order(), self.name());
        match self {
            IdeaCase::CreateIdeaWithRequiredFields => create_with_required_fields(session).await,
            IdeaCase::GetAllIdeas => get_all_ideas(session, fixture).await,
            IdeaCase::EditExistingIdea => edit_existing(session, fixture).await,
            IdeaCase::DeleteExistingIdea => delete_existing(session, fixture).await,
            IdeaCase::CreateIdeaWithoutRequiredFields => create_without_required_fields(session).await,
            IdeaCase::EditNonExistingIdea => edit_non_existing(session).await,
            IdeaCase::DeleteNonExistingIdea => delete_non_existing(session).await,
        }
    }
}

impl std::fmt::Display for IdeaCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Body for case 1
pub fn new_idea() -> IdeaRecord {
    IdeaRecord::new("Test Idea", "Description").with_url("")
}

/// Body for case 3
pub fn edited_idea() -> IdeaRecord {
    IdeaRecord::new("Edited Idea", "This is an updated test idea description.").with_url("")
}

/// Body for case 5: blank required fields, no url
pub fn incomplete_idea() -> IdeaRecord {
    IdeaRecord::new("", "")
}

/// Body for case 6
pub fn edited_absent_idea() -> IdeaRecord {
    IdeaRecord::new(
        "Edited  Non-Existing Idea",
        "This is an unapdated test idea description for a non-existing idea.",
    )
    .with_url("")
}

async fn create_with_required_fields(session: &Session) -> HarnessResult<()> {
    let resp = session.post_json(paths::IDEA_CREATE, &new_idea()).await?;
    expect_status(&resp, StatusCode::OK)?;
    let envelope: ApiEnvelope = resp.json()?;
    expect_msg(&envelope, messages::CREATED)
}

async fn get_all_ideas(session: &Session, fixture: &mut FixtureState) -> HarnessResult<()> {
    let resp = session.get(paths::IDEA_ALL).await?;
    expect_status(&resp, StatusCode::OK)?;

    let ideas: Vec<ApiEnvelope> = resp.json()?;
    let last = ideas
        .last()
        .ok_or_else(|| HarnessError::AssertionFailed("expected a non-empty idea list".to_string()))?;

    // The last listed idea is taken as the one case 1 created; nothing here
    // checks that it really is.
    if last.id.is_none() {
        warn!("Last of {} listed ideas has no id", ideas.len());
    }
    fixture.record_listed_id(last.id.clone());
    debug!("Captured idea id {:?}", fixture.peek());
    Ok(())
}

async fn edit_existing(session: &Session, fixture: &FixtureState) -> HarnessResult<()> {
    let id = fixture.last_known_id()?;
    let resp = session
        .put_json(paths::IDEA_EDIT, &[(IDEA_ID_PARAM, id)], &edited_idea())
        .await?;
    expect_status(&resp, StatusCode::OK)?;
    let envelope: ApiEnvelope = resp.json()?;
    expect_msg(&envelope, messages::EDITED)
}

async fn delete_existing(session: &Session, fixture: &FixtureState) -> HarnessResult<()> {
    let id = fixture.last_known_id()?;
    let resp = session
        .delete(paths::IDEA_DELETE, &[(IDEA_ID_PARAM, id)])
        .await?;
    expect_status(&resp, StatusCode::OK)?;
    expect_body_contains(&resp, messages::DELETED)
}

async fn create_without_required_fields(session: &Session) -> HarnessResult<()> {
    let resp = session
        .post_json(paths::IDEA_CREATE, &incomplete_idea())
        .await?;
    expect_status(&resp, StatusCode::BAD_REQUEST)
}

async fn edit_non_existing(session: &Session) -> HarnessResult<()> {
    let resp = session
        .put_json(
            paths::IDEA_EDIT,
            &[(IDEA_ID_PARAM, KNOWN_ABSENT_IDEA_ID)],
            &edited_absent_idea(),
        )
        .await?;
    expect_status(&resp, StatusCode::BAD_REQUEST)?;
    expect_body_contains(&resp, messages::NO_SUCH_IDEA)
}

async fn delete_non_existing(session: &Session) -> HarnessResult<()> {
    let resp = session
        .delete(paths::IDEA_DELETE, &[(IDEA_ID_PARAM, KNOWN_ABSENT_IDEA_ID)])
        .await?;
    expect_status(&resp, StatusCode::BAD_REQUEST)?;
    expect_body_contains(&resp, messages::NO_SUCH_IDEA)
}

pub fn expect_status(resp: &ApiResponse, expected: StatusCode) -> HarnessResult<()> {
    if resp.status == expected {
        return Ok(());
    }
    Err(HarnessError::AssertionFailed(format!(
        "expected status {}, got {} (body: {})",
        expected,
        resp.status,
        snippet(&resp.body)
    )))
}

pub fn expect_msg(envelope: &ApiEnvelope, expected: &str) -> HarnessResult<()> {
    match envelope.msg.as_deref() {
        Some(msg) if msg == expected => Ok(()),
        other => Err(HarnessError::AssertionFailed(format!(
            "expected msg {:?}, got {:?}",
            expected, other
        ))),
    }
}

pub fn expect_body_contains(resp: &ApiResponse, needle: &str) -> HarnessResult<()> {
    if resp.body.contains(needle) {
        return Ok(());
    }
    Err(HarnessError::AssertionFailed(format!(
        "expected body to contain {:?}, got: {}",
        needle,
        snippet(&resp.body)
    )))
}

fn snippet(body: &str) -> String {
    let mut out: String = body.chars().take(BODY_SNIPPET_CHARS).collect();
    if body.chars().count() > BODY_SNIPPET_CHARS {
        out.push('…');
    }
    out
}
