//! IdeaCenter Contract Test Harness
//!
//! This crate drives an ordered, stateful contract suite against the
//! IdeaCenter idea API:
//! - Resolves credentials and authenticates once per run
//! - Builds a single bearer-authenticated client shared by every case
//! - Runs seven dependent cases in a fixed order, threading the last listed
//!   idea id from the listing case into edit and delete
//! - Records per-case results without letting one failure hide the rest
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Contract Runner (Rust)                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ContractRunner                                             │
//! │    ├── setup()    -> Credentials -> token -> Session        │
//! │    ├── run_all()  -> SuiteResult                            │
//! │    │     for case in IdeaCase::ORDERED:                     │
//! │    │         case.execute(&session, &mut fixture)           │
//! │    └── teardown() -> releases the Session                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  IdeaCase (in order)                                        │
//! │    1 create_idea_with_required_fields                       │
//! │    2 get_all_ideas                 writes last_known_id     │
//! │    3 edit_existing_idea            reads  last_known_id     │
//! │    4 delete_existing_idea          reads  last_known_id     │
//! │    5 create_idea_without_required_fields                    │
//! │    6 edit_non_existing_idea                                 │
//! │    7 delete_non_existing_idea                               │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod cases;
pub mod cli;
pub mod config;
pub mod error;
pub mod fixture;
pub mod runner;
pub mod session;

pub use auth::{resolve_token, Credentials};
pub use cases::IdeaCase;
pub use cli::ContractArgs;
pub use config::HarnessConfig;
pub use error::{HarnessError, HarnessResult};
pub use fixture::FixtureState;
pub use runner::{CaseResult, ContractRunner, SuiteResult};
pub use session::{ApiResponse, Session};
