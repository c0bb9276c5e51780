//! Endpoint paths and the messages the IdeaCenter API answers with

/// Query parameter carrying the idea identifier on edit and delete
pub const IDEA_ID_PARAM: &str = "ideaId";

/// Identifier assumed never to be allocated by the backend.
///
/// This is an environmental assumption about the deployment under test, not
/// something the API guarantees.
pub const KNOWN_ABSENT_IDEA_ID: &str = "123";

/// Request paths, relative to the base endpoint
pub mod paths {
    pub const AUTHENTICATION: &str = "/api/User/Authentication";
    pub const IDEA_CREATE: &str = "/api/Idea/Create";
    pub const IDEA_ALL: &str = "/api/Idea/All";
    pub const IDEA_EDIT: &str = "/api/Idea/Edit";
    pub const IDEA_DELETE: &str = "/api/Idea/Delete";
}

/// Outcome messages returned in response bodies
pub mod messages {
    pub const CREATED: &str = "Successfully created!";
    pub const EDITED: &str = "Edited successfully";
    pub const DELETED: &str = "The idea is deleted!";
    pub const NO_SUCH_IDEA: &str = "There is no such idea!";
}
