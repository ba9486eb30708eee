//! DTOs for the link-group handout endpoint.

use serde::Serialize;

use crate::domain::entities::LinkGroup;

/// A link group to visit, or `{}` when none is pending.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum VisitResponse {
    Group { id: i64, links: Vec<String> },
    Empty {},
}

impl From<Option<LinkGroup>> for VisitResponse {
    fn from(group: Option<LinkGroup>) -> Self {
        match group {
            Some(group) => VisitResponse::Group {
                id: group.id,
                links: group.urls,
            },
            None => VisitResponse::Empty {},
        }
    }
}
