//! DTOs for browser report submission.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use crate::domain::detection::ReportedEvent;

/// Traffic observed while visiting one link group.
///
/// The group id is accepted as a number or a numeric string.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct ResultsRequest {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub id: i64,
    pub requests: Vec<ReportedRequest>,
}

/// One request as `[url, topLevelUrl, referrer, postBody]`.
#[derive(Debug, Deserialize)]
pub struct ReportedRequest(
    pub String,
    pub Option<String>,
    pub Option<String>,
    pub Option<String>,
);

impl From<ReportedRequest> for ReportedEvent {
    fn from(ReportedRequest(url, top_level_url, referrer, post_body): ReportedRequest) -> Self {
        ReportedEvent {
            url,
            top_level_url,
            referrer,
            post_body,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub id: i64,
    pub leaks_recorded: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_tuples() {
        let request: ResultsRequest = serde_json::from_str(
            r#"{"id": 3, "requests": [["https://a.com/x", null, "https://b.com", "k=v"]]}"#,
        )
        .unwrap();

        let event = ReportedEvent::from(request.requests.into_iter().next().unwrap());
        assert_eq!(event.url, "https://a.com/x");
        assert!(event.top_level_url.is_none());
        assert_eq!(event.referrer.as_deref(), Some("https://b.com"));
        assert_eq!(event.post_body.as_deref(), Some("k=v"));
    }

    #[test]
    fn test_id_as_string() {
        let request: ResultsRequest =
            serde_json::from_str(r#"{"id": "17", "requests": []}"#).unwrap();
        assert_eq!(request.id, 17);
        assert!(request.requests.is_empty());

        let result = serde_json::from_str::<ResultsRequest>(r#"{"id": "x", "requests": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_short_tuple_is_rejected() {
        let result = serde_json::from_str::<ResultsRequest>(
            r#"{"id": 3, "requests": [["https://a.com/x"]]}"#,
        );
        assert!(result.is_err());
    }
}
