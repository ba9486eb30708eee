//! DTOs for address registration.

use serde::Deserialize;
use validator::Validate;

/// Form submitted when signing up for a website.
///
/// Missing fields deserialize as empty strings and fail validation, so they
/// are reported as `400 Bad Request`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name of the website.
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "site is required"))]
    pub site: String,

    /// Page the address is registered on.
    #[serde(default)]
    #[validate(length(min = 1, max = 2048, message = "url is required"))]
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_fail_validation() {
        let request: RegisterRequest = serde_json::from_str("{}").unwrap();
        assert!(request.validate().is_err());

        let request = RegisterRequest {
            site: "Shop".to_string(),
            url: "https://shop.com".to_string(),
        };
        assert!(request.validate().is_ok());
    }
}
