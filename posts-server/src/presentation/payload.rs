use actix_web::HttpRequest;
use actix_web::http::header::CONTENT_TYPE;

use crate::domain::error::DomainError;
use crate::domain::post::PostPatch;

/// Decodes a create/update body into a [`PostPatch`].
///
/// Only `application/json` and url-encoded form bodies are decoded. An empty
/// body, a body without a content type or with any other content type is
/// read as an empty patch.
pub fn parse_post_payload(req: &HttpRequest, body: &[u8]) -> Result<PostPatch, DomainError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(PostPatch::default());
    }

    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| {
            v.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        });

    match content_type.as_deref() {
        Some("application/json") => parse_json(body),
        Some("application/x-www-form-urlencoded") => serde_urlencoded::from_bytes(body)
            .map_err(|e| DomainError::InvalidPayload(e.to_string())),
        _ => Ok(PostPatch::default()),
    }
}

fn parse_json(body: &[u8]) -> Result<PostPatch, DomainError> {
    serde_json::from_slice(body).map_err(|e| DomainError::InvalidPayload(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn json_body() {
        let req = TestRequest::default()
            .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
            .to_http_request();

        let patch = parse_post_payload(&req, br#"{"title":"A","content":"B"}"#).unwrap();
        assert_eq!(patch.title, Some(Some("A".into())));
        assert_eq!(patch.content, Some(Some("B".into())));
    }

    #[test]
    fn form_body() {
        let req = TestRequest::default()
            .insert_header((CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .to_http_request();

        let patch = parse_post_payload(&req, b"title=Hello+there&content=x%26y").unwrap();
        assert_eq!(patch.title, Some(Some("Hello there".into())));
        assert_eq!(patch.content, Some(Some("x&y".into())));
    }

    #[test]
    fn empty_body_is_empty_patch() {
        let req = TestRequest::default()
            .insert_header((CONTENT_TYPE, "application/json"))
            .to_http_request();

        assert!(parse_post_payload(&req, b"").unwrap().is_empty());
    }

    #[test]
    fn unrelated_content_type_is_ignored() {
        let req = TestRequest::default()
            .insert_header((CONTENT_TYPE, "text/plain"))
            .to_http_request();

        assert!(parse_post_payload(&req, b"title=ignored").unwrap().is_empty());
    }

    #[test]
    fn only_plain_json_content_type_is_decoded() {
        let req = TestRequest::default().to_http_request();
        assert!(parse_post_payload(&req, br#"{"title":"A"}"#).unwrap().is_empty());

        let req = TestRequest::default()
            .insert_header((CONTENT_TYPE, "application/merge-patch+json"))
            .to_http_request();
        assert!(parse_post_payload(&req, br#"{"title":"A"}"#).unwrap().is_empty());
    }

    #[test]
    fn form_dates_are_cast() {
        let req = TestRequest::default()
            .insert_header((CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .to_http_request();

        let patch = parse_post_payload(&req, b"createdAt=2024-01-01&updatedAt=").unwrap();
        assert_eq!(
            patch.created_at.map(|ts| ts.to_rfc3339()),
            Some("2024-01-01T00:00:00+00:00".to_string())
        );
        assert_eq!(patch.updated_at, Some(None));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let req = TestRequest::default()
            .insert_header((CONTENT_TYPE, "application/json"))
            .to_http_request();

        let err = parse_post_payload(&req, b"{not json").unwrap_err();
        assert!(matches!(err, DomainError::InvalidPayload(_)));

        let err = parse_post_payload(&req, br#""just text""#).unwrap_err();
        assert!(matches!(err, DomainError::InvalidPayload(_)));
    }
}
