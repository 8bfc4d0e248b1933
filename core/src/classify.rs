//! Decides whether a message carries a JSON payload.

use mime::Mime;

use crate::http::{Headers, HttpRequest, HttpResponse, CONTENT_LENGTH, CONTENT_TYPE};

/// Returns `true` when `content-type` names a JSON media type and
/// `content-length` is present and non-empty.
///
/// `application/json` and any `application/*+json` subtype match; media type
/// parameters such as `charset` are ignored. A JSON content type without a
/// `content-length` is still reported as `false`.
pub fn is_json(headers: &Headers) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE) else {
        return false;
    };
    let has_length = headers
        .get(CONTENT_LENGTH)
        .is_some_and(|length| !length.is_empty());
    has_length && is_json_media_type(content_type)
}

fn is_json_media_type(content_type: &str) -> bool {
    let Ok(media_type) = content_type.parse::<Mime>() else {
        return false;
    };
    media_type.type_() == mime::APPLICATION
        && (media_type.subtype() == mime::JSON
            || media_type.suffix().is_some_and(|suffix| suffix == mime::JSON))
}

/// A message whose headers can be checked for a JSON payload.
///
/// The check is live: it reads the headers each time it is called.
pub trait Classifiable {
    fn headers(&self) -> &Headers;

    fn is_json(&self) -> bool {
        is_json(self.headers())
    }
}

impl Classifiable for HttpRequest {
    fn headers(&self) -> &Headers {
        &self.headers
    }
}

impl Classifiable for HttpResponse {
    fn headers(&self) -> &Headers {
        &self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_with_length_is_json() {
        let headers = Headers::from([("content-type", "application/json"), ("content-length", "20")]);
        assert!(is_json(&headers));
    }

    #[test]
    fn vendor_json_suffix_is_json() {
        let headers = Headers::from([
            ("content-type", "application/vnd.api+json"),
            ("content-length", "20"),
        ]);
        assert!(is_json(&headers));
    }

    #[test]
    fn charset_parameter_is_ignored() {
        let headers = Headers::from([
            ("content-type", "application/json; charset=utf-8"),
            ("content-length", "2"),
        ]);
        assert!(is_json(&headers));
    }

    #[test]
    fn html_is_not_json() {
        let headers = Headers::from([("content-type", "text/html"), ("content-length", "20")]);
        assert!(!is_json(&headers));
    }

    #[test]
    fn text_json_is_not_json() {
        let headers = Headers::from([("content-type", "text/json"), ("content-length", "20")]);
        assert!(!is_json(&headers));
    }

    #[test]
    fn missing_content_type_is_not_json() {
        let headers = Headers::from([("content-length", "20")]);
        assert!(!is_json(&headers));
    }

    // A JSON content type alone is not enough: the length header must be there too.
    #[test]
    fn missing_content_length_is_not_json() {
        let headers = Headers::from([("content-type", "application/json")]);
        assert!(!is_json(&headers));
    }

    #[test]
    fn empty_content_length_is_not_json() {
        let headers = Headers::from([("content-type", "application/json"), ("content-length", "")]);
        assert!(!is_json(&headers));
    }

    #[test]
    fn malformed_content_type_is_not_json() {
        let headers = Headers::from([("content-type", "json"), ("content-length", "20")]);
        assert!(!is_json(&headers));
    }

    #[test]
    fn repeated_calls_agree() {
        let headers = Headers::from([("content-type", "application/json"), ("content-length", "20")]);
        assert_eq!(is_json(&headers), is_json(&headers));
    }

    #[test]
    fn check_follows_header_changes() {
        let mut res = HttpResponse::new(200, Headers::from([("content-type", "application/json")]), "{}");
        assert!(!res.is_json());
        res.headers.insert("content-length", "2");
        assert!(res.is_json());
    }
}
