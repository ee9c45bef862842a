//! Canonical request construction for AWS Signature Version 4.
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! Header names are case-folded before sorting, so the header block and the
//! signed-headers list always agree regardless of how the caller spelled a
//! name or in which order the headers were supplied.

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Everything except RFC 3986 unreserved characters
/// (A-Z, a-z, 0-9, `-`, `_`, `.`, `~`) is percent-encoded.
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// A canonical request together with the signed-headers list it embeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    /// The newline-separated canonical request text.
    pub text: String,
    /// Lowercased, sorted header names joined with `;`.
    pub signed_headers: String,
}

/// Build the canonical request from its components. Every supplied header
/// is signed.
///
/// # Examples
///
/// ```
/// use redshift_data_auth::canonical::build_canonical_request;
///
/// let canonical = build_canonical_request(
///     "GET",
///     "/test.txt",
///     &[],
///     &[("Host", "examplebucket.s3.amazonaws.com")],
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
/// );
/// assert!(canonical.text.starts_with("GET\n/test.txt\n\nhost:"));
/// assert_eq!(canonical.signed_headers, "host");
/// ```
#[must_use]
pub fn build_canonical_request(
    method: &str,
    uri: &str,
    query: &[(&str, &str)],
    headers: &[(&str, &str)],
    payload_hash: &str,
) -> CanonicalRequest {
    let canonical_uri = build_canonical_uri(uri);
    let canonical_query = build_canonical_query_string(query);
    let header_map = collect_headers(headers);
    let canonical_headers = build_canonical_headers(&header_map);
    let signed_headers = build_signed_headers_string(&header_map);

    CanonicalRequest {
        text: format!(
            "{method}\n{canonical_uri}\n{canonical_query}\n{canonical_headers}\n\n{signed_headers}\n{payload_hash}"
        ),
        signed_headers,
    }
}

/// Build the canonical URI by URI-encoding each path segment individually.
///
/// Forward slashes are preserved and an empty path is normalized to `/`.
///
/// ```
/// use redshift_data_auth::canonical::build_canonical_uri;
///
/// assert_eq!(build_canonical_uri(""), "/");
/// assert_eq!(build_canonical_uri("/my.json"), "/my.json");
/// assert_eq!(build_canonical_uri("/a b"), "/a%20b");
/// ```
#[must_use]
pub fn build_canonical_uri(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return "/".to_owned();
    }

    path.split('/')
        .map(|segment| {
            // Decode first so an already-encoded path is not encoded twice.
            let decoded = percent_decode_str(segment).decode_utf8_lossy();
            uri_encode(&decoded)
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Build the canonical query string: keys and values are percent-encoded
/// with the RFC 3986 unreserved set, then sorted by key (and by value for
/// repeated keys).
///
/// ```
/// use redshift_data_auth::canonical::build_canonical_query_string;
///
/// assert_eq!(build_canonical_query_string(&[]), "");
/// assert_eq!(
///     build_canonical_query_string(&[("b", "2"), ("a", "x y")]),
///     "a=x%20y&b=2"
/// );
/// ```
#[must_use]
pub fn build_canonical_query_string(params: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (uri_encode(k), uri_encode(v)))
        .collect();
    encoded.sort_unstable();

    encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Case-fold header names into a sorted map. Repeated names are merged with
/// commas; values are trimmed and inner whitespace runs collapsed.
#[must_use]
pub fn collect_headers(headers: &[(&str, &str)]) -> BTreeMap<String, String> {
    let mut header_map: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let trimmed_value = collapse_whitespace(value.trim());
        header_map
            .entry(name.to_ascii_lowercase())
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(&trimmed_value);
            })
            .or_insert(trimmed_value);
    }
    header_map
}

/// Render the header block as `name:value` lines joined by `\n`, without the
/// trailing newline (the canonical request format adds it).
#[must_use]
pub fn build_canonical_headers(header_map: &BTreeMap<String, String>) -> String {
    header_map
        .iter()
        .map(|(name, value)| format!("{name}:{value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Join the sorted, lowercased header names with `;`.
#[must_use]
pub fn build_signed_headers_string(header_map: &BTreeMap<String, String>) -> String {
    header_map.keys().map(String::as_str).collect::<Vec<_>>().join(";")
}

/// Percent-encode a string with the SigV4 unreserved set.
#[must_use]
pub fn uri_encode(input: &str) -> String {
    utf8_percent_encode(input, URI_ENCODE_SET).to_string()
}

fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_space = false;
    for c in s.chars() {
        if c.is_ascii_whitespace() {
            if !prev_space {
                result.push(' ');
            }
            prev_space = true;
        } else {
            result.push(c);
            prev_space = false;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_build_canonical_uri() {
        assert_eq!(build_canonical_uri("/"), "/");
        assert_eq!(build_canonical_uri("/folder/file.txt"), "/folder/file.txt");
        assert_eq!(build_canonical_uri("/a%20b/c"), "/a%20b/c");
        assert_eq!(build_canonical_uri("/key=value"), "/key%3Dvalue");
    }

    #[test]
    fn test_should_sort_and_encode_query_params() {
        assert_eq!(
            build_canonical_query_string(&[("Param2", "value two"), ("Param1", "value1")]),
            "Param1=value1&Param2=value%20two"
        );
        assert_eq!(
            build_canonical_query_string(&[("a", "2"), ("a", "1")]),
            "a=1&a=2"
        );
        assert_eq!(
            build_canonical_query_string(&[("RoleArn", "arn:aws:iam::1:role/r")]),
            "RoleArn=arn%3Aaws%3Aiam%3A%3A1%3Arole%2Fr"
        );
    }

    #[test]
    fn test_should_encode_sub_delims_in_query_values() {
        // ! ' ( ) * are legal in a URI but not unreserved.
        assert_eq!(
            build_canonical_query_string(&[("q", "it's (a)*!")]),
            "q=it%27s%20%28a%29%2A%21"
        );
    }

    #[test]
    fn test_should_case_fold_and_sort_headers() {
        let map = collect_headers(&[
            ("X-Amz-Date", "20150830T123600Z"),
            ("Host", "example.amazonaws.com"),
            ("content-type", "application/json"),
        ]);
        assert_eq!(
            build_canonical_headers(&map),
            "content-type:application/json\nhost:example.amazonaws.com\nx-amz-date:20150830T123600Z"
        );
        assert_eq!(
            build_signed_headers_string(&map),
            "content-type;host;x-amz-date"
        );
    }

    #[test]
    fn test_should_merge_repeated_headers_regardless_of_case() {
        let map = collect_headers(&[("X-Custom", "a"), ("x-custom", "b")]);
        assert_eq!(build_canonical_headers(&map), "x-custom:a,b");
    }

    #[test]
    fn test_should_collapse_header_whitespace() {
        let map = collect_headers(&[("My-Header", "  a   b  c ")]);
        assert_eq!(build_canonical_headers(&map), "my-header:a b c");
    }

    #[test]
    fn test_should_keep_empty_query_line() {
        let canonical = build_canonical_request(
            "POST",
            "/",
            &[],
            &[("host", "example.com")],
            "UNSIGNED-PAYLOAD",
        );
        assert_eq!(
            canonical.text,
            "POST\n/\n\nhost:example.com\n\nhost\nUNSIGNED-PAYLOAD"
        );
    }

    #[test]
    fn test_should_build_aws_example_canonical_request() {
        // AWS documentation example (GET object with range header).
        let canonical = build_canonical_request(
            "GET",
            "/test.txt",
            &[],
            &[
                ("host", "examplebucket.s3.amazonaws.com"),
                ("range", "bytes=0-9"),
                (
                    "x-amz-content-sha256",
                    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
                ),
                ("x-amz-date", "20130524T000000Z"),
            ],
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
        );
        let hash = {
            use sha2::{Digest, Sha256};
            hex::encode(Sha256::digest(canonical.text.as_bytes()))
        };
        assert_eq!(
            hash,
            "7344ae5b7ee6c3e7e6b0fe0640412a37625d1fbfff95c48bbb2dc43964946972"
        );
        assert_eq!(
            canonical.signed_headers,
            "host;range;x-amz-content-sha256;x-amz-date"
        );
    }
}
