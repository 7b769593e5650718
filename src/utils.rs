//! Utility helpers used across the crate.
//!
//! Small convenience functions for HTTP metadata, filename extraction and
//! segment planning.
use crate::error::{DownloadError, Result};
use crate::state::{RangeEnd, Segment};
use percent_encoding::percent_decode_str;
use reqwest::header::{CONTENT_LENGTH, HeaderMap};
use sanitize_filename::sanitize;
use url::Url;

/// fetches the Content-Length of a file from a URL using a HEAD request.
///
/// # Errors
///
/// Returns `MetadataProbeFailed` if:
/// * The network request fails.
/// * The server returns a non-success status code.
/// * The server does not provide a numeric `Content-Length` header.
pub async fn get_file_size(url: &str, client: &reqwest::Client) -> Result<u64> {
    let response = client
        .head(url)
        .send()
        .await
        .map_err(|e| DownloadError::probe(format!("HEAD request failed: {e}")))?;

    if !response.status().is_success() {
        return Err(DownloadError::probe(format!(
            "Request failed. Status Code: {}",
            response.status()
        )));
    }

    parse_content_length(response.headers())
}

/// Reads a non-negative integer `Content-Length` from response headers.
pub fn parse_content_length(headers: &HeaderMap) -> Result<u64> {
    headers
        .get(CONTENT_LENGTH)
        .ok_or_else(|| DownloadError::probe("Content Length not found in response header."))?
        .to_str()
        .map_err(|_| DownloadError::probe("Content Length is not valid ASCII."))?
        .trim()
        .parse::<u64>()
        .map_err(|e| DownloadError::probe(format!("Content Length is not a number: {e}")))
}

/// Caps the requested part count so every segment holds at least
/// `min_segment_size` bytes. Never returns less than 1.
pub fn effective_part_count(total_size: u64, requested: usize, min_segment_size: u64) -> usize {
    let requested = requested.max(1) as u64;
    let by_size = total_size / min_segment_size.max(1);
    requested.min(by_size).max(1) as usize
}

/// Divides a total file size into contiguous segments for concurrent
/// downloading.
///
/// Every segment but the last is `total_size / part_count` bytes long; the
/// last one absorbs the remainder and ends where `range_end` says. Callers
/// should pass a count from [`effective_part_count`] so no segment is
/// empty.
pub fn plan_segments(total_size: u64, part_count: usize, range_end: RangeEnd) -> Vec<Segment> {
    let last_end = match range_end {
        RangeEnd::Exact if total_size == 0 => return Vec::new(),
        RangeEnd::Exact => total_size - 1,
        RangeEnd::Legacy => total_size,
    };

    let part_count = (part_count.max(1) as u64).min(total_size.max(1));
    let part_size = total_size / part_count;

    (0..part_count)
        .map(|i| {
            let start = i * part_size;
            let end = if i == part_count - 1 {
                last_end
            } else {
                start + part_size - 1
            };
            Segment {
                index: i as usize,
                start,
                end,
            }
        })
        .collect()
}

/// Extracts a clean filename from a URL.
///
/// 1. Parses the URL.
/// 2. Extracts the last segment of the path.
/// 3. URL-decodes it (converts %20 to space, etc.).
/// 4. Sanitizes it to remove characters invalid for the OS.
///
/// A URL whose path ends in `/` (or has no path at all) has no filename.
pub fn filename_from_url(url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|source| DownloadError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    parsed
        .path_segments()
        .and_then(|mut s| s.next_back())
        .map(|s| percent_decode_str(s).decode_utf8_lossy().to_string())
        .map(sanitize)
        .filter(|s| !s.is_empty() && s != "." && s != "..")
        .ok_or_else(|| DownloadError::NoOutputFilename {
            url: url.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn assert_contiguous(segments: &[Segment], last_end: u64) {
        assert_eq!(segments[0].start, 0);
        for pair in segments.windows(2) {
            assert_eq!(pair[0].end + 1, pair[1].start);
        }
        assert_eq!(segments.last().unwrap().end, last_end);
        for (i, s) in segments.iter().enumerate() {
            assert_eq!(s.index, i);
            assert!(s.start <= s.end);
        }
    }

    #[test]
    fn test_plan_even_split() {
        // 100 bytes, 4 parts -> should be 25 bytes each
        let segments = plan_segments(100, 4, RangeEnd::Exact);
        assert_eq!(segments.len(), 4);

        assert_eq!((segments[0].start, segments[0].end), (0, 24));
        assert_eq!((segments[3].start, segments[3].end), (75, 99));
    }

    #[test]
    fn test_plan_remainder_goes_to_last() {
        // 100 bytes, 3 parts -> 33, 33, 34
        let segments = plan_segments(100, 3, RangeEnd::Exact);
        assert_eq!(segments[0].size(), 33);
        assert_eq!(segments[1].size(), 33);
        assert_eq!(segments[2].size(), 34);
        assert_contiguous(&segments, 99);
    }

    #[test]
    fn test_plan_legacy_end_reaches_total_size() {
        let segments = plan_segments(1000, 4, RangeEnd::Legacy);
        let bounds: Vec<_> = segments.iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(bounds, vec![(0, 249), (250, 499), (500, 749), (750, 1000)]);

        let requested: u64 = segments.iter().map(Segment::size).sum();
        assert_eq!(requested, 1001);
    }

    #[test]
    fn test_plan_exact_end_covers_every_byte_once() {
        for total in [1u64, 2, 7, 99, 1000, 4097] {
            for parts in 1..=9 {
                let parts = effective_part_count(total, parts, 1);
                let segments = plan_segments(total, parts, RangeEnd::Exact);
                assert_eq!(segments.len(), parts);
                assert_contiguous(&segments, total - 1);
                assert_eq!(segments.iter().map(Segment::size).sum::<u64>(), total);
            }
        }
    }

    #[test]
    fn test_plan_small_resource_never_inverts_ranges() {
        // More parts than bytes would produce empty ranges
        let segments = plan_segments(3, 10, RangeEnd::Exact);
        assert_eq!(segments.len(), 3);
        assert_contiguous(&segments, 2);

        let segments = plan_segments(3, 10, RangeEnd::Legacy);
        assert_contiguous(&segments, 3);
    }

    #[test]
    fn test_plan_empty_resource() {
        assert!(plan_segments(0, 4, RangeEnd::Exact).is_empty());

        let legacy = plan_segments(0, 4, RangeEnd::Legacy);
        assert_eq!(legacy.len(), 1);
        assert_eq!((legacy[0].start, legacy[0].end), (0, 0));
    }

    #[test]
    fn test_effective_part_count() {
        assert_eq!(effective_part_count(1000, 4, 1), 4);
        assert_eq!(effective_part_count(1000, 4, 400), 2);
        assert_eq!(effective_part_count(10, 0, 1), 1);
        assert_eq!(effective_part_count(0, 8, 1), 1);
        assert_eq!(effective_part_count(5, 8, 0), 5);
    }

    #[test]
    fn test_filename_extraction() {
        assert_eq!(
            filename_from_url("https://example.com/path/to/file.bin").unwrap(),
            "file.bin"
        );

        // With query parameters (should ignore ?id=123)
        assert_eq!(
            filename_from_url("https://example.com/image.png?id=123&quality=high").unwrap(),
            "image.png"
        );

        // With URL encoding (%20)
        assert_eq!(
            filename_from_url("https://example.com/my%20vacation%20photo.jpg").unwrap(),
            "my vacation photo.jpg"
        );
    }

    #[test]
    fn test_filename_missing() {
        for url in ["https://example.com/", "https://example.com", "https://example.com/dir/"] {
            assert!(matches!(
                filename_from_url(url),
                Err(DownloadError::NoOutputFilename { .. })
            ));
        }

        assert!(matches!(
            filename_from_url("not a url"),
            Err(DownloadError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_file_size_reads_content_length() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Length", "1000")
                    .set_body_bytes(vec![0u8; 1000]),
            )
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        assert_eq!(get_file_size(&server.uri(), &client).await.unwrap(), 1000);
    }

    #[test]
    fn test_parse_content_length() {
        let mut headers = HeaderMap::new();
        assert!(matches!(
            parse_content_length(&headers),
            Err(DownloadError::MetadataProbeFailed { .. })
        ));

        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("1000"));
        assert_eq!(parse_content_length(&headers).unwrap(), 1000);

        for bad in ["abc", "-5", "12.5", ""] {
            headers.insert(CONTENT_LENGTH, HeaderValue::from_static(bad));
            match parse_content_length(&headers) {
                Err(DownloadError::MetadataProbeFailed { reason }) => {
                    assert!(reason.contains("not a number"), "{bad}: {reason}")
                }
                other => panic!("{bad}: unexpected {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_get_file_size_rejects_non_numeric_length() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200).insert_header("Content-Length", "abc"))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let err = get_file_size(&server.uri(), &client).await.unwrap_err();
        assert!(matches!(err, DownloadError::MetadataProbeFailed { .. }));
    }

    #[tokio::test]
    async fn test_get_file_size_requires_content_length() {
        let server = MockServer::start().await;
        // 204 responses never carry a Content-Length
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let err = get_file_size(&server.uri(), &client).await.unwrap_err();
        assert!(matches!(err, DownloadError::MetadataProbeFailed { .. }));
    }

    #[tokio::test]
    async fn test_get_file_size_rejects_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let err = get_file_size(&server.uri(), &client).await.unwrap_err();
        assert!(matches!(err, DownloadError::MetadataProbeFailed { .. }));
    }
}
