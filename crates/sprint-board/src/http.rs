//! Shared HTTP response checks for the board client.

use crate::error::BoardError;

/// Check an HTTP response for common error conditions.
///
/// Returns the response unchanged on success. A 429 becomes
/// [`BoardError::RateLimited`] using the `Retry-After` header (60 s when
/// absent or unparseable); any other non-success status becomes
/// [`BoardError::Api`] carrying the response body.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, BoardError> {
    if resp.status() == 429 {
        return Err(BoardError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !resp.status().is_success() {
        return Err(BoardError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_response(
        status: u16,
        retry_after: Option<&str>,
        body: &'static str,
    ) -> reqwest::Response {
        let mut builder = ::http::Response::builder().status(status);
        if let Some(value) = retry_after {
            builder = builder.header("Retry-After", value);
        }
        reqwest::Response::from(builder.body(body).unwrap())
    }

    #[test]
    fn retry_after_falls_back_to_a_minute() {
        assert_eq!(parse_retry_after(&mock_response(429, Some("15"), "")), 15);
        assert_eq!(parse_retry_after(&mock_response(429, Some("soon"), "")), 60);
        assert_eq!(parse_retry_after(&mock_response(429, None, "")), 60);
    }

    #[tokio::test]
    async fn rate_limit_maps_to_retryable_error() {
        let err = check_response(mock_response(429, Some("5"), "")).await.unwrap_err();
        assert!(matches!(
            err,
            BoardError::RateLimited {
                retry_after_secs: 5
            }
        ));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn unauthorized_keeps_body() {
        let err = check_response(mock_response(401, None, "invalid token"))
            .await
            .unwrap_err();
        match err {
            BoardError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid token");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn success_passes_through() {
        assert!(check_response(mock_response(200, None, "{}")).await.is_ok());
    }
}
