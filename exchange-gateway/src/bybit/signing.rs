//! Request signing for Bybit's private REST API.

use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use sha2::Sha256;

pub const HEADER_API_KEY: &str = "x-bapi-api-key";
pub const HEADER_TIMESTAMP: &str = "x-bapi-timestamp";
pub const HEADER_RECV_WINDOW: &str = "x-bapi-recv-window";
pub const HEADER_SIGN: &str = "x-bapi-sign";

/// Return lowercase hex digest for the provided bytes.
pub fn hex_bytes(bytes: impl AsRef<[u8]>) -> String {
    bytes
        .as_ref()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// HMAC-SHA256 sign `payload` with `secret`, hex encoded.
pub fn hmac_sha256_hex(secret: &str, payload: &str) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key size");
    mac.update(payload.as_bytes());
    hex_bytes(mac.finalize().into_bytes())
}

/// Signature over `timestamp + api_key + recv_window + payload`, where the
/// payload is the query string for GET and the JSON body for POST.
pub fn sign(secret: &str, timestamp: i64, api_key: &str, recv_window: u64, payload: &str) -> String {
    let prehash = format!("{timestamp}{api_key}{recv_window}{payload}");
    hmac_sha256_hex(secret, &prehash)
}

/// Builds the authentication headers for one request.
pub fn auth_headers(
    api_key: &str,
    secret: &str,
    timestamp: i64,
    recv_window: u64,
    payload: &str,
) -> Result<HeaderMap, reqwest::header::InvalidHeaderValue> {
    let signature = sign(secret, timestamp, api_key, recv_window, payload);

    let mut headers = HeaderMap::new();
    headers.insert(HEADER_API_KEY, HeaderValue::from_str(api_key)?);
    headers.insert(HEADER_TIMESTAMP, HeaderValue::from_str(&timestamp.to_string())?);
    headers.insert(HEADER_RECV_WINDOW, HeaderValue::from_str(&recv_window.to_string())?);
    headers.insert(HEADER_SIGN, HeaderValue::from_str(&signature)?);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMESTAMP: i64 = 1_672_531_200_000;

    #[test]
    fn test_sign_post_body() {
        let body = r#"{"buyLeverage":"30","category":"linear","sellLeverage":"20","symbol":"ETHUSDT"}"#;
        assert_eq!(
            sign("test-secret", TIMESTAMP, "test-key", 5000, body),
            "9b67c1dc7942d7f25037b64759966be04b80bbae9a715aad01feb54258928ebf"
        );
    }

    #[test]
    fn test_sign_empty_query() {
        assert_eq!(
            sign("test-secret", TIMESTAMP, "test-key", 5000, ""),
            "46267509a46dd778e52946dd71ddd9a579a2652c5e082254c92770b732825af8"
        );
    }

    #[test]
    fn test_auth_headers() {
        let headers = auth_headers("test-key", "test-secret", TIMESTAMP, 5000, "").unwrap();
        assert_eq!(headers[HEADER_API_KEY], "test-key");
        assert_eq!(headers[HEADER_TIMESTAMP], "1672531200000");
        assert_eq!(headers[HEADER_RECV_WINDOW], "5000");
        assert_eq!(headers[HEADER_SIGN].len(), 64);
    }

    #[test]
    fn test_hex_bytes() {
        assert_eq!(hex_bytes([0x00, 0x0f, 0xab]), "000fab");
    }
}
