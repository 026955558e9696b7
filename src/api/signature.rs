use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::error;

/// Maximum age of a signed request before it is treated as a replay.
const MAX_REQUEST_AGE_SECS: u64 = 300;
/// Tolerated clock skew for timestamps from the future.
const MAX_CLOCK_SKEW_SECS: u64 = 60;

pub fn verify_slack_signature(
    request_body: &str,
    timestamp: &str,
    signature: &str,
    signing_secret: &str,
) -> bool {
    let Ok(ts) = timestamp.parse::<u64>() else {
        error!("Invalid request timestamp: '{}'", timestamp);
        return false;
    };

    if let Ok(now) = SystemTime::now().duration_since(UNIX_EPOCH) {
        let now_secs = now.as_secs();
        if now_secs.saturating_sub(ts) > MAX_REQUEST_AGE_SECS || ts > now_secs + MAX_CLOCK_SKEW_SECS
        {
            error!("Timestamp out of range, potential replay attack");
            return false;
        }
    }

    let Some(expected) = signature
        .strip_prefix("v0=")
        .and_then(|hex_sig| hex::decode(hex_sig).ok())
    else {
        error!("Malformed signature header");
        return false;
    };

    let Some(mac) = signed_mac(timestamp, request_body, signing_secret) else {
        return false;
    };

    // verify_slice compares in constant time.
    if mac.verify_slice(&expected).is_ok() {
        true
    } else {
        error!("Signature verification failed");
        false
    }
}

fn signed_mac(timestamp: &str, request_body: &str, signing_secret: &str) -> Option<Hmac<Sha256>> {
    let mut mac = match Hmac::<Sha256>::new_from_slice(signing_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(e) => {
            error!("Failed to create HMAC: {}", e);
            return None;
        }
    };
    mac.update(format!("v0:{timestamp}:{request_body}").as_bytes());
    Some(mac)
}

pub fn compute_signature(timestamp: &str, request_body: &str, signing_secret: &str) -> String {
    signed_mac(timestamp, request_body, signing_secret)
        .map(|mac| format!("v0={}", hex::encode(mac.finalize().into_bytes())))
        .unwrap_or_default()
}
