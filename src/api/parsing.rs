use serde_json::Value;

/// Case-insensitive header lookup over a Lambda function URL `headers` object.
pub fn get_header_value<'a>(headers: &'a Value, name: &str) -> Option<&'a str> {
    if let Some(v) = headers.get(name).and_then(|s| s.as_str()) {
        return Some(v);
    }
    headers.as_object().and_then(|map| {
        map.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                v.as_str()
            } else {
                None
            }
        })
    })
}

/// Slack sets `X-Slack-Retry-Num` on redeliveries of an event it already sent.
pub fn is_slack_retry(headers: &Value) -> bool {
    get_header_value(headers, "X-Slack-Retry-Num").is_some()
}
