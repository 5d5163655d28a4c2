use url::form_urlencoded;

/// Appends `key=value` only when the value is defined.
pub(crate) fn push_defined(
    pairs: &mut Vec<(&'static str, String)>,
    key: &'static str,
    value: Option<String>,
) {
    if let Some(value) = value {
        pairs.push((key, value));
    }
}

/// URL-encodes ordered query pairs without the leading `?`.
#[must_use]
pub fn encode_query(pairs: &[(&str, String)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}
