/// Sets `key=value` in the query string of a relative URL.
///
/// An existing value for `key` is replaced, other parameters and the fragment are kept.
pub fn add_query_arg(target: &str, key: &str, value: &str) -> String {
    let (before_fragment, fragment) = match target.split_once('#') {
        Some((before, fragment)) => (before, Some(fragment)),
        None => (target, None),
    };

    let (path, query) = before_fragment
        .split_once('?')
        .unwrap_or((before_fragment, ""));

    let new_pair = format!("{key}={value}");
    let mut pairs = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split('=').next() != Some(key))
        .collect::<Vec<_>>();

    pairs.push(&new_pair);

    let mut url = format!("{path}?{}", pairs.join("&"));

    if let Some(fragment) = fragment {
        url.push('#');
        url.push_str(fragment);
    }

    url
}

#[cfg(test)]
mod tests {
    use super::add_query_arg;

    #[test]
    fn without_query() {
        assert_eq!(
            add_query_arg("/contact", "collab_success", "1"),
            "/contact?collab_success=1"
        );
    }

    #[test]
    fn keeps_other_parameters() {
        assert_eq!(
            add_query_arg("/contact?lang=en", "collab_success", "1"),
            "/contact?lang=en&collab_success=1"
        );
    }

    #[test]
    fn replaces_existing_value() {
        assert_eq!(
            add_query_arg("/?collab_success=0&lang=en", "collab_success", "1"),
            "/?lang=en&collab_success=1"
        );
    }

    #[test]
    fn keeps_fragment() {
        assert_eq!(
            add_query_arg("/contact?lang=en#form", "collab_success", "1"),
            "/contact?lang=en&collab_success=1#form"
        );
    }

    #[test]
    fn empty_query() {
        assert_eq!(add_query_arg("/?", "collab_success", "1"), "/?collab_success=1");
    }
}
