use lazy_regex::{regex, regex_is_match};

const MIN_EMAIL_LENGTH: usize = 6;

/// Cleans a free-text form value for storage.
///
/// Script and style blocks are dropped together with their content, every other tag is
/// stripped (an unclosed one up to the end of the text), percent-encoded octets are
/// removed until none are left, whitespace runs become a single space
/// and the remaining control characters are removed. The result is trimmed.
pub fn sanitize_text_field(raw: &str) -> String {
    let text = regex!(r"(?is)<(script|style)[^>]*>.*?</(script|style)\s*>").replace_all(raw, "");
    let text = regex!(r"(?s)<[^>]*>").replace_all(&text, "");
    let mut text = regex!(r"(?s)<[^>]*$").replace(&text, "").into_owned();

    // Removing one octet can join its neighbours into a new one.
    loop {
        let stripped = regex!(r"%[a-fA-F0-9]{2}").replace_all(&text, "").into_owned();
        if stripped == text {
            break;
        }
        text = stripped;
    }

    let text = regex!(r"\s+").replace_all(&text, " ");

    text.chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_owned()
}

/// Validates an email address and normalizes it.
///
/// Returns `None` if the address is not acceptable. The domain is lower-cased, the local
/// part is kept as typed.
pub fn sanitize_email(raw: &str) -> Option<String> {
    let email = raw.trim();

    if email.len() < MIN_EMAIL_LENGTH {
        return None;
    }

    let (local, domain) = email.split_once('@')?;

    if !regex_is_match!(r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~.-]+$", local) {
        return None;
    }

    let labels = domain.split('.').collect::<Vec<_>>();
    if labels.len() < 2 {
        return None;
    }

    let labels_valid = labels
        .iter()
        .all(|label| regex_is_match!(r"^[a-zA-Z0-9]([a-zA-Z0-9-]*[a-zA-Z0-9])?$", label));

    if !labels_valid {
        return None;
    }

    Some(format!("{local}@{}", domain.to_ascii_lowercase()))
}
