use hmac::{Hmac, Mac};
use sha2::Sha256;
use time::{Duration, OffsetDateTime};

type HmacSha256 = Hmac<Sha256>;

/// The action the collaboration form tokens are bound to.
pub const SUBMIT_ACTION: &str = "collaborate_form_submit";

/// The form field carrying the token.
pub const TOKEN_FIELD: &str = "collaborate_nonce";

const TOKEN_LENGTH: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenAge {
    /// Issued during the current half of the lifetime.
    Fresh,
    /// Issued during the previous half of the lifetime.
    Aging,
}

/// Issues and checks anti-forgery tokens for form actions.
///
/// Time is cut into ticks of half the token lifetime. A token is valid during the tick
/// it was issued in and the following one.
pub struct FormTokens {
    secret: Vec<u8>,
    tick_seconds: i64,
}

impl FormTokens {
    pub fn new(secret: impl Into<Vec<u8>>, lifetime: Duration) -> FormTokens {
        FormTokens {
            secret: secret.into(),
            tick_seconds: (lifetime.whole_seconds() / 2).max(1),
        }
    }

    pub fn issue(&self, action: &str) -> String {
        self.issue_at(action, OffsetDateTime::now_utc())
    }

    pub fn verify(&self, action: &str, token: &str) -> Option<TokenAge> {
        self.verify_at(action, token, OffsetDateTime::now_utc())
    }

    fn issue_at(&self, action: &str, at: OffsetDateTime) -> String {
        let mut token = hex::encode(self.mac(action, self.tick(at)).finalize().into_bytes());
        token.truncate(TOKEN_LENGTH);
        token
    }

    fn verify_at(&self, action: &str, token: &str, at: OffsetDateTime) -> Option<TokenAge> {
        if token.len() != TOKEN_LENGTH {
            return None;
        }

        let tag = hex::decode(token).ok()?;
        let tick = self.tick(at);

        if self.mac(action, tick).verify_truncated_left(&tag).is_ok() {
            return Some(TokenAge::Fresh);
        }

        if self.mac(action, tick - 1).verify_truncated_left(&tag).is_ok() {
            return Some(TokenAge::Aging);
        }

        None
    }

    fn tick(&self, at: OffsetDateTime) -> i64 {
        at.unix_timestamp().div_euclid(self.tick_seconds) + 1
    }

    fn mac(&self, action: &str, tick: i64) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts keys of any length");
        mac.update(action.as_bytes());
        mac.update(b"|");
        mac.update(tick.to_string().as_bytes());
        mac
    }
}

#[cfg(test)]
mod tests {
    use time::{macros::datetime, Duration};

    use super::{FormTokens, TokenAge, SUBMIT_ACTION, TOKEN_LENGTH};

    fn tokens() -> FormTokens {
        FormTokens::new("test secret", Duration::hours(24))
    }

    #[test]
    fn issued_token_is_fresh() {
        let tokens = tokens();
        let now = datetime!(2024-05-01 10:00 UTC);
        let token = tokens.issue_at(SUBMIT_ACTION, now);

        assert_eq!(token.len(), TOKEN_LENGTH);
        assert_eq!(
            tokens.verify_at(SUBMIT_ACTION, &token, now),
            Some(TokenAge::Fresh)
        );
    }

    #[test]
    fn same_tick_gives_same_token() {
        let tokens = tokens();
        let first = tokens.issue_at(SUBMIT_ACTION, datetime!(2024-05-01 00:00:01 UTC));
        let second = tokens.issue_at(SUBMIT_ACTION, datetime!(2024-05-01 11:59:59 UTC));
        assert_eq!(first, second);
    }

    #[test]
    fn previous_tick_is_aging() {
        let tokens = tokens();
        let token = tokens.issue_at(SUBMIT_ACTION, datetime!(2024-05-01 10:00 UTC));

        assert_eq!(
            tokens.verify_at(SUBMIT_ACTION, &token, datetime!(2024-05-01 13:00 UTC)),
            Some(TokenAge::Aging)
        );
    }

    #[test]
    fn expires_after_two_ticks() {
        let tokens = tokens();
        let token = tokens.issue_at(SUBMIT_ACTION, datetime!(2024-05-01 10:00 UTC));

        assert_eq!(
            tokens.verify_at(SUBMIT_ACTION, &token, datetime!(2024-05-02 00:00 UTC)),
            None
        );
    }

    #[test]
    fn bound_to_action() {
        let tokens = tokens();
        let now = datetime!(2024-05-01 10:00 UTC);
        let token = tokens.issue_at("some_other_action", now);

        assert_eq!(tokens.verify_at(SUBMIT_ACTION, &token, now), None);
    }

    #[test]
    fn bound_to_secret() {
        let now = datetime!(2024-05-01 10:00 UTC);
        let token = FormTokens::new("another secret", Duration::hours(24))
            .issue_at(SUBMIT_ACTION, now);

        assert_eq!(tokens().verify_at(SUBMIT_ACTION, &token, now), None);
    }

    #[test]
    fn malformed_tokens() {
        let tokens = tokens();
        let now = datetime!(2024-05-01 10:00 UTC);

        assert_eq!(tokens.verify_at(SUBMIT_ACTION, "", now), None);
        assert_eq!(tokens.verify_at(SUBMIT_ACTION, "not a token", now), None);
        assert_eq!(
            tokens.verify_at(SUBMIT_ACTION, &"z".repeat(TOKEN_LENGTH), now),
            None
        );
    }
}
