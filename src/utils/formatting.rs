use time::macros::format_description;
use time::{format_description, OffsetDateTime, UtcOffset};

const DATETIME_FORMAT: &[format_description::FormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

pub fn format_utc(date_time: impl Into<OffsetDateTime>) -> String {
    let offset_date_time: OffsetDateTime = date_time.into();
    offset_date_time
        .to_offset(UtcOffset::UTC)
        .format(DATETIME_FORMAT)
        .expect("Hard-coded format should be correct")
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::format_utc;

    #[test]
    fn converts_to_utc() {
        assert_eq!(
            format_utc(datetime!(2024-05-01 12:30:05.250 +02:00)),
            "2024-05-01 10:30:05"
        );
    }
}
