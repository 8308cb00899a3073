use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Who is reaching out through the collaboration form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum CollabType {
    Broker,
    Developer,
}

impl CollabType {
    pub fn label(&self) -> &'static str {
        use CollabType::*;

        match self {
            Broker => "Broker",
            Developer => "Developer",
        }
    }
}
