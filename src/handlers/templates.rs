use askama::Template;

use crate::{
    models::{CollabType, Submission},
    utils::formatting::format_utc,
};

#[derive(Template)]
#[template(path = "form.html")]
pub struct CollaborateForm<'a> {
    pub token_field: &'a str,
    pub nonce: &'a str,
    pub choices: Vec<CollabType>,
}

#[derive(Template)]
#[template(path = "page.html")]
pub struct CollaboratePage<'a> {
    pub form: &'a str,
    pub success: bool,
    pub errors: &'a [String],
}

#[derive(Template)]
#[template(path = "listing.html")]
pub struct ListingPage {
    pub rows: Vec<ListingRow>,
}

pub struct ListingRow {
    pub id: u64,
    pub collab_type: CollabType,
    pub job_title: String,
    pub company: String,
    pub phone: String,
    pub email: String,
    pub created_at: String,
}

impl From<Submission> for ListingRow {
    fn from(submission: Submission) -> Self {
        ListingRow {
            id: submission.id.0,
            collab_type: submission.collab_type,
            job_title: submission.job_title,
            company: submission.company,
            phone: submission.phone,
            email: submission.email,
            created_at: format_utc(submission.created_at),
        }
    }
}
