//! Personal-data fields exported for each content kind.
//!
//! Keys are either core record fields (`post_title`, `post_content`) or
//! metadata keys; values are the labels shown in the export.

use crate::domain::{ContentKind, FieldMap};

/// Metadata key holding a speaker's Gravatar email.
pub const SPEAKER_EMAIL_KEY: &str = "_wcb_speaker_email";
/// Metadata key holding a sponsor contact's email.
pub const SPONSOR_EMAIL_KEY: &str = "_wcb_sponsor_email_address";
/// Metadata key holding the WordPress.org username linked to a record.
pub const USER_ID_KEY: &str = "_wcpt_user_id";

pub const SPEAKER_FIELDS: FieldMap = FieldMap::new(&[
    ("post_title", "Speaker Name"),
    ("post_content", "Speaker Bio"),
    (SPEAKER_EMAIL_KEY, "Gravatar Email"),
    (USER_ID_KEY, "WordPress.org Username"),
]);

pub const SPONSOR_FIELDS: FieldMap = FieldMap::new(&[
    ("post_title", "Company Name"),
    ("post_content", "Company Description"),
    ("_wcpt_sponsor_website", "Website URL"),
    ("_wcpt_sponsor_first_name", "First Name"),
    ("_wcpt_sponsor_last_name", "Last Name"),
    (SPONSOR_EMAIL_KEY, "Email Address"),
    ("_wcpt_sponsor_phone_number", "Phone Number"),
    ("_wcpt_sponsor_street_address1", "Street Address"),
    ("_wcpt_sponsor_street_address2", "Street Address 2"),
    ("_wcpt_sponsor_city", "City"),
    ("_wcpt_sponsor_state", "State / Province"),
    ("_wcpt_sponsor_zip_code", "ZIP / Postal Code"),
    ("_wcpt_sponsor_country", "Country"),
]);

pub const ORGANIZER_FIELDS: FieldMap = FieldMap::new(&[
    ("post_title", "Organizer Name"),
    ("post_content", "Organizer Bio"),
    (USER_ID_KEY, "WordPress.org Username"),
]);

/// Field map declared for a kind.
#[must_use]
pub const fn field_map(kind: ContentKind) -> FieldMap {
    match kind {
        ContentKind::Speaker => SPEAKER_FIELDS,
        ContentKind::Sponsor => SPONSOR_FIELDS,
        ContentKind::Organizer => ORGANIZER_FIELDS,
    }
}
