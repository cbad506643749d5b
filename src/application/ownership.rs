//! Ownership matching.
//!
//! Decides which records belong to an email address. Speakers and sponsors
//! store an email directly; organizers only store the linked account, so
//! they can only be matched through the account's login or nice name.

use crate::domain::{ContentKind, Identity, IdentityResolver, QueryFilter, Result};

use super::fields::{SPEAKER_EMAIL_KEY, SPONSOR_EMAIL_KEY, USER_ID_KEY};

/// Builds the ownership filter for one content kind.
pub trait OwnershipFilterBuilder {
    /// Whether the filter depends on the account registered for the email.
    fn needs_identity(&self) -> bool;

    /// Filter matching records owned by `email` (and `identity`, if resolved).
    fn build(&self, email: &str, identity: Option<&Identity>) -> QueryFilter;
}

/// Direct `_wcb_speaker_email` match, or the linked account.
pub struct SpeakerOwnership;

/// Direct `_wcb_sponsor_email_address` match only.
pub struct SponsorOwnership;

/// Linked account only; nothing without a resolved account.
pub struct OrganizerOwnership;

impl OwnershipFilterBuilder for SpeakerOwnership {
    fn needs_identity(&self) -> bool {
        true
    }

    fn build(&self, email: &str, identity: Option<&Identity>) -> QueryFilter {
        let primary = QueryFilter::meta(SPEAKER_EMAIL_KEY, email);
        match identity.and_then(alias_filter) {
            Some(aliases) => QueryFilter::Or(vec![primary, aliases]),
            None => primary,
        }
    }
}

impl OwnershipFilterBuilder for SponsorOwnership {
    fn needs_identity(&self) -> bool {
        false
    }

    fn build(&self, email: &str, _identity: Option<&Identity>) -> QueryFilter {
        QueryFilter::meta(SPONSOR_EMAIL_KEY, email)
    }
}

impl OwnershipFilterBuilder for OrganizerOwnership {
    fn needs_identity(&self) -> bool {
        true
    }

    fn build(&self, _email: &str, identity: Option<&Identity>) -> QueryFilter {
        identity
            .and_then(alias_filter)
            .unwrap_or(QueryFilter::Nothing)
    }
}

/// `user_id = login OR user_id = nice name`, skipping empty aliases.
fn alias_filter(identity: &Identity) -> Option<QueryFilter> {
    let clauses: Vec<QueryFilter> = [&identity.login, &identity.display_alias]
        .into_iter()
        .filter(|alias| !alias.is_empty())
        .map(|alias| QueryFilter::meta(USER_ID_KEY, alias.as_str()))
        .collect();

    if clauses.is_empty() {
        None
    } else {
        Some(QueryFilter::Or(clauses))
    }
}

/// Ownership rule for a kind.
#[must_use]
pub fn builder_for(kind: ContentKind) -> &'static dyn OwnershipFilterBuilder {
    match kind {
        ContentKind::Speaker => &SpeakerOwnership,
        ContentKind::Sponsor => &SponsorOwnership,
        ContentKind::Organizer => &OrganizerOwnership,
    }
}

/// Builds the ownership filter for `kind`, resolving the account only when
/// the rule needs it.
///
/// # Errors
/// Returns the identity resolver's error unchanged.
pub fn build_filter(
    kind: ContentKind,
    email: &str,
    identities: &dyn IdentityResolver,
) -> Result<QueryFilter> {
    let builder = builder_for(kind);
    let identity = if builder.needs_identity() {
        identities.find_by_email(email)?
    } else {
        None
    };

    if builder.needs_identity() && identity.is_none() {
        tracing::debug!(kind = %kind, "No account registered for email");
    }

    Ok(builder.build(email, identity.as_ref()))
}
