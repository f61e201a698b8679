//! Self-interaction guard: a user must not offer on, or message, their own
//! listing.

use super::listings::domain::{CurrentUser, Listing};

/// True when the listing belongs to the acting user.
///
/// The owner id is authoritative. Some legacy public listing shapes carry no
/// owner id at all, only a contact name; for those the guard degrades to a
/// case-insensitive name comparison, which is fragile and kept only until
/// every shape carries an owner id.
pub fn is_own_listing(listing: &Listing, user: &CurrentUser) -> bool {
    if let Some(owner) = &listing.owner {
        return owner == &user.id;
    }

    match user.display_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => listing.contact.name.trim().eq_ignore_ascii_case(name),
        _ => false,
    }
}
