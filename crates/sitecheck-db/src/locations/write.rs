//! Write operations for the `gmb_locations` table.

use sitecheck_core::VerificationRecord;
use sqlx::PgPool;
use uuid::Uuid;

/// Verification flags for one location, ready to persist.
///
/// Every flag is nullable: `None` means the corresponding check could not
/// be determined this run and the stored value should reflect that, not a
/// silent `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationUpdate {
    pub id: Uuid,
    pub is_website_uri_status_404: Option<bool>,
    pub is_website_uri_https_verified: Option<bool>,
    pub is_address_on_website: Option<bool>,
    pub does_address_match_website: Option<bool>,
    pub is_hours_on_website: Option<bool>,
    pub do_hours_match_website: Option<bool>,
    pub is_phone_on_website: Option<bool>,
    pub does_phone_match_website: Option<bool>,
}

impl VerificationUpdate {
    /// Build an update row from a finished verification record.
    ///
    /// Returns `None` for records with no website URI: those locations were
    /// never checked, so their stored flags are left untouched.
    #[must_use]
    pub fn from_record(record: &VerificationRecord) -> Option<Self> {
        record
            .website_uri
            .as_deref()
            .filter(|uri| !uri.trim().is_empty())?;

        Some(Self {
            id: record.id,
            is_website_uri_status_404: record.probe.map(|p| !p.is_accessible),
            is_website_uri_https_verified: record.probe.map(|p| p.supports_https),
            is_address_on_website: record.address.is_found(),
            does_address_match_website: record.address.is_match(),
            is_hours_on_website: record.hours.is_found(),
            do_hours_match_website: record.hours.is_match(),
            is_phone_on_website: record.phone.is_found(),
            does_phone_match_website: record.phone.is_match(),
        })
    }
}

/// Persist verification updates in chunks, one statement per chunk.
///
/// Each chunk is applied with a single `UPDATE … FROM UNNEST(…)` so that
/// the whole chunk commits or fails atomically in one round-trip; a failing
/// chunk does not affect chunks already applied. Returns the total number
/// of rows updated.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if any chunk's statement fails. Chunks already
/// applied stay applied.
pub async fn update_verification_results(
    pool: &PgPool,
    updates: &[VerificationUpdate],
    chunk_size: usize,
) -> Result<u64, sqlx::Error> {
    if updates.is_empty() {
        return Ok(0);
    }

    let mut total_updated: u64 = 0;

    for chunk in updates.chunks(chunk_size.max(1)) {
        // Collect each column into a parallel Vec for UNNEST binding.
        let mut ids: Vec<Uuid> = Vec::with_capacity(chunk.len());
        let mut status_404s: Vec<Option<bool>> = Vec::with_capacity(chunk.len());
        let mut https_verifieds: Vec<Option<bool>> = Vec::with_capacity(chunk.len());
        let mut address_founds: Vec<Option<bool>> = Vec::with_capacity(chunk.len());
        let mut address_matches: Vec<Option<bool>> = Vec::with_capacity(chunk.len());
        let mut hours_founds: Vec<Option<bool>> = Vec::with_capacity(chunk.len());
        let mut hours_matches: Vec<Option<bool>> = Vec::with_capacity(chunk.len());
        let mut phone_founds: Vec<Option<bool>> = Vec::with_capacity(chunk.len());
        let mut phone_matches: Vec<Option<bool>> = Vec::with_capacity(chunk.len());

        for update in chunk {
            ids.push(update.id);
            status_404s.push(update.is_website_uri_status_404);
            https_verifieds.push(update.is_website_uri_https_verified);
            address_founds.push(update.is_address_on_website);
            address_matches.push(update.does_address_match_website);
            hours_founds.push(update.is_hours_on_website);
            hours_matches.push(update.do_hours_match_website);
            phone_founds.push(update.is_phone_on_website);
            phone_matches.push(update.does_phone_match_website);
        }

        let rows_affected = sqlx::query(
            "UPDATE gmb_locations AS g SET \
                 is_website_uri_status_404     = u.status_404, \
                 is_website_uri_https_verified = u.https_verified, \
                 is_address_on_website         = u.address_found, \
                 does_address_match_website    = u.address_match, \
                 is_hours_on_website           = u.hours_found, \
                 do_hours_match_website        = u.hours_match, \
                 is_phone_on_website           = u.phone_found, \
                 does_phone_match_website      = u.phone_match, \
                 updated_at                    = NOW() \
             FROM UNNEST(\
                 $1::uuid[], $2::bool[], $3::bool[], $4::bool[], $5::bool[], \
                 $6::bool[], $7::bool[], $8::bool[], $9::bool[]) \
               AS u(id, status_404, https_verified, address_found, address_match, \
                    hours_found, hours_match, phone_found, phone_match) \
             WHERE g.id = u.id",
        )
        .bind(&ids)
        .bind(&status_404s)
        .bind(&https_verifieds)
        .bind(&address_founds)
        .bind(&address_matches)
        .bind(&hours_founds)
        .bind(&hours_matches)
        .bind(&phone_founds)
        .bind(&phone_matches)
        .execute(pool)
        .await?
        .rows_affected();

        total_updated += rows_affected;
    }

    Ok(total_updated)
}
