use crate::domain::ListingKind;
use crate::infrastructure::{AccountRepository, ListingRepository};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};

/// Outcome of one sweep pass. `hidden` carries one entry per listing kind
/// whose bulk update ran, with the number of rows it actually flipped.
#[derive(Debug, Default, PartialEq)]
pub struct SweepReport {
    pub lapsed_accounts: usize,
    pub hidden: Vec<(ListingKind, u64)>,
    pub failed_kinds: Vec<ListingKind>,
}

impl SweepReport {
    pub fn total_hidden(&self) -> u64 {
        self.hidden.iter().map(|(_, n)| n).sum()
    }
}

/// The periodic consistency pass. The gate re-derives visibility on every
/// direct fetch; this job materializes the same predicate onto the persisted
/// `subscription_active` flags so search stays honest between fetches.
pub struct ExpirySweep<A, L>
where
    A: AccountRepository,
    L: ListingRepository,
{
    account_repo: Arc<A>,
    listing_repo: Arc<L>,
}

impl<A, L> ExpirySweep<A, L>
where
    A: AccountRepository,
    L: ListingRepository,
{
    pub fn new(account_repo: Arc<A>, listing_repo: Arc<L>) -> Self {
        Self {
            account_repo,
            listing_repo,
        }
    }

    /// Single pass over all lapsed owners. Each kind's bulk update is its own
    /// best-effort operation: a failure is logged and the other kinds still
    /// run; the next pass picks up whatever was missed. Never raises to the
    /// scheduler.
    pub async fn run_once(&self) -> SweepReport {
        let now = Utc::now();
        let mut report = SweepReport::default();

        let lapsed = match self.account_repo.list_lapsed_owner_ids(now).await {
            Ok(ids) => ids,
            Err(e) => {
                error!(error = %e, "Expiry sweep could not list lapsed accounts");
                return report;
            }
        };

        report.lapsed_accounts = lapsed.len();
        if lapsed.is_empty() {
            info!("Expiry sweep found no lapsed subscriptions");
            return report;
        }

        info!(count = lapsed.len(), "Expiry sweep hiding listings of lapsed accounts");

        for kind in ListingKind::ALL {
            match self.listing_repo.hide_for_owners(kind, &lapsed).await {
                Ok(hidden) => {
                    report.hidden.push((kind, hidden));
                    if hidden > 0 {
                        info!(%kind, hidden, "Expiry sweep hid listings");
                    }
                }
                Err(e) => {
                    error!(%kind, error = %e, "Expiry sweep failed for listing kind");
                    report.failed_kinds.push(kind);
                }
            }
        }

        report
    }
}
