//! Order lifecycle advancement.
//!
//! Statuses move `Accepted → Ready → Done`, with the parallel terminal path
//! `Cancelled → Done`. Sticker retrieval is an orthogonal side-channel, not
//! a transition. Each pass below is selected independently per cycle
//! (`change_flag = true` plus one status), evaluated tenant by tenant; a
//! failed remote call logs and leaves the order untouched, so it stays
//! eligible next cycle.

use super::{lookup_credential, CredentialLookup, JobKind, JobReport, TenantOutcome};
use crate::error::SyncResult;
use crate::retry::RetryExecutor;
use crate::select::group_by_tenant;
use crate::store::{Credential, Order, OrderStatus, SyncStore};
use crate::transport::MarketTransport;
use std::collections::HashSet;
use std::time::Instant;

/// One selection of the lifecycle machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    /// Accepted + flag: signal handling start.
    StartHandling,
    /// Ready + flag: invoice, then Done.
    Invoice,
    /// Cancelled + flag + reason: cancel twice, then Done.
    Cancel,
    /// Ready + empty sticker: fetch the sticker payload.
    Sticker,
}

impl Pass {
    fn as_str(&self) -> &'static str {
        match self {
            Pass::StartHandling => "start-handling",
            Pass::Invoice => "invoice",
            Pass::Cancel => "cancel",
            Pass::Sticker => "sticker",
        }
    }
}

/// Advances flagged orders through their remote-confirmed transitions.
pub fn run<S: SyncStore, T: MarketTransport>(
    store: &S,
    transport: &T,
    retry: &RetryExecutor,
    workers: usize,
) -> JobReport {
    let start = Instant::now();
    let mut outcomes = Vec::new();
    for pass in [Pass::StartHandling, Pass::Invoice, Pass::Cancel, Pass::Sticker] {
        outcomes.extend(run_pass(store, transport, retry, workers, pass));
    }
    JobReport::new(JobKind::OrderLifecycle, outcomes, start.elapsed())
}

fn select<S: SyncStore>(store: &S, pass: Pass) -> crate::store::StoreResult<Vec<Order>> {
    match pass {
        Pass::StartHandling => store.orders_in(OrderStatus::Accepted, true),
        Pass::Invoice => store.orders_in(OrderStatus::Ready, true),
        Pass::Cancel => {
            let orders = store.orders_in(OrderStatus::Cancelled, true)?;
            Ok(orders
                .into_iter()
                .filter(|o| o.reason.as_deref().is_some_and(|r| !r.is_empty()))
                .collect())
        }
        Pass::Sticker => store.orders_awaiting_sticker(),
    }
}

fn run_pass<S: SyncStore, T: MarketTransport>(
    store: &S,
    transport: &T,
    retry: &RetryExecutor,
    workers: usize,
    pass: Pass,
) -> Vec<TenantOutcome> {
    let groups = match select(store, pass) {
        Ok(orders) => group_by_tenant(orders),
        Err(error) => {
            tracing::error!(pass = pass.as_str(), error = %error,
                "order selection failed, aborting pass for this cycle");
            return Vec::new();
        }
    };
    if groups.is_empty() {
        return Vec::new();
    }

    let entries: Vec<_> = groups.into_iter().collect();
    super::run_bounded(workers, &entries, |(tenant, orders)| {
        let credential = match lookup_credential(store, JobKind::OrderLifecycle, tenant) {
            CredentialLookup::Found(c) => c,
            CredentialLookup::Missing => return TenantOutcome::skipped(tenant),
            CredentialLookup::Failed(message) => {
                return TenantOutcome::failed(tenant, message, orders.len())
            }
        };

        let mut sent = 0;
        let mut failed = 0;
        // One call set per business order number, as the store may hold
        // several rows for the same order.
        let mut seen = HashSet::new();
        for order in orders {
            if !seen.insert(order.order_id.clone()) {
                continue;
            }
            match advance(store, transport, retry, &credential, order, pass) {
                Ok(()) => sent += 1,
                Err(error) => {
                    tracing::warn!(pass = pass.as_str(), tenant, order = %order.order_id,
                        error = %error, "lifecycle call failed, order stays eligible");
                    failed += 1;
                }
            }
        }
        TenantOutcome::completed(tenant, sent, failed)
    })
}

fn advance<S: SyncStore, T: MarketTransport>(
    store: &S,
    transport: &T,
    retry: &RetryExecutor,
    credential: &Credential,
    order: &Order,
    pass: Pass,
) -> SyncResult<()> {
    match pass {
        Pass::StartHandling => {
            retry.execute(|| transport.start_order_handling(credential, &order.order_id))?;
            // Re-affirms the flag the upstream system set; the order stays
            // eligible until that system moves it to Ready.
            store.set_change_flag(&order.order_id, true)?;
            tracing::info!(order = %order.order_id, "order handling started");
        }
        Pass::Invoice => {
            retry.execute(|| transport.generate_invoice(credential, &order.order_id))?;
            store.set_order_status(&order.order_id, OrderStatus::Done)?;
            tracing::info!(order = %order.order_id, "invoice generated, order done");
        }
        Pass::Cancel => {
            let reason = order.reason.as_deref().unwrap_or_default();
            // The service requires the cancellation to be confirmed by a
            // second identical call before it takes effect.
            retry.execute(|| transport.cancel_order(credential, &order.order_id, reason))?;
            retry.execute(|| transport.cancel_order(credential, &order.order_id, reason))?;
            store.set_order_status(&order.order_id, OrderStatus::Done)?;
            tracing::info!(order = %order.order_id, "cancellation confirmed, order done");
        }
        Pass::Sticker => {
            let payload =
                retry.execute(|| transport.sticker_report(credential, &order.order_id))?;
            store.set_sticker(&order.order_id, payload)?;
            tracing::info!(order = %order.order_id, "sticker stored");
        }
    }
    Ok(())
}
