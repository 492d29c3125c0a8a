use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{FullOrder, OrderItem, OwnershipMode, ReservationLine},
    traits::{StockLedgerDatabase, StockLedgerError},
};

/// `OrderFlowApi` is the primary API for the reservation flow: placing orders against the catalog and
/// transitioning their items through the pending → completed lifecycle.
///
/// The ownership mode is fixed at construction. In [`OwnershipMode::SelfOrder`] (the default
/// deployment), accounts may only reserve their own inventory; in [`OwnershipMode::Marketplace`], any
/// account may order another's products. The engine never mixes the two behaviours in one deployment.
pub struct OrderFlowApi<B> {
    db: B,
    mode: OwnershipMode,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi ({:?})", self.mode)
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B, mode: OwnershipMode) -> Self {
        Self { db, mode }
    }

    pub fn mode(&self) -> OwnershipMode {
        self.mode
    }
}

impl<B> OrderFlowApi<B>
where B: StockLedgerDatabase
{
    /// Places a reservation for the buyer: validates availability, decrements catalog stock, and
    /// writes or merges the corresponding ledger entries, all as one atomic unit.
    ///
    /// Either every line in the request is applied, or none is; a rejected request never leaves
    /// stock decremented. Repeat reservations for a product merge into the existing order line at the
    /// unit price stored when the line was first created.
    ///
    /// Returns the full updated orders the request touched: exactly one in self-order mode, one per
    /// distinct seller in marketplace mode.
    pub async fn place_order(
        &self,
        buyer_id: i64,
        lines: &[ReservationLine],
    ) -> Result<Vec<FullOrder>, StockLedgerError> {
        if lines.is_empty() {
            return Err(StockLedgerError::ValidationError("Reservation requires at least one line".to_string()));
        }
        for line in lines {
            if line.quantity <= 0 {
                return Err(StockLedgerError::ValidationError(format!(
                    "Quantity for product {} must be positive, got {}",
                    line.product_id, line.quantity
                )));
            }
        }
        let buyer =
            self.db.fetch_account(buyer_id).await?.ok_or(StockLedgerError::AccountNotFound(buyer_id))?;
        let orders = self.db.process_reservation(&buyer, lines, self.mode).await?;
        debug!(
            "🛒️ Reservation complete for buyer #{buyer_id}: {} line(s) across {} order(s)",
            lines.len(),
            orders.len()
        );
        Ok(orders)
    }

    /// Marks a pending order item as completed. The acting account must be the item's seller, and
    /// `Pending → Completed` is the only legal transition.
    pub async fn complete_item(
        &self,
        account_id: i64,
        order_id: i64,
        item_id: i64,
    ) -> Result<OrderItem, StockLedgerError> {
        let item = self.db.complete_order_item(account_id, order_id, item_id).await?;
        trace!("🛒️ Item #{item_id} completed by account #{account_id}");
        Ok(item)
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
