use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use sle_common::{Money, Secret};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------      ItemStatus       -------------------------------------------------------
/// Lifecycle of a single order line. Items start out `Pending` and move to `Completed` exactly once;
/// there is no reverse transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum ItemStatus {
    /// The item has been reserved against stock but not yet worked off.
    Pending,
    /// The item has been fulfilled.
    Completed,
}

impl Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemStatus::Pending => write!(f, "Pending"),
            ItemStatus::Completed => write!(f, "Completed"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid item status: {0}")]
pub struct ConversionError(String);

impl FromStr for ItemStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Completed" => Ok(Self::Completed),
            s => Err(ConversionError(format!("Invalid item status: {s}"))),
        }
    }
}

impl From<String> for ItemStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid item status: {value}. But this conversion cannot fail. Defaulting to Pending");
            ItemStatus::Pending
        })
    }
}

//--------------------------------------    OwnershipMode      -------------------------------------------------------
/// Deployment mode for the reservation engine. Configured once at API construction; the engine never
/// guesses the mode per call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OwnershipMode {
    /// Accounts may only reserve their own inventory. Used for internal stock-movement tracking.
    #[default]
    SelfOrder,
    /// Any account may order another account's products. Order items record both buyer and seller.
    Marketplace,
}

//--------------------------------------       Account         -------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Account {
    pub id: i64,
    pub business_name: String,
    pub email: String,
    pub business_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      NewAccount       -------------------------------------------------------
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub business_name: String,
    pub email: String,
    pub business_type: String,
    #[serde(skip)]
    pub password: Secret<String>,
}

impl NewAccount {
    pub fn new<S: Into<String>>(business_name: S, email: S, business_type: S, password: S) -> Self {
        Self {
            business_name: business_name.into(),
            email: email.into(),
            business_type: business_type.into(),
            password: Secret::new(password.into()),
        }
    }
}

//-------------------------------------- AccountCredentials ----------------------------------------------------------
/// An account row together with its stored credential digest. Only the auth flow ever sees this; the
/// digest and salt never leave the engine.
#[derive(Debug, Clone, FromRow)]
pub struct AccountCredentials {
    pub id: i64,
    pub business_name: String,
    pub email: String,
    pub business_type: String,
    pub password_digest: String,
    pub password_salt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountCredentials {
    pub fn into_account(self) -> Account {
        Account {
            id: self.id,
            business_name: self.business_name,
            email: self.email,
            business_type: self.business_type,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

//--------------------------------------       Product         -------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: i64,
    /// The owning account. Products never change hands.
    pub account_id: i64,
    pub name: String,
    pub category: String,
    pub item_type: String,
    pub image_ref: String,
    pub selling_price: Money,
    pub cost_price: Option<Money>,
    pub quantity_on_hand: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      NewProduct       -------------------------------------------------------
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub item_type: String,
    pub image_ref: String,
    pub selling_price: Money,
    pub cost_price: Option<Money>,
    pub quantity_on_hand: i64,
}

impl NewProduct {
    pub fn new<S: Into<String>>(name: S, category: S, item_type: S, image_ref: S, selling_price: Money) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            item_type: item_type.into(),
            image_ref: image_ref.into(),
            selling_price,
            cost_price: None,
            quantity_on_hand: 0,
        }
    }

    pub fn with_cost_price(mut self, cost_price: Money) -> Self {
        self.cost_price = Some(cost_price);
        self
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity_on_hand = quantity;
        self
    }
}

//--------------------------------------        Order          -------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: i64,
    pub buyer_id: i64,
    pub buyer_email: String,
    pub seller_id: i64,
    /// Sum of all item totals on this order. Recomputed from the items after every mutation.
    pub grand_total: Money,
    pub ordered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      OrderItem        -------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    /// Denormalized at insert time. Not refreshed if the catalog entry is later renamed.
    pub product_name: String,
    pub seller_id: i64,
    pub seller_email: String,
    /// Cumulative across merges.
    pub quantity_ordered: i64,
    /// Catalog price at FIRST insertion. Merges never re-read the catalog price.
    pub unit_price: Money,
    pub total_price: Money,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      FullOrder        -------------------------------------------------------
/// An order together with all of its items.
#[derive(Debug, Clone, Serialize)]
pub struct FullOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

impl FullOrder {
    /// The sum of the item totals. Always equal to `order.grand_total` for an order read back from
    /// the ledger.
    pub fn items_total(&self) -> Money {
        self.items.iter().map(|i| i.total_price).sum()
    }
}

//--------------------------------------   ReservationLine     -------------------------------------------------------
/// One line of a reservation request.
#[derive(Debug, Clone, Deserialize)]
pub struct ReservationLine {
    pub product_id: i64,
    pub quantity: i64,
    /// Optional status override. When merging into an existing item, a supplied status overwrites the
    /// stored one; when absent, new items default to `Pending` and merged items keep their status.
    pub status: Option<ItemStatus>,
}

impl ReservationLine {
    pub fn new(product_id: i64, quantity: i64) -> Self {
        Self { product_id, quantity, status: None }
    }

    pub fn with_status(mut self, status: ItemStatus) -> Self {
        self.status = Some(status);
        self
    }
}
