//! End-to-end reservation flow tests against a throwaway SQLite database.
use log::*;
use sle_common::Money;
use stock_ledger_engine::{
    db_types::{Account, NewAccount, NewProduct, OwnershipMode, Product, ReservationLine},
    order_objects::OrderQueryFilter,
    test_utils::{prepare_test_env, random_db_path},
    AccountApi,
    AccountManagement,
    AuthApi,
    CatalogApi,
    OrderFlowApi,
    SqliteDatabase,
    StockLedgerError,
};

async fn new_db() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database")
}

async fn seed_account(db: &SqliteDatabase, name: &str) -> Account {
    let auth = AuthApi::new(db.clone());
    let account =
        NewAccount::new(name.to_string(), format!("{name}@example.com"), "retail".to_string(), "pw".to_string());
    auth.create_account(account).await.expect("Error creating account")
}

async fn seed_product(db: &SqliteDatabase, account_id: i64, name: &str, price: i64, quantity: i64) -> Product {
    let catalog = CatalogApi::new(db.clone());
    let product = NewProduct::new(name, "general", "unit", "img/product.png", Money::from(price))
        .with_cost_price(Money::from(price / 2))
        .with_quantity(quantity);
    let mut products = catalog.add_product(account_id, product).await.expect("Error adding product");
    products.pop().expect("Catalog should not be empty after insert")
}

#[tokio::test]
async fn repeat_reservations_merge_and_pin_the_unit_price() {
    let db = new_db().await;
    let account = seed_account(&db, "alice").await;
    let product = seed_product(&db, account.id, "Teak chair", 45_00, 10).await;
    let api = OrderFlowApi::new(db.clone(), OwnershipMode::SelfOrder);
    let catalog = CatalogApi::new(db.clone());

    let orders = api.place_order(account.id, &[ReservationLine::new(product.id, 3)]).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].items.len(), 1);
    assert_eq!(orders[0].items[0].quantity_ordered, 3);
    assert_eq!(orders[0].items[0].unit_price, Money::from(45_00));

    // Reprice the catalog entry between the two reservations. The merged line must keep the price
    // that was in effect when it was first created.
    sqlx::query("UPDATE products SET selling_price = 9999 WHERE id = ?")
        .bind(product.id)
        .execute(db.pool())
        .await
        .unwrap();

    let orders = api.place_order(account.id, &[ReservationLine::new(product.id, 3)]).await.unwrap();
    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order.items.len(), 1, "Repeat reservation must merge, not duplicate");
    let item = &order.items[0];
    assert_eq!(item.quantity_ordered, 6);
    assert_eq!(item.unit_price, Money::from(45_00));
    assert_eq!(item.total_price, Money::from(45_00) * 6);
    assert_eq!(order.order.grand_total, Money::from(45_00) * 6);
    assert_eq!(order.order.grand_total, order.items_total());

    let product = catalog.find_product(product.id).await.unwrap();
    assert_eq!(product.quantity_on_hand, 4);
    info!("🛒️ Merge test complete");
}

#[tokio::test]
async fn oversized_reservations_are_rejected_and_stock_is_untouched() {
    let db = new_db().await;
    let account = seed_account(&db, "bob").await;
    let product = seed_product(&db, account.id, "Oak table", 120_00, 10).await;
    let api = OrderFlowApi::new(db.clone(), OwnershipMode::SelfOrder);

    let err = api.place_order(account.id, &[ReservationLine::new(product.id, 11)]).await.unwrap_err();
    match err {
        StockLedgerError::InsufficientStock { product_id, requested, available } => {
            assert_eq!(product_id, product.id);
            assert_eq!(requested, 11);
            assert_eq!(available, 10);
        },
        other => panic!("Expected InsufficientStock, got {other}"),
    }

    let catalog = CatalogApi::new(db.clone());
    let product = catalog.find_product(product.id).await.unwrap();
    assert_eq!(product.quantity_on_hand, 10);
}

#[tokio::test]
async fn a_failing_line_rolls_back_the_whole_batch() {
    let db = new_db().await;
    let account = seed_account(&db, "carol").await;
    let chairs = seed_product(&db, account.id, "Chair", 45_00, 10).await;
    let tables = seed_product(&db, account.id, "Table", 120_00, 5).await;
    let api = OrderFlowApi::new(db.clone(), OwnershipMode::SelfOrder);

    // First line would succeed on its own; the second exceeds stock.
    let lines = [ReservationLine::new(chairs.id, 4), ReservationLine::new(tables.id, 9)];
    let err = api.place_order(account.id, &lines).await.unwrap_err();
    assert!(matches!(err, StockLedgerError::InsufficientStock { .. }));

    let catalog = CatalogApi::new(db.clone());
    assert_eq!(catalog.find_product(chairs.id).await.unwrap().quantity_on_hand, 10);
    assert_eq!(catalog.find_product(tables.id).await.unwrap().quantity_on_hand, 5);
    let orders = api.db().fetch_orders_for_account(account.id).await.unwrap();
    assert!(orders.is_empty(), "No order may survive a rejected batch");
}

#[tokio::test]
async fn grand_total_tracks_the_item_totals() {
    let db = new_db().await;
    let account = seed_account(&db, "dave").await;
    let chairs = seed_product(&db, account.id, "Chair", 45_00, 20).await;
    let tables = seed_product(&db, account.id, "Table", 120_00, 20).await;
    let api = OrderFlowApi::new(db.clone(), OwnershipMode::SelfOrder);

    let lines = [ReservationLine::new(chairs.id, 2), ReservationLine::new(tables.id, 1)];
    let orders = api.place_order(account.id, &lines).await.unwrap();
    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order.order.grand_total, Money::from(45_00) * 2 + Money::from(120_00));
    assert_eq!(order.order.grand_total, order.items_total());

    let orders = api.place_order(account.id, &[ReservationLine::new(chairs.id, 3)]).await.unwrap();
    let order = &orders[0];
    assert_eq!(order.order.grand_total, Money::from(45_00) * 5 + Money::from(120_00));
    assert_eq!(order.order.grand_total, order.items_total());
}

#[tokio::test]
async fn items_complete_exactly_once() {
    let db = new_db().await;
    let account = seed_account(&db, "erin").await;
    let product = seed_product(&db, account.id, "Lamp", 30_00, 10).await;
    let api = OrderFlowApi::new(db.clone(), OwnershipMode::SelfOrder);

    let orders = api.place_order(account.id, &[ReservationLine::new(product.id, 2)]).await.unwrap();
    let order_id = orders[0].order.id;
    let item_id = orders[0].items[0].id;

    let item = api.complete_item(account.id, order_id, item_id).await.unwrap();
    assert_eq!(item.status.to_string(), "Completed");

    let err = api.complete_item(account.id, order_id, item_id).await.unwrap_err();
    assert!(matches!(err, StockLedgerError::InvalidStatusChange { .. }));
}

#[tokio::test]
async fn only_the_seller_may_complete_an_item() {
    let db = new_db().await;
    let seller = seed_account(&db, "fred").await;
    let intruder = seed_account(&db, "mallory").await;
    let product = seed_product(&db, seller.id, "Rug", 80_00, 10).await;
    let api = OrderFlowApi::new(db.clone(), OwnershipMode::SelfOrder);

    let orders = api.place_order(seller.id, &[ReservationLine::new(product.id, 1)]).await.unwrap();
    let order_id = orders[0].order.id;
    let item_id = orders[0].items[0].id;

    let err = api.complete_item(intruder.id, order_id, item_id).await.unwrap_err();
    assert!(matches!(err, StockLedgerError::NotItemSeller { item_id: id } if id == item_id));
}

#[tokio::test]
async fn degenerate_requests_are_rejected_up_front() {
    let db = new_db().await;
    let account = seed_account(&db, "grace").await;
    let product = seed_product(&db, account.id, "Vase", 25_00, 10).await;
    let api = OrderFlowApi::new(db.clone(), OwnershipMode::SelfOrder);

    let err = api.place_order(account.id, &[]).await.unwrap_err();
    assert!(matches!(err, StockLedgerError::ValidationError(_)));
    let err = api.place_order(account.id, &[ReservationLine::new(product.id, 0)]).await.unwrap_err();
    assert!(matches!(err, StockLedgerError::ValidationError(_)));
    let err = api.place_order(account.id, &[ReservationLine::new(product.id, -3)]).await.unwrap_err();
    assert!(matches!(err, StockLedgerError::ValidationError(_)));
    let err = api.place_order(9_999, &[ReservationLine::new(product.id, 1)]).await.unwrap_err();
    assert!(matches!(err, StockLedgerError::AccountNotFound(9_999)));
    let err = api.place_order(account.id, &[ReservationLine::new(9_999, 1)]).await.unwrap_err();
    assert!(matches!(err, StockLedgerError::ProductNotFound(9_999)));
}

#[tokio::test]
async fn self_order_mode_rejects_foreign_products() {
    let db = new_db().await;
    let owner = seed_account(&db, "heidi").await;
    let buyer = seed_account(&db, "ivan").await;
    let product = seed_product(&db, owner.id, "Desk", 200_00, 10).await;
    let api = OrderFlowApi::new(db.clone(), OwnershipMode::SelfOrder);

    let err = api.place_order(buyer.id, &[ReservationLine::new(product.id, 1)]).await.unwrap_err();
    assert!(matches!(err, StockLedgerError::NotProductOwner { product_id } if product_id == product.id));

    let catalog = CatalogApi::new(db.clone());
    assert_eq!(catalog.find_product(product.id).await.unwrap().quantity_on_hand, 10);
}

#[tokio::test]
async fn marketplace_mode_records_buyer_and_seller() {
    let db = new_db().await;
    let seller = seed_account(&db, "judy").await;
    let buyer = seed_account(&db, "kim").await;
    let product = seed_product(&db, seller.id, "Bookshelf", 150_00, 10).await;
    let api = OrderFlowApi::new(db.clone(), OwnershipMode::Marketplace);

    let orders = api.place_order(buyer.id, &[ReservationLine::new(product.id, 2)]).await.unwrap();
    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order.order.buyer_id, buyer.id);
    assert_eq!(order.order.seller_id, seller.id);
    assert_eq!(order.order.buyer_email, "kim@example.com");
    assert_eq!(order.items[0].seller_id, seller.id);
    assert_eq!(order.items[0].seller_email, "judy@example.com");

    // Only the seller can complete the item, even though the buyer owns the order.
    let err = api.complete_item(buyer.id, order.order.id, order.items[0].id).await.unwrap_err();
    assert!(matches!(err, StockLedgerError::NotItemSeller { .. }));
    api.complete_item(seller.id, order.order.id, order.items[0].id).await.unwrap();
}

#[tokio::test]
async fn ledger_queries_see_both_sides_of_an_order() {
    let db = new_db().await;
    let seller = seed_account(&db, "nora").await;
    let buyer = seed_account(&db, "oscar").await;
    let product = seed_product(&db, seller.id, "Shelf", 90_00, 10).await;
    let flow = OrderFlowApi::new(db.clone(), OwnershipMode::Marketplace);
    let api = AccountApi::new(db.clone());

    let orders = flow.place_order(buyer.id, &[ReservationLine::new(product.id, 2)]).await.unwrap();
    let order_id = orders[0].order.id;

    let account = api.account_by_email("oscar@example.com").await.unwrap().unwrap();
    assert_eq!(account.id, buyer.id);
    assert!(api.account_by_id(999).await.unwrap().is_none());

    let full = api.order_by_id(order_id).await.unwrap().unwrap();
    assert_eq!(full.items.len(), 1);
    assert_eq!(full.order.grand_total, full.items_total());

    // The order shows up in both participants' histories.
    assert_eq!(api.orders_for_account(buyer.id).await.unwrap().len(), 1);
    assert_eq!(api.orders_for_account(seller.id).await.unwrap().len(), 1);

    let found = api.search_orders(OrderQueryFilter::default().with_buyer_id(buyer.id)).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, order_id);
    let found = api.search_orders(OrderQueryFilter::default().with_seller_id(buyer.id)).await.unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn restocking_replenishes_what_reservations_took() {
    let db = new_db().await;
    let account = seed_account(&db, "leo").await;
    let product = seed_product(&db, account.id, "Stool", 15_00, 10).await;
    let api = OrderFlowApi::new(db.clone(), OwnershipMode::SelfOrder);
    let catalog = CatalogApi::new(db.clone());

    api.place_order(account.id, &[ReservationLine::new(product.id, 7)]).await.unwrap();
    assert_eq!(catalog.find_product(product.id).await.unwrap().quantity_on_hand, 3);

    let updated = catalog.restock(account.id, product.id, 7).await.unwrap();
    assert_eq!(updated.quantity_on_hand, 10);

    let err = catalog.restock(account.id, product.id, 0).await.unwrap_err();
    assert!(matches!(err, StockLedgerError::ValidationError(_)));
    let err = catalog.restock(account.id, product.id, -5).await.unwrap_err();
    assert!(matches!(err, StockLedgerError::ValidationError(_)));
    // Restocking someone else's product is not a thing.
    let stranger = seed_account(&db, "mona").await;
    let err = catalog.restock(stranger.id, product.id, 5).await.unwrap_err();
    assert!(matches!(err, StockLedgerError::ProductNotFound(_)));
}
