// Livro-razão de estoque contra um Postgres real.
// Rodar com: DATABASE_URL=postgres://... cargo test -- --ignored

mod common;

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use common::{price, product_payload, state, tenant};
use stockapp::{common::error::AppError, config::AppState, models::catalog::Product};

async fn chips(state: &AppState, business_id: Uuid) -> Product {
    let snacks = state
        .catalog_service
        .create_category(business_id, "Snacks")
        .await
        .unwrap();
    state
        .catalog_service
        .create_product(business_id, &product_payload(snacks.id, "Chips", 50, price(200)))
        .await
        .unwrap()
}

async fn ledger_quantity(pool: &PgPool, product_id: Uuid) -> i64 {
    let added: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM stock_entries WHERE product_id = $1",
    )
    .bind(product_id)
    .fetch_one(pool)
    .await
    .unwrap();
    let sold: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM sales WHERE product_id = $1 AND deleted_at IS NULL",
    )
    .bind(product_id)
    .fetch_one(pool)
    .await
    .unwrap();
    added - sold
}

async fn sales_count(pool: &PgPool, product_id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE product_id = $1")
        .bind(product_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn product_creation_records_the_initial_stock(pool: PgPool) {
    let state = state(pool);
    let (admin, business_id) = tenant(&state, "Acme").await;

    // O usuário vinculado faz login de novo e recebe o business_id no token.
    let token = state
        .auth_service
        .login(&admin.email, common::PASSWORD)
        .await
        .unwrap();
    assert_eq!(common::principal_from(&state, &token).business_id, Some(business_id));

    let product = chips(&state, business_id).await;
    assert_eq!(product.quantity, 50);

    let entries = state
        .inventory_service
        .product_stock_history(business_id, product.id)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].quantity, 50);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn sale_decrements_stock_and_records_the_total(pool: PgPool) {
    let state = state(pool);
    let (_, business_id) = tenant(&state, "Acme").await;
    let product = chips(&state, business_id).await;

    let sale = state
        .inventory_service
        .create_sale(business_id, product.id, 10)
        .await
        .unwrap();
    assert_eq!(sale.total, Decimal::new(2000, 2));

    let product = state.catalog_service.get_product(business_id, product.id).await.unwrap();
    assert_eq!(product.quantity, 40);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn overdraft_is_rejected_and_changes_nothing(pool: PgPool) {
    let state = state(pool.clone());
    let (_, business_id) = tenant(&state, "Acme").await;
    let product = chips(&state, business_id).await;
    state.inventory_service.create_sale(business_id, product.id, 10).await.unwrap();

    let result = state.inventory_service.create_sale(business_id, product.id, 100).await;
    assert!(matches!(
        result,
        Err(AppError::InsufficientStock { available: 40, requested: 100 })
    ));

    let product = state.catalog_service.get_product(business_id, product.id).await.unwrap();
    assert_eq!(product.quantity, 40);
    assert_eq!(sales_count(&pool, product.id).await, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn edit_increases_are_ledgered_and_decreases_are_not(pool: PgPool) {
    let state = state(pool);
    let (_, business_id) = tenant(&state, "Acme").await;
    let product = chips(&state, business_id).await;
    state.inventory_service.create_sale(business_id, product.id, 10).await.unwrap();

    let up = state
        .catalog_service
        .update_product(business_id, product.id, &product_payload(product.category_id, "Chips", 60, price(200)))
        .await
        .unwrap();
    assert_eq!(up.quantity, 60);

    let entries = state
        .inventory_service
        .product_stock_history(business_id, product.id)
        .await
        .unwrap();
    assert_eq!(entries.iter().map(|e| e.quantity).collect::<Vec<_>>(), vec![50, 20]);

    let down = state
        .catalog_service
        .update_product(business_id, product.id, &product_payload(product.category_id, "Chips", 30, price(200)))
        .await
        .unwrap();
    assert_eq!(down.quantity, 30);

    let entries = state
        .inventory_service
        .product_stock_history(business_id, product.id)
        .await
        .unwrap();
    assert_eq!(entries.len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn quantity_matches_the_ledger_after_sales_and_additions(pool: PgPool) {
    let state = state(pool.clone());
    let (_, business_id) = tenant(&state, "Acme").await;
    let product = chips(&state, business_id).await;

    let inventory = &state.inventory_service;
    inventory.create_sale(business_id, product.id, 7).await.unwrap();
    inventory.add_stock(business_id, product.id, 15).await.unwrap();
    inventory.create_sale(business_id, product.id, 20).await.unwrap();
    assert!(inventory.create_sale(business_id, product.id, 1000).await.is_err());
    inventory.add_stock(business_id, product.id, 3).await.unwrap();
    inventory.create_sale(business_id, product.id, 41).await.unwrap();

    let product = state.catalog_service.get_product(business_id, product.id).await.unwrap();
    assert_eq!(product.quantity, 50 - 7 + 15 - 20 + 3 - 41);
    assert_eq!(i64::from(product.quantity), ledger_quantity(&pool, product.id).await);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn concurrent_sales_cannot_overdraw(pool: PgPool) {
    let state = state(pool.clone());
    let (_, business_id) = tenant(&state, "Acme").await;
    let category = state.catalog_service.create_category(business_id, "Snacks").await.unwrap();
    let product = state
        .catalog_service
        .create_product(business_id, &product_payload(category.id, "Chips", 10, price(200)))
        .await
        .unwrap();

    let (a, b) = tokio::join!(
        state.inventory_service.create_sale(business_id, product.id, 6),
        state.inventory_service.create_sale(business_id, product.id, 6),
    );

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1);
    assert!(matches!(
        a.err().or(b.err()),
        Some(AppError::InsufficientStock { available: 4, requested: 6 })
    ));

    let product = state.catalog_service.get_product(business_id, product.id).await.unwrap();
    assert_eq!(product.quantity, 4);
    assert_eq!(sales_count(&pool, product.id).await, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn failed_second_write_rolls_back_the_sale(pool: PgPool) {
    let state = state(pool.clone());
    let (_, business_id) = tenant(&state, "Acme").await;
    let product = chips(&state, business_id).await;

    // Falha simulada na baixa do saldo (segunda escrita da venda).
    sqlx::raw_sql(
        r#"
        CREATE FUNCTION fail_stock_decrement() RETURNS trigger AS $$
        BEGIN
            IF NEW.quantity < OLD.quantity THEN
                RAISE EXCEPTION 'falha simulada';
            END IF;
            RETURN NEW;
        END;
        $$ LANGUAGE plpgsql;
        CREATE TRIGGER fail_stock_decrement BEFORE UPDATE ON products
            FOR EACH ROW EXECUTE FUNCTION fail_stock_decrement();
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    let result = state.inventory_service.create_sale(business_id, product.id, 10).await;
    assert!(matches!(result, Err(AppError::DatabaseError(_))));

    assert_eq!(sales_count(&pool, product.id).await, 0);
    let product = state.catalog_service.get_product(business_id, product.id).await.unwrap();
    assert_eq!(product.quantity, 50);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn failed_history_write_rolls_back_the_product_update(pool: PgPool) {
    let state = state(pool.clone());
    let (_, business_id) = tenant(&state, "Acme").await;
    let product = chips(&state, business_id).await;

    // Falha simulada na gravação da entrada de estoque (segunda escrita da edição).
    sqlx::raw_sql(
        r#"
        CREATE FUNCTION fail_stock_entry() RETURNS trigger AS $$
        BEGIN
            RAISE EXCEPTION 'falha simulada';
        END;
        $$ LANGUAGE plpgsql;
        CREATE TRIGGER fail_stock_entry BEFORE INSERT ON stock_entries
            FOR EACH ROW EXECUTE FUNCTION fail_stock_entry();
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    let result = state
        .catalog_service
        .update_product(
            business_id,
            product.id,
            &product_payload(product.category_id, "Chips Grandes", 80, price(250)),
        )
        .await;
    assert!(result.is_err());

    let product = state.catalog_service.get_product(business_id, product.id).await.unwrap();
    assert_eq!(product.quantity, 50);
    assert_eq!(product.name, "Chips");
    assert_eq!(product.price, price(200));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn purging_sales_keeps_the_stock(pool: PgPool) {
    let state = state(pool);
    let (_, business_id) = tenant(&state, "Acme").await;
    let product = chips(&state, business_id).await;
    state.inventory_service.create_sale(business_id, product.id, 5).await.unwrap();
    state.inventory_service.create_sale(business_id, product.id, 5).await.unwrap();

    assert_eq!(state.inventory_service.delete_sale_records(business_id).await.unwrap(), 2);
    assert!(state.inventory_service.list_sales(business_id).await.unwrap().is_empty());

    let product = state.catalog_service.get_product(business_id, product.id).await.unwrap();
    assert_eq!(product.quantity, 40);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn recent_sales_are_capped_at_five(pool: PgPool) {
    let state = state(pool);
    let (_, business_id) = tenant(&state, "Acme").await;
    let product = chips(&state, business_id).await;
    for _ in 0..7 {
        state.inventory_service.create_sale(business_id, product.id, 1).await.unwrap();
    }

    let recent = state.inventory_service.last_sales(business_id).await.unwrap();
    assert_eq!(recent.len(), 5);
    assert!(recent.iter().all(|s| s.product_name == "Chips"));
    assert_eq!(state.inventory_service.list_sales(business_id).await.unwrap().len(), 7);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn restock_beyond_the_integer_range_is_rejected(pool: PgPool) {
    let state = state(pool);
    let (_, business_id) = tenant(&state, "Acme").await;
    let product = chips(&state, business_id).await;

    let result = state.inventory_service.add_stock(business_id, product.id, i32::MAX).await;
    assert!(matches!(result, Err(AppError::InvalidInput(_))));

    let product = state.catalog_service.get_product(business_id, product.id).await.unwrap();
    assert_eq!(product.quantity, 50);
    let entries = state
        .inventory_service
        .product_stock_history(business_id, product.id)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
}
