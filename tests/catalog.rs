// Catálogo, isolamento entre empresas e relatórios contra um Postgres real.

mod common;

use chrono::{Duration, Utc};
use sqlx::PgPool;

use common::{price, product_payload, state, tenant};
use stockapp::{
    common::error::AppError,
    models::report::{GenerateReportPayload, ReportKind},
};

fn report(kind: &str) -> GenerateReportPayload {
    let now = Utc::now();
    GenerateReportPayload {
        report_type: kind.into(),
        start_date: (now - Duration::days(1)).to_rfc3339(),
        end_date: (now + Duration::days(1)).to_rfc3339(),
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn other_businesses_never_see_the_data(pool: PgPool) {
    let state = state(pool);
    let (_, acme) = tenant(&state, "Acme").await;
    let (_, globex) = tenant(&state, "Globex").await;

    let catalog = &state.catalog_service;
    let snacks = catalog.create_category(acme, "Snacks").await.unwrap();
    let chips = catalog
        .create_product(acme, &product_payload(snacks.id, "Chips", 5, price(200)))
        .await
        .unwrap();
    state.inventory_service.create_sale(acme, chips.id, 1).await.unwrap();

    assert!(matches!(catalog.get_product(globex, chips.id).await, Err(AppError::NotFound(_))));
    assert!(matches!(catalog.get_category(globex, snacks.id).await, Err(AppError::NotFound(_))));
    assert!(matches!(
        catalog.update_category(globex, snacks.id, "Roubada").await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(catalog.delete_product(globex, chips.id).await, Err(AppError::NotFound(_))));
    assert!(matches!(
        state.inventory_service.create_sale(globex, chips.id, 1).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        state.inventory_service.add_stock(globex, chips.id, 1).await,
        Err(AppError::NotFound(_))
    ));

    // Categoria de outra empresa não serve de destino para um produto.
    let drinks = catalog.create_category(globex, "Bebidas").await.unwrap();
    assert!(matches!(
        catalog
            .create_product(globex, &product_payload(snacks.id, "Chips", 1, price(100)))
            .await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        catalog
            .update_product(acme, chips.id, &product_payload(drinks.id, "Chips", 4, price(200)))
            .await,
        Err(AppError::NotFound(_))
    ));

    assert!(catalog.list_products(globex).await.unwrap().is_empty());
    assert_eq!(catalog.list_categories(globex).await.unwrap().len(), 1);
    assert!(state.inventory_service.list_sales(globex).await.unwrap().is_empty());
    assert!(state.inventory_service.list_stock_entries(globex).await.unwrap().is_empty());
    assert_eq!(catalog.count_products(globex).await.unwrap(), 0);
    assert_eq!(state.inventory_service.delete_sale_records(globex).await.unwrap(), 0);
    assert_eq!(state.inventory_service.list_sales(acme).await.unwrap().len(), 1);

    let sales = state.report_service.generate(globex, &report("sales")).await.unwrap();
    assert!(sales.rows.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn names_are_unique_only_within_the_business(pool: PgPool) {
    let state = state(pool);
    let (_, acme) = tenant(&state, "Acme").await;
    let (_, globex) = tenant(&state, "Globex").await;
    let catalog = &state.catalog_service;

    let snacks = catalog.create_category(acme, "Snacks").await.unwrap();
    assert!(matches!(catalog.create_category(acme, "  snacks ").await, Err(AppError::Conflict(_))));
    let other_snacks = catalog.create_category(globex, "Snacks").await.unwrap();

    let drinks = catalog.create_category(acme, "Bebidas").await.unwrap();
    assert!(matches!(
        catalog.update_category(acme, drinks.id, "SNACKS").await,
        Err(AppError::Conflict(_))
    ));
    // Renomear para o próprio nome não conflita consigo mesma.
    assert_eq!(catalog.update_category(acme, drinks.id, "Bebidas").await.unwrap().name, "Bebidas");

    catalog
        .create_product(acme, &product_payload(snacks.id, "Chips", 1, price(200)))
        .await
        .unwrap();
    assert!(matches!(
        catalog
            .create_product(acme, &product_payload(snacks.id, "Chips", 1, price(200)))
            .await,
        Err(AppError::Conflict(_))
    ));
    // Mesmo nome em outra categoria ou em outra empresa é permitido.
    catalog
        .create_product(acme, &product_payload(drinks.id, "Chips", 1, price(200)))
        .await
        .unwrap();
    catalog
        .create_product(globex, &product_payload(other_snacks.id, "Chips", 1, price(200)))
        .await
        .unwrap();

    assert!(matches!(catalog.create_category(acme, "   ").await, Err(AppError::InvalidInput(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn category_with_products_cannot_be_deleted(pool: PgPool) {
    let state = state(pool);
    let (_, acme) = tenant(&state, "Acme").await;
    let catalog = &state.catalog_service;

    let snacks = catalog.create_category(acme, "Snacks").await.unwrap();
    let chips = catalog
        .create_product(acme, &product_payload(snacks.id, "Chips", 1, price(200)))
        .await
        .unwrap();

    assert!(matches!(catalog.delete_category(acme, snacks.id).await, Err(AppError::Conflict(_))));
    assert_eq!(catalog.category_products(acme, snacks.id).await.unwrap().len(), 1);

    catalog.delete_product(acme, chips.id).await.unwrap();
    catalog.delete_category(acme, snacks.id).await.unwrap();

    assert!(matches!(catalog.get_category(acme, snacks.id).await, Err(AppError::NotFound(_))));
    assert!(matches!(catalog.delete_category(acme, snacks.id).await, Err(AppError::NotFound(_))));
    // O nome volta a ficar livre depois da exclusão.
    catalog.create_category(acme, "Snacks").await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn aggregates_follow_the_threshold(pool: PgPool) {
    let state = state(pool);
    let (_, acme) = tenant(&state, "Acme").await;
    let catalog = &state.catalog_service;
    let snacks = catalog.create_category(acme, "Snacks").await.unwrap();

    for (name, quantity, cents) in [("Chips", 50, 200), ("Pipoca", 10, 350), ("Amendoim", 3, 500)] {
        catalog
            .create_product(acme, &product_payload(snacks.id, name, quantity, price(cents)))
            .await
            .unwrap();
    }

    assert_eq!(catalog.count_products(acme).await.unwrap(), 3);

    let low = catalog.low_stock_count(acme).await.unwrap();
    assert_eq!((low.low_stock, low.threshold), (2, 10));

    let items = catalog.low_stock_items(acme).await.unwrap();
    assert_eq!(items.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(), vec!["Amendoim", "Pipoca"]);

    // 50 * 2.00 + 10 * 3.50 + 3 * 5.00
    assert_eq!(catalog.total_value(acme).await.unwrap(), price(15000));

    let for_sale = state.inventory_service.products_for_sale(acme).await.unwrap();
    assert_eq!(for_sale.len(), 3);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn reports_list_rows_for_the_period(pool: PgPool) {
    let state = state(pool);
    let (_, acme) = tenant(&state, "Acme").await;
    let catalog = &state.catalog_service;
    let snacks = catalog.create_category(acme, "Snacks").await.unwrap();
    let chips = catalog
        .create_product(acme, &product_payload(snacks.id, "Chips", 50, price(200)))
        .await
        .unwrap();
    catalog
        .create_product(acme, &product_payload(snacks.id, "Pipoca", 5, price(350)))
        .await
        .unwrap();

    state.inventory_service.create_sale(acme, chips.id, 10).await.unwrap();
    state.inventory_service.create_sale(acme, chips.id, 5).await.unwrap();

    let sales = state.report_service.generate(acme, &report("sales")).await.unwrap();
    assert_eq!(sales.kind, ReportKind::Sales);
    assert_eq!(sales.rows.len(), 2);
    assert!(sales.rows.iter().all(|r| r.product == "Chips" && r.date.len() == 10));
    let summary = sales.summary.expect("relatório de vendas tem resumo");
    assert_eq!(summary.total_items, 15);
    assert_eq!(summary.total_value, price(3000));

    let added = state.report_service.generate(acme, &report("added-stock")).await.unwrap();
    assert_eq!(added.rows.len(), 2);
    assert!(added.summary.is_none());

    let current = state.report_service.generate(acme, &report("current-stock")).await.unwrap();
    let chips_row = current.rows.iter().find(|r| r.product == "Chips").unwrap();
    assert_eq!(chips_row.quantity, 35);
    assert_eq!(chips_row.total_value, price(7000));

    let low = state.report_service.generate(acme, &report("low-stock")).await.unwrap();
    assert_eq!(low.rows.iter().map(|r| r.product.as_str()).collect::<Vec<_>>(), vec!["Pipoca"]);

    assert!(matches!(
        state.report_service.generate(acme, &report("inventario")).await,
        Err(AppError::InvalidInput(_))
    ));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn out_of_range_input_is_a_validation_error(pool: PgPool) {
    let state = state(pool);
    let (_, acme) = tenant(&state, "Acme").await;
    let catalog = &state.catalog_service;
    let snacks = catalog.create_category(acme, "Snacks").await.unwrap();

    let huge = product_payload(snacks.id, "Chips", 1, rust_decimal::Decimal::new(100_000_000_000, 0));
    assert!(matches!(catalog.create_product(acme, &huge).await, Err(AppError::ValidationError(_))));

    let chips = catalog
        .create_product(acme, &product_payload(snacks.id, "Chips", 1, price(200)))
        .await
        .unwrap();
    let fractional = product_payload(snacks.id, "Chips", 1, rust_decimal::Decimal::new(1999, 3));
    assert!(matches!(
        catalog.update_product(acme, chips.id, &fractional).await,
        Err(AppError::ValidationError(_))
    ));
    assert_eq!(catalog.get_product(acme, chips.id).await.unwrap().price, price(200));

    // O limite de tamanho vale para o nome já aparado.
    assert!(matches!(catalog.create_category(acme, "  a ").await, Err(AppError::InvalidInput(_))));
    assert!(matches!(
        catalog.update_category(acme, snacks.id, " b  ").await,
        Err(AppError::InvalidInput(_))
    ));
    assert_eq!(catalog.list_categories(acme).await.unwrap().len(), 1);
}
