// src/docs.rs

use utoipa::openapi::security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::signup,
        handlers::auth::login,
        handlers::auth::session,

        // --- Users ---
        handlers::auth::logout,
        handlers::users::profile,
        handlers::users::business_users,
        handlers::users::change_password,
        handlers::users::create_employee,

        // --- Tenancy ---
        handlers::tenancy::create_business,
        handlers::tenancy::login_business,
        handlers::tenancy::change_business_password,
        handlers::tenancy::my_business,
        handlers::tenancy::assign_user,

        // --- Catalog ---
        handlers::catalog::list_categories,
        handlers::catalog::create_category,
        handlers::catalog::get_category,
        handlers::catalog::update_category,
        handlers::catalog::delete_category,
        handlers::catalog::category_products,
        handlers::catalog::list_products,
        handlers::catalog::create_product,
        handlers::catalog::get_product,
        handlers::catalog::update_product,
        handlers::catalog::delete_product,
        handlers::catalog::count_products,
        handlers::catalog::low_stock_count,
        handlers::catalog::low_stock_items,
        handlers::catalog::total_value,

        // --- Inventory ---
        handlers::inventory::create_sale,
        handlers::inventory::list_sales,
        handlers::inventory::last_five_sales,
        handlers::inventory::products_for_sale,
        handlers::inventory::delete_sale_records,
        handlers::inventory::add_stock,
        handlers::inventory::product_stock_history,
        handlers::inventory::list_stock_entries,

        // --- Reports ---
        handlers::reports::generate_report,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::SignupRole,
            models::auth::User,
            models::auth::SignupPayload,
            models::auth::LoginUserPayload,
            models::auth::CreateEmployeePayload,
            models::auth::ChangePasswordPayload,
            models::auth::AuthResponse,
            models::auth::BusinessSummary,
            models::auth::ProfileResponse,
            models::auth::SessionResponse,

            // --- Tenancy ---
            models::tenancy::BusinessMember,
            models::tenancy::CreateBusinessPayload,
            models::tenancy::LoginBusinessPayload,
            models::tenancy::AssignUserPayload,
            models::tenancy::ChangeBusinessPasswordPayload,
            models::tenancy::BusinessSessionResponse,

            // --- Catalog ---
            models::catalog::Category,
            models::catalog::Product,
            models::catalog::ProductCount,
            models::catalog::LowStockCount,
            models::catalog::InventoryValue,
            models::catalog::CategoryPayload,
            models::catalog::ProductPayload,

            // --- Inventory ---
            models::inventory::StockEntry,
            models::inventory::StockEntryDetail,
            models::inventory::Sale,
            models::inventory::SaleDetail,
            models::inventory::ProductForSale,
            models::inventory::PurgeResult,
            models::inventory::SellPayload,
            models::inventory::AddStockPayload,

            // --- Reports ---
            models::report::ReportKind,
            models::report::ReportRow,
            models::report::SalesSummary,
            models::report::Report,
            models::report::GenerateReportPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Cadastro, login e sessão"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Tenancy", description = "Empresas e vínculo de usuários"),
        (name = "Catalog", description = "Categorias e produtos"),
        (name = "Inventory", description = "Vendas e entradas de estoque"),
        (name = "Reports", description = "Dados para relatórios")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
        // O mesmo token também é aceito pelo cookie HttpOnly `token`.
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("token"))),
        );
    }
}
