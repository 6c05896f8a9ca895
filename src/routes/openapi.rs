// OpenAPI 스키마 정의 (/api-docs/openapi.json 으로 제공)
use utoipa::OpenApi;
use crate::domains::auth::handlers::auth_handler;
use crate::domains::admin::handlers::admin_handler;
use crate::domains::wallet::handlers::wallet_handler;
use crate::domains::ledger::handlers::transaction_handler;
use crate::domains::dashboard::handlers::dashboard_handler;
use crate::domains::auth::models::*;
use crate::domains::admin::models::*;
use crate::domains::wallet::models::*;
use crate::domains::ledger::models::*;
use crate::domains::dashboard::models::*;
use crate::shared::utils::{AdminPage, TransactionPage, UserPage, WalletPage};

#[derive(OpenApi)]
#[openapi(
    paths(
        auth_handler::register,
        auth_handler::login,
        auth_handler::get_me,
        auth_handler::get_user,
        auth_handler::get_user_by_username,
        auth_handler::get_all_users,
        auth_handler::update_user,
        auth_handler::deactivate_user,
        auth_handler::change_password,
        auth_handler::delete_user,
        admin_handler::register,
        admin_handler::login,
        admin_handler::get_me,
        admin_handler::get_admin,
        admin_handler::get_admin_by_username,
        admin_handler::list_admins,
        admin_handler::search_admins,
        admin_handler::get_admins_by_role,
        admin_handler::update_admin,
        admin_handler::deactivate_admin,
        admin_handler::delete_admin,
        admin_handler::change_password,
        admin_handler::active_admin_count,
        admin_handler::recently_active_admin_count,
        wallet_handler::create_wallet,
        wallet_handler::get_user_wallets,
        wallet_handler::get_wallet,
        wallet_handler::get_wallet_by_address,
        wallet_handler::refresh_balance,
        wallet_handler::update_balance,
        wallet_handler::deactivate_wallet,
        transaction_handler::send_transaction,
        transaction_handler::process_incoming,
        transaction_handler::update_status,
        transaction_handler::get_wallet_transactions,
        transaction_handler::get_user_transactions,
        transaction_handler::get_transaction_by_hash,
        dashboard_handler::get_stats,
        dashboard_handler::list_users,
        dashboard_handler::search_users,
        dashboard_handler::toggle_user_status,
        dashboard_handler::list_wallets,
        dashboard_handler::search_wallets,
        dashboard_handler::toggle_wallet_status,
        dashboard_handler::refresh_wallet_balance,
        dashboard_handler::list_transactions,
        dashboard_handler::search_transactions,
        dashboard_handler::pending_transactions,
        dashboard_handler::users_registered,
        dashboard_handler::transactions_in_period,
        dashboard_handler::volume_in_period,
        dashboard_handler::create_sample_data
    ),
    components(schemas(
        RegisterUserRequest,
        LoginRequest,
        AuthResponse,
        UpdateUserRequest,
        ChangePasswordRequest,
        MessageResponse,
        UserResponse,
        AdminRole,
        RegisterAdminRequest,
        AdminAuthResponse,
        UpdateAdminRequest,
        AdminCountResponse,
        AdminResponse,
        Currency,
        CreateWalletRequest,
        UpdateBalanceRequest,
        WalletResponse,
        TransactionType,
        TransactionStatus,
        TransactionResponse,
        SendTransactionRequest,
        IncomingTransactionRequest,
        IncomingTransactionResponse,
        UpdateTransactionStatusRequest,
        SystemStats,
        PeriodCountResponse,
        VolumeResponse,
        UserPage,
        AdminPage,
        WalletPage,
        TransactionPage
    )),
    modifiers(
        &SecurityAddon
    ),
    tags(
        (name = "Users", description = "User accounts"),
        (name = "Admins", description = "Admin accounts"),
        (name = "Wallets", description = "Custodial wallets (BITCOIN, USDT_TRC20)"),
        (name = "Transactions", description = "Ledger: sends, incoming transfers, status updates"),
        (name = "Dashboard", description = "Admin dashboard statistics and management")
    ),
    info(
        title = "Crypto Wallet Admin API",
        description = "Custodial crypto wallet backend with an admin dashboard",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

// Security scheme 정의 (Bearer JWT)
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "BearerAuth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
