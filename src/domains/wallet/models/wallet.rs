use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// 지원 암호화폐
/// Supported crypto currencies (wallet currency tag)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Currency {
    Bitcoin,
    UsdtTrc20,
}

impl Currency {
    pub const ALL: [Currency; 2] = [Currency::Bitcoin, Currency::UsdtTrc20];

    /// DB / wire 표현
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Bitcoin => "BITCOIN",
            Currency::UsdtTrc20 => "USDT_TRC20",
        }
    }

    /// Ticker symbol (BTC, USDT)
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Bitcoin => "BTC",
            Currency::UsdtTrc20 => "USDT",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BITCOIN" => Ok(Currency::Bitcoin),
            "USDT_TRC20" => Ok(Currency::UsdtTrc20),
            other => Err(anyhow::anyhow!("Unknown currency: {}", other)),
        }
    }
}

// 지갑 엔티티 (DB 저장용)
// Wallet: a currency-specific address / key pair / balance record owned by one user
// private_key는 절대 응답으로 노출하지 않음 (WalletResponse 사용)
#[derive(Debug, Clone, PartialEq)]
pub struct Wallet {
    pub id: u64,
    pub user_id: u64,
    pub address: String,
    pub private_key: String,
    pub currency: Currency,
    /// NUMERIC(20,8)
    pub balance: Decimal,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 지갑 생성용 데이터
/// Data required to insert a wallet row
#[derive(Debug, Clone)]
pub struct NewWallet {
    pub user_id: u64,
    pub address: String,
    pub private_key: String,
    pub currency: Currency,
}

/// 지갑 조회 조건 (목록 / 검색 / 통계 공용)
/// Wallet filter shared by listing, searching and counting
#[derive(Debug, Clone, Default)]
pub struct WalletQuery {
    pub user_id: Option<u64>,
    pub currency: Option<Currency>,
    pub active: Option<bool>,
    /// address, owner username, owner email (case-insensitive substring)
    pub search: Option<String>,
}

/// 지갑 응답 DTO (private key 제외)
/// Wallet DTO (never carries the private key)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
#[schema(as = WalletDto)]
pub struct WalletResponse {
    pub id: u64,
    pub user_id: u64,
    #[schema(example = "bc1q3f0c5a9e2b7d4c1a8e6f0b2d4c6a8e0f")]
    pub address: String,
    pub currency: Currency,
    #[schema(value_type = String, example = "0.50000000")]
    pub balance: Decimal,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Wallet> for WalletResponse {
    fn from(wallet: &Wallet) -> Self {
        Self {
            id: wallet.id,
            user_id: wallet.user_id,
            address: wallet.address.clone(),
            currency: wallet.currency,
            balance: wallet.balance,
            active: wallet.active,
            created_at: wallet.created_at,
            updated_at: wallet.updated_at,
        }
    }
}

impl From<Wallet> for WalletResponse {
    fn from(wallet: Wallet) -> Self {
        WalletResponse::from(&wallet)
    }
}

/// 지갑 생성 요청
/// Create wallet request
#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = WalletCreationRequest)]
pub struct CreateWalletRequest {
    #[schema(example = "BITCOIN")]
    pub currency: Currency,
}

/// 관리자용 잔액 덮어쓰기 요청
/// Administrative balance overwrite request
#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = UpdateBalanceRequest)]
pub struct UpdateBalanceRequest {
    #[schema(value_type = String, example = "1.00000000")]
    pub balance: Decimal,
}
