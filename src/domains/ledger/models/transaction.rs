use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use crate::domains::wallet::models::Currency;

// 트랜잭션 방향
// Transaction direction relative to the owning wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Send,
    Receive,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Send => "SEND",
            TransactionType::Receive => "RECEIVE",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SEND" => Ok(TransactionType::Send),
            "RECEIVE" => Ok(TransactionType::Receive),
            other => Err(anyhow::anyhow!("Unknown transaction type: {}", other)),
        }
    }
}

// 트랜잭션 상태 enum (DB 저장용)
// Transition only via explicit status-update calls (no state machine)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,    // 전송됨, 확인 대기
    Confirmed,  // 확인됨
    Failed,     // 실패함
}

impl TransactionStatus {
    pub const ALL: [TransactionStatus; 3] = [
        TransactionStatus::Pending,
        TransactionStatus::Confirmed,
        TransactionStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Confirmed => "CONFIRMED",
            TransactionStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(TransactionStatus::Pending),
            "CONFIRMED" => Ok(TransactionStatus::Confirmed),
            "FAILED" => Ok(TransactionStatus::Failed),
            other => Err(anyhow::anyhow!("Unknown transaction status: {}", other)),
        }
    }
}

// DB 저장용 Transaction 모델
// Transaction row: belongs to exactly one wallet, unique tx_hash
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: u64,
    pub wallet_id: u64,
    pub tx_hash: String,
    pub from_address: String,
    pub to_address: String,
    pub amount: Decimal,
    pub fee: Option<Decimal>,
    pub tx_type: TransactionType,
    pub status: TransactionStatus,
    pub block_number: Option<u64>,
    pub confirmations: Option<u32>,
    pub memo: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 트랜잭션 생성용 데이터
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub wallet_id: u64,
    pub tx_hash: String,
    pub from_address: String,
    pub to_address: String,
    pub amount: Decimal,
    pub fee: Option<Decimal>,
    pub tx_type: TransactionType,
    pub status: TransactionStatus,
    pub block_number: Option<u64>,
    pub confirmations: Option<u32>,
    pub memo: Option<String>,
}

/// 트랜잭션 조회 조건
/// Transaction filter shared by listing, searching, counting and volume sums
#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    pub wallet_id: Option<u64>,
    /// owner of the wallet
    pub user_id: Option<u64>,
    /// currency of the wallet
    pub currency: Option<Currency>,
    pub status: Option<TransactionStatus>,
    pub tx_type: Option<TransactionType>,
    /// tx_hash, from_address, to_address (case-insensitive substring)
    pub search: Option<String>,
    /// inclusive
    pub created_from: Option<DateTime<Utc>>,
    /// inclusive
    pub created_to: Option<DateTime<Utc>>,
}

/// 트랜잭션 응답 DTO
/// Transaction DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
#[schema(as = TransactionDto)]
pub struct TransactionResponse {
    pub id: u64,
    pub wallet_id: u64,
    #[schema(example = "bitcoin_tx_1718000000000_4f2a")]
    pub tx_hash: String,
    pub from_address: String,
    pub to_address: String,
    #[schema(value_type = String, example = "0.50000000")]
    pub amount: Decimal,
    #[schema(value_type = Option<String>, example = "0.00010000")]
    pub fee: Option<Decimal>,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub status: TransactionStatus,
    pub block_number: Option<u64>,
    pub confirmations: Option<u32>,
    pub memo: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Transaction> for TransactionResponse {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id,
            wallet_id: tx.wallet_id,
            tx_hash: tx.tx_hash.clone(),
            from_address: tx.from_address.clone(),
            to_address: tx.to_address.clone(),
            amount: tx.amount,
            fee: tx.fee,
            tx_type: tx.tx_type,
            status: tx.status,
            block_number: tx.block_number,
            confirmations: tx.confirmations,
            memo: tx.memo.clone(),
            created_at: tx.created_at,
        }
    }
}

impl From<Transaction> for TransactionResponse {
    fn from(tx: Transaction) -> Self {
        TransactionResponse::from(&tx)
    }
}

/// 송금 요청
/// Send transaction request
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = SendTransactionRequest)]
pub struct SendTransactionRequest {
    #[schema(example = 1)]
    pub wallet_id: u64,

    #[schema(example = "bc1qrecipientaddress")]
    pub to_address: String,

    /// 최소 0.00000001, 소수점 8자리까지
    /// At least 0.00000001, at most 8 fraction digits
    #[schema(value_type = String, example = "0.5")]
    pub amount: Decimal,

    pub memo: Option<String>,
}

/// 외부 노티파이어가 관측한 입금
/// Externally observed incoming transfer
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = IncomingTransactionRequest)]
pub struct IncomingTransactionRequest {
    pub tx_hash: String,
    pub to_address: String,
    #[schema(value_type = String, example = "0.25")]
    pub amount: Decimal,
    pub from_address: String,
    pub block_number: Option<u64>,
}

/// Result of processing an incoming transfer
#[derive(Debug, Clone, PartialEq)]
pub enum IncomingOutcome {
    /// 새 RECEIVE 트랜잭션 기록 + 잔액 증가
    Recorded(Transaction),
    /// 이미 기록된 tx_hash
    Duplicate,
    /// 주소에 해당하는 지갑 없음
    UnknownAddress,
}

impl IncomingOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomingOutcome::Recorded(_) => "RECORDED",
            IncomingOutcome::Duplicate => "DUPLICATE",
            IncomingOutcome::UnknownAddress => "UNKNOWN_ADDRESS",
        }
    }
}

/// 입금 처리 응답
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = IncomingTransactionResponse)]
pub struct IncomingTransactionResponse {
    #[schema(example = "RECORDED")]
    pub outcome: String,
    pub transaction: Option<TransactionResponse>,
}

impl From<IncomingOutcome> for IncomingTransactionResponse {
    fn from(outcome: IncomingOutcome) -> Self {
        let label = outcome.as_str().to_string();
        let transaction = match outcome {
            IncomingOutcome::Recorded(tx) => Some(TransactionResponse::from(tx)),
            IncomingOutcome::Duplicate | IncomingOutcome::UnknownAddress => None,
        };

        Self {
            outcome: label,
            transaction,
        }
    }
}

/// 트랜잭션 상태 갱신 요청
/// Out-of-band confirmation update
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = UpdateTransactionStatusRequest)]
pub struct UpdateTransactionStatusRequest {
    pub status: TransactionStatus,
    pub block_number: Option<u64>,
    pub confirmations: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_is_complete_and_uses_type_key() {
        let tx = Transaction {
            id: 11,
            wallet_id: 2,
            tx_hash: "hash-1".to_string(),
            from_address: "from".to_string(),
            to_address: "to".to_string(),
            amount: Decimal::new(5, 1),
            fee: Some(Decimal::new(1, 4)),
            tx_type: TransactionType::Send,
            status: TransactionStatus::Pending,
            block_number: Some(800_000),
            confirmations: Some(6),
            memo: Some("rent".to_string()),
            created_at: Utc::now(),
        };

        let dto = TransactionResponse::from(&tx);
        assert_eq!(dto.id, tx.id);
        assert_eq!(dto.wallet_id, tx.wallet_id);
        assert_eq!(dto.tx_hash, tx.tx_hash);
        assert_eq!(dto.from_address, tx.from_address);
        assert_eq!(dto.to_address, tx.to_address);
        assert_eq!(dto.amount, tx.amount);
        assert_eq!(dto.fee, tx.fee);
        assert_eq!(dto.tx_type, tx.tx_type);
        assert_eq!(dto.status, tx.status);
        assert_eq!(dto.block_number, tx.block_number);
        assert_eq!(dto.confirmations, tx.confirmations);
        assert_eq!(dto.memo, tx.memo);
        assert_eq!(dto.created_at, tx.created_at);

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["type"], "SEND");
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["txHash"], "hash-1");
    }

    #[test]
    fn enums_parse_their_db_names() {
        for status in TransactionStatus::ALL {
            assert_eq!(status.as_str().parse::<TransactionStatus>().unwrap(), status);
        }
        assert_eq!("RECEIVE".parse::<TransactionType>().unwrap(), TransactionType::Receive);
        assert!("pending".parse::<TransactionStatus>().is_err());
    }
}
