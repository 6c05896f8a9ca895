use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use uuid::Uuid;
use crate::domains::wallet::models::Currency;
use crate::shared::clients::chain::{to_hex, ChainClient, KeyPair, SendResult};

/// USDT TRC-20 컨트랙트 주소 (Tron 메인넷)
pub const USDT_CONTRACT_ADDRESS: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";

/// TRC-20 전송 수수료 (플레이스홀더, 1 TRX)
pub const TRON_FEE: Decimal = Decimal::ONE;

/// Tron / USDT-TRC20 플레이스홀더 클라이언트
#[derive(Debug, Clone, Default)]
pub struct TronClient;

impl TronClient {
    pub fn new() -> Self {
        Self
    }

    fn random_key_pair() -> KeyPair {
        let mut secret = [0u8; 32];
        rand::thread_rng().fill(&mut secret);

        let mut hasher = Sha256::new();
        hasher.update(secret);
        let public_hex = format!("{:x}", hasher.finalize());

        KeyPair {
            address: format!("T{}", &public_hex[..34]),
            private_key: format!("0x{}", to_hex(&secret)),
        }
    }
}

#[async_trait]
impl ChainClient for TronClient {
    fn currency(&self) -> Currency {
        Currency::UsdtTrc20
    }

    async fn generate_key_pair(&self) -> Result<KeyPair> {
        let key_pair = Self::random_key_pair();
        tracing::info!(address = %key_pair.address, "Generated Tron key pair");
        Ok(key_pair)
    }

    async fn get_balance(&self, address: &str) -> Result<Decimal> {
        tracing::info!(address, contract = USDT_CONTRACT_ADDRESS, "Getting USDT balance");
        let units: i64 = rand::thread_rng().gen_range(0..100_000_000_000);
        Ok(Decimal::new(units, 8))
    }

    async fn send_transaction(&self, _private_key: &str, to_address: &str, amount: Decimal) -> Result<SendResult> {
        tracing::info!(%amount, to_address, "Sending USDT transaction");
        let result = SendResult {
            tx_hash: format!("tron_tx_{}_{}", Utc::now().timestamp_millis(), Uuid::new_v4().simple()),
            fee: TRON_FEE,
        };
        tracing::info!(tx_hash = %result.tx_hash, "USDT transaction sent");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn key_pairs_follow_tron_shape() {
        let key_pair = TronClient::new().generate_key_pair().await.unwrap();

        assert!(key_pair.address.starts_with('T'));
        assert_eq!(key_pair.address.len(), 35);
        assert!(key_pair.private_key.starts_with("0x"));
        assert_eq!(key_pair.private_key.len(), 2 + 64);
    }

    #[tokio::test]
    async fn balance_and_fee_ranges() {
        let client = TronClient::new();
        let balance = client.get_balance("Tany").await.unwrap();
        assert!(balance >= Decimal::ZERO && balance < Decimal::from(1000));

        let sent = client.send_transaction("0xpk", "Tto", Decimal::TEN).await.unwrap();
        assert!(sent.tx_hash.starts_with("tron_tx_"));
        assert_eq!(sent.fee, Decimal::ONE);
    }
}
