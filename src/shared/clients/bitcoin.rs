use anyhow::Result;
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use uuid::Uuid;
use crate::domains::wallet::models::Currency;
use crate::shared::clients::chain::{ChainClient, KeyPair, SendResult};

/// 표준 비트코인 수수료 (플레이스홀더)
pub const BITCOIN_FEE: Decimal = Decimal::from_parts(1, 0, 0, false, 4);

/// Bitcoin 플레이스홀더 클라이언트
/// 실제 네트워크 호출 없음: 주소는 랜덤 키에서 파생, 잔액은 [0, 0.1) 랜덤
#[derive(Debug, Clone, Default)]
pub struct BitcoinClient;

impl BitcoinClient {
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
            address: format!("bc1q{}", &public_hex[..32]),
            // Private Key는 Base64 인코딩 (암호화는 범위 밖)
            private_key: general_purpose::STANDARD.encode(secret),
        }
    }
}

#[async_trait]
impl ChainClient for BitcoinClient {
    fn currency(&self) -> Currency {
        Currency::Bitcoin
    }

    async fn generate_key_pair(&self) -> Result<KeyPair> {
        let key_pair = Self::random_key_pair();
        tracing::info!(address = %key_pair.address, "Generated Bitcoin key pair");
        Ok(key_pair)
    }

    async fn get_balance(&self, address: &str) -> Result<Decimal> {
        tracing::info!(address, "Getting Bitcoin balance");
        let satoshis: i64 = rand::thread_rng().gen_range(0..10_000_000);
        Ok(Decimal::new(satoshis, 8))
    }

    async fn send_transaction(&self, _private_key: &str, to_address: &str, amount: Decimal) -> Result<SendResult> {
        tracing::info!(%amount, to_address, "Sending Bitcoin transaction");
        let result = SendResult {
            tx_hash: format!("bitcoin_tx_{}_{}", Utc::now().timestamp_millis(), Uuid::new_v4().simple()),
            fee: BITCOIN_FEE,
        };
        tracing::info!(tx_hash = %result.tx_hash, "Bitcoin transaction sent");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn key_pairs_have_bech32_shape_and_differ() {
        let client = BitcoinClient::new();
        let first = client.generate_key_pair().await.unwrap();
        let second = client.generate_key_pair().await.unwrap();

        assert!(first.address.starts_with("bc1q"));
        assert_eq!(first.address.len(), 4 + 32);
        assert!(first.address[4..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first.address, second.address);
        assert_ne!(first.private_key, second.private_key);
        assert!(!first.private_key.contains(&first.address));
    }

    #[tokio::test]
    async fn balance_is_below_one_tenth_with_eight_decimals() {
        let client = BitcoinClient::new();
        for _ in 0..20 {
            let balance = client.get_balance("bc1qany").await.unwrap();
            assert!(balance >= Decimal::ZERO);
            assert!(balance < Decimal::new(1, 1));
            assert_eq!(balance.scale(), 8);
        }
    }

    #[tokio::test]
    async fn sends_return_unique_hashes_and_fixed_fee() {
        let client = BitcoinClient::new();
        let a = client.send_transaction("pk", "bc1qto", Decimal::ONE).await.unwrap();
        let b = client.send_transaction("pk", "bc1qto", Decimal::ONE).await.unwrap();

        assert!(a.tx_hash.starts_with("bitcoin_tx_"));
        assert_ne!(a.tx_hash, b.tx_hash);
        assert_eq!(a.fee.to_string(), "0.0001");
    }
}
