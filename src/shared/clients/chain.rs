use std::collections::HashMap;
use std::sync::Arc;
use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use crate::domains::wallet::models::Currency;
use crate::shared::clients::{BitcoinClient, TronClient};

/// 생성된 주소 / 개인키 쌍
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub address: String,
    /// 불투명한 비밀값 (DTO로 노출 금지)
    pub private_key: String,
}

/// 체인 전송 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResult {
    pub tx_hash: String,
    pub fee: Decimal,
}

/// 통화별 체인 클라이언트 능력
/// Per-currency chain capability: key generation, balance query, send
#[async_trait]
pub trait ChainClient: Send + Sync {
    fn currency(&self) -> Currency;

    async fn generate_key_pair(&self) -> Result<KeyPair>;

    async fn get_balance(&self, address: &str) -> Result<Decimal>;

    async fn send_transaction(&self, private_key: &str, to_address: &str, amount: Decimal) -> Result<SendResult>;
}

/// Currency → ChainClient 조회 테이블
#[derive(Clone, Default)]
pub struct ChainClients {
    clients: HashMap<Currency, Arc<dyn ChainClient>>,
}

impl ChainClients {
    pub fn new() -> Self {
        Self::default()
    }

    /// 기본 플레이스홀더 구현 (BITCOIN, USDT_TRC20)
    pub fn placeholder() -> Self {
        Self::new()
            .with_client(Arc::new(BitcoinClient::new()))
            .with_client(Arc::new(TronClient::new()))
    }

    /// 같은 통화의 기존 클라이언트는 교체됨
    pub fn with_client(mut self, client: Arc<dyn ChainClient>) -> Self {
        self.clients.insert(client.currency(), client);
        self
    }

    pub fn get(&self, currency: Currency) -> Option<Arc<dyn ChainClient>> {
        self.clients.get(&currency).cloned()
    }

    pub fn supports(&self, currency: Currency) -> bool {
        self.clients.contains_key(&currency)
    }
}

// 16진수 문자열 (소문자)
pub(crate) fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_registry_covers_every_currency() {
        let clients = ChainClients::placeholder();
        for currency in Currency::ALL {
            let client = clients.get(currency).unwrap();
            assert_eq!(client.currency(), currency);
        }
        assert!(!ChainClients::new().supports(Currency::Bitcoin));
    }

    #[test]
    fn hex_is_lowercase_and_padded() {
        assert_eq!(to_hex(&[0x00, 0x0f, 0xab]), "000fab");
    }
}
