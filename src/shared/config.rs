use anyhow::{anyhow, Context, Result};
use std::env;
use std::net::SocketAddr;
use crate::shared::database::DEFAULT_MAX_CONNECTIONS;

/// 저장소 백엔드 선택
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// 애플리케이션 설정
/// Application configuration (environment variables with defaults)
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// DATABASE_URL (postgres 백엔드에서 필수)
    pub database_url: Option<String>,
    /// STORAGE_BACKEND = postgres | memory
    pub storage_backend: StorageBackend,
    /// BIND_ADDR (기본값 0.0.0.0:8080)
    pub bind_addr: SocketAddr,
    /// CORS_ORIGIN (기본값 http://localhost:3000)
    pub cors_origin: String,
    /// JWT_SECRET
    pub jwt_secret: String,
    /// LEDGER_SERIALIZE_WALLET_MUTATIONS (기본값 false)
    /// 지갑별 직렬화: 켜면 send / receive / refresh가 지갑 단위로 순차 실행됨
    pub serialize_wallet_mutations: bool,
    /// DB_MAX_CONNECTIONS
    pub db_max_connections: u32,
}

pub const DEFAULT_JWT_SECRET: &str = "your-secret-key-change-in-production";

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            storage_backend: StorageBackend::Postgres,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            cors_origin: "http://localhost:3000".to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            serialize_wallet_mutations: false,
            db_max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl AppConfig {
    /// 환경변수에서 설정 로드 (.env 파일 지원)
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 임의의 key → value 조회 함수로부터 설정 구성
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let storage_backend = match lookup("STORAGE_BACKEND").as_deref() {
            None | Some("postgres") => StorageBackend::Postgres,
            Some("memory") => StorageBackend::Memory,
            Some(other) => return Err(anyhow!("Unknown STORAGE_BACKEND: {}", other)),
        };

        let database_url = lookup("DATABASE_URL");
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(anyhow!("DATABASE_URL must be set in .env file"));
        }

        let bind_addr = match lookup("BIND_ADDR") {
            Some(addr) => addr
                .parse::<SocketAddr>()
                .with_context(|| format!("Invalid BIND_ADDR: {}", addr))?,
            None => defaults.bind_addr,
        };

        let serialize_wallet_mutations = match lookup("LEDGER_SERIALIZE_WALLET_MUTATIONS") {
            Some(flag) => parse_flag(&flag)
                .ok_or_else(|| anyhow!("Invalid LEDGER_SERIALIZE_WALLET_MUTATIONS: {}", flag))?,
            None => defaults.serialize_wallet_mutations,
        };

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(value) => value
                .parse::<u32>()
                .with_context(|| format!("Invalid DB_MAX_CONNECTIONS: {}", value))?,
            None => defaults.db_max_connections,
        };

        Ok(Self {
            database_url,
            storage_backend,
            bind_addr,
            cors_origin: lookup("CORS_ORIGIN").unwrap_or(defaults.cors_origin),
            jwt_secret: lookup("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            serialize_wallet_mutations,
            db_max_connections,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
