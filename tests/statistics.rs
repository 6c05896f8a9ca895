// =====================================================
// 대시보드 통계 통합 테스트
// =====================================================

mod common;
use common::*;
use chrono::{Duration, Utc};
use wallet_admin_server::domains::ledger::models::{IncomingTransactionRequest, SendTransactionRequest, TransactionStatus};
use wallet_admin_server::domains::wallet::models::Currency;
use wallet_admin_server::shared::errors::StatsError;

async fn receive(app: &TestApp, tx_hash: &str, to_address: &str, amount: &str) {
    app.state
        .ledger_state
        .transaction_service
        .process_incoming_transaction(IncomingTransactionRequest {
            tx_hash: tx_hash.to_string(),
            to_address: to_address.to_string(),
            amount: btc(amount),
            from_address: "external".to_string(),
            block_number: None,
        })
        .await
        .unwrap();
}

/// 테스트: 사용자 / 지갑 / 트랜잭션 카운트와 통화별 CONFIRMED 거래량
#[tokio::test]
async fn test_system_statistics_rollup() {
    let app = TestApp::new();
    let btc_wallet = app.funded_wallet(Currency::Bitcoin, btc("2")).await;
    let usdt_wallet = app.funded_wallet(Currency::UsdtTrc20, btc("500")).await;
    let idle = app.register_user("idle").await;
    app.state.auth_state.user_service.deactivate(idle.id).await.unwrap();

    // CONFIRMED RECEIVE 2건
    receive(&app, "in_1", &btc_wallet.address, "0.75").await;
    receive(&app, "in_2", &usdt_wallet.address, "120").await;

    // PENDING SEND 2건 (거래량 제외)
    let ledger = &app.state.ledger_state.transaction_service;
    let sent = ledger
        .send_transaction(SendTransactionRequest {
            wallet_id: btc_wallet.id,
            to_address: "bc1qpayee".to_string(),
            amount: btc("1"),
            memo: None,
        })
        .await
        .unwrap();
    let failed = ledger
        .send_transaction(SendTransactionRequest {
            wallet_id: usdt_wallet.id,
            to_address: "TPayee".to_string(),
            amount: btc("10"),
            memo: None,
        })
        .await
        .unwrap();
    ledger
        .update_transaction_status(&failed.tx_hash, TransactionStatus::Failed, None, None)
        .await
        .unwrap();

    let stats = app.state.dashboard_state.stats_service.system_statistics().await.unwrap();
    assert_eq!(stats.total_users, 3);
    assert_eq!(stats.active_users, 2);
    assert_eq!(stats.users_registered_today, 3);
    assert_eq!(stats.total_wallets, 2);
    assert_eq!(stats.bitcoin_wallets, 1);
    assert_eq!(stats.usdt_wallets, 1);
    assert_eq!(stats.total_transactions, 4);
    assert_eq!(stats.pending_transactions, 1);
    assert_eq!(stats.confirmed_transactions, 2);
    assert_eq!(stats.failed_transactions, 1);
    assert_eq!(stats.transactions_today, 4);
    assert_eq!(stats.total_bitcoin_volume, btc("0.75"));
    assert_eq!(stats.total_usdt_volume, btc("120"));

    // 확인 처리 후 거래량에 포함
    ledger
        .update_transaction_status(&sent.tx_hash, TransactionStatus::Confirmed, Some(1), Some(1))
        .await
        .unwrap();
    let stats = app.state.dashboard_state.stats_service.system_statistics().await.unwrap();
    assert_eq!(stats.total_bitcoin_volume, btc("1.75"));
    assert_eq!(stats.pending_transactions, 0);
}

/// 테스트: 기간 조회 (양 끝 포함), 범위 밖이면 0
#[tokio::test]
async fn test_period_queries() {
    let app = TestApp::new();
    let wallet = app.funded_wallet(Currency::Bitcoin, btc("0")).await;
    receive(&app, "period_1", &wallet.address, "0.4").await;
    receive(&app, "period_2", &wallet.address, "0.6").await;

    let stats = &app.state.dashboard_state.stats_service;
    let start = Utc::now() - Duration::hours(1);
    let end = Utc::now() + Duration::hours(1);

    assert_eq!(stats.users_registered_in_period(start, end).await.unwrap(), 1);
    assert_eq!(stats.transactions_in_period(start, end).await.unwrap(), 2);
    assert_eq!(stats.volume_in_period(start, end, Currency::Bitcoin).await.unwrap(), btc("1.0"));
    assert_eq!(stats.volume_in_period(start, end, Currency::UsdtTrc20).await.unwrap(), btc("0"));

    let yesterday = Utc::now() - Duration::days(1);
    let before = yesterday - Duration::hours(1);
    assert_eq!(stats.users_registered_in_period(before, yesterday).await.unwrap(), 0);
    assert_eq!(stats.transactions_in_period(before, yesterday).await.unwrap(), 0);
}

/// 테스트: start > end → Validation
#[tokio::test]
async fn test_inverted_period_rejected() {
    let app = TestApp::new();
    let stats = &app.state.dashboard_state.stats_service;
    let now = Utc::now();

    let err = stats
        .users_registered_in_period(now, now - Duration::minutes(5))
        .await
        .unwrap_err();
    assert!(matches!(err, StatsError::Validation(_)));
    assert_eq!(err.to_string(), "start must not be after end");
}
