//! 会话端到端流程测试（fake 钱包提供方）

mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use common::{session_for, MockWalletProvider, MOCK_TX_HASH};
use linkcore::{
    domain::{TransferRequest, WalletEvent},
    error::SessionError,
    provider::{ProviderBinding, CODE_UNRECOGNIZED_CHAIN, CODE_USER_REJECTED},
    service::wallet_session::WalletSession,
    utils::chain_registry,
};

#[tokio::test]
async fn connect_reads_accounts_and_chain_from_wallet() {
    let mock = MockWalletProvider::with_wallet(&["0xAAA"], "0x1");
    let session = session_for(&mock);

    let snapshot = session.connect().await.unwrap();

    assert!(snapshot.connected);
    assert_eq!(snapshot.account.as_deref(), Some("0xAAA"));
    assert_eq!(snapshot.chain_id.as_deref(), Some("0x1"));
    assert_eq!(mock.request_accounts_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_connect_leaves_session_untouched() {
    let mock = MockWalletProvider::with_wallet(&["0xAAA"], "0x1");
    *mock.reject_accounts_with.lock().unwrap() = Some(CODE_USER_REJECTED);
    let session = session_for(&mock);

    let before = session.snapshot();
    let result = session.connect().await;

    assert!(matches!(result, Err(SessionError::UserRejected(_))));
    assert_eq!(session.snapshot(), before);
}

#[tokio::test]
async fn connect_without_wallet_reports_unavailable() {
    let session = WalletSession::new(ProviderBinding::absent());

    assert!(matches!(
        session.connect().await,
        Err(SessionError::WalletUnavailable(_))
    ));
}

#[tokio::test]
async fn transfer_with_missing_fields_never_contacts_wallet() {
    let mock = MockWalletProvider::with_wallet(&["0xAAA"], "0x1");
    let session = session_for(&mock);
    session.connect().await.unwrap();

    let missing_recipient = TransferRequest {
        to: "".into(),
        amount_native: "0.01".into(),
    };
    assert!(matches!(
        session.send(&missing_recipient).await,
        Err(SessionError::ValidationFailed(_))
    ));

    let missing_amount = TransferRequest {
        to: "0xBBB".into(),
        amount_native: "".into(),
    };
    assert!(matches!(
        session.send(&missing_amount).await,
        Err(SessionError::ValidationFailed(_))
    ));

    let malformed_amount = TransferRequest {
        to: "0xBBB".into(),
        amount_native: "not-a-number".into(),
    };
    assert!(matches!(
        session.send(&malformed_amount).await,
        Err(SessionError::ValidationFailed(_))
    ));

    assert_eq!(mock.send_transfer_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn transfer_requires_connected_account() {
    let mock = MockWalletProvider::with_wallet(&["0xAAA"], "0x1");
    let session = session_for(&mock);

    let request = TransferRequest {
        to: "0xBBB".into(),
        amount_native: "0.01".into(),
    };
    assert!(matches!(
        session.send(&request).await,
        Err(SessionError::ValidationFailed(_))
    ));
    assert_eq!(mock.send_transfer_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn confirmed_transfer_reports_wallet_hash() {
    let mock = MockWalletProvider::with_wallet(&["0xAAA"], "0x1");
    let session = session_for(&mock);
    session.connect().await.unwrap();

    let before = session.snapshot();
    let receipt = session
        .send(&TransferRequest {
            to: "0xBBB".into(),
            amount_native: "0.01".into(),
        })
        .await
        .unwrap();

    assert_eq!(receipt.tx_hash, MOCK_TX_HASH);
    assert_eq!(mock.send_transfer_calls.load(Ordering::SeqCst), 1);
    // 转账不改变会话状态
    assert_eq!(session.snapshot(), before);
}

#[tokio::test]
async fn switch_to_unregistered_chain_reports_actionable_kind() {
    let mock = MockWalletProvider::with_wallet(&["0xAAA"], "0x1");
    *mock.fail_switch_with.lock().unwrap() = Some(CODE_UNRECOGNIZED_CHAIN);
    let session = session_for(&mock);

    assert!(matches!(
        session.switch_chain("0x89").await,
        Err(SessionError::ChainNotRegistered(_))
    ));

    // 其他失败码走通用失败
    *mock.fail_switch_with.lock().unwrap() = Some(-32000);
    assert!(matches!(
        session.switch_chain("0x89").await,
        Err(SessionError::RequestFailed(_))
    ));
}

#[tokio::test]
async fn successful_switch_is_silent_and_normalizes_input() {
    let mock = MockWalletProvider::with_wallet(&["0xAAA"], "0x1");
    let session = session_for(&mock);

    let chain_id = session.switch_chain("137").await.unwrap();
    assert_eq!(chain_id, "0x89");
    assert_eq!(mock.switch_chain_calls.load(Ordering::SeqCst), 1);
    // 切换成功不直接改状态，等钱包的链事件
    assert_eq!(session.snapshot().chain_id, None);
}

#[tokio::test]
async fn add_chain_sends_registry_descriptor() {
    let mock = MockWalletProvider::with_wallet(&["0xAAA"], "0x1");
    let session = session_for(&mock);

    let descriptor = chain_registry::find("0x5").unwrap().descriptor();
    let chain_id = session.add_chain(&descriptor).await.unwrap();

    assert_eq!(chain_id, "0x5");
    assert_eq!(mock.add_chain_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn empty_accounts_event_disconnects_but_keeps_chain() {
    let mock = MockWalletProvider::with_wallet(&["0xAAA"], "0x1");
    let session = session_for(&mock);
    session.connect().await.unwrap();
    session.attach_listeners();

    mock.emit(WalletEvent::AccountsChanged(vec![]));
    tokio::time::sleep(Duration::from_millis(100)).await;

    let snapshot = session.snapshot();
    assert!(!snapshot.connected);
    assert_eq!(snapshot.chain_id.as_deref(), Some("0x1"));

    session.detach_listeners();
}

#[tokio::test]
async fn chain_event_is_cached_while_disconnected() {
    let mock = MockWalletProvider::with_wallet(&[], "0x1");
    let session = session_for(&mock);
    session.attach_listeners();

    mock.emit(WalletEvent::ChainChanged("0x89".into()));
    tokio::time::sleep(Duration::from_millis(100)).await;

    let snapshot = session.snapshot();
    assert!(!snapshot.connected);
    assert_eq!(snapshot.chain_id.as_deref(), Some("0x89"));

    session.detach_listeners();
}

#[tokio::test]
async fn account_event_follows_first_entry() {
    let mock = MockWalletProvider::with_wallet(&["0xAAA"], "0x1");
    let session = session_for(&mock);
    session.attach_listeners();

    mock.emit(WalletEvent::AccountsChanged(vec![
        "0xCCC".into(),
        "0xDDD".into(),
    ]));
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(session.snapshot().account.as_deref(), Some("0xCCC"));

    session.detach_listeners();
}

#[tokio::test]
async fn detached_session_stops_reconciling_events() {
    let mock = MockWalletProvider::with_wallet(&["0xAAA"], "0x1");
    let session = session_for(&mock);
    session.attach_listeners();
    session.detach_listeners();

    mock.emit(WalletEvent::ChainChanged("0x89".into()));
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(session.snapshot().chain_id, None);
}

#[tokio::test]
async fn overlapping_operations_are_rejected_locally() {
    let mock = MockWalletProvider::with_wallet(&["0xAAA"], "0x1");
    *mock.accounts_delay_ms.lock().unwrap() = 200;
    let session = session_for(&mock);

    let pending = {
        let session = session.clone();
        tokio::spawn(async move { session.connect().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    // connect 在途期间的第二个操作被本地拒绝，不排队
    let result = session.switch_chain("0x1").await;
    assert!(matches!(result, Err(SessionError::ValidationFailed(_))));
    assert_eq!(mock.switch_chain_calls.load(Ordering::SeqCst), 0);

    let connected = pending.await.unwrap().unwrap();
    assert_eq!(connected.account.as_deref(), Some("0xAAA"));
}

#[tokio::test]
async fn disconnect_clears_local_state_only() {
    let mock = MockWalletProvider::with_wallet(&["0xAAA"], "0x1");
    let session = session_for(&mock);
    session.connect().await.unwrap();

    let snapshot = session.disconnect();
    assert!(!snapshot.connected);
    assert_eq!(snapshot.chain_id, None);

    // 钱包侧授权未被撤销，重连直接成功
    let reconnected = session.connect().await.unwrap();
    assert_eq!(reconnected.account.as_deref(), Some("0xAAA"));
}
