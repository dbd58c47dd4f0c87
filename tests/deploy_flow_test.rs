//! Deploy flow state machine tests
//!
//! Exercises the idle/processing/failed transitions, the in-flight
//! submission guard and the success callback.

mod common;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use cis2_mint::{CcdAmount, ContractAddress, ContractClient, DeployFlow, DeployState, MintError};

use common::*;

fn fast_client(provider: Arc<MockWalletProvider>) -> ContractClient<MockWalletProvider> {
    ContractClient::with_polling(provider, Duration::from_millis(5), 10)
}

#[tokio::test]
async fn successful_submit_fires_callback_once_and_returns_to_idle() {
    let provider = Arc::new(MockWalletProvider::new(vec![Some(finalized(Some(
        success_outcome("block-a", initialized_at(5, 0)),
    )))]));
    let notified = Arc::new(AtomicU32::new(0));

    let notified_in_callback = notified.clone();
    let flow = DeployFlow::new(fast_client(provider)).on_deployed(move |address, info| {
        assert_eq!(address, ContractAddress::new(5, 0));
        assert_eq!(info.contract_name, "CIS2-NFT");
        notified_in_callback.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(flow.state(), DeployState::Idle);

    let address = flow
        .submit(
            &nft_contract_info(),
            SENDER,
            &json!({ "verify_key": "abc" }),
            9_999,
            CcdAmount::from_ccd(0),
        )
        .await
        .unwrap();

    assert_eq!(address, ContractAddress::new(5, 0));
    assert_eq!(notified.load(Ordering::SeqCst), 1);
    assert_eq!(flow.state(), DeployState::Idle);
}

#[tokio::test]
async fn failed_submit_lands_in_failed_with_the_error_message() {
    let provider = Arc::new(MockWalletProvider::new(vec![Some(finalized(Some(
        reject_outcome(&[("block-a", "RejectedInit")]),
    )))]));
    let flow = DeployFlow::new(fast_client(provider));

    let err = flow
        .submit(
            &nft_contract_info(),
            SENDER,
            &json!({ "verify_key": "abc" }),
            9_999,
            CcdAmount::from_ccd(0),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, MintError::TransactionRejected(_)));
    assert_eq!(
        flow.state(),
        DeployState::Failed {
            message: "Transaction failed, reasons: RejectedInit".to_string()
        }
    );
}

#[tokio::test]
async fn submit_while_processing_is_rejected() {
    let provider = Arc::new(
        MockWalletProvider::new(vec![Some(finalized(Some(success_outcome(
            "block-a",
            initialized_at(1, 0),
        ))))])
        .with_send_delay(Duration::from_millis(200)),
    );
    let flow = Arc::new(DeployFlow::new(fast_client(provider)));

    let first = {
        let flow = flow.clone();
        tokio::spawn(async move {
            flow.submit(
                &nft_contract_info(),
                SENDER,
                &json!({ "verify_key": "abc" }),
                9_999,
                CcdAmount::from_ccd(0),
            )
            .await
        })
    };

    // Let the first submission reach the wallet and park there.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(flow.state(), DeployState::Processing);

    let err = flow
        .submit(
            &nft_contract_info(),
            SENDER,
            &json!({ "verify_key": "abc" }),
            9_999,
            CcdAmount::from_ccd(0),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, MintError::DeployInProgress));

    first.await.unwrap().unwrap();
    assert_eq!(flow.state(), DeployState::Idle);
}

#[tokio::test]
async fn failed_flow_accepts_a_resubmission() {
    let provider = Arc::new(MockWalletProvider::new(vec![
        Some(finalized(Some(reject_outcome(&[(
            "block-a",
            "RejectedInit",
        )])))),
        Some(finalized(Some(success_outcome(
            "block-b",
            initialized_at(9, 0),
        )))),
    ]));
    let flow = DeployFlow::new(fast_client(provider));
    let info = nft_contract_info();
    let params = json!({ "verify_key": "abc" });

    flow.submit(&info, SENDER, &params, 9_999, CcdAmount::from_ccd(0))
        .await
        .unwrap_err();
    assert!(matches!(flow.state(), DeployState::Failed { .. }));

    let address = flow
        .submit(&info, SENDER, &params, 9_999, CcdAmount::from_ccd(0))
        .await
        .unwrap();
    assert_eq!(address, ContractAddress::new(9, 0));
    assert_eq!(flow.state(), DeployState::Idle);
}
