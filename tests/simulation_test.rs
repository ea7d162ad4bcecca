//! End-to-end flows against the in-process simulated network.

use std::time::Duration;

use mevshield::lifecycle::{ComputeStatus, CreateState, DecryptState, LoadState};
use mevshield::models::{Address, Pair, TradeForm, TradeSide};
use mevshield::simulation::{SimulatedNetwork, SimulationConfig};
use mevshield::{TradeController, TradeError};

const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
const ACCOUNT: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

fn network(reject_signatures: bool, seed_demo_trades: bool) -> SimulatedNetwork {
    SimulatedNetwork::new(
        Address::new(CONTRACT),
        Address::new(ACCOUNT),
        SimulationConfig {
            latency: Duration::ZERO,
            reject_signatures,
            seed_demo_trades,
        },
    )
}

fn sell_form() -> TradeForm {
    TradeForm {
        pair: Pair::BtcUsdt,
        side: TradeSide::Sell,
        amount: "3".to_string(),
        price: "64000".to_string(),
    }
}

#[tokio::test]
async fn test_create_then_decrypt_round() {
    let network = network(false, false);
    let controller = TradeController::new(network.clients());

    assert_eq!(
        controller.connect_wallet().await,
        Some(Address::new(ACCOUNT))
    );
    assert_eq!(controller.state().compute, ComputeStatus::Ready);

    let CreateState::Succeeded { trade_id } = controller.create_trade(sell_form()).await else {
        panic!("trade creation failed");
    };
    assert_eq!(network.record_count(), 1);

    {
        let state = controller.state();
        let trade = state.trade(&trade_id).unwrap();
        assert_eq!(trade.pair, "BTC/USDT");
        assert_eq!(trade.amount, 3);
        assert_eq!(trade.price, 64000);
        // The side shown is derived from the amount, not the form.
        assert_eq!(trade.side, TradeSide::Buy);
        assert!(!trade.is_verified);
    }

    let first = controller.decrypt_trade(&trade_id).await;
    assert_eq!(
        first,
        DecryptState::Verified {
            trade_id: trade_id.clone(),
            value: 3
        }
    );
    assert_eq!(
        controller.state().trade(&trade_id).unwrap().decrypted_amount(),
        Some(3)
    );

    let second = controller.decrypt_trade(&trade_id).await;
    assert_eq!(
        second,
        DecryptState::AlreadyVerified {
            trade_id,
            value: Some(3)
        }
    );
}

#[tokio::test]
async fn test_declined_signature_stores_nothing() {
    let network = network(true, false);
    let controller = TradeController::new(network.clients());
    controller.connect_wallet().await;

    let state = controller.create_trade(sell_form()).await;

    assert_eq!(state, CreateState::Failed(TradeError::UserRejectedSignature));
    assert_eq!(network.record_count(), 0);
}

#[tokio::test]
async fn test_out_of_band_verification_short_circuits() {
    let network = network(false, true);
    let controller = TradeController::new(network.clients());
    controller.connect_wallet().await;
    assert_eq!(controller.state().load, LoadState::Loaded);
    assert_eq!(controller.state().trades.len(), 4);

    assert!(network.verify_out_of_band("trade-demo-2"));
    assert!(!network.verify_out_of_band("trade-demo-2"));

    let state = controller.decrypt_trade("trade-demo-2").await;

    assert_eq!(
        state,
        DecryptState::AlreadyVerified {
            trade_id: "trade-demo-2".to_string(),
            value: Some(2)
        }
    );
}

#[tokio::test]
async fn test_unavailable_contract_is_reported() {
    let network = network(false, false);
    let controller = TradeController::new(network.clients());

    assert_eq!(controller.check_availability().await, Some(true));
    network.set_available(false);
    assert_eq!(controller.check_availability().await, Some(false));
}
