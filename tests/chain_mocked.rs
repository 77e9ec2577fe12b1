// Chain reads and procedures against a mocked JSON-RPC provider. Each test
// queues exactly the responses the code under test consumes, in call order.

use std::sync::Arc;
use std::time::Duration;

use ethers::abi::{self, Token};
use ethers::providers::{MockProvider, Provider};
use ethers::types::{
    Address, Block, Bytes, Log, Transaction, TransactionReceipt, TxHash, H256, I256, U256, U64,
};
use ethers::utils::keccak256;
use serde_json::{json, Value};

use v3_pool_ops::chain::contracts::INCREASE_LIQUIDITY_SIGNATURE;
use v3_pool_ops::chain::periphery::MintedPosition;
use v3_pool_ops::chain::{pools, tokens::TokenInfo};
use v3_pool_ops::engine::ops::{self, LiquidityRequest, PoolLocator, SwapRequest};
use v3_pool_ops::engine::params::{LiquidityAmounts, RangeSpec};
use v3_pool_ops::error::{OpsError, ParamError};
use v3_pool_ops::models::{PoolKey, TickLiquidity, TickRange};

fn mocked() -> (Arc<Provider<MockProvider>>, MockProvider) {
    let (provider, mock) = Provider::<MockProvider>::mocked();
    // receipts are polled on this interval
    (Arc::new(provider.interval(Duration::from_millis(1))), mock)
}

fn push_return(mock: &MockProvider, tokens: &[Token]) {
    mock.push::<Bytes, _>(Bytes::from(abi::encode(tokens))).unwrap();
}

fn ret(tokens: &[Token]) -> Value {
    serde_json::to_value(Bytes::from(abi::encode(tokens))).unwrap()
}

fn uint(value: u128) -> Token {
    Token::Uint(U256::from(value))
}

fn int(value: i32) -> Token {
    Token::Int(I256::from(value).into_raw())
}

/// The mock answers last-in first-out, so the call-ordered list is pushed
/// back to front.
fn queue(mock: &MockProvider, responses: Vec<Value>) {
    for response in responses.into_iter().rev() {
        mock.push::<Value, _>(response).unwrap();
    }
}

/// slot0, liquidity and tickSpacing, as `load_pool_state` reads them.
fn pool_state_responses(tick: i32, spacing: i32, liquidity: u128) -> Vec<Value> {
    vec![
        ret(&[
            Token::Uint(U256::one() << 96),
            int(tick),
            uint(0),
            uint(0),
            uint(0),
            uint(0),
            Token::Bool(true),
        ]),
        ret(&[uint(liquidity)]),
        ret(&[int(spacing)]),
    ]
}

fn tick_response(gross: u128, net: i32) -> Value {
    ret(&[
        uint(gross),
        int(net),
        uint(0),
        uint(0),
        int(0),
        uint(0),
        uint(0),
        Token::Bool(gross > 0),
    ])
}

/// Fee estimation, submission, the mined transaction and its receipt.
fn confirmed_tx(tx_hash: TxHash, logs: Vec<Log>) -> Vec<Value> {
    let block = Block::<TxHash> {
        number: Some(U64::from(100u64)),
        base_fee_per_gas: Some(U256::from(1_000_000_000u64)),
        ..Default::default()
    };
    let fee_history = json!({
        "oldestBlock": "0x5f",
        "baseFeePerGas": ["0x3b9aca00"],
        "gasUsedRatio": [0.5],
        "reward": [["0x3b9aca00"]]
    });
    let mined = Transaction {
        hash: tx_hash,
        block_number: Some(U64::from(101u64)),
        ..Default::default()
    };
    let receipt = TransactionReceipt {
        transaction_hash: tx_hash,
        block_number: Some(U64::from(101u64)),
        status: Some(U64::one()),
        logs,
        ..Default::default()
    };
    vec![
        serde_json::to_value(block).unwrap(),
        fee_history,
        serde_json::to_value(tx_hash).unwrap(),
        serde_json::to_value(mined).unwrap(),
        serde_json::to_value(receipt).unwrap(),
    ]
}

fn token(byte: u8, symbol: &str) -> TokenInfo {
    TokenInfo {
        address: Address::repeat_byte(byte),
        symbol: symbol.to_string(),
        decimals: 6,
    }
}

fn liquidity_request() -> LiquidityRequest {
    LiquidityRequest {
        factory: Address::repeat_byte(0xf0),
        position_manager: Address::repeat_byte(0xf1),
        token_a: token(0x01, "mUSDC"),
        token_b: token(0x02, "mUSDCold"),
        fee: 500,
        initial_price: None,
        amounts: LiquidityAmounts { amount_a: U256::from(10_000_000u64), amount_b: U256::from(10_000_000u64) },
        approve_amounts: LiquidityAmounts { amount_a: U256::MAX, amount_b: U256::MAX },
        range: RangeSpec::default(),
        slippage_bps: 100,
        deadline_window_secs: 600,
        gas_limit: 3_000_000,
        owner: Address::repeat_byte(0x42),
        recipient: Address::repeat_byte(0x42),
    }
}

fn swap_request() -> SwapRequest {
    SwapRequest {
        pool: PoolLocator::Address(Address::repeat_byte(0xaa)),
        swap_router: Address::repeat_byte(0xf2),
        token_in: token(0x01, "mUSDC"),
        token_out: token(0x02, "mUSDCold"),
        fee: 500,
        amount_in: U256::from(10_000_000u64),
        amount_out_min: None,
        slippage_bps: 100,
        requote_slippage_bps: 500,
        approve_amount: U256::MAX,
        deadline_window_secs: 600,
        gas_limit: 3_000_000,
        owner: Address::repeat_byte(0x42),
        recipient: Address::repeat_byte(0x43),
    }
}

/// Every read and write of a swap through a known pool, with `quoted` as the
/// simulated output and `received` landing in the recipient's balance.
fn swap_responses(quoted: u128, received: u128) -> Vec<Value> {
    let mut responses = vec![
        // balanceOf(owner) of token_in
        ret(&[uint(50_000_000)]),
        // token0, token1, fee of the pool
        ret(&[Token::Address(Address::repeat_byte(0x01))]),
        ret(&[Token::Address(Address::repeat_byte(0x02))]),
        ret(&[uint(500)]),
    ];
    responses.extend(pool_state_responses(0, 10, 1_000_000_000));
    // allowance, quote, recipient balance before
    responses.push(ret(&[Token::Uint(U256::MAX)]));
    responses.push(ret(&[uint(quoted)]));
    responses.push(ret(&[uint(1_000_000)]));
    responses.extend(confirmed_tx(H256::repeat_byte(0x77), vec![]));
    responses.push(ret(&[uint(1_000_000 + received)]));
    responses
}

#[tokio::test]
async fn test_tick_spacing_for_fee() {
    let (client, mock) = mocked();
    push_return(&mock, &[Token::Int(U256::from(10u64))]);

    let spacing = pools::tick_spacing_for_fee(client, Address::repeat_byte(0xf0), 500)
        .await
        .unwrap();
    assert_eq!(spacing, 10);
}

#[tokio::test]
async fn test_get_pool_zero_address_is_none() {
    let (client, mock) = mocked();
    push_return(&mock, &[Token::Address(Address::zero())]);

    let (key, _) = PoolKey::new(Address::repeat_byte(1), Address::repeat_byte(2), 500).unwrap();
    let pool = pools::get_pool(client, Address::repeat_byte(0xf0), &key).await.unwrap();
    assert_eq!(pool, None);
}

#[tokio::test]
async fn test_get_pool_found() {
    let (client, mock) = mocked();
    let deployed = Address::repeat_byte(0xaa);
    push_return(&mock, &[Token::Address(deployed)]);

    let (key, _) = PoolKey::new(Address::repeat_byte(1), Address::repeat_byte(2), 500).unwrap();
    let pool = pools::get_pool(client, Address::repeat_byte(0xf0), &key).await.unwrap();
    assert_eq!(pool, Some(deployed));
}

#[tokio::test]
async fn test_tick_info_decodes_all_fields() {
    let (client, mock) = mocked();
    push_return(
        &mock,
        &[
            Token::Uint(U256::from(1_500u64)),
            Token::Int(U256::from(500u64)),
            Token::Uint(U256::zero()),
            Token::Uint(U256::zero()),
            Token::Int(U256::zero()),
            Token::Uint(U256::zero()),
            Token::Uint(U256::zero()),
            Token::Bool(true),
        ],
    );

    let info = pools::tick_info(client, Address::repeat_byte(0xaa), -60).await.unwrap();
    assert_eq!(info.tick, -60);
    assert_eq!(info.liquidity_gross, 1_500);
    assert_eq!(info.liquidity_net, 500);
    assert!(info.initialized);
}

#[tokio::test]
async fn test_ensure_allowance_skips_when_sufficient() {
    let (client, mock) = mocked();
    push_return(&mock, &[Token::Uint(U256::MAX)]);

    let sent = ops::ensure_allowance(
        client,
        &token(0x01, "mUSDC"),
        Address::repeat_byte(0x42),
        Address::repeat_byte(0xf2),
        U256::from(10_000_000u64),
        U256::MAX,
    )
    .await
    .unwrap();
    assert!(!sent);
}

#[tokio::test]
async fn test_ensure_pool_without_price_fails_before_creation() {
    let (client, mock) = mocked();
    push_return(&mock, &[Token::Address(Address::zero())]);

    let (key, _) = PoolKey::new(Address::repeat_byte(1), Address::repeat_byte(2), 500).unwrap();
    let err = ops::ensure_pool(
        client,
        Address::repeat_byte(0xf0),
        Address::repeat_byte(0xf1),
        &key,
        None,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, OpsError::MissingInitialPrice));
}

#[tokio::test]
async fn test_add_liquidity_rejects_disabled_fee_tier() {
    let (client, mock) = mocked();
    // factory reports no spacing for the tier
    push_return(&mock, &[Token::Int(U256::zero())]);

    let err = ops::add_liquidity(client, &liquidity_request()).await.unwrap_err();
    assert!(matches!(err, OpsError::Param(ParamError::UndefinedInput(_))));
}

#[tokio::test]
async fn test_add_liquidity_rejects_bad_tolerance_without_rpc() {
    let (client, _mock) = mocked();
    let mut request = liquidity_request();
    request.slippage_bps = 10_001;

    let err = ops::add_liquidity(client, &request).await.unwrap_err();
    assert!(matches!(err, OpsError::Param(ParamError::InvalidTolerance(10_001))));
}

#[tokio::test]
async fn test_swap_same_token_rejected_without_rpc() {
    let (client, _mock) = mocked();
    let mut request = swap_request();
    request.token_out = request.token_in.clone();

    let err = ops::swap_exact_input(client, &request).await.unwrap_err();
    assert!(matches!(err, OpsError::Param(ParamError::InvalidPoolKey(_))));
}

#[tokio::test]
async fn test_swap_rejects_pool_for_another_pair() {
    let (client, mock) = mocked();
    queue(
        &mock,
        vec![
            ret(&[uint(50_000_000)]),
            ret(&[Token::Address(Address::repeat_byte(0x01))]),
            ret(&[Token::Address(Address::repeat_byte(0x02))]),
            // same pair, different fee tier
            ret(&[uint(3000)]),
        ],
    );

    let err = ops::swap_exact_input(client, &swap_request()).await.unwrap_err();
    match err {
        OpsError::PoolMismatch { pool, fee, .. } => {
            assert_eq!(pool, Address::repeat_byte(0xaa));
            assert_eq!(fee, 3000);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_swap_rejects_pool_missing_output_token() {
    let (client, mock) = mocked();
    queue(
        &mock,
        vec![
            ret(&[uint(50_000_000)]),
            ret(&[Token::Address(Address::repeat_byte(0x01))]),
            ret(&[Token::Address(Address::repeat_byte(0x09))]),
            ret(&[uint(500)]),
        ],
    );

    let err = ops::swap_exact_input(client, &swap_request()).await.unwrap_err();
    assert!(matches!(err, OpsError::PoolMismatch { .. }));
}

#[tokio::test]
async fn test_swap_without_minimum_applies_slippage_to_quote() {
    let (client, mock) = mocked();
    queue(&mock, swap_responses(9_950_000, 9_950_000));

    let outcome = ops::swap_exact_input(client, &swap_request()).await.unwrap();
    assert_eq!(outcome.quoted_out, U256::from(9_950_000u64));
    // 1% below the quote
    assert_eq!(outcome.params.amount_out_minimum, U256::from(9_850_500u64));
    assert_eq!(outcome.params.recipient, Address::repeat_byte(0x43));
    assert_eq!(outcome.tx_hash, H256::repeat_byte(0x77));
    assert_eq!(outcome.received, U256::from(9_950_000u64));
}

#[tokio::test]
async fn test_swap_keeps_configured_minimum_below_quote() {
    let (client, mock) = mocked();
    queue(&mock, swap_responses(9_950_000, 9_950_000));

    let mut request = swap_request();
    request.amount_out_min = Some(U256::from(9_000_000u64));
    let outcome = ops::swap_exact_input(client, &request).await.unwrap();
    assert_eq!(outcome.params.amount_out_minimum, U256::from(9_000_000u64));
}

#[tokio::test]
async fn test_swap_requotes_configured_minimum_above_quote() {
    let (client, mock) = mocked();
    queue(&mock, swap_responses(9_950_000, 9_950_000));

    let mut request = swap_request();
    request.amount_out_min = Some(U256::from(9_990_000u64));
    let outcome = ops::swap_exact_input(client, &request).await.unwrap();
    // quote less the 5% requote tolerance
    assert_eq!(outcome.params.amount_out_minimum, U256::from(9_452_500u64));
}

#[tokio::test]
async fn test_swap_insufficient_balance() {
    let (client, mock) = mocked();
    push_return(&mock, &[Token::Uint(U256::from(5_000_000u64))]);

    let err = ops::swap_exact_input(client, &swap_request()).await.unwrap_err();
    match err {
        OpsError::InsufficientBalance { have, need } => {
            assert_eq!(have, U256::from(5_000_000u64));
            assert_eq!(need, U256::from(10_000_000u64));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_add_liquidity_decodes_minted_position() {
    let (client, mock) = mocked();
    let manager = Address::repeat_byte(0xf1);
    let mut token_id = [0u8; 32];
    U256::from(7u64).to_big_endian(&mut token_id);
    let increase = Log {
        address: manager,
        topics: vec![
            H256::from(keccak256(INCREASE_LIQUIDITY_SIGNATURE.as_bytes())),
            H256::from(token_id),
        ],
        data: abi::encode(&[uint(4_000), uint(9_990_000), uint(9_980_000)]).into(),
        ..Default::default()
    };

    let mut responses = vec![
        // feeAmountTickSpacing, getPool
        ret(&[int(10)]),
        ret(&[Token::Address(Address::repeat_byte(0xaa))]),
    ];
    responses.extend(pool_state_responses(3, 10, 1_000));
    // allowances for token A and token B
    responses.push(ret(&[Token::Uint(U256::MAX)]));
    responses.push(ret(&[Token::Uint(U256::MAX)]));
    responses.extend(confirmed_tx(H256::repeat_byte(0x55), vec![increase]));
    responses.extend(pool_state_responses(3, 10, 5_000));
    queue(&mock, responses);

    let outcome = ops::add_liquidity(client, &liquidity_request()).await.unwrap();
    assert_eq!(outcome.pool, Address::repeat_byte(0xaa));
    assert!(!outcome.pool_created);
    assert_eq!(outcome.params.range, TickRange { tick_lower: -100, tick_upper: 100 });
    assert_eq!(outcome.params.amount0_min, U256::from(9_900_000u64));
    assert_eq!(outcome.tx_hash, H256::repeat_byte(0x55));
    assert_eq!(
        outcome.minted,
        Some(MintedPosition {
            token_id: U256::from(7u64),
            liquidity: 4_000,
            amount0: U256::from(9_990_000u64),
            amount1: U256::from(9_980_000u64),
        })
    );
    assert_eq!((outcome.liquidity_before, outcome.liquidity_after), (1_000, 5_000));
}

#[tokio::test]
async fn test_scan_records_unreadable_ticks() {
    let (client, mock) = mocked();
    let mut responses = pool_state_responses(3, 10, 1_000);
    responses.extend([
        tick_response(5, 5),
        // too short to decode
        serde_json::to_value(Bytes::from(vec![0u8; 4])).unwrap(),
        tick_response(7, -7),
    ]);
    queue(&mock, responses);

    // one read at a time keeps the mock's answers in tick order
    let scan = ops::scan_liquidity(client, Address::repeat_byte(0xaa), 1, 1)
        .await
        .unwrap();
    assert_eq!(scan.current_tick, 3);
    assert_eq!(scan.range, TickRange { tick_lower: -10, tick_upper: 10 });
    assert_eq!(
        scan.ticks,
        vec![
            TickLiquidity { tick: -10, liquidity_gross: 5, liquidity_net: 5, initialized: true },
            TickLiquidity { tick: 10, liquidity_gross: 7, liquidity_net: -7, initialized: true },
        ]
    );
    assert_eq!(scan.missing, vec![0]);
    assert_eq!(scan.total_liquidity_gross, U256::from(12u64));
}

#[tokio::test]
async fn test_scan_surfaces_unreachable_pool() {
    let (client, _mock) = mocked();
    let err = ops::scan_liquidity(client, Address::repeat_byte(0xaa), 20, 4)
        .await
        .unwrap_err();
    assert!(matches!(err, OpsError::Chain(_)));
}
