// Bindings for the deployed AMM. The periphery ABIs are JSON because their
// struct arguments are tuples; without an internalType the generated methods
// take plain Rust tuples in ABI field order.

use ethers::contract::abigen;

abigen!(
    TestToken,
    r#"[
        function balanceOf(address owner) external view returns (uint256)
        function allowance(address owner, address spender) external view returns (uint256)
        function approve(address spender, uint256 amount) external returns (bool)
        function decimals() external view returns (uint8)
        function symbol() external view returns (string)
        function mint(address to, uint256 amount) external
    ]"#
);

abigen!(
    V3Factory,
    r#"[
        function getPool(address tokenA, address tokenB, uint24 fee) external view returns (address)
        function feeAmountTickSpacing(uint24 fee) external view returns (int24)
    ]"#
);

abigen!(
    V3Pool,
    r#"[
        function slot0() external view returns (uint160, int24, uint16, uint16, uint16, uint32, bool)
        function liquidity() external view returns (uint128)
        function tickSpacing() external view returns (int24)
        function token0() external view returns (address)
        function token1() external view returns (address)
        function fee() external view returns (uint24)
        function ticks(int24 tick) external view returns (uint128, int128, uint256, uint256, int56, uint160, uint32, bool)
    ]"#
);

abigen!(
    PositionManager,
    r#"[
      {
        "type": "function",
        "name": "createAndInitializePoolIfNecessary",
        "stateMutability": "payable",
        "inputs": [
          {"name": "token0", "type": "address"},
          {"name": "token1", "type": "address"},
          {"name": "fee", "type": "uint24"},
          {"name": "sqrtPriceX96", "type": "uint160"}
        ],
        "outputs": [{"name": "pool", "type": "address"}]
      },
      {
        "type": "function",
        "name": "mint",
        "stateMutability": "payable",
        "inputs": [
          {
            "name": "params",
            "type": "tuple",
            "components": [
              {"name": "token0", "type": "address"},
              {"name": "token1", "type": "address"},
              {"name": "fee", "type": "uint24"},
              {"name": "tickLower", "type": "int24"},
              {"name": "tickUpper", "type": "int24"},
              {"name": "amount0Desired", "type": "uint256"},
              {"name": "amount1Desired", "type": "uint256"},
              {"name": "amount0Min", "type": "uint256"},
              {"name": "amount1Min", "type": "uint256"},
              {"name": "recipient", "type": "address"},
              {"name": "deadline", "type": "uint256"}
            ]
          }
        ],
        "outputs": [
          {"name": "tokenId", "type": "uint256"},
          {"name": "liquidity", "type": "uint128"},
          {"name": "amount0", "type": "uint256"},
          {"name": "amount1", "type": "uint256"}
        ]
      }
    ]"#
);

abigen!(
    SwapRouter,
    r#"[
      {
        "type": "function",
        "name": "exactInputSingle",
        "stateMutability": "payable",
        "inputs": [
          {
            "name": "params",
            "type": "tuple",
            "components": [
              {"name": "tokenIn", "type": "address"},
              {"name": "tokenOut", "type": "address"},
              {"name": "fee", "type": "uint24"},
              {"name": "recipient", "type": "address"},
              {"name": "deadline", "type": "uint256"},
              {"name": "amountIn", "type": "uint256"},
              {"name": "amountOutMinimum", "type": "uint256"},
              {"name": "sqrtPriceLimitX96", "type": "uint160"}
            ]
          }
        ],
        "outputs": [{"name": "amountOut", "type": "uint256"}]
      }
    ]"#
);

/// `IncreaseLiquidity(uint256 indexed tokenId, uint128 liquidity, uint256 amount0, uint256 amount1)`
pub const INCREASE_LIQUIDITY_SIGNATURE: &str = "IncreaseLiquidity(uint256,uint128,uint256,uint256)";
