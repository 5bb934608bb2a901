pub mod cycle_engine;

pub use cycle_engine::{analyze_transfers, classify, is_native_asset, Ledger, TradeAction};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Wrapped SOL mint address, the native side of every swap we care about.
pub const NATIVE_MINT: &str = "So11111111111111111111111111111111111111112";

/// One side of a swap as reported by the trade history API
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TransferSide {
    /// Mint address of the asset on this side
    #[serde(default)]
    pub address: String,

    /// Amount of the asset that moved
    #[serde(default)]
    pub amount: Decimal,
}

/// Raw directed swap record for one wallet
///
/// Deserializes straight from the trade history payload; any field the API
/// leaves out is treated as zero/empty rather than an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Transfer {
    /// Asset leaving the wallet
    #[serde(default)]
    pub from: TransferSide,

    /// Asset entering the wallet
    #[serde(default)]
    pub to: TransferSide,

    /// Unix timestamp of the swap
    #[serde(default)]
    pub time: i64,
}

/// A round trip that returned a token position to zero
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletedCycle {
    /// Timestamp of the sell that closed the position
    pub close_time: i64,

    /// Total proceeds minus total cost over the whole cycle, in native units
    pub net_profit: Decimal,
}

impl CompletedCycle {
    pub fn is_win(&self) -> bool {
        self.net_profit > Decimal::ZERO
    }
}

/// Streak analysis result for a wallet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakReport {
    /// Wallet address analyzed
    pub wallet_address: String,

    /// Longest run of consecutive profitable cycles, in close-time order
    pub max_streak: u32,

    /// Percentage of closed cycles that were profitable
    pub win_rate: Decimal,

    /// Number of closed cycles
    pub total_trades: u32,

    /// Number of profitable closed cycles
    pub total_wins: u32,

    /// Every closed cycle across all mints, ascending by close time
    pub cycles: Vec<CompletedCycle>,

    /// When this report was generated
    pub generated_at: DateTime<Utc>,
}

impl StreakReport {
    /// All-zero report for a wallet with no closed cycles
    pub fn empty(wallet_address: &str) -> Self {
        Self {
            wallet_address: wallet_address.to_string(),
            max_streak: 0,
            win_rate: Decimal::ZERO,
            total_trades: 0,
            total_wins: 0,
            cycles: Vec::new(),
            generated_at: Utc::now(),
        }
    }
}
