use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, trace};

use crate::{CompletedCycle, StreakReport, Transfer, NATIVE_MINT};

/// Classified trade action derived from one raw transfer
#[derive(Debug, Clone, PartialEq)]
pub enum TradeAction {
    /// Native asset swapped for a token
    Buy {
        token_mint: String,
        cost_native: Decimal,
        token_amount: Decimal,
        time: i64,
    },
    /// Token swapped back to the native asset
    Sell {
        token_mint: String,
        sell_amount: Decimal,
        proceeds_native: Decimal,
        time: i64,
    },
    /// Native-to-native or token-to-token, carries no trade signal
    Skip,
}

/// Whether an address refers to the native asset (SOL/WSOL)
pub fn is_native_asset(address: &str) -> bool {
    address.contains(NATIVE_MINT) || address.contains("WSOL")
}

/// Classify one transfer as a buy, a sell, or noise
///
/// Skips when both sides are native or both are tokens; only a swap that
/// crosses the native boundary is a directional trade.
pub fn classify(transfer: &Transfer) -> TradeAction {
    let from_is_native = is_native_asset(&transfer.from.address);
    let to_is_native = is_native_asset(&transfer.to.address);

    if from_is_native == to_is_native {
        return TradeAction::Skip;
    }

    if from_is_native {
        TradeAction::Buy {
            token_mint: transfer.to.address.clone(),
            cost_native: transfer.from.amount,
            token_amount: transfer.to.amount,
            time: transfer.time,
        }
    } else {
        TradeAction::Sell {
            token_mint: transfer.from.address.clone(),
            sell_amount: transfer.from.amount,
            proceeds_native: transfer.to.amount,
            time: transfer.time,
        }
    }
}

/// Per-mint buy/sell accumulator for one open cycle
#[derive(Debug, Clone, Default)]
struct Position {
    net_holding: Decimal,
    total_cost_native: Decimal,
    total_proceeds_native: Decimal,
}

/// Per-mint position tracker, built fresh for every analysis run
#[derive(Debug, Default)]
pub struct Ledger {
    positions: HashMap<String, Position>,
    cycles: Vec<CompletedCycle>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    fn holding_epsilon() -> Decimal {
        Decimal::new(1, 7) // 1e-7
    }

    pub fn apply_buy(&mut self, mint: &str, token_amount: Decimal, cost_native: Decimal) {
        let position = self.positions.entry(mint.to_string()).or_default();
        position.net_holding += token_amount;
        position.total_cost_native += cost_native;

        trace!(
            "buy {} => holding={}, cost={}",
            mint,
            position.net_holding,
            position.total_cost_native
        );
    }

    /// Apply a sell, closing the mint's cycle if the holding returns to zero
    ///
    /// A sell consumes at most the tracked holding; proceeds are credited in
    /// full even when the sell amount exceeds it, so profit can be overstated
    /// on over-sells and data gaps. That matches the upstream accounting and
    /// is deliberate.
    pub fn apply_sell(
        &mut self,
        mint: &str,
        sell_amount: Decimal,
        proceeds_native: Decimal,
        time: i64,
    ) {
        let position = self.positions.entry(mint.to_string()).or_default();

        let consumed = sell_amount.min(position.net_holding);
        position.net_holding -= consumed;
        position.total_proceeds_native += proceeds_native;

        if position.net_holding < Self::holding_epsilon() {
            let net_profit = position.total_proceeds_native - position.total_cost_native;
            debug!(
                "cycle closed for mint {} at {}: profit={}",
                mint, time, net_profit
            );

            self.cycles.push(CompletedCycle {
                close_time: time,
                net_profit,
            });

            *position = Position::default();
        }
    }

    /// All cycles closed so far, ascending by close time
    pub fn into_cycles(self) -> Vec<CompletedCycle> {
        let mut cycles = self.cycles;
        cycles.sort_by_key(|c| c.close_time);
        cycles
    }
}

/// Reconstruct buy→sell cycles from a wallet's raw transfers and derive the
/// longest consecutive-win streak and overall win rate
///
/// Pure function of the input list; transfers may arrive in any order.
pub fn analyze_transfers(wallet_address: &str, mut transfers: Vec<Transfer>) -> StreakReport {
    transfers.sort_by_key(|t| t.time);

    let mut ledger = Ledger::new();
    for transfer in &transfers {
        match classify(transfer) {
            TradeAction::Buy {
                token_mint,
                cost_native,
                token_amount,
                ..
            } => ledger.apply_buy(&token_mint, token_amount, cost_native),
            TradeAction::Sell {
                token_mint,
                sell_amount,
                proceeds_native,
                time,
            } => ledger.apply_sell(&token_mint, sell_amount, proceeds_native, time),
            TradeAction::Skip => {}
        }
    }

    let cycles = ledger.into_cycles();

    let mut current = 0u32;
    let mut max_streak = 0u32;
    let mut total_wins = 0u32;
    for cycle in &cycles {
        if cycle.is_win() {
            current += 1;
            total_wins += 1;
            max_streak = max_streak.max(current);
        } else {
            current = 0;
        }
    }

    let total_trades = cycles.len() as u32;
    let win_rate = if total_trades > 0 {
        Decimal::from(total_wins * 100) / Decimal::from(total_trades)
    } else {
        Decimal::ZERO
    };

    debug!(
        "analyzed {} transfers for {}: {} cycles, {} wins, max streak {}",
        transfers.len(),
        wallet_address,
        total_trades,
        total_wins,
        max_streak
    );

    StreakReport {
        wallet_address: wallet_address.to_string(),
        max_streak,
        win_rate,
        total_trades,
        total_wins,
        cycles,
        generated_at: chrono::Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TransferSide;

    const MINT_A: &str = "Mint11111111111111111111111111111111111111A";
    const MINT_B: &str = "Mint11111111111111111111111111111111111111B";

    fn side(address: &str, amount: i64) -> TransferSide {
        TransferSide {
            address: address.to_string(),
            amount: Decimal::from(amount),
        }
    }

    fn buy(mint: &str, cost_native: i64, token_amount: i64, time: i64) -> Transfer {
        Transfer {
            from: side(NATIVE_MINT, cost_native),
            to: side(mint, token_amount),
            time,
        }
    }

    fn sell(mint: &str, sell_amount: i64, proceeds_native: i64, time: i64) -> Transfer {
        Transfer {
            from: side(mint, sell_amount),
            to: side(NATIVE_MINT, proceeds_native),
            time,
        }
    }

    #[test]
    fn classify_buy_sell_and_skip() {
        assert!(matches!(
            classify(&buy(MINT_A, 1, 10, 100)),
            TradeAction::Buy { .. }
        ));
        assert!(matches!(
            classify(&sell(MINT_A, 10, 2, 200)),
            TradeAction::Sell { .. }
        ));

        // native -> native
        let wrap = Transfer {
            from: side(NATIVE_MINT, 1),
            to: side("WSOL", 1),
            time: 1,
        };
        assert_eq!(classify(&wrap), TradeAction::Skip);

        // token -> token
        let token_swap = Transfer {
            from: side(MINT_A, 5),
            to: side(MINT_B, 7),
            time: 2,
        };
        assert_eq!(classify(&token_swap), TradeAction::Skip);
    }

    #[test]
    fn empty_input_yields_zero_report() {
        let report = analyze_transfers("wallet", vec![]);
        assert_eq!(report.max_streak, 0);
        assert_eq!(report.win_rate, Decimal::ZERO);
        assert_eq!(report.total_trades, 0);
        assert!(report.cycles.is_empty());
    }

    #[test]
    fn unmatched_buy_never_closes() {
        let report = analyze_transfers("wallet", vec![buy(MINT_A, 1, 10, 100)]);
        assert_eq!(report.total_trades, 0);
        assert_eq!(report.max_streak, 0);
    }

    #[test]
    fn single_profitable_round_trip() {
        let report = analyze_transfers(
            "wallet",
            vec![buy(MINT_A, 1, 10, 100), sell(MINT_A, 10, 2, 200)],
        );

        assert_eq!(report.total_trades, 1);
        assert_eq!(report.max_streak, 1);
        assert_eq!(report.cycles[0].net_profit, Decimal::ONE);
        assert_eq!(report.cycles[0].close_time, 200);
        assert_eq!(report.win_rate, Decimal::from(100));
    }

    #[test]
    fn loss_resets_streak() {
        let report = analyze_transfers(
            "wallet",
            vec![
                buy(MINT_A, 2, 10, 100),
                sell(MINT_A, 10, 1, 200), // -1
                buy(MINT_A, 1, 10, 300),
                sell(MINT_A, 10, 2, 400), // +1
            ],
        );

        assert_eq!(report.total_trades, 2);
        assert_eq!(report.total_wins, 1);
        assert_eq!(report.max_streak, 1);
        assert_eq!(report.win_rate, Decimal::from(50));
    }

    #[test]
    fn cross_mint_interleaving_keeps_streak_intact() {
        // Three profitable cycles across two mints, closes at t=200, 350, 500.
        let report = analyze_transfers(
            "wallet",
            vec![
                buy(MINT_A, 1, 10, 100),
                sell(MINT_A, 10, 2, 200),
                buy(MINT_B, 1, 5, 250),
                sell(MINT_B, 5, 3, 350),
                buy(MINT_A, 1, 20, 400),
                sell(MINT_A, 20, 4, 500),
            ],
        );

        assert_eq!(report.total_trades, 3);
        assert_eq!(report.max_streak, 3);
        let close_times: Vec<i64> = report.cycles.iter().map(|c| c.close_time).collect();
        assert_eq!(close_times, vec![200, 350, 500]);
    }

    #[test]
    fn partial_sell_emits_no_intermediate_cycle() {
        let report = analyze_transfers(
            "wallet",
            vec![
                buy(MINT_A, 2, 10, 100),
                sell(MINT_A, 4, 1, 200), // 6 still held
                sell(MINT_A, 6, 2, 300), // closes: proceeds 3, cost 2
            ],
        );

        assert_eq!(report.total_trades, 1);
        assert_eq!(report.cycles[0].close_time, 300);
        assert_eq!(report.cycles[0].net_profit, Decimal::ONE);
    }

    #[test]
    fn oversell_is_capped_but_proceeds_credit_in_full() {
        let report = analyze_transfers(
            "wallet",
            vec![
                buy(MINT_A, 1, 5, 100),
                // Sells more than tracked; consumed caps at 5, full proceeds count.
                sell(MINT_A, 10, 3, 200),
            ],
        );

        assert_eq!(report.total_trades, 1);
        assert_eq!(report.cycles[0].net_profit, Decimal::from(2));
    }

    #[test]
    fn unordered_input_is_sorted_before_processing() {
        let report = analyze_transfers(
            "wallet",
            vec![sell(MINT_A, 10, 2, 200), buy(MINT_A, 1, 10, 100)],
        );

        assert_eq!(report.total_trades, 1);
        assert_eq!(report.cycles[0].net_profit, Decimal::ONE);
    }

    #[test]
    fn analysis_is_deterministic() {
        let transfers = vec![
            buy(MINT_A, 1, 10, 100),
            sell(MINT_A, 10, 2, 200),
            buy(MINT_B, 3, 5, 300),
            sell(MINT_B, 5, 1, 400),
        ];

        let first = analyze_transfers("wallet", transfers.clone());
        let second = analyze_transfers("wallet", transfers);

        assert_eq!(first.max_streak, second.max_streak);
        assert_eq!(first.win_rate, second.win_rate);
        assert_eq!(first.cycles, second.cycles);
    }

    #[test]
    fn streak_never_exceeds_total_trades() {
        let report = analyze_transfers(
            "wallet",
            vec![
                buy(MINT_A, 1, 10, 100),
                sell(MINT_A, 10, 2, 200),
                buy(MINT_A, 1, 10, 300),
                sell(MINT_A, 10, 2, 400),
            ],
        );

        assert!(report.max_streak <= report.total_trades);
    }

    #[test]
    fn transfer_deserializes_with_missing_fields() {
        let transfer: Transfer = serde_json::from_str(r#"{"time": 123}"#).unwrap();
        assert_eq!(transfer.time, 123);
        assert_eq!(transfer.from.address, "");
        assert_eq!(transfer.from.amount, Decimal::ZERO);

        // A bare object is all-zero and classifies as noise.
        let empty: Transfer = serde_json::from_str("{}").unwrap();
        assert_eq!(classify(&empty), TradeAction::Skip);
    }
}
