use crate::models::profit::{OutperformerOverlay, WindowRole, Windowed, WindowedAnalysis};

/// Multi-trade totals of one peer over the same three windows.
#[derive(Debug, Clone, PartialEq)]
pub struct PeerProfit {
    pub name: String,
    pub multi_trade: Windowed<f64>,
}

/// Collect, per window, the peers whose multi-trade profit is strictly higher
/// than the target's. Windows where the target has no data or no positive
/// profit get no entries. Names keep the order of `peers`.
pub fn rank_outperformers(target: &WindowedAnalysis, peers: &[PeerProfit]) -> OutperformerOverlay {
    let mut overlay = OutperformerOverlay::default();

    for role in WindowRole::ALL {
        let threshold = match target.get(role).multi_trade_profit() {
            Some(profit) if profit > 0.0 => profit,
            _ => continue,
        };

        let names = overlay.get_mut(role);
        for peer in peers {
            if *peer.multi_trade.get(role) > threshold {
                names.push(peer.name.clone());
            }
        }
    }

    overlay
}
