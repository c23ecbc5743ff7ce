use chrono::NaiveDate;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

pub const NO_DATA_DETAIL: &str = "No price data available for the given range";

/// Profit request as sent by the dashboard; dates are `MM/DD/YYYY` strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitRequest {
    pub ticker: String,
    pub start_date: String,
    pub end_date: String,
}

/// Best single buy/sell over one series, plus the multi-trade total for the same series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradeResult {
    pub buy_date: NaiveDate,
    pub sell_date: NaiveDate,
    /// `+inf` when no profitable pair exists (serialized as `null`)
    pub buy_close: f64,
    pub sell_close: f64,
    pub profit: f64,
    pub max_multi_trade_profit: f64,
}

/// Result of analyzing one window. An empty series is `NoData`, never a zero-profit trade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowOutcome {
    NoData,
    Trade(TradeResult),
}

impl WindowOutcome {
    pub fn trade(&self) -> Option<&TradeResult> {
        match self {
            WindowOutcome::NoData => None,
            WindowOutcome::Trade(trade) => Some(trade),
        }
    }

    pub fn multi_trade_profit(&self) -> Option<f64> {
        self.trade().map(|t| t.max_multi_trade_profit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowRole {
    Main,
    Preceding,
    Following,
}

impl WindowRole {
    pub const ALL: [WindowRole; 3] = [WindowRole::Main, WindowRole::Preceding, WindowRole::Following];

    /// 对外输出的字段名
    pub fn key(&self) -> &'static str {
        match self {
            WindowRole::Main => "main_period",
            WindowRole::Preceding => "pre_period",
            WindowRole::Following => "post_period",
        }
    }
}

/// One value per window role.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Windowed<T> {
    pub main: T,
    pub preceding: T,
    pub following: T,
}

impl<T> Windowed<T> {
    pub fn get(&self, role: WindowRole) -> &T {
        match role {
            WindowRole::Main => &self.main,
            WindowRole::Preceding => &self.preceding,
            WindowRole::Following => &self.following,
        }
    }

    pub fn get_mut(&mut self, role: WindowRole) -> &mut T {
        match role {
            WindowRole::Main => &mut self.main,
            WindowRole::Preceding => &mut self.preceding,
            WindowRole::Following => &mut self.following,
        }
    }

    pub fn map<U, F: FnMut(&T) -> U>(&self, mut f: F) -> Windowed<U> {
        Windowed {
            main: f(&self.main),
            preceding: f(&self.preceding),
            following: f(&self.following),
        }
    }
}

pub type WindowedAnalysis = Windowed<WindowOutcome>;

/// Names of peers whose multi-trade profit beat the target, per window, in catalog order.
pub type OutperformerOverlay = Windowed<Vec<String>>;

/// Analysis merged with its outperformer overlay; this is what callers get back.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfitReport {
    pub analysis: WindowedAnalysis,
    pub outperformers: OutperformerOverlay,
}

impl ProfitReport {
    pub fn outperformed_by(&self, role: WindowRole) -> &[String] {
        self.outperformers.get(role)
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum PeriodView<'a> {
    NoData {
        detail: &'static str,
    },
    Trade {
        #[serde(flatten)]
        trade: &'a TradeResult,
        stocks_with_better_profit: String,
    },
}

// 兼容旧前端: 名称后缀 ", "
fn join_names(names: &[String]) -> String {
    names.iter().map(|name| format!("{}, ", name)).collect()
}

impl Serialize for ProfitReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ProfitReport", 3)?;
        for role in WindowRole::ALL {
            let view = match self.analysis.get(role) {
                WindowOutcome::NoData => PeriodView::NoData { detail: NO_DATA_DETAIL },
                WindowOutcome::Trade(trade) => PeriodView::Trade {
                    trade,
                    stocks_with_better_profit: join_names(self.outperformers.get(role)),
                },
            };
            state.serialize_field(role.key(), &view)?;
        }
        state.end()
    }
}
