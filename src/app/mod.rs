// mainから直接呼び出すアプリケーションの動作モード(C, G)のモジュール

mod calculator;
mod grouping;

pub use calculator::{BoardConfig, CalculatorApp, ScoreReport};
pub use grouping::GroupingApp;
