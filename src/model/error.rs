use super::*;

// 評価時のエラー
// 内部の不整合(実装のバグ)はここには含めずpanicさせる
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    Tile(String),          // 不正な牌の生成
    Hand(String),          // 手牌・盤面の不整合 (枚数, 5枚目の牌, 赤5, 面子分解不能)
    ScoreArgument(String), // 点数計算用フラグの不整合 (鳴きリーチ, リーチなし一発 など)
}

impl EvalError {
    pub fn message(&self) -> &str {
        match self {
            EvalError::Tile(m) | EvalError::Hand(m) | EvalError::ScoreArgument(m) => m,
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for EvalError {}
