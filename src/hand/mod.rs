// 手牌の分解, 役判定, 点数計算を行うモジュール
mod board;
mod group;
mod point;
mod yaku;

pub use self::{
    board::{BoardFlags, Inputs, PlayerBoard},
    group::{create_closed_groups, is_complete},
    point::{calc_limit_point, calc_score, Score},
    yaku::{
        calc_composition, calc_wins, is_pinfu_hand, is_single_wait, is_two_sided_wait,
        Composition, WinDefine, WinKind, DORA, RED_FIVE, WIN_KIND_COUNT, WIN_LIST,
    },
};
