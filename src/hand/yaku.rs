use std::fmt;

use crate::model::*;

use super::board::{Inputs, PlayerBoard};

use Rank::*;
use TileGroupType::*;

// 役の種類 (WIN_LISTの並び順と一致させること)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WinKind {
    DoubleRiichi,
    Riichi,
    Ippatsu,
    MenzenchinTsumo,
    UnderTheSea,
    UnderTheRiver,
    RinshanKaihou,
    RobbingAKan,
    SevenPairs,
    ThirteenOrphans,
    TrueThirteenOrphans,
    Pinfu,
    PureDoubleSequence,
    TwicePureDoubleSequence,
    GreenDragonYakuhai,
    WhiteDragonYakuhai,
    RedDragonYakuhai,
    PrevalentWind,
    SeatWind,
    LittleThreeDragons,
    BigThreeDragons,
    LittleFourWinds,
    BigFourWinds,
    MixedTripleSequence,
    PureStraight,
    AllTerminals,
    AllHonors,
    AllGreen,
    AllSimples,
    FullOutsideHand,
    HalfOutsideHand,
    AllTriplets,
    ThreeConcealedTriplets,
    FourConcealedTriplets,
    SingleWaitFourConcealedTriplets,
    ThreeKans,
    FourKans,
    TripleTriplets,
    TrueNineGates,
    NineGates,
    FullFlush,
    HalfFlush,
}

pub const WIN_KIND_COUNT: usize = 42;

impl WinKind {
    #[inline]
    pub fn define(self) -> &'static WinDefine {
        &WIN_LIST[self as usize]
    }

    #[inline]
    pub fn win(self) -> &'static Win {
        &self.define().win
    }
}

pub struct WinDefine {
    pub kind: WinKind,
    pub win: Win,
    pub func: fn(&PlayerBoard) -> bool,
    pub depends_on: Inputs, // 判定結果のキャッシュを無効化する入力
}

impl fmt::Debug for WinDefine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {})", self.kind, self.win)
    }
}

macro_rules! win {
    ($k: ident, $n: expr, $d: expr, $o: expr, $c: expr, $y: ident, $f: expr, $dep: expr) => {
        WinDefine {
            kind: WinKind::$k,
            win: Win {
                name: $n,
                desc: $d,
                open_han: $o,
                closed_han: $c,
                yakuman: Yakuman::$y,
            },
            func: $f,
            depends_on: $dep,
        }
    };
}

const H: Inputs = Inputs::HAND;
const RIICHI: Inputs = Inputs::RIICHI.union(Inputs::DOUBLE_RIICHI);
const H_TSUMO: Inputs = Inputs::HAND.union(Inputs::TSUMO);

// 判定順は役一覧の出力順
pub static WIN_LIST: &[WinDefine] = &[
    win!(DoubleRiichi, "Double Riichi", "Declare riichi on the first turn", None, Some(1), None, is_double_riichi, RIICHI),
    win!(Riichi, "Riichi", "Declare riichi with a closed ready hand", None, Some(1), None, is_riichi, RIICHI),
    win!(Ippatsu, "Ippatsu", "Win within one turn after declaring riichi", None, Some(1), None, is_ippatsu, Inputs::IPPATSU),
    win!(MenzenchinTsumo, "Menzenchin Tsumo", "Win by tsumo with a closed hand", None, Some(1), None, is_menzenchin_tsumo, H_TSUMO),
    win!(UnderTheSea, "Under The Sea", "Win by tsumo on the last tile of the wall", Some(1), Some(1), None, is_under_the_sea, Inputs::LAST_DRAW.union(Inputs::TSUMO)),
    win!(UnderTheRiver, "Under The River", "Win by ron on the last discard", Some(1), Some(1), None, is_under_the_river, Inputs::LAST_DRAW.union(Inputs::TSUMO)),
    win!(RinshanKaihou, "Rinshan Kaihou", "Win by tsumo on the replacement tile drawn after a kan", Some(1), Some(1), None, is_rinshan_kaihou, Inputs::KAN_WIN.union(Inputs::TSUMO)),
    win!(RobbingAKan, "Robbing A Kan", "Win by ron on a tile another player adds to a kan", Some(1), Some(1), None, is_robbing_a_kan, Inputs::KAN_WIN.union(Inputs::TSUMO)),
    win!(SevenPairs, "Seven Pairs", "Win with seven pairs", None, Some(2), None, is_seven_pairs, H),
    win!(ThirteenOrphans, "Thirteen Orphans", "Win with one of each terminal and honor plus a pair of them", None, Some(0), Single, is_thirteen_orphans, H),
    win!(TrueThirteenOrphans, "True Thirteen Orphans", "Thirteen orphans won on a thirteen-sided wait", None, Some(0), Double, is_true_thirteen_orphans, H),
    win!(Pinfu, "Pinfu", "Win with four sequences, a non-honor pair and a two-sided wait", None, Some(1), None, is_pinfu, H),
    win!(PureDoubleSequence, "Pure Double Sequence", "Win with two identical sequences", Some(1), Some(1), None, is_pure_double_sequence, H),
    win!(TwicePureDoubleSequence, "Twice Pure Double Sequence", "Win with two sets of two identical sequences", Some(3), Some(3), None, is_twice_pure_double_sequence, H),
    win!(GreenDragonYakuhai, "Green Dragon Yakuhai", "Win with a triplet or kan of green dragons", Some(1), Some(1), None, is_green_dragon, H),
    win!(WhiteDragonYakuhai, "White Dragon Yakuhai", "Win with a triplet or kan of white dragons", Some(1), Some(1), None, is_white_dragon, H),
    win!(RedDragonYakuhai, "Red Dragon Yakuhai", "Win with a triplet or kan of red dragons", Some(1), Some(1), None, is_red_dragon, H),
    win!(PrevalentWind, "Prevalent Wind", "Win with a triplet or kan of the prevalent wind", Some(1), Some(1), None, is_prevalent_wind, H.union(Inputs::PREVALENT_WIND)),
    win!(SeatWind, "Seat Wind", "Win with a triplet or kan of the seat wind", Some(1), Some(1), None, is_seat_wind, H.union(Inputs::SEAT_WIND)),
    win!(LittleThreeDragons, "Little Three Dragons", "Win with exactly two dragon triplets", Some(2), Some(2), None, is_little_three_dragons, H),
    win!(BigThreeDragons, "Big Three Dragons", "Win with triplets of all three dragons", Some(0), Some(0), Single, is_big_three_dragons, H),
    win!(LittleFourWinds, "Little Four Winds", "Win with exactly three wind triplets", Some(0), Some(0), Single, is_little_four_winds, H),
    win!(BigFourWinds, "Big Four Winds", "Win with triplets of all four winds", Some(0), Some(0), Double, is_big_four_winds, H),
    win!(MixedTripleSequence, "Mixed Triple Sequence", "Win with the same sequence in all three suits", Some(1), Some(2), None, is_mixed_triple_sequence, H),
    win!(PureStraight, "Pure Straight", "Win with 1-2-3, 4-5-6 and 7-8-9 of one suit", Some(1), Some(2), None, is_pure_straight, H),
    win!(AllTerminals, "All Terminals", "Win with only ones and nines", Some(0), Some(0), Single, is_all_terminals, H),
    win!(AllHonors, "All Honors", "Win with only honor tiles", Some(0), Some(0), Single, is_all_honors, H),
    win!(AllGreen, "All Green", "Win with only green tiles", Some(0), Some(0), Single, is_all_green, H),
    win!(AllSimples, "All Simples", "Win with only tiles from two to eight", Some(1), Some(1), None, is_all_simples, H),
    win!(FullOutsideHand, "Full Outside Hand", "Win with only terminals and honors", Some(3), Some(2), None, is_full_outside, H),
    win!(HalfOutsideHand, "Half Outside Hand", "Win with a terminal or honor in every group", Some(1), Some(2), None, is_half_outside, H),
    win!(AllTriplets, "All Triplets", "Win with four triplets or kans", Some(2), None, None, is_all_triplets, H),
    win!(ThreeConcealedTriplets, "Three Concealed Triplets", "Win with three triplets made without calls", Some(2), Some(2), None, is_three_concealed_triplets, H_TSUMO),
    win!(FourConcealedTriplets, "Four Concealed Triplets", "Win with four triplets made without calls", None, Some(0), Single, is_four_concealed_triplets, H_TSUMO),
    win!(SingleWaitFourConcealedTriplets, "Single Wait Four Concealed Triplets", "Four concealed triplets won on the pair", None, Some(0), Double, is_single_wait_four_concealed_triplets, H_TSUMO),
    win!(ThreeKans, "Three Kan", "Win with three kans", Some(2), Some(2), None, is_three_kans, H),
    win!(FourKans, "Four Kan", "Win with four kans", Some(0), Some(0), Single, is_four_kans, H),
    win!(TripleTriplets, "Triple Triplets", "Win with triplets of the same number in all three suits", Some(2), Some(2), None, is_triple_triplets, H),
    win!(TrueNineGates, "True Nine Gates", "Nine gates won on a nine-sided wait", None, Some(0), Double, is_true_nine_gates, H),
    win!(NineGates, "Nine Gates", "Win with 1-1-1-2-3-4-5-6-7-8-9-9-9 plus one tile of one suit", None, Some(0), Single, is_nine_gates, H),
    win!(FullFlush, "Full Flush", "Win with tiles of only one suit", Some(5), Some(6), None, is_full_flush, H),
    win!(HalfFlush, "Half Flush", "Win with tiles of one suit and honors", Some(2), Some(3), None, is_half_flush, H),
];

pub static DORA: Win = Win {
    name: "Dora Indicator",
    desc: "Win with the tile following a dora indicator",
    open_han: Some(1),
    closed_han: Some(1),
    yakuman: Yakuman::None,
};

pub static RED_FIVE: Win = Win {
    name: "Red Five",
    desc: "Win with a red five in your hand",
    open_han: Some(1),
    closed_han: Some(1),
    yakuman: Yakuman::None,
};

// 九蓮宝燈の基本形 (和了牌を除く13枚)
pub const NINE_GATES_HAND: [usize; 13] = [1, 1, 1, 2, 3, 4, 5, 6, 7, 8, 9, 9, 9];

// 成立した役の一覧 (赤5, ドラを含む)
// 一般役が一つもない場合は空
pub fn calc_wins(b: &PlayerBoard) -> Vec<&'static Win> {
    let closed = b.closed_hand();
    let mut wins: Vec<&'static Win> = WIN_LIST
        .iter()
        .filter(|d| b.has_win(d.kind) && d.win.han(closed).is_some())
        .map(|d| &d.win)
        .collect();
    if wins.is_empty() {
        return wins;
    }

    for _ in b.hand_tiles().iter().filter(|t| t.is_red()) {
        wins.push(&RED_FIVE);
    }

    for dora in b.doras() {
        let next = dora.rank().cyclic_next();
        for t in b.hand_tiles() {
            if next == Some(t.rank()) && t.suit() == dora.suit() {
                wins.push(&DORA);
            }
        }
    }

    wins
}

// [手牌の構成]
// 么九牌関連の役は互いに排他的なので一度にまとめて判定する
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composition {
    AllTerminals,
    AllHonors,
    AllSimples,
    FullOutside,
    HalfOutside,
    Mixed,
    Irregular, // 4面子1雀頭の形ではない
}

pub fn calc_composition(groups: &[TileGroup]) -> Composition {
    if groups.len() != 5 {
        return Composition::Irregular;
    }

    let is_outside = |t: &Tile| t.rank().is_terminal() || t.rank().is_honor();
    let tiles = || groups.iter().flat_map(|g| g.tiles().iter());
    if tiles().all(|t| t.rank().is_simple()) {
        Composition::AllSimples
    } else if tiles().all(|t| t.rank().is_terminal()) {
        Composition::AllTerminals
    } else if tiles().all(|t| t.rank().is_honor()) {
        Composition::AllHonors
    } else if tiles().all(is_outside) {
        // 老頭牌と字牌のみ
        Composition::FullOutside
    } else if groups.iter().all(|g| g.tiles().iter().any(is_outside)) {
        Composition::HalfOutside
    } else {
        Composition::Mixed
    }
}

// 和了牌が両面待ちの順子の一部かどうか (辺張, 嵌張は除外)
pub fn is_two_sided_wait(g: &TileGroup, w: &Tile) -> bool {
    if g.group_type() != Sequence {
        return false;
    }
    let ts = g.tiles();
    !ts[1].soft_equals(w)
        && (ts[0].soft_equals(w) || ts[0].rank() != One)
        && (ts[2].soft_equals(w) || ts[2].rank() != Nine)
}

// 単騎, 嵌張, 辺張待ち
pub fn is_single_wait(g: &TileGroup, w: &Tile) -> bool {
    match g.group_type() {
        Pair => true,
        Sequence => {
            let ts = g.tiles();
            ts[1].soft_equals(w)
                || (ts[2].soft_equals(w) && ts[0].rank() == One)
                || (ts[0].soft_equals(w) && ts[2].rank() == Nine)
        }
        _ => false,
    }
}

// 平和形 (門前かどうかは問わない)
pub fn is_pinfu_hand(b: &PlayerBoard) -> bool {
    let (wg, w) = match (b.winning_group(), b.winning()) {
        (Some(wg), Some(w)) => (wg, w),
        _ => return false,
    };
    if b.count_groups(Sequence) != 4 || wg.tiles().len() != 3 {
        return false;
    }
    match b.pair_group() {
        Some(p) if !p.first().rank().is_honor() => {}
        _ => return false,
    }
    is_two_sided_wait(wg, &w)
}

fn has_tuplet_of(b: &PlayerBoard, rank: Rank) -> bool {
    b.tuplets().any(|g| g.first().rank() == rank)
}

fn count_tuplets(b: &PlayerBoard, f: fn(Rank) -> bool) -> usize {
    b.tuplets().filter(|g| f(g.first().rank())).count()
}

// 手牌に含まれる牌の種別 (重複なし)
fn suits_in_hand(b: &PlayerBoard) -> Vec<Suit> {
    let mut suits: Vec<Suit> = b.hand_tiles().iter().map(|t| t.suit()).collect();
    suits.sort();
    suits.dedup();
    suits
}

// 九蓮宝燈の基本形から手牌(和了牌以外)を取り除いた残り
// 一色の門前手でない場合はNone
fn nine_gates_rest(b: &PlayerBoard) -> Option<Vec<usize>> {
    if !b.closed_hand() || b.hidden().len() != 13 {
        return None;
    }
    let suits = suits_in_hand(b);
    if suits.len() != 1 || !suits[0].is_number() {
        return None;
    }

    let mut rest = NINE_GATES_HAND.to_vec();
    for t in b.hidden() {
        let n = t.rank().number()?;
        if let Some(i) = rest.iter().position(|&r| r == n) {
            rest.remove(i);
        }
    }
    Some(rest)
}

// [役の判定]
// 状況役

fn is_double_riichi(b: &PlayerBoard) -> bool {
    b.riichi() && b.double_riichi()
}

fn is_riichi(b: &PlayerBoard) -> bool {
    b.riichi() && !b.double_riichi()
}

fn is_ippatsu(b: &PlayerBoard) -> bool {
    b.ippatsu()
}

fn is_menzenchin_tsumo(b: &PlayerBoard) -> bool {
    b.closed_hand() && b.tsumo()
}

fn is_under_the_sea(b: &PlayerBoard) -> bool {
    b.last_draw() && b.tsumo()
}

fn is_under_the_river(b: &PlayerBoard) -> bool {
    b.last_draw() && !b.tsumo()
}

fn is_rinshan_kaihou(b: &PlayerBoard) -> bool {
    b.kan_win() && b.tsumo()
}

fn is_robbing_a_kan(b: &PlayerBoard) -> bool {
    b.kan_win() && !b.tsumo()
}

// 特殊形

fn is_seven_pairs(b: &PlayerBoard) -> bool {
    b.closed_hand() && b.groups().len() == 7 && b.count_groups(Pair) == 7
}

fn is_orphan_hand(b: &PlayerBoard) -> bool {
    b.closed_hand() && b.groups().len() == 13 && b.count_groups(Orphan) == 12
}

// 手牌(和了牌以外)に和了牌と同じ牌が含まれている = 13面待ち
fn is_thirteen_sided_wait(b: &PlayerBoard) -> bool {
    match b.winning() {
        Some(w) => b.hidden().iter().any(|t| t.soft_equals(&w)),
        None => false,
    }
}

fn is_thirteen_orphans(b: &PlayerBoard) -> bool {
    is_orphan_hand(b) && !is_thirteen_sided_wait(b)
}

fn is_true_thirteen_orphans(b: &PlayerBoard) -> bool {
    is_orphan_hand(b) && is_thirteen_sided_wait(b)
}

// 面子の組み合わせ

fn is_pinfu(b: &PlayerBoard) -> bool {
    b.closed_hand() && is_pinfu_hand(b)
}

fn is_pure_double_sequence(b: &PlayerBoard) -> bool {
    b.pure_double_count() == 1
}

fn is_twice_pure_double_sequence(b: &PlayerBoard) -> bool {
    b.pure_double_count() == 2
}

fn is_green_dragon(b: &PlayerBoard) -> bool {
    has_tuplet_of(b, GreenDragon)
}

fn is_white_dragon(b: &PlayerBoard) -> bool {
    has_tuplet_of(b, WhiteDragon)
}

fn is_red_dragon(b: &PlayerBoard) -> bool {
    has_tuplet_of(b, RedDragon)
}

fn is_prevalent_wind(b: &PlayerBoard) -> bool {
    has_tuplet_of(b, b.prevalent_wind())
}

fn is_seat_wind(b: &PlayerBoard) -> bool {
    has_tuplet_of(b, b.seat_wind())
}

fn is_little_three_dragons(b: &PlayerBoard) -> bool {
    count_tuplets(b, Rank::is_dragon) == 2
}

fn is_big_three_dragons(b: &PlayerBoard) -> bool {
    count_tuplets(b, Rank::is_dragon) == 3
}

fn is_little_four_winds(b: &PlayerBoard) -> bool {
    count_tuplets(b, Rank::is_wind) == 3
}

fn is_big_four_winds(b: &PlayerBoard) -> bool {
    count_tuplets(b, Rank::is_wind) == 4
}

fn is_mixed_triple_sequence(b: &PlayerBoard) -> bool {
    let seqs = b.groups_of(Sequence);
    seqs.iter().any(|g| {
        let r = g.first().rank();
        let mut suits: Vec<Suit> = seqs
            .iter()
            .filter(|g2| g2.first().rank() == r)
            .map(|g2| g2.first().suit())
            .collect();
        suits.sort();
        suits.dedup();
        suits.len() == 3
    })
}

fn is_pure_straight(b: &PlayerBoard) -> bool {
    let seqs = b.groups_of(Sequence);
    seqs.iter().any(|g| {
        let s = g.first().suit();
        [One, Four, Seven]
            .iter()
            .all(|&r| seqs.iter().any(|g2| g2.first().suit() == s && g2.first().rank() == r))
    })
}

fn is_all_terminals(b: &PlayerBoard) -> bool {
    b.composition() == Composition::AllTerminals
}

fn is_all_honors(b: &PlayerBoard) -> bool {
    b.composition() == Composition::AllHonors
}

// 手牌の形は問わない
fn is_all_green(b: &PlayerBoard) -> bool {
    b.hand_tiles().iter().all(|t| t.is_green())
}

fn is_all_simples(b: &PlayerBoard) -> bool {
    b.composition() == Composition::AllSimples
}

fn is_full_outside(b: &PlayerBoard) -> bool {
    b.composition() == Composition::FullOutside
}

fn is_half_outside(b: &PlayerBoard) -> bool {
    b.composition() == Composition::HalfOutside
}

// 鳴きありの場合のみ (門前の場合は四暗刻か三暗刻として扱う)
fn is_all_triplets(b: &PlayerBoard) -> bool {
    !b.closed_hand() && b.tuplets().count() == 4
}

fn is_three_concealed_triplets(b: &PlayerBoard) -> bool {
    b.tuplets().count() >= 3
        && b.groups().iter().filter(|g| g.closed()).count() >= 3
        && b.concealed_tuplet_count() == 3
}

fn is_four_concealed_triplets(b: &PlayerBoard) -> bool {
    b.closed_hand()
        && b.tuplets().count() == 4
        && b.concealed_tuplet_count() == 4
        && b.winning_group().map_or(false, |g| g.tiles().len() > 2)
}

fn is_single_wait_four_concealed_triplets(b: &PlayerBoard) -> bool {
    b.closed_hand()
        && b.tuplets().count() == 4
        && b.concealed_tuplet_count() == 4
        && b.winning_group().map_or(false, |g| g.tiles().len() == 2)
}

fn is_three_kans(b: &PlayerBoard) -> bool {
    b.count_groups(Kan) == 3
}

fn is_four_kans(b: &PlayerBoard) -> bool {
    b.count_groups(Kan) == 4
}

fn is_triple_triplets(b: &PlayerBoard) -> bool {
    let tuplets: Vec<&TileGroup> = b.tuplets().filter(|g| g.first().rank().is_number()).collect();
    tuplets.iter().any(|g| {
        let r = g.first().rank();
        let mut suits: Vec<Suit> = tuplets
            .iter()
            .filter(|g2| g2.first().rank() == r)
            .map(|g2| g2.first().suit())
            .collect();
        suits.sort();
        suits.dedup();
        suits.len() == 3
    })
}

// 一色

fn is_true_nine_gates(b: &PlayerBoard) -> bool {
    matches!(nine_gates_rest(b), Some(rest) if rest.is_empty())
}

fn is_nine_gates(b: &PlayerBoard) -> bool {
    match (nine_gates_rest(b), b.winning()) {
        (Some(rest), Some(w)) => rest.len() == 1 && w.rank().number() == Some(rest[0]),
        _ => false,
    }
}

fn is_full_flush(b: &PlayerBoard) -> bool {
    let suits = suits_in_hand(b);
    suits.len() == 1 && suits[0].is_number() && !is_true_nine_gates(b) && !is_nine_gates(b)
}

fn is_half_flush(b: &PlayerBoard) -> bool {
    let suits = suits_in_hand(b);
    suits.len() == 2 && suits.contains(&Suit::Honor)
}

#[test]
fn test_win_list_order() {
    assert_eq!(WIN_LIST.len(), WIN_KIND_COUNT);
    for (i, d) in WIN_LIST.iter().enumerate() {
        assert_eq!(d.kind as usize, i, "{:?}", d);
        assert!(d.win.open_han.is_some() || d.win.closed_han.is_some());
        if d.win.is_yakuman() {
            assert!(d.win.han(true).map_or(true, |h| h == 0));
        }
    }
    assert_eq!(WinKind::HalfFlush.win().name, "Half Flush");
}

#[test]
fn test_composition() {
    let g = |s: &str, closed: bool| TileGroup::new(tiles_from_string(s).unwrap(), closed);

    let simples = [g("2b3b4b", true), g("5d5d5d", true), g("6n7n8n", true), g("3d4d5d", true), g("8b8b", true)];
    assert_eq!(calc_composition(&simples), Composition::AllSimples);

    let full = [g("1b1b1b", true), g("9d9d9d", true), g("ewewew", true), g("1n1n1n", false), g("9b9b", true)];
    assert_eq!(calc_composition(&full), Composition::FullOutside);

    // 字牌がなくても順子を含めば混全帯么九の扱い
    let pure = [g("1b2b3b", true), g("9d9d9d", true), g("7n8n9n", true), g("1d2d3d", true), g("9b9b", true)];
    assert_eq!(calc_composition(&pure), Composition::HalfOutside);

    let half = [g("1b2b3b", true), g("ewewew", true), g("7n8n9n", true), g("1d2d3d", true), g("9b9b", true)];
    assert_eq!(calc_composition(&half), Composition::HalfOutside);

    let terminals = [g("1b1b1b", true), g("9d9d9d", true), g("1n1n1n", true), g("9n9n9n", true), g("9b9b", true)];
    assert_eq!(calc_composition(&terminals), Composition::AllTerminals);

    let honors = [g("ewewew", true), g("swswsw", true), g("rdrdrd", true), g("gdgdgd", true), g("wdwd", true)];
    assert_eq!(calc_composition(&honors), Composition::AllHonors);

    let mixed = [g("1b2b3b", true), g("4d5d6d", true), g("7n8n9n", true), g("1d2d3d", true), g("9b9b", true)];
    assert_eq!(calc_composition(&mixed), Composition::Mixed);

    assert_eq!(calc_composition(&mixed[..4]), Composition::Irregular);
}

#[test]
fn test_waits() {
    let g = |s: &str| TileGroup::new(tiles_from_string(s).unwrap(), true);
    let t = |s: &str| Tile::from_string(s, false).unwrap();

    assert!(is_two_sided_wait(&g("2b3b4b"), &t("2b")));
    assert!(is_two_sided_wait(&g("2b3b4b"), &t("4b")));
    assert!(!is_two_sided_wait(&g("2b3b4b"), &t("3b")));
    assert!(!is_two_sided_wait(&g("1b2b3b"), &t("3b")));
    assert!(is_two_sided_wait(&g("1b2b3b"), &t("1b")));
    assert!(!is_two_sided_wait(&g("7b8b9b"), &t("7b")));
    assert!(!is_two_sided_wait(&g("7b7b7b"), &t("7b")));

    assert!(is_single_wait(&g("7b7b"), &t("7b")));
    assert!(is_single_wait(&g("1b2b3b"), &t("3b")));
    assert!(is_single_wait(&g("7b8b9b"), &t("7b")));
    assert!(is_single_wait(&g("4b5b6b"), &t("5b")));
    assert!(!is_single_wait(&g("4b5b6b"), &t("6b")));
    assert!(!is_single_wait(&g("6b6b6b"), &t("6b")));
}

#[cfg(test)]
use super::board::{board_from, win_names};

#[test]
fn test_honor_triplets() {
    // 小三元は雀頭を問わず三元牌の刻子2つ
    let b = board_from("gdgdgdrdrdrd2b3b4b5d6d7d9n", &[], "9n");
    assert!(b.is_valid(), "{}", b.dump());
    assert_eq!(
        win_names(&b),
        ["Green Dragon Yakuhai", "Red Dragon Yakuhai", "Little Three Dragons"]
    );

    let b = board_from("gdgdgdrdrdrdwdwdwd2b3b4b5d", &[], "5d");
    assert!(b.has_win(WinKind::BigThreeDragons));
    assert!(!b.has_win(WinKind::LittleThreeDragons));
    assert_eq!(b.base_win_amount(), 8000);

    // 小四喜は風牌の刻子3つ
    let b = board_from("ewewewswswswwwwwww2b3b4b5d", &[], "5d");
    assert!(b.is_valid(), "{}", b.dump());
    assert!(b.has_win(WinKind::LittleFourWinds));
    assert!(!b.has_win(WinKind::BigFourWinds));
    assert_eq!(b.base_win_amount(), 8000);

    // ダブル役満があれば他の役満と合算しない
    let b = board_from("ewewewswswswwwwwwwrd", &["nwnwnw"], "rd");
    assert!(b.is_valid(), "{}", b.dump());
    assert!(b.has_win(WinKind::BigFourWinds) && b.has_win(WinKind::AllHonors));
    assert!(win_names(&b).contains(&"All Triplets"));
    let s = b.score();
    assert_eq!((s.han, s.base), (0, 16000));
    assert_eq!(s.title, "Double Yakuman");
}

#[test]
fn test_outside_hands() {
    // 老頭牌と字牌のみ
    let b = board_from("1b1b1b9d9d9dewewew9b", &["1n1n1n"], "9b");
    assert!(b.is_valid(), "{}", b.dump());
    assert!(win_names(&b).contains(&"Full Outside Hand"));
    assert!(!b.has_win(WinKind::HalfOutsideHand));
    assert_eq!(WinKind::FullOutsideHand.win().han(false), Some(3));

    let b = board_from("1b2b3b9d9d9d7n8n9n1d2d3d9b", &[], "9b");
    assert!(b.is_valid(), "{}", b.dump());
    assert!(b.has_win(WinKind::HalfOutsideHand));
    assert!(!b.has_win(WinKind::FullOutsideHand));

    let b = board_from("1b1b1b9d9d9d1n1n1n9n9n9n1d", &[], "1d");
    assert!(b.has_win(WinKind::AllTerminals));
    assert!(!b.has_win(WinKind::FullOutsideHand));
}

#[test]
fn test_concealed_triplets() {
    // 刻子で和了 (ツモ)
    let mut b = board_from("1b1b1b2d2d2d3n3n3n4b4b5d5d", &[], "4b");
    b.set_tsumo(true);
    assert!(b.is_valid(), "{}", b.dump());
    assert!(b.has_win(WinKind::FourConcealedTriplets));
    assert!(!b.has_win(WinKind::SingleWaitFourConcealedTriplets));
    assert_eq!(b.base_win_amount(), 8000);

    // ロンで完成した刻子は暗刻に数えない
    b.set_ron(true);
    assert!(b.is_valid(), "{}", b.dump());
    assert!(!b.has_win(WinKind::FourConcealedTriplets));
    assert!(b.has_win(WinKind::ThreeConcealedTriplets));

    // 単騎待ち
    let b = board_from("1b1b1b2d2d2d3n3n3n4b4b4b5d", &[], "5d");
    assert!(b.is_valid(), "{}", b.dump());
    assert_eq!(win_names(&b), ["Single Wait Four Concealed Triplets"]);
    assert_eq!(b.base_win_amount(), 16000);
}

#[test]
fn test_suit_patterns() {
    let b = board_from("1b2b3b1d2d3d1n2n3n5b5b5b9d", &[], "9d");
    assert!(b.is_valid(), "{}", b.dump());
    assert_eq!(win_names(&b), ["Mixed Triple Sequence"]);

    let b = board_from("3b3b3b3d3d3d3n3n3n6b7b8b9d", &[], "9d");
    assert!(b.is_valid(), "{}", b.dump());
    assert_eq!(win_names(&b), ["Three Concealed Triplets", "Triple Triplets"]);

    let b = board_from("1b2b3b4b5b6bewewew7b8b9bsw", &[], "sw");
    assert!(b.is_valid(), "{}", b.dump());
    assert!(b.has_win(WinKind::HalfFlush) && b.has_win(WinKind::PureStraight));
    assert!(!b.has_win(WinKind::FullFlush));

    let b = board_from("2b3b4b2b3b4b6b6b6bgdgdgd8b", &[], "8b");
    assert!(b.is_valid(), "{}", b.dump());
    assert!(b.has_win(WinKind::AllGreen));
    assert_eq!(b.base_win_amount(), 8000);

    // 七対子の形でも緑一色
    let b = board_from("2b2b2b2b3b3b4b4b6b6b8b8bgd", &[], "gd");
    assert!(b.is_valid(), "{}", b.dump());
    assert!(b.has_win(WinKind::SevenPairs) && b.has_win(WinKind::AllGreen));
}

#[test]
fn test_nine_gates() {
    for n in 1..=9 {
        let w = format!("{}b", n);
        let b = board_from("1b1b1b2b3b4b5b6b7b8b9b9b9b", &[], &w);
        assert!(b.is_valid(), "{}", b.dump());
        assert!(b.has_win(WinKind::TrueNineGates), "{}", b.dump());
        assert!(!b.has_win(WinKind::NineGates) && !b.has_win(WinKind::FullFlush));
        assert_eq!(b.base_win_amount(), 16000);
    }

    let b = board_from("1b1b1b2b3b4b5b5b6b7b8b9b9b", &[], "9b");
    assert!(b.is_valid(), "{}", b.dump());
    assert!(b.has_win(WinKind::NineGates));
    assert!(!b.has_win(WinKind::TrueNineGates) && !b.has_win(WinKind::FullFlush));
    assert_eq!(b.base_win_amount(), 8000);

    // 九蓮宝燈の形でなければ清一色
    let b = board_from("2b3b4b5b6b7b8b9b2b3b4b5b5b", &[], "1b");
    assert!(b.has_win(WinKind::FullFlush));
    assert!(!b.has_win(WinKind::NineGates) && !b.has_win(WinKind::TrueNineGates));
}

#[test]
fn test_kans() {
    let b = board_from("5n6n7n9d", &["1b1b1b1b", "2d2d2d2d", "ewbbbbew"], "9d");
    assert!(b.is_valid(), "{}", b.dump());
    assert!(!b.closed_hand());
    assert!(b.has_win(WinKind::ThreeKans) && !b.has_win(WinKind::FourKans));

    let b = board_from("9d", &["1b1b1b1b", "2d2d2d2d", "3n3n3n3n", "ewbbbbew"], "9d");
    assert!(b.is_valid(), "{}", b.dump());
    assert!(b.has_win(WinKind::FourKans) && !b.has_win(WinKind::ThreeKans));
    assert_eq!(b.base_win_amount(), 8000);
}

#[test]
fn test_situational_wins() {
    let mut b = board_from("2b3b4d5d6d7n8n9n2d3d4d5b5b", &[], "4b");
    b.set_riichi(true);
    b.set_ippatsu(true);
    assert_eq!(win_names(&b), ["Riichi", "Ippatsu", "Pinfu"]);

    b.set_ippatsu(false);
    b.set_double_riichi(true);
    assert_eq!(win_names(&b), ["Double Riichi", "Pinfu"]);

    b.set_riichi(false);
    b.set_double_riichi(false);
    b.set_last_draw(true);
    assert_eq!(win_names(&b), ["Under The River", "Pinfu"]);
    b.set_tsumo(true);
    assert_eq!(win_names(&b), ["Menzenchin Tsumo", "Under The Sea", "Pinfu"]);

    // 嶺上開花と槍槓は槓子が必要
    let mut b = board_from("2b3b4d5d6d7n8n9n5b5b", &["ewbbbbew"], "4b");
    b.set_kan_win(true);
    assert!(b.is_valid(), "{}", b.dump());
    assert!(b.has_win(WinKind::RobbingAKan) && !b.has_win(WinKind::RinshanKaihou));
    b.set_tsumo(true);
    assert!(b.has_win(WinKind::RinshanKaihou) && !b.has_win(WinKind::RobbingAKan));
    assert!(win_names(&b).contains(&"Menzenchin Tsumo"));
}

#[test]
fn test_concealed_kan_red_five() {
    // 裏向きの1枚が赤5として確定する
    let mut b = board_from("2d3d4d5n6n7n7b8b9b1d", &["5bbbbb5b"], "1d");
    b.set_riichi(true);
    assert!(b.is_valid(), "{}", b.dump());
    assert_eq!(win_names(&b), ["Riichi", "Red Five"]);

    b.set_discards(tiles_from_string("$b").unwrap());
    let e = b.validate_board().unwrap_err();
    assert!(e.message().contains("5 copies of the Five of Bamboo"), "{}", e);

    // 表向きの赤5がある場合は確定しない
    let mut b = board_from("2d3d4d5n6n7n7b8b9b1d", &["$bbbbb5b"], "1d");
    b.set_riichi(true);
    assert!(b.is_valid(), "{}", b.dump());
    assert_eq!(win_names(&b), ["Riichi", "Red Five"]);

    b.set_visible(vec![tiles_from_string("$bbbbb$b").unwrap()]);
    let e = b.validate_hand().unwrap_err();
    assert!(e.message().starts_with("There are too many red fives"), "{}", e);
}
