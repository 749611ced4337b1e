use std::cell::{Cell, OnceCell};
use std::fmt::Write;

use crate::model::*;
use crate::util::misc::vec_to_string;

use super::group::create_closed_groups;
use super::point::{calc_score, Score};
use super::yaku::*;

use crate::debug;

// 外部から設定する入力項目のビット集合
// キャッシュの依存関係はこの集合で表現し, 入力の変更時に該当するキャッシュのみを破棄する
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inputs(u16);

impl Inputs {
    pub const NONE: Inputs = Inputs(0);
    pub const HIDDEN: Inputs = Inputs(1 << 0);
    pub const VISIBLE: Inputs = Inputs(1 << 1);
    pub const WINNING: Inputs = Inputs(1 << 2);
    pub const DORAS: Inputs = Inputs(1 << 3);
    pub const DISCARDS: Inputs = Inputs(1 << 4);
    pub const SEAT_WIND: Inputs = Inputs(1 << 5);
    pub const PREVALENT_WIND: Inputs = Inputs(1 << 6);
    pub const TSUMO: Inputs = Inputs(1 << 7);
    pub const RIICHI: Inputs = Inputs(1 << 8);
    pub const DOUBLE_RIICHI: Inputs = Inputs(1 << 9);
    pub const IPPATSU: Inputs = Inputs(1 << 10);
    pub const KAN_WIN: Inputs = Inputs(1 << 11);
    pub const LAST_DRAW: Inputs = Inputs(1 << 12);
    pub const ALL: Inputs = Inputs((1 << 13) - 1);

    // 手牌の分解に影響する入力
    pub const HAND: Inputs = Self::HIDDEN.union(Self::VISIBLE).union(Self::WINNING);
    // 場に見えている全ての牌に影響する入力
    pub const IN_PLAY: Inputs = Self::HAND.union(Self::DORAS).union(Self::DISCARDS);

    #[inline]
    pub const fn union(self, other: Inputs) -> Inputs {
        Inputs(self.0 | other.0)
    }

    #[inline]
    pub const fn difference(self, other: Inputs) -> Inputs {
        Inputs(self.0 & !other.0)
    }

    #[inline]
    pub const fn intersects(self, other: Inputs) -> bool {
        self.0 & other.0 != 0
    }
}

// 役一覧と点数は捨て牌以外の全ての入力に依存
const WINS_DEPS: Inputs = Inputs::ALL.difference(Inputs::DISCARDS);

// 盤面の検証項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Check {
    HandSize,
    ScoreParameters,
    FlippedTiles,
    Board,
    Groups,
}

const CHECKS: [Check; 5] = [
    Check::HandSize,
    Check::ScoreParameters,
    Check::FlippedTiles,
    Check::Board,
    Check::Groups,
];

impl Check {
    fn depends_on(self) -> Inputs {
        match self {
            Check::HandSize | Check::Groups => Inputs::HAND,
            Check::ScoreParameters => Inputs::HAND
                .union(Inputs::RIICHI)
                .union(Inputs::DOUBLE_RIICHI)
                .union(Inputs::IPPATSU)
                .union(Inputs::SEAT_WIND)
                .union(Inputs::PREVALENT_WIND)
                .union(Inputs::KAN_WIN),
            Check::FlippedTiles | Check::Board => Inputs::IN_PLAY,
        }
    }
}

// 入力から導出される値のキャッシュ
#[derive(Debug, Clone)]
struct Cache {
    groups: OnceCell<Vec<TileGroup>>,        // HAND
    hand_tiles: OnceCell<Vec<Tile>>,         // HAND
    winning_group: OnceCell<Option<usize>>,  // HAND
    pure_double_count: OnceCell<usize>,      // HAND
    composition: OnceCell<Composition>,      // HAND
    tiles_in_play: OnceCell<Vec<Tile>>,      // IN_PLAY
    checks: [OnceCell<Result<(), EvalError>>; 5],
    win_flags: [Cell<Option<bool>>; WIN_KIND_COUNT],
    wins: OnceCell<Vec<&'static Win>>,       // WINS_DEPS
    score: OnceCell<Score>,                  // WINS_DEPS
    hand_error: OnceCell<Option<EvalError>>, // ALL
}

impl Cache {
    fn new() -> Self {
        Self {
            groups: OnceCell::new(),
            hand_tiles: OnceCell::new(),
            winning_group: OnceCell::new(),
            pure_double_count: OnceCell::new(),
            composition: OnceCell::new(),
            tiles_in_play: OnceCell::new(),
            checks: Default::default(),
            win_flags: std::array::from_fn(|_| Cell::new(None)),
            wins: OnceCell::new(),
            score: OnceCell::new(),
            hand_error: OnceCell::new(),
        }
    }

    fn invalidate(&mut self, changed: Inputs) {
        if changed.intersects(Inputs::HAND) {
            self.groups.take();
            self.hand_tiles.take();
            self.winning_group.take();
            self.pure_double_count.take();
            self.composition.take();
        }
        if changed.intersects(Inputs::IN_PLAY) {
            self.tiles_in_play.take();
        }
        for c in CHECKS {
            if changed.intersects(c.depends_on()) {
                self.checks[c as usize].take();
            }
        }
        for d in WIN_LIST {
            if changed.intersects(d.depends_on) {
                self.win_flags[d.kind as usize].set(None);
            }
        }
        if changed.intersects(WINS_DEPS) {
            self.wins.take();
            self.score.take();
        }
        if changed.intersects(Inputs::ALL) {
            self.hand_error.take();
        }
    }
}

// 和了したプレイヤーの盤面
// 入力はsetterで設定し, 導出値は初回の参照時に計算してキャッシュする
#[derive(Debug, Clone)]
pub struct PlayerBoard {
    hidden: Vec<Tile>,          // 手牌 (和了牌, 副露, 暗槓を含まない)
    visible: Vec<Vec<Tile>>,    // 副露と暗槓
    visible_groups: Vec<TileGroup>,
    winning: Option<Tile>,      // 和了牌
    doras: Vec<Tile>,           // ドラ表示牌
    discards: Vec<Tile>,        // 評価するプレイヤーの捨て牌
    seat_wind: Rank,            // 自風
    prevalent_wind: Rank,       // 場風
    tsumo: bool,                // ツモ和了 (falseの場合はロン)
    riichi: bool,
    double_riichi: bool,
    ippatsu: bool,
    kan_win: bool,              // 嶺上開花または槍槓
    last_draw: bool,            // 海底または河底
    cache: Cache,
}

impl Default for PlayerBoard {
    fn default() -> Self {
        Self::new()
    }
}

fn update<T: PartialEq>(field: &mut T, value: T) -> bool {
    if *field == value {
        return false;
    }
    *field = value;
    true
}

impl PlayerBoard {
    pub fn new() -> Self {
        Self {
            hidden: vec![],
            visible: vec![],
            visible_groups: vec![],
            winning: None,
            doras: vec![],
            discards: vec![],
            seat_wind: Rank::EastWind,
            prevalent_wind: Rank::EastWind,
            tsumo: false,
            riichi: false,
            double_riichi: false,
            ippatsu: false,
            kan_win: false,
            last_draw: false,
            cache: Cache::new(),
        }
    }

    // 動作確認用の盤面 (東の暗槓と白の雀頭, 1-2-3索の辺張待ち)
    pub fn with_sample_hand() -> Result<Self, EvalError> {
        let mut b = Self::new();
        b.set_hidden(tiles_from_string("1b2bwdwd")?);
        b.set_visible(vec![
            tiles_from_string("ewbbbbew")?,
            tiles_from_string("5d6d7d")?,
            tiles_from_string("7b8b9b")?,
        ]);
        b.set_winning(Some("3b".parse()?));
        b.set_doras(tiles_from_string("rd")?);
        b.set_discards(tiles_from_string(
            "4brd6n1nwwnw6b8n2d3dgdgd3bnwsw1d",
        )?);
        Ok(b)
    }

    fn invalidate(&mut self, changed: Inputs) {
        self.cache.invalidate(changed);
    }

    // [入力]

    pub fn set_hidden(&mut self, tiles: Vec<Tile>) {
        if update(&mut self.hidden, tiles) {
            self.invalidate(Inputs::HIDDEN);
        }
    }

    // 副露は鳴いた面子として扱う (裏向き2枚を含む4枚は暗槓)
    pub fn set_visible(&mut self, groups: Vec<Vec<Tile>>) {
        if update(&mut self.visible, groups) {
            self.visible_groups = self
                .visible
                .iter()
                .map(|g| TileGroup::new(g.clone(), false))
                .collect();
            self.invalidate(Inputs::VISIBLE);
        }
    }

    pub fn set_winning(&mut self, tile: Option<Tile>) {
        if update(&mut self.winning, tile) {
            self.invalidate(Inputs::WINNING);
        }
    }

    pub fn set_doras(&mut self, tiles: Vec<Tile>) {
        if update(&mut self.doras, tiles) {
            self.invalidate(Inputs::DORAS);
        }
    }

    pub fn set_discards(&mut self, tiles: Vec<Tile>) {
        if update(&mut self.discards, tiles) {
            self.invalidate(Inputs::DISCARDS);
        }
    }

    pub fn set_seat_wind(&mut self, wind: Rank) {
        if update(&mut self.seat_wind, wind) {
            self.invalidate(Inputs::SEAT_WIND);
        }
    }

    pub fn set_prevalent_wind(&mut self, wind: Rank) {
        if update(&mut self.prevalent_wind, wind) {
            self.invalidate(Inputs::PREVALENT_WIND);
        }
    }

    pub fn set_tsumo(&mut self, tsumo: bool) {
        if update(&mut self.tsumo, tsumo) {
            self.invalidate(Inputs::TSUMO);
        }
    }

    #[inline]
    pub fn set_ron(&mut self, ron: bool) {
        self.set_tsumo(!ron);
    }

    pub fn set_riichi(&mut self, riichi: bool) {
        if update(&mut self.riichi, riichi) {
            self.invalidate(Inputs::RIICHI);
        }
    }

    pub fn set_double_riichi(&mut self, double_riichi: bool) {
        if update(&mut self.double_riichi, double_riichi) {
            self.invalidate(Inputs::DOUBLE_RIICHI);
        }
    }

    pub fn set_ippatsu(&mut self, ippatsu: bool) {
        if update(&mut self.ippatsu, ippatsu) {
            self.invalidate(Inputs::IPPATSU);
        }
    }

    pub fn set_kan_win(&mut self, kan_win: bool) {
        if update(&mut self.kan_win, kan_win) {
            self.invalidate(Inputs::KAN_WIN);
        }
    }

    pub fn set_last_draw(&mut self, last_draw: bool) {
        if update(&mut self.last_draw, last_draw) {
            self.invalidate(Inputs::LAST_DRAW);
        }
    }

    pub fn set_all(
        &mut self,
        hidden: Vec<Tile>,
        visible: Vec<Vec<Tile>>,
        winning: Option<Tile>,
        doras: Vec<Tile>,
        discards: Vec<Tile>,
        seat_wind: Rank,
        prevalent_wind: Rank,
        flags: BoardFlags,
    ) {
        self.set_hidden(hidden);
        self.set_visible(visible);
        self.set_winning(winning);
        self.set_doras(doras);
        self.set_discards(discards);
        self.set_seat_wind(seat_wind);
        self.set_prevalent_wind(prevalent_wind);
        self.set_tsumo(flags.tsumo);
        self.set_riichi(flags.riichi);
        self.set_double_riichi(flags.double_riichi);
        self.set_ippatsu(flags.ippatsu);
        self.set_kan_win(flags.kan_win);
        self.set_last_draw(flags.last_draw);
    }

    #[inline]
    pub fn hidden(&self) -> &[Tile] {
        &self.hidden
    }

    #[inline]
    pub fn visible(&self) -> &[Vec<Tile>] {
        &self.visible
    }

    #[inline]
    pub fn winning(&self) -> Option<Tile> {
        self.winning
    }

    #[inline]
    pub fn doras(&self) -> &[Tile] {
        &self.doras
    }

    #[inline]
    pub fn discards(&self) -> &[Tile] {
        &self.discards
    }

    #[inline]
    pub fn seat_wind(&self) -> Rank {
        self.seat_wind
    }

    #[inline]
    pub fn prevalent_wind(&self) -> Rank {
        self.prevalent_wind
    }

    #[inline]
    pub fn tsumo(&self) -> bool {
        self.tsumo
    }

    #[inline]
    pub fn riichi(&self) -> bool {
        self.riichi
    }

    #[inline]
    pub fn double_riichi(&self) -> bool {
        self.double_riichi
    }

    #[inline]
    pub fn ippatsu(&self) -> bool {
        self.ippatsu
    }

    #[inline]
    pub fn kan_win(&self) -> bool {
        self.kan_win
    }

    #[inline]
    pub fn last_draw(&self) -> bool {
        self.last_draw
    }

    #[inline]
    pub fn is_dealer(&self) -> bool {
        self.seat_wind == self.prevalent_wind
    }

    // [導出値]

    // 手牌(和了牌を含む)を分解した組と副露の組
    pub fn groups(&self) -> &[TileGroup] {
        self.cache.groups.get_or_init(|| {
            let mut tiles = self.hidden.clone();
            tiles.extend(self.winning);
            let mut groups = create_closed_groups(tiles);
            groups.extend(self.visible_groups.iter().cloned());
            debug!("groups: {}", vec_to_string(&groups));
            groups
        })
    }

    // 手牌から分解した組 (副露を除く)
    fn closed_part(&self) -> &[TileGroup] {
        let groups = self.groups();
        &groups[..groups.len() - self.visible_groups.len()]
    }

    pub fn hand_tiles(&self) -> &[Tile] {
        self.cache
            .hand_tiles
            .get_or_init(|| self.groups().iter().flat_map(|g| g.tiles()).copied().collect())
    }

    // 手牌, ドラ表示牌, 捨て牌
    pub fn tiles_in_play(&self) -> &[Tile] {
        self.cache.tiles_in_play.get_or_init(|| {
            let mut tiles = self.hand_tiles().to_vec();
            tiles.extend(&self.doras);
            tiles.extend(&self.discards);
            tiles
        })
    }

    // 鳴いた組がない
    pub fn closed_hand(&self) -> bool {
        self.groups().iter().all(|g| g.closed())
    }

    pub fn groups_of(&self, tp: TileGroupType) -> Vec<&TileGroup> {
        self.groups().iter().filter(|g| g.group_type() == tp).collect()
    }

    pub fn count_groups(&self, tp: TileGroupType) -> usize {
        self.groups().iter().filter(|g| g.group_type() == tp).count()
    }

    pub fn pair_group(&self) -> Option<&TileGroup> {
        self.groups()
            .iter()
            .find(|g| g.group_type() == TileGroupType::Pair)
    }

    // 刻子と槓子
    pub fn tuplets(&self) -> impl Iterator<Item = &TileGroup> {
        self.groups().iter().filter(|g| g.is_tuplet())
    }

    // 和了牌を含む組 (両面待ちの順子を優先)
    pub fn winning_group(&self) -> Option<&TileGroup> {
        let i = self.cache.winning_group.get_or_init(|| {
            let w = self.winning?;
            let part = self.closed_part();
            let candidates: Vec<usize> = (0..part.len())
                .filter(|&i| part[i].closed() && part[i].contains(&w))
                .collect();
            candidates
                .iter()
                .copied()
                .find(|&i| is_two_sided_wait(&part[i], &w))
                .or_else(|| candidates.first().copied())
        });
        i.map(|i| &self.groups()[i])
    }

    // 暗刻と暗槓 (ロン和了の場合は和了牌を含む組を除く)
    pub fn concealed_tuplet_count(&self) -> usize {
        let wg = if self.tsumo {
            None
        } else {
            self.winning_group()
        };
        self.tuplets()
            .filter(|g| g.closed())
            .filter(|g| !wg.map_or(false, |w| std::ptr::eq(*g, w)))
            .count()
    }

    // 同じ順子の組の数 (一盃口: 1, 二盃口: 2)
    pub fn pure_double_count(&self) -> usize {
        *self.cache.pure_double_count.get_or_init(|| {
            let seqs = self.groups_of(TileGroupType::Sequence);
            let mut n = 0;
            for i in 0..seqs.len() {
                for j in i + 1..seqs.len() {
                    if seqs[i].first().soft_equals(&seqs[j].first()) {
                        n += 1;
                    }
                }
            }
            n
        })
    }

    pub fn composition(&self) -> Composition {
        *self
            .cache
            .composition
            .get_or_init(|| calc_composition(self.groups()))
    }

    pub fn has_win(&self, kind: WinKind) -> bool {
        let cell = &self.cache.win_flags[kind as usize];
        if let Some(v) = cell.get() {
            return v;
        }
        let v = (kind.define().func)(self);
        cell.set(Some(v));
        v
    }

    pub fn wins(&self) -> &[&'static Win] {
        self.cache.wins.get_or_init(|| calc_wins(self))
    }

    pub fn score(&self) -> &Score {
        self.cache.score.get_or_init(|| calc_score(self))
    }

    #[inline]
    pub fn base_win_amount(&self) -> usize {
        self.score().base
    }

    #[inline]
    pub fn win_title(&self) -> &str {
        &self.score().title
    }

    #[inline]
    pub fn pay_order(&self) -> &str {
        &self.score().pay_order
    }

    // [検証]

    fn check(&self, c: Check, f: fn(&Self) -> Result<(), EvalError>) -> Result<(), EvalError> {
        self.cache.checks[c as usize].get_or_init(|| f(self)).clone()
    }

    pub fn validate_hand_size(&self) -> Result<(), EvalError> {
        self.check(Check::HandSize, Self::check_hand_size)
    }

    pub fn validate_score_parameters(&self) -> Result<(), EvalError> {
        self.check(Check::ScoreParameters, Self::check_score_parameters)
    }

    pub fn validate_flipped_tiles(&self) -> Result<(), EvalError> {
        self.check(Check::FlippedTiles, Self::check_flipped_tiles)
    }

    pub fn validate_board(&self) -> Result<(), EvalError> {
        self.check(Check::Board, Self::check_board)
    }

    pub fn validate_groups(&self) -> Result<(), EvalError> {
        self.check(Check::Groups, Self::check_groups)
    }

    fn check_hand_size(&self) -> Result<(), EvalError> {
        let total = self.hand_tiles().len();
        let kans = self.count_groups(TileGroupType::Kan);
        let count = total - kans;
        if count == 14 {
            return Ok(());
        }

        let n_hidden = self.hidden.len();
        let detail = format!(
            "{} total, with {} closed tiles, {} open tiles.\nHand size should be {} tiles given there {} {} kan group{}.",
            total,
            n_hidden,
            total.saturating_sub(n_hidden),
            14 + kans,
            if kans == 1 { "is" } else { "are" },
            kans,
            if kans == 1 { "" } else { "s" },
        );
        let msg = if count > 14 {
            format!("The hand has {} too many tiles: {}", count - 14, detail)
        } else {
            format!("The hand has {} too few tiles: {}", 14 - count, detail)
        };
        Err(EvalError::Hand(msg))
    }

    fn check_score_parameters(&self) -> Result<(), EvalError> {
        let err = |msg: &str| Err(EvalError::ScoreArgument(msg.to_string()));
        if !self.closed_hand() && self.riichi {
            return err("Cannot riichi on a non-closed hand");
        }
        if self.double_riichi && !self.riichi {
            return err("Cannot have double riichi without riichi");
        }
        if self.ippatsu && !self.riichi {
            return err("Cannot have ippatsu without riichi");
        }
        if !self.prevalent_wind.is_wind() {
            return err("Prevalent wind is not a wind tile");
        }
        if !self.seat_wind.is_wind() {
            return err("Seat wind is not a wind tile");
        }
        if self.kan_win && self.count_groups(TileGroupType::Kan) == 0 {
            return err("Cannot have kan win without a kan");
        }
        Ok(())
    }

    fn check_flipped_tiles(&self) -> Result<(), EvalError> {
        if self.tiles_in_play().iter().any(|t| t.is_face_down()) {
            return Err(EvalError::Hand(
                "Board cannot consist of unknown tile backs! Tile backs are reserved for closed kans with both ends face-up".to_string(),
            ));
        }
        Ok(())
    }

    fn check_board(&self) -> Result<(), EvalError> {
        let tiles = self.tiles_in_play();
        for t in tiles {
            let n = tiles.iter().filter(|t2| t2.soft_equals(t)).count();
            if n >= 5 {
                return Err(EvalError::Hand(format!(
                    "There are {} copies of the {} tiles showing in the dora indicators / hand / discards!",
                    n,
                    t.long_name()
                )));
            }
        }

        let red_fives: Vec<Tile> = tiles.iter().filter(|t| t.is_red()).copied().collect();
        if Tile::double_red_fives(&red_fives) {
            return Err(EvalError::Hand(format!(
                "There are too many red fives or multiple red fives of the same suit! List of Red Fives: {}",
                vec_to_string(&red_fives)
            )));
        }
        Ok(())
    }

    fn check_groups(&self) -> Result<(), EvalError> {
        match self.groups().iter().find(|g| g.is_error()) {
            Some(g) => Err(EvalError::Hand(format!(
                "Invalid Tile Group: {}",
                g.error_message().unwrap_or_default()
            ))),
            None => Ok(()),
        }
    }

    fn check_hand(&self) -> Result<(), EvalError> {
        self.validate_hand_size()?;
        self.validate_score_parameters()?;
        self.validate_flipped_tiles()?;
        self.validate_board()?;
        self.validate_groups()?;

        if self.wins().is_empty() {
            return Err(EvalError::Hand(
                "No wins! Hand is valid, but cannot be a winning hand".to_string(),
            ));
        }
        if self.pure_double_count() > 2 {
            return Err(EvalError::ScoreArgument(
                "There are more than two pure double sequences in the hand! Three identical triplets were grouped as runs instead of triplets".to_string(),
            ));
        }
        Ok(())
    }

    // 最初に見つかった不正の内容 (正常な和了形であればNone)
    pub fn hand_error(&self) -> Option<&EvalError> {
        self.cache
            .hand_error
            .get_or_init(|| self.check_hand().err())
            .as_ref()
    }

    pub fn validate_hand(&self) -> Result<(), EvalError> {
        match self.hand_error() {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.hand_error().is_none()
    }

    pub fn dump(&self) -> String {
        let visible: Vec<String> = self.visible.iter().map(|g| tiles_to_string(g)).collect();
        let wins: Vec<&str> = self.wins().iter().map(|w| w.name).collect();
        let mut s = String::new();
        let _ = writeln!(s, "{{");
        let _ = writeln!(s, "    hidden: {},", tiles_to_string(&self.hidden));
        let _ = writeln!(s, "    visible: {},", vec_to_string(&visible));
        let _ = writeln!(
            s,
            "    winning: {},",
            self.winning.map_or("-".to_string(), |t| t.to_string())
        );
        let _ = writeln!(s, "    doras: {},", tiles_to_string(&self.doras));
        let _ = writeln!(s, "    discards: {},", tiles_to_string(&self.discards));
        let _ = writeln!(s, "    seat_wind: {},", self.seat_wind);
        let _ = writeln!(s, "    prevalent_wind: {},", self.prevalent_wind);
        let _ = writeln!(s, "    tsumo: {},", self.tsumo);
        let _ = writeln!(s, "    riichi: {},", self.riichi);
        let _ = writeln!(s, "    double_riichi: {},", self.double_riichi);
        let _ = writeln!(s, "    ippatsu: {},", self.ippatsu);
        let _ = writeln!(s, "    kan_win: {},", self.kan_win);
        let _ = writeln!(s, "    last_draw: {},", self.last_draw);
        let _ = writeln!(s, "    wins: {},", vec_to_string(&wins));
        let _ = writeln!(s, "    groups: {},", vec_to_string(self.groups()));
        let _ = writeln!(s, "    pure_double_count: {},", self.pure_double_count());
        let _ = writeln!(
            s,
            "    hand_error: {},",
            self.hand_error().map_or("-".to_string(), |e| e.to_string())
        );
        let _ = write!(s, "}}");
        s
    }
}

// set_allで設定する状況フラグ
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BoardFlags {
    pub tsumo: bool,
    pub riichi: bool,
    pub double_riichi: bool,
    pub ippatsu: bool,
    pub kan_win: bool,
    pub last_draw: bool,
}

#[cfg(test)]
pub(super) fn board_from(hidden: &str, visible: &[&str], winning: &str) -> PlayerBoard {
    let mut b = PlayerBoard::new();
    b.set_hidden(tiles_from_string(hidden).unwrap());
    b.set_visible(
        visible
            .iter()
            .map(|s| tiles_from_string(s).unwrap())
            .collect(),
    );
    b.set_winning(Some(winning.parse().unwrap()));
    b
}

#[cfg(test)]
pub(super) fn win_names(b: &PlayerBoard) -> Vec<&'static str> {
    b.wins().iter().map(|w| w.name).collect()
}

#[test]
fn test_sample_hand() {
    let b = PlayerBoard::with_sample_hand().unwrap();
    assert_eq!(b.validate_hand(), Ok(()), "{}", b.dump());
    assert!(!b.closed_hand());
    assert_eq!(b.groups().len(), 5);
    assert_eq!(b.count_groups(TileGroupType::Kan), 1);
    assert_eq!(
        win_names(&b),
        ["Prevalent Wind", "Seat Wind", "Dora Indicator", "Dora Indicator"]
    );
    assert_eq!(b.base_win_amount(), 2000);
    assert!(b.win_title().starts_with("Mangan!: "));
}

#[test]
fn test_cache_invalidation() {
    // 平和 (2-3索の両面待ち)
    let mut b = board_from("2b3b4d5d6d7n8n9n2d3d4d5b5b", &[], "4b");
    assert!(b.is_valid(), "{}", b.dump());
    assert!(!b.has_win(WinKind::Riichi));
    assert!(b.has_win(WinKind::Pinfu));
    assert!(b.cache.groups.get().is_some());

    // リーチの変更では手牌の分解は破棄されない
    b.set_riichi(true);
    assert!(b.cache.groups.get().is_some());
    assert!(b.cache.win_flags[WinKind::Riichi as usize].get().is_none());
    assert!(b.cache.win_flags[WinKind::Pinfu as usize].get().is_some());
    assert!(b.cache.checks[Check::ScoreParameters as usize].get().is_none());
    assert!(b.cache.checks[Check::HandSize as usize].get().is_some());
    assert!(b.cache.wins.get().is_none());
    assert!(b.has_win(WinKind::Riichi));
    assert_eq!(win_names(&b), ["Riichi", "Pinfu"]);

    // 捨て牌の変更は役一覧に影響しない
    b.set_discards(tiles_from_string("ewsw").unwrap());
    assert!(b.cache.wins.get().is_some());
    assert!(b.cache.tiles_in_play.get().is_none());

    // 同じ値の設定では何も破棄しない
    b.validate_hand().unwrap();
    b.set_riichi(true);
    assert!(b.cache.hand_error.get().is_some());

    b.set_hidden(tiles_from_string("2b3b4d5d6d7n8n9n2d3d4d5b").unwrap());
    assert!(b.cache.groups.get().is_none());
    assert!(b.cache.win_flags[WinKind::Pinfu as usize].get().is_none());
    assert!(!b.is_valid());
}

#[test]
fn test_validation_order() {
    // 枚数不足 (暗槓1つ)
    let b = board_from("1b2b3b4d5d6d7n8n9n", &["ewbbbbew"], "5b");
    let e = b.validate_hand().unwrap_err();
    assert!(matches!(e, EvalError::Hand(_)));
    assert!(e.message().contains("1 too few"), "{}", e);
    assert!(b.validate_hand_size().is_err());

    let b = board_from("1b2b3b4d5d6d7n8n9n2d3d4d5b5b", &[], "5b");
    assert!(b.validate_hand().unwrap_err().message().contains("1 too many"));

    // 鳴いてリーチ
    let mut b = board_from("1b2b3b4d5d6d7n8n9n5b", &["2d3d4d"], "5b");
    b.set_riichi(true);
    assert!(matches!(b.validate_hand(), Err(EvalError::ScoreArgument(_))));

    let mut b = board_from("2b3b4d5d6d7n8n9n2d3d4d5b5b", &[], "4b");
    b.set_ippatsu(true);
    assert_eq!(
        b.validate_hand().unwrap_err().message(),
        "Cannot have ippatsu without riichi"
    );
    b.set_ippatsu(false);
    b.set_seat_wind(Rank::RedDragon);
    assert!(matches!(b.validate_hand(), Err(EvalError::ScoreArgument(_))));
    b.set_seat_wind(Rank::SouthWind);
    b.set_kan_win(true);
    assert!(matches!(b.validate_hand(), Err(EvalError::ScoreArgument(_))));
    b.set_kan_win(false);
    assert!(b.is_valid(), "{}", b.dump());

    // 5枚目の牌
    b.set_doras(tiles_from_string("5b5b").unwrap());
    b.set_discards(tiles_from_string("5b").unwrap());
    let e = b.validate_hand().unwrap_err();
    assert!(e.message().contains("5 copies of the Five of Bamboo"), "{}", e);

    // 同じ種類の赤5が2枚
    b.set_doras(tiles_from_string("$d").unwrap());
    b.set_discards(tiles_from_string("$d").unwrap());
    assert!(b.validate_board().is_err());

    // 裏向きの牌
    b.set_discards(tiles_from_string("bb").unwrap());
    assert!(b.validate_flipped_tiles().is_err());
    b.set_discards(vec![]);
    assert!(b.is_valid(), "{}", b.dump());

    // 分解できない手牌
    let b = board_from("1b2b4b4d5d6d7n8n9n2d3d4d5b", &[], "5b");
    let e = b.validate_hand().unwrap_err();
    assert!(e.message().starts_with("Invalid Tile Group: "), "{}", e);

    // 役なし
    let b = board_from("1b2b3b4d5d6d2n3n4n5b", &["6n7n8n"], "5b");
    assert_eq!(
        b.validate_hand().unwrap_err().message(),
        "No wins! Hand is valid, but cannot be a winning hand"
    );
}

#[test]
fn test_pure_double_sequences() {
    let b = board_from("1b2b3b1b2b3b4d5d6d7n8n9n5b", &[], "5b");
    assert_eq!(b.pure_double_count(), 1);
    assert!(win_names(&b).contains(&"Pure Double Sequence"));

    let b = board_from("1b2b3b1b2b3b4d5d6d5b", &["4d5d6d"], "5b");
    assert_eq!(b.pure_double_count(), 2);
    assert!(win_names(&b).contains(&"Twice Pure Double Sequence"));
    assert!(!win_names(&b).contains(&"Pure Double Sequence"));

    // 門前で二盃口の形は七対子として分解される
    let b = board_from("1b2b3b1b2b3b4d5d6d4d5d6d5b", &[], "5b");
    assert_eq!(b.pure_double_count(), 0);
    assert_eq!(win_names(&b), ["Seven Pairs"]);

    // 同じ順子が3組の形は刻子として分解される
    let b = board_from("1b2b3b1b2b3b1b2b3b4d5d6d5b", &[], "5b");
    assert_eq!(b.pure_double_count(), 0);
    assert_eq!(b.count_groups(TileGroupType::Triplet), 3);
    assert!(win_names(&b).contains(&"Three Concealed Triplets"));
}

#[test]
fn test_thirteen_orphans_wait() {
    // 13面待ち
    let b = board_from("1b9b1d9d1n9newswwwnwgdrdwd", &[], "1b");
    assert!(b.is_valid(), "{}", b.dump());
    assert_eq!(win_names(&b), ["True Thirteen Orphans"]);
    assert_eq!(b.base_win_amount(), 16000);

    let b = board_from("1b1b9b1d9d1n9newswwwnwgdrd", &[], "wd");
    assert!(b.is_valid(), "{}", b.dump());
    assert_eq!(win_names(&b), ["Thirteen Orphans"]);
    assert_eq!(b.base_win_amount(), 8000);
}

#[test]
fn test_dora_count() {
    let mut b = board_from("2b3b4b4d5d6d7n8n9n2d3d4d5b", &[], "5b");
    b.set_riichi(true);
    b.set_doras(tiles_from_string("4b").unwrap());
    let n_dora = b.wins().iter().filter(|w| w.name == "Dora Indicator").count();
    assert_eq!(n_dora, 2);

    b.set_doras(tiles_from_string("4b9n").unwrap());
    let n_dora = b.wins().iter().filter(|w| w.name == "Dora Indicator").count();
    assert_eq!(n_dora, 2);

    b.set_hidden(tiles_from_string("2b3b4b4d$d6d7n8n9n2d3d4d5b").unwrap());
    assert_eq!(b.wins().iter().filter(|w| w.name == "Red Five").count(), 1);

    // 役がなければドラのみでは和了にならない
    b.set_riichi(false);
    assert!(b.wins().is_empty());
}
