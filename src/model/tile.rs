use serde::{de, ser};

use super::*;

use Rank::*;

// 表向きの牌の情報
// フィールドは非公開でTile::newの検証を通したもののみ存在する
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Face {
    suit: Suit,
    rank: Rank,
    is_red: bool,    // 赤5
    is_called: bool, // 他家から鳴いた牌
}

// 牌
// 裏向きの牌(暗槓の両端以外)は後から一度だけ表の情報を確定できる
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Concealed { is_called: bool },
    Known(Face),
}

impl Tile {
    pub fn new(suit: Suit, rank: Rank, is_red: bool, is_called: bool) -> Result<Self, EvalError> {
        let err = |msg: &str| {
            Err(EvalError::Tile(format!(
                "Invalid tile: {} ({:?}, {:?}, red: {})",
                msg, suit, rank, is_red
            )))
        };

        if suit == Suit::Invalid || rank == Invalid {
            return err("suit or rank is Invalid");
        }
        if (suit == Suit::Back) != (rank == Back) {
            return err("suit or rank is Back, but not both");
        }
        if suit == Suit::Honor && !rank.is_honor() {
            return err("Honor suit but rank is not a dragon or wind");
        }
        if suit != Suit::Honor && suit != Suit::Back && rank.is_honor() {
            return err("non-honor suit but rank is a dragon or wind");
        }
        if is_red && rank != Five {
            return err("rank is not Five but the tile is red");
        }

        if suit == Suit::Back {
            Ok(Tile::Concealed { is_called })
        } else {
            Ok(Tile::Known(Face {
                suit,
                rank,
                is_red,
                is_called,
            }))
        }
    }

    #[inline]
    pub fn back() -> Self {
        Tile::Concealed { is_called: false }
    }

    #[inline]
    pub fn suit(&self) -> Suit {
        match self {
            Tile::Concealed { .. } => Suit::Back,
            Tile::Known(f) => f.suit,
        }
    }

    #[inline]
    pub fn rank(&self) -> Rank {
        match self {
            Tile::Concealed { .. } => Back,
            Tile::Known(f) => f.rank,
        }
    }

    #[inline]
    pub fn is_face_down(&self) -> bool {
        matches!(self, Tile::Concealed { .. })
    }

    #[inline]
    pub fn is_red(&self) -> bool {
        match self {
            Tile::Concealed { .. } => false,
            Tile::Known(f) => f.is_red,
        }
    }

    #[inline]
    pub fn is_called(&self) -> bool {
        match *self {
            Tile::Concealed { is_called } => is_called,
            Tile::Known(f) => f.is_called,
        }
    }

    // 緑一色の構成牌 (索子の2,3,4,6,8と發)
    pub fn is_green(&self) -> bool {
        match self.suit() {
            Suit::Bamboo => matches!(self.rank(), Two | Three | Four | Six | Eight),
            Suit::Honor => self.rank() == GreenDragon,
            _ => false,
        }
    }

    // 裏向きの牌の表を確定させる (暗槓の裏向き2枚用)
    // 確定済みの牌, 鳴いた牌に対しては失敗
    pub fn resolve(&mut self, suit: Suit, rank: Rank, is_red: bool) -> Result<(), EvalError> {
        match *self {
            Tile::Known(_) => Err(EvalError::Tile(format!(
                "Can only resolve a face-down tile: {}",
                self
            ))),
            Tile::Concealed { is_called: true } => Err(EvalError::Tile(
                "Cannot resolve a face-down tile that was called".to_string(),
            )),
            Tile::Concealed { is_called: false } => {
                let t = Tile::new(suit, rank, is_red, false)?;
                if t.is_face_down() {
                    return Err(EvalError::Tile(
                        "Cannot resolve a face-down tile into another back".to_string(),
                    ));
                }
                *self = t;
                Ok(())
            }
        }
    }

    // 鳴き・赤の有無を無視した比較. 裏向きの牌は何とも一致しない
    #[inline]
    pub fn soft_equals(&self, other: &Tile) -> bool {
        self.suit() == other.suit() && self.rank() == other.rank() && self.rank() != Back
    }

    pub fn long_name(&self) -> String {
        match self.suit() {
            Suit::Honor | Suit::Back => self.rank().name().to_string(),
            s => format!("{} of {}", self.rank(), s),
        }
    }

    // [牌の組み合わせ判定]

    // 対子
    pub fn is_pair(tiles: &[Tile]) -> bool {
        tiles.len() == 2 && tiles[0].soft_equals(&tiles[1])
    }

    // 刻子
    pub fn is_triplet(tiles: &[Tile]) -> bool {
        tiles.len() == 3 && tiles[0].soft_equals(&tiles[1]) && tiles[1].soft_equals(&tiles[2])
    }

    // 順子 (並び順は問わない)
    pub fn is_sequence(tiles: &[Tile]) -> bool {
        match sequence_numbers(tiles) {
            Some(mut ns) => {
                ns.sort_unstable();
                ns[0] + 1 == ns[1] && ns[1] + 1 == ns[2]
            }
            None => false,
        }
    }

    // 順子 (昇順に並んでいる場合のみ)
    pub fn ordered_is_sequence(tiles: &[Tile]) -> bool {
        match sequence_numbers(tiles) {
            Some(ns) => ns[0] + 1 == ns[1] && ns[1] + 1 == ns[2],
            None => false,
        }
    }

    // 槓子
    pub fn is_kan(tiles: &[Tile]) -> bool {
        tiles.len() == 4 && tiles.windows(2).all(|w| w[0].soft_equals(&w[1]))
    }

    // 面子 (3枚なら刻子か順子, 4枚なら槓子)
    pub fn is_meld(tiles: &[Tile]) -> bool {
        match tiles.len() {
            3 => Tile::is_triplet(tiles) || Tile::is_sequence(tiles),
            4 => Tile::is_kan(tiles),
            _ => false,
        }
    }

    // 赤5の枚数が不正かどうか (合計4枚以上, または同じ種別に2枚以上)
    pub fn double_red_fives(red_fives: &[Tile]) -> bool {
        if red_fives.len() > 3 {
            return true;
        }

        let mut seen = vec![];
        for t in red_fives {
            if seen.contains(&t.suit()) {
                return true;
            }
            seen.push(t.suit());
        }
        false
    }

    // [文字列表現]
    // 1文字目: 数字(1~9), 赤5は'$', 字牌は g/r/w + d, e/s/w/n + w, 裏向きはb + b
    // 2文字目: b: 索子, d: 筒子, n: 萬子
    pub fn short_string(rank: Rank, suit: Suit, is_red: bool) -> String {
        if rank == Invalid || suit == Suit::Invalid {
            return "NaN".to_string();
        }
        if rank.is_number() && !suit.is_number() {
            return "NaN".to_string();
        }
        if rank.is_honor() && suit != Suit::Honor {
            return "NaN".to_string();
        }
        if (rank == Back) != (suit == Suit::Back) {
            return "NaN".to_string();
        }

        match rank {
            Five if is_red => format!("${}", suit.to_char()),
            GreenDragon => "gd".to_string(),
            RedDragon => "rd".to_string(),
            WhiteDragon => "wd".to_string(),
            EastWind => "ew".to_string(),
            SouthWind => "sw".to_string(),
            WestWind => "ww".to_string(),
            NorthWind => "nw".to_string(),
            Back => "bb".to_string(),
            r => format!("{}{}", r.number().unwrap_or(0), suit.to_char()),
        }
    }

    pub fn from_string(s: &str, is_called: bool) -> Result<Self, EvalError> {
        let chars: Vec<char> = s.chars().collect();
        let err = || EvalError::Tile(format!("Invalid tile string: '{}'", s));
        if chars.len() != 2 {
            return Err(err());
        }

        let (rank, suit, is_red) = match (chars[0], chars[1]) {
            ('g', 'd') => (GreenDragon, Suit::Honor, false),
            ('r', 'd') => (RedDragon, Suit::Honor, false),
            ('w', 'd') => (WhiteDragon, Suit::Honor, false),
            ('e', 'w') => (EastWind, Suit::Honor, false),
            ('s', 'w') => (SouthWind, Suit::Honor, false),
            ('w', 'w') => (WestWind, Suit::Honor, false),
            ('n', 'w') => (NorthWind, Suit::Honor, false),
            ('b', 'b') | ('b', 'x') | ('x', 'x') => (Back, Suit::Back, false),
            (c0, c1) => {
                let suit = match c1 {
                    'b' => Suit::Bamboo,
                    'd' => Suit::Dot,
                    'n' => Suit::Character,
                    _ => return Err(err()),
                };
                match c0 {
                    '$' => (Five, suit, true),
                    '1'..='9' => {
                        let n = c0.to_digit(10).ok_or_else(err)? as usize;
                        (Rank::from_number(n).ok_or_else(err)?, suit, false)
                    }
                    _ => return Err(err()),
                }
            }
        };

        Tile::new(suit, rank, is_red, is_called)
    }
}

// 順子判定用: 同じ数牌種別の3枚であれば数字のリストを返却
fn sequence_numbers(tiles: &[Tile]) -> Option<[usize; 3]> {
    if tiles.len() != 3 {
        return None;
    }
    let suit = tiles[0].suit();
    if !suit.is_number() || tiles.iter().any(|t| t.suit() != suit) {
        return None;
    }
    Some([
        tiles[0].rank().number()?,
        tiles[1].rank().number()?,
        tiles[2].rank().number()?,
    ])
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            Tile::short_string(self.rank(), self.suit(), self.is_red())
        )
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)?;
        if self.is_called() {
            write!(f, "+")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Tile {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tile::from_string(s, false)
    }
}

impl ser::Serialize for Tile {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

struct TileVisitor;

impl<'de> de::Visitor<'de> for TileVisitor {
    type Value = Tile;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("tile symbol")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Tile::from_string(v, false).map_err(E::custom)
    }
}

impl<'de> de::Deserialize<'de> for Tile {
    fn deserialize<D>(deserializer: D) -> Result<Self, <D as de::Deserializer<'de>>::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_str(TileVisitor)
    }
}

// 2文字ずつの牌表現を連結した文字列をパース (空白は無視)
pub fn tiles_from_string(exp: &str) -> Result<Vec<Tile>, EvalError> {
    let chars: Vec<char> = exp.chars().filter(|c| !c.is_whitespace()).collect();
    if chars.len() % 2 != 0 {
        return Err(EvalError::Tile(format!(
            "Tile expression has an odd number of chars: '{}'",
            exp
        )));
    }
    chars
        .chunks(2)
        .map(|c| Tile::from_string(&c.iter().collect::<String>(), false))
        .collect()
}

pub fn tiles_to_string(tiles: &[Tile]) -> String {
    tiles.iter().map(|t| t.to_string()).collect()
}

#[test]
fn test_tile_construction_errors() {
    assert!(Tile::new(Suit::Invalid, One, false, false).is_err());
    assert!(Tile::new(Suit::Bamboo, Invalid, false, false).is_err());
    assert!(Tile::new(Suit::Back, One, false, false).is_err());
    assert!(Tile::new(Suit::Dot, Back, false, false).is_err());
    assert!(Tile::new(Suit::Honor, Three, false, false).is_err());
    assert!(Tile::new(Suit::Character, EastWind, false, false).is_err());
    assert!(Tile::new(Suit::Dot, Four, true, false).is_err());
    assert!(Tile::new(Suit::Dot, Five, true, false).unwrap().is_red());

    let back = Tile::new(Suit::Back, Back, false, false).unwrap();
    assert!(back.is_face_down());
    assert_eq!(back, Tile::back());
}

#[test]
fn test_soft_equals() {
    let a = Tile::new(Suit::Dot, Five, true, false).unwrap();
    let b = Tile::new(Suit::Dot, Five, false, true).unwrap();
    let c = Tile::new(Suit::Bamboo, Five, false, false).unwrap();
    assert!(a.soft_equals(&b));
    assert!(!a.soft_equals(&c));
    assert!(!Tile::back().soft_equals(&Tile::back()));
}

#[test]
fn test_resolve() {
    let mut t = Tile::back();
    t.resolve(Suit::Honor, EastWind, false).unwrap();
    assert!(!t.is_face_down());
    assert!(t.soft_equals(&"ew".parse().unwrap()));
    // 確定は一度のみ
    assert!(t.resolve(Suit::Honor, EastWind, false).is_err());

    let mut called = Tile::Concealed { is_called: true };
    assert!(called.resolve(Suit::Dot, One, false).is_err());
    let mut invalid = Tile::back();
    assert!(invalid.resolve(Suit::Dot, EastWind, false).is_err());
    assert!(invalid.is_face_down());
}

#[test]
fn test_sequence_permutations() {
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    let run = tiles_from_string("3d4d5d").unwrap();
    assert!(Tile::ordered_is_sequence(&run));
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let mut v = run.clone();
        v.shuffle(&mut rng);
        assert!(Tile::is_sequence(&v));
        let ascending = v[0].rank() < v[1].rank() && v[1].rank() < v[2].rank();
        assert_eq!(Tile::ordered_is_sequence(&v), ascending);
    }

    assert!(!Tile::is_sequence(&tiles_from_string("3d4b5d").unwrap()));
    assert!(!Tile::is_sequence(&tiles_from_string("ewswww").unwrap()));
    assert!(!Tile::is_sequence(&tiles_from_string("8d9d1d").unwrap()));
}

#[test]
fn test_meld_classifiers() {
    assert!(Tile::is_pair(&tiles_from_string("rdrd").unwrap()));
    assert!(!Tile::is_pair(&tiles_from_string("bbbb").unwrap()));
    assert!(Tile::is_triplet(&tiles_from_string("$d5d5d").unwrap()));
    assert!(Tile::is_kan(&tiles_from_string("9n9n9n9n").unwrap()));
    assert!(Tile::is_meld(&tiles_from_string("9n9n9n9n").unwrap()));
    assert!(Tile::is_meld(&tiles_from_string("7b9b8b").unwrap()));
    assert!(!Tile::is_meld(&tiles_from_string("7b9b").unwrap()));
}

#[test]
fn test_double_red_fives() {
    let f = |s: &str| Tile::double_red_fives(&tiles_from_string(s).unwrap());
    assert!(!f(""));
    assert!(!f("$b"));
    assert!(!f("$b$d$n"));
    assert!(f("$b$b"));
    assert!(f("$d$n$d"));
    assert!(f("$b$d$n$b"));
}

#[test]
fn test_string_round_trip() {
    let suits = [Suit::Bamboo, Suit::Dot, Suit::Character];
    let mut count = 0;
    for &s in &suits {
        for &r in &NUMBER_RANKS {
            for red in [false, true] {
                if red && r != Five {
                    continue;
                }
                let t = Tile::from_string(&Tile::short_string(r, s, red), false).unwrap();
                assert_eq!((t.suit(), t.rank(), t.is_red()), (s, r, red));
                count += 1;
            }
        }
    }
    for &r in DRAGON_RANKS.iter().chain(WIND_RANKS.iter()) {
        let t = Tile::from_string(&Tile::short_string(r, Suit::Honor, false), false).unwrap();
        assert_eq!((t.suit(), t.rank()), (Suit::Honor, r));
        count += 1;
    }
    let b = Tile::from_string(&Tile::short_string(Back, Suit::Back, false), false).unwrap();
    assert!(b.is_face_down());
    assert_eq!(count, 34 + 3);

    assert_eq!(Tile::short_string(One, Suit::Honor, false), "NaN");
    assert!(Tile::from_string("0b", false).is_err());
    assert!(Tile::from_string("5x", false).is_err());
    assert!(Tile::from_string("ewd", false).is_err());
}

#[test]
fn test_tile_serde() {
    let tiles = tiles_from_string("1b$dwdbb").unwrap();
    let json = serde_json::to_string(&tiles).unwrap();
    assert_eq!(json, r#"["1b","$d","wd","bb"]"#);
    let tiles2: Vec<Tile> = serde_json::from_str(&json).unwrap();
    assert_eq!(tiles, tiles2);
    assert!(serde_json::from_str::<Tile>(r#""zz""#).is_err());
}
