use super::*;

// 牌の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    Bamboo,    // 索子
    Dot,       // 筒子
    Character, // 萬子
    Honor,     // 字牌
    Back,      // 裏向きの牌
    Invalid,   // 番兵 (構築済みのTileが持つことはない)
}

impl Suit {
    // 数牌の種別
    #[inline]
    pub fn is_number(self) -> bool {
        matches!(self, Suit::Bamboo | Suit::Dot | Suit::Character)
    }

    pub fn to_char(self) -> char {
        match self {
            Suit::Bamboo => 'b',
            Suit::Dot => 'd',
            Suit::Character => 'n',
            Suit::Honor => 'h',
            Suit::Back => 'x',
            Suit::Invalid => '?',
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// 牌の数字部分 (字牌の場合は牌の種類)
// 宣言順が比較順になるので並び替えを変更しないこと
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Invalid,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    GreenDragon,
    RedDragon,
    WhiteDragon,
    EastWind,
    SouthWind,
    WestWind,
    NorthWind,
    Back,
}

use Rank::*;

pub const NUMBER_RANKS: [Rank; 9] = [One, Two, Three, Four, Five, Six, Seven, Eight, Nine];
pub const DRAGON_RANKS: [Rank; 3] = [GreenDragon, RedDragon, WhiteDragon];
pub const WIND_RANKS: [Rank; 4] = [EastWind, SouthWind, WestWind, NorthWind];

impl Rank {
    // 字牌 (三元牌, 風牌)
    #[inline]
    pub fn is_honor(self) -> bool {
        GreenDragon <= self && self <= NorthWind
    }

    // 風牌
    #[inline]
    pub fn is_wind(self) -> bool {
        EastWind <= self && self <= NorthWind
    }

    // 三元牌
    #[inline]
    pub fn is_dragon(self) -> bool {
        GreenDragon <= self && self <= WhiteDragon
    }

    // 数牌
    #[inline]
    pub fn is_number(self) -> bool {
        One <= self && self <= Nine
    }

    // 1,9牌
    #[inline]
    pub fn is_terminal(self) -> bool {
        self == One || self == Nine
    }

    // 中張牌
    #[inline]
    pub fn is_simple(self) -> bool {
        Two <= self && self <= Eight
    }

    // 数牌の場合は1~9, それ以外はNone
    pub fn number(self) -> Option<usize> {
        NUMBER_RANKS.iter().position(|&r| r == self).map(|i| i + 1)
    }

    pub fn from_number(n: usize) -> Option<Rank> {
        if (1..=9).contains(&n) {
            Some(NUMBER_RANKS[n - 1])
        } else {
            None
        }
    }

    // ドラ表示牌から見たドラ (数牌 9→1, 風牌 北→東, 三元牌 白→發 で循環)
    pub fn cyclic_next(self) -> Option<Rank> {
        let cycle: &[Rank] = if self.is_number() {
            &NUMBER_RANKS
        } else if self.is_wind() {
            &WIND_RANKS
        } else if self.is_dragon() {
            &DRAGON_RANKS
        } else {
            return None;
        };
        let i = cycle.iter().position(|&r| r == self)?;
        Some(cycle[(i + 1) % cycle.len()])
    }

    pub fn name(self) -> &'static str {
        match self {
            Invalid => "Invalid",
            One => "One",
            Two => "Two",
            Three => "Three",
            Four => "Four",
            Five => "Five",
            Six => "Six",
            Seven => "Seven",
            Eight => "Eight",
            Nine => "Nine",
            GreenDragon => "Green Dragon",
            RedDragon => "Red Dragon",
            WhiteDragon => "White Dragon",
            EastWind => "East Wind",
            SouthWind => "South Wind",
            WestWind => "West Wind",
            NorthWind => "North Wind",
            Back => "Back",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub fn wind_from_char(ch: char) -> Result<Rank, EvalError> {
    Ok(match ch {
        'E' => EastWind,
        'S' => SouthWind,
        'W' => WestWind,
        'N' => NorthWind,
        _ => return Err(EvalError::ScoreArgument(format!("invalid wind char: {}", ch))),
    })
}

#[test]
fn test_rank_predicates() {
    assert!(GreenDragon.is_honor() && GreenDragon.is_dragon() && !GreenDragon.is_wind());
    assert!(NorthWind.is_honor() && NorthWind.is_wind());
    assert!(!Back.is_honor() && !Back.is_number());
    assert!(One.is_terminal() && Nine.is_terminal() && !Five.is_terminal());
    assert!(Two.is_simple() && Eight.is_simple() && !One.is_simple() && !EastWind.is_simple());
    assert_eq!(Seven.number(), Some(7));
    assert_eq!(Rank::from_number(3), Some(Three));
    assert_eq!(Rank::from_number(10), None);
}

#[test]
fn test_cyclic_next() {
    assert_eq!(One.cyclic_next(), Some(Two));
    assert_eq!(Nine.cyclic_next(), Some(One));
    assert_eq!(NorthWind.cyclic_next(), Some(EastWind));
    assert_eq!(SouthWind.cyclic_next(), Some(WestWind));
    assert_eq!(WhiteDragon.cyclic_next(), Some(GreenDragon));
    assert_eq!(GreenDragon.cyclic_next(), Some(RedDragon));
    assert_eq!(Back.cyclic_next(), None);
    assert_eq!(Invalid.cyclic_next(), None);
}

#[test]
fn test_wind_char() {
    for (ch, &w) in "ESWN".chars().zip(&WIND_RANKS) {
        assert_eq!(wind_from_char(ch).unwrap(), w);
    }
    assert!(wind_from_char('X').is_err());
}
