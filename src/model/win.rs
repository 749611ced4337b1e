use super::*;

// 役満の倍数
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Yakuman {
    None,
    Single,
    Double,
}

// 役の定義
// 翻がNoneの場合はその状態(鳴きあり/鳴きなし)では成立しない
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Win {
    pub name: &'static str,
    pub desc: &'static str,
    pub open_han: Option<usize>,
    pub closed_han: Option<usize>,
    pub yakuman: Yakuman,
}

impl Win {
    #[inline]
    pub fn han(&self, closed: bool) -> Option<usize> {
        if closed {
            self.closed_han
        } else {
            self.open_han
        }
    }

    #[inline]
    pub fn is_yakuman(&self) -> bool {
        self.yakuman != Yakuman::None
    }
}

impl fmt::Display for Win {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.yakuman {
            Yakuman::Single => write!(f, "{} (Yakuman)", self.name),
            Yakuman::Double => write!(f, "{} (Double Yakuman)", self.name),
            Yakuman::None => {
                let han = |h: Option<usize>| h.map_or("-".to_string(), |h| h.to_string());
                write!(
                    f,
                    "{} ({}/{})",
                    self.name,
                    han(self.open_han),
                    han(self.closed_han)
                )
            }
        }
    }
}
