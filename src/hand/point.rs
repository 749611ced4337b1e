use serde::Serialize;

use crate::model::*;

use super::board::PlayerBoard;
use super::yaku::{is_pinfu_hand, is_single_wait, WinKind};

use crate::debug;

// 点数計算の結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Score {
    pub han: usize,
    pub fu: Option<usize>, // 役満, 5翻以上の場合はNone
    pub base: usize,       // 基本点
    pub title: String,
    pub pay_order: String,
}

// 100点単位に四捨五入
fn round100(n: usize) -> usize {
    (n + 50) / 100 * 100
}

fn ceil10(n: usize) -> usize {
    (n + 9) / 10 * 10
}

// 5翻以上の基本点
pub fn calc_limit_point(han: usize) -> Option<(usize, &'static str)> {
    Some(match han {
        0..=4 => return None,
        5 => (2000, "Mangan"),
        6..=7 => (3000, "Haneman"),
        8..=10 => (4000, "Baiman"),
        11..=12 => (6000, "Sanbaiman"),
        _ => (8000, "Kazoe Yakuman"),
    })
}

fn calc_han(b: &PlayerBoard) -> usize {
    let closed = b.closed_hand();
    b.wins()
        .iter()
        .map(|w| {
            w.han(closed).unwrap_or_else(|| {
                panic!(
                    "win without {} han value: {}",
                    if closed { "closed" } else { "open" },
                    w.name
                )
            })
        })
        .sum()
}

// 符と内訳
fn calc_fu(b: &PlayerBoard) -> (usize, Vec<String>) {
    if b.has_win(WinKind::SevenPairs) {
        return (25, vec!["7Pairs (25)".to_string()]);
    }

    let mut fu = 20;
    let mut titles = vec![];
    let closed = b.closed_hand();
    if closed && !b.tsumo() {
        fu += 10;
        titles.push("Menzen-Kafu (10)".to_string());
    }

    if b.tsumo() && is_pinfu_hand(b) {
        fu += 2;
        titles.push("Tsumo (2)".to_string());
    } else {
        for g in b.groups() {
            let (mut points, mut title) = match g.group_type() {
                TileGroupType::Triplet => (2, "Triplet".to_string()),
                TileGroupType::Kan => (8, "Kan".to_string()),
                _ => continue,
            };
            let r = g.first().rank();
            if r.is_terminal() {
                points *= 2;
                title = format!("Terminal {}", title);
            } else if r.is_honor() {
                points *= 2;
                title = format!("Honor {}", title);
            }
            if g.closed() {
                points *= 2;
                title = format!("Closed {}", title);
            }
            fu += points;
            titles.push(format!("{} ({})", title, points));
        }

        if let (Some(g), Some(w)) = (b.winning_group(), b.winning()) {
            if is_single_wait(g, &w) {
                fu += 2;
                titles.push("Single Wait (2)".to_string());
            }
        }

        if let Some(p) = b.pair_group() {
            let r = p.first().rank();
            if r.is_dragon() || r == b.seat_wind() || r == b.prevalent_wind() {
                fu += 2;
                titles.push("Yakuhai Pair (2)".to_string());
            }
        }

        if fu == 20 && !closed {
            fu += 2;
            titles.push("Open Pinfu (2)".to_string());
        }
    }

    (ceil10(fu), titles)
}

fn calc_pay_order(b: &PlayerBoard, base: usize) -> String {
    if b.tsumo() {
        if b.is_dealer() {
            format!(
                "Each player pays ${} for ${} in total.",
                round100(base * 2),
                round100(base * 2 * 3)
            )
        } else {
            format!(
                "The dealer (${:?}) pays ${} and other players pay ${} for ${} in total.",
                b.prevalent_wind(),
                round100(base * 2),
                round100(base),
                round100(base * 2 * 2)
            )
        }
    } else if b.is_dealer() {
        format!("Losing player pays ${}.", round100(base * 6))
    } else {
        format!("Losing player pays ${}.", round100(base * 4))
    }
}

pub fn calc_score(b: &PlayerBoard) -> Score {
    let yakuman = b.wins().iter().map(|w| w.yakuman).max();
    let (han, fu, base, title) = match yakuman {
        Some(Yakuman::Double) => (0, None, 16000, "Double Yakuman".to_string()),
        Some(Yakuman::Single) => (0, None, 8000, "Yakuman".to_string()),
        _ => {
            let han = calc_han(b);
            if let Some((base, title)) = calc_limit_point(han) {
                (han, None, base, title.to_string())
            } else {
                let (fu, titles) = calc_fu(b);
                let base = fu * 2_usize.pow(2 + han as u32);
                let title = titles.join(", ");
                if base > 2000 {
                    (han, Some(fu), 2000, format!("Mangan!: {}", title))
                } else {
                    (han, Some(fu), base, title)
                }
            }
        }
    };
    debug!("winning: {} ({})", title, base);

    let pay_order = calc_pay_order(b, base);
    Score {
        han,
        fu,
        base,
        title,
        pay_order,
    }
}

#[cfg(test)]
fn scored_board(hidden: &str, winning: &str, tsumo: bool) -> PlayerBoard {
    let mut b = PlayerBoard::new();
    b.set_hidden(tiles_from_string(hidden).unwrap());
    b.set_winning(Some(winning.parse().unwrap()));
    b.set_tsumo(tsumo);
    b.set_riichi(true);
    b
}

#[test]
fn test_riichi_tsumo_red_five() {
    // 1-2索の辺張待ち, 赤5筒
    let mut b = scored_board("1b2b4d$d6d7n8n9n2d3d4d5b5b", "3b", true);
    b.set_seat_wind(Rank::SouthWind);
    assert!(b.is_valid(), "{}", b.dump());

    let s = b.score();
    assert_eq!(s.han, 3);
    assert_eq!(s.fu, Some(30));
    assert_eq!(s.base, 30 * 32);
    assert_eq!(s.title, "Single Wait (2)");
    assert_eq!(
        s.pay_order,
        "The dealer ($EastWind) pays $1900 and other players pay $1000 for $3800 in total."
    );

    b.set_seat_wind(Rank::EastWind);
    assert_eq!(b.pay_order(), "Each player pays $1900 for $5800 in total.");

    // ロンでは門前清自摸和がなくなり門前加符が付く
    b.set_ron(true);
    let s = b.score();
    assert_eq!(s.han, 2);
    assert_eq!(s.fu, Some(40));
    assert_eq!(s.title, "Menzen-Kafu (10), Single Wait (2)");
    assert_eq!(s.pay_order, "Losing player pays $3800.");
}

#[test]
fn test_pinfu_tsumo_fu() {
    let b = scored_board("2b3b4d5d6d7n8n9n2d3d4d5b5b", "4b", true);
    assert!(b.is_valid(), "{}", b.dump());
    let s = b.score();
    assert_eq!(s.han, 3); // 立直, 門前清自摸和, 平和
    assert_eq!(s.fu, Some(30));
    assert_eq!(s.title, "Tsumo (2)");
}

#[test]
fn test_limit_table() {
    assert_eq!(calc_limit_point(4), None);
    assert_eq!(calc_limit_point(5), Some((2000, "Mangan")));
    assert_eq!(calc_limit_point(7), Some((3000, "Haneman")));
    assert_eq!(calc_limit_point(8), Some((4000, "Baiman")));
    assert_eq!(calc_limit_point(12), Some((6000, "Sanbaiman")));
    assert_eq!(calc_limit_point(13), Some((8000, "Kazoe Yakuman")));
    assert_eq!(calc_limit_point(20), Some((8000, "Kazoe Yakuman")));

    // 清一色(6) + 一気通貫(2) + 立直 + 平和 + 門前清自摸和 = 11翻
    let b = scored_board("2b3b4b5b6b7b8b9b2b3b4b5b5b", "1b", true);
    assert!(b.is_valid(), "{}", b.dump());
    let s = b.score();
    assert_eq!(s.fu, None);
    assert_eq!((s.base, s.title.as_str()), (6000, "Sanbaiman"));
}

#[test]
fn test_seven_pairs_fu() {
    let b = scored_board("1b1b3d3d5n5newewgdgd9d9d7b", "7b", false);
    assert!(b.is_valid(), "{}", b.dump());
    let s = b.score();
    assert_eq!(s.han, 3);
    assert_eq!((s.fu, s.base), (Some(25), 25 * 32));
    assert_eq!(s.title, "7Pairs (25)");
    assert_eq!(s.pay_order, "Losing player pays $4800.");
}
