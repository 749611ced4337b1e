use crate::model::*;
use crate::util::misc::vec_to_string;

use crate::debug;

// 面子分解の反復回数の上限 (14枚の手牌であれば7回以内に終了する)
const MAX_REDUCE_LOOP: usize = 10;

// 和了形の手牌(和了牌を含む)を面子と雀頭に分解
// 分解に失敗した場合は最後の要素にTileGroupType::Errorの組が含まれる
pub fn create_closed_groups(tiles: Vec<Tile>) -> Vec<TileGroup> {
    if let Some(groups) = seven_pairs(&tiles) {
        return groups;
    }
    if let Some(groups) = thirteen_orphans(&tiles) {
        return groups;
    }
    reduce(tiles, false, true)
}

// 分解結果がエラーを含まないかどうか
pub fn is_complete(groups: &[TileGroup]) -> bool {
    !groups.is_empty() && !groups.iter().any(|g| g.is_error())
}

// 七対子: 左から順に最初に一致した牌と対子にする (バックトラックなし)
fn seven_pairs(tiles: &[Tile]) -> Option<Vec<TileGroup>> {
    if tiles.len() != 14 {
        return None;
    }

    let mut used = [false; 14];
    let mut pairs = vec![];
    for i in 0..tiles.len() {
        if used[i] {
            continue;
        }
        for j in i + 1..tiles.len() {
            if !used[j] && tiles[i].soft_equals(&tiles[j]) {
                used[i] = true;
                used[j] = true;
                pairs.push((i, j));
                break;
            }
        }
    }

    if pairs.len() != 7 {
        return None;
    }
    Some(
        pairs
            .iter()
            .map(|&(i, j)| TileGroup::new(vec![tiles[i], tiles[j]], true))
            .collect(),
    )
}

// 国士無双: 么九牌のみで13種類揃っていること
fn thirteen_orphans(tiles: &[Tile]) -> Option<Vec<TileGroup>> {
    if tiles.len() != 14 {
        return None;
    }
    if !tiles
        .iter()
        .all(|t| t.suit() == Suit::Honor || t.rank().is_terminal())
    {
        return None;
    }

    let mut buckets: Vec<Vec<Tile>> = vec![];
    for t in tiles {
        match buckets.iter_mut().find(|b| b[0].soft_equals(t)) {
            Some(b) => b.push(*t),
            None => buckets.push(vec![*t]),
        }
    }

    match buckets.len() {
        13 => Some(buckets.into_iter().map(TileGroup::orphan).collect()),
        14 => panic!(
            "14 distinct orphans found in a 14 tile hand: {}",
            tiles_to_string(tiles)
        ),
        _ => None,
    }
}

// 残りの枚数に応じて面子(または雀頭)を一つずつ取り除く
// verbose: 曖昧な雀頭の選択をログに出力 (再帰呼び出しでは出力しない)
fn reduce(mut tiles: Vec<Tile>, mut created_pair: bool, verbose: bool) -> Vec<TileGroup> {
    let mut groups: Vec<TileGroup> = vec![];
    let mut sorted = false;
    let mut loop_count = 0;

    macro_rules! fail {
        ($($arg:tt)*) => {{
            let msg = format!(
                "{}: Found => {}, invalid => {}",
                format_args!($($arg)*),
                vec_to_string(&groups),
                tiles_to_string(&tiles)
            );
            groups.push(TileGroup::error(tiles, true, msg));
            return groups;
        }};
    }

    while !tiles.is_empty() {
        loop_count += 1;
        if loop_count > MAX_REDUCE_LOOP {
            panic!(
                "closed group reduction did not terminate: {}",
                tiles_to_string(&tiles)
            );
        }

        match tiles.len() {
            1 => fail!("Cannot have a single tile left over when creating closed groups"),
            2 => {
                if !Tile::is_pair(&tiles) {
                    fail!("Last two tiles are not a pair when creating closed groups");
                }
                if created_pair {
                    fail!("Cannot create a second pair when creating closed groups");
                }
                groups.push(TileGroup::new(std::mem::take(&mut tiles), true));
            }
            3 => {
                if !Tile::is_meld(&tiles) {
                    fail!("Bad meld while creating closed groups");
                }
                groups.push(TileGroup::new(std::mem::take(&mut tiles), true));
            }
            4 | 7 | 10 | 13 => fail!(
                "Cannot (ever) create groups from {} tiles when creating closed groups (needs to be multiple of 3 with pair)",
                tiles.len()
            ),
            5 | 6 | 9 | 12 => {
                if !sorted {
                    tiles.sort_by_key(|t| t.rank());
                    sorted = true;
                }
                match find_reducible_meld(&tiles, created_pair) {
                    Some(idx) => groups.push(TileGroup::new(take_tiles(&mut tiles, &idx), true)),
                    None => fail!(
                        "Could not find any melds while creating closed groups from the last {} tiles (which must have at least one meld)",
                        tiles.len()
                    ),
                }
            }
            8 | 11 | 14 => {
                if created_pair {
                    fail!(
                        "Cannot create groups from {} tiles because pair was already made when creating closed groups",
                        tiles.len()
                    );
                }

                // 順子の一部になり得ない刻子を優先して取り除く
                if let Some(idx) = find_non_sequence_triplet(&tiles) {
                    groups.push(TileGroup::new(take_tiles(&mut tiles, &idx), true));
                    continue;
                }

                let pairs = find_pair_candidates(&tiles);
                match pairs.len() {
                    0 => fail!(
                        "Could not find a pair while creating closed groups from the last {} tiles (which must have a pair)",
                        tiles.len()
                    ),
                    1 => {
                        let (i, j) = pairs[0];
                        groups.push(TileGroup::new(take_tiles(&mut tiles, &[i, j]), true));
                        created_pair = true;
                    }
                    _ => {
                        // 雀頭の候補が複数ある場合は残りの牌が分解できる最初の候補を採用
                        for &(i, j) in &pairs {
                            let mut rest = tiles.clone();
                            let pair = take_tiles(&mut rest, &[i, j]);
                            let sub = reduce(rest, true, false);
                            if is_complete(&sub) {
                                if verbose {
                                    debug!("ambiguous pair resolved: {}", tiles_to_string(&pair));
                                }
                                groups.push(TileGroup::new(pair, true));
                                groups.extend(sub);
                                return groups;
                            }
                        }
                        let tried: Vec<String> = pairs
                            .iter()
                            .map(|&(i, j)| format!("[{}, {}]", tiles[i].rank(), tiles[j].rank()))
                            .collect();
                        fail!(
                            "Found pairs, but all resulted in bad hands while creating closed groups from the last {} tiles (which must have a pair). Pairs: {}",
                            tiles.len(),
                            vec_to_string(&tried)
                        );
                    }
                }
            }
            _ => fail!("Closed tiles is higher than 14!"),
        }
    }

    groups
}

// 指定したindexの牌を取り出す (indexは昇順)
fn take_tiles(tiles: &mut Vec<Tile>, idx: &[usize]) -> Vec<Tile> {
    let taken: Vec<Tile> = idx.iter().map(|&i| tiles[i]).collect();
    for &i in idx.iter().rev() {
        tiles.remove(i);
    }
    taken
}

fn triples(n: usize) -> impl Iterator<Item = [usize; 3]> {
    (0..n).flat_map(move |i| {
        (i + 1..n).flat_map(move |j| (j + 1..n).map(move |k| [i, j, k]))
    })
}

fn pick3(tiles: &[Tile], idx: &[usize; 3]) -> [Tile; 3] {
    [tiles[idx[0]], tiles[idx[1]], tiles[idx[2]]]
}

// 面子の候補 (刻子が先, 順子が後, それぞれindex順)
fn meld_candidates(tiles: &[Tile]) -> Vec<[usize; 3]> {
    let triplets = triples(tiles.len()).filter(|idx| Tile::is_triplet(&pick3(tiles, idx)));
    let sequences = triples(tiles.len()).filter(|idx| Tile::is_sequence(&pick3(tiles, idx)));
    triplets.chain(sequences).collect()
}

// 取り除いた後の残りが分解可能な最初の面子
// どの候補でも分解できない場合は最初の候補を返却 (エラーは後続の分解で報告される)
fn find_reducible_meld(tiles: &[Tile], created_pair: bool) -> Option<[usize; 3]> {
    let candidates = meld_candidates(tiles);
    if candidates.len() > 1 {
        for idx in &candidates {
            let mut rest = tiles.to_vec();
            take_tiles(&mut rest, idx);
            if is_complete(&reduce(rest, created_pair, false)) {
                return Some(*idx);
            }
        }
    }
    candidates.first().copied()
}

// 他の2枚と順子を構成できない刻子
fn find_non_sequence_triplet(tiles: &[Tile]) -> Option<[usize; 3]> {
    let n = tiles.len();
    triples(n).find(|idx| {
        if !Tile::is_triplet(&pick3(tiles, idx)) {
            return false;
        }
        let t = tiles[idx[0]];
        if t.suit() == Suit::Honor {
            return true;
        }
        let others: Vec<usize> = (0..n).filter(|x| !idx.contains(x)).collect();
        !others.iter().enumerate().any(|(a, &x)| {
            others[a + 1..]
                .iter()
                .any(|&y| Tile::is_sequence(&[t, tiles[x], tiles[y]]))
        })
    })
}

// 牌iが他の2枚と面子を構成できるかどうか
fn can_meld(tiles: &[Tile], i: usize) -> bool {
    let n = tiles.len();
    (0..n).any(|k| {
        k != i
            && (k + 1..n).any(|l| l != i && Tile::is_meld(&[tiles[i], tiles[k], tiles[l]]))
    })
}

// 雀頭の候補
// 面子を構成できない牌を含む対子が見つかった場合はその対子のみを返却
fn find_pair_candidates(tiles: &[Tile]) -> Vec<(usize, usize)> {
    let mut pairs: Vec<(usize, usize)> = vec![];
    for i in 0..tiles.len() {
        for j in i + 1..tiles.len() {
            if pairs
                .iter()
                .any(|&(_, p)| tiles[p].soft_equals(&tiles[i]) || tiles[p].soft_equals(&tiles[j]))
            {
                continue;
            }
            if !tiles[i].soft_equals(&tiles[j]) {
                continue;
            }

            if !can_meld(tiles, i) || !can_meld(tiles, j) {
                return vec![(i, j)];
            }
            pairs.push((i, j));
        }
    }
    pairs
}

#[cfg(test)]
fn assert_same_tiles(groups: &[TileGroup], tiles: &[Tile]) {
    let mut rest: Vec<Tile> = tiles.to_vec();
    for g in groups {
        for t in g.tiles() {
            let i = rest
                .iter()
                .position(|t2| t2.soft_equals(t))
                .unwrap_or_else(|| panic!("tile {} not in input", t));
            rest.remove(i);
        }
    }
    assert!(rest.is_empty(), "tiles dropped: {}", tiles_to_string(&rest));
}

#[cfg(test)]
fn group_str(s: &str) -> Vec<TileGroup> {
    create_closed_groups(tiles_from_string(s).unwrap())
}

#[test]
fn test_standard_hands() {
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    let hands = [
        "1b2b3b4d5d6d7n8n9newewewrdrd",
        "1b1b1b2b3b4b5b6b7b8b9b9b9b5b",
        "2d3d4d2d3d4d5n6n7n6b7b8bgdgd",
        "1n1n1n2n2n2n3n3n3n4n5n6nnwnw",
        "$d5d5d6d7d8d2b2b2b3b4b5b9n9n",
        "2b2b2b3b4b6d7d8dwdwdwd9n9n9n",
    ];

    let mut rng = StdRng::seed_from_u64(1234);
    for h in hands {
        let tiles = tiles_from_string(h).unwrap();
        for _ in 0..10 {
            let mut shuffled = tiles.clone();
            shuffled.shuffle(&mut rng);
            let groups = create_closed_groups(shuffled.clone());
            assert!(
                is_complete(&groups),
                "{} => {}",
                h,
                vec_to_string(&groups)
            );
            assert_eq!(groups.len(), 5);
            assert_eq!(
                groups
                    .iter()
                    .filter(|g| g.group_type() == TileGroupType::Pair)
                    .count(),
                1
            );
            assert!(groups.iter().all(|g| g.closed()));
            assert_same_tiles(&groups, &shuffled);
        }
    }
}

#[test]
fn test_seven_pairs() {
    let groups = group_str("1b1b3d3d5n5newewrdrd9b9b2n2n");
    assert_eq!(groups.len(), 7);
    assert!(groups.iter().all(|g| g.group_type() == TileGroupType::Pair));

    // 6対子 + 2枚の孤立牌は七対子にならない
    let groups = group_str("1b1b3d3d5n5newewrdrd9b9b2n4n");
    assert!(!is_complete(&groups));
    assert!(groups.last().unwrap().is_error());
}

#[test]
fn test_thirteen_orphans() {
    let groups = group_str("1b9b1d9d1n9newswwwnwgdrdwd1b");
    assert_eq!(groups.len(), 13);
    assert_eq!(
        groups
            .iter()
            .filter(|g| g.group_type() == TileGroupType::Orphan)
            .count(),
        12
    );
    assert_eq!(
        groups
            .iter()
            .filter(|g| g.group_type() == TileGroupType::Pair)
            .count(),
        1
    );

    // 12種類しかない場合は国士無双にならない
    let groups = group_str("1b9b1d9d1n9newswwwnwgdrd1b9b");
    assert!(!is_complete(&groups));
}

#[test]
fn test_ambiguous_pair() {
    // 2が対子か刻子かは残りの牌で決まる
    let groups = group_str("2b2b2b3b4b6d7d8d1n2n3nwdwdwd");
    assert!(is_complete(&groups));
    let pair = groups
        .iter()
        .find(|g| g.group_type() == TileGroupType::Pair)
        .unwrap();
    assert_eq!(pair.first().rank(), Rank::Two);

    let tiles = tiles_from_string("1b1b1b2b3b4d5d6d7n8n9n3d4d5d").unwrap();
    let groups = create_closed_groups(tiles.clone());
    assert!(is_complete(&groups), "{}", vec_to_string(&groups));
    assert_same_tiles(&groups, &tiles);
}

#[test]
fn test_meld_search_keeps_pair() {
    // 残り5枚 1b1b1b2b3b: 刻子を先に取ると2b3bが残る
    let groups = group_str("wdwdwdewewew1b1b1b2b3b9n9n9n");
    assert!(is_complete(&groups), "{}", vec_to_string(&groups));
    let seq = groups
        .iter()
        .find(|g| g.group_type() == TileGroupType::Sequence)
        .unwrap();
    assert_eq!(tiles_to_string(seq.tiles()), "1b2b3b");
}

#[test]
fn test_grouping_errors() {
    let groups = group_str("1b2b4b5d6d7d7n8n9newewewrdrd");
    assert!(!is_complete(&groups));
    let err = groups.last().unwrap();
    assert!(err.is_error());
    assert!(err.error_message().unwrap().contains("Found =>"));

    let groups = group_str("1b2b3b4d5d6d7n8n9newewewrd");
    assert!(!is_complete(&groups));
    assert!(groups
        .last()
        .unwrap()
        .error_message()
        .unwrap()
        .contains("13 tiles"));

    assert!(!is_complete(&group_str("1b")));
    assert!(!is_complete(&group_str("1b2b3b4d5d6d7n8n9newewewrdrd1b1b")));
}
