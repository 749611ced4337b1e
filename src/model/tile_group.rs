use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TileGroupType {
    Pair,     // 雀頭, 対子
    Triplet,  // 刻子
    Sequence, // 順子
    Kan,      // 槓子
    Orphan,   // 国士無双の単独牌
    Error,    // 分類不能 (errorに理由)
}

// 2~4枚(国士無双の場合は1枚)の牌の組
// 順子は構築時に昇順に並び替えられる
#[derive(Debug, Clone, Serialize)]
pub struct TileGroup {
    tiles: Vec<Tile>,
    closed: bool,
    #[serde(rename = "type")]
    group_type: TileGroupType,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl TileGroup {
    pub fn new(tiles: Vec<Tile>, closed: bool) -> Self {
        Self::classify(tiles, closed, false)
    }

    // 国士無双用 1枚の組を許可
    pub fn orphan(tiles: Vec<Tile>) -> Self {
        Self::classify(tiles, true, true)
    }

    pub fn error(tiles: Vec<Tile>, closed: bool, msg: String) -> Self {
        Self {
            tiles,
            closed,
            group_type: TileGroupType::Error,
            error: Some(msg),
        }
    }

    fn classify(mut tiles: Vec<Tile>, closed: bool, can_be_orphan: bool) -> Self {
        use TileGroupType::*;

        let n = tiles.len();
        if !(2..=4).contains(&n) {
            if n == 1 && can_be_orphan {
                return Self::with_type(tiles, closed, Orphan);
            }
            let msg = format!(
                "Invalid number of tiles in a tile group: {} {}",
                n,
                tiles_to_string(&tiles)
            );
            return Self::error(tiles, closed, msg);
        }

        if Tile::is_pair(&tiles) {
            if !closed {
                let msg = format!("Pairs must be closed: {}", tiles_to_string(&tiles));
                return Self::error(tiles, closed, msg);
            }
            return Self::with_type(tiles, closed, Pair);
        }

        if Tile::is_triplet(&tiles) {
            return Self::with_type(tiles, closed, Triplet);
        }

        if n == 3 {
            tiles.sort_by_key(|t| t.rank());
            if Tile::ordered_is_sequence(&tiles) {
                return Self::with_type(tiles, closed, Sequence);
            }
            return Self::invalid(tiles, closed);
        }

        if Tile::is_kan(&tiles) {
            return Self::with_type(tiles, closed, Kan);
        }

        if n == 4 {
            // 暗槓 (両端のみ表向き): 裏向きの2枚を表向きの2枚と同じ牌に確定させる
            let n_back = tiles.iter().filter(|t| t.is_face_down()).count();
            if n_back != 2 {
                return Self::invalid(tiles, closed);
            }

            let shown: Vec<Tile> = tiles.iter().filter(|t| !t.is_face_down()).copied().collect();
            if !Tile::is_pair(&shown) {
                return Self::invalid(tiles, true);
            }

            let base = shown[0];
            let mut needs_red = base.rank() == Rank::Five && !shown.iter().any(|t| t.is_red());
            let mut resolved = Ok(());
            for t in tiles.iter_mut().filter(|t| t.is_face_down()) {
                resolved = resolved.and_then(|_| t.resolve(base.suit(), base.rank(), needs_red));
                needs_red = false;
            }
            return match resolved {
                Ok(()) => Self::with_type(tiles, true, Kan),
                Err(e) => Self::error(tiles, true, e.to_string()),
            };
        }

        Self::invalid(tiles, closed)
    }

    fn with_type(tiles: Vec<Tile>, closed: bool, group_type: TileGroupType) -> Self {
        Self {
            tiles,
            closed,
            group_type,
            error: None,
        }
    }

    fn invalid(tiles: Vec<Tile>, closed: bool) -> Self {
        let msg = format!(
            "Invalid tiles for creating a group: {}",
            tiles_to_string(&tiles)
        );
        Self::error(tiles, closed, msg)
    }

    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    // 先頭の牌 (順子の場合は最小の牌)
    #[inline]
    pub fn first(&self) -> Tile {
        self.tiles[0]
    }

    #[inline]
    pub fn closed(&self) -> bool {
        self.closed
    }

    #[inline]
    pub fn group_type(&self) -> TileGroupType {
        self.group_type
    }

    #[inline]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.group_type == TileGroupType::Error
    }

    // 刻子または槓子
    #[inline]
    pub fn is_tuplet(&self) -> bool {
        matches!(
            self.group_type,
            TileGroupType::Triplet | TileGroupType::Kan
        )
    }

    pub fn contains(&self, t: &Tile) -> bool {
        self.tiles.iter().any(|t2| t2.soft_equals(t))
    }

    pub fn dump(&self) -> String {
        format!(
            "{{ type: {:?}, closed: {}, tiles: {}, error: {} }}",
            self.group_type,
            self.closed,
            self,
            self.error.as_deref().unwrap_or("-")
        )
    }
}

impl fmt::Display for TileGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", tiles_to_string(&self.tiles))
    }
}

#[test]
fn test_group_types() {
    use TileGroupType::*;
    let g = |s: &str, closed: bool| TileGroup::new(tiles_from_string(s).unwrap(), closed);

    assert_eq!(g("rdrd", true).group_type(), Pair);
    assert_eq!(g("rdrd", false).group_type(), Error);
    assert_eq!(g("4n4n4n", false).group_type(), Triplet);
    assert_eq!(g("ewewewew", false).group_type(), Kan);
    assert_eq!(g("1b2b4b", true).group_type(), Error);
    assert_eq!(g("1b", true).group_type(), Error);
    assert_eq!(g("1b2b3b4b5b", true).group_type(), Error);
    assert!(g("1b2b", true).error_message().is_some());

    let seq = g("7d5d6d", false);
    assert_eq!(seq.group_type(), Sequence);
    assert_eq!(tiles_to_string(seq.tiles()), "5d6d7d");
    assert_eq!(seq.first().rank(), Rank::Five);

    let orphan = TileGroup::orphan(tiles_from_string("nw").unwrap());
    assert_eq!(orphan.group_type(), Orphan);
}

#[test]
fn test_concealed_kan_resolution() {
    use TileGroupType::*;

    let kan = TileGroup::new(tiles_from_string("ewbbbbew").unwrap(), false);
    assert_eq!(kan.group_type(), Kan);
    assert!(kan.closed());
    assert!(kan.tiles().iter().all(|t| t.rank() == Rank::EastWind));

    // 表向きに赤5がない場合は裏向きの1枚を赤5とみなす
    let kan5 = TileGroup::new(tiles_from_string("5dbbbb5d").unwrap(), false);
    assert_eq!(kan5.group_type(), Kan);
    assert_eq!(kan5.tiles().iter().filter(|t| t.is_red()).count(), 1);
    let kan5r = TileGroup::new(tiles_from_string("$dbbbb5d").unwrap(), false);
    assert_eq!(kan5r.tiles().iter().filter(|t| t.is_red()).count(), 1);

    let bad = TileGroup::new(tiles_from_string("5dbbbb6d").unwrap(), false);
    assert_eq!(bad.group_type(), Error);
    assert!(bad.closed());
    let bad2 = TileGroup::new(tiles_from_string("5dbb5d5d").unwrap(), false);
    assert_eq!(bad2.group_type(), Error);
}
