use serde::{Deserialize, Serialize};

use crate::hand::PlayerBoard;
use crate::model::*;
use crate::util::misc::*;

use crate::error;

// 盤面の設定 (jsonファイルまたはコマンドライン引数から生成)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub hidden: Vec<Tile>,
    pub visible: Vec<Vec<Tile>>,
    pub winning: Option<Tile>,
    pub doras: Vec<Tile>,
    pub discards: Vec<Tile>,
    pub seat_wind: String,      // "E" | "S" | "W" | "N"
    pub prevalent_wind: String, // "E" | "S" | "W" | "N"
    pub tsumo: bool,
    pub riichi: bool,
    pub double_riichi: bool,
    pub ippatsu: bool,
    pub kan_win: bool,
    pub last_draw: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            hidden: vec![],
            visible: vec![],
            winning: None,
            doras: vec![],
            discards: vec![],
            seat_wind: "E".to_string(),
            prevalent_wind: "E".to_string(),
            tsumo: false,
            riichi: false,
            double_riichi: false,
            ippatsu: false,
            kan_win: false,
            last_draw: false,
        }
    }
}

fn parse_wind(s: &str) -> Result<Rank, EvalError> {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() != 1 {
        return Err(EvalError::ScoreArgument(format!("invalid wind: '{}'", s)));
    }
    wind_from_char(chars[0].to_ascii_uppercase())
}

impl BoardConfig {
    // 手牌(末尾が和了牌)と副露をカンマ区切りで並べた式
    // 例: "1b2bwdwd3b,ewbbbbew,5d6d7d,7b8b9b"
    pub fn from_expression(exp: &str) -> Res<Self> {
        let mut sections = exp.split(',');
        let mut hidden = tiles_from_string(sections.next().unwrap_or_default())?;
        let winning = match hidden.pop() {
            Some(t) => t,
            None => Err(format!("empty hand expression: '{}'", exp))?,
        };
        let mut visible = vec![];
        for s in sections {
            visible.push(tiles_from_string(s)?);
        }

        Ok(Self {
            hidden,
            visible,
            winning: Some(winning),
            ..Default::default()
        })
    }

    pub fn from_json(data: &str) -> Res<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn apply(&self, b: &mut PlayerBoard) -> Result<(), EvalError> {
        b.set_hidden(self.hidden.clone());
        b.set_visible(self.visible.clone());
        b.set_winning(self.winning);
        b.set_doras(self.doras.clone());
        b.set_discards(self.discards.clone());
        b.set_seat_wind(parse_wind(&self.seat_wind)?);
        b.set_prevalent_wind(parse_wind(&self.prevalent_wind)?);
        b.set_tsumo(self.tsumo);
        b.set_riichi(self.riichi);
        b.set_double_riichi(self.double_riichi);
        b.set_ippatsu(self.ippatsu);
        b.set_kan_win(self.kan_win);
        b.set_last_draw(self.last_draw);
        Ok(())
    }

    pub fn to_board(&self) -> Result<PlayerBoard, EvalError> {
        let mut b = PlayerBoard::new();
        self.apply(&mut b)?;
        Ok(b)
    }
}

// 評価結果
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub is_valid: bool,
    pub hand_error: Option<String>,
    pub wins: Vec<&'static Win>,
    pub title: Option<String>,
    pub base: Option<usize>,
    pub pay_order: Option<String>,
    pub groups: Vec<TileGroup>,
}

impl ScoreReport {
    pub fn new(b: &PlayerBoard) -> Self {
        let groups = b.groups().to_vec();
        match b.hand_error() {
            Some(e) => Self {
                is_valid: false,
                hand_error: Some(format!("Invalid Hand: {}", e)),
                wins: vec![],
                title: None,
                base: None,
                pay_order: None,
                groups,
            },
            None => {
                let score = b.score();
                Self {
                    is_valid: true,
                    hand_error: None,
                    wins: b.wins().to_vec(),
                    title: Some(score.title.clone()),
                    base: Some(score.base),
                    pay_order: Some(score.pay_order.clone()),
                    groups,
                }
            }
        }
    }

    pub fn print(&self) {
        println!("groups: {}", vec_to_string(&self.groups));
        if let Some(e) = &self.hand_error {
            println!("{}", e);
            return;
        }
        for w in &self.wins {
            println!("  {}: {}", w, w.desc);
        }
        println!(
            "{} ({})",
            self.title.as_deref().unwrap_or_default(),
            self.base.unwrap_or_default()
        );
        println!("{}", self.pay_order.as_deref().unwrap_or_default());
    }
}

#[derive(Debug)]
pub struct CalculatorApp {
    args: Vec<String>,
}

impl CalculatorApp {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }

    pub fn run(&mut self) {
        match self.parse() {
            Ok(Some((cfg, json))) => {
                if let Err(e) = self.process(&cfg, json) {
                    error!("{}", e);
                }
            }
            Ok(None) => print_usage(),
            Err(e) => error!("{}", e),
        }
    }

    fn parse(&self) -> Res<Option<(BoardConfig, bool)>> {
        let mut file_path = "".to_string();
        let mut exp = "".to_string();
        let mut flags = BoardConfig::default();
        let mut doras = "".to_string();
        let mut discards = "".to_string();
        let mut json = false;

        let mut it = self.args.iter();
        while let Some(s) = it.next() {
            match s.as_str() {
                "-f" => file_path = next_value(&mut it, s),
                "-t" => flags.tsumo = true,
                "-r" => flags.riichi = true,
                "-R" => {
                    flags.riichi = true;
                    flags.double_riichi = true;
                }
                "-i" => flags.ippatsu = true,
                "-k" => flags.kan_win = true,
                "-l" => flags.last_draw = true,
                "-d" => doras = next_value(&mut it, s),
                "-x" => discards = next_value(&mut it, s),
                "-s" => flags.seat_wind = next_value(&mut it, s),
                "-p" => flags.prevalent_wind = next_value(&mut it, s),
                "-j" => json = true,
                _ => {
                    if s.starts_with('-') {
                        Err(format!("unknown option: {}", s))?;
                    }
                    if !exp.is_empty() {
                        Err("multiple expression is not allowed")?;
                    }
                    exp = s.clone();
                }
            }
        }

        if file_path.is_empty() == exp.is_empty() {
            return Ok(None);
        }

        // jsonファイルの場合はファイル内の設定のみを使用
        if !file_path.is_empty() {
            let cfg = BoardConfig::from_json(&read_file(&file_path)?)?;
            return Ok(Some((cfg, json)));
        }

        let cfg = BoardConfig {
            doras: tiles_from_string(&doras)?,
            discards: tiles_from_string(&discards)?,
            ..flags
        };
        let hand = BoardConfig::from_expression(&exp)?;
        let cfg = BoardConfig {
            hidden: hand.hidden,
            visible: hand.visible,
            winning: hand.winning,
            ..cfg
        };
        Ok(Some((cfg, json)))
    }

    fn process(&self, cfg: &BoardConfig, json: bool) -> Res {
        let b = cfg.to_board()?;
        let report = ScoreReport::new(&b);
        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            report.print();
        }
        Ok(())
    }
}

fn print_usage() {
    error!(
        r"invalid input
Usage
    $ cargo run C EXPRESSION [OPTIONS]
    $ cargo run C -f FILE [-j]
Expression
    concealed tiles with the winning tile last, then declared melds separated by ','
    e.g. 1b2bwdwd3b,ewbbbbew,5d6d7d,7b8b9b
Options
    -f FILE:  read a board from a json file instead of a commandline expression
    -t:       tsumo (ron if omitted)
    -r:       riichi
    -R:       double riichi
    -i:       ippatsu
    -k:       win on a kan (rinshan kaihou / robbing a kan)
    -l:       win on the last tile
    -d TILES: dora indicators
    -x TILES: discards
    -s WIND:  seat wind (E, S, W, N)
    -p WIND:  prevalent wind (E, S, W, N)
    -j:       print the result as json
"
    );
}

#[cfg(test)]
fn calculator_from_line(line: &str) -> Res<BoardConfig> {
    let args: Vec<String> = line.split_whitespace().map(|s| s.to_string()).collect();
    match CalculatorApp::new(args).parse()? {
        Some((cfg, _)) => Ok(cfg),
        None => Err("no expression")?,
    }
}

#[test]
fn test_calculator() {
    // 各行: "引数 => 基本点" (基本点が0の場合は不正な手牌)
    let data = read_file("tests/win_hands.txt").unwrap();
    for line in data.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (args, expected) = line.split_once("=>").unwrap();
        let expected: usize = expected.trim().parse().unwrap();

        let b = calculator_from_line(args).unwrap().to_board().unwrap();
        let report = ScoreReport::new(&b);
        println!("> {}", line);
        if expected == 0 {
            assert!(!report.is_valid, "{}", b.dump());
        } else {
            assert!(report.is_valid, "{}", b.dump());
            assert_eq!(report.base, Some(expected), "{}", b.dump());
        }
    }
}

#[test]
fn test_board_config_json() {
    let cfg = calculator_from_line("1b2bwdwd3b,ewbbbbew,5d6d7d,7b8b9b -d rd -s E -t").unwrap();
    assert_eq!(cfg.winning, Some("3b".parse().unwrap()));
    assert_eq!(cfg.visible.len(), 3);

    let data = serde_json::to_string(&cfg).unwrap();
    assert!(data.contains(r#""hidden":["1b","2b","wd","wd"]"#));
    assert_eq!(BoardConfig::from_json(&data).unwrap(), cfg);

    // 省略した項目は既定値
    let cfg = BoardConfig::from_json(r#"{"hidden": ["1b", "2b"], "winning": "3b", "riichi": true}"#).unwrap();
    assert_eq!(cfg.seat_wind, "E");
    assert!(cfg.riichi && !cfg.tsumo);
    assert!(cfg.discards.is_empty());

    let cfg = BoardConfig {
        seat_wind: "X".to_string(),
        ..Default::default()
    };
    assert!(matches!(cfg.to_board(), Err(EvalError::ScoreArgument(_))));
}

#[test]
fn test_report() {
    let b = calculator_from_line("1b2bwdwd3b,ewbbbbew,5d6d7d,7b8b9b -d rd -x 4brd6n1nwwnw6b8n2d3dgdgd3bnwsw1d")
        .unwrap()
        .to_board()
        .unwrap();
    let report = ScoreReport::new(&b);
    assert!(report.is_valid);
    assert_eq!(report.base, Some(2000));
    assert_eq!(report.pay_order.as_deref(), Some("Losing player pays $12000."));

    let v: serde_json::Value = serde_json::to_value(&report).unwrap();
    assert_eq!(v["wins"][0]["name"], "Prevalent Wind");
    assert_eq!(v["groups"][0]["type"], "Sequence");
    assert!(v["hand_error"].is_null());

    let b = calculator_from_line("1b2b3b").unwrap().to_board().unwrap();
    let report = ScoreReport::new(&b);
    assert!(!report.is_valid);
    assert!(report.hand_error.unwrap().starts_with("Invalid Hand: The hand has 11 too few"));
}
