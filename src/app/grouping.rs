use crate::hand::{create_closed_groups, is_complete};
use crate::model::*;
use crate::util::misc::*;

use crate::error;

// 門前の牌の分解のみを行う
#[derive(Debug)]
pub struct GroupingApp {
    args: Vec<String>,
}

impl GroupingApp {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }

    pub fn run(&mut self) {
        if self.args.is_empty() {
            error!("tile expression not specified");
            return;
        }
        for exp in &self.args {
            if let Err(e) = process_expression(exp) {
                error!("{}", e);
            }
        }
    }
}

fn process_expression(exp: &str) -> Res {
    println!("> {}", exp);
    let tiles = tiles_from_string(exp)?;
    let groups = create_closed_groups(tiles);
    for g in &groups {
        println!("  {}", g.dump());
    }
    if !is_complete(&groups) {
        Err(format!("could not group all tiles: {}", exp))?;
    }
    Ok(())
}

#[test]
fn test_grouping_app() {
    assert!(process_expression("1b2b3bwdwd").is_ok());
    assert!(process_expression("1b2b4bwdwd").is_err());
    assert!(process_expression("1b2").is_err());
}
