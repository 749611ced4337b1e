// 点数計算のデータモデル
mod define;
mod error;
mod tile;
mod tile_group;
mod win;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use define::*;
pub use error::*;
pub use tile::*;
pub use tile_group::*;
pub use win::*;
