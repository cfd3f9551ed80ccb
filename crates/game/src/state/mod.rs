mod colors;
mod mirror;
mod sync;
mod view;

pub use colors::{BOMB_PALETTE, ColorAssigner, Rgb};
pub use mirror::{Board, Bomb, BombId, Explosion, Mirror, Player, PlayerId, Tile, Tombstone};
pub use sync::{Identity, Synchronizer};
pub use view::{
    BombSprite, ExplosionSprite, GameOutcome, GameView, PlayerSprite, ScoreEntry, TombstoneSprite,
};
